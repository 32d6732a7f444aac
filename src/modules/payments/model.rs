pub use edudesk_models::payments::*;
