pub use edudesk_models::attendance::*;
