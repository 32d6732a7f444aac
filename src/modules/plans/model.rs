pub use edudesk_models::plans::*;
