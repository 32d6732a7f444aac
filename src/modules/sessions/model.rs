pub use edudesk_models::sessions::*;
