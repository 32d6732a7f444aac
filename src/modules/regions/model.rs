pub use edudesk_models::regions::*;
