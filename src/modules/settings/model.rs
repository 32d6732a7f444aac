pub use edudesk_models::settings::*;
