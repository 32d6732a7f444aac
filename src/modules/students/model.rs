//! Student models, re-exported from `edudesk-models`.

pub use edudesk_models::students::*;
