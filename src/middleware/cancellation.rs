//! The cancellation boundary.
//!
//! Every request gets a [`CancelSignal`] in its extensions. If the client
//! goes away, hyper drops the request future, the drop guard fires the
//! signal, and whatever operation is racing against it stops at its next
//! await point. If a handler reports a canceled outcome, this layer is the
//! one place that turns it into the `499` response.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use edudesk_core::errors::RequestCanceled;
use edudesk_core::{AppError, CancelSignal, ErrorInfo};
use tracing::info;

use crate::metrics;

pub async fn cancellation_boundary(mut req: Request, next: Next) -> Response {
    // A signal attached upstream (for example by the connection) is reused.
    let signal = match req.extensions().get::<CancelSignal>() {
        Some(signal) => signal.clone(),
        None => {
            let signal = CancelSignal::new();
            req.extensions_mut().insert(signal.clone());
            signal
        }
    };

    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let guard = signal.drop_guard();
    let response = next.run(req).await;
    guard.disarm();

    if response.extensions().get::<RequestCanceled>().is_none() {
        return response;
    }

    info!(method = %method, path = %path, "Request canceled by client");
    metrics::track_canceled_request();
    canceled_response()
}

/// `499` with `{"error":"Request canceled by client","code":"Error_Request_Canceled"}`.
pub fn canceled_response() -> Response {
    AppError::from(ErrorInfo::canceled()).into_response()
}
