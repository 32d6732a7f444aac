//! Cooperative cancellation for use-case operations.
//!
//! Each inbound request gets one [`CancelSignal`]. Operations receive it by
//! reference and either poll it at checkpoints ([`CancelSignal::check`]) or
//! race their I/O against it ([`CancelSignal::run`]). When the signal fires
//! first the in-flight future is dropped, so nothing after the last completed
//! await point runs and open transactions roll back on drop.

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tokio::sync::watch;

use crate::error_info::{ErrorInfo, RequestError};
use crate::outcome::Outcome;

/// A cloneable, fire-once cancellation flag.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Fires the signal. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once the signal has fired.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            // The sender lives as long as `self`, so this never resolves.
            std::future::pending::<()>().await;
        }
    }

    /// Fails with `Error_Request_Canceled` once the signal has fired.
    pub fn check(&self) -> Result<(), ErrorInfo> {
        if self.is_cancelled() {
            Err(ErrorInfo::canceled())
        } else {
            Ok(())
        }
    }

    /// Races `operation` against the signal.
    ///
    /// Returns the operation's result as an [`Outcome`], or a canceled
    /// outcome if the signal fires first, in which case `operation` is
    /// dropped without being polled again.
    pub async fn run<T, F>(&self, operation: F) -> Outcome<T>
    where
        F: Future<Output = Result<T, ErrorInfo>>,
    {
        if self.is_cancelled() {
            return Outcome::fail(RequestError::Canceled);
        }

        tokio::select! {
            biased;
            _ = self.cancelled() => Outcome::fail(RequestError::Canceled),
            result = operation => Outcome::from(result),
        }
    }

    /// Returns a guard that fires this signal when dropped unless disarmed.
    pub fn drop_guard(&self) -> CancelOnDrop {
        CancelOnDrop {
            signal: Some(self.clone()),
        }
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Fires its signal on drop. See [`CancelSignal::drop_guard`].
#[derive(Debug)]
pub struct CancelOnDrop {
    signal: Option<CancelSignal>,
}

impl CancelOnDrop {
    /// Consumes the guard without firing the signal.
    pub fn disarm(mut self) -> CancelSignal {
        self.signal.take().unwrap_or_default()
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if let Some(signal) = self.signal.take() {
            signal.cancel();
        }
    }
}

/// Handlers take the request's signal as an extractor. Requests that did not
/// pass through the cancellation boundary get a fresh, never-fired signal.
impl<S> FromRequestParts<S> for CancelSignal
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<CancelSignal>()
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[test]
    fn test_new_signal_is_not_cancelled() {
        let signal = CancelSignal::new();
        assert!(!signal.is_cancelled());
        assert!(signal.check().is_ok());
    }

    #[test]
    fn test_cancel_is_visible_to_clones() {
        let signal = CancelSignal::new();
        let clone = signal.clone();
        signal.cancel();
        signal.cancel();
        assert!(clone.is_cancelled());
        assert!(clone.check().unwrap_err().is_canceled());
    }

    #[tokio::test]
    async fn test_run_passes_result_through() {
        let signal = CancelSignal::new();
        let outcome = signal.run(async { Ok::<_, ErrorInfo>(3) }).await;
        assert_eq!(outcome.into_value(), 3);
    }

    #[tokio::test]
    async fn test_run_on_fired_signal_never_polls_operation() {
        let signal = CancelSignal::new();
        signal.cancel();

        let touched = AtomicBool::new(false);
        let outcome = signal
            .run(async {
                touched.store(true, Ordering::SeqCst);
                Ok::<_, ErrorInfo>(())
            })
            .await;

        assert!(outcome.error().is_canceled());
        assert!(!touched.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_run_stops_midway_when_fired() {
        let signal = CancelSignal::new();
        let finished = Arc::new(AtomicBool::new(false));

        let trigger = signal.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let flag = finished.clone();
        let outcome = signal
            .run(async move {
                tokio::time::sleep(Duration::from_secs(5)).await;
                flag.store(true, Ordering::SeqCst);
                Ok::<_, ErrorInfo>(())
            })
            .await;

        assert!(outcome.error().is_canceled());
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[test]
    fn test_drop_guard_fires_unless_disarmed() {
        let signal = CancelSignal::new();
        drop(signal.drop_guard());
        assert!(signal.is_cancelled());

        let signal = CancelSignal::new();
        let _ = signal.drop_guard().disarm();
        assert!(!signal.is_cancelled());
    }
}
