//! The success/failure container returned by every use-case operation.
//!
//! An [`Outcome`] holds either a value or an [`ErrorInfo`], never both and
//! never neither. It is fixed at construction and immutable afterwards.
//! Expected failures (bad credentials, missing rows, concurrency clashes) are
//! returned as failed outcomes; callers inspect [`ErrorInfo::code`] and decide
//! how to recover. The container itself never retries.
//!
//! Reading the value of a failed outcome, or the error of a successful one, is
//! a programming error and panics immediately instead of handing back a
//! default. Use [`Outcome::try_value`] / [`Outcome::try_error`] when the state
//! is not known.
//!
//! # Example
//!
//! ```
//! use edudesk_core::{ErrorInfo, Outcome};
//! use edudesk_core::error_info::UserError;
//!
//! let ok = Outcome::ok(42);
//! assert!(ok.is_success());
//! assert_eq!(*ok.value(), 42);
//!
//! let failed: Outcome<i32> = Outcome::fail(UserError::NotFound);
//! assert!(failed.is_failure());
//! assert_eq!(failed.error().code(), ErrorInfo::user(UserError::NotFound).code());
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error_info::ErrorInfo;
use crate::pagination::PaginationMeta;

#[track_caller]
fn usage_fault(what: &str) -> ! {
    panic!("outcome usage fault: {what}")
}

/// Success with a `T`, or failure with an [`ErrorInfo`].
///
/// `Outcome<()>` is the value-less variant used by operations such as
/// delete and update.
#[must_use = "an outcome may carry a failure that has to be inspected"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T = ()> {
    inner: Result<T, ErrorInfo>,
}

impl<T> Outcome<T> {
    pub fn ok(value: T) -> Self {
        Self { inner: Ok(value) }
    }

    pub fn fail(error: impl Into<ErrorInfo>) -> Self {
        Self {
            inner: Err(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.inner.is_ok()
    }

    pub fn is_failure(&self) -> bool {
        self.inner.is_err()
    }

    /// The success value.
    ///
    /// # Panics
    ///
    /// Panics when called on a failed outcome.
    #[track_caller]
    pub fn value(&self) -> &T {
        match &self.inner {
            Ok(value) => value,
            Err(error) => usage_fault(&format!(
                "value accessed on a failed outcome ({})",
                error.code()
            )),
        }
    }

    /// The failure.
    ///
    /// # Panics
    ///
    /// Panics when called on a successful outcome.
    #[track_caller]
    pub fn error(&self) -> &ErrorInfo {
        match &self.inner {
            Ok(_) => usage_fault("error accessed on a successful outcome"),
            Err(error) => error,
        }
    }

    /// Consumes the outcome and returns the success value.
    ///
    /// # Panics
    ///
    /// Panics when called on a failed outcome.
    #[track_caller]
    pub fn into_value(self) -> T {
        match self.inner {
            Ok(value) => value,
            Err(error) => usage_fault(&format!(
                "value accessed on a failed outcome ({})",
                error.code()
            )),
        }
    }

    /// Consumes the outcome and returns the failure.
    ///
    /// # Panics
    ///
    /// Panics when called on a successful outcome.
    #[track_caller]
    pub fn into_error(self) -> ErrorInfo {
        match self.inner {
            Ok(_) => usage_fault("error accessed on a successful outcome"),
            Err(error) => error,
        }
    }

    pub fn try_value(&self) -> Option<&T> {
        self.inner.as_ref().ok()
    }

    pub fn try_error(&self) -> Option<&ErrorInfo> {
        self.inner.as_ref().err()
    }

    /// Transforms the success value; failures pass through untouched.
    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        Outcome {
            inner: self.inner.map(f),
        }
    }

    /// Runs the next step only if this one succeeded.
    pub fn and_then<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> Outcome<U>,
    {
        match self.inner {
            Ok(value) => f(value),
            Err(error) => Outcome::fail(error),
        }
    }

    /// Replaces or enriches the failure; successes pass through untouched.
    pub fn map_error<F>(self, f: F) -> Self
    where
        F: FnOnce(ErrorInfo) -> ErrorInfo,
    {
        Self {
            inner: self.inner.map_err(f),
        }
    }

    pub fn as_result(&self) -> Result<&T, &ErrorInfo> {
        self.inner.as_ref()
    }

    /// Bridges into `std::result::Result` so `?` can be used.
    pub fn into_result(self) -> Result<T, ErrorInfo> {
        self.inner
    }
}

impl Outcome<()> {
    /// Value-less success.
    pub fn done() -> Self {
        Self { inner: Ok(()) }
    }

    /// Succeeds when every outcome succeeded; otherwise carries the first
    /// failure in iteration order. Stops at that failure.
    pub fn all<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = Outcome<()>>,
    {
        for outcome in outcomes {
            if outcome.is_failure() {
                return outcome;
            }
        }
        Self::done()
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T>
where
    E: Into<ErrorInfo>,
{
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::ok(value),
            Err(error) => Self::fail(error),
        }
    }
}

/// Gathers the values of many outcomes; the first failure wins.
impl<T> FromIterator<Outcome<T>> for Outcome<Vec<T>> {
    fn from_iter<I: IntoIterator<Item = Outcome<T>>>(iter: I) -> Self {
        Outcome {
            inner: iter.into_iter().map(Outcome::into_result).collect(),
        }
    }
}

/// An ordered collection returned by list operations, with optional paging
/// metadata. An empty collection is still a successful result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DataResult<T> {
    /// Items in the order produced by the operation
    pub data: Vec<T>,
    /// Paging metadata when the list was paginated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PaginationMeta>,
}

impl<T> DataResult<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { data, meta: None }
    }

    pub fn paged(data: Vec<T>, meta: PaginationMeta) -> Self {
        Self {
            data,
            meta: Some(meta),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Total number of matching items: the paging total when known, else the
    /// number of items held.
    pub fn total(&self) -> i64 {
        self.meta
            .as_ref()
            .map(|meta| meta.total)
            .unwrap_or_else(|| i64::try_from(self.data.len()).unwrap_or(i64::MAX))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn map<U, F>(self, f: F) -> DataResult<U>
    where
        F: FnMut(T) -> U,
    {
        DataResult {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

impl<T> Default for DataResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<Vec<T>> for DataResult<T> {
    fn from(data: Vec<T>) -> Self {
        Self::new(data)
    }
}

impl<T> FromIterator<T> for DataResult<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for DataResult<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_info::{PersistenceError, ResourceError, UserError};

    #[test]
    fn test_ok_holds_value() {
        let outcome = Outcome::ok("plan".to_string());
        assert!(outcome.is_success());
        assert!(!outcome.is_failure());
        assert_eq!(outcome.value(), "plan");
        assert!(outcome.try_error().is_none());
    }

    #[test]
    fn test_fail_holds_error() {
        let outcome: Outcome<u32> = Outcome::fail(UserError::InvalidCredentials);
        assert!(outcome.is_failure());
        assert_eq!(
            outcome.error().code(),
            ErrorInfo::user(UserError::InvalidCredentials).code()
        );
        assert!(outcome.try_value().is_none());
    }

    #[test]
    fn test_done_is_value_less_success() {
        let outcome = Outcome::done();
        assert!(outcome.is_success());
        assert_eq!(outcome.into_result(), Ok(()));
    }

    #[test]
    #[should_panic(expected = "outcome usage fault: value accessed on a failed outcome")]
    fn test_value_on_failure_panics() {
        let outcome: Outcome<u32> = Outcome::fail(ResourceError::NotFound);
        let _ = outcome.value();
    }

    #[test]
    #[should_panic(expected = "outcome usage fault: error accessed on a successful outcome")]
    fn test_error_on_success_panics() {
        let outcome = Outcome::ok(7);
        let _ = outcome.error();
    }

    #[test]
    #[should_panic(expected = "outcome usage fault")]
    fn test_into_value_on_failure_panics() {
        let outcome: Outcome<u32> = Outcome::fail(PersistenceError::NoChanges);
        let _ = outcome.into_value();
    }

    #[test]
    fn test_map_preserves_failure() {
        let ok = Outcome::ok(2).map(|v| v * 10);
        assert_eq!(*ok.value(), 20);

        let failed: Outcome<i32> = Outcome::fail(UserError::Locked);
        let mapped = failed.map(|v| v * 10);
        assert!(mapped.error().is(UserError::Locked));
    }

    #[test]
    fn test_and_then_short_circuits() {
        let mut called = false;
        let failed: Outcome<i32> = Outcome::fail(UserError::Inactive);
        let chained = failed.and_then(|v| {
            called = true;
            Outcome::ok(v + 1)
        });
        assert!(!called);
        assert!(chained.error().is(UserError::Inactive));

        let chained = Outcome::ok(1).and_then(|v| Outcome::ok(v + 1));
        assert_eq!(chained.into_value(), 2);
    }

    #[test]
    fn test_map_error_enriches_message() {
        let failed: Outcome<()> = Outcome::fail(ResourceError::NotFound);
        let enriched = failed.map_error(|e| e.with_message("Student not found"));
        assert_eq!(enriched.error().message(), Some("Student not found"));
    }

    #[test]
    fn test_all_returns_first_failure() {
        let outcome = Outcome::all(vec![
            Outcome::done(),
            Outcome::fail(PersistenceError::ConstraintViolation),
            Outcome::fail(PersistenceError::NoChanges),
        ]);
        assert!(outcome.error().is(PersistenceError::ConstraintViolation));

        assert!(Outcome::all(Vec::new()).is_success());
    }

    #[test]
    fn test_collect_gathers_values() {
        let collected: Outcome<Vec<i32>> = vec![Outcome::ok(1), Outcome::ok(2)].into_iter().collect();
        assert_eq!(collected.into_value(), vec![1, 2]);

        let collected: Outcome<Vec<i32>> = vec![
            Outcome::ok(1),
            Outcome::fail(UserError::NotFound),
            Outcome::fail(UserError::Locked),
        ]
        .into_iter()
        .collect();
        assert!(collected.error().is(UserError::NotFound));
    }

    #[test]
    fn test_from_result() {
        let outcome: Outcome<i32> = Ok::<_, ErrorInfo>(5).into();
        assert_eq!(*outcome.value(), 5);

        let outcome: Outcome<i32> = Err(PersistenceError::FailedTransaction).into();
        assert!(outcome.error().is(PersistenceError::FailedTransaction));
    }

    #[test]
    fn test_empty_data_result_is_success() {
        let outcome = Outcome::ok(DataResult::<String>::empty());
        assert!(outcome.is_success());
        assert!(outcome.value().is_empty());
        assert_eq!(outcome.value().len(), 0);
        assert_eq!(outcome.value().total(), 0);
    }

    #[test]
    fn test_data_result_total_prefers_meta() {
        let meta = PaginationMeta {
            total: 42,
            limit: 2,
            offset: Some(0),
            page: Some(1),
            has_more: true,
        };
        let result = DataResult::paged(vec!["a", "b"], meta);
        assert_eq!(result.len(), 2);
        assert_eq!(result.total(), 42);

        let unpaged: DataResult<&str> = vec!["a", "b", "c"].into();
        assert_eq!(unpaged.total(), 3);
    }

    #[test]
    fn test_data_result_serializes_like_paginated_response() {
        let result: DataResult<i32> = DataResult::new(vec![1, 2]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({ "data": [1, 2] }));
    }
}
