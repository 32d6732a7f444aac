//! Paging for list endpoints.
//!
//! Lists accept either `limit` + `offset` or `limit` + `page` (1-based);
//! `page` wins when both are sent. Repositories receive the resolved
//! `limit`/`offset` pair and report the unpaged total, from which
//! [`PaginationMeta::for_params`] builds the `meta` block of a
//! [`crate::DataResult`].
//!
//! ```ignore
//! let (students, total) = repo.list(&filter, params.limit(), params.offset()).await?;
//! Ok(DataResult::paged(students, PaginationMeta::for_params(&params, total)))
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Query strings send `?limit=` for a cleared field; read it as absent.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// The `meta` block of a paged list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Matching items across all pages
    pub total: i64,
    /// Page size actually applied
    pub limit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// Echoed back only when the request was page-based
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    pub has_more: bool,
}

impl PaginationMeta {
    #[must_use]
    pub fn for_params(params: &PaginationParams, total: i64) -> Self {
        let limit = params.limit();
        let offset = params.offset();
        Self {
            total,
            limit,
            offset: Some(offset),
            page: params.page(),
            has_more: offset.saturating_add(limit) < total,
        }
    }
}

/// `limit` is clamped to `1..=100` (default 10); `offset` and `page` never
/// go below 0 and 1.
#[derive(Debug, Clone, Hash, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page size, 1-100
    #[serde(default, deserialize_with = "blank_as_none")]
    pub limit: Option<i64>,
    /// Items to skip; ignored when `page` is set
    #[serde(default, deserialize_with = "blank_as_none")]
    pub offset: Option<i64>,
    /// 1-based page number
    #[serde(default, deserialize_with = "blank_as_none")]
    pub page: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            limit: Some(DEFAULT_LIMIT),
            offset: Some(0),
            page: Some(1),
        }
    }
}

impl PaginationParams {
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        match self.page() {
            Some(page) => (page - 1).saturating_mul(self.limit()),
            None => self.offset.unwrap_or(0).max(0),
        }
    }

    #[must_use]
    pub fn page(&self) -> Option<i64> {
        self.page.map(|page| page.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<i64>, offset: Option<i64>, page: Option<i64>) -> PaginationParams {
        PaginationParams { limit, offset, page }
    }

    #[test]
    fn test_default_is_first_page_of_ten() {
        let p = PaginationParams::default();
        assert_eq!((p.limit(), p.offset(), p.page()), (10, 0, Some(1)));
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(params(Some(0), None, None).limit(), 1);
        assert_eq!(params(Some(-7), None, None).limit(), 1);
        assert_eq!(params(Some(250), None, None).limit(), MAX_LIMIT);
        assert_eq!(params(None, None, None).limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn test_page_takes_precedence_over_offset() {
        let p = params(Some(20), Some(5), Some(3));
        assert_eq!(p.offset(), 40);

        let p = params(Some(20), Some(5), Some(0));
        assert_eq!(p.page(), Some(1));
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_negative_offset_is_zero() {
        assert_eq!(params(None, Some(-3), None).offset(), 0);
    }

    #[test]
    fn test_blank_query_values_fall_back_to_defaults() {
        let p: PaginationParams = serde_json::from_str(r#"{"limit":"","offset":" "}"#).unwrap();
        assert_eq!((p.limit(), p.offset()), (10, 0));

        let p: PaginationParams = serde_json::from_str(r#"{"limit":"25","page":"2"}"#).unwrap();
        assert_eq!(p.offset(), 25);

        assert!(serde_json::from_str::<PaginationParams>(r#"{"limit":"ten"}"#).is_err());
    }

    #[test]
    fn test_meta_reports_remaining_items() {
        let p = params(Some(10), Some(20), None);
        let meta = PaginationMeta::for_params(&p, 31);
        assert_eq!((meta.offset, meta.page), (Some(20), None));
        assert!(meta.has_more);
        assert!(!PaginationMeta::for_params(&p, 30).has_more);
    }

    #[test]
    fn test_meta_omits_absent_position() {
        let meta = PaginationMeta {
            total: 0,
            limit: 10,
            offset: None,
            page: None,
            has_more: false,
        };
        assert_eq!(
            serde_json::to_string(&meta).unwrap(),
            r#"{"total":0,"limit":10,"has_more":false}"#
        );
    }
}
