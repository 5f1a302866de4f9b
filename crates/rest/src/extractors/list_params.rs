//! List query extractor.
//!
//! Turns query parameters into a content filter plus result controls.

use std::collections::HashMap;

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use dalali_store::core::Filter;

use crate::error::RestError;

/// Axum extractor for list queries.
///
/// Every ordinary query parameter becomes an equality condition on the
/// payload field of the same name. Parameters starting with `_` are
/// reserved controls:
///
/// - `_limit` caps the number of returned records
/// - `_count=true` returns a count instead of records
///
/// A `tenant_id` parameter is not special-cased here: it flows into the
/// filter and the scoped store's guard decides whether it is a harmless
/// restatement of the scope or a violation. Dropping it silently would hide
/// exactly the calls that guard exists to catch.
///
/// # Example
///
/// ```rust,ignore
/// use dalali_rest::extractors::ListParams;
///
/// async fn list_handler(params: ListParams) {
///     let filter = params.filter();
///     let limit = params.effective_limit(50, 500);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    conditions: Vec<(String, String)>,
    limit: Option<usize>,
    count_only: bool,
}

impl ListParams {
    /// Builds the content filter from the ordinary parameters.
    pub fn filter(&self) -> Filter {
        let mut filter = Filter::new();
        for (field, value) in &self.conditions {
            filter = filter.eq(field.as_str(), value.as_str());
        }
        filter
    }

    /// The raw `_limit` value, if one was supplied.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// True when the request asked for a count instead of records.
    pub fn count_only(&self) -> bool {
        self.count_only
    }

    /// Resolves the page size: the requested limit capped at `max`, or
    /// `default` when none was requested.
    pub fn effective_limit(&self, default: usize, max: usize) -> usize {
        self.limit.unwrap_or(default).min(max)
    }
}

impl<S> FromRequestParts<S> for ListParams
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|_| RestError::BadRequest {
                message: "invalid query parameters".to_string(),
            })?;

        let mut params = ListParams::default();
        for (key, value) in query {
            match key.as_str() {
                "_limit" => {
                    params.limit =
                        Some(value.parse::<usize>().map_err(|_| RestError::BadRequest {
                            message: format!("invalid _limit value '{}'", value),
                        })?);
                }
                "_count" => {
                    params.count_only = match value.as_str() {
                        "true" | "1" => true,
                        "false" | "0" => false,
                        other => {
                            return Err(RestError::BadRequest {
                                message: format!("invalid _count value '{}'", other),
                            });
                        }
                    };
                }
                other if other.starts_with('_') => {
                    return Err(RestError::BadRequest {
                        message: format!("unknown parameter '{}'", other),
                    });
                }
                _ => params.conditions.push((key, value)),
            }
        }
        Ok(params)
    }
}
