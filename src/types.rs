//! Request filters and decoded payload shapes.
//!
//! Responses are not mapped onto typed structs: every endpoint returns the JSON exactly as
//! the server sent it, with only the fields the authenticated user may see. Dates arrive as
//! `YYYY-MM-DD` strings and timestamps as `1994-11-05T08:15:30Z` strings and are left as is.

use bon::Builder;
use serde::Serialize;
use serde_json::{Map, Value};
use serde_with::skip_serializing_none;

/// A decoded JSON object, e.g. the server info, the current user or one person record.
pub type Payload = Map<String, Value>;

/// Filters for `GET /persons`.
///
/// All fields are optional and sent verbatim; the server validates them. List filters are
/// sent in bracket notation (`ids[]=1&ids[]=2`). Results are sorted by the server (last
/// name, then first name).
///
/// # Example
///
/// ```
/// use churchtools_client::types::PersonsRequest;
///
/// let request = PersonsRequest::builder()
///     .ids(vec![1, 2])
///     .limit(5)
///     .build();
/// ```
#[skip_serializing_none]
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Builder, Serialize)]
pub struct PersonsRequest {
    /// Only these person ids.
    pub ids: Option<Vec<i64>>,
    /// Only persons with one of these status ids.
    pub status_ids: Option<Vec<i64>>,
    /// Only persons belonging to one of these campuses.
    pub campus_ids: Option<Vec<i64>>,
    /// Birthday before this date, `YYYY-MM-DD`.
    #[builder(into)]
    pub birthday_before: Option<String>,
    /// Birthday after this date, `YYYY-MM-DD`.
    #[builder(into)]
    pub birthday_after: Option<String>,
    pub is_archived: Option<bool>,
    /// Page to return, the server starts at 1.
    pub page: Option<u32>,
    /// Page size, the server defaults to 10.
    pub limit: Option<u32>,
    /// Any further parameters, passed through as given.
    #[serde(flatten)]
    #[builder(default)]
    pub extra: Map<String, Value>,
}
