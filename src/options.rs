//! Per-call request options and the deep merge that layers them over the client defaults.
//!
//! A [`RequestOptions`] value carries the three things a caller may shape on a request:
//! query parameters, an optional JSON body and headers. The client builds its own defaults
//! (authorization, content type, user agent) as another [`RequestOptions`] and merges the
//! caller's options over them with [`merge_json`], so a caller can replace any single
//! default header without losing the others.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::Result;
use crate::error::{Error, Kind};

/// Query parameters, body and headers for a single request.
///
/// Header names are compared case-insensitively: they are stored lowercase, so
/// `Content-Type` set by a caller replaces the default `content-type`.
///
/// # Example
///
/// ```
/// use churchtools_client::RequestOptions;
/// use serde_json::json;
///
/// let options = RequestOptions::new()
///     .header("Accept-Language", "de")
///     .query("limit", 5)
///     .query("ids", json!([1, 2]));
///
/// assert_eq!(options.query_string(), "ids%5B%5D=1&ids%5B%5D=2&limit=5");
/// ```
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestOptions {
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    query: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    body: Option<Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    headers: BTreeMap<String, String>,
}

impl RequestOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header, replacing any previous value under the same (case-insensitive) name.
    #[must_use]
    pub fn header<K: AsRef<str>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Sets a single query parameter. Arrays are sent in bracket notation (`key[]=v`).
    #[must_use]
    pub fn query<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Adds every field of `params` as a query parameter.
    ///
    /// `params` must serialize to a JSON object; `None` fields should be skipped by the
    /// type itself (e.g. with `serde_with::skip_serializing_none`).
    pub fn query_from<Q: Serialize>(mut self, params: &Q) -> Result<Self> {
        match serde_json::to_value(params).map_err(invalid_options)? {
            Value::Object(fields) => {
                self.query.extend(fields);
                Ok(self)
            }
            Value::Null => Ok(self),
            other => Err(Error::validation(format!(
                "query parameters must serialize to an object, got {other}"
            ))),
        }
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn body<B: Into<Value>>(mut self, body: B) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn query_params(&self) -> &Map<String, Value> {
        &self.query
    }

    #[must_use]
    pub fn json_body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    #[must_use]
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Looks up a header by name, ignoring case.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Whether the body holds something worth sending.
    ///
    /// `null`, `""`, `[]` and `{}` count as empty; `false` and `0` are real JSON bodies.
    #[must_use]
    pub fn has_body(&self) -> bool {
        match &self.body {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(items)) => !items.is_empty(),
            Some(Value::Object(fields)) => !fields.is_empty(),
            Some(Value::Bool(_) | Value::Number(_)) => true,
        }
    }

    /// Drops the body when [`RequestOptions::has_body`] finds nothing worth sending.
    #[must_use]
    pub fn without_empty_body(mut self) -> Self {
        if !self.has_body() {
            self.body = None;
        }
        self
    }

    /// Returns these options layered over `defaults`. Keys set here win at every depth.
    pub fn merged_over(self, defaults: RequestOptions) -> Result<RequestOptions> {
        let mut merged = serde_json::to_value(defaults).map_err(invalid_options)?;
        merge_json(
            &mut merged,
            serde_json::to_value(self).map_err(invalid_options)?,
        );

        serde_json::from_value(merged).map_err(invalid_options)
    }

    /// Form-urlencodes the query parameters, without a leading `?`.
    ///
    /// Scalars become `key=value`, arrays `key[]=v1&key[]=v2`, objects `key[sub]=v`.
    /// `null` values are skipped. Returns an empty string when nothing is left to encode.
    #[must_use]
    pub fn query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.query {
            append_query_value(&mut serializer, key, value);
        }

        serializer.finish()
    }
}

/// Request-side serialization failures are the caller's input, not a bad response.
fn invalid_options(e: serde_json::Error) -> Error {
    Error::with_source(Kind::Validation, e)
}

fn append_query_value(
    serializer: &mut form_urlencoded::Serializer<'_, String>,
    key: &str,
    value: &Value,
) {
    match value {
        Value::Null => {}
        Value::Bool(flag) => {
            serializer.append_pair(key, if *flag { "true" } else { "false" });
        }
        Value::Number(number) => {
            serializer.append_pair(key, &number.to_string());
        }
        Value::String(text) => {
            serializer.append_pair(key, text);
        }
        Value::Array(items) => {
            let key = format!("{key}[]");
            for item in items {
                append_query_value(serializer, &key, item);
            }
        }
        Value::Object(fields) => {
            for (field, item) in fields {
                append_query_value(serializer, &format!("{key}[{field}]"), item);
            }
        }
    }
}

/// Recursively merges `overlay` into `base`.
///
/// When both sides hold an object at the same position their keys are merged one by one.
/// Anything else in `overlay` (scalar, array, `null`) replaces what `base` had there.
pub fn merge_json(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_fields), Value::Object(overlay_fields)) => {
            for (key, value) in overlay_fields {
                match base_fields.get_mut(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        base_fields.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
