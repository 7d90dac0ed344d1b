//! Parameter sanitization and query-string construction.
//!
//! Parameter maps are [`serde_json::Map`]s of string keys to scalar values.
//! Sanitization drops entries whose value is an empty string while keeping
//! every numeric and boolean value, including `0` and `false` — falsy but
//! valid values must survive.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::{Map, Value};
use std::collections::HashMap;
use url::Url;

use crate::Result;

/// A parameter map: string keys, arbitrary scalar values.
pub type Params = Map<String, Value>;

/// An untyped JSON document: what a key-value response decodes into.
pub type Document = Map<String, Value>;

/// Bytes outside the URL-fragment-safe set, percent-encoded before dispatch.
const URL_ENCODE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Returns a new map containing only entries whose value is a non-empty
/// string, or any numeric or boolean value.
///
/// Numeric and boolean values pass through unconditionally, even when
/// semantically "empty" like `0` or `false`; only empty-string values are
/// dropped. Nulls, arrays and nested objects are dropped as well.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use wicket::params::{sanitize, Params};
///
/// let mut params = Params::new();
/// params.insert("a".into(), json!(""));
/// params.insert("b".into(), json!(0));
/// params.insert("c".into(), json!(false));
/// params.insert("d".into(), json!("x"));
///
/// let sanitized = sanitize(&params);
/// assert!(!sanitized.contains_key("a"));
/// assert_eq!(sanitized.len(), 3);
/// ```
pub fn sanitize(params: &Params) -> Params {
    let mut sanitized = Params::new();
    for (key, value) in params {
        match value {
            Value::String(s) if s.is_empty() => {}
            Value::String(_) | Value::Number(_) | Value::Bool(_) => {
                sanitized.insert(key.clone(), value.clone());
            }
            _ => {}
        }
    }
    sanitized
}

/// Sanitize pass for string maps: drops entries with empty values.
///
/// A header explicitly set to `""` means "do not send".
pub fn sanitize_strings(map: &HashMap<String, String>) -> HashMap<String, String> {
    map.iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Builds a `key=value&key=value` query string from a parameter map.
///
/// Entries whose stringified value is empty are skipped, and the output
/// never carries a trailing separator. Pair order follows map order; no
/// ordering is guaranteed by the contract.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use wicket::params::{build_query_string, Params};
///
/// let mut params = Params::new();
/// params.insert("a".into(), json!("1"));
/// params.insert("b".into(), json!(""));
/// assert_eq!(build_query_string(&params), "a=1");
/// ```
pub fn build_query_string(params: &Params) -> String {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params {
        let value = stringify(value);
        if !value.is_empty() {
            pairs.push(format!("{}={}", key, value));
        }
    }
    pairs.join("&")
}

/// Renders a scalar value the way it appears in a query pair: strings
/// unquoted, everything else in its JSON form.
pub(crate) fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Percent-encodes a fully assembled URL and parses it for dispatch.
///
/// Characters outside the URL-fragment-safe set are encoded first, then
/// the result must parse as an absolute URL. A parse failure surfaces as
/// [`Error::InvalidUrl`](crate::Error::InvalidUrl) — this is where an
/// unvalidated base URL finally gets caught.
pub(crate) fn encode_url(raw: &str) -> Result<Url> {
    let encoded = utf8_percent_encode(raw, URL_ENCODE).to_string();
    Ok(Url::parse(&encoded)?)
}

/// Pretty-prints a parameter map as a JSON string.
///
/// Returns `None` if the map cannot be serialized.
pub fn json_to_string(json: &Params) -> Option<String> {
    serde_json::to_string_pretty(json).ok()
}
