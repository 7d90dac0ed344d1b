//! Per-call request description.

use http::Method;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::params::Params;

/// Where a request is aimed: a path appended to the gateway's base URL,
/// or a fully-qualified URL that bypasses it.
#[derive(Debug, Clone)]
pub enum Target {
    /// A relative path appended to the configured base URL.
    RelativeToBase(String),
    /// A complete URL used as-is.
    Absolute(String),
}

/// How per-call headers combine with the gateway's defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderMode {
    /// Defaults overlaid with per-call headers; the per-call value wins on
    /// key collision.
    #[default]
    MergeDefaults,
    /// Only the per-call headers are sent; defaults are omitted entirely.
    ReplaceDefaults,
}

/// Description of a single request: target, method, parameters, optional
/// file attachments, and per-call header handling.
///
/// A spec is built once, consumed by a dispatch call, and discarded. For
/// GET-like methods the parameters are serialized into the query string;
/// for body-bearing methods they become the JSON body. Attaching a file
/// switches the request to a multipart upload.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use wicket::RequestSpec;
///
/// let spec = RequestSpec::get("/users")
///     .with_param("page", json!(1))
///     .with_param("active", json!(true))
///     .with_header("X-Request-Id", "abc-123");
/// ```
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// The request target.
    pub target: Target,

    /// The HTTP method.
    pub method: Method,

    /// Parameters: query pairs for GET-like methods, JSON body otherwise.
    pub params: Params,

    /// A pre-built query string used verbatim instead of `params` on
    /// GET-like dispatch.
    pub raw_query: Option<String>,

    /// Named file attachments; non-empty means multipart dispatch.
    pub files: Vec<(String, PathBuf)>,

    /// Per-call header overrides.
    pub headers: HashMap<String, String>,

    /// Whether to run the sanitize pass over `params` before dispatch.
    pub sanitize: bool,

    /// How `headers` combine with the gateway defaults.
    pub header_mode: HeaderMode,
}

impl RequestSpec {
    /// Creates a spec with the given method and target.
    pub fn new(method: Method, target: Target) -> Self {
        Self {
            target,
            method,
            params: Params::new(),
            raw_query: None,
            files: Vec::new(),
            headers: HashMap::new(),
            sanitize: false,
            header_mode: HeaderMode::default(),
        }
    }

    /// A GET request to a path relative to the base URL.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, Target::RelativeToBase(path.into()))
    }

    /// A POST request to a path relative to the base URL.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, Target::RelativeToBase(path.into()))
    }

    /// A request to a complete URL, ignoring the configured base URL.
    pub fn absolute(method: Method, url: impl Into<String>) -> Self {
        Self::new(method, Target::Absolute(url.into()))
    }

    /// Adds a parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Replaces the parameter map wholesale.
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Uses a pre-built query string verbatim for GET-like dispatch.
    ///
    /// Takes precedence over `params` when present. The string is still
    /// percent-encoded with the rest of the URL before dispatch.
    pub fn with_raw_query(mut self, query: impl Into<String>) -> Self {
        self.raw_query = Some(query.into());
        self
    }

    /// Adds a per-call header override.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Attaches a file by path under the given part name, switching the
    /// request to a multipart upload.
    pub fn with_file(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.files.push((name.into(), path.into()));
        self
    }

    /// Runs the sanitize pass over the parameters before dispatch.
    pub fn sanitized(mut self) -> Self {
        self.sanitize = true;
        self
    }

    /// Sends only the per-call headers, omitting the gateway defaults.
    pub fn custom_headers_only(mut self) -> Self {
        self.header_mode = HeaderMode::ReplaceDefaults;
        self
    }
}

impl Default for RequestSpec {
    fn default() -> Self {
        Self::get("")
    }
}

/// Right-biased header merge: `overrides` wins on key collision.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use wicket::merge_headers;
///
/// let defaults = HashMap::from([("A".to_string(), "1".to_string())]);
/// let overrides = HashMap::from([("A".to_string(), "2".to_string())]);
///
/// let merged = merge_headers(&defaults, &overrides);
/// assert_eq!(merged.get("A").map(String::as_str), Some("2"));
/// ```
pub fn merge_headers(
    defaults: &HashMap<String, String>,
    overrides: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut merged = defaults.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_is_right_biased() {
        let defaults = HashMap::from([
            ("A".to_string(), "1".to_string()),
            ("B".to_string(), "keep".to_string()),
        ]);
        let overrides = HashMap::from([("A".to_string(), "2".to_string())]);

        let merged = merge_headers(&defaults, &overrides);

        assert_eq!(merged.get("A").map(String::as_str), Some("2"));
        assert_eq!(merged.get("B").map(String::as_str), Some("keep"));
    }

    #[test]
    fn merge_with_empty_overrides_is_identity() {
        let defaults = HashMap::from([("A".to_string(), "1".to_string())]);
        let merged = merge_headers(&defaults, &HashMap::new());
        assert_eq!(merged, defaults);
    }

    #[test]
    fn combinators_accumulate() {
        let spec = RequestSpec::get("/users")
            .with_param("page", json!(1))
            .with_header("X-Request-Id", "abc")
            .sanitized();

        assert_eq!(spec.method, Method::GET);
        assert!(spec.sanitize);
        assert_eq!(spec.params.get("page"), Some(&json!(1)));
        assert_eq!(spec.headers.get("X-Request-Id").map(String::as_str), Some("abc"));
        assert!(matches!(spec.target, Target::RelativeToBase(ref p) if p == "/users"));
    }

    #[test]
    fn attaching_a_file_marks_multipart() {
        let spec = RequestSpec::post("/upload").with_file("avatar", "/tmp/avatar.png");
        assert_eq!(spec.files.len(), 1);
    }
}
