//! Shared gateway configuration.

use std::collections::HashMap;

use crate::params::sanitize_strings;

/// Header automatically present on a fresh configuration.
const CONTENT_TYPE_JSON: (&str, &str) = ("Content-Type", "application/json");

/// The configuration shared by every request a gateway dispatches: the
/// base URL relative targets are appended to, and the default headers sent
/// with every call unless overridden.
///
/// A fresh configuration carries `Content-Type: application/json`. The
/// base URL is stored as given — no well-formedness check happens here;
/// an invalid base URL surfaces later as a request-build failure.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    base_url: String,
    default_headers: HashMap<String, String>,
}

impl GatewayConfig {
    /// Creates a configuration with an empty base URL and the default
    /// `Content-Type: application/json` header.
    pub fn new() -> Self {
        let mut default_headers = HashMap::new();
        default_headers.insert(CONTENT_TYPE_JSON.0.to_string(), CONTENT_TYPE_JSON.1.to_string());
        Self {
            base_url: String::new(),
            default_headers,
        }
    }

    /// Replaces the base URL, and optionally the default headers.
    ///
    /// The base URL is replaced unconditionally. The default headers are
    /// replaced wholesale only when a non-empty map is supplied; `None` or
    /// an empty map leaves the existing defaults untouched.
    pub fn initialise(
        &mut self,
        base_url: impl Into<String>,
        default_headers: Option<HashMap<String, String>>,
    ) {
        self.base_url = base_url.into();
        if let Some(headers) = default_headers {
            if !headers.is_empty() {
                self.default_headers = sanitize_strings(&headers);
            }
        }
    }

    /// Sets a default header, then purges any header with an empty value.
    ///
    /// Setting a header to `""` therefore removes it: an empty value means
    /// "do not send".
    pub fn set_global_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.default_headers.insert(key.into(), value.into());
        self.default_headers = sanitize_strings(&self.default_headers);
    }

    /// Removes a default header. Removing an absent key is a no-op.
    pub fn remove_global_header(&mut self, key: &str) {
        self.default_headers.remove(key);
        self.default_headers = sanitize_strings(&self.default_headers);
    }

    /// The current base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The current default headers.
    pub fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_config_carries_json_content_type() {
        let config = GatewayConfig::new();
        assert_eq!(
            config.default_headers().get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn initialise_replaces_base_url_unconditionally() {
        let mut config = GatewayConfig::new();
        config.initialise("https://api.example.com", None);
        assert_eq!(config.base_url(), "https://api.example.com");

        config.initialise("https://other.example.com", None);
        assert_eq!(config.base_url(), "https://other.example.com");
    }

    #[test]
    fn initialise_keeps_defaults_unless_non_empty_map_supplied() {
        let mut config = GatewayConfig::new();

        config.initialise("https://api.example.com", Some(HashMap::new()));
        assert!(config.default_headers().contains_key("Content-Type"));

        let mut replacement = HashMap::new();
        replacement.insert("Authorization".to_string(), "Bearer token".to_string());
        config.initialise("https://api.example.com", Some(replacement));

        assert!(!config.default_headers().contains_key("Content-Type"));
        assert_eq!(
            config.default_headers().get("Authorization").map(String::as_str),
            Some("Bearer token")
        );
    }

    #[test]
    fn empty_valued_header_is_purged() {
        let mut config = GatewayConfig::new();
        config.set_global_header("X-Trace", "");
        assert!(!config.default_headers().contains_key("X-Trace"));
    }

    #[test]
    fn set_then_overwrite_global_header() {
        let mut config = GatewayConfig::new();
        config.set_global_header("Authorization", "Bearer a");
        config.set_global_header("Authorization", "Bearer b");
        assert_eq!(
            config.default_headers().get("Authorization").map(String::as_str),
            Some("Bearer b")
        );
    }

    #[test]
    fn remove_global_header_is_idempotent() {
        let mut config = GatewayConfig::new();
        config.set_global_header("X-Api-Key", "secret");

        config.remove_global_header("X-Api-Key");
        assert!(!config.default_headers().contains_key("X-Api-Key"));

        // Removing again, and removing a key that never existed, is a no-op.
        config.remove_global_header("X-Api-Key");
        config.remove_global_header("Never-Set");
    }
}
