//! The gateway: shared configuration plus request dispatch.
//!
//! [`Gateway`] is the main entry point. It holds the shared configuration
//! (base URL, default headers) behind a lock, builds the final URL and
//! header set for each call, delegates transmission to an [`Engine`], and
//! reshapes the raw response bytes into the shape the caller asked for.

use http::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    config::GatewayConfig,
    engine::{Engine, ReqwestEngine},
    params::{build_query_string, encode_url, sanitize, stringify, Document, Params},
    request::{merge_headers, HeaderMode, RequestSpec, Target},
    Error, Result,
};

/// A network gateway with shared configuration and per-call overrides.
///
/// The gateway is designed to be created once and shared: cloning is cheap
/// (an `Arc` bump) and every clone sees the same configuration. Each
/// dispatch call is independent — it reads a configuration snapshot at
/// build time, fires exactly one request through the engine, and resolves
/// exactly once with a success payload or a failure. No retries, no
/// caching, no cancellation at this layer.
///
/// Three response shapes are available for every dispatch and upload
/// operation:
///
/// * raw bytes ([`request_raw`](Gateway::request_raw)),
/// * an untyped JSON document ([`request_document`](Gateway::request_document)),
/// * a strongly-typed decoded value ([`request_typed`](Gateway::request_typed)).
///
/// # Examples
///
/// ```no_run
/// use serde::Deserialize;
/// use serde_json::json;
/// use wicket::{Gateway, RequestSpec};
///
/// #[derive(Deserialize)]
/// struct User {
///     id: u64,
///     name: String,
/// }
///
/// # async fn example() -> Result<(), wicket::Error> {
/// let gateway = Gateway::builder()
///     .base_url("https://api.example.com")
///     .default_header("Authorization", "Bearer token")
///     .build();
///
/// // Typed convenience call
/// let user: User = gateway.get("/users/123", Default::default()).await?;
/// println!("User: {}", user.name);
///
/// // Untyped document with query parameters
/// let spec = RequestSpec::get("/users").with_param("page", json!(1));
/// let page = gateway.request_document(spec).await?;
/// println!("Keys: {:?}", page.keys().collect::<Vec<_>>());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<GatewayInner>,
}

struct GatewayInner {
    engine: Arc<dyn Engine>,
    config: RwLock<GatewayConfig>,
}

impl Gateway {
    /// Creates a new `GatewayBuilder` for configuring a gateway.
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::new()
    }

    /// Creates a gateway with an empty base URL, the default headers, and
    /// the production engine. Configure it later with
    /// [`initialise`](Gateway::initialise).
    pub fn new() -> Self {
        Self::builder().build()
    }

    // A poisoned lock still yields the data; configuration mutation can't
    // leave the map in a torn state.
    fn config_read(&self) -> RwLockReadGuard<'_, GatewayConfig> {
        self.inner.config.read().unwrap_or_else(|e| e.into_inner())
    }

    fn config_write(&self) -> RwLockWriteGuard<'_, GatewayConfig> {
        self.inner.config.write().unwrap_or_else(|e| e.into_inner())
    }

    // === Configuration ===

    /// Replaces the base URL, and the default headers when a non-empty map
    /// is supplied.
    ///
    /// The base URL is not validated here; a malformed one surfaces as
    /// [`Error::InvalidUrl`] when a request is built against it.
    pub fn initialise(
        &self,
        base_url: impl Into<String>,
        default_headers: Option<HashMap<String, String>>,
    ) {
        self.config_write().initialise(base_url, default_headers);
    }

    /// Sets a default header sent with every request.
    ///
    /// Setting a header to `""` removes it instead: empty-valued headers
    /// are never sent.
    pub fn set_global_header(&self, key: impl Into<String>, value: impl Into<String>) {
        self.config_write().set_global_header(key, value);
    }

    /// Removes a default header. Removing an absent key is a no-op.
    pub fn remove_global_header(&self, key: &str) {
        self.config_write().remove_global_header(key);
    }

    /// The current base URL, as a snapshot.
    pub fn base_url(&self) -> String {
        self.config_read().base_url().to_string()
    }

    /// The current default headers, as a snapshot.
    pub fn default_headers(&self) -> HashMap<String, String> {
        self.config_read().default_headers().clone()
    }

    // === Dispatch ===

    /// Dispatches a request and returns the raw response bytes unchanged.
    pub async fn request_raw(&self, spec: RequestSpec) -> Result<Vec<u8>> {
        self.perform(&spec).await
    }

    /// Dispatches a request and parses the response as an untyped JSON
    /// document.
    ///
    /// # Errors
    ///
    /// [`Error::Decode`] if the bytes are not valid JSON;
    /// [`Error::InvalidResponse`] if they parse to something other than a
    /// key-value document (an array or scalar is not coerced).
    pub async fn request_document(&self, spec: RequestSpec) -> Result<Document> {
        let bytes = self.perform(&spec).await?;
        document_from_bytes(&bytes)
    }

    /// Dispatches a request and decodes the response into `T`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use serde::Deserialize;
    /// use wicket::{Gateway, RequestSpec};
    ///
    /// #[derive(Deserialize)]
    /// struct Health { ok: bool }
    ///
    /// # async fn example() -> Result<(), wicket::Error> {
    /// let gateway = Gateway::builder()
    ///     .base_url("https://api.example.com")
    ///     .build();
    ///
    /// let health: Health = gateway.request_typed(RequestSpec::get("/health")).await?;
    /// assert!(health.ok);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn request_typed<T>(&self, spec: RequestSpec) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let bytes = self.perform(&spec).await?;
        typed_from_bytes(&bytes)
    }

    /// Typed GET to a path relative to the base URL.
    ///
    /// Parameters are serialized into the query string.
    pub async fn get<T>(&self, path: impl Into<String>, params: Params) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request_typed(RequestSpec::get(path).with_params(params))
            .await
    }

    /// Typed POST to a path relative to the base URL.
    ///
    /// Parameters are JSON-encoded into the request body.
    pub async fn post<T>(&self, path: impl Into<String>, params: Params) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request_typed(RequestSpec::post(path).with_params(params))
            .await
    }

    /// Typed request with an arbitrary method to a path relative to the
    /// base URL.
    pub async fn request<T>(
        &self,
        method: Method,
        path: impl Into<String>,
        params: Params,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request_typed(RequestSpec::new(method, Target::RelativeToBase(path.into())).with_params(params))
            .await
    }

    /// The single dispatch primitive. Resolves the final URL and header
    /// set, picks the wire shape (multipart, JSON body, or query string),
    /// and hands transmission to the engine. Engine failures propagate
    /// unchanged.
    async fn perform(&self, spec: &RequestSpec) -> Result<Vec<u8>> {
        let (base_url, default_headers) = {
            let config = self.config_read();
            (
                config.base_url().to_string(),
                config.default_headers().clone(),
            )
        };

        let headers = match spec.header_mode {
            HeaderMode::MergeDefaults => merge_headers(&default_headers, &spec.headers),
            HeaderMode::ReplaceDefaults => spec.headers.clone(),
        };

        let params = if spec.sanitize {
            sanitize(&spec.params)
        } else {
            spec.params.clone()
        };

        let target = match &spec.target {
            Target::RelativeToBase(path) => format!("{}{}", base_url, path),
            Target::Absolute(url) => url.clone(),
        };

        if !spec.files.is_empty() {
            let url = encode_url(&target)?;
            let fields: Vec<(String, String)> = params
                .iter()
                .map(|(key, value)| (key.clone(), stringify(value)))
                .collect();
            return self
                .inner
                .engine
                .upload_multipart(&url, &headers, &fields, &spec.files)
                .await;
        }

        if body_bearing(&spec.method) {
            let url = encode_url(&target)?;
            let body = serde_json::to_vec(&Value::Object(params))
                .map_err(|e| Error::Serialization(e.to_string()))?;
            self.inner
                .engine
                .request(&url, spec.method.clone(), &headers, Some(body))
                .await
        } else {
            let query = match &spec.raw_query {
                Some(raw) => raw.clone(),
                None => build_query_string(&params),
            };
            let full = if query.is_empty() {
                target
            } else {
                format!("{}?{}", target, query)
            };
            let url = encode_url(&full)?;
            self.inner
                .engine
                .request(&url, spec.method.clone(), &headers, None)
                .await
        }
    }

    // === Upload ===

    /// Issues a non-multipart binary upload to a complete URL, returning
    /// the raw response bytes.
    ///
    /// Per-call headers are merged over the defaults, or sent alone under
    /// [`HeaderMode::ReplaceDefaults`].
    pub async fn upload_raw(
        &self,
        url: &str,
        method: Method,
        data: Vec<u8>,
        headers: &HashMap<String, String>,
        mode: HeaderMode,
    ) -> Result<Vec<u8>> {
        let resolved = match mode {
            HeaderMode::MergeDefaults => merge_headers(&self.default_headers(), headers),
            HeaderMode::ReplaceDefaults => headers.clone(),
        };
        let url = url::Url::parse(url)?;
        self.inner
            .engine
            .upload_bytes(&url, method, &resolved, data)
            .await
    }

    /// Binary upload, response parsed as an untyped JSON document.
    pub async fn upload_document(
        &self,
        url: &str,
        method: Method,
        data: Vec<u8>,
        headers: &HashMap<String, String>,
        mode: HeaderMode,
    ) -> Result<Document> {
        let bytes = self.upload_raw(url, method, data, headers, mode).await?;
        document_from_bytes(&bytes)
    }

    /// Binary upload, response decoded into `T`.
    pub async fn upload_typed<T>(
        &self,
        url: &str,
        method: Method,
        data: Vec<u8>,
        headers: &HashMap<String, String>,
        mode: HeaderMode,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let bytes = self.upload_raw(url, method, data, headers, mode).await?;
        typed_from_bytes(&bytes)
    }
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new()
    }
}

/// GET and HEAD carry parameters in the query string; everything else gets
/// a JSON body.
fn body_bearing(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::HEAD)
}

/// Reshapes response bytes into an untyped key-value document.
fn document_from_bytes(bytes: &[u8]) -> Result<Document> {
    let raw = String::from_utf8_lossy(bytes).into_owned();
    let value: Value = serde_json::from_str(&raw).map_err(|e| {
        tracing::error!(error = %e, raw_response = %raw, "Failed to parse response");
        Error::Decode {
            raw_response: raw.clone(),
            serde_error: e.to_string(),
        }
    })?;
    match value {
        Value::Object(map) => Ok(map),
        other => {
            tracing::error!(
                shape = %json_shape(&other),
                raw_response = %raw,
                "Response is not a JSON document"
            );
            Err(Error::InvalidResponse { raw_response: raw })
        }
    }
}

/// Reshapes response bytes into a caller-specified type.
fn typed_from_bytes<T>(bytes: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(bytes).map_err(|e| {
        let raw = String::from_utf8_lossy(bytes).into_owned();
        tracing::error!(error = %e, raw_response = %raw, "Failed to decode response");
        Error::Decode {
            raw_response: raw,
            serde_error: e.to_string(),
        }
    })
}

fn json_shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Builder for configuring and creating a [`Gateway`].
///
/// # Examples
///
/// ```
/// use wicket::GatewayBuilder;
///
/// let gateway = GatewayBuilder::new()
///     .base_url("https://api.example.com")
///     .default_header("User-Agent", "my-app/1.0")
///     .build();
///
/// assert_eq!(gateway.base_url(), "https://api.example.com");
/// ```
pub struct GatewayBuilder {
    config: GatewayConfig,
    engine: Option<Arc<dyn Engine>>,
}

impl GatewayBuilder {
    /// Creates a builder with an empty base URL and the default
    /// `Content-Type: application/json` header.
    pub fn new() -> Self {
        Self {
            config: GatewayConfig::new(),
            engine: None,
        }
    }

    /// Sets the base URL for relative targets. Not validated; a malformed
    /// URL surfaces when a request is built against it.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.initialise(url, None);
        self
    }

    /// Adds a default header sent with every request. An empty value
    /// removes the header instead.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.set_global_header(name, value);
        self
    }

    /// Substitutes a custom engine. Defaults to [`ReqwestEngine`].
    pub fn engine(mut self, engine: Arc<dyn Engine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Builds the configured `Gateway`.
    pub fn build(self) -> Gateway {
        Gateway {
            inner: Arc::new(GatewayInner {
                engine: self
                    .engine
                    .unwrap_or_else(|| Arc::new(ReqwestEngine::new())),
                config: RwLock::new(self.config),
            }),
        }
    }
}

impl Default for GatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}
