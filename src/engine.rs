//! The HTTP engine seam.
//!
//! The gateway never touches sockets, TLS or redirects. Everything past
//! building the final URL, headers and body is delegated to an [`Engine`]:
//! an opaque asynchronous collaborator that takes a request and resolves
//! with raw response bytes or a transport error. [`ReqwestEngine`] is the
//! production implementation; tests substitute their own.

use async_trait::async_trait;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use std::collections::HashMap;
use std::path::PathBuf;
use url::Url;

use crate::{Error, Result};

/// An asynchronous HTTP transport.
///
/// Implementations own connection establishment, TLS, timeouts and
/// redirects; the gateway treats them as `(url, method, headers, body) ->
/// bytes`. Errors are passed back to callers unchanged — the gateway
/// neither retries nor wraps them.
///
/// # Implementing the trait
///
/// ```
/// use async_trait::async_trait;
/// use http::Method;
/// use std::collections::HashMap;
/// use std::path::PathBuf;
/// use url::Url;
/// use wicket::{engine::Engine, Result};
///
/// struct CannedEngine;
///
/// #[async_trait]
/// impl Engine for CannedEngine {
///     async fn request(
///         &self,
///         _url: &Url,
///         _method: Method,
///         _headers: &HashMap<String, String>,
///         _body: Option<Vec<u8>>,
///     ) -> Result<Vec<u8>> {
///         Ok(br#"{"ok":true}"#.to_vec())
///     }
///
///     async fn upload_multipart(
///         &self,
///         _url: &Url,
///         _headers: &HashMap<String, String>,
///         _fields: &[(String, String)],
///         _files: &[(String, PathBuf)],
///     ) -> Result<Vec<u8>> {
///         Ok(br#"{"ok":true}"#.to_vec())
///     }
///
///     async fn upload_bytes(
///         &self,
///         _url: &Url,
///         _method: Method,
///         _headers: &HashMap<String, String>,
///         _body: Vec<u8>,
///     ) -> Result<Vec<u8>> {
///         Ok(br#"{"ok":true}"#.to_vec())
///     }
/// }
/// ```
#[async_trait]
pub trait Engine: Send + Sync {
    /// Issues a standard request with an optional pre-encoded JSON body,
    /// returning the raw response bytes.
    async fn request(
        &self,
        url: &Url,
        method: Method,
        headers: &HashMap<String, String>,
        body: Option<Vec<u8>>,
    ) -> Result<Vec<u8>>;

    /// Issues a multipart POST: named UTF-8 text parts plus files attached
    /// by path.
    async fn upload_multipart(
        &self,
        url: &Url,
        headers: &HashMap<String, String>,
        fields: &[(String, String)],
        files: &[(String, PathBuf)],
    ) -> Result<Vec<u8>>;

    /// Issues a non-multipart binary upload.
    async fn upload_bytes(
        &self,
        url: &Url,
        method: Method,
        headers: &HashMap<String, String>,
        body: Vec<u8>,
    ) -> Result<Vec<u8>>;
}

/// The production engine, backed by a [`reqwest::Client`] and its
/// connection pool.
#[derive(Debug, Clone, Default)]
pub struct ReqwestEngine {
    client: reqwest::Client,
}

impl ReqwestEngine {
    /// Creates an engine with default transport settings.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Wraps an already-configured `reqwest::Client`, keeping its pool,
    /// proxy and TLS settings.
    pub fn from_reqwest(client: reqwest::Client) -> Self {
        Self { client }
    }
}

/// Converts a string header map into the transport's typed form.
///
/// A name or value the transport cannot represent is a configuration
/// error, not a transport failure.
fn header_map(headers: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::try_from(name.as_str())
            .map_err(|e| Error::Configuration(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_str())
            .map_err(|e| Error::Configuration(format!("Invalid header value: {}", e)))?;
        map.insert(name, value);
    }
    Ok(map)
}

#[async_trait]
impl Engine for ReqwestEngine {
    async fn request(
        &self,
        url: &Url,
        method: Method,
        headers: &HashMap<String, String>,
        body: Option<Vec<u8>>,
    ) -> Result<Vec<u8>> {
        let headers = header_map(headers)?;

        tracing::debug!(method = %method, url = %url, "Executing HTTP request");

        let mut request = self.client.request(method, url.clone()).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;

        tracing::info!(
            status = response.status().as_u16(),
            url = %url,
            "Received HTTP response"
        );

        Ok(response.bytes().await?.to_vec())
    }

    async fn upload_multipart(
        &self,
        url: &Url,
        headers: &HashMap<String, String>,
        fields: &[(String, String)],
        files: &[(String, PathBuf)],
    ) -> Result<Vec<u8>> {
        // The form supplies its own Content-Type with the part boundary.
        let plain: HashMap<String, String> = headers
            .iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case("content-type"))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        let headers = header_map(&plain)?;

        let mut form = reqwest::multipart::Form::new();
        for (name, value) in fields {
            form = form.text(name.clone(), value.clone());
        }
        for (name, path) in files {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| Error::Engine(Box::new(e)))?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| name.clone());
            form = form.part(
                name.clone(),
                reqwest::multipart::Part::bytes(bytes).file_name(file_name),
            );
        }

        tracing::debug!(
            url = %url,
            fields = fields.len(),
            files = files.len(),
            "Executing multipart upload"
        );

        let response = self
            .client
            .post(url.clone())
            .headers(headers)
            .multipart(form)
            .send()
            .await?;

        tracing::info!(
            status = response.status().as_u16(),
            url = %url,
            "Received HTTP response"
        );

        Ok(response.bytes().await?.to_vec())
    }

    async fn upload_bytes(
        &self,
        url: &Url,
        method: Method,
        headers: &HashMap<String, String>,
        body: Vec<u8>,
    ) -> Result<Vec<u8>> {
        let headers = header_map(headers)?;

        tracing::debug!(
            method = %method,
            url = %url,
            bytes = body.len(),
            "Executing binary upload"
        );

        let response = self
            .client
            .request(method, url.clone())
            .headers(headers)
            .body(body)
            .send()
            .await?;

        tracing::info!(
            status = response.status().as_u16(),
            url = %url,
            "Received HTTP response"
        );

        Ok(response.bytes().await?.to_vec())
    }
}
