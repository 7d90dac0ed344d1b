//! Error types for gateway calls.
//!
//! Failures are surfaced to the caller through the same channel as success
//! (the returned `Result`), tagged by what went wrong. Engine transport
//! errors pass through opaquely; decode failures preserve the raw response
//! body for debugging. Nothing at this layer is retried or recovered.

/// The main error type for gateway calls.
///
/// # Examples
///
/// ```no_run
/// use wicket::{Gateway, Error, RequestSpec};
///
/// # async fn example() -> Result<(), Error> {
/// let gateway = Gateway::builder()
///     .base_url("https://api.example.com")
///     .build();
///
/// match gateway.request_document(RequestSpec::get("/endpoint")).await {
///     Ok(document) => println!("Success: {:?}", document),
///     Err(Error::InvalidResponse { raw_response }) => {
///         eprintln!("Expected a JSON document, got: {}", raw_response);
///     }
///     Err(Error::Decode { raw_response, serde_error }) => {
///         eprintln!("Failed to decode. Raw response: {}", raw_response);
///         eprintln!("Serde error: {}", serde_error);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The HTTP engine failed to complete the request.
    ///
    /// Connection failures, DNS lookup failures, TLS problems and timeouts
    /// all end up here, passed through from the engine unchanged. The
    /// gateway never inspects or wraps these further.
    #[error("Engine error: {0}")]
    Engine(Box<dyn std::error::Error + Send + Sync>),

    /// The response parsed as JSON but the top-level value was not a
    /// key-value document.
    ///
    /// A JSON array or scalar where a document was required is not silently
    /// coerced; it is reported distinctly from a parse failure.
    #[error("Response is not a JSON document")]
    InvalidResponse {
        /// The raw response body as a string
        raw_response: String,
    },

    /// Failed to decode the response body into the expected shape.
    ///
    /// Preserves both the raw response text and the serde error message,
    /// making it easy to debug decode issues in production.
    #[error("Failed to decode response: {serde_error}")]
    Decode {
        /// The raw response body that failed to decode
        raw_response: String,
        /// The serde error message
        serde_error: String,
    },

    /// Failed to serialize the request body to JSON.
    #[error("Failed to serialize request: {0}")]
    Serialization(String),

    /// The final request URL could not be parsed.
    ///
    /// Base URLs are accepted without validation; a malformed one surfaces
    /// here when a request is built against it.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Invalid configuration, such as a header name or value the transport
    /// cannot represent.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An application-level error built by the caller.
    #[error("{message} (code {code})")]
    Custom {
        /// Human-readable description
        message: String,
        /// Application-defined code
        code: i64,
    },

    /// Fallback when an error is constructed without a message.
    #[error("Unknown error")]
    Unknown,
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Engine(Box::new(err))
    }
}

impl Error {
    /// Builds an application-level error from an optional message.
    ///
    /// With no message there is nothing to report, so this falls back to
    /// [`Error::Unknown`].
    ///
    /// # Examples
    ///
    /// ```
    /// use wicket::Error;
    ///
    /// let err = Error::custom(Some("user not found"), 404);
    /// assert_eq!(err.to_string(), "user not found (code 404)");
    ///
    /// let err = Error::custom(None, 404);
    /// assert!(matches!(err, Error::Unknown));
    /// ```
    pub fn custom(message: Option<&str>, code: i64) -> Self {
        match message {
            Some(message) => Error::Custom {
                message: message.to_string(),
                code,
            },
            None => Error::Unknown,
        }
    }

    /// Returns the raw response body if this error has one.
    ///
    /// Returns `Some(&str)` for [`Error::InvalidResponse`] and
    /// [`Error::Decode`], `None` for other error types.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::InvalidResponse { raw_response } => Some(raw_response),
            Error::Decode { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    /// Returns `true` if this error came from the HTTP engine.
    pub fn is_engine(&self) -> bool {
        matches!(self, Error::Engine(_))
    }
}

/// A specialized `Result` type for gateway calls.
///
/// This is a convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
