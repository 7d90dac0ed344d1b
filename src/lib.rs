//! # Wicket - a shared-configuration HTTP gateway
//!
//! Wicket is a thin, type-safe convenience layer over an HTTP engine. It
//! holds process-wide request configuration — a base URL and a set of
//! default headers — and dispatches individual requests with per-call
//! overrides, reshaping each response into one of three shapes: raw bytes,
//! an untyped JSON document, or a strongly-typed decoded value.
//!
//! ## Quick Start
//!
//! ```no_run
//! use serde::Deserialize;
//! use serde_json::json;
//! use wicket::{Gateway, RequestSpec};
//!
//! #[derive(Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), wicket::Error> {
//!     // Configure the gateway once
//!     let gateway = Gateway::builder()
//!         .base_url("https://api.example.com")
//!         .default_header("Authorization", "Bearer token")
//!         .build();
//!
//!     // Typed GET request
//!     let user: User = gateway.get("/users/123", Default::default()).await?;
//!     println!("User: {}", user.name);
//!
//!     // Untyped document with query parameters
//!     let spec = RequestSpec::get("/users")
//!         .with_param("page", json!(1))
//!         .with_param("active", json!(true));
//!     let page = gateway.request_document(spec).await?;
//!     println!("Response keys: {:?}", page.keys().collect::<Vec<_>>());
//!
//!     // POST with a JSON body built from a parameter map
//!     let created: User = gateway
//!         .request_typed(RequestSpec::post("/users").with_param("name", json!("Alice")))
//!         .await?;
//!     println!("Created user {}", created.id);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Shared configuration** - One base URL and default header set,
//!   safely shared across threads and mutable at runtime
//! - **Per-call overrides** - Custom headers merged over the defaults
//!   (per-call wins), or replacing them entirely
//! - **Three response shapes** - Raw bytes, untyped JSON documents, and
//!   typed decoding into your own structs
//! - **Parameter sanitization** - Opt-in filtering that drops empty-string
//!   values while keeping `0` and `false`
//! - **Multipart and binary uploads** - File attachments switch a request
//!   to multipart; raw byte uploads go through the same reshaping rules
//! - **Pluggable engine** - Network transmission is delegated to an
//!   [`engine::Engine`]; swap in your own for testing or a different
//!   transport
//! - **Structured logging** - Request/response logging with `tracing`
//!
//! Wicket deliberately does *not* retry, cache, pool beyond what the
//! engine provides, or time out requests — those concerns belong to the
//! engine. Every call is a single fire-and-forget request that resolves
//! exactly once.
//!
//! ## Error Handling
//!
//! Failures come back through the same `Result` channel as successes,
//! tagged by what went wrong, with raw response bodies preserved:
//!
//! ```no_run
//! use wicket::{Gateway, Error, RequestSpec};
//!
//! # async fn example() -> Result<(), Error> {
//! # let gateway = Gateway::builder().base_url("https://api.example.com").build();
//! match gateway.request_document(RequestSpec::get("/endpoint")).await {
//!     Ok(document) => println!("Success: {:?}", document),
//!     Err(Error::InvalidResponse { raw_response }) => {
//!         eprintln!("Not a JSON document: {}", raw_response);
//!     }
//!     Err(Error::Decode { raw_response, serde_error }) => {
//!         eprintln!("Decode failed: {}", serde_error);
//!         eprintln!("Raw response: {}", raw_response);
//!     }
//!     Err(Error::Engine(source)) => {
//!         eprintln!("Transport failure: {}", source);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

mod config;
pub mod engine;
mod error;
mod gateway;
pub mod params;
mod request;

pub use config::GatewayConfig;
pub use engine::{Engine, ReqwestEngine};
pub use error::{Error, Result};
pub use gateway::{Gateway, GatewayBuilder};
pub use params::{build_query_string, json_to_string, sanitize, Document, Params};
pub use request::{merge_headers, HeaderMode, RequestSpec, Target};
