//! Example demonstrating comprehensive error handling.
//!
//! This example shows how to:
//! - Tell a wrong-shaped response apart from a parse failure
//! - Access raw response data on decode errors
//! - Handle transport failures passed through from the engine
//!
//! Run with: `cargo run --example error_handling`

use serde::Deserialize;
use wicket::{Error, Gateway, RequestSpec};

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Company {
    name: String,
    motto: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("wicket=info")
        .init();

    let gateway = Gateway::builder()
        .base_url("https://jsonplaceholder.typicode.com")
        .build();

    println!("=== Example 1: Wrong Response Shape ===");
    // /posts returns a JSON array; asking for a document fails distinctly.
    match gateway.request_document(RequestSpec::get("/posts")).await {
        Ok(document) => println!("Unexpected success: {} keys", document.len()),
        Err(Error::InvalidResponse { raw_response }) => {
            println!("Not a key-value document!");
            println!("  First bytes: {}", &raw_response[..raw_response.len().min(40)]);
        }
        Err(e) => println!("Other error: {}", e),
    }
    println!();

    println!("=== Example 2: Typed Decode Failure ===");
    // /users/1 is a document, but not a Company.
    match gateway.request_typed::<Company>(RequestSpec::get("/users/1")).await {
        Ok(company) => println!("Unexpected success: {:?}", company),
        Err(Error::Decode { raw_response, serde_error }) => {
            println!("Decode failed!");
            println!("  Serde error: {}", serde_error);
            println!("  Raw response length: {} bytes", raw_response.len());
        }
        Err(e) => println!("Other error: {}", e),
    }
    println!();

    println!("=== Example 3: Transport Failure ===");
    let unreachable = Gateway::builder()
        .base_url("https://definitely-not-a-real-host.invalid")
        .build();
    match unreachable.request_raw(RequestSpec::get("/ping")).await {
        Ok(bytes) => println!("Unexpected success: {} bytes", bytes.len()),
        Err(Error::Engine(source)) => {
            println!("Engine failure passed through: {}", source);
        }
        Err(e) => println!("Other error: {}", e),
    }
    println!();

    println!("=== Example 4: Application Errors ===");
    let err = Error::custom(Some("user not found"), 404);
    println!("Custom error: {}", err);
    let err = Error::custom(None, 0);
    println!("Messageless fallback: {}", err);

    Ok(())
}
