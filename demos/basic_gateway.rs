//! Basic example demonstrating gateway configuration and the three
//! response shapes.
//!
//! This example shows how to:
//! - Configure a gateway with a base URL and default headers
//! - Make a typed GET request
//! - Fetch an untyped JSON document with query parameters
//! - POST a JSON body built from a parameter map
//!
//! Run with: `cargo run --example basic_gateway`

use serde::Deserialize;
use serde_json::json;
use wicket::{Error, Gateway, RequestSpec};

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Post {
    #[serde(rename = "userId")]
    user_id: u32,
    id: u32,
    title: String,
    body: String,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("wicket=debug,basic_gateway=info")
        .init();

    // Configure the gateway once for the JSONPlaceholder API
    let gateway = Gateway::builder()
        .base_url("https://jsonplaceholder.typicode.com")
        .default_header("Accept", "application/json")
        .build();

    println!("=== Typed GET Request ===");
    let post: Post = gateway.get("/posts/1", Default::default()).await?;
    println!("Post ID: {}", post.id);
    println!("Title: {}", post.title);
    println!();

    println!("=== Untyped Document ===");
    let user = gateway
        .request_document(RequestSpec::get("/users/1"))
        .await?;
    println!("Keys: {:?}", user.keys().collect::<Vec<_>>());
    println!("Name: {:?}", user.get("name"));
    println!();

    println!("=== POST with a JSON Body ===");
    let created: Post = gateway
        .request_typed(
            RequestSpec::post("/posts")
                .with_param("title", json!("My New Post"))
                .with_param("body", json!("This is the content!"))
                .with_param("userId", json!(1)),
        )
        .await?;
    println!("Created post ID: {}", created.id);
    println!();

    println!("=== Runtime Reconfiguration ===");
    gateway.set_global_header("X-Request-Source", "basic-gateway-demo");
    println!("Defaults now: {:?}", gateway.default_headers());

    Ok(())
}
