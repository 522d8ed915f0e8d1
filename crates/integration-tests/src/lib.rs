//! Integration tests for the eShop backend.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p eshop-cli -- migrate
//!
//! # Seed an admin user for the admin-gated flows
//! cargo run -p eshop-cli -- admin create \
//!     -e admin@integration.test -n "Integration Admin" -p <password>
//!
//! # Start the API, then run the ignored tests
//! cargo test -p eshop-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `ESHOP_API_BASE_URL` - Base URL of the running API
//!   (default: `http://localhost:3000`)
//! - `ESHOP_TEST_ADMIN_EMAIL` / `ESHOP_TEST_ADMIN_PASSWORD` - Credentials
//!   of the seeded admin user

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used)] // test helpers

use reqwest::Client;
use serde_json::{Value, json};

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("ESHOP_API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Resource URL under the default API prefix.
#[must_use]
pub fn api_url(path: &str) -> String {
    format!("{}/api/v1{path}", base_url())
}

/// Build a plain HTTP client.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder().build().expect("Failed to create HTTP client")
}

/// Log in as the seeded admin user and return a bearer token.
///
/// # Panics
///
/// Panics if the login request fails - run the CLI seed step first.
pub async fn admin_token(client: &Client) -> String {
    let email = std::env::var("ESHOP_TEST_ADMIN_EMAIL")
        .unwrap_or_else(|_| "admin@integration.test".to_string());
    let password = std::env::var("ESHOP_TEST_ADMIN_PASSWORD")
        .unwrap_or_else(|_| "integration-admin-pw".to_string());

    let resp = client
        .post(api_url("/users/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("login request failed");
    assert!(
        resp.status().is_success(),
        "admin login failed - seed the admin user via eshop-cli first"
    );

    let body: Value = resp.json().await.expect("login response not JSON");
    body["token"].as_str().expect("token missing").to_string()
}

/// Register a throwaway user and return `(email, token)`.
///
/// # Panics
///
/// Panics if registration or login fails.
pub async fn register_and_login(client: &Client) -> (String, String) {
    let email = format!("user-{}@integration.test", uuid::Uuid::new_v4());
    let password = "integration-user-pw";

    let resp = client
        .post(api_url("/users/register"))
        .json(&json!({
            "name": "Integration User",
            "email": email,
            "password": password,
        }))
        .send()
        .await
        .expect("register request failed");
    assert!(resp.status().is_success(), "registration failed");

    let resp = client
        .post(api_url("/users/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("login request failed");
    assert!(resp.status().is_success(), "login failed");

    let body: Value = resp.json().await.expect("login response not JSON");
    let token = body["token"].as_str().expect("token missing").to_string();

    (email, token)
}

/// Create a category via the API and return its id.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn create_category(client: &Client, token: &str, name: &str) -> i64 {
    let resp = client
        .post(api_url("/categories"))
        .bearer_auth(token)
        .json(&json!({ "name": name, "icon": "mug-icon", "color": "#55879a" }))
        .send()
        .await
        .expect("create category request failed");
    assert!(resp.status().is_success(), "category creation failed");

    let body: Value = resp.json().await.expect("category response not JSON");
    body["id"].as_i64().expect("category id missing")
}

/// A 1x1 PNG, enough to satisfy the upload path end to end.
#[must_use]
pub fn tiny_png() -> Vec<u8> {
    // PNG signature + minimal IHDR/IDAT/IEND chunks.
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48,
        0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00,
        0x00, 0x1F, 0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78,
        0x9C, 0x62, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00,
        0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ]
}

/// Create a product with an uploaded image and return its id.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn create_product(
    client: &Client,
    token: &str,
    category_id: i64,
    name: &str,
    price: &str,
) -> i64 {
    let form = reqwest::multipart::Form::new()
        .text("name", name.to_string())
        .text("description", format!("{name} description"))
        .text("price", price.to_string())
        .text("category", category_id.to_string())
        .text("countInStock", "10")
        .part(
            "image",
            reqwest::multipart::Part::bytes(tiny_png())
                .file_name("product photo.png")
                .mime_str("image/png")
                .expect("valid mime"),
        );

    let resp = client
        .post(api_url("/products"))
        .bearer_auth(token)
        .multipart(form)
        .send()
        .await
        .expect("create product request failed");
    assert!(resp.status().is_success(), "product creation failed");

    let body: Value = resp.json().await.expect("product response not JSON");
    body["id"].as_i64().expect("product id missing")
}
