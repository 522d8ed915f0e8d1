//! Integration tests for the bearer-token gate.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p eshop-api)
//! - A seeded admin user (cargo run -p eshop-cli -- admin create ...)
//!
//! Run with: cargo test -p eshop-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use eshop_integration_tests::{admin_token, api_url, client, register_and_login};

// ============================================================================
// Unauthenticated Access
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_public_reads_need_no_token() {
    let client = client();

    let resp = client
        .get(api_url("/categories"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(api_url("/products"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_mutation_without_token_is_unauthorized() {
    let client = client();

    let resp = client
        .post(api_url("/categories"))
        .json(&json!({ "name": "No Token" }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = resp.json().await.expect("body not JSON");
    assert_eq!(body["success"], false);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_garbage_token_is_unauthorized() {
    let client = client();

    let resp = client
        .post(api_url("/categories"))
        .bearer_auth("not.a.jwt")
        .json(&json!({ "name": "Bad Token" }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Roles
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_non_admin_cannot_mutate_catalog() {
    let client = client();
    let (_email, token) = register_and_login(&client).await;

    let resp = client
        .post(api_url("/categories"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Should Fail" }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_admin_token_allows_mutation() {
    let client = client();
    let token = admin_token(&client).await;

    let resp = client
        .post(api_url("/categories"))
        .bearer_auth(&token)
        .json(&json!({ "name": format!("Admin Gate {}", uuid::Uuid::new_v4()) }))
        .send()
        .await
        .expect("request failed");
    assert!(resp.status().is_success());
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_login_rejects_wrong_password() {
    let client = client();
    let (email, _token) = register_and_login(&client).await;

    let resp = client
        .post(api_url("/users/login"))
        .json(&json!({ "email": email, "password": "definitely-wrong" }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_register_never_grants_admin() {
    let client = client();
    let (_email, token) = register_and_login(&client).await;

    // A freshly registered user cannot read the user list.
    let resp = client
        .get(api_url("/users"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
