//! Integration tests for category CRUD.
//!
//! Run with: cargo test -p eshop-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use eshop_integration_tests::{admin_token, api_url, client, create_category};

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_category_crud_roundtrip() {
    let client = client();
    let token = admin_token(&client).await;

    let name = format!("Ceramics {}", uuid::Uuid::new_v4());
    let id = create_category(&client, &token, &name).await;

    // Read it back (public route).
    let resp = client
        .get(api_url(&format!("/categories/{id}")))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("body not JSON");
    assert_eq!(body["name"], name.as_str());
    assert_eq!(body["icon"], "mug-icon");

    // Partial update: only the color changes.
    let resp = client
        .put(api_url(&format!("/categories/{id}")))
        .bearer_auth(&token)
        .json(&json!({ "color": "#101010" }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("body not JSON");
    assert_eq!(body["color"], "#101010");
    assert_eq!(body["name"], name.as_str());

    // Delete answers {success, message}.
    let resp = client
        .delete(api_url(&format!("/categories/{id}")))
        .bearer_auth(&token)
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("body not JSON");
    assert_eq!(body["success"], true);

    // Gone afterwards.
    let resp = client
        .get(api_url(&format!("/categories/{id}")))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_update_missing_category_is_rejected() {
    let client = client();
    let token = admin_token(&client).await;

    let resp = client
        .put(api_url("/categories/999999"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Ghost" }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_delete_missing_category_is_not_found() {
    let client = client();
    let token = admin_token(&client).await;

    let resp = client
        .delete(api_url("/categories/999999"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
