//! Login PIN integration tests.

mod common;

use common::{TestHarness, TEST_PIN};
use serde_json::json;

#[tokio::test]
async fn correct_pin_verifies() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/v1/auth/verify-pin")
        .json(&json!({ "pin": TEST_PIN }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "PIN verified successfully");
}

#[tokio::test]
async fn wrong_pin_is_unauthorized() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/v1/auth/verify-pin")
        .json(&json!({ "pin": "0000" }))
        .await;

    response.assert_status_unauthorized();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn unconfigured_pin_is_server_error() {
    let harness = TestHarness::without_pin();

    let response = harness
        .server
        .post("/api/v1/auth/verify-pin")
        .json(&json!({ "pin": TEST_PIN }))
        .await;

    assert!(response.status_code().is_server_error());
}
