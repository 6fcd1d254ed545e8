//! Health endpoint integration test.

mod common;

use common::TestHarness;

#[tokio::test]
async fn health_check() {
    let harness = TestHarness::new();

    let response = harness.server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}
