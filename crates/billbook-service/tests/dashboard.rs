//! Dashboard aggregation integration tests.

mod common;

use common::{invoice_payload, TestHarness};

#[tokio::test]
async fn stats_are_zero_on_fresh_store() {
    let harness = TestHarness::new();

    let response = harness.server.get("/api/v1/dashboard/stats").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["total_invoices"], 0);
    assert_eq!(body["data"]["total_customers"], 0);
    assert_eq!(body["data"]["total_items"], 0);
    assert_eq!(body["data"]["total_revenue"], 0.0);
}

#[tokio::test]
async fn stats_reflect_created_records() {
    let harness = TestHarness::new();

    let customer_id = harness.create_customer("Acme Metals").await;
    let item_id = harness.create_item("Mild steel bracket").await;
    harness.create_customer("Beta Forge").await;

    for _ in 0..2 {
        harness
            .server
            .post("/api/v1/invoices")
            .json(&invoice_payload(&customer_id, &item_id))
            .await
            .assert_status_ok();
    }

    let response = harness.server.get("/api/v1/dashboard/stats").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["total_invoices"], 2);
    assert_eq!(body["data"]["total_customers"], 2);
    assert_eq!(body["data"]["total_items"], 1);
    let revenue = body["data"]["total_revenue"].as_f64().unwrap();
    assert!((revenue - 5900.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn soft_deleted_records_drop_out_of_counts() {
    let harness = TestHarness::new();

    let customer_id = harness.create_customer("Acme Metals").await;
    harness
        .server
        .delete(&format!("/api/v1/customers/{customer_id}"))
        .await
        .assert_status_ok();

    let response = harness.server.get("/api/v1/dashboard/stats").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["total_customers"], 0);
}
