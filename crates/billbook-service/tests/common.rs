//! Common test utilities for billbook integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use tempfile::TempDir;

use billbook_service::{create_router, AppState, CompanyProfile, ServiceConfig};
use billbook_store::{RocksStore, Store};

/// The PIN seeded into every default harness.
pub const TEST_PIN: &str = "4321";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// The store behind the server, for direct inspection.
    pub store: Arc<RocksStore>,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
}

impl TestHarness {
    /// Create a new test harness with a fresh database and a seeded PIN.
    pub fn new() -> Self {
        let harness = Self::without_pin();
        harness.store.set_login_pin(TEST_PIN).expect("seed PIN");
        harness
    }

    /// Create a harness whose store has no PIN configured.
    pub fn without_pin() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = Arc::new(RocksStore::open(temp_dir.path()).expect("Failed to open store"));

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            login_pin: None,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
            company: CompanyProfile {
                name: "Acme Engineering".into(),
                address: "42 Foundry Road, Coimbatore".into(),
                gstin: "33AAAAA0000A1Z5".into(),
                state: "Tamil Nadu".into(),
                state_code: "33".into(),
            },
        };

        let state = AppState::new(Arc::clone(&store), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            store,
            _temp_dir: temp_dir,
        }
    }

    /// Create a customer through the API and return its id.
    pub async fn create_customer(&self, name: &str) -> String {
        let response = self
            .server
            .post("/api/v1/customers")
            .json(&serde_json::json!({
                "name": name,
                "email": format!("{}@example.test", name.to_lowercase().replace(' ', ".")),
                "phone": "98400-00000",
                "address": "42 Foundry Road, Coimbatore",
                "gstin": "33AAAAA0000A1Z5",
            }))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        body["customer_id"].as_str().expect("customer_id").to_string()
    }

    /// Create a catalog item through the API and return its id.
    pub async fn create_item(&self, name: &str) -> String {
        let response = self
            .server
            .post("/api/v1/items")
            .json(&serde_json::json!({
                "name": name,
                "hsn_sac": "7308",
                "uom": "NOS",
                "rate": "250",
                "gst_percentage": "18",
                "description": "Powder coated",
            }))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        body["item_id"].as_str().expect("item_id").to_string()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// A complete invoice request body referencing the given customer and item.
pub fn invoice_payload(customer_id: &str, item_id: &str) -> serde_json::Value {
    serde_json::json!({
        "invoice_date": "2025-06-15",
        "po_number": "PO-118",
        "buyer": {
            "id": customer_id,
            "name": "Acme Metals",
            "gstin": "33AAAAA0000A1Z5",
            "address": "42 Foundry Road, Coimbatore",
        },
        "consignee": {
            "id": customer_id,
            "name": "Acme Metals",
            "gstin": "33AAAAA0000A1Z5",
        },
        "items": [
            {
                "item_id": item_id,
                "name": "Mild steel bracket",
                "hsn": "7308",
                "uom": "NOS",
                "quantity": 10.0,
                "rate": 250.0,
                "gst_percentage": 18.0,
                "amount": 2500.0,
            }
        ],
        "totals": {
            "subtotal": 2500.0,
            "sgst": 225.0,
            "cgst": 225.0,
            "round_off": 0.0,
            "rounded_total": 2950,
            "total": 2950.0,
            "amount_in_words": "Rupees Two Thousand Nine Hundred Fifty Only",
        },
    })
}
