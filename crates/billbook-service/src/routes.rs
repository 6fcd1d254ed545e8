//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{auth, customers, dashboard, health, invoices, items};
use crate::state::AppState;

/// Maximum concurrent requests for the API subtree.
const API_MAX_CONCURRENT_REQUESTS: usize = 50;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
///
/// ## Auth
/// - `POST /api/v1/auth/verify-pin` - Verify the UI login PIN
///
/// ## Customers
/// - `POST /api/v1/customers` - Create customer
/// - `GET /api/v1/customers` - List active customers (newest first)
/// - `GET /api/v1/customers/:customer_id` - Get customer
/// - `PUT /api/v1/customers/:customer_id` - Update customer (partial)
/// - `DELETE /api/v1/customers/:customer_id` - Soft-delete customer
///
/// ## Items
/// - Same five operations under `/api/v1/items`
///
/// ## Invoices
/// - `GET /api/v1/invoices/preview-invoice-number` - Preview the next number
/// - `POST /api/v1/invoices` - Create invoice (atomic with the counter)
/// - `GET /api/v1/invoices` - List invoices (newest first)
/// - `GET /api/v1/invoices/:invoice_id` - Get invoice
/// - `PUT /api/v1/invoices/:invoice_id` - Replace invoice content
/// - `DELETE /api/v1/invoices/:invoice_id` - Hard-delete invoice
/// - `GET /api/v1/invoices/:invoice_id/pdf` - Render invoice PDF
///
/// ## Dashboard
/// - `GET /api/v1/dashboard/stats` - Aggregated counters and revenue
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    // Build CORS layer
    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    let api_routes = Router::new()
        // Auth
        .route("/auth/verify-pin", post(auth::verify_pin))
        // Customers
        .route(
            "/customers",
            post(customers::create_customer).get(customers::list_customers),
        )
        .route(
            "/customers/:customer_id",
            get(customers::get_customer)
                .put(customers::update_customer)
                .delete(customers::delete_customer),
        )
        // Items
        .route("/items", post(items::create_item).get(items::list_items))
        .route(
            "/items/:item_id",
            get(items::get_item)
                .put(items::update_item)
                .delete(items::delete_item),
        )
        // Invoices
        .route(
            "/invoices/preview-invoice-number",
            get(invoices::preview_invoice_number),
        )
        .route(
            "/invoices",
            post(invoices::create_invoice).get(invoices::list_invoices),
        )
        .route(
            "/invoices/:invoice_id",
            get(invoices::get_invoice)
                .put(invoices::update_invoice)
                .delete(invoices::delete_invoice),
        )
        .route("/invoices/:invoice_id/pdf", get(invoices::invoice_pdf))
        // Dashboard
        .route("/dashboard/stats", get(dashboard::stats))
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    Router::new()
        // Health (public, outside the API limit)
        .route("/health", get(health::health))
        // Versioned API routes
        .nest("/api/v1", api_routes)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
