//! Dashboard aggregation handler.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use billbook_store::Store;

use crate::error::ApiError;
use crate::state::AppState;

/// Dashboard counters for invoices, customers, and items.
///
/// `total_invoices` reads the invoice counter, so it reflects the sequence
/// within the current financial year.
pub async fn stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let total_invoices = state
        .store
        .get_counter()?
        .map_or(0, |counter| counter.sequence_number);

    let total_customers = state.store.list_customers()?.len();
    let total_items = state.store.list_items()?.len();

    let total_revenue: f64 = state
        .store
        .list_invoices()?
        .iter()
        .map(|invoice| invoice.totals.total)
        .sum();

    Ok(Json(serde_json::json!({
        "success": true,
        "data": {
            "total_invoices": total_invoices,
            "total_customers": total_customers,
            "total_items": total_items,
            "total_revenue": total_revenue,
        },
    })))
}
