//! Invoice handlers.
//!
//! The preview endpoint is a plain counter read: it never writes, and the
//! number it shows may be claimed by a concurrent creation before the
//! previewer submits. Creation drives the counter advance and the invoice
//! write through one store transaction.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use billbook_core::{format_invoice_number, FinancialYear, Invoice, InvoiceDraft, InvoiceId};
use billbook_store::Store;

use crate::error::ApiError;
use crate::pdf;
use crate::state::AppState;

/// Invoice number preview response.
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    /// Formatted number the next invoice would get.
    pub invoice_number: String,
    /// Current financial year.
    pub financial_year: FinancialYear,
    /// Sequence the next allocation would receive.
    pub sequence_number: u32,
}

/// Invoice listing response.
#[derive(Debug, Serialize)]
pub struct InvoicesResponse {
    /// All invoices, newest first.
    pub invoices: Vec<Invoice>,
}

/// Query parameters for the PDF endpoint.
#[derive(Debug, Deserialize)]
pub struct PdfQuery {
    /// Serve as an attachment instead of inline.
    #[serde(default)]
    pub download: bool,
}

/// Preview the next invoice number without consuming it.
///
/// Advisory only: concurrent creations can claim the previewed number first.
pub async fn preview_invoice_number(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PreviewResponse>, ApiError> {
    let fy = FinancialYear::current();
    let sequence_number = state
        .store
        .get_counter()?
        .map_or(1, |counter| counter.next_in(fy));

    let invoice_number = format_invoice_number(sequence_number, fy);

    tracing::debug!(%invoice_number, "Previewed next invoice number");

    Ok(Json(PreviewResponse {
        invoice_number,
        financial_year: fy,
        sequence_number,
    }))
}

/// Create a new invoice.
///
/// Allocates the next sequence number and persists the document in a single
/// store transaction; either both commit or neither does.
pub async fn create_invoice(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<InvoiceDraft>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate_draft(&draft)?;

    let fy = FinancialYear::current();
    let invoice = state.store.create_invoice(&draft, fy)?;

    tracing::info!(
        invoice_id = %invoice.id,
        invoice_number = %invoice.invoice_number,
        "Invoice created"
    );

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Invoice created successfully",
        "data": invoice,
    })))
}

/// List all invoices, newest first.
pub async fn list_invoices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<InvoicesResponse>, ApiError> {
    let invoices = state.store.list_invoices()?;
    Ok(Json(InvoicesResponse { invoices }))
}

/// Get an invoice by ID.
pub async fn get_invoice(
    State(state): State<Arc<AppState>>,
    Path(invoice_id): Path<InvoiceId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let invoice = state
        .store
        .get_invoice(&invoice_id)?
        .ok_or_else(|| ApiError::NotFound("Invoice not found".into()))?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": invoice,
    })))
}

/// Replace an invoice's content.
///
/// The id, invoice number, and creation timestamp are preserved; the counter
/// is untouched.
pub async fn update_invoice(
    State(state): State<Arc<AppState>>,
    Path(invoice_id): Path<InvoiceId>,
    Json(draft): Json<InvoiceDraft>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate_draft(&draft)?;

    let mut invoice = state
        .store
        .get_invoice(&invoice_id)?
        .ok_or_else(|| ApiError::NotFound("Invoice not found".into()))?;

    invoice.replace_content(draft);
    state.store.put_invoice(&invoice)?;

    tracing::info!(invoice_id = %invoice.id, "Invoice updated");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Invoice updated successfully",
        "data": invoice,
    })))
}

/// Hard-delete an invoice.
pub async fn delete_invoice(
    State(state): State<Arc<AppState>>,
    Path(invoice_id): Path<InvoiceId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.store.delete_invoice(&invoice_id)?;

    tracing::info!(%invoice_id, "Invoice deleted");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Invoice deleted successfully",
    })))
}

/// Render an invoice as a PDF.
pub async fn invoice_pdf(
    State(state): State<Arc<AppState>>,
    Path(invoice_id): Path<InvoiceId>,
    Query(query): Query<PdfQuery>,
) -> Result<Response, ApiError> {
    let invoice = state
        .store
        .get_invoice(&invoice_id)?
        .ok_or_else(|| ApiError::NotFound("Invoice not found".into()))?;

    let bytes = pdf::render(&invoice, &state.config.company)?;

    let filename = format!(
        "invoice_{}.pdf",
        invoice.invoice_number.replace('/', "-")
    );
    let disposition = if query.download { "attachment" } else { "inline" };

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("{disposition}; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Defensive check on incoming drafts; structural validation happens at the
/// serde boundary.
fn validate_draft(draft: &InvoiceDraft) -> Result<(), ApiError> {
    if draft.items.is_empty() {
        return Err(ApiError::BadRequest(
            "invoice must contain at least one line item".into(),
        ));
    }
    Ok(())
}
