//! Customer management handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use billbook_core::{Customer, CustomerId};
use billbook_store::Store;

use crate::error::ApiError;
use crate::state::AppState;

/// Create customer request.
#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Billing address.
    pub address: Option<String>,
    /// GST identification number.
    pub gstin: Option<String>,
    /// PAN.
    #[serde(rename = "panNumber")]
    pub pan_number: Option<String>,
}

/// Update customer request; absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateCustomerRequest {
    /// Display name.
    pub name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Billing address.
    pub address: Option<String>,
    /// GST identification number.
    pub gstin: Option<String>,
    /// PAN.
    #[serde(rename = "panNumber")]
    pub pan_number: Option<String>,
}

/// Customer listing response.
#[derive(Debug, Serialize)]
pub struct CustomersResponse {
    /// Active customers, newest first.
    pub customers: Vec<Customer>,
}

/// Create a new customer.
pub async fn create_customer(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateCustomerRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let customer = Customer::new(
        body.name,
        body.email,
        body.phone,
        body.address,
        body.gstin,
        body.pan_number,
    );
    state.store.put_customer(&customer)?;

    tracing::info!(customer_id = %customer.id, "Customer created");

    Ok(Json(serde_json::json!({
        "success": true,
        "customer_id": customer.id,
    })))
}

/// List active customers, newest first.
pub async fn list_customers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CustomersResponse>, ApiError> {
    let customers = state.store.list_customers()?;
    Ok(Json(CustomersResponse { customers }))
}

/// Get a customer by ID.
pub async fn get_customer(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<CustomerId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let customer = state
        .store
        .get_customer(&customer_id)?
        .ok_or_else(|| ApiError::NotFound("Customer not found".into()))?;

    Ok(Json(serde_json::json!({ "customer": customer })))
}

/// Update a customer. Only the provided fields change.
pub async fn update_customer(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<CustomerId>,
    Json(body): Json<UpdateCustomerRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut customer = state
        .store
        .get_customer(&customer_id)?
        .ok_or_else(|| ApiError::NotFound("Customer not found".into()))?;

    if let Some(name) = body.name {
        customer.name = name;
    }
    if let Some(email) = body.email {
        customer.email = email;
    }
    if let Some(phone) = body.phone {
        customer.phone = Some(phone);
    }
    if let Some(address) = body.address {
        customer.address = Some(address);
    }
    if let Some(gstin) = body.gstin {
        customer.gstin = Some(gstin);
    }
    if let Some(pan_number) = body.pan_number {
        customer.pan_number = Some(pan_number);
    }
    customer.updated_at = Some(Utc::now());

    state.store.put_customer(&customer)?;

    tracing::info!(customer_id = %customer.id, "Customer updated");

    Ok(Json(serde_json::json!({ "success": true })))
}

/// Soft-delete a customer.
pub async fn delete_customer(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<CustomerId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut customer = state
        .store
        .get_customer(&customer_id)?
        .ok_or_else(|| ApiError::NotFound("Customer not found".into()))?;

    customer.deactivate();
    state.store.put_customer(&customer)?;

    tracing::info!(customer_id = %customer.id, "Customer deactivated");

    Ok(Json(serde_json::json!({ "success": true })))
}
