//! Catalog item management handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use billbook_core::{Item, ItemId};
use billbook_store::Store;

use crate::error::ApiError;
use crate::state::AppState;

/// Create item request.
#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    /// Display name.
    pub name: String,
    /// HSN/SAC classification code.
    pub hsn_sac: String,
    /// Unit of measure.
    pub uom: String,
    /// Unit rate as entered.
    pub rate: String,
    /// GST percentage as entered.
    pub gst_percentage: String,
    /// Free-form description.
    pub description: String,
}

/// Update item request; absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    /// Display name.
    pub name: Option<String>,
    /// HSN/SAC classification code.
    pub hsn_sac: Option<String>,
    /// Unit of measure.
    pub uom: Option<String>,
    /// Unit rate as entered.
    pub rate: Option<String>,
    /// GST percentage as entered.
    pub gst_percentage: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
}

/// Item listing response.
#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    /// Active items, newest first.
    pub items: Vec<Item>,
}

/// Create a new catalog item.
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateItemRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let item = Item::new(
        body.name,
        body.hsn_sac,
        body.uom,
        body.rate,
        body.gst_percentage,
        body.description,
    );
    state.store.put_item(&item)?;

    tracing::info!(item_id = %item.id, "Item created");

    Ok(Json(serde_json::json!({
        "success": true,
        "item_id": item.id,
    })))
}

/// List active items, newest first.
pub async fn list_items(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ItemsResponse>, ApiError> {
    let items = state.store.list_items()?;
    Ok(Json(ItemsResponse { items }))
}

/// Get an item by ID.
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<ItemId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let item = state
        .store
        .get_item(&item_id)?
        .ok_or_else(|| ApiError::NotFound("Item not found".into()))?;

    Ok(Json(serde_json::json!({ "item": item })))
}

/// Update an item. Only the provided fields change.
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<ItemId>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut item = state
        .store
        .get_item(&item_id)?
        .ok_or_else(|| ApiError::NotFound("Item not found".into()))?;

    if let Some(name) = body.name {
        item.name = name;
    }
    if let Some(hsn_sac) = body.hsn_sac {
        item.hsn_sac = hsn_sac;
    }
    if let Some(uom) = body.uom {
        item.uom = uom;
    }
    if let Some(rate) = body.rate {
        item.rate = rate;
    }
    if let Some(gst_percentage) = body.gst_percentage {
        item.gst_percentage = gst_percentage;
    }
    if let Some(description) = body.description {
        item.description = description;
    }
    item.updated_at = Some(Utc::now());

    state.store.put_item(&item)?;

    tracing::info!(item_id = %item.id, "Item updated");

    Ok(Json(serde_json::json!({ "success": true })))
}

/// Soft-delete an item.
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<ItemId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut item = state
        .store
        .get_item(&item_id)?
        .ok_or_else(|| ApiError::NotFound("Item not found".into()))?;

    item.deactivate();
    state.store.put_item(&item)?;

    tracing::info!(item_id = %item.id, "Item deactivated");

    Ok(Json(serde_json::json!({ "success": true })))
}
