//! Login PIN verification.
//!
//! The UI gates itself behind a single shared PIN kept in the store's
//! settings. This is a convenience lock for a single-organization
//! deployment, not an identity system.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use billbook_store::Store;

use crate::error::ApiError;
use crate::state::AppState;

/// PIN verification request.
#[derive(Debug, Deserialize)]
pub struct VerifyPinRequest {
    /// The PIN entered in the UI.
    pub pin: String,
}

/// Verify the login PIN against the stored one.
pub async fn verify_pin(
    State(state): State<Arc<AppState>>,
    Json(body): Json<VerifyPinRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let saved_pin = state
        .store
        .get_login_pin()?
        .ok_or_else(|| ApiError::Internal("login PIN not configured".into()))?;

    if body.pin != saved_pin {
        return Err(ApiError::Unauthorized);
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "PIN verified successfully",
    })))
}
