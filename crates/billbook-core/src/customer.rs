//! Customer records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CustomerId;

/// A customer of the organization.
///
/// Customers are soft-deleted: `is_active` is flipped to `false` instead of
/// removing the record, so invoices that snapshot the customer keep a
/// resolvable id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Store-generated identifier.
    pub id: CustomerId,

    /// Display name.
    pub name: String,

    /// Contact email.
    pub email: String,

    /// Contact phone, if known.
    pub phone: Option<String>,

    /// Billing address, if known.
    pub address: Option<String>,

    /// GST identification number.
    pub gstin: Option<String>,

    /// PAN, if provided.
    #[serde(rename = "panNumber")]
    pub pan_number: Option<String>,

    /// Soft-delete flag; inactive customers are hidden from listings.
    pub is_active: bool,

    /// When the record was created. Set once.
    pub created_at: DateTime<Utc>,

    /// When the record was last updated; `None` until the first update.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Customer {
    /// Create a new active customer with a fresh id and creation timestamp.
    #[must_use]
    pub fn new(
        name: String,
        email: String,
        phone: Option<String>,
        address: Option<String>,
        gstin: Option<String>,
        pan_number: Option<String>,
    ) -> Self {
        Self {
            id: CustomerId::generate(),
            name,
            email,
            phone,
            address,
            gstin,
            pan_number,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Soft-delete the customer, stamping the update time.
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Some(Utc::now());
    }
}
