//! Catalog item records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ItemId;

/// A billable catalog item.
///
/// Rate and GST percentage are kept in their display form; invoices snapshot
/// the numeric values per line at creation time, so the catalog never feeds
/// arithmetic directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Store-generated identifier.
    pub id: ItemId,

    /// Display name.
    pub name: String,

    /// HSN/SAC classification code.
    pub hsn_sac: String,

    /// Unit of measure (e.g. "NOS", "KG").
    pub uom: String,

    /// Unit rate as entered.
    pub rate: String,

    /// GST percentage as entered.
    pub gst_percentage: String,

    /// Free-form description.
    pub description: String,

    /// Soft-delete flag; inactive items are hidden from listings.
    pub is_active: bool,

    /// When the record was created. Set once.
    pub created_at: DateTime<Utc>,

    /// When the record was last updated; `None` until the first update.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Item {
    /// Create a new active item with a fresh id and creation timestamp.
    #[must_use]
    pub fn new(
        name: String,
        hsn_sac: String,
        uom: String,
        rate: String,
        gst_percentage: String,
        description: String,
    ) -> Self {
        Self {
            id: ItemId::generate(),
            name,
            hsn_sac,
            uom,
            rate,
            gst_percentage,
            description,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Soft-delete the item, stamping the update time.
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Some(Utc::now());
    }
}
