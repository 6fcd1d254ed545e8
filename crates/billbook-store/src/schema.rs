//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Customer records, keyed by `customer_id` (ULID).
    pub const CUSTOMERS: &str = "customers";

    /// Catalog item records, keyed by `item_id` (ULID).
    pub const ITEMS: &str = "items";

    /// Invoice records, keyed by `invoice_id` (ULID).
    pub const INVOICES: &str = "invoices";

    /// The invoice-number counter. Holds a single record under a fixed key.
    pub const COUNTER: &str = "counter";

    /// Deployment settings (login PIN), fixed keys.
    pub const SETTINGS: &str = "settings";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::CUSTOMERS,
        cf::ITEMS,
        cf::INVOICES,
        cf::COUNTER,
        cf::SETTINGS,
    ]
}
