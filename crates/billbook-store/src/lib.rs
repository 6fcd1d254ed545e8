//! `RocksDB` storage layer for billbook.
//!
//! This crate provides persistent storage for customers, items, invoices,
//! and the invoice-number counter, using `RocksDB` with one column family
//! per collection and CBOR-encoded document values.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `customers`: Customer records, keyed by `customer_id` (ULID)
//! - `items`: Catalog item records, keyed by `item_id` (ULID)
//! - `invoices`: Invoice records, keyed by `invoice_id` (ULID)
//! - `counter`: The singleton invoice-number counter
//! - `settings`: Deployment settings (login PIN)
//!
//! # Invoice numbering
//!
//! The database is opened as an `OptimisticTransactionDB`. Counter
//! allocation and invoice creation run as optimistic transactions: the
//! counter is read for update, advanced, and committed together with the
//! invoice document. A conflicting concurrent writer makes the commit fail
//! with a retryable error, which the store absorbs up to a fixed retry
//! budget. Either the counter advance and the invoice both commit, or
//! neither does.
//!
//! # Example
//!
//! ```no_run
//! use billbook_store::{RocksStore, Store};
//! use billbook_core::{Customer, FinancialYear};
//!
//! let store = RocksStore::open("/tmp/billbook-db").unwrap();
//!
//! let customer = Customer::new(
//!     "Acme Metals".into(),
//!     "accounts@acme.example".into(),
//!     None,
//!     None,
//!     None,
//!     None,
//! );
//! store.put_customer(&customer).unwrap();
//!
//! let fy = FinancialYear::current();
//! let allocated = store.allocate_invoice_number(fy).unwrap();
//! assert_eq!(allocated.sequence_number, 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use billbook_core::{
    Customer, CustomerId, FinancialYear, Invoice, InvoiceCounter, InvoiceDraft, InvoiceId, Item,
    ItemId,
};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations (e.g., `RocksDB`, in-memory for testing). Implementations
/// hold no mutable in-process state; they may be shared freely or
/// instantiated per request over the same database.
pub trait Store: Send + Sync {
    // =========================================================================
    // Customer Operations
    // =========================================================================

    /// Insert or replace a customer record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_customer(&self, customer: &Customer) -> Result<()>;

    /// Get a customer by ID, whether active or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_customer(&self, customer_id: &CustomerId) -> Result<Option<Customer>>;

    /// List active customers, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_customers(&self) -> Result<Vec<Customer>>;

    // =========================================================================
    // Item Operations
    // =========================================================================

    /// Insert or replace a catalog item record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_item(&self, item: &Item) -> Result<()>;

    /// Get an item by ID, whether active or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_item(&self, item_id: &ItemId) -> Result<Option<Item>>;

    /// List active items, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_items(&self) -> Result<Vec<Item>>;

    // =========================================================================
    // Invoice Operations
    // =========================================================================

    /// Get an invoice by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_invoice(&self, invoice_id: &InvoiceId) -> Result<Option<Invoice>>;

    /// List all invoices, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_invoices(&self) -> Result<Vec<Invoice>>;

    /// Replace an existing invoice document (full-content update).
    ///
    /// The counter is untouched.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the invoice doesn't exist.
    fn put_invoice(&self, invoice: &Invoice) -> Result<()>;

    /// Hard-delete an invoice.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the invoice doesn't exist.
    fn delete_invoice(&self, invoice_id: &InvoiceId) -> Result<()>;

    // =========================================================================
    // Counter / Allocation Operations
    // =========================================================================

    /// Read the counter without locking.
    ///
    /// `None` means no invoice has ever been allocated. Concurrent
    /// allocations may commit between this read and any later write; use it
    /// only for previews and dashboards, never as a reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_counter(&self) -> Result<Option<InvoiceCounter>>;

    /// Atomically allocate the next sequence number for `fy`.
    ///
    /// Creates the counter at 1 on first use, increments within the same
    /// financial year, resets to 1 on rollover. Returns the counter state
    /// as committed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Busy` if the transaction could not commit within
    /// the internal retry budget; nothing was written and the call is safe
    /// to retry.
    fn allocate_invoice_number(&self, fy: FinancialYear) -> Result<InvoiceCounter>;

    /// Allocate a sequence number and persist the invoice in one transaction.
    ///
    /// Either the counter advance and the invoice document both commit, or
    /// neither does. Returns the fully constructed invoice.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Busy` if the transaction could not commit within
    /// the internal retry budget; nothing was written and the call is safe
    /// to retry.
    fn create_invoice(&self, draft: &InvoiceDraft, fy: FinancialYear) -> Result<Invoice>;

    // =========================================================================
    // Settings Operations
    // =========================================================================

    /// Read the stored login PIN, if one has been configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_login_pin(&self) -> Result<Option<String>>;

    /// Store the login PIN.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn set_login_pin(&self, pin: &str) -> Result<()>;
}
