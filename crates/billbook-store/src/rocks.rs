//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store`
//! trait, backed by an optimistic-transaction database so the counter
//! advance and the invoice write can commit as one unit.

use std::path::Path;
use std::sync::Arc;

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, ErrorKind, IteratorMode, MultiThreaded,
    OptimisticTransactionDB, Options, Transaction,
};

use billbook_core::{
    Customer, CustomerId, FinancialYear, Invoice, InvoiceCounter, InvoiceDraft, InvoiceId, Item,
    ItemId,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::Store;

/// How many times a counter transaction is retried on commit conflict
/// before the operation surfaces `StoreError::Busy`.
const ALLOCATION_RETRIES: usize = 16;

type Db = OptimisticTransactionDB<MultiThreaded>;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<Db>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = OptimisticTransactionDB::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Scan a column family newest-first, deserializing every value.
    ///
    /// Keys are 16-byte ULIDs, so reverse key order is reverse creation
    /// order.
    fn scan_reverse<T: serde::de::DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut records = Vec::new();

        for entry in self.db.iterator_cf(&cf, IteratorMode::End) {
            let (_, value) = entry.map_err(|e| StoreError::Database(e.to_string()))?;
            records.push(Self::deserialize(&value)?);
        }

        Ok(records)
    }

    /// Read-for-update the counter inside `txn`, advance it for `fy`, and
    /// stage the write. The caller commits.
    ///
    /// Missing counter bootstraps at 1; a stored financial year different
    /// from `fy` resets to 1 under `fy`.
    fn advance_counter(
        txn: &Transaction<'_, Db>,
        counter_cf: &Arc<BoundColumnFamily<'_>>,
        fy: FinancialYear,
    ) -> Result<InvoiceCounter> {
        let existing = txn
            .get_for_update_cf(counter_cf, keys::counter_key(), true)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let counter = match existing {
            None => InvoiceCounter::first(fy),
            Some(data) => {
                let mut counter: InvoiceCounter = Self::deserialize(&data)?;
                counter.advance(fy);
                counter
            }
        };

        txn.put_cf(counter_cf, keys::counter_key(), Self::serialize(&counter)?)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(counter)
    }

    /// Whether a commit error is a transient conflict worth retrying.
    fn is_conflict(err: &rocksdb::Error) -> bool {
        matches!(
            err.kind(),
            ErrorKind::Busy | ErrorKind::TryAgain | ErrorKind::TimedOut
        )
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Customer Operations
    // =========================================================================

    fn put_customer(&self, customer: &Customer) -> Result<()> {
        let cf = self.cf(cf::CUSTOMERS)?;
        let key = keys::customer_key(&customer.id);
        let value = Self::serialize(customer)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_customer(&self, customer_id: &CustomerId) -> Result<Option<Customer>> {
        let cf = self.cf(cf::CUSTOMERS)?;
        let key = keys::customer_key(customer_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn list_customers(&self) -> Result<Vec<Customer>> {
        let customers: Vec<Customer> = self.scan_reverse(cf::CUSTOMERS)?;
        Ok(customers.into_iter().filter(|c| c.is_active).collect())
    }

    // =========================================================================
    // Item Operations
    // =========================================================================

    fn put_item(&self, item: &Item) -> Result<()> {
        let cf = self.cf(cf::ITEMS)?;
        let key = keys::item_key(&item.id);
        let value = Self::serialize(item)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_item(&self, item_id: &ItemId) -> Result<Option<Item>> {
        let cf = self.cf(cf::ITEMS)?;
        let key = keys::item_key(item_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn list_items(&self) -> Result<Vec<Item>> {
        let items: Vec<Item> = self.scan_reverse(cf::ITEMS)?;
        Ok(items.into_iter().filter(|i| i.is_active).collect())
    }

    // =========================================================================
    // Invoice Operations
    // =========================================================================

    fn get_invoice(&self, invoice_id: &InvoiceId) -> Result<Option<Invoice>> {
        let cf = self.cf(cf::INVOICES)?;
        let key = keys::invoice_key(invoice_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn list_invoices(&self) -> Result<Vec<Invoice>> {
        self.scan_reverse(cf::INVOICES)
    }

    fn put_invoice(&self, invoice: &Invoice) -> Result<()> {
        if self.get_invoice(&invoice.id)?.is_none() {
            return Err(StoreError::NotFound {
                entity: "invoice",
                id: invoice.id.to_string(),
            });
        }

        let cf = self.cf(cf::INVOICES)?;
        let key = keys::invoice_key(&invoice.id);
        let value = Self::serialize(invoice)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn delete_invoice(&self, invoice_id: &InvoiceId) -> Result<()> {
        if self.get_invoice(invoice_id)?.is_none() {
            return Err(StoreError::NotFound {
                entity: "invoice",
                id: invoice_id.to_string(),
            });
        }

        let cf = self.cf(cf::INVOICES)?;
        self.db
            .delete_cf(&cf, keys::invoice_key(invoice_id))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    // =========================================================================
    // Counter / Allocation Operations
    // =========================================================================

    fn get_counter(&self) -> Result<Option<InvoiceCounter>> {
        let cf = self.cf(cf::COUNTER)?;

        self.db
            .get_cf(&cf, keys::counter_key())
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn allocate_invoice_number(&self, fy: FinancialYear) -> Result<InvoiceCounter> {
        let counter_cf = self.cf(cf::COUNTER)?;

        for attempt in 1..=ALLOCATION_RETRIES {
            let txn = self.db.transaction();
            let counter = Self::advance_counter(&txn, &counter_cf, fy)?;

            match txn.commit() {
                Ok(()) => return Ok(counter),
                Err(e) if Self::is_conflict(&e) => {
                    tracing::debug!(attempt, "counter commit conflicted, retrying");
                }
                Err(e) => return Err(StoreError::Database(e.to_string())),
            }
        }

        Err(StoreError::Busy {
            attempts: ALLOCATION_RETRIES,
        })
    }

    fn create_invoice(&self, draft: &InvoiceDraft, fy: FinancialYear) -> Result<Invoice> {
        let counter_cf = self.cf(cf::COUNTER)?;
        let invoices_cf = self.cf(cf::INVOICES)?;

        for attempt in 1..=ALLOCATION_RETRIES {
            let txn = self.db.transaction();
            let counter = Self::advance_counter(&txn, &counter_cf, fy)?;

            // Rebuilt per attempt: a retried transaction must not reuse the
            // id or timestamps staged by a failed commit.
            let invoice = Invoice::issue(draft.clone(), counter.sequence_number, fy);

            txn.put_cf(
                &invoices_cf,
                keys::invoice_key(&invoice.id),
                Self::serialize(&invoice)?,
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;

            match txn.commit() {
                Ok(()) => return Ok(invoice),
                Err(e) if Self::is_conflict(&e) => {
                    tracing::debug!(attempt, "invoice create conflicted, retrying");
                }
                Err(e) => return Err(StoreError::Database(e.to_string())),
            }
        }

        Err(StoreError::Busy {
            attempts: ALLOCATION_RETRIES,
        })
    }

    // =========================================================================
    // Settings Operations
    // =========================================================================

    fn get_login_pin(&self) -> Result<Option<String>> {
        let cf = self.cf(cf::SETTINGS)?;

        self.db
            .get_cf(&cf, keys::login_pin_key())
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn set_login_pin(&self, pin: &str) -> Result<()> {
        let cf = self.cf(cf::SETTINGS)?;
        let value = Self::serialize(&pin)?;

        self.db
            .put_cf(&cf, keys::login_pin_key(), value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billbook_core::{InvoiceLine, InvoiceParty, InvoiceTotals};
    use chrono::NaiveDate;
    use std::collections::BTreeSet;
    use std::str::FromStr;
    use tempfile::TempDir;

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn fy(s: &str) -> FinancialYear {
        FinancialYear::from_str(s).unwrap()
    }

    fn sample_customer(name: &str) -> Customer {
        Customer::new(
            name.into(),
            format!("{}@example.test", name.to_lowercase().replace(' ', ".")),
            Some("98400-00000".into()),
            Some("42 Foundry Road, Coimbatore".into()),
            Some("33AAAAA0000A1Z5".into()),
            None,
        )
    }

    fn sample_draft() -> InvoiceDraft {
        let party = InvoiceParty {
            id: CustomerId::generate(),
            name: "Acme Metals".into(),
            gstin: "33AAAAA0000A1Z5".into(),
            address: Some("42 Foundry Road".into()),
            email: None,
            pan_number: None,
            phone: None,
        };
        InvoiceDraft {
            invoice_date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
            po_number: Some("PO-118".into()),
            buyer: party.clone(),
            consignee: party,
            items: vec![InvoiceLine {
                item_id: ItemId::generate(),
                name: "Mild steel bracket".into(),
                hsn: "7308".into(),
                uom: "NOS".into(),
                quantity: 10.0,
                rate: 250.0,
                gst_percentage: 18.0,
                amount: 2500.0,
            }],
            totals: InvoiceTotals {
                subtotal: 2500.0,
                sgst: 225.0,
                cgst: 225.0,
                round_off: 0.0,
                rounded_total: 2950,
                total: 2950.0,
                amount_in_words: None,
            },
        }
    }

    #[test]
    fn customer_crud_and_soft_delete() {
        let (store, _dir) = create_test_store();

        let mut customer = sample_customer("Acme Metals");
        store.put_customer(&customer).unwrap();

        let retrieved = store.get_customer(&customer.id).unwrap().unwrap();
        assert_eq!(retrieved.name, "Acme Metals");
        assert!(retrieved.is_active);

        customer.deactivate();
        store.put_customer(&customer).unwrap();

        // Hidden from listings, still readable by id.
        assert!(store.list_customers().unwrap().is_empty());
        let retrieved = store.get_customer(&customer.id).unwrap().unwrap();
        assert!(!retrieved.is_active);
        assert!(retrieved.updated_at.is_some());
    }

    #[test]
    fn customer_listing_newest_first() {
        let (store, _dir) = create_test_store();

        let first = sample_customer("First Works");
        store.put_customer(&first).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(2));

        let second = sample_customer("Second Works");
        store.put_customer(&second).unwrap();

        let listed = store.list_customers().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "Second Works");
        assert_eq!(listed[1].name, "First Works");
    }

    #[test]
    fn item_crud_and_soft_delete() {
        let (store, _dir) = create_test_store();

        let mut item = Item::new(
            "Mild steel bracket".into(),
            "7308".into(),
            "NOS".into(),
            "250".into(),
            "18".into(),
            "Powder coated".into(),
        );
        store.put_item(&item).unwrap();

        let retrieved = store.get_item(&item.id).unwrap().unwrap();
        assert_eq!(retrieved.hsn_sac, "7308");

        item.deactivate();
        store.put_item(&item).unwrap();
        assert!(store.list_items().unwrap().is_empty());
        assert!(store.get_item(&item.id).unwrap().is_some());
    }

    #[test]
    fn first_allocation_bootstraps_counter() {
        let (store, _dir) = create_test_store();
        let year = fy("2025-2026");

        assert!(store.get_counter().unwrap().is_none());

        let allocated = store.allocate_invoice_number(year).unwrap();
        assert_eq!(allocated.sequence_number, 1);
        assert_eq!(allocated.financial_year, year);

        let stored = store.get_counter().unwrap().unwrap();
        assert_eq!(stored, allocated);
    }

    #[test]
    fn sequential_allocation_has_no_gaps() {
        let (store, _dir) = create_test_store();
        let year = fy("2025-2026");

        for expected in 1..=5 {
            let allocated = store.allocate_invoice_number(year).unwrap();
            assert_eq!(allocated.sequence_number, expected);
        }
    }

    #[test]
    fn rollover_resets_sequence() {
        let (store, _dir) = create_test_store();

        store.allocate_invoice_number(fy("2024-2025")).unwrap();
        store.allocate_invoice_number(fy("2024-2025")).unwrap();

        let allocated = store.allocate_invoice_number(fy("2025-2026")).unwrap();
        assert_eq!(allocated.sequence_number, 1);
        assert_eq!(allocated.financial_year, fy("2025-2026"));

        let next = store.allocate_invoice_number(fy("2025-2026")).unwrap();
        assert_eq!(next.sequence_number, 2);
    }

    #[test]
    fn counter_reads_do_not_interfere() {
        let (store, _dir) = create_test_store();
        let year = fy("2025-2026");

        store.allocate_invoice_number(year).unwrap();

        // Any number of plain reads must not advance anything.
        for _ in 0..10 {
            let counter = store.get_counter().unwrap().unwrap();
            assert_eq!(counter.sequence_number, 1);
            assert_eq!(counter.next_in(year), 2);
        }

        let allocated = store.allocate_invoice_number(year).unwrap();
        assert_eq!(allocated.sequence_number, 2);
    }

    #[test]
    fn concurrent_allocations_are_distinct_and_gapless() {
        let (store, _dir) = create_test_store();
        let store = Arc::new(store);
        let year = fy("2025-2026");

        const WRITERS: u32 = 16;

        let handles: Vec<_> = (0..WRITERS)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .allocate_invoice_number(year)
                        .unwrap()
                        .sequence_number
                })
            })
            .collect();

        let sequences: BTreeSet<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let expected: BTreeSet<u32> = (1..=WRITERS).collect();
        assert_eq!(sequences, expected);
    }

    #[test]
    fn create_invoice_persists_document_and_counter_together() {
        let (store, _dir) = create_test_store();
        let year = fy("2025-2026");

        let invoice = store.create_invoice(&sample_draft(), year).unwrap();
        assert_eq!(invoice.invoice_number, "INV/25-26/0001");
        assert!(invoice.meta.updated_at.is_none());

        let stored = store.get_invoice(&invoice.id).unwrap().unwrap();
        assert_eq!(stored.invoice_number, invoice.invoice_number);

        let counter = store.get_counter().unwrap().unwrap();
        assert_eq!(counter.sequence_number, 1);
    }

    #[test]
    fn concurrent_creates_leave_no_orphaned_numbers() {
        let (store, _dir) = create_test_store();
        let store = Arc::new(store);
        let year = fy("2025-2026");

        const WRITERS: u32 = 12;

        let handles: Vec<_> = (0..WRITERS)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.create_invoice(&sample_draft(), year).unwrap())
            })
            .collect();

        let numbers: BTreeSet<String> = handles
            .into_iter()
            .map(|h| h.join().unwrap().invoice_number)
            .collect();

        // Every allocated number corresponds to exactly one persisted
        // invoice, and the counter agrees with the invoice count.
        assert_eq!(numbers.len(), WRITERS as usize);
        let invoices = store.list_invoices().unwrap();
        assert_eq!(invoices.len(), WRITERS as usize);
        let counter = store.get_counter().unwrap().unwrap();
        assert_eq!(counter.sequence_number, WRITERS);

        let expected: BTreeSet<String> = (1..=WRITERS)
            .map(|seq| format!("INV/25-26/{seq:04}"))
            .collect();
        assert_eq!(numbers, expected);
    }

    #[test]
    fn invoice_update_and_delete() {
        let (store, _dir) = create_test_store();
        let year = fy("2025-2026");

        let mut invoice = store.create_invoice(&sample_draft(), year).unwrap();

        let mut draft = sample_draft();
        draft.po_number = Some("PO-119".into());
        invoice.replace_content(draft);
        store.put_invoice(&invoice).unwrap();

        let stored = store.get_invoice(&invoice.id).unwrap().unwrap();
        assert_eq!(stored.po_number.as_deref(), Some("PO-119"));
        assert!(stored.meta.updated_at.is_some());

        // Counter untouched by updates.
        assert_eq!(store.get_counter().unwrap().unwrap().sequence_number, 1);

        store.delete_invoice(&invoice.id).unwrap();
        assert!(store.get_invoice(&invoice.id).unwrap().is_none());
        assert!(matches!(
            store.delete_invoice(&invoice.id),
            Err(StoreError::NotFound { entity: "invoice", .. })
        ));
    }

    #[test]
    fn update_missing_invoice_fails() {
        let (store, _dir) = create_test_store();
        let year = fy("2025-2026");

        let invoice = Invoice::issue(sample_draft(), 1, year);
        assert!(matches!(
            store.put_invoice(&invoice),
            Err(StoreError::NotFound { entity: "invoice", .. })
        ));
    }

    #[test]
    fn login_pin_roundtrip() {
        let (store, _dir) = create_test_store();

        assert!(store.get_login_pin().unwrap().is_none());
        store.set_login_pin("4321").unwrap();
        assert_eq!(store.get_login_pin().unwrap().as_deref(), Some("4321"));
    }
}
