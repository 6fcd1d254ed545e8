//! Key encoding utilities for `RocksDB`.
//!
//! Entity keys are the raw 16-byte ULID of the record id. ULIDs are
//! time-ordered, so iterating a column family yields records in creation
//! order.

use billbook_core::{CustomerId, InvoiceId, ItemId};

/// Create a customer key from a customer ID.
#[must_use]
pub fn customer_key(customer_id: &CustomerId) -> [u8; 16] {
    customer_id.to_bytes()
}

/// Create an item key from an item ID.
#[must_use]
pub fn item_key(item_id: &ItemId) -> [u8; 16] {
    item_id.to_bytes()
}

/// Create an invoice key from an invoice ID.
#[must_use]
pub fn invoice_key(invoice_id: &InvoiceId) -> [u8; 16] {
    invoice_id.to_bytes()
}

/// The fixed key of the singleton invoice counter.
#[must_use]
pub const fn counter_key() -> &'static [u8] {
    b"invoice"
}

/// The fixed key of the stored login PIN.
#[must_use]
pub const fn login_pin_key() -> &'static [u8] {
    b"login_pin"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_keys_are_16_bytes() {
        assert_eq!(customer_key(&CustomerId::generate()).len(), 16);
        assert_eq!(item_key(&ItemId::generate()).len(), 16);
        assert_eq!(invoice_key(&InvoiceId::generate()).len(), 16);
    }

    #[test]
    fn invoice_keys_sort_by_creation_time() {
        let first = InvoiceId::generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = InvoiceId::generate();
        assert!(invoice_key(&first) < invoice_key(&second));
    }
}
