//! Core types and pure logic for billbook.
//!
//! This crate provides the foundational types used throughout the billbook
//! invoicing backend:
//!
//! - **Identifiers**: `CustomerId`, `ItemId`, `InvoiceId`
//! - **Records**: `Customer`, `Item`, `Invoice` and its embedded parts
//! - **Numbering**: `FinancialYear`, `InvoiceCounter`, `format_invoice_number`
//!
//! # Invoice Numbering
//!
//! Invoice numbers follow the pattern `INV/{YY}-{YY}/{NNNN}`, scoped to an
//! April 1 – March 31 financial year:
//!
//! - First invoice of FY 2025-2026 → `INV/25-26/0001`
//! - Counter resets to 1 on the first allocation after a year rollover
//!
//! Everything here is pure data and pure functions; persistence and
//! transactionality live in `billbook-store`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod customer;
pub mod ids;
pub mod invoice;
pub mod item;
pub mod numbering;

pub use customer::Customer;
pub use ids::{CustomerId, IdError, InvoiceId, ItemId};
pub use invoice::{Invoice, InvoiceDraft, InvoiceLine, InvoiceMeta, InvoiceParty, InvoiceTotals};
pub use item::Item;
pub use numbering::{format_invoice_number, FinancialYear, FinancialYearError, InvoiceCounter};
