//! Invoice records.
//!
//! An invoice snapshot-embeds its buyer, consignee, and line items by value
//! at creation time. Later edits to a customer or catalog item never change
//! a past invoice.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::numbering::{format_invoice_number, FinancialYear};
use crate::{CustomerId, InvoiceId, ItemId};

/// A party on an invoice (buyer or consignee), captured by value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceParty {
    /// The customer record the snapshot was taken from.
    pub id: CustomerId,
    /// Name at invoicing time.
    pub name: String,
    /// GST identification number at invoicing time.
    pub gstin: String,
    /// Address, if captured.
    pub address: Option<String>,
    /// Email, if captured.
    pub email: Option<String>,
    /// PAN, if captured.
    #[serde(rename = "panNumber")]
    pub pan_number: Option<String>,
    /// Phone, if captured.
    pub phone: Option<String>,
}

/// A single invoice line, captured by value from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// The catalog item the snapshot was taken from.
    pub item_id: ItemId,
    /// Item name at invoicing time.
    pub name: String,
    /// HSN classification code.
    pub hsn: String,
    /// Unit of measure.
    pub uom: String,
    /// Billed quantity.
    pub quantity: f64,
    /// Unit rate.
    pub rate: f64,
    /// GST percentage applied to the line.
    pub gst_percentage: f64,
    /// Line amount as computed by the caller.
    pub amount: f64,
}

/// Invoice totals as computed and validated upstream.
///
/// The writer persists these as-is; it does not re-derive tax math.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Sum of line amounts before tax.
    pub subtotal: f64,
    /// State GST component.
    pub sgst: f64,
    /// Central GST component.
    pub cgst: f64,
    /// Rounding adjustment applied to reach `rounded_total`.
    pub round_off: f64,
    /// Grand total rounded to a whole amount.
    pub rounded_total: i64,
    /// Grand total before rounding.
    pub total: f64,
    /// Total spelled out, if the caller provided it.
    pub amount_in_words: Option<String>,
}

/// Creation/update metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceMeta {
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// `None` until the first update.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Invoice content as submitted by the caller, before a number is allocated.
///
/// This is the request-body shape for both creation and full-replace update;
/// structural validation happens at the serde boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDraft {
    /// Date the invoice is issued for.
    pub invoice_date: NaiveDate,
    /// Purchase-order reference, if any.
    pub po_number: Option<String>,
    /// Billed party.
    pub buyer: InvoiceParty,
    /// Receiving party.
    pub consignee: InvoiceParty,
    /// Ordered line items.
    pub items: Vec<InvoiceLine>,
    /// Caller-computed totals.
    pub totals: InvoiceTotals,
}

/// A persisted invoice.
///
/// Logically immutable after creation except for a full content replace;
/// the id, invoice number, and creation timestamp survive updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Store-generated identifier.
    pub id: InvoiceId,
    /// Formatted number, e.g. `INV/25-26/0007`.
    pub invoice_number: String,
    /// Date the invoice is issued for.
    pub invoice_date: NaiveDate,
    /// Purchase-order reference, if any.
    pub po_number: Option<String>,
    /// Billed party snapshot.
    pub buyer: InvoiceParty,
    /// Receiving party snapshot.
    pub consignee: InvoiceParty,
    /// Ordered line item snapshots.
    pub items: Vec<InvoiceLine>,
    /// Caller-computed totals.
    pub totals: InvoiceTotals,
    /// Creation/update metadata.
    pub meta: InvoiceMeta,
}

impl Invoice {
    /// Materialize a draft into a full invoice with an allocated sequence.
    ///
    /// Assigns a fresh id, formats the invoice number from the sequence and
    /// financial year, and stamps `created_at`.
    #[must_use]
    pub fn issue(draft: InvoiceDraft, sequence: u32, fy: FinancialYear) -> Self {
        Self {
            id: InvoiceId::generate(),
            invoice_number: format_invoice_number(sequence, fy),
            invoice_date: draft.invoice_date,
            po_number: draft.po_number,
            buyer: draft.buyer,
            consignee: draft.consignee,
            items: draft.items,
            totals: draft.totals,
            meta: InvoiceMeta {
                created_at: Utc::now(),
                updated_at: None,
            },
        }
    }

    /// Replace the invoice content with a new draft.
    ///
    /// Keeps the id, invoice number, and creation timestamp; stamps
    /// `updated_at`. The counter is not involved.
    pub fn replace_content(&mut self, draft: InvoiceDraft) {
        self.invoice_date = draft.invoice_date;
        self.po_number = draft.po_number;
        self.buyer = draft.buyer;
        self.consignee = draft.consignee;
        self.items = draft.items;
        self.totals = draft.totals;
        self.meta.updated_at = Some(Utc::now());
    }
}
