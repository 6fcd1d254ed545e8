//! Financial years and invoice numbering.
//!
//! Invoice numbers are sequential within a financial year running April 1
//! through March 31. The last-allocated ordinal lives in a single
//! [`InvoiceCounter`] record; this module holds the pure rules for computing
//! the year, the next sequence, and the formatted number. The atomic
//! allocation itself is the store's job.

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An April 1 – March 31 financial year, e.g. `2025-2026`.
///
/// Stored and serialized in its `"YYYY-YYYY"` string form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FinancialYear {
    start_year: i32,
}

impl FinancialYear {
    /// The financial year covering the given calendar date.
    ///
    /// Dates in April or later belong to `{Y}-{Y+1}`; January through March
    /// belong to `{Y-1}-{Y}`.
    #[must_use]
    pub fn for_date(date: NaiveDate) -> Self {
        let start_year = if date.month() >= 4 {
            date.year()
        } else {
            date.year() - 1
        };
        Self { start_year }
    }

    /// The financial year covering the current date (UTC).
    #[must_use]
    pub fn current() -> Self {
        Self::for_date(Utc::now().date_naive())
    }

    /// The calendar year the period starts in.
    #[must_use]
    pub const fn start_year(&self) -> i32 {
        self.start_year
    }

    /// Short form used in invoice numbers: last two digits of each year,
    /// e.g. `"25-26"` for 2025-2026.
    #[must_use]
    pub fn short(&self) -> String {
        format!(
            "{:02}-{:02}",
            self.start_year.rem_euclid(100),
            (self.start_year + 1).rem_euclid(100)
        )
    }
}

impl fmt::Display for FinancialYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_year, self.start_year + 1)
    }
}

impl fmt::Debug for FinancialYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FinancialYear({self})")
    }
}

impl FromStr for FinancialYear {
    type Err = FinancialYearError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| FinancialYearError::Malformed(s.to_string()))?;
        let start: i32 = start
            .parse()
            .map_err(|_| FinancialYearError::Malformed(s.to_string()))?;
        let end: i32 = end
            .parse()
            .map_err(|_| FinancialYearError::Malformed(s.to_string()))?;
        if end != start + 1 {
            return Err(FinancialYearError::NonConsecutive { start, end });
        }
        Ok(Self { start_year: start })
    }
}

impl TryFrom<String> for FinancialYear {
    type Error = FinancialYearError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FinancialYear> for String {
    fn from(fy: FinancialYear) -> Self {
        fy.to_string()
    }
}

/// Errors that can occur when parsing a financial year string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FinancialYearError {
    /// Not of the form `"YYYY-YYYY"`.
    #[error("malformed financial year: {0:?}")]
    Malformed(String),

    /// The two years are not consecutive.
    #[error("financial year must span consecutive years, got {start}-{end}")]
    NonConsecutive {
        /// First year of the pair.
        start: i32,
        /// Second year of the pair.
        end: i32,
    },
}

/// Format an invoice number as `INV/{YY}-{YY}/{NNNN}`.
///
/// The sequence is zero-padded to four digits; sequences of 10000 and above
/// widen the field rather than truncate.
///
/// This string shape is a public contract: the PDF renderer, the dashboard,
/// and the UI all consume it.
#[must_use]
pub fn format_invoice_number(sequence: u32, fy: FinancialYear) -> String {
    format!("INV/{}/{:04}", fy.short(), sequence)
}

/// The singleton invoice counter record.
///
/// Tracks the last-allocated sequence number and the financial year it
/// belongs to. Only the store's allocation operations write it; previews and
/// the dashboard read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceCounter {
    /// Last-allocated ordinal within `financial_year`.
    pub sequence_number: u32,
    /// The financial year the counter is scoped to.
    pub financial_year: FinancialYear,
}

impl InvoiceCounter {
    /// A fresh counter holding the first allocation of a financial year.
    #[must_use]
    pub const fn first(fy: FinancialYear) -> Self {
        Self {
            sequence_number: 1,
            financial_year: fy,
        }
    }

    /// The sequence the next allocation in `fy` would receive.
    ///
    /// Same stored year → increment; a year rollover resets to 1.
    #[must_use]
    pub const fn next_in(&self, fy: FinancialYear) -> u32 {
        if self.financial_year.start_year == fy.start_year {
            self.sequence_number + 1
        } else {
            1
        }
    }

    /// Advance the counter for an allocation in `fy`, returning the
    /// allocated sequence.
    pub fn advance(&mut self, fy: FinancialYear) -> u32 {
        self.sequence_number = self.next_in(fy);
        self.financial_year = fy;
        self.sequence_number
    }
}
