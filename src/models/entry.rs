//! Entry and entry row models
//!
//! An entry is one bookkeeping transaction inside a journal. Its rows are
//! the signed postings against ledgers (and optionally accounts); the rows
//! of a persisted entry always sum to zero.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, EntryId, EntryRowId, JournalId, LedgerId};
use super::money::Money;

/// A bookkeeping entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier
    pub id: EntryId,

    /// The journal this entry is recorded in
    pub journal_id: JournalId,

    /// Free-form notes
    #[serde(default)]
    pub notes: String,
}

impl Entry {
    /// Create a new entry in a journal
    pub fn new(journal_id: JournalId, notes: impl Into<String>) -> Self {
        Self {
            id: EntryId::new(),
            journal_id,
            notes: notes.into(),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.notes.is_empty() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{} {}", self.id, self.notes)
        }
    }
}

/// One signed posting of an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRow {
    /// Unique identifier
    pub id: EntryRowId,

    /// The entry this row belongs to
    pub entry_id: EntryId,

    /// The ledger the value is posted to
    pub ledger_id: LedgerId,

    /// Optional counterparty account
    #[serde(default)]
    pub account_id: Option<AccountId>,

    /// Booking date
    pub date: NaiveDate,

    /// Row description
    #[serde(default)]
    pub description: String,

    /// Signed value in minor units (debit positive, credit negative)
    pub value: Money,

    /// Whether the row has been verified against an external record
    #[serde(default)]
    pub reconciled: bool,
}

impl EntryRow {
    /// Create a new, unreconciled row
    pub fn new(entry_id: EntryId, ledger_id: LedgerId, date: NaiveDate, value: Money) -> Self {
        Self {
            id: EntryRowId::new(),
            entry_id,
            ledger_id,
            account_id: None,
            date,
            description: String::new(),
            value,
            reconciled: false,
        }
    }

    /// Set the counterparty account
    pub fn with_account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_new_row_is_unreconciled() {
        let row = EntryRow::new(EntryId::new(), LedgerId::new(), date(), Money::from_cents(500));
        assert!(!row.reconciled);
        assert!(row.account_id.is_none());
        assert_eq!(row.value.cents(), 500);
    }

    #[test]
    fn test_builders() {
        let account = AccountId::new();
        let row = EntryRow::new(EntryId::new(), LedgerId::new(), date(), Money::zero())
            .with_account(account)
            .with_description("Invoice 12");
        assert_eq!(row.account_id, Some(account));
        assert_eq!(row.description, "Invoice 12");
    }

    #[test]
    fn test_row_serializes_value_as_minor_units() {
        let row = EntryRow::new(EntryId::new(), LedgerId::new(), date(), Money::from_cents(-1999));
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["value"], -1999);
        assert_eq!(json["date"], "2024-03-01");
    }

    #[test]
    fn test_entry_display() {
        let entry = Entry::new(JournalId::new(), "Rent March");
        assert!(format!("{}", entry).ends_with(" Rent March"));
    }
}
