//! Core data models for ledger-cli
//!
//! This module contains the bookkeeping domain: ledgers, accounts,
//! journals, entries and their rows, plus the money type they share.

pub mod account;
pub mod entry;
pub mod ids;
pub mod journal;
pub mod kind;
pub mod ledger;
pub mod money;
pub mod reference;

pub use account::Account;
pub use entry::{Entry, EntryRow};
pub use ids::{AccountId, EntryId, EntryRowId, JournalId, LedgerId, RecordId};
pub use journal::Journal;
pub use kind::{AccountType, JournalType, Kind, LedgerType, ModelKind};
pub use ledger::Ledger;
pub use money::{Money, MoneyParseError};
pub use reference::Reference;
