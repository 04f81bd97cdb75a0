//! Service layer for ledger-cli
//!
//! The service layer provides business logic on top of the storage layer:
//! validation, the double-entry balance rule and staged reconciliation.

pub mod balance;
pub mod entry;
pub mod reconciliation;
pub mod reference;

pub use balance::{balancing_value, sum_values, total, validate_balance};
pub use entry::EntryService;
pub use reconciliation::{persist_reconciled, ReconciliationSession};
pub use reference::{InUse, ReferenceService};
