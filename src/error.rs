//! Custom error types for ledger-cli
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

use crate::models::Money;

/// The main error type for ledger-cli operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Entry rows do not sum to zero
    #[error("Entry is unbalanced by {discrepancy}")]
    Unbalanced { discrepancy: Money },

    /// Reconciled rows do not sum to zero
    #[error("Reconciled rows total {total}, expected zero")]
    UnbalancedReconciliation { total: Money },

    /// An operation needed a selected item and there was none
    #[error("No item selected")]
    NoSelection,

    /// Command line text matched no command
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// A persisted ordinal has no matching enum value
    #[error("Invalid {kind} ordinal: {value}")]
    InvalidOrdinal { kind: &'static str, value: u8 },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// TUI errors
    #[error("TUI error: {0}")]
    Tui(String),
}

impl LedgerError {
    /// Create a "not found" error for ledgers
    pub fn ledger_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Ledger",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for accounts
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for journals
    pub fn journal_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Journal",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for entries
    pub fn entry_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Entry",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Errors caused by user input rather than by the environment
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::Duplicate { .. }
                | Self::Unbalanced { .. }
                | Self::UnbalancedReconciliation { .. }
                | Self::NoSelection
                | Self::UnknownCommand(_)
        )
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for ledger-cli operations
pub type LedgerResult<T> = Result<T, LedgerError>;
