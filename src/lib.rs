//! ledger-cli - Terminal-based double-entry bookkeeping
//!
//! This library provides the core of the ledger-cli application: a modal,
//! vim-style terminal interface over ledgers, accounts, journals and
//! balanced entries.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `logging`: File based tracing setup
//! - `models`: Core data models (ledgers, accounts, journals, entries)
//! - `storage`: JSON file storage layer
//! - `services`: Balance checks, entry commits and reconciliation
//! - `tui`: Key resolution, message routing and the views
//!
//! # Example
//!
//! ```rust,ignore
//! use ledger_cli::config::{paths::LedgerPaths, settings::Settings};
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;
pub mod tui;

pub use error::{LedgerError, LedgerResult};
