//! Ledger model
//!
//! A ledger classifies where a monetary movement is recorded (income,
//! expense, asset, liability or equity).

use super::ids::LedgerId;
use super::kind::LedgerType;
use super::reference::define_reference;

define_reference!(
    /// A ledger
    Ledger,
    LedgerId,
    LedgerType,
    Ledger
);
