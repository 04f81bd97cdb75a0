//! Account model
//!
//! An account is a counterparty (debtor or creditor) that entry rows may
//! optionally be booked against.

use super::ids::AccountId;
use super::kind::AccountType;
use super::reference::define_reference;

define_reference!(
    /// A debtor or creditor account
    Account,
    AccountId,
    AccountType,
    Account
);
