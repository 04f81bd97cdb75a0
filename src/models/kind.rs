//! Closed enumerations persisted as small integer ordinals
//!
//! Every kind has a fixed, explicit ordinal mapping. Serde goes through the
//! ordinal, so what is stored on disk is the integer, and loading an ordinal
//! outside the mapping fails instead of guessing.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LedgerError;

/// A closed enumeration with a stable ordinal encoding
pub trait Kind: Copy + Eq + fmt::Display + 'static {
    /// Human readable name of the enumeration, used in errors
    const NAME: &'static str;

    /// All variants in ordinal order
    fn all() -> &'static [Self];

    /// The persisted ordinal
    fn ordinal(self) -> u8;

    /// Decode a persisted ordinal
    fn from_ordinal(value: u8) -> Result<Self, LedgerError>;

    /// The following variant, wrapping around
    fn next(self) -> Self {
        let all = Self::all();
        let index = all.iter().position(|k| *k == self).unwrap_or(0);
        all[(index + 1) % all.len()]
    }

    /// The preceding variant, wrapping around
    fn prev(self) -> Self {
        let all = Self::all();
        let index = all.iter().position(|k| *k == self).unwrap_or(0);
        all[(index + all.len() - 1) % all.len()]
    }
}

/// Macro to generate ordinal-encoded kind enums
macro_rules! define_kind {
    ($name:ident, $kind_name:literal, { $($variant:ident = $ordinal:literal => $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "u8", try_from = "u8")]
        pub enum $name {
            $($variant),+
        }

        impl Kind for $name {
            const NAME: &'static str = $kind_name;

            fn all() -> &'static [Self] {
                &[$(Self::$variant),+]
            }

            fn ordinal(self) -> u8 {
                match self {
                    $(Self::$variant => $ordinal),+
                }
            }

            fn from_ordinal(value: u8) -> Result<Self, LedgerError> {
                match value {
                    $($ordinal => Ok(Self::$variant),)+
                    _ => Err(LedgerError::InvalidOrdinal {
                        kind: $kind_name,
                        value,
                    }),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(kind: $name) -> u8 {
                kind.ordinal()
            }
        }

        impl TryFrom<u8> for $name {
            type Error = LedgerError;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                Self::from_ordinal(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $label)),+
                }
            }
        }
    };
}

define_kind!(LedgerType, "ledger type", {
    Income = 0 => "Income",
    Expense = 1 => "Expense",
    Asset = 2 => "Asset",
    Liability = 3 => "Liability",
    Equity = 4 => "Equity",
});

define_kind!(AccountType, "account type", {
    Debtor = 0 => "Debtor",
    Creditor = 1 => "Creditor",
});

define_kind!(JournalType, "journal type", {
    Income = 0 => "Income",
    Expense = 1 => "Expense",
    Cashflow = 2 => "Cashflow",
    General = 3 => "General",
});

/// The kinds of model a message can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Ledger,
    Account,
    Journal,
    Entry,
    EntryRow,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ledger => write!(f, "Ledger"),
            Self::Account => write!(f, "Account"),
            Self::Journal => write!(f, "Journal"),
            Self::Entry => write!(f, "Entry"),
            Self::EntryRow => write!(f, "Entry row"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_type_ordinals_are_fixed() {
        assert_eq!(LedgerType::Income.ordinal(), 0);
        assert_eq!(LedgerType::Expense.ordinal(), 1);
        assert_eq!(LedgerType::Asset.ordinal(), 2);
        assert_eq!(LedgerType::Liability.ordinal(), 3);
        assert_eq!(LedgerType::Equity.ordinal(), 4);
    }

    #[test]
    fn test_every_kind_round_trips_through_its_ordinal() {
        for kind in LedgerType::all() {
            assert_eq!(LedgerType::from_ordinal(kind.ordinal()).unwrap(), *kind);
        }
        for kind in AccountType::all() {
            assert_eq!(AccountType::from_ordinal(kind.ordinal()).unwrap(), *kind);
        }
        for kind in JournalType::all() {
            assert_eq!(JournalType::from_ordinal(kind.ordinal()).unwrap(), *kind);
        }
    }

    #[test]
    fn test_unknown_ordinal_is_rejected() {
        let err = JournalType::from_ordinal(9).unwrap_err();
        assert_eq!(err.to_string(), "Invalid journal type ordinal: 9");
    }

    #[test]
    fn test_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&LedgerType::Liability).unwrap(), "3");
        let kind: AccountType = serde_json::from_str("1").unwrap();
        assert_eq!(kind, AccountType::Creditor);
        assert!(serde_json::from_str::<AccountType>("7").is_err());
    }

    #[test]
    fn test_next_and_prev_wrap() {
        assert_eq!(LedgerType::Equity.next(), LedgerType::Income);
        assert_eq!(LedgerType::Income.prev(), LedgerType::Equity);
        assert_eq!(AccountType::Debtor.next(), AccountType::Creditor);
    }
}
