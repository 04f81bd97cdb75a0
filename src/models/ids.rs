//! Strongly-typed ID wrappers for all entity types
//!
//! Using newtype wrappers prevents accidentally mixing up IDs from different
//! entity types at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::kind::ModelKind;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parse an ID from a string
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if let Ok(uuid) = Uuid::parse_str(s) {
                    return Ok(Self(uuid));
                }
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(LedgerId, "ldg-");
define_id!(AccountId, "acc-");
define_id!(JournalId, "jrn-");
define_id!(EntryId, "ent-");
define_id!(EntryRowId, "row-");

/// An id of any top-level record, tagged with its model kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordId {
    Ledger(LedgerId),
    Account(AccountId),
    Journal(JournalId),
    Entry(EntryId),
}

impl RecordId {
    /// The model kind this id refers to
    pub fn model_kind(&self) -> ModelKind {
        match self {
            Self::Ledger(_) => ModelKind::Ledger,
            Self::Account(_) => ModelKind::Account,
            Self::Journal(_) => ModelKind::Journal,
            Self::Entry(_) => ModelKind::Entry,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ledger(id) => id.fmt(f),
            Self::Account(id) => id.fmt(f),
            Self::Journal(id) => id.fmt(f),
            Self::Entry(id) => id.fmt(f),
        }
    }
}

impl From<LedgerId> for RecordId {
    fn from(id: LedgerId) -> Self {
        Self::Ledger(id)
    }
}

impl From<AccountId> for RecordId {
    fn from(id: AccountId) -> Self {
        Self::Account(id)
    }
}

impl From<JournalId> for RecordId {
    fn from(id: JournalId) -> Self {
        Self::Journal(id)
    }
}

impl From<EntryId> for RecordId {
    fn from(id: EntryId) -> Self {
        Self::Entry(id)
    }
}
