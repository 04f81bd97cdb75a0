//! Shared shape of the reference entities
//!
//! Ledgers, accounts and journals all carry a name, a closed kind and free
//! form notes. Entry rows point at them by id.

use crate::error::{LedgerError, LedgerResult};

use super::ids::RecordId;
use super::kind::{Kind, ModelKind};

/// Maximum length of a reference entity name
pub const MAX_NAME_LEN: usize = 100;

/// A named, kinded reference entity
pub trait Reference: Clone + Send + Sync + 'static {
    /// The closed kind enumeration of this entity
    type Kind: Kind + Send + Sync;

    /// Which model this is
    const MODEL: ModelKind;

    /// Create a new entity with a fresh id
    fn create(name: String, kind: Self::Kind, notes: String) -> Self;

    fn record_id(&self) -> RecordId;
    fn name(&self) -> &str;
    fn kind(&self) -> Self::Kind;
    fn notes(&self) -> &str;

    /// Replace the editable fields, keeping the id
    fn set_fields(&mut self, name: String, kind: Self::Kind, notes: String);

    /// Validate the editable fields
    fn validate(&self) -> LedgerResult<()> {
        validate_name(Self::MODEL, self.name())
    }
}

/// Names must be non-empty and reasonably short
pub fn validate_name(model: ModelKind, name: &str) -> LedgerResult<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::Validation(format!(
            "{} name cannot be empty",
            model
        )));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(LedgerError::Validation(format!(
            "{} name too long ({} chars, max {})",
            model,
            name.chars().count(),
            MAX_NAME_LEN
        )));
    }
    Ok(())
}

/// Generate a reference entity struct and its `Reference` impl
macro_rules! define_reference {
    ($(#[$meta:meta])* $name:ident, $id:ident, $kind:ident, $model:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        pub struct $name {
            /// Unique identifier
            pub id: $id,

            /// Display name
            pub name: String,

            /// Closed kind, persisted as its ordinal
            #[serde(rename = "type")]
            pub kind: $kind,

            /// Free-form notes
            #[serde(default)]
            pub notes: String,
        }

        impl $name {
            /// Create a new entity with no notes
            pub fn new(name: impl Into<String>, kind: $kind) -> Self {
                Self {
                    id: $id::new(),
                    name: name.into(),
                    kind,
                    notes: String::new(),
                }
            }
        }

        impl $crate::models::reference::Reference for $name {
            type Kind = $kind;

            const MODEL: $crate::models::kind::ModelKind = $crate::models::kind::ModelKind::$model;

            fn create(name: String, kind: $kind, notes: String) -> Self {
                Self {
                    id: $id::new(),
                    name,
                    kind,
                    notes,
                }
            }

            fn record_id(&self) -> $crate::models::ids::RecordId {
                self.id.into()
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn kind(&self) -> $kind {
                self.kind
            }

            fn notes(&self) -> &str {
                &self.notes
            }

            fn set_fields(&mut self, name: String, kind: $kind, notes: String) {
                self.name = name;
                self.kind = kind;
                self.notes = notes;
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{} ({})", self.name, self.kind)
            }
        }
    };
}

pub(crate) use define_reference;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name(ModelKind::Ledger, "Bank").is_ok());

        let err = validate_name(ModelKind::Ledger, "   ").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Ledger name cannot be empty");

        let err = validate_name(ModelKind::Journal, &"x".repeat(101)).unwrap_err();
        assert!(err.is_validation());
    }
}
