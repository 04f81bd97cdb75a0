//! Journal model
//!
//! Journals group entries by the kind of business event they record.

use super::ids::JournalId;
use super::kind::JournalType;
use super::reference::define_reference;

define_reference!(
    /// A journal
    Journal,
    JournalId,
    JournalType,
    Journal
);
