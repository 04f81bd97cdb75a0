//! Key sequence primitives

pub mod token;
pub mod trie;

pub use token::{format_sequence, parse_sequence, Token};
pub use trie::KeySequenceTrie;
