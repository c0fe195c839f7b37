pub mod trie;

use thiserror::Error;

pub use crate::trie::{Cell, SymbolClass, Trie};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrieError {
    #[error("cannot insert an empty word")]
    EmptyWord,

    /// Only ASCII letters have a switch slot.
    #[error("word must start with an ASCII letter, found {0:?}")]
    InvalidStart(char),

    #[error("{0:?} may not appear in a symbol")]
    InvalidChar(char),

    #[error("symbol table full: all {capacity} cells in use")]
    Full { capacity: usize },
}

pub type TrieResult<T> = Result<T, TrieError>;
