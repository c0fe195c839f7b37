pub mod lexer;
pub mod source;

use std::io;

use thiserror::Error;
use toy_symtab::{Trie, TrieError};
use toy_token::TokenStream;

pub use crate::lexer::{Diagnostic, Scanner, ScannerConfig};
pub use crate::source::{CharSource, PushbackReader};

pub type LexerResult<T> = Result<T, LexerError>;

/// Faults that stop the scan. Malformed lexemes are not among them; see [`Malformed`].
#[derive(Debug, Error)]
pub enum LexerError {
    #[error("failed to read source: {0}")]
    Io(#[from] io::Error),

    #[error("invalid UTF-8 in source at line {0}")]
    InvalidUtf8(usize),

    #[error("pushback buffer overflow ({0} slots)")]
    PushbackOverflow(usize),

    #[error(transparent)]
    SymbolTable(#[from] TrieError),

    #[error("scanner already reached end of input")]
    Exhausted,
}

/// Lexical errors the scanner recovers from by emitting an `error` token.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum Malformed {
    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unterminated block comment")]
    UnterminatedComment,

    #[error("malformed hexadecimal literal")]
    MalformedHex,

    #[error("expected '&&'")]
    LoneAmpersand,

    #[error("expected '||'")]
    LonePipe,

    #[error("unexpected character")]
    UnexpectedChar,
}

/// Scans all of `src`, returning the tokens and the filled symbol table.
pub fn tokenize(src: &str) -> LexerResult<(TokenStream, Trie)> {
    let mut scanner = Scanner::new(PushbackReader::new(src.as_bytes()))?;
    scanner.run()?;

    Ok(scanner.into_parts())
}
