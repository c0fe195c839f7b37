use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::slice;

use crate::{Token, TokenKind};

/// Append-only sequence of scanned tokens, in source order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new() -> TokenStream {
        TokenStream { tokens: Vec::new() }
    }

    pub fn push(&mut self, token: Token) -> &Token {
        self.tokens.push(token);
        &self.tokens[self.tokens.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn last(&self) -> Option<&Token> {
        self.tokens.last()
    }

    pub fn iter(&self) -> slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }

    /// Token texts joined by single spaces, leaving out the end marker.
    ///
    /// Scanning the result yields the same kinds as the original source.
    pub fn reconstruct(&self) -> String {
        self.tokens
            .iter()
            .filter(|t| t.kind != TokenKind::Eof)
            .map(Token::text)
            .collect::<Vec<&str>>()
            .join(" ")
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl IntoIterator for TokenStream {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl Display for TokenStream {
    /// Kind names, one output line per input line.
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut line = None;

        for token in self.tokens.iter().filter(|t| t.kind != TokenKind::Eof) {
            match line {
                None => {}
                Some(l) if token.line > l => {
                    for _ in l..token.line {
                        writeln!(f)?;
                    }
                }
                Some(_) => write!(f, " ")?,
            }
            line = Some(token.line);
            write!(f, "{}", token.kind)?;
        }

        Ok(())
    }
}
