use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io::Read;

use log::{debug, trace, warn};
use toy_symtab::Trie;
use toy_token::*;

use crate::source::{CharSource, PushbackReader, MIN_PUSHBACK};
use crate::{LexerError, LexerResult, Malformed};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannerConfig {
    /// Cells available to the symbol table, reserved words included.
    pub trie_capacity: usize,
    pub pushback_slots: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        ScannerConfig {
            trie_capacity: toy_symtab::trie::DEFAULT_CAPACITY,
            pushback_slots: MIN_PUSHBACK,
        }
    }
}

/// A malformed lexeme reported as an `error` token.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub line: usize,
    pub problem: Malformed,
    pub lexeme: String,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "line {}: {}: `{}`", self.line, self.problem, self.lexeme.escape_debug())
    }
}

enum Skipped {
    Char(char),
    End,
    /// `/*` opened on this line was never closed.
    UnterminatedComment(usize),
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Hand-written scanner for Toy source.
///
/// Each call to [`Scanner::scan_next`] appends exactly one token. The `eof`
/// token is appended once; after it the scanner is exhausted and further
/// calls fail with [`LexerError::Exhausted`].
pub struct Scanner<S: CharSource> {
    source: S,
    tokens: TokenStream,
    symbols: Trie,
    diagnostics: Vec<Diagnostic>,
    exhausted: bool,
}

impl<R: Read> Scanner<PushbackReader<R>> {
    pub fn from_reader(r: R, config: &ScannerConfig) -> LexerResult<Self> {
        Scanner::with_config(PushbackReader::with_slots(r, config.pushback_slots), config)
    }
}

impl<S: CharSource> Scanner<S> {
    pub fn new(source: S) -> LexerResult<Scanner<S>> {
        Scanner::with_config(source, &ScannerConfig::default())
    }

    pub fn with_config(source: S, config: &ScannerConfig) -> LexerResult<Scanner<S>> {
        Ok(Scanner {
            source,
            tokens: TokenStream::new(),
            symbols: Trie::with_reserved_words(config.trie_capacity)?,
            diagnostics: Vec::new(),
            exhausted: false,
        })
    }

    /// Scans one lexeme and appends its token.
    pub fn scan_next(&mut self) -> LexerResult<&Token> {
        if self.exhausted {
            return Err(LexerError::Exhausted);
        }

        let token = self.parse()?;
        trace!("line {}: {}", token.line, token);
        if token.kind == TokenKind::Eof {
            self.exhausted = true;
        }

        Ok(self.tokens.push(token))
    }

    /// Scans until the `eof` token has been appended.
    pub fn run(&mut self) -> LexerResult<()> {
        while !self.exhausted {
            self.scan_next()?;
        }

        Ok(())
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn tokens(&self) -> &TokenStream {
        &self.tokens
    }

    pub fn symbols(&self) -> &Trie {
        &self.symbols
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_parts(self) -> (TokenStream, Trie) {
        (self.tokens, self.symbols)
    }

    fn parse(&mut self) -> LexerResult<Token> {
        let curr = match self.skip_trivia()? {
            Skipped::Char(c) => c,
            Skipped::End => return Ok(Token::new(TokenKind::Eof, self.source.line())),
            Skipped::UnterminatedComment(line) => {
                return Ok(self.malformed(Malformed::UnterminatedComment, "/*", line))
            }
        };
        let line = self.source.line();

        match curr {
            '"' => self.parse_string(line),
            '+' => Ok(Token::new(TokenKind::Plus, line)),
            '-' => Ok(Token::new(TokenKind::Minus, line)),
            '*' => Ok(Token::new(TokenKind::Multiplication, line)),
            '/' => Ok(Token::new(TokenKind::Division, line)),
            '%' => Ok(Token::new(TokenKind::Mod, line)),
            ';' => Ok(Token::new(TokenKind::Semicolon, line)),
            ',' => Ok(Token::new(TokenKind::Comma, line)),
            '.' => Ok(Token::new(TokenKind::Period, line)),
            '(' => Ok(Token::new(TokenKind::LeftParen, line)),
            ')' => Ok(Token::new(TokenKind::RightParen, line)),
            '[' => Ok(Token::new(TokenKind::LeftBracket, line)),
            ']' => Ok(Token::new(TokenKind::RightBracket, line)),
            '{' => Ok(Token::new(TokenKind::LeftBrace, line)),
            '}' => Ok(Token::new(TokenKind::RightBrace, line)),
            '<' => self.parse_equal_suffix(TokenKind::LessEqual, TokenKind::Less, line),
            '>' => self.parse_equal_suffix(TokenKind::GreaterEqual, TokenKind::Greater, line),
            '=' => self.parse_equal_suffix(TokenKind::Equal, TokenKind::AssignOp, line),
            '!' => self.parse_equal_suffix(TokenKind::NotEqual, TokenKind::Not, line),
            '&' => self.parse_doubled('&', TokenKind::And, Malformed::LoneAmpersand, line),
            '|' => self.parse_doubled('|', TokenKind::Or, Malformed::LonePipe, line),
            c if c.is_ascii_alphabetic() => self.parse_word(c, line),
            c if c.is_ascii_digit() => self.parse_number(c, line),
            c => Ok(self.malformed(Malformed::UnexpectedChar, c.to_string(), line)),
        }
    }

    fn malformed<T: Into<String>>(&mut self, problem: Malformed, lexeme: T, line: usize) -> Token {
        let diagnostic = Diagnostic {
            line,
            problem,
            lexeme: lexeme.into(),
        };
        warn!("{}", diagnostic);

        let token = Token::with_lexeme(TokenKind::Error, diagnostic.lexeme.clone(), line);
        self.diagnostics.push(diagnostic);
        token
    }

    fn unread(&mut self, c: Option<char>) -> LexerResult<()> {
        match c {
            Some(c) => self.source.pushback(c),
            None => Ok(()),
        }
    }

    /// Skips whitespace and comments; yields the first character of the next lexeme.
    fn skip_trivia(&mut self) -> LexerResult<Skipped> {
        loop {
            let curr = match self.source.read()? {
                Some(c) => c,
                None => return Ok(Skipped::End),
            };

            match curr {
                ' ' | '\t' | '\n' | '\r' => continue,
                '/' => {
                    let line = self.source.line();
                    match self.source.read()? {
                        Some('/') => self.skip_line_comment()?,
                        Some('*') => {
                            if !self.skip_block_comment()? {
                                return Ok(Skipped::UnterminatedComment(line));
                            }
                        }
                        peek => {
                            self.unread(peek)?;
                            return Ok(Skipped::Char('/'));
                        }
                    }
                }
                c => return Ok(Skipped::Char(c)),
            }
        }
    }

    fn skip_line_comment(&mut self) -> LexerResult<()> {
        while let Some(c) = self.source.read()? {
            if c == '\n' {
                break;
            }
        }

        Ok(())
    }

    /// Returns `false` when input ends before `*/`.
    fn skip_block_comment(&mut self) -> LexerResult<bool> {
        let mut curr = self.source.read()?;
        let mut peek = self.source.read()?;

        loop {
            match (curr, peek) {
                (Some('*'), Some('/')) => return Ok(true),
                (_, None) => return Ok(false),
                _ => {
                    curr = peek;
                    peek = self.source.read()?;
                }
            }
        }
    }

    fn parse_string(&mut self, line: usize) -> LexerResult<Token> {
        let mut buf = String::from('"');

        loop {
            match self.source.read()? {
                Some('"') => {
                    buf.push('"');
                    return Ok(Token::with_lexeme(TokenKind::StringConstant, buf, line));
                }
                Some(c) => buf.push(c),
                None => return Ok(self.malformed(Malformed::UnterminatedString, buf, line)),
            }
        }
    }

    /// `<`, `>`, `=`, `!` and their `=`-suffixed forms.
    fn parse_equal_suffix(&mut self, long: TokenKind, short: TokenKind, line: usize) -> LexerResult<Token> {
        match self.source.read()? {
            Some('=') => Ok(Token::new(long, line)),
            peek => {
                self.unread(peek)?;
                Ok(Token::new(short, line))
            }
        }
    }

    /// `&&` and `||`; the single character is not an operator.
    fn parse_doubled(&mut self, ch: char, kind: TokenKind, problem: Malformed, line: usize) -> LexerResult<Token> {
        let peek = self.source.read()?;
        if peek == Some(ch) {
            return Ok(Token::new(kind, line));
        }

        self.unread(peek)?;
        Ok(self.malformed(problem, ch.to_string(), line))
    }

    fn parse_word(&mut self, first: char, line: usize) -> LexerResult<Token> {
        let mut buf = String::new();
        buf.push(first);

        loop {
            match self.source.read()? {
                Some(c) if is_word_char(c) => buf.push(c),
                peek => {
                    self.unread(peek)?;
                    break;
                }
            }
        }

        match TokenKind::reserved(&buf) {
            Some(TokenKind::BooleanConstant) => Ok(Token::with_lexeme(TokenKind::BooleanConstant, buf, line)),
            Some(kind) => Ok(Token::new(kind, line)),
            None => {
                if self.symbols.insert(&buf)? {
                    debug!("interned identifier `{}`", buf);
                }
                Ok(Token::with_lexeme(TokenKind::Id, buf, line))
            }
        }
    }

    fn parse_number(&mut self, first: char, line: usize) -> LexerResult<Token> {
        let mut buf = String::new();
        buf.push(first);

        if first == '0' {
            match self.source.read()? {
                Some(x @ ('x' | 'X')) => return self.parse_hex(buf, x, line),
                peek => self.unread(peek)?,
            }
        }

        let next = self.read_digits(&mut buf)?;
        if next != Some('.') {
            self.unread(next)?;
            return Ok(Token::with_lexeme(TokenKind::IntConstant, buf, line));
        }

        buf.push('.');
        match self.read_digits(&mut buf)? {
            Some(e @ ('e' | 'E')) => self.parse_exponent(e, &mut buf)?,
            next => self.unread(next)?,
        }

        Ok(Token::with_lexeme(TokenKind::DoubleConstant, buf, line))
    }

    /// Called after `0x`; at least one hex digit must follow.
    fn parse_hex(&mut self, mut buf: String, x: char, line: usize) -> LexerResult<Token> {
        buf.push(x);

        let mut next = self.source.read()?;
        if !next.is_some_and(|c| c.is_ascii_hexdigit()) {
            self.unread(next)?;
            return Ok(self.malformed(Malformed::MalformedHex, buf, line));
        }

        while let Some(c) = next.filter(char::is_ascii_hexdigit) {
            buf.push(c);
            next = self.source.read()?;
        }
        self.unread(next)?;

        Ok(Token::with_lexeme(TokenKind::IntConstant, buf, line))
    }

    /// Appends `e` and the exponent to `buf` when digits follow (optionally
    /// after one sign). Otherwise every character read here, `e` included,
    /// goes back to the source to be scanned as separate tokens.
    fn parse_exponent(&mut self, e: char, buf: &mut String) -> LexerResult<()> {
        match self.source.read()? {
            Some(d) if d.is_ascii_digit() => {
                buf.push(e);
                buf.push(d);
            }
            Some(sign @ ('+' | '-')) => match self.source.read()? {
                Some(d) if d.is_ascii_digit() => {
                    buf.push(e);
                    buf.push(sign);
                    buf.push(d);
                }
                after_sign => {
                    self.unread(after_sign)?;
                    self.source.pushback(sign)?;
                    return self.source.pushback(e);
                }
            },
            peek => {
                self.unread(peek)?;
                return self.source.pushback(e);
            }
        }

        let next = self.read_digits(buf)?;
        self.unread(next)
    }

    /// Appends digits to `buf`; returns the first non-digit, which the caller owns.
    fn read_digits(&mut self, buf: &mut String) -> LexerResult<Option<char>> {
        loop {
            match self.source.read()? {
                Some(d) if d.is_ascii_digit() => buf.push(d),
                other => return Ok(other),
            }
        }
    }
}

impl<S: CharSource> Iterator for Scanner<S> {
    type Item = LexerResult<Token>;

    /// Yields tokens up to and including `eof`.
    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        Some(self.scan_next().cloned())
    }
}
