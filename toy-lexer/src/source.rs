use std::io::{Bytes, Read};

use crate::{LexerError, LexerResult};

/// Fewest pushback slots the scanner can work with: an abandoned
/// exponent returns `e`, its sign and the character after the sign.
pub const MIN_PUSHBACK: usize = 3;

/// Character stream with bounded unread support.
pub trait CharSource {
    /// Next character, or `None` at end of input.
    fn read(&mut self) -> LexerResult<Option<char>>;

    /// Returns `c` to the stream; characters come back in reverse order of pushing.
    fn pushback(&mut self, c: char) -> LexerResult<()>;

    /// 1-based line of the most recently read character.
    fn line(&self) -> usize;
}

/// UTF-8 decoding [`CharSource`] over any byte reader.
pub struct PushbackReader<R: Read> {
    bytes: Bytes<R>,
    pushed: Vec<char>,
    slots: usize,
    line: usize,
}

impl<R: Read> PushbackReader<R> {
    pub fn new(r: R) -> PushbackReader<R> {
        PushbackReader::with_slots(r, MIN_PUSHBACK)
    }

    /// `slots` below [`MIN_PUSHBACK`] is raised to it.
    pub fn with_slots(r: R, slots: usize) -> PushbackReader<R> {
        let slots = slots.max(MIN_PUSHBACK);

        PushbackReader {
            bytes: r.bytes(),
            pushed: Vec::with_capacity(slots),
            slots,
            line: 1,
        }
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    fn next_byte(&mut self) -> LexerResult<Option<u8>> {
        match self.bytes.next() {
            Some(Ok(b)) => Ok(Some(b)),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }

    fn decode(&mut self) -> LexerResult<Option<char>> {
        let lead = match self.next_byte()? {
            Some(b) => b,
            None => return Ok(None),
        };

        let width = match lead {
            0x00..=0x7f => return Ok(Some(lead as char)),
            0xc0..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf7 => 4,
            _ => return Err(LexerError::InvalidUtf8(self.line)),
        };

        let mut buf = [lead, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            *slot = self
                .next_byte()?
                .ok_or(LexerError::InvalidUtf8(self.line))?;
        }

        std::str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .map(Some)
            .ok_or(LexerError::InvalidUtf8(self.line))
    }
}

impl<R: Read> CharSource for PushbackReader<R> {
    fn read(&mut self) -> LexerResult<Option<char>> {
        let c = match self.pushed.pop() {
            Some(c) => Some(c),
            None => self.decode()?,
        };

        if c == Some('\n') {
            self.line += 1;
        }

        Ok(c)
    }

    fn pushback(&mut self, c: char) -> LexerResult<()> {
        if self.pushed.len() >= self.slots {
            return Err(LexerError::PushbackOverflow(self.slots));
        }

        if c == '\n' {
            self.line = self.line.saturating_sub(1).max(1);
        }
        self.pushed.push(c);

        Ok(())
    }

    fn line(&self) -> usize {
        self.line
    }
}
