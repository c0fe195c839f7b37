use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

use log::debug;
use toy_token::reserved_words;

use crate::{TrieError, TrieResult};

pub const DEFAULT_CAPACITY: usize = 4096;

/// Sentinel for an absent switch entry or sibling link.
pub const EMPTY: usize = usize::MAX;

/// `A`..`Z` then `a`..`z`.
const SWITCH_SLOTS: usize = 52;

const KEYWORD_TERMINAL: char = '!';
const IDENT_TERMINAL: char = '@';

/// Columns per row in the cell dump.
const DUMP_COLUMNS: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolClass {
    Keyword,
    Identifier,
}

impl SymbolClass {
    fn terminal(self) -> char {
        match self {
            SymbolClass::Keyword => KEYWORD_TERMINAL,
            SymbolClass::Identifier => IDENT_TERMINAL,
        }
    }

    fn from_terminal(symbol: char) -> Option<SymbolClass> {
        match symbol {
            KEYWORD_TERMINAL => Some(SymbolClass::Keyword),
            IDENT_TERMINAL => Some(SymbolClass::Identifier),
            _ => None,
        }
    }
}

impl Display for SymbolClass {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.pad(match self {
            SymbolClass::Keyword => "keyword",
            SymbolClass::Identifier => "identifier",
        })
    }
}

/// One character of a stored suffix, or a terminal marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub symbol: char,
    /// Alternative cell at the same depth, or [`EMPTY`].
    pub next: usize,
}

enum Walk {
    /// The whole word matched; index of its terminal cell.
    Found(usize),
    /// No sibling of `tail` matched the character at byte `offset` of the suffix.
    Diverged { tail: usize, offset: usize },
}

/// Array-backed trie holding reserved words and identifiers.
///
/// The first letter of a word selects a switch slot. The remaining characters
/// live in one shared cell array: a matched cell continues at the next index,
/// a mismatch follows the cell's sibling link. Every suffix chain is closed by
/// a terminal cell recording whether the word is a keyword or an identifier.
#[derive(Clone, Debug)]
pub struct Trie {
    switch: [usize; SWITCH_SLOTS],
    cells: Vec<Cell>,
    capacity: usize,
    words: usize,
}

fn switch_index(c: char) -> Option<usize> {
    match c {
        'A'..='Z' => Some(c as usize - 'A' as usize),
        'a'..='z' => Some(c as usize - 'a' as usize + 26),
        _ => None,
    }
}

fn switch_letter(index: usize) -> char {
    if index < 26 {
        (b'A' + index as u8) as char
    } else {
        (b'a' + (index - 26) as u8) as char
    }
}

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl Default for Trie {
    fn default() -> Self {
        Trie::new()
    }
}

impl Trie {
    pub fn new() -> Trie {
        Trie::with_capacity(DEFAULT_CAPACITY)
    }

    /// An empty trie that holds at most `capacity` cells.
    pub fn with_capacity(capacity: usize) -> Trie {
        Trie {
            switch: [EMPTY; SWITCH_SLOTS],
            cells: Vec::new(),
            capacity,
            words: 0,
        }
    }

    /// A trie seeded with every keyword and boolean literal.
    pub fn with_reserved_words(capacity: usize) -> TrieResult<Trie> {
        let mut trie = Trie::with_capacity(capacity);
        for word in reserved_words() {
            trie.insert_as(word, SymbolClass::Keyword)?;
        }

        Ok(trie)
    }

    /// Adds `word` as an identifier. Returns `false` if it was already stored.
    pub fn insert(&mut self, word: &str) -> TrieResult<bool> {
        self.insert_as(word, SymbolClass::Identifier)
    }

    /// Adds `word` with the given class. An existing entry keeps its class.
    pub fn insert_as(&mut self, word: &str, class: SymbolClass) -> TrieResult<bool> {
        let mut chars = word.chars();
        let first = chars.next().ok_or(TrieError::EmptyWord)?;
        let slot = switch_index(first).ok_or(TrieError::InvalidStart(first))?;
        if let Some(c) = chars.find(|&c| !is_symbol_char(c)) {
            return Err(TrieError::InvalidChar(c));
        }

        let rest = &word[first.len_utf8()..];
        let entry = self.switch[slot];
        if entry == EMPTY {
            self.switch[slot] = self.append_chain(rest, class)?;
        } else {
            match self.walk(entry, rest) {
                Walk::Found(_) => return Ok(false),
                Walk::Diverged { tail, offset } => {
                    let branch = self.append_chain(&rest[offset..], class)?;
                    self.cells[tail].next = branch;
                    debug!("trie: `{}` branches off at cell {} into cell {}", word, tail, branch);
                }
            }
        }

        self.words += 1;
        Ok(true)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.lookup(word).is_some()
    }

    pub fn lookup(&self, word: &str) -> Option<SymbolClass> {
        let first = word.chars().next()?;
        let entry = self.switch[switch_index(first)?];
        if entry == EMPTY {
            return None;
        }

        match self.walk(entry, &word[first.len_utf8()..]) {
            Walk::Found(end) => SymbolClass::from_terminal(self.cells[end].symbol),
            Walk::Diverged { .. } => None,
        }
    }

    /// Number of distinct words stored.
    pub fn len(&self) -> usize {
        self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn cells_used(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Entry cell for words starting with `letter`.
    pub fn switch_entry(&self, letter: char) -> Option<usize> {
        switch_index(letter)
            .map(|slot| self.switch[slot])
            .filter(|&entry| entry != EMPTY)
    }

    /// Every stored word with its class, grouped by first letter (`A`..`Z`, `a`..`z`).
    pub fn words(&self) -> Vec<(String, SymbolClass)> {
        let mut out = Vec::with_capacity(self.words);
        for (slot, &entry) in self.switch.iter().enumerate() {
            if entry == EMPTY {
                continue;
            }

            let mut prefix = switch_letter(slot).to_string();
            self.collect(entry, &mut prefix, &mut out);
        }

        out
    }

    fn collect(&self, start: usize, prefix: &mut String, out: &mut Vec<(String, SymbolClass)>) {
        let mut pos = start;
        loop {
            let cell = self.cells[pos];
            match SymbolClass::from_terminal(cell.symbol) {
                Some(class) => out.push((prefix.clone(), class)),
                None => {
                    prefix.push(cell.symbol);
                    self.collect(pos + 1, prefix, out);
                    prefix.pop();
                }
            }

            if cell.next == EMPTY {
                return;
            }
            pos = cell.next;
        }
    }

    fn walk(&self, entry: usize, rest: &str) -> Walk {
        let mut pos = entry;
        let mut chars = rest.char_indices();

        loop {
            let (offset, target) = match chars.next() {
                Some((i, c)) => (i, Some(c)),
                None => (rest.len(), None),
            };

            loop {
                let cell = self.cells[pos];
                let hit = match target {
                    Some(c) => cell.symbol == c,
                    None => SymbolClass::from_terminal(cell.symbol).is_some(),
                };
                if hit {
                    break;
                }
                if cell.next == EMPTY {
                    return Walk::Diverged { tail: pos, offset };
                }
                pos = cell.next;
            }

            if target.is_none() {
                return Walk::Found(pos);
            }

            // a character cell is always followed by the rest of its chain
            pos += 1;
        }
    }

    /// Appends `suffix` and a terminal as fresh cells; returns the first index.
    fn append_chain(&mut self, suffix: &str, class: SymbolClass) -> TrieResult<usize> {
        let needed = suffix.chars().count() + 1;
        if self.cells.len() + needed > self.capacity {
            return Err(TrieError::Full {
                capacity: self.capacity,
            });
        }

        let start = self.cells.len();
        self.cells.extend(
            suffix
                .chars()
                .chain(std::iter::once(class.terminal()))
                .map(|symbol| Cell { symbol, next: EMPTY }),
        );

        Ok(start)
    }
}

fn fmt_link(index: usize) -> String {
    if index == EMPTY {
        "-".to_owned()
    } else {
        index.to_string()
    }
}

impl Display for Trie {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        writeln!(f, "switch:")?;
        for (slot, &entry) in self.switch.iter().enumerate() {
            if entry != EMPTY {
                writeln!(f, "  {} {:>5}", switch_letter(slot), entry)?;
            }
        }

        writeln!(f, "cells: {} of {}", self.cells.len(), self.capacity)?;
        for (row, chunk) in self.cells.chunks(DUMP_COLUMNS).enumerate() {
            let base = row * DUMP_COLUMNS;
            write!(f, "  {:<8}", "")?;
            for i in 0..chunk.len() {
                write!(f, "{:>5}", base + i)?;
            }
            writeln!(f)?;

            write!(f, "  {:<8}", "symbol")?;
            for cell in chunk {
                write!(f, "{:>5}", cell.symbol)?;
            }
            writeln!(f)?;

            write!(f, "  {:<8}", "next")?;
            for cell in chunk {
                write!(f, "{:>5}", fmt_link(cell.next))?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
