//! Char cursor over a source string.
//!
//! Positions count chars, not bytes: `column` is what a user would count in
//! an editor, and `index` addresses the same char sequence the cursor walks.

use helena_ir::SourcePosition;

/// Char cursor with line/column tracking.
#[derive(Clone, Debug)]
pub struct SourceStream {
    chars: Vec<char>,
    index: usize,
    line: usize,
    column: usize,
}

impl SourceStream {
    /// Create a cursor at the start of `source`.
    pub fn new(source: &str) -> Self {
        SourceStream {
            chars: source.chars().collect(),
            index: 0,
            line: 0,
            column: 0,
        }
    }

    /// Returns `true` once every char has been consumed.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.index >= self.chars.len()
    }

    /// The char under the cursor, `None` at EOF.
    #[inline]
    pub fn current(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    /// Consume and return the char under the cursor.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.current()?;
        self.index += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Consume chars while `pred` holds. Returns how many were consumed.
    pub fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while self.current().is_some_and(&pred) {
            self.advance();
            count += 1;
        }
        count
    }

    /// Position of the char under the cursor.
    #[inline]
    pub fn position(&self) -> SourcePosition {
        SourcePosition::new(self.index, self.line, self.column)
    }

    /// Text from char index `start` up to the cursor.
    ///
    /// An out-of-range `start` yields an empty string.
    pub fn slice_from(&self, start: usize) -> String {
        self.chars
            .get(start..self.index)
            .map(|chars| chars.iter().collect())
            .unwrap_or_default()
    }
}
