//! Token types for the Helena tokenizer.

use crate::SourcePosition;
use std::fmt;

/// A token: its kind, where it starts, the exact source text it covers
/// (`sequence`) and the text it stands for (`literal`).
///
/// `sequence` and `literal` only differ for escapes and continuations:
/// `\n` has sequence `\n` (two chars) and a one-char newline literal.
/// Concatenating every token's `sequence` gives back the input verbatim.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    pub kind: TokenKind,
    pub position: SourcePosition,
    pub sequence: String,
    pub literal: String,
}

impl Token {
    #[inline]
    pub fn new(
        kind: TokenKind,
        position: SourcePosition,
        sequence: impl Into<String>,
        literal: impl Into<String>,
    ) -> Self {
        Token {
            kind,
            position,
            sequence: sequence.into(),
            literal: literal.into(),
        }
    }

    /// Token whose literal is its own source text.
    #[inline]
    pub fn verbatim(kind: TokenKind, position: SourcePosition, text: impl Into<String>) -> Self {
        let text = text.into();
        Token {
            kind,
            position,
            sequence: text.clone(),
            literal: text,
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}({:?}) @ {}",
            self.kind, self.literal, self.position
        )
    }
}

/// Token kinds.
///
/// Delimiter runs (`#`, `"`) are a single token whatever their length; the
/// parser matches lengths when pairing openers and closers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    /// Run of horizontal whitespace.
    Whitespace,
    /// `\n`, terminates a sentence.
    Newline,
    /// `\` + newline + following horizontal whitespace.
    Continuation,
    /// Plain text; adjacent text is merged into one token.
    Text,
    /// Backslash escape sequence.
    Escape,
    /// Run of `#`.
    Comment,
    OpenTuple,
    CloseTuple,
    OpenBlock,
    CloseBlock,
    OpenExpression,
    CloseExpression,
    /// Run of `"`.
    StringDelimiter,
    Dollar,
    Asterisk,
    Semicolon,
}
