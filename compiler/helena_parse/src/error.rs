//! Parse error types.

use helena_ir::SourcePosition;
use std::fmt;

/// Which pair of brackets an error is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Delimiter {
    /// `( )`
    Parenthesis,
    /// `{ }`
    Brace,
    /// `[ ]`
    Bracket,
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Delimiter::Parenthesis => "parenthesis",
            Delimiter::Brace => "brace",
            Delimiter::Bracket => "bracket",
        })
    }
}

/// What went wrong. `Display` gives the user-facing message.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("unmatched left {0}")]
    UnmatchedLeft(Delimiter),
    #[error("unmatched right {0}")]
    UnmatchedRight(Delimiter),
    #[error("mismatched right {0}")]
    MismatchedRight(Delimiter),
    #[error("unexpected string delimiter")]
    UnexpectedStringDelimiter,
    #[error("unexpected comment delimiter")]
    UnexpectedCommentDelimiter,
    #[error("extra characters after string delimiter")]
    ExtraCharactersAfterStringDelimiter,
    #[error("unmatched string delimiter")]
    UnmatchedStringDelimiter,
    #[error("unmatched here-string delimiter")]
    UnmatchedHereStringDelimiter,
    #[error("unmatched tagged string delimiter")]
    UnmatchedTaggedStringDelimiter,
    #[error("unmatched block comment delimiter")]
    UnmatchedBlockCommentDelimiter,
    /// Input ends with a line continuation.
    #[error("unterminated script")]
    UnterminatedScript,
    /// A word whose morphemes form no valid word type.
    #[error("syntax error")]
    SyntaxError,
}

impl ParseErrorKind {
    /// Whether more input could make this error go away.
    ///
    /// Interactive callers use this to tell "keep reading" from "report".
    pub const fn is_incomplete(&self) -> bool {
        matches!(
            self,
            ParseErrorKind::UnmatchedLeft(_)
                | ParseErrorKind::UnmatchedStringDelimiter
                | ParseErrorKind::UnmatchedHereStringDelimiter
                | ParseErrorKind::UnmatchedTaggedStringDelimiter
                | ParseErrorKind::UnmatchedBlockCommentDelimiter
                | ParseErrorKind::UnterminatedScript
        )
    }
}

/// A parse failure and the position of the token that caused it.
///
/// For unclosed constructs the position is that of the opening delimiter.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: SourcePosition,
}

impl ParseError {
    #[cold]
    pub fn new(kind: ParseErrorKind, position: SourcePosition) -> Self {
        ParseError { kind, position }
    }
}
