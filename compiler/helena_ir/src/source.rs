//! Source descriptors and positions.

use std::fmt;

/// Where a script came from.
///
/// Both fields are optional: interactive input has no file name, and a
/// script loaded from disk may be described by its name alone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Source {
    pub filename: Option<String>,
    pub content: Option<String>,
}

impl Source {
    /// Source made of inline content with no file name.
    pub fn from_content(content: impl Into<String>) -> Self {
        Source {
            filename: None,
            content: Some(content.into()),
        }
    }

    /// Source read from a named file.
    pub fn from_file(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Source {
            filename: Some(filename.into()),
            content: Some(content.into()),
        }
    }
}

/// Zero-based position in a source, counted in chars.
///
/// Layout mirrors what diagnostics need: `index` to slice the content,
/// `line`/`column` to show the user where things went wrong.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct SourcePosition {
    pub index: usize,
    pub line: usize,
    pub column: usize,
}

impl SourcePosition {
    #[inline]
    pub const fn new(index: usize, line: usize, column: usize) -> Self {
        SourcePosition {
            index,
            line,
            column,
        }
    }
}

impl fmt::Display for SourcePosition {
    /// One-based `line:column`, the form editors expect.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}
