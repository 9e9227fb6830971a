//! Frozen syntax tree.
//!
//! ```text
//! Script   = Sentence*        (separated by newlines or `;`)
//! Sentence = Word*            (separated by whitespace)
//! Word     = Morpheme+        (adjacent, no separator)
//! ```
//!
//! Positions are only present when the parser was asked to capture them.

use crate::SourcePosition;
use std::rc::Rc;

/// Ordered list of sentences.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Script {
    pub sentences: Vec<Sentence>,
    pub position: Option<SourcePosition>,
}

impl Script {
    pub fn new(sentences: Vec<Sentence>, position: Option<SourcePosition>) -> Self {
        Script {
            sentences,
            position,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// Ordered list of words; a command invocation once evaluated.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Sentence {
    pub words: Vec<Word>,
    pub position: Option<SourcePosition>,
}

impl Sentence {
    pub fn new(words: Vec<Word>, position: Option<SourcePosition>) -> Self {
        Sentence { words, position }
    }
}

/// Ordered list of morphemes with nothing between them.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Word {
    pub morphemes: Vec<Morpheme>,
    pub position: Option<SourcePosition>,
}

impl Word {
    pub fn new(morphemes: Vec<Morpheme>, position: Option<SourcePosition>) -> Self {
        Word {
            morphemes,
            position,
        }
    }
}

/// Smallest syntactic constituent of a word.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Morpheme {
    pub kind: MorphemeKind,
    pub position: Option<SourcePosition>,
}

impl Morpheme {
    pub fn new(kind: MorphemeKind, position: Option<SourcePosition>) -> Self {
        Morpheme { kind, position }
    }

    /// Morpheme without position, for hand-built trees.
    pub fn bare(kind: MorphemeKind) -> Self {
        Morpheme {
            kind,
            position: None,
        }
    }

    /// Convenience constructor for a literal morpheme.
    pub fn literal(value: impl Into<String>) -> Self {
        Morpheme::bare(MorphemeKind::Literal(value.into()))
    }
}

/// The closed set of morpheme kinds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum MorphemeKind {
    /// Plain text, escapes already decoded.
    Literal(String),
    /// `( ... )`
    Tuple(Script),
    /// `{ ... }`; `value` is the exact source text between the braces.
    Block { subscript: Rc<Script>, value: String },
    /// `[ ... ]`
    Expression(Script),
    /// `" ... "` with literal, substitution and expression parts.
    String(Vec<Morpheme>),
    /// `"""..."""` (three or more quotes), raw content.
    HereString {
        value: String,
        delimiter_length: usize,
    },
    /// `""TAG` ... `TAG""`, reindented raw content.
    TaggedString { value: String, tag: String },
    /// `#...` up to the end of the line.
    LineComment {
        value: String,
        delimiter_length: usize,
    },
    /// `#{ ... }#` with matching `#` run lengths.
    BlockComment {
        value: String,
        delimiter_length: usize,
    },
    /// `$`, `$$`, `$*`...: substitute the stem that follows.
    ///
    /// `levels` counts the `$` signs, `expansion` records a trailing `*`,
    /// `value` keeps the raw marker text.
    SubstituteNext {
        expansion: bool,
        levels: usize,
        value: String,
    },
}

impl MorphemeKind {
    /// Line or block comment.
    #[inline]
    pub const fn is_comment(&self) -> bool {
        matches!(
            self,
            MorphemeKind::LineComment { .. } | MorphemeKind::BlockComment { .. }
        )
    }

    /// Any of the three quoted forms.
    #[inline]
    pub const fn is_string(&self) -> bool {
        matches!(
            self,
            MorphemeKind::String(_)
                | MorphemeKind::HereString { .. }
                | MorphemeKind::TaggedString { .. }
        )
    }

    /// Morphemes that may follow a root to select from it: `(keys)`,
    /// `{rules}` and `[index]`.
    #[inline]
    pub const fn is_selector(&self) -> bool {
        matches!(
            self,
            MorphemeKind::Tuple(_) | MorphemeKind::Block { .. } | MorphemeKind::Expression(_)
        )
    }

    /// Short lowercase name, for diagnostics.
    pub const fn name(&self) -> &'static str {
        match self {
            MorphemeKind::Literal(_) => "literal",
            MorphemeKind::Tuple(_) => "tuple",
            MorphemeKind::Block { .. } => "block",
            MorphemeKind::Expression(_) => "expression",
            MorphemeKind::String(_) => "string",
            MorphemeKind::HereString { .. } => "here-string",
            MorphemeKind::TaggedString { .. } => "tagged string",
            MorphemeKind::LineComment { .. } => "line comment",
            MorphemeKind::BlockComment { .. } => "block comment",
            MorphemeKind::SubstituteNext { .. } => "substitute next",
        }
    }
}
