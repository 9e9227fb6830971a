//! Parse contexts: the frames of the parser's explicit stack.
//!
//! Builder types here are mutable and private to the parser; they freeze
//! into the public AST records when their construct closes.

use crate::error::{Delimiter, ParseErrorKind};
use crate::syntax::{SyntaxChecker, WordType};
use helena_ir::{Morpheme, MorphemeKind, Script, Sentence, SourcePosition, Word};

/// One level of nesting.
pub(super) enum Frame {
    Script(ScriptContext),
    String(StringContext),
    /// `""` seen; a following text token makes it a tagged string opener.
    QuotePair {
        opened_at: SourcePosition,
        position: Option<SourcePosition>,
    },
    HereString(RawContext),
    TaggedString(TaggedStringContext),
    LineComment(LineCommentContext),
    BlockComment(BlockCommentContext),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum ScriptKind {
    Root,
    Tuple,
    Block,
    Expression,
}

impl ScriptKind {
    pub(super) const fn delimiter(self) -> Option<Delimiter> {
        match self {
            ScriptKind::Root => None,
            ScriptKind::Tuple => Some(Delimiter::Parenthesis),
            ScriptKind::Block => Some(Delimiter::Brace),
            ScriptKind::Expression => Some(Delimiter::Bracket),
        }
    }
}

/// Where a substitution marker stands within a morpheme list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Substitution {
    None,
    /// `$` seen, source not yet.
    ExpectSource,
    /// Source seen; selectors may follow.
    ExpectSelectors,
}

/// Morphemes under construction, for a word or a string.
pub(super) struct MorphemeList {
    items: Vec<Morpheme>,
    pub(super) substitution: Substitution,
}

impl MorphemeList {
    pub(super) fn new() -> Self {
        MorphemeList {
            items: Vec::new(),
            substitution: Substitution::None,
        }
    }

    #[inline]
    pub(super) fn is_pending(&self) -> bool {
        self.substitution == Substitution::ExpectSource
    }

    pub(super) fn last_is_string(&self) -> bool {
        self.items.last().is_some_and(|m| m.kind.is_string())
    }

    /// Whether the trailing literal is the source of a substitution.
    fn last_is_source(&self) -> bool {
        matches!(
            self.items.as_slice(),
            [.., Morpheme {
                kind: MorphemeKind::SubstituteNext { .. },
                ..
            }, Morpheme {
                kind: MorphemeKind::Literal(_),
                ..
            }]
        )
    }

    /// Add literal text.
    ///
    /// Text merges into a trailing literal, except into a substitution
    /// source unless `extends_source` is set and no selector followed it.
    pub(super) fn push_literal(
        &mut self,
        text: &str,
        position: Option<SourcePosition>,
        extends_source: bool,
    ) {
        let mergeable = !self.last_is_source()
            || (extends_source && self.substitution == Substitution::ExpectSelectors);
        if mergeable {
            if let Some(Morpheme {
                kind: MorphemeKind::Literal(value),
                ..
            }) = self.items.last_mut()
            {
                value.push_str(text);
                return;
            }
        }
        self.items.push(Morpheme::new(
            MorphemeKind::Literal(text.to_string()),
            position,
        ));
        self.substitution = match self.substitution {
            Substitution::ExpectSource => Substitution::ExpectSelectors,
            _ => Substitution::None,
        };
    }

    /// Add a non-literal morpheme.
    pub(super) fn push(&mut self, morpheme: Morpheme) {
        self.substitution = match (self.substitution, morpheme.kind.is_selector()) {
            (Substitution::ExpectSource | Substitution::ExpectSelectors, true) => {
                Substitution::ExpectSelectors
            }
            _ => Substitution::None,
        };
        self.items.push(morpheme);
    }

    /// Handle a `$`: start a substitution or add a level to the pending one.
    pub(super) fn begin_substitution(&mut self, position: Option<SourcePosition>) {
        if self.is_pending() {
            if let Some(Morpheme {
                kind: MorphemeKind::SubstituteNext { levels, value, .. },
                ..
            }) = self.items.last_mut()
            {
                *levels += 1;
                value.push('$');
                return;
            }
        }
        self.items.push(Morpheme::new(
            MorphemeKind::SubstituteNext {
                expansion: false,
                levels: 1,
                value: "$".to_string(),
            },
            position,
        ));
        self.substitution = Substitution::ExpectSource;
    }

    /// Handle a `*`. Returns `false` when it is not an expansion marker.
    pub(super) fn expand(&mut self) -> bool {
        if !self.is_pending() {
            return false;
        }
        if let Some(Morpheme {
            kind: MorphemeKind::SubstituteNext {
                expansion, value, ..
            },
            ..
        }) = self.items.last_mut()
        {
            if !*expansion {
                *expansion = true;
                value.push('*');
                return true;
            }
        }
        false
    }

    /// Turn a pending marker with no source back into literal text.
    pub(super) fn revert_pending(&mut self) {
        if !self.is_pending() {
            return;
        }
        self.substitution = Substitution::None;
        let marker = match self.items.last() {
            Some(Morpheme {
                kind: MorphemeKind::SubstituteNext { .. },
                ..
            }) => self.items.pop(),
            _ => None,
        };
        if let Some(Morpheme {
            kind: MorphemeKind::SubstituteNext { value, .. },
            position,
        }) = marker
        {
            self.push_literal(&value, position, false);
        }
    }

    pub(super) fn into_vec(self) -> Vec<Morpheme> {
        self.items
    }
}

/// Word under construction.
pub(super) struct WordBuilder {
    pub(super) morphemes: MorphemeList,
    position: Option<SourcePosition>,
}

/// Script, tuple, block or expression under construction.
pub(super) struct ScriptContext {
    pub(super) kind: ScriptKind,
    /// Position of the opening delimiter, for diagnostics.
    pub(super) opened_at: SourcePosition,
    /// Position attached to the AST node, when captured.
    pub(super) position: Option<SourcePosition>,
    /// Offset in the parser log where the raw body starts.
    pub(super) raw_start: usize,
    sentences: Vec<Sentence>,
    words: Vec<Word>,
    sentence_position: Option<SourcePosition>,
    word: Option<WordBuilder>,
}

impl ScriptContext {
    pub(super) fn new(
        kind: ScriptKind,
        opened_at: SourcePosition,
        position: Option<SourcePosition>,
        raw_start: usize,
    ) -> Self {
        ScriptContext {
            kind,
            opened_at,
            position,
            raw_start,
            sentences: Vec::new(),
            words: Vec::new(),
            sentence_position: None,
            word: None,
        }
    }

    /// Current word, started at `position` if none is open yet.
    ///
    /// Fails when the word already ends with a string.
    pub(super) fn word(
        &mut self,
        position: Option<SourcePosition>,
    ) -> Result<&mut MorphemeList, ParseErrorKind> {
        let word = self.word.get_or_insert_with(|| WordBuilder {
            morphemes: MorphemeList::new(),
            position,
        });
        if word.morphemes.last_is_string() {
            return Err(ParseErrorKind::ExtraCharactersAfterStringDelimiter);
        }
        Ok(&mut word.morphemes)
    }

    /// Current word's morphemes, if a word is open.
    pub(super) fn current_word(&self) -> Option<&MorphemeList> {
        self.word.as_ref().map(|w| &w.morphemes)
    }

    pub(super) fn push_morpheme(&mut self, morpheme: Morpheme) -> Result<(), ParseErrorKind> {
        self.word(morpheme.position)?.push(morpheme);
        Ok(())
    }

    pub(super) fn close_word(&mut self) -> Result<(), ParseErrorKind> {
        let Some(WordBuilder {
            mut morphemes,
            position,
        }) = self.word.take()
        else {
            return Ok(());
        };
        morphemes.revert_pending();
        let word = Word::new(morphemes.into_vec(), position);
        if SyntaxChecker::check_word(&word) == WordType::Invalid {
            return Err(ParseErrorKind::SyntaxError);
        }
        if self.words.is_empty() {
            self.sentence_position = word.position;
        }
        self.words.push(word);
        Ok(())
    }

    pub(super) fn close_sentence(&mut self) -> Result<(), ParseErrorKind> {
        self.close_word()?;
        if !self.words.is_empty() {
            let words = std::mem::take(&mut self.words);
            self.sentences
                .push(Sentence::new(words, self.sentence_position.take()));
        }
        Ok(())
    }

    /// Close everything still open and freeze into a [`Script`].
    pub(super) fn finish(mut self) -> Result<Script, ParseErrorKind> {
        self.close_sentence()?;
        Ok(Script::new(self.sentences, self.position))
    }
}

/// Plain `"..."` string under construction.
pub(super) struct StringContext {
    pub(super) opened_at: SourcePosition,
    pub(super) position: Option<SourcePosition>,
    pub(super) morphemes: MorphemeList,
}

/// Construct whose value is raw source text (here-strings).
pub(super) struct RawContext {
    pub(super) opened_at: SourcePosition,
    pub(super) position: Option<SourcePosition>,
    pub(super) delimiter_length: usize,
    pub(super) raw_start: usize,
}

pub(super) struct TaggedStringContext {
    pub(super) opened_at: SourcePosition,
    pub(super) position: Option<SourcePosition>,
    pub(super) tag: String,
    /// Log offset of the first body line; `None` while skipping the
    /// rest of the opening line.
    pub(super) body_start: Option<usize>,
    /// Log offset of a candidate closing tag just seen.
    pub(super) tag_start: Option<usize>,
}

pub(super) struct LineCommentContext {
    pub(super) opened_at: SourcePosition,
    pub(super) position: Option<SourcePosition>,
    pub(super) delimiter_length: usize,
    pub(super) raw_start: usize,
    /// No token consumed yet after the `#` run.
    pub(super) fresh: bool,
}

pub(super) struct BlockCommentContext {
    pub(super) opened_at: SourcePosition,
    pub(super) position: Option<SourcePosition>,
    pub(super) delimiter_length: usize,
    pub(super) raw_start: usize,
    pub(super) nesting: usize,
    /// Previous token was a `#` run of the delimiter length.
    pub(super) after_hash: bool,
    /// Log offset of a `}` just seen.
    pub(super) close_start: Option<usize>,
}

/// Strip the closing line's indent from every body line.
///
/// `body` runs from the first body line up to the closing tag; its last
/// line holds the indent before the tag.
pub(super) fn reindent(body: &str) -> String {
    let (lines, prefix) = match body.rfind('\n') {
        Some(end) => (&body[..=end], &body[end + 1..]),
        None => ("", body),
    };
    let indent = prefix.chars().count();
    lines
        .split_inclusive('\n')
        .map(|line| {
            let content = line.strip_suffix('\n').unwrap_or(line);
            let mut stripped: String = content.chars().skip(indent).collect();
            stripped.push('\n');
            stripped
        })
        .collect()
}
