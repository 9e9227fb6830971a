//! Word classification.
//!
//! | word type      | shape                                                      |
//! |----------------|------------------------------------------------------------|
//! | `Root`         | one non-comment morpheme                                   |
//! | `Qualified`    | literal, tuple or block followed by selectors only         |
//! | `Substitution` | `$` marker, one source, then selectors only                |
//! | `Compound`     | literals, expressions and substitutions glued together     |
//! | `Ignored`      | one comment                                                |
//! | `Invalid`      | anything else                                              |
//!
//! Selectors are tuples (keys), blocks (rules) and expressions (index).

use helena_ir::{Morpheme, MorphemeKind, Word};

/// Classification of a word's morpheme sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WordType {
    Root,
    Compound,
    Substitution,
    Qualified,
    Ignored,
    Invalid,
}

/// Pure classifier over a word's morphemes.
pub struct SyntaxChecker;

impl SyntaxChecker {
    /// Number of morphemes making up the substitution stem at the start of
    /// `morphemes`: the marker, its source and the selectors that follow.
    ///
    /// `None` when the marker has no valid source.
    pub fn substitution_length(morphemes: &[Morpheme]) -> Option<usize> {
        substitution_length(morphemes)
    }

    /// Classify `word`.
    pub fn check_word(word: &Word) -> WordType {
        Self::check_morphemes(&word.morphemes)
    }

    /// Classify a bare morpheme sequence.
    pub fn check_morphemes(morphemes: &[Morpheme]) -> WordType {
        let Some((first, rest)) = morphemes.split_first() else {
            return WordType::Invalid;
        };
        if rest.is_empty() {
            return match &first.kind {
                kind if kind.is_comment() => WordType::Ignored,
                MorphemeKind::SubstituteNext { .. } => WordType::Invalid,
                _ => WordType::Root,
            };
        }
        match first.kind {
            MorphemeKind::Tuple(_) | MorphemeKind::Block { .. } => check_qualified(rest),
            MorphemeKind::Literal(_) => match check_qualified(rest) {
                WordType::Invalid => check_compound(morphemes),
                qualified => qualified,
            },
            MorphemeKind::Expression(_) => check_compound(morphemes),
            MorphemeKind::SubstituteNext { .. } => {
                if substitution_length(morphemes) == Some(morphemes.len()) {
                    WordType::Substitution
                } else {
                    check_compound(morphemes)
                }
            }
            MorphemeKind::String(_)
            | MorphemeKind::HereString { .. }
            | MorphemeKind::TaggedString { .. }
            | MorphemeKind::LineComment { .. }
            | MorphemeKind::BlockComment { .. } => WordType::Invalid,
        }
    }
}

fn check_qualified(selectors: &[Morpheme]) -> WordType {
    if selectors.iter().all(|m| m.kind.is_selector()) {
        WordType::Qualified
    } else {
        WordType::Invalid
    }
}

fn check_compound(morphemes: &[Morpheme]) -> WordType {
    let mut rest = morphemes;
    while let Some(first) = rest.first() {
        let length = match first.kind {
            MorphemeKind::Literal(_) | MorphemeKind::Expression(_) => 1,
            MorphemeKind::SubstituteNext { .. } => match substitution_length(rest) {
                Some(length) => length,
                None => return WordType::Invalid,
            },
            _ => return WordType::Invalid,
        };
        rest = &rest[length..];
    }
    WordType::Compound
}

fn substitution_length(morphemes: &[Morpheme]) -> Option<usize> {
    match morphemes.get(1).map(|m| &m.kind) {
        Some(
            MorphemeKind::Literal(_)
            | MorphemeKind::Tuple(_)
            | MorphemeKind::Block { .. }
            | MorphemeKind::Expression(_),
        ) => {}
        _ => return None,
    }
    let selectors = morphemes[2..]
        .iter()
        .take_while(|m| m.kind.is_selector())
        .count();
    Some(2 + selectors)
}
