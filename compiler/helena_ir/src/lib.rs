//! Helena IR - shared data structures of the Helena core.
//!
//! This crate contains the types every stage of the pipeline agrees on:
//! - [`Source`] and [`SourcePosition`] for origin tracking
//! - [`Token`] and [`TokenKind`] for lexer output
//! - the frozen syntax tree: [`Script`], [`Sentence`], [`Word`], [`Morpheme`]
//!
//! The tree is built by the parser and never mutated afterwards. Block
//! subscripts are reference-counted so that runtime script values can share
//! them with the tree they were parsed from.

pub mod ast;
mod source;
mod token;

pub use ast::{Morpheme, MorphemeKind, Script, Sentence, Word};
pub use source::{Source, SourcePosition};
pub use token::{Token, TokenKind};
