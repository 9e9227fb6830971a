//! Tokenizer for the Helena core.
//!
//! Turns source text into a stream of [`Token`]s. The tokenizer never fails:
//! any character it does not recognize becomes text, and all validation is
//! left to the parser.
//!
//! # Layers
//!
//! - [`SourceStream`]: char cursor tracking index, line and column
//! - escape decoding (`\n`, `\123`, `\x41`, `é`, `\U0001F600`...)
//! - [`Tokenizer`]: the scanner, usable in batch ([`tokenize`]) or
//!   incrementally (`begin`, then [`Iterator::next`] until `end`)
//! - [`TokenStream`]: token cursor consumed by the parser
//!
//! # Losslessness
//!
//! Concatenating the `sequence` of every token yields the input verbatim.

mod escape;
mod source_stream;
mod token_stream;
mod tokenizer;

pub use helena_ir::{SourcePosition, Token, TokenKind};
pub use source_stream::SourceStream;
pub use token_stream::{ArrayTokenStream, TokenStream};
pub use tokenizer::Tokenizer;

/// Tokenize a whole source string.
pub fn tokenize(source: &str) -> Vec<Token> {
    Tokenizer::new().tokenize(source)
}
