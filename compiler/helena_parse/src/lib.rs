//! Parser for the Helena core.
//!
//! Turns a token stream into a frozen [`Script`]. The parser keeps an
//! explicit stack of parse contexts instead of recursing, so it can stop at
//! any token and pick up again when more input arrives:
//!
//! ```text
//! let mut parser = Parser::new(ParserOptions::default());
//! parser.parse(&mut first_chunk)?;
//! match parser.close_stream() {
//!     Err(e) if e.kind.is_incomplete() => { /* ask for more input */ }
//!     result => { /* done */ }
//! }
//! ```
//!
//! Every completed word goes through the [`SyntaxChecker`]; words it
//! classifies as [`WordType::Invalid`] fail with `syntax error`.

mod error;
mod parser;
mod syntax;

pub use error::{Delimiter, ParseError, ParseErrorKind};
pub use parser::{Parser, ParserOptions};
pub use syntax::{SyntaxChecker, WordType};

use helena_ir::Script;
use helena_lexer::tokenize;

/// Parse a whole source string.
pub fn parse(source: &str) -> Result<Script, ParseError> {
    parse_with(source, ParserOptions::default())
}

/// Parse a whole source string with explicit options.
pub fn parse_with(source: &str, options: ParserOptions) -> Result<Script, ParseError> {
    Parser::new(options).parse_tokens(tokenize(source))
}
