//! The Helena scanner.
//!
//! One char decides the token kind:
//!
//! | char(s)                  | token                                  |
//! |--------------------------|----------------------------------------|
//! | space, tab, `\r`, `\x0C` | `Whitespace` (whole run)               |
//! | `\n`                     | `Newline`                              |
//! | `\` + newline            | `Continuation` (eats following blanks) |
//! | `\` + anything else      | `Escape`                               |
//! | `#`                      | `Comment` (whole run)                  |
//! | `"`                      | `StringDelimiter` (whole run)          |
//! | `( ) { } [ ]`            | open/close tuple, block, expression    |
//! | `$` `*` `;`              | `Dollar`, `Asterisk`, `Semicolon`      |
//! | anything else            | `Text`, merged with adjacent text      |
//!
//! Delimiter runs are not split: `##{` is one `Comment` token of length 2
//! followed by `OpenBlock`, and `"""` is one `StringDelimiter` of length 3.

use crate::escape::decode_escape;
use crate::{SourceStream, TokenStream};
use helena_ir::{SourcePosition, Token, TokenKind};

/// Incremental tokenizer.
///
/// Batch use goes through [`Tokenizer::tokenize`]. Incremental use calls
/// [`Tokenizer::begin`], then pulls tokens with [`Iterator::next`] until
/// [`Tokenizer::end`] reports completion. Both yield the same tokens.
#[derive(Debug, Default)]
pub struct Tokenizer {
    input: Option<SourceStream>,
    /// Token scanned ahead while looking for adjacent text to merge.
    pending: Option<Token>,
}

impl Tokenizer {
    pub fn new() -> Self {
        Tokenizer::default()
    }

    /// Tokenize a whole source string.
    pub fn tokenize(&mut self, source: &str) -> Vec<Token> {
        self.begin(SourceStream::new(source));
        let tokens = self.by_ref().collect();
        self.finish();
        tokens
    }

    /// Start tokenizing `input`, discarding any previous state.
    pub fn begin(&mut self, input: SourceStream) {
        self.input = Some(input);
        self.pending = None;
    }

    /// Returns `true` when no token is left.
    pub fn end(&self) -> bool {
        self.pending.is_none() && self.input.as_ref().map_or(true, SourceStream::is_eof)
    }

    /// Release the input stream.
    pub fn finish(&mut self) {
        self.input = None;
        self.pending = None;
    }

    /// Scan one raw token, without text merging.
    fn scan(&mut self) -> Option<Token> {
        let input = self.input.as_mut()?;
        let position = input.position();
        let start = position.index;
        let c = input.advance()?;
        let kind = match c {
            '\n' => TokenKind::Newline,
            '\\' => return Some(scan_escape(input, position, start)),
            '#' => {
                input.eat_while(|c| c == '#');
                TokenKind::Comment
            }
            '"' => {
                input.eat_while(|c| c == '"');
                TokenKind::StringDelimiter
            }
            '(' => TokenKind::OpenTuple,
            ')' => TokenKind::CloseTuple,
            '{' => TokenKind::OpenBlock,
            '}' => TokenKind::CloseBlock,
            '[' => TokenKind::OpenExpression,
            ']' => TokenKind::CloseExpression,
            '$' => TokenKind::Dollar,
            '*' => TokenKind::Asterisk,
            ';' => TokenKind::Semicolon,
            c if is_whitespace(c) => {
                input.eat_while(is_whitespace);
                TokenKind::Whitespace
            }
            _ => {
                input.eat_while(|c| !is_special(c));
                TokenKind::Text
            }
        };
        Some(Token::verbatim(kind, position, input.slice_from(start)))
    }
}

impl Iterator for Tokenizer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let mut token = match self.pending.take() {
            Some(token) => token,
            None => self.scan()?,
        };
        if token.kind == TokenKind::Text {
            while let Some(next) = self.scan() {
                if next.kind != TokenKind::Text {
                    self.pending = Some(next);
                    break;
                }
                token.sequence.push_str(&next.sequence);
                token.literal.push_str(&next.literal);
            }
        }
        Some(token)
    }
}

impl TokenStream for Tokenizer {
    fn advance(&mut self) -> Option<Token> {
        self.next()
    }

    fn is_end(&self) -> bool {
        self.end()
    }
}

/// Scan what follows a backslash.
fn scan_escape(input: &mut SourceStream, position: SourcePosition, start: usize) -> Token {
    let Some(c) = input.advance() else {
        // Lone backslash at end of input.
        return Token::verbatim(TokenKind::Text, position, "\\");
    };
    if c == '\n' {
        input.eat_while(is_whitespace);
        return Token::new(
            TokenKind::Continuation,
            position,
            input.slice_from(start),
            " ",
        );
    }
    let literal = decode_escape(c, input);
    Token::new(
        TokenKind::Escape,
        position,
        input.slice_from(start),
        literal.to_string(),
    )
}

/// Horizontal whitespace.
#[inline]
fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\x0C')
}

/// Chars that end a text run.
#[inline]
fn is_special(c: char) -> bool {
    is_whitespace(c)
        || matches!(
            c,
            '\n' | '\\' | '#' | '"' | '(' | ')' | '{' | '}' | '[' | ']' | '$' | '*' | ';'
        )
}
