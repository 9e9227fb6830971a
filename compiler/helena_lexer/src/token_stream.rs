//! Token cursors consumed by the parser.

use helena_ir::Token;

/// Source of tokens for the parser.
///
/// Implemented by [`crate::Tokenizer`] for streaming input and by
/// [`ArrayTokenStream`] for pre-tokenized input.
pub trait TokenStream {
    /// Next token, `None` once the stream is exhausted.
    fn advance(&mut self) -> Option<Token>;

    /// Whether the stream is exhausted.
    fn is_end(&self) -> bool;
}

/// Cursor over an already tokenized sequence.
#[derive(Clone, Debug, Default)]
pub struct ArrayTokenStream {
    tokens: Vec<Token>,
    index: usize,
}

impl ArrayTokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        ArrayTokenStream { tokens, index: 0 }
    }
}

impl TokenStream for ArrayTokenStream {
    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned()?;
        self.index += 1;
        Some(token)
    }

    fn is_end(&self) -> bool {
        self.index >= self.tokens.len()
    }
}

impl From<Vec<Token>> for ArrayTokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        ArrayTokenStream::new(tokens)
    }
}
