//! Context-stack parser.
//!
//! Each token is dispatched on the kind of the innermost open context. Opening
//! delimiters push a context, closing ones pop it and hand the finished
//! morpheme to the context below. Nothing recurses, so the parser can stop
//! after any token and resume when the caller feeds more.
//!
//! Raw text (block bodies, here-strings, tagged strings, comments) is sliced
//! out of a log of every consumed token's source sequence.

mod context;

use crate::error::{Delimiter, ParseError, ParseErrorKind};
use context::{
    reindent, BlockCommentContext, Frame, LineCommentContext, MorphemeList, RawContext,
    ScriptContext, ScriptKind, StringContext, Substitution, TaggedStringContext,
};
use helena_ir::{Morpheme, MorphemeKind, Script, SourcePosition, Token, TokenKind};
use helena_lexer::{ArrayTokenStream, TokenStream};
use std::rc::Rc;
use tracing::{debug, trace};

/// Parser settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParserOptions {
    /// Attach a [`SourcePosition`] to every script, sentence, word and
    /// morpheme.
    pub capture_positions: bool,
}

impl ParserOptions {
    #[must_use]
    pub fn capture_positions(mut self, capture: bool) -> Self {
        self.capture_positions = capture;
        self
    }
}

/// What to do with the current token after a handler ran.
enum Step {
    Done,
    /// A context closed on lookahead; feed the same token to the new top.
    Reprocess,
}

/// Incremental Helena parser.
///
/// Feed tokens with [`Parser::parse`] or [`Parser::push_token`], then call
/// [`Parser::close_stream`]. A parse error is sticky: every later call
/// returns it until [`Parser::begin`] resets the parser.
pub struct Parser {
    options: ParserOptions,
    /// Innermost context last; the root script context is at the bottom.
    stack: Vec<Frame>,
    log: String,
    last_token: Option<(TokenKind, SourcePosition)>,
    failure: Option<ParseError>,
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new(ParserOptions::default())
    }
}

impl Parser {
    pub fn new(options: ParserOptions) -> Self {
        let mut parser = Parser {
            options,
            stack: Vec::new(),
            log: String::new(),
            last_token: None,
            failure: None,
        };
        parser.begin();
        parser
    }

    /// Discard any state and start a new script.
    pub fn begin(&mut self) {
        let root = self.root_frame();
        self.stack.clear();
        self.stack.push(root);
        self.log.clear();
        self.last_token = None;
        self.failure = None;
    }

    /// Parse a complete token sequence.
    pub fn parse_tokens(&mut self, tokens: Vec<Token>) -> Result<Script, ParseError> {
        self.begin();
        self.parse(&mut ArrayTokenStream::new(tokens))?;
        self.close_stream()
    }

    /// Consume every token currently available from `stream`.
    pub fn parse<S: TokenStream + ?Sized>(&mut self, stream: &mut S) -> Result<(), ParseError> {
        while let Some(token) = stream.advance() {
            self.push_token(&token)?;
        }
        Ok(())
    }

    /// Consume one token.
    pub fn push_token(&mut self, token: &Token) -> Result<(), ParseError> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        trace!(
            kind = ?token.kind,
            position = %token.position,
            depth = self.stack.len(),
            "parse token"
        );
        let start = self.log.len();
        self.log.push_str(&token.sequence);
        self.last_token = Some((token.kind, token.position));
        loop {
            match self.dispatch(token, start) {
                Ok(Step::Done) => return Ok(()),
                Ok(Step::Reprocess) => {}
                Err(kind) => return Err(self.fail(ParseError::new(kind, token.position))),
            }
        }
    }

    /// End the input and return the parsed script.
    ///
    /// When a construct is still open the parser state is kept, and the
    /// returned error is [incomplete](ParseErrorKind::is_incomplete): the
    /// caller may feed more tokens and close again. On success the parser
    /// is reset for a new script.
    pub fn close_stream(&mut self) -> Result<Script, ParseError> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        if let Some(error) = self.unclosed() {
            debug!(error = %error, position = %error.position, "incomplete script");
            return Err(error);
        }
        match self.finish_stream() {
            Ok(script) => {
                self.begin();
                Ok(script)
            }
            Err(error) => Err(self.fail(error)),
        }
    }

    #[cold]
    fn fail(&mut self, error: ParseError) -> ParseError {
        debug!(error = %error, position = %error.position, "parse failed");
        self.failure = Some(error.clone());
        error
    }

    #[inline]
    fn capture(&self, position: SourcePosition) -> Option<SourcePosition> {
        self.options.capture_positions.then_some(position)
    }

    fn root_frame(&self) -> Frame {
        let origin = SourcePosition::default();
        Frame::Script(ScriptContext::new(
            ScriptKind::Root,
            origin,
            self.capture(origin),
            0,
        ))
    }

    /// Logged source text between two offsets.
    fn raw(&self, from: usize, to: usize) -> &str {
        self.log.get(from..to).unwrap_or_default()
    }

    // === Dispatch ===

    fn dispatch(&mut self, token: &Token, start: usize) -> Result<Step, ParseErrorKind> {
        let frame = self.stack.pop().unwrap_or_else(|| self.root_frame());
        match frame {
            Frame::Script(ctx) => self.script_token(ctx, token, start),
            Frame::String(ctx) => self.string_token(ctx, token),
            Frame::QuotePair {
                opened_at,
                position,
            } => self.quote_pair_token(opened_at, position, token),
            Frame::HereString(ctx) => self.here_string_token(ctx, token, start),
            Frame::TaggedString(ctx) => self.tagged_string_token(ctx, token, start),
            Frame::LineComment(ctx) => self.line_comment_token(ctx, token, start),
            Frame::BlockComment(ctx) => self.block_comment_token(ctx, token, start),
        }
    }

    /// Hand a finished morpheme to the enclosing word or string.
    fn add_morpheme(&mut self, morpheme: Morpheme) -> Result<(), ParseErrorKind> {
        match self.stack.last_mut() {
            Some(Frame::Script(ctx)) => ctx.push_morpheme(morpheme),
            Some(Frame::String(ctx)) => {
                ctx.morphemes.push(morpheme);
                Ok(())
            }
            _ => Err(ParseErrorKind::SyntaxError),
        }
    }

    // === Scripts, tuples, blocks, expressions ===

    fn script_token(
        &mut self,
        mut ctx: ScriptContext,
        token: &Token,
        start: usize,
    ) -> Result<Step, ParseErrorKind> {
        let position = self.capture(token.position);
        match token.kind {
            TokenKind::Whitespace | TokenKind::Continuation => ctx.close_word()?,
            TokenKind::Newline | TokenKind::Semicolon => ctx.close_sentence()?,
            TokenKind::Text | TokenKind::Escape => {
                ctx.word(position)?
                    .push_literal(&token.literal, position, true);
            }
            TokenKind::Asterisk => {
                let word = ctx.word(position)?;
                if !word.expand() {
                    word.push_literal(&token.literal, position, true);
                }
            }
            TokenKind::Dollar => ctx.word(position)?.begin_substitution(position),
            TokenKind::Comment => match ctx.current_word().map(MorphemeList::is_pending) {
                None => {
                    let comment = LineCommentContext {
                        opened_at: token.position,
                        position,
                        delimiter_length: token.literal.len(),
                        raw_start: self.log.len(),
                        fresh: true,
                    };
                    self.stack.push(Frame::Script(ctx));
                    self.stack.push(Frame::LineComment(comment));
                    return Ok(Step::Done);
                }
                Some(true) => return Err(ParseErrorKind::UnexpectedCommentDelimiter),
                Some(false) => {
                    ctx.word(position)?
                        .push_literal(&token.literal, position, true);
                }
            },
            TokenKind::OpenTuple | TokenKind::OpenBlock | TokenKind::OpenExpression => {
                ctx.word(position)?;
                let kind = match token.kind {
                    TokenKind::OpenTuple => ScriptKind::Tuple,
                    TokenKind::OpenBlock => ScriptKind::Block,
                    _ => ScriptKind::Expression,
                };
                let child = ScriptContext::new(kind, token.position, position, self.log.len());
                self.stack.push(Frame::Script(ctx));
                self.stack.push(Frame::Script(child));
                return Ok(Step::Done);
            }
            TokenKind::CloseTuple | TokenKind::CloseBlock | TokenKind::CloseExpression => {
                let delimiter = match token.kind {
                    TokenKind::CloseTuple => Delimiter::Parenthesis,
                    TokenKind::CloseBlock => Delimiter::Brace,
                    _ => Delimiter::Bracket,
                };
                return match ctx.kind.delimiter() {
                    None => Err(ParseErrorKind::UnmatchedRight(delimiter)),
                    Some(expected) if expected != delimiter => {
                        Err(ParseErrorKind::MismatchedRight(delimiter))
                    }
                    Some(_) => self.close_script(ctx, start),
                };
            }
            TokenKind::StringDelimiter => {
                if ctx.current_word().is_some() {
                    return Err(ParseErrorKind::UnexpectedStringDelimiter);
                }
                let opened_at = token.position;
                let frame = match token.literal.len() {
                    1 => Frame::String(StringContext {
                        opened_at,
                        position,
                        morphemes: MorphemeList::new(),
                    }),
                    2 => Frame::QuotePair {
                        opened_at,
                        position,
                    },
                    delimiter_length => Frame::HereString(RawContext {
                        opened_at,
                        position,
                        delimiter_length,
                        raw_start: self.log.len(),
                    }),
                };
                self.stack.push(Frame::Script(ctx));
                self.stack.push(frame);
                return Ok(Step::Done);
            }
        }
        self.stack.push(Frame::Script(ctx));
        Ok(Step::Done)
    }

    fn close_script(&mut self, ctx: ScriptContext, start: usize) -> Result<Step, ParseErrorKind> {
        let position = ctx.position;
        let kind = match ctx.kind {
            ScriptKind::Tuple => MorphemeKind::Tuple(ctx.finish()?),
            ScriptKind::Expression => MorphemeKind::Expression(ctx.finish()?),
            ScriptKind::Block => {
                let value = self.raw(ctx.raw_start, start).to_string();
                MorphemeKind::Block {
                    subscript: Rc::new(ctx.finish()?),
                    value,
                }
            }
            ScriptKind::Root => return Err(ParseErrorKind::SyntaxError),
        };
        self.add_morpheme(Morpheme::new(kind, position))?;
        Ok(Step::Done)
    }

    // === Strings ===

    fn string_token(
        &mut self,
        mut ctx: StringContext,
        token: &Token,
    ) -> Result<Step, ParseErrorKind> {
        let position = self.capture(token.position);
        let morphemes = &mut ctx.morphemes;
        match token.kind {
            TokenKind::StringDelimiter => {
                if token.literal.len() > 1 {
                    return Err(ParseErrorKind::ExtraCharactersAfterStringDelimiter);
                }
                morphemes.revert_pending();
                let StringContext {
                    position,
                    morphemes,
                    ..
                } = ctx;
                self.add_morpheme(Morpheme::new(
                    MorphemeKind::String(morphemes.into_vec()),
                    position,
                ))?;
                return Ok(Step::Done);
            }
            TokenKind::Text | TokenKind::Escape => {
                morphemes.push_literal(&token.literal, position, true);
            }
            TokenKind::Asterisk => {
                if !morphemes.expand() {
                    morphemes.push_literal(&token.literal, position, true);
                }
            }
            TokenKind::Dollar => morphemes.begin_substitution(position),
            TokenKind::Comment if morphemes.is_pending() => {
                return Err(ParseErrorKind::UnexpectedCommentDelimiter);
            }
            TokenKind::OpenExpression => {
                return Ok(self.open_in_string(ctx, ScriptKind::Expression, token));
            }
            TokenKind::OpenTuple if morphemes.substitution != Substitution::None => {
                return Ok(self.open_in_string(ctx, ScriptKind::Tuple, token));
            }
            TokenKind::OpenBlock if morphemes.substitution != Substitution::None => {
                return Ok(self.open_in_string(ctx, ScriptKind::Block, token));
            }
            _ => {
                morphemes.revert_pending();
                morphemes.push_literal(&token.literal, position, false);
            }
        }
        self.stack.push(Frame::String(ctx));
        Ok(Step::Done)
    }

    fn open_in_string(&mut self, ctx: StringContext, kind: ScriptKind, token: &Token) -> Step {
        let child = ScriptContext::new(
            kind,
            token.position,
            self.capture(token.position),
            self.log.len(),
        );
        self.stack.push(Frame::String(ctx));
        self.stack.push(Frame::Script(child));
        Step::Done
    }

    fn quote_pair_token(
        &mut self,
        opened_at: SourcePosition,
        position: Option<SourcePosition>,
        token: &Token,
    ) -> Result<Step, ParseErrorKind> {
        if token.kind == TokenKind::Text {
            self.stack.push(Frame::TaggedString(TaggedStringContext {
                opened_at,
                position,
                tag: token.literal.clone(),
                body_start: None,
                tag_start: None,
            }));
            return Ok(Step::Done);
        }
        self.add_morpheme(Morpheme::new(MorphemeKind::String(Vec::new()), position))?;
        Ok(Step::Reprocess)
    }

    fn here_string_token(
        &mut self,
        ctx: RawContext,
        token: &Token,
        start: usize,
    ) -> Result<Step, ParseErrorKind> {
        if token.kind == TokenKind::StringDelimiter && token.literal.len() == ctx.delimiter_length {
            let value = self.raw(ctx.raw_start, start).to_string();
            self.add_morpheme(Morpheme::new(
                MorphemeKind::HereString {
                    value,
                    delimiter_length: ctx.delimiter_length,
                },
                ctx.position,
            ))?;
            return Ok(Step::Done);
        }
        self.stack.push(Frame::HereString(ctx));
        Ok(Step::Done)
    }

    fn tagged_string_token(
        &mut self,
        mut ctx: TaggedStringContext,
        token: &Token,
        start: usize,
    ) -> Result<Step, ParseErrorKind> {
        match ctx.body_start {
            None => {
                if token.kind == TokenKind::Newline {
                    ctx.body_start = Some(self.log.len());
                }
            }
            Some(body_start) => {
                if let Some(tag_start) = ctx.tag_start.take() {
                    if token.kind == TokenKind::StringDelimiter && token.literal.len() == 2 {
                        let value = reindent(self.raw(body_start, tag_start));
                        self.add_morpheme(Morpheme::new(
                            MorphemeKind::TaggedString {
                                value,
                                tag: ctx.tag,
                            },
                            ctx.position,
                        ))?;
                        return Ok(Step::Done);
                    }
                }
                if token.kind == TokenKind::Text && token.literal == ctx.tag {
                    ctx.tag_start = Some(start);
                }
            }
        }
        self.stack.push(Frame::TaggedString(ctx));
        Ok(Step::Done)
    }

    // === Comments ===

    fn line_comment_token(
        &mut self,
        mut ctx: LineCommentContext,
        token: &Token,
        start: usize,
    ) -> Result<Step, ParseErrorKind> {
        if ctx.fresh && token.kind == TokenKind::OpenBlock {
            self.stack.push(Frame::BlockComment(BlockCommentContext {
                opened_at: ctx.opened_at,
                position: ctx.position,
                delimiter_length: ctx.delimiter_length,
                raw_start: self.log.len(),
                nesting: 1,
                after_hash: false,
                close_start: None,
            }));
            return Ok(Step::Done);
        }
        if token.kind == TokenKind::Newline {
            self.close_line_comment(&ctx, start)?;
            return Ok(Step::Reprocess);
        }
        ctx.fresh = false;
        self.stack.push(Frame::LineComment(ctx));
        Ok(Step::Done)
    }

    fn close_line_comment(
        &mut self,
        ctx: &LineCommentContext,
        end: usize,
    ) -> Result<(), ParseErrorKind> {
        let value = self.raw(ctx.raw_start, end).to_string();
        self.add_morpheme(Morpheme::new(
            MorphemeKind::LineComment {
                value,
                delimiter_length: ctx.delimiter_length,
            },
            ctx.position,
        ))
    }

    fn block_comment_token(
        &mut self,
        mut ctx: BlockCommentContext,
        token: &Token,
        start: usize,
    ) -> Result<Step, ParseErrorKind> {
        match token.kind {
            TokenKind::Comment if token.literal.len() == ctx.delimiter_length => {
                if let Some(close_start) = ctx.close_start.take() {
                    ctx.nesting -= 1;
                    if ctx.nesting == 0 {
                        let value = self.raw(ctx.raw_start, close_start).to_string();
                        self.add_morpheme(Morpheme::new(
                            MorphemeKind::BlockComment {
                                value,
                                delimiter_length: ctx.delimiter_length,
                            },
                            ctx.position,
                        ))?;
                        return Ok(Step::Done);
                    }
                    ctx.after_hash = false;
                } else {
                    ctx.after_hash = true;
                }
            }
            TokenKind::OpenBlock => {
                if ctx.after_hash {
                    ctx.nesting += 1;
                }
                ctx.after_hash = false;
                ctx.close_start = None;
            }
            TokenKind::CloseBlock => {
                ctx.close_start = Some(start);
                ctx.after_hash = false;
            }
            _ => {
                ctx.after_hash = false;
                ctx.close_start = None;
            }
        }
        self.stack.push(Frame::BlockComment(ctx));
        Ok(Step::Done)
    }

    // === End of input ===

    /// The innermost construct that more input could still close.
    fn unclosed(&self) -> Option<ParseError> {
        for frame in self.stack.iter().rev() {
            let (kind, at) = match frame {
                Frame::LineComment(_) | Frame::QuotePair { .. } => continue,
                Frame::Script(ctx) => match ctx.kind.delimiter() {
                    Some(delimiter) => (ParseErrorKind::UnmatchedLeft(delimiter), ctx.opened_at),
                    None => break,
                },
                Frame::String(ctx) => (ParseErrorKind::UnmatchedStringDelimiter, ctx.opened_at),
                Frame::HereString(ctx) => {
                    (ParseErrorKind::UnmatchedHereStringDelimiter, ctx.opened_at)
                }
                Frame::TaggedString(ctx) => {
                    (ParseErrorKind::UnmatchedTaggedStringDelimiter, ctx.opened_at)
                }
                Frame::BlockComment(ctx) => {
                    (ParseErrorKind::UnmatchedBlockCommentDelimiter, ctx.opened_at)
                }
            };
            return Some(ParseError::new(kind, at));
        }
        match self.last_token {
            Some((TokenKind::Continuation, position)) => Some(ParseError::new(
                ParseErrorKind::UnterminatedScript,
                position,
            )),
            _ => None,
        }
    }

    /// Close the constructs that end with the input and freeze the root.
    fn finish_stream(&mut self) -> Result<Script, ParseError> {
        let end = self.last_token.map(|(_, p)| p).unwrap_or_default();
        while let Some(frame) = self.stack.pop() {
            let closed = match frame {
                Frame::LineComment(ctx) => self.close_line_comment(&ctx, self.log.len()),
                Frame::QuotePair { position, .. } => {
                    self.add_morpheme(Morpheme::new(MorphemeKind::String(Vec::new()), position))
                }
                Frame::Script(ctx) if ctx.kind == ScriptKind::Root => {
                    return ctx.finish().map_err(|kind| ParseError::new(kind, end));
                }
                _ => break,
            };
            closed.map_err(|kind| ParseError::new(kind, end))?;
        }
        Err(ParseError::new(ParseErrorKind::UnterminatedScript, end))
    }
}
