//! Helena core.
//!
//! ```text
//! source ──tokenize──▶ tokens ──Parser──▶ Script ──Compiler──▶ Program
//!                                                                │
//!                        Outcome ◀──Executor + ProgramState──────┘
//! ```
//!
//! This crate re-exports the pipeline stages and adds a few one-call
//! helpers. Embedders supply variables, commands and selectors through the
//! resolver traits; the core itself performs no I/O.

use std::sync::Once;

pub use helena_eval::value::{self, Heap, QualifiedValue, ScriptValue};
pub use helena_eval::{
    Command, CommandResolver, CommandWithHelp, CompileError, Compiler, CustomSelector,
    ErrorStack, ErrorStackLevel, Evaluator, EvaluatorBuilder, Executor, GenericSelectorResolver,
    Keys, MapCommandResolver, MapVariableResolver, OpCode, Outcome, Program, ProgramState,
    ResultCode, ResumableCommand, Selector, SelectorResolver, Value, ValueError,
    VariableResolver,
};
pub use helena_ir::{
    ast, Morpheme, MorphemeKind, Script, Sentence, Source, SourcePosition, Token, TokenKind,
    Word,
};
pub use helena_lexer::{tokenize, ArrayTokenStream, SourceStream, TokenStream, Tokenizer};
pub use helena_parse::{
    parse, parse_with, Delimiter, ParseError, ParseErrorKind, Parser, ParserOptions,
    SyntaxChecker, WordType,
};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=helena_eval=debug` or `RUST_LOG=helena_parse=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Parse `source` as a single word and evaluate it.
///
/// Anything other than exactly one word is an `Error` outcome.
pub fn evaluate_word(evaluator: &Evaluator, source: &str) -> Outcome {
    let script = match parse(source) {
        Ok(script) => script,
        Err(e) => return Outcome::error(e.to_string()),
    };
    match script.sentences.as_slice() {
        [sentence] if sentence.words.len() == 1 => evaluator.evaluate_word(&sentence.words[0]),
        _ => Outcome::error("expected a single word"),
    }
}
