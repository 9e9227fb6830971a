//! Compile-and-execute front end.
//!
//! [`Evaluator`] pairs a [`Compiler`] with an [`Executor`] and converts
//! every failure, including a panic inside a command, into an `Error`
//! outcome, so nothing escapes to the embedder as a Rust error.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use helena_ir::{Script, Sentence, Source, Word};
use helena_parse::{parse_with, ParserOptions};
use tracing::{debug, warn};

use crate::compiler::{CompileError, Compiler};
use crate::executor::Executor;
use crate::outcome::{ErrorStackLevel, Outcome};
use crate::program::Program;
use crate::resolver::{
    CommandResolver, GenericSelectorResolver, MapCommandResolver, MapVariableResolver,
    SelectorResolver, VariableResolver,
};
use crate::state::ProgramState;
use crate::value::Value;

/// Builder for [`Evaluator`].
///
/// Resolvers left unset default to empty maps and
/// [`GenericSelectorResolver`]; the context defaults to `()`.
#[derive(Default)]
pub struct EvaluatorBuilder {
    variable_resolver: Option<Rc<dyn VariableResolver>>,
    command_resolver: Option<Rc<dyn CommandResolver>>,
    selector_resolver: Option<Rc<dyn SelectorResolver>>,
    context: Option<Rc<dyn Any>>,
    source: Option<Rc<Source>>,
    capture_positions: bool,
}

impl EvaluatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn variable_resolver(mut self, r: Rc<dyn VariableResolver>) -> Self {
        self.variable_resolver = Some(r);
        self
    }

    #[must_use]
    pub fn command_resolver(mut self, r: Rc<dyn CommandResolver>) -> Self {
        self.command_resolver = Some(r);
        self
    }

    #[must_use]
    pub fn selector_resolver(mut self, r: Rc<dyn SelectorResolver>) -> Self {
        self.selector_resolver = Some(r);
        self
    }

    /// Set the opaque context handed to every command.
    #[must_use]
    pub fn context(mut self, context: Rc<dyn Any>) -> Self {
        self.context = Some(context);
        self
    }

    /// Attach a source descriptor to every compiled program, for error
    /// stacks.
    #[must_use]
    pub fn source(mut self, source: Rc<Source>) -> Self {
        self.source = Some(source);
        self
    }

    /// Record source positions when parsing in
    /// [`Evaluator::evaluate_source`].
    #[must_use]
    pub fn capture_positions(mut self, capture: bool) -> Self {
        self.capture_positions = capture;
        self
    }

    pub fn build(self) -> Evaluator {
        let compiler = match self.source {
            Some(source) => Compiler::with_source(source),
            None => Compiler::new(),
        };
        let executor = Executor::new(
            self.variable_resolver
                .unwrap_or_else(|| Rc::new(MapVariableResolver::new())),
            self.command_resolver
                .unwrap_or_else(|| Rc::new(MapCommandResolver::new())),
            self.selector_resolver
                .unwrap_or_else(|| Rc::new(GenericSelectorResolver)),
            self.context.unwrap_or_else(|| Rc::new(())),
        );
        Evaluator {
            compiler,
            executor,
            parser_options: ParserOptions::default().capture_positions(self.capture_positions),
        }
    }
}

/// Compiles and runs scripts, sentences and words to an [`Outcome`].
pub struct Evaluator {
    compiler: Compiler,
    executor: Executor,
    parser_options: ParserOptions,
}

impl Evaluator {
    pub fn builder() -> EvaluatorBuilder {
        EvaluatorBuilder::new()
    }

    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Parse `text` and evaluate it as a script. Parse failures become
    /// `Error` outcomes carrying the parser's message.
    pub fn evaluate_source(&self, text: &str) -> Outcome {
        match parse_with(text, self.parser_options) {
            Ok(script) => self.evaluate_script(&script),
            Err(e) => {
                debug!(error = %e, "parse failed");
                Outcome::error(e.to_string()).with_level(ErrorStackLevel {
                    frame: None,
                    source: self.compiler.source().cloned(),
                    position: Some(e.position),
                })
            }
        }
    }

    pub fn evaluate_script(&self, script: &Script) -> Outcome {
        self.guarded(|| self.compiler.compile_script(script))
    }

    pub fn evaluate_sentence(&self, sentence: &Sentence) -> Outcome {
        self.guarded(|| self.compiler.compile_sentence(sentence))
    }

    pub fn evaluate_word(&self, word: &Word) -> Outcome {
        self.guarded(|| self.compiler.compile_word(word))
    }

    /// Value of `word`, as a tuple of all words when given sentences.
    pub fn evaluate_sentences(&self, sentences: &[Sentence]) -> Outcome {
        self.guarded(|| self.compiler.compile_sentences(sentences))
    }

    /// Run an already compiled program from `state`. Call again with the
    /// same state to resume after a `Yield`.
    pub fn execute(&self, program: &Program, state: &mut ProgramState) -> Outcome {
        catch_unwind(AssertUnwindSafe(|| self.executor.execute(program, state)))
            .unwrap_or_else(|payload| internal_error(payload.as_ref()))
    }

    /// Shorthand for executing a fresh state, used by commands that
    /// evaluate a script value.
    pub fn evaluate_value(&self, value: &Value) -> Outcome {
        match value {
            Value::Script(script) => self.evaluate_script(&script.script),
            other => {
                let program = self.compiler.compile_constant(other.clone());
                self.execute(&program, &mut ProgramState::new())
            }
        }
    }

    fn guarded(&self, compile: impl FnOnce() -> Result<Program, CompileError>) -> Outcome {
        let run = || match compile() {
            Ok(program) => self.executor.execute(&program, &mut ProgramState::new()),
            Err(e) => {
                debug!(error = %e, "compile failed");
                Outcome::error(e.to_string()).with_level(ErrorStackLevel {
                    frame: None,
                    source: self.compiler.source().cloned(),
                    position: e.position(),
                })
            }
        };
        catch_unwind(AssertUnwindSafe(run)).unwrap_or_else(|payload| internal_error(payload.as_ref()))
    }
}

#[cold]
fn internal_error(payload: &(dyn Any + Send)) -> Outcome {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    warn!(%message, "internal error");
    Outcome::error(format!("internal error: {message}"))
}

#[cfg(test)]
mod tests;
