//! Evaluation core for Helena.
//!
//! ```text
//! Script ──Compiler──▶ Program ──Executor + ProgramState──▶ Outcome
//! ```
//!
//! The [`Compiler`] flattens a syntax tree into a [`Program`]: opcodes plus
//! a constant pool. The [`Executor`] runs a program on an explicit frame
//! stack held in a [`ProgramState`], so script nesting never recurses on
//! the Rust stack, and a run stopped by `Yield` can be resumed later.
//!
//! Names are resolved through the embedder: variables, commands and
//! selectors all come from resolver traits.

mod command;
mod compiler;
mod errors;
mod evaluator;
mod executor;
mod outcome;
mod program;
mod resolver;
mod selector;
mod state;
pub mod value;

pub use command::{Command, CommandWithHelp, ResumableCommand};
pub use compiler::{CompileError, Compiler};
pub use errors::ValueError;
pub use evaluator::{Evaluator, EvaluatorBuilder};
pub use executor::Executor;
pub use outcome::{ErrorStack, ErrorStackLevel, Outcome, ResultCode};
pub use program::{OpCode, Program};
pub use resolver::{
    CommandResolver, GenericSelectorResolver, MapCommandResolver, MapVariableResolver,
    SelectorResolver, VariableResolver,
};
pub use selector::{CustomSelector, Keys, Selector};
pub use state::ProgramState;
pub use value::Value;
