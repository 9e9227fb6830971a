//! Commands: what a sentence's first word resolves to.

use std::any::Any;

use crate::outcome::Outcome;
use crate::value::Value;

/// Executable command.
///
/// `args` holds the whole sentence, command name first. `context` is the
/// opaque value the embedder gave the executor; commands downcast it to
/// reach their dialect state.
pub trait Command {
    fn execute(&self, args: &[Value], context: &dyn Any) -> Outcome;

    /// Resumable view of this command, if it supports resumption.
    fn as_resumable(&self) -> Option<&dyn ResumableCommand> {
        None
    }

    /// Help view of this command, if it provides help.
    fn as_help(&self) -> Option<&dyn CommandWithHelp> {
        None
    }
}

/// A command that may return `Yield` and be resumed later.
///
/// When a program stopped on a `Yield` from this command is executed again,
/// the executor calls [`resume`](Self::resume) with the state's current
/// result (whose value the embedder may have replaced) before continuing.
pub trait ResumableCommand: Command {
    fn resume(&self, result: Outcome, context: &dyn Any) -> Outcome;
}

/// A command that can describe its own usage.
pub trait CommandWithHelp: Command {
    fn help(&self, args: &[Value], context: &dyn Any) -> Outcome;
}
