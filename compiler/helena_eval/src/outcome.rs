//! Command and program results.

use std::fmt;
use std::rc::Rc;

use helena_ir::{Source, SourcePosition};

use crate::value::Value;

/// How a command or program finished.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResultCode {
    #[default]
    Ok,
    Return,
    /// Suspends the program; see [`crate::ResumableCommand`].
    Yield,
    Error,
    Break,
    Continue,
    /// Dialect-defined code, compared by name.
    Custom(Rc<str>),
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultCode::Ok => f.write_str("ok"),
            ResultCode::Return => f.write_str("return"),
            ResultCode::Yield => f.write_str("yield"),
            ResultCode::Error => f.write_str("error"),
            ResultCode::Break => f.write_str("break"),
            ResultCode::Continue => f.write_str("continue"),
            ResultCode::Custom(name) => f.write_str(name),
        }
    }
}

/// One level of an error stack: where an error passed on its way out.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ErrorStackLevel {
    /// Arguments of the sentence that failed, when a command failed.
    pub frame: Option<Vec<Value>>,
    pub source: Option<Rc<Source>>,
    pub position: Option<SourcePosition>,
}

/// Levels accumulated as an error propagates outward, innermost first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ErrorStack {
    levels: Vec<ErrorStackLevel>,
}

impl ErrorStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: ErrorStackLevel) {
        self.levels.push(level);
    }

    pub fn levels(&self) -> &[ErrorStackLevel] {
        &self.levels
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Result of executing a command or a program.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outcome {
    pub code: ResultCode,
    pub value: Value,
    /// Only ever set on `Error` outcomes.
    pub error_stack: Option<ErrorStack>,
}

impl Outcome {
    pub fn new(code: ResultCode, value: Value) -> Self {
        Outcome {
            code,
            value,
            error_stack: None,
        }
    }

    #[inline]
    pub fn ok(value: Value) -> Self {
        Self::new(ResultCode::Ok, value)
    }

    /// `Ok` with no value.
    #[inline]
    pub fn nil() -> Self {
        Self::default()
    }

    /// `Error` whose value is `message` as a string.
    #[cold]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ResultCode::Error, Value::string(message))
    }

    #[inline]
    pub fn yielded(value: Value) -> Self {
        Self::new(ResultCode::Yield, value)
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        self.code == ResultCode::Ok
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.code == ResultCode::Error
    }

    /// Append `level` to the error stack, creating it if needed.
    #[must_use]
    pub fn with_level(mut self, level: ErrorStackLevel) -> Self {
        self.error_stack.get_or_insert_with(ErrorStack::new).push(level);
        self
    }
}
