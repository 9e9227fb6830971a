//! Value-level failures.
//!
//! Every message is the exact text that reaches the script as the value of
//! an ERROR result.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    #[error("invalid index")]
    InvalidIndex,
    #[error("index out of range \"{0}\"")]
    IndexOutOfRange(String),
    #[error("unknown key \"{0}\"")]
    UnknownKey(String),
    #[error("empty selector")]
    EmptySelector,
    #[error("value is not index-selectable")]
    NotIndexSelectable,
    #[error("value is not key-selectable")]
    NotKeySelectable,
    #[error("value is not selectable")]
    NotSelectable,
    #[error("value has no string representation")]
    NoStringRepresentation,
    #[error("invalid integer \"{0}\"")]
    InvalidInteger(String),
    #[error("invalid number \"{0}\"")]
    InvalidNumber(String),
    #[error("invalid boolean \"{0}\"")]
    InvalidBoolean(String),
    #[error("invalid list")]
    InvalidList,
    #[error("invalid variable name")]
    InvalidVariableName,
    #[error("invalid command name")]
    InvalidCommandName,
    #[error("cannot resolve variable \"{0}\"")]
    UnresolvedVariable(String),
    #[error("cannot resolve command \"{0}\"")]
    UnresolvedCommand(String),
    /// Carries the rules in source form, braces included.
    #[error("cannot resolve selector {0}")]
    UnresolvedSelector(String),
    /// Message from a dialect's resolver or selector.
    #[error("{0}")]
    Custom(String),
}

impl ValueError {
    /// Create a dialect-defined error.
    #[cold]
    pub fn custom(message: impl Into<String>) -> Self {
        ValueError::Custom(message.into())
    }
}
