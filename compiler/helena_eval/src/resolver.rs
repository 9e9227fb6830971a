//! Name resolution seams between the executor and its embedder.
//!
//! The executor never owns variables or commands. It asks three resolvers:
//!
//! | resolver              | asked with            | answers                   |
//! |-----------------------|-----------------------|---------------------------|
//! | [`VariableResolver`]  | variable name         | value, or none            |
//! | [`CommandResolver`]   | first word of sentence| command, or none          |
//! | [`SelectorResolver`]  | rule tuples           | selector, none, or error  |
//!
//! The map-backed resolvers here cover simple embeddings and tests.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::command::Command;
use crate::errors::ValueError;
use crate::selector::Selector;
use crate::value::Value;

pub trait VariableResolver {
    fn resolve(&self, name: &str) -> Option<Value>;
}

pub trait CommandResolver {
    fn resolve(&self, name: &Value) -> Option<Rc<dyn Command>>;
}

pub trait SelectorResolver {
    fn resolve(&self, rules: &[Value]) -> Result<Option<Selector>, ValueError>;
}

/// Variables in a hash map. Interior mutability lets commands that share
/// the resolver set variables while a program runs.
#[derive(Debug, Default)]
pub struct MapVariableResolver {
    variables: RefCell<FxHashMap<String, Value>>,
}

impl MapVariableResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(self, name: impl Into<String>, value: Value) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.variables.borrow_mut().insert(name.into(), value);
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        self.variables.borrow_mut().remove(name)
    }
}

impl VariableResolver for MapVariableResolver {
    fn resolve(&self, name: &str) -> Option<Value> {
        self.variables.borrow().get(name).cloned()
    }
}

/// Commands in a hash map, keyed by the string form of the command name.
#[derive(Default)]
pub struct MapCommandResolver {
    commands: RefCell<FxHashMap<String, Rc<dyn Command>>>,
}

impl MapCommandResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style register.
    #[must_use]
    pub fn with(self, name: impl Into<String>, command: Rc<dyn Command>) -> Self {
        self.register(name, command);
        self
    }

    pub fn register(&self, name: impl Into<String>, command: Rc<dyn Command>) {
        self.commands.borrow_mut().insert(name.into(), command);
    }
}

impl CommandResolver for MapCommandResolver {
    fn resolve(&self, name: &Value) -> Option<Rc<dyn Command>> {
        let name = name.as_string().ok()?;
        self.commands.borrow().get(&name).cloned()
    }
}

/// Default selector resolver: every non-empty rule list becomes a
/// [`Selector::Generic`].
#[derive(Clone, Copy, Debug, Default)]
pub struct GenericSelectorResolver;

impl SelectorResolver for GenericSelectorResolver {
    fn resolve(&self, rules: &[Value]) -> Result<Option<Selector>, ValueError> {
        Selector::generic(rules.to_vec()).map(Some)
    }
}
