//! Selectors: index, keys, rules, or a dialect-defined selection.
//!
//! A selector applies to a value through that value's selection
//! capabilities (`select_index`, `select_keys`, `select_rules`). Qualified
//! values and tuples intercept selection before it reaches the selector;
//! see [`Value::select`].

use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::errors::ValueError;
use crate::value::Value;

/// Keys of a keyed selector. Most chains select one or two keys.
pub type Keys = SmallVec<[Value; 2]>;

/// A dialect-defined selector.
pub trait CustomSelector: fmt::Debug + fmt::Display {
    fn apply(&self, value: &Value) -> Result<Value, ValueError>;
}

#[derive(Clone, Debug)]
pub enum Selector {
    /// `[index]`
    Indexed(Value),
    /// `(key1 key2 ...)`, never empty.
    Keyed(Keys),
    /// `{rule1; rule2}`, one tuple per rule, never empty.
    Generic(Vec<Value>),
    Custom(Rc<dyn CustomSelector>),
}

impl Selector {
    pub fn indexed(index: Value) -> Self {
        Selector::Indexed(index)
    }

    /// Keyed selector; fails with `empty selector` when `keys` is empty.
    pub fn keyed(keys: impl IntoIterator<Item = Value>) -> Result<Self, ValueError> {
        let keys: Keys = keys.into_iter().collect();
        if keys.is_empty() {
            return Err(ValueError::EmptySelector);
        }
        Ok(Selector::Keyed(keys))
    }

    /// Generic selector over rule tuples; fails with `empty selector` when
    /// `rules` is empty.
    pub fn generic(rules: Vec<Value>) -> Result<Self, ValueError> {
        if rules.is_empty() {
            return Err(ValueError::EmptySelector);
        }
        Ok(Selector::Generic(rules))
    }

    pub fn custom(selector: Rc<dyn CustomSelector>) -> Self {
        Selector::Custom(selector)
    }

    /// Apply to `value` through its selection capabilities.
    pub fn apply(&self, value: &Value) -> Result<Value, ValueError> {
        match self {
            Selector::Indexed(index) => value.select_index(index),
            Selector::Keyed(keys) => value.select_keys(keys),
            Selector::Generic(rules) => value.select_rules(rules),
            Selector::Custom(custom) => custom.apply(value),
        }
    }
}

impl PartialEq for Selector {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Selector::Indexed(a), Selector::Indexed(b)) => a == b,
            (Selector::Keyed(a), Selector::Keyed(b)) => a == b,
            (Selector::Generic(a), Selector::Generic(b)) => a == b,
            (Selector::Custom(a), Selector::Custom(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}
