//! Shared test utilities for phase tests.
//!
//! A small test dialect: `set`, `get`, `echo`, `join`, `repeat`, `count`,
//! `fail`, `ask` and `yield`, all backed by one [`MapVariableResolver`].

mod dialect;

pub use dialect::*;

use helena::{parse, Script};

/// Parse `source`, failing the test on a parse error.
pub fn parse_ok(source: &str) -> Script {
    helena::init_tracing();
    parse(source).unwrap_or_else(|e| panic!("parse of {source:?} failed: {e}"))
}
