//! Stack growth guard for the few places where the Helena core recurses.
//!
//! Script structure never recurses: the executor walks a flat opcode list.
//! What does recurse is driven by data, not by syntax:
//!
//! - resolving a tuple of variable names, which descends into nested tuples;
//! - rendering a value back to source text;
//! - a command that compiles and evaluates a nested script, which re-enters
//!   the evaluator from inside a running program.
//!
//! Each of these walks wraps its recursive step in [`ensure_sufficient_stack`]
//! so that pathological input (a tuple nested thousands of levels deep, or a
//! command recursing through the evaluator) grows the stack instead of
//! aborting the embedding process.
//!
//! - **Red zone**: 64KB. Below this much remaining stack, a new segment is allocated.
//! - **Segment size**: 1MB per growth.

/// Remaining stack below which a new segment is allocated.
const RED_ZONE: usize = 64 * 1024;

/// Size of each newly allocated stack segment.
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
///
/// ```text
/// fn resolve(&self, value: &Value) -> Result<Value, ValueError> {
///     ensure_sufficient_stack(|| match value {
///         Value::Tuple(items) => items.iter().map(|v| self.resolve(v)).collect(),
///         _ => self.lookup(value),
///     })
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM manages its own stack; call through.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
