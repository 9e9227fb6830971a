//! Runtime values.
//!
//! Values are immutable. Heap-backed variants share their payload through
//! [`Heap`], so cloning a value or deriving a new one (e.g. appending a
//! selector to a qualified value) never copies unchanged substructure.
//!
//! Every heap-backed value is built through a factory method:
//!
//! ```text
//! Value::string("hello")
//! Value::tuple(vec![Value::string("a"), Value::string("b")])
//! Value::qualified(Value::string("var"), vec![selector])
//! ```

mod display;
mod heap;

pub use heap::Heap;

use std::fmt;
use std::rc::Rc;

use helena_ir::Script;
use helena_stack::ensure_sufficient_stack;
use indexmap::IndexMap;
use smallvec::smallvec;

use crate::command::Command;
use crate::errors::ValueError;
use crate::selector::Selector;

/// A Helena runtime value.
#[derive(Clone, Default)]
pub enum Value {
    /// The absence of a value.
    #[default]
    Nil,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(Heap<String>),
    List(Heap<Vec<Value>>),
    /// String-keyed map; iteration follows insertion order.
    Dictionary(Heap<IndexMap<String, Value>>),
    /// Ordered values produced by `( ... )` or by evaluating a sentence's words.
    Tuple(Heap<Vec<Value>>),
    /// A block kept unevaluated.
    Script(Heap<ScriptValue>),
    Command(Heap<dyn Command>),
    /// A source with a chain of selectors, not yet resolved.
    Qualified(Heap<QualifiedValue>),
}

/// Payload of [`Value::Script`].
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptValue {
    pub script: Rc<Script>,
    /// Source text between the braces, when the script came from a block.
    pub source: Option<String>,
}

/// Payload of [`Value::Qualified`].
#[derive(Clone, Debug, PartialEq)]
pub struct QualifiedValue {
    source: Value,
    selectors: Vec<Selector>,
}

impl QualifiedValue {
    pub fn source(&self) -> &Value {
        &self.source
    }

    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    /// New qualified value with `selector` appended. A keyed selector
    /// following a keyed selector merges into it.
    fn with_selector(&self, selector: Selector) -> Value {
        let mut selectors = self.selectors.clone();
        match (selectors.last_mut(), selector) {
            (Some(Selector::Keyed(keys)), Selector::Keyed(more)) => keys.extend(more),
            (_, selector) => selectors.push(selector),
        }
        Value::qualified(self.source.clone(), selectors)
    }
}

// Factory methods

impl Value {
    /// Create a string value.
    ///
    /// ```text
    /// Value::string("hello")
    /// Value::string(format!("{}-{}", a, b))
    /// ```
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Heap::new(s.into()))
    }

    /// Create a list value.
    #[inline]
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(items))
    }

    /// Create a dictionary value.
    #[inline]
    pub fn dictionary(map: IndexMap<String, Value>) -> Self {
        Value::Dictionary(Heap::new(map))
    }

    /// Create a tuple value.
    ///
    /// ```text
    /// Value::tuple(vec![Value::string("cmd"), Value::Integer(1)])
    /// ```
    #[inline]
    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(Heap::new(items))
    }

    /// The empty tuple.
    #[inline]
    pub fn empty_tuple() -> Self {
        Value::tuple(Vec::new())
    }

    /// Create a script value from a parsed block.
    #[inline]
    pub fn script(script: Rc<Script>, source: Option<String>) -> Self {
        Value::Script(Heap::new(ScriptValue { script, source }))
    }

    /// Wrap a command so it can travel as a value.
    #[inline]
    pub fn command(command: Rc<dyn Command>) -> Self {
        Value::Command(Heap::from_rc(command))
    }

    /// Create a qualified value.
    #[inline]
    pub fn qualified(source: Value, selectors: Vec<Selector>) -> Self {
        Value::Qualified(Heap::new(QualifiedValue { source, selectors }))
    }
}

// Type checking

impl Value {
    /// Short lowercase name of the value's kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Dictionary(_) => "dictionary",
            Value::Tuple(_) => "tuple",
            Value::Script(_) => "script",
            Value::Command(_) => "command",
            Value::Qualified(_) => "qualified",
        }
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// The string payload, without coercion.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

// Coercions

impl Value {
    /// String form of the value.
    ///
    /// Scalars and strings always have one, scripts only when they carry
    /// their block source.
    pub fn as_string(&self) -> Result<String, ValueError> {
        match self {
            Value::String(s) => Ok(String::clone(s)),
            Value::Boolean(b) => Ok(b.to_string()),
            Value::Integer(i) => Ok(i.to_string()),
            Value::Real(r) => Ok(r.to_string()),
            Value::Script(script) => script
                .source
                .clone()
                .ok_or(ValueError::NoStringRepresentation),
            _ => Err(ValueError::NoStringRepresentation),
        }
    }

    /// Integer form: integers, integral reals, and strings that parse as
    /// a decimal integer.
    #[allow(clippy::cast_possible_truncation, reason = "range checked by is_integral")]
    pub fn as_integer(&self) -> Result<i64, ValueError> {
        match self {
            Value::Integer(i) => Ok(*i),
            Value::Real(r) if is_integral(*r) => Ok(*r as i64),
            _ => {
                let s = self.as_string()?;
                s.parse().map_err(|_| ValueError::InvalidInteger(s))
            }
        }
    }

    /// Real form: numbers, and strings that parse as a number.
    #[allow(clippy::cast_precision_loss, reason = "matches string parsing")]
    pub fn as_real(&self) -> Result<f64, ValueError> {
        match self {
            Value::Real(r) => Ok(*r),
            Value::Integer(i) => Ok(*i as f64),
            _ => {
                let s = self.as_string()?;
                s.parse().map_err(|_| ValueError::InvalidNumber(s))
            }
        }
    }

    /// Boolean form: booleans, and the strings `true` and `false`.
    pub fn as_boolean(&self) -> Result<bool, ValueError> {
        if let Value::Boolean(b) = self {
            return Ok(*b);
        }
        let s = self.as_string()?;
        match s.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(ValueError::InvalidBoolean(s)),
        }
    }

    /// Elements of a list or tuple.
    pub fn as_values(&self) -> Result<&[Value], ValueError> {
        match self {
            Value::List(items) | Value::Tuple(items) => Ok(items.as_slice()),
            _ => Err(ValueError::InvalidList),
        }
    }
}

#[allow(clippy::cast_precision_loss, clippy::float_cmp, reason = "bounds only")]
fn is_integral(r: f64) -> bool {
    let (min, max) = (i64::MIN as f64, i64::MAX as f64);
    r.is_finite() && r.fract() == 0.0 && r >= min && r < max
}

// Selection

impl Value {
    /// Apply `selector` to this value.
    ///
    /// Qualified values and tuples see the selector whole: a qualified
    /// value appends it to its chain, a tuple applies it to each element.
    /// Everything else goes through [`Selector::apply`].
    pub fn select(&self, selector: &Selector) -> Result<Value, ValueError> {
        match self {
            Value::Qualified(q) => Ok(q.with_selector(selector.clone())),
            Value::Tuple(items) => map_tuple(items, |item| item.select(selector)),
            _ => selector.apply(self),
        }
    }

    /// Select by index: a character of a string or an element of a list.
    pub fn select_index(&self, index: &Value) -> Result<Value, ValueError> {
        match self {
            Value::String(s) => {
                let i = to_index(index, s.chars().count())?;
                s.chars()
                    .nth(i)
                    .map(Value::string)
                    .ok_or_else(|| out_of_range(index))
            }
            Value::List(items) => {
                let i = to_index(index, items.len())?;
                items.get(i).cloned().ok_or_else(|| out_of_range(index))
            }
            Value::Tuple(items) => map_tuple(items, |item| item.select_index(index)),
            Value::Qualified(q) => Ok(q.with_selector(Selector::Indexed(index.clone()))),
            _ => Err(ValueError::NotIndexSelectable),
        }
    }

    /// Select one key of a dictionary.
    pub fn select_key(&self, key: &Value) -> Result<Value, ValueError> {
        match self {
            Value::Dictionary(map) => {
                let name = key.as_string()?;
                map.get(&name)
                    .cloned()
                    .ok_or(ValueError::UnknownKey(name))
            }
            Value::Tuple(items) => map_tuple(items, |item| item.select_key(key)),
            Value::Qualified(q) => Ok(q.with_selector(Selector::Keyed(smallvec![key.clone()]))),
            _ => Err(ValueError::NotKeySelectable),
        }
    }

    /// Select a sequence of keys, left to right.
    pub fn select_keys(&self, keys: &[Value]) -> Result<Value, ValueError> {
        if let Value::Qualified(q) = self {
            return Ok(q.with_selector(Selector::Keyed(keys.iter().cloned().collect())));
        }
        keys.iter()
            .try_fold(self.clone(), |value, key| value.select_key(key))
    }

    /// Select by rules. No plain value understands rules on its own; a
    /// dialect supplies them through a custom selector.
    pub fn select_rules(&self, rules: &[Value]) -> Result<Value, ValueError> {
        match self {
            Value::Tuple(items) => map_tuple(items, |item| item.select_rules(rules)),
            Value::Qualified(q) => Ok(q.with_selector(Selector::Generic(rules.to_vec()))),
            _ => Err(ValueError::NotSelectable),
        }
    }
}

fn map_tuple(
    items: &[Value],
    f: impl Fn(&Value) -> Result<Value, ValueError>,
) -> Result<Value, ValueError> {
    ensure_sufficient_stack(|| items.iter().map(&f).collect::<Result<Vec<_>, _>>())
        .map(Value::tuple)
}

fn to_index(index: &Value, len: usize) -> Result<usize, ValueError> {
    let i = index.as_integer().map_err(|e| match e {
        ValueError::NoStringRepresentation => ValueError::InvalidIndex,
        e => e,
    })?;
    usize::try_from(i)
        .ok()
        .filter(|&i| i < len)
        .ok_or_else(|| out_of_range(index))
}

fn out_of_range(index: &Value) -> ValueError {
    ValueError::IndexOutOfRange(index.as_string().unwrap_or_else(|_| index.to_string()))
}

impl PartialEq for Value {
    #[allow(clippy::float_cmp, reason = "value equality is exact")]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Real(a), Value::Real(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Dictionary(a), Value::Dictionary(b)) => a == b,
            (Value::Script(a), Value::Script(b)) => a == b,
            (Value::Command(a), Value::Command(b)) => Heap::ptr_eq(a, b),
            (Value::Qualified(a), Value::Qualified(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("Nil"),
            Value::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Value::Integer(i) => f.debug_tuple("Integer").field(i).finish(),
            Value::Real(r) => f.debug_tuple("Real").field(r).finish(),
            Value::String(s) => f.debug_tuple("String").field(&s.as_str()).finish(),
            Value::List(items) => f.debug_tuple("List").field(&**items).finish(),
            Value::Dictionary(map) => f.debug_tuple("Dictionary").field(&**map).finish(),
            Value::Tuple(items) => f.debug_tuple("Tuple").field(&**items).finish(),
            Value::Script(script) => f.debug_tuple("Script").field(&script.source).finish(),
            Value::Command(_) => f.write_str("Command(..)"),
            Value::Qualified(q) => f
                .debug_struct("Qualified")
                .field("source", &q.source)
                .field("selectors", &q.selectors)
                .finish(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(r: f64) -> Self {
        Value::Real(r)
    }
}
