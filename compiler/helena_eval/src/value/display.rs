//! Source form of values and selectors.
//!
//! Displaying a string, tuple, qualified value or scalar yields text that
//! parses and evaluates back to an equal value. Values with no source form
//! render as a block comment such as `{#{command}#}`.

use std::fmt;

use helena_ir::{Morpheme, MorphemeKind};
use helena_parse::parse;
use helena_stack::ensure_sufficient_stack;

use super::Value;
use crate::selector::Selector;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| match self {
            Value::Nil => f.write_str("[]"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r}"),
            Value::String(s) => write_string(f, s),
            Value::List(items) => {
                f.write_str("[list ")?;
                write_tuple(f, items)?;
                f.write_str("]")
            }
            Value::Dictionary(map) => {
                f.write_str("[dict (")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write_string(f, key)?;
                    write!(f, " {value}")?;
                }
                f.write_str(")]")
            }
            Value::Tuple(items) => write_tuple(f, items),
            Value::Script(script) => match &script.source {
                Some(source) => write!(f, "{{{source}}}"),
                None => f.write_str("{#{script}#}"),
            },
            Value::Command(_) => f.write_str("{#{command}#}"),
            Value::Qualified(q) => {
                write_qualified_source(f, q.source())?;
                q.selectors().iter().try_for_each(|s| write!(f, "{s}"))
            }
        })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Indexed(index) => write!(f, "[{index}]"),
            Selector::Keyed(keys) => write_tuple(f, keys),
            Selector::Generic(rules) => {
                f.write_str("{")?;
                for (i, rule) in rules.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    match rule {
                        Value::Tuple(words) => write_words(f, words)?,
                        other => write!(f, "{other}")?,
                    }
                }
                f.write_str("}")
            }
            Selector::Custom(custom) => write!(f, "{custom}"),
        }
    }
}

fn write_tuple(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    f.write_str("(")?;
    write_words(f, items)?;
    f.write_str(")")
}

fn write_words(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// A qualified word's source is a literal, a block or a tuple: a string
/// source is written bare when it can be, as block text otherwise.
fn write_qualified_source(f: &mut fmt::Formatter<'_>, source: &Value) -> fmt::Result {
    if let Value::Tuple(items) = source {
        return write_tuple(f, items);
    }
    let Ok(text) = source.as_string() else {
        return f.write_str("{#{qualified}#}");
    };
    if is_literal_safe(&text) {
        f.write_str(&text)
    } else if is_block_safe(&text) {
        write!(f, "{{{text}}}")
    } else {
        f.write_str("{#{qualified}#}")
    }
}

/// Whether `{text}` parses back to a lone block whose text is `text`.
fn is_block_safe(text: &str) -> bool {
    let Ok(script) = parse(&format!("{{{text}}}")) else {
        return false;
    };
    let [sentence] = script.sentences.as_slice() else {
        return false;
    };
    let [word] = sentence.words.as_slice() else {
        return false;
    };
    matches!(
        word.morphemes.as_slice(),
        [Morpheme { kind: MorphemeKind::Block { value, .. }, .. }] if value == text
    )
}

/// Bare when the text reads back as a single literal, quoted otherwise.
fn write_string(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    if is_literal_safe(s) {
        return f.write_str(s);
    }
    f.write_str("\"")?;
    for c in s.chars() {
        if matches!(c, '\\' | '"' | '$' | '[') {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    f.write_str("\"")
}

fn is_literal_safe(s: &str) -> bool {
    !s.is_empty()
        && !s.chars().any(|c| {
            matches!(
                c,
                ' ' | '\t'
                    | '\r'
                    | '\x0C'
                    | '\n'
                    | '\\'
                    | '#'
                    | '"'
                    | '('
                    | ')'
                    | '{'
                    | '}'
                    | '['
                    | ']'
                    | '$'
                    | ';'
            )
        })
}
