//! Displayed values read back as equal values.

use helena::{evaluate_word, Evaluator, Outcome, ResultCode, Selector, Value};
use pretty_assertions::assert_eq;

fn read_back(value: &Value) -> Outcome {
    let evaluator = Evaluator::builder().build();
    evaluate_word(&evaluator, &value.to_string())
}

#[test]
fn strings_needing_quotes() {
    for text in ["", "a b", "$x", "[cmd]", "say \"hi\"", "{block}", "a;b", "#tag"] {
        let value = Value::string(text);
        assert_eq!(read_back(&value), Outcome::ok(value), "{text:?}");
    }
}

#[test]
fn nested_tuples() {
    let value = Value::tuple(vec![
        Value::string("a"),
        Value::tuple(vec![Value::string("b c"), Value::empty_tuple()]),
    ]);
    assert_eq!(read_back(&value), Outcome::ok(value));
}

#[test]
fn scripts_read_back_as_scripts() {
    let evaluator = Evaluator::builder().build();
    let outcome = evaluate_word(&evaluator, "{cmd $x}");
    assert_eq!(outcome.code, ResultCode::Ok);
    assert_eq!(outcome.value.to_string(), "{cmd $x}");
    assert_eq!(read_back(&outcome.value).value.to_string(), "{cmd $x}");
}

#[test]
fn qualified_with_block_source() {
    let evaluator = Evaluator::builder().build();
    let outcome = evaluate_word(&evaluator, "{a b}(k)");
    let expected = Value::qualified(
        Value::string("a b"),
        vec![Selector::keyed(vec![Value::string("k")]).unwrap()],
    );
    assert_eq!(outcome, Outcome::ok(expected.clone()));
    assert_eq!(expected.to_string(), "{a b}(k)");
    assert_eq!(read_back(&expected), Outcome::ok(expected));
}

#[test]
fn chained_keys_merge_and_read_back() {
    let evaluator = Evaluator::builder().build();
    let outcome = evaluate_word(&evaluator, "x(a)(b)");
    assert_eq!(outcome.code, ResultCode::Ok);
    assert_eq!(outcome.value.to_string(), "x(a b)");
    assert_eq!(read_back(&outcome.value), outcome);
}

#[test]
fn qualified_with_tuple_and_quoted_keys() {
    let value = Value::qualified(
        Value::tuple(vec![Value::string("a"), Value::string("b c")]),
        vec![Selector::keyed(vec![Value::string("k 1"), Value::string("$k")]).unwrap()],
    );
    assert_eq!(read_back(&value), Outcome::ok(value));
}

#[test]
fn scalars_read_back_through_coercions() {
    for b in [true, false] {
        assert_eq!(read_back(&Value::Boolean(b)).value.as_boolean(), Ok(b));
    }
    for r in [0.5, -2.25, 1e300, 3.0] {
        assert_eq!(read_back(&Value::Real(r)).value.as_real(), Ok(r));
    }
}

#[test]
fn more_than_one_word_is_rejected() {
    let evaluator = Evaluator::builder().build();
    assert_eq!(
        evaluate_word(&evaluator, "a b"),
        Outcome::error("expected a single word")
    );
}

#[allow(clippy::disallowed_types, reason = "proptest macros internally use Arc")]
mod proptest_display {
    use super::*;
    use proptest::prelude::*;

    fn leaf() -> impl Strategy<Value = Value> {
        "[a-z0-9 $\"\\[\\]{}();#\\\\]{0,8}".prop_map(Value::string)
    }

    /// Source text a qualified word can carry: bare literal or block text.
    fn source_text() -> impl Strategy<Value = Value> {
        "[a-z0-9 $;]{0,8}(\\{[a-z $]{0,4}\\})?".prop_map(Value::string)
    }

    fn qualified() -> impl Strategy<Value = Value> {
        let source = prop_oneof![
            source_text(),
            prop::collection::vec(leaf(), 0..3).prop_map(Value::tuple),
        ];
        let keys = prop::collection::vec(leaf(), 1..3);
        (source, keys).prop_map(|(source, keys)| {
            let selector = Selector::keyed(keys).expect("keys are never empty");
            Value::qualified(source, vec![selector])
        })
    }

    fn tree() -> impl Strategy<Value = Value> {
        prop_oneof![3 => leaf(), 1 => qualified()].prop_recursive(3, 24, 4, |inner| {
            prop::collection::vec(inner, 0..4).prop_map(Value::tuple)
        })
    }

    proptest! {
        #[test]
        fn display_reads_back(value in tree()) {
            prop_assert_eq!(read_back(&value), Outcome::ok(value));
        }

        #[test]
        fn scalars_read_back(b in any::<bool>(), r in -1e12f64..1e12) {
            prop_assert_eq!(read_back(&Value::Boolean(b)).value.as_boolean(), Ok(b));
            prop_assert_eq!(read_back(&Value::Real(r)).value.as_real(), Ok(r));
        }
    }
}
