use std::cell::{Cell, RefCell};
use std::rc::Weak;

use super::*;
use crate::command::Command;
use crate::outcome::ResultCode;
use helena_ir::{Morpheme, MorphemeKind, SourcePosition};
use helena_parse::parse;
use pretty_assertions::assert_eq;

/// `repeat N {body}`: evaluates `body` N times through the evaluator.
struct Repeat {
    evaluator: Weak<Evaluator>,
}

impl Command for Repeat {
    fn execute(&self, args: &[Value], _context: &dyn Any) -> Outcome {
        let (Some(count), Some(body)) = (args.get(1), args.get(2)) else {
            return Outcome::error("wrong # args");
        };
        let count = match count.as_integer() {
            Ok(count) => count,
            Err(e) => return Outcome::error(e.to_string()),
        };
        let Some(evaluator) = self.evaluator.upgrade() else {
            return Outcome::error("evaluator is gone");
        };
        let mut last = Outcome::nil();
        for _ in 0..count {
            last = evaluator.evaluate_value(body);
            if !last.is_ok() {
                break;
            }
        }
        last
    }
}

/// Records each call's argument and returns the call count.
#[derive(Default)]
struct Counter {
    calls: RefCell<Vec<String>>,
    count: Cell<i64>,
}

impl Command for Counter {
    fn execute(&self, args: &[Value], _context: &dyn Any) -> Outcome {
        self.count.set(self.count.get() + 1);
        let arg = args.get(1).map(ToString::to_string).unwrap_or_default();
        self.calls.borrow_mut().push(arg);
        Outcome::ok(Value::Integer(self.count.get()))
    }
}

struct Panic;

impl Command for Panic {
    fn execute(&self, _args: &[Value], _context: &dyn Any) -> Outcome {
        panic!("command blew up")
    }
}

fn evaluator_with(commands: &Rc<MapCommandResolver>) -> Rc<Evaluator> {
    let commands = Rc::clone(commands);
    Rc::new_cyclic(|weak: &Weak<Evaluator>| {
        commands.register(
            "repeat",
            Rc::new(Repeat {
                evaluator: weak.clone(),
            }),
        );
        Evaluator::builder()
            .variable_resolver(Rc::new(
                MapVariableResolver::new().with("var", Value::string("value")),
            ))
            .command_resolver(commands)
            .build()
    })
}

fn script(source: &str) -> Script {
    match parse(source) {
        Ok(script) => script,
        Err(e) => panic!("parse of {source:?} failed: {e}"),
    }
}

// === Scripts ===

#[test]
fn repeat_reevaluates_its_block() {
    let counter = Rc::new(Counter::default());
    let commands = Rc::new(MapCommandResolver::new());
    commands.register("cmd", Rc::clone(&counter) as Rc<dyn Command>);
    let evaluator = evaluator_with(&commands);

    let outcome = evaluator.evaluate_script(&script("repeat 10 {cmd foo}"));

    assert_eq!(outcome, Outcome::ok(Value::Integer(10)));
    assert_eq!(*counter.calls.borrow(), vec!["foo".to_string(); 10]);
}

#[test]
fn repeat_stops_on_error() {
    let commands = Rc::new(MapCommandResolver::new());
    let evaluator = evaluator_with(&commands);
    let outcome = evaluator.evaluate_script(&script("repeat 3 {nope}"));
    assert_eq!(outcome.code, ResultCode::Error);
    assert_eq!(outcome.value, Value::string("cannot resolve command \"nope\""));
    // inner level from the block, outer level from `repeat`
    assert_eq!(outcome.error_stack.map(|s| s.depth()), Some(2));
}

#[test]
fn evaluate_source_parses_first() {
    let evaluator = evaluator_with(&Rc::new(MapCommandResolver::new()));
    assert_eq!(
        evaluator.evaluate_source("repeat 2 $var"),
        Outcome::ok(Value::string("value"))
    );
}

#[test]
fn parse_errors_become_error_outcomes() {
    let evaluator = Evaluator::builder().build();
    for (source, message) in [
        ("{", "unmatched left brace"),
        ("}", "unmatched right brace"),
        ("(}", "mismatched right brace"),
    ] {
        let outcome = evaluator.evaluate_source(source);
        assert_eq!(outcome.code, ResultCode::Error);
        assert_eq!(outcome.value, Value::string(message));
    }
}

#[test]
fn captured_positions_reach_the_error_stack() {
    let source = Rc::new(Source::from_content("\n  $missing"));
    let evaluator = Evaluator::builder()
        .source(Rc::clone(&source))
        .capture_positions(true)
        .build();
    let outcome = evaluator.evaluate_source("\n  $missing");
    let Some(stack) = outcome.error_stack else {
        panic!("expected an error stack");
    };
    let level = &stack.levels()[0];
    assert_eq!(level.source.as_ref(), Some(&source));
    assert_eq!(level.position, Some(SourcePosition::new(3, 1, 2)));
}

// === Sentences and words ===

#[test]
fn evaluate_sentence_and_word() {
    let counter = Rc::new(Counter::default());
    let commands = Rc::new(MapCommandResolver::new());
    commands.register("cmd", Rc::clone(&counter) as Rc<dyn Command>);
    let evaluator = evaluator_with(&commands);
    let parsed = script("cmd $var");

    let outcome = evaluator.evaluate_sentence(&parsed.sentences[0]);
    assert_eq!(outcome, Outcome::ok(Value::Integer(1)));
    assert_eq!(*counter.calls.borrow(), vec!["value".to_string()]);

    let outcome = evaluator.evaluate_word(&parsed.sentences[0].words[1]);
    assert_eq!(outcome, Outcome::ok(Value::string("value")));
}

#[test]
fn evaluate_sentences_collects_words() {
    let evaluator = Evaluator::builder().build();
    let parsed = script("a b\nc");
    let outcome = evaluator.evaluate_sentences(&parsed.sentences);
    assert_eq!(outcome.value.to_string(), "(a b c)");
}

#[test]
fn evaluate_value_of_plain_value() {
    let evaluator = Evaluator::builder().build();
    assert_eq!(
        evaluator.evaluate_value(&Value::Integer(4)),
        Outcome::ok(Value::Integer(4))
    );
}

// === Failure isolation ===

#[test]
fn invalid_word_structure() {
    let evaluator = Evaluator::builder().build();
    let word = Word::new(
        vec![
            Morpheme::bare(MorphemeKind::String(Vec::new())),
            Morpheme::literal("x"),
        ],
        None,
    );
    let outcome = evaluator.evaluate_word(&word);
    assert_eq!(outcome.code, ResultCode::Error);
    assert_eq!(outcome.value, Value::string("invalid word structure"));
}

#[test]
fn panics_become_internal_errors() {
    let evaluator = Evaluator::builder()
        .command_resolver(Rc::new(MapCommandResolver::new().with("boom", Rc::new(Panic))))
        .build();
    let outcome = evaluator.evaluate_script(&script("boom"));
    assert_eq!(outcome.code, ResultCode::Error);
    assert_eq!(
        outcome.value,
        Value::string("internal error: command blew up")
    );
}

#[test]
fn execute_resumes_through_the_evaluator() {
    let evaluator = Evaluator::builder()
        .command_resolver(Rc::new(
            MapCommandResolver::new().with("pause", Rc::new(Pause)),
        ))
        .build();
    let program = match evaluator.compiler().compile_script(&script("pause; pause")) {
        Ok(program) => program,
        Err(e) => panic!("{e}"),
    };
    let mut state = ProgramState::new();
    assert_eq!(evaluator.execute(&program, &mut state).code, ResultCode::Yield);
    assert_eq!(evaluator.execute(&program, &mut state).code, ResultCode::Yield);
    assert_eq!(
        evaluator.execute(&program, &mut state),
        Outcome::ok(Value::string("paused"))
    );
}

struct Pause;

impl Command for Pause {
    fn execute(&self, _args: &[Value], _context: &dyn Any) -> Outcome {
        Outcome::yielded(Value::string("paused"))
    }
}

#[allow(clippy::disallowed_types, reason = "proptest macros internally use Arc")]
mod proptest_round_trip {
    use super::*;
    use crate::selector::Selector;
    use proptest::prelude::*;

    fn evaluate_display(value: &Value) -> Outcome {
        let evaluator = Evaluator::builder().build();
        let text = value.to_string();
        let parsed = script(&text);
        evaluator.evaluate_word(&parsed.sentences[0].words[0])
    }

    proptest! {
        #[test]
        fn strings_round_trip(s in "\\PC{1,24}") {
            let value = Value::string(s);
            prop_assert_eq!(evaluate_display(&value), Outcome::ok(value));
        }

        #[test]
        fn tuples_round_trip(items in prop::collection::vec("[a-z$ \"\\[\\]]{1,6}", 0..5)) {
            let value = Value::tuple(items.into_iter().map(Value::string).collect());
            prop_assert_eq!(evaluate_display(&value), Outcome::ok(value));
        }

        #[test]
        fn integers_round_trip(i in any::<i64>()) {
            let outcome = evaluate_display(&Value::Integer(i));
            prop_assert_eq!(outcome.value.as_integer(), Ok(i));
        }

        #[test]
        fn booleans_and_reals_round_trip(b in any::<bool>(), r in -1e9f64..1e9) {
            prop_assert_eq!(evaluate_display(&Value::Boolean(b)).value.as_boolean(), Ok(b));
            prop_assert_eq!(evaluate_display(&Value::Real(r)).value.as_real(), Ok(r));
        }

        #[test]
        fn qualified_round_trip(
            source in "[a-z $;]{0,10}",
            keys in prop::collection::vec("[a-z \"$]{0,4}", 1..4),
        ) {
            let keys = keys.into_iter().map(Value::string);
            let selector = match Selector::keyed(keys) {
                Ok(selector) => selector,
                Err(e) => panic!("{e}"),
            };
            let value = Value::qualified(Value::string(source), vec![selector]);
            prop_assert_eq!(evaluate_display(&value), Outcome::ok(value));
        }
    }
}
