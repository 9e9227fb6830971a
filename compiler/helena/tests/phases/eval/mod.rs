//! Compiler and executor phase tests, driven through the test dialect.

use std::rc::Rc;

use helena::{
    CommandResolver, Compiler, GenericSelectorResolver, MapVariableResolver, OpCode, Outcome, ProgramState,
    ResultCode, Selector, Value, ValueError,
};
use pretty_assertions::assert_eq;

use crate::common::{parse_ok, Dialect};

// === Substitution ===

#[test]
fn variable_substitution() {
    let dialect = Dialect::new();
    dialect.variables.set("var", Value::string("val"));

    let script = parse_ok("$var");
    let program = Compiler::new().compile_word(&script.sentences[0].words[0]).unwrap();
    assert_eq!(program.op_codes(), &[OpCode::PushConstant, OpCode::ResolveValue]);

    assert_eq!(
        dialect.run("echo $var"),
        Outcome::ok(Value::tuple(vec![Value::string("val")]))
    );
}

#[test]
fn unknown_variable_is_an_error() {
    let dialect = Dialect::new();
    assert_eq!(dialect.run_error("echo $var"), "cannot resolve variable \"var\"");
}

#[test]
fn unknown_command_is_an_error() {
    let dialect = Dialect::new();
    assert_eq!(dialect.run_error("nope 1 2"), "cannot resolve command \"nope\"");
}

#[test]
fn set_then_read_back() {
    let dialect = Dialect::new();
    assert_eq!(dialect.run_ok("set x 12; join < $x >"), Value::string("<12>"));
}

#[test]
fn indirect_substitution() {
    let dialect = Dialect::new();
    dialect.variables.set("name", Value::string("target"));
    dialect.variables.set("target", Value::string("hit"));
    assert_eq!(dialect.run_ok("join $$name"), Value::string("hit"));
}

#[test]
fn expansion_splices_tuples() {
    let dialect = Dialect::new();
    dialect.variables.set(
        "args",
        Value::tuple(vec![Value::string("a"), Value::string("b")]),
    );
    assert_eq!(
        dialect.run_ok("echo x $*args y"),
        Value::tuple(vec![
            Value::string("x"),
            Value::string("a"),
            Value::string("b"),
            Value::string("y"),
        ])
    );
}

#[test]
fn expression_substitution() {
    let dialect = Dialect::new();
    assert_eq!(dialect.run_ok("join [join a b]c"), Value::string("abc"));
}

// === Selection ===

#[test]
fn keyed_selection_on_dictionary() {
    let dialect = Dialect::new();
    let dict = [("key".to_string(), Value::string("value"))]
        .into_iter()
        .collect();
    dialect.variables.set("d", Value::dictionary(dict));
    assert_eq!(dialect.run_ok("join $d(key)"), Value::string("value"));
    assert_eq!(dialect.run_error("join $d(other)"), "unknown key \"other\"");
}

#[test]
fn indexed_selection_on_list() {
    let dialect = Dialect::new();
    dialect.variables.set(
        "l",
        Value::list(vec![Value::string("a"), Value::string("b")]),
    );
    assert_eq!(dialect.run_ok("join $l[join 1]"), Value::string("b"));
    assert_eq!(dialect.run_error("join $l[join 5]"), "index out of range \"5\"");
}

#[test]
fn qualified_word_keeps_its_selectors() {
    let dialect = Dialect::new();
    let outcome = dialect.run_ok("echo varname(key)");
    let Value::Tuple(items) = outcome else {
        panic!("expected a tuple");
    };
    let Value::Qualified(qualified) = &items[0] else {
        panic!("expected a qualified value, got {}", items[0]);
    };
    assert_eq!(qualified.source(), &Value::string("varname"));
    assert_eq!(
        qualified.selectors(),
        &[Selector::keyed(vec![Value::string("key")]).unwrap()]
    );
}

#[test]
fn rules_without_custom_resolver_stay_generic() {
    let evaluator = helena::Evaluator::builder()
        .variable_resolver(Rc::new(
            MapVariableResolver::new().with("v", Value::string("x")),
        ))
        .selector_resolver(Rc::new(GenericSelectorResolver))
        .build();
    let outcome = helena::evaluate_word(&evaluator, "$v{first}");
    assert_eq!(outcome.code, ResultCode::Error);
    assert_eq!(
        outcome.value,
        Value::string(ValueError::NotSelectable.to_string())
    );
}

// === Control flow ===

#[test]
fn repeat_runs_its_block() {
    let dialect = Dialect::new();
    assert_eq!(dialect.run_ok("repeat 10 {count foo}"), Value::Integer(10));
    assert_eq!(*dialect.counter.calls.borrow(), vec!["foo".to_string(); 10]);
}

#[test]
fn error_stops_the_script() {
    let dialect = Dialect::new();
    assert_eq!(dialect.run_error("count a; fail boom; count b"), "boom");
    assert_eq!(*dialect.counter.calls.borrow(), vec!["a".to_string()]);
}

#[test]
fn error_stack_tracks_nesting() {
    let dialect = Dialect::new();
    let outcome = dialect.run("repeat 1 {repeat 1 {fail deep}}");
    assert_eq!(outcome.code, ResultCode::Error);
    let stack = outcome.error_stack.expect("error stack");
    assert_eq!(stack.depth(), 3);
    let innermost = stack.levels()[0].frame.as_deref().expect("command frame");
    assert_eq!(innermost, &[Value::string("fail"), Value::string("deep")]);
}

#[test]
fn help_is_an_optional_capability() {
    let dialect = Dialect::new();
    let set = dialect
        .commands
        .resolve(&Value::string("set"))
        .expect("set is registered");
    let help = set.as_help().expect("set has help");
    assert_eq!(
        help.help(&[], &()).value,
        Value::string("set varname value")
    );
    let echo = dialect.commands.resolve(&Value::string("echo")).expect("echo");
    assert!(echo.as_help().is_none());
}

#[test]
fn non_resumable_yield_passes_value_through() {
    let dialect = Dialect::new();
    let script = parse_ok("yield first; join done");
    let program = dialect.evaluator.compiler().compile_script(&script).unwrap();
    let mut state = ProgramState::new();

    let outcome = dialect.evaluator.execute(&program, &mut state);
    assert_eq!(outcome, Outcome::yielded(Value::string("first")));
    let outcome = dialect.evaluator.execute(&program, &mut state);
    assert_eq!(outcome, Outcome::ok(Value::string("done")));
}
