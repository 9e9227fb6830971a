//! Yield and resume across separate executions.

use helena::{Outcome, ProgramState, ResultCode, Value};
use pretty_assertions::assert_eq;

use crate::common::{parse_ok, Dialect};

#[test]
fn resumable_command_receives_the_resume_value() {
    let dialect = Dialect::new();
    let program = dialect
        .evaluator
        .compiler()
        .compile_script(&parse_ok("set reply [ask name]; join hello < $reply >"))
        .unwrap();
    let mut state = ProgramState::new();

    let outcome = dialect.evaluator.execute(&program, &mut state);
    assert_eq!(outcome, Outcome::yielded(Value::string("name")));

    state.set_result(Outcome::yielded(Value::string("bob")));
    let outcome = dialect.evaluator.execute(&program, &mut state);
    assert_eq!(outcome, Outcome::ok(Value::string("hello<answer:bob>")));
}

#[test]
fn one_program_many_states() {
    let dialect = Dialect::new();
    let program = dialect
        .evaluator
        .compiler()
        .compile_script(&parse_ok("ask q; count [ask again]"))
        .unwrap();
    let mut first = ProgramState::new();
    let mut second = ProgramState::new();

    assert_eq!(dialect.evaluator.execute(&program, &mut first).code, ResultCode::Yield);
    assert_eq!(dialect.evaluator.execute(&program, &mut second).code, ResultCode::Yield);
    assert_eq!(
        dialect.evaluator.execute(&program, &mut first),
        Outcome::yielded(Value::string("again"))
    );

    first.set_result(Outcome::yielded(Value::string("one")));
    assert_eq!(
        dialect.evaluator.execute(&program, &mut first),
        Outcome::ok(Value::Integer(1))
    );
    assert_eq!(*dialect.counter.calls.borrow(), vec!["answer:one".to_string()]);

    // `second` is still parked on its first `ask`
    assert_eq!(second.depth(), 1);
    assert_eq!(
        dialect.evaluator.execute(&program, &mut second),
        Outcome::yielded(Value::string("again"))
    );
}

#[test]
fn failed_resume_stops_with_an_error() {
    let dialect = Dialect::new();
    let program = dialect
        .evaluator
        .compiler()
        .compile_script(&parse_ok("ask q; count never"))
        .unwrap();
    let mut state = ProgramState::new();
    assert_eq!(dialect.evaluator.execute(&program, &mut state).code, ResultCode::Yield);

    state.set_result(Outcome::yielded(Value::empty_tuple()));
    let outcome = dialect.evaluator.execute(&program, &mut state);
    assert_eq!(outcome.code, ResultCode::Error);
    assert_eq!(
        outcome.value,
        Value::string("value has no string representation")
    );
    assert!(dialect.counter.calls.borrow().is_empty());
}
