//! Opcode interpreter.
//!
//! Runs a [`Program`] against a [`ProgramState`]. Execution stops at the
//! end of the program or at the first non-`Ok` result, with the state left
//! exactly where it stopped. Executing the same state again picks up from
//! there; if the command that stopped it yielded and is resumable, it is
//! resumed first.

use std::any::Any;
use std::rc::Rc;

use helena_stack::ensure_sufficient_stack;
use tracing::{debug, trace};

use crate::command::Command;
use crate::errors::ValueError;
use crate::outcome::{ErrorStackLevel, Outcome, ResultCode};
use crate::program::{OpCode, Program};
use crate::resolver::{CommandResolver, SelectorResolver, VariableResolver};
use crate::selector::Selector;
use crate::state::ProgramState;
use crate::value::Value;

/// Stops the dispatch loop with the outcome to return.
type Step = Result<(), Outcome>;

#[derive(Clone)]
pub struct Executor {
    variable_resolver: Rc<dyn VariableResolver>,
    command_resolver: Rc<dyn CommandResolver>,
    selector_resolver: Rc<dyn SelectorResolver>,
    context: Rc<dyn Any>,
}

impl Executor {
    pub fn new(
        variable_resolver: Rc<dyn VariableResolver>,
        command_resolver: Rc<dyn CommandResolver>,
        selector_resolver: Rc<dyn SelectorResolver>,
        context: Rc<dyn Any>,
    ) -> Self {
        Executor {
            variable_resolver,
            command_resolver,
            selector_resolver,
            context,
        }
    }

    /// Opaque context handed to every command.
    pub fn context(&self) -> &dyn Any {
        &*self.context
    }

    /// Run `program` from `state` until it ends or a result stops it.
    ///
    /// At the end of the program, the last value left in the root frame
    /// becomes an `Ok` result; with nothing left, the last result stands.
    #[tracing::instrument(level = "trace", skip_all, fields(pc = state.pc, ops = program.len()))]
    pub fn execute(&self, program: &Program, state: &mut ProgramState) -> Outcome {
        if let Some(outcome) = self.resume(state) {
            return outcome;
        }
        while let Some(&op_code) = program.op_codes().get(state.pc) {
            trace!(pc = state.pc, ?op_code, depth = state.depth(), "step");
            state.pc += 1;
            if let Err(outcome) = self.step(op_code, program, state) {
                debug!(pc = state.pc - 1, code = %outcome.code, "stopped");
                state.result = outcome.clone();
                return outcome;
            }
        }
        if let Some(value) = state.last_value().cloned() {
            state.result = Outcome::ok(value);
        }
        state.result.clone()
    }

    /// Resume a yielded resumable command. `Some` when the resumed result
    /// stops the program again.
    fn resume(&self, state: &mut ProgramState) -> Option<Outcome> {
        if state.result.code != ResultCode::Yield {
            return None;
        }
        let command = state.command.clone()?;
        let resumable = command.as_resumable()?;
        debug!(pc = state.pc, "resume");
        state.result = resumable.resume(state.result.clone(), self.context());
        if state.result.is_ok() {
            None
        } else {
            Some(state.result.clone())
        }
    }

    fn step(&self, op_code: OpCode, program: &Program, state: &mut ProgramState) -> Step {
        match op_code {
            OpCode::PushNil => state.push(Value::Nil),
            OpCode::PushConstant => {
                let value = program
                    .constants()
                    .get(state.cc)
                    .cloned()
                    .ok_or_else(|| invalid_program("constant pool exhausted"))?;
                state.cc += 1;
                state.push(value);
            }
            OpCode::OpenFrame => state.open_frame(),
            OpCode::CloseFrame => {
                let values = state
                    .close_frame()
                    .ok_or_else(|| invalid_program("unbalanced frames"))?;
                state.push(Value::tuple(values));
            }
            OpCode::ResolveValue => {
                let source = state.pop();
                let value = self
                    .resolve_value(&source)
                    .map_err(|e| value_error(&e, program, state))?;
                state.push(value);
            }
            OpCode::ExpandValue => match state.pop() {
                Value::Tuple(items) => state.extend(items.iter().cloned()),
                value => state.push(value),
            },
            OpCode::SetSource => {
                let source = state.pop();
                state.push(Value::qualified(source, Vec::new()));
            }
            OpCode::SelectIndex => {
                let index = state.pop();
                let value = state.pop();
                let selected = value
                    .select(&Selector::indexed(index))
                    .map_err(|e| value_error(&e, program, state))?;
                state.push(selected);
            }
            OpCode::SelectKeys => {
                let keys = state.pop();
                let value = state.pop();
                let selected = keys
                    .as_values()
                    .and_then(|keys| Selector::keyed(keys.iter().cloned()))
                    .and_then(|selector| value.select(&selector))
                    .map_err(|e| value_error(&e, program, state))?;
                state.push(selected);
            }
            OpCode::SelectRules => {
                let rules = state.pop();
                let value = state.pop();
                let selected = self
                    .resolve_selector(&rules)
                    .and_then(|selector| value.select(&selector))
                    .map_err(|e| value_error(&e, program, state))?;
                state.push(selected);
            }
            OpCode::EvaluateSentence => {
                let args = state.pop();
                return self.evaluate_sentence(&args, program, state);
            }
            OpCode::PushResult => state.push(state.result.value.clone()),
            OpCode::JoinStrings => {
                let parts = state.pop();
                let joined = join_strings(&parts).map_err(|e| value_error(&e, program, state))?;
                state.push(joined);
            }
        }
        Ok(())
    }

    fn evaluate_sentence(&self, args: &Value, program: &Program, state: &mut ProgramState) -> Step {
        let args = args
            .as_values()
            .map_err(|_| invalid_program("sentence is not a tuple"))?;
        let Some(name) = args.first() else {
            return Ok(());
        };
        let command = self
            .resolve_command(name)
            .map_err(|e| value_error(&e, program, state))?;
        debug!(command = %name, argc = args.len(), "evaluate sentence");
        let result = command.execute(args, self.context());
        state.command = Some(command);
        if result.is_ok() {
            state.result = result;
            return Ok(());
        }
        state.result = if result.is_error() {
            result.with_level(ErrorStackLevel {
                frame: Some(args.to_vec()),
                source: program.source().cloned(),
                position: program.position(state.pc - 1),
            })
        } else {
            result
        };
        Err(state.result.clone())
    }

    /// Resolve a value the way `$` does: strings name variables, tuples
    /// resolve element-wise, qualified values resolve their source and then
    /// apply their selectors.
    pub fn resolve_value(&self, value: &Value) -> Result<Value, ValueError> {
        ensure_sufficient_stack(|| match value {
            Value::Tuple(items) => items
                .iter()
                .map(|item| self.resolve_value(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::tuple),
            Value::Qualified(q) => q
                .selectors()
                .iter()
                .try_fold(self.resolve_value(q.source())?, |value, selector| {
                    value.select(selector)
                }),
            _ => self.resolve_variable(value),
        })
    }

    fn resolve_variable(&self, name: &Value) -> Result<Value, ValueError> {
        let name = name
            .as_string()
            .map_err(|_| ValueError::InvalidVariableName)?;
        self.variable_resolver
            .resolve(&name)
            .ok_or(ValueError::UnresolvedVariable(name))
    }

    /// Command values stand for themselves; anything else goes through the
    /// command resolver.
    fn resolve_command(&self, name: &Value) -> Result<Rc<dyn Command>, ValueError> {
        if let Value::Command(command) = name {
            return Ok(Rc::clone(command.inner()));
        }
        if let Some(command) = self.command_resolver.resolve(name) {
            return Ok(command);
        }
        let name = name
            .as_string()
            .map_err(|_| ValueError::InvalidCommandName)?;
        Err(ValueError::UnresolvedCommand(name))
    }

    fn resolve_selector(&self, rules: &Value) -> Result<Selector, ValueError> {
        let rules = rules.as_values()?;
        self.selector_resolver.resolve(rules)?.ok_or_else(|| {
            ValueError::UnresolvedSelector(Selector::Generic(rules.to_vec()).to_string())
        })
    }
}

fn join_strings(parts: &Value) -> Result<Value, ValueError> {
    let mut joined = String::new();
    for part in parts.as_values()? {
        joined.push_str(&part.as_string()?);
    }
    Ok(Value::string(joined))
}

#[cold]
fn value_error(error: &ValueError, program: &Program, state: &ProgramState) -> Outcome {
    Outcome::error(error.to_string()).with_level(ErrorStackLevel {
        frame: None,
        source: program.source().cloned(),
        position: program.position(state.pc - 1),
    })
}

#[cold]
fn invalid_program(reason: &str) -> Outcome {
    Outcome::error(format!("invalid program: {reason}"))
}
