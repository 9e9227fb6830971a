//! Test dialect commands.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use helena::{
    Command, CommandWithHelp, Evaluator, MapCommandResolver, MapVariableResolver, Outcome,
    ResultCode, ResumableCommand, Value,
};

/// Evaluator plus the state the dialect's commands share with the test.
pub struct Dialect {
    pub evaluator: Rc<Evaluator>,
    pub variables: Rc<MapVariableResolver>,
    pub commands: Rc<MapCommandResolver>,
    pub counter: Rc<Counter>,
}

impl Dialect {
    pub fn new() -> Self {
        let variables = Rc::new(MapVariableResolver::new());
        let commands = Rc::new(MapCommandResolver::new());
        let counter = Rc::new(Counter::default());

        commands.register("set", Rc::new(Set(Rc::clone(&variables))));
        commands.register("echo", Rc::new(Echo));
        commands.register("join", Rc::new(Join));
        commands.register("fail", Rc::new(Fail));
        commands.register("ask", Rc::new(Ask));
        commands.register("yield", Rc::new(YieldValue));
        commands.register("count", Rc::clone(&counter) as Rc<dyn Command>);

        let evaluator = {
            let variables = Rc::clone(&variables);
            let commands = Rc::clone(&commands);
            Rc::new_cyclic(|weak: &Weak<Evaluator>| {
                commands.register(
                    "repeat",
                    Rc::new(Repeat {
                        evaluator: weak.clone(),
                    }),
                );
                Evaluator::builder()
                    .variable_resolver(variables)
                    .command_resolver(commands)
                    .capture_positions(true)
                    .build()
            })
        };

        Dialect {
            evaluator,
            variables,
            commands,
            counter,
        }
    }

    pub fn run(&self, source: &str) -> Outcome {
        self.evaluator.evaluate_script(&super::parse_ok(source))
    }

    pub fn run_ok(&self, source: &str) -> Value {
        let outcome = self.run(source);
        assert_eq!(
            outcome.code,
            ResultCode::Ok,
            "{source:?} returned {}",
            outcome.value
        );
        outcome.value
    }

    pub fn run_error(&self, source: &str) -> String {
        let outcome = self.run(source);
        assert_eq!(
            outcome.code,
            ResultCode::Error,
            "{source:?} returned {}",
            outcome.value
        );
        outcome.value.as_string().unwrap()
    }
}

/// `set name value`: store and return `value`.
struct Set(Rc<MapVariableResolver>);

impl Command for Set {
    fn execute(&self, args: &[Value], _context: &dyn Any) -> Outcome {
        let [_, name, value] = args else {
            return Outcome::error("wrong # args: should be \"set varname value\"");
        };
        match name.as_string() {
            Ok(name) => {
                self.0.set(name, value.clone());
                Outcome::ok(value.clone())
            }
            Err(e) => Outcome::error(e.to_string()),
        }
    }

    fn as_help(&self) -> Option<&dyn CommandWithHelp> {
        Some(self)
    }
}

impl CommandWithHelp for Set {
    fn help(&self, _args: &[Value], _context: &dyn Any) -> Outcome {
        Outcome::ok(Value::string("set varname value"))
    }
}

/// `echo args...`: tuple of the arguments, command name excluded.
struct Echo;

impl Command for Echo {
    fn execute(&self, args: &[Value], _context: &dyn Any) -> Outcome {
        Outcome::ok(Value::tuple(args[1..].to_vec()))
    }
}

/// `join args...`: concatenation of the arguments' string forms.
struct Join;

impl Command for Join {
    fn execute(&self, args: &[Value], _context: &dyn Any) -> Outcome {
        let mut joined = String::new();
        for arg in &args[1..] {
            match arg.as_string() {
                Ok(s) => joined.push_str(&s),
                Err(e) => return Outcome::error(e.to_string()),
            }
        }
        Outcome::ok(Value::string(joined))
    }
}

/// `fail message`
struct Fail;

impl Command for Fail {
    fn execute(&self, args: &[Value], _context: &dyn Any) -> Outcome {
        Outcome::new(
            ResultCode::Error,
            args.get(1).cloned().unwrap_or_default(),
        )
    }
}

/// `count arg`: records `arg`, returns the number of calls so far.
#[derive(Default)]
pub struct Counter {
    pub calls: RefCell<Vec<String>>,
    count: Cell<i64>,
}

impl Command for Counter {
    fn execute(&self, args: &[Value], _context: &dyn Any) -> Outcome {
        self.count.set(self.count.get() + 1);
        self.calls
            .borrow_mut()
            .push(args.get(1).map(ToString::to_string).unwrap_or_default());
        Outcome::ok(Value::Integer(self.count.get()))
    }
}

/// `repeat n body`
struct Repeat {
    evaluator: Weak<Evaluator>,
}

impl Command for Repeat {
    fn execute(&self, args: &[Value], _context: &dyn Any) -> Outcome {
        let [_, count, body] = args else {
            return Outcome::error("wrong # args: should be \"repeat count body\"");
        };
        let count = match count.as_integer() {
            Ok(count) => count,
            Err(e) => return Outcome::error(e.to_string()),
        };
        let Some(evaluator) = self.evaluator.upgrade() else {
            return Outcome::error("evaluator dropped");
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

/// `ask prompt`: yields `prompt`; resumes with the value passed back,
/// prefixed with `answer:`.
struct Ask;

impl Command for Ask {
    fn execute(&self, args: &[Value], _context: &dyn Any) -> Outcome {
        Outcome::yielded(args.get(1).cloned().unwrap_or_default())
    }

    fn as_resumable(&self) -> Option<&dyn ResumableCommand> {
        Some(self)
    }
}

impl ResumableCommand for Ask {
    fn resume(&self, result: Outcome, _context: &dyn Any) -> Outcome {
        match result.value.as_string() {
            Ok(answer) => Outcome::ok(Value::string(format!("answer:{answer}"))),
            Err(e) => Outcome::error(e.to_string()),
        }
    }
}

/// `yield value`: yields without being resumable.
struct YieldValue;

impl Command for YieldValue {
    fn execute(&self, args: &[Value], _context: &dyn Any) -> Outcome {
        Outcome::yielded(args.get(1).cloned().unwrap_or_default())
    }
}
