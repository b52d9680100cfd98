#[macro_use]
extern crate failure_derive;

mod arithmetic;
pub mod builtins;
pub mod env;
pub mod errors;
pub mod eval;
mod file;
pub mod log;
pub mod parser;
pub mod reader;
pub mod values;

use failure::Error;

use crate::env::{Env, EnvRef, Sink};
use crate::values::Value;

pub use crate::file::load_file;

#[derive(Clone)]
pub struct Interpreter {
    pub env: EnvRef,
}

impl Interpreter {
    /// create a new Interpreter with every builtin bound in its root environment
    pub fn new() -> Interpreter {
        let mut env = Env::new(None);
        builtins::register(&mut env);
        Interpreter {
            env: env.into_ref(),
        }
    }

    /// create a new Interpreter whose `print` and `load` output goes to `sink`
    pub fn with_output(sink: Sink) -> Interpreter {
        let interpreter = Interpreter::new();
        interpreter.env.borrow_mut().set_sink(sink);
        interpreter
    }

    /// evaluate a string as lisp code. the whole input reads as a single
    /// s-expression, so `+ 1 2` and `(+ 1 2)` both give 3.
    pub fn run<S: Into<String>>(&self, code: S) -> Result<Value, Error> {
        let code: String = code.into();
        let tree = parser::parse(&code)?;
        let sexp = reader::read(&tree);

        Ok(eval::eval(sexp, &self.env))
    }

    /// display a value, naming functions after their bindings
    pub fn show(&self, value: &Value) -> String {
        value.shown(&self.env.borrow()).to_string()
    }
}

impl Default for Interpreter {
    fn default() -> Interpreter {
        Interpreter::new()
    }
}

// }}}
