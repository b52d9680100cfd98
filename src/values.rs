use itertools::join;
use std::fmt;

use crate::env::{Env, EnvRef};
use crate::errors::RunError;
use crate::reader;

/// signature shared by every primitive in the builtin library
pub type BuiltinFn = fn(&EnvRef, Vec<Value>) -> Result<Value, RunError>;

/// representation of lispy's data types
#[derive(Debug, Clone)]
pub enum Value {
    Number(i64),
    Error(String),
    Symbol(String),
    Str(String),
    Sexpr(Vec<Value>),
    Qexpr(Vec<Value>),
    Fun(Function),
}

use self::Value::*;

impl Value {
    /// the empty s-expression, lispy's "no value"
    pub fn unit() -> Value {
        Sexpr(Vec::new())
    }

    pub fn is_error(&self) -> bool {
        match self {
            Error(_) => true,
            _ => false,
        }
    }

    /// get the human-friendly type of a `Value`
    pub fn get_type(&self) -> &'static str {
        match self {
            Number(_) => "Number",
            Error(_)  => "Error",
            Symbol(_) => "Symbol",
            Str(_)    => "String",
            Sexpr(_)  => "S-Expression",
            Qexpr(_)  => "Q-Expression",
            Fun(_)    => "Function",
        }
    }

    /// display a `Value`, naming functions after the bindings they have in `env`
    pub fn shown<'a>(&'a self, env: &'a Env) -> Shown<'a> {
        Shown { value: self, env }
    }
}

impl From<RunError> for Value {
    fn from(err: RunError) -> Value {
        Error(err.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Number(n)   => write!(f, "{}", n),
            Error(msg)  => write!(f, "Error: {}", msg),
            Symbol(s)   => write!(f, "{}", s),
            Str(s)      => write!(f, "\"{}\"", reader::escape(s)),
            Sexpr(list) => write!(f, "({})", join(list, " ")),
            Qexpr(list) => write!(f, "{{{}}}", join(list, " ")),
            Fun(func)   => write!(f, "<function:{}>", func),
        }
    }
}

/// structural equality: lists compare element-wise, closures by formals and body
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Number(a), Number(b)) => a == b,
            (Error(a), Error(b))   => a == b,
            (Symbol(a), Symbol(b)) => a == b,
            (Str(a), Str(b))       => a == b,
            (Sexpr(a), Sexpr(b))   => a == b,
            (Qexpr(a), Qexpr(b))   => a == b,
            (Fun(a), Fun(b))       => a == b,
            _ => false, // values of different types are not equivalent
        }
    }
}

/// a `Value` paired with the environment used to name its functions
pub struct Shown<'a> {
    value: &'a Value,
    env: &'a Env,
}

impl<'a> fmt::Display for Shown<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let env = self.env;
        match self.value {
            Sexpr(list) => write!(f, "({})", join(list.iter().map(|v| v.shown(env)), " ")),
            Qexpr(list) => write!(f, "{{{}}}", join(list.iter().map(|v| v.shown(env)), " ")),
            Fun(func) => match env.reverse_lookup(func) {
                Symbol(name) => write!(f, "<function:{}>", name),
                _ => write!(f, "{}", self.value),
            },
            value => write!(f, "{}", value),
        }
    }
}

/// a callable value: either a primitive or a user-defined closure
#[derive(Debug, Clone)]
pub enum Function {
    Builtin(Builtin),
    Lambda(Box<Lambda>),
}

impl PartialEq for Function {
    fn eq(&self, other: &Function) -> bool {
        match (self, other) {
            (Function::Builtin(a), Function::Builtin(b)) => a == b,
            (Function::Lambda(a), Function::Lambda(b))   => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Function::Builtin(builtin) => write!(f, "{}", builtin.name),
            Function::Lambda(lambda) => write!(
                f,
                "(\\ {{{}}} {{{}}})",
                join(&lambda.formals, " "),
                join(&lambda.body, " ")
            ),
        }
    }
}

/// a primitive operation. its identity is the name it was registered under.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl Builtin {
    /// run the primitive, turning a failed shape check into an error value
    pub fn call(&self, env: &EnvRef, args: Vec<Value>) -> Value {
        (self.func)(env, args).unwrap_or_else(Value::from)
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Builtin) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

/// a user-defined function: the formals still waiting for arguments, the body
/// to evaluate once they are all bound, and the private scope that collects
/// the bindings made so far
#[derive(Debug, Clone)]
pub struct Lambda {
    pub formals: Vec<String>,
    pub body: Vec<Value>,
    pub env: Env,
}

impl Lambda {
    pub fn new(formals: Vec<String>, body: Vec<Value>) -> Lambda {
        Lambda {
            formals,
            body,
            env: Env::new(None),
        }
    }
}

impl PartialEq for Lambda {
    fn eq(&self, other: &Lambda) -> bool {
        self.formals == other.formals && self.body == other.body
    }
}

// }}}
