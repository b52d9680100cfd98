use itertools::join;
use std::convert::TryFrom;
use std::path::Path;

use crate::arithmetic::{Comparison, Op};
use crate::env::{self, Env, EnvRef};
use crate::errors::RunError;
use crate::eval as evaluator;
use crate::file;
use crate::values::Value::{self, *};
use crate::values::{Builtin, BuiltinFn, Function, Lambda};

pub const BUILTINS: &[(&str, BuiltinFn)] = &[
    ("list",    list),
    ("head",    head),
    ("tail",    tail),
    ("eval",    eval),
    ("join",    join_lists),
    ("cons",    cons),
    ("len",     len),
    ("init",    init),
    ("def",     def),
    ("=",       put),
    ("\\",      lambda),
    ("fun",     fun),
    ("+",       add),
    ("-",       sub),
    ("*",       mul),
    ("/",       div),
    ("%",       modulo),
    (">",       gt),
    ("<",       lt),
    (">=",      ge),
    ("<=",      le),
    ("==",      eq),
    ("!=",      ne),
    ("if",      if_else),
    ("and",     and),
    ("or",      or),
    ("not",     not),
    ("load",    load),
    ("print",   print),
    ("error",   error),
];

/// extra names for builtins, bound to the very same primitive
pub const ALIASES: &[(&str, &str)] = &[("put", "=")];

/// bind every builtin in `env`
pub fn register(env: &mut Env) {
    for &(name, func) in BUILTINS {
        env.define(name, Fun(Function::Builtin(Builtin { name, func })));
    }

    for &(alias, name) in ALIASES {
        if let Some(builtin) = env.get(name) {
            env.define(alias, builtin);
        }
    }
}

// {{{ helpful macros
/// turn the Vec $args into an array of exactly $num elements, or an Err if
/// it has a different length
macro_rules! check_num_args {
    ($args: ident, $num: expr, $name: expr) => {{
        let got = $args.len();
        <[Value; $num]>::try_from($args).map_err(|_| RunError::WrongNumArgs {
            name: $name.to_string(),
            expected: $num,
            got,
        })
    }};
}

/// the user-facing name of a `Value` variant
macro_rules! type_name {
    (Number) => { "Number" };
    (Symbol) => { "Symbol" };
    (Str)    => { "String" };
    (Sexpr)  => { "S-Expression" };
    (Qexpr)  => { "Q-Expression" };
}

/// extract the inner Rust type value from a lisp value, returning an Err
/// if $value is not of enum variant $variant
macro_rules! extract {
    ($value: expr, $variant: ident, $proc: expr) => {{
        match $value {
            Value::$variant(x) => Ok(x),
            other => Err(RunError::TypeError {
                name: $proc.to_string(),
                expected: type_name!($variant),
                got: other.get_type(),
            }),
        }
    }};
}

/// return a Err(RunError::ProcError)
macro_rules! procerr {
    ($name: expr, $msg: expr) => {
        Err(RunError::ProcError {
            name: $name.to_string(),
            msg: $msg.to_string(),
        })
    };
}
// }}}

// {{{ lists
/// turn the arguments into a q-expression
/// usage: (list <expr> ...)
pub fn list(_env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    Ok(Qexpr(args))
}

/// keep only the first element of a q-expression
/// usage: (head <qexpr>)
pub fn head(_env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    let [list] = check_num_args!(args, 1, "head")?;
    let mut list = extract!(list, Qexpr, "head")?;
    if list.is_empty() {
        return Err(RunError::EmptyList("head".to_owned()));
    }

    list.truncate(1);
    Ok(Qexpr(list))
}

/// drop the first element of a q-expression
/// usage: (tail <qexpr>)
pub fn tail(_env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    let [list] = check_num_args!(args, 1, "tail")?;
    let mut list = extract!(list, Qexpr, "tail")?;
    if list.is_empty() {
        return Err(RunError::EmptyList("tail".to_owned()));
    }

    list.remove(0);
    Ok(Qexpr(list))
}

/// evaluate a q-expression as if it were an s-expression
/// usage: (eval <qexpr>)
pub fn eval(env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    let [list] = check_num_args!(args, 1, "eval")?;
    let list = extract!(list, Qexpr, "eval")?;
    Ok(evaluator::eval(Sexpr(list), env))
}

/// concatenate q-expressions
/// usage: (join <qexpr> <qexpr> ...)
pub fn join_lists(_env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    for arg in &args {
        extract!(arg, Qexpr, "join")?;
    }

    let mut joined = Vec::new();
    for arg in args {
        joined.append(&mut extract!(arg, Qexpr, "join")?);
    }
    Ok(Qexpr(joined))
}

/// prepend a value onto a q-expression
/// usage: (cons <value> <qexpr>)
pub fn cons(_env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    let [value, list] = check_num_args!(args, 2, "cons")?;
    let mut list = extract!(list, Qexpr, "cons")?;

    list.insert(0, value);
    Ok(Qexpr(list))
}

/// count the elements of a q-expression
/// usage: (len <qexpr>)
pub fn len(_env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    let [list] = check_num_args!(args, 1, "len")?;
    let list = extract!(list, Qexpr, "len")?;
    Ok(Number(list.len() as i64))
}

/// drop the last element of a q-expression
/// usage: (init <qexpr>)
pub fn init(_env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    let [list] = check_num_args!(args, 1, "init")?;
    let mut list = extract!(list, Qexpr, "init")?;
    if list.pop().is_none() {
        return Err(RunError::EmptyList("init".to_owned()));
    }
    Ok(Qexpr(list))
}
// }}}

// {{{ bindings
#[derive(Debug, Clone, Copy, PartialEq)]
enum Scope {
    Local,
    Global,
}

/// bind symbols to values pairwise. every check runs before the first binding
/// is made, so a failed call leaves the environment untouched.
fn var(env: &EnvRef, args: Vec<Value>, name: &str, scope: Scope) -> Result<Value, RunError> {
    let mut args = args.into_iter();
    let syms = match args.next() {
        Some(syms) => extract!(syms, Qexpr, name)?,
        None => return procerr!(name, "at least 1 argument required"),
    };
    for sym in &syms {
        extract!(sym, Symbol, name)?;
    }

    if syms.len() != args.len() {
        return procerr!(
            name,
            format!("cannot bind {} values to {} symbols", args.len(), syms.len())
        );
    }

    for (sym, value) in syms.iter().zip(args) {
        match scope {
            Scope::Global => env::define_global(env, sym, value),
            Scope::Local => env.borrow_mut().put(sym, value),
        }
    }

    Ok(Value::unit())
}

/// bind values in the outermost environment
/// usage: (def {<symbol> ...} <value> ...)
pub fn def(env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    var(env, args, "def", Scope::Global)
}

/// bind values in the current environment
/// usage: (= {<symbol> ...} <value> ...)
pub fn put(env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    var(env, args, "=", Scope::Local)
}

/// collect the names of a formals list, which must all be symbols
fn formal_names(formals: Vec<Value>, name: &str) -> Result<Vec<String>, RunError> {
    formals
        .into_iter()
        .map(|formal| extract!(formal, Symbol, name))
        .collect()
}

/// create a function
/// usage: (\ {<param> ...} {<body> ...})
pub fn lambda(_env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    let [formals, body] = check_num_args!(args, 2, "\\")?;
    let formals = extract!(formals, Qexpr, "\\")?;
    let body = extract!(body, Qexpr, "\\")?;

    let formals = formal_names(formals, "\\")?;
    Ok(Fun(Function::Lambda(Box::new(Lambda::new(formals, body)))))
}

/// create a function and bind it globally under the first formal
/// usage: (fun {<name> <param> ...} {<body> ...})
pub fn fun(env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    let [formals, body] = check_num_args!(args, 2, "fun")?;
    let formals = extract!(formals, Qexpr, "fun")?;
    let body = extract!(body, Qexpr, "fun")?;

    let mut formals = formal_names(formals, "fun")?;
    if formals.is_empty() {
        return procerr!("fun", "missing function name");
    }

    let name = formals.remove(0);
    let func = Fun(Function::Lambda(Box::new(Lambda::new(formals, body))));
    env::define_global(env, &Symbol(name), func.clone());
    Ok(func)
}
// }}}

// {{{ math
/// do some math
/// usage: (+ <num> ...)
///        (- <num> ...)
///        (* <num> ...)
///        (/ <num> ...)
///        (% <num> ...)
fn math(op: Op, args: Vec<Value>) -> Result<Value, RunError> {
    let operands = args
        .into_iter()
        .map(|arg| extract!(arg, Number, op.symbol()))
        .collect::<Result<Vec<i64>, RunError>>()?;

    Ok(Number(op.fold(operands)?))
}

pub fn add(_env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    math(Op::Add, args)
}

pub fn sub(_env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    math(Op::Sub, args)
}

pub fn mul(_env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    math(Op::Mul, args)
}

pub fn div(_env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    math(Op::Div, args)
}

pub fn modulo(_env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    math(Op::Rem, args)
}
// }}}

// {{{ logic
/// compare two numbers, giving 1 or 0
/// usage: (> <num> <num>)
fn ord(cmp: Comparison, args: Vec<Value>) -> Result<Value, RunError> {
    let [lhs, rhs] = check_num_args!(args, 2, cmp.symbol())?;
    let lhs = extract!(lhs, Number, cmp.symbol())?;
    let rhs = extract!(rhs, Number, cmp.symbol())?;
    Ok(Number(cmp.test(lhs, rhs) as i64))
}

pub fn gt(_env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    ord(Comparison::Gt, args)
}

pub fn lt(_env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    ord(Comparison::Lt, args)
}

pub fn ge(_env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    ord(Comparison::Ge, args)
}

pub fn le(_env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    ord(Comparison::Le, args)
}

/// structural equality of any two values
/// usage: (== <expr> <expr>)
pub fn eq(_env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    let [lhs, rhs] = check_num_args!(args, 2, "==")?;
    Ok(Number((lhs == rhs) as i64))
}

pub fn ne(_env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    let [lhs, rhs] = check_num_args!(args, 2, "!=")?;
    Ok(Number((lhs != rhs) as i64))
}

/// evaluate one of two q-expressions depending on a number
/// usage: (if <num> {<conseq> ...} {<alternate> ...})
pub fn if_else(env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    let [test, conseq, alt] = check_num_args!(args, 3, "if")?;
    let test = extract!(test, Number, "if")?;
    let conseq = extract!(conseq, Qexpr, "if")?;
    let alt = extract!(alt, Qexpr, "if")?;

    let branch = if test != 0 { conseq } else { alt };
    Ok(evaluator::eval(Sexpr(branch), env))
}

/// 1 if every argument is nonzero; stops at the first zero
/// usage: (and <num> ...)
pub fn and(_env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    for arg in &args {
        if *extract!(arg, Number, "and")? == 0 {
            return Ok(Number(0));
        }
    }
    Ok(Number(1))
}

/// 1 if any argument is nonzero; stops at the first nonzero
/// usage: (or <num> ...)
pub fn or(_env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    for arg in &args {
        if *extract!(arg, Number, "or")? != 0 {
            return Ok(Number(1));
        }
    }
    Ok(Number(0))
}

/// usage: (not <num>)
pub fn not(_env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    let [arg] = check_num_args!(args, 1, "not")?;
    let n = extract!(arg, Number, "not")?;
    Ok(Number((n == 0) as i64))
}
// }}}

// {{{ io
/// evaluate every form in a file, printing the ones that fail
/// usage: (load "<path>")
pub fn load(env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    let [path] = check_num_args!(args, 1, "load")?;
    let path = extract!(path, Str, "load")?;

    match file::load_file(Path::new(&path), env) {
        Ok(_) => Ok(Value::unit()),
        Err(err) => procerr!("load", format!("could not load {}: {}", path, err)),
    }
}

/// print the arguments separated by spaces
/// usage: (print <expr> ...)
pub fn print(env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    let line = {
        let scope = env.borrow();
        join(args.iter().map(|arg| arg.shown(&scope)), " ")
    };

    match env::print(env, &line) {
        Ok(()) => Ok(Value::unit()),
        Err(err) => procerr!("print", err),
    }
}

/// build an error value from a string
/// usage: (error "<message>")
pub fn error(_env: &EnvRef, args: Vec<Value>) -> Result<Value, RunError> {
    let [msg] = check_num_args!(args, 1, "error")?;
    let msg = extract!(msg, Str, "error")?;
    Ok(Error(msg))
}
// }}}

// }}}
