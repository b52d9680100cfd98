use std::mem;

use crate::env::EnvRef;
use crate::errors::RunError;
use crate::values::Value::{self, *};
use crate::values::{Function, Lambda};

/// evaluate a lispy value. symbols resolve through `env`, s-expressions are
/// applied, and everything else evaluates to itself.
///
/// recursion follows the guest program's nesting directly, so very deep guest
/// recursion can exhaust the native stack.
pub fn eval(value: Value, env: &EnvRef) -> Value {
    match value {
        Symbol(sym) => resolve_symbol(&sym, env),
        Sexpr(list) => eval_sexpr(list, env),
        _ => value,
    }
}

fn resolve_symbol(sym: &str, env: &EnvRef) -> Value {
    env.borrow().lookup(sym)
}

fn eval_sexpr(list: Vec<Value>, env: &EnvRef) -> Value {
    let mut args = match eval_list(list, env) {
        Ok(args) => args,
        Err(err) => return err,
    };

    match args.len() {
        0 => return Value::unit(),
        1 => return args.remove(0),
        _ => (),
    }

    match args.remove(0) {
        Fun(func) => call(func, args, env),
        other => RunError::Uncallable(other.get_type()).into(),
    }
}

/// evaluate every value in a list, left to right, stopping at the first error
pub fn eval_list(list: Vec<Value>, env: &EnvRef) -> Result<Vec<Value>, Value> {
    list.into_iter()
        .map(|item| match eval(item, env) {
            err @ Error(_) => Err(err),
            value => Ok(value),
        })
        .collect()
}

/// apply a function to already-evaluated arguments, called from `env`
pub fn call(func: Function, args: Vec<Value>, env: &EnvRef) -> Value {
    match func {
        Function::Builtin(builtin) => builtin.call(env, args),
        Function::Lambda(lambda) => call_lambda(*lambda, args, env),
    }
}

/// bind arguments to formals in order. a `&` formal collects every remaining
/// argument. with formals left over the closure comes back partially applied,
/// otherwise its body runs in its own scope, parented to the caller's.
fn call_lambda(mut lambda: Lambda, mut args: Vec<Value>, env: &EnvRef) -> Value {
    let given = args.len();
    let total = lambda.formals.len();

    while !args.is_empty() {
        if lambda.formals.is_empty() {
            return RunError::TooManyArgs {
                got: given,
                expected: total,
            }
            .into();
        }

        let formal = lambda.formals.remove(0);
        if formal == "&" {
            if lambda.formals.len() != 1 {
                return RunError::BadFormals.into();
            }
            let rest = lambda.formals.remove(0);
            lambda.env.define(&rest, Qexpr(mem::take(&mut args)));
            break;
        }

        lambda.env.define(&formal, args.remove(0));
    }

    match lambda.formals.first().map(String::as_str) {
        None => (),
        // only an optional rest parameter is left: it defaults to {}
        Some("&") => {
            if lambda.formals.len() != 2 {
                return RunError::BadFormals.into();
            }
            let rest = lambda.formals.remove(1);
            lambda.formals.clear();
            lambda.env.define(&rest, Qexpr(Vec::new()));
        }
        Some(_) => return Fun(Function::Lambda(Box::new(lambda))),
    }

    let Lambda { body, env: mut local, .. } = lambda;
    local.set_parent(env);
    let local = local.into_ref();
    eval(Sexpr(body), &local)
}

// }}}
