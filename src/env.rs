use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};
use std::rc::{Rc, Weak};

use crate::errors::RunError;
use crate::values::{Function, Value};

/// The “memory” of the interpreter is represented as a HashMap with an
/// optional link to a parent scope. The link is weak: a scope never keeps its
/// parent alive, it only delegates lookups to it while the parent exists.
#[derive(Clone)]
pub struct Env {
    pub vars: HashMap<String, Value>,
    parent: Option<Weak<RefCell<Env>>>,
    sink: Option<Sink>,
}

/// an interior-mutable, reference-counted smart pointer wrapper around an `Env`
pub type EnvRef = Rc<RefCell<Env>>;

/// where `print` and `load` write guest-visible text
pub type Sink = Rc<RefCell<dyn Write>>;

impl Env {
    /// create a new lispy environment
    pub fn new(parent: Option<&EnvRef>) -> Env {
        Env {
            vars: HashMap::new(),
            parent: parent.map(Rc::downgrade),
            sink: None,
        }
    }

    pub fn into_ref(self) -> EnvRef {
        Rc::new(RefCell::new(self))
    }

    pub fn set_parent(&mut self, parent: &EnvRef) {
        self.parent = Some(Rc::downgrade(parent));
    }

    /// the parent scope, if there is one and it is still alive
    pub fn parent(&self) -> Option<EnvRef> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    pub fn set_sink(&mut self, sink: Sink) {
        self.sink = Some(sink);
    }

    /// find a binding here or in any ancestor, returning an owned copy
    pub fn get(&self, var_name: &str) -> Option<Value> {
        match self.vars.get(var_name) {
            Some(x) => Some(x.clone()),
            None => self.parent().and_then(|env| env.borrow().get(var_name)),
        }
    }

    /// resolve a symbol to a stored lispy value, or to an unbound-symbol error
    pub fn lookup(&self, var_name: &str) -> Value {
        self.get(var_name)
            .unwrap_or_else(|| RunError::UnboundSymbol(var_name.to_owned()).into())
    }

    /// add (or modify) a stored value in this environment only
    pub fn define(&mut self, var_name: &str, value: Value) {
        self.vars.insert(var_name.to_owned(), value);
    }

    /// like `define`, keyed by a lispy value. anything but a symbol is ignored.
    pub fn put(&mut self, key: &Value, value: Value) {
        if let Value::Symbol(name) = key {
            self.define(name, value);
        }
    }

    /// find the name a function is bound to, searching outwards. when several
    /// names match, the alphabetically first one wins.
    pub fn reverse_lookup(&self, func: &Function) -> Value {
        let found = self
            .vars
            .iter()
            .filter(|(_, value)| match value {
                Value::Fun(f) => f == func,
                _ => false,
            })
            .map(|(name, _)| name)
            .min();

        match (found, self.parent()) {
            (Some(name), _) => Value::Symbol(name.clone()),
            (None, Some(parent)) => parent.borrow().reverse_lookup(func),
            (None, None) => RunError::UnboundFunction.into(),
        }
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Env")
            .field("vars", &self.vars)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

/// the outermost environment of the chain `env` belongs to
pub fn root(env: &EnvRef) -> EnvRef {
    let parent = env.borrow().parent();
    match parent {
        Some(parent) => root(&parent),
        None => env.clone(),
    }
}

/// bind a value in the outermost environment of the chain
pub fn define_global(env: &EnvRef, key: &Value, value: Value) {
    root(env).borrow_mut().put(key, value);
}

/// write a line of guest output to the root's sink, or to stdout without one
pub fn print(env: &EnvRef, line: &str) -> io::Result<()> {
    let sink = root(env).borrow().sink.clone();
    match sink {
        Some(sink) => writeln!(sink.borrow_mut(), "{}", line),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", line)
        }
    }
}

// {{{ tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::{Builtin, Lambda};

    fn noop(_env: &EnvRef, _args: Vec<Value>) -> Result<Value, RunError> {
        Ok(Value::unit())
    }

    #[test]
    fn lookup_walks_parents() {
        let root_env = Env::new(None).into_ref();
        root_env.borrow_mut().define("x", Value::Number(1));

        let mut child = Env::new(Some(&root_env));
        child.define("y", Value::Number(2));

        assert_eq!(child.lookup("x"), Value::Number(1));
        assert_eq!(child.lookup("y"), Value::Number(2));
        assert_eq!(
            child.lookup("z"),
            Value::Error("unbound symbol: z".to_owned())
        );
        assert!(root_env.borrow().get("y").is_none());
    }

    #[test]
    fn put_ignores_non_symbols() {
        let mut env = Env::new(None);
        env.put(&Value::Number(3), Value::Number(4));
        env.put(&Value::Symbol("a".to_owned()), Value::Number(5));
        assert_eq!(env.vars.len(), 1);
        assert_eq!(env.lookup("a"), Value::Number(5));
    }

    #[test]
    fn define_global_binds_at_root() {
        let root_env = Env::new(None).into_ref();
        let middle = Env::new(Some(&root_env)).into_ref();
        let leaf = Env::new(Some(&middle)).into_ref();

        define_global(&leaf, &Value::Symbol("g".to_owned()), Value::Number(9));

        assert_eq!(root_env.borrow().lookup("g"), Value::Number(9));
        assert!(middle.borrow().vars.is_empty());
        assert!(leaf.borrow().vars.is_empty());
    }

    #[test]
    fn parent_link_does_not_own() {
        let child = {
            let parent = Env::new(None).into_ref();
            parent.borrow_mut().define("x", Value::Number(1));
            Env::new(Some(&parent))
        };
        assert!(child.parent().is_none());
        assert!(child.get("x").is_none());
    }

    #[test]
    fn clone_copies_bindings_and_shares_parent() {
        let parent = Env::new(None).into_ref();
        parent.borrow_mut().define("p", Value::Number(0));

        let mut original = Env::new(Some(&parent));
        original.define("x", Value::Number(1));

        let mut copy = original.clone();
        copy.define("x", Value::Number(2));

        assert_eq!(original.lookup("x"), Value::Number(1));
        assert_eq!(copy.lookup("x"), Value::Number(2));
        assert_eq!(copy.lookup("p"), Value::Number(0));
    }

    #[test]
    fn reverse_lookup_names_functions() {
        let root_env = Env::new(None).into_ref();
        let add = Function::Builtin(Builtin { name: "add", func: noop });
        root_env.borrow_mut().define("plus", Value::Fun(add.clone()));
        root_env.borrow_mut().define("add", Value::Fun(add.clone()));

        let child = Env::new(Some(&root_env));
        assert_eq!(child.reverse_lookup(&add), Value::Symbol("add".to_owned()));

        let stray = Function::Lambda(Box::new(Lambda::new(vec![], vec![])));
        assert!(child.reverse_lookup(&stray).is_error());
    }

    #[test]
    fn print_writes_to_root_sink() {
        let buf: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
        let root_env = Env::new(None).into_ref();
        root_env.borrow_mut().set_sink(buf.clone());
        let child = Env::new(Some(&root_env)).into_ref();

        print(&child, "hello").unwrap();
        assert_eq!(String::from_utf8(buf.borrow().clone()).unwrap(), "hello\n");
    }
}
// }}}
