use failure::Error;

use std::fmt::Debug;
use std::fs;
use std::path::Path;

use crate::env::{self, EnvRef};
use crate::eval;
use crate::log;
use crate::parser;
use crate::reader;
use crate::values::Value;
use crate::Interpreter;

impl Interpreter {
    /// run each top-level form of a file
    pub fn run_file<P>(&self, path: P) -> Result<(), Error>
        where P: AsRef<Path> + Debug
    {
        log::info(format!("running {:?}...", path));

        let failed = load_file(path.as_ref(), &self.env)?;
        if failed > 0 {
            log::warn(format!("{} form(s) in {:?} evaluated to an error", failed, path));
        }

        log::info("run_file: done");
        Ok(())
    }
}

/// parse a file and evaluate its top-level forms one at a time in `env`.
/// a form that evaluates to an error is printed and skipped, never aborting
/// the rest of the file. returns how many forms failed.
pub fn load_file(path: &Path, env: &EnvRef) -> Result<usize, Error> {
    let code = fs::read_to_string(path)?;
    let tree = parser::parse(&code)?;

    let forms = match reader::read(&tree) {
        Value::Sexpr(forms) => forms,
        other => vec![other],
    };

    let mut failed = 0;
    for form in forms {
        let result = eval::eval(form, env);
        if result.is_error() {
            failed += 1;
            env::print(env, &result.to_string())?;
        }
    }

    Ok(failed)
}

// {{{ tests
#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;

    fn script(name: &str, code: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("lispy-{}-{}.lspy", name, std::process::id()));
        fs::write(&path, code).unwrap();
        path
    }

    fn captured() -> (Interpreter, Rc<RefCell<Vec<u8>>>) {
        let buf: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
        (Interpreter::with_output(buf.clone()), buf)
    }

    fn output(buf: &Rc<RefCell<Vec<u8>>>) -> String {
        String::from_utf8(buf.borrow().clone()).unwrap()
    }

    #[test]
    fn failing_forms_do_not_abort_the_file() {
        let path = script(
            "forms",
            "; a small library\n\
             (def {x} 10)\n\
             (head {})\n\
             (def {y} (+ x 1))\n",
        );
        let (interpreter, buf) = captured();

        let failed = load_file(&path, &interpreter.env).unwrap();
        assert_eq!(failed, 1);
        assert_eq!(output(&buf), "Error: head: passed {}\n");
        assert_eq!(interpreter.env.borrow().lookup("y"), Value::Number(11));

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn load_builtin_reads_files() {
        let path = script("builtin", "(fun {sq x} {* x x})\n(print (sq 4) \"done\")\n");
        let (interpreter, buf) = captured();

        let result = interpreter
            .run(format!("load \"{}\"", path.display()))
            .unwrap();
        assert_eq!(result, Value::unit());
        assert_eq!(output(&buf), "16 \"done\"\n");

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn load_reports_missing_and_malformed_files() {
        let (interpreter, _) = captured();

        let missing = interpreter.run("load \"/definitely/not/here.lspy\"").unwrap();
        match missing {
            Value::Error(msg) => assert!(msg.starts_with("load: could not load /definitely/not/here.lspy")),
            other => panic!("expected an error, got {}", other),
        }

        let path = script("malformed", "(def {x} 1");
        let malformed = interpreter.run(format!("load \"{}\"", path.display())).unwrap();
        assert!(malformed.is_error());
        assert!(interpreter.env.borrow().get("x").is_none());
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn run_file_propagates_io_errors() {
        let interpreter = Interpreter::new();
        assert!(interpreter.run_file("/definitely/not/here.lspy").is_err());
    }
}
// }}}
