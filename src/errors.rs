/// failures of the grammar front-end; these never become lisp values
#[derive(Debug, Fail)]
pub enum ParseError {
    #[fail(display = "mismatched parentheses: expected '{}', found '{}'", expected, found)]
    MismatchedParens { expected: char, found: char },

    #[fail(display = "unclosed '{}' at end of input", _0)]
    Unclosed(char),

    #[fail(display = "encountered erroneous '{}'", _0)]
    ErroneousToken(String),

    #[fail(display = "unterminated string literal")]
    UnterminatedString,
}

/// runtime failures. the evaluator turns these into `Value::Error`s, so the
/// display text is exactly what the guest program sees.
#[derive(Debug, Fail)]
pub enum RunError {
    #[fail(display = "{}: {}", name, msg)]
    ProcError { name: String, msg: String },

    #[fail(display = "invalid number: {}", _0)]
    InvalidNumber(String),

    #[fail(display = "unbound symbol: {}", _0)]
    UnboundSymbol(String),

    #[fail(display = "no binding for function")]
    UnboundFunction,

    #[fail(display = "{}: expected {}, got {}", name, expected, got)]
    TypeError {
        name: String,
        expected: &'static str,
        got: &'static str,
    },

    #[fail(display = "expected Function, got {}", _0)]
    Uncallable(&'static str),

    #[fail(display = "{}: expected {} arguments, got {}", name, expected, got)]
    WrongNumArgs {
        name: String,
        expected: usize,
        got: usize,
    },

    #[fail(display = "too many arguments: got {}, expected {}", got, expected)]
    TooManyArgs { got: usize, expected: usize },

    #[fail(display = "invalid formals: '&' must be followed by a single symbol")]
    BadFormals,

    #[fail(display = "{}: passed {{}}", _0)]
    EmptyList(String),

    #[fail(display = "division by zero")]
    DivideByZero,
}
