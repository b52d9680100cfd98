use crate::errors::RunError;
use crate::values::Value::{self, *};

/// a node of the generic tree produced by the grammar front-end. tags are
/// composed from grammar rule names, e.g. `expr|number|regex`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParseNode {
    pub tag: String,
    pub contents: String,
    pub children: Vec<ParseNode>,
}

impl ParseNode {
    pub fn leaf<T: Into<String>, C: Into<String>>(tag: T, contents: C) -> ParseNode {
        ParseNode {
            tag: tag.into(),
            contents: contents.into(),
            children: Vec::new(),
        }
    }

    pub fn branch<T: Into<String>>(tag: T, children: Vec<ParseNode>) -> ParseNode {
        ParseNode {
            tag: tag.into(),
            contents: String::new(),
            children,
        }
    }
}

/// convert a parse tree into a lispy value. the root and `sexpr` nodes become
/// s-expressions, `qexpr` nodes become q-expressions.
pub fn read(node: &ParseNode) -> Value {
    if node.tag.contains("number") {
        return read_number(&node.contents);
    }
    if node.tag.contains("symbol") {
        return Symbol(node.contents.clone());
    }
    if node.tag.contains("string") {
        return read_string(&node.contents);
    }

    let children: Vec<Value> = node
        .children
        .iter()
        .filter(|child| !is_noise(child))
        .map(read)
        .collect();

    if node.tag.contains("qexpr") {
        Qexpr(children)
    } else {
        Sexpr(children)
    }
}

/// brackets, regex anchors and comments carry no meaning of their own
fn is_noise(node: &ParseNode) -> bool {
    match node.contents.as_str() {
        "(" | ")" | "{" | "}" => true,
        _ => node.tag == "regex" || node.tag.contains("comment"),
    }
}

fn read_number(text: &str) -> Value {
    match text.parse::<i64>() {
        Ok(n) => Number(n),
        Err(_) => RunError::InvalidNumber(text.to_owned()).into(),
    }
}

fn read_string(text: &str) -> Value {
    let inner = text
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(text);
    Str(unescape(inner))
}

/// decode backslash escapes. unknown escapes are kept as written.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('a')  => out.push('\x07'),
            Some('b')  => out.push('\x08'),
            Some('f')  => out.push('\x0c'),
            Some('n')  => out.push('\n'),
            Some('r')  => out.push('\r'),
            Some('t')  => out.push('\t'),
            Some('v')  => out.push('\x0b'),
            Some('0')  => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"')  => out.push('"'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

/// re-apply the escapes `unescape` decodes
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\x07' => out.push_str("\\a"),
            '\x08' => out.push_str("\\b"),
            '\x0c' => out.push_str("\\f"),
            '\n'   => out.push_str("\\n"),
            '\r'   => out.push_str("\\r"),
            '\t'   => out.push_str("\\t"),
            '\x0b' => out.push_str("\\v"),
            '\0'   => out.push_str("\\0"),
            '\\'   => out.push_str("\\\\"),
            '\''   => out.push_str("\\'"),
            '"'    => out.push_str("\\\""),
            _      => out.push(c),
        }
    }
    out
}

// {{{ tests
#[cfg(test)]
mod tests {
    use super::*;

    fn bracket(c: &str) -> ParseNode {
        ParseNode::leaf("char", c)
    }

    #[test]
    fn reads_atoms() {
        assert_eq!(read(&ParseNode::leaf("expr|number|regex", "-42")), Number(-42));
        assert_eq!(
            read(&ParseNode::leaf("expr|symbol|regex", "head")),
            Symbol("head".to_owned())
        );
        assert_eq!(
            read(&ParseNode::leaf("expr|string|regex", "\"a\\tb\"")),
            Str("a\tb".to_owned())
        );
    }

    #[test]
    fn out_of_range_number_is_an_error_value() {
        let v = read(&ParseNode::leaf("number", "99999999999999999999"));
        assert_eq!(v, Error("invalid number: 99999999999999999999".to_owned()));
    }

    #[test]
    fn skips_structural_noise() {
        let qexpr = ParseNode::branch(
            "expr|qexpr",
            vec![
                bracket("{"),
                ParseNode::leaf("expr|number|regex", "1"),
                ParseNode::leaf("comment", "; nothing"),
                ParseNode::leaf("expr|symbol|regex", "x"),
                bracket("}"),
            ],
        );
        let root = ParseNode::branch(
            ">",
            vec![
                ParseNode::leaf("regex", ""),
                ParseNode::leaf("expr|symbol|regex", "len"),
                qexpr,
                ParseNode::leaf("regex", ""),
            ],
        );

        assert_eq!(
            read(&root),
            Sexpr(vec![
                Symbol("len".to_owned()),
                Qexpr(vec![Number(1), Symbol("x".to_owned())]),
            ])
        );
    }

    #[test]
    fn composed_tags_are_recognised() {
        let node = ParseNode::branch(
            "expr|sexpr|regex",
            vec![bracket("("), ParseNode::leaf("number", "7"), bracket(")")],
        );
        assert_eq!(read(&node), Sexpr(vec![Number(7)]));
    }

    #[test]
    fn escapes_round_trip_through_display() {
        let raw = "tab\there \"quoted\" back\\slash\n";
        assert_eq!(unescape(&escape(raw)), raw);
        assert_eq!(escape("it's"), "it\\'s");
        assert_eq!(unescape("\\q"), "\\q");
    }
}
// }}}
