use crate::errors::ParseError;
use crate::reader::ParseNode;

/// parse a string of code into a tagged parse tree:
///
/// ```text
/// number : /-?[0-9]+/ ;
/// symbol : /[a-zA-Z0-9_+\-*\/\\=<>!&%]+/ ;
/// string : /"(\\.|[^"])*"/ ;
/// comment: /;[^\r\n]*/ ;
/// sexpr  : '(' <expr>* ')' ;
/// qexpr  : '{' <expr>* '}' ;
/// lispy  : /^/ <expr>* /$/ ;
/// ```
///
/// comments are dropped here and never reach the reader.
pub fn parse(code: &str) -> Result<ParseNode, ParseError> {
    let mut scanner = Scanner {
        chars: code.chars().collect(),
        pos: 0,
    };

    let mut children = vec![ParseNode::leaf("regex", "")];
    children.extend(scanner.exprs(None)?);
    children.push(ParseNode::leaf("regex", ""));

    Ok(ParseNode::branch(">", children))
}

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "_+-*/\\=<>!&%".contains(c)
}

fn closer(open: char) -> char {
    if open == '(' { ')' } else { '}' }
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
}

impl Scanner {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).cloned()
    }

    /// skip whitespace and line comments
    fn skip_blank(&mut self) {
        while let Some(c) = self.peek() {
            if c == ';' {
                while let Some(c) = self.peek() {
                    if c == '\n' || c == '\r' {
                        break;
                    }
                    self.pos += 1;
                }
            } else if c.is_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// read expressions until end of input (`open` is `None`) or until the
    /// bracket matching `open`, which is left unconsumed
    fn exprs(&mut self, open: Option<char>) -> Result<Vec<ParseNode>, ParseError> {
        let mut nodes = Vec::new();

        loop {
            self.skip_blank();

            let c = match self.peek() {
                Some(c) => c,
                None => {
                    return match open {
                        Some(open) => Err(ParseError::Unclosed(open)),
                        None => Ok(nodes),
                    }
                }
            };

            match c {
                '(' | '{' => nodes.push(self.list(c)?),

                ')' | '}' => {
                    return match open {
                        Some(open) if closer(open) == c => Ok(nodes),
                        Some(open) => Err(ParseError::MismatchedParens {
                            expected: closer(open),
                            found: c,
                        }),
                        None => Err(ParseError::ErroneousToken(c.to_string())),
                    };
                }

                '"' => nodes.push(self.string()?),

                _ => nodes.push(self.atom()?),
            }
        }
    }

    fn list(&mut self, open: char) -> Result<ParseNode, ParseError> {
        self.pos += 1;

        let mut children = vec![ParseNode::leaf("char", open.to_string())];
        children.extend(self.exprs(Some(open))?);
        children.push(ParseNode::leaf("char", closer(open).to_string()));
        self.pos += 1;

        let tag = if open == '(' { "expr|sexpr" } else { "expr|qexpr" };
        Ok(ParseNode::branch(tag, children))
    }

    /// a string is kept verbatim, quotes and escapes included
    fn string(&mut self) -> Result<ParseNode, ParseError> {
        let mut item = String::from("\"");
        self.pos += 1;

        loop {
            let c = self.peek().ok_or(ParseError::UnterminatedString)?;
            self.pos += 1;
            item.push(c);

            match c {
                '\\' => {
                    let escaped = self.peek().ok_or(ParseError::UnterminatedString)?;
                    self.pos += 1;
                    item.push(escaped);
                }
                '"' => return Ok(ParseNode::leaf("expr|string|regex", item)),
                _ => (),
            }
        }
    }

    /// numbers take priority over symbols, as in the grammar's alternation
    fn atom(&mut self) -> Result<ParseNode, ParseError> {
        let start = self.pos;

        let mut end = start;
        if self.chars.get(end) == Some(&'-') {
            end += 1;
        }
        let digits = self.chars[end..]
            .iter()
            .take_while(|c| c.is_ascii_digit())
            .count();

        if digits > 0 {
            self.pos = end + digits;
            let text: String = self.chars[start..self.pos].iter().collect();
            return Ok(ParseNode::leaf("expr|number|regex", text));
        }

        let len = self.chars[start..]
            .iter()
            .take_while(|&&c| is_symbol_char(c))
            .count();

        if len == 0 {
            return Err(ParseError::ErroneousToken(self.chars[start].to_string()));
        }

        self.pos = start + len;
        let text: String = self.chars[start..self.pos].iter().collect();
        Ok(ParseNode::leaf("expr|symbol|regex", text))
    }
}

// {{{ tests
#[cfg(test)]
mod tests {
    use super::*;

    fn tags(node: &ParseNode) -> Vec<(&str, &str)> {
        node.children
            .iter()
            .map(|c| (c.tag.as_str(), c.contents.as_str()))
            .collect()
    }

    #[test]
    fn root_is_wrapped_in_anchors() {
        let tree = parse("+ 1 x").unwrap();
        assert_eq!(tree.tag, ">");
        assert_eq!(
            tags(&tree),
            vec![
                ("regex", ""),
                ("expr|symbol|regex", "+"),
                ("expr|number|regex", "1"),
                ("expr|symbol|regex", "x"),
                ("regex", ""),
            ]
        );
    }

    #[test]
    fn numbers_win_over_symbols() {
        let tree = parse("-5 - 12abc a1").unwrap();
        assert_eq!(
            tags(&tree)[1..6].to_vec(),
            vec![
                ("expr|number|regex", "-5"),
                ("expr|symbol|regex", "-"),
                ("expr|number|regex", "12"),
                ("expr|symbol|regex", "abc"),
                ("expr|symbol|regex", "a1"),
            ]
        );
    }

    #[test]
    fn operator_symbols() {
        let tree = parse("% >= != \\ &").unwrap();
        assert_eq!(
            tags(&tree)[1..6].to_vec(),
            vec![
                ("expr|symbol|regex", "%"),
                ("expr|symbol|regex", ">="),
                ("expr|symbol|regex", "!="),
                ("expr|symbol|regex", "\\"),
                ("expr|symbol|regex", "&"),
            ]
        );
    }

    #[test]
    fn lists_keep_their_brackets() {
        let tree = parse("(head {1 2})").unwrap();
        let sexpr = &tree.children[1];
        assert_eq!(sexpr.tag, "expr|sexpr");
        assert_eq!(sexpr.children.first().unwrap().contents, "(");
        assert_eq!(sexpr.children.last().unwrap().contents, ")");

        let qexpr = &sexpr.children[2];
        assert_eq!(qexpr.tag, "expr|qexpr");
        assert_eq!(qexpr.children.len(), 4);
    }

    #[test]
    fn strings_and_comments() {
        let tree = parse("\"a \\\"b\\\" ; c\" ; trailing comment\n 7").unwrap();
        assert_eq!(
            tags(&tree)[1..3].to_vec(),
            vec![
                ("expr|string|regex", "\"a \\\"b\\\" ; c\""),
                ("expr|number|regex", "7"),
            ]
        );
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(parse("(+ 1 2"), Err(ParseError::Unclosed('('))));
        assert!(matches!(
            parse("{1 2)"),
            Err(ParseError::MismatchedParens { expected: '}', found: ')' })
        ));
        assert!(matches!(parse("1 )"), Err(ParseError::ErroneousToken(_))));
        assert!(matches!(parse("\"open"), Err(ParseError::UnterminatedString)));
        assert!(matches!(parse("#t"), Err(ParseError::ErroneousToken(_))));
    }

    #[test]
    fn empty_input_is_an_empty_program() {
        let tree = parse("   ; only a comment").unwrap();
        assert_eq!(tree.children.len(), 2);
    }
}
// }}}
