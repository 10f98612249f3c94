use crate::query::lexer::{Lexer, Token};
use serde::{Deserialize, Serialize};

/// Query AST node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    /// Leaf; matches when the subject contains the value as a
    /// case-insensitive substring
    Term(String),
    /// Both children must match
    And(Box<Node>, Box<Node>),
    /// Either child can match
    Or(Box<Node>, Box<Node>),
    /// Child must not match
    Not(Box<Node>),
}

/// A compiled search expression, reusable across many `exec` calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledQuery {
    /// Root of the expression tree; `None` when the input produced no tokens
    pub root: Option<Node>,
    /// Reserved unrecoverable-failure flag; `exec` refuses to evaluate when
    /// set. No compile path currently sets it.
    pub error: bool,
}

impl CompiledQuery {
    /// Check if the query places no constraint at all
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Term values not located under any `Not`, in query order.
    /// These are the substrings worth highlighting in matched text.
    pub fn positive_terms(&self) -> Vec<&str> {
        let mut terms = Vec::new();
        if let Some(root) = &self.root {
            root.collect_positive_terms(&mut terms);
        }
        terms.retain(|t| !t.is_empty());
        terms
    }
}

impl Node {
    fn collect_positive_terms<'a>(&'a self, terms: &mut Vec<&'a str>) {
        match self {
            Node::Term(value) => terms.push(value),
            Node::And(left, right) | Node::Or(left, right) => {
                left.collect_positive_terms(terms);
                right.collect_positive_terms(terms);
            }
            Node::Not(_) => {}
        }
    }
}

/// Compile a search string into an expression tree.
///
/// Never fails: malformed input degrades instead of erroring, so an
/// incremental-search caller can recompile on every keystroke. Unmatched
/// `)` ends the expression being parsed, an unmatched `(` consumes to the
/// end of input, and a trailing `-` or `|` with nothing after it is
/// dropped.
pub fn compile(query: &str) -> CompiledQuery {
    let mut parser = Parser::new(query);
    CompiledQuery {
        root: parser.expression(true),
        error: false,
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    fn new(query: &'a str) -> Self {
        Self {
            lexer: Lexer::new(query),
        }
    }

    /// The single grammar production. Operands accumulate left to right:
    /// adjacent operands AND together, `|` folds the whole accumulated left
    /// side with one following operand, `-` negates one following operand.
    /// So `a|b c` parses as `(a|b) AND c`, not `a|(b AND c)`.
    ///
    /// When `greedy` is false the loop stops after producing one operand;
    /// `-` and `|` bind to exactly one following unit this way. Greedy mode
    /// runs until end of input or `)`, for the top level and groups.
    fn expression(&mut self, greedy: bool) -> Option<Node> {
        let mut node: Option<Node> = None;

        loop {
            match self.lexer.next_token() {
                None | Some(Token::Close) => return node,

                Some(Token::Not) => {
                    // A '-' with no operand after it is dropped
                    if let Some(operand) = self.expression(false) {
                        node = Some(Self::and(node, Node::Not(Box::new(operand))));
                    }
                }

                Some(Token::Open) => {
                    // An empty group '()' contributes nothing
                    if let Some(group) = self.expression(true) {
                        node = Some(Self::and(node, group));
                    }
                }

                Some(Token::Or) => {
                    // A trailing '|' with no right side is ignored
                    if let Some(right) = self.expression(false) {
                        node = Some(match node {
                            Some(left) => Node::Or(Box::new(left), Box::new(right)),
                            None => right,
                        });
                    }
                }

                Some(Token::Term(term)) => {
                    node = Some(Self::and(node, Node::Term(term.to_lowercase())));
                }
            }

            if !greedy && node.is_some() {
                return node;
            }
        }
    }

    /// Juxtaposition: the first operand stands alone, later ones AND on
    fn and(node: Option<Node>, next: Node) -> Node {
        match node {
            Some(node) => Node::And(Box::new(node), Box::new(next)),
            None => next,
        }
    }
}
