use crate::error::{QueryError, QueryResult};
use std::fmt;

/// Query AST node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryNode {
    /// Single dictionary term, as typed
    Term(String),
    /// Boolean AND (all must match), evaluated left to right
    And(Vec<QueryNode>),
    /// Boolean OR (any can match), evaluated left to right
    Or(Vec<QueryNode>),
    /// Boolean NOT (complement against the universe)
    Not(Box<QueryNode>),
}

impl QueryNode {
    /// All terms referenced by the query, in source order
    pub fn terms(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_terms(&mut out);
        out
    }

    fn collect_terms<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            QueryNode::Term(term) => out.push(term),
            QueryNode::And(nodes) | QueryNode::Or(nodes) => {
                for node in nodes {
                    node.collect_terms(out);
                }
            }
            QueryNode::Not(inner) => inner.collect_terms(out),
        }
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryNode::Term(term) => write!(f, "{}", term),
            QueryNode::And(nodes) => write_joined(f, nodes, " AND "),
            QueryNode::Or(nodes) => write_joined(f, nodes, " OR "),
            QueryNode::Not(inner) => write!(f, "NOT {}", inner),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, nodes: &[QueryNode], sep: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", node)?;
    }
    write!(f, ")")
}

/// Reserved operator keywords, matched case-insensitively
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    And,
    Or,
    Not,
}

impl Operator {
    fn keyword(self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Not => "NOT",
        }
    }

    fn matches(self, token: &str) -> bool {
        token.eq_ignore_ascii_case(self.keyword())
    }
}

fn is_operator(token: &str) -> bool {
    [Operator::And, Operator::Or, Operator::Not]
        .iter()
        .any(|op| op.matches(token))
}

/// Split a query line into tokens.
///
/// Whitespace separates tokens; `(` and `)` are always tokens of their own.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in input.chars() {
        if ch.is_whitespace() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else if ch == '(' || ch == ')' {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            tokens.push(ch.to_string());
        } else {
            current.push(ch);
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Parse a query string into an AST
pub fn parse_query(input: &str) -> QueryResult<QueryNode> {
    let tokens = tokenize(input);
    QueryParser::new(&tokens).parse()
}

/// Recursive-descent parser over a token list
struct QueryParser<'a> {
    tokens: &'a [String],
    pos: usize,
}

impl<'a> QueryParser<'a> {
    fn new(tokens: &'a [String]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn parse(&mut self) -> QueryResult<QueryNode> {
        let root = self.parse_or()?;
        match self.peek() {
            Some(token) => Err(QueryError::TrailingToken(token.to_string())),
            None => Ok(root),
        }
    }

    fn parse_or(&mut self) -> QueryResult<QueryNode> {
        let mut nodes = vec![self.parse_and()?];
        while self.consume_operator(Operator::Or) {
            nodes.push(self.parse_and()?);
        }
        Ok(collapse(nodes, QueryNode::Or))
    }

    fn parse_and(&mut self) -> QueryResult<QueryNode> {
        let mut nodes = vec![self.parse_not()?];
        while self.consume_operator(Operator::And) {
            nodes.push(self.parse_not()?);
        }
        Ok(collapse(nodes, QueryNode::And))
    }

    fn parse_not(&mut self) -> QueryResult<QueryNode> {
        if self.consume_operator(Operator::Not) {
            let inner = self.parse_not()?;
            return Ok(QueryNode::Not(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> QueryResult<QueryNode> {
        if self.consume("(") {
            let node = self.parse_or()?;
            if !self.consume(")") {
                return Err(QueryError::MissingCloseParen);
            }
            return Ok(node);
        }

        // A stray ")" here is looked up like any other term
        let token = self.peek().ok_or(QueryError::UnexpectedEnd)?;
        if is_operator(token) {
            return Err(QueryError::ExpectedTerm(token.to_string()));
        }

        let term = token.to_string();
        self.pos += 1;
        Ok(QueryNode::Term(term))
    }

    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn consume(&mut self, expected: &str) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn consume_operator(&mut self, op: Operator) -> bool {
        match self.peek() {
            Some(token) if op.matches(token) => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }
}

/// A single operand stands for itself; more become one n-ary node
fn collapse(mut nodes: Vec<QueryNode>, make: fn(Vec<QueryNode>) -> QueryNode) -> QueryNode {
    if nodes.len() == 1 {
        nodes.remove(0)
    } else {
        make(nodes)
    }
}
