use crate::error::{QueryError, QueryResult};
use crate::index::reader::IndexReader;
use crate::index::types::DocId;
use crate::query::parser::{parse_query, QueryNode};
use crate::query::setops::{difference, intersect, union, universe};

/// Evaluates parsed queries against an open index.
///
/// The universe `[1..=max_doc]` is materialized once here and reused by
/// every NOT.
pub struct QueryExecutor<'a> {
    reader: &'a IndexReader,
    universe: Vec<DocId>,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(reader: &'a IndexReader) -> Self {
        Self {
            reader,
            universe: universe(reader.max_doc()),
        }
    }

    /// Parse and evaluate one query line
    pub fn search(&self, input: &str) -> QueryResult<Vec<DocId>> {
        let query = parse_query(input)?;
        self.execute(&query)
    }

    /// Evaluate an AST to an ascending, duplicate-free document list
    pub fn execute(&self, node: &QueryNode) -> QueryResult<Vec<DocId>> {
        match node {
            QueryNode::Term(term) => self
                .reader
                .postings_for_term(term)
                .map(|docs| docs.as_ref().clone())
                .map_err(|source| QueryError::Postings {
                    term: term.clone(),
                    source,
                }),
            QueryNode::And(nodes) => self.fold(nodes, intersect),
            QueryNode::Or(nodes) => self.fold(nodes, union),
            QueryNode::Not(inner) => {
                let docs = self.execute(inner)?;
                Ok(difference(&self.universe, &docs))
            }
        }
    }

    /// Left-to-right combination of operands
    fn fold(
        &self,
        nodes: &[QueryNode],
        combine: fn(&[DocId], &[DocId]) -> Vec<DocId>,
    ) -> QueryResult<Vec<DocId>> {
        let mut iter = nodes.iter();
        let mut acc = match iter.next() {
            Some(first) => self.execute(first)?,
            None => return Ok(Vec::new()),
        };
        for node in iter {
            let rhs = self.execute(node)?;
            acc = combine(&acc, &rhs);
        }
        Ok(acc)
    }

    pub fn universe(&self) -> &[DocId] {
        &self.universe
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::reader::testing::fixture_reader;

    fn fixture() -> IndexReader {
        fixture_reader(0)
    }

    #[test]
    fn test_boolean_fixture() {
        let reader = fixture();
        let exec = QueryExecutor::new(&reader);

        assert_eq!(exec.search("a AND b").unwrap(), vec![2, 3]);
        assert_eq!(exec.search("a OR b").unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(exec.search("NOT a").unwrap(), vec![4]);
        assert_eq!(exec.search("(a OR b) AND NOT a").unwrap(), vec![4]);
    }

    #[test]
    fn test_stacked_not_restores_set() {
        let reader = fixture();
        let exec = QueryExecutor::new(&reader);
        assert_eq!(exec.search("NOT NOT a").unwrap(), vec![1, 2, 3]);
        assert_eq!(exec.search("not not not b").unwrap(), vec![1]);
    }

    #[test]
    fn test_unknown_term_is_empty_not_error() {
        let reader = fixture();
        let exec = QueryExecutor::new(&reader);
        assert!(exec.search("zzz").unwrap().is_empty());
        assert_eq!(exec.search("zzz OR a").unwrap(), vec![1, 2, 3]);
        assert_eq!(exec.search("NOT zzz").unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_case_insensitive_terms() {
        let reader = fixture();
        let exec = QueryExecutor::new(&reader);
        assert_eq!(exec.search("A and B").unwrap(), vec![2, 3]);
    }

    #[test]
    fn test_syntax_errors_propagate() {
        let reader = fixture();
        let exec = QueryExecutor::new(&reader);
        assert!(matches!(exec.search("AND foo"), Err(QueryError::ExpectedTerm(_))));
        assert!(matches!(exec.search("(a AND b"), Err(QueryError::MissingCloseParen)));
    }

    #[test]
    fn test_universe_materialized() {
        let reader = fixture();
        let exec = QueryExecutor::new(&reader);
        assert_eq!(exec.universe(), &[1, 2, 3, 4]);
    }
}
