use thiserror::Error;

/// Failure of a single query line.
///
/// These never end a session: the message is reported inline and the next
/// line is read.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("expected term, found operator: {0}")]
    ExpectedTerm(String),

    #[error("expected closing parenthesis")]
    MissingCloseParen,

    #[error("unexpected trailing token: {0}")]
    TrailingToken(String),

    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("failed to read postings for '{term}': {source}")]
    Postings {
        term: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for query parsing and evaluation
pub type QueryResult<T> = std::result::Result<T, QueryError>;
