pub mod executor;
pub mod parser;
pub mod setops;

pub use executor::QueryExecutor;
pub use parser::{parse_query, tokenize, QueryNode};
