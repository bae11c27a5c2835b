//! # boolsearch - Boolean retrieval over an inverted index
//!
//! An offline builder turns per-document term files into a compact on-disk
//! index, and a query engine answers AND/OR/NOT expressions against it by
//! merging sorted posting lists.
//!
//! ## Architecture
//!
//! - [`index`] - Index building, the on-disk format, and loading
//! - [`query`] - Query tokenizing, parsing, evaluation and set operations
//! - [`session`] - Line-oriented request/reply loop over stdin/stdout
//! - [`error`] - Recoverable per-query errors
//! - [`utils`] - Posting encoding, logging and progress helpers
//!
//! ## Quick Start
//!
//! ```no_run
//! use boolsearch::index::{IndexPaths, IndexReader, ReaderOptions};
//! use boolsearch::query::QueryExecutor;
//! use std::path::Path;
//!
//! let paths = IndexPaths::in_dir(Path::new("index"));
//! let reader = IndexReader::open(&paths, &ReaderOptions::default()).unwrap();
//! let executor = QueryExecutor::new(&reader);
//!
//! for doc in executor.search("(cat OR dog) AND NOT bird").unwrap() {
//!     println!("{}", doc);
//! }
//! ```
//!
//! ## On-disk format
//!
//! - `dict.tsv` - header `term\tdf\toffset\tlen`, one row per term
//! - `postings.bin` - each term's ascending doc ids as little-endian u32s
//! - `maxdoc.txt` - the largest document id, in decimal
//! - `meta.json` - build statistics (informational only)

pub mod error;
pub mod index;
pub mod query;
pub mod session;
pub mod utils;
