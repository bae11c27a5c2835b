//! Utility functions shared by the builder and the query engine.
//!
//! ## Modules
//!
//! - [`encoding`] - Fixed-width little-endian posting encoding
//! - [`logging`] - Tracing subscriber setup for the binaries
//! - [`progress`] - Progress bars (no-op without the `progress` feature)
//!
//! ```
//! use boolsearch::utils::{decode_postings, encode_postings};
//!
//! let mut buf = Vec::new();
//! encode_postings(&[3, 9, 27], &mut buf);
//! assert_eq!(decode_postings(&buf), vec![3, 9, 27]);
//! ```

pub mod encoding;
pub mod logging;
pub mod progress;

pub use encoding::*;
pub use logging::init_logging;
