pub mod build;
pub mod postings;
pub mod reader;
pub mod types;
pub mod writer;

pub use build::build_index;
pub use postings::PostingsStore;
pub use reader::IndexReader;
pub use types::*;
pub use writer::IndexWriter;
