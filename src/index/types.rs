use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Unique identifier for a document in the index
pub type DocId = u32;

/// Dictionary file name inside an index directory
pub const DICT_FILE: &str = "dict.tsv";

/// Postings blob file name inside an index directory
pub const POSTINGS_FILE: &str = "postings.bin";

/// Max-doc-id file name inside an index directory
pub const MAXDOC_FILE: &str = "maxdoc.txt";

/// Build metadata file name inside an index directory
pub const META_FILE: &str = "meta.json";

/// Header row of the dictionary artifact
pub const DICT_HEADER: &str = "term\tdf\toffset\tlen";

/// Width of one encoded posting in bytes
pub const POSTING_WIDTH: u64 = 4;

/// Dictionary entry mapping a term to its postings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictEntry {
    pub doc_freq: u32,
    pub offset: u64,
    pub length: u64,
}

impl DictEntry {
    /// Number of postings implied by the byte length
    pub fn posting_count(&self) -> usize {
        (self.length / POSTING_WIDTH) as usize
    }
}

/// Locations of the three artifacts a query session needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPaths {
    pub dict: PathBuf,
    pub postings: PathBuf,
    pub maxdoc: PathBuf,
}

impl IndexPaths {
    /// Artifact paths using the default file names inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            dict: dir.join(DICT_FILE),
            postings: dir.join(POSTINGS_FILE),
            maxdoc: dir.join(MAXDOC_FILE),
        }
    }
}

/// Index metadata stored in meta.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexMeta {
    pub version: u32,
    pub stems_dir: PathBuf,
    pub doc_count: u32,
    pub term_count: u32,
    pub pair_count: u64,
    pub max_doc: DocId,
    /// Files matching the pattern that held no terms
    pub empty_docs: u32,
    /// Files matching the pattern that could not be read
    pub unreadable_docs: u32,
    pub created_at: u64,
}

impl Default for IndexMeta {
    fn default() -> Self {
        Self {
            version: 1,
            stems_dir: PathBuf::new(),
            doc_count: 0,
            term_count: 0,
            pair_count: 0,
            max_doc: 0,
            empty_docs: 0,
            unreadable_docs: 0,
            created_at: 0,
        }
    }
}

/// Configuration for the index builder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Directory holding one term file per document
    pub stems_dir: PathBuf,
    /// Directory the artifacts are written to (created if missing)
    pub out_dir: PathBuf,
    /// Glob a file name must match to count as a document
    pub pattern: String,
    /// Suppress progress output
    pub quiet: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            stems_dir: PathBuf::from("stems"),
            out_dir: PathBuf::from("index"),
            pattern: "*.stm".to_string(),
            quiet: false,
        }
    }
}

/// How the postings blob is accessed at query time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostingsAccess {
    /// One shared file handle, seek then read under a lock
    #[default]
    File,
    /// Read-only memory map with offset reads
    Mmap,
}

/// Options for opening an index
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    pub access: PostingsAccess,
    /// Number of decoded posting lists kept in memory (0 = no cache)
    pub cache_size: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            access: PostingsAccess::File,
            cache_size: 1024,
        }
    }
}

/// Extract a document id from a term file name.
///
/// `stems/000123.stm` yields 123. An all-zero or non-numeric stem yields 0.
pub fn doc_id_from_path(path: &Path) -> DocId {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    let digits = stem.trim_start_matches('0');
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_id_strips_leading_zeros() {
        assert_eq!(doc_id_from_path(Path::new("stems/000123.stm")), 123);
        assert_eq!(doc_id_from_path(Path::new("7.stm")), 7);
    }

    #[test]
    fn test_doc_id_degenerate_stems() {
        assert_eq!(doc_id_from_path(Path::new("0000.stm")), 0);
        assert_eq!(doc_id_from_path(Path::new("readme.stm")), 0);
        assert_eq!(doc_id_from_path(Path::new("12abc.stm")), 0);
    }

    #[test]
    fn test_posting_count() {
        let entry = DictEntry { doc_freq: 3, offset: 8, length: 12 };
        assert_eq!(entry.posting_count(), 3);
    }

    #[test]
    fn test_index_paths_in_dir() {
        let paths = IndexPaths::in_dir(Path::new("idx"));
        assert_eq!(paths.dict, Path::new("idx").join("dict.tsv"));
        assert_eq!(paths.postings, Path::new("idx").join("postings.bin"));
        assert_eq!(paths.maxdoc, Path::new("idx").join("maxdoc.txt"));
    }
}
