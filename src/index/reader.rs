use crate::index::postings::{open_store, PostingsStore};
use crate::index::types::*;
use ahash::AHashMap;
use anyhow::{bail, Context, Result};
use lru::LruCache;
use std::fs;
use std::io;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// In-memory term dictionary
pub struct Dictionary {
    entries: AHashMap<String, DictEntry>,
}

impl Dictionary {
    /// Parse the tab-separated dictionary artifact.
    ///
    /// The first line is a header. Empty rows and rows with fewer than four
    /// fields are skipped, but a number that fails to parse rejects the
    /// whole file. When a term repeats, the first row wins.
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = AHashMap::new();

        for (line_no, line) in text.lines().enumerate().skip(1) {
            if line.is_empty() {
                continue;
            }

            let mut fields = line.split('\t');
            let (Some(term), Some(df), Some(offset), Some(length)) =
                (fields.next(), fields.next(), fields.next(), fields.next())
            else {
                continue;
            };

            let entry = DictEntry {
                doc_freq: parse_field(df, "df", line_no)?,
                offset: parse_field(offset, "offset", line_no)?,
                length: parse_field(length, "len", line_no)?,
            };
            entries.entry(term.to_string()).or_insert(entry);
        }

        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Cannot open dict: {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid dict: {}", path.display()))
    }

    pub fn get(&self, term: &str) -> Option<&DictEntry> {
        self.entries.get(term)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DictEntry)> {
        self.entries.iter().map(|(term, entry)| (term.as_str(), entry))
    }
}

fn parse_field<T: std::str::FromStr>(value: &str, name: &str, line_no: usize) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("line {}: bad {} value '{}'", line_no + 1, name, value))
}

/// Parse the max-doc artifact: one decimal integer, never zero
pub fn parse_max_doc(text: &str) -> Result<DocId> {
    let value: DocId = text
        .split_whitespace()
        .next()
        .context("empty maxdoc")?
        .parse()
        .context("maxdoc is not a number")?;

    if value == 0 {
        bail!("maxdoc must be at least 1");
    }
    Ok(value)
}

pub fn load_max_doc(path: &Path) -> Result<DocId> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Cannot open maxdoc: {}", path.display()))?;
    parse_max_doc(&text).with_context(|| format!("Invalid maxdoc in: {}", path.display()))
}

/// Read-only view of a built index used by a query session
pub struct IndexReader {
    dict: Dictionary,
    max_doc: DocId,
    postings: Box<dyn PostingsStore>,
    cache: Option<Mutex<LruCache<String, Arc<Vec<DocId>>>>>,
}

impl IndexReader {
    /// Load the dictionary and max doc id and open the postings blob
    pub fn open(paths: &IndexPaths, options: &ReaderOptions) -> Result<Self> {
        let dict = Dictionary::load(&paths.dict)?;
        let max_doc = load_max_doc(&paths.maxdoc)?;
        let postings = open_store(&paths.postings, options.access)?;

        Self::from_parts(dict, max_doc, postings, options.cache_size).with_context(|| {
            format!("Index does not match postings: {}", paths.postings.display())
        })
    }

    /// Assemble a reader, checking every dictionary range against the blob
    pub fn from_parts(
        dict: Dictionary,
        max_doc: DocId,
        postings: Box<dyn PostingsStore>,
        cache_size: usize,
    ) -> Result<Self> {
        let blob_len = postings.len();
        for (term, entry) in dict.iter() {
            if entry.length % POSTING_WIDTH != 0 {
                bail!(
                    "term '{}': length {} is not a multiple of {}",
                    term,
                    entry.length,
                    POSTING_WIDTH
                );
            }
            if entry.doc_freq as usize != entry.posting_count() {
                bail!(
                    "term '{}': df {} does not match length {}",
                    term,
                    entry.doc_freq,
                    entry.length
                );
            }
            let in_bounds = entry
                .offset
                .checked_add(entry.length)
                .is_some_and(|end| end <= blob_len);
            if !in_bounds {
                bail!(
                    "term '{}': range {}+{} exceeds postings size {}",
                    term,
                    entry.offset,
                    entry.length,
                    blob_len
                );
            }
        }

        let cache = NonZeroUsize::new(cache_size).map(|n| Mutex::new(LruCache::new(n)));

        Ok(Self {
            dict,
            max_doc,
            postings,
            cache,
        })
    }

    pub fn lookup(&self, term: &str) -> Option<&DictEntry> {
        self.dict.get(term)
    }

    /// Posting list delimited by `entry`, read from the blob without caching
    pub fn read_postings(&self, entry: &DictEntry) -> io::Result<Vec<DocId>> {
        self.postings.read(entry)
    }

    /// Posting list for a term, looked up case-insensitively.
    ///
    /// A term missing from the dictionary yields an empty list.
    pub fn postings_for_term(&self, term: &str) -> io::Result<Arc<Vec<DocId>>> {
        let key = term.to_lowercase();

        let Some(entry) = self.dict.get(&key) else {
            debug!(term = %key, "term not in dictionary");
            return Ok(Arc::new(Vec::new()));
        };

        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.lock().ok().and_then(|mut c| c.get(&key).cloned()) {
                return Ok(hit);
            }
        }

        let docs = Arc::new(self.read_postings(entry)?);

        if let Some(cache) = &self.cache {
            if let Ok(mut c) = cache.lock() {
                c.put(key, docs.clone());
            }
        }

        Ok(docs)
    }

    pub fn max_doc(&self) -> DocId {
        self.max_doc
    }

    pub fn term_count(&self) -> usize {
        self.dict.len()
    }

    pub fn postings_bytes(&self) -> u64 {
        self.postings.len()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::utils::{decode_postings, encode_postings};

    /// Postings held in memory, for tests that don't need a file
    pub struct VecStore(pub Vec<u8>);

    impl PostingsStore for VecStore {
        fn read(&self, entry: &DictEntry) -> io::Result<Vec<DocId>> {
            let start = entry.offset as usize;
            let end = start + entry.length as usize;
            Ok(decode_postings(&self.0[start..end]))
        }

        fn len(&self) -> u64 {
            self.0.len() as u64
        }
    }

    /// a -> [1,2,3], b -> [2,3,4], max doc 4
    pub fn fixture_reader(cache_size: usize) -> IndexReader {
        let dict = Dictionary::parse("term\tdf\toffset\tlen\na\t3\t0\t12\nb\t3\t12\t12\n").unwrap();
        let mut blob = Vec::new();
        encode_postings(&[1, 2, 3, 2, 3, 4], &mut blob);
        IndexReader::from_parts(dict, 4, Box::new(VecStore(blob)), cache_size).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::reader::testing::{fixture_reader, VecStore};

    #[test]
    fn test_parse_dictionary() {
        let text = "term\tdf\toffset\tlen\napple\t2\t0\t8\nbanana\t1\t8\t4\n";
        let dict = Dictionary::parse(text).unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(
            dict.get("banana"),
            Some(&DictEntry { doc_freq: 1, offset: 8, length: 4 })
        );
        assert!(dict.get("term").is_none());
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let text = "term\tdf\toffset\tlen\nbroken\t1\t0\n\nok\t1\t0\t4\n";
        let dict = Dictionary::parse(text).unwrap();
        assert_eq!(dict.len(), 1);
        assert!(dict.get("broken").is_none());
    }

    #[test]
    fn test_bad_number_rejects_whole_dictionary() {
        let err = Dictionary::parse("term\tdf\toffset\tlen\nok\t1\t0\t4\nbad\tx\t4\t4\n")
            .err()
            .unwrap();
        assert!(format!("{:#}", err).contains("bad df value"));
    }

    #[test]
    fn test_first_duplicate_wins() {
        let dict = Dictionary::parse("term\tdf\toffset\tlen\nt\t1\t0\t4\nt\t2\t4\t8\n").unwrap();
        assert_eq!(dict.get("t").unwrap().offset, 0);
    }

    #[test]
    fn test_parse_max_doc() {
        assert_eq!(parse_max_doc("42\n").unwrap(), 42);
        assert!(parse_max_doc("0\n").is_err());
        assert!(parse_max_doc("").is_err());
        assert!(parse_max_doc("many").is_err());
    }

    #[test]
    fn test_postings_for_term_case_insensitive() {
        let reader = fixture_reader(0);
        assert_eq!(*reader.postings_for_term("A").unwrap(), vec![1, 2, 3]);
        assert_eq!(*reader.postings_for_term("b").unwrap(), vec![2, 3, 4]);
        assert!(reader.postings_for_term("zzz").unwrap().is_empty());
    }

    #[test]
    fn test_cached_lookups_match_uncached() {
        let reader = fixture_reader(1);
        for _ in 0..2 {
            assert_eq!(*reader.postings_for_term("a").unwrap(), vec![1, 2, 3]);
            assert_eq!(*reader.postings_for_term("b").unwrap(), vec![2, 3, 4]);
        }
    }

    #[test]
    fn test_out_of_range_entry_rejected() {
        let dict = Dictionary::parse("term\tdf\toffset\tlen\na\t3\t4\t12\n").unwrap();
        let err = IndexReader::from_parts(dict, 3, Box::new(VecStore(vec![0; 12])), 0)
            .err()
            .unwrap();
        assert!(err.to_string().contains("exceeds postings size"));
    }

    #[test]
    fn test_read_postings_by_entry() {
        let reader = fixture_reader(0);
        let entry = *reader.lookup("b").unwrap();
        assert_eq!(reader.read_postings(&entry).unwrap(), vec![2, 3, 4]);
        assert!(reader.lookup("B").is_none());
    }

    #[test]
    fn test_doc_freq_mismatch_rejected() {
        let dict = Dictionary::parse("term\tdf\toffset\tlen\na\t2\t0\t12\n").unwrap();
        let err = IndexReader::from_parts(dict, 3, Box::new(VecStore(vec![0; 12])), 0)
            .err()
            .unwrap();
        assert!(err.to_string().contains("does not match length"));
    }

    #[test]
    fn test_misaligned_entry_rejected() {
        let dict = Dictionary::parse("term\tdf\toffset\tlen\na\t1\t0\t3\n").unwrap();
        assert!(IndexReader::from_parts(dict, 1, Box::new(VecStore(vec![0; 4])), 0).is_err());
    }
}
