use crate::index::types::*;
use crate::utils::encode_postings;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// A `(term, document)` occurrence collected by the builder
pub type TermDoc = (String, DocId);

/// Consecutive runs of equal terms in a `(term, doc)`-sorted slice.
///
/// Yields each term once with its ascending document list. Adjacent equal
/// documents inside a run are collapsed.
pub struct TermGroups<'a> {
    pairs: &'a [TermDoc],
    pos: usize,
}

impl<'a> TermGroups<'a> {
    pub fn new(pairs: &'a [TermDoc]) -> Self {
        Self { pairs, pos: 0 }
    }
}

impl<'a> Iterator for TermGroups<'a> {
    type Item = (&'a str, Vec<DocId>);

    fn next(&mut self) -> Option<Self::Item> {
        let (term, _) = self.pairs.get(self.pos)?;
        let mut docs: Vec<DocId> = Vec::new();

        while let Some((t, doc)) = self.pairs.get(self.pos) {
            if t != term {
                break;
            }
            if docs.last() != Some(doc) {
                docs.push(*doc);
            }
            self.pos += 1;
        }

        Some((term.as_str(), docs))
    }
}

/// Writes the dictionary, postings and max-doc artifacts
pub struct IndexWriter {
    out_dir: PathBuf,
}

impl IndexWriter {
    /// Prepare the output directory, creating it if needed
    pub fn create(out_dir: &Path) -> Result<Self> {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("Cannot create output directory: {}", out_dir.display()))?;

        Ok(Self {
            out_dir: out_dir.to_path_buf(),
        })
    }

    pub fn paths(&self) -> IndexPaths {
        IndexPaths::in_dir(&self.out_dir)
    }

    /// Write all three artifacts from `(term, doc)`-sorted pairs.
    ///
    /// Returns the number of dictionary rows written.
    pub fn write_index(&self, pairs: &[TermDoc], max_doc: DocId) -> Result<u32> {
        let paths = self.paths();
        let open = |path: &Path| {
            File::create(path).map(BufWriter::new).with_context(|| {
                format!("Cannot open output files in: {}", self.out_dir.display())
            })
        };

        let mut postings_file = open(&paths.postings)?;
        let mut dict_file = open(&paths.dict)?;
        let mut maxdoc_file = open(&paths.maxdoc)?;

        writeln!(maxdoc_file, "{}", max_doc)?;
        maxdoc_file.flush()?;

        writeln!(dict_file, "{}", DICT_HEADER)?;

        let mut postings_offset: u64 = 0;
        let mut term_count: u32 = 0;
        let mut encoded = Vec::new();

        for (term, docs) in TermGroups::new(pairs) {
            encoded.clear();
            encode_postings(&docs, &mut encoded);

            // Write dictionary entry: term, df, offset, length
            writeln!(
                dict_file,
                "{}\t{}\t{}\t{}",
                term,
                docs.len(),
                postings_offset,
                encoded.len()
            )?;

            postings_file.write_all(&encoded)?;
            postings_offset += encoded.len() as u64;
            term_count += 1;
        }

        dict_file.flush()?;
        postings_file.flush()?;
        Ok(term_count)
    }

    /// Write build metadata to meta.json
    pub fn write_meta(&self, meta: &IndexMeta) -> Result<()> {
        let meta_path = self.out_dir.join(META_FILE);
        let file = File::create(&meta_path)
            .with_context(|| format!("Cannot write {}", meta_path.display()))?;
        serde_json::to_writer_pretty(file, meta)?;
        Ok(())
    }
}
