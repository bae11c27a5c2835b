use crate::index::types::{doc_id_from_path, BuildConfig, DocId, IndexMeta};
use crate::index::writer::{IndexWriter, TermDoc};
use crate::utils::progress::document_bar;
use anyhow::{bail, Context, Result};
use globset::Glob;
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

/// Terms of a single document (computed in parallel)
enum ProcessedDoc {
    Terms { doc_id: DocId, terms: Vec<String> },
    Empty,
    Unreadable,
}

/// Read one term file: one term per line, empty lines dropped.
///
/// The result is sorted and deduplicated so each `(term, doc)` pair occurs
/// once.
pub fn read_document_terms(path: &Path) -> std::io::Result<Vec<String>> {
    let content = fs::read(path)?;
    let text = String::from_utf8_lossy(&content);

    let mut terms: Vec<String> = text
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    terms.sort_unstable();
    terms.dedup();
    Ok(terms)
}

/// List the document files directly inside `stems_dir` whose file name
/// matches `pattern`, sorted by path
pub fn discover_documents(stems_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if !stems_dir.is_dir() {
        bail!("Stems directory not found: {}", stems_dir.display());
    }

    let matcher = Glob::new(pattern)
        .with_context(|| format!("Invalid document pattern: {}", pattern))?
        .compile_matcher();

    let walker = WalkBuilder::new(stems_dir)
        .max_depth(Some(1))
        .standard_filters(false)
        .follow_links(true)
        .build();

    let mut files: Vec<PathBuf> = walker
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .filter(|entry| matcher.is_match(entry.file_name()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    Ok(files)
}

/// Build the index described by `config`
pub fn build_index(config: &BuildConfig) -> Result<IndexMeta> {
    let writer = IndexWriter::create(&config.out_dir)?;

    let files = discover_documents(&config.stems_dir, &config.pattern)?;
    info!(
        files = files.len(),
        dir = %config.stems_dir.display(),
        "discovered document files"
    );

    // Every matching file counts towards the max id, even one without terms
    let max_doc = files.iter().map(|p| doc_id_from_path(p)).max().unwrap_or(0);

    let progress = document_bar(files.len() as u64, config.quiet);

    let processed: Vec<ProcessedDoc> = files
        .par_iter()
        .map(|path| {
            let doc_id = doc_id_from_path(path);
            if doc_id == 0 {
                warn!(path = %path.display(), "file name does not encode a document id; using 0");
            }

            let result = match read_document_terms(path) {
                Ok(terms) if terms.is_empty() => ProcessedDoc::Empty,
                Ok(terms) => ProcessedDoc::Terms { doc_id, terms },
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "cannot read document");
                    ProcessedDoc::Unreadable
                }
            };

            progress.inc(1);
            result
        })
        .collect();

    progress.finish_and_clear();

    let mut meta = IndexMeta {
        stems_dir: config.stems_dir.clone(),
        max_doc,
        ..IndexMeta::default()
    };

    let mut pairs: Vec<TermDoc> = Vec::new();
    for doc in processed {
        match doc {
            ProcessedDoc::Terms { doc_id, terms } => {
                meta.doc_count += 1;
                pairs.extend(terms.into_iter().map(|term| (term, doc_id)));
            }
            ProcessedDoc::Empty => meta.empty_docs += 1,
            ProcessedDoc::Unreadable => meta.unreadable_docs += 1,
        }
    }

    if pairs.is_empty() {
        bail!(
            "No pairs collected. Check stems directory: {}",
            config.stems_dir.display()
        );
    }

    pairs.par_sort_unstable();
    meta.pair_count = pairs.len() as u64;

    meta.term_count = writer.write_index(&pairs, max_doc)?;
    meta.created_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    writer.write_meta(&meta)?;

    let paths = writer.paths();
    info!(
        docs = meta.doc_count,
        terms = meta.term_count,
        pairs = meta.pair_count,
        max_doc = meta.max_doc,
        "index built"
    );
    info!(
        dict = %paths.dict.display(),
        postings = %paths.postings.display(),
        maxdoc = %paths.maxdoc.display(),
        "index written"
    );
    if meta.unreadable_docs > 0 {
        warn!(count = meta.unreadable_docs, "some documents could not be read");
    }

    Ok(meta)
}
