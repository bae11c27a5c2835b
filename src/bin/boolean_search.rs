use anyhow::Result;
use boolsearch::index::{IndexPaths, IndexReader, PostingsAccess, ReaderOptions};
use boolsearch::query::QueryExecutor;
use boolsearch::session::run_session;
use boolsearch::utils::init_logging;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "boolean-search")]
#[command(about = "Answer AND/OR/NOT queries, one per line on stdin")]
struct Cli {
    /// Dictionary file (dict.tsv)
    #[arg(long, required_unless_present = "index")]
    dict: Option<PathBuf>,

    /// Postings blob (postings.bin)
    #[arg(long, required_unless_present = "index")]
    postings: Option<PathBuf>,

    /// Max document id file (maxdoc.txt)
    #[arg(long, required_unless_present = "index")]
    maxdoc: Option<PathBuf>,

    /// Index directory; supplies any of the three files not given explicitly
    #[arg(long)]
    index: Option<PathBuf>,

    /// Memory-map the postings blob instead of seeking a shared handle
    #[arg(long)]
    mmap: bool,

    /// Posting lists kept in the LRU cache (0 disables it)
    #[arg(long, default_value_t = 1024)]
    cache_size: usize,
}

impl Cli {
    fn index_paths(&self) -> Option<IndexPaths> {
        let base = self.index.as_deref().map(IndexPaths::in_dir);

        Some(IndexPaths {
            dict: self.dict.clone().or_else(|| base.as_ref().map(|p| p.dict.clone()))?,
            postings: self.postings.clone().or_else(|| base.as_ref().map(|p| p.postings.clone()))?,
            maxdoc: self.maxdoc.clone().or_else(|| base.as_ref().map(|p| p.maxdoc.clone()))?,
        })
    }
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let Some(paths) = cli.index_paths() else {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "--dict, --postings and --maxdoc are required unless --index is given",
            )
            .exit();
    };

    let options = ReaderOptions {
        access: if cli.mmap {
            PostingsAccess::Mmap
        } else {
            PostingsAccess::File
        },
        cache_size: cli.cache_size,
    };

    let reader = IndexReader::open(&paths, &options)?;
    let executor = QueryExecutor::new(&reader);

    info!(terms = reader.term_count(), postings_bytes = reader.postings_bytes(), "loaded terms");
    info!("universe docs: 1..{}", reader.max_doc());
    info!("enter queries, one per line; end of input exits");

    let stdin = io::stdin().lock();
    let stdout = BufWriter::new(io::stdout().lock());
    let stats = run_session(&executor, stdin, stdout)?;

    info!(queries = stats.queries, errors = stats.errors, "session ended");
    Ok(())
}
