use anyhow::Result;
use boolsearch::index::{build_index, BuildConfig};
use boolsearch::utils::init_logging;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "build-index")]
#[command(about = "Build a boolean search index from per-document term files")]
struct Cli {
    /// Directory of term files, one per document (e.g. stems/000123.stm)
    #[arg(long)]
    stems: PathBuf,

    /// Output directory for dict.tsv, postings.bin and maxdoc.txt
    #[arg(long, default_value = "index")]
    out: PathBuf,

    /// Glob a file name must match to be indexed
    #[arg(long, default_value = "*.stm")]
    pattern: String,

    /// Do not draw a progress bar
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = BuildConfig {
        stems_dir: cli.stems,
        out_dir: cli.out,
        pattern: cli.pattern,
        quiet: cli.quiet,
    };

    build_index(&config)?;
    Ok(())
}
