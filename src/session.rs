//! Line-oriented query session.
//!
//! Each non-blank input line is one query. Replies:
//! - success: `RESULTS <n>`, then one doc id per line, then `END`
//! - failure: a single `ERROR <message>` line
//!
//! A failed query never ends the session; only end of input does.

use crate::error::QueryError;
use crate::index::types::DocId;
use crate::query::QueryExecutor;
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Counters reported when a session ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub queries: u64,
    pub errors: u64,
}

/// Serve queries from `input` until end of input.
///
/// Lines that are empty or whitespace-only get no reply; a line of spaces
/// is treated as blank rather than as a query with no terms. Bytes that are
/// not valid UTF-8 are decoded lossily, so such a line is still answered.
///
/// Only I/O failures on `input` or `output` are returned as errors.
pub fn run_session<R: BufRead, W: Write>(
    executor: &QueryExecutor<'_>,
    mut input: R,
    mut output: W,
) -> io::Result<SessionStats> {
    let mut stats = SessionStats::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        let line = String::from_utf8_lossy(strip_line_ending(&buf));
        if line.trim().is_empty() {
            continue;
        }

        stats.queries += 1;
        match executor.search(&line) {
            Ok(docs) => {
                debug!(query = %line, hits = docs.len(), "query answered");
                write_results(&mut output, &docs)?;
            }
            Err(err) => {
                debug!(query = %line, error = %err, "query failed");
                stats.errors += 1;
                write_error(&mut output, &err)?;
            }
        }
        output.flush()?;
    }

    Ok(stats)
}

fn strip_line_ending(mut line: &[u8]) -> &[u8] {
    if let Some(rest) = line.strip_suffix(b"\n") {
        line = rest;
    }
    if let Some(rest) = line.strip_suffix(b"\r") {
        line = rest;
    }
    line
}

/// Write a success reply
pub fn write_results<W: Write>(out: &mut W, docs: &[DocId]) -> io::Result<()> {
    writeln!(out, "RESULTS {}", docs.len())?;
    for doc in docs {
        writeln!(out, "{}", doc)?;
    }
    writeln!(out, "END")
}

/// Write a failure reply
pub fn write_error<W: Write>(out: &mut W, err: &QueryError) -> io::Result<()> {
    writeln!(out, "ERROR {}", err)
}
