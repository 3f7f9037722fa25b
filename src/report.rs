//! Sorted access reports
//!
//! Four plain-text reports are produced from the merged statistics, one row per key:
//!
//! ```text
//! <key> <read count> <write count> <distinct threads>
//! ```
//!
//! Addresses are rendered as `0x`-prefixed lowercase hex, sources verbatim. Rows are
//! sorted by the report's count in descending order; equal counts fall back to the
//! key in ascending order so output is deterministic.

use anyhow::{Context, Result};
use std::cmp::Ordering;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::event::Address;
use crate::stats::{AccessStats, TraceStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    AddressByRead,
    AddressByWrite,
    SourceByRead,
    SourceByWrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortField {
    Read,
    Write,
}

impl SortField {
    fn count(self, stats: &AccessStats) -> u64 {
        match self {
            SortField::Read => stats.read_count,
            SortField::Write => stats.write_count,
        }
    }
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::AddressByRead,
        ReportKind::AddressByWrite,
        ReportKind::SourceByRead,
        ReportKind::SourceByWrite,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ReportKind::AddressByRead => "address-read-sort.txt",
            ReportKind::AddressByWrite => "address-write-sort.txt",
            ReportKind::SourceByRead => "source-read-sort.txt",
            ReportKind::SourceByWrite => "source-write-sort.txt",
        }
    }

    fn sort_field(self) -> SortField {
        match self {
            ReportKind::AddressByRead | ReportKind::SourceByRead => SortField::Read,
            ReportKind::AddressByWrite | ReportKind::SourceByWrite => SortField::Write,
        }
    }
}

/// One rendered line of a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub key: String,
    pub read_count: u64,
    pub write_count: u64,
    pub thread_count: usize,
}

impl ReportRow {
    fn new(key: String, stats: &AccessStats) -> Self {
        Self {
            key,
            read_count: stats.read_count,
            write_count: stats.write_count,
            thread_count: stats.thread_count(),
        }
    }
}

impl fmt::Display for ReportRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.key, self.read_count, self.write_count, self.thread_count
        )
    }
}

pub fn format_address(address: Address) -> String {
    format!("0x{:x}", address)
}

/// Descending by count, then ascending by key
fn sorted_entries<'a, K: Ord>(
    entries: impl Iterator<Item = (K, &'a AccessStats)>,
    field: SortField,
) -> Vec<(K, &'a AccessStats)> {
    let mut sorted: Vec<_> = entries.collect();
    sorted.sort_by(|(ka, a), (kb, b)| match field.count(b).cmp(&field.count(a)) {
        Ordering::Equal => ka.cmp(kb),
        other => other,
    });
    sorted
}

/// Build the rows of one report, optionally keeping only the first `top` rows
pub fn build_report(stats: &TraceStats, kind: ReportKind, top: Option<usize>) -> Vec<ReportRow> {
    let field = kind.sort_field();
    let limit = top.unwrap_or(usize::MAX);

    match kind {
        ReportKind::AddressByRead | ReportKind::AddressByWrite => {
            sorted_entries(stats.addresses.iter().map(|(k, v)| (*k, v)), field)
                .into_iter()
                .take(limit)
                .map(|(address, entry)| ReportRow::new(format_address(address), entry))
                .collect()
        }
        ReportKind::SourceByRead | ReportKind::SourceByWrite => {
            sorted_entries(stats.sources.iter().map(|(k, v)| (k.as_str(), v)), field)
                .into_iter()
                .take(limit)
                .map(|(source, entry)| ReportRow::new(source.to_string(), entry))
                .collect()
        }
    }
}

pub fn write_rows<W: Write>(rows: &[ReportRow], out: &mut W) -> std::io::Result<()> {
    for row in rows {
        writeln!(out, "{}", row)?;
    }
    Ok(())
}

/// Write all four reports into `dir`, creating or truncating each file.
/// Returns the written paths in report order.
pub fn write_reports(stats: &TraceStats, dir: &Path, top: Option<usize>) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(ReportKind::ALL.len());

    for kind in ReportKind::ALL {
        let path = dir.join(kind.file_name());
        let rows = build_report(stats, kind, top);

        let file = File::create(&path)
            .with_context(|| format!("Cannot create report file '{}'", path.display()))?;
        let mut out = BufWriter::new(file);
        write_rows(&rows, &mut out)
            .and_then(|_| out.flush())
            .with_context(|| format!("Failed to write report '{}'", path.display()))?;

        written.push(path);
    }

    Ok(written)
}
