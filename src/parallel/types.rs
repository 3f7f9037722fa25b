//! Type definitions for parallel processing
//!
//! Contains shard descriptors, per-shard results, and configuration.

use std::path::PathBuf;

use crate::stats::{ScanStats, TraceStats};

/// Where a shard stops reading and which boundary lines it owns.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// Read lines while the stream position is `<= offset + len`. The first partial
    /// line after `offset` is always discarded, so a shard owns lines starting in
    /// `(offset, offset + len]` (the first shard also owns offset 0).
    #[default]
    Inclusive,
    /// Read lines while the stream position is `< offset + len`. A shard owns exactly
    /// the lines whose first byte lies in `[offset, offset + len)`.
    Exact,
}

impl BoundaryPolicy {
    pub fn contains(self, position: u64, end: u64) -> bool {
        match self {
            BoundaryPolicy::Inclusive => position <= end,
            BoundaryPolicy::Exact => position < end,
        }
    }
}

/// A contiguous byte range of the trace assigned to one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shard {
    pub index: usize,
    pub offset: u64,
    pub len: u64,
}

impl Shard {
    pub fn end(&self) -> u64 {
        self.offset + self.len
    }
}

/// What a worker hands back after scanning its shard
#[derive(Debug)]
pub struct ShardResult {
    pub shard: Shard,
    pub stats: TraceStats,
    pub scan: ScanStats,
}

/// Configuration for parallel processing
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    pub num_workers: usize,
    pub boundary: BoundaryPolicy,
}

impl ParallelConfig {
    /// Worker count used when none is requested: one per CPU, at least one
    pub fn auto_workers() -> usize {
        num_cpus::get().max(1)
    }
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_workers: Self::auto_workers(),
            boundary: BoundaryPolicy::default(),
        }
    }
}

/// Final output of the scan and merge phases
#[derive(Debug)]
pub struct ProcessedTrace {
    pub path: PathBuf,
    pub file_size: u64,
    pub stats: TraceStats,
    pub scan: ScanStats,
}
