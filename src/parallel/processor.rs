//! Main parallel processor
//!
//! Plans shards, scans them on a scoped thread group, and merges the results once
//! every worker has been joined.

use anyhow::Result;
use std::path::Path;
use std::thread;
use std::time::Instant;

use crate::parsers::{RecordParser, TraceLineParser};
use crate::platform::Progress;
use crate::stats::ScanStats;

use super::merge::merge_shards;
use super::plan::plan_file;
use super::types::{ParallelConfig, ProcessedTrace, Shard, ShardResult};
use super::worker::scan_shard;

/// Fork-join driver for the scan and merge phases
pub struct ParallelProcessor<P = TraceLineParser> {
    config: ParallelConfig,
    parser: P,
}

impl ParallelProcessor<TraceLineParser> {
    pub fn new(config: ParallelConfig) -> Self {
        Self::with_parser(config, TraceLineParser::new())
    }
}

impl<P: RecordParser + Sync> ParallelProcessor<P> {
    pub fn with_parser(config: ParallelConfig, parser: P) -> Self {
        Self { config, parser }
    }

    pub fn config(&self) -> &ParallelConfig {
        &self.config
    }

    /// Scan every shard in parallel and block until all of them are done.
    ///
    /// Results come back in shard order. The first failing shard (by index) decides the
    /// returned error; a panicking worker is re-raised on the calling thread.
    pub fn scan(&self, path: &Path, shards: &[Shard]) -> Result<Vec<ShardResult>> {
        let boundary = self.config.boundary;
        let parser = &self.parser;

        let outcomes: Vec<Result<ShardResult>> = thread::scope(|scope| {
            let handles: Vec<_> = shards
                .iter()
                .map(|shard| scope.spawn(move || scan_shard(path, shard, boundary, parser)))
                .collect();

            handles
                .into_iter()
                .enumerate()
                .map(|(idx, handle)| {
                    handle
                        .join()
                        .unwrap_or_else(|e| panic!("Shard worker {} panicked: {:?}", idx, e))
                })
                .collect()
        });

        outcomes.into_iter().collect()
    }

    /// Run the whole batch: plan, scan, join, merge.
    pub fn process(&self, path: &Path, progress: &mut Progress) -> Result<ProcessedTrace> {
        let (file_size, shards) = plan_file(path, self.config.num_workers)?;

        progress.begin(&format!(
            "Analyzing {} bytes using {} threads...",
            file_size,
            shards.len()
        ))?;
        let scan_start = Instant::now();
        let results = self.scan(path, &shards)?;
        let scan_time = scan_start.elapsed();
        progress.finish(scan_time)?;

        progress.begin("Merging the results...")?;
        let merge_start = Instant::now();
        let mut scan = ScanStats::new();
        let stats = merge_shards(results.into_iter().map(|result| {
            scan.merge(&result.scan);
            result.stats
        }));
        let merge_time = merge_start.elapsed();
        progress.finish(merge_time)?;

        scan.scan_time = scan_time;
        scan.merge_time = merge_time;

        Ok(ProcessedTrace {
            path: path.to_path_buf(),
            file_size,
            stats,
            scan,
        })
    }
}
