// Core library for the tracestat trace analyzer

pub mod cli;
pub mod config;
pub mod config_file;
pub mod event;
pub mod parallel;
pub mod parsers;
pub mod platform;
pub mod report;
pub mod stats;
pub mod summary;

pub use cli::{Cli, StatsFormat, SummaryFormat};
pub use config::AnalyzerConfig;
pub use event::{classify_access, AccessClass, AccessEvent};
pub use stats::{AccessStats, ScanStats, TraceStats};
pub use summary::TraceSummary;

use anyhow::Result;
use std::path::PathBuf;

use parallel::{ParallelProcessor, ProcessedTrace};
use platform::Progress;

/// Outcome of a complete run: the merged statistics and the report files written
#[derive(Debug)]
pub struct AnalysisResult {
    pub trace: ProcessedTrace,
    pub reports: Vec<PathBuf>,
}

/// Scan, merge and write the four reports.
///
/// Nothing is written unless every shard scanned successfully.
pub fn run_analysis(config: &AnalyzerConfig, progress: &mut Progress) -> Result<AnalysisResult> {
    let processor = ParallelProcessor::new(config.parallel_config());
    let trace = processor.process(&config.input.file, progress)?;
    let reports = report::write_reports(&trace.stats, &config.output.dir, config.output.top)?;

    Ok(AnalysisResult { trace, reports })
}
