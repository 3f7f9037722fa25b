use std::path::PathBuf;

use crate::cli::{Cli, StatsFormat, SummaryFormat};
use crate::parallel::{BoundaryPolicy, ParallelConfig};

/// Resolved settings for one analysis run
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub input: InputConfig,
    pub performance: PerformanceConfig,
    pub output: OutputConfig,
}

/// Input configuration
#[derive(Debug, Clone)]
pub struct InputConfig {
    pub file: PathBuf,
    pub boundary: BoundaryPolicy,
}

/// Performance configuration
#[derive(Debug, Clone)]
pub struct PerformanceConfig {
    /// Requested worker count, 0 meaning one per CPU
    pub threads: usize,
}

/// Output configuration
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub top: Option<usize>,
    pub summary: Option<SummaryFormat>,
    pub stats: Option<StatsFormat>,
    pub quiet: bool,
}

impl AnalyzerConfig {
    /// Create configuration from CLI arguments
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            input: InputConfig {
                file: PathBuf::from(&cli.file),
                boundary: cli.boundary,
            },
            performance: PerformanceConfig {
                threads: cli.threads,
            },
            output: OutputConfig {
                dir: PathBuf::from(&cli.output_dir),
                top: cli.top,
                summary: cli.summary,
                stats: cli.stats,
                quiet: cli.quiet,
            },
        }
    }

    /// Worker count after resolving auto-detection; never less than one
    pub fn effective_threads(&self) -> usize {
        if self.performance.threads == 0 {
            ParallelConfig::auto_workers()
        } else {
            self.performance.threads
        }
    }

    pub fn parallel_config(&self) -> ParallelConfig {
        ParallelConfig {
            num_workers: self.effective_threads(),
            boundary: self.input.boundary,
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            input: InputConfig {
                file: PathBuf::new(),
                boundary: BoundaryPolicy::default(),
            },
            performance: PerformanceConfig { threads: 0 },
            output: OutputConfig {
                dir: PathBuf::from("."),
                top: None,
                summary: None,
                stats: None,
                quiet: false,
            },
        }
    }
}
