// Command-line interface definitions

use clap::Parser;

use crate::parallel::BoundaryPolicy;

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SummaryFormat {
    Text,
    Json,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatsFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "tracestat")]
#[command(about = "Parallel access statistics for concurrency-instrumentation traces")]
#[command(
    long_about = "Parallel access statistics for concurrency-instrumentation traces\n\nThe trace is split into byte-range shards that are scanned concurrently. Every record line\n(` > <kind> <hex address> <size> <thread> <source>`) is counted per address and per source,\nthen four sorted reports are written:\n\n  address-read-sort.txt   address-write-sort.txt\n  source-read-sort.txt    source-write-sort.txt\n\nEach report row reads `<key> <reads> <writes> <distinct threads>`.\n\nCOMMON EXAMPLES:\n  tracestat trace.log\n  tracestat trace.log --threads 8 -o reports/\n  tracestat trace.log --summary=json --top 20"
)]
#[command(version)]
#[command(args_override_self = true)]
pub struct Cli {
    /// Trace file to analyze
    pub file: String,

    /// Shard boundary policy
    #[arg(
        long = "boundary",
        value_enum,
        default_value_t = BoundaryPolicy::Inclusive,
        help_heading = "Input Options",
        help = "How lines on a shard boundary are assigned.\n\ninclusive: a shard also reads the line starting exactly at its upper edge (default)\nexact: every line belongs to the shard holding its first byte"
    )]
    pub boundary: BoundaryPolicy,

    /// Number of worker threads (0 = one per CPU)
    #[arg(
        short = 't',
        long = "threads",
        default_value_t = 0,
        help_heading = "Performance Options"
    )]
    pub threads: usize,

    /// Directory the four report files are written to
    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "DIR",
        default_value = ".",
        help_heading = "Output Options"
    )]
    pub output_dir: String,

    /// Keep only the first N rows of each report
    #[arg(long = "top", value_name = "N", help_heading = "Output Options")]
    pub top: Option<usize>,

    /// Suppress progress output
    #[arg(short = 'q', long = "quiet", help_heading = "Output Options")]
    pub quiet: bool,

    /// Print a trace overview after writing the reports
    #[arg(
        long = "summary",
        value_enum,
        value_name = "FORMAT",
        require_equals = true,
        num_args = 0..=1,
        default_missing_value = "text",
        help_heading = "Metrics and Stats",
        help = "Print a trace overview after writing the reports.\n\nFormats: text, json\n\nExamples:\n  --summary          Default text format\n  --summary=json     JSON output"
    )]
    pub summary: Option<SummaryFormat>,

    /// Print processing statistics to stderr
    #[arg(
        short = 's',
        long = "stats",
        value_enum,
        value_name = "FORMAT",
        require_equals = true,
        num_args = 0..=1,
        default_missing_value = "text",
        help_heading = "Metrics and Stats",
        help = "Print processing statistics to stderr.\n\nFormats: text, json\n\nExamples:\n  -s              One-line text summary\n  --stats=json    JSON object"
    )]
    pub stats: Option<StatsFormat>,

    /// Specify custom configuration file path
    #[arg(long = "config-file", help_heading = "Configuration Options")]
    pub config_file: Option<String>,

    /// Ignore configuration file
    #[arg(long = "ignore-config", help_heading = "Configuration Options")]
    pub ignore_config: bool,

    /// Use alias from configuration file
    #[arg(short = 'a', long = "alias", help_heading = "Configuration Options")]
    pub alias: Vec<String>,

    /// Show configuration file and exit
    #[arg(long = "show-config", help_heading = "Configuration Options")]
    pub show_config: bool,
}
