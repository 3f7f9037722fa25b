//! Parallel processing module for tracestat
//!
//! Splits the trace into byte-range shards and scans them concurrently, then joins
//! and merges the shard-local statistics.
//!
//! # Module Structure
//!
//! - `types`: Shard descriptors, results, and configuration
//! - `plan`: Byte-range partitioning of the input file
//! - `worker`: Scanning of a single shard
//! - `merge`: Order-independent merge of shard statistics
//! - `processor`: Main ParallelProcessor orchestration

mod merge;
mod plan;
mod processor;
mod types;
mod worker;

// Re-export public types
pub use merge::{merge_into, merge_shards};
pub use plan::{plan_file, plan_shards};
pub use processor::ParallelProcessor;
pub use types::{BoundaryPolicy, ParallelConfig, ProcessedTrace, Shard, ShardResult};
pub use worker::scan_shard;
