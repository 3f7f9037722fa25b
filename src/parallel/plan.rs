//! Shard planning
//!
//! Splits a file of `S` bytes into `T` shards of `floor(S / T)` bytes each. The last
//! shard also takes the `S mod T` remainder so every byte belongs to some shard.

use anyhow::{anyhow, Context, Result};
use std::path::Path;

use super::types::Shard;

/// Partition `file_size` bytes across `workers` shards.
///
/// `workers` is clamped to at least 1, and never exceeds the byte count, so every
/// shard but an empty file's single shard has a non-zero length.
pub fn plan_shards(file_size: u64, workers: usize) -> Vec<Shard> {
    let requested = workers.max(1) as u64;
    let count = requested.min(file_size.max(1));
    let len = file_size / count;

    (0..count)
        .map(|i| {
            let offset = i * len;
            let len = if i + 1 == count {
                file_size - offset
            } else {
                len
            };
            Shard {
                index: i as usize,
                offset,
                len,
            }
        })
        .collect()
}

/// Stat the file and partition it.
///
/// Only regular files can be split by byte offset. Pipes and devices report a size of
/// zero, so they are rejected rather than scanned as a single truncated shard.
pub fn plan_file(path: &Path, workers: usize) -> Result<(u64, Vec<Shard>)> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?;
    if !metadata.is_file() {
        return Err(anyhow!("Not a regular file: {}", path.display()));
    }
    let file_size = metadata.len();
    Ok((file_size, plan_shards(file_size, workers)))
}
