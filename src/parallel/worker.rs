//! Shard worker
//!
//! Scans one byte range of the trace with its own file handle and folds every record
//! into a private `TraceStats`.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use crate::parsers::RecordParser;
use crate::stats::{ScanStats, TraceStats};

use super::types::{BoundaryPolicy, Shard, ShardResult};

const READ_BUFFER_SIZE: usize = 256 * 1024;

/// Scan `shard` of the file at `path`.
///
/// A line belongs to the shard whose range holds its first byte, see `BoundaryPolicy`
/// for where each policy draws the edges. Any I/O failure aborts the shard with an
/// error instead of returning a silently truncated result.
pub fn scan_shard<P: RecordParser>(
    path: &Path,
    shard: &Shard,
    boundary: BoundaryPolicy,
    parser: &P,
) -> Result<ShardResult> {
    let file = File::open(path)
        .with_context(|| format!("Shard {}: failed to open {}", shard.index, path.display()))?;
    let mut reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);
    let mut line = Vec::new();

    let mut position = skip_to_first_owned_line(&mut reader, shard, boundary, &mut line)?;
    let end = shard.end();

    let mut stats = TraceStats::new();
    let mut scan = ScanStats {
        shards: 1,
        ..ScanStats::new()
    };

    while boundary.contains(position, end) {
        line.clear();
        let read = reader.read_until(b'\n', &mut line).with_context(|| {
            format!(
                "Shard {}: read failed at byte {} of {}",
                shard.index,
                position,
                path.display()
            )
        })?;
        if read == 0 {
            break;
        }

        position += read as u64;
        scan.bytes_scanned += read as u64;
        scan.lines_read += 1;

        let record = line.strip_suffix(b"\n").unwrap_or(&line);
        if parser.is_record(record) {
            stats.append_event(parser.parse(record));
            scan.records += 1;
        } else {
            scan.lines_skipped += 1;
        }
    }

    Ok(ShardResult {
        shard: *shard,
        stats,
        scan,
    })
}

/// Position the reader on the first line this shard owns and return its byte offset.
///
/// Both policies discard the partial line under the seek point. The exact policy seeks
/// one byte earlier so a line that starts right at `offset` is kept: if the byte
/// before it is a newline, only that newline is consumed.
fn skip_to_first_owned_line<R: BufRead + Seek>(
    reader: &mut R,
    shard: &Shard,
    boundary: BoundaryPolicy,
    scratch: &mut Vec<u8>,
) -> Result<u64> {
    if shard.offset == 0 {
        return Ok(0);
    }

    let seek_to = match boundary {
        BoundaryPolicy::Inclusive => shard.offset,
        BoundaryPolicy::Exact => shard.offset - 1,
    };
    reader
        .seek(SeekFrom::Start(seek_to))
        .with_context(|| format!("Shard {}: failed to seek to byte {}", shard.index, seek_to))?;

    scratch.clear();
    let discarded = reader
        .read_until(b'\n', scratch)
        .with_context(|| format!("Shard {}: read failed at byte {}", shard.index, seek_to))?;

    Ok(seek_to + discarded as u64)
}
