//! Merge of shard-local statistics
//!
//! Runs single-threaded after every worker has been joined. Counts are summed and
//! thread sets unioned per key, so the result does not depend on the order in which
//! shards are folded.

use crate::stats::TraceStats;

/// Fold one shard's statistics into the running total, consuming the shard
pub fn merge_into(total: &mut TraceStats, part: TraceStats) {
    for (source, stats) in part.sources {
        match total.sources.get_mut(&source) {
            Some(entry) => entry.absorb(stats),
            None => {
                total.sources.insert(source, stats);
            }
        }
    }

    for (address, stats) in part.addresses {
        total.addresses.entry(address).or_default().absorb(stats);
    }

    total.operations.extend(part.operations);
}

/// Merge any number of shard results into one fresh `TraceStats`
pub fn merge_shards<I>(parts: I) -> TraceStats
where
    I: IntoIterator<Item = TraceStats>,
{
    let mut total = TraceStats::new();
    for part in parts {
        merge_into(&mut total, part);
    }
    total
}
