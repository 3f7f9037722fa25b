use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::event::{AccessClass, AccessEvent, Address, ThreadId};

/// Aggregated counters for one key (an address or a source label).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessStats {
    pub thread_ids: BTreeSet<ThreadId>,
    pub read_count: u64,
    pub write_count: u64,
}

impl AccessStats {
    pub fn record(&mut self, thread_id: ThreadId, class: AccessClass) {
        self.thread_ids.insert(thread_id);
        match class {
            AccessClass::Read => self.read_count += 1,
            AccessClass::Write => self.write_count += 1,
        }
    }

    /// Fold another bucket for the same key into this one.
    pub fn absorb(&mut self, other: AccessStats) {
        self.read_count += other.read_count;
        self.write_count += other.write_count;
        if self.thread_ids.is_empty() {
            self.thread_ids = other.thread_ids;
        } else {
            self.thread_ids.extend(other.thread_ids);
        }
    }

    pub fn thread_count(&self) -> usize {
        self.thread_ids.len()
    }

    pub fn total(&self) -> u64 {
        self.read_count + self.write_count
    }
}

/// Per-source and per-address access statistics.
///
/// A value of this type is owned by exactly one producer at a time: a shard worker
/// while scanning, then the merger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceStats {
    pub sources: HashMap<String, AccessStats>,
    pub addresses: HashMap<Address, AccessStats>,
    /// Distinct access kind tokens. Only the trace summary reads this.
    pub operations: BTreeSet<String>,
}

impl TraceStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one parsed event into both of its buckets.
    pub fn append_event(&mut self, event: AccessEvent) {
        let class = event.class();
        self.append_access(&event.source, event.address, event.thread_id, class);
        if !self.operations.contains(&event.access_kind) {
            self.operations.insert(event.access_kind);
        }
    }

    /// Update the source bucket and the address bucket for a single access,
    /// creating zero-valued entries on first sight.
    pub fn append_access(
        &mut self,
        source: &str,
        address: Address,
        thread_id: ThreadId,
        class: AccessClass,
    ) {
        match self.sources.get_mut(source) {
            Some(entry) => entry.record(thread_id, class),
            None => {
                let mut entry = AccessStats::default();
                entry.record(thread_id, class);
                self.sources.insert(source.to_string(), entry);
            }
        }

        self.addresses
            .entry(address)
            .or_default()
            .record(thread_id, class);
    }

    /// Number of events folded in so far.
    pub fn total_accesses(&self) -> u64 {
        self.addresses.values().map(AccessStats::total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.addresses.is_empty()
    }
}

/// Counters describing how the input was consumed, kept per shard and summed after the join.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanStats {
    pub bytes_scanned: u64,
    pub lines_read: u64,
    pub records: u64,
    pub lines_skipped: u64,
    pub shards: usize,
    #[serde(rename = "scan_ms", serialize_with = "serialize_millis")]
    pub scan_time: Duration,
    #[serde(rename = "merge_ms", serialize_with = "serialize_millis")]
    pub merge_time: Duration,
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

impl ScanStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum the counters of a finished shard. Timings are owned by the processor.
    pub fn merge(&mut self, other: &ScanStats) {
        self.bytes_scanned += other.bytes_scanned;
        self.lines_read += other.lines_read;
        self.records += other.records;
        self.lines_skipped += other.lines_skipped;
        self.shards += other.shards;
    }

    pub fn format_stats(&self) -> String {
        let mut output = format!(
            "Lines processed: {} total, {} records, {} skipped",
            self.lines_read, self.records, self.lines_skipped
        );

        output.push_str(&format!(
            "; {} bytes in {} shards",
            self.bytes_scanned, self.shards
        ));

        let scan_ms = self.scan_time.as_millis();
        output.push_str(&format!(
            "; scan {}ms, merge {}ms",
            scan_ms,
            self.merge_time.as_millis()
        ));

        if scan_ms > 0 && self.lines_read > 0 {
            let lines_per_sec = (self.lines_read as f64 * 1000.0) / scan_ms as f64;
            output.push_str(&format!(" ({:.0} lines/s)", lines_per_sec));
        }

        output
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: &str, address: Address, thread_id: ThreadId, source: &str) -> AccessEvent {
        AccessEvent {
            access_kind: kind.to_string(),
            source: source.to_string(),
            address,
            thread_id,
            access_size: 8,
        }
    }

    #[test]
    fn test_append_event_updates_both_buckets() {
        let mut stats = TraceStats::new();
        stats.append_event(event("read8", 0x1a2b, 1, "funcA"));
        stats.append_event(event("write4", 0x1a2b, 2, "funcA"));

        let by_addr = &stats.addresses[&0x1a2b];
        assert_eq!(by_addr.read_count, 1);
        assert_eq!(by_addr.write_count, 1);
        assert_eq!(by_addr.thread_count(), 2);

        let by_source = &stats.sources["funcA"];
        assert_eq!(by_source, by_addr);
    }

    #[test]
    fn test_duplicate_thread_ids_counted_once() {
        let mut stats = TraceStats::new();
        for _ in 0..3 {
            stats.append_access("f", 0x10, 7, AccessClass::Read);
        }
        assert_eq!(stats.addresses[&0x10].read_count, 3);
        assert_eq!(stats.addresses[&0x10].thread_count(), 1);
        assert_eq!(stats.sources["f"].thread_count(), 1);
    }

    #[test]
    fn test_total_matches_event_count() {
        let mut stats = TraceStats::new();
        stats.append_event(event("read8", 1, 1, "a"));
        stats.append_event(event("write8", 2, 1, "a"));
        stats.append_event(event("atomic", 3, 2, "b"));
        assert_eq!(stats.total_accesses(), 3);
        let source_total: u64 = stats.sources.values().map(AccessStats::total).sum();
        assert_eq!(source_total, 3);
    }

    #[test]
    fn test_operations_recorded() {
        let mut stats = TraceStats::new();
        stats.append_event(event("read8", 1, 1, "a"));
        stats.append_event(event("read8", 2, 1, "a"));
        stats.append_event(event("write1", 2, 1, "a"));
        let ops: Vec<&str> = stats.operations.iter().map(String::as_str).collect();
        assert_eq!(ops, vec!["read8", "write1"]);
    }

    #[test]
    fn test_access_stats_absorb() {
        let mut a = AccessStats::default();
        a.record(1, AccessClass::Read);
        let mut b = AccessStats::default();
        b.record(2, AccessClass::Write);
        b.record(1, AccessClass::Write);

        a.absorb(b);
        assert_eq!(a.read_count, 1);
        assert_eq!(a.write_count, 2);
        assert_eq!(a.thread_ids.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_scan_stats_merge_and_format() {
        let mut total = ScanStats::new();
        total.merge(&ScanStats {
            bytes_scanned: 100,
            lines_read: 4,
            records: 3,
            lines_skipped: 1,
            shards: 1,
            ..Default::default()
        });
        total.merge(&ScanStats {
            bytes_scanned: 50,
            lines_read: 2,
            records: 2,
            lines_skipped: 0,
            shards: 1,
            ..Default::default()
        });

        assert_eq!(total.lines_read, 6);
        assert_eq!(total.records, 5);
        assert_eq!(total.shards, 2);

        let text = total.format_stats();
        assert!(text.starts_with("Lines processed: 6 total, 5 records, 1 skipped"));
        assert!(text.contains("150 bytes in 2 shards"));
    }

    #[test]
    fn test_scan_stats_json() {
        let stats = ScanStats {
            bytes_scanned: 49,
            lines_read: 3,
            records: 2,
            lines_skipped: 1,
            shards: 2,
            scan_time: Duration::from_millis(12),
            merge_time: Duration::from_micros(1500),
        };

        let value: serde_json::Value = serde_json::from_str(&stats.to_json().unwrap()).unwrap();
        assert_eq!(value["records"], 2);
        assert_eq!(value["lines_skipped"], 1);
        assert_eq!(value["shards"], 2);
        assert_eq!(value["scan_ms"], 12);
        assert_eq!(value["merge_ms"], 1);
        assert!(value.get("scan_time").is_none());
    }
}
