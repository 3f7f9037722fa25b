//! Whole-trace overview printed with `--summary`

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::event::ThreadId;
use crate::stats::TraceStats;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceSummary {
    pub operations: Vec<String>,
    pub threads: usize,
    pub unique_addresses: usize,
    pub unique_sources: usize,
    pub accesses: u64,
    pub reads: u64,
    pub writes: u64,
    pub multi_threaded_addresses: usize,
    pub multi_threaded_addresses_ratio: f64,
    /// Accesses that landed on an address touched by more than one thread
    pub multi_threaded_accesses: u64,
    pub multi_threaded_accesses_ratio: f64,
}

fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (10_000.0 * part as f64 / total as f64).round() / 100.0
}

impl TraceSummary {
    pub fn from_stats(stats: &TraceStats) -> Self {
        let mut threads: BTreeSet<ThreadId> = BTreeSet::new();
        let mut reads = 0;
        let mut writes = 0;
        let mut multi_addresses = 0;
        let mut multi_accesses = 0;

        for entry in stats.addresses.values() {
            threads.extend(entry.thread_ids.iter().copied());
            reads += entry.read_count;
            writes += entry.write_count;
            if entry.thread_count() > 1 {
                multi_addresses += 1;
                multi_accesses += entry.total();
            }
        }

        let accesses = reads + writes;
        let unique_addresses = stats.addresses.len();

        Self {
            operations: stats.operations.iter().cloned().collect(),
            threads: threads.len(),
            unique_addresses,
            unique_sources: stats.sources.len(),
            accesses,
            reads,
            writes,
            multi_threaded_addresses: multi_addresses,
            multi_threaded_addresses_ratio: percent(multi_addresses as u64, unique_addresses as u64),
            multi_threaded_accesses: multi_accesses,
            multi_threaded_accesses_ratio: percent(multi_accesses, accesses),
        }
    }

    pub fn format_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Operations:                {}\n", self.operations.join(" ")));
        out.push_str(&format!("Threads:                   {}\n", self.threads));
        out.push('\n');
        out.push_str(&format!("Unique addresses:          {}\n", self.unique_addresses));
        out.push_str(&format!("Unique sources:            {}\n", self.unique_sources));
        out.push_str(&format!(
            "Accesses:                  {} ({} reads, {} writes)\n",
            self.accesses, self.reads, self.writes
        ));
        out.push('\n');
        out.push_str(&format!(
            "Addresses with multi-threaded access:   {:<10} ({}% of total)\n",
            self.multi_threaded_addresses, self.multi_threaded_addresses_ratio
        ));
        out.push_str(&format!(
            "Multi-threaded accesses:                {:<10} ({}% of total)",
            self.multi_threaded_accesses, self.multi_threaded_accesses_ratio
        ));
        out
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
