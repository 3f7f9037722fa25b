#![no_main]

use libfuzzer_sys::fuzz_target;
use tracestat::parsers::{RecordParser, TraceLineParser};
use tracestat::stats::TraceStats;

fuzz_target!(|data: &[u8]| {
    let parser = TraceLineParser::new();
    let mut stats = TraceStats::new();

    for line in data.split(|b| *b == b'\n') {
        if parser.is_record(line) {
            // Parsing never fails; we only care about panics.
            stats.append_event(parser.parse(line));
        }
    }

    let records = data
        .split(|b| *b == b'\n')
        .filter(|line| parser.is_record(line))
        .count() as u64;
    assert_eq!(stats.total_accesses(), records);
});
