use std::hint::black_box;
use std::io::Write;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tempfile::NamedTempFile;

use tracestat::parallel::{BoundaryPolicy, ParallelConfig, ParallelProcessor};
use tracestat::parsers::{RecordParser, TraceLineParser};
use tracestat::platform::Progress;

const RECORDS: usize = 200_000;

fn generate_trace(records: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    let mut buf = String::with_capacity(records * 40);
    for i in 0..records {
        let kind = if i % 3 == 0 { "write8" } else { "read8" };
        buf.push_str(&format!(
            " > {} {:x} 8 {} worker_{}\n",
            kind,
            0x7f00_0000u64 + (i as u64 % 4096) * 8,
            i % 16,
            i % 97
        ));
        if i % 1000 == 0 {
            buf.push_str("==================\n");
        }
    }
    file.write_all(buf.as_bytes()).expect("write trace");
    file.flush().expect("flush trace");
    file
}

fn bench_parse_line(c: &mut Criterion) {
    let parser = TraceLineParser::new();
    let line = b" > atomic_write 7ffd12345678 8 12 worker_loop";
    c.bench_function("parse_line", |b| {
        b.iter(|| black_box(parser.parse(black_box(line))));
    });
}

fn bench_process(c: &mut Criterion) {
    let trace = generate_trace(RECORDS);
    let size = trace.as_file().metadata().expect("metadata").len();

    let mut group = c.benchmark_group("process");
    group.throughput(Throughput::Bytes(size));
    group.sample_size(20);

    for workers in [1usize, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::new("workers", workers), &workers, |b, &workers| {
            let processor = ParallelProcessor::new(ParallelConfig {
                num_workers: workers,
                boundary: BoundaryPolicy::Inclusive,
            });
            let mut progress = Progress::new(true);
            b.iter(|| {
                let processed = processor
                    .process(trace.path(), &mut progress)
                    .expect("process trace");
                black_box(processed.stats.total_accesses())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse_line, bench_process);
criterion_main!(benches);
