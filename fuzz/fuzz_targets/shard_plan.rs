#![no_main]

use libfuzzer_sys::fuzz_target;
use tracestat::parallel::plan_shards;

fuzz_target!(|input: (u64, u16)| {
    let (file_size, workers) = input;
    let shards = plan_shards(file_size, workers as usize);

    assert!(!shards.is_empty());
    assert!(shards.len() <= (workers as usize).max(1));

    let mut expected_offset = 0;
    for (i, shard) in shards.iter().enumerate() {
        assert_eq!(shard.index, i);
        assert_eq!(shard.offset, expected_offset);
        assert!(file_size == 0 || shard.len > 0);
        expected_offset = shard.end();
    }
    assert_eq!(expected_offset, file_size);
});
