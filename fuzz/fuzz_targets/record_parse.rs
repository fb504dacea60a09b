#![no_main]

use libfuzzer_sys::fuzz_target;
use shardkeep_core::{Engine, FieldModulus, ShardRecord};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(record) = ShardRecord::from_json(s) else {
        return;
    };

    let _ = record.verify();
    let _ = record.validate(&FieldModulus::Mersenne127.prime());

    // Joining a lone or repeated record exercises the rejection paths
    let engine = Engine::default();
    let _ = engine.join(std::slice::from_ref(&record));
    let _ = engine.join(&[record.clone(), record]);
});
