//! Security tests for Shardkeep
//!
//! Tampering, mixing and malformed-input cases. None of these may hand back
//! a secret, and none may panic.
//!
//! Run with: cargo test --test security_tests

use num_bigint::BigUint;
use shardkeep_core::{codec, Engine, FieldModulus, ShardRecord, ShardkeepError, SplitConfig};
use shardkeep_store::{load, FileStore, StoreError};
use std::fs;
use tempfile::tempdir;

fn abc_pool() -> Vec<ShardRecord> {
    Engine::default()
        .split("abc", &SplitConfig::three_of_five())
        .unwrap()
}

// ============================================================================
// 1. Tampering
// ============================================================================

#[test]
fn test_flipped_bit_is_detected() {
    let engine = Engine::default();
    let mut records = abc_pool();
    records[1].shard ^= BigUint::from(1u8);

    let result = engine.join(&records[..3]);
    assert!(result.is_err(), "Tampered shard should be rejected");
    match result {
        Err(ShardkeepError::Integrity { id, stored, computed }) => {
            assert_eq!(id, 2);
            assert_ne!(stored, computed);
        }
        other => panic!("expected integrity failure, got {:?}", other),
    }
}

#[test]
fn test_swapped_index_is_detected() {
    let engine = Engine::default();
    let mut records = abc_pool();
    records[0].id = 4;

    let result = engine.join(&records[..3]);
    assert!(
        matches!(result, Err(ShardkeepError::Integrity { id: 4, .. })),
        "Relabelled shard should fail its fingerprint"
    );
}

#[test]
fn test_tampered_file_on_disk() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();
    let paths = store.save_all(&abc_pool()).unwrap();

    let mut value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&paths[2]).unwrap()).unwrap();
    value["fingerprint"] = serde_json::json!("0000000000000000");
    fs::write(&paths[2], value.to_string()).unwrap();

    let records: Vec<_> = paths[..3].iter().map(|p| load(p).unwrap()).collect();
    let result = Engine::default().join(&records);
    assert!(
        matches!(result, Err(ShardkeepError::Integrity { id: 3, .. })),
        "Edited fingerprint should not verify"
    );
}

// ============================================================================
// 2. Duplicates and mixing
// ============================================================================

#[test]
fn test_duplicate_shard_rejected() {
    let engine = Engine::default();
    let records = abc_pool();
    let padded = vec![records[0].clone(), records[0].clone(), records[1].clone()];

    let result = engine.join(&padded);
    assert!(
        matches!(result, Err(ShardkeepError::DuplicateIndex(1))),
        "Repeating a shard must not count towards the threshold"
    );
}

#[test]
fn test_shards_from_two_splits_rejected() {
    let engine = Engine::default();
    let first = abc_pool();
    let second = engine.split("xyz", &SplitConfig::three_of_five()).unwrap();

    let mixed = vec![first[0].clone(), first[1].clone(), second[2].clone()];
    let result = engine.join(&mixed);
    assert!(
        matches!(result, Err(ShardkeepError::InconsistentShards(_))),
        "Shards of different splits must not be combined"
    );
}

#[test]
fn test_mismatched_pool_shape_rejected() {
    let engine = Engine::default();
    let three_of_five = abc_pool();
    let two_of_three = engine.split("abc", &SplitConfig::two_of_three()).unwrap();

    let mixed = vec![
        three_of_five[0].clone(),
        three_of_five[1].clone(),
        two_of_three[2].clone(),
    ];
    assert!(matches!(
        engine.join(&mixed),
        Err(ShardkeepError::InconsistentShards(_))
    ));
}

#[test]
fn test_below_threshold_reveals_nothing() {
    let engine = Engine::default();
    let records = abc_pool();

    for pair in [[0, 1], [1, 4], [2, 3]] {
        let picked: Vec<_> = pair.iter().map(|&i| records[i].clone()).collect();
        let result = engine.join(&picked);
        assert!(result.is_err(), "Two of a 3-of-5 pool must not recover");
    }
    assert!(engine.join(&[]).is_err(), "Empty input must not recover");
}

// ============================================================================
// 3. Malformed input
// ============================================================================

#[test]
fn test_malformed_json_does_not_panic() {
    let inputs = [
        "",
        "{}",
        "[]",
        "null",
        r#"{"id": 1}"#,
        r#"{"id": -1, "shard": 5, "fingerprint": "x", "total_shards": 3, "min_shards": 2}"#,
        r#"{"id": 1, "shard": "12", "fingerprint": "x", "total_shards": 3, "min_shards": 2}"#,
        r#"{"id": 1, "shard": 1.5, "fingerprint": "x", "total_shards": 3, "min_shards": 2}"#,
        r#"{"id": 1, "shard": -7, "fingerprint": "x", "total_shards": 3, "min_shards": 2}"#,
    ];
    for input in inputs {
        assert!(
            ShardRecord::from_json(input).is_err(),
            "Should reject {:?}",
            input
        );
    }
}

#[test]
fn test_structurally_invalid_records_rejected() {
    let engine = Engine::default();
    let prime = FieldModulus::Mersenne127.prime();

    // Signed correctly, but the value sits outside the field
    let mut outside = abc_pool()[0].clone();
    outside.shard = prime.clone() + BigUint::from(3u8);
    outside.fingerprint = shardkeep_core::fingerprint(outside.id, &outside.shard);
    assert!(matches!(
        outside.validate(&prime),
        Err(ShardkeepError::InvalidShare(_))
    ));

    // An impossible pool shape
    let mut impossible = abc_pool()[0].clone();
    impossible.min_shards = 9;
    assert!(impossible.validate(&prime).is_err());

    // Index zero is where the secret lives
    let mut origin = abc_pool()[0].clone();
    origin.id = 0;
    origin.fingerprint = shardkeep_core::fingerprint(0, &origin.shard);
    let result = engine.join(&[origin.clone(), origin.clone(), origin]);
    assert!(result.is_err(), "Shard at x = 0 must be rejected");
}

#[test]
fn test_missing_and_garbage_files() {
    let dir = tempdir().unwrap();

    let missing = dir.path().join("1_0000000000000000.json");
    assert!(matches!(load(&missing), Err(StoreError::NotFound(_))));

    let garbage = dir.path().join("2_garbage.json");
    fs::write(&garbage, b"\xff\xfe not json").unwrap();
    assert!(load(&garbage).is_err());
}

#[test]
fn test_store_never_overwrites() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();
    let records = abc_pool();
    let path = store.save(&records[0]).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    assert!(matches!(
        store.save(&records[0]),
        Err(StoreError::AlreadyExists(_))
    ));
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

// ============================================================================
// 4. Encoding limits
// ============================================================================

#[test]
fn test_oversized_secret_refused_before_splitting() {
    let engine = Engine::default();
    let result = engine.split("thirteen byte", &SplitConfig::three_of_five());
    assert!(matches!(
        result,
        Err(ShardkeepError::SecretTooLarge {
            bytes: 13,
            max_bytes: 12
        })
    ));
    assert!(matches!(
        engine.split("", &SplitConfig::three_of_five()),
        Err(ShardkeepError::EmptySecret)
    ));
}

#[test]
fn test_leading_low_base64_char_does_not_roundtrip() {
    // "€" encodes to "4oKs"; the leading '4' has fewer than 7 significant
    // bits so the field element cannot be chunked back
    let engine = Engine::default();
    let records = engine.split("€", &SplitConfig::two_of_three()).unwrap();
    let result = engine.join(&records[..2]);
    assert!(
        matches!(result, Err(ShardkeepError::SecretDecode(_))),
        "Expected a decode failure, got {:?}",
        result
    );

    let element = codec::encode("€", &engine.config().modulus).unwrap();
    assert!(codec::decode(&element).is_err());
}
