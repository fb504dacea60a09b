//! End-to-end integration tests for Shardkeep.
//!
//! Exercises the complete flow across crates:
//!
//! 1. Split a secret with the engine
//! 2. Persist every shard through the file store
//! 3. Load an arbitrary subset back
//! 4. Join and compare with the original
//!
//! Run with: cargo test --test e2e_integration

use num_bigint::BigUint;
use rand::rngs::StdRng;
use rand::SeedableRng;
use shardkeep_core::codec;
use shardkeep_core::interpolate::recover;
use shardkeep_core::{
    Engine, EngineConfig, FieldModulus, ShardRecord, ShardkeepError, SplitConfig,
};
use shardkeep_store::{load_all, FileStore};
use tempfile::tempdir;

/// Every `size`-element subset of `0..n`, in lexicographic order
fn subsets(n: usize, size: usize) -> Vec<Vec<usize>> {
    if size == 0 {
        return vec![vec![]];
    }
    if n < size {
        return vec![];
    }
    let mut with_last: Vec<Vec<usize>> = subsets(n - 1, size - 1)
        .into_iter()
        .map(|mut s| {
            s.push(n - 1);
            s
        })
        .collect();
    let mut out = subsets(n - 1, size);
    out.append(&mut with_last);
    out
}

// ============================================================================
// 1. Split -> store -> load -> join
// ============================================================================

#[test]
fn test_full_flow_through_files() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();
    let engine = Engine::default();

    let records = engine.split("abc", &SplitConfig::three_of_five()).unwrap();
    let paths = store.save_all(&records).unwrap();

    let chosen = [&paths[0], &paths[2], &paths[4]];
    let loaded = load_all(&chosen).unwrap();
    assert_eq!(
        loaded.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![1, 3, 5]
    );
    assert_eq!(engine.join(&loaded).unwrap(), "abc");

    // Two files are not enough
    let loaded = load_all(&chosen[..2]).unwrap();
    assert!(matches!(
        engine.join(&loaded),
        Err(ShardkeepError::InsufficientShares {
            required: 3,
            supplied: 2
        })
    ));
}

#[test]
fn test_abc_interpolates_to_its_encoding() {
    let engine = Engine::default();
    let modulus = &engine.config().modulus;
    let records = engine.split("abc", &SplitConfig::three_of_five()).unwrap();

    let shares: Vec<_> = [0, 2, 4].iter().map(|&i| records[i].share()).collect();
    let element = recover(&shares, 3, modulus).unwrap();
    assert_eq!(element, codec::encode("abc", modulus).unwrap());
    assert_eq!(element, BigUint::from(188_081_514u32));
    assert_eq!(codec::decode(&element).unwrap(), "abc");
}

// ============================================================================
// 2. Every threshold-sized subset recovers
// ============================================================================

#[test]
fn test_every_subset_recovers() {
    let engine = Engine::default();
    let mut rng = StdRng::seed_from_u64(2023);

    for (minimum, total) in [(2, 2), (2, 3), (3, 5), (4, 6), (5, 5)] {
        let pool = SplitConfig { minimum, total };
        let records = engine.split_with_rng(&mut rng, "p@ssw0rd!", &pool).unwrap();

        for subset in subsets(total as usize, minimum as usize) {
            let picked: Vec<ShardRecord> = subset.iter().map(|&i| records[i].clone()).collect();
            assert_eq!(
                engine.join(&picked).unwrap(),
                "p@ssw0rd!",
                "{}-of-{} failed for subset {:?}",
                minimum,
                total,
                subset
            );
        }
    }
}

#[test]
fn test_every_share_required_boundary() {
    let engine = Engine::default();
    let pool = SplitConfig {
        minimum: 5,
        total: 5,
    };
    let records = engine.split("all five", &pool).unwrap();
    assert_eq!(engine.join(&records).unwrap(), "all five");

    for withheld in 0..5 {
        let mut partial = records.clone();
        partial.remove(withheld);
        assert!(matches!(
            engine.join(&partial),
            Err(ShardkeepError::InsufficientShares {
                required: 5,
                supplied: 4
            })
        ));
    }
}

// ============================================================================
// 3. Secrets of various shapes
// ============================================================================

#[test]
fn test_various_secrets_roundtrip() {
    let engine = Engine::default();
    let pool = SplitConfig::two_of_three();

    for secret in ["x", "abc", "hunter2", "Hello World!", "Grüße", "tab\tand\nnl"] {
        let records = engine.split(secret, &pool).unwrap();
        assert_eq!(engine.join(&records[1..]).unwrap(), secret);
    }
}

#[test]
fn test_large_modulus_flow() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();
    let engine = Engine::new(EngineConfig::new(FieldModulus::Mersenne521));
    assert_eq!(engine.max_secret_bytes(), 54);

    let secret = "The quick brown fox jumps over the lazy dog";
    let records = engine.split(secret, &SplitConfig::three_of_five()).unwrap();
    let paths = store.save_all(&records).unwrap();

    let loaded = load_all(&paths[1..4]).unwrap();
    assert_eq!(engine.join(&loaded).unwrap(), secret);
}

#[test]
fn test_modulus_mismatch_does_not_return_secret() {
    let big = Engine::new(EngineConfig::new(FieldModulus::Mersenne521));
    let small = Engine::default();

    let records = big.split("abc", &SplitConfig::three_of_five()).unwrap();
    // Values above 2^127 - 1 are rejected outright; anything that slips
    // through interpolates in the wrong field
    match small.join(&records[..3]) {
        Ok(secret) => assert_ne!(secret, "abc"),
        Err(_) => {}
    }
}

// ============================================================================
// 4. Randomness
// ============================================================================

#[test]
fn test_independent_splits_differ_but_each_is_consistent() {
    let engine = Engine::default();
    let pool = SplitConfig::three_of_five();

    let a = engine.split("abc", &pool).unwrap();
    let b = engine.split("abc", &pool).unwrap();

    for (ra, rb) in a.iter().zip(&b) {
        assert_ne!(ra.shard, rb.shard, "share {} repeated across splits", ra.id);
    }
    assert_eq!(engine.join(&a[..3]).unwrap(), "abc");
    assert_eq!(engine.join(&b[2..]).unwrap(), "abc");
}

#[test]
fn test_seeded_rng_reproduces_split() {
    let engine = Engine::default();
    let pool = SplitConfig::three_of_five();

    let a = engine
        .split_with_rng(&mut StdRng::seed_from_u64(99), "abc", &pool)
        .unwrap();
    let b = engine
        .split_with_rng(&mut StdRng::seed_from_u64(99), "abc", &pool)
        .unwrap();
    assert_eq!(a, b);
}
