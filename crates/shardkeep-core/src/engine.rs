//! Split / join façade
//!
//! Composes the codec, share generator, shard records and interpolation.
//! The engine holds no mutable state; one value can serve any number of
//! split and join calls.

use std::collections::HashSet;

use num_bigint::BigUint;
use num_traits::Zero;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::field::FieldModulus;
use crate::record::ShardRecord;
use crate::{codec, interpolate, polynomial, Result, ShardkeepError, SplitConfig, MIN_THRESHOLD};

/// Immutable engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Field modulus P, shared by split and join
    pub modulus: BigUint,
}

impl EngineConfig {
    /// Use one of the named Mersenne primes
    pub fn new(modulus: FieldModulus) -> Self {
        Self {
            modulus: modulus.prime(),
        }
    }

    /// Use an arbitrary prime; the caller vouches for its primality
    pub fn with_prime(prime: BigUint) -> Self {
        Self { modulus: prime }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(FieldModulus::default())
    }
}

/// Threshold secret sharing engine
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Longest secret (in UTF-8 bytes) guaranteed to fit the field
    pub fn max_secret_bytes(&self) -> usize {
        codec::max_secret_bytes(&self.config.modulus)
    }

    /// Split `secret` into `pool.total` shard records using OS entropy
    pub fn split(&self, secret: &str, pool: &SplitConfig) -> Result<Vec<ShardRecord>> {
        self.split_with_rng(&mut OsRng, secret, pool)
    }

    /// Split with a caller-supplied CSPRNG
    pub fn split_with_rng<R>(
        &self,
        rng: &mut R,
        secret: &str,
        pool: &SplitConfig,
    ) -> Result<Vec<ShardRecord>>
    where
        R: RngCore + CryptoRng,
    {
        pool.validate()?;
        if secret.is_empty() {
            return Err(ShardkeepError::EmptySecret);
        }

        let element = codec::encode(secret, &self.config.modulus)?;
        let shares = polynomial::generate(
            rng,
            &element,
            pool.minimum,
            pool.total,
            &self.config.modulus,
        )?;
        let records = ShardRecord::build_pool(&shares, pool.minimum);

        log::info!(
            "split secret into {} shards, {} required",
            records.len(),
            pool.minimum
        );
        Ok(records)
    }

    /// Recover the secret from shard records.
    ///
    /// Every record is checked before any interpolation happens; the first
    /// failing record aborts the whole join.
    pub fn join(&self, records: &[ShardRecord]) -> Result<String> {
        let first = records.first().ok_or(ShardkeepError::InsufficientShares {
            required: MIN_THRESHOLD as usize,
            supplied: 0,
        })?;

        for record in records {
            record.validate(&self.config.modulus)?;
        }
        check_pool_consistency(records)?;

        let minimum = first.min_shards as usize;
        if records.len() < minimum {
            return Err(ShardkeepError::InsufficientShares {
                required: minimum,
                supplied: records.len(),
            });
        }

        let shares: Vec<_> = records.iter().map(ShardRecord::share).collect();
        let element = interpolate::recover(&shares, minimum, &self.config.modulus)?;
        // split never shares an empty secret, so zero means wrong shares
        if element.is_zero() {
            return Err(ShardkeepError::SecretDecode(
                "shares interpolate to zero".into(),
            ));
        }
        let secret = codec::decode(&element)?;

        log::info!("recovered secret from {} shards", records.len());
        Ok(secret)
    }
}

/// All records must describe the same pool and, where they list their
/// siblings, list each other.
fn check_pool_consistency(records: &[ShardRecord]) -> Result<()> {
    let Some(first) = records.first() else {
        return Ok(());
    };

    for record in records {
        if record.min_shards != first.min_shards || record.total_shards != first.total_shards {
            return Err(ShardkeepError::InconsistentShards(format!(
                "shard {} is {} of {}, shard {} is {} of {}",
                first.id,
                first.min_shards,
                first.total_shards,
                record.id,
                record.min_shards,
                record.total_shards
            )));
        }
    }

    for record in records.iter().filter(|r| !r.fingerprints.is_empty()) {
        let siblings: HashSet<&str> = record.fingerprints.iter().map(String::as_str).collect();
        if let Some(stranger) = records
            .iter()
            .find(|other| !siblings.contains(other.fingerprint.as_str()))
        {
            log::warn!(
                "shard {} ({}) is not listed by shard {}",
                stranger.id,
                stranger.fingerprint,
                record.id
            );
            return Err(ShardkeepError::InconsistentShards(format!(
                "shard {} does not belong to the same split as shard {}",
                stranger.id, record.id
            )));
        }
    }

    Ok(())
}
