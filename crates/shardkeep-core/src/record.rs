//! Shard records: one share plus the metadata persisted with it
//!
//! # Format
//!
//! ```json
//! {
//!   "id": 1,
//!   "shard": 43169837124188720964780342900310458552,
//!   "fingerprint": "0f3c9a8d1e2b4c5f",
//!   "total_shards": 5,
//!   "min_shards": 3,
//!   "fingerprints": ["0f3c9a8d1e2b4c5f", "..."]
//! }
//! ```
//!
//! `shard` is a bare JSON integer of arbitrary size.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::polynomial::Share;
use crate::{Result, ShardkeepError, MIN_THRESHOLD};

/// Length of a fingerprint in hex characters
pub const FINGERPRINT_LEN: usize = 16;

/// Persisted form of a share
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardRecord {
    /// Share index (x-coordinate)
    pub id: u32,
    /// Share value (y-coordinate)
    #[serde(with = "json_integer")]
    pub shard: BigUint,
    /// Checksum over `id` and `shard`
    pub fingerprint: String,
    /// N at creation time
    pub total_shards: u32,
    /// M at creation time
    pub min_shards: u32,
    /// Fingerprints of every share from the same split
    #[serde(default)]
    pub fingerprints: Vec<String>,
}

/// Serde helper writing a `BigUint` as a bare JSON number
mod json_integer {
    use num_bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;

    pub fn serialize<S>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let number =
            serde_json::Number::from_str(&value.to_string()).map_err(serde::ser::Error::custom)?;
        number.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigUint, D::Error>
    where
        D: Deserializer<'de>,
    {
        let number = serde_json::Number::deserialize(deserializer)?;
        BigUint::from_str(&number.to_string()).map_err(|_| {
            serde::de::Error::custom(format!("expected a non-negative integer, got {}", number))
        })
    }
}

/// Short checksum of a share: hex SHA-256 of `"{index}_{value}"`,
/// characters 1 through 16.
pub fn fingerprint(index: u32, value: &BigUint) -> String {
    let digest = Sha256::digest(format!("{}_{}", index, value).as_bytes());
    hex::encode(digest)[1..=FINGERPRINT_LEN].to_string()
}

impl ShardRecord {
    /// Wrap a share with its fingerprint and the pool metadata
    pub fn build(share: &Share, total: u32, minimum: u32, fingerprints: Vec<String>) -> Self {
        Self {
            id: share.index,
            shard: share.value.clone(),
            fingerprint: fingerprint(share.index, &share.value),
            total_shards: total,
            min_shards: minimum,
            fingerprints,
        }
    }

    /// Build records for a whole split, each carrying all sibling fingerprints
    pub fn build_pool(shares: &[Share], minimum: u32) -> Vec<Self> {
        let total = shares.len() as u32;
        let fingerprints: Vec<String> = shares
            .iter()
            .map(|s| fingerprint(s.index, &s.value))
            .collect();

        shares
            .iter()
            .map(|s| Self::build(s, total, minimum, fingerprints.clone()))
            .collect()
    }

    /// Recompute the fingerprint and compare it to the stored one
    pub fn verify(&self) -> bool {
        fingerprint(self.id, &self.shard) == self.fingerprint
    }

    /// Check fingerprint and structural invariants against `prime`
    pub fn validate(&self, prime: &BigUint) -> Result<()> {
        if !self.verify() {
            return Err(ShardkeepError::Integrity {
                id: self.id,
                stored: self.fingerprint.clone(),
                computed: fingerprint(self.id, &self.shard),
            });
        }
        if self.id == 0 {
            return Err(ShardkeepError::InvalidShare(
                "shard id 0 is the secret's own coordinate".into(),
            ));
        }
        if &self.shard >= prime {
            return Err(ShardkeepError::InvalidShare(format!(
                "shard {} value is outside the field",
                self.id
            )));
        }
        if self.min_shards < MIN_THRESHOLD || self.min_shards > self.total_shards {
            return Err(ShardkeepError::InvalidShare(format!(
                "shard {} declares an impossible pool ({} of {})",
                self.id, self.min_shards, self.total_shards
            )));
        }
        if self.id > self.total_shards {
            return Err(ShardkeepError::InvalidShare(format!(
                "shard {} is beyond the pool size {}",
                self.id, self.total_shards
            )));
        }
        Ok(())
    }

    /// The bare (index, value) point
    pub fn share(&self) -> Share {
        Share {
            index: self.id,
            value: self.shard.clone(),
        }
    }

    /// Parse a record from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ShardkeepError::InvalidShare(e.to_string()))
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ShardkeepError::InvalidShare(e.to_string()))
    }
}
