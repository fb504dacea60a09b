//! Shardkeep Core
//!
//! Split a short text secret into N shard records so that any M of them
//! rebuild it, while fewer than M reveal nothing.
//!
//! # Pipeline
//!
//! ## Split
//! - [`codec::encode`] packs the secret into one field element
//! - [`polynomial::generate`] hides it as the constant term of a random
//!   polynomial and evaluates that at x = 1..=N
//! - [`ShardRecord::build_pool`] attaches fingerprints and pool metadata
//!
//! ## Join
//! - every [`ShardRecord`] is verified against its fingerprint
//! - [`interpolate::recover`] evaluates the Lagrange polynomial at x = 0
//! - [`codec::decode`] turns the element back into text
//!
//! Arithmetic is done modulo a Mersenne prime (2^127 - 1 by default).
//!
//! # Example
//!
//! ```
//! use shardkeep_core::{Engine, SplitConfig};
//!
//! let engine = Engine::default();
//! let records = engine.split("abc", &SplitConfig::three_of_five()).unwrap();
//! assert_eq!(records.len(), 5);
//!
//! // Any three shards are enough
//! let recovered = engine.join(&records[2..]).unwrap();
//! assert_eq!(recovered, "abc");
//! ```

pub mod codec;
pub mod engine;
pub mod field;
pub mod interpolate;
pub mod polynomial;
pub mod record;

// Re-exports
pub use engine::{Engine, EngineConfig};
pub use field::FieldModulus;
pub use polynomial::Share;
pub use record::{fingerprint, ShardRecord};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest threshold accepted. The field math works for 1, but then
/// every share is the secret itself.
pub const MIN_THRESHOLD: u32 = 2;

#[derive(Error, Debug)]
pub enum ShardkeepError {
    #[error("Pool would be irrecoverable: minimum {minimum} exceeds total {total}")]
    PoolConfig { minimum: u32, total: u32 },
    #[error("Invalid threshold {0}: at least 2 shares are required by policy, since a threshold of 1 stores the secret in every share")]
    InvalidThreshold(u32),
    #[error("Secret is empty")]
    EmptySecret,
    #[error("Secret too large: {bytes} bytes, the field holds at most {max_bytes}")]
    SecretTooLarge { bytes: usize, max_bytes: usize },
    #[error("Not enough shares to reconstruct: need {required}, got {supplied}")]
    InsufficientShares { required: usize, supplied: usize },
    #[error("Duplicate share index {0}")]
    DuplicateIndex(u32),
    #[error("Fingerprint mismatch on shard {id}: stored {stored}, computed {computed}")]
    Integrity {
        id: u32,
        stored: String,
        computed: String,
    },
    #[error("Recovered value is not a valid secret ({0}); wrong or mixed shares?")]
    SecretDecode(String),
    #[error("Division by zero in the prime field")]
    DivisionByZero,
    #[error("Invalid share: {0}")]
    InvalidShare(String),
    #[error("Shards do not belong together: {0}")]
    InconsistentShards(String),
    #[error("Unknown field modulus: {0}")]
    InvalidModulus(String),
}

pub type Result<T> = std::result::Result<T, ShardkeepError>;

/// Shape of a share pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Minimum shares needed to reconstruct (M)
    pub minimum: u32,
    /// Total shares to generate (N)
    pub total: u32,
}

impl SplitConfig {
    /// Common 2-of-3 setup
    pub fn two_of_three() -> Self {
        Self {
            minimum: 2,
            total: 3,
        }
    }

    /// Common 3-of-5 setup
    pub fn three_of_five() -> Self {
        Self {
            minimum: 3,
            total: 5,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.minimum > self.total {
            return Err(ShardkeepError::PoolConfig {
                minimum: self.minimum,
                total: self.total,
            });
        }
        if self.minimum < MIN_THRESHOLD {
            return Err(ShardkeepError::InvalidThreshold(self.minimum));
        }
        Ok(())
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self::three_of_five()
    }
}

/// Split with the default engine (2^127 - 1) and OS entropy
pub fn split_secret(secret: &str, minimum: u32, total: u32) -> Result<Vec<ShardRecord>> {
    Engine::default().split(secret, &SplitConfig { minimum, total })
}

/// Join with the default engine (2^127 - 1)
pub fn join_shards(records: &[ShardRecord]) -> Result<String> {
    Engine::default().join(records)
}
