//! CLI configuration: optional TOML file + environment variable overrides.
//!
//! Priority: command-line flags > environment variables > config file > defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shardkeep_core::{FieldModulus, SplitConfig};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Pool shape and field
    #[serde(default)]
    pub sharing: SharingSection,

    /// Where shard files go
    #[serde(default)]
    pub output: OutputSection,

    /// Logger settings
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Pool shape and field settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharingSection {
    /// Shards written per split (N)
    #[serde(default = "default_total_shards")]
    pub total_shards: u32,

    /// Shards needed to join (M)
    #[serde(default = "default_min_shards")]
    pub min_shards: u32,

    /// Field modulus name: "mersenne127" or "mersenne521"
    #[serde(default = "default_modulus")]
    pub modulus: String,
}

impl Default for SharingSection {
    fn default() -> Self {
        Self {
            total_shards: default_total_shards(),
            min_shards: default_min_shards(),
            modulus: default_modulus(),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    /// Directory shard files are written to
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

/// Logger settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Log level (off, error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ============================================================================
// Default value functions
// ============================================================================

fn default_total_shards() -> u32 {
    5
}

fn default_min_shards() -> u32 {
    3
}

fn default_modulus() -> String {
    FieldModulus::default().to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_level() -> String {
    "warn".to_string()
}

// ============================================================================
// Loading & environment override
// ============================================================================

impl CliConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: CliConfig =
            toml::from_str(&contents).with_context(|| "Failed to parse TOML config")?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `SHARDKEEP_TOTAL_SHARDS`
    /// - `SHARDKEEP_MIN_SHARDS`
    /// - `SHARDKEEP_MODULUS`
    /// - `SHARDKEEP_OUTPUT_DIR`
    /// - `SHARDKEEP_LOG_LEVEL`
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup. Unparseable numbers are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SHARDKEEP_TOTAL_SHARDS") {
            if let Ok(n) = v.parse::<u32>() {
                self.sharing.total_shards = n;
            }
        }
        if let Some(v) = lookup("SHARDKEEP_MIN_SHARDS") {
            if let Ok(n) = v.parse::<u32>() {
                self.sharing.min_shards = n;
            }
        }
        if let Some(v) = lookup("SHARDKEEP_MODULUS") {
            self.sharing.modulus = v;
        }
        if let Some(v) = lookup("SHARDKEEP_OUTPUT_DIR") {
            self.output.dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("SHARDKEEP_LOG_LEVEL") {
            self.logging.level = v;
        }
    }

    /// The configured field modulus.
    pub fn modulus(&self) -> Result<FieldModulus> {
        FieldModulus::from_str(&self.sharing.modulus)
            .with_context(|| format!("sharing.modulus = {:?}", self.sharing.modulus))
    }

    /// The configured pool shape.
    pub fn split_config(&self) -> SplitConfig {
        SplitConfig {
            minimum: self.sharing.min_shards,
            total: self.sharing.total_shards,
        }
    }

    /// The configured log level.
    pub fn log_level(&self) -> Result<log::LevelFilter> {
        log::LevelFilter::from_str(&self.logging.level).map_err(|_| {
            anyhow::anyhow!("logging.level = {:?} is not a log level", self.logging.level)
        })
    }

    /// Validate the settings every command depends on.
    ///
    /// The pool shape is only a default for `--split` and may still be
    /// replaced by flags, so it is checked after merging, not here.
    pub fn validate(&self) -> Result<()> {
        self.modulus()?;
        self.log_level()?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
