//! Shardkeep Store
//!
//! Persists shard records, one pretty-printed JSON file per shard, named
//! `{id}_{fingerprint}.json`. Files are written through a temporary file
//! and renamed into place so a crash never leaves half a shard behind.
//!
//! Nothing here is retried: a missing or unreadable shard file is reported
//! to the caller as is.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use shardkeep_core::ShardRecord;
use thiserror::Error;

/// File extension of shard files
pub const SHARD_EXTENSION: &str = "json";

/// Errors from shard file operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed shard file {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Shard file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Refusing to overwrite existing shard file: {}", .0.display())]
    AlreadyExists(PathBuf),
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            StoreError::NotFound(path.to_path_buf())
        } else {
            StoreError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// File name for a record: `{id}_{fingerprint}.json`
pub fn record_file_name(record: &ShardRecord) -> String {
    format!("{}_{}.{}", record.id, record.fingerprint, SHARD_EXTENSION)
}

/// Directory of shard files
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where `record` is (or would be) stored
    pub fn path_for(&self, record: &ShardRecord) -> PathBuf {
        self.dir.join(record_file_name(record))
    }

    /// Write one record. Existing files are never overwritten.
    pub fn save(&self, record: &ShardRecord) -> Result<PathBuf, StoreError> {
        let path = self.path_for(record);
        if path.exists() {
            return Err(StoreError::AlreadyExists(path));
        }

        let contents = serde_json::to_string_pretty(record).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;

        let tmp_path = path.with_extension("tmp");
        // Leftover from an interrupted save; the shard itself was never written
        if tmp_path.exists() {
            log::warn!("removing stale temp file {}", tmp_path.display());
            fs::remove_file(&tmp_path).map_err(|e| StoreError::io(&tmp_path, e))?;
        }
        write_private(&tmp_path, contents.as_bytes()).map_err(|e| StoreError::io(&tmp_path, e))?;
        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::io(&path, e));
        }

        log::debug!("stored shard {} at {}", record.id, path.display());
        Ok(path)
    }

    /// Write every record of a split.
    ///
    /// All target paths are checked first so a name clash aborts before
    /// anything is written.
    pub fn save_all(&self, records: &[ShardRecord]) -> Result<Vec<PathBuf>, StoreError> {
        if let Some(clash) = records
            .iter()
            .map(|r| self.path_for(r))
            .find(|path| path.exists())
        {
            return Err(StoreError::AlreadyExists(clash));
        }

        records.iter().map(|r| self.save(r)).collect()
    }
}

/// Create a new file readable only by the owner (on Unix)
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

/// Read one shard file
pub fn load(path: impl AsRef<Path>) -> Result<ShardRecord, StoreError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    let record: ShardRecord = serde_json::from_str(&contents).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("loaded shard {} from {}", record.id, path.display());
    Ok(record)
}

/// Read shard files in order, stopping at the first failure
pub fn load_all<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<ShardRecord>, StoreError> {
    paths.iter().map(|p| load(p)).collect()
}
