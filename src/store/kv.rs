//! Key-value side store for `/api/data`.
//!
//! Each key is persisted as its own `kv-<key>.json` file under the data
//! directory, so entries survive restarts independently of the portfolio
//! document. Keys are restricted to a filename-safe alphabet; anything else
//! is rejected before it can touch the filesystem.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::file::StoreError;

const KEY_MAX_LEN: usize = 64;

/// A stored entry with its write timestamp.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KvEntry {
    pub key: String,
    pub value: Value,
    pub saved_at: DateTime<Utc>,
}

/// Key-value store rooted at the data directory.
pub struct KvStore {
    data_dir: PathBuf,
}

impl KvStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    /// Persist `value` under `key`, overwriting any previous entry.
    pub async fn put(&self, key: &str, value: Value) -> Result<KvEntry, StoreError> {
        validate_key(key)?;

        let entry = KvEntry {
            key: key.to_string(),
            value,
            saved_at: Utc::now(),
        };
        let bytes = serde_json::to_vec_pretty(&entry)?;

        let path = self.entry_path(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::debug!(key = %key, "Key-value entry written");
        Ok(entry)
    }

    /// Read the entry stored under `key`, or `None` when absent.
    pub async fn get(&self, key: &str) -> Result<Option<KvEntry>, StoreError> {
        validate_key(key)?;

        match tokio::fs::read(self.entry_path(key)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("kv-{key}.json"))
    }
}

/// Keys must be non-empty, at most 64 chars, drawn from `[A-Za-z0-9._-]`.
fn validate_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty() || key.len() > KEY_MAX_LEN {
        return Err(StoreError::InvalidKey(format!(
            "key must be 1-{KEY_MAX_LEN} characters"
        )));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(StoreError::InvalidKey(
            "key may only contain letters, digits, '.', '_' and '-'".to_string(),
        ));
    }
    Ok(())
}
