//! Durable storage subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     data_dir/portfolio.json
//!         → file.rs (read, parse, fall back to defaults)
//!         → in-memory mirror behind a single write lock
//!
//! Mutation (add_project, kv put):
//!     write lock → mutate mirror → serialize → temp file → rename
//!
//! Reads:
//!     read lock over the mirror; never touch the disk
//! ```
//!
//! # Design Decisions
//! - One writer at a time: the write lock spans id assignment and persist
//! - Atomic rename instead of in-place rewrite; no truncated documents
//! - A corrupt document degrades to defaults instead of refusing to start
//! - One process instance per data volume; replicas need a real database

pub mod document;
pub mod file;
pub mod kv;

pub use document::{NewProject, PortfolioDocument, Project, Skill};
pub use file::{DocumentState, DocumentStats, DocumentStore, StoreError};
pub use kv::{KvEntry, KvStore};

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One file in a storage directory listing.
#[derive(Debug, Clone, Serialize)]
pub struct FileInfo {
    pub name: String,
    pub size_bytes: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// Directory listings returned by `/api/storage`.
#[derive(Debug, Clone, Serialize)]
pub struct StorageReport {
    pub data_dir: String,
    pub data_files: Vec<FileInfo>,
    pub log_dir: String,
    pub log_files: Vec<FileInfo>,
}

/// List both storage directories with file sizes and modification times.
///
/// Best effort: files can appear or vanish between the listing and the
/// stat call, and unreadable entries are skipped.
pub async fn storage_report(
    data_dir: impl AsRef<Path>,
    log_dir: impl AsRef<Path>,
) -> Result<StorageReport, StoreError> {
    Ok(StorageReport {
        data_dir: data_dir.as_ref().display().to_string(),
        data_files: list_dir(data_dir.as_ref()).await?,
        log_dir: log_dir.as_ref().display().to_string(),
        log_files: list_dir(log_dir.as_ref()).await?,
    })
}

async fn list_dir(dir: &Path) -> Result<Vec<FileInfo>, StoreError> {
    let mut files = Vec::new();

    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        // A directory that does not exist yet lists as empty.
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(files),
        Err(error) => return Err(error.into()),
    };

    while let Some(entry) = entries.next_entry().await? {
        let Ok(metadata) = entry.metadata().await else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }
        files.push(FileInfo {
            name: entry.file_name().to_string_lossy().into_owned(),
            size_bytes: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        });
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn report_lists_files_with_sizes() {
        let data = tempfile::tempdir().unwrap();
        let logs = tempfile::tempdir().unwrap();
        tokio::fs::write(data.path().join("portfolio.json"), b"{}")
            .await
            .unwrap();
        tokio::fs::write(logs.path().join("app-2026-08-07.log"), b"line\n")
            .await
            .unwrap();

        let report = storage_report(data.path(), logs.path()).await.unwrap();

        assert_eq!(report.data_files.len(), 1);
        assert_eq!(report.data_files[0].name, "portfolio.json");
        assert_eq!(report.data_files[0].size_bytes, 2);
        assert_eq!(report.log_files[0].name, "app-2026-08-07.log");
        assert!(report.log_files[0].modified.is_some());
    }

    #[tokio::test]
    async fn missing_directory_lists_empty() {
        let data = tempfile::tempdir().unwrap();
        let report = storage_report(data.path(), data.path().join("nope"))
            .await
            .unwrap();
        assert!(report.log_files.is_empty());
    }
}
