//! Append-only application log.
//!
//! One JSON object per line, appended to a date-stamped file
//! (`app-YYYY-MM-DD.log`, UTC) under the log directory. The file name
//! changes at midnight, so files rotate naturally; nothing is ever deleted
//! or rewritten. `/api/logs` reads the latest file back.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// One structured log line.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    pub pid: u32,
    pub instance: String,
}

/// Writer for the daily application log.
pub struct AppLog {
    dir: PathBuf,
    instance: String,
    // Serializes appends so concurrent handlers cannot interleave lines.
    write_lock: Mutex<()>,
}

impl AppLog {
    pub fn new(dir: impl AsRef<Path>, instance: impl Into<String>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            instance: instance.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Append one entry to today's file.
    ///
    /// Failures are logged and swallowed: a full disk must not fail the
    /// request that produced the entry.
    pub async fn append(&self, level: &str, message: &str, data: Option<Value>) {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level: level.to_string(),
            message: message.to_string(),
            data,
            pid: std::process::id(),
            instance: self.instance.clone(),
        };

        if let Err(error) = self.write_line(&entry).await {
            tracing::error!(error = %error, "Failed to append application log entry");
        }
    }

    async fn write_line(&self, entry: &LogEntry) -> std::io::Result<()> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;
        tokio::fs::create_dir_all(&self.dir).await?;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.dir.join(file_name(entry.timestamp)))
            .await?;
        file.write_all(&line).await?;
        Ok(())
    }

    /// Last `lines` entries from the latest log file, oldest first.
    /// Unparseable lines are skipped.
    pub async fn tail(&self, lines: usize) -> std::io::Result<Vec<LogEntry>> {
        let Some(latest) = self.latest_file().await? else {
            return Ok(Vec::new());
        };

        let content = tokio::fs::read_to_string(&latest).await?;
        let mut entries: Vec<LogEntry> = content
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect();

        if entries.len() > lines {
            entries.drain(..entries.len() - lines);
        }
        Ok(entries)
    }

    /// Latest log file by name; the date format sorts lexicographically.
    async fn latest_file(&self) -> std::io::Result<Option<PathBuf>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error),
        };

        let mut latest: Option<String> = None;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with("app-") && name.ends_with(".log") {
                if latest.as_deref().map_or(true, |current| name.as_str() > current) {
                    latest = Some(name);
                }
            }
        }

        Ok(latest.map(|name| self.dir.join(name)))
    }
}

fn file_name(timestamp: DateTime<Utc>) -> String {
    format!("app-{}.log", timestamp.format("%Y-%m-%d"))
}
