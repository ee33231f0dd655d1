//! File-backed document store.
//!
//! One JSON file holds the whole portfolio document. It is read once at
//! startup and mirrored in memory; every mutation rewrites the file in
//! full. Mutations run under a single write lock held across the whole
//! read-modify-write-persist sequence, so id assignment cannot interleave
//! with another writer in this process. Saves go through a temp file and a
//! rename, so a crash mid-write leaves the previous document intact.
//!
//! The store still assumes exactly one process instance owns the data
//! directory; coordinating multiple replicas needs a real database.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::store::document::{NewProject, PortfolioDocument, Project, Skill};

/// File name of the portfolio document inside the data directory.
pub const DOCUMENT_FILE: &str = "portfolio.json";

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("document serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid key: {0}")]
    InvalidKey(String),
}

/// How the in-memory document was obtained at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentState {
    /// Parsed from an existing file.
    LoadedFromDisk,
    /// Built from defaults (file absent or unparseable).
    Defaulted,
}

/// Aggregate counts reported by `/api/stats`.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentStats {
    pub project_count: usize,
    pub skill_count: usize,
    pub featured_count: usize,
    pub document_state: DocumentState,
}

/// The document store. Cheap to share behind an `Arc`.
pub struct DocumentStore {
    path: PathBuf,
    state: DocumentState,
    document: RwLock<PortfolioDocument>,
}

impl DocumentStore {
    /// Open the store rooted at `data_dir`, creating the directory and a
    /// default document when none exists.
    ///
    /// A file that exists but does not parse is replaced by the default
    /// document; the parse failure is logged, not propagated. The resulting
    /// state is fixed for the process lifetime.
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref();
        tokio::fs::create_dir_all(data_dir).await?;
        let path = data_dir.join(DOCUMENT_FILE);

        let (document, state) = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<PortfolioDocument>(&bytes) {
                Ok(document) => {
                    tracing::info!(
                        path = %path.display(),
                        projects = document.projects.len(),
                        skills = document.skills.len(),
                        "Portfolio document loaded"
                    );
                    (document, DocumentState::LoadedFromDisk)
                }
                Err(error) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %error,
                        "Portfolio document unparseable, falling back to defaults"
                    );
                    (
                        PortfolioDocument::with_defaults(Utc::now()),
                        DocumentState::Defaulted,
                    )
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No portfolio document, seeding defaults");
                (
                    PortfolioDocument::with_defaults(Utc::now()),
                    DocumentState::Defaulted,
                )
            }
            Err(error) => return Err(error.into()),
        };

        let store = Self {
            path,
            state,
            document: RwLock::new(document),
        };

        // Persist the seed so a restart observes LoadedFromDisk.
        if store.state == DocumentState::Defaulted {
            let mut doc = store.document.write().await;
            store.persist(&mut doc).await?;
        }

        Ok(store)
    }

    /// How the document was obtained at startup.
    pub fn state(&self) -> DocumentState {
        self.state
    }

    /// All projects, in document order.
    pub async fn projects(&self) -> Vec<Project> {
        self.document.read().await.projects.clone()
    }

    /// A single project by id.
    pub async fn project(&self, id: u64) -> Option<Project> {
        self.document
            .read()
            .await
            .projects
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    /// All skills, in document order.
    pub async fn skills(&self) -> Vec<Skill> {
        self.document.read().await.skills.clone()
    }

    /// Aggregate counts for `/api/stats`.
    pub async fn stats(&self) -> DocumentStats {
        let doc = self.document.read().await;
        DocumentStats {
            project_count: doc.projects.len(),
            skill_count: doc.skills.len(),
            featured_count: doc.projects.iter().filter(|p| p.featured).count(),
            document_state: self.state,
        }
    }

    /// Full copy of the current document.
    pub async fn snapshot(&self) -> PortfolioDocument {
        self.document.read().await.clone()
    }

    /// Append a new project and persist the document.
    ///
    /// The write lock is held from id assignment through the disk write, so
    /// two concurrent calls cannot observe the same max id. On a persist
    /// failure the in-memory append is kept (no rollback) and the error is
    /// surfaced to the caller.
    pub async fn add_project(&self, new: NewProject) -> Result<Project, StoreError> {
        let mut doc = self.document.write().await;

        let project = Project {
            id: doc.next_project_id(),
            title: new.title,
            description: new.description,
            technologies: new.technologies,
            featured: false,
            github_url: new.github_url,
            created_at: Utc::now(),
        };
        doc.projects.push(project.clone());

        self.persist(&mut doc).await?;

        tracing::info!(id = project.id, title = %project.title, "Project created");
        Ok(project)
    }

    /// Rewrite the whole document: stamp `last_updated`, serialize, write to
    /// a temp file, rename into place. Callers must hold the write lock.
    async fn persist(&self, doc: &mut PortfolioDocument) -> Result<(), StoreError> {
        doc.metadata.last_updated = Utc::now();
        let bytes = serde_json::to_vec_pretty(doc)?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[tokio::test]
    async fn seeds_defaults_then_loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();

        let store = DocumentStore::open(dir.path()).await.unwrap();
        assert_eq!(store.state(), DocumentState::Defaulted);
        assert_eq!(store.projects().await.len(), 2);
        assert_eq!(store.skills().await.len(), 5);

        let reopened = DocumentStore::open(dir.path()).await.unwrap();
        assert_eq!(reopened.state(), DocumentState::LoadedFromDisk);
    }

    #[tokio::test]
    async fn save_load_round_trip_preserves_arrays() {
        let dir = tempfile::tempdir().unwrap();

        let store = DocumentStore::open(dir.path()).await.unwrap();
        store
            .add_project(NewProject {
                title: "round trip".to_string(),
                description: "persists across restarts".to_string(),
                technologies: vec!["Rust".to_string()],
                github_url: String::new(),
            })
            .await
            .unwrap();
        let before = store.snapshot().await;

        let reopened = DocumentStore::open(dir.path()).await.unwrap();
        let after = reopened.snapshot().await;

        assert_eq!(before.projects, after.projects);
        assert_eq!(before.skills, after.skills);
    }

    #[tokio::test]
    async fn corrupt_document_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join(DOCUMENT_FILE), b"{ not json")
            .await
            .unwrap();

        let store = DocumentStore::open(dir.path()).await.unwrap();
        assert_eq!(store.state(), DocumentState::Defaulted);
        assert_eq!(store.projects().await.len(), 2);

        // The corrupt file was replaced by the persisted defaults.
        let reopened = DocumentStore::open(dir.path()).await.unwrap();
        assert_eq!(reopened.state(), DocumentState::LoadedFromDisk);
    }

    #[tokio::test]
    async fn add_project_assigns_max_plus_one() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(dir.path()).await.unwrap();

        // Seed document has ids {1, 2}
        let created = store
            .add_project(NewProject {
                title: "third".to_string(),
                description: String::new(),
                technologies: Vec::new(),
                github_url: String::new(),
            })
            .await
            .unwrap();

        assert_eq!(created.id, 3);
        assert!(!created.featured);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_add_project_assigns_unique_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(DocumentStore::open(dir.path()).await.unwrap());

        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .add_project(NewProject {
                        title: format!("concurrent {i}"),
                        description: String::new(),
                        technologies: Vec::new(),
                        github_url: String::new(),
                    })
                    .await
                    .unwrap()
                    .id
            }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            assert!(ids.insert(handle.await.unwrap()), "duplicate id assigned");
        }
        assert_eq!(ids.len(), 20);
    }
}
