//! Portfolio document model.
//!
//! The on-disk JSON document and its in-memory mirror share these types, so
//! a load/save round trip preserves the arrays byte for byte (metadata
//! timestamps excepted).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A showcased project.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Project {
    /// Unique, monotonically assigned id.
    pub id: u64,
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub featured: bool,
    pub github_url: String,
    pub created_at: DateTime<Utc>,
}

/// A skill with a 1-10 proficiency rating.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Skill {
    pub id: u64,
    pub name: String,
    pub category: String,
    pub proficiency: u8,
}

/// Document bookkeeping timestamps.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DocumentMetadata {
    pub initialized_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

/// The whole persisted document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PortfolioDocument {
    pub projects: Vec<Project>,
    pub skills: Vec<Skill>,
    pub metadata: DocumentMetadata,
}

/// Fields accepted when creating a project. `id`, `featured` and
/// `created_at` are assigned by the store.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewProject {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub github_url: String,
}

impl PortfolioDocument {
    /// Next project id: `max(existing) + 1`, starting at 1 for an empty
    /// collection so the operation is total.
    pub fn next_project_id(&self) -> u64 {
        self.projects.iter().map(|p| p.id).max().unwrap_or(0) + 1
    }

    /// Seed document written on first start or after a corrupt load.
    pub fn with_defaults(now: DateTime<Utc>) -> Self {
        let projects = vec![
            Project {
                id: 1,
                title: "Kubernetes Portfolio Platform".to_string(),
                description: "Container orchestration demo with monitoring stack".to_string(),
                technologies: vec![
                    "Kubernetes".to_string(),
                    "Prometheus".to_string(),
                    "Grafana".to_string(),
                ],
                featured: true,
                github_url: "https://github.com/example/k8s-portfolio".to_string(),
                created_at: now,
            },
            Project {
                id: 2,
                title: "REST API Service".to_string(),
                description: "JSON API with file-backed persistence and metrics".to_string(),
                technologies: vec!["Rust".to_string(), "Axum".to_string()],
                featured: false,
                github_url: "https://github.com/example/rest-api".to_string(),
                created_at: now,
            },
        ];

        let skills = vec![
            Skill {
                id: 1,
                name: "Rust".to_string(),
                category: "Languages".to_string(),
                proficiency: 8,
            },
            Skill {
                id: 2,
                name: "Kubernetes".to_string(),
                category: "Infrastructure".to_string(),
                proficiency: 7,
            },
            Skill {
                id: 3,
                name: "PostgreSQL".to_string(),
                category: "Databases".to_string(),
                proficiency: 7,
            },
            Skill {
                id: 4,
                name: "Prometheus".to_string(),
                category: "Observability".to_string(),
                proficiency: 6,
            },
            Skill {
                id: 5,
                name: "CI/CD".to_string(),
                category: "Tooling".to_string(),
                proficiency: 7,
            },
        ];

        Self {
            projects,
            skills,
            metadata: DocumentMetadata {
                initialized_at: now,
                last_updated: now,
            },
        }
    }
}
