//! Component repositories: where topology snapshots come from.

use crate::domain::{Component, ComponentStatus, ComponentType};
use crate::error::{Error, Result};
use crate::topology::TopologySnapshot;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

/// Source of topology snapshots.
///
/// Implementations stand in for the external component store. They must be
/// `Send + Sync` so a service can be shared across tasks.
#[async_trait]
pub trait ComponentRepository: Send + Sync {
    /// Load the current snapshot.
    async fn load(&self) -> Result<TopologySnapshot>;

    /// Persist a snapshot, replacing whatever was stored.
    async fn save(&self, snapshot: &TopologySnapshot) -> Result<()>;
}

/// Repository backed by a JSON snapshot file.
///
/// A missing file loads as an empty snapshot, so a fresh workspace needs no
/// seeding.
#[derive(Debug, Clone)]
pub struct SnapshotRepository {
    path: PathBuf,
}

impl SnapshotRepository {
    /// Create a repository reading and writing `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ComponentRepository for SnapshotRepository {
    async fn load(&self) -> Result<TopologySnapshot> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Snapshot file missing, starting empty");
                return Ok(TopologySnapshot::default());
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(TopologySnapshot::default());
        }

        serde_json::from_str(&content).map_err(|e| {
            Error::Repository(format!("invalid snapshot {}: {e}", self.path.display()))
        })
    }

    async fn save(&self, snapshot: &TopologySnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        // Replace atomically via a sibling temp file.
        let mut json = serde_json::to_string_pretty(snapshot)?;
        json.push('\n');
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;

        tracing::debug!(
            path = %self.path.display(),
            components = snapshot.components.len(),
            "Snapshot saved"
        );
        Ok(())
    }
}

/// Repository holding a snapshot in memory.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    snapshot: Mutex<TopologySnapshot>,
}

impl InMemoryRepository {
    /// Create a repository seeded with `snapshot`.
    pub fn new(snapshot: TopologySnapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
        }
    }

    /// Repository seeded with [`sample_snapshot`].
    pub fn sample() -> Self {
        Self::new(sample_snapshot())
    }
}

#[async_trait]
impl ComponentRepository for InMemoryRepository {
    async fn load(&self) -> Result<TopologySnapshot> {
        Ok(self.snapshot.lock().await.clone())
    }

    async fn save(&self, snapshot: &TopologySnapshot) -> Result<()> {
        *self.snapshot.lock().await = snapshot.clone();
        Ok(())
    }
}

/// Small development topology: two base components, three applications on
/// top of them, and an API gateway in front.
///
/// ```text
/// service-001 (gateway) -> app-001, app-002, app-003
/// app-001 (degraded)    -> server-001, db-001
/// app-002 (warning)     -> server-001
/// app-003               -> db-001
/// ```
pub fn sample_snapshot() -> TopologySnapshot {
    let component = |id: &str, name: &str, ty, status, deps: &[&str]| {
        Component::new(id, ty)
            .with_name(name)
            .with_status(status)
            .depends_on(deps.iter().copied())
    };

    TopologySnapshot {
        components: vec![
            component(
                "server-001",
                "Web Server 1",
                ComponentType::Server,
                ComponentStatus::Healthy,
                &[],
            ),
            component(
                "db-001",
                "Primary Database",
                ComponentType::Database,
                ComponentStatus::Healthy,
                &[],
            ),
            component(
                "app-001",
                "User Service",
                ComponentType::Application,
                ComponentStatus::Degraded,
                &["server-001", "db-001"],
            ),
            component(
                "app-002",
                "Order Service",
                ComponentType::Application,
                ComponentStatus::Warning,
                &["server-001"],
            ),
            component(
                "app-003",
                "Inventory Service",
                ComponentType::Application,
                ComponentStatus::Healthy,
                &["db-001"],
            ),
            component(
                "service-001",
                "API Gateway",
                ComponentType::Service,
                ComponentStatus::Healthy,
                &["app-001", "app-002", "app-003"],
            ),
        ],
    }
}
