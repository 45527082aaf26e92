//! Application context for CLI command execution.
//!
//! This module provides the `App` struct that locates the workspace, wires
//! the configured repository and publisher into an [`AnalysisService`], and
//! loads the topology.
//!
//! # Example
//!
//! ```no_run
//! use faultline::app::App;
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::from_directory(Path::new(".")).await?;
//!     let result = app.service().analyze_health().await?;
//!     println!("{}", result.impact_score);
//!     Ok(())
//! }
//! ```

use crate::config::{CONFIG_FILE_NAME, FAULTLINE_DIR_NAME, FaultlineConfig, PublishSink, find_faultline_root};
use crate::error::{ConfigError, Result};
use crate::service::{AnalysisService, JsonlPublisher, NoopPublisher, ResultPublisher, SnapshotRepository};
use crate::topology::LoadWarning;
use std::path::{Path, PathBuf};

/// Application context for CLI operations.
#[derive(Debug)]
pub struct App {
    service: AnalysisService,

    /// Path to the `.faultline` directory
    faultline_dir: PathBuf,

    /// Relationships dropped while loading the snapshot
    load_warnings: Vec<LoadWarning>,
}

impl App {
    /// Create an App from the given working directory.
    ///
    /// Searches up the directory tree for `.faultline/`, loads the
    /// configuration, and loads the topology snapshot into the store.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No workspace is found in the directory tree
    /// - Configuration cannot be loaded
    /// - The snapshot cannot be read
    pub async fn from_directory(working_dir: &Path) -> Result<Self> {
        let root_dir = find_faultline_root(working_dir).ok_or(ConfigError::NotInitialized)?;

        let faultline_dir = root_dir.join(FAULTLINE_DIR_NAME);
        let config = FaultlineConfig::load(&faultline_dir.join(CONFIG_FILE_NAME)).await?;

        let repository = SnapshotRepository::new(config.snapshot_path(&root_dir));
        let publisher: Box<dyn ResultPublisher> = match config.publish.sink {
            PublishSink::None => Box::new(NoopPublisher),
            PublishSink::Jsonl => Box::new(JsonlPublisher::new(config.publish_path(&root_dir))),
        };
        let topic = config.resolve_topic();

        tracing::debug!(root = %root_dir.display(), topic = %topic, sink = ?config.publish.sink, "Opening workspace");

        let service = AnalysisService::new(Box::new(repository), publisher, topic);
        let load_warnings = service.refresh().await?;
        for warning in &load_warnings {
            tracing::warn!("{warning}");
        }

        Ok(Self {
            service,
            faultline_dir,
            load_warnings,
        })
    }

    /// The analysis service.
    pub fn service(&self) -> &AnalysisService {
        &self.service
    }

    /// Path to the `.faultline` directory.
    pub fn faultline_dir(&self) -> &Path {
        &self.faultline_dir
    }

    /// Relationships dropped while loading the snapshot.
    pub fn load_warnings(&self) -> &[LoadWarning] {
        &self.load_warnings
    }

    /// Save the topology back to the snapshot file.
    ///
    /// Call after any mutating operation.
    pub async fn save(&self) -> Result<()> {
        self.service.persist().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init;
    use crate::domain::ComponentId;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_app_from_initialized_directory() {
        let temp_dir = TempDir::new().unwrap();
        init::init(temp_dir.path(), true).await.unwrap();

        let app = App::from_directory(temp_dir.path()).await.unwrap();

        assert!(app.faultline_dir().ends_with(".faultline"));
        assert_eq!(app.service().store().len().unwrap(), 6);
        assert!(app.load_warnings().is_empty());
    }

    #[tokio::test]
    async fn test_app_from_subdirectory() {
        let temp_dir = TempDir::new().unwrap();
        init::init(temp_dir.path(), false).await.unwrap();

        let sub_dir = temp_dir.path().join("src").join("lib");
        std::fs::create_dir_all(&sub_dir).unwrap();

        let app = App::from_directory(&sub_dir).await.unwrap();
        assert_eq!(app.service().store().len().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_app_from_uninitialized_directory() {
        let temp_dir = TempDir::new().unwrap();

        let err = App::from_directory(temp_dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("Not a faultline workspace"));
    }

    #[tokio::test]
    async fn test_app_save_persists_mutations() {
        let temp_dir = TempDir::new().unwrap();
        init::init(temp_dir.path(), true).await.unwrap();

        let app = App::from_directory(temp_dir.path()).await.unwrap();
        app.service()
            .remove_component(&ComponentId::new("service-001"))
            .unwrap();
        app.save().await.unwrap();

        let reopened = App::from_directory(temp_dir.path()).await.unwrap();
        assert_eq!(reopened.service().store().len().unwrap(), 5);
    }

    #[tokio::test]
    async fn test_app_jsonl_sink_writes_results() {
        let temp_dir = TempDir::new().unwrap();
        let result = init::init(temp_dir.path(), true).await.unwrap();

        let mut config = FaultlineConfig::load(&result.config_file).await.unwrap();
        config.publish.sink = PublishSink::Jsonl;
        config.save(&result.config_file).await.unwrap();

        let app = App::from_directory(temp_dir.path()).await.unwrap();
        app.service().analyze_health().await.unwrap();

        let published = std::fs::read_to_string(config.publish_path(temp_dir.path())).unwrap();
        assert_eq!(published.lines().count(), 1);
        assert!(published.contains("health-status"));
    }
}
