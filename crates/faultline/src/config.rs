//! Workspace configuration.
//!
//! A faultline workspace is a directory containing `.faultline/`, which holds
//! `config.yaml` and the topology snapshot. The configuration names the
//! snapshot file, the topic results are published to, and the publish sink.

use crate::error::{Error, Result};
use crate::service::DEFAULT_ANALYSIS_TOPIC;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the faultline directory
pub const FAULTLINE_DIR_NAME: &str = ".faultline";

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Name of the topology snapshot file
pub const SNAPSHOT_FILE_NAME: &str = "topology.json";

/// Name of the JSONL file the `jsonl` sink appends to
pub const PUBLISH_FILE_NAME: &str = "analysis.jsonl";

/// Environment variable overriding `analysis-topic`
pub const TOPIC_ENV_VAR: &str = "FAULTLINE_ANALYSIS_TOPIC";

/// Maximum directory depth to traverse when searching for a workspace root
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FaultlineConfig {
    /// Topic analysis results are published to
    #[serde(rename = "analysis-topic", default = "default_topic")]
    pub analysis_topic: String,

    /// Snapshot path, relative to the workspace root
    #[serde(rename = "snapshot-file")]
    pub snapshot_file: String,

    /// Where results go
    #[serde(default)]
    pub publish: PublishConfig,
}

fn default_topic() -> String {
    DEFAULT_ANALYSIS_TOPIC.to_string()
}

/// Publish section of the configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublishConfig {
    /// Sink kind
    #[serde(default)]
    pub sink: PublishSink,

    /// Output path for the `jsonl` sink, relative to the workspace root
    #[serde(default = "default_publish_path")]
    pub path: String,
}

fn default_publish_path() -> String {
    format!("{FAULTLINE_DIR_NAME}/{PUBLISH_FILE_NAME}")
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            sink: PublishSink::default(),
            path: default_publish_path(),
        }
    }
}

/// Publish sink kinds
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PublishSink {
    /// Discard results
    #[default]
    None,
    /// Append results to a JSONL file
    Jsonl,
}

impl FaultlineConfig {
    /// Load configuration from a file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        serde_yaml::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Save configuration to a file
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Absolute snapshot path for a workspace rooted at `root`.
    pub fn snapshot_path(&self, root: &Path) -> PathBuf {
        root.join(&self.snapshot_file)
    }

    /// Absolute publish path for a workspace rooted at `root`.
    pub fn publish_path(&self, root: &Path) -> PathBuf {
        root.join(&self.publish.path)
    }

    /// Topic after applying `FAULTLINE_ANALYSIS_TOPIC`, if set.
    pub fn resolve_topic(&self) -> String {
        self.topic_with_override(std::env::var(TOPIC_ENV_VAR).ok().as_deref())
            .to_string()
    }

    /// Topic after applying an explicit override. Blank overrides are ignored.
    pub fn topic_with_override<'a>(&'a self, value: Option<&'a str>) -> &'a str {
        match value.map(str::trim) {
            Some(topic) if !topic.is_empty() => topic,
            _ => &self.analysis_topic,
        }
    }
}

impl Default for FaultlineConfig {
    fn default() -> Self {
        Self {
            analysis_topic: default_topic(),
            snapshot_file: format!("{FAULTLINE_DIR_NAME}/{SNAPSHOT_FILE_NAME}"),
            publish: PublishConfig::default(),
        }
    }
}

/// Check if a directory has been initialized.
pub fn is_initialized(base_dir: &Path) -> bool {
    base_dir.join(FAULTLINE_DIR_NAME).exists()
}

/// Find the workspace root by searching up the directory tree.
///
/// Returns the directory containing `.faultline/`, or `None` if none is found
/// before the filesystem root or [`MAX_TRAVERSAL_DEPTH`].
pub fn find_faultline_root(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        if is_initialized(&current) {
            return Some(current);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}
