//! Result publishers: where analysis results go once produced.

use crate::domain::AnalysisResult;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Destination for analysis results, keyed per topic.
///
/// Stands in for a message-bus client. Serialization of the result is the
/// publisher's concern; the core only hands over the value.
#[async_trait]
pub trait ResultPublisher: Send + Sync {
    /// Publish one result under `topic` with message key `key`.
    async fn publish(&self, topic: &str, key: &str, result: &AnalysisResult) -> Result<()>;
}

/// Publisher that discards every result.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPublisher;

#[async_trait]
impl ResultPublisher for NoopPublisher {
    async fn publish(&self, topic: &str, key: &str, _result: &AnalysisResult) -> Result<()> {
        tracing::trace!(topic, key, "Discarding analysis result");
        Ok(())
    }
}

/// One published message as written by [`JsonlPublisher`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedMessage {
    /// Topic the result was published to
    pub topic: String,
    /// Message key
    pub key: String,
    /// The analysis result
    pub value: AnalysisResult,
}

/// Publisher appending one JSON envelope per line to a file.
#[derive(Debug, Clone)]
pub struct JsonlPublisher {
    path: PathBuf,
}

impl JsonlPublisher {
    /// Create a publisher appending to `path`. The file is created on first publish.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the output file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ResultPublisher for JsonlPublisher {
    async fn publish(&self, topic: &str, key: &str, result: &AnalysisResult) -> Result<()> {
        let message = PublishedMessage {
            topic: topic.to_string(),
            key: key.to_string(),
            value: result.clone(),
        };
        let mut line = serde_json::to_string(&message)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| Error::Publish(format!("cannot open {}: {e}", self.path.display())))?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(topic, key, path = %self.path.display(), "Published analysis result");
        Ok(())
    }
}
