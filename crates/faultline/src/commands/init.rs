//! Implementation of the `init` command.
//!
//! Creates the `.faultline/` directory with a default configuration, a
//! topology snapshot (empty, or the sample fixture), and a `.gitignore`.

use crate::config::{CONFIG_FILE_NAME, FAULTLINE_DIR_NAME, FaultlineConfig, SNAPSHOT_FILE_NAME};
use crate::error::{Error, Result};
use crate::service::{ComponentRepository, SnapshotRepository, sample_snapshot};
use crate::topology::TopologySnapshot;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the gitignore file within `.faultline`
pub const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Result of the init command
#[derive(Debug)]
pub struct InitResult {
    /// Path to the created `.faultline` directory
    pub faultline_dir: PathBuf,
    /// Path to the created config file
    pub config_file: PathBuf,
    /// Path to the created snapshot file
    pub snapshot_file: PathBuf,
    /// Path to the created gitignore file
    pub gitignore_file: PathBuf,
    /// Number of components written to the snapshot
    pub components: usize,
}

/// Initialize a new workspace in `base_dir`.
///
/// With `sample`, the snapshot is seeded with the six-component development
/// topology instead of being empty.
///
/// # Errors
///
/// Returns an error if `.faultline/` already exists or a file cannot be written.
pub async fn init(base_dir: &Path, sample: bool) -> Result<InitResult> {
    let faultline_dir = base_dir.join(FAULTLINE_DIR_NAME);

    if faultline_dir.exists() {
        return Err(Error::Config(format!(
            "Faultline is already initialized in this directory. Found existing '{FAULTLINE_DIR_NAME}'"
        )));
    }

    fs::create_dir_all(&faultline_dir).await?;

    let config_file = faultline_dir.join(CONFIG_FILE_NAME);
    FaultlineConfig::default().save(&config_file).await?;

    let snapshot_file = faultline_dir.join(SNAPSHOT_FILE_NAME);
    let snapshot = if sample {
        sample_snapshot()
    } else {
        TopologySnapshot::default()
    };
    SnapshotRepository::new(&snapshot_file).save(&snapshot).await?;

    let gitignore_file = faultline_dir.join(GITIGNORE_FILE_NAME);
    let gitignore_content = "\
# Published analysis results are local output
analysis.jsonl
*.tmp
";
    fs::write(&gitignore_file, gitignore_content).await?;

    tracing::info!(
        path = %faultline_dir.display(),
        components = snapshot.components.len(),
        "Initialized faultline workspace"
    );

    Ok(InitResult {
        faultline_dir,
        config_file,
        snapshot_file,
        gitignore_file,
        components: snapshot.components.len(),
    })
}
