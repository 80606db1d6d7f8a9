use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::partition::DEFAULT_SEED;
use crate::error::{SplitError, SplitResult};

/// Default manifest file name read by the training driver
pub const DEFAULT_MANIFEST_NAME: &str = "dataset.yaml";

/// Configuration for one splitting run.
///
/// Replaces process-wide root/output constants: every path the partitioner
/// touches is derived from here. Fields missing from a config file fall
/// back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Project root; relative source directories resolve against it and the
    /// published manifest lands here
    pub root_dir: PathBuf,

    /// Where split datasets and manifests are written (default `<root>/outputs`)
    pub output_root: Option<PathBuf>,

    /// Seed for both splitting passes
    pub seed: u64,

    /// Image file extensions picked up from the source pool, case-sensitive
    pub image_extensions: Vec<String>,

    pub manifest_name: String,

    /// Also copy the manifest to `<root>/<manifest_name>`
    pub publish_to_root: bool,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            output_root: None,
            seed: DEFAULT_SEED,
            image_extensions: vec!["jpg".to_string()],
            manifest_name: DEFAULT_MANIFEST_NAME.to_string(),
            publish_to_root: true,
        }
    }
}

impl SplitterConfig {
    /// A default config rooted at `root_dir`
    pub fn with_root(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            ..Self::default()
        }
    }

    pub fn output_root(&self) -> PathBuf {
        self.output_root
            .clone()
            .unwrap_or_else(|| self.root_dir.join("outputs"))
    }

    /// Resolve a source directory against the root (absolute paths pass through)
    pub fn resolve_source(&self, dir: &Path) -> PathBuf {
        self.root_dir.join(dir)
    }

    /// Load a JSON config file
    pub fn load(path: &Path) -> SplitResult<Self> {
        info!("Loading config from: {:?}", path);
        let contents = fs::read_to_string(path).map_err(|e| SplitError::io(path, e))?;
        let config = serde_json::from_str::<SplitterConfig>(&contents).map_err(|e| {
            SplitError::Config {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        info!("Successfully loaded config");
        Ok(config)
    }
}
