//! YOLO dataset manifest (`dataset.yaml`) consumed by the training driver.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::SplitterConfig;
use crate::core::dataset::DatasetSplit;
use crate::error::{SplitError, SplitResult};

const MANIFEST_EXTENSION: &str = ".yaml";

/// `{path, <split>: images/<split>, names: {index: class}}`
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetManifest {
    pub path: PathBuf,
    pub splits: Vec<DatasetSplit>,
    pub classes: Vec<String>,
}

impl DatasetManifest {
    pub fn new(path: impl Into<PathBuf>, splits: &[DatasetSplit], classes: &[String]) -> Self {
        Self {
            path: path.into(),
            splits: splits.to_vec(),
            classes: classes.to_vec(),
        }
    }

    /// Class list as an index → name mapping
    pub fn names(&self) -> BTreeMap<usize, &str> {
        self.classes
            .iter()
            .enumerate()
            .map(|(i, name)| (i, name.as_str()))
            .collect()
    }

    pub fn to_yaml(&self) -> SplitResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

impl Serialize for DatasetManifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.splits.len() + 2))?;
        map.serialize_entry("path", &self.path.to_string_lossy())?;
        for split in &self.splits {
            map.serialize_entry(split.as_str(), &split.images_rel())?;
        }
        map.serialize_entry("names", &self.names())?;
        map.end()
    }
}

/// Append `.yaml` unless the name already ends with it
pub fn manifest_file_name(name: &str) -> String {
    if name.ends_with(MANIFEST_EXTENSION) {
        name.to_string()
    } else {
        format!("{}{}", name, MANIFEST_EXTENSION)
    }
}

/// `true` when `published` resolves to the already written `written` file.
/// Copying a file onto itself truncates it.
fn is_same_file(written: &Path, published: &Path) -> SplitResult<bool> {
    if !published.exists() {
        return Ok(false);
    }
    let written = written
        .canonicalize()
        .map_err(|e| SplitError::io(written, e))?;
    let published = published
        .canonicalize()
        .map_err(|e| SplitError::io(published, e))?;
    Ok(written == published)
}

/// Write the manifest into the output root, and into the project root when
/// `publish_to_root` is set.
///
/// `splits` and `classes` are trusted to come from the same partition run
/// that produced `output_path`.
///
/// # Returns
/// * `Ok(PathBuf)` with the manifest location under the output root
pub fn write_manifest(
    config: &SplitterConfig,
    output_path: &Path,
    splits: &[DatasetSplit],
    classes: &[String],
    manifest_name: Option<&str>,
    publish_to_root: bool,
) -> SplitResult<PathBuf> {
    let name = manifest_file_name(manifest_name.unwrap_or(&config.manifest_name));
    let output_root = config.output_root();
    fs::create_dir_all(&output_root).map_err(|e| SplitError::io(&output_root, e))?;
    let filename = output_root.join(&name);

    let yaml = DatasetManifest::new(output_path, splits, classes).to_yaml()?;
    fs::write(&filename, yaml).map_err(|e| SplitError::io(&filename, e))?;
    info!("Manifest written to {:?}", filename);

    if publish_to_root {
        let published = config.root_dir.join(&name);
        if is_same_file(&filename, &published)? {
            debug!("Manifest already at {:?}, nothing to publish", published);
        } else {
            fs::copy(&filename, &published).map_err(|e| SplitError::io(&published, e))?;
            info!("Manifest published to {:?}", published);
        }
    }

    Ok(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_manifest_file_name() {
        assert_eq!(manifest_file_name("dataset"), "dataset.yaml");
        assert_eq!(manifest_file_name("cs2.yaml"), "cs2.yaml");
    }

    #[test]
    fn test_yaml_layout() {
        let manifest = DatasetManifest::new(
            "/data/outputs/dataset",
            &[DatasetSplit::Train, DatasetSplit::Val, DatasetSplit::Test],
            &classes(&["cat", "dog"]),
        );

        let yaml = manifest.to_yaml().unwrap();
        assert_eq!(
            yaml,
            "path: /data/outputs/dataset\n\
             train: images/train\n\
             val: images/val\n\
             test: images/test\n\
             names:\n  0: cat\n  1: dog\n"
        );
    }

    #[test]
    fn test_names_follow_class_order() {
        let manifest = DatasetManifest::new(
            "out",
            &[DatasetSplit::Train, DatasetSplit::Val],
            &classes(&["zebra", "ant", "moose"]),
        );
        let value: serde_yaml::Value = serde_yaml::from_str(&manifest.to_yaml().unwrap()).unwrap();
        let names = value["names"].as_mapping().unwrap();

        let keys: Vec<u64> = names.keys().map(|k| k.as_u64().unwrap()).collect();
        assert_eq!(keys, vec![0, 1, 2]);
        let values: Vec<&str> = names.values().map(|v| v.as_str().unwrap()).collect();
        assert_eq!(values, vec!["zebra", "ant", "moose"]);
        assert!(value.get("test").is_none());
    }

    #[test]
    fn test_write_and_publish() {
        let temp = tempfile::tempdir().unwrap();
        let config = SplitterConfig::with_root(temp.path());
        let output_path = config.output_root().join("dataset");

        let written = write_manifest(
            &config,
            &output_path,
            &[DatasetSplit::Train, DatasetSplit::Val],
            &classes(&["T", "CT"]),
            Some("cs2"),
            true,
        )
        .unwrap();

        assert_eq!(written, temp.path().join("outputs/cs2.yaml"));
        let published = fs::read_to_string(temp.path().join("cs2.yaml")).unwrap();
        assert_eq!(published, fs::read_to_string(&written).unwrap());
        assert!(published.contains("val: images/val"));
    }

    #[test]
    fn test_publish_into_output_root_keeps_manifest() {
        let temp = tempfile::tempdir().unwrap();
        let config = SplitterConfig {
            output_root: Some(temp.path().to_path_buf()),
            ..SplitterConfig::with_root(temp.path())
        };

        let written = write_manifest(
            &config,
            Path::new("out"),
            &[DatasetSplit::Train, DatasetSplit::Val],
            &classes(&["cat", "dog"]),
            None,
            true,
        )
        .unwrap();

        assert_eq!(written, temp.path().join("dataset.yaml"));
        let content = fs::read_to_string(&written).unwrap();
        assert!(content.starts_with("path: out\n"));
        assert!(content.contains("  1: dog"));
    }

    #[test]
    fn test_publish_through_relative_root_alias() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        let config = SplitterConfig {
            output_root: Some(temp.path().join("sub/..")),
            ..SplitterConfig::with_root(temp.path())
        };

        let written =
            write_manifest(&config, Path::new("out"), &[DatasetSplit::Train], &[], None, true)
                .unwrap();

        assert!(!fs::read_to_string(written).unwrap().is_empty());
    }

    #[test]
    fn test_write_without_publish() {
        let temp = tempfile::tempdir().unwrap();
        let config = SplitterConfig::with_root(temp.path());

        write_manifest(&config, Path::new("out"), &[DatasetSplit::Train], &[], None, false)
            .unwrap();

        assert!(temp.path().join("outputs/dataset.yaml").is_file());
        assert!(!temp.path().join("dataset.yaml").exists());
    }

    #[test]
    fn test_unwritable_location_is_io_error() {
        let temp = tempfile::tempdir().unwrap();
        let blocker = temp.path().join("outputs");
        fs::write(&blocker, "not a directory").unwrap();
        let config = SplitterConfig::with_root(temp.path());

        let err = write_manifest(&config, Path::new("out"), &[], &[], None, false).unwrap_err();
        assert!(matches!(err, SplitError::Io { .. }));
    }
}
