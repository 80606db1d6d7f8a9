use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::operations::get_label_path_for_image;
use crate::error::{SplitError, SplitResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DatasetSplit {
    Train,
    Val,
    Test,
}

impl DatasetSplit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetSplit::Train => "train",
            DatasetSplit::Val => "val",
            DatasetSplit::Test => "test",
        }
    }

    pub fn all() -> [DatasetSplit; 3] {
        [DatasetSplit::Train, DatasetSplit::Val, DatasetSplit::Test]
    }

    /// Image directory of this split relative to the dataset root
    pub fn images_rel(&self) -> String {
        format!("images/{}", self.as_str())
    }

    /// Label directory of this split relative to the dataset root
    pub fn labels_rel(&self) -> String {
        format!("labels/{}", self.as_str())
    }
}

/// Pair counts of one split of an already partitioned dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSummary {
    pub split: DatasetSplit,
    pub images: usize,
    pub labels: usize,
    /// Images with no label file next to them
    pub unlabeled: Vec<PathBuf>,
}

/// A partitioned dataset laid out as `images/<split>` + `labels/<split>`
pub struct Dataset {
    dataset_path: PathBuf,
    image_extensions: Vec<String>,
}

impl Dataset {
    pub fn new(dataset_path: impl Into<PathBuf>, image_extensions: &[String]) -> Self {
        Self {
            dataset_path: dataset_path.into(),
            image_extensions: image_extensions.to_vec(),
        }
    }

    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }

    /// Splits that have an image directory on disk, in train/val/test order
    pub fn present_splits(&self) -> Vec<DatasetSplit> {
        DatasetSplit::all()
            .into_iter()
            .filter(|split| self.dataset_path.join(split.images_rel()).is_dir())
            .collect()
    }

    /// Sorted image files of one split
    pub fn image_files(&self, split: DatasetSplit) -> SplitResult<Vec<PathBuf>> {
        let images_path = self.dataset_path.join(split.images_rel());
        info!("Reading images from: {:?}", images_path);
        let files = list_files(&images_path, |ext| {
            self.image_extensions.iter().any(|allowed| allowed == ext)
        })?;
        info!("Found {} images in {:?}", files.len(), images_path);
        Ok(files)
    }

    pub fn summarize(&self, split: DatasetSplit) -> SplitResult<SplitSummary> {
        let images = self.image_files(split)?;
        let labels_path = self.dataset_path.join(split.labels_rel());
        let labels = if labels_path.is_dir() {
            list_files(&labels_path, |ext| ext == "txt")?.len()
        } else {
            0
        };

        let unlabeled: Vec<PathBuf> = images
            .iter()
            .filter(|img| {
                get_label_path_for_image(img)
                    .map(|label| !label.is_file())
                    .unwrap_or(true)
            })
            .cloned()
            .collect();
        debug!("{} unlabeled images in {:?}", unlabeled.len(), split);

        Ok(SplitSummary {
            split,
            images: images.len(),
            labels,
            unlabeled,
        })
    }

    /// Summaries for every split present on disk
    pub fn inspect(&self) -> SplitResult<Vec<SplitSummary>> {
        self.present_splits()
            .into_iter()
            .map(|split| self.summarize(split))
            .collect()
    }
}

/// List regular files in `dir` whose extension passes `accept`, sorted for
/// consistent ordering across platforms.
pub(crate) fn list_files(dir: &Path, accept: impl Fn(&str) -> bool) -> SplitResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| SplitError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SplitError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if accept(ext) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpg() -> Vec<String> {
        vec!["jpg".to_string()]
    }

    #[test]
    fn test_split_paths() {
        assert_eq!(DatasetSplit::Train.images_rel(), "images/train");
        assert_eq!(DatasetSplit::Test.labels_rel(), "labels/test");
    }

    #[test]
    fn test_inspect_counts_pairs_and_unlabeled() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let root = temp.path();
        for dir in ["images/train", "labels/train", "images/val", "labels/val"] {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
        fs::write(root.join("images/train/a.jpg"), b"a").unwrap();
        fs::write(root.join("images/train/b.jpg"), b"b").unwrap();
        fs::write(root.join("images/train/notes.md"), b"skip").unwrap();
        fs::write(root.join("labels/train/a.txt"), "0 0.5 0.5 0.2 0.2\n").unwrap();
        fs::write(root.join("images/val/c.jpg"), b"c").unwrap();
        fs::write(root.join("labels/val/c.txt"), "").unwrap();

        let dataset = Dataset::new(root, &jpg());
        let summaries = dataset.inspect().expect("inspect");

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].split, DatasetSplit::Train);
        assert_eq!(summaries[0].images, 2);
        assert_eq!(summaries[0].labels, 1);
        assert_eq!(summaries[0].unlabeled, vec![root.join("images/train/b.jpg")]);
        assert_eq!(summaries[1].split, DatasetSplit::Val);
        assert!(summaries[1].unlabeled.is_empty());
    }

    #[test]
    fn test_image_files_missing_dir_is_io_error() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let dataset = Dataset::new(temp.path(), &jpg());
        let err = dataset.image_files(DatasetSplit::Test).unwrap_err();
        assert!(matches!(err, SplitError::Io { .. }));
    }
}
