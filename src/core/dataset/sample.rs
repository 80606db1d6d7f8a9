use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{SplitError, SplitResult};

use super::dataset::list_files;

/// An image and its YOLO label file, sharing one file stem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub stem: String,
    pub image: PathBuf,
    pub label: PathBuf,
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Discover the flat pool under `source_dir/images` and `source_dir/labels`.
///
/// Image and label counts must match, and every image stem must have
/// exactly one label with the same stem. Samples come back sorted by image
/// path.
pub fn discover_samples(
    source_dir: &Path,
    image_extensions: &[String],
) -> SplitResult<Vec<Sample>> {
    let images_dir = source_dir.join("images");
    let labels_dir = source_dir.join("labels");

    let images = list_files(&images_dir, |ext| {
        image_extensions.iter().any(|allowed| allowed == ext)
    })?;
    let labels = list_files(&labels_dir, |ext| ext == "txt")?;
    info!(
        "Discovered {} images and {} labels in {:?}",
        images.len(),
        labels.len(),
        source_dir
    );

    if images.len() != labels.len() {
        return Err(SplitError::SourceMismatch {
            images: images.len(),
            labels: labels.len(),
            detail: "number of images and labels should be the same".to_string(),
        });
    }

    let mut labels_by_stem: BTreeMap<String, PathBuf> = labels
        .iter()
        .map(|label| (file_stem(label), label.clone()))
        .collect();

    let mut samples = Vec::with_capacity(images.len());
    for image in images.iter() {
        let stem = file_stem(image);
        let label = labels_by_stem
            .remove(&stem)
            .ok_or_else(|| SplitError::SourceMismatch {
                images: images.len(),
                labels: labels.len(),
                detail: format!("no unpaired label for image {:?}", image),
            })?;
        samples.push(Sample {
            stem,
            image: image.clone(),
            label,
        });
    }

    debug!("Paired {} samples", samples.len());
    Ok(samples)
}
