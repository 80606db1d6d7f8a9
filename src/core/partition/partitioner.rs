//! Seeded train/val(/test) partitioning of a flat image/label pool.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::SplitterConfig;
use crate::core::dataset::{discover_samples, read_class_list, DatasetSplit, Sample, SplitRatio};
use crate::core::operations::{transfer_into, TransferMode};
use crate::error::{SplitError, SplitResult};

use super::shuffler::{holdout_split, SeededShuffler, Shuffler};

/// What a partition run produced
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionOutcome {
    /// Root of the written dataset tree
    pub output_path: PathBuf,
    /// Split names in train/val/test order
    pub splits: Vec<DatasetSplit>,
    /// Class names from the source `labels.txt`, index = class id
    pub classes: Vec<String>,
    /// Samples transferred into each split
    pub counts: BTreeMap<DatasetSplit, usize>,
}

impl PartitionOutcome {
    pub fn count(&self, split: DatasetSplit) -> usize {
        self.counts.get(&split).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

pub struct Partitioner<S: Shuffler = SeededShuffler> {
    config: SplitterConfig,
    shuffler: S,
}

impl Partitioner<SeededShuffler> {
    /// Partitioner using a `StdRng` seeded from `config.seed`
    pub fn new(config: SplitterConfig) -> Self {
        let shuffler = SeededShuffler::new(config.seed);
        Self { config, shuffler }
    }
}

impl<S: Shuffler> Partitioner<S> {
    pub fn with_shuffler(config: SplitterConfig, shuffler: S) -> Self {
        Self { config, shuffler }
    }

    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// Split the pool under `source_dir` into `<output_root>/<output_name>`.
    ///
    /// The output directory is wiped first. Nothing is rolled back if a
    /// transfer fails halfway.
    pub fn partition(
        &mut self,
        ratio_spec: &str,
        source_dir: &Path,
        output_name: &str,
        mode: TransferMode,
    ) -> SplitResult<PartitionOutcome> {
        let ratio = SplitRatio::parse(ratio_spec)?;
        let source_dir = self.config.resolve_source(source_dir);
        info!(
            "Splitting {:?} with ratio {} ({})",
            source_dir,
            ratio,
            mode.as_str()
        );

        let samples = discover_samples(&source_dir, &self.config.image_extensions)?;
        if samples.is_empty() {
            warn!("Source pool {:?} is empty, all splits will be empty", source_dir);
        }

        let output_path = resolve_output_path(&self.config.output_root(), output_name)?;
        ensure_disjoint_from_source(&output_path, &source_dir)?;
        reset_output_dir(&output_path)?;
        create_split_dirs(&output_path, ratio.splits())?;

        let mut counts = BTreeMap::new();

        let rest = match ratio.test {
            Some(test) => {
                let (rest, test_samples) =
                    holdout_split(samples, test as u64, ratio.total(), &mut self.shuffler);
                let moved =
                    transfer_samples(&test_samples, &output_path, DatasetSplit::Test, mode)?;
                counts.insert(DatasetSplit::Test, moved);
                rest
            }
            None => samples,
        };

        let (train_samples, val_samples) = holdout_split(
            rest,
            ratio.val as u64,
            ratio.train_val_total(),
            &mut self.shuffler,
        );
        let moved = transfer_samples(&val_samples, &output_path, DatasetSplit::Val, mode)?;
        counts.insert(DatasetSplit::Val, moved);
        let moved = transfer_samples(&train_samples, &output_path, DatasetSplit::Train, mode)?;
        counts.insert(DatasetSplit::Train, moved);

        let classes = read_class_list(&source_dir)?;

        info!(
            "Split complete: train={} val={} test={}",
            counts.get(&DatasetSplit::Train).copied().unwrap_or(0),
            counts.get(&DatasetSplit::Val).copied().unwrap_or(0),
            counts.get(&DatasetSplit::Test).copied().unwrap_or(0)
        );

        Ok(PartitionOutcome {
            output_path,
            splits: ratio.splits().to_vec(),
            classes,
            counts,
        })
    }
}

/// `output_root/output_name`, where the name must be one plain path segment
fn resolve_output_path(output_root: &Path, output_name: &str) -> SplitResult<PathBuf> {
    let mut components = Path::new(output_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(output_root.join(output_name)),
        _ => Err(SplitError::InvalidOutput {
            path: output_root.join(output_name),
            reason: format!("output name {:?} must be a single directory name", output_name),
        }),
    }
}

/// The output tree is wiped before writing, so it must not hold the source pool
fn ensure_disjoint_from_source(output_path: &Path, source_dir: &Path) -> SplitResult<()> {
    let source = source_dir
        .canonicalize()
        .map_err(|e| SplitError::io(source_dir, e))?;
    // Only an existing output can already contain the source
    let output = match output_path.canonicalize() {
        Ok(path) => path,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(SplitError::io(output_path, e)),
    };

    if source.starts_with(&output) {
        return Err(SplitError::InvalidOutput {
            path: output_path.to_path_buf(),
            reason: format!("it contains the source pool {:?}", source_dir),
        });
    }
    Ok(())
}

/// Create the output root if needed, then drop whatever it contains
fn reset_output_dir(output_path: &Path) -> SplitResult<()> {
    fs::create_dir_all(output_path).map_err(|e| SplitError::io(output_path, e))?;
    fs::remove_dir_all(output_path).map_err(|e| SplitError::io(output_path, e))?;
    debug!("Reset output directory {:?}", output_path);
    Ok(())
}

/// Create `images/<split>` and `labels/<split>`; an existing split directory
/// means the reset did not take.
fn create_split_dirs(output_path: &Path, splits: &[DatasetSplit]) -> SplitResult<()> {
    for kind in ["images", "labels"] {
        let parent = output_path.join(kind);
        fs::create_dir_all(&parent).map_err(|e| SplitError::io(&parent, e))?;

        for split in splits {
            let dir = parent.join(split.as_str());
            match fs::create_dir(&dir) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    return Err(SplitError::DirectoryConflict(dir));
                }
                Err(e) => return Err(SplitError::io(&dir, e)),
            }
        }
    }
    Ok(())
}

fn transfer_samples(
    samples: &[Sample],
    output_path: &Path,
    split: DatasetSplit,
    mode: TransferMode,
) -> SplitResult<usize> {
    let images_dir = output_path.join(split.images_rel());
    let labels_dir = output_path.join(split.labels_rel());

    for sample in samples {
        transfer_into(&sample.image, &images_dir, mode)?;
        transfer_into(&sample.label, &labels_dir, mode)?;
    }

    debug!("Transferred {} samples into {:?}", samples.len(), split);
    Ok(samples.len())
}
