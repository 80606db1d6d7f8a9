//! Split a flat YOLO image/label pool into train/val(/test) folders and
//! describe the result in a `dataset.yaml` manifest for the training driver.

pub mod config;
pub mod core;
pub mod error;
pub mod logging;

pub use config::SplitterConfig;
pub use crate::core::{
    partition, write_manifest, DatasetManifest, DatasetSplit, PartitionOutcome, Partitioner,
    SplitRatio, TransferMode,
};
pub use error::{SplitError, SplitResult};
