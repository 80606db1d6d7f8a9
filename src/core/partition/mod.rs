mod partitioner;
mod shuffler;

use std::path::Path;

use crate::config::SplitterConfig;
use crate::core::operations::TransferMode;
use crate::error::SplitResult;

pub use partitioner::{PartitionOutcome, Partitioner};
pub use shuffler::{holdout_count, holdout_split, SeededShuffler, Shuffler, DEFAULT_SEED};

/// One-shot partition with the config's seeded shuffler.
///
/// `copy_mode` keeps the source pool; `false` moves files out of it.
pub fn partition(
    config: &SplitterConfig,
    ratio_spec: &str,
    source_dir: &Path,
    output_name: &str,
    copy_mode: bool,
) -> SplitResult<PartitionOutcome> {
    Partitioner::new(config.clone()).partition(
        ratio_spec,
        source_dir,
        output_name,
        TransferMode::from_copy_flag(copy_mode),
    )
}
