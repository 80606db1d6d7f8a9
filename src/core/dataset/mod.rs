mod classes;
#[allow(clippy::module_inception)]
mod dataset;
mod ratio;
mod sample;

pub use classes::{read_class_list, CLASS_LIST_FILE};
pub use dataset::{Dataset, DatasetSplit, SplitSummary};
pub use ratio::SplitRatio;
pub use sample::{discover_samples, Sample};
