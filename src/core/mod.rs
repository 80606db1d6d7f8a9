pub mod dataset;
pub mod manifest;
pub mod operations;
pub mod partition;

pub use dataset::*;
pub use manifest::*;
pub use operations::*;
pub use partition::*;
