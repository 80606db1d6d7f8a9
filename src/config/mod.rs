mod app_config;

pub use app_config::{SplitterConfig, DEFAULT_MANIFEST_NAME};
