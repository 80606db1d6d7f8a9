use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{SplitError, SplitResult};

/// Class manifest file expected at the root of the source pool
pub const CLASS_LIST_FILE: &str = "labels.txt";

/// Read the ordered class list from `source_dir/labels.txt`.
///
/// The file is split on `\n` verbatim, so a trailing newline yields a
/// trailing empty class name. Empty names are reported but kept: the list
/// position is the class index used by the label files.
pub fn read_class_list(source_dir: &Path) -> SplitResult<Vec<String>> {
    let path = source_dir.join(CLASS_LIST_FILE);
    let content = fs::read_to_string(&path).map_err(|e| SplitError::io(&path, e))?;

    let classes: Vec<String> = content.split('\n').map(str::to_string).collect();

    for (index, name) in classes.iter().enumerate() {
        if name.trim().is_empty() {
            warn!(
                "Class {} in {:?} has an empty name (blank line in class list?)",
                index, path
            );
        }
    }

    info!("Read {} classes from {:?}", classes.len(), path);
    Ok(classes)
}
