use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, warn};

/// Result type for file operations
pub type FileOpResult<T> = Result<T, FileOpError>;

/// Error types for file operations
#[derive(Debug, Error)]
pub enum FileOpError {
    #[error("Copy failed from {src:?} to {dest:?}: {source}")]
    CopyFailed {
        src: PathBuf,
        dest: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Remove failed for {path:?}: {source}")]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Path has no file name: {0:?}")]
    NoFileName(PathBuf),
}

/// How sample files reach the output tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    /// Duplicate files, the source pool is left untouched
    Copy,
    /// Relocate files, the source pool is drained
    Move,
}

impl TransferMode {
    pub fn from_copy_flag(copy: bool) -> Self {
        if copy {
            TransferMode::Copy
        } else {
            TransferMode::Move
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TransferMode::Copy => "copy",
            TransferMode::Move => "move",
        }
    }
}

/// Copy or move `src` into `dest_dir`, keeping its file name.
///
/// # Returns
/// * `Ok(PathBuf)` with the new location of the file
/// * `Err(FileOpError)` if the transfer failed
pub fn transfer_into(src: &Path, dest_dir: &Path, mode: TransferMode) -> FileOpResult<PathBuf> {
    let file_name = src
        .file_name()
        .ok_or_else(|| FileOpError::NoFileName(src.to_path_buf()))?;
    let dest = dest_dir.join(file_name);

    match mode {
        TransferMode::Copy => copy_file(src, &dest)?,
        TransferMode::Move => move_file(src, &dest)?,
    }

    Ok(dest)
}

pub fn copy_file(src: &Path, dest: &Path) -> FileOpResult<()> {
    debug!("Copying file from {:?} to {:?}", src, dest);
    fs::copy(src, dest).map_err(|e| {
        error!("Failed to copy file from {:?} to {:?}: {}", src, dest, e);
        FileOpError::CopyFailed {
            src: src.to_path_buf(),
            dest: dest.to_path_buf(),
            source: e,
        }
    })?;
    Ok(())
}

/// Move a file from source to destination.
///
/// Tries a plain rename first and falls back to copy + remove when the
/// rename is refused (e.g. source and destination on different drives).
///
/// # Returns
/// * `Ok(())` if successful
/// * `Err(FileOpError)` if copy or remove failed
pub fn move_file(src: &Path, dest: &Path) -> FileOpResult<()> {
    debug!("Moving file from {:?} to {:?}", src, dest);

    match fs::rename(src, dest) {
        Ok(()) => return Ok(()),
        Err(e) => {
            warn!(
                "Rename from {:?} to {:?} failed ({}), falling back to copy + remove",
                src, dest, e
            );
        }
    }

    copy_file(src, dest)?;

    // Remove the original file after successful copy
    if let Err(e) = fs::remove_file(src) {
        error!("Failed to remove original file {:?} after copy: {}", src, e);
        // Try to clean up the destination file
        let _ = fs::remove_file(dest);
        return Err(FileOpError::RemoveFailed {
            path: src.to_path_buf(),
            source: e,
        });
    }

    Ok(())
}

/// Get the corresponding label file path for an image file path.
///
/// The last `images` directory component is swapped for `labels` and the
/// extension becomes `.txt`, so `out/images/train/a.jpg` maps to
/// `out/labels/train/a.txt`.
///
/// # Returns
/// * `Some(PathBuf)` if the path contains an `images` component
/// * `None` otherwise
pub fn get_label_path_for_image(image_path: &Path) -> Option<PathBuf> {
    let components: Vec<Component> = image_path.components().collect();
    let images_idx = components
        .iter()
        .rposition(|c| c.as_os_str() == OsStr::new("images"))?;

    let mut label_path = PathBuf::new();
    for (idx, component) in components.iter().enumerate() {
        if idx == images_idx {
            label_path.push("labels");
        } else {
            label_path.push(component.as_os_str());
        }
    }

    Some(label_path.with_extension("txt"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_path_for_image() {
        let label = get_label_path_for_image(Path::new("out/images/train/frame_01.jpg"));
        assert_eq!(label, Some(PathBuf::from("out/labels/train/frame_01.txt")));
    }

    #[test]
    fn test_label_path_requires_images_component() {
        assert!(get_label_path_for_image(Path::new("out/pictures/a.jpg")).is_none());
    }

    #[test]
    fn test_copy_keeps_source() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let src = temp.path().join("a.txt");
        let dest_dir = temp.path().join("dest");
        fs::create_dir(&dest_dir).expect("create dest dir");
        fs::write(&src, "0 0.5 0.5 0.1 0.1\n").expect("write source");

        let dest = transfer_into(&src, &dest_dir, TransferMode::Copy).expect("copy");

        assert!(src.exists());
        assert_eq!(dest, dest_dir.join("a.txt"));
        assert_eq!(fs::read_to_string(dest).unwrap(), "0 0.5 0.5 0.1 0.1\n");
    }

    #[test]
    fn test_move_removes_source() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let src = temp.path().join("a.jpg");
        let dest_dir = temp.path().join("dest");
        fs::create_dir(&dest_dir).expect("create dest dir");
        fs::write(&src, b"jpeg").expect("write source");

        let dest = transfer_into(&src, &dest_dir, TransferMode::Move).expect("move");

        assert!(!src.exists());
        assert_eq!(fs::read(dest).unwrap(), b"jpeg");
    }

    #[test]
    fn test_copy_missing_source_fails() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let err = transfer_into(&temp.path().join("missing.jpg"), temp.path(), TransferMode::Copy)
            .unwrap_err();
        assert!(matches!(err, FileOpError::CopyFailed { .. }));
    }

    #[test]
    fn test_transfer_mode_from_flag() {
        assert_eq!(TransferMode::from_copy_flag(true), TransferMode::Copy);
        assert_eq!(TransferMode::from_copy_flag(false).as_str(), "move");
    }
}
