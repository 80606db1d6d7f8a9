mod file_ops;

pub use file_ops::{
    copy_file, get_label_path_for_image, move_file, transfer_into, FileOpError, FileOpResult,
    TransferMode,
};
