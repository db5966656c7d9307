pub mod file_operations;

pub use file_operations::{
    copy_file_safe, file_name_str, list_files_recursive, path_occupied, rename_file_safe,
    replace_literal, FileOutcome,
};
