use crate::error::{ImportError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Whether anything (file, directory, dangling link) occupies `path`
pub fn path_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Copy file from source to destination without ever overwriting.
/// Returns `Ok(false)` when the destination is already taken.
pub fn copy_file_safe<P: AsRef<Path>, Q: AsRef<Path>>(source: P, destination: Q) -> Result<bool> {
    let src_path = source.as_ref();
    let dest_path = destination.as_ref();

    if !src_path.is_file() {
        return Err(ImportError::not_found(src_path));
    }

    if path_occupied(dest_path) {
        return Ok(false);
    }

    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent).map_err(|e| ImportError::io("create directory", parent, e))?;
    }

    fs::copy(src_path, dest_path).map_err(|e| ImportError::io("copy file to", dest_path, e))?;

    Ok(true)
}

/// Move a file, refusing to replace an existing target.
/// Missing parent directories of the target are created. A rename across
/// filesystems falls back to copy then delete.
pub fn rename_file_safe<P: AsRef<Path>, Q: AsRef<Path>>(from: P, to: Q) -> Result<bool> {
    let from = from.as_ref();
    let to = to.as_ref();

    if path_occupied(to) {
        return Ok(false);
    }

    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| ImportError::io("create directory", parent, e))?;
    }

    match fs::rename(from, to) {
        Ok(()) => Ok(true),
        Err(e) if is_cross_device(&e) => {
            fs::copy(from, to).map_err(|e| ImportError::io("copy file to", to, e))?;
            fs::remove_file(from).map_err(|e| ImportError::io("remove file", from, e))?;
            Ok(true)
        }
        Err(e) => Err(ImportError::io("rename file", from, e)),
    }
}

#[cfg(unix)]
fn is_cross_device(error: &io::Error) -> bool {
    // EXDEV
    error.raw_os_error() == Some(18)
}

#[cfg(windows)]
fn is_cross_device(error: &io::Error) -> bool {
    // ERROR_NOT_SAME_DEVICE
    error.raw_os_error() == Some(17)
}

#[cfg(not(any(unix, windows)))]
fn is_cross_device(_error: &io::Error) -> bool {
    false
}

/// Snapshot every file below `root`, sorted by path.
/// Entries that cannot be read are returned separately so the caller can
/// report them without losing the rest of the listing.
pub fn list_files_recursive<P: AsRef<Path>>(root: P) -> (Vec<PathBuf>, Vec<ImportError>) {
    let root = root.as_ref();
    let mut files = Vec::new();
    let mut errors = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
            Ok(entry) if entry.path_is_symlink() && entry.path().is_file() => {
                files.push(entry.into_path())
            }
            Ok(_) => {}
            Err(e) => {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                errors.push(ImportError::io("read directory", path, io::Error::from(e)));
            }
        }
    }

    files.sort();
    (files, errors)
}

/// Literal replace of every occurrence of `find`.
/// `None` when `find` is empty or does not occur.
pub fn replace_literal(text: &str, find: &str, replace: &str) -> Option<String> {
    if find.is_empty() || !text.contains(find) {
        return None;
    }
    Some(text.replace(find, replace))
}

/// Final path component as UTF-8, if there is one
pub fn file_name_str(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}

/// Outcome of a single file operation
#[derive(Debug)]
pub enum FileOutcome {
    Success {
        source: PathBuf,
        destination: PathBuf,
    },
    Skipped {
        source: PathBuf,
        destination: PathBuf,
        reason: String,
    },
    Error {
        source: PathBuf,
        destination: PathBuf,
        error: ImportError,
    },
}

impl FileOutcome {
    /// Classify the result of [`copy_file_safe`] or [`rename_file_safe`].
    pub fn from_attempt(source: PathBuf, destination: PathBuf, attempt: Result<bool>) -> Self {
        match attempt {
            Ok(true) => FileOutcome::Success {
                source,
                destination,
            },
            Ok(false) => FileOutcome::Skipped {
                source,
                destination,
                reason: "target already exists".to_string(),
            },
            Err(error) => FileOutcome::Error {
                source,
                destination,
                error,
            },
        }
    }
}
