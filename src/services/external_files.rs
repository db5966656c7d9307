//! Caller-side helpers that build the external file list before an import.
//!
//! Nothing here runs inside the pipeline. A front end uses these to turn a
//! picked folder and any user-chosen names into the flat, deduplicated list
//! an [`crate::models::ImportRequest`] expects.

use crate::error::{ImportError, Result};
use crate::utils::{copy_file_safe, list_files_recursive};
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

/// Every regular file below `folder`, recursively, sorted by path.
/// Unreadable entries are logged and left out.
pub fn collect_external_files<P: AsRef<Path>>(folder: P) -> Result<Vec<PathBuf>> {
    let folder = folder.as_ref();
    if !folder.is_dir() {
        return Err(ImportError::not_found(folder));
    }

    let (files, errors) = list_files_recursive(folder);
    for e in &errors {
        warn!("Skipping unreadable entry under {}: {}", folder.display(), e);
    }

    info!("Found {} external files in {}", files.len(), folder.display());
    Ok(files)
}

/// Drop repeated paths, keeping the first occurrence and the original order.
pub fn dedup_external_files(files: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    files
        .into_iter()
        .filter(|file| seen.insert(file.clone()))
        .collect()
}

/// Import an external file under a different base name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalFileRename {
    pub from: PathBuf,
    pub to_name: String,
}

impl ExternalFileRename {
    pub fn new(from: impl Into<PathBuf>, to_name: impl Into<String>) -> Result<Self> {
        let to_name = to_name.into();
        if !is_plain_file_name(&to_name) {
            return Err(ImportError::invalid(
                "to_name",
                "must be a single file name without separators",
            ));
        }
        Ok(Self {
            from: from.into(),
            to_name,
        })
    }
}

/// Parses `FILE=NAME`. The split happens at the last `=`, so file paths
/// may contain `=` but new names may not.
impl FromStr for ExternalFileRename {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self> {
        let (from, to_name) = s
            .rsplit_once('=')
            .ok_or_else(|| ImportError::invalid("rename", "expected FILE=NAME"))?;
        if from.is_empty() {
            return Err(ImportError::invalid("rename", "expected FILE=NAME"));
        }
        Self::new(from, to_name)
    }
}

fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

/// Apply user-chosen names to the external file list.
///
/// Each renamed file is copied into `staging_dir` under its new name and its
/// entry in the list is replaced by the staged copy, keeping its position.
/// Renames for files that are not in the list are appended at the end. The
/// original files are never modified.
pub fn stage_external_renames<P: AsRef<Path>>(
    files: &[PathBuf],
    renames: &[ExternalFileRename],
    staging_dir: P,
) -> Result<Vec<PathBuf>> {
    let staging_dir = staging_dir.as_ref();
    if renames.is_empty() {
        return Ok(files.to_vec());
    }

    fs::create_dir_all(staging_dir)
        .map_err(|e| ImportError::io("create directory", staging_dir, e))?;

    let mut staged = Vec::with_capacity(files.len() + renames.len());
    let mut used = vec![false; renames.len()];
    let rename_keys: Vec<PathBuf> = renames.iter().map(|r| comparable_path(&r.from)).collect();

    for file in files {
        let key = comparable_path(file);
        match rename_keys.iter().position(|k| k == &key) {
            Some(index) => {
                used[index] = true;
                staged.push(stage_one(&renames[index], staging_dir)?);
            }
            None => staged.push(file.clone()),
        }
    }

    for (rename, _) in renames.iter().zip(used).filter(|(_, used)| !used) {
        staged.push(stage_one(rename, staging_dir)?);
    }

    Ok(staged)
}

/// Resolved form of `path` for matching, so `ext/a.wav` and `/abs/ext/a.wav`
/// name the same file. Falls back to the path as given when it cannot be
/// resolved.
fn comparable_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn stage_one(rename: &ExternalFileRename, staging_dir: &Path) -> Result<PathBuf> {
    let target = staging_dir.join(&rename.to_name);
    if !copy_file_safe(&rename.from, &target)? {
        return Err(ImportError::already_exists(target));
    }
    info!(
        "Staged {} as {}",
        rename.from.display(),
        rename.to_name
    );
    Ok(target)
}
