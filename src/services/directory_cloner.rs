use crate::error::{ImportError, Result};
use crate::models::{CloneReport, Notice, Stage};
use crate::services::record_copy;
use crate::utils::{copy_file_safe, path_occupied, FileOutcome};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Recursively copy `source` into `destination`, mirroring the tree.
///
/// Files already present at the destination are skipped, so re-running the
/// clone against a partially populated destination only fills the gaps.
/// Failing to create the destination root or to read the source root is an
/// error; anything deeper becomes a notice and the walk continues.
pub fn clone_directory<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    destination: Q,
) -> Result<CloneReport> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    if !source.is_dir() {
        return Err(ImportError::not_found(source));
    }
    if path_occupied(destination) && !destination.is_dir() {
        return Err(ImportError::already_exists(destination));
    }

    info!(
        "Cloning {} into {}",
        source.display(),
        destination.display()
    );

    let mut report = CloneReport::empty();
    clone_level(source, destination, &mut report)?;

    info!(
        "Clone completed. Copied: {}, Skipped: {}, Errors: {}",
        report.completed.len(),
        report.skipped_count(),
        report.failed_count()
    );

    Ok(report)
}

/// Copy one directory level, then recurse into its subdirectories
fn clone_level(source: &Path, destination: &Path, report: &mut CloneReport) -> Result<()> {
    fs::create_dir_all(destination)
        .map_err(|e| ImportError::io("create directory", destination, e))?;

    let mut entries: Vec<_> = fs::read_dir(source)
        .map_err(|e| ImportError::io("read directory", source, e))?
        .collect::<std::io::Result<_>>()
        .map_err(|e| ImportError::io("read directory", source, e))?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut subdirectories = Vec::new();

    for entry in entries {
        let path = entry.path();
        let target = destination.join(entry.file_name());
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

        if is_dir {
            subdirectories.push((path, target));
        } else if path.is_file() {
            let attempt = copy_file_safe(&path, &target);
            record_copy(report, Stage::Clone, FileOutcome::from_attempt(path, target, attempt));
        } else {
            report.notices.push(Notice::skipped(
                Stage::Clone,
                path,
                target,
                "not a regular file or directory",
            ));
        }
    }

    for (path, target) in subdirectories {
        if let Err(e) = clone_level(&path, &target, report) {
            warn!("Failed to clone directory {}: {}", path.display(), e);
            report
                .notices
                .push(Notice::failed(Stage::Clone, path, target, &e));
        }
    }

    Ok(())
}
