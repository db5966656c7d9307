use crate::models::{Notice, RenameReport, RenamedFile, Stage};
use crate::utils::{list_files_recursive, rename_file_safe, replace_literal, FileOutcome};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Literal find/replace over the path of every file below `root`.
///
/// The replacement applies to the whole path relative to `root`, so a token
/// that appears in a nested directory name moves the file into a rewritten
/// directory as well. `root` itself and its ancestors are never touched.
///
/// The file list is captured before the first rename, so earlier renames
/// never influence which files are considered later in the same pass.
/// An empty `find` leaves the tree untouched.
pub fn rewrite_names<P: AsRef<Path>>(root: P, find: &str, replace: &str) -> RenameReport {
    let root = root.as_ref();
    let mut report = RenameReport::empty();

    if find.is_empty() {
        debug!("Empty find token, skipping rename pass");
        return report;
    }

    let (files, listing_errors) = list_files_recursive(root);
    for e in listing_errors {
        warn!("Failed to list {}: {}", root.display(), e);
        report
            .notices
            .push(Notice::failed(Stage::Rename, root, root, &e));
    }

    info!(
        "Rewriting '{}' -> '{}' across {} files in {}",
        find,
        replace,
        files.len(),
        root.display()
    );

    for file in files {
        let Some(relative) = file.strip_prefix(root).ok().map(Path::to_path_buf) else {
            continue;
        };
        let Some(relative_str) = relative.to_str() else {
            report.notices.push(Notice::skipped(
                Stage::Rename,
                &file,
                &file,
                "path is not valid UTF-8",
            ));
            continue;
        };
        let Some(rewritten) = replace_literal(relative_str, find, replace) else {
            continue;
        };

        let rewritten = PathBuf::from(rewritten);
        if !stays_below_root(&rewritten) {
            report.notices.push(Notice::skipped(
                Stage::Rename,
                &file,
                root.join(&rewritten),
                "rewritten path leaves the destination folder",
            ));
            continue;
        }

        let target = root.join(rewritten);
        if target == file {
            continue;
        }

        let attempt = rename_file_safe(&file, &target);
        match FileOutcome::from_attempt(file, target, attempt) {
            FileOutcome::Success {
                source,
                destination,
            } => report.completed.push(RenamedFile {
                from: source,
                to: destination,
            }),
            FileOutcome::Skipped {
                source,
                destination,
                reason,
            } => {
                debug!(
                    "Skipped renaming {} to {}: {}",
                    source.display(),
                    destination.display(),
                    reason
                );
                report
                    .notices
                    .push(Notice::skipped(Stage::Rename, source, destination, reason));
            }
            FileOutcome::Error {
                source,
                destination,
                error: e,
            } => {
                error!(
                    "Failed to rename {} to {}: {}",
                    source.display(),
                    destination.display(),
                    e
                );
                report
                    .notices
                    .push(Notice::failed(Stage::Rename, source, destination, &e));
            }
        }
    }

    info!(
        "Rename completed. Renamed: {}, Skipped: {}, Errors: {}",
        report.completed.len(),
        report.skipped_count(),
        report.failed_count()
    );

    report
}

/// A rewritten relative path must still name something inside the root
fn stays_below_root(relative: &Path) -> bool {
    let mut has_name = false;
    for component in relative.components() {
        match component {
            Component::Normal(_) => has_name = true,
            Component::CurDir => {}
            _ => return false,
        }
    }
    has_name
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_empty_find_is_noop() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a_old.txt"), "").unwrap();

        let report = rewrite_names(dir.path(), "", "new");

        assert!(report.completed.is_empty());
        assert!(report.notices.is_empty());
        assert!(dir.path().join("a_old.txt").exists());
    }

    #[test]
    fn test_overlapping_names_both_survive() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a_old.txt"), "one").unwrap();
        fs::write(dir.path().join("a_old_2.txt"), "two").unwrap();

        let report = rewrite_names(dir.path(), "old", "new");

        assert_eq!(report.completed.len(), 2);
        assert_eq!(
            fs::read_to_string(dir.path().join("a_new.txt")).unwrap(),
            "one"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("a_new_2.txt")).unwrap(),
            "two"
        );
        assert!(!dir.path().join("a_old.txt").exists());
        assert!(!dir.path().join("a_old_2.txt").exists());
    }

    #[test]
    fn test_replaces_every_occurrence() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("old_old.txt"), "").unwrap();

        rewrite_names(dir.path(), "old", "new");

        assert!(dir.path().join("new_new.txt").exists());
    }

    #[test]
    fn test_existing_target_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a_old.txt"), "old").unwrap();
        fs::write(dir.path().join("a_new.txt"), "new").unwrap();

        let report = rewrite_names(dir.path(), "old", "new");

        assert!(report.completed.is_empty());
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("a_new.txt")).unwrap(),
            "new"
        );
        assert!(dir.path().join("a_old.txt").exists());
    }

    #[test]
    fn test_nested_directory_names_are_rewritten() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("old_dir")).unwrap();
        fs::write(dir.path().join("old_dir/keep.txt"), "k").unwrap();

        let report = rewrite_names(dir.path(), "old", "new");

        assert_eq!(report.completed.len(), 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("new_dir/keep.txt")).unwrap(),
            "k"
        );
    }

    #[test]
    fn test_root_ancestors_are_untouched() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("old_root");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("plain.txt"), "").unwrap();

        let report = rewrite_names(&root, "old", "new");

        assert!(report.completed.is_empty());
        assert!(root.join("plain.txt").exists());
        assert!(!dir.path().join("new_root").exists());
    }

    #[test]
    fn test_rewrite_cannot_escape_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("root");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("old.txt"), "").unwrap();

        let report = rewrite_names(&root, "old", "../escaped");

        assert!(report.completed.is_empty());
        assert_eq!(report.skipped_count(), 1);
        assert!(root.join("old.txt").exists());
        assert!(!dir.path().join("escaped.txt").exists());
    }

    #[test]
    fn test_failed_rename_does_not_stop_pass() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("old")).unwrap();
        fs::write(dir.path().join("x"), "blocker").unwrap();
        fs::write(dir.path().join("old/y"), "y").unwrap();
        fs::write(dir.path().join("z_old"), "z").unwrap();

        // old/y -> x/y needs a directory where the file `x` sits
        let report = rewrite_names(dir.path(), "old", "x");

        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.notices[0].source, dir.path().join("old/y"));
        assert_eq!(report.completed.len(), 1);
        assert!(dir.path().join("z_x").is_file());
        assert!(dir.path().join("old/y").is_file());
        assert_eq!(fs::read_to_string(dir.path().join("x")).unwrap(), "blocker");
    }
}
