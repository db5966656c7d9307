use crate::models::{MergeReport, Notice, Stage};
use crate::services::record_copy;
use crate::utils::{copy_file_safe, FileOutcome};
use std::path::{Path, PathBuf};
use tracing::info;

/// Copy each external file into the root of `destination` under its base
/// name. Directory structure of the inputs is dropped and nothing already in
/// `destination` is overwritten.
pub fn merge_external_files<P: AsRef<Path>>(destination: P, files: &[PathBuf]) -> MergeReport {
    let destination = destination.as_ref();
    let mut report = MergeReport::empty();

    if files.is_empty() {
        return report;
    }

    info!(
        "Merging {} external files into {}",
        files.len(),
        destination.display()
    );

    for file in files {
        let Some(file_name) = file.file_name() else {
            report.notices.push(Notice::skipped(
                Stage::Merge,
                file,
                destination,
                "path has no file name",
            ));
            continue;
        };

        let target = destination.join(file_name);
        let attempt = copy_file_safe(file, &target);
        record_copy(
            &mut report,
            Stage::Merge,
            FileOutcome::from_attempt(file.clone(), target, attempt),
        );
    }

    info!(
        "Merge completed. Copied: {}, Skipped: {}, Errors: {}",
        report.completed.len(),
        report.skipped_count(),
        report.failed_count()
    );

    report
}
