pub mod directory_cloner;
pub mod external_files;
pub mod file_merger;
pub mod name_rewriter;
pub mod pipeline;

pub use directory_cloner::clone_directory;
pub use external_files::{
    collect_external_files, dedup_external_files, stage_external_renames, ExternalFileRename,
};
pub use file_merger::merge_external_files;
pub use name_rewriter::rewrite_names;
pub use pipeline::{resolve_destination, run_import};

use crate::models::{CopiedFile, Notice, Stage, StageReport};
use crate::utils::FileOutcome;
use tracing::{debug, error};

/// Fold one copy outcome into a stage report
pub(crate) fn record_copy(
    report: &mut StageReport<CopiedFile>,
    stage: Stage,
    outcome: FileOutcome,
) {
    match outcome {
        FileOutcome::Success {
            source,
            destination,
        } => {
            report.completed.push(CopiedFile {
                stage,
                source,
                destination,
            });
        }
        FileOutcome::Skipped {
            source,
            destination,
            reason,
        } => {
            debug!(
                "Skipped copying {} to {}: {}",
                source.display(),
                destination.display(),
                reason
            );
            report
                .notices
                .push(Notice::skipped(stage, source, destination, reason));
        }
        FileOutcome::Error {
            source,
            destination,
            error: e,
        } => {
            error!(
                "Failed to copy {} to {}: {}",
                source.display(),
                destination.display(),
                e
            );
            report
                .notices
                .push(Notice::failed(stage, source, destination, &e));
        }
    }
}
