use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// Pipeline step a record or notice belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Clone,
    Rename,
    Merge,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Clone => "clone",
            Stage::Rename => "rename",
            Stage::Merge => "merge",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// Left alone on purpose, usually because the target was occupied.
    Skipped,
    /// The filesystem refused the operation.
    Failed,
}

/// Non-fatal outcome that the caller should review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub stage: Stage,
    pub kind: NoticeKind,
    pub source: PathBuf,
    pub target: PathBuf,
    pub reason: String,
}

impl Notice {
    pub fn skipped(
        stage: Stage,
        source: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            stage,
            kind: NoticeKind::Skipped,
            source: source.into(),
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Failure notice whose reason carries the whole error chain.
    pub fn failed(
        stage: Stage,
        source: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
        error: &(dyn Error + 'static),
    ) -> Self {
        let mut reason = error.to_string();
        let mut cause = error.source();
        while let Some(inner) = cause {
            reason.push_str(": ");
            reason.push_str(&inner.to_string());
            cause = inner.source();
        }

        Self {
            stage,
            kind: NoticeKind::Failed,
            source: source.into(),
            target: target.into(),
            reason,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.kind == NoticeKind::Failed
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} -> {}: {}",
            self.stage,
            self.source.display(),
            self.target.display(),
            self.reason
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopiedFile {
    pub stage: Stage,
    pub source: PathBuf,
    pub destination: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamedFile {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Records and notices produced by a single pipeline step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageReport<T> {
    pub completed: Vec<T>,
    pub notices: Vec<Notice>,
}

impl<T> StageReport<T> {
    pub fn empty() -> Self {
        Self {
            completed: Vec::new(),
            notices: Vec::new(),
        }
    }

    pub fn skipped_count(&self) -> usize {
        self.notices.iter().filter(|n| !n.is_failure()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.notices.iter().filter(|n| n.is_failure()).count()
    }
}

impl<T> Default for StageReport<T> {
    fn default() -> Self {
        Self::empty()
    }
}

pub type CloneReport = StageReport<CopiedFile>;
pub type RenameReport = StageReport<RenamedFile>;
pub type MergeReport = StageReport<CopiedFile>;

/// Aggregated outcome of one import run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResult {
    pub run_id: Uuid,
    pub destination_folder: PathBuf,
    /// Files cloned from the source plus external files merged in.
    pub files_copied: usize,
    pub files_renamed: usize,
    pub copied_files: Vec<CopiedFile>,
    pub renamed_files: Vec<RenamedFile>,
    pub notices: Vec<Notice>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ImportResult {
    pub(crate) fn assemble(
        run_id: Uuid,
        destination_folder: PathBuf,
        started_at: DateTime<Utc>,
        cloned: CloneReport,
        renamed: RenameReport,
        merged: MergeReport,
    ) -> Self {
        let mut copied_files = cloned.completed;
        copied_files.extend(merged.completed);

        let mut notices = cloned.notices;
        notices.extend(renamed.notices);
        notices.extend(merged.notices);

        Self {
            run_id,
            destination_folder,
            files_copied: copied_files.len(),
            files_renamed: renamed.completed.len(),
            copied_files,
            renamed_files: renamed.completed,
            notices,
            started_at,
            finished_at: Utc::now(),
        }
    }

    pub fn total_processed(&self) -> usize {
        self.files_copied + self.files_renamed + self.notices.len()
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.total_processed();
        if total == 0 {
            0.0
        } else {
            (self.files_copied + self.files_renamed) as f64 / total as f64
        }
    }

    pub fn skipped(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter().filter(|n| !n.is_failure())
    }

    pub fn failures(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter().filter(|n| n.is_failure())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn copied_in_stage(&self, stage: Stage) -> usize {
        self.copied_files.iter().filter(|c| c.stage == stage).count()
    }
}
