use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything one import run needs. Built once by the front end and only
/// read by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRequest {
    pub source_folder: PathBuf,
    pub destination_parent_folder: PathBuf,
    pub find_token: String,
    pub replace_token: String,
    /// Copied flat into the destination root after renaming. Expected to be
    /// deduplicated by the caller.
    pub external_files: Vec<PathBuf>,
}

impl ImportRequest {
    pub fn new(
        source_folder: impl Into<PathBuf>,
        destination_parent_folder: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_folder: source_folder.into(),
            destination_parent_folder: destination_parent_folder.into(),
            find_token: String::new(),
            replace_token: String::new(),
            external_files: Vec::new(),
        }
    }

    /// Request whose clone lands next to the source folder.
    /// A bare relative name resolves against `.`, and a path ending in `.`
    /// or `..` against its own parent.
    pub fn beside_source(source_folder: impl Into<PathBuf>) -> Self {
        let source_folder = source_folder.into();
        let parent = if source_folder.file_name().is_none() {
            source_folder.join("..")
        } else {
            source_folder
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        };
        Self::new(source_folder, parent)
    }

    pub fn with_find_replace(mut self, find: impl Into<String>, replace: impl Into<String>) -> Self {
        self.find_token = find.into();
        self.replace_token = replace.into();
        self
    }

    pub fn with_external_files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.external_files = files.into_iter().map(Into::into).collect();
        self
    }
}
