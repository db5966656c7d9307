pub mod error;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use error::ImportError;
pub use models::{ImportRequest, ImportResult, Notice, NoticeKind, Stage};
pub use services::{
    clone_directory, collect_external_files, dedup_external_files, merge_external_files,
    resolve_destination, rewrite_names, run_import, stage_external_renames, ExternalFileRename,
};

use std::path::PathBuf;

// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub request: ImportRequest,
    pub external_dir: Option<PathBuf>,
    pub renames: Vec<ExternalFileRename>,
    pub report_json: Option<PathBuf>,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            request: ImportRequest::new(PathBuf::new(), PathBuf::new()),
            external_dir: None,
            renames: Vec::new(),
            report_json: None,
            log_level: "info".to_string(),
        }
    }
}
