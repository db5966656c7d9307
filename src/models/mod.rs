pub mod import_request;
pub mod import_result;

pub use import_request::ImportRequest;
pub use import_result::{
    CloneReport, CopiedFile, ImportResult, MergeReport, Notice, NoticeKind, RenameReport,
    RenamedFile, Stage, StageReport,
};
