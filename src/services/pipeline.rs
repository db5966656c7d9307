use crate::error::{ImportError, Result};
use crate::models::{ImportRequest, ImportResult};
use crate::services::{clone_directory, merge_external_files, rewrite_names};
use crate::utils::{file_name_str, path_occupied, replace_literal};
use chrono::Utc;
use std::fs;
use std::path::PathBuf;
use tracing::{info, info_span};
use uuid::Uuid;

/// Work out where the clone will land.
///
/// The find/replace is applied to the source folder's own name only; the
/// recursive rewrite of its contents happens later in the pipeline. Fails
/// without touching the filesystem when the request is unusable or the
/// destination is taken.
pub fn resolve_destination(request: &ImportRequest) -> Result<PathBuf> {
    if request.source_folder.as_os_str().is_empty() {
        return Err(ImportError::invalid("source_folder", "must not be empty"));
    }
    if !request.source_folder.is_dir() {
        return Err(ImportError::not_found(&request.source_folder));
    }
    if !request.destination_parent_folder.is_dir() {
        return Err(ImportError::invalid(
            "destination_parent_folder",
            "must be an existing directory",
        ));
    }

    let source_abs = fs::canonicalize(&request.source_folder)
        .map_err(|e| ImportError::io("resolve path", &request.source_folder, e))?;
    let parent_abs = fs::canonicalize(&request.destination_parent_folder)
        .map_err(|e| ImportError::io("resolve path", &request.destination_parent_folder, e))?;
    if parent_abs.starts_with(&source_abs) {
        return Err(ImportError::invalid(
            "destination_parent_folder",
            "must not be inside the source folder",
        ));
    }

    // `.` and `..` only have a name once resolved
    let folder_name = file_name_str(&request.source_folder)
        .or_else(|| file_name_str(&source_abs))
        .ok_or_else(|| {
            ImportError::invalid("source_folder", "must end in a valid UTF-8 folder name")
        })?;

    let destination_name =
        replace_literal(folder_name, &request.find_token, &request.replace_token)
            .unwrap_or_else(|| folder_name.to_string());

    if destination_name.is_empty()
        || destination_name == "."
        || destination_name == ".."
        || destination_name.contains(['/', '\\'])
    {
        return Err(ImportError::invalid(
            "replace_token",
            "must leave a usable destination folder name",
        ));
    }

    let destination = request.destination_parent_folder.join(destination_name);
    if path_occupied(&destination) {
        return Err(ImportError::already_exists(destination));
    }

    Ok(destination)
}

/// Clone, rewrite names, then merge external files.
///
/// Only precondition failures and failures on the destination root are
/// returned as errors. Everything per-file ends up in the result's notices.
/// External files are merged after the rename pass, so they keep the names
/// they were given.
pub fn run_import(request: &ImportRequest) -> Result<ImportResult> {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    let span = info_span!("import", %run_id);
    let _guard = span.enter();

    let destination = resolve_destination(request)?;

    info!(
        "Importing {} as {}",
        request.source_folder.display(),
        destination.display()
    );

    let cloned = clone_directory(&request.source_folder, &destination)?;
    let renamed = rewrite_names(&destination, &request.find_token, &request.replace_token);
    let merged = merge_external_files(&destination, &request.external_files);

    let result = ImportResult::assemble(run_id, destination, started_at, cloned, renamed, merged);

    info!(
        "Import completed. Copied: {}, Renamed: {}, Notices: {}",
        result.files_copied,
        result.files_renamed,
        result.notices.len()
    );

    Ok(result)
}
