use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use folder_importer::{
    collect_external_files, dedup_external_files, run_import, stage_external_renames, AppConfig,
    ExternalFileRename, ImportRequest, ImportResult,
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const LOG_LEVEL_VAR: &str = "FOLDER_IMPORTER_LOG_LEVEL";
const REPORT_JSON_VAR: &str = "FOLDER_IMPORTER_REPORT_JSON";

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    // Load .env before reading configuration so it can supply defaults
    let env_file_loaded = load_environment_variables();

    let config = create_app_config(&matches)?;

    initialize_logging(&config.log_level)?;

    if !env_file_loaded {
        info!("No .env file found, using system environment variables");
    }

    run_application(config).await
}

fn build_cli() -> Command {
    Command::new("Folder Importer")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Clone a folder under a new name, rename its files and merge in external files")
        .arg(
            Arg::new("source")
                .long("source")
                .value_name("DIR")
                .help("Folder to clone")
                .required(true),
        )
        .arg(
            Arg::new("destination-parent")
                .long("destination-parent")
                .value_name("DIR")
                .help("Folder that receives the clone (defaults to the source's parent)"),
        )
        .arg(
            Arg::new("find")
                .long("find")
                .value_name("TEXT")
                .help("Literal text to replace in the folder name and every file path")
                .default_value(""),
        )
        .arg(
            Arg::new("replace")
                .long("replace")
                .value_name("TEXT")
                .help("Replacement text")
                .default_value(""),
        )
        .arg(
            Arg::new("external")
                .long("external")
                .value_name("FILE")
                .help("External file to copy into the clone's root (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("external-dir")
                .long("external-dir")
                .value_name("DIR")
                .help("Add every file below this folder to the external files"),
        )
        .arg(
            Arg::new("rename-external")
                .long("rename-external")
                .value_name("FILE=NAME")
                .help("Import an external file under a different name (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("report-json")
                .long("report-json")
                .value_name("FILE")
                .help("Write the import result as JSON"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Set the log level (trace, debug, info, warn, error)"),
        )
}

/// Build application configuration from CLI arguments, falling back to
/// environment variables for the ambient settings
fn create_app_config(matches: &ArgMatches) -> Result<AppConfig> {
    let defaults = AppConfig::default();

    let source = matches
        .get_one::<String>("source")
        .map(PathBuf::from)
        .context("--source is required")?;

    let mut request = match matches.get_one::<String>("destination-parent") {
        Some(parent) => ImportRequest::new(source, parent),
        None => ImportRequest::beside_source(source),
    };

    let find = matches.get_one::<String>("find").cloned().unwrap_or_default();
    let replace = matches
        .get_one::<String>("replace")
        .cloned()
        .unwrap_or_default();
    request = request.with_find_replace(find, replace);

    if let Some(files) = matches.get_many::<String>("external") {
        request = request.with_external_files(files);
    }

    let renames = matches
        .get_many::<String>("rename-external")
        .into_iter()
        .flatten()
        .map(|raw| {
            raw.parse::<ExternalFileRename>()
                .with_context(|| format!("Invalid --rename-external value: {}", raw))
        })
        .collect::<Result<Vec<_>>>()?;

    let report_json = matches
        .get_one::<String>("report-json")
        .cloned()
        .or_else(|| non_empty_env(REPORT_JSON_VAR))
        .map(PathBuf::from);

    let log_level = matches
        .get_one::<String>("log-level")
        .cloned()
        .or_else(|| non_empty_env(LOG_LEVEL_VAR))
        .unwrap_or(defaults.log_level);

    Ok(AppConfig {
        request,
        external_dir: matches.get_one::<String>("external-dir").map(PathBuf::from),
        renames,
        report_json,
        log_level,
    })
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

/// Initialize structured logging with tracing
fn initialize_logging(log_level: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load a .env file if one exists. Nothing is required from it.
fn load_environment_variables() -> bool {
    dotenvy::dotenv().is_ok()
}

async fn run_application(config: AppConfig) -> Result<()> {
    info!("Starting Folder Importer");
    info!("Configuration: {:#?}", config);

    let AppConfig {
        request,
        external_dir,
        renames,
        report_json,
        ..
    } = config;

    let mut external_files = request.external_files.clone();
    if let Some(dir) = &external_dir {
        let collected = collect_external_files(dir)
            .with_context(|| format!("Failed to collect external files from {}", dir.display()))?;
        external_files.extend(collected);
    }
    let external_files = dedup_external_files(external_files);

    let staging_dir = (!renames.is_empty())
        .then(|| env::temp_dir().join(format!("folder-importer-staging-{}", Uuid::new_v4())));

    let outcome = import_with_staging(request, external_files, &renames, staging_dir.as_deref()).await;

    if let Some(dir) = &staging_dir {
        if let Err(e) = fs::remove_dir_all(dir) {
            warn!("Failed to remove staging directory {}: {}", dir.display(), e);
        }
    }

    let result = outcome?;
    print_import_report(&result);

    if let Some(path) = &report_json {
        write_json_report(&result, path)?;
        info!("Report written to {}", path.display());
    }

    info!("Application completed successfully");
    Ok(())
}

async fn import_with_staging(
    request: ImportRequest,
    external_files: Vec<PathBuf>,
    renames: &[ExternalFileRename],
    staging_dir: Option<&Path>,
) -> Result<ImportResult> {
    let external_files = match staging_dir {
        Some(dir) => stage_external_renames(&external_files, renames, dir)
            .context("Failed to stage renamed external files")?,
        None => external_files,
    };
    let request = request.with_external_files(external_files);

    let result = tokio::task::spawn_blocking(move || run_import(&request))
        .await
        .context("Import task join error")?
        .context("Import failed")?;

    Ok(result)
}

fn write_json_report(result: &ImportResult, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(result).context("Failed to serialize report")?;
    fs::write(path, json).with_context(|| format!("Failed to write report to {}", path.display()))
}

fn print_import_report(result: &ImportResult) {
    info!("=== IMPORT REPORT ===");
    info!("Run id: {}", result.run_id);
    info!("Destination: {}", result.destination_folder.display());
    info!("Files copied: {}", result.files_copied);
    info!("Files renamed: {}", result.files_renamed);
    info!("Skipped: {}", result.skipped().count());
    info!("Errors: {}", result.failures().count());
    info!("Success rate: {:.2}%", result.success_rate() * 100.0);
    info!(
        "Elapsed: {} ms",
        (result.finished_at - result.started_at).num_milliseconds()
    );

    for notice in result.skipped() {
        info!("  skipped {}", notice);
    }

    if result.has_failures() {
        error!("Errors encountered:");
        for notice in result.failures() {
            error!("  {}", notice);
        }
    }
}
