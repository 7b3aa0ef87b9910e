//! Command implementations for the claimdiff CLI

use crate::cli::{Commands, OutputFormat};
use crate::data;
use crate::diff;
use crate::error::{ClaimdiffError, Result};
use crate::ingest::{self, IngestOutcome};
use crate::metrics;
use crate::output::{JsonFormatter, PrettyPrinter};
use crate::progress::ProgressReporter;
use crate::resolver::{self, VersionRef};
use crate::store::SnapshotStore;
use crate::workspace::{ClaimdiffWorkspace, FileBlobStore};
use chrono::Local;
use std::io::Read as _;
use std::path::Path;

/// Execute a command
pub fn execute_command(command: Commands, workspace_path: Option<&Path>) -> Result<()> {
    match command {
        Commands::Init { force } => init_command(workspace_path, force),
        Commands::Ingest {
            input,
            name,
            paste,
            dry_run,
            format,
        } => ingest_command(workspace_path, input.as_deref(), name, paste, dry_run, &format),
        Commands::List { format } => list_command(workspace_path, &format),
        Commands::Show { version, format } => show_command(workspace_path, &version, &format),
        Commands::Diff {
            version_a,
            version_b,
            format,
            output,
        } => diff_command(workspace_path, &version_a, &version_b, &format, output.as_deref()),
        Commands::Stats { days, top, format } => stats_command(workspace_path, days, top, &format),
    }
}

fn open_store(workspace_path: Option<&Path>) -> Result<SnapshotStore<FileBlobStore>> {
    let workspace = ClaimdiffWorkspace::find_or_create(workspace_path)?;
    Ok(SnapshotStore::open(workspace.blob_store()))
}

/// Initialize claimdiff workspace
fn init_command(workspace_path: Option<&Path>, force: bool) -> Result<()> {
    let current_dir = std::env::current_dir()?;
    let root = workspace_path.unwrap_or(&current_dir);

    let workspace = ClaimdiffWorkspace::create_new(root.to_path_buf())?;
    if force {
        workspace.create_config(true)?;
    }

    println!("✅ Initialized claimdiff workspace at: {}", workspace.root.display());
    Ok(())
}

/// Ingest an input into a new stored version
fn ingest_command(
    workspace_path: Option<&Path>,
    input: Option<&str>,
    name: Option<String>,
    paste: bool,
    dry_run: bool,
    format: &str,
) -> Result<()> {
    let format = OutputFormat::parse(format).map_err(ClaimdiffError::invalid_input)?;
    let mut store = open_store(workspace_path)?;

    let mut progress = if matches!(format, OutputFormat::Pretty) {
        ProgressReporter::new_for_ingest()
    } else {
        ProgressReporter::new_minimal()
    };

    let (matrix, version_name) = match (input, paste) {
        (_, true) => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            (data::matrix_from_pasted(&text), "Pasted data".to_string())
        }
        (Some(path), false) => {
            let path = Path::new(path);
            let matrix = data::read_matrix(path)?;
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "Uploaded file".to_string());
            (matrix, stem)
        }
        (None, false) => {
            return Err(ClaimdiffError::invalid_input(
                "Provide an input file, or --paste to read from stdin",
            ));
        }
    };

    let data_rows = matrix.len().saturating_sub(1) as u64;
    progress.finish_decode(&format!("✅ Decoded {} data rows", data_rows), data_rows);

    let today = Local::now().date_naive();
    let outcome = {
        let report = |processed: u64, _total: u64| progress.update_rows(processed);
        ingest::process_with_progress(&matrix, today, Some(&report))
    };
    progress.finish_rows(&format!("✅ Processed {} claims", outcome.records.len()));

    match format {
        OutputFormat::Pretty => PrettyPrinter::print_ingest_summary(&outcome),
        OutputFormat::Json => println!("{}", JsonFormatter::format(&outcome)?),
    }

    if outcome.has_errors() {
        log::warn!("{} rows were rejected during ingestion", outcome.errors.len());
    }

    if dry_run {
        log::info!("Dry run: no version saved");
        return Ok(());
    }

    let IngestOutcome { records, .. } = outcome;
    let record_count = records.len();
    let id = store.save_new_version(records, name.unwrap_or(version_name));

    if let OutputFormat::Pretty = format {
        println!();
        println!("💾 Saved version {} ({} rows)", id, record_count);

        // Changes versus the rotated-out previous version, when one exists
        if let Some(previous) = store.previous() {
            let result = store.compare(&id, &previous.id)?;
            println!();
            PrettyPrinter::print_comparison(&result, &id, &previous.id);
        }
    }

    Ok(())
}

/// List all stored versions
fn list_command(workspace_path: Option<&Path>, format: &str) -> Result<()> {
    let format = OutputFormat::parse(format).map_err(ClaimdiffError::invalid_input)?;
    let store = open_store(workspace_path)?;

    let history = store.list_history();
    match format {
        OutputFormat::Pretty => {
            let current_id = store.current().map(|v| v.id.clone());
            let previous_id = store.previous().map(|v| v.id.clone());
            PrettyPrinter::print_version_list(&history, current_id.as_deref(), previous_id.as_deref());
        }
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = history
                .iter()
                .map(|v| {
                    serde_json::json!({
                        "id": v.id,
                        "timestamp": v.timestamp,
                        "name": v.metadata.name,
                        "rows": v.metadata.rows,
                    })
                })
                .collect();
            println!("{}", JsonFormatter::format(&entries)?);
        }
    }

    Ok(())
}

/// Show one version's metadata (JSON includes the full claim set)
fn show_command(workspace_path: Option<&Path>, version: &str, format: &str) -> Result<()> {
    let format = OutputFormat::parse(format).map_err(ClaimdiffError::invalid_input)?;
    let store = open_store(workspace_path)?;
    let version = resolver::resolve(&store, &VersionRef::parse(version))?;

    match format {
        OutputFormat::Pretty => PrettyPrinter::print_version_metadata(version),
        OutputFormat::Json => println!("{}", JsonFormatter::format(version)?),
    }

    Ok(())
}

/// Compare two versions
fn diff_command(
    workspace_path: Option<&Path>,
    version_a: &str,
    version_b: &str,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let format = OutputFormat::parse(format).map_err(ClaimdiffError::invalid_input)?;
    let store = open_store(workspace_path)?;

    let a = resolver::resolve(&store, &VersionRef::parse(version_a))?;
    let b = resolver::resolve(&store, &VersionRef::parse(version_b))?;
    let result = diff::compare(&a.data, &b.data)?;

    if let Some(path) = output {
        std::fs::write(path, JsonFormatter::format(&result)?)?;
        log::info!("Wrote comparison result to {}", path.display());
    }

    match format {
        OutputFormat::Pretty => PrettyPrinter::print_comparison(&result, &a.id, &b.id),
        OutputFormat::Json => println!("{}", JsonFormatter::format(&result)?),
    }

    Ok(())
}

/// Show KPIs, top clients, and modified claims for the current version
fn stats_command(workspace_path: Option<&Path>, days: i64, top: usize, format: &str) -> Result<()> {
    let format = OutputFormat::parse(format).map_err(ClaimdiffError::invalid_input)?;
    let store = open_store(workspace_path)?;

    let current = store
        .current()
        .ok_or_else(|| ClaimdiffError::invalid_input("No versions stored yet, run ingest first"))?;
    let previous = store.previous();

    let today = Local::now().date_naive();
    let report = metrics::calculate_kpis(
        &current.data,
        previous.map(|v| v.data.as_slice()),
        days,
        today,
    );
    let top_clients = metrics::top_clients(&current.data, days, today, top);
    let modified = metrics::modified_claims(&current.data, days, today);

    match format {
        OutputFormat::Pretty => {
            PrettyPrinter::print_kpi_report(&report, &top_clients, modified.len(), days);
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "window_days": days,
                "kpis": report,
                "top_clients": top_clients,
                "modified_claims": modified.len(),
            });
            println!("{}", JsonFormatter::format(&json)?);
        }
    }

    Ok(())
}
