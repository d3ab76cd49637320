//! Implementation of `gantry generate`.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use gantry_adapters::{LocalRootOpener, MemoryRootOpener};
use gantry_core::{application::ports::RootOpener, domain::ModuleKind};

use crate::{
    cli::{GenerateArgs, GlobalArgs},
    commands::build_app,
    config::ConfigLoader,
    error::CliResult,
    output::OutputManager,
};

/// Machine-readable result, printed with `--output-format json`.
#[derive(Debug, Serialize)]
struct GenerateSummary {
    project: String,
    root: String,
    dry_run: bool,
    ran: Vec<ModuleKind>,
    skipped: Vec<ModuleKind>,
    /// Files a dry run would have written; empty otherwise.
    files: Vec<String>,
}

/// Load the configs, register the declared services and run them.
///
/// With `--dry-run` everything renders into a memory root, so template and
/// path errors still surface but the disk is left alone.
#[instrument(skip_all, fields(dry_run = args.dry_run))]
pub fn execute(args: GenerateArgs, global: &GlobalArgs, output: &OutputManager) -> CliResult<()> {
    let loaded = ConfigLoader::new(global.config_path()).load()?;
    let project = loaded.boot.project_name.clone();

    let memory = args.dry_run.then(|| Arc::new(MemoryRootOpener::new()));
    let opener: Arc<dyn RootOpener> = match &memory {
        Some(memory) => memory.clone(),
        None => Arc::new(LocalRootOpener::new()),
    };

    let mut app = build_app(loaded, opener);
    app.register_services()?;

    let root = app
        .root()
        .map(|root| root.path().display().to_string())
        .unwrap_or_default();
    output.header(&format!("Generating '{project}' into {root}"))?;

    let report = app.run_services()?;
    info!(ran = report.ran.len(), skipped = report.skipped.len(), "generation finished");

    for kind in &report.ran {
        output.success(kind.as_str())?;
    }
    for kind in &report.skipped {
        output.warning(&format!("{kind} skipped (no configuration loaded)"))?;
    }

    let files = memory
        .and_then(|memory| memory.root())
        .map(|root| root.list_files())
        .unwrap_or_default();
    if args.dry_run {
        output.info("Dry run: nothing was written. Files that would be generated:")?;
        output.list(&files)?;
    }

    output.json(&GenerateSummary {
        project,
        root,
        dry_run: args.dry_run,
        ran: report.ran,
        skipped: report.skipped,
        files,
    })
}
