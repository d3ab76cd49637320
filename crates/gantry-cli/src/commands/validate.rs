//! Implementation of `gantry validate`.

use std::sync::Arc;

use serde::Serialize;
use tracing::instrument;

use gantry_adapters::MemoryRootOpener;

use crate::{
    cli::GlobalArgs, commands::build_app, config::ConfigLoader, error::CliResult,
    output::OutputManager,
};

#[derive(Debug, Serialize)]
struct ValidateSummary {
    config: String,
    project: String,
    project_root: String,
    services: Vec<&'static str>,
}

/// Load every config and register the services without running them.
///
/// Registration runs against a memory root, so unknown and duplicate
/// service ids are reported exactly as `generate` would report them.
#[instrument(skip_all)]
pub fn execute(global: &GlobalArgs, output: &OutputManager) -> CliResult<()> {
    let loader = ConfigLoader::new(global.config_path());
    let loaded = loader.load()?;

    let mut app = build_app(loaded, Arc::new(MemoryRootOpener::new()));
    app.register_services()?;

    let services = app.registered_ids();
    let boot = app.boot();

    output.success(&format!("{} is valid", loader.main_path().display()))?;
    output.print(&format!(
        "Project '{}' would be generated into {}",
        boot.project_name,
        boot.project_root().display()
    ))?;
    output.header("Enabled services:")?;
    output.list(&services)?;

    output.json(&ValidateSummary {
        config: loader.main_path().display().to_string(),
        project: boot.project_name.clone(),
        project_root: boot.project_root().display().to_string(),
        services,
    })
}
