use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, instrument};

use super::{GenerationModule, ScriptRegistrar, Workspace, not_configured, wrong_config};
use crate::{
    application::services::ScriptRegistry,
    domain::{
        LocalConfig, ModuleConfig, ModuleKind, ScriptChannel,
        scripts::{SCRIPT_DIR, TEMPLATE_SUFFIX},
    },
    error::{Context, GantryResult},
};

/// Renders local developer tooling from the contributions of other modules.
///
/// Runs last so every contributor has registered by the time its templates
/// are rendered.
pub struct LocalModule {
    workspace: Workspace,
    config: Option<LocalConfig>,
    registry: Arc<ScriptRegistry>,
}

impl LocalModule {
    pub fn new(workspace: Workspace) -> Self {
        Self {
            workspace,
            config: None,
            registry: Arc::new(ScriptRegistry::new()),
        }
    }

    fn template(config: &LocalConfig, dest: &str) -> PathBuf {
        config.source_path.join(format!("{dest}{TEMPLATE_SUFFIX}"))
    }
}

impl GenerationModule for LocalModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::BaseLocal
    }

    fn set_config(&mut self, config: &ModuleConfig) -> GantryResult<()> {
        let ModuleConfig::Local(config) = config else {
            return Err(wrong_config(self.kind(), "LocalConfig", config));
        };
        self.workspace.guard_source(&config.source_path)?;

        self.registry
            .activate(&config.project_name, config.channels())?;
        self.config = Some(config.clone());
        Ok(())
    }

    #[instrument(skip_all, fields(module = "base_local"))]
    fn run(&mut self) -> GantryResult<()> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| not_configured(self.kind()))?;
        let context = self.registry.context()?;
        let walker = self.workspace.walker();

        for channel in config.channels() {
            match channel.output_file() {
                Some(file) => {
                    walker
                        .copy_and_render(&Self::template(config, file), file, &context)
                        .with_context(|| format!("failed to generate {channel} file"))?;
                    debug!(%channel, file, "channel file written");
                }
                None => {
                    let names = self.registry.script_file_names()?;
                    if names.is_empty() {
                        continue;
                    }
                    self.workspace.root.ensure_dir(SCRIPT_DIR)?;
                    for name in names {
                        let dest = format!("{SCRIPT_DIR}/{name}");
                        walker
                            .copy_and_render(&Self::template(config, &dest), &dest, &context)
                            .with_context(|| format!("failed to generate script '{name}'"))?;
                        self.workspace.root.set_executable(&dest)?;
                        debug!(script = %dest, "script written");
                    }
                }
            }
        }
        Ok(())
    }

    fn script_registrar(&self) -> Option<Arc<dyn ScriptRegistrar>> {
        Some(self.registry.clone())
    }
}
