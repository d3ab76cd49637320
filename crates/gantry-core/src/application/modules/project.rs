use tracing::instrument;

use super::{GenerationModule, Workspace, not_configured, wrong_config};
use crate::{
    domain::{ModuleConfig, ModuleKind, ProjectConfig, RenderContext},
    error::GantryResult,
};

/// Renders the project skeleton: sources, README, CI files.
pub struct ProjectModule {
    workspace: Workspace,
    config: Option<(ProjectConfig, RenderContext)>,
}

impl ProjectModule {
    pub fn new(workspace: Workspace) -> Self {
        Self {
            workspace,
            config: None,
        }
    }
}

impl GenerationModule for ProjectModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::BaseProject
    }

    fn set_config(&mut self, config: &ModuleConfig) -> GantryResult<()> {
        let ModuleConfig::Project(config) = config else {
            return Err(wrong_config(self.kind(), "ProjectConfig", config));
        };
        self.workspace.guard_source(&config.source_path)?;

        let context = RenderContext::from_serialize(config)?;
        self.config = Some((config.clone(), context));
        Ok(())
    }

    #[instrument(skip_all, fields(module = "base_project"))]
    fn run(&mut self) -> GantryResult<()> {
        let (config, context) = self
            .config
            .as_ref()
            .ok_or_else(|| not_configured(self.kind()))?;

        self.workspace
            .walker()
            .materialize(&config.source_path, context, &|_| false)?;
        Ok(())
    }
}
