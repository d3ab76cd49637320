//! The application facade the CLI drives.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    application::{
        ApplicationError,
        modules::{GenerationModule, LintModule, LocalModule, ProjectModule, TestModule, Workspace},
        ports::{OutputRoot, RootOpener, TemplateRenderer, TemplateSource},
        services::{RunReport, ServiceManager},
    },
    domain::{BootConfig, ConfigRegistry, ModuleKind},
    error::{Context, GantryError, GantryResult},
};

/// One generation run: declared services, their configs, and the adapters
/// to render and write with.
pub struct Gantry {
    boot: BootConfig,
    configs: ConfigRegistry,
    opener: Arc<dyn RootOpener>,
    source: Arc<dyn TemplateSource>,
    renderer: Arc<dyn TemplateRenderer>,
    manager: ServiceManager,
    root: Option<Arc<dyn OutputRoot>>,
}

impl Gantry {
    pub fn new(
        boot: BootConfig,
        configs: ConfigRegistry,
        opener: Arc<dyn RootOpener>,
        source: Arc<dyn TemplateSource>,
        renderer: Arc<dyn TemplateRenderer>,
    ) -> Self {
        Self {
            boot,
            configs,
            opener,
            source,
            renderer,
            manager: ServiceManager::new(),
            root: None,
        }
    }

    /// Instantiate a module for every enabled declaration.
    ///
    /// All identifiers are checked before the output root is opened. A
    /// duplicate identifier fails the whole registration.
    #[instrument(skip_all, fields(project = %self.boot.project_name))]
    pub fn register_services(&mut self) -> GantryResult<()> {
        self.boot.validate()?;

        let kinds = self
            .boot
            .enabled_services()
            .map(|decl| decl.id.parse::<ModuleKind>())
            .collect::<Result<Vec<_>, _>>()?;
        if kinds.is_empty() {
            return Err(ApplicationError::NoServices.into());
        }

        let root = self
            .opener
            .open(&self.boot.target_path, &self.boot.project_name)
            .context("failed to open output root")?;
        let workspace = Workspace::new(
            self.boot.target_path.clone(),
            root.clone(),
            self.source.clone(),
            self.renderer.clone(),
        );

        let mut manager = ServiceManager::new();
        for kind in kinds {
            manager
                .register(build_module(kind, workspace.clone()))
                .with_context(|| format!("failed to register service '{kind}'"))?;
        }

        info!(services = ?manager.ids(), root = %root.path().display(), "services registered");
        self.manager = manager;
        self.root = Some(root);
        Ok(())
    }

    /// Run every registered service through the three phases.
    pub fn run_services(&mut self) -> GantryResult<RunReport> {
        if self.manager.is_empty() {
            return Err(GantryError::Internal {
                message: "run_services called before register_services".into(),
            });
        }
        self.manager.run_all(&self.configs)
    }

    pub fn registered_ids(&self) -> Vec<&'static str> {
        self.manager.ids()
    }

    /// The output root, once services are registered.
    pub fn root(&self) -> Option<&Arc<dyn OutputRoot>> {
        self.root.as_ref()
    }

    pub fn boot(&self) -> &BootConfig {
        &self.boot
    }
}

fn build_module(kind: ModuleKind, workspace: Workspace) -> Box<dyn GenerationModule> {
    match kind {
        ModuleKind::BaseProject => Box::new(ProjectModule::new(workspace)),
        ModuleKind::BaseLint => Box::new(LintModule::new(workspace)),
        ModuleKind::BaseLocal => Box::new(LocalModule::new(workspace)),
        ModuleKind::BaseTest => Box::new(TestModule::new(workspace)),
    }
}
