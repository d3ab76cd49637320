//! Generation modules.
//!
//! Each module owns one typed configuration and produces one concern of
//! the generated repository. Modules never know about each other; the only
//! cross-module channel is the [`ScriptRegistrar`] the service manager
//! injects into modules that accept one.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{
    application::{
        ports::{OutputRoot, TemplateRenderer, TemplateSource},
        services::TemplateWalker,
    },
    domain::{DomainError, ModuleConfig, ModuleKind, same_location},
    error::{GantryError, GantryResult},
};

mod lint;
mod local;
mod project;
mod test;

pub use lint::LintModule;
pub use local::LocalModule;
pub use project::ProjectModule;
pub use test::TestModule;

/// One unit of output production.
pub trait GenerationModule: Send {
    fn kind(&self) -> ModuleKind;

    /// Stable identifier, e.g. `base_project`.
    fn id(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Accept the module's configuration.
    ///
    /// Fails with `InvalidConfigType` for another module's config and with
    /// `IdenticalSourceAndTarget` when the template tree is the output.
    fn set_config(&mut self, config: &ModuleConfig) -> GantryResult<()>;

    fn run(&mut self) -> GantryResult<()>;

    /// Probe for the script contribution capability.
    fn as_script_receiver(&mut self) -> Option<&mut dyn ScriptReceiver> {
        None
    }

    /// The registrar this module collects contributions in, if it owns one.
    fn script_registrar(&self) -> Option<Arc<dyn ScriptRegistrar>> {
        None
    }
}

/// Sink for shell commands contributed by other modules.
///
/// Both registrations are once-per-key: a second call with the same key
/// fails with `DuplicateRegistration`. Calls for channels the owner has not
/// activated succeed without recording anything.
#[cfg_attr(test, mockall::automock)]
pub trait ScriptRegistrar: Send + Sync {
    /// Record `lines` as the line group of module `module_id`.
    fn register_lines(&self, module_id: &str, lines: &[String]) -> GantryResult<()>;

    /// Record `lines` as the body of the standalone script `file_name`.
    fn register_file(&self, file_name: &str, lines: &[String]) -> GantryResult<()>;
}

/// Capability of modules that contribute scripts.
pub trait ScriptReceiver {
    fn set_script_registrar(&mut self, registrar: Arc<dyn ScriptRegistrar>);
}

/// What every module needs to run: where to write and how to render.
#[derive(Clone)]
pub struct Workspace {
    /// Directory the project root lives in.
    pub target_dir: PathBuf,
    pub root: Arc<dyn OutputRoot>,
    pub source: Arc<dyn TemplateSource>,
    pub renderer: Arc<dyn TemplateRenderer>,
}

impl Workspace {
    pub fn new(
        target_dir: impl Into<PathBuf>,
        root: Arc<dyn OutputRoot>,
        source: Arc<dyn TemplateSource>,
        renderer: Arc<dyn TemplateRenderer>,
    ) -> Self {
        Self {
            target_dir: target_dir.into(),
            root,
            source,
            renderer,
        }
    }

    pub fn walker(&self) -> TemplateWalker<'_> {
        TemplateWalker::new(
            self.source.as_ref(),
            self.renderer.as_ref(),
            self.root.as_ref(),
        )
    }

    /// Refuse a template tree that is the output directory itself.
    pub fn guard_source(&self, source_path: &Path) -> Result<(), DomainError> {
        if same_location(source_path, &self.target_dir)
            || same_location(source_path, self.root.path())
        {
            return Err(DomainError::IdenticalSourceAndTarget {
                path: source_path.to_path_buf(),
            });
        }
        Ok(())
    }
}

fn wrong_config(kind: ModuleKind, expected: &'static str, got: &ModuleConfig) -> GantryError {
    DomainError::InvalidConfigType {
        module: kind.as_str(),
        expected,
        actual: got.type_name(),
    }
    .into()
}

fn not_configured(kind: ModuleKind) -> GantryError {
    GantryError::Internal {
        message: format!("{kind} ran before a configuration was assigned"),
    }
}
