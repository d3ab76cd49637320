//! Loading the main config and the module configs it declares.
//!
//! # Resolution order (highest priority first)
//!
//! 1. `GANTRY_`-prefixed environment variables (top-level keys of the main
//!    file only, e.g. `GANTRY_TARGET_PATH`)
//! 2. The YAML files themselves
//!
//! Relative paths are resolved against the working directory.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use gantry_core::{
    domain::{BootConfig, ConfigRegistry, ModuleConfig, ModuleKind, ProjectIdentity},
    error::{Context, GantryError},
};

use crate::error::{CliError, CliResult};

/// Prefix of environment variables that override the main file.
pub const ENV_PREFIX: &str = "GANTRY";

/// Everything `Gantry` needs, read and validated.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub boot: BootConfig,
    pub configs: ConfigRegistry,
}

/// Reads the main file, then one typed record per enabled service.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    main: PathBuf,
}

impl ConfigLoader {
    pub fn new(main: impl Into<PathBuf>) -> Self {
        Self { main: main.into() }
    }

    pub fn main_path(&self) -> &Path {
        &self.main
    }

    #[instrument(skip_all, fields(config = %self.main.display()))]
    pub fn load(&self) -> CliResult<LoadedConfig> {
        let boot: BootConfig = read_yaml(&self.main, Some(ENV_PREFIX))?;
        let identity = boot.identity();

        let mut configs = ConfigRegistry::new();
        for decl in boot.enabled_services() {
            let kind: ModuleKind = decl.id.parse().map_err(GantryError::from)?;
            let config = load_module(kind, &decl.conf_path)?;
            register(&mut configs, config, &identity, &decl.conf_path)?;
            debug!(service = %kind, path = %decl.conf_path.display(), "module config loaded");
        }

        info!(services = configs.len(), "configuration loaded");
        Ok(LoadedConfig { boot, configs })
    }
}

fn load_module(kind: ModuleKind, path: &Path) -> CliResult<ModuleConfig> {
    Ok(match kind {
        ModuleKind::BaseProject => ModuleConfig::Project(read_yaml(path, None)?),
        ModuleKind::BaseLint => ModuleConfig::Lint(read_yaml(path, None)?),
        ModuleKind::BaseLocal => ModuleConfig::Local(read_yaml(path, None)?),
        ModuleKind::BaseTest => ModuleConfig::Test(read_yaml(path, None)?),
    })
}

fn register(
    configs: &mut ConfigRegistry,
    config: ModuleConfig,
    identity: &ProjectIdentity,
    path: &Path,
) -> CliResult<()> {
    configs
        .register(config, identity)
        .with_context(|| format!("invalid configuration in {}", path.display()))?;
    Ok(())
}

/// Deserialize one YAML file, optionally layering prefixed env vars on top.
fn read_yaml<T: DeserializeOwned>(path: &Path, env_prefix: Option<&str>) -> CliResult<T> {
    if !path.is_file() {
        return Err(CliError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut builder = Config::builder().add_source(File::from(path).format(FileFormat::Yaml));
    if let Some(prefix) = env_prefix {
        builder = builder.add_source(Environment::with_prefix(prefix));
    }

    builder
        .build()
        .and_then(|config| config.try_deserialize::<T>())
        .map_err(|e| CliError::ConfigError {
            message: format!("failed to read {}", path.display()),
            source: Some(Box::new(e)),
        })
}
