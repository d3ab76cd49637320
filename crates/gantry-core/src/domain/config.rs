//! Typed configuration records.
//!
//! Loading from disk is the CLI's job; this module only defines the shapes,
//! fills derived fields and validates. Every `validate` is idempotent:
//! running it twice yields the same record.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{
    error::DomainError, module_kind::ModuleKind, scripts::ScriptChannel,
    validation::RequiredFields,
};

// ── Top level ────────────────────────────────────────────────────────────────

/// The main configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootConfig {
    /// Display name; also the name of the output directory.
    pub project_name: String,
    pub repo_url: String,
    /// Directory the project directory is created in.
    pub target_path: PathBuf,
    pub services: Vec<ServiceDeclaration>,
}

/// One `{id, conf_path, enabled}` entry of the services list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceDeclaration {
    pub id: String,
    pub conf_path: PathBuf,
    #[serde(default)]
    pub enabled: bool,
}

impl BootConfig {
    pub fn validate(&self) -> Result<(), DomainError> {
        RequiredFields::new("gantry")
            .text("project_name", &self.project_name)
            .path("target_path", &self.target_path)
            .finish()
    }

    /// Enabled declarations, in declaration order.
    pub fn enabled_services(&self) -> impl Iterator<Item = &ServiceDeclaration> {
        self.services.iter().filter(|s| s.enabled)
    }

    pub fn identity(&self) -> ProjectIdentity {
        ProjectIdentity {
            project_name: self.project_name.clone(),
            repo_url: self.repo_url.clone(),
        }
    }

    /// `<target_path>/<project_name>`.
    pub fn project_root(&self) -> PathBuf {
        self.target_path.join(&self.project_name)
    }
}

/// Values every module config inherits from the main file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectIdentity {
    pub project_name: String,
    pub repo_url: String,
}

impl ProjectIdentity {
    pub fn new(project_name: impl Into<String>, repo_url: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            repo_url: repo_url.into(),
        }
    }

    /// The repository URL without its scheme, usable as an import path.
    pub fn repo_path(&self) -> String {
        strip_scheme(&self.repo_url)
    }
}

fn strip_scheme(url: &str) -> String {
    let url = url.trim();
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
        .to_string()
}

fn fill_if_blank(field: &mut String, value: &str) {
    if field.trim().is_empty() {
        *field = value.to_string();
    }
}

// ── base_project ─────────────────────────────────────────────────────────────

/// Configuration of the project skeleton module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub source_path: PathBuf,
    pub project_name: String,
    pub project_url: String,
    #[serde(skip_deserializing)]
    pub repo_path: String,
    #[serde(skip_deserializing)]
    pub caps_project_name: String,
    #[serde(skip_deserializing)]
    pub lower_project_name: String,
    pub used_go_version: String,
    pub used_node_version: String,
    /// Zero means "this year".
    pub current_year: i32,
    pub release_current_window: String,
    pub release_upcoming_window: String,
    pub release_long_term: String,
    pub author: String,
    pub git_provider: String,
    pub git_user: String,
}

impl ProjectConfig {
    pub fn validate(&mut self, identity: &ProjectIdentity) -> Result<(), DomainError> {
        fill_if_blank(&mut self.project_name, &identity.project_name);
        fill_if_blank(&mut self.project_url, &identity.repo_url);

        let mut required = RequiredFields::new("base_project")
            .path("source_path", &self.source_path)
            .text("project_url", &self.project_url)
            .text("project_name", &self.project_name)
            .text("used_go_version", &self.used_go_version)
            .text("used_node_version", &self.used_node_version)
            .text("release_current_window", &self.release_current_window)
            .text("release_upcoming_window", &self.release_upcoming_window)
            .text("release_long_term", &self.release_long_term)
            .text("author", &self.author);
        if !self.git_provider.trim().is_empty() {
            required = required.text("git_user", &self.git_user);
        }
        required.finish()?;

        self.caps_project_name = self.project_name.to_uppercase();
        self.lower_project_name = self.project_name.to_lowercase();
        self.repo_path = strip_scheme(&self.project_url);
        if self.current_year == 0 {
            self.current_year = chrono::Local::now().year();
        }
        Ok(())
    }
}

// ── base_lint ────────────────────────────────────────────────────────────────

pub const LINTER_GO: &str = "golang";
pub const LINTER_YAML: &str = "yaml";
pub const LINTER_MAKE: &str = "make";
pub const LINTER_MARKDOWN: &str = "markdown";
pub const LINTER_SHELL: &str = "shellcheck";
pub const LINTER_SHFMT: &str = "shfmt";

/// Command used for an enabled linter whose `cmd` is blank.
pub fn default_lint_command(linter: &str) -> Option<&'static str> {
    match linter {
        LINTER_GO => Some("golangci-lint run ./..."),
        LINTER_YAML => Some("yamllint ."),
        LINTER_MAKE => Some("checkmake Makefile"),
        LINTER_MARKDOWN => Some("markdownlint \"**/*.md\""),
        LINTER_SHELL => Some("shellcheck scripts/*.sh"),
        LINTER_SHFMT => Some("shfmt -d scripts/*.sh"),
        _ => None,
    }
}

/// Configuration of the lint config module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    pub source_path: PathBuf,
    pub project_name: String,
    pub repo_import_path: String,
    /// Sorted by name, which fixes the order files and commands are produced in.
    pub linters: BTreeMap<String, Linter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Linter {
    pub cmd: String,
    pub enabled: bool,
}

impl LintConfig {
    pub fn validate(&mut self, identity: &ProjectIdentity) -> Result<(), DomainError> {
        fill_if_blank(&mut self.project_name, &identity.project_name);
        fill_if_blank(&mut self.repo_import_path, &identity.repo_path());

        RequiredFields::new("base_lint")
            .path("source_path", &self.source_path)
            .text("project_name", &self.project_name)
            .text("repo_import_path", &self.repo_import_path)
            .finish()?;

        for (name, linter) in &mut self.linters {
            if !linter.enabled || !linter.cmd.trim().is_empty() {
                continue;
            }
            match default_lint_command(name) {
                Some(cmd) => linter.cmd = cmd.to_string(),
                None => warn!(linter = %name, "unknown linter; no default command defined"),
            }
        }
        Ok(())
    }

    /// Enabled linters in name order.
    pub fn enabled_linters(&self) -> impl Iterator<Item = (&str, &Linter)> {
        self.linters
            .iter()
            .filter(|(_, l)| l.enabled)
            .map(|(name, l)| (name.as_str(), l))
    }
}

// ── base_local ───────────────────────────────────────────────────────────────

/// Configuration of the local scripts module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    pub source_path: PathBuf,
    pub project_name: String,
    /// Active channels: any of `make`, `task`, `script`, `commit`.
    pub file_list: Vec<String>,
}

impl LocalConfig {
    pub fn validate(&mut self, identity: &ProjectIdentity) -> Result<(), DomainError> {
        fill_if_blank(&mut self.project_name, &identity.project_name);

        RequiredFields::new("base_local")
            .path("source_path", &self.source_path)
            .text("project_name", &self.project_name)
            .list("file_list", &self.file_list)
            .finish()?;

        let mut seen = BTreeSet::new();
        for entry in &self.file_list {
            if entry.trim().is_empty() {
                return Err(DomainError::InvalidConfigValue {
                    module: "base_local",
                    field: "file_list",
                    reason: "entries must not be blank".into(),
                });
            }
            let channel: ScriptChannel = entry.parse()?;
            if !seen.insert(channel) {
                return Err(DomainError::InvalidConfigValue {
                    module: "base_local",
                    field: "file_list",
                    reason: format!("duplicate entry '{}'", channel),
                });
            }
        }
        Ok(())
    }

    /// Active channels in `file_list` order. Unparseable entries are dropped;
    /// `validate` has already rejected them.
    pub fn channels(&self) -> Vec<ScriptChannel> {
        self.file_list
            .iter()
            .filter_map(|entry| entry.parse().ok())
            .collect()
    }
}

// ── base_test ────────────────────────────────────────────────────────────────

pub const TEST_STYLE_GINKGO: &str = "ginkgo";
pub const TEST_STYLE_GO: &str = "go";

pub const DEFAULT_TEST_COMMAND: &str = "go test -race -timeout=5m -coverprofile=coverage.txt ./... \
     && go tool cover -func=coverage.txt; rm -f coverage.txt";

/// Configuration of the test scaffold module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    pub source_path: PathBuf,
    /// `ginkgo` or `go`.
    pub use_style: String,
    pub test_cmd: String,
    pub project_name: String,
    pub repo_import_path: String,
    #[serde(skip_deserializing)]
    pub caps_project_name: String,
    #[serde(skip_deserializing)]
    pub lower_project_name: String,
}

impl TestConfig {
    pub fn validate(&mut self, identity: &ProjectIdentity) -> Result<(), DomainError> {
        fill_if_blank(&mut self.project_name, &identity.project_name);
        fill_if_blank(&mut self.repo_import_path, &identity.repo_path());

        RequiredFields::new("base_test")
            .path("source_path", &self.source_path)
            .text("project_name", &self.project_name)
            .text("repo_import_path", &self.repo_import_path)
            .text("use_style", &self.use_style)
            .finish()?;

        self.use_style = self.use_style.trim().to_string();
        if self.use_style != TEST_STYLE_GINKGO && self.use_style != TEST_STYLE_GO {
            return Err(DomainError::InvalidConfigValue {
                module: "base_test",
                field: "use_style",
                reason: format!("must be '{TEST_STYLE_GINKGO}' or '{TEST_STYLE_GO}'"),
            });
        }

        self.caps_project_name = self.project_name.to_uppercase();
        self.lower_project_name = self.project_name.to_lowercase();
        fill_if_blank(&mut self.test_cmd, DEFAULT_TEST_COMMAND);
        Ok(())
    }

    pub fn uses_ginkgo(&self) -> bool {
        self.use_style == TEST_STYLE_GINKGO
    }
}

// ── Sum type ─────────────────────────────────────────────────────────────────

/// A validated configuration for exactly one module kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleConfig {
    Project(ProjectConfig),
    Lint(LintConfig),
    Local(LocalConfig),
    Test(TestConfig),
}

impl ModuleConfig {
    pub fn kind(&self) -> ModuleKind {
        match self {
            Self::Project(_) => ModuleKind::BaseProject,
            Self::Lint(_) => ModuleKind::BaseLint,
            Self::Local(_) => ModuleKind::BaseLocal,
            Self::Test(_) => ModuleKind::BaseTest,
        }
    }

    /// Name of the record type, for type mismatch messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Project(_) => "ProjectConfig",
            Self::Lint(_) => "LintConfig",
            Self::Local(_) => "LocalConfig",
            Self::Test(_) => "TestConfig",
        }
    }

    pub fn source_path(&self) -> &Path {
        match self {
            Self::Project(c) => &c.source_path,
            Self::Lint(c) => &c.source_path,
            Self::Local(c) => &c.source_path,
            Self::Test(c) => &c.source_path,
        }
    }

    pub fn validate(&mut self, identity: &ProjectIdentity) -> Result<(), DomainError> {
        match self {
            Self::Project(c) => c.validate(identity),
            Self::Lint(c) => c.validate(identity),
            Self::Local(c) => c.validate(identity),
            Self::Test(c) => c.validate(identity),
        }
    }
}

/// Validated configurations by module.
///
/// Registering a kind again replaces the earlier entry.
#[derive(Debug, Clone, Default)]
pub struct ConfigRegistry {
    configs: BTreeMap<ModuleKind, ModuleConfig>,
}

impl ConfigRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a configuration.
    pub fn register(
        &mut self,
        mut config: ModuleConfig,
        identity: &ProjectIdentity,
    ) -> Result<(), DomainError> {
        config.validate(identity)?;
        self.configs.insert(config.kind(), config);
        Ok(())
    }

    pub fn unregister(&mut self, kind: ModuleKind) {
        self.configs.remove(&kind);
    }

    pub fn get(&self, kind: ModuleKind) -> Option<&ModuleConfig> {
        self.configs.get(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = ModuleKind> + '_ {
        self.configs.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
