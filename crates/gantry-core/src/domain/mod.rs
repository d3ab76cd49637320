//! Core domain layer for Gantry.
//!
//! This module contains pure logic with no I/O. Filesystem access and
//! template rendering are reached through the ports defined in the
//! application layer.
//!
//! - **Module kinds**: the closed set of generation modules
//! - **Configs**: typed, validated records, one per module kind
//! - **Paths**: `SafePath`, the only path type an output root accepts
//! - **Text**: helpers exposed to templates
pub mod config;
pub mod context;
pub mod error;
pub mod module_kind;
pub mod paths;
pub mod scripts;
pub mod text;

mod validation;

// Re-exports for convenience
pub use config::{
    BootConfig, ConfigRegistry, LintConfig, Linter, LocalConfig, ModuleConfig, ProjectConfig,
    ProjectIdentity, ServiceDeclaration, TEST_STYLE_GINKGO, TEST_STYLE_GO, TestConfig,
};
pub use context::RenderContext;
pub use error::{DomainError, ErrorCategory};
pub use module_kind::ModuleKind;
pub use paths::{SafePath, normalize_path, same_location};
pub use scripts::ScriptChannel;
