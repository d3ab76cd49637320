// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel inside wrapped context chains)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Path Errors
    // ========================================================================
    #[error("path escapes the output root: {path}")]
    PathEscape { path: String },

    #[error("source path and target path are identical: {}", .path.display())]
    IdenticalSourceAndTarget { path: PathBuf },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    #[error("invalid config type for {module}: expected {expected}, got {actual}")]
    InvalidConfigType {
        module: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{module}: missing required config fields: {}", .fields.join(", "))]
    MissingConfigFields {
        module: &'static str,
        fields: Vec<&'static str>,
    },

    #[error("{module}: invalid value for '{field}': {reason}")]
    InvalidConfigValue {
        module: &'static str,
        field: &'static str,
        reason: String,
    },

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    #[error("unknown module identifier: '{id}'")]
    UnknownModuleIdentifier { id: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::PathEscape { path } => vec![
                format!("The template path '{}' resolves outside the project", path),
                "Remove '..' segments and leading '/' from template file names".into(),
            ],
            Self::IdenticalSourceAndTarget { path } => vec![
                format!("Templates would be read from and written to {}", path.display()),
                "Point source_path at the template tree, not at the output directory".into(),
            ],
            Self::InvalidConfigType { module, expected, .. } => vec![
                format!("Module '{}' only accepts a {} configuration", module, expected),
                "Check the service id in the main config matches its conf_path file".into(),
            ],
            Self::MissingConfigFields { module, fields } => vec![
                format!("Add the missing fields to the {} config:", module),
                format!("  {}", fields.join(", ")),
            ],
            Self::InvalidConfigValue { field, .. } => {
                vec![format!("Fix the value of '{}' and run again", field)]
            }
            Self::UnknownModuleIdentifier { id } => vec![
                format!("'{}' is not a known module", id),
                "Known modules: base_project, base_lint, base_local, base_test".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::PathEscape { .. } | Self::IdenticalSourceAndTarget { .. } => {
                ErrorCategory::Validation
            }
            Self::InvalidConfigType { .. }
            | Self::MissingConfigFields { .. }
            | Self::InvalidConfigValue { .. }
            | Self::UnknownModuleIdentifier { .. } => ErrorCategory::Configuration,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    NotFound,
    Internal,
}
