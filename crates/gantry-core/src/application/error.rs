//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not in the
//! shape of the configuration. Those are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while materializing templates or wiring modules.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// Malformed template syntax.
    #[error("failed template parse of '{name}': {reason}")]
    TemplateParse { name: String, reason: String },

    /// Template referenced data the context does not have.
    #[error("failed template execution of '{name}': {reason}")]
    TemplateExecution { name: String, reason: String },

    /// A module, line group or script file was registered twice.
    #[error("{what} '{key}' already registered{}", scope_suffix(.scope))]
    DuplicateRegistration {
        what: &'static str,
        key: String,
        scope: Option<&'static str>,
    },

    /// A template a module always needs is not in its source tree.
    #[error("missing required template '{name}' (expected {})", .expected.display())]
    MissingTemplate { name: String, expected: PathBuf },

    /// Filesystem operation failed.
    #[error("filesystem error at {}: {reason}", .path.display())]
    FilesystemError { path: PathBuf, reason: String },

    /// Nothing was declared (or everything was disabled).
    #[error("no services declared in the configuration")]
    NoServices,

    /// The script registrar lock was poisoned by a panicking writer.
    #[error("script registrar is unavailable")]
    RegistrarLockError,
}

fn scope_suffix(scope: &Option<&'static str>) -> String {
    scope.map(|s| format!(" in {s}")).unwrap_or_default()
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateParse { name, .. } => vec![
                format!("Template '{}' has invalid syntax", name),
                "Check for unterminated '{{' or '{%' blocks".into(),
            ],
            Self::TemplateExecution { name, .. } => vec![
                format!("Template '{}' uses a value the module does not provide", name),
                "Compare the placeholders with the module's context fields".into(),
            ],
            Self::DuplicateRegistration { key, .. } => vec![
                format!("'{}' may only be registered once per run", key),
                "Remove the duplicate entry from the services list".into(),
            ],
            Self::MissingTemplate { expected, .. } => vec![
                format!("Create {}", expected.display()),
                "Or disable the corresponding entry in the module config".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::NoServices => vec![
                "Declare at least one enabled entry under 'services'".into(),
                "Example: { id: base_project, conf_path: ./configs/base_project.yml, enabled: true }"
                    .into(),
            ],
            Self::RegistrarLockError => vec!["This is likely a bug, please report it".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateParse { .. } | Self::TemplateExecution { .. } => {
                ErrorCategory::Validation
            }
            Self::DuplicateRegistration { .. } | Self::NoServices => ErrorCategory::Configuration,
            Self::MissingTemplate { .. } => ErrorCategory::NotFound,
            Self::FilesystemError { .. } | Self::RegistrarLockError => ErrorCategory::Internal,
        }
    }
}
