//! Unified error handling for Gantry Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors. Errors crossing a component boundary are wrapped in
//! [`GantryError::Context`] so the final message names the module, phase and
//! path involved, while [`GantryError::root`] still exposes the original kind.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Gantry Core operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GantryError {
    /// Errors from the domain layer (paths, configuration shape).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Errors from the application layer (rendering, registration, I/O).
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// An error annotated with where it happened.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<GantryError>,
    },

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl GantryError {
    /// The innermost error, with every layer of context removed.
    pub fn root(&self) -> &GantryError {
        let mut current = self;
        while let Self::Context { source, .. } = current {
            current = source;
        }
        current
    }

    /// The wrapped domain error, if that is what this ultimately is.
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self.root() {
            Self::Domain(e) => Some(e),
            _ => None,
        }
    }

    /// The wrapped application error, if that is what this ultimately is.
    pub fn as_application(&self) -> Option<&ApplicationError> {
        match self.root() {
            Self::Application(e) => Some(e),
            _ => None,
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self.root() {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec!["This appears to be a bug in Gantry".into()],
            Self::Context { .. } => Vec::new(),
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self.root() {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Configuration => ErrorCategory::Configuration,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } | Self::Context { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type GantryResult<T> = Result<T, GantryError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Wrap the error with a fixed message.
    fn context(self, msg: impl Into<String>) -> GantryResult<T>;

    /// Wrap the error with a lazily built message.
    fn with_context<F, S>(self, f: F) -> GantryResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: Into<GantryError>,
{
    fn context(self, msg: impl Into<String>) -> GantryResult<T> {
        self.map_err(|e| GantryError::Context {
            context: msg.into(),
            source: Box::new(e.into()),
        })
    }

    fn with_context<F, S>(self, f: F) -> GantryResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| GantryError::Context {
            context: f().into(),
            source: Box::new(e.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escape() -> GantryError {
        DomainError::PathEscape {
            path: "../x".into(),
        }
        .into()
    }

    #[test]
    fn root_strips_every_context_layer() {
        let wrapped: GantryResult<()> = Err(escape());
        let err = wrapped
            .context("failed to render path 'a'")
            .context("base_project")
            .unwrap_err();

        assert_eq!(err.root(), &escape());
        assert!(matches!(
            err.as_domain(),
            Some(DomainError::PathEscape { .. })
        ));
    }

    #[test]
    fn context_message_reads_outside_in() {
        let wrapped: Result<(), DomainError> = Err(DomainError::UnknownModuleIdentifier {
            id: "docker".into(),
        });
        let err = wrapped.with_context(|| "service registration").unwrap_err();
        assert_eq!(
            err.to_string(),
            "service registration: unknown module identifier: 'docker'"
        );
    }

    #[test]
    fn category_follows_root() {
        let err: GantryResult<()> = Err(ApplicationError::MissingTemplate {
            name: "Makefile".into(),
            expected: "t/Makefile.tmpl".into(),
        }
        .into());
        let err = err.context("base_local").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn unknown_module_is_configuration_error() {
        let err: GantryError = DomainError::UnknownModuleIdentifier { id: "x".into() }.into();
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }
}
