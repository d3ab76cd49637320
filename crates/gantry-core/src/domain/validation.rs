use std::path::Path;

use crate::domain::error::DomainError;

/// Collects blank required fields so one error can name all of them.
pub(crate) struct RequiredFields {
    module: &'static str,
    missing: Vec<&'static str>,
}

impl RequiredFields {
    pub(crate) fn new(module: &'static str) -> Self {
        Self {
            module,
            missing: Vec::new(),
        }
    }

    pub(crate) fn text(mut self, field: &'static str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.missing.push(field);
        }
        self
    }

    pub(crate) fn path(self, field: &'static str, value: &Path) -> Self {
        let text = value.to_string_lossy();
        self.text(field, &text)
    }

    pub(crate) fn list<T>(mut self, field: &'static str, value: &[T]) -> Self {
        if value.is_empty() {
            self.missing.push(field);
        }
        self
    }

    pub(crate) fn finish(self) -> Result<(), DomainError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(DomainError::MissingConfigFields {
                module: self.module,
                fields: self.missing,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_every_missing_field_in_order() {
        let err = RequiredFields::new("base_project")
            .text("author", " ")
            .text("source_path", "x")
            .list::<u8>("file_list", &[])
            .finish()
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "base_project: missing required config fields: author, file_list"
        );
    }

    #[test]
    fn passes_when_nothing_is_missing() {
        assert!(
            RequiredFields::new("m")
                .path("source_path", Path::new("templates"))
                .finish()
                .is_ok()
        );
    }
}
