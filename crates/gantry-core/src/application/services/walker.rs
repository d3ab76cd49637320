//! Two-pass template materialization.
//!
//! Pass 1 renders every relative path of a template tree and writes the
//! structure with raw, unrendered bytes. Pass 2 re-renders the content of
//! each file pass 1 wrote, in place. Directory names may carry
//! placeholders, so the final layout exists before any content is rendered.
//!
//! Nothing is rolled back on failure: a failed walk can leave a partially
//! rendered tree behind.

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{OutputRoot, TemplateRenderer, TemplateSource},
    },
    domain::{RenderContext, SafePath, scripts::TEMPLATE_SUFFIX},
    error::{Context, GantryResult},
};

/// Walks template trees into an output root.
pub struct TemplateWalker<'a> {
    source: &'a dyn TemplateSource,
    renderer: &'a dyn TemplateRenderer,
    root: &'a dyn OutputRoot,
}

impl<'a> TemplateWalker<'a> {
    pub fn new(
        source: &'a dyn TemplateSource,
        renderer: &'a dyn TemplateRenderer,
        root: &'a dyn OutputRoot,
    ) -> Self {
        Self {
            source,
            renderer,
            root,
        }
    }

    /// Materialize the tree under `source_dir` into the root.
    ///
    /// `skip` sees each file's destination path (rendered, suffix stripped);
    /// returning `true` leaves the file out entirely. Returns the destination
    /// paths of the files written, in walk order.
    #[instrument(skip_all, fields(source = %source_dir.display()))]
    pub fn materialize(
        &self,
        source_dir: &Path,
        context: &RenderContext,
        skip: &dyn Fn(&str) -> bool,
    ) -> GantryResult<Vec<String>> {
        let written = self.structure_pass(source_dir, context, skip)?;
        self.content_pass(&written, context)?;

        info!(files = written.len(), "template tree materialized");
        Ok(written)
    }

    /// Copy one template file to `dest` and render it in place.
    ///
    /// The source must exist; a missing file is `MissingTemplate`.
    pub fn copy_and_render(
        &self,
        source_file: &Path,
        dest: &str,
        context: &RenderContext,
    ) -> GantryResult<()> {
        if !self.source.exists(source_file) {
            return Err(ApplicationError::MissingTemplate {
                name: dest.to_string(),
                expected: source_file.to_path_buf(),
            }
            .into());
        }

        let raw = self.source.read(source_file)?;
        self.write_with_parents(dest, &raw)?;
        self.render_in_place(dest, context)
    }

    /// Re-render the file at `rel` with its current content as the template.
    pub fn render_in_place(&self, rel: &str, context: &RenderContext) -> GantryResult<()> {
        let raw = self.root.read(rel)?;
        let Ok(text) = String::from_utf8(raw) else {
            debug!(path = %rel, "not UTF-8, left verbatim");
            return Ok(());
        };

        let rendered = self
            .renderer
            .render(rel, &text, context)
            .with_context(|| format!("failed template render of '{rel}'"))?;
        self.root.write(rel, rendered.as_bytes())
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn structure_pass(
        &self,
        source_dir: &Path,
        context: &RenderContext,
        skip: &dyn Fn(&str) -> bool,
    ) -> GantryResult<Vec<String>> {
        let mut written = Vec::new();

        for entry in self.source.walk(source_dir)? {
            let entry = entry?;
            let rendered = self
                .renderer
                .render(&entry.rel_path, &entry.rel_path, context)
                .with_context(|| format!("failed to render path '{}'", entry.rel_path))?;

            if entry.is_dir {
                self.root.ensure_dir(&rendered)?;
                continue;
            }

            let dest = strip_template_suffix(&rendered);
            if skip(dest) {
                debug!(path = %dest, "skipped");
                continue;
            }

            let raw = self.source.read(&entry.source)?;
            self.write_with_parents(dest, &raw)?;
            debug!(path = %dest, bytes = raw.len(), "copied");
            written.push(dest.to_string());
        }

        Ok(written)
    }

    fn content_pass(&self, written: &[String], context: &RenderContext) -> GantryResult<()> {
        for rel in written {
            self.render_in_place(rel, context)?;
        }
        Ok(())
    }

    fn write_with_parents(&self, dest: &str, content: &[u8]) -> GantryResult<()> {
        let parent = SafePath::parse(dest)?.parent();
        self.root.ensure_dir(&parent.to_string())?;
        self.root.write(dest, content)
    }
}

/// `foo.go.tmpl` becomes `foo.go`; anything else is unchanged.
pub fn strip_template_suffix(path: &str) -> &str {
    path.strip_suffix(TEMPLATE_SUFFIX).unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{FakeRenderer, FakeRoot, FakeSource};
    use crate::domain::DomainError;
    use crate::error::GantryError;
    use serde_json::json;

    fn ctx() -> RenderContext {
        RenderContext::from_serialize(&json!({
            "project_name": "Foo",
            "lower_project_name": "foo",
        }))
        .unwrap()
    }

    #[test]
    fn renders_paths_then_contents() {
        let source = FakeSource::new()
            .dir("cmd")
            .dir("cmd/{{ lower_project_name }}")
            .file(
                "cmd/{{ lower_project_name }}/main.go",
                "package main // {{ project_name }}",
            );
        let root = FakeRoot::new();
        let walker = TemplateWalker::new(&source, &FakeRenderer, &root);

        let written = walker.materialize(Path::new("src"), &ctx(), &|_| false).unwrap();

        assert_eq!(written, ["cmd/foo/main.go"]);
        assert_eq!(root.text("cmd/foo/main.go").unwrap(), "package main // Foo");
        assert!(root.has_dir("cmd/foo"));
    }

    #[test]
    fn strips_template_suffix() {
        let source = FakeSource::new().file("README.md.tmpl", "# {{ project_name }}");
        let root = FakeRoot::new();
        TemplateWalker::new(&source, &FakeRenderer, &root)
            .materialize(Path::new("src"), &ctx(), &|_| false)
            .unwrap();

        assert_eq!(root.text("README.md").unwrap(), "# Foo");
        assert!(root.text("README.md.tmpl").is_none());
    }

    #[test]
    fn skipped_files_are_never_created() {
        let source = FakeSource::new()
            .file("a_test.go", "a")
            .file("suite_test.go", "b");
        let root = FakeRoot::new();
        let written = TemplateWalker::new(&source, &FakeRenderer, &root)
            .materialize(Path::new("src"), &ctx(), &|p| p.ends_with("suite_test.go"))
            .unwrap();

        assert_eq!(written, ["a_test.go"]);
        assert!(root.text("suite_test.go").is_none());
    }

    #[test]
    fn unterminated_path_aborts_before_writing() {
        let source = FakeSource::new()
            .dir("{{ name")
            .file("{{ name/x.txt", "x");
        let root = FakeRoot::new();
        let err = TemplateWalker::new(&source, &FakeRenderer, &root)
            .materialize(Path::new("src"), &ctx(), &|_| false)
            .unwrap_err();

        assert!(err.to_string().contains("failed to render path"));
        assert!(matches!(
            err.as_application(),
            Some(ApplicationError::TemplateParse { .. })
        ));
        assert!(root.is_empty());
    }

    #[test]
    fn escaping_path_is_rejected() {
        let source = FakeSource::new().file("{{ project_name }}/../../evil", "x");
        let root = FakeRoot::new();
        let err = TemplateWalker::new(&source, &FakeRenderer, &root)
            .materialize(Path::new("src"), &ctx(), &|_| false)
            .unwrap_err();

        assert!(matches!(
            err.root(),
            GantryError::Domain(DomainError::PathEscape { .. })
        ));
        assert!(root.is_empty());
    }

    #[test]
    fn content_error_names_the_file() {
        let source = FakeSource::new().file("a.txt", "{{ missing }}");
        let root = FakeRoot::new();
        let err = TemplateWalker::new(&source, &FakeRenderer, &root)
            .materialize(Path::new("src"), &ctx(), &|_| false)
            .unwrap_err();

        assert!(err.to_string().contains("failed template render of 'a.txt'"));
        assert!(matches!(
            err.as_application(),
            Some(ApplicationError::TemplateExecution { .. })
        ));
        // pass 1 already wrote the raw bytes
        assert_eq!(root.text("a.txt").unwrap(), "{{ missing }}");
    }

    #[test]
    fn only_files_of_this_walk_are_rendered() {
        let root = FakeRoot::new();
        root.put("other.txt", "{{ not_in_this_context }}");
        let source = FakeSource::new().file("mine.txt", "{{ project_name }}");

        TemplateWalker::new(&source, &FakeRenderer, &root)
            .materialize(Path::new("src"), &ctx(), &|_| false)
            .unwrap();

        assert_eq!(root.text("other.txt").unwrap(), "{{ not_in_this_context }}");
        assert_eq!(root.text("mine.txt").unwrap(), "Foo");
    }

    #[test]
    fn copy_and_render_requires_source() {
        let source = FakeSource::new();
        let root = FakeRoot::new();
        let err = TemplateWalker::new(&source, &FakeRenderer, &root)
            .copy_and_render(Path::new("src/Makefile.tmpl"), "Makefile", &ctx())
            .unwrap_err();

        assert!(matches!(
            err.as_application(),
            Some(ApplicationError::MissingTemplate { .. })
        ));
    }

    #[test]
    fn copy_and_render_creates_parents() {
        let source = FakeSource::new().file("scripts/lint.sh.tmpl", "echo {{ project_name }}");
        let root = FakeRoot::new();
        TemplateWalker::new(&source, &FakeRenderer, &root)
            .copy_and_render(
                Path::new("src/scripts/lint.sh.tmpl"),
                "scripts/lint.sh",
                &ctx(),
            )
            .unwrap();

        assert!(root.has_dir("scripts"));
        assert_eq!(root.text("scripts/lint.sh").unwrap(), "echo Foo");
    }

    #[test]
    fn root_write_failure_propagates() {
        use crate::application::ports::MockOutputRoot;

        let mut root = MockOutputRoot::new();
        root.expect_ensure_dir().returning(|_| Ok(()));
        root.expect_write().times(1).returning(|rel, _| {
            Err(ApplicationError::FilesystemError {
                path: rel.into(),
                reason: "disk full".into(),
            }
            .into())
        });
        root.expect_read().never();

        let source = FakeSource::new().file("a.txt", "x");
        let err = TemplateWalker::new(&source, &FakeRenderer, &root)
            .materialize(Path::new("src"), &ctx(), &|_| false)
            .unwrap_err();

        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn suffix_only_stripped_at_end() {
        assert_eq!(strip_template_suffix("a.tmpl"), "a");
        assert_eq!(strip_template_suffix("a.tmpl.bak"), "a.tmpl.bak");
    }
}
