//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `gantry-adapters` crate provides implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::RenderContext;
use crate::error::GantryResult;

/// A directory handle that confines every operation to one subtree.
///
/// Implemented by:
/// - `gantry_adapters::filesystem::LocalRoot` (production)
/// - `gantry_adapters::filesystem::MemoryRoot` (dry runs and tests)
///
/// Every `rel` argument is parsed with [`crate::domain::SafePath::parse`]
/// before any I/O, so `..` and absolute paths fail with `PathEscape` and
/// nothing is touched.
#[cfg_attr(test, mockall::automock)]
pub trait OutputRoot: Send + Sync {
    /// The directory this root is confined to.
    fn path(&self) -> &Path;

    /// Create `rel` and any missing parents. Existing directories are fine;
    /// `""` and `"."` are no-ops.
    fn ensure_dir(&self, rel: &str) -> GantryResult<()>;

    /// Create or truncate the file at `rel`. The parent must exist.
    fn write(&self, rel: &str, content: &[u8]) -> GantryResult<()>;

    /// Read the whole file at `rel`.
    fn read(&self, rel: &str) -> GantryResult<Vec<u8>>;

    fn exists(&self, rel: &str) -> GantryResult<bool>;

    /// Mark the file at `rel` as a script (0755 where that means anything).
    fn set_executable(&self, rel: &str) -> GantryResult<()>;
}

/// Port for creating output roots.
#[cfg_attr(test, mockall::automock)]
pub trait RootOpener: Send + Sync {
    /// Create `base/name` if needed and return a root confined to it.
    fn open(&self, base: &Path, name: &str) -> GantryResult<Arc<dyn OutputRoot>>;
}

/// One node of a template tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    /// Path below the walked directory, `/`-separated, unrendered.
    pub rel_path: String,
    /// Where the entry lives on disk.
    pub source: PathBuf,
    pub is_dir: bool,
}

/// Port for reading template trees.
///
/// Implemented by:
/// - `gantry_adapters::template_source::DirTemplateSource`
pub trait TemplateSource: Send + Sync {
    /// Walk `dir` depth-first, parents before children, siblings by name.
    ///
    /// The iterator is lazy; each entry is produced on demand. `dir` itself
    /// is not yielded.
    fn walk<'a>(
        &'a self,
        dir: &Path,
    ) -> GantryResult<Box<dyn Iterator<Item = GantryResult<TemplateEntry>> + 'a>>;

    fn read(&self, path: &Path) -> GantryResult<Vec<u8>>;

    fn exists(&self, path: &Path) -> bool;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `gantry_adapters::renderer::MiniJinjaRenderer`
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    /// Render `template` against `context`.
    ///
    /// `name` only appears in error messages. Syntax errors are
    /// `TemplateParse`; failures while evaluating are `TemplateExecution`.
    fn render(&self, name: &str, template: &str, context: &RenderContext) -> GantryResult<String>;
}
