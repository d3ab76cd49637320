//! Template trees read from directories on disk.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use gantry_core::{
    application::{
        ApplicationError,
        ports::{TemplateEntry, TemplateSource},
    },
    error::GantryResult,
};

/// Reads template trees with `walkdir`, depth-first and sorted by name.
///
/// Entries are produced one at a time; file contents are only read when
/// the walker asks for them. Symlinks and other special files are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirTemplateSource;

impl DirTemplateSource {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateSource for DirTemplateSource {
    fn walk<'a>(
        &'a self,
        dir: &Path,
    ) -> GantryResult<Box<dyn Iterator<Item = GantryResult<TemplateEntry>> + 'a>> {
        if !dir.is_dir() {
            return Err(ApplicationError::MissingTemplate {
                name: dir.display().to_string(),
                expected: dir.to_path_buf(),
            }
            .into());
        }

        let base: PathBuf = dir.to_path_buf();
        let walk = WalkDir::new(dir)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => return Some(Err(walk_error(&base, e))),
                };
                let file_type = entry.file_type();
                if !file_type.is_dir() && !file_type.is_file() {
                    return None;
                }
                Some(to_entry(&base, entry.path(), file_type.is_dir()))
            });
        Ok(Box::new(walk))
    }

    fn read(&self, path: &Path) -> GantryResult<Vec<u8>> {
        fs::read(path).map_err(|e| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: format!("Failed to read template: {e}"),
            }
            .into()
        })
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

fn to_entry(base: &Path, path: &Path, is_dir: bool) -> GantryResult<TemplateEntry> {
    let rel = path.strip_prefix(base).map_err(|_| ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("not under {}", base.display()),
    })?;
    // forward slashes everywhere, so rendered names are platform neutral
    let rel_path = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    Ok(TemplateEntry {
        rel_path,
        source: path.to_path_buf(),
        is_dir,
    })
}

fn walk_error(base: &Path, e: walkdir::Error) -> gantry_core::error::GantryError {
    ApplicationError::FilesystemError {
        path: e.path().unwrap_or(base).to_path_buf(),
        reason: format!("directory walk error: {e}"),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn walks_depth_first_in_name_order() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("b/inner")).unwrap();
        fs::write(dir.path().join("b/inner/z.txt"), "z").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("c.txt"), "c").unwrap();

        let source = DirTemplateSource::new();
        let entries: Vec<_> = source
            .walk(dir.path())
            .unwrap()
            .map(|e| e.unwrap())
            .map(|e| (e.rel_path, e.is_dir))
            .collect();

        assert_eq!(
            entries,
            [
                ("a.txt".to_string(), false),
                ("b".to_string(), true),
                ("b/inner".to_string(), true),
                ("b/inner/z.txt".to_string(), false),
                ("c.txt".to_string(), false),
            ]
        );
    }

    #[test]
    fn missing_tree_is_missing_template() {
        let dir = TempDir::new().unwrap();
        let err = DirTemplateSource::new()
            .walk(&dir.path().join("nope"))
            .err()
            .unwrap();
        assert!(matches!(
            err.as_application(),
            Some(ApplicationError::MissingTemplate { .. })
        ));
    }

    #[test]
    fn exists_only_for_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Makefile.tmpl"), "x").unwrap();
        let source = DirTemplateSource::new();

        assert!(source.exists(&dir.path().join("Makefile.tmpl")));
        assert!(!source.exists(dir.path()));
        assert_eq!(source.read(&dir.path().join("Makefile.tmpl")).unwrap(), b"x");
    }
}
