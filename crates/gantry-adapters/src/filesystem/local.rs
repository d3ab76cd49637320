//! Output root on the local disk, using std::fs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use gantry_core::{
    application::{
        ApplicationError,
        ports::{OutputRoot, RootOpener},
    },
    domain::{DomainError, SafePath},
    error::{GantryError, GantryResult},
};

const DIR_MODE: u32 = 0o755;
const EXEC_MODE: u32 = 0o755;

/// Production output root confined to one directory.
///
/// Paths are checked twice: lexically by [`SafePath`] before any syscall,
/// and against the canonical root after symlinks are resolved.
#[derive(Debug, Clone)]
pub struct LocalRoot {
    root: PathBuf,
}

impl LocalRoot {
    /// Create `base/name` (and parents) if needed and open it.
    pub fn open(base: &Path, name: &str) -> GantryResult<Self> {
        let name = SafePath::parse(name)?;
        let dir = name.to_path(base);
        create_dir(&dir)?;

        let root = dir
            .canonicalize()
            .map_err(|e| map_io_error(&dir, e, "resolve output root"))?;
        debug!(root = %root.display(), "output root opened");
        Ok(Self { root })
    }

    fn resolve(&self, rel: &str) -> GantryResult<(SafePath, PathBuf)> {
        let path = SafePath::parse(rel)?;
        let full = path.to_path(&self.root);
        Ok((path, full))
    }

    /// Reject targets whose existing ancestor resolves outside the root.
    ///
    /// Links count as existing even when dangling, so a write can never
    /// follow one out of the root.
    fn confine(&self, rel: &str, full: &Path) -> GantryResult<()> {
        let mut probe = full;
        loop {
            match fs::symlink_metadata(probe) {
                Ok(_) => break,
                Err(e) if e.kind() == io::ErrorKind::NotFound => match probe.parent() {
                    Some(parent) => probe = parent,
                    None => return Ok(()),
                },
                Err(e) => return Err(map_io_error(probe, e, "inspect path")),
            }
        }
        let resolved = match probe.canonicalize() {
            Ok(resolved) => resolved,
            // dangling link
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(self.escape(rel)),
            Err(e) => return Err(map_io_error(probe, e, "resolve path")),
        };
        if !resolved.starts_with(&self.root) {
            return Err(self.escape(rel));
        }
        Ok(())
    }

    fn escape(&self, rel: &str) -> GantryError {
        warn!(path = %rel, root = %self.root.display(), "[SECURITY] path resolves outside the output root");
        DomainError::PathEscape {
            path: rel.to_string(),
        }
        .into()
    }
}

impl OutputRoot for LocalRoot {
    fn path(&self) -> &Path {
        &self.root
    }

    #[instrument(skip(self))]
    fn ensure_dir(&self, rel: &str) -> GantryResult<()> {
        let (path, _) = self.resolve(rel)?;

        // one segment at a time, so nothing is created outside the root
        let mut current = self.root.clone();
        for segment in path.segments() {
            current.push(segment);
            self.confine(rel, &current)?;
            if !current.is_dir() {
                create_dir(&current)?;
            }
        }
        Ok(())
    }

    fn write(&self, rel: &str, content: &[u8]) -> GantryResult<()> {
        let (_, full) = self.resolve(rel)?;
        self.confine(rel, &full)?;
        fs::write(&full, content).map_err(|e| map_io_error(&full, e, "write file"))
    }

    fn read(&self, rel: &str) -> GantryResult<Vec<u8>> {
        let (_, full) = self.resolve(rel)?;
        self.confine(rel, &full)?;
        fs::read(&full).map_err(|e| map_io_error(&full, e, "read file"))
    }

    fn exists(&self, rel: &str) -> GantryResult<bool> {
        let (_, full) = self.resolve(rel)?;
        self.confine(rel, &full)?;
        Ok(full.exists())
    }

    fn set_executable(&self, rel: &str) -> GantryResult<()> {
        let (_, full) = self.resolve(rel)?;
        self.confine(rel, &full)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&full, fs::Permissions::from_mode(EXEC_MODE))
                .map_err(|e| map_io_error(&full, e, "set permissions"))?;
        }
        #[cfg(not(unix))]
        {
            let _ = EXEC_MODE;
        }
        Ok(())
    }
}

/// Opens [`LocalRoot`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalRootOpener;

impl LocalRootOpener {
    pub fn new() -> Self {
        Self
    }
}

impl RootOpener for LocalRootOpener {
    fn open(&self, base: &Path, name: &str) -> GantryResult<Arc<dyn OutputRoot>> {
        Ok(Arc::new(LocalRoot::open(base, name)?))
    }
}

fn create_dir(path: &Path) -> GantryResult<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    #[cfg(not(unix))]
    {
        let _ = DIR_MODE;
    }
    builder
        .create(path)
        .map_err(|e| map_io_error(path, e, "create directory"))
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> GantryError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
