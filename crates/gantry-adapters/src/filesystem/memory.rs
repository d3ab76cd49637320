//! In-memory output root for dry runs and tests.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, RwLock},
};

use gantry_core::{
    application::{
        ApplicationError,
        ports::{OutputRoot, RootOpener},
    },
    domain::SafePath,
    error::GantryResult,
};

/// Output root that never touches the disk.
///
/// Clones share the same contents.
#[derive(Debug, Clone)]
pub struct MemoryRoot {
    path: PathBuf,
    inner: Arc<RwLock<MemoryRootInner>>,
}

#[derive(Debug, Default)]
struct MemoryRootInner {
    files: BTreeMap<String, Vec<u8>>,
    directories: BTreeSet<String>,
    executables: BTreeSet<String>,
}

impl MemoryRoot {
    /// Create an empty root that reports `path` as its location.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            inner: Arc::new(RwLock::new(MemoryRootInner::default())),
        }
    }

    /// Read a file as text (testing helper).
    pub fn read_to_string(&self, rel: &str) -> Option<String> {
        let inner = self.inner.read().ok()?;
        let path = SafePath::parse(rel).ok()?;
        inner
            .files
            .get(&path.to_string())
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    /// Check if a file is marked executable.
    pub fn is_executable(&self, rel: &str) -> bool {
        let Ok(path) = SafePath::parse(rel) else {
            return false;
        };
        self.inner
            .read()
            .map(|inner| inner.executables.contains(&path.to_string()))
            .unwrap_or(false)
    }

    /// Every file written so far, sorted.
    pub fn list_files(&self) -> Vec<String> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Every directory created so far, sorted.
    pub fn list_dirs(&self) -> Vec<String> {
        self.inner
            .read()
            .map(|inner| inner.directories.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn lock_error() -> ApplicationError {
        ApplicationError::FilesystemError {
            path: PathBuf::from("<memory>"),
            reason: "memory root lock poisoned".into(),
        }
    }
}

impl OutputRoot for MemoryRoot {
    fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_dir(&self, rel: &str) -> GantryResult<()> {
        let path = SafePath::parse(rel)?;
        let mut inner = self.inner.write().map_err(|_| Self::lock_error())?;

        let mut current: Vec<&str> = Vec::new();
        for segment in path.segments() {
            current.push(segment.as_str());
            inner.directories.insert(current.join("/"));
        }
        Ok(())
    }

    fn write(&self, rel: &str, content: &[u8]) -> GantryResult<()> {
        let path = SafePath::parse(rel)?;
        let mut inner = self.inner.write().map_err(|_| Self::lock_error())?;

        let parent = path.parent();
        if !parent.is_root() && !inner.directories.contains(&parent.to_string()) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path(&self.path),
                reason: "Parent directory does not exist".into(),
            }
            .into());
        }

        inner.files.insert(path.to_string(), content.to_vec());
        Ok(())
    }

    fn read(&self, rel: &str) -> GantryResult<Vec<u8>> {
        let path = SafePath::parse(rel)?;
        let inner = self.inner.read().map_err(|_| Self::lock_error())?;
        inner.files.get(&path.to_string()).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path(&self.path),
                reason: "No such file".into(),
            }
            .into()
        })
    }

    fn exists(&self, rel: &str) -> GantryResult<bool> {
        let path = SafePath::parse(rel)?;
        if path.is_root() {
            return Ok(true);
        }
        let key = path.to_string();
        let inner = self.inner.read().map_err(|_| Self::lock_error())?;
        Ok(inner.files.contains_key(&key) || inner.directories.contains(&key))
    }

    fn set_executable(&self, rel: &str) -> GantryResult<()> {
        let path = SafePath::parse(rel)?;
        let mut inner = self.inner.write().map_err(|_| Self::lock_error())?;
        let key = path.to_string();
        if !inner.files.contains_key(&key) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path(&self.path),
                reason: "No such file".into(),
            }
            .into());
        }
        inner.executables.insert(key);
        Ok(())
    }
}

/// Hands out one shared [`MemoryRoot`] and remembers it for inspection.
#[derive(Debug, Default)]
pub struct MemoryRootOpener {
    opened: Mutex<Option<MemoryRoot>>,
}

impl MemoryRootOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// The root handed out by `open`, if it was called.
    pub fn root(&self) -> Option<MemoryRoot> {
        self.opened.lock().ok().and_then(|r| r.as_ref().cloned())
    }
}

impl RootOpener for MemoryRootOpener {
    fn open(&self, base: &Path, name: &str) -> GantryResult<Arc<dyn OutputRoot>> {
        let name = SafePath::parse(name)?;
        let mut opened = self
            .opened
            .lock()
            .map_err(|_| MemoryRoot::lock_error())?;
        let root = opened
            .get_or_insert_with(|| MemoryRoot::new(name.to_path(base)))
            .clone();
        Ok(Arc::new(root))
    }
}
