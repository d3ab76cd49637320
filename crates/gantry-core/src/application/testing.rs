//! In-memory port implementations for unit tests.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::{
    application::{
        ApplicationError,
        ports::{OutputRoot, RootOpener, TemplateEntry, TemplateRenderer, TemplateSource},
    },
    domain::{RenderContext, SafePath},
    error::GantryResult,
};

const SOURCE_BASE: &str = "src";

/// Template tree rooted at `src/`, built entry by entry in walk order.
#[derive(Default)]
pub struct FakeSource {
    entries: Vec<(String, Option<Vec<u8>>)>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dir(mut self, rel: &str) -> Self {
        self.entries.push((rel.to_string(), None));
        self
    }

    pub fn file(mut self, rel: &str, content: &str) -> Self {
        self.entries
            .push((rel.to_string(), Some(content.as_bytes().to_vec())));
        self
    }

    fn lookup(&self, path: &Path) -> Option<&Vec<u8>> {
        let rel = path.strip_prefix(SOURCE_BASE).ok()?;
        self.entries
            .iter()
            .find(|(r, c)| c.is_some() && Path::new(r) == rel)
            .and_then(|(_, c)| c.as_ref())
    }
}

impl TemplateSource for FakeSource {
    fn walk<'a>(
        &'a self,
        _dir: &Path,
    ) -> GantryResult<Box<dyn Iterator<Item = GantryResult<TemplateEntry>> + 'a>> {
        Ok(Box::new(self.entries.iter().map(|(rel, content)| {
            Ok(TemplateEntry {
                rel_path: rel.clone(),
                source: Path::new(SOURCE_BASE).join(rel),
                is_dir: content.is_none(),
            })
        })))
    }

    fn read(&self, path: &Path) -> GantryResult<Vec<u8>> {
        self.lookup(path).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "no such template".into(),
            }
            .into()
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.lookup(path).is_some()
    }
}

/// Replaces `{{ key }}` with top-level string or number fields.
///
/// An unterminated `{{` is a parse error; an unknown key is an execution error.
pub struct FakeRenderer;

impl TemplateRenderer for FakeRenderer {
    fn render(&self, name: &str, template: &str, context: &RenderContext) -> GantryResult<String> {
        let mut out = String::new();
        let mut rest = template;
        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                return Err(ApplicationError::TemplateParse {
                    name: name.to_string(),
                    reason: "unexpected end of input".into(),
                }
                .into());
            };
            let key = after[..end].trim();
            let value = match context.get(key) {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(serde_json::Value::Number(n)) => n.to_string(),
                _ => {
                    return Err(ApplicationError::TemplateExecution {
                        name: name.to_string(),
                        reason: format!("undefined value '{key}'"),
                    }
                    .into());
                }
            };
            out.push_str(&value);
            rest = &after[end + 2..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

#[derive(Default)]
struct RootState {
    dirs: BTreeSet<String>,
    files: BTreeMap<String, Vec<u8>>,
    executables: BTreeSet<String>,
}

/// Output root kept in memory. Writes require the parent directory.
pub struct FakeRoot {
    path: PathBuf,
    state: Mutex<RootState>,
}

impl FakeRoot {
    pub fn new() -> Self {
        Self {
            path: PathBuf::from("/fake/out/Foo"),
            state: Mutex::new(RootState::default()),
        }
    }

    /// Seed a file, bypassing the parent check.
    pub fn put(&self, rel: &str, content: &str) {
        self.state
            .lock()
            .unwrap()
            .files
            .insert(rel.to_string(), content.as_bytes().to_vec());
    }

    pub fn text(&self, rel: &str) -> Option<String> {
        let state = self.state.lock().unwrap();
        state
            .files
            .get(rel)
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    pub fn has_dir(&self, rel: &str) -> bool {
        self.state.lock().unwrap().dirs.contains(rel)
    }

    pub fn is_executable(&self, rel: &str) -> bool {
        self.state.lock().unwrap().executables.contains(rel)
    }

    pub fn is_empty(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.dirs.is_empty() && state.files.is_empty()
    }
}

impl OutputRoot for FakeRoot {
    fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_dir(&self, rel: &str) -> GantryResult<()> {
        let path = SafePath::parse(rel)?;
        let mut state = self.state.lock().unwrap();
        let mut current = Vec::new();
        for segment in path.segments() {
            current.push(segment.as_str());
            state.dirs.insert(current.join("/"));
        }
        Ok(())
    }

    fn write(&self, rel: &str, content: &[u8]) -> GantryResult<()> {
        let path = SafePath::parse(rel)?;
        let parent = path.parent();
        let mut state = self.state.lock().unwrap();
        if !parent.is_root() && !state.dirs.contains(&parent.to_string()) {
            return Err(ApplicationError::FilesystemError {
                path: rel.into(),
                reason: "parent directory missing".into(),
            }
            .into());
        }
        state.files.insert(path.to_string(), content.to_vec());
        Ok(())
    }

    fn read(&self, rel: &str) -> GantryResult<Vec<u8>> {
        let path = SafePath::parse(rel)?;
        self.state
            .lock()
            .unwrap()
            .files
            .get(&path.to_string())
            .cloned()
            .ok_or_else(|| {
                ApplicationError::FilesystemError {
                    path: rel.into(),
                    reason: "no such file".into(),
                }
                .into()
            })
    }

    fn exists(&self, rel: &str) -> GantryResult<bool> {
        let path = SafePath::parse(rel)?.to_string();
        let state = self.state.lock().unwrap();
        Ok(state.files.contains_key(&path) || state.dirs.contains(&path))
    }

    fn set_executable(&self, rel: &str) -> GantryResult<()> {
        let path = SafePath::parse(rel)?;
        self.state
            .lock()
            .unwrap()
            .executables
            .insert(path.to_string());
        Ok(())
    }
}

/// Hands out one shared `FakeRoot`.
pub struct FakeOpener {
    pub root: Arc<FakeRoot>,
}

impl FakeOpener {
    pub fn new() -> Self {
        Self {
            root: Arc::new(FakeRoot::new()),
        }
    }
}

impl RootOpener for FakeOpener {
    fn open(&self, _base: &Path, _name: &str) -> GantryResult<Arc<dyn OutputRoot>> {
        Ok(self.root.clone())
    }
}
