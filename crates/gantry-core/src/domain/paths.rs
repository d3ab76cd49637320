//! Paths relative to an output root, and lexical path comparison.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use tracing::warn;

use super::DomainError;

/// A cleaned path guaranteed to stay inside the directory it is joined to.
///
/// Invariant: no segment is `..`, no segment is empty or `.`, never absolute.
/// Enforced at construction. The empty path is the root itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SafePath(Vec<String>);

impl SafePath {
    /// Parse a path relative to an output root.
    ///
    /// Both `/` and `\` separate segments. Any `..` segment is rejected before
    /// cleaning, so `a/../b` fails even though it would clean to `b`.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let escapes = raw.starts_with('/')
            || raw.starts_with('\\')
            || Path::new(raw).is_absolute()
            || raw.split(['/', '\\']).any(|segment| segment == "..");

        if escapes {
            warn!(path = %raw, "[SECURITY] attempted directory escape");
            return Err(DomainError::PathEscape {
                path: raw.to_string(),
            });
        }

        let segments = raw
            .split(['/', '\\'])
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .map(str::to_string)
            .collect();

        Ok(Self(segments))
    }

    /// The root of the output tree.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The containing directory; the root's parent is the root.
    pub fn parent(&self) -> Self {
        let mut segments = self.0.clone();
        segments.pop();
        Self(segments)
    }

    pub fn file_name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Join onto a real directory.
    pub fn to_path(&self, base: &Path) -> PathBuf {
        self.0.iter().fold(base.to_path_buf(), |acc, s| acc.join(s))
    }
}

impl fmt::Display for SafePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str(".")
        } else {
            f.write_str(&self.0.join("/"))
        }
    }
}

/// Make `path` absolute against the working directory and clean it lexically.
///
/// Symlinks are not resolved; the path does not need to exist.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut cleaned = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other),
        }
    }
    cleaned
}

/// Whether two paths name the same location once normalized.
pub fn same_location(a: &Path, b: &Path) -> bool {
    normalize_path(a) == normalize_path(b)
}
