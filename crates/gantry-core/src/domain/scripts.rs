//! Output channels of the local scripts module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

/// Directory that standalone script files are written to.
pub const SCRIPT_DIR: &str = "scripts";

/// Standalone script contributed by the lint module.
pub const LINT_SCRIPT: &str = "lint.sh";

/// Standalone script contributed by the test module.
pub const TEST_SCRIPT: &str = "test.sh";

/// Suffix marking a source file as a template of the same name without it.
pub const TEMPLATE_SUFFIX: &str = ".tmpl";

/// A kind of generated developer tooling file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptChannel {
    /// `Makefile` targets.
    Make,
    /// `Taskfile.yml` tasks.
    Task,
    /// Standalone files under `scripts/`.
    Script,
    /// `.pre-commit-config.yaml` hooks.
    Commit,
}

impl ScriptChannel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Make => "make",
            Self::Task => "task",
            Self::Script => "script",
            Self::Commit => "commit",
        }
    }

    /// The single generated file of a line channel; `None` for `Script`.
    pub const fn output_file(&self) -> Option<&'static str> {
        match self {
            Self::Make => Some("Makefile"),
            Self::Task => Some("Taskfile.yml"),
            Self::Commit => Some(".pre-commit-config.yaml"),
            Self::Script => None,
        }
    }

    /// Whether this channel collects per-module line groups.
    pub const fn takes_lines(&self) -> bool {
        !matches!(self, Self::Script)
    }
}

impl fmt::Display for ScriptChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScriptChannel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "make" => Ok(Self::Make),
            "task" => Ok(Self::Task),
            "script" => Ok(Self::Script),
            "commit" => Ok(Self::Commit),
            other => Err(DomainError::InvalidConfigValue {
                module: "base_local",
                field: "file_list",
                reason: format!("unknown entry '{other}' (expected make, task, script or commit)"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_channels_have_one_file() {
        assert_eq!(ScriptChannel::Make.output_file(), Some("Makefile"));
        assert_eq!(ScriptChannel::Script.output_file(), None);
        assert!(!ScriptChannel::Script.takes_lines());
        assert!(ScriptChannel::Commit.takes_lines());
    }

    #[test]
    fn unknown_channel_is_rejected() {
        assert!(matches!(
            "docker".parse::<ScriptChannel>(),
            Err(DomainError::InvalidConfigValue { .. })
        ));
    }
}
