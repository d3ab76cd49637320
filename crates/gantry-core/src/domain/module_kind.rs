//! The closed set of generation modules.
//!
//! # Adding a module
//!
//! 1. Add the variant here, with its `as_str` and `FromStr` arms
//! 2. Add its configuration record to `config.rs` and a `ModuleConfig` arm
//! 3. Add the construction arm in `Gantry::build_module`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

/// A known generation module.
///
/// The declaration order is also the main-phase run order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    BaseProject,
    BaseLint,
    BaseLocal,
    BaseTest,
}

impl ModuleKind {
    /// Modules that run before everything else.
    pub const PRIOR: &'static [ModuleKind] = &[ModuleKind::BaseProject];

    /// Modules that run after everything else.
    pub const SUBSEQUENT: &'static [ModuleKind] = &[ModuleKind::BaseLocal];

    pub const ALL: [ModuleKind; 4] = [
        ModuleKind::BaseProject,
        ModuleKind::BaseLint,
        ModuleKind::BaseLocal,
        ModuleKind::BaseTest,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BaseProject => "base_project",
            Self::BaseLint => "base_lint",
            Self::BaseLocal => "base_local",
            Self::BaseTest => "base_test",
        }
    }

    /// Whether this module belongs to the main phase.
    pub fn is_main_phase(self) -> bool {
        !Self::PRIOR.contains(&self) && !Self::SUBSEQUENT.contains(&self)
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "base_project" => Ok(Self::BaseProject),
            "base_lint" => Ok(Self::BaseLint),
            "base_local" => Ok(Self::BaseLocal),
            "base_test" => Ok(Self::BaseTest),
            other => Err(DomainError::UnknownModuleIdentifier {
                id: other.to_string(),
            }),
        }
    }
}
