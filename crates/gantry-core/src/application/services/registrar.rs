//! In-memory aggregation of script contributions.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use tracing::debug;

use crate::{
    application::{ApplicationError, modules::ScriptRegistrar},
    domain::{RenderContext, ScriptChannel},
    error::GantryResult,
};

/// Lines keyed by contributor, sorted for stable output.
pub type LineGroups = BTreeMap<String, Vec<String>>;

/// The view templates of the local scripts module render against.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScriptBook {
    pub project_name: String,
    pub make_scripts: LineGroups,
    pub task_scripts: LineGroups,
    pub commit_scripts: LineGroups,
    /// File name → commands.
    pub script_files: LineGroups,
}

impl ScriptBook {
    fn lines_mut(&mut self, channel: ScriptChannel) -> &mut LineGroups {
        match channel {
            ScriptChannel::Make => &mut self.make_scripts,
            ScriptChannel::Task => &mut self.task_scripts,
            ScriptChannel::Commit => &mut self.commit_scripts,
            ScriptChannel::Script => &mut self.script_files,
        }
    }
}

#[derive(Debug, Default)]
struct RegistryState {
    active: BTreeSet<ScriptChannel>,
    book: ScriptBook,
}

/// Collects line groups and script files for the channels its owner activated.
///
/// One instance lives for one run; it is shared between its owning module
/// and every contributor through `Arc<dyn ScriptRegistrar>`.
#[derive(Debug, Default)]
pub struct ScriptRegistry {
    state: Mutex<RegistryState>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set which channels accept contributions. Recorded entries are kept.
    pub fn activate(
        &self,
        project_name: &str,
        channels: impl IntoIterator<Item = ScriptChannel>,
    ) -> GantryResult<()> {
        let mut state = self.lock()?;
        state.active = channels.into_iter().collect();
        state.book.project_name = project_name.to_string();
        Ok(())
    }

    pub fn is_active(&self, channel: ScriptChannel) -> GantryResult<bool> {
        Ok(self.lock()?.active.contains(&channel))
    }

    /// Snapshot of everything recorded so far.
    pub fn book(&self) -> GantryResult<ScriptBook> {
        Ok(self.lock()?.book.clone())
    }

    pub fn context(&self) -> GantryResult<RenderContext> {
        RenderContext::from_serialize(&self.book()?)
    }

    /// Names of the registered standalone scripts, sorted.
    pub fn script_file_names(&self) -> GantryResult<Vec<String>> {
        Ok(self.lock()?.book.script_files.keys().cloned().collect())
    }

    fn lock(&self) -> GantryResult<MutexGuard<'_, RegistryState>> {
        self.state
            .lock()
            .map_err(|_| ApplicationError::RegistrarLockError.into())
    }
}

impl ScriptRegistrar for ScriptRegistry {
    fn register_lines(&self, module_id: &str, lines: &[String]) -> GantryResult<()> {
        let mut state = self.lock()?;
        let channels: Vec<_> = state
            .active
            .iter()
            .copied()
            .filter(ScriptChannel::takes_lines)
            .collect();

        // Check every channel before touching any, so a rejection leaves no trace.
        for &channel in &channels {
            if state.book.lines_mut(channel).contains_key(module_id) {
                return Err(ApplicationError::DuplicateRegistration {
                    what: "service",
                    key: module_id.to_string(),
                    scope: Some(channel.as_str()),
                }
                .into());
            }
        }
        for &channel in &channels {
            state
                .book
                .lines_mut(channel)
                .insert(module_id.to_string(), lines.to_vec());
        }

        debug!(module = %module_id, channels = channels.len(), "lines registered");
        Ok(())
    }

    fn register_file(&self, file_name: &str, lines: &[String]) -> GantryResult<()> {
        let mut state = self.lock()?;
        if !state.active.contains(&ScriptChannel::Script) {
            return Ok(());
        }

        let files = state.book.lines_mut(ScriptChannel::Script);
        if files.contains_key(file_name) {
            return Err(ApplicationError::DuplicateRegistration {
                what: "file",
                key: file_name.to_string(),
                scope: Some("scripts"),
            }
            .into());
        }
        files.insert(file_name.to_string(), lines.to_vec());

        debug!(file = %file_name, "script file registered");
        Ok(())
    }
}
