//! Three-phase module orchestration.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{info, info_span, instrument};

use crate::{
    application::{ApplicationError, modules::GenerationModule},
    domain::{ConfigRegistry, ModuleKind},
    error::{Context, GantryResult},
};

/// Outcome of one orchestrated run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Modules that ran, in execution order.
    pub ran: Vec<ModuleKind>,
    /// Registered modules without configuration.
    pub skipped: Vec<ModuleKind>,
}

/// Owns the registered modules of one run and sequences them.
///
/// Phases: assign configs, run [`ModuleKind::PRIOR`], run everything else
/// in kind order, run [`ModuleKind::SUBSEQUENT`]. A module without config
/// is skipped in every phase.
#[derive(Default)]
pub struct ServiceManager {
    modules: BTreeMap<ModuleKind, Box<dyn GenerationModule>>,
}

impl ServiceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module. A second module of the same kind is rejected.
    pub fn register(&mut self, module: Box<dyn GenerationModule>) -> GantryResult<()> {
        let kind = module.kind();
        if self.modules.contains_key(&kind) {
            return Err(ApplicationError::DuplicateRegistration {
                what: "module",
                key: kind.to_string(),
                scope: None,
            }
            .into());
        }
        self.modules.insert(kind, module);
        Ok(())
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.modules.values().map(|m| m.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    #[instrument(skip_all, fields(modules = self.modules.len()))]
    pub fn run_all(&mut self, configs: &ConfigRegistry) -> GantryResult<RunReport> {
        let mut report = RunReport::default();
        let configured = self.assign(configs, &mut report)?;

        for kind in ModuleKind::PRIOR {
            self.run_one(*kind, &configured, &mut report)?;
        }

        let main: Vec<_> = configured
            .iter()
            .copied()
            .filter(|k| k.is_main_phase())
            .collect();
        for kind in main {
            self.inject_registrar(kind);
            self.run_one(kind, &configured, &mut report)?;
        }

        for kind in ModuleKind::SUBSEQUENT {
            self.run_one(*kind, &configured, &mut report)?;
        }

        info!(ran = report.ran.len(), skipped = report.skipped.len(), "all services finished");
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn assign(
        &mut self,
        configs: &ConfigRegistry,
        report: &mut RunReport,
    ) -> GantryResult<BTreeSet<ModuleKind>> {
        let mut configured = BTreeSet::new();
        for (kind, module) in &mut self.modules {
            match configs.get(*kind) {
                Some(config) => {
                    module
                        .set_config(config)
                        .with_context(|| format!("{kind}: failed to assign configuration"))?;
                    configured.insert(*kind);
                }
                None => {
                    info!(service = %kind, "service skipped (no configuration loaded)");
                    report.skipped.push(*kind);
                }
            }
        }
        Ok(configured)
    }

    fn inject_registrar(&mut self, kind: ModuleKind) {
        let Some(registrar) = self.modules.values().find_map(|m| m.script_registrar()) else {
            return;
        };
        if let Some(receiver) = self
            .modules
            .get_mut(&kind)
            .and_then(|m| m.as_script_receiver())
        {
            receiver.set_script_registrar(registrar);
        }
    }

    fn run_one(
        &mut self,
        kind: ModuleKind,
        configured: &BTreeSet<ModuleKind>,
        report: &mut RunReport,
    ) -> GantryResult<()> {
        if !configured.contains(&kind) {
            return Ok(());
        }
        let Some(module) = self.modules.get_mut(&kind) else {
            return Ok(());
        };

        let _span = info_span!("service", id = %kind).entered();
        info!("running service");
        module
            .run()
            .with_context(|| format!("{kind} failed"))?;
        report.ran.push(kind);
        Ok(())
    }
}
