//! Application layer for Gantry.
//!
//! This layer contains:
//! - **Ports**: Interface definitions (traits) for the filesystem and renderer
//! - **Services**: The two-pass walker, script registrar, service manager and
//!   the [`Gantry`] facade
//! - **Modules**: The four generation modules
//! - **Errors**: Application-specific error types
//!
//! Nothing here touches the disk or a template engine directly; adapters
//! behind the ports do.

pub mod error;
pub mod modules;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use error::ApplicationError;
pub use modules::{GenerationModule, ScriptReceiver, ScriptRegistrar, Workspace};
pub use ports::{OutputRoot, RootOpener, TemplateEntry, TemplateRenderer, TemplateSource};
pub use services::{Gantry, RunReport, ScriptRegistry, ServiceManager, TemplateWalker};
