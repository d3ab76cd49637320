//! Application services - orchestrate use cases.
//!
//! The walker materializes template trees, the registrar collects script
//! contributions, the manager sequences modules and [`Gantry`] ties them
//! together for the CLI.

pub mod gantry;
pub mod manager;
pub mod registrar;
pub mod walker;

pub use gantry::Gantry;
pub use manager::{RunReport, ServiceManager};
pub use registrar::{ScriptBook, ScriptRegistry};
pub use walker::{TemplateWalker, strip_template_suffix};
