//! Infrastructure adapters for Gantry.
//!
//! This crate implements the ports defined in `gantry-core::application::ports`.
//! It contains all filesystem access and the template engine.

pub mod filesystem;
pub mod renderer;
pub mod template_source;

// Re-export commonly used adapters
pub use filesystem::{LocalRoot, LocalRootOpener, MemoryRoot, MemoryRootOpener};
pub use renderer::MiniJinjaRenderer;
pub use template_source::DirTemplateSource;
