//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `gantry-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `OutputRoot`: Confined file operations
//!   - `RootOpener`: Creates output roots
//!   - `TemplateSource`: Template tree walking and reading
//!   - `TemplateRenderer`: Template rendering
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - The `Gantry` facade (`register_services`, `run_services`)

pub mod output;

pub use output::{OutputRoot, RootOpener, TemplateEntry, TemplateRenderer, TemplateSource};

#[cfg(test)]
pub use output::{MockOutputRoot, MockRootOpener, MockTemplateRenderer};
