//! Gantry Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Gantry
//! project generator, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           gantry-cli (CLI)              │
//! │     (loads configs, drives Gantry)      │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   Gantry facade / ServiceManager        │
//! │   prior → main → subsequent phases      │
//! └──────────────────┬──────────────────────┘
//!                    │ runs
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   Generation modules + TemplateWalker   │
//! │   (project, lint, local, test)          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │  OutputRoot, TemplateSource, Renderer   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    gantry-adapters (Infrastructure)     │
//! │  LocalRoot, MemoryRoot, MiniJinja, ...  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gantry_core::prelude::*;
//!
//! let mut app = Gantry::new(boot, configs, opener, source, renderer);
//! app.register_services()?;
//! let report = app.run_services()?;
//! ```

pub mod application;
pub mod domain;
pub mod error;

/// Public API - what external crates should use.
pub mod prelude {
    pub use crate::application::{
        Gantry, GenerationModule, RunReport, ScriptRegistrar,
        ports::{OutputRoot, RootOpener, TemplateEntry, TemplateRenderer, TemplateSource},
    };
    pub use crate::domain::{
        BootConfig, ConfigRegistry, LintConfig, LocalConfig, ModuleConfig, ModuleKind,
        ProjectConfig, ProjectIdentity, RenderContext, SafePath, ServiceDeclaration, TestConfig,
    };
    pub use crate::error::{Context, ErrorCategory, GantryError, GantryResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
