//! One module per subcommand. Handlers translate arguments into calls on the
//! core and print the results; no generation logic lives here.

pub mod completions;
pub mod generate;
pub mod validate;

use std::sync::Arc;

use gantry_adapters::{DirTemplateSource, MiniJinjaRenderer};
use gantry_core::application::{
    Gantry,
    ports::{RootOpener, TemplateRenderer, TemplateSource},
};

use crate::config::LoadedConfig;

/// Wire the loaded configuration to the production template adapters.
pub(crate) fn build_app(loaded: LoadedConfig, opener: Arc<dyn RootOpener>) -> Gantry {
    let source: Arc<dyn TemplateSource> = Arc::new(DirTemplateSource::new());
    let renderer: Arc<dyn TemplateRenderer> = Arc::new(MiniJinjaRenderer::new());
    Gantry::new(loaded.boot, loaded.configs, opener, source, renderer)
}
