//! Jinja2 rendering via MiniJinja.

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use tracing::trace;

use gantry_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::{RenderContext, text},
    error::GantryResult,
};

/// MiniJinja-based template rendering engine.
///
/// Undefined values are errors, output is never escaped and trailing
/// newlines survive, so a template without tags renders to itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct MiniJinjaRenderer;

impl MiniJinjaRenderer {
    pub fn new() -> Self {
        Self
    }

    fn environment<'s>() -> Environment<'s> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);

        env.add_function("indent", |spaces: i64, value: String| {
            text::indent(spaces, &value)
        });
        env.add_function("oneLine", |value: String| text::one_line(&value));
        env.add_function("one_line", |value: String| text::one_line(&value));
        env.add_function("replace", |old: String, new: String, value: String| {
            text::replace(&old, &new, &value)
        });
        env.add_filter("one_line", |value: String| text::one_line(&value));
        env
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, name: &str, template: &str, context: &RenderContext) -> GantryResult<String> {
        let env = Self::environment();

        let tmpl = env
            .template_from_named_str(name, template)
            .map_err(|e| ApplicationError::TemplateParse {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        let rendered = tmpl
            .render(context.as_value())
            .map_err(|e| ApplicationError::TemplateExecution {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        trace!(template = %name, bytes = rendered.len(), "rendered");
        Ok(rendered)
    }
}
