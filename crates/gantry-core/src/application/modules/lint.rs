use std::sync::Arc;

use tracing::{debug, instrument};

use super::{
    GenerationModule, ScriptReceiver, ScriptRegistrar, Workspace, not_configured, wrong_config,
};
use crate::{
    domain::{
        LintConfig, ModuleConfig, ModuleKind, RenderContext,
        config::{LINTER_GO, LINTER_MARKDOWN, LINTER_YAML},
        scripts::LINT_SCRIPT,
    },
    error::{Context, GantryResult},
};

/// Config file a linter ships with, if any.
///
/// Unknown linters map to `None` and are skipped so newer configs keep
/// working with older builds.
pub fn lint_file(linter: &str) -> Option<&'static str> {
    match linter {
        LINTER_GO => Some(".golangci.yml"),
        LINTER_YAML => Some(".yamllint.yml"),
        LINTER_MARKDOWN => Some(".markdownlint.yml"),
        _ => None,
    }
}

/// Renders linter configs and contributes the lint commands.
pub struct LintModule {
    workspace: Workspace,
    config: Option<(LintConfig, RenderContext)>,
    registrar: Option<Arc<dyn ScriptRegistrar>>,
}

impl LintModule {
    pub fn new(workspace: Workspace) -> Self {
        Self {
            workspace,
            config: None,
            registrar: None,
        }
    }
}

impl GenerationModule for LintModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::BaseLint
    }

    fn set_config(&mut self, config: &ModuleConfig) -> GantryResult<()> {
        let ModuleConfig::Lint(config) = config else {
            return Err(wrong_config(self.kind(), "LintConfig", config));
        };
        self.workspace.guard_source(&config.source_path)?;

        let context = RenderContext::from_serialize(config)?;
        self.config = Some((config.clone(), context));
        Ok(())
    }

    #[instrument(skip_all, fields(module = "base_lint"))]
    fn run(&mut self) -> GantryResult<()> {
        let (config, context) = self
            .config
            .as_ref()
            .ok_or_else(|| not_configured(self.kind()))?;
        let walker = self.workspace.walker();

        let mut commands = Vec::new();
        for (name, linter) in config.enabled_linters() {
            if !linter.cmd.trim().is_empty() {
                commands.push(linter.cmd.clone());
            }
            let Some(file) = lint_file(name) else {
                debug!(linter = %name, "no config file for linter");
                continue;
            };
            walker
                .copy_and_render(&config.source_path.join(file), file, context)
                .with_context(|| format!("failed to generate config of linter '{name}'"))?;
        }

        if let Some(registrar) = &self.registrar {
            registrar
                .register_lines(self.id(), &commands)
                .context("failed to register lint lines")?;
            registrar
                .register_file(LINT_SCRIPT, &commands)
                .context("failed to register lint script")?;
            debug!(commands = commands.len(), "lint commands registered");
        }
        Ok(())
    }

    fn as_script_receiver(&mut self) -> Option<&mut dyn ScriptReceiver> {
        Some(self)
    }
}

impl ScriptReceiver for LintModule {
    fn set_script_registrar(&mut self, registrar: Arc<dyn ScriptRegistrar>) {
        self.registrar = Some(registrar);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{
        ApplicationError,
        modules::MockScriptRegistrar,
        ports::MockTemplateRenderer,
        testing::{FakeRenderer, FakeRoot, FakeSource},
    };
    use crate::domain::Linter;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn config(linters: &[(&str, &str, bool)]) -> ModuleConfig {
        let linters: BTreeMap<_, _> = linters
            .iter()
            .map(|(name, cmd, enabled)| {
                (
                    name.to_string(),
                    Linter {
                        cmd: cmd.to_string(),
                        enabled: *enabled,
                    },
                )
            })
            .collect();
        ModuleConfig::Lint(LintConfig {
            source_path: PathBuf::from("src"),
            project_name: "Foo".into(),
            repo_import_path: "github.com/acme/foo".into(),
            linters,
        })
    }

    fn module(source: FakeSource, root: Arc<FakeRoot>) -> LintModule {
        LintModule::new(Workspace::new(
            "/fake/out",
            root,
            Arc::new(source),
            Arc::new(FakeRenderer),
        ))
    }

    #[test]
    fn renders_files_of_enabled_known_linters() {
        let root = Arc::new(FakeRoot::new());
        let source = FakeSource::new()
            .file(".golangci.yml", "local-prefixes: {{ repo_import_path }}")
            .file(".yamllint.yml", "extends: default");
        let mut module = module(source, root.clone());
        module
            .set_config(&config(&[
                ("golang", "golangci-lint run", true),
                ("yaml", "yamllint .", false),
                ("future-linter", "fl", true),
            ]))
            .unwrap();
        module.run().unwrap();

        assert_eq!(
            root.text(".golangci.yml").unwrap(),
            "local-prefixes: github.com/acme/foo"
        );
        assert!(root.text(".yamllint.yml").is_none());
    }

    #[test]
    fn missing_linter_template_fails() {
        let root = Arc::new(FakeRoot::new());
        let mut module = module(FakeSource::new(), root);
        module
            .set_config(&config(&[("markdown", "markdownlint .", true)]))
            .unwrap();
        let err = module.run().unwrap_err();

        assert!(err.to_string().contains("linter 'markdown'"));
        assert!(matches!(
            err.as_application(),
            Some(ApplicationError::MissingTemplate { .. })
        ));
    }

    #[test]
    fn registers_enabled_commands_in_name_order() {
        let root = Arc::new(FakeRoot::new());
        let source = FakeSource::new().file(".golangci.yml", "x");
        let mut module = module(source, root);
        module
            .set_config(&config(&[
                ("shfmt", "shfmt -d .", true),
                ("golang", "golangci-lint run", true),
                ("make", "checkmake Makefile", false),
            ]))
            .unwrap();

        let mut registrar = MockScriptRegistrar::new();
        registrar
            .expect_register_lines()
            .withf(|id, lines| id == "base_lint" && lines == ["golangci-lint run", "shfmt -d ."])
            .times(1)
            .returning(|_, _| Ok(()));
        registrar
            .expect_register_file()
            .withf(|name, lines| name == "lint.sh" && lines.len() == 2)
            .times(1)
            .returning(|_, _| Ok(()));
        module
            .as_script_receiver()
            .unwrap()
            .set_script_registrar(Arc::new(registrar));

        module.run().unwrap();
    }

    #[test]
    fn renderer_sees_the_lint_context() {
        let root = Arc::new(FakeRoot::new());
        let source = FakeSource::new().file(".golangci.yml", "raw");
        let mut renderer = MockTemplateRenderer::new();
        renderer
            .expect_render()
            .withf(|name, text, ctx| {
                name == ".golangci.yml"
                    && text == "raw"
                    && ctx.get("repo_import_path").is_some_and(|v| v == "github.com/acme/foo")
            })
            .times(1)
            .returning(|_, _, _| Ok("rendered".into()));

        let mut module = LintModule::new(Workspace::new(
            "/fake/out",
            root.clone(),
            Arc::new(source),
            Arc::new(renderer),
        ));
        module
            .set_config(&config(&[("golang", "golangci-lint run", true)]))
            .unwrap();
        module.run().unwrap();

        assert_eq!(root.text(".golangci.yml").unwrap(), "rendered");
    }
}
