use std::sync::Arc;

use tracing::{debug, instrument};

use super::{
    GenerationModule, ScriptReceiver, ScriptRegistrar, Workspace, not_configured, wrong_config,
};
use crate::{
    domain::{ModuleConfig, ModuleKind, RenderContext, TestConfig, scripts::TEST_SCRIPT},
    error::{Context, GantryResult},
};

const SUITE_SUFFIX: &str = "suite_test.go";

/// Renders the test scaffold and contributes the test command.
pub struct TestModule {
    workspace: Workspace,
    config: Option<(TestConfig, RenderContext)>,
    registrar: Option<Arc<dyn ScriptRegistrar>>,
}

impl TestModule {
    pub fn new(workspace: Workspace) -> Self {
        Self {
            workspace,
            config: None,
            registrar: None,
        }
    }
}

impl GenerationModule for TestModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::BaseTest
    }

    fn set_config(&mut self, config: &ModuleConfig) -> GantryResult<()> {
        let ModuleConfig::Test(config) = config else {
            return Err(wrong_config(self.kind(), "TestConfig", config));
        };
        self.workspace.guard_source(&config.source_path)?;

        let context = RenderContext::from_serialize(config)?;
        self.config = Some((config.clone(), context));
        Ok(())
    }

    #[instrument(skip_all, fields(module = "base_test"))]
    fn run(&mut self) -> GantryResult<()> {
        let (config, context) = self
            .config
            .as_ref()
            .ok_or_else(|| not_configured(self.kind()))?;

        let keep_suites = config.uses_ginkgo();
        self.workspace.walker().materialize(
            &config.source_path,
            context,
            &|dest: &str| !keep_suites && dest.ends_with(SUITE_SUFFIX),
        )?;

        if let Some(registrar) = &self.registrar {
            let lines = [config.test_cmd.clone()];
            registrar
                .register_lines(self.id(), &lines)
                .context("failed to register test lines")?;
            registrar
                .register_file(TEST_SCRIPT, &lines)
                .context("failed to register test script")?;
            debug!("test command registered");
        }
        Ok(())
    }

    fn as_script_receiver(&mut self) -> Option<&mut dyn ScriptReceiver> {
        Some(self)
    }
}

impl ScriptReceiver for TestModule {
    fn set_script_registrar(&mut self, registrar: Arc<dyn ScriptRegistrar>) {
        self.registrar = Some(registrar);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::modules::MockScriptRegistrar;
    use crate::application::testing::{FakeRenderer, FakeRoot, FakeSource};
    use crate::domain::{TEST_STYLE_GINKGO, TEST_STYLE_GO};
    use mockall::predicate::eq;
    use std::path::PathBuf;

    fn source() -> FakeSource {
        FakeSource::new()
            .file("app_test.go.tmpl", "package {{ lower_project_name }}_test")
            .file("app_suite_test.go.tmpl", "// suite for {{ project_name }}")
    }

    fn config(style: &str) -> ModuleConfig {
        ModuleConfig::Test(TestConfig {
            source_path: PathBuf::from("src"),
            use_style: style.into(),
            test_cmd: "go test ./...".into(),
            project_name: "Foo".into(),
            lower_project_name: "foo".into(),
            ..Default::default()
        })
    }

    fn run(style: &str, registrar: Option<Arc<dyn ScriptRegistrar>>) -> Arc<FakeRoot> {
        let root = Arc::new(FakeRoot::new());
        let mut module = TestModule::new(Workspace::new(
            "/fake/out",
            root.clone(),
            Arc::new(source()),
            Arc::new(FakeRenderer),
        ));
        module.set_config(&config(style)).unwrap();
        if let Some(registrar) = registrar {
            module
                .as_script_receiver()
                .unwrap()
                .set_script_registrar(registrar);
        }
        module.run().unwrap();
        root
    }

    #[test]
    fn suite_files_skipped_for_plain_go() {
        let root = run(TEST_STYLE_GO, None);
        assert_eq!(root.text("app_test.go").unwrap(), "package foo_test");
        assert!(root.text("app_suite_test.go").is_none());
    }

    #[test]
    fn suite_files_kept_for_ginkgo() {
        let root = run(TEST_STYLE_GINKGO, None);
        assert_eq!(root.text("app_suite_test.go").unwrap(), "// suite for Foo");
    }

    #[test]
    fn registers_command_once_per_channel() {
        let mut registrar = MockScriptRegistrar::new();
        let lines = vec!["go test ./...".to_string()];
        registrar
            .expect_register_lines()
            .with(eq("base_test"), eq(lines.clone()))
            .times(1)
            .returning(|_, _| Ok(()));
        registrar
            .expect_register_file()
            .with(eq("test.sh"), eq(lines))
            .times(1)
            .returning(|_, _| Ok(()));

        run(TEST_STYLE_GO, Some(Arc::new(registrar)));
    }
}
