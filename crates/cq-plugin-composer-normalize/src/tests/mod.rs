//! Crate-level integration and BDD tests.

use std::path::{Path, PathBuf};

use mockall::mock;
use mockall::predicate::eq;
use rstest::rstest;

use cq_plugin_api::{
    ConfigurationSchema, Diagnostic, DiagnosticsPlugin, Environment, OutputChannel,
    PluginConfiguration, PluginError, ProjectEnvironment, ReportStatus, Severity, Task,
    TaskBuilder, TaskFactory, TaskReport, ToolTaskFactory,
};

use crate::arguments::IGNORE_OUTPUT;
use crate::{ComposerNormalizePlugin, PLUGIN_NAME};


const PROJECT_ROOT: &str = "/srv/project";
const EXECUTABLE: &str = "/opt/tools/composer-normalize.phar";

mock! {
    Config {}
    impl PluginConfiguration for Config {
        fn has(&self, name: &str) -> bool;
        fn get_bool(&self, name: &str) -> Result<bool, PluginError>;
        fn get_int(&self, name: &str) -> Result<i64, PluginError>;
        fn get_string(&self, name: &str) -> Result<String, PluginError>;
        fn get_string_list(&self, name: &str) -> Result<Vec<String>, PluginError>;
    }
}

mock! {
    ToolFactory {}
    impl TaskFactory for ToolFactory {
        fn build_run_tool(
            &self,
            tool: &str,
            arguments: Vec<String>,
        ) -> Result<TaskBuilder, PluginError>;
    }
}

mock! {
    Report {}
    impl TaskReport for Report {
        fn add_diagnostic(&mut self, diagnostic: Diagnostic);
        fn close(&mut self, status: ReportStatus);
    }
}

/// Environment handing out a mocked task factory.
struct MockedEnvironment {
    project_root: PathBuf,
    factory: MockToolFactory,
}

impl Environment for MockedEnvironment {
    fn project_root(&self) -> &Path {
        &self.project_root
    }

    fn task_factory(&self) -> &dyn TaskFactory {
        &self.factory
    }
}

fn project_environment() -> ProjectEnvironment {
    let mut factory = ToolTaskFactory::new();
    factory
        .register(PLUGIN_NAME, EXECUTABLE)
        .expect("register composer-normalize");
    ProjectEnvironment::new(PROJECT_ROOT, factory)
}

fn collect_tasks(
    config: &dyn PluginConfiguration,
    environment: &dyn Environment,
) -> Result<Vec<Task>, PluginError> {
    ComposerNormalizePlugin
        .create_diagnostic_tasks(config, environment)
        .collect()
}

#[test]
fn plugin_name() {
    assert_eq!(ComposerNormalizePlugin.name(), "composer-normalize");
}

#[test]
fn plugin_describes_config() {
    let mut schema = ConfigurationSchema::new();
    ComposerNormalizePlugin.describe_configuration(&mut schema);
    let option = schema.get(IGNORE_OUTPUT).expect("ignore_output declared");
    assert_eq!(option.kind(), cq_plugin_api::OptionKind::StringList);
}

#[test]
fn plugin_creates_one_diagnostic_task() {
    let mut schema = ConfigurationSchema::new();
    ComposerNormalizePlugin.describe_configuration(&mut schema);
    let config = schema.resolve(&serde_json::Value::Null).expect("resolve");
    let environment = project_environment();

    let tasks = collect_tasks(&config, &environment).expect("tasks");
    assert_eq!(tasks.len(), 1);
    let task = tasks.first().expect("one task");
    assert_eq!(task.tool(), PLUGIN_NAME);
    assert_eq!(task.program(), Path::new(EXECUTABLE));
    assert_eq!(task.arguments(), &["--dry-run", "composer.json"]);
    assert_eq!(task.working_directory(), Some(Path::new(PROJECT_ROOT)));
}

#[test]
fn ignores_configured_output() {
    let mut config = MockConfig::new();
    config.expect_has().returning(|name| name == IGNORE_OUTPUT);
    config
        .expect_get_string_list()
        .withf(|name| name == IGNORE_OUTPUT)
        .times(1)
        .returning(|_| Ok(vec![String::from("#Some unknown output#")]));

    let mut factory = MockToolFactory::new();
    factory
        .expect_build_run_tool()
        .withf(|tool, arguments| tool == PLUGIN_NAME && arguments == &["--dry-run", "composer.json"])
        .times(1)
        .returning(|tool, arguments| Ok(TaskBuilder::new(tool, EXECUTABLE, arguments)));
    let environment = MockedEnvironment {
        project_root: PathBuf::from(PROJECT_ROOT),
        factory,
    };

    let tasks = collect_tasks(&config, &environment).expect("tasks");
    assert_eq!(tasks.len(), 1);
    let task = tasks.first().expect("one task");

    let mut report = MockReport::new();
    report
        .expect_add_diagnostic()
        .withf(|diagnostic| {
            diagnostic.severity() == Severity::Minor
                && diagnostic.message()
                    == "Did not understand the following tool output: \nFoo bar"
        })
        .times(1)
        .return_const(());
    report
        .expect_close()
        .with(eq(ReportStatus::Passed))
        .times(1)
        .return_const(());

    let mut transformer = task.create_transformer(&mut report);
    transformer
        .write("Foo bar\n", OutputChannel::Stderr)
        .expect("write");
    transformer
        .write("Some unknown output\n", OutputChannel::Stderr)
        .expect("write");
    transformer.finish(0).expect("finish");
}

#[test]
fn task_sequence_is_lazy() {
    // No expectations: any configuration access would panic.
    let config = MockConfig::new();
    let environment = MockedEnvironment {
        project_root: PathBuf::from(PROJECT_ROOT),
        factory: MockToolFactory::new(),
    };
    let tasks = ComposerNormalizePlugin.create_diagnostic_tasks(&config, &environment);
    drop(tasks);
}

#[rstest]
#[case::malformed("#(unclosed#")]
#[case::unsupported_flag("#foo#D")]
#[case::empty("")]
fn invalid_ignore_pattern_fails_task_creation(#[case] pattern: &str) {
    let config = cq_plugin_api::ResolvedConfiguration::new()
        .with_value(IGNORE_OUTPUT, vec![pattern.to_owned()]);
    let environment = project_environment();

    let err = collect_tasks(&config, &environment).expect_err("invalid pattern");
    assert!(
        matches!(err, PluginError::InvalidPattern { pattern: ref source, .. } if source == pattern),
        "unexpected error: {err}"
    );
}

#[test]
fn unknown_tool_fails_task_creation() {
    let config = cq_plugin_api::ResolvedConfiguration::new();
    let environment = ProjectEnvironment::new(PROJECT_ROOT, ToolTaskFactory::new());

    let err = collect_tasks(&config, &environment).expect_err("tool missing");
    assert!(matches!(err, PluginError::ToolNotFound { ref name } if name == PLUGIN_NAME));
}
