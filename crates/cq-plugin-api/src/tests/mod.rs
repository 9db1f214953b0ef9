//! Crate-level integration and BDD tests.

use std::path::Path;

use serde_json::json;

use crate::config::{
    ConfigurationBuilder, ConfigurationSchema, OptionDescriptor, PluginConfiguration,
};
use crate::environment::{Environment, ProjectEnvironment};
use crate::error::PluginError;
use crate::output::OutputChannel;
use crate::plugin::{DiagnosticTasks, DiagnosticsPlugin};
use crate::report::{MemoryTaskReport, ReportStatus};
use crate::task::ToolTaskFactory;


/// Minimal plugin running one tool with its configured arguments.
struct LintPlugin;

impl DiagnosticsPlugin for LintPlugin {
    fn name(&self) -> &str {
        "lint"
    }

    fn describe_configuration(&self, builder: &mut dyn ConfigurationBuilder) {
        builder.describe_option(
            OptionDescriptor::string_list("arguments", "Extra arguments")
                .with_default(Vec::<String>::new()),
        );
    }

    fn create_diagnostic_tasks<'a>(
        &'a self,
        config: &'a dyn PluginConfiguration,
        environment: &'a dyn Environment,
    ) -> DiagnosticTasks<'a> {
        Box::new(std::iter::once_with(move || -> Result<_, PluginError> {
            let arguments = config.get_string_list("arguments")?;
            Ok(environment
                .task_factory()
                .build_run_tool("lint", arguments)?
                .with_working_directory(environment.project_root())
                .build())
        }))
    }
}

fn environment() -> ProjectEnvironment {
    let mut factory = ToolTaskFactory::new();
    factory.register("lint", "/usr/bin/lint").expect("register lint");
    ProjectEnvironment::new("/srv/project", factory)
}

#[test]
fn end_to_end_plugin_through_host_surface() {
    let plugin = LintPlugin;
    let mut schema = ConfigurationSchema::new();
    plugin.describe_configuration(&mut schema);
    let config = schema
        .resolve(&json!({ "arguments": ["--strict"] }))
        .expect("resolve");
    let environment = environment();

    let tasks: Vec<_> = plugin
        .create_diagnostic_tasks(&config, &environment)
        .collect::<Result<_, PluginError>>()
        .expect("tasks");
    assert_eq!(tasks.len(), 1);
    let task = tasks.first().expect("one task");
    assert_eq!(task.arguments(), &["--strict"]);
    assert_eq!(task.working_directory(), Some(Path::new("/srv/project")));

    let mut report = MemoryTaskReport::new();
    {
        let mut transformer = task.create_transformer(&mut report);
        transformer
            .write("lint: ok\n", OutputChannel::Stdout)
            .expect("write");
        transformer.finish(0).expect("finish");
    }
    assert_eq!(report.status(), ReportStatus::Passed);
}

#[test]
fn task_errors_surface_through_the_sequence() {
    let plugin = LintPlugin;
    let config = crate::config::ResolvedConfiguration::new();
    let environment = environment();

    let mut tasks = plugin.create_diagnostic_tasks(&config, &environment);
    let first = tasks.next().expect("one element");
    assert!(matches!(first, Err(PluginError::MissingOption { .. })));
    assert!(tasks.next().is_none());
}
