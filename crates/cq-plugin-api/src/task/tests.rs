//! Unit tests for task construction.

use std::path::PathBuf;

use rstest::{fixture, rstest};

use super::*;
use crate::output::OutputChannel;
use crate::report::{Diagnostic, MemoryTaskReport, ReportStatus, Severity};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

#[fixture]
fn factory() -> ToolTaskFactory {
    let mut factory = ToolTaskFactory::new();
    factory
        .register("composer-normalize", "/opt/tools/composer-normalize.phar")
        .expect("register composer-normalize");
    factory
}

/// Records every stderr chunk verbatim as a diagnostic.
struct EchoFactory;

struct EchoTransformer<'r> {
    report: &'r mut dyn TaskReport,
}

impl OutputTransformerFactory for EchoFactory {
    fn create_for<'r>(&self, report: &'r mut dyn TaskReport) -> Box<dyn OutputTransformer + 'r> {
        Box::new(EchoTransformer { report })
    }
}

impl OutputTransformer for EchoTransformer<'_> {
    fn write(&mut self, data: &str, channel: OutputChannel) -> Result<(), PluginError> {
        if channel == OutputChannel::Stderr {
            self.report
                .add_diagnostic(Diagnostic::new(Severity::Info, data));
        }
        Ok(())
    }

    fn finish(&mut self, exit_code: i32) -> Result<(), PluginError> {
        self.report.close(ReportStatus::from_exit_code(exit_code));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ToolTaskFactory
// ---------------------------------------------------------------------------

#[rstest]
fn factory_resolves_registered_tool(factory: ToolTaskFactory) {
    let task = factory
        .build_run_tool("composer-normalize", vec!["composer.json".into()])
        .expect("known tool")
        .build();
    assert_eq!(task.tool(), "composer-normalize");
    assert_eq!(
        task.program(),
        PathBuf::from("/opt/tools/composer-normalize.phar")
    );
    assert_eq!(task.arguments(), &["composer.json"]);
    assert!(task.working_directory().is_none());
}

#[rstest]
fn factory_rejects_unknown_tool(factory: ToolTaskFactory) {
    let err = factory
        .build_run_tool("phpstan", Vec::new())
        .expect_err("unknown tool");
    assert!(matches!(err, PluginError::ToolNotFound { ref name } if name == "phpstan"));
}

#[rstest]
#[case::empty_name("  ", "/usr/bin/tool", "empty")]
#[case::relative_path("tool", "vendor/bin/tool", "absolute")]
#[case::duplicate("composer-normalize", "/usr/bin/other", "already registered")]
fn factory_rejects_invalid_registration(
    mut factory: ToolTaskFactory,
    #[case] name: &str,
    #[case] path: &str,
    #[case] expected: &str,
) {
    let err = factory.register(name, path).expect_err("invalid registration");
    assert!(
        matches!(err, PluginError::ToolRegistration { ref message, .. } if message.contains(expected)),
        "unexpected error: {err}"
    );
}

// ---------------------------------------------------------------------------
// TaskBuilder
// ---------------------------------------------------------------------------

#[test]
fn builder_sets_working_directory() {
    let task = TaskBuilder::new("tool", "/usr/bin/tool", Vec::new())
        .with_working_directory("/srv/project")
        .build();
    assert_eq!(task.working_directory(), Some(PathBuf::from("/srv/project").as_path()));
}

#[test]
fn attached_transformer_receives_output() {
    let task = TaskBuilder::new("tool", "/usr/bin/tool", Vec::new())
        .with_output_transformer(EchoFactory)
        .build();
    let mut report = MemoryTaskReport::new();
    {
        let mut transformer = task.create_transformer(&mut report);
        transformer
            .write("warning", OutputChannel::Stderr)
            .expect("write");
        transformer
            .write("progress", OutputChannel::Stdout)
            .expect("write");
        transformer.finish(1).expect("finish");
    }
    assert_eq!(report.diagnostics().len(), 1);
    assert_eq!(report.status(), ReportStatus::Failed);
}

#[test]
fn each_execution_gets_a_fresh_transformer() {
    let task = TaskBuilder::new("tool", "/usr/bin/tool", Vec::new())
        .with_output_transformer(EchoFactory)
        .build();
    let mut first = MemoryTaskReport::new();
    let mut second = MemoryTaskReport::new();
    task.create_transformer(&mut first)
        .write("one", OutputChannel::Stderr)
        .expect("write");
    task.create_transformer(&mut second)
        .finish(0)
        .expect("finish");
    assert_eq!(first.diagnostics().len(), 1);
    assert!(second.diagnostics().is_empty());
    assert_eq!(second.status(), ReportStatus::Passed);
}

#[test]
fn task_without_transformer_uses_exit_code_only() {
    let task = TaskBuilder::new("tool", "/usr/bin/tool", Vec::new()).build();
    let mut report = MemoryTaskReport::new();
    {
        let mut transformer = task.create_transformer(&mut report);
        transformer
            .write("ignored\n", OutputChannel::Stderr)
            .expect("write");
        transformer.finish(0).expect("finish");
    }
    assert!(report.diagnostics().is_empty());
    assert_eq!(report.status(), ReportStatus::Passed);
}

#[test]
fn debug_output_names_tool() {
    let task = TaskBuilder::new("composer-normalize", "/usr/bin/tool", Vec::new()).build();
    let rendered = format!("{task:?}");
    assert!(rendered.contains("composer-normalize"), "got: {rendered}");
}
