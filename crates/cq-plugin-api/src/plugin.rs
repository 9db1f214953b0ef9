//! The contract every diagnostics plugin implements.

use crate::config::{ConfigurationBuilder, PluginConfiguration};
use crate::environment::Environment;
use crate::error::PluginError;
use crate::task::Task;

/// Lazily produced task descriptions.
///
/// Each element is built when the host pulls it, so configuration errors
/// surface per task. The sequence is finite and consumed once.
pub type DiagnosticTasks<'a> = Box<dyn Iterator<Item = Result<Task, PluginError>> + 'a>;

/// A plugin that contributes diagnostic tasks to a quality run.
pub trait DiagnosticsPlugin {
    /// Returns the stable name the host uses in configuration and reports.
    fn name(&self) -> &str;

    /// Declares the options the plugin understands.
    fn describe_configuration(&self, builder: &mut dyn ConfigurationBuilder);

    /// Produces the tasks to run for the given configuration.
    fn create_diagnostic_tasks<'a>(
        &'a self,
        config: &'a dyn PluginConfiguration,
        environment: &'a dyn Environment,
    ) -> DiagnosticTasks<'a>;
}
