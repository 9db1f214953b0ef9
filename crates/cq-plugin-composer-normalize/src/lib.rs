//! composer-normalize diagnostics plugin.
//!
//! The plugin runs the external `composer-normalize` tool over the project's
//! `composer.json` and relays whatever the tool writes to stderr as minor
//! diagnostics. Output lines users know to be harmless are suppressed through
//! the `ignore_output` option, a list of regular expressions.
//!
//! # Example
//!
//! ```
//! use cq_plugin_api::{
//!     ConfigurationSchema, DiagnosticsPlugin, MemoryTaskReport, OutputChannel,
//!     ProjectEnvironment, ToolTaskFactory,
//! };
//! use cq_plugin_composer_normalize::ComposerNormalizePlugin;
//!
//! let plugin = ComposerNormalizePlugin;
//! let mut schema = ConfigurationSchema::new();
//! plugin.describe_configuration(&mut schema);
//! let config = schema
//!     .resolve(&serde_json::json!({ "ignore_output": ["#already normalized#"] }))
//!     .unwrap();
//!
//! let mut factory = ToolTaskFactory::new();
//! factory.register("composer-normalize", "/opt/tools/composer-normalize").unwrap();
//! let environment = ProjectEnvironment::new("/srv/project", factory);
//!
//! let task = plugin
//!     .create_diagnostic_tasks(&config, &environment)
//!     .next()
//!     .unwrap()
//!     .unwrap();
//!
//! let mut report = MemoryTaskReport::new();
//! let mut transformer = task.create_transformer(&mut report);
//! transformer.write("composer.json is already normalized.\n", OutputChannel::Stderr).unwrap();
//! transformer.finish(0).unwrap();
//! drop(transformer);
//! assert!(report.diagnostics().is_empty());
//! ```

pub mod arguments;
pub mod patterns;
pub mod transformer;

#[cfg(test)]
mod tests;

use std::iter;

use tracing::debug;

use cq_plugin_api::{
    ConfigurationBuilder, DiagnosticTasks, DiagnosticsPlugin, Environment, PluginConfiguration,
    PluginError, Task,
};

use self::patterns::IgnorePatterns;
use self::transformer::ComposerNormalizeTransformerFactory;

pub use self::transformer::UNKNOWN_OUTPUT_PREFIX;

/// Name the host uses for this plugin and for the tool it runs.
pub const PLUGIN_NAME: &str = "composer-normalize";

/// Tracing target for task creation.
const PLUGIN_TARGET: &str = "cq_plugin_composer_normalize";

/// The composer-normalize diagnostics plugin.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComposerNormalizePlugin;

impl ComposerNormalizePlugin {
    fn create_task(
        config: &dyn PluginConfiguration,
        environment: &dyn Environment,
    ) -> Result<Task, PluginError> {
        let patterns = IgnorePatterns::compile(&arguments::ignore_output(config)?)?;
        let arguments = arguments::build(config)?;
        let project_root = environment.project_root();

        debug!(
            target: PLUGIN_TARGET,
            ?arguments,
            ignore_patterns = patterns.len(),
            project_root = %project_root.display(),
            "creating composer-normalize task"
        );

        Ok(environment
            .task_factory()
            .build_run_tool(PLUGIN_NAME, arguments)?
            .with_working_directory(project_root)
            .with_output_transformer(ComposerNormalizeTransformerFactory::new(patterns))
            .build())
    }
}

impl DiagnosticsPlugin for ComposerNormalizePlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn describe_configuration(&self, builder: &mut dyn ConfigurationBuilder) {
        arguments::describe(builder);
    }

    fn create_diagnostic_tasks<'a>(
        &'a self,
        config: &'a dyn PluginConfiguration,
        environment: &'a dyn Environment,
    ) -> DiagnosticTasks<'a> {
        Box::new(iter::once_with(move || {
            Self::create_task(config, environment)
        }))
    }
}
