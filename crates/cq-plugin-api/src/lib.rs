//! Host-side contract for code-quality diagnostics plugins.
//!
//! A quality run is orchestrated by a host that loads plugins, resolves their
//! configuration, executes the tasks they describe, and aggregates the
//! resulting reports. This crate is the surface between the two sides:
//!
//! - [`DiagnosticsPlugin`] is what a plugin implements.
//! - [`ConfigurationSchema`] collects option declarations and turns the raw
//!   user configuration into a [`ResolvedConfiguration`].
//! - [`Environment`] and [`TaskFactory`] let a plugin describe tool
//!   invocations as [`Task`] values without spawning anything itself.
//! - [`OutputTransformer`] converts a running tool's output into
//!   [`Diagnostic`] records on a [`TaskReport`].
//!
//! # Example
//!
//! ```
//! use cq_plugin_api::{
//!     MemoryTaskReport, OutputChannel, ReportStatus, TaskBuilder,
//! };
//!
//! let task = TaskBuilder::new("composer-normalize", "/opt/tools/composer-normalize", vec![])
//!     .with_working_directory("/srv/project")
//!     .build();
//!
//! let mut report = MemoryTaskReport::new();
//! let mut transformer = task.create_transformer(&mut report);
//! transformer.write("composer.json is valid\n", OutputChannel::Stderr).unwrap();
//! transformer.finish(0).unwrap();
//! drop(transformer);
//!
//! assert_eq!(report.status(), ReportStatus::Passed);
//! ```

pub mod config;
pub mod environment;
pub mod error;
pub mod output;
pub mod plugin;
pub mod report;
pub mod task;

#[cfg(test)]
mod tests;

pub use self::config::{
    ConfigurationBuilder, ConfigurationSchema, OptionDescriptor, OptionKind, OptionValue,
    PluginConfiguration, ResolvedConfiguration,
};
pub use self::environment::{Environment, ProjectEnvironment};
pub use self::error::PluginError;
pub use self::output::{OutputChannel, OutputTransformer, OutputTransformerFactory};
pub use self::plugin::{DiagnosticTasks, DiagnosticsPlugin};
pub use self::report::{Diagnostic, MemoryTaskReport, ReportStatus, Severity, TaskReport};
pub use self::task::{Task, TaskBuilder, TaskFactory, ToolTaskFactory};
