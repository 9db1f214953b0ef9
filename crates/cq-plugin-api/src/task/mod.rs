//! Task construction.
//!
//! Plugins never spawn processes. They describe an invocation through the
//! host's [`TaskFactory`], refine it with the [`TaskBuilder`] chain, and hand
//! the resulting [`Task`] back to the host, which runs it and pushes the
//! output through a transformer obtained from [`Task::create_transformer`].
//!
//! The builder is consumed step by step:
//! working directory → output transformer → [`TaskBuilder::build`].

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::error::PluginError;
use crate::output::{
    ExitCodeTransformerFactory, OutputTransformer, OutputTransformerFactory,
};
use crate::report::TaskReport;

/// Tracing target for task construction.
const TASK_TARGET: &str = "cq_plugin_api::task";

/// Host capability that starts building a tool invocation.
pub trait TaskFactory {
    /// Starts a task that runs `tool` with the given arguments.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::ToolNotFound`] if the host cannot resolve the
    /// tool to an executable.
    fn build_run_tool(
        &self,
        tool: &str,
        arguments: Vec<String>,
    ) -> Result<TaskBuilder, PluginError>;
}

/// [`TaskFactory`] backed by a fixed table of tool executables.
///
/// # Example
///
/// ```
/// use cq_plugin_api::task::{TaskFactory, ToolTaskFactory};
///
/// let mut factory = ToolTaskFactory::new();
/// factory
///     .register("composer-normalize", "/opt/tools/composer-normalize.phar")
///     .expect("registration succeeds");
///
/// let task = factory
///     .build_run_tool("composer-normalize", vec!["--dry-run".into()])
///     .expect("tool is known")
///     .build();
/// assert_eq!(task.arguments(), &["--dry-run"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ToolTaskFactory {
    tools: HashMap<String, PathBuf>,
}

impl ToolTaskFactory {
    /// Creates a factory that knows no tools.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the executable for a tool.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::ToolRegistration`] if the name is empty, the
    /// path is not absolute, or the tool is already registered.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        executable: impl Into<PathBuf>,
    ) -> Result<(), PluginError> {
        let tool = name.into();
        let path = executable.into();
        let refuse = |message: &str| PluginError::ToolRegistration {
            name: tool.clone(),
            path: path.clone(),
            message: message.to_owned(),
        };
        if tool.trim().is_empty() {
            return Err(refuse("tool name must not be empty"));
        }
        if !path.is_absolute() {
            return Err(refuse("executable path must be absolute"));
        }
        if self.tools.contains_key(&tool) {
            return Err(refuse("tool is already registered"));
        }
        self.tools.insert(tool, path);
        Ok(())
    }

    /// Returns the executable registered for a tool.
    #[must_use]
    pub fn executable(&self, name: &str) -> Option<&Path> {
        self.tools.get(name).map(PathBuf::as_path)
    }
}

impl TaskFactory for ToolTaskFactory {
    fn build_run_tool(
        &self,
        tool: &str,
        arguments: Vec<String>,
    ) -> Result<TaskBuilder, PluginError> {
        let program = self
            .executable(tool)
            .ok_or_else(|| PluginError::ToolNotFound {
                name: tool.to_owned(),
            })?;
        Ok(TaskBuilder::new(tool, program, arguments))
    }
}

/// Builder for a [`Task`].
#[must_use]
pub struct TaskBuilder {
    tool: String,
    program: PathBuf,
    arguments: Vec<String>,
    working_directory: Option<PathBuf>,
    transformer_factory: Option<Arc<dyn OutputTransformerFactory>>,
}

impl TaskBuilder {
    /// Starts a task running `program` on behalf of `tool`.
    pub fn new(tool: impl Into<String>, program: impl Into<PathBuf>, arguments: Vec<String>) -> Self {
        Self {
            tool: tool.into(),
            program: program.into(),
            arguments,
            working_directory: None,
            transformer_factory: None,
        }
    }

    /// Sets the directory the tool runs in.
    pub fn with_working_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(directory.into());
        self
    }

    /// Attaches the factory that creates a transformer for each execution.
    pub fn with_output_transformer(
        mut self,
        factory: impl OutputTransformerFactory + 'static,
    ) -> Self {
        self.transformer_factory = Some(Arc::new(factory));
        self
    }

    /// Finalises the task.
    ///
    /// A task without an attached transformer reports no diagnostics and is
    /// judged by its exit code alone.
    pub fn build(self) -> Task {
        let transformer_factory = self.transformer_factory.unwrap_or_else(|| {
            debug!(
                target: TASK_TARGET,
                tool = self.tool.as_str(),
                "no output transformer attached, using exit code only"
            );
            let fallback: Arc<dyn OutputTransformerFactory> =
                Arc::new(ExitCodeTransformerFactory::new(self.tool.clone()));
            fallback
        });
        Task {
            tool: self.tool,
            program: self.program,
            arguments: self.arguments,
            working_directory: self.working_directory,
            transformer_factory,
        }
    }
}

impl fmt::Debug for TaskBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskBuilder")
            .field("tool", &self.tool)
            .field("program", &self.program)
            .field("arguments", &self.arguments)
            .field("working_directory", &self.working_directory)
            .field("has_transformer", &self.transformer_factory.is_some())
            .finish()
    }
}

/// A runnable description of one tool invocation.
#[derive(Clone)]
pub struct Task {
    tool: String,
    program: PathBuf,
    arguments: Vec<String>,
    working_directory: Option<PathBuf>,
    transformer_factory: Arc<dyn OutputTransformerFactory>,
}

impl Task {
    /// Returns the tool name the task was built for.
    #[must_use]
    pub const fn tool(&self) -> &str {
        self.tool.as_str()
    }

    /// Returns the executable to run.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Returns the arguments passed to the executable.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Returns the working directory, if one was set.
    #[must_use]
    pub fn working_directory(&self) -> Option<&Path> {
        self.working_directory.as_deref()
    }

    /// Creates a fresh transformer bound to one execution's report.
    #[must_use]
    pub fn create_transformer<'r>(
        &self,
        report: &'r mut dyn TaskReport,
    ) -> Box<dyn OutputTransformer + 'r> {
        self.transformer_factory.create_for(report)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("tool", &self.tool)
            .field("program", &self.program)
            .field("arguments", &self.arguments)
            .field("working_directory", &self.working_directory)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
