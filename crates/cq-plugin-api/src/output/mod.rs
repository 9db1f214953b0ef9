//! Output transformation contracts.
//!
//! The host pushes a tool's output into an [`OutputTransformer`] as it
//! arrives, one [`OutputTransformer::write`] per chunk, and ends the stream
//! with a single [`OutputTransformer::finish`] carrying the exit code. A fresh
//! transformer is obtained from an [`OutputTransformerFactory`] for every task
//! execution and is bound to that execution's [`TaskReport`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PluginError;
use crate::report::{ReportStatus, TaskReport};

/// Tracing target for output handling.
const OUTPUT_TARGET: &str = "cq_plugin_api::output";

/// Stream a chunk of tool output arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputChannel {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

impl OutputChannel {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

impl fmt::Display for OutputChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converts raw tool output into report entries.
///
/// Implementations move through `Created → (write)* → Finished`. Calls after
/// finishing are rejected with [`PluginError::TransformerFinished`].
pub trait OutputTransformer {
    /// Consumes a chunk of output.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::TransformerFinished`] once [`Self::finish`] has
    /// been called.
    fn write(&mut self, data: &str, channel: OutputChannel) -> Result<(), PluginError>;

    /// Ends the output stream and closes the report.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::TransformerFinished`] if called twice.
    fn finish(&mut self, exit_code: i32) -> Result<(), PluginError>;
}

/// Produces one [`OutputTransformer`] per task execution.
pub trait OutputTransformerFactory {
    /// Creates a transformer that reports into `report`.
    fn create_for<'r>(&self, report: &'r mut dyn TaskReport) -> Box<dyn OutputTransformer + 'r>;
}

/// Factory for [`ExitCodeTransformer`], used by tasks that attach none.
#[derive(Debug, Clone)]
pub struct ExitCodeTransformerFactory {
    tool: String,
}

impl ExitCodeTransformerFactory {
    /// Creates a factory for the named tool.
    #[must_use]
    pub fn new(tool: impl Into<String>) -> Self {
        Self { tool: tool.into() }
    }
}

impl OutputTransformerFactory for ExitCodeTransformerFactory {
    fn create_for<'r>(&self, report: &'r mut dyn TaskReport) -> Box<dyn OutputTransformer + 'r> {
        Box::new(ExitCodeTransformer {
            tool: self.tool.clone(),
            report,
            finished: false,
        })
    }
}

/// Discards all output and closes the report from the exit code alone.
pub struct ExitCodeTransformer<'r> {
    tool: String,
    report: &'r mut dyn TaskReport,
    finished: bool,
}

impl ExitCodeTransformer<'_> {
    fn ensure_running(&self) -> Result<(), PluginError> {
        if self.finished {
            return Err(PluginError::TransformerFinished {
                tool: self.tool.clone(),
            });
        }
        Ok(())
    }
}

impl OutputTransformer for ExitCodeTransformer<'_> {
    fn write(&mut self, _data: &str, _channel: OutputChannel) -> Result<(), PluginError> {
        self.ensure_running()
    }

    fn finish(&mut self, exit_code: i32) -> Result<(), PluginError> {
        self.ensure_running()?;
        self.finished = true;
        let status = ReportStatus::from_exit_code(exit_code);
        debug!(
            target: OUTPUT_TARGET,
            tool = self.tool.as_str(),
            exit_code,
            ?status,
            "closing report"
        );
        self.report.close(status);
        Ok(())
    }
}
