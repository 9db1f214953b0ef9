//! Task reports and the diagnostics recorded into them.
//!
//! Every task execution owns one [`TaskReport`]. Output transformers append
//! [`Diagnostic`] records while the tool runs and close the report with a
//! [`ReportStatus`] once the tool has exited.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a diagnostic, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational, not an issue.
    Info,
    /// Cosmetic issue.
    Marginal,
    /// Issue worth addressing, does not break anything.
    Minor,
    /// Issue that should block a merge.
    Major,
    /// The tool could not do its job.
    Fatal,
}

impl Severity {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Marginal => "marginal",
            Self::Minor => "minor",
            Self::Major => "major",
            Self::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finding attached to a task report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    severity: Severity,
    message: String,
}

impl Diagnostic {
    /// Creates a diagnostic with the given severity and message.
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    /// Returns the severity level.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the message text.
    #[must_use]
    pub const fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Lifecycle state of a task report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// The task is still running.
    #[default]
    Started,
    /// The tool finished successfully.
    Passed,
    /// The tool reported failure.
    Failed,
}

impl ReportStatus {
    /// Maps a process exit code to the final report status.
    #[must_use]
    pub const fn from_exit_code(exit_code: i32) -> Self {
        if exit_code == 0 {
            Self::Passed
        } else {
            Self::Failed
        }
    }
}

/// Sink for the findings of one task execution.
pub trait TaskReport {
    /// Appends a diagnostic.
    fn add_diagnostic(&mut self, diagnostic: Diagnostic);

    /// Marks the report complete.
    fn close(&mut self, status: ReportStatus);
}

/// A [`TaskReport`] that keeps everything in memory.
///
/// # Example
///
/// ```
/// use cq_plugin_api::report::{Diagnostic, MemoryTaskReport, ReportStatus, Severity, TaskReport};
///
/// let mut report = MemoryTaskReport::new();
/// report.add_diagnostic(Diagnostic::new(Severity::Minor, "composer.json is not normalized"));
/// report.close(ReportStatus::Failed);
///
/// assert_eq!(report.diagnostics().len(), 1);
/// assert_eq!(report.status(), ReportStatus::Failed);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryTaskReport {
    diagnostics: Vec<Diagnostic>,
    status: ReportStatus,
}

impl MemoryTaskReport {
    /// Creates an empty, started report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded diagnostics in arrival order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> ReportStatus {
        self.status
    }

    /// Returns whether the report has been closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        !matches!(self.status, ReportStatus::Started)
    }
}

impl TaskReport for MemoryTaskReport {
    fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn close(&mut self, status: ReportStatus) {
        self.status = status;
    }
}
