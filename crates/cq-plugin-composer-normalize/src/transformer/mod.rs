//! Conversion of composer-normalize output into diagnostics.
//!
//! composer-normalize writes everything worth reporting to stderr. Each
//! non-blank stderr line that no ignore pattern matches becomes one
//! [`Severity::Minor`] diagnostic; stdout is not inspected. Lines split across
//! writes are reassembled before matching, and a trailing fragment without a
//! newline is flushed when the stream finishes.

use std::sync::Arc;

use tracing::debug;

use cq_plugin_api::{
    Diagnostic, OutputChannel, OutputTransformer, OutputTransformerFactory, PluginError,
    ReportStatus, Severity, TaskReport,
};

use crate::PLUGIN_NAME;
use crate::patterns::IgnorePatterns;

/// Tracing target for output transformation.
const TRANSFORMER_TARGET: &str = "cq_plugin_composer_normalize::transformer";

/// Prefix of every diagnostic raised for unrecognised output.
pub const UNKNOWN_OUTPUT_PREFIX: &str = "Did not understand the following tool output: \n";

/// Creates a [`ComposerNormalizeTransformer`] for every task execution.
///
/// The compiled patterns are shared read-only between all transformers the
/// factory produces.
#[derive(Debug, Clone)]
pub struct ComposerNormalizeTransformerFactory {
    patterns: Arc<IgnorePatterns>,
}

impl ComposerNormalizeTransformerFactory {
    /// Creates a factory applying the given ignore patterns.
    #[must_use]
    pub fn new(patterns: IgnorePatterns) -> Self {
        Self {
            patterns: Arc::new(patterns),
        }
    }
}

impl OutputTransformerFactory for ComposerNormalizeTransformerFactory {
    fn create_for<'r>(&self, report: &'r mut dyn TaskReport) -> Box<dyn OutputTransformer + 'r> {
        Box::new(ComposerNormalizeTransformer::new(
            report,
            Arc::clone(&self.patterns),
        ))
    }
}

/// Output transformer bound to one execution's report.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use cq_plugin_api::{MemoryTaskReport, OutputChannel, OutputTransformer, ReportStatus};
/// use cq_plugin_composer_normalize::patterns::IgnorePatterns;
/// use cq_plugin_composer_normalize::transformer::ComposerNormalizeTransformer;
///
/// let patterns = IgnorePatterns::compile(&["#is already normalized#".to_owned()]).unwrap();
/// let mut report = MemoryTaskReport::new();
/// let mut transformer = ComposerNormalizeTransformer::new(&mut report, Arc::new(patterns));
/// transformer
///     .write("./composer.json is already normalized.\n", OutputChannel::Stderr)
///     .unwrap();
/// transformer.finish(0).unwrap();
/// drop(transformer);
///
/// assert!(report.diagnostics().is_empty());
/// assert_eq!(report.status(), ReportStatus::Passed);
/// ```
pub struct ComposerNormalizeTransformer<'r> {
    report: &'r mut dyn TaskReport,
    patterns: Arc<IgnorePatterns>,
    pending: String,
    finished: bool,
}

impl<'r> ComposerNormalizeTransformer<'r> {
    /// Creates a transformer reporting into `report`.
    #[must_use]
    pub fn new(report: &'r mut dyn TaskReport, patterns: Arc<IgnorePatterns>) -> Self {
        Self {
            report,
            patterns,
            pending: String::new(),
            finished: false,
        }
    }

    fn ensure_running(&self) -> Result<(), PluginError> {
        if self.finished {
            return Err(PluginError::TransformerFinished {
                tool: PLUGIN_NAME.to_owned(),
            });
        }
        Ok(())
    }

    fn process_line(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        if let Some(pattern) = self.patterns.find(line) {
            debug!(
                target: TRANSFORMER_TARGET,
                pattern = pattern.source(),
                line,
                "ignoring known tool output"
            );
            return;
        }
        self.report.add_diagnostic(Diagnostic::new(
            Severity::Minor,
            format!("{UNKNOWN_OUTPUT_PREFIX}{line}"),
        ));
    }
}

impl OutputTransformer for ComposerNormalizeTransformer<'_> {
    fn write(&mut self, data: &str, channel: OutputChannel) -> Result<(), PluginError> {
        self.ensure_running()?;
        if channel != OutputChannel::Stderr {
            return Ok(());
        }

        self.pending.push_str(data);
        while let Some(newline) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=newline).collect();
            self.process_line(line.trim_end_matches(['\n', '\r']));
        }
        Ok(())
    }

    fn finish(&mut self, exit_code: i32) -> Result<(), PluginError> {
        self.ensure_running()?;
        let rest = std::mem::take(&mut self.pending);
        self.process_line(rest.trim_end_matches('\r'));

        let status = ReportStatus::from_exit_code(exit_code);
        debug!(
            target: TRANSFORMER_TARGET,
            exit_code,
            ?status,
            "closing composer-normalize report"
        );
        self.report.close(status);
        self.finished = true;
        Ok(())
    }
}
