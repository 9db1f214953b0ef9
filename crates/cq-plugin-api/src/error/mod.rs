//! Domain errors raised across the plugin API.
//!
//! All errors use a single `thiserror`-derived enum with structured context so
//! hosts can inspect the failure programmatically and decide whether it is a
//! configuration problem (surface to the user) or a lifecycle violation (a bug
//! in the host).

use std::path::PathBuf;

use thiserror::Error;

use crate::config::OptionKind;

/// Errors arising from plugin configuration, task construction, and output
/// transformation.
#[derive(Debug, Error)]
pub enum PluginError {
    /// A configuration value was supplied for an option nobody declared.
    #[error("unknown configuration option '{name}'")]
    UnknownOption {
        /// Name of the undeclared option.
        name: String,
    },

    /// The plugin asked for an option that has neither a value nor a default.
    #[error("configuration option '{name}' is not set")]
    MissingOption {
        /// Name of the option.
        name: String,
    },

    /// A configuration value does not have the declared type.
    #[error("configuration option '{name}' must be a {expected}")]
    OptionType {
        /// Name of the option.
        name: String,
        /// Declared type of the option.
        expected: OptionKind,
    },

    /// A configuration value has the right type but is not acceptable.
    #[error("configuration option '{name}' is invalid: {message}")]
    InvalidOptionValue {
        /// Name of the option.
        name: String,
        /// Why the value was rejected.
        message: String,
    },

    /// The raw configuration was not a key/value object.
    #[error("plugin configuration must be an object, got {found}")]
    MalformedConfiguration {
        /// JSON type that was found instead.
        found: String,
    },

    /// An ignore pattern could not be compiled.
    #[error("invalid output pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The pattern as configured.
        pattern: String,
        /// Compiler diagnostic.
        message: String,
    },

    /// The task factory does not know the requested tool.
    #[error("tool '{name}' is not registered with the task factory")]
    ToolNotFound {
        /// Name that was looked up.
        name: String,
    },

    /// A tool could not be registered with the task factory.
    #[error("cannot register tool '{name}' at '{path}': {message}")]
    ToolRegistration {
        /// Tool name.
        name: String,
        /// Executable path that was offered.
        path: PathBuf,
        /// Why the registration was refused.
        message: String,
    },

    /// Output arrived after the transformer was finished.
    #[error("output transformer for '{tool}' is already finished")]
    TransformerFinished {
        /// Tool whose output was being transformed.
        tool: String,
    },
}
