//! Configuration options and the composer-normalize command line.

use cq_plugin_api::{ConfigurationBuilder, OptionDescriptor, PluginConfiguration, PluginError};

/// Regular expressions for stderr lines that are not worth reporting.
pub const IGNORE_OUTPUT: &str = "ignore_output";
/// Run without modifying any file.
pub const DRY_RUN: &str = "dry_run";
/// Path of the manifest relative to the project root.
pub const FILE: &str = "file";
/// Indentation width.
pub const INDENT_SIZE: &str = "indent_size";
/// Indentation character.
pub const INDENT_STYLE: &str = "indent_style";
/// Leave the lock file alone.
pub const NO_UPDATE_LOCK: &str = "no_update_lock";
/// Extra arguments passed through verbatim.
pub const CUSTOM_FLAGS: &str = "custom_flags";

const DEFAULT_FILE: &str = "composer.json";
const INDENT_STYLES: [&str; 2] = ["space", "tab"];

/// Declares every option the plugin understands.
pub fn describe(builder: &mut dyn ConfigurationBuilder) {
    builder.describe_option(
        OptionDescriptor::string_list(
            IGNORE_OUTPUT,
            "Regular expressions for tool output lines that should not be reported",
        )
        .with_default(Vec::<String>::new()),
    );
    builder.describe_option(
        OptionDescriptor::bool(
            DRY_RUN,
            "Show the result of normalizing without modifying any file",
        )
        .with_default(true),
    );
    builder.describe_option(
        OptionDescriptor::string(FILE, "Path to composer.json relative to the project root")
            .with_default(DEFAULT_FILE),
    );
    builder.describe_option(OptionDescriptor::int(
        INDENT_SIZE,
        "Indent size, an integer greater than 0; use together with indent_style",
    ));
    builder.describe_option(OptionDescriptor::string(
        INDENT_STYLE,
        "Indent style, one of \"space\" or \"tab\"; use together with indent_size",
    ));
    builder.describe_option(
        OptionDescriptor::bool(NO_UPDATE_LOCK, "Do not update the lock file if it exists")
            .with_default(false),
    );
    builder.describe_option(
        OptionDescriptor::string_list(CUSTOM_FLAGS, "Additional arguments for composer-normalize")
            .with_default(Vec::<String>::new()),
    );
}

/// Reads the ignore patterns, treating an absent option as empty.
///
/// # Errors
///
/// Returns the configuration's error if the option has the wrong type.
pub fn ignore_output(config: &dyn PluginConfiguration) -> Result<Vec<String>, PluginError> {
    if config.has(IGNORE_OUTPUT) {
        config.get_string_list(IGNORE_OUTPUT)
    } else {
        Ok(Vec::new())
    }
}

/// Builds the composer-normalize arguments for a configuration.
///
/// Absent options fall back to their declared defaults so hosts that skip
/// default resolution still get a sensible command line.
///
/// # Errors
///
/// Returns [`PluginError::InvalidOptionValue`] for a non-positive
/// `indent_size` or an unknown `indent_style`, and propagates type errors
/// from the configuration.
pub fn build(config: &dyn PluginConfiguration) -> Result<Vec<String>, PluginError> {
    let mut arguments = Vec::new();

    if bool_or(config, DRY_RUN, true)? {
        arguments.push(String::from("--dry-run"));
    }

    if config.has(INDENT_SIZE) {
        let size = config.get_int(INDENT_SIZE)?;
        if size <= 0 {
            return Err(PluginError::InvalidOptionValue {
                name: INDENT_SIZE.to_owned(),
                message: format!("must be greater than 0, got {size}"),
            });
        }
        arguments.push(String::from("--indent-size"));
        arguments.push(size.to_string());
    }

    if config.has(INDENT_STYLE) {
        let style = config.get_string(INDENT_STYLE)?;
        if !INDENT_STYLES.contains(&style.as_str()) {
            return Err(PluginError::InvalidOptionValue {
                name: INDENT_STYLE.to_owned(),
                message: format!("must be one of \"space\" or \"tab\", got \"{style}\""),
            });
        }
        arguments.push(String::from("--indent-style"));
        arguments.push(style);
    }

    if bool_or(config, NO_UPDATE_LOCK, false)? {
        arguments.push(String::from("--no-update-lock"));
    }

    if config.has(CUSTOM_FLAGS) {
        arguments.extend(config.get_string_list(CUSTOM_FLAGS)?);
    }

    let file = if config.has(FILE) {
        config.get_string(FILE)?
    } else {
        DEFAULT_FILE.to_owned()
    };
    arguments.push(file);

    Ok(arguments)
}

fn bool_or(
    config: &dyn PluginConfiguration,
    name: &str,
    default: bool,
) -> Result<bool, PluginError> {
    if config.has(name) {
        config.get_bool(name)
    } else {
        Ok(default)
    }
}
