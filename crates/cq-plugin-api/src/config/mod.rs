//! Configuration schema declaration and resolved option values.
//!
//! Plugins declare the options they understand through a
//! [`ConfigurationBuilder`]. The host records those declarations in a
//! [`ConfigurationSchema`], validates the user's raw configuration against it,
//! and hands the plugin a [`PluginConfiguration`] with defaults filled in.
//! Loading the raw configuration from disk is the host's concern; this module
//! starts from an already parsed [`serde_json::Value`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::PluginError;

/// Tracing target for configuration handling.
const CONFIG_TARGET: &str = "cq_plugin_api::config";

/// Type of a configuration option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    /// `true` or `false`.
    Bool,
    /// A signed integer.
    Int,
    /// A single string.
    String,
    /// An ordered list of strings.
    StringList,
}

impl OptionKind {
    /// Returns a human-readable name used in error messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Int => "integer",
            Self::String => "string",
            Self::StringList => "list of strings",
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A typed configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// String value.
    String(String),
    /// List of strings.
    StringList(Vec<String>),
}

impl OptionValue {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> OptionKind {
        match self {
            Self::Bool(_) => OptionKind::Bool,
            Self::Int(_) => OptionKind::Int,
            Self::String(_) => OptionKind::String,
            Self::StringList(_) => OptionKind::StringList,
        }
    }

    /// Converts a raw JSON value into an option value of the given kind.
    ///
    /// Returns `None` when the JSON value has a different shape.
    #[must_use]
    pub fn from_json(kind: OptionKind, raw: &Value) -> Option<Self> {
        match kind {
            OptionKind::Bool => raw.as_bool().map(Self::Bool),
            OptionKind::Int => raw.as_i64().map(Self::Int),
            OptionKind::String => raw.as_str().map(|text| Self::String(text.to_owned())),
            OptionKind::StringList => raw
                .as_array()?
                .iter()
                .map(|item| item.as_str().map(str::to_owned))
                .collect::<Option<Vec<_>>>()
                .map(Self::StringList),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(value: Vec<String>) -> Self {
        Self::StringList(value)
    }
}

/// Declaration of a single configuration option.
///
/// # Example
///
/// ```
/// use cq_plugin_api::config::{OptionDescriptor, OptionKind};
///
/// let option = OptionDescriptor::bool("dry_run", "Do not modify any files")
///     .with_default(true);
/// assert_eq!(option.name(), "dry_run");
/// assert_eq!(option.kind(), OptionKind::Bool);
/// assert!(!option.is_required());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDescriptor {
    name: String,
    description: String,
    kind: OptionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<OptionValue>,
    #[serde(default)]
    required: bool,
}

impl OptionDescriptor {
    /// Declares an option of the given kind.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, kind: OptionKind) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            default: None,
            required: false,
        }
    }

    /// Declares a boolean option.
    #[must_use]
    pub fn bool(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, OptionKind::Bool)
    }

    /// Declares an integer option.
    #[must_use]
    pub fn int(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, OptionKind::Int)
    }

    /// Declares a string option.
    #[must_use]
    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, OptionKind::String)
    }

    /// Declares a string list option.
    #[must_use]
    pub fn string_list(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, OptionKind::StringList)
    }

    /// Sets the value used when the user supplies none.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<OptionValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Marks the option as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Returns the option name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the human-readable description.
    #[must_use]
    pub const fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the declared kind.
    #[must_use]
    pub const fn kind(&self) -> OptionKind {
        self.kind
    }

    /// Returns the default value, if any.
    #[must_use]
    pub const fn default_value(&self) -> Option<&OptionValue> {
        self.default.as_ref()
    }

    /// Returns whether a value must be present after defaults are applied.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }
}

/// Sink for option declarations made by a plugin.
pub trait ConfigurationBuilder {
    /// Records the declaration of one option.
    fn describe_option(&mut self, option: OptionDescriptor);
}

/// The set of options a plugin declared, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationSchema {
    options: Vec<OptionDescriptor>,
}

impl ConfigurationSchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the declared options.
    #[must_use]
    pub fn options(&self) -> &[OptionDescriptor] {
        &self.options
    }

    /// Looks up an option by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OptionDescriptor> {
        self.options.iter().find(|option| option.name() == name)
    }

    /// Validates raw configuration against the schema and applies defaults.
    ///
    /// `null` is treated as an empty object, and `null` option values as
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::MalformedConfiguration`] if `raw` is not an
    /// object, [`PluginError::UnknownOption`] for undeclared keys,
    /// [`PluginError::OptionType`] for values of the wrong shape, and
    /// [`PluginError::MissingOption`] for required options left unset.
    pub fn resolve(&self, raw: &Value) -> Result<ResolvedConfiguration, PluginError> {
        let empty = serde_json::Map::new();
        let entries = match raw {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => {
                return Err(PluginError::MalformedConfiguration {
                    found: json_type_name(other).to_owned(),
                });
            }
        };

        let mut values = BTreeMap::new();
        for (name, raw_value) in entries {
            let option = self.get(name).ok_or_else(|| PluginError::UnknownOption {
                name: name.clone(),
            })?;
            if raw_value.is_null() {
                continue;
            }
            let value = OptionValue::from_json(option.kind(), raw_value).ok_or_else(|| {
                PluginError::OptionType {
                    name: name.clone(),
                    expected: option.kind(),
                }
            })?;
            values.insert(name.clone(), value);
        }

        for option in &self.options {
            if values.contains_key(option.name()) {
                continue;
            }
            match option.default_value() {
                Some(default) if default.kind() == option.kind() => {
                    values.insert(option.name().to_owned(), default.clone());
                }
                Some(_) => {
                    return Err(PluginError::OptionType {
                        name: option.name().to_owned(),
                        expected: option.kind(),
                    });
                }
                None if option.is_required() => {
                    return Err(PluginError::MissingOption {
                        name: option.name().to_owned(),
                    });
                }
                None => {}
            }
        }

        Ok(ResolvedConfiguration { values })
    }
}

impl ConfigurationBuilder for ConfigurationSchema {
    fn describe_option(&mut self, option: OptionDescriptor) {
        if self.get(option.name()).is_some() {
            warn!(
                target: CONFIG_TARGET,
                option = option.name(),
                "option declared twice, keeping the first declaration"
            );
            return;
        }
        self.options.push(option);
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Read access to a plugin's resolved configuration.
pub trait PluginConfiguration {
    /// Returns whether the option has a value (explicit or default).
    fn has(&self, name: &str) -> bool;

    /// Reads a boolean option.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::MissingOption`] or [`PluginError::OptionType`].
    fn get_bool(&self, name: &str) -> Result<bool, PluginError>;

    /// Reads an integer option.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::MissingOption`] or [`PluginError::OptionType`].
    fn get_int(&self, name: &str) -> Result<i64, PluginError>;

    /// Reads a string option.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::MissingOption`] or [`PluginError::OptionType`].
    fn get_string(&self, name: &str) -> Result<String, PluginError>;

    /// Reads a string list option.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::MissingOption`] or [`PluginError::OptionType`].
    fn get_string_list(&self, name: &str) -> Result<Vec<String>, PluginError>;
}

/// Option values after validation and default application.
///
/// # Example
///
/// ```
/// use cq_plugin_api::config::{
///     ConfigurationBuilder, ConfigurationSchema, OptionDescriptor, PluginConfiguration,
/// };
///
/// let mut schema = ConfigurationSchema::new();
/// schema.describe_option(OptionDescriptor::bool("dry_run", "").with_default(true));
///
/// let config = schema.resolve(&serde_json::json!({})).unwrap();
/// assert!(config.get_bool("dry_run").unwrap());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedConfiguration {
    values: BTreeMap<String, OptionValue>,
}

impl ResolvedConfiguration {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value directly, bypassing schema validation.
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    fn value(&self, name: &str) -> Result<&OptionValue, PluginError> {
        self.values.get(name).ok_or_else(|| PluginError::MissingOption {
            name: name.to_owned(),
        })
    }
}

fn type_error(name: &str, expected: OptionKind) -> PluginError {
    PluginError::OptionType {
        name: name.to_owned(),
        expected,
    }
}

impl PluginConfiguration for ResolvedConfiguration {
    fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    fn get_bool(&self, name: &str) -> Result<bool, PluginError> {
        match self.value(name)? {
            OptionValue::Bool(value) => Ok(*value),
            _ => Err(type_error(name, OptionKind::Bool)),
        }
    }

    fn get_int(&self, name: &str) -> Result<i64, PluginError> {
        match self.value(name)? {
            OptionValue::Int(value) => Ok(*value),
            _ => Err(type_error(name, OptionKind::Int)),
        }
    }

    fn get_string(&self, name: &str) -> Result<String, PluginError> {
        match self.value(name)? {
            OptionValue::String(value) => Ok(value.clone()),
            _ => Err(type_error(name, OptionKind::String)),
        }
    }

    fn get_string_list(&self, name: &str) -> Result<Vec<String>, PluginError> {
        match self.value(name)? {
            OptionValue::StringList(value) => Ok(value.clone()),
            _ => Err(type_error(name, OptionKind::StringList)),
        }
    }
}
