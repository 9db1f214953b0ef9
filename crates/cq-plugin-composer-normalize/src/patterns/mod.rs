//! Ignore patterns for known, harmless tool output.
//!
//! Patterns come from the `ignore_output` option. Users usually write them in
//! the delimited style of the host's configuration files, e.g.
//! `#Some unknown output#` or `/^loading/i`. A recognised delimiter pair is
//! stripped and the trailing flags become inline regex flags; anything else
//! is used as a plain regular expression.

use regex::Regex;
use thiserror::Error;

use cq_plugin_api::PluginError;

/// Characters accepted as pattern delimiters.
const DELIMITERS: [char; 7] = ['#', '/', '~', '@', '%', '!', '|'];

/// Reasons a single pattern cannot be compiled.
#[derive(Debug, Error)]
pub enum PatternError {
    /// The pattern (or its delimited body) is empty and would match anything.
    #[error("pattern must not be empty")]
    Empty,

    /// A trailing flag has no regex equivalent.
    #[error("unsupported pattern flag '{flag}'")]
    UnsupportedFlag {
        /// The offending flag character.
        flag: char,
    },

    /// The regular expression itself is malformed.
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

/// A compiled ignore pattern together with its configured source text.
#[derive(Debug, Clone)]
pub struct IgnorePattern {
    source: String,
    regex: Regex,
}

impl IgnorePattern {
    /// Compiles a pattern as written in configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] for empty patterns, unknown flags, or
    /// malformed expressions.
    pub fn compile(source: &str) -> Result<Self, PatternError> {
        let expression = translate(source)?;
        let regex = Regex::new(&expression)?;
        Ok(Self {
            source: source.to_owned(),
            regex,
        })
    }

    /// Returns the pattern as configured.
    #[must_use]
    pub const fn source(&self) -> &str {
        self.source.as_str()
    }

    /// Returns whether the pattern matches anywhere in `line`.
    #[must_use]
    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }
}

/// The full, immutable set of ignore patterns for one task.
///
/// # Example
///
/// ```
/// use cq_plugin_composer_normalize::patterns::IgnorePatterns;
///
/// let patterns = IgnorePatterns::compile(&["#Some unknown output#".to_owned()]).unwrap();
/// assert!(patterns.is_ignored("Some unknown output"));
/// assert!(!patterns.is_ignored("Foo bar"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct IgnorePatterns {
    patterns: Vec<IgnorePattern>,
}

impl IgnorePatterns {
    /// Compiles every configured pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::InvalidPattern`] naming the first pattern that
    /// fails to compile.
    pub fn compile(sources: &[String]) -> Result<Self, PluginError> {
        let patterns = sources
            .iter()
            .map(|source| {
                IgnorePattern::compile(source).map_err(|err| PluginError::InvalidPattern {
                    pattern: source.clone(),
                    message: err.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Returns the first pattern matching `line`, if any.
    #[must_use]
    pub fn find(&self, line: &str) -> Option<&IgnorePattern> {
        self.patterns.iter().find(|pattern| pattern.is_match(line))
    }

    /// Returns whether any pattern matches `line`.
    #[must_use]
    pub fn is_ignored(&self, line: &str) -> bool {
        self.find(line).is_some()
    }

    /// Returns the number of patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns `true` when no patterns are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Converts a configured pattern into `regex` syntax.
fn translate(source: &str) -> Result<String, PatternError> {
    let Some(delimiter) = source.chars().next() else {
        return Err(PatternError::Empty);
    };
    if !DELIMITERS.contains(&delimiter) {
        return Ok(source.to_owned());
    }
    let Some((body, flags)) = split_delimited(source, delimiter) else {
        return Ok(source.to_owned());
    };
    if body.is_empty() {
        return Err(PatternError::Empty);
    }

    let mut inline = String::new();
    for flag in flags.chars() {
        match flag {
            'i' | 'm' | 's' | 'x' | 'U' => inline.push(flag),
            'u' => {}
            other => return Err(PatternError::UnsupportedFlag { flag: other }),
        }
    }

    if inline.is_empty() {
        Ok(body.to_owned())
    } else {
        Ok(format!("(?{inline}){body}"))
    }
}

/// Splits `<d>body<d>flags` into body and flags.
///
/// Returns `None` when there is no closing delimiter or the text after it is
/// not a run of ASCII letters.
fn split_delimited(source: &str, delimiter: char) -> Option<(&str, &str)> {
    let rest = source.strip_prefix(delimiter)?;
    let closing = rest.rfind(delimiter)?;
    let (body, tail) = rest.split_at(closing);
    let flags = tail.strip_prefix(delimiter)?;
    flags
        .chars()
        .all(|flag| flag.is_ascii_alphabetic())
        .then_some((body, flags))
}
