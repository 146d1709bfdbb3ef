//! Feature flags sourced from a properties file and command-line overrides.
//!
//! The resolver never reads ambient process state; flags are collected once
//! per configuration pass into an explicit [`FeatureFlags`] value and passed
//! to whoever needs them.

use std::collections::BTreeMap;
use std::path::Path;

/// Externally supplied key/value flags for one configuration pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureFlags {
    values: BTreeMap<String, String>,
}

/// Flag controlling the per-variant matrix test suite.
pub const MATRIX_TESTS: &str = "matrixTests";

impl FeatureFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load flags from a properties file. An absent file yields the empty
    /// flag set — properties are optional.
    ///
    /// Format: `key=value` lines; `#` and `!` start comments; blank lines
    /// are ignored; whitespace around key and value is trimmed. Lines with
    /// no `=` are ignored (a bare key carries no usable value).
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read.
    pub fn from_path(path: &Path) -> Result<Self, PropertiesError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(PropertiesError::Read {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        let mut flags = Self::default();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                flags
                    .values
                    .insert(key.trim().to_owned(), value.trim().to_owned());
            }
        }
        Ok(flags)
    }

    /// Set one flag, overriding any file-sourced value.
    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
    }

    /// Apply a `key=value` override as passed on the command line.
    ///
    /// # Errors
    /// Returns an error if the assignment has no `=` or an empty key.
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<(), PropertiesError> {
        let Some((key, value)) = assignment.split_once('=') else {
            return Err(PropertiesError::MalformedAssignment {
                assignment: assignment.to_owned(),
            });
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(PropertiesError::MalformedAssignment {
                assignment: assignment.to_owned(),
            });
        }
        self.values.insert(key.to_owned(), value.trim().to_owned());
        Ok(())
    }

    /// Whether a named feature is enabled.
    ///
    /// True iff the backing value equals `"true"` case-insensitively.
    /// Absence, or any other value, reads as disabled.
    pub fn enabled(&self, name: &str) -> bool {
        self.values
            .get(name)
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }

    /// The raw value of a flag, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PropertiesError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("malformed property override `{assignment}` — expected key=value")]
    MalformedAssignment { assignment: String },
}
