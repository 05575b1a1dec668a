//! Keyword lists and the preference store.
//!
//! A keyword list is a flat `key: value` text file. Keys may carry a dotted
//! prefix that scopes them to one elevation source:
//!
//! ```text
//! # elevation sources
//! elevation_manager.elevation_source0.type: dted_directory
//! elevation_manager.elevation_source0.connection_string: /data/dted
//! elevation_manager.elevation_source0.extension: .dt2
//! elevation_manager.elevation_source0.upcase: false
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::{DtedError, Result};

/// Source of user preferences, looked up by prefix and key.
pub trait Preferences: Send + Sync {
    /// Value stored under `prefix + key`, or `None` if absent or empty.
    fn lookup(&self, prefix: &str, key: &str) -> Option<String>;
}

/// Ordered `key: value` store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keywordlist {
    entries: BTreeMap<String, String>,
}

impl Keywordlist {
    /// Create an empty keyword list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse keyword list text.
    ///
    /// Blank lines and lines starting with `#` or `//` are ignored. Values are
    /// trimmed; a later duplicate key replaces an earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`DtedError::InvalidValue`] for a line without a `:` separator.
    pub fn parse(text: &str) -> Result<Self> {
        let mut kwl = Self::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
                continue;
            }

            let (key, value) = line.split_once(':').ok_or_else(|| DtedError::InvalidValue {
                key: "keyword line".to_string(),
                value: line.to_string(),
            })?;
            kwl.entries
                .insert(key.trim().to_string(), value.trim().to_string());
        }

        Ok(kwl)
    }

    /// Load a keyword list file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Write the keyword list to a file.
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_string())?;
        Ok(())
    }

    /// Value stored under `prefix + key`.
    pub fn find(&self, prefix: &str, key: &str) -> Option<&str> {
        self.entries
            .get(&format!("{}{}", prefix, key))
            .map(String::as_str)
    }

    /// Boolean stored under `prefix + key`.
    ///
    /// Returns `Ok(None)` if the key is absent.
    pub fn find_bool(&self, prefix: &str, key: &str) -> Result<Option<bool>> {
        match self.find(prefix, key) {
            None => Ok(None),
            Some(value) => parse_bool(value)
                .map(Some)
                .ok_or_else(|| DtedError::InvalidValue {
                    key: format!("{}{}", prefix, key),
                    value: value.to_string(),
                }),
        }
    }

    /// Store `value` under `prefix + key`, replacing any previous value.
    pub fn add(&mut self, prefix: &str, key: &str, value: impl ToString) {
        self.entries
            .insert(format!("{}{}", prefix, key), value.to_string());
    }

    /// Remove `prefix + key`, returning its value.
    pub fn remove(&mut self, prefix: &str, key: &str) -> Option<String> {
        self.entries.remove(&format!("{}{}", prefix, key))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for Keywordlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.entries {
            writeln!(f, "{}: {}", key, value)?;
        }
        Ok(())
    }
}

impl Preferences for Keywordlist {
    fn lookup(&self, prefix: &str, key: &str) -> Option<String> {
        self.find(prefix, key)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

/// Parse a keyword-list boolean.
///
/// Accepts `true/false`, `yes/no`, `on/off` and `1/0`, case-insensitively.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
