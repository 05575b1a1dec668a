//! Database configuration and its keyword-list form.
//!
//! # Keys
//!
//! All keys are scoped by the caller's prefix (e.g.,
//! `elevation_manager.elevation_source0.`).
//!
//! | Key | Description | Default |
//! |-----|-------------|---------|
//! | `type` | Database type, always `dted_directory` | |
//! | `connection_string` | Root directory of the DTED tree | Required |
//! | `enabled` | Whether the source answers queries | true |
//! | `memory_map_cells` | Memory-map opened cells | false |
//! | `geoid.type` | Short name of the geoid model | `geoid1996` |
//! | `mean_spacing` | Post spacing estimate in meters | Detected |
//! | `extension` | Cell file extension, with leading dot | Detected |
//! | `upcase` | Upper case directory and file names | false |
//!
//! `extension` and `upcase` are read from the preference store, the others
//! from the keyword list passed to the database.

use crate::error::{DtedError, Result};
use crate::keywords::{parse_bool, Keywordlist, Preferences};

/// Database type written by [`DatabaseConfig::save`].
pub const DATABASE_TYPE: &str = "dted_directory";

/// Geoid bound when none is configured.
pub const DEFAULT_GEOID: &str = "geoid1996";

/// Configuration of a DTED directory database.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    /// Root directory of the DTED tree.
    pub connection_string: String,
    /// Cell file extension, always starting with `.` once set.
    extension: Option<String>,
    /// Upper case hemisphere letters in paths.
    pub upcase: bool,
    /// Whether the source answers queries.
    pub enabled: bool,
    /// Memory-map cells instead of reading them into memory.
    pub memory_map_cells: bool,
    /// Post spacing estimate in meters.
    pub mean_spacing: Option<f64>,
    /// Short name of the geoid model to bind.
    pub geoid_name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            connection_string: String::new(),
            extension: None,
            upcase: false,
            enabled: true,
            memory_map_cells: false,
            mean_spacing: None,
            geoid_name: DEFAULT_GEOID.to_string(),
        }
    }
}

impl DatabaseConfig {
    /// Create a configuration rooted at `dir`.
    pub fn new(dir: impl Into<String>) -> Self {
        Self {
            connection_string: dir.into(),
            ..Self::default()
        }
    }

    /// Cell file extension, with leading dot.
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// Set the extension, adding a missing leading dot.
    ///
    /// An empty value clears the extension so it is detected on open.
    pub fn set_extension(&mut self, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.extension = None;
            return;
        }

        let extension = normalize_extension(value);
        if extension != value {
            tracing::warn!(
                value,
                corrected = %extension,
                "Extension does not start with a dot; consider changing it"
            );
        }
        self.extension = Some(extension);
    }

    /// Load the base keys (everything except `extension` and `upcase`).
    ///
    /// Missing keys keep their current values.
    ///
    /// # Errors
    ///
    /// Returns [`DtedError::InvalidValue`] for an unparsable boolean or number.
    pub fn load_base(&mut self, kwl: &Keywordlist, prefix: &str) -> Result<()> {
        if let Some(value) = kwl.find(prefix, "connection_string") {
            self.connection_string = value.to_string();
        }
        if let Some(value) = kwl.find_bool(prefix, "enabled")? {
            self.enabled = value;
        }
        if let Some(value) = kwl.find_bool(prefix, "memory_map_cells")? {
            self.memory_map_cells = value;
        }
        if let Some(value) = kwl.find(prefix, "geoid.type") {
            if !value.is_empty() {
                self.geoid_name = value.to_string();
            }
        }
        if let Some(value) = kwl.find(prefix, "mean_spacing") {
            let spacing: f64 = value.parse().map_err(|_| DtedError::InvalidValue {
                key: format!("{}mean_spacing", prefix),
                value: value.to_string(),
            })?;
            self.mean_spacing = Some(spacing);
        }

        Ok(())
    }

    /// Load `extension` and `upcase` from the preference store.
    ///
    /// A missing key, or an `upcase` value that is not a boolean, is logged
    /// and leaves the current value in place.
    pub fn load_preferences(&mut self, prefs: &dyn Preferences, prefix: &str) -> Result<()> {
        match prefs.lookup(prefix, "extension") {
            Some(value) => self.set_extension(&value),
            None => tracing::info!(
                key = %format!("{}extension", prefix),
                "No extension preference; it can be set to e.g. .dt2"
            ),
        }

        match prefs.lookup(prefix, "upcase") {
            Some(value) => match parse_bool(&value) {
                Some(upcase) => self.upcase = upcase,
                None => tracing::warn!(
                    key = %format!("{}upcase", prefix),
                    value = %value,
                    upcase = self.upcase,
                    "Upcase preference is not a boolean; keeping current value"
                ),
            },
            None => tracing::info!(
                key = %format!("{}upcase", prefix),
                "No upcase preference; it can be set to e.g. false"
            ),
        }

        Ok(())
    }

    /// Write every key to `kwl`.
    pub fn save(&self, kwl: &mut Keywordlist, prefix: &str) {
        kwl.add(prefix, "extension", self.extension.as_deref().unwrap_or(""));
        kwl.add(prefix, "upcase", self.upcase);
        kwl.add(prefix, "type", DATABASE_TYPE);
        kwl.add(prefix, "connection_string", &self.connection_string);
        kwl.add(prefix, "enabled", self.enabled);
        kwl.add(prefix, "memory_map_cells", self.memory_map_cells);
        kwl.add(prefix, "geoid.type", &self.geoid_name);
        if let Some(spacing) = self.mean_spacing {
            kwl.add(prefix, "mean_spacing", spacing);
        }
    }
}

/// Prepend a dot to `value` unless it already starts with one.
///
/// # Examples
///
/// ```
/// use dtedb::config::normalize_extension;
///
/// assert_eq!(normalize_extension("dt2"), ".dt2");
/// assert_eq!(normalize_extension(".dt1"), ".dt1");
/// ```
pub fn normalize_extension(value: &str) -> String {
    if value.starts_with('.') {
        value.to_string()
    } else {
        format!(".{}", value)
    }
}
