//! DTED directory database with a single-slot cell cache.
//!
//! This module provides [`DtedDatabase`], the query facade over a DTED
//! directory tree, and the [`ElevationDatabase`] contract it implements.
//!
//! # Example
//!
//! ```ignore
//! use dtedb::{DtedDatabaseBuilder, ElevationDatabase, GeoPoint};
//!
//! let db = DtedDatabaseBuilder::new("/data/dted")
//!     .extension(".dt2")
//!     .memory_map(true)
//!     .build()?;
//!
//! // Opens w122/n47.dt2 on first use, then answers from the cached cell
//! let point = GeoPoint::new(47.2, -121.5);
//! if let Some(height) = db.height_above_msl(&point) {
//!     println!("Height: {:.1}m", height);
//! }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::cache::{CacheStats, CellCache};
use crate::config::DatabaseConfig;
use crate::detect::detect_extension;
use crate::error::{DtedError, Result};
use crate::filename::full_path;
use crate::geoid::{Geoid, GeoidManager, GeoidRegistry};
use crate::keywords::{parse_bool, Keywordlist, Preferences};
use crate::point::GeoPoint;
use crate::tile::{AccuracyInfo, DtedOpener, TileHandle, TileOpener};

/// Contract shared by elevation database formats.
pub trait ElevationDatabase: Send + Sync {
    /// Open the database at `connection_string`.
    fn open(&mut self, connection_string: &str) -> Result<()>;

    /// Height above mean sea level in meters, or `None` without data.
    fn height_above_msl(&self, point: &GeoPoint) -> Option<f64>;

    /// Height above the ellipsoid in meters, or `None` without data.
    fn height_above_ellipsoid(&self, point: &GeoPoint) -> Option<f64>;

    /// Accuracy information at the point; `None` while the source is disabled.
    fn accuracy_info(&self, point: &GeoPoint) -> Option<AccuracyInfo>;

    /// Open the cell containing the point, bypassing any cache.
    fn create_cell(&self, point: &GeoPoint) -> Option<Box<dyn TileHandle>>;

    /// Configure from a keyword list and open.
    fn load_config(&mut self, kwl: &Keywordlist, prefix: &str) -> Result<()>;

    /// Write the configuration to a keyword list.
    fn save_config(&self, kwl: &mut Keywordlist, prefix: &str);

    /// Human-readable dump of the configuration.
    fn describe(&self) -> String;
}

/// Elevation database over a DTED directory tree.
///
/// Cells live at `<root>/{e|w}DDD/{n|s}DD<extension>` (see
/// [`filename`](crate::filename)). The database keeps the last cell it used
/// open and reuses it for every point it covers; a point in another cell
/// replaces it.
///
/// Cloning copies the configuration and collaborators but not the cached
/// cell, so each clone opens its own.
pub struct DtedDatabase {
    config: DatabaseConfig,
    opener: Arc<dyn TileOpener>,
    geoids: Arc<dyn GeoidRegistry>,
    preferences: Arc<dyn Preferences>,
    /// Bound geoid model.
    geoid: Option<Arc<dyn Geoid>>,
    /// Cell used by height queries.
    cache: CellCache,
    /// Serializes accuracy lookups; independent of `cache`.
    accuracy_lock: Mutex<()>,
}

impl DtedDatabase {
    /// Create an unopened database with the default collaborators.
    pub fn new() -> Self {
        DtedDatabaseBuilder::new("").build_unopened()
    }

    /// Create a builder for a database rooted at `data_dir`.
    pub fn builder<P: AsRef<Path>>(data_dir: P) -> DtedDatabaseBuilder {
        DtedDatabaseBuilder::new(data_dir)
    }

    /// Current configuration.
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Root directory of the DTED tree.
    pub fn data_dir(&self) -> &Path {
        Path::new(&self.config.connection_string)
    }

    /// Configured or detected extension.
    pub fn extension(&self) -> Option<&str> {
        self.config.extension()
    }

    /// Whether paths use upper case hemisphere letters.
    pub fn upcase(&self) -> bool {
        self.config.upcase
    }

    /// Post spacing estimate in meters.
    pub fn mean_spacing_meters(&self) -> Option<f64> {
        self.config.mean_spacing
    }

    /// Whether the source answers queries.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Enable or disable the source.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    /// Bound geoid model, if any.
    pub fn geoid(&self) -> Option<&Arc<dyn Geoid>> {
        self.geoid.as_ref()
    }

    /// Bind a geoid model, replacing any bound one.
    pub fn set_geoid(&mut self, geoid: Arc<dyn Geoid>) {
        self.config.geoid_name = geoid.short_name().to_string();
        self.geoid = Some(geoid);
    }

    /// Geoid height above the ellipsoid at the point.
    ///
    /// Returns 0.0 when no geoid is bound or the geoid has no value there.
    pub fn offset_from_ellipsoid(&self, point: &GeoPoint) -> f64 {
        self.geoid
            .as_ref()
            .and_then(|g| g.offset_from_ellipsoid(point))
            .filter(|offset| !offset.is_nan())
            .unwrap_or(0.0)
    }

    /// Path of the cell containing the point, if the extension is known.
    pub fn cell_path(&self, point: &GeoPoint) -> Option<PathBuf> {
        if self.config.connection_string.is_empty() {
            return None;
        }
        let extension = self.config.extension()?;

        Some(full_path(
            self.data_dir(),
            point,
            extension,
            self.config.upcase,
        ))
    }

    /// Get cache statistics for height queries.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Close the cached cell.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

impl Default for DtedDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DtedDatabase {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            opener: Arc::clone(&self.opener),
            geoids: Arc::clone(&self.geoids),
            preferences: Arc::clone(&self.preferences),
            geoid: self.geoid.clone(),
            cache: CellCache::new(),
            accuracy_lock: Mutex::new(()),
        }
    }
}

impl ElevationDatabase for DtedDatabase {
    fn open(&mut self, connection_string: &str) -> Result<()> {
        let dir = Path::new(connection_string);
        tracing::debug!(dir = %dir.display(), "Opening DTED directory");

        if !dir.is_dir() {
            return Err(DtedError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }

        let detected = if self.config.extension().is_some() {
            Ok(())
        } else {
            match detect_extension(dir, self.opener.as_ref()) {
                Ok(found) => {
                    self.config.set_extension(&found.extension);
                    self.config.mean_spacing = Some(found.mean_spacing);
                    Ok(())
                }
                Err(e) => {
                    tracing::warn!(
                        dir = %dir.display(),
                        error = %e,
                        "Scan for DTED extension failed; set the extension preference, e.g. .dt2"
                    );
                    Err(e)
                }
            }
        };

        if self.geoid.is_none() {
            self.geoid = self
                .geoids
                .find_by_short_name(&self.config.geoid_name, false);
            if self.geoid.is_none() {
                tracing::warn!(
                    geoid = %self.config.geoid_name,
                    "Unable to load geoid for DTED database; ellipsoid heights use a zero offset"
                );
            }
        }

        detected?;

        self.config.connection_string = connection_string.to_string();
        self.cache.clear();

        tracing::debug!(
            dir = %dir.display(),
            extension = ?self.config.extension(),
            "Opened DTED directory"
        );
        Ok(())
    }

    fn height_above_msl(&self, point: &GeoPoint) -> Option<f64> {
        if !self.config.enabled {
            return None;
        }

        self.cache.with_cell(
            point,
            || self.create_cell(point),
            |cell| cell.height_above_msl(point),
        )
    }

    fn height_above_ellipsoid(&self, point: &GeoPoint) -> Option<f64> {
        let height = self.height_above_msl(point)?;
        Some(height + self.offset_from_ellipsoid(point))
    }

    fn accuracy_info(&self, point: &GeoPoint) -> Option<AccuracyInfo> {
        if !self.config.enabled {
            return None;
        }

        let mut cell = {
            let _guard = self.accuracy_lock.lock();
            self.create_cell(point)?
        };

        let info = cell.accuracy_info(point);
        cell.close();
        info
    }

    fn create_cell(&self, point: &GeoPoint) -> Option<Box<dyn TileHandle>> {
        let path = self.cell_path(point)?;

        match self.opener.open(&path, self.config.memory_map_cells) {
            Ok(cell) => Some(cell),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "No DTED cell");
                None
            }
        }
    }

    fn load_config(&mut self, kwl: &Keywordlist, prefix: &str) -> Result<()> {
        self.config.load_base(kwl, prefix)?;

        let connection_string = self.config.connection_string.clone();
        if connection_string.is_empty() {
            return Err(DtedError::MissingConnectionString);
        }
        if !Path::new(&connection_string).exists() {
            return Err(DtedError::NotADirectory {
                path: PathBuf::from(connection_string),
            });
        }

        let preferences = Arc::clone(&self.preferences);
        self.config.load_preferences(preferences.as_ref(), prefix)?;

        self.open(&connection_string)
    }

    fn save_config(&self, kwl: &mut Keywordlist, prefix: &str) {
        self.config.save(kwl, prefix);
    }

    fn describe(&self) -> String {
        let mut kwl = Keywordlist::new();
        self.save_config(&mut kwl, "");
        if self.config.mean_spacing.is_none() {
            kwl.add("", "mean_spacing", "unknown");
        }

        let bound = self
            .geoid
            .as_ref()
            .map(|g| g.short_name().to_string())
            .unwrap_or_else(|| "none".to_string());

        format!("DtedDatabase\n{}geoid.bound: {}\n", kwl, bound)
    }
}

impl fmt::Display for DtedDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Builder for [`DtedDatabase`].
///
/// # Example
///
/// ```ignore
/// use dtedb::DtedDatabaseBuilder;
///
/// let db = DtedDatabaseBuilder::new("/data/dted")
///     .extension("dt1")
///     .upcase(true)
///     .build()?;
/// ```
pub struct DtedDatabaseBuilder {
    config: DatabaseConfig,
    opener: Arc<dyn TileOpener>,
    geoids: Arc<dyn GeoidRegistry>,
    preferences: Arc<dyn Preferences>,
    geoid: Option<Arc<dyn Geoid>>,
}

impl DtedDatabaseBuilder {
    /// Create a new builder with the specified data directory.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            config: DatabaseConfig::new(data_dir.as_ref().to_string_lossy().into_owned()),
            opener: Arc::new(DtedOpener),
            geoids: Arc::new(GeoidManager::with_defaults()),
            preferences: Arc::new(Keywordlist::new()),
            geoid: None,
        }
    }

    /// Create a builder configured from environment variables.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `DTEDB_DATA_DIR` | Root of the DTED tree | Required |
    /// | `DTEDB_EXTENSION` | Cell extension (e.g., `.dt2`) | Detected |
    /// | `DTEDB_UPCASE` | Upper case directory and file names | false |
    /// | `DTEDB_MEMORY_MAP` | Memory-map opened cells | false |
    ///
    /// # Errors
    ///
    /// Returns an error if `DTEDB_DATA_DIR` is not set or a boolean variable
    /// cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let data_dir =
            std::env::var("DTEDB_DATA_DIR").map_err(|_| DtedError::MissingConnectionString)?;

        let mut builder = Self::new(data_dir);

        if let Ok(extension) = std::env::var("DTEDB_EXTENSION") {
            builder.config.set_extension(&extension);
        }
        if let Some(upcase) = env_bool("DTEDB_UPCASE")? {
            builder.config.upcase = upcase;
        }
        if let Some(memory_map) = env_bool("DTEDB_MEMORY_MAP")? {
            builder.config.memory_map_cells = memory_map;
        }

        Ok(builder)
    }

    /// Set the data directory.
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.connection_string = path.as_ref().to_string_lossy().into_owned();
        self
    }

    /// Set the cell extension. A missing leading dot is added.
    pub fn extension(mut self, extension: &str) -> Self {
        self.config.set_extension(extension);
        self
    }

    /// Use upper case hemisphere letters in paths.
    pub fn upcase(mut self, upcase: bool) -> Self {
        self.config.upcase = upcase;
        self
    }

    /// Enable or disable the source.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    /// Memory-map opened cells.
    pub fn memory_map(mut self, memory_map: bool) -> Self {
        self.config.memory_map_cells = memory_map;
        self
    }

    /// Short name of the geoid to look up on open.
    pub fn geoid_name(mut self, name: &str) -> Self {
        self.config.geoid_name = name.to_string();
        self
    }

    /// Bind a geoid directly instead of looking it up.
    pub fn geoid(mut self, geoid: Arc<dyn Geoid>) -> Self {
        self.config.geoid_name = geoid.short_name().to_string();
        self.geoid = Some(geoid);
        self
    }

    /// Replace the configuration wholesale.
    pub fn config(mut self, config: DatabaseConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the factory used to open cells.
    pub fn opener(mut self, opener: Arc<dyn TileOpener>) -> Self {
        self.opener = opener;
        self
    }

    /// Set the registry geoids are looked up in.
    pub fn geoid_registry(mut self, geoids: Arc<dyn GeoidRegistry>) -> Self {
        self.geoids = geoids;
        self
    }

    /// Set the preference store read by [`ElevationDatabase::load_config`].
    pub fn preferences(mut self, preferences: Arc<dyn Preferences>) -> Self {
        self.preferences = preferences;
        self
    }

    /// Build the database and open its data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory is missing, or if no extension
    /// is configured and none can be detected.
    pub fn build(self) -> Result<DtedDatabase> {
        let mut db = self.build_unopened();
        let connection_string = db.config.connection_string.clone();
        db.open(&connection_string)?;
        Ok(db)
    }

    /// Build the database without opening it, e.g. before
    /// [`ElevationDatabase::load_config`].
    pub fn build_unopened(self) -> DtedDatabase {
        DtedDatabase {
            config: self.config,
            opener: self.opener,
            geoids: self.geoids,
            preferences: self.preferences,
            geoid: self.geoid,
            cache: CellCache::new(),
            accuracy_lock: Mutex::new(()),
        }
    }
}

fn env_bool(name: &str) -> Result<Option<bool>> {
    match std::env::var(name) {
        Ok(value) => parse_bool(&value)
            .map(Some)
            .ok_or(DtedError::InvalidValue {
                key: name.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}
