//! Geoid models and the registry they are looked up from.
//!
//! A geoid converts heights above mean sea level to heights above the
//! ellipsoid. Grid-based models are supplied by the caller through
//! [`GeoidManager::register`]; the crate itself only ships the trivial models.

use std::sync::Arc;

use crate::point::GeoPoint;

/// A geoid model.
pub trait Geoid: Send + Sync {
    /// Short name the model is registered under (e.g., `geoid1996`).
    fn short_name(&self) -> &str;

    /// Geoid height above the ellipsoid at the point, in meters.
    ///
    /// Returns `None` where the model has no value.
    fn offset_from_ellipsoid(&self, point: &GeoPoint) -> Option<f64>;
}

/// Lookup of geoid models by short name.
pub trait GeoidRegistry: Send + Sync {
    /// Find a registered geoid.
    fn find_by_short_name(&self, name: &str, case_sensitive: bool) -> Option<Arc<dyn Geoid>>;
}

/// Geoid that coincides with the ellipsoid.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityGeoid;

impl Geoid for IdentityGeoid {
    fn short_name(&self) -> &str {
        "identity"
    }

    fn offset_from_ellipsoid(&self, _point: &GeoPoint) -> Option<f64> {
        Some(0.0)
    }
}

/// Geoid with the same offset everywhere.
#[derive(Debug, Clone)]
pub struct ConstantGeoid {
    name: String,
    offset: f64,
}

impl ConstantGeoid {
    pub fn new(name: impl Into<String>, offset: f64) -> Self {
        Self {
            name: name.into(),
            offset,
        }
    }
}

impl Geoid for ConstantGeoid {
    fn short_name(&self) -> &str {
        &self.name
    }

    fn offset_from_ellipsoid(&self, _point: &GeoPoint) -> Option<f64> {
        Some(self.offset)
    }
}

/// In-memory geoid registry.
///
/// # Example
///
/// ```
/// use dtedb::geoid::{ConstantGeoid, GeoidManager, GeoidRegistry};
/// use std::sync::Arc;
///
/// let mut manager = GeoidManager::new();
/// manager.register(Arc::new(ConstantGeoid::new("geoid1996", -19.5)));
///
/// assert!(manager.find_by_short_name("GEOID1996", false).is_some());
/// assert!(manager.find_by_short_name("GEOID1996", true).is_none());
/// ```
#[derive(Default)]
pub struct GeoidManager {
    geoids: Vec<Arc<dyn Geoid>>,
}

impl GeoidManager {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding [`IdentityGeoid`].
    pub fn with_defaults() -> Self {
        let mut manager = Self::new();
        manager.register(Arc::new(IdentityGeoid));
        manager
    }

    /// Add a geoid. A later registration shadows an earlier one of the same name.
    pub fn register(&mut self, geoid: Arc<dyn Geoid>) {
        self.geoids.insert(0, geoid);
    }

    /// Short names of the registered geoids, most recent first.
    pub fn names(&self) -> Vec<String> {
        self.geoids
            .iter()
            .map(|g| g.short_name().to_string())
            .collect()
    }
}

impl GeoidRegistry for GeoidManager {
    fn find_by_short_name(&self, name: &str, case_sensitive: bool) -> Option<Arc<dyn Geoid>> {
        self.geoids
            .iter()
            .find(|g| {
                if case_sensitive {
                    g.short_name() == name
                } else {
                    g.short_name().eq_ignore_ascii_case(name)
                }
            })
            .cloned()
    }
}
