//! # DTEDB - DTED Elevation Database
//!
//! Point elevation queries over a directory tree of DTED (Digital Terrain
//! Elevation Data) cells.
//!
//! ## Features
//!
//! - **Direct lookup**: the cell for a point is found by name, no index needed
//! - **Single-slot cache**: the last cell used stays open for nearby queries
//! - **Extension detection**: `.dt0`/`.dt1`/`.dt2` found by sampling the tree
//! - **Thread-safe**: one database can be shared across threads
//!
//! ## Quick Start
//!
//! ```ignore
//! use dtedb::{DtedDatabaseBuilder, ElevationDatabase, GeoPoint};
//!
//! let db = DtedDatabaseBuilder::new("/data/dted").extension(".dt2").build()?;
//!
//! let point = GeoPoint::new(47.2, -121.5);
//! match db.height_above_msl(&point) {
//!     Some(height) => println!("Height: {:.1}m", height),
//!     None => println!("No data"),
//! }
//! ```
//!
//! ## Directory Layout
//!
//! Cells are one degree square. The cell whose southwest corner is at
//! (47°N, 122°W) lives at `w122/n47.dt2`:
//!
//! - one directory per longitude, `e` or `w` plus three digits
//! - one file per latitude, `n` or `s` plus two digits and the extension
//!
//! Trees written with upper case names (`W122/N47.DT2`) are read with
//! `upcase` set.

pub mod cache;
pub mod config;
pub mod database;
pub mod detect;
pub mod error;
pub mod filename;
pub mod geoid;
pub mod keywords;
pub mod point;
pub mod tile;

#[cfg(test)]
mod fixtures;

// Re-export main types at crate root for convenience
pub use cache::CacheStats;
pub use config::DatabaseConfig;
pub use database::{DtedDatabase, DtedDatabaseBuilder, ElevationDatabase};
pub use error::{DtedError, Result};
pub use geoid::{Geoid, GeoidManager, GeoidRegistry};
pub use keywords::{Keywordlist, Preferences};
pub use point::GeoPoint;
pub use tile::{AccuracyInfo, DtedOpener, DtedTile, TileHandle, TileOpener, NULL_VALUE};
