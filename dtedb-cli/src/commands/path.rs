use anyhow::{bail, Context, Result};
use dtedb::config::normalize_extension;
use dtedb::filename::full_path;
use dtedb::{GeoPoint, Preferences};
use std::path::PathBuf;

use super::Settings;

/// Print the cell path for a point. Only the config file is read.
pub fn run(settings: &Settings, lat: f64, lon: f64) -> Result<()> {
    let kwl = settings.keywords()?;

    let root = match (&kwl, &settings.data_dir) {
        (Some(kwl), _) => kwl
            .find(&settings.prefix, "connection_string")
            .map(PathBuf::from)
            .context("Config file has no connection_string")?,
        (None, Some(dir)) => dir.clone(),
        (None, None) => PathBuf::from(std::env::var("DTEDB_DATA_DIR").context(
            "DTEDB_DATA_DIR environment variable not set. Use --data-dir or set DTEDB_DATA_DIR",
        )?),
    };

    let extension = match &kwl {
        Some(kwl) => kwl.lookup(&settings.prefix, "extension"),
        None => settings.extension.clone(),
    };
    let Some(extension) = extension else {
        bail!("The path command needs an extension. Use --extension, e.g. --extension .dt2");
    };

    let upcase = match &kwl {
        Some(kwl) => kwl.find_bool(&settings.prefix, "upcase")?.unwrap_or(false),
        None => settings.upcase,
    };

    let path = full_path(
        &root,
        &GeoPoint::new(lat, lon),
        &normalize_extension(&extension),
        upcase,
    );
    println!("{}", path.display());

    Ok(())
}
