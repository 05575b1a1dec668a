use anyhow::Result;
use dtedb::{ElevationDatabase, GeoPoint};
use serde::Serialize;

use super::Settings;

#[derive(Serialize)]
struct HeightResponse {
    lat: f64,
    lon: f64,
    height: Option<f64>,
    datum: &'static str,
}

pub fn run(settings: &Settings, lat: f64, lon: f64, ellipsoid: bool, json: bool) -> Result<()> {
    let db = settings.open_database()?;
    let point = GeoPoint::new(lat, lon);

    let (height, datum) = if ellipsoid {
        (db.height_above_ellipsoid(&point), "ellipsoid")
    } else {
        (db.height_above_msl(&point), "msl")
    };

    // Output result
    if json {
        let response = HeightResponse {
            lat,
            lon,
            height,
            datum,
        };
        println!("{}", serde_json::to_string(&response)?);
    } else {
        match height {
            Some(h) => println!("{:.2}", h),
            None => println!("no data"),
        }
    }

    Ok(())
}
