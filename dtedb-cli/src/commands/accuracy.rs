use anyhow::Result;
use dtedb::{ElevationDatabase, GeoPoint};
use serde::Serialize;

use super::Settings;

#[derive(Serialize)]
struct AccuracyResponse {
    lat: f64,
    lon: f64,
    available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    confidence_level: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    absolute_ce: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    absolute_le: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    relative_ce: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    relative_le: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    surface: Option<String>,
}

pub fn run(settings: &Settings, lat: f64, lon: f64, json: bool) -> Result<()> {
    let db = settings.open_database()?;
    let info = db.accuracy_info(&GeoPoint::new(lat, lon));

    if json {
        let response = AccuracyResponse {
            lat,
            lon,
            available: info.is_some(),
            confidence_level: info.as_ref().map(|i| i.confidence_level),
            absolute_ce: info.as_ref().and_then(|i| i.absolute_ce),
            absolute_le: info.as_ref().and_then(|i| i.absolute_le),
            relative_ce: info.as_ref().and_then(|i| i.relative_ce),
            relative_le: info.as_ref().and_then(|i| i.relative_le),
            surface: info.map(|i| i.surface_name),
        };
        println!("{}", serde_json::to_string(&response)?);
        return Ok(());
    }

    let Some(info) = info else {
        println!("no data");
        return Ok(());
    };

    println!("Surface: {}", info.surface_name);
    println!("Confidence: {:.0}%", info.confidence_level * 100.0);
    println!("Absolute CE: {}", format_error(info.absolute_ce));
    println!("Absolute LE: {}", format_error(info.absolute_le));
    println!("Relative CE: {}", format_error(info.relative_ce));
    println!("Relative LE: {}", format_error(info.relative_le));

    Ok(())
}

fn format_error(value: Option<f64>) -> String {
    match value {
        Some(meters) => format!("{:.0}m", meters),
        None => "n/a".to_string(),
    }
}
