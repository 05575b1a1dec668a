use anyhow::{bail, Context, Result};
use dtedb::{DtedDatabase, ElevationDatabase, GeoPoint};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use super::Settings;

pub fn run(
    settings: &Settings,
    input: PathBuf,
    output: Option<PathBuf>,
    lat_col: String,
    lon_col: String,
    ellipsoid: bool,
) -> Result<()> {
    let extension = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if extension != "csv" {
        bail!("Unsupported file format: {}. Use .csv", extension);
    }

    let db = settings.open_database()?;
    let output_path = match output {
        Some(path) => path,
        None => default_output(&input)?,
    };

    process_csv(&db, &input, &output_path, &lat_col, &lon_col, ellipsoid)?;

    println!("Output written to: {}", output_path.display());

    let stats = db.cache_stats();
    tracing::info!(
        hits = stats.hit_count,
        misses = stats.miss_count,
        hit_rate = stats.hit_rate(),
        "Cell cache usage"
    );
    Ok(())
}

/// `<stem>_elevation.csv` next to the input.
fn default_output(input: &Path) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .context("Input file has no name")?
        .to_string_lossy();
    Ok(input.with_file_name(format!("{}_elevation.csv", stem)))
}

fn process_csv(
    db: &DtedDatabase,
    input: &Path,
    output: &Path,
    lat_col: &str,
    lon_col: &str,
    ellipsoid: bool,
) -> Result<()> {
    let file = File::open(input).context("Failed to open input file")?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    // Find column indices
    let headers = reader.headers()?.clone();
    let lat_idx = headers
        .iter()
        .position(|h| h == lat_col)
        .with_context(|| format!("Column '{}' not found in CSV", lat_col))?;
    let lon_idx = headers
        .iter()
        .position(|h| h == lon_col)
        .with_context(|| format!("Column '{}' not found in CSV", lon_col))?;

    // Collect records for progress bar
    let records: Vec<_> = reader.records().collect::<Result<_, _>>()?;

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let output_file = File::create(output).context("Failed to create output file")?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(output_file));

    let mut new_headers: Vec<&str> = headers.iter().collect();
    new_headers.push("height");
    writer.write_record(&new_headers)?;

    for (row, record) in records.iter().enumerate() {
        let lat: f64 = record
            .get(lat_idx)
            .context("Missing latitude")?
            .trim()
            .parse()
            .with_context(|| format!("Invalid latitude on row {}", row + 1))?;
        let lon: f64 = record
            .get(lon_idx)
            .context("Missing longitude")?
            .trim()
            .parse()
            .with_context(|| format!("Invalid longitude on row {}", row + 1))?;

        let point = GeoPoint::new(lat, lon);
        let height = if ellipsoid {
            db.height_above_ellipsoid(&point)
        } else {
            db.height_above_msl(&point)
        };
        let height = height
            .map(|h| format!("{:.2}", h))
            .unwrap_or_default();

        let mut new_record: Vec<&str> = record.iter().collect();
        new_record.push(&height);
        writer.write_record(&new_record)?;

        pb.inc(1);
    }

    pb.finish_with_message("done");
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output() {
        let path = default_output(Path::new("/tmp/points.csv")).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/points_elevation.csv"));
    }
}
