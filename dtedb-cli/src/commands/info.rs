use anyhow::Result;
use dtedb::ElevationDatabase;

use super::Settings;

pub fn run(settings: &Settings) -> Result<()> {
    let db = settings.open_database()?;

    print!("{}", db.describe());

    if let Some(spacing) = db.mean_spacing_meters() {
        println!();
        println!("Post spacing: ~{:.0}m", spacing);
    }

    Ok(())
}
