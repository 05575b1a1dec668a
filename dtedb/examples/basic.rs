//! Basic example demonstrating dtedb library usage.
//!
//! Run with: cargo run --example basic -- /path/to/dted [extension]

use dtedb::{DtedDatabaseBuilder, DtedError, ElevationDatabase, GeoPoint};
use std::env;

fn main() -> Result<(), DtedError> {
    // Get data directory from command line
    let data_dir = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --example basic -- /path/to/dted [extension]");
        std::process::exit(1);
    });

    // Without an extension the tree is scanned for one
    let mut builder = DtedDatabaseBuilder::new(&data_dir);
    if let Some(extension) = env::args().nth(2) {
        builder = builder.extension(&extension);
    }
    let db = builder.build()?;

    println!("{}", db.describe());

    let locations = [
        ("Mount Rainier, USA", 46.8523, -121.7603),
        ("Mount Fuji, Japan", 35.3606, 138.7274),
        ("Mount Everest, Nepal", 27.9881, 86.9250),
    ];

    println!("Heights above mean sea level:");
    println!("{:-<50}", "");

    for (name, lat, lon) in &locations {
        let point = GeoPoint::new(*lat, *lon);
        match db.height_above_msl(&point) {
            Some(height) => println!("{}: {:.1}m", name, height),
            None => println!("{}: no data", name),
        }
        if let Some(info) = db.accuracy_info(&point) {
            if let Some(le) = info.absolute_le {
                println!("  absolute vertical error: {:.0}m", le);
            }
        }
    }

    let stats = db.cache_stats();
    println!("\nCache statistics:");
    println!("  Hits: {}", stats.hit_count);
    println!("  Misses: {}", stats.miss_count);
    println!("  Hit rate: {:.1}%", stats.hit_rate() * 100.0);

    Ok(())
}
