use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::Settings;

/// DTED elevation database CLI tool
#[derive(Parser)]
#[command(name = "dtedb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Root directory of the DTED tree
    #[arg(short, long, env = "DTEDB_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Cell file extension (e.g., .dt2); detected when omitted
    #[arg(short, long, env = "DTEDB_EXTENSION", global = true)]
    extension: Option<String>,

    /// Directory and file names are upper case (W122/N47.DT2)
    #[arg(short, long, global = true)]
    upcase: bool,

    /// Keyword list file configuring the source
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Key prefix of the source in the keyword list
    #[arg(long, default_value = "", global = true)]
    prefix: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query height for a single coordinate
    Query {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Report height above the ellipsoid instead of mean sea level
        #[arg(long)]
        ellipsoid: bool,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show accuracy information for a coordinate
    Accuracy {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Print the cell path for a coordinate without touching the disk
    Path {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },

    /// Process heights for multiple coordinates from a CSV file
    Batch {
        /// Input CSV file
        input: PathBuf,

        /// Output file (defaults to <input>_elevation.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column name for latitude
        #[arg(long, default_value = "lat")]
        lat_col: String,

        /// Column name for longitude
        #[arg(long, default_value = "lon")]
        lon_col: String,

        /// Report heights above the ellipsoid
        #[arg(long)]
        ellipsoid: bool,
    },

    /// Display the database configuration
    Info,
}

fn main() -> Result<()> {
    // Initialize tracing; diagnostics go to stderr so stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dtedb=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let settings = Settings {
        data_dir: cli.data_dir,
        extension: cli.extension,
        upcase: cli.upcase,
        config: cli.config,
        prefix: cli.prefix,
    };

    match cli.command {
        Commands::Query {
            lat,
            lon,
            ellipsoid,
            json,
        } => commands::query::run(&settings, lat, lon, ellipsoid, json),
        Commands::Accuracy { lat, lon, json } => {
            commands::accuracy::run(&settings, lat, lon, json)
        }
        Commands::Path { lat, lon } => commands::path::run(&settings, lat, lon),
        Commands::Batch {
            input,
            output,
            lat_col,
            lon_col,
            ellipsoid,
        } => commands::batch::run(&settings, input, output, lat_col, lon_col, ellipsoid),
        Commands::Info => commands::info::run(&settings),
    }
}
