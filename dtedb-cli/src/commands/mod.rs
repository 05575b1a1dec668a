pub mod accuracy;
pub mod batch;
pub mod info;
pub mod path;
pub mod query;

use anyhow::{Context, Result};
use dtedb::{DtedDatabase, DtedDatabaseBuilder, ElevationDatabase, Keywordlist};
use std::path::PathBuf;
use std::sync::Arc;

/// Options shared by every command.
pub struct Settings {
    pub data_dir: Option<PathBuf>,
    pub extension: Option<String>,
    pub upcase: bool,
    pub config: Option<PathBuf>,
    pub prefix: String,
}

impl Settings {
    /// Keyword list from `--config` with command line overrides applied.
    ///
    /// The same list serves as base configuration and preference store.
    pub fn keywords(&self) -> Result<Option<Keywordlist>> {
        let Some(path) = &self.config else {
            return Ok(None);
        };

        let mut kwl = Keywordlist::from_file(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        if let Some(dir) = &self.data_dir {
            kwl.add(&self.prefix, "connection_string", dir.display());
        }
        if let Some(extension) = &self.extension {
            kwl.add(&self.prefix, "extension", extension);
        }
        if self.upcase {
            kwl.add(&self.prefix, "upcase", true);
        }

        Ok(Some(kwl))
    }

    /// Open the database described by these settings.
    pub fn open_database(&self) -> Result<DtedDatabase> {
        if let Some(kwl) = self.keywords()? {
            let mut db = DtedDatabaseBuilder::new("")
                .preferences(Arc::new(kwl.clone()))
                .build_unopened();
            db.load_config(&kwl, &self.prefix)
                .context("Failed to configure DTED database")?;
            return Ok(db);
        }

        let mut builder = match &self.data_dir {
            Some(dir) => DtedDatabaseBuilder::new(dir),
            None => DtedDatabaseBuilder::from_env().context(
                "DTEDB_DATA_DIR environment variable not set. Use --data-dir or set DTEDB_DATA_DIR",
            )?,
        };

        if let Some(extension) = &self.extension {
            builder = builder.extension(extension);
        }
        if self.upcase {
            builder = builder.upcase(true);
        }

        builder.build().context("Failed to open DTED database")
    }
}
