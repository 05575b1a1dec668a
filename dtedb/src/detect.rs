//! Extension detection by directory scan.
//!
//! When no extension is configured the database samples its tree: the first
//! cell file that opens decides the extension (`.dt0`, `.dt1`, `.DT2`, ...)
//! and the spacing estimate. This is a best-effort fallback; configuring the
//! `extension` preference avoids the scan altogether.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DtedError, Result};
use crate::filename::is_lon_dir_name;
use crate::tile::TileOpener;

/// Maximum number of root directories examined.
pub const MAX_DIRS: usize = 10;

/// Maximum number of files examined per longitude directory.
pub const MAX_FILES: usize = 10;

/// Outcome of a successful scan.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedExtension {
    /// Extension of the first readable cell, with leading dot.
    pub extension: String,
    /// Mean post spacing reported by that cell, in meters.
    pub mean_spacing: f64,
    /// The cell that decided the scan.
    pub sample: PathBuf,
}

/// Scan `root` for the first readable cell.
///
/// At most [`MAX_DIRS`] directories of `root` are examined, in name order;
/// only those shaped like a longitude directory (`e`/`w` plus three
/// characters, either case) are entered. Within each, at most [`MAX_FILES`]
/// files are tried with `opener`. The first one that opens wins.
///
/// # Errors
///
/// Returns [`DtedError::Io`] if `root` cannot be listed and
/// [`DtedError::ExtensionNotDetected`] if no candidate opens.
pub fn detect_extension(root: &Path, opener: &dyn TileOpener) -> Result<DetectedExtension> {
    for dir in sorted_entries(root, |p| p.is_dir())?
        .into_iter()
        .take(MAX_DIRS)
    {
        let is_lon_dir = dir
            .file_name()
            .and_then(|n| n.to_str())
            .map(is_lon_dir_name)
            .unwrap_or(false);
        if !is_lon_dir {
            continue;
        }

        let files = match sorted_entries(&dir, |p| p.is_file()) {
            Ok(files) => files,
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "Skipping unreadable directory");
                continue;
            }
        };

        for file in files.into_iter().take(MAX_FILES) {
            let Some(ext) = file.extension().and_then(|e| e.to_str()) else {
                continue;
            };

            match opener.open(&file, false) {
                Ok(mut handle) => {
                    let detected = DetectedExtension {
                        extension: format!(".{}", ext),
                        mean_spacing: handle.mean_spacing_meters(),
                        sample: file.clone(),
                    };
                    handle.close();

                    tracing::debug!(
                        file = %file.display(),
                        extension = %detected.extension,
                        "Found DTED file"
                    );
                    return Ok(detected);
                }
                Err(e) => {
                    tracing::debug!(file = %file.display(), error = %e, "Not a DTED file");
                }
            }
        }
    }

    Err(DtedError::ExtensionNotDetected {
        path: root.to_path_buf(),
    })
}

/// Entries of `dir` accepted by `keep`, sorted by name.
fn sorted_entries(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| keep(path))
        .collect();
    entries.sort();
    Ok(entries)
}
