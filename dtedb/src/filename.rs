//! DTED path utilities.
//!
//! This module converts between coordinates and the paths of DTED cells in a
//! directory tree.
//!
//! # Layout
//!
//! DTED cells are stored one longitude column per directory:
//!
//! ```text
//! <root>/{e|w}{lon}/{n|s}{lat}{extension}
//! ```
//!
//! - Longitude directory: hemisphere letter and 3 digits (e.g., `w122`, `e005`)
//! - Latitude file: hemisphere letter, 2 digits and the extension (e.g., `n47.dt2`)
//!
//! Letters are lower case unless the database is configured with `upcase`.
//! Both parts name the **southwest corner** of the 1° × 1° cell.

use std::path::{Path, PathBuf};

use crate::point::GeoPoint;

/// Name of the longitude directory holding the cell for `lon`.
///
/// # Examples
///
/// ```
/// use dtedb::filename::lon_dir_name;
///
/// assert_eq!(lon_dir_name(-121.5, false), "w122");
/// assert_eq!(lon_dir_name(5.0, true), "E005");
/// ```
pub fn lon_dir_name(lon: f64, upcase: bool) -> String {
    let lon_int = lon.floor() as i32;
    let prefix = match (lon_int < 0, upcase) {
        (true, false) => 'w',
        (true, true) => 'W',
        (false, false) => 'e',
        (false, true) => 'E',
    };
    format!("{}{:03}", prefix, lon_int.abs())
}

/// Name of the latitude file holding the cell for `lat`.
///
/// `extension` is appended verbatim and should start with a dot.
///
/// # Examples
///
/// ```
/// use dtedb::filename::lat_file_name;
///
/// assert_eq!(lat_file_name(47.2, ".dt2", false), "n47.dt2");
/// assert_eq!(lat_file_name(-3.0, ".dt1", true), "S03.dt1");
/// ```
pub fn lat_file_name(lat: f64, extension: &str, upcase: bool) -> String {
    let lat_int = lat.floor() as i32;
    let prefix = match (lat_int < 0, upcase) {
        (true, false) => 's',
        (true, true) => 'S',
        (false, false) => 'n',
        (false, true) => 'N',
    };
    format!("{}{:02}{}", prefix, lat_int.abs(), extension)
}

/// Path of the cell containing `point`, relative to the database root.
///
/// # Examples
///
/// ```
/// use dtedb::{filename::relative_path, GeoPoint};
/// use std::path::Path;
///
/// let path = relative_path(&GeoPoint::new(47.2, -121.5), ".dt2", false);
/// assert_eq!(path, Path::new("w122").join("n47.dt2"));
/// ```
pub fn relative_path(point: &GeoPoint, extension: &str, upcase: bool) -> PathBuf {
    let mut path = PathBuf::from(lon_dir_name(point.lon, upcase));
    path.push(lat_file_name(point.lat, extension, upcase));
    path
}

/// Full path of the cell containing `point` under `root`.
pub fn full_path(root: &Path, point: &GeoPoint, extension: &str, upcase: bool) -> PathBuf {
    root.join(relative_path(point, extension, upcase))
}

/// Check whether a directory name looks like a longitude directory.
///
/// Only the shape is checked: a leading `e`, `E`, `w` or `W` and exactly
/// four characters.
pub fn is_lon_dir_name(name: &str) -> bool {
    name.chars().count() == 4 && matches!(name.chars().next(), Some('e' | 'E' | 'w' | 'W'))
}

/// Parse a cell path back to its southwest corner `(lat, lon)`.
///
/// The parent directory supplies the longitude and the file stem supplies the
/// latitude. Parsing is case-insensitive and ignores the extension.
///
/// # Examples
///
/// ```
/// use dtedb::filename::cell_from_path;
/// use std::path::Path;
///
/// assert_eq!(cell_from_path(Path::new("/data/w122/n47.dt2")), Some((47, -122)));
/// assert_eq!(cell_from_path(Path::new("E005/S03.DT1")), Some((-3, 5)));
/// assert_eq!(cell_from_path(Path::new("n47.dt2")), None);
/// ```
pub fn cell_from_path(path: &Path) -> Option<(i32, i32)> {
    let lat_name = path.file_stem()?.to_str()?;
    let lon_name = path.parent()?.file_name()?.to_str()?;

    let lat = parse_hemisphere(lat_name, 2, 'n', 's')?;
    let lon = parse_hemisphere(lon_name, 3, 'e', 'w')?;

    Some((lat, lon))
}

/// Parse `{pos|neg}{digits}` where the digit count is fixed.
fn parse_hemisphere(name: &str, digits: usize, pos: char, neg: char) -> Option<i32> {
    let mut chars = name.chars();
    let sign = match chars.next()?.to_ascii_lowercase() {
        c if c == pos => 1,
        c if c == neg => -1,
        _ => return None,
    };

    let rest = chars.as_str();
    if rest.len() != digits || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let value: i32 = rest.parse().ok()?;
    Some(value * sign)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_lon_floors() {
        // floor(-121.5) = -122, floor(47.2) = 47
        let path = relative_path(&GeoPoint::new(47.2, -121.5), ".dt2", false);
        assert_eq!(path, Path::new("w122").join("n47.dt2"));
    }

    #[test]
    fn test_upcase_southern_cell() {
        let path = relative_path(&GeoPoint::new(-3.0, 5.0), ".dt1", true);
        assert_eq!(path, Path::new("E005").join("S03.dt1"));
    }

    #[test]
    fn test_boundary_cases() {
        // Equator and prime meridian
        assert_eq!(lon_dir_name(0.0, false), "e000");
        assert_eq!(lat_file_name(0.0, ".dt0", false), "n00.dt0");
        // floor(-0.1) = -1
        assert_eq!(lon_dir_name(-0.1, false), "w001");
        assert_eq!(lat_file_name(-0.1, ".dt0", false), "s01.dt0");
        // Exactly on a cell boundary belongs to the cell to the north/east
        assert_eq!(lon_dir_name(-122.0, false), "w122");
        assert_eq!(lat_file_name(47.0, ".dt2", false), "n47.dt2");
        assert_eq!(lon_dir_name(-180.0, true), "W180");
        assert_eq!(lon_dir_name(179.9, true), "E179");
    }

    #[test]
    fn test_full_path() {
        let root = Path::new("/data/dted");
        let path = full_path(root, &GeoPoint::new(35.5, 138.7), ".dt1", false);
        assert_eq!(path, root.join("e138").join("n35.dt1"));
    }

    #[test]
    fn test_empty_extension() {
        assert_eq!(lat_file_name(12.5, "", false), "n12");
    }

    #[test]
    fn test_is_lon_dir_name() {
        assert!(is_lon_dir_name("w122"));
        assert!(is_lon_dir_name("E005"));
        assert!(is_lon_dir_name("exyz")); // shape only
        assert!(!is_lon_dir_name("n47"));
        assert!(!is_lon_dir_name("w1220"));
        assert!(!is_lon_dir_name("x122"));
        assert!(!is_lon_dir_name(""));
    }

    #[test]
    fn test_cell_from_path() {
        assert_eq!(
            cell_from_path(Path::new("/data/w122/n47.dt2")),
            Some((47, -122))
        );
        assert_eq!(cell_from_path(Path::new("E005/S03.dt1")), Some((-3, 5)));
        assert_eq!(cell_from_path(Path::new("e000/n00")), Some((0, 0)));
    }

    #[test]
    fn test_cell_from_path_invalid() {
        assert_eq!(cell_from_path(Path::new("n47.dt2")), None); // No parent
        assert_eq!(cell_from_path(Path::new("w12/n47.dt2")), None); // Too short
        assert_eq!(cell_from_path(Path::new("x122/n47.dt2")), None); // Invalid prefix
        assert_eq!(cell_from_path(Path::new("w122/q47.dt2")), None); // Invalid prefix
        assert_eq!(cell_from_path(Path::new("w1a2/n47.dt2")), None); // Non-numeric
    }

    #[test]
    fn test_path_then_parse_recovers_cell() {
        let points = [
            GeoPoint::new(47.2, -121.5),
            GeoPoint::new(-3.0, 5.0),
            GeoPoint::new(-59.9, -179.9),
            GeoPoint::new(0.5, -0.5),
        ];

        for point in points {
            let path = relative_path(&point, ".dt2", true);
            assert_eq!(cell_from_path(&path), Some(point.cell()));
        }
    }
}
