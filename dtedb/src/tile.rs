//! DTED cell handles.
//!
//! This module defines the [`TileHandle`] and [`TileOpener`] seams the database
//! uses to read cells, and [`DtedTile`], the default handle for DTED level
//! 0/1/2 files.
//!
//! # DTED Layout
//!
//! | Offset | Size | Record |
//! |--------|------|--------|
//! | 0      | 80   | User Header Label (`UHL`) |
//! | 80     | 648  | Data Set Identification (`DSI`) |
//! | 728    | 2700 | Accuracy Description (`ACC`) |
//! | 3428   | ...  | One data record per longitude line, west to east |
//!
//! Each data record is an 8-byte header, one 16-bit post per latitude line
//! (south to north) and a 4-byte checksum. Posts are signed-magnitude
//! big-endian integers in meters; [`NULL_VALUE`] marks a void.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use memmap2::Mmap;

use crate::error::{DtedError, Result};
use crate::filename::cell_from_path;
use crate::point::GeoPoint;

/// Size of the User Header Label record.
pub const UHL_SIZE: usize = 80;

/// Size of the Data Set Identification record.
pub const DSI_SIZE: usize = 648;

/// Size of the Accuracy Description record.
pub const ACC_SIZE: usize = 2700;

/// Offset of the first data record.
pub const DATA_OFFSET: usize = UHL_SIZE + DSI_SIZE + ACC_SIZE; // 3428

/// Bytes around the posts of one data record: 8-byte header + 4-byte checksum.
const RECORD_OVERHEAD: usize = 12;

/// Value indicating no data (void) in DTED files.
pub const NULL_VALUE: i16 = -32767;

/// Meters per degree of arc at the WGS84 equator.
const METERS_PER_DEGREE: f64 = 111_319.490_793_273_58;

/// Accuracy of the elevation data at a point.
#[derive(Debug, Clone, PartialEq)]
pub struct AccuracyInfo {
    /// Confidence level the error figures are stated at (0.0 to 1.0).
    pub confidence_level: f64,
    /// Absolute circular (horizontal) error in meters.
    pub absolute_ce: Option<f64>,
    /// Absolute linear (vertical) error in meters.
    pub absolute_le: Option<f64>,
    /// Relative circular (horizontal) error in meters.
    pub relative_ce: Option<f64>,
    /// Relative linear (vertical) error in meters.
    pub relative_le: Option<f64>,
    /// Vertical datum of the heights.
    pub surface_name: String,
}

/// An open elevation cell.
///
/// A handle covers exactly one fixed cell and owns the file resource behind
/// it until [`close`](TileHandle::close) is called.
pub trait TileHandle: Send {
    /// Check whether the point lies inside this handle's cell.
    fn covers_point(&self, point: &GeoPoint) -> bool;

    /// Height above mean sea level in meters, or `None` without data.
    fn height_above_msl(&self, point: &GeoPoint) -> Option<f64>;

    /// Accuracy information at the point, or `None` outside the cell.
    fn accuracy_info(&self, point: &GeoPoint) -> Option<AccuracyInfo>;

    /// Mean post spacing in meters.
    fn mean_spacing_meters(&self) -> f64;

    /// Release the file resource. Queries after `close` return `None`.
    fn close(&mut self);
}

/// Factory for [`TileHandle`]s.
pub trait TileOpener: Send + Sync {
    /// Open the cell stored at `path`, memory-mapping it if `memory_map` is set.
    fn open(&self, path: &Path, memory_map: bool) -> Result<Box<dyn TileHandle>>;
}

/// Opens files as [`DtedTile`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct DtedOpener;

impl TileOpener for DtedOpener {
    fn open(&self, path: &Path, memory_map: bool) -> Result<Box<dyn TileHandle>> {
        Ok(Box::new(DtedTile::open(path, memory_map)?))
    }
}

/// Backing bytes of an open cell.
enum TileData {
    Mapped(Mmap),
    Buffered(Vec<u8>),
}

impl TileData {
    fn bytes(&self) -> &[u8] {
        match self {
            TileData::Mapped(mmap) => &mmap[..],
            TileData::Buffered(buf) => &buf[..],
        }
    }
}

/// Fields decoded from the UHL and ACC records.
#[derive(Debug, Clone, Copy)]
struct DtedHeader {
    origin_lat: f64,
    origin_lon: f64,
    /// Longitude post interval in tenths of arc seconds.
    lon_interval: u32,
    /// Latitude post interval in tenths of arc seconds.
    lat_interval: u32,
    lon_lines: usize,
    lat_points: usize,
    absolute_ce: Option<f64>,
    absolute_le: Option<f64>,
    relative_ce: Option<f64>,
    relative_le: Option<f64>,
}

/// A DTED cell opened from disk.
///
/// # Example
///
/// ```ignore
/// use dtedb::{tile::{DtedTile, TileHandle}, GeoPoint};
///
/// let tile = DtedTile::open("/data/dted/w122/n47.dt2", true)?;
/// let point = GeoPoint::new(47.2, -121.5);
/// if let Some(height) = tile.height_above_msl(&point) {
///     println!("Height: {:.1}m", height);
/// }
/// ```
pub struct DtedTile {
    path: PathBuf,
    /// `None` once closed.
    data: Option<TileData>,
    header: DtedHeader,
    /// Southwest corner latitude of the covered cell.
    south: i32,
    /// Southwest corner longitude of the covered cell.
    west: i32,
    mean_spacing: f64,
}

impl DtedTile {
    /// Open a DTED cell.
    ///
    /// Coverage is taken from the `<lon-dir>/<lat-file>` name when it follows
    /// the DTED convention, otherwise from the header origin.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist or cannot be read or memory-mapped
    /// - The file is too small or the UHL record is malformed
    /// - The file is shorter than its declared posts
    pub fn open<P: AsRef<Path>>(path: P, memory_map: bool) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DtedError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => DtedError::Io(e),
        })?;

        let data = if memory_map {
            // SAFETY: Memory mapping is safe as long as the file is not modified
            // while mapped. We open the file read-only and don't expose the mapping.
            TileData::Mapped(unsafe { Mmap::map(&file)? })
        } else {
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)?;
            TileData::Buffered(buf)
        };

        let header = parse_header(path, data.bytes())?;

        let expected = DATA_OFFSET + header.lon_lines * record_size(header.lat_points);
        if data.bytes().len() < expected {
            return Err(DtedError::InvalidHeader {
                path: path.to_path_buf(),
                reason: format!(
                    "expected at least {} bytes for {}x{} posts, found {}",
                    expected,
                    header.lon_lines,
                    header.lat_points,
                    data.bytes().len()
                ),
            });
        }

        let (south, west) = cell_from_path(path).unwrap_or((
            header.origin_lat.floor() as i32,
            header.origin_lon.floor() as i32,
        ));

        let mean_spacing = mean_spacing(&header, south as f64 + 0.5);

        tracing::debug!(
            path = %path.display(),
            south,
            west,
            lon_lines = header.lon_lines,
            lat_points = header.lat_points,
            "Opened DTED cell"
        );

        Ok(Self {
            path: path.to_path_buf(),
            data: Some(data),
            header,
            south,
            west,
            mean_spacing,
        })
    }

    /// Path the cell was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Southwest corner `(lat, lon)` of the covered cell.
    pub fn cell(&self) -> (i32, i32) {
        (self.south, self.west)
    }

    /// Number of longitude lines (data records).
    pub fn lon_lines(&self) -> usize {
        self.header.lon_lines
    }

    /// Number of posts per longitude line.
    pub fn lat_points(&self) -> usize {
        self.header.lat_points
    }

    /// Check whether the backing file is still open.
    pub fn is_open(&self) -> bool {
        self.data.is_some()
    }

    /// Read the post on longitude line `line`, latitude index `point`.
    ///
    /// Returns `None` for void posts.
    fn post(&self, data: &[u8], line: usize, point: usize) -> Option<i16> {
        let line = line.min(self.header.lon_lines - 1);
        let point = point.min(self.header.lat_points - 1);

        let offset =
            DATA_OFFSET + line * record_size(self.header.lat_points) + 8 + point * 2;
        let value = decode_signed_magnitude(data[offset], data[offset + 1]);

        (value != NULL_VALUE).then_some(value)
    }
}

impl TileHandle for DtedTile {
    fn covers_point(&self, point: &GeoPoint) -> bool {
        let south = self.south as f64;
        let west = self.west as f64;

        self.data.is_some()
            && (south..=south + 1.0).contains(&point.lat)
            && (west..=west + 1.0).contains(&point.lon)
    }

    fn height_above_msl(&self, point: &GeoPoint) -> Option<f64> {
        if !self.covers_point(point) {
            return None;
        }
        let data = self.data.as_ref()?.bytes();

        // Fractional grid position: x runs west to east, y south to north
        let x = (point.lon - self.west as f64) * (self.header.lon_lines - 1) as f64;
        let y = (point.lat - self.south as f64) * (self.header.lat_points - 1) as f64;

        let x0 = x.floor() as usize;
        let y0 = y.floor() as usize;
        let dx = x - x0 as f64;
        let dy = y - y0 as f64;

        let sw = self.post(data, x0, y0)? as f64;
        let se = self.post(data, x0 + 1, y0)? as f64;
        let nw = self.post(data, x0, y0 + 1)? as f64;
        let ne = self.post(data, x0 + 1, y0 + 1)? as f64;

        let south_edge = sw + (se - sw) * dx;
        let north_edge = nw + (ne - nw) * dx;

        Some(south_edge + (north_edge - south_edge) * dy)
    }

    fn accuracy_info(&self, point: &GeoPoint) -> Option<AccuracyInfo> {
        if !self.covers_point(point) {
            return None;
        }

        Some(AccuracyInfo {
            confidence_level: 0.9,
            absolute_ce: self.header.absolute_ce,
            absolute_le: self.header.absolute_le,
            relative_ce: self.header.relative_ce,
            relative_le: self.header.relative_le,
            surface_name: "MSL".to_string(),
        })
    }

    fn mean_spacing_meters(&self) -> f64 {
        self.mean_spacing
    }

    fn close(&mut self) {
        if self.data.take().is_some() {
            tracing::debug!(path = %self.path.display(), "Closed DTED cell");
        }
    }
}

/// Size in bytes of one data record.
fn record_size(lat_points: usize) -> usize {
    RECORD_OVERHEAD + lat_points * 2
}

/// Decode a big-endian signed-magnitude 16-bit integer.
fn decode_signed_magnitude(hi: u8, lo: u8) -> i16 {
    let raw = u16::from_be_bytes([hi, lo]);
    let magnitude = (raw & 0x7FFF) as i16;
    if raw & 0x8000 != 0 {
        -magnitude
    } else {
        magnitude
    }
}

/// Mean of the latitude and longitude post spacing at `lat`, in meters.
fn mean_spacing(header: &DtedHeader, lat: f64) -> f64 {
    let lat_spacing = header.lat_interval as f64 / 36_000.0 * METERS_PER_DEGREE;
    let lon_spacing =
        header.lon_interval as f64 / 36_000.0 * METERS_PER_DEGREE * lat.to_radians().cos();

    (lat_spacing + lon_spacing) / 2.0
}

fn parse_header(path: &Path, bytes: &[u8]) -> Result<DtedHeader> {
    if bytes.len() < DATA_OFFSET {
        return Err(DtedError::FileTooSmall {
            path: path.to_path_buf(),
            size: bytes.len(),
        });
    }

    let invalid = |reason: &str| DtedError::InvalidHeader {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let uhl = &bytes[..UHL_SIZE];
    if &uhl[0..3] != b"UHL" {
        return Err(invalid("missing UHL sentinel"));
    }

    let origin_lon = parse_angle(&uhl[4..12]).ok_or_else(|| invalid("bad origin longitude"))?;
    let origin_lat = parse_angle(&uhl[12..20]).ok_or_else(|| invalid("bad origin latitude"))?;
    let lon_interval =
        parse_number(&uhl[20..24]).ok_or_else(|| invalid("bad longitude interval"))?;
    let lat_interval =
        parse_number(&uhl[24..28]).ok_or_else(|| invalid("bad latitude interval"))?;
    let uhl_vertical = parse_accuracy(&uhl[28..32]);
    let lon_lines =
        parse_number(&uhl[47..51]).ok_or_else(|| invalid("bad longitude line count"))? as usize;
    let lat_points =
        parse_number(&uhl[51..55]).ok_or_else(|| invalid("bad latitude point count"))? as usize;

    if lon_lines < 2 || lat_points < 2 {
        return Err(invalid("cell needs at least 2x2 posts"));
    }

    // The ACC record is optional in practice; fall back to the UHL figure.
    let acc = &bytes[UHL_SIZE + DSI_SIZE..DATA_OFFSET];
    let (absolute_ce, absolute_le, relative_ce, relative_le) = if &acc[0..3] == b"ACC" {
        (
            parse_accuracy(&acc[3..7]),
            parse_accuracy(&acc[7..11]).or(uhl_vertical),
            parse_accuracy(&acc[11..15]),
            parse_accuracy(&acc[15..19]),
        )
    } else {
        (None, uhl_vertical, None, None)
    };

    Ok(DtedHeader {
        origin_lat,
        origin_lon,
        lon_interval,
        lat_interval,
        lon_lines,
        lat_points,
        absolute_ce,
        absolute_le,
        relative_ce,
        relative_le,
    })
}

/// Parse an 8-byte `DDDMMSSH` angle.
fn parse_angle(field: &[u8]) -> Option<f64> {
    if field.len() != 8 || !field.is_ascii() {
        return None;
    }
    let text = std::str::from_utf8(field).ok()?;

    let degrees: f64 = text[0..3].parse().ok()?;
    let minutes: f64 = text[3..5].parse().ok()?;
    let seconds: f64 = text[5..7].parse().ok()?;
    let value = degrees + minutes / 60.0 + seconds / 3600.0;

    match &text[7..8] {
        "N" | "E" => Some(value),
        "S" | "W" => Some(-value),
        _ => None,
    }
}

/// Parse a space-padded unsigned decimal field.
fn parse_number(field: &[u8]) -> Option<u32> {
    std::str::from_utf8(field).ok()?.trim().parse().ok()
}

/// Parse an accuracy field in meters; `NA` means unknown.
fn parse_accuracy(field: &[u8]) -> Option<f64> {
    parse_number(field).map(f64::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{write_cell, CellSpec};
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_open_reads_header() {
        let dir = TempDir::new().unwrap();
        let path = write_cell(dir.path(), "w122/n47.dt1", &CellSpec::flat(11, 100));

        let tile = DtedTile::open(&path, false).unwrap();
        assert_eq!(tile.cell(), (47, -122));
        assert_eq!(tile.lon_lines(), 11);
        assert_eq!(tile.lat_points(), 11);
        assert!(tile.is_open());
    }

    #[test]
    fn test_memory_mapped_and_buffered_agree() {
        let dir = TempDir::new().unwrap();
        let spec = CellSpec::gradient(11);
        let path = write_cell(dir.path(), "e005/s03.dt1", &spec);

        let mapped = DtedTile::open(&path, true).unwrap();
        let buffered = DtedTile::open(&path, false).unwrap();

        let point = GeoPoint::new(-2.55, 5.35);
        assert_eq!(
            mapped.height_above_msl(&point),
            buffered.height_above_msl(&point)
        );
    }

    #[test]
    fn test_height_on_posts() {
        let dir = TempDir::new().unwrap();
        // Gradient: height = 10 * line + point
        let path = write_cell(dir.path(), "e005/s03.dt1", &CellSpec::gradient(11));
        let tile = DtedTile::open(&path, false).unwrap();

        // Southwest corner -> line 0, point 0
        assert_eq!(tile.height_above_msl(&GeoPoint::new(-3.0, 5.0)), Some(0.0));
        // line 2, point 3
        let h = tile.height_above_msl(&GeoPoint::new(-2.7, 5.2)).unwrap();
        assert!((h - 23.0).abs() < 1e-9);
        // Northeast corner -> line 10, point 10
        assert_eq!(
            tile.height_above_msl(&GeoPoint::new(-2.0, 6.0)),
            Some(110.0)
        );
    }

    #[test]
    fn test_height_interpolated_between_posts() {
        let dir = TempDir::new().unwrap();
        let path = write_cell(dir.path(), "e005/s03.dt1", &CellSpec::gradient(11));
        let tile = DtedTile::open(&path, false).unwrap();

        // Halfway between lines 2/3 and points 3/4 -> 25 + 3.5
        let h = tile.height_above_msl(&GeoPoint::new(-2.65, 5.25)).unwrap();
        assert!((h - 28.5).abs() < 1e-9);
    }

    #[test]
    fn test_void_post_returns_none() {
        let dir = TempDir::new().unwrap();
        let mut spec = CellSpec::flat(11, 250);
        spec.voids.push((0, 0));
        let path = write_cell(dir.path(), "w122/n47.dt2", &spec);
        let tile = DtedTile::open(&path, true).unwrap();

        assert_eq!(tile.height_above_msl(&GeoPoint::new(47.0, -122.0)), None);
        assert_eq!(
            tile.height_above_msl(&GeoPoint::new(47.5, -121.5)),
            Some(250.0)
        );
    }

    #[test]
    fn test_negative_heights() {
        let dir = TempDir::new().unwrap();
        let path = write_cell(dir.path(), "e035/n31.dt0", &CellSpec::flat(11, -420));
        let tile = DtedTile::open(&path, false).unwrap();

        assert_eq!(
            tile.height_above_msl(&GeoPoint::new(31.5, 35.5)),
            Some(-420.0)
        );
    }

    #[test]
    fn test_coverage() {
        let dir = TempDir::new().unwrap();
        let path = write_cell(dir.path(), "w122/n47.dt2", &CellSpec::flat(11, 0));
        let tile = DtedTile::open(&path, false).unwrap();

        assert!(tile.covers_point(&GeoPoint::new(47.2, -121.5)));
        assert!(tile.covers_point(&GeoPoint::new(47.0, -122.0)));
        assert!(tile.covers_point(&GeoPoint::new(48.0, -121.0)));
        assert!(!tile.covers_point(&GeoPoint::new(46.9, -121.5)));
        assert!(!tile.covers_point(&GeoPoint::new(47.5, -122.5)));
        assert_eq!(tile.height_above_msl(&GeoPoint::new(10.0, 10.0)), None);
    }

    #[test]
    fn test_coverage_from_header_when_name_is_unconventional() {
        let dir = TempDir::new().unwrap();
        let mut spec = CellSpec::flat(11, 0);
        spec.origin = (-3, 5);
        let path = write_cell(dir.path(), "cell.dt1", &spec);
        let tile = DtedTile::open(&path, false).unwrap();

        assert_eq!(tile.cell(), (-3, 5));
    }

    #[test]
    fn test_accuracy_info() {
        let dir = TempDir::new().unwrap();
        let mut spec = CellSpec::flat(11, 0);
        spec.accuracy = Some((50, 30, 20, 15));
        let path = write_cell(dir.path(), "w122/n47.dt2", &spec);
        let tile = DtedTile::open(&path, false).unwrap();

        let info = tile.accuracy_info(&GeoPoint::new(47.5, -121.5)).unwrap();
        assert_eq!(info.confidence_level, 0.9);
        assert_eq!(info.absolute_ce, Some(50.0));
        assert_eq!(info.absolute_le, Some(30.0));
        assert_eq!(info.relative_ce, Some(20.0));
        assert_eq!(info.relative_le, Some(15.0));
        assert_eq!(info.surface_name, "MSL");

        assert!(tile.accuracy_info(&GeoPoint::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_accuracy_not_available() {
        let dir = TempDir::new().unwrap();
        let path = write_cell(dir.path(), "w122/n47.dt2", &CellSpec::flat(11, 0));
        let tile = DtedTile::open(&path, false).unwrap();

        let info = tile.accuracy_info(&GeoPoint::new(47.5, -121.5)).unwrap();
        assert_eq!(info.absolute_ce, None);
        assert_eq!(info.absolute_le, None);
    }

    #[test]
    fn test_mean_spacing() {
        let dir = TempDir::new().unwrap();
        // 11 posts per degree -> 0.1° intervals
        let path = write_cell(dir.path(), "e000/n00.dt0", &CellSpec::flat(11, 0));
        let tile = DtedTile::open(&path, false).unwrap();

        let expected_lat = 0.1 * METERS_PER_DEGREE;
        let expected_lon = expected_lat * 0.5_f64.to_radians().cos();
        let expected = (expected_lat + expected_lon) / 2.0;
        assert!((tile.mean_spacing_meters() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_close_releases_data() {
        let dir = TempDir::new().unwrap();
        let path = write_cell(dir.path(), "w122/n47.dt2", &CellSpec::flat(11, 5));
        let mut tile = DtedTile::open(&path, true).unwrap();
        let point = GeoPoint::new(47.5, -121.5);

        assert_eq!(tile.height_above_msl(&point), Some(5.0));
        tile.close();
        assert!(!tile.is_open());
        assert!(!tile.covers_point(&point));
        assert_eq!(tile.height_above_msl(&point), None);

        // Closing twice is harmless
        tile.close();
    }

    #[test]
    fn test_missing_file() {
        let result = DtedTile::open("/nonexistent/w122/n47.dt2", false);
        assert!(matches!(result, Err(DtedError::FileNotFound { .. })));
    }

    #[test]
    fn test_file_too_small() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&vec![0u8; 1000]).unwrap();

        let result = DtedTile::open(file.path(), false);
        if let Err(DtedError::FileTooSmall { size, .. }) = result {
            assert_eq!(size, 1000);
        } else {
            panic!("Expected FileTooSmall error");
        }
    }

    #[test]
    fn test_bad_sentinel() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&vec![b' '; DATA_OFFSET + 100]).unwrap();

        let result = DtedTile::open(file.path(), false);
        assert!(matches!(result, Err(DtedError::InvalidHeader { .. })));
    }

    #[test]
    fn test_truncated_data_records() {
        let dir = TempDir::new().unwrap();
        let path = write_cell(dir.path(), "w122/n47.dt2", &CellSpec::flat(11, 0));
        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 100]).unwrap();

        let result = DtedTile::open(&path, false);
        assert!(matches!(result, Err(DtedError::InvalidHeader { .. })));
    }

    #[test]
    fn test_opener_returns_handle() {
        let dir = TempDir::new().unwrap();
        let path = write_cell(dir.path(), "w122/n47.dt2", &CellSpec::flat(11, 7));

        let handle = DtedOpener.open(&path, false).unwrap();
        assert_eq!(
            handle.height_above_msl(&GeoPoint::new(47.5, -121.5)),
            Some(7.0)
        );
    }

    #[test]
    fn test_decode_signed_magnitude() {
        assert_eq!(decode_signed_magnitude(0x00, 0x64), 100);
        assert_eq!(decode_signed_magnitude(0x80, 0x64), -100);
        assert_eq!(decode_signed_magnitude(0xFF, 0xFF), NULL_VALUE);
        assert_eq!(decode_signed_magnitude(0x80, 0x00), 0);
    }

    #[test]
    fn test_parse_angle() {
        assert_eq!(parse_angle(b"1220000W"), Some(-122.0));
        assert_eq!(parse_angle(b"0473000N"), Some(47.5));
        assert_eq!(parse_angle(b"0000000E"), Some(0.0));
        assert_eq!(parse_angle(b"0473000X"), None);
        assert_eq!(parse_angle(b"04730"), None);
        // Multi-byte text in the field
        assert_eq!(parse_angle("00\u{e9}000W".as_bytes()), None);
        assert_eq!(parse_angle("\u{e9}\u{e9}\u{e9}\u{e9}".as_bytes()), None);
    }

    #[test]
    fn test_non_ascii_origin_is_invalid_header() {
        let dir = TempDir::new().unwrap();
        let path = write_cell(dir.path(), "w122/n47.dt2", &CellSpec::flat(11, 0));
        let mut bytes = std::fs::read(&path).unwrap();
        bytes[4..12].copy_from_slice(b"00\xC3\xA9000W");
        std::fs::write(&path, &bytes).unwrap();

        let result = DtedTile::open(&path, false);
        assert!(matches!(result, Err(DtedError::InvalidHeader { .. })));
        assert!(DtedOpener.open(&path, true).is_err());
    }
}
