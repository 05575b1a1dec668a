//! Synthetic DTED cells for unit tests.

use std::fs;
use std::path::{Path, PathBuf};

use crate::filename::cell_from_path;
use crate::tile::{ACC_SIZE, DSI_SIZE};

/// Post values of a synthetic cell.
#[derive(Debug, Clone, Copy)]
pub enum Heights {
    /// Every post has the same height.
    Flat(i16),
    /// `10 * line + point`, so each post is identifiable.
    Gradient,
}

/// Description of a synthetic cell.
#[derive(Debug, Clone)]
pub struct CellSpec {
    /// Posts per side; the cell spans exactly one degree.
    pub posts: usize,
    pub heights: Heights,
    /// `(line, point)` posts written as void.
    pub voids: Vec<(usize, usize)>,
    /// Header origin, used when the file name does not encode the cell.
    pub origin: (i32, i32),
    /// ACC record: absolute CE, absolute LE, relative CE, relative LE.
    pub accuracy: Option<(u32, u32, u32, u32)>,
}

impl CellSpec {
    pub fn flat(posts: usize, height: i16) -> Self {
        Self {
            posts,
            heights: Heights::Flat(height),
            voids: Vec::new(),
            origin: (0, 0),
            accuracy: None,
        }
    }

    pub fn gradient(posts: usize) -> Self {
        Self {
            heights: Heights::Gradient,
            ..Self::flat(posts, 0)
        }
    }

    fn height(&self, line: usize, point: usize) -> i16 {
        if self.voids.contains(&(line, point)) {
            return crate::tile::NULL_VALUE;
        }
        match self.heights {
            Heights::Flat(h) => h,
            Heights::Gradient => (10 * line + point) as i16,
        }
    }
}

/// Write a synthetic cell at `root/relative`, creating parent directories.
pub fn write_cell(root: &Path, relative: &str, spec: &CellSpec) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }

    let (lat, lon) = cell_from_path(&path).unwrap_or(spec.origin);
    fs::write(&path, encode_cell(lat, lon, spec)).unwrap();
    path
}

fn encode_cell(lat: i32, lon: i32, spec: &CellSpec) -> Vec<u8> {
    let interval = 36_000 / (spec.posts - 1);
    let lon_hemi = if lon < 0 { 'W' } else { 'E' };
    let lat_hemi = if lat < 0 { 'S' } else { 'N' };

    let mut uhl = format!(
        "UHL1{:03}0000{}{:03}0000{}{:04}{:04}NA  U  {:12}{:04}{:04}0",
        lon.abs(),
        lon_hemi,
        lat.abs(),
        lat_hemi,
        interval,
        interval,
        "",
        spec.posts,
        spec.posts
    );
    uhl.push_str(&" ".repeat(80 - uhl.len()));

    let mut dsi = String::from("DSIU");
    dsi.push_str(&" ".repeat(DSI_SIZE - dsi.len()));

    let mut acc = String::from("ACC");
    match spec.accuracy {
        Some((ace, ale, rce, rle)) => {
            acc.push_str(&format!("{:04}{:04}{:04}{:04}", ace, ale, rce, rle))
        }
        None => acc.push_str("NA  NA  NA  NA  "),
    }
    acc.push_str(&" ".repeat(ACC_SIZE - acc.len()));

    let mut data = Vec::new();
    data.extend_from_slice(uhl.as_bytes());
    data.extend_from_slice(dsi.as_bytes());
    data.extend_from_slice(acc.as_bytes());

    for line in 0..spec.posts {
        data.push(0xAA);
        data.extend_from_slice(&[0, 0, 0]);
        data.extend_from_slice(&(line as u16).to_be_bytes());
        data.extend_from_slice(&[0, 0]);
        for point in 0..spec.posts {
            data.extend_from_slice(&encode_signed_magnitude(spec.height(line, point)));
        }
        data.extend_from_slice(&[0, 0, 0, 0]);
    }

    data
}

fn encode_signed_magnitude(value: i16) -> [u8; 2] {
    let raw = if value < 0 {
        0x8000 | value.unsigned_abs()
    } else {
        value as u16
    };
    raw.to_be_bytes()
}
