//! File input and output helpers for drawn features.

pub mod geojson;

use std::fs::File;
use std::io::{self, Read};

use crate::error::{Error, Result};
use crate::geometry::Point;

/// Reads a file to string.
pub fn read_to_string(path: &str) -> io::Result<String> {
    let mut buffer = String::new();
    File::open(path)?.read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Writes a string to a file, replacing it.
pub fn write_string(path: &str, contents: &str) -> io::Result<()> {
    std::fs::write(path, contents)
}

/// Parses `x,y` coordinates, one per line. Blank lines and `#` comments
/// are skipped.
pub fn parse_points_csv(text: &str) -> Result<Vec<Point>> {
    let mut pts = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() != 2 {
            return Err(Error::InvalidData(format!("line {}: expected x,y", idx + 1)));
        }
        let x: f64 = parts[0]
            .trim()
            .parse()
            .map_err(|e| Error::InvalidData(format!("line {}: {}", idx + 1, e)))?;
        let y: f64 = parts[1]
            .trim()
            .parse()
            .map_err(|e| Error::InvalidData(format!("line {}: {}", idx + 1, e)))?;
        pts.push(Point::new(x, y));
    }
    Ok(pts)
}

/// Reads `x,y` coordinates from a CSV file.
pub fn read_points_csv(path: &str) -> Result<Vec<Point>> {
    parse_points_csv(&read_to_string(path)?)
}
