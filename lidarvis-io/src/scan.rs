//! Point scan readers
//!
//! Two on-disk shapes are understood:
//! - `.bin`: packed little-endian `f32` records of `x y z remission`
//! - `.xyz` / `.txt` / `.csv`: one point per line, `x y z [remission]`,
//!   separated by spaces, tabs, commas or semicolons, with an optional
//!   header line

use lidarvis_core::{Error, Point3f, PointCloud, Result, ScanRecord};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Geometry and optional remissions of a single scan, before labels are attached
#[derive(Debug, Clone, PartialEq)]
pub struct RawScan {
    pub points: PointCloud<Point3f>,
    pub remissions: Option<Vec<f32>>,
}

/// Auto-detect format and read a scan
pub fn read_scan<P: AsRef<Path>>(path: P) -> Result<RawScan> {
    let path = path.as_ref();
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .as_deref()
    {
        Some("bin") => read_velodyne_bin(path),
        Some("xyz") | Some("txt") | Some("csv") => read_ascii_scan(path),
        _ => Err(Error::Unsupported(format!(
            "unsupported scan format: {}",
            path.display()
        ))),
    }
}

/// Read a KITTI velodyne scan
pub fn read_velodyne_bin<P: AsRef<Path>>(path: P) -> Result<RawScan> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let record_size = std::mem::size_of::<ScanRecord>();
    if bytes.len() % record_size != 0 {
        return Err(Error::InvalidData(format!(
            "{}: {} bytes is not a whole number of {}-byte point records",
            path.display(),
            bytes.len(),
            record_size
        )));
    }

    // Records are stored little-endian, which is the host order on every
    // platform the viewer targets.
    let records: Vec<ScanRecord> = bytemuck::pod_collect_to_vec(&bytes);
    let points = records.iter().map(ScanRecord::position).collect();
    let remissions = records.iter().map(|r| r.remission).collect();

    Ok(RawScan {
        points,
        remissions: Some(remissions),
    })
}

/// Separators accepted by the ASCII reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Whitespace,
    Comma,
    Semicolon,
}

impl Delimiter {
    /// Detect delimiter from a line of text
    pub fn detect_from_line(line: &str) -> Self {
        if line.contains(',') {
            Delimiter::Comma
        } else if line.contains(';') {
            Delimiter::Semicolon
        } else {
            Delimiter::Whitespace
        }
    }

    fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        match self {
            Delimiter::Whitespace => line.split_whitespace().collect(),
            Delimiter::Comma => line.split(',').map(str::trim).collect(),
            Delimiter::Semicolon => line.split(';').map(str::trim).collect(),
        }
    }
}

/// Read an ASCII point list
pub fn read_ascii_scan<P: AsRef<Path>>(path: P) -> Result<RawScan> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);

    let mut points = PointCloud::new();
    let mut remissions = Vec::new();
    let mut delimiter = None;
    let mut columns = None;

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let delimiter = *delimiter.get_or_insert_with(|| Delimiter::detect_from_line(trimmed));
        let fields = delimiter.split(trimmed);

        // A leading non-numeric line before any data is a header
        if points.is_empty() && fields.first().map_or(false, |f| f.parse::<f32>().is_err()) {
            continue;
        }

        if fields.len() < 3 {
            return Err(Error::parse(
                path,
                line_no,
                format!("expected at least 3 columns, found {}", fields.len()),
            ));
        }

        let width = *columns.get_or_insert(fields.len().min(4));
        if fields.len().min(4) != width {
            return Err(Error::parse(
                path,
                line_no,
                format!("expected {} columns, found {}", width, fields.len()),
            ));
        }

        let mut values = [0.0f32; 4];
        for (slot, field) in values.iter_mut().zip(fields.iter()).take(width) {
            *slot = field.parse().map_err(|_| {
                Error::parse(path, line_no, format!("invalid number '{}'", field))
            })?;
        }

        points.push(Point3f::new(values[0], values[1], values[2]));
        if width == 4 {
            remissions.push(values[3]);
        }
    }

    let remissions = (columns == Some(4)).then_some(remissions);
    Ok(RawScan { points, remissions })
}
