//! `calib.txt` and `poses.txt` parsing

use lidarvis_core::{Error, Result, Transform3D};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Named calibration matrices, e.g. `P0`..`P3` and `Tr`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Calibration {
    pub entries: BTreeMap<String, Transform3D>,
}

impl Calibration {
    pub fn get(&self, key: &str) -> Option<&Transform3D> {
        self.entries.get(key)
    }

    /// The velodyne-to-camera transform
    pub fn velo_to_cam(&self) -> Option<&Transform3D> {
        self.get("Tr")
    }
}

fn parse_row_major_3x4(
    path: &Path,
    line_no: usize,
    content: &str,
) -> Result<Transform3D> {
    let values = content
        .split_whitespace()
        .map(|v| {
            v.parse::<f32>()
                .map_err(|_| Error::parse(path, line_no, format!("invalid number '{}'", v)))
        })
        .collect::<Result<Vec<f32>>>()?;

    let block: [f32; 12] = values
        .get(..12)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| {
            Error::parse(
                path,
                line_no,
                format!("expected at least 12 values, found {}", values.len()),
            )
        })?;

    Ok(Transform3D::from_rows_3x4(&block))
}

/// Read a calibration file made of `key: v0 v1 ... v11` lines
pub fn parse_calibration<P: AsRef<Path>>(path: P) -> Result<Calibration> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let mut calibration = Calibration::default();

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let (key, content) = line
            .split_once(':')
            .ok_or_else(|| Error::parse(path, line_no, "expected 'key: values'"))?;
        let transform = parse_row_major_3x4(path, line_no, content)?;
        calibration.entries.insert(key.trim().to_string(), transform);
    }

    Ok(calibration)
}

/// Read per-scan poses and express them in the velodyne frame: `Tr⁻¹ · pose · Tr`
pub fn parse_poses<P: AsRef<Path>>(path: P, calibration: &Calibration) -> Result<Vec<Transform3D>> {
    let path = path.as_ref();
    let tr = *calibration
        .velo_to_cam()
        .ok_or_else(|| Error::Config("calibration has no 'Tr' entry".to_string()))?;
    if tr.inverse().is_none() {
        return Err(Error::Config("calibration 'Tr' is not invertible".to_string()));
    }

    let reader = BufReader::new(File::open(path)?);
    let mut poses = Vec::new();
    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let pose = parse_row_major_3x4(path, line_idx + 1, &line)?;
        if let Some(corrected) = Transform3D::conjugate(pose, tr) {
            poses.push(corrected);
        }
    }

    Ok(poses)
}
