//! Sequence directory layout and frame loading
//!
//! ```text
//! <root>/config.yaml
//! <root>/sequences/<seq>/velodyne/*.bin
//! <root>/sequences/<seq>/labels/*.label        (or <predictions>/sequences/<seq>/predictions)
//! <root>/sequences/<seq>/calib.txt             (optional)
//! <root>/sequences/<seq>/poses.txt             (optional)
//! ```

use crate::calibration::{parse_calibration, parse_poses};
use crate::labels::read_labels;
use crate::scan::{read_scan, RawScan};
use lidarvis_core::{Error, LaserScan, Result, Transform3D};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Where to find a sequence and whether to load its labels
#[derive(Debug, Clone)]
pub struct DatasetOptions {
    pub root: PathBuf,
    pub sequence: String,
    /// Alternate root holding `sequences/<seq>/predictions`
    pub predictions: Option<PathBuf>,
    pub ignore_semantics: bool,
}

impl DatasetOptions {
    pub fn new(root: impl Into<PathBuf>, sequence: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            sequence: sequence.into(),
            predictions: None,
            ignore_semantics: false,
        }
    }

    pub fn sequence_dir(&self) -> PathBuf {
        self.root.join("sequences").join(&self.sequence)
    }

    pub fn scan_dir(&self) -> PathBuf {
        self.sequence_dir().join("velodyne")
    }

    pub fn label_dir(&self) -> PathBuf {
        match &self.predictions {
            Some(predictions) => predictions
                .join("sequences")
                .join(&self.sequence)
                .join("predictions"),
            None => self.sequence_dir().join("labels"),
        }
    }

    pub fn scan_config_path(&self) -> PathBuf {
        self.root.join("config.yaml")
    }
}

/// A single loaded frame
#[derive(Debug, Clone)]
pub struct Frame {
    pub index: usize,
    pub scan: LaserScan,
    /// Pose of the scan in the first scan's velodyne frame, when poses are available
    pub pose: Option<Transform3D>,
}

/// Frame source over one sequence
#[derive(Debug, Clone)]
pub struct SequenceDataset {
    scan_paths: Vec<PathBuf>,
    label_paths: Option<Vec<PathBuf>>,
    poses: Option<Vec<Transform3D>>,
}

impl SequenceDataset {
    pub fn open(options: &DatasetOptions) -> Result<Self> {
        let scan_dir = options.scan_dir();
        if !scan_dir.is_dir() {
            return Err(Error::Config(format!(
                "sequence folder {} doesn't exist",
                scan_dir.display()
            )));
        }
        info!("Sequence folder exists! Using sequence from {}", scan_dir.display());

        let scan_paths = list_files(&scan_dir)?;
        if scan_paths.is_empty() {
            return Err(Error::Config(format!(
                "sequence folder {} holds no scans",
                scan_dir.display()
            )));
        }

        let label_paths = if options.ignore_semantics {
            None
        } else {
            let label_dir = options.label_dir();
            if !label_dir.is_dir() {
                return Err(Error::Config(format!(
                    "labels folder {} doesn't exist",
                    label_dir.display()
                )));
            }
            info!("Labels folder exists! Using labels from {}", label_dir.display());

            let label_paths = list_files(&label_dir)?;
            if label_paths.len() != scan_paths.len() {
                return Err(Error::InvalidData(format!(
                    "{} label files for {} scans",
                    label_paths.len(),
                    scan_paths.len()
                )));
            }
            Some(label_paths)
        };

        let poses = load_poses(&options.sequence_dir(), scan_paths.len())?;

        Ok(Self {
            scan_paths,
            label_paths,
            poses,
        })
    }

    pub fn len(&self) -> usize {
        self.scan_paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scan_paths.is_empty()
    }

    pub fn has_labels(&self) -> bool {
        self.label_paths.is_some()
    }

    pub fn poses(&self) -> Option<&[Transform3D]> {
        self.poses.as_deref()
    }

    pub fn scan_path(&self, index: usize) -> Option<&Path> {
        self.scan_paths.get(index).map(PathBuf::as_path)
    }

    /// Load frame `index`, dropping points whose class is in `ignore_classes`
    pub fn frame(&self, index: usize, ignore_classes: &[u32]) -> Result<Frame> {
        let scan_path = self.scan_path(index).ok_or_else(|| {
            Error::InvalidData(format!("frame {} out of range 0..{}", index, self.len()))
        })?;

        let RawScan { points, remissions } = read_scan(scan_path)?;
        let scan = match &self.label_paths {
            None => LaserScan::unlabeled(points),
            Some(label_paths) => {
                let labels = read_labels(&label_paths[index])?;
                let scan = match remissions {
                    Some(remissions) => {
                        LaserScan::labeled_with_remission(points, labels, remissions)?
                    }
                    None => LaserScan::labeled(points, labels)?,
                };
                scan.remove_classes(ignore_classes)
            }
        };

        Ok(Frame {
            index,
            scan,
            pose: self.poses.as_ref().map(|poses| poses[index]),
        })
    }
}

fn load_poses(sequence_dir: &Path, scan_count: usize) -> Result<Option<Vec<Transform3D>>> {
    let calib_path = sequence_dir.join("calib.txt");
    let poses_path = sequence_dir.join("poses.txt");
    if !calib_path.is_file() || !poses_path.is_file() {
        warn!(
            "No calib.txt/poses.txt in {}: points stay in the scan frame",
            sequence_dir.display()
        );
        return Ok(None);
    }

    info!("Opening calibration file {}", calib_path.display());
    let calibration = parse_calibration(&calib_path)?;
    info!("Opening poses file {}", poses_path.display());
    let poses = parse_poses(&poses_path, &calibration)?;
    if poses.len() < scan_count {
        return Err(Error::InvalidData(format!(
            "{} poses for {} scans",
            poses.len(),
            scan_count
        )));
    }
    Ok(Some(poses))
}

/// All regular files below `dir`, recursively, sorted by path
fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/**/*", glob::Pattern::escape(&dir.to_string_lossy()));
    let entries = glob::glob(&pattern).map_err(|e| Error::Config(e.to_string()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::Io(e.into_error()))?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
