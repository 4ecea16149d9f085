//! Laser scan frames
//!
//! A scan is one of three shapes, chosen when the frame is built: plain
//! geometry, geometry with semantic classes, or geometry with semantic
//! classes and remissions. Consumers match on the variant instead of probing
//! for optional fields.

use crate::error::{Error, Result};
use crate::point::Point3f;
use crate::point_cloud::PointCloud;
use crate::transform::Transform3D;
use itertools::{izip, Itertools};

/// One LiDAR frame
#[derive(Debug, Clone, PartialEq)]
pub enum LaserScan {
    Unlabeled {
        points: PointCloud<Point3f>,
    },
    Labeled {
        points: PointCloud<Point3f>,
        labels: Vec<u32>,
    },
    LabeledWithRemission {
        points: PointCloud<Point3f>,
        labels: Vec<u32>,
        remissions: Vec<f32>,
    },
}

/// Which attributes a scan carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKind {
    Unlabeled,
    Labeled,
    LabeledWithRemission,
}

impl LaserScan {
    pub fn unlabeled(points: PointCloud<Point3f>) -> Self {
        LaserScan::Unlabeled { points }
    }

    /// Build a labeled scan; `labels` hold semantic class ids, one per point
    pub fn labeled(points: PointCloud<Point3f>, labels: Vec<u32>) -> Result<Self> {
        check_len("labels", points.len(), labels.len())?;
        Ok(LaserScan::Labeled { points, labels })
    }

    pub fn labeled_with_remission(
        points: PointCloud<Point3f>,
        labels: Vec<u32>,
        remissions: Vec<f32>,
    ) -> Result<Self> {
        check_len("labels", points.len(), labels.len())?;
        check_len("remissions", points.len(), remissions.len())?;
        Ok(LaserScan::LabeledWithRemission {
            points,
            labels,
            remissions,
        })
    }

    pub fn kind(&self) -> ScanKind {
        match self {
            LaserScan::Unlabeled { .. } => ScanKind::Unlabeled,
            LaserScan::Labeled { .. } => ScanKind::Labeled,
            LaserScan::LabeledWithRemission { .. } => ScanKind::LabeledWithRemission,
        }
    }

    pub fn points(&self) -> &PointCloud<Point3f> {
        match self {
            LaserScan::Unlabeled { points }
            | LaserScan::Labeled { points, .. }
            | LaserScan::LabeledWithRemission { points, .. } => points,
        }
    }

    pub fn labels(&self) -> Option<&[u32]> {
        match self {
            LaserScan::Unlabeled { .. } => None,
            LaserScan::Labeled { labels, .. }
            | LaserScan::LabeledWithRemission { labels, .. } => Some(labels),
        }
    }

    pub fn remissions(&self) -> Option<&[f32]> {
        match self {
            LaserScan::LabeledWithRemission { remissions, .. } => Some(remissions),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.points().len()
    }

    pub fn is_empty(&self) -> bool {
        self.points().is_empty()
    }

    /// Per-point distance from the sensor origin
    pub fn ranges(&self) -> Vec<f32> {
        self.points().ranges()
    }

    /// Drop every point whose semantic class is in `classes`.
    ///
    /// Unlabeled scans are returned unchanged.
    pub fn remove_classes(self, classes: &[u32]) -> Self {
        if classes.is_empty() {
            return self;
        }
        match self {
            LaserScan::Unlabeled { .. } => self,
            LaserScan::Labeled { points, labels } => {
                let (points, labels): (Vec<_>, Vec<_>) = points
                    .points
                    .into_iter()
                    .zip(labels)
                    .filter(|(_, label)| !classes.contains(label))
                    .unzip();
                LaserScan::Labeled {
                    points: PointCloud::from_points(points),
                    labels,
                }
            }
            LaserScan::LabeledWithRemission {
                points,
                labels,
                remissions,
            } => {
                let (kept_points, kept_labels, kept_remissions): (Vec<_>, Vec<_>, Vec<_>) =
                    izip!(points.points, labels, remissions)
                        .filter(|(_, label, _)| !classes.contains(label))
                        .multiunzip();
                LaserScan::LabeledWithRemission {
                    points: PointCloud::from_points(kept_points),
                    labels: kept_labels,
                    remissions: kept_remissions,
                }
            }
        }
    }

    /// Copy of the point positions moved by `transform`, for display in a shared frame
    pub fn transformed_points(&self, transform: &Transform3D) -> PointCloud<Point3f> {
        let mut points = self.points().clone();
        points.transform(transform);
        points
    }
}

fn check_len(what: &str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(Error::InvalidData(format!(
            "scan has {} points but {} {}",
            expected, found, what
        )));
    }
    Ok(())
}
