//! Spherical projection of a scan into a fixed-size range image

use lidarvis_core::{range_of, Error, LaserScan, Point3f, Result};
use ndarray::Array2;
use std::f32::consts::PI;

/// Value of a scalar pixel that no point landed in
pub const EMPTY: f32 = -1.0;

/// Returns true when a scalar grid value holds data
pub fn is_occupied(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

/// Sensor geometry used to bin points into pixels
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionParams {
    /// Upper vertical field-of-view bound, degrees
    pub fov_up: f32,
    /// Lower vertical field-of-view bound, degrees
    pub fov_down: f32,
    /// Number of rows (beams)
    pub height: usize,
    /// Number of horizontal bins
    pub width: usize,
    /// Per-beam elevation angles in degrees, sorted ascending
    pub beam_angles: Option<Vec<f32>>,
}

impl ProjectionParams {
    pub fn new(fov_up: f32, fov_down: f32, height: usize, width: usize) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(Error::InvalidData(format!(
                "projection image must be at least 1x1, got {}x{}",
                height, width
            )));
        }
        Ok(Self {
            fov_up,
            fov_down,
            height,
            width,
            beam_angles: None,
        })
    }

    /// Bin rows by nearest beam elevation instead of equidistant angles
    pub fn with_beam_angles(mut self, mut angles: Vec<f32>) -> Result<Self> {
        if angles.len() != self.height {
            return Err(Error::InvalidData(format!(
                "{} beam angles for an image of height {}",
                angles.len(),
                self.height
            )));
        }
        angles.sort_by(f32::total_cmp);
        self.beam_angles = Some(angles);
        Ok(self)
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Pixel `(row, col)` a point falls into, or `None` if its range is zero or invalid
    pub fn pixel_of(&self, point: &Point3f) -> Option<(usize, usize)> {
        let range = range_of(point);
        if !range.is_finite() || range <= 0.0 {
            return None;
        }

        let yaw = point.y.atan2(point.x);
        let pitch = (point.z / range).clamp(-1.0, 1.0).asin();

        Some((self.row_of(pitch), self.col_of(yaw)))
    }

    fn row_of(&self, pitch: f32) -> usize {
        let max_row = (self.height - 1) as f32;

        if let Some(angles) = &self.beam_angles {
            let pitch_deg = pitch.to_degrees();
            return angles
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| {
                    (*a - pitch_deg).abs().total_cmp(&(*b - pitch_deg).abs())
                })
                .map_or(0, |(row, _)| row);
        }

        let fov_down = self.fov_down.to_radians();
        let span = self.fov_up.to_radians() - fov_down;
        // zero-height field of view: everything lands on the first row
        let v = if span.abs() <= f32::EPSILON {
            0.0
        } else {
            (pitch - fov_down) / span
        };

        (v * max_row).round().clamp(0.0, max_row) as usize
    }

    fn col_of(&self, yaw: f32) -> usize {
        let max_col = (self.width - 1) as f32;
        let u = 0.5 * (yaw / PI + 1.0);
        (u * self.width as f32).floor().clamp(0.0, max_col) as usize
    }
}

/// The grids produced by projecting one scan.
///
/// Row 0 holds the lowest elevation.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeProjection {
    /// Range of the point in each pixel, `EMPTY` where none landed
    pub range: Array2<f32>,
    /// Index of the point that owns each pixel
    pub index: Array2<Option<usize>>,
    /// Semantic class per pixel, present for labeled scans
    pub label: Option<Array2<Option<u32>>>,
    /// Remission per pixel, present for scans that carry remissions
    pub remission: Option<Array2<f32>>,
    /// Pixel of every input point, `None` for points that were skipped
    pub point_pixels: Vec<Option<(usize, usize)>>,
}

impl RangeProjection {
    pub fn shape(&self) -> (usize, usize) {
        self.range.dim()
    }

    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.index[[row, col]].is_some()
    }

    pub fn occupied_count(&self) -> usize {
        self.index.iter().filter(|i| i.is_some()).count()
    }
}

/// Project a scan onto a `height x width` grid.
///
/// Each point's pixel is found by yaw/pitch binning; when several points land
/// in the same pixel the one that comes last in scan order wins. Points with
/// zero or non-finite range are skipped.
pub fn project(scan: &LaserScan, params: &ProjectionParams) -> RangeProjection {
    let shape = params.shape();
    let points = scan.points();
    let labels = scan.labels();
    let remissions = scan.remissions();

    let mut range = Array2::from_elem(shape, EMPTY);
    let mut index = Array2::from_elem(shape, None);
    let mut label_grid = labels.map(|_| Array2::from_elem(shape, None));
    let mut remission_grid = remissions.map(|_| Array2::from_elem(shape, EMPTY));
    let mut point_pixels = Vec::with_capacity(points.len());

    for (i, point) in points.iter().enumerate() {
        let pixel = params.pixel_of(point);
        point_pixels.push(pixel);
        let Some((row, col)) = pixel else {
            continue;
        };

        range[[row, col]] = range_of(point);
        index[[row, col]] = Some(i);
        if let (Some(grid), Some(labels)) = (label_grid.as_mut(), labels) {
            grid[[row, col]] = Some(labels[i]);
        }
        if let (Some(grid), Some(remissions)) = (remission_grid.as_mut(), remissions) {
            grid[[row, col]] = remissions[i];
        }
    }

    let skipped = point_pixels.iter().filter(|p| p.is_none()).count();
    if skipped > 0 {
        log::debug!("projection skipped {} points with invalid range", skipped);
    }

    RangeProjection {
        range,
        index,
        label: label_grid,
        remission: remission_grid,
        point_pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lidarvis_core::PointCloud;

    fn hdl64() -> ProjectionParams {
        ProjectionParams::new(3.0, -25.0, 64, 900).unwrap()
    }

    #[test]
    fn test_single_point_straight_ahead() {
        let scan = LaserScan::labeled(
            PointCloud::from_points(vec![Point3f::new(10.0, 0.0, 0.0)]),
            vec![5],
        )
        .unwrap();
        let proj = project(&scan, &hdl64());

        let expected_row = ((25.0f32 / 28.0) * 63.0).round() as usize;
        assert_eq!(expected_row, 56);
        assert_eq!(proj.point_pixels[0], Some((expected_row, 450)));
        assert_relative_eq!(proj.range[[expected_row, 450]], 10.0);
        assert_eq!(proj.index[[expected_row, 450]], Some(0));
        assert_eq!(proj.label.as_ref().unwrap()[[expected_row, 450]], Some(5));
        assert_eq!(proj.occupied_count(), 1);
    }

    #[test]
    fn test_last_point_in_scan_order_wins() {
        let scan = LaserScan::labeled(
            PointCloud::from_points(vec![
                Point3f::new(10.0, 0.0, 0.0),
                Point3f::new(5.0, 0.0, 0.0),
            ]),
            vec![1, 2],
        )
        .unwrap();
        let proj = project(&scan, &hdl64());
        let (row, col) = proj.point_pixels[1].unwrap();

        assert_eq!(proj.point_pixels[0], proj.point_pixels[1]);
        assert_relative_eq!(proj.range[[row, col]], 5.0);
        assert_eq!(proj.index[[row, col]], Some(1));
        assert_eq!(proj.label.as_ref().unwrap()[[row, col]], Some(2));
    }

    #[test]
    fn test_zero_range_points_are_skipped() {
        let scan = LaserScan::unlabeled(PointCloud::from_points(vec![
            Point3f::origin(),
            Point3f::new(f32::NAN, 0.0, 0.0),
        ]));
        let proj = project(&scan, &hdl64());
        assert_eq!(proj.point_pixels, vec![None, None]);
        assert_eq!(proj.occupied_count(), 0);
        assert!(proj.range.iter().all(|&r| r == EMPTY));
        assert!(proj.label.is_none());
        assert!(proj.remission.is_none());
    }

    #[test]
    fn test_degenerate_vertical_fov_does_not_divide_by_zero() {
        let params = ProjectionParams::new(0.0, 0.0, 16, 32).unwrap();
        let scan = LaserScan::unlabeled(PointCloud::from_points(vec![
            Point3f::new(1.0, 1.0, 1.0),
            Point3f::new(1.0, -1.0, -1.0),
        ]));
        let proj = project(&scan, &params);
        for pixel in &proj.point_pixels {
            let (row, col) = pixel.unwrap();
            assert_eq!(row, 0);
            assert!(col < 32);
        }
        assert!(proj.range.iter().all(|r| r.is_finite()));
    }

    #[test]
    fn test_out_of_fov_points_are_clamped() {
        let params = hdl64();
        let up = params.pixel_of(&Point3f::new(1.0, 0.0, 10.0)).unwrap();
        let down = params.pixel_of(&Point3f::new(1.0, 0.0, -10.0)).unwrap();
        assert_eq!(up.0, 63);
        assert_eq!(down.0, 0);

        // yaw of exactly pi lands on the last column
        let behind = params.pixel_of(&Point3f::new(-1.0, 0.0, 0.0)).unwrap();
        assert_eq!(behind.1, 899);
    }

    #[test]
    fn test_beam_angles_pick_nearest_row() {
        let params = ProjectionParams::new(2.0, -2.0, 3, 8)
            .unwrap()
            .with_beam_angles(vec![2.0, 0.0, -2.0])
            .unwrap();
        let level = params.pixel_of(&Point3f::new(10.0, 0.0, 0.0)).unwrap();
        assert_eq!(level.0, 1);
        let high = params
            .pixel_of(&Point3f::new(10.0, 0.0, 10.0 * 1.9f32.to_radians().tan()))
            .unwrap();
        assert_eq!(high.0, 2);
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        assert!(ProjectionParams::new(3.0, -25.0, 0, 900).is_err());
        assert!(ProjectionParams::new(3.0, -25.0, 64, 900)
            .unwrap()
            .with_beam_angles(vec![0.0])
            .is_err());
    }

    #[test]
    fn test_remissions_follow_winning_point() {
        let scan = LaserScan::labeled_with_remission(
            PointCloud::from_points(vec![
                Point3f::new(4.0, 0.0, 0.0),
                Point3f::new(8.0, 0.0, 0.0),
            ]),
            vec![1, 1],
            vec![0.9, 0.1],
        )
        .unwrap();
        let proj = project(&scan, &hdl64());
        let (row, col) = proj.point_pixels[0].unwrap();
        assert_relative_eq!(proj.remission.as_ref().unwrap()[[row, col]], 0.1);
    }
}
