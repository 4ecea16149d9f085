//! Point types and related functionality

use bytemuck::{Pod, Zeroable};
use nalgebra::Point3;

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// An 8-bit RGB triple
pub type Rgb = [u8; 3];

/// Black, used for pixels and points that carry no data
pub const EMPTY_COLOR: Rgb = [0, 0, 0];

/// One raw record of a velodyne `.bin` scan, laid out exactly as on disk
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct ScanRecord {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub remission: f32,
}

impl ScanRecord {
    pub fn position(&self) -> Point3f {
        Point3f::new(self.x, self.y, self.z)
    }
}

/// Euclidean distance of a point from the sensor origin
pub fn range_of(point: &Point3f) -> f32 {
    point.coords.norm()
}
