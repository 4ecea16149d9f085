//! Homogeneous 4x4 transforms used for calibration and poses

use nalgebra::{Matrix4, Point3, Vector3};

/// A 3D transformation that can be applied to points and point clouds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3D {
    pub matrix: Matrix4<f32>,
}

impl Transform3D {
    /// Create an identity transformation
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Create a translation transformation
    pub fn translation(translation: Vector3<f32>) -> Self {
        Self {
            matrix: Matrix4::new_translation(&translation),
        }
    }

    /// Build a transform from the first three rows of a row-major 4x4 matrix.
    ///
    /// This is the layout of KITTI `calib.txt` and `poses.txt` entries; the
    /// last row is fixed to `(0, 0, 0, 1)`.
    pub fn from_rows_3x4(values: &[f32; 12]) -> Self {
        let mut matrix = Matrix4::identity();
        for row in 0..3 {
            for col in 0..4 {
                matrix[(row, col)] = values[row * 4 + col];
            }
        }
        Self { matrix }
    }

    /// Apply the transformation to a point
    pub fn transform_point(&self, point: &Point3<f32>) -> Point3<f32> {
        let homogeneous = self.matrix * point.to_homogeneous();
        Point3::from_homogeneous(homogeneous).unwrap_or(*point)
    }

    /// Compose this transformation with another (`self` applied last)
    pub fn compose(self, other: Self) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Get the inverse transformation
    pub fn inverse(self) -> Option<Self> {
        self.matrix
            .try_inverse()
            .map(|inv_matrix| Self { matrix: inv_matrix })
    }

    /// Express `pose` in the frame defined by `reference`: `reference⁻¹ · pose · reference`
    pub fn conjugate(pose: Self, reference: Self) -> Option<Self> {
        reference
            .inverse()
            .map(|inv| inv.compose(pose).compose(reference))
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}
