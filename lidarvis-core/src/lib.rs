//! Core data structures for lidarvis
//!
//! This crate provides the fundamental types shared by the readers, the
//! projection kernel and the viewer: points, point clouds, rigid transforms,
//! semantic labels and the tagged `LaserScan` frame.

pub mod error;
pub mod label;
pub mod point;
pub mod point_cloud;
pub mod scan;
pub mod transform;

pub use error::*;
pub use label::*;
pub use point::*;
pub use point_cloud::*;
pub use scan::*;
pub use transform::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix4, Point3, Vector3};
