//! # lidarvis algorithms
//!
//! The per-frame kernel of the viewer:
//! - spherical projection of a scan into range / remission / label grids
//! - colorization of scalar grids and semantic labels
//! - difference images and label agreement scores between two projections

pub mod colormap;
pub mod colorize;
pub mod difference;
pub mod projection;

pub use colormap::*;
pub use colorize::*;
pub use difference::*;
pub use projection::*;
