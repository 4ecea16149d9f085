//! I/O operations for LiDAR sequences
//!
//! This crate reads everything the viewer consumes from disk:
//! - velodyne `.bin` scans and ASCII `x y z [remission]` scans
//! - SemanticKITTI `.label` files
//! - `calib.txt` and `poses.txt`
//! - the scanner and label YAML configuration
//! - the sequence directory layout, exposed as a frame source

pub mod calibration;
pub mod config;
pub mod dataset;
pub mod labels;
pub mod scan;

pub use calibration::{parse_calibration, parse_poses, Calibration};
pub use config::{LabelConfig, ScanConfig};
pub use dataset::{DatasetOptions, Frame, SequenceDataset};
pub use labels::read_labels;
pub use scan::{read_scan, RawScan};
