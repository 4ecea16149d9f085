//! YAML configuration: the scanner description and the label color table

use lidarvis_core::{Error, Result, Rgb};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Scanner description stored as `config.yaml` at the dataset root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    pub name: String,
    /// Upper vertical field-of-view bound, degrees
    pub fov_up: f32,
    /// Lower vertical field-of-view bound, degrees
    pub fov_down: f32,
    pub beams: usize,
    /// Horizontal angular resolution, degrees
    pub angle_res_hor: f32,
    /// Horizontal field of view, degrees
    pub fov_hor: f32,
    #[serde(default)]
    pub beam_angles: Option<Vec<f32>>,
}

impl ScanConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config: Self = load_yaml(path.as_ref())?;
        if let Some(angles) = config.beam_angles.as_mut() {
            angles.sort_by(f32::total_cmp);
        }
        config.validate()?;
        Ok(config)
    }

    /// Number of horizontal bins of the range image
    pub fn width(&self) -> usize {
        if self.angle_res_hor > 0.0 {
            // tolerate resolutions like 0.4 that are not exact in binary
            (self.fov_hor / self.angle_res_hor + 1e-3).floor().max(0.0) as usize
        } else {
            0
        }
    }

    /// Number of rows of the range image
    pub fn height(&self) -> usize {
        self.beams
    }

    pub fn validate(&self) -> Result<()> {
        if self.beams == 0 {
            return Err(Error::Config("beams must be at least 1".to_string()));
        }
        if self.width() == 0 {
            return Err(Error::Config(format!(
                "fov_hor {} / angle_res_hor {} gives an empty image",
                self.fov_hor, self.angle_res_hor
            )));
        }
        if let Some(angles) = &self.beam_angles {
            if angles.len() != self.beams {
                return Err(Error::Config(format!(
                    "{} beam angles given for {} beams",
                    angles.len(),
                    self.beams
                )));
            }
        }
        Ok(())
    }
}

/// Label configuration: class colors plus the ignored and moving classes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelConfig {
    /// Class id to color, stored as `[b, g, r]` on disk
    pub color_map: BTreeMap<u32, [u8; 3]>,
    #[serde(default)]
    pub ignore: Vec<u32>,
    #[serde(default)]
    pub moving: Vec<u32>,
    #[serde(default)]
    pub labels: BTreeMap<u32, String>,
}

impl LabelConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config: Self = load_yaml(path.as_ref())?;
        if config.color_map.is_empty() {
            return Err(Error::Config("color_map is empty".to_string()));
        }
        Ok(config)
    }

    /// Class colors converted to RGB
    pub fn rgb_colors(&self) -> BTreeMap<u32, Rgb> {
        self.color_map
            .iter()
            .map(|(&id, &[b, g, r])| (id, [r, g, b]))
            .collect()
    }

    pub fn class_count(&self) -> usize {
        self.color_map.len()
    }
}

fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&text)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SCAN_YAML: &str = "name: HDL-64\nfov_up: 3.0\nfov_down: -25.0\nbeams: 64\nangle_res_hor: 0.4\nfov_hor: 360.0\n";

    #[test]
    fn test_scan_config_dimensions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, SCAN_YAML).unwrap();

        let config = ScanConfig::load(&path).unwrap();
        assert_eq!(config.name, "HDL-64");
        assert_eq!(config.height(), 64);
        assert_eq!(config.width(), 900);
        assert!(config.beam_angles.is_none());
    }

    #[test]
    fn test_scan_config_sorts_beam_angles() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "name: tiny\nfov_up: 2.0\nfov_down: -2.0\nbeams: 3\nangle_res_hor: 1.0\nfov_hor: 360.0\nbeam_angles: [2.0, -2.0, 0.0]\n",
        )
        .unwrap();

        let config = ScanConfig::load(&path).unwrap();
        assert_eq!(config.beam_angles, Some(vec![-2.0, 0.0, 2.0]));
    }

    #[test]
    fn test_scan_config_rejects_beam_angle_count() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "name: tiny\nfov_up: 2.0\nfov_down: -2.0\nbeams: 4\nangle_res_hor: 1.0\nfov_hor: 360.0\nbeam_angles: [0.0]\n",
        )
        .unwrap();
        assert!(matches!(ScanConfig::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_label_config_converts_bgr() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("labels.yaml");
        std::fs::write(
            &path,
            "color_map:\n  0: [0, 0, 0]\n  10: [245, 150, 100]\nignore: [0]\nmoving: [252]\n",
        )
        .unwrap();

        let config = LabelConfig::load(&path).unwrap();
        assert_eq!(config.class_count(), 2);
        assert_eq!(config.ignore, vec![0]);
        assert_eq!(config.moving, vec![252]);
        assert_eq!(config.rgb_colors()[&10], [100, 150, 245]);
    }

    #[test]
    fn test_missing_config_is_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            LabelConfig::load(dir.path().join("nope.yaml")),
            Err(Error::Io(_))
        ));
    }
}
