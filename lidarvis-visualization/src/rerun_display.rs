//! Display backend that streams to a rerun viewer

use crate::display::Display;
use crate::panels::{Canvas, Panel, SceneView};
use image::RgbImage;
use lidarvis_core::{Error, Result, Rgb};

const FRAME_TIMELINE: &str = "frame";
const POINT_RADIUS: f32 = 0.03;

fn viz_error(err: impl std::fmt::Display) -> Error {
    Error::Visualization(err.to_string())
}

/// Streams points, images and titles to a rerun recording
pub struct RerunDisplay {
    rec: rerun::RecordingStream,
}

impl RerunDisplay {
    /// Spawn a rerun viewer process and connect to it
    pub fn spawn(application_id: &str) -> Result<Self> {
        let rec = rerun::RecordingStreamBuilder::new(application_id)
            .spawn()
            .map_err(viz_error)?;
        log::info!("Spawned rerun viewer for {}", application_id);
        Ok(Self { rec })
    }

    /// Write the recording to an `.rrd` file instead of showing it live
    pub fn save(application_id: &str, path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let rec = rerun::RecordingStreamBuilder::new(application_id)
            .save(path)
            .map_err(viz_error)?;
        log::info!("Recording to {}", path.display());
        Ok(Self { rec })
    }
}

impl Display for RerunDisplay {
    fn set_frame(&mut self, frame: usize) -> Result<()> {
        self.rec.set_time_sequence(FRAME_TIMELINE, frame as i64);
        Ok(())
    }

    fn show_points(&mut self, view: SceneView, positions: &[[f32; 3]], colors: &[Rgb]) -> Result<()> {
        let points = rerun::Points3D::new(positions.iter().copied())
            .with_colors(colors.iter().map(|c| rerun::Color::from_rgb(c[0], c[1], c[2])))
            .with_radii([POINT_RADIUS]);
        self.rec.log(view.entity_path(), &points).map_err(viz_error)
    }

    fn show_image(&mut self, panel: Panel, image: &RgbImage) -> Result<()> {
        let (width, height) = image.dimensions();
        let frame = rerun::Image::from_rgb24(image.as_raw().clone(), [width, height]);
        self.rec.log(panel.entity_path(), &frame).map_err(viz_error)
    }

    fn show_text(&mut self, canvas: Canvas, text: &str) -> Result<()> {
        let path = format!("{}/title", canvas.entity_path());
        self.rec
            .log(path, &rerun::TextDocument::new(text))
            .map_err(viz_error)
    }

    fn close(&mut self) -> Result<()> {
        self.rec.flush_blocking();
        log::info!("Closed rerun stream");
        Ok(())
    }
}
