//! Output and input seams of the viewer

use crate::action::KeyPress;
use crate::panels::{Canvas, Panel, SceneView};
use image::RgbImage;
use lidarvis_algorithms::ColorImage;
use lidarvis_core::{Result, Rgb};
use std::time::Duration;

/// Something that can show point clouds, images and titles
pub trait Display {
    /// Select the frame subsequent calls belong to
    fn set_frame(&mut self, frame: usize) -> Result<()>;

    fn show_points(&mut self, view: SceneView, positions: &[[f32; 3]], colors: &[Rgb]) -> Result<()>;

    fn show_image(&mut self, panel: Panel, image: &RgbImage) -> Result<()>;

    fn show_text(&mut self, canvas: Canvas, text: &str) -> Result<()>;

    /// Flush and release the backend
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Source of key presses
pub trait KeySource {
    /// Wait up to `timeout` for a key; `None` when nothing was pressed
    fn poll_key(&mut self, timeout: Duration) -> Result<Option<KeyPress>>;
}

/// Convert a projection-ordered color grid into an image.
///
/// Grid row 0 is the lowest elevation, so rows are flipped to put the
/// upper field of view at the top of the picture.
pub fn to_rgb_image(grid: &ColorImage) -> RgbImage {
    let (height, width) = grid.dim();
    RgbImage::from_fn(width as u32, height as u32, |x, y| {
        image::Rgb(grid[[height - 1 - y as usize, x as usize]])
    })
}
