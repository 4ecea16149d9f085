//! The scan viewer: pushes kernel output to a display and collects key actions

use crate::action::{map_key, Action, ActionSlot, KeyPress, ViewMode};
use crate::display::{to_rgb_image, Display, KeySource};
use crate::panels::{Canvas, PanelKind, PanelLayout, SceneView};
use lidarvis_algorithms::{
    colorize_grid, colorize_scalars, label_image, range_image, remission_image, ColorImage,
    Colormap, FrameDifference, LabelColorTable, RangeProjection, ScalarKind, POINT_RANGE_POWER,
    REMISSION_POWER,
};
use lidarvis_core::{Error, LaserScan, Result, Rgb, Transform3D};
use std::time::Duration;

/// Power used when coloring range and remission difference images
pub const DIFF_POWER: f32 = 1.0;

/// Interactive viewer for a source scan, an optional target scan and their difference.
///
/// Image sizes are fixed at construction; every projection handed to the
/// viewer must match them.
pub struct ScanViewer<D: Display, K: KeySource> {
    display: D,
    keys: K,
    slot: ActionSlot,
    mode: ViewMode,
    layout: PanelLayout,
    source_shape: (usize, usize),
    target_shape: Option<(usize, usize)>,
    table: LabelColorTable,
    colormap: Colormap,
    frame: usize,
    frame_count: usize,
}

impl<D: Display, K: KeySource> ScanViewer<D, K> {
    pub fn new(
        display: D,
        keys: K,
        layout: PanelLayout,
        source_shape: (usize, usize),
        target_shape: Option<(usize, usize)>,
        table: LabelColorTable,
    ) -> Self {
        Self {
            display,
            keys,
            slot: ActionSlot::new(),
            mode: ViewMode::default(),
            layout,
            source_shape,
            target_shape,
            table,
            colormap: Colormap::viridis(),
            frame: 0,
            frame_count: 0,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    pub fn layout(&self) -> &PanelLayout {
        &self.layout
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Select the frame about to be shown
    pub fn set_frame(&mut self, frame: usize, frame_count: usize) -> Result<()> {
        self.frame = frame;
        self.frame_count = frame_count;
        self.display.set_frame(frame)
    }

    pub fn set_title(&mut self) -> Result<()> {
        let title = format!("Frame {} of {}", self.frame + 1, self.frame_count);
        self.display.show_text(Canvas::Scene, &title)
    }

    pub fn set_source(
        &mut self,
        scan: &LaserScan,
        projection: &RangeProjection,
        pose: Option<&Transform3D>,
    ) -> Result<()> {
        check_shape(self.source_shape, projection.shape())?;
        self.show_scan(SceneView::Source, Canvas::Source, scan, projection, pose)
    }

    pub fn set_target(
        &mut self,
        scan: &LaserScan,
        projection: &RangeProjection,
        pose: Option<&Transform3D>,
    ) -> Result<()> {
        let expected = self.target_shape.ok_or_else(|| {
            Error::Visualization("viewer was created without a target".to_string())
        })?;
        check_shape(expected, projection.shape())?;
        self.show_scan(SceneView::Target, Canvas::Target, scan, projection, pose)
    }

    pub fn set_diff(&mut self, diff: &FrameDifference) -> Result<()> {
        if !self.layout.has_canvas(Canvas::Diff) {
            return Ok(());
        }
        check_shape(self.source_shape, diff.range_diff.dim())?;

        let panels: Vec<_> = self.layout.panels_on(Canvas::Diff).collect();
        for panel in panels {
            let image = match panel.kind {
                PanelKind::Label => diff.label_diff.clone(),
                PanelKind::Range => Some(self.error_image(&diff.range_diff)),
                PanelKind::Remission => diff.remission_diff.as_ref().map(|d| self.error_image(d)),
            };
            match image {
                Some(image) => self.display.show_image(panel, &to_rgb_image(&image))?,
                None => log::debug!("No {} difference to show", panel.kind.name()),
            }
        }

        let summary = &diff.summary;
        let text = match (summary.mean_iou, summary.accuracy) {
            (Some(iou), Some(acc)) => format!(
                "IoU {:5.2}%, Acc {:5.2}%, MSE {:.4}",
                iou * 100.0,
                acc * 100.0,
                summary.mse
            ),
            _ => format!("MSE {:.4}", summary.mse),
        };
        self.display.show_text(Canvas::Diff, &text)
    }

    /// Route a key press to the pending-action slot and the view mode
    pub fn handle_key(&mut self, key: KeyPress) {
        let Some(command) = map_key(key) else {
            log::debug!("Ignoring key {:?}", key);
            return;
        };
        if let Some(mode) = command.mode {
            self.mode = mode;
        }
        self.slot.post(command.action);
    }

    /// Wait up to `timeout` for a key, then read and clear the pending action
    pub fn get_action(&mut self, timeout: Duration) -> Result<Action> {
        if let Some(key) = self.keys.poll_key(timeout)? {
            self.handle_key(key);
        }
        Ok(self.slot.take())
    }

    /// Release the display and the key source
    pub fn destroy(mut self) -> Result<D> {
        self.display.close()?;
        Ok(self.display)
    }

    fn show_scan(
        &mut self,
        view: SceneView,
        canvas: Canvas,
        scan: &LaserScan,
        projection: &RangeProjection,
        pose: Option<&Transform3D>,
    ) -> Result<()> {
        if self.layout.shows_view(view) {
            let positions = match pose {
                Some(pose) => scan.transformed_points(pose).positions(),
                None => scan.points().positions(),
            };
            let colors = self.point_colors(scan);
            self.display.show_points(view, &positions, &colors)?;
        }

        let panels: Vec<_> = self.layout.panels_on(canvas).collect();
        for panel in panels {
            match self.panel_image(panel.kind, projection) {
                Some(image) => self.display.show_image(panel, &to_rgb_image(&image))?,
                None => log::debug!("Scan has no {} data", panel.kind.name()),
            }
        }

        let (height, width) = projection.shape();
        let text = format!(
            "{}x{}, {} of {} points projected",
            width,
            height,
            projection.occupied_count(),
            scan.len()
        );
        self.display.show_text(canvas, &text)
    }

    fn point_colors(&self, scan: &LaserScan) -> Vec<Rgb> {
        match (self.mode, scan.labels(), scan.remissions()) {
            (ViewMode::Label, Some(labels), _) => self.table.colorize_labels(labels),
            (ViewMode::Remission, _, Some(remissions)) => colorize_scalars(
                remissions,
                ScalarKind::Remission,
                REMISSION_POWER,
                &self.colormap,
            ),
            _ => colorize_scalars(
                &scan.ranges(),
                ScalarKind::Range,
                POINT_RANGE_POWER,
                &self.colormap,
            ),
        }
    }

    fn panel_image(&self, kind: PanelKind, projection: &RangeProjection) -> Option<ColorImage> {
        match kind {
            PanelKind::Label => Some(
                label_image(projection, &self.table)
                    .unwrap_or_else(|| range_image(projection, &self.colormap)),
            ),
            PanelKind::Range => Some(range_image(projection, &self.colormap)),
            PanelKind::Remission => remission_image(projection, &self.colormap),
        }
    }

    fn error_image(&self, errors: &ndarray::Array2<f32>) -> ColorImage {
        colorize_grid(errors, ScalarKind::Error, DIFF_POWER, &self.colormap)
    }
}

fn check_shape(expected: (usize, usize), found: (usize, usize)) -> Result<()> {
    if expected != found {
        return Err(Error::DimensionMismatch { expected, found });
    }
    Ok(())
}
