//! Dataset loading and the frame-by-frame driving loop

use crate::cli::Args;
use anyhow::{bail, Context, Result};
use lidarvis_algorithms::{compare, project, LabelColorTable, ProjectionParams};
use lidarvis_io::{DatasetOptions, LabelConfig, ScanConfig, SequenceDataset};
use lidarvis_visualization::{Display, KeySource, Navigator, PanelLayout, ScanViewer, Step};
use log::{debug, info, warn};
use std::time::Duration;

/// One dataset sequence with the projection of its sensor
pub struct Sequence {
    pub name: String,
    pub dataset: SequenceDataset,
    pub params: ProjectionParams,
}

impl Sequence {
    pub fn open(options: &DatasetOptions) -> Result<Self> {
        let config_path = options.scan_config_path();
        info!("Opening config file {}", config_path.display());
        let config = ScanConfig::load(&config_path)
            .with_context(|| format!("error opening scan config {}", config_path.display()))?;

        let mut params = ProjectionParams::new(
            config.fov_up,
            config.fov_down,
            config.height(),
            config.width(),
        )?;
        match &config.beam_angles {
            Some(angles) => params = params.with_beam_angles(angles.clone())?,
            None => info!("No beam angles in scan config: using equidistant rows"),
        }

        let dataset = SequenceDataset::open(options)?;

        info!("{}", "*".repeat(80));
        info!("SCANNER:");
        info!("Name {}", config.name);
        info!("Resolution {} x {}", config.height(), config.width());
        info!("FOV up {}", config.fov_up);
        info!("FOV down {}", config.fov_down);
        info!("Beam angles {:?}", config.beam_angles);
        info!("Scans {}", dataset.len());
        info!("{}", "*".repeat(80));

        Ok(Self {
            name: config.name,
            dataset,
            params,
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        self.params.shape()
    }
}

/// Everything the driving loop needs besides the viewer
pub struct Session {
    source: Sequence,
    target: Option<Sequence>,
    frame_count: usize,
    ignore_classes: Vec<u32>,
    table: LabelColorTable,
    world_frame: bool,
    show_diff: bool,
}

impl Session {
    pub fn open(args: &Args, labels: &LabelConfig) -> Result<Self> {
        info!("Ignore classes {:?}", labels.ignore);
        info!("Moving classes {:?}", labels.moving);

        let source = Sequence::open(&args.dataset_options())?;
        let target = args
            .target_options()
            .map(|options| Sequence::open(&options))
            .transpose()?;

        let mut frame_count = source.dataset.len();
        if let Some(target) = &target {
            if target.dataset.len() != frame_count {
                warn!(
                    "Source has {} scans but target {} has {}; showing the first {}",
                    frame_count,
                    target.name,
                    target.dataset.len(),
                    frame_count.min(target.dataset.len())
                );
                frame_count = frame_count.min(target.dataset.len());
            }
            if args.show_diff && target.shape() != source.shape() {
                bail!(
                    "difference panels need equal image sizes, source is {:?} but target is {:?}",
                    source.shape(),
                    target.shape()
                );
            }
        }

        if args.world_frame && source.dataset.poses().is_none() {
            warn!("No poses for sequence {}: showing points in the scan frame", args.sequence);
        }

        Ok(Self {
            source,
            target,
            frame_count,
            ignore_classes: labels.ignore.clone(),
            table: LabelColorTable::new(labels.rgb_colors()),
            world_frame: args.world_frame,
            show_diff: args.show_diff,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn viewer<D: Display, K: KeySource>(
        &self,
        display: D,
        keys: K,
        layout: PanelLayout,
    ) -> ScanViewer<D, K> {
        ScanViewer::new(
            display,
            keys,
            layout,
            self.source.shape(),
            self.target.as_ref().map(Sequence::shape),
            self.table.clone(),
        )
    }

    /// Load, project and show frame `index`
    pub fn render<D: Display, K: KeySource>(
        &self,
        viewer: &mut ScanViewer<D, K>,
        index: usize,
    ) -> Result<()> {
        let source = self.source.dataset.frame(index, &self.ignore_classes)?;
        let source_projection = project(&source.scan, &self.source.params);

        viewer.set_frame(index, self.frame_count)?;
        viewer.set_title()?;
        let pose = source.pose.as_ref().filter(|_| self.world_frame);
        viewer.set_source(&source.scan, &source_projection, pose)?;

        if let Some(target) = &self.target {
            let frame = target.dataset.frame(index, &self.ignore_classes)?;
            let projection = project(&frame.scan, &target.params);
            let pose = frame.pose.as_ref().filter(|_| self.world_frame);
            viewer.set_target(&frame.scan, &projection, pose)?;

            if self.show_diff {
                let diff = compare(&source_projection, &projection, &self.table)?;
                debug!("Frame {} difference: {:?}", index, diff.summary);
                viewer.set_diff(&diff)?;
            }
        }
        Ok(())
    }

    /// Show frames starting at `offset` until the user quits, then release the viewer
    pub fn run<D: Display, K: KeySource>(
        &self,
        mut viewer: ScanViewer<D, K>,
        offset: usize,
        poll: Duration,
    ) -> Result<D> {
        let mut navigator = Navigator::new(offset, self.frame_count)?;
        self.render(&mut viewer, navigator.index())?;

        loop {
            let action = viewer.get_action(poll)?;
            match navigator.apply(action) {
                Step::Wait => {}
                Step::Show(index) => self.render(&mut viewer, index)?,
                Step::Stop => break,
            }
        }

        info!("Quit at frame {}", navigator.index());
        Ok(viewer.destroy()?)
    }
}
