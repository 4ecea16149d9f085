use clap::Parser;
use lidarvis_io::DatasetOptions;
use lidarvis_visualization::PanelConfig;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "lidar-vis",
    version,
    about = "Step through LiDAR scans with their range images and semantic labels"
)]
pub struct Args {
    /// Dataset root containing `config.yaml` and `sequences/`
    #[arg(short, long)]
    pub dataset: PathBuf,

    /// Label configuration with the color map and ignored classes
    #[arg(short, long, default_value = "config/lidar_transfer.yaml")]
    pub config: PathBuf,

    /// Sequence to visualize
    #[arg(short, long, default_value = "00")]
    pub sequence: String,

    /// Alternate root holding `sequences/<seq>/predictions` label files
    #[arg(short, long)]
    pub predictions: Option<PathBuf>,

    /// Show uncolored point clouds and skip label files
    #[arg(short, long)]
    pub ignore_semantics: bool,

    /// Frame to start at
    #[arg(short, long, default_value_t = 0)]
    pub offset: usize,

    /// Second dataset root with the same sequence layout, shown next to the source
    #[arg(long)]
    pub target: Option<PathBuf>,

    /// Add range image panels
    #[arg(long)]
    pub show_range: bool,

    /// Add remission image panels
    #[arg(long)]
    pub show_remissions: bool,

    /// Add difference panels between source and target
    #[arg(long, requires = "target")]
    pub show_diff: bool,

    /// Move points into the first frame's coordinates using the sequence poses
    #[arg(long)]
    pub world_frame: bool,

    /// Interval between key polls in milliseconds
    #[arg(long, default_value_t = 10)]
    pub poll_ms: u64,

    /// Write a rerun recording to this file instead of spawning a viewer
    #[arg(long)]
    pub save: Option<PathBuf>,
}

impl Args {
    pub fn dataset_options(&self) -> DatasetOptions {
        DatasetOptions {
            predictions: self.predictions.clone(),
            ignore_semantics: self.ignore_semantics,
            ..DatasetOptions::new(&self.dataset, &self.sequence)
        }
    }

    pub fn target_options(&self) -> Option<DatasetOptions> {
        self.target.as_ref().map(|root| DatasetOptions {
            ignore_semantics: self.ignore_semantics,
            ..DatasetOptions::new(root, &self.sequence)
        })
    }

    pub fn panel_config(&self) -> PanelConfig {
        PanelConfig {
            show_label: true,
            show_range: self.show_range,
            show_remissions: self.show_remissions,
            show_target: self.target.is_some(),
            show_diff: self.show_diff,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }
}
