mod cli;
mod session;

use std::io::Write;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use env_logger::Builder;
use log::{info, LevelFilter};

use lidarvis_io::LabelConfig;
use lidarvis_visualization::{PanelLayout, RerunDisplay, TerminalKeys};

use cli::Args;
use session::Session;

const APPLICATION_ID: &str = "lidar-vis";

fn init_logger() {
    Builder::new()
        .format(|buf, record| {
            // the terminal is in raw mode while the viewer runs
            write!(
                buf,
                "{} [{}] - {}\r\n",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Info)
        .parse_default_env()
        .init();
}

fn print_interface(args: &Args) {
    info!("{}", "*".repeat(80));
    info!("INTERFACE:");
    info!("Dataset {}", args.dataset.display());
    info!("Config {}", args.config.display());
    info!("Sequence {}", args.sequence);
    info!("Predictions {:?}", args.predictions);
    info!("Ignore semantics {}", args.ignore_semantics);
    info!("Offset {}", args.offset);
    if let Some(target) = &args.target {
        info!("Target {}", target.display());
    }
    info!("{}", "*".repeat(80));
}

fn print_instructions() {
    info!("To navigate:");
    info!("\tb: back (previous scan)");
    info!("\tn: next (next scan)");
    info!("\t1/2/3: color by label/range/remission");
    info!("\tq: quit (exit program)");
}

fn run(args: &Args) -> Result<()> {
    print_interface(args);

    info!("Opening config file {}", args.config.display());
    let labels = LabelConfig::load(&args.config)
        .with_context(|| format!("error opening label config {}", args.config.display()))?;

    let session = Session::open(args, &labels)?;
    if args.offset >= session.frame_count() {
        anyhow::bail!(
            "offset {} is outside the {} available scans",
            args.offset,
            session.frame_count()
        );
    }

    let display = match &args.save {
        Some(path) => RerunDisplay::save(APPLICATION_ID, path)?,
        None => RerunDisplay::spawn(APPLICATION_ID)?,
    };
    print_instructions();
    let keys = TerminalKeys::new()?;

    let layout = PanelLayout::from_config(&args.panel_config());
    let viewer = session.viewer(display, keys, layout);
    session.run(viewer, args.offset, args.poll_interval())?;
    Ok(())
}

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();
    let start = std::time::Instant::now();

    run(&args)?;

    info!("Viewer closed after {:?}", start.elapsed());
    Ok(())
}
