//! Visualization for range-image debugging
//!
//! This crate turns kernel output into something a person can look at and
//! step through:
//! - a lossy single-slot action mailbox and frame navigation
//! - a panel layout built once from a configuration struct
//! - the `Display` and `KeySource` seams, with a rerun display and a
//!   terminal keyboard
//! - `ScanViewer`, which pushes scans, projections and differences to a display

pub mod action;
pub mod display;
pub mod panels;
pub mod rerun_display;
pub mod terminal;
pub mod viewer;

pub use action::*;
pub use display::*;
pub use panels::*;
pub use rerun_display::RerunDisplay;
pub use terminal::TerminalKeys;
pub use viewer::*;
