//! Garland Viewer - interactive decorated-scene binary
//!
//! Opens a window on the choreographed scene. The field starts gathered
//! into its tree silhouette; Space bursts it apart and reveals the heart.
//!
//! Usage:
//!   garland-viewer [--tuning <tuning.toml>] [--fullscreen]

use anyhow::Result;
use clap::Parser;
use garland_viewer::{ViewerApp, ViewerTuning};
use std::path::PathBuf;
use winit::event_loop::{ControlFlow, EventLoop};

#[derive(Parser)]
#[command(name = "garland-viewer")]
#[command(about = "Garland scene viewer - orbit the tree and toggle the burst")]
struct Args {
    /// Path to an optional TOML tuning file
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Launch in fullscreen mode
    #[arg(long)]
    fullscreen: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let tuning = match &args.tuning {
        Some(path) => ViewerTuning::load(path)?,
        None => ViewerTuning::default(),
    };

    println!("Controls:");
    println!("  Space       - Explode / gather");
    println!("  Left drag   - Orbit");
    println!("  Wheel       - Zoom");
    println!("  Escape      - Exit");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::new(tuning, args.fullscreen);
    event_loop.run_app(&mut app)?;

    Ok(())
}
