// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - Running the terminal viewer
//! - Polling headless (optionally recording the samples)
//! - Rendering the static grid
//! - Querying the world frame

use crate::RunOptions;
use posegrid::config::Config;
use posegrid::constants::PollRate;
use posegrid::dialog::query_world_frame;
use posegrid::display::DisplayState;
use posegrid::errors::AppResult;
use posegrid::headless::{self, HeadlessOptions, StopReason};
use posegrid::render::{GridRenderer, save_png};
use posegrid::terminal;
use posegrid::tracking::{LifecycleStep, SourceOptions, TrackingSession, create_source};
use posegrid::transform::CanvasPosition;
use posegrid::world_frame::WorldFrame;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Load the config file and apply command line overrides
fn load_config(options: &RunOptions) -> AppResult<Config> {
    let config = match &options.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let config = apply_overrides(config, options);
    config.validate()?;
    Ok(config)
}

fn apply_overrides(mut config: Config, options: &RunOptions) -> Config {
    if let Some(source) = options.source {
        config.source = source;
    }
    if let Some(length) = options.length {
        config.world.length_m = length;
    }
    if let Some(width) = options.width {
        config.world.width_m = width;
    }
    if options.ask {
        config.ask_world_frame = true;
    }
    if options.slow {
        config.poll_interval_ms = PollRate::Slow.interval().as_millis() as u64;
    }
    if let Some(interval_ms) = options.interval_ms {
        config.poll_interval_ms = interval_ms;
    }
    if options.no_imu {
        config.poll_imu = false;
        config.orbit.with_imu = false;
    }
    config
}

/// World frame from the dialog, or the configured defaults
fn resolve_world_frame(config: &Config) -> AppResult<WorldFrame> {
    let world = query_world_frame(config.world, !config.ask_world_frame)?;
    println!("World Frame Length (m): {}", world.length_m);
    println!("World Frame Width (m): {}", world.width_m);
    Ok(world)
}

fn open_session(config: &Config, options: &RunOptions) -> AppResult<TrackingSession> {
    let source_options = SourceOptions {
        orbit: config.orbit,
        interval: config.poll_interval(),
        replay_path: options.replay.clone(),
    };
    let source = create_source(config.source, &source_options)?;
    let session =
        TrackingSession::open_with_progress(source, config.session_config(), |step| {
            println!("{}", step)
        })?;
    Ok(session)
}

fn close_session(session: &mut TrackingSession) {
    if session.close() {
        println!("{}", LifecycleStep::Closed);
    }
}

/// Run the terminal viewer
pub fn view(options: &RunOptions) -> AppResult<()> {
    let config = load_config(options)?;
    let world = resolve_world_frame(&config)?;
    let mut session = open_session(&config, options)?;
    let result = terminal::run(&config, world, &mut session);
    close_session(&mut session);
    result
}

/// Poll the source without a display
pub fn headless(
    options: &RunOptions,
    ticks: Option<u64>,
    record: Option<PathBuf>,
    snapshot: Option<PathBuf>,
) -> AppResult<()> {
    let config = load_config(options)?;
    let world = resolve_world_frame(&config)?;
    let mut session = open_session(&config, options)?;
    let mut display = DisplayState::new(world, config.marker_radius);

    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_clone = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_flag_clone.store(true, Ordering::SeqCst);
    })?;

    let headless_options = HeadlessOptions {
        interval: config.poll_interval(),
        ticks,
        record,
        snapshot,
    };
    let report = headless::run(
        &mut session,
        &mut display,
        &headless_options,
        &stop_flag,
        &mut std::io::stdout(),
    );
    close_session(&mut session);

    match report?.stop {
        StopReason::Failed(e) => Err(e.into()),
        StopReason::TickLimit | StopReason::Interrupted => Ok(()),
    }
}

/// Render the static grid with the marker at the canvas center
pub fn grid(options: &RunOptions, output: Option<PathBuf>) -> AppResult<()> {
    let config = load_config(options)?;
    let world = resolve_world_frame(&config)?;

    let renderer = GridRenderer::with_marker_radius(&world, config.marker_radius);
    let (width, height) = renderer.dimensions();
    println!("Image shape: {}x{}", width, height);

    let (cx, cy) = world.center();
    let img = renderer.frame(Some(CanvasPosition::new(cx, cy)));

    let path = output.unwrap_or_else(|| {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        config.snapshot_dir().join(format!("GRID_{}.png", timestamp))
    });
    save_png(&img, &path)?;
    info!(path = %path.display(), width, height, "Grid rendered");
    println!("Grid saved: {}", path.display());
    Ok(())
}

/// Ask for the world frame and print the resulting canvas
pub fn query(options: &RunOptions) -> AppResult<()> {
    let mut config = load_config(options)?;
    config.ask_world_frame = true;
    let world = resolve_world_frame(&config)?;

    let (width, height) = world.canvas_size();
    println!("Canvas: {}x{} px at {} px/m", width, height, world.scale());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use posegrid::SourceKind;

    #[test]
    fn test_overrides_replace_config_values() {
        let options = RunOptions {
            source: Some(SourceKind::Replay),
            length: Some(12.0),
            width: Some(6.0),
            interval_ms: Some(250),
            no_imu: true,
            ..Default::default()
        };
        let config = apply_overrides(Config::default(), &options);
        assert_eq!(config.source, SourceKind::Replay);
        assert_eq!(config.world.canvas_size(), (600, 300));
        assert_eq!(config.poll_interval_ms, 250);
        assert!(!config.poll_imu);
        assert!(!config.orbit.with_imu);
    }

    #[test]
    fn test_slow_rate() {
        let options = RunOptions {
            slow: true,
            ..Default::default()
        };
        let config = apply_overrides(Config::default(), &options);
        assert_eq!(config.poll_interval_ms, 1000);
    }

    #[test]
    fn test_oversized_world_is_rejected() {
        let options = RunOptions {
            length: Some(1.0e9),
            ..Default::default()
        };
        let config = apply_overrides(Config::default(), &options);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let config = apply_overrides(Config::default(), &RunOptions::default());
        assert_eq!(config, Config::default());
    }
}
