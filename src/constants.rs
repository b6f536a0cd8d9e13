// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// World frame defaults (used when the dialog is skipped or cancelled)
pub mod world {
    /// Default world frame length in meters (left to right on screen)
    pub const DEFAULT_LENGTH_M: f64 = 10.0;

    /// Default world frame width in meters (top to bottom on screen)
    pub const DEFAULT_WIDTH_M: f64 = 8.0;

    /// Physical distance between two grid lines
    pub const GRID_SPACING_M: f64 = 0.5;

    /// 25 px per 0.5 m grid line gives 50 px per meter
    pub const PIXELS_PER_GRID_LINE: u32 = 25;

    /// Largest canvas side in pixels
    pub const MAX_CANVAS_SIDE_PX: u32 = 16_384;
}

/// Rendering constants
pub mod render {
    /// Marker radius in pixels
    pub const MARKER_RADIUS: u32 = 10;

    /// Grid line color (white)
    pub const GRID_COLOR: [u8; 3] = [255, 255, 255];

    /// Marker color (red)
    pub const MARKER_COLOR: [u8; 3] = [255, 0, 0];

    /// Canvas background (black)
    pub const BACKGROUND_COLOR: [u8; 3] = [0, 0, 0];
}

/// Synthetic orbit defaults
pub mod orbit {
    /// 75 px at 50 px/m
    pub const RADIUS_M: f64 = 1.5;

    /// Angle advanced on every grab
    pub const ANGLE_STEP_RAD: f64 = 0.1;

    /// Standard gravity reported on the Z axis of the synthetic IMU
    pub const GRAVITY: f64 = 9.80665;
}

/// Timing constants
pub mod timing {
    use super::Duration;

    /// Fast polling variant
    pub const FAST_POLL_INTERVAL: Duration = Duration::from_millis(100);

    /// Slow polling variant
    pub const SLOW_POLL_INTERVAL: Duration = Duration::from_millis(1000);

    /// Tick counter modulo for periodic debug logging in the viewer
    pub const TICK_LOG_INTERVAL: u64 = 50;
}

/// Polling rate presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollRate {
    /// 100 ms ticks (default)
    #[default]
    Fast,
    /// 1 s ticks
    Slow,
}

impl PollRate {
    /// Tick interval for the preset
    pub fn interval(&self) -> Duration {
        match self {
            PollRate::Fast => timing::FAST_POLL_INTERVAL,
            PollRate::Slow => timing::SLOW_POLL_INTERVAL,
        }
    }
}

/// Application information utilities
pub mod app_info {
    /// Application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }

    /// Directory name used under the platform config and pictures directories
    pub const APP_DIR: &str = "posegrid";
}
