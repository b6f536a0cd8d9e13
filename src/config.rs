// SPDX-License-Identifier: GPL-3.0-only

//! User configuration
//!
//! Stored as JSON in `<config dir>/posegrid/config.json`. Every field has a
//! default, so partial files are accepted. Command line flags override the
//! loaded values for a single run.

use crate::constants::{PollRate, app_info, render};
use crate::errors::ConfigError;
use crate::tracking::{OrbitParams, SessionConfig, SourceKind};
use crate::world_frame::WorldFrame;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// World frame used when the dialog is skipped or cancelled
    pub world: WorldFrame,
    /// Ask for the world frame on startup instead of using the defaults
    pub ask_world_frame: bool,
    /// Tick interval of the polling loop, milliseconds
    pub poll_interval_ms: u64,
    /// Fetch IMU samples alongside poses
    pub poll_imu: bool,
    /// Pose source used when none is given on the command line
    pub source: SourceKind,
    /// Shape of the synthetic orbit
    pub orbit: OrbitParams,
    /// Marker radius in pixels
    pub marker_radius: u32,
    /// Where snapshots go (default: pictures directory)
    pub snapshot_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world: WorldFrame::default(),
            ask_world_frame: false,
            poll_interval_ms: PollRate::default().interval().as_millis() as u64,
            poll_imu: true,
            source: SourceKind::default(),
            orbit: OrbitParams::default(),
            marker_radius: render::MARKER_RADIUS,
            snapshot_dir: None,
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(app_info::APP_DIR).join(CONFIG_FILE))
    }

    /// Load from the default location; defaults when there is no file
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("No config directory on this platform, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate()?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Write to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        info!(path = %path.display(), "Saved config");
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidInterval);
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Parameters for opening a camera session
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            poll_imu: self.poll_imu,
            ..SessionConfig::default()
        }
    }

    /// Resolved snapshot directory
    pub fn snapshot_dir(&self) -> PathBuf {
        self.snapshot_dir.clone().unwrap_or_else(|| {
            dirs::picture_dir()
                .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
                .join(app_info::APP_DIR)
        })
    }
}
