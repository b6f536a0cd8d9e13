// SPDX-License-Identifier: GPL-3.0-only

//! Pose source abstraction and the camera session wrapper
//!
//! ```text
//! ┌─────────────────────┐
//! │ viewer / headless   │  ← one poll per timer tick
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │   TrackingSession   │  ← open → enable tracking → grab loop → close
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  PoseSource trait   │  ← camera SDK seam
//! └──────────┬──────────┘
//!            │
//!       ┌────┴────┐
//!       ▼         ▼
//!    Orbit     Replay
//! ```

pub mod replay;
pub mod synthetic;
pub mod types;

pub use replay::{PoseRecorder, ReplaySource};
pub use synthetic::{OrbitParams, OrbitSource};
pub use types::*;

use crate::errors::TrackingError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info};

/// A device (or stand-in) producing poses in the world frame
///
/// Calls mirror a stereo camera SDK: every call that can fail returns a
/// [`ReturnCode`] and the caller decides what to do with non-success codes.
pub trait PoseSource: Send {
    /// Human readable source name for logs
    fn name(&self) -> &str;

    /// Open the device with the given parameters
    fn open(&mut self, config: &SessionConfig) -> ReturnCode;

    /// Start positional tracking; must follow a successful `open`
    fn enable_positional_tracking(&mut self) -> ReturnCode;

    /// Acquire the next sample. Synchronous, no timeout.
    fn grab(&mut self) -> ReturnCode;

    /// Pose of the last successful grab
    fn pose(&self) -> PoseSample;

    /// IMU sample of the last successful grab, if the device has an IMU
    fn imu(&self) -> Option<ImuSample>;

    /// Release the device
    fn close(&mut self);
}

/// Available pose sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum SourceKind {
    /// Synthetic camera circling the world origin
    #[default]
    Orbit,
    /// Samples read back from a recorded JSON-lines file
    Replay,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Orbit => write!(f, "orbit"),
            SourceKind::Replay => write!(f, "replay"),
        }
    }
}

/// Everything needed to build a source of a given kind
#[derive(Debug, Clone, Default)]
pub struct SourceOptions {
    pub orbit: OrbitParams,
    /// Tick interval, used by the orbit source to derive angular velocity
    pub interval: Duration,
    pub replay_path: Option<PathBuf>,
}

/// Build a concrete pose source
pub fn create_source(
    kind: SourceKind,
    options: &SourceOptions,
) -> Result<Box<dyn PoseSource>, TrackingError> {
    match kind {
        SourceKind::Orbit => Ok(Box::new(OrbitSource::new(options.orbit, options.interval))),
        SourceKind::Replay => {
            let path = options.replay_path.clone().ok_or_else(|| {
                TrackingError::Source("replay source needs a recording path".to_string())
            })?;
            Ok(Box::new(ReplaySource::from_path(path)))
        }
    }
}

/// Steps reported while a session comes up and goes down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStep {
    Opening,
    EnablingTracking,
    Ready,
    Closed,
}

impl std::fmt::Display for LifecycleStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleStep::Opening => write!(f, "Opening camera..."),
            LifecycleStep::EnablingTracking => write!(f, "Enabling positional tracking..."),
            LifecycleStep::Ready => write!(f, "Positional tracking enabled"),
            LifecycleStep::Closed => write!(f, "Camera closed"),
        }
    }
}

/// Camera session wrapper
///
/// Owns its source for its whole lifetime. The source is closed exactly once,
/// either by [`TrackingSession::close`] or on drop.
pub struct TrackingSession {
    source: Box<dyn PoseSource>,
    config: SessionConfig,
    is_open: bool,
    ticks: u64,
}

impl TrackingSession {
    /// Open the source and enable positional tracking
    pub fn open(source: Box<dyn PoseSource>, config: SessionConfig) -> Result<Self, TrackingError> {
        Self::open_with_progress(source, config, |_| {})
    }

    /// Like [`TrackingSession::open`], calling `progress` before each step
    pub fn open_with_progress(
        mut source: Box<dyn PoseSource>,
        config: SessionConfig,
        mut progress: impl FnMut(LifecycleStep),
    ) -> Result<Self, TrackingError> {
        progress(LifecycleStep::Opening);
        info!(
            source = source.name(),
            resolution = %config.resolution,
            coordinate_system = %config.coordinate_system,
            unit = %config.unit,
            "Opening camera"
        );

        let code = source.open(&config);
        if !code.is_success() {
            error!(source = source.name(), code = %code, "Camera open failed");
            return Err(TrackingError::OpenFailed(code));
        }

        // From here on drop takes care of closing
        let mut session = Self {
            source,
            config,
            is_open: true,
            ticks: 0,
        };

        progress(LifecycleStep::EnablingTracking);
        info!("Enabling positional tracking");
        let code = session.source.enable_positional_tracking();
        if !code.is_success() {
            error!(code = %code, "Enabling positional tracking failed");
            return Err(TrackingError::TrackingFailed(code));
        }

        progress(LifecycleStep::Ready);
        Ok(session)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Number of successful polls so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Grab one sample
    pub fn poll(&mut self) -> Result<TrackingSample, TrackingError> {
        if !self.is_open {
            return Err(TrackingError::Closed);
        }

        let code = self.source.grab();
        if !code.is_success() {
            error!(tick = self.ticks, code = %code, "Grab failed");
            return Err(TrackingError::GrabFailed(code));
        }

        let pose = self.source.pose();
        let imu = if self.config.poll_imu {
            self.source.imu()
        } else {
            None
        };

        self.ticks += 1;
        debug!(
            tick = self.ticks,
            tx = pose.translation.x,
            ty = pose.translation.y,
            tz = pose.translation.z,
            "Pose sample"
        );

        Ok(TrackingSample { pose, imu })
    }

    /// Close the source; further polls fail with [`TrackingError::Closed`]
    ///
    /// Returns whether this call released the source.
    pub fn close(&mut self) -> bool {
        if !self.is_open {
            return false;
        }
        self.source.close();
        self.is_open = false;
        info!(source = self.source.name(), ticks = self.ticks, "Camera closed");
        true
    }
}

impl Drop for TrackingSession {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_without_path_is_rejected() {
        let result = create_source(SourceKind::Replay, &SourceOptions::default());
        assert!(matches!(result, Err(TrackingError::Source(_))));
    }

    #[test]
    fn test_orbit_session_polls() {
        let options = SourceOptions {
            interval: Duration::from_millis(100),
            ..Default::default()
        };
        let source = create_source(SourceKind::Orbit, &options).unwrap();
        let mut session = TrackingSession::open(source, SessionConfig::default()).unwrap();

        let sample = session.poll().unwrap();
        assert!(sample.imu.is_some());
        assert_eq!(session.ticks(), 1);

        session.close();
        assert!(!session.is_open());
        assert_eq!(session.poll(), Err(TrackingError::Closed));
    }

    #[test]
    fn test_imu_is_skipped_when_disabled() {
        let source = create_source(SourceKind::Orbit, &SourceOptions::default()).unwrap();
        let config = SessionConfig {
            poll_imu: false,
            ..Default::default()
        };
        let mut session = TrackingSession::open(source, config).unwrap();
        assert!(session.poll().unwrap().imu.is_none());
    }
}
