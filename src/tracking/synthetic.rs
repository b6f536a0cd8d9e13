// SPDX-License-Identifier: GPL-3.0-only

//! Synthetic pose source: a camera circling the world origin
//!
//! Each grab reports the position at the current angle and then advances the
//! angle by a fixed step. The camera faces along the direction of travel.

use super::PoseSource;
use super::types::*;
use crate::constants::{orbit, timing};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::time::Duration;
use tracing::debug;

/// Orbit shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitParams {
    /// Orbit radius in meters
    pub radius_m: f64,
    /// Angle advanced per grab, radians
    pub angle_step_rad: f64,
    /// Report synthetic IMU samples
    pub with_imu: bool,
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            radius_m: orbit::RADIUS_M,
            angle_step_rad: orbit::ANGLE_STEP_RAD,
            with_imu: true,
        }
    }
}

pub struct OrbitSource {
    params: OrbitParams,
    tick: Duration,
    angle: f64,
    grabs: u64,
    opened: bool,
    tracking: bool,
    pose: PoseSample,
    imu: Option<ImuSample>,
}

impl OrbitSource {
    pub fn new(params: OrbitParams, tick: Duration) -> Self {
        let tick = if tick.is_zero() {
            timing::FAST_POLL_INTERVAL
        } else {
            tick
        };
        Self {
            params,
            tick,
            angle: 0.0,
            grabs: 0,
            opened: false,
            tracking: false,
            pose: PoseSample {
                state: TrackingState::Off,
                ..Default::default()
            },
            imu: None,
        }
    }

    /// Angular speed implied by the step and the tick interval, rad/s
    pub fn angular_velocity(&self) -> f64 {
        self.params.angle_step_rad / self.tick.as_secs_f64()
    }

    fn sample_at(&self, angle: f64) -> (PoseSample, ImuSample) {
        let r = self.params.radius_m;
        let (sin, cos) = angle.sin_cos();

        let pose = PoseSample {
            translation: Translation::new(r * cos, r * sin, 0.0),
            orientation: Orientation::from_yaw(
                angle + FRAC_PI_2.copysign(self.params.angle_step_rad),
            ),
            timestamp_ms: self.grabs * self.tick.as_millis() as u64,
            state: TrackingState::Ok,
        };

        // Centripetal acceleration points at the origin
        let omega = self.angular_velocity();
        let centripetal = omega * omega * r;
        let imu = ImuSample {
            linear_acceleration: [-centripetal * cos, -centripetal * sin, orbit::GRAVITY],
            angular_velocity: [0.0, 0.0, omega],
        };

        (pose, imu)
    }
}

impl PoseSource for OrbitSource {
    fn name(&self) -> &str {
        "orbit"
    }

    fn open(&mut self, _config: &SessionConfig) -> ReturnCode {
        let valid = self.params.radius_m.is_finite()
            && self.params.radius_m >= 0.0
            && self.params.angle_step_rad.is_finite();
        if !valid {
            return ReturnCode::InvalidParameter;
        }
        self.opened = true;
        debug!(
            radius_m = self.params.radius_m,
            step = self.params.angle_step_rad,
            "Orbit opened"
        );
        ReturnCode::Success
    }

    fn enable_positional_tracking(&mut self) -> ReturnCode {
        if !self.opened {
            return ReturnCode::CameraNotOpened;
        }
        self.tracking = true;
        ReturnCode::Success
    }

    fn grab(&mut self) -> ReturnCode {
        if !self.opened {
            return ReturnCode::CameraNotOpened;
        }
        if !self.tracking {
            return ReturnCode::TrackingNotEnabled;
        }

        let (pose, imu) = self.sample_at(self.angle);
        self.pose = pose;
        self.imu = self.params.with_imu.then_some(imu);
        self.angle += self.params.angle_step_rad;
        self.grabs += 1;
        ReturnCode::Success
    }

    fn pose(&self) -> PoseSample {
        self.pose
    }

    fn imu(&self) -> Option<ImuSample> {
        self.imu
    }

    fn close(&mut self) {
        self.opened = false;
        self.tracking = false;
    }
}
