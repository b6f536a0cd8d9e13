// SPDX-License-Identifier: GPL-3.0-only
// Shared types for pose sources and the tracking session

//! Shared types for pose sources

use serde::{Deserialize, Serialize};

/// Camera translation in the world frame, meters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Translation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Translation {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Camera orientation as a unit quaternion `(x, y, z, w)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Orientation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Orientation {
    pub const IDENTITY: Orientation = Orientation {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `yaw` radians about the Z (up) axis
    pub fn from_yaw(yaw: f64) -> Self {
        let half = yaw / 2.0;
        Self {
            x: 0.0,
            y: 0.0,
            z: half.sin(),
            w: half.cos(),
        }
    }

    /// Heading about the Z axis in radians, `(-pi, pi]`
    pub fn yaw(&self) -> f64 {
        let siny_cosp = 2.0 * (self.w * self.z + self.x * self.y);
        let cosy_cosp = 1.0 - 2.0 * (self.y * self.y + self.z * self.z);
        siny_cosp.atan2(cosy_cosp)
    }

    /// Roll, pitch and yaw in degrees (Z-up, right handed)
    pub fn euler_degrees(&self) -> (f64, f64, f64) {
        let sinr_cosp = 2.0 * (self.w * self.x + self.y * self.z);
        let cosr_cosp = 1.0 - 2.0 * (self.x * self.x + self.y * self.y);
        let roll = sinr_cosp.atan2(cosr_cosp);

        // Clamp to avoid NaN from rounding just outside [-1, 1]
        let sinp = (2.0 * (self.w * self.y - self.z * self.x)).clamp(-1.0, 1.0);
        let pitch = sinp.asin();

        (roll.to_degrees(), pitch.to_degrees(), self.yaw().to_degrees())
    }
}

/// Positional tracking state reported alongside each pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrackingState {
    /// Tracking is running normally
    #[default]
    Ok,
    /// The camera is relocalizing
    Searching,
    /// Tracking is not running
    Off,
}

impl std::fmt::Display for TrackingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackingState::Ok => write!(f, "OK"),
            TrackingState::Searching => write!(f, "SEARCHING"),
            TrackingState::Off => write!(f, "OFF"),
        }
    }
}

/// One pose sample, consumed on the tick that produced it
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseSample {
    pub translation: Translation,
    pub orientation: Orientation,
    /// Milliseconds since the session started
    #[serde(default)]
    pub timestamp_ms: u64,
    #[serde(default)]
    pub state: TrackingState,
}

/// One IMU sample
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImuSample {
    /// m/s²
    pub linear_acceleration: [f64; 3],
    /// rad/s
    pub angular_velocity: [f64; 3],
}

/// Everything produced by a single poll
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackingSample {
    pub pose: PoseSample,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imu: Option<ImuSample>,
}

/// Return codes of source calls
///
/// Only [`ReturnCode::Success`] counts as success; callers treat every other
/// code as fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnCode {
    Success,
    /// No camera (or replay file) could be found
    CameraNotDetected,
    /// The session was used before `open`
    CameraNotOpened,
    /// A configuration value was rejected
    InvalidParameter,
    /// `grab` was called before tracking was enabled
    TrackingNotEnabled,
    /// The data could not be decoded
    CorruptedData,
    /// A recorded stream has no more samples
    EndOfStream,
    /// Unspecified failure
    Failure,
}

impl ReturnCode {
    pub fn is_success(&self) -> bool {
        *self == ReturnCode::Success
    }
}

impl std::fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ReturnCode::Success => "SUCCESS",
            ReturnCode::CameraNotDetected => "CAMERA NOT DETECTED",
            ReturnCode::CameraNotOpened => "CAMERA NOT OPENED",
            ReturnCode::InvalidParameter => "INVALID PARAMETER",
            ReturnCode::TrackingNotEnabled => "POSITIONAL TRACKING NOT ENABLED",
            ReturnCode::CorruptedData => "CORRUPTED DATA",
            ReturnCode::EndOfStream => "END OF STREAM",
            ReturnCode::Failure => "FAILURE",
        };
        write!(f, "{}", name)
    }
}

/// Capture resolution requested at open
///
/// The session always asks for the automatic resolution, the meter unit and
/// the Z-up frame; the enums name what is requested from the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Resolution {
    /// Let the camera pick its default
    #[default]
    Auto,
}

/// Coordinate system the poses are expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoordinateSystem {
    /// Right handed, Z up, Y forward
    #[default]
    RightHandedZUp,
}

/// Unit of the reported translations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    Meter,
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolution::Auto => write!(f, "AUTO"),
        }
    }
}

impl std::fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinateSystem::RightHandedZUp => write!(f, "RIGHT_HANDED_Z_UP"),
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unit::Meter => write!(f, "METER"),
        }
    }
}

/// Parameters passed to [`super::PoseSource::open`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub resolution: Resolution,
    pub coordinate_system: CoordinateSystem,
    pub unit: Unit,
    /// Also fetch an IMU sample on every poll
    pub poll_imu: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::Auto,
            coordinate_system: CoordinateSystem::RightHandedZUp,
            unit: Unit::Meter,
            poll_imu: true,
        }
    }
}
