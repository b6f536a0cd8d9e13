// SPDX-License-Identifier: GPL-3.0-only

//! Per-tick display state
//!
//! Holds what the viewer window shows: the text labels and the latest frame.
//! It knows nothing about terminals so the headless runner and tests can use
//! it directly.

use crate::render::GridRenderer;
use crate::tracking::{ImuSample, PoseSample, TrackingSample};
use crate::transform::{CanvasPosition, PixelMapper};
use crate::world_frame::WorldFrame;
use image::RgbImage;

/// Text shown next to the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub translation: String,
    pub orientation: String,
    pub heading: String,
    pub acceleration: String,
    pub angular_velocity: String,
    pub canvas: String,
    pub state: String,
}

impl Labels {
    fn waiting() -> Self {
        let waiting = "-".to_string();
        Self {
            translation: waiting.clone(),
            orientation: waiting.clone(),
            heading: waiting.clone(),
            acceleration: waiting.clone(),
            angular_velocity: waiting.clone(),
            canvas: waiting,
            state: "Waiting for camera...".to_string(),
        }
    }

    /// `(caption, value)` pairs in display order
    pub fn rows(&self) -> [(&'static str, &str); 7] {
        [
            ("Tracking", self.state.as_str()),
            ("Translation", self.translation.as_str()),
            ("Orientation", self.orientation.as_str()),
            ("Heading", self.heading.as_str()),
            ("Acceleration", self.acceleration.as_str()),
            ("Angular velocity", self.angular_velocity.as_str()),
            ("Canvas", self.canvas.as_str()),
        ]
    }
}

pub struct DisplayState {
    world: WorldFrame,
    mapper: PixelMapper,
    renderer: GridRenderer,
    labels: Labels,
    position: Option<CanvasPosition>,
    frame: RgbImage,
    updates: u64,
}

impl DisplayState {
    pub fn new(world: WorldFrame, marker_radius: u32) -> Self {
        let renderer = GridRenderer::with_marker_radius(&world, marker_radius);
        let frame = renderer.frame(None);
        Self {
            world,
            mapper: PixelMapper::new(&world),
            renderer,
            labels: Labels::waiting(),
            position: None,
            frame,
            updates: 0,
        }
    }

    /// Refresh labels and frame from the latest sample
    pub fn update(&mut self, sample: &TrackingSample) {
        let pose = &sample.pose;
        let position = self.mapper.map(pose.translation.x, pose.translation.y);
        let (width, height) = self.renderer.dimensions();

        self.labels = Labels {
            translation: format_translation(pose),
            orientation: format_orientation(pose),
            heading: format_heading(pose),
            acceleration: sample
                .imu
                .as_ref()
                .map(format_acceleration)
                .unwrap_or_else(|| "IMU unavailable".to_string()),
            angular_velocity: sample
                .imu
                .as_ref()
                .map(format_angular_velocity)
                .unwrap_or_else(|| "IMU unavailable".to_string()),
            canvas: if position.is_within(width, height) {
                position.to_string()
            } else {
                format!("{} off canvas", position)
            },
            state: pose.state.to_string(),
        };

        self.position = Some(position);
        self.frame = self.renderer.frame(self.position);
        self.updates += 1;
    }

    pub fn world(&self) -> &WorldFrame {
        &self.world
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn frame(&self) -> &RgbImage {
        &self.frame
    }

    /// Marker position of the last update
    pub fn position(&self) -> Option<CanvasPosition> {
        self.position
    }

    pub fn updates(&self) -> u64 {
        self.updates
    }
}

pub fn format_translation(pose: &PoseSample) -> String {
    let t = pose.translation;
    format!("tx: {:.3} m, ty: {:.3} m, tz: {:.3} m", t.x, t.y, t.z)
}

pub fn format_orientation(pose: &PoseSample) -> String {
    let o = pose.orientation;
    format!("ox: {:.3}, oy: {:.3}, oz: {:.3}, ow: {:.3}", o.x, o.y, o.z, o.w)
}

pub fn format_heading(pose: &PoseSample) -> String {
    let (roll, pitch, yaw) = pose.orientation.euler_degrees();
    format!("roll: {:.1}°, pitch: {:.1}°, yaw: {:.1}°", roll, pitch, yaw)
}

pub fn format_acceleration(imu: &ImuSample) -> String {
    let [ax, ay, az] = imu.linear_acceleration;
    format!("ax: {:.3}, ay: {:.3}, az: {:.3} m/s²", ax, ay, az)
}

pub fn format_angular_velocity(imu: &ImuSample) -> String {
    let [vx, vy, vz] = imu.angular_velocity;
    format!("vx: {:.3}, vy: {:.3}, vz: {:.3} rad/s", vx, vy, vz)
}

/// One line per polled sample for plain stdout logging
pub fn sample_line(tick: u64, sample: &TrackingSample) -> String {
    let mut line = format!(
        "[{}] {} | {}",
        tick,
        format_translation(&sample.pose),
        format_orientation(&sample.pose)
    );
    if let Some(imu) = &sample.imu {
        line.push_str(" | ");
        line.push_str(&format_acceleration(imu));
        line.push_str(" | ");
        line.push_str(&format_angular_velocity(imu));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::Translation;

    fn sample_at(x: f64, y: f64, imu: Option<ImuSample>) -> TrackingSample {
        TrackingSample {
            pose: PoseSample {
                translation: Translation::new(x, y, 0.0),
                ..Default::default()
            },
            imu,
        }
    }

    #[test]
    fn test_initial_state_waits() {
        let display = DisplayState::new(WorldFrame::default(), 10);
        assert_eq!(display.position(), None);
        assert_eq!(display.labels().state, "Waiting for camera...");
        assert_eq!(display.updates(), 0);
    }

    #[test]
    fn test_update_moves_marker() {
        let mut display = DisplayState::new(WorldFrame::default(), 10);
        display.update(&sample_at(1.0, 0.0, None));
        assert_eq!(display.position(), Some(CanvasPosition::new(300, 200)));
        assert_eq!(display.labels().canvas, "(300, 200)");
        assert_eq!(display.labels().acceleration, "IMU unavailable");
        assert_eq!(*display.frame().get_pixel(300, 210), image::Rgb([255, 0, 0]));
    }

    #[test]
    fn test_off_canvas_is_flagged_not_clamped() {
        let mut display = DisplayState::new(WorldFrame::default(), 10);
        display.update(&sample_at(6.0, 0.0, None));
        assert_eq!(display.position(), Some(CanvasPosition::new(550, 200)));
        assert!(display.labels().canvas.ends_with("off canvas"));
    }

    #[test]
    fn test_labels_show_imu() {
        let mut display = DisplayState::new(WorldFrame::default(), 10);
        let imu = ImuSample {
            linear_acceleration: [0.0, 0.0, 9.81],
            angular_velocity: [0.0, 0.0, 1.0],
        };
        display.update(&sample_at(0.0, 0.0, Some(imu)));
        assert_eq!(display.labels().acceleration, "ax: 0.000, ay: 0.000, az: 9.810 m/s²");
        assert!(display.labels().angular_velocity.contains("vz: 1.000"));
    }

    #[test]
    fn test_sample_line() {
        let line = sample_line(3, &sample_at(0.5, -0.25, None));
        assert!(line.starts_with("[3] tx: 0.500 m, ty: -0.250 m"));
        assert!(!line.contains("m/s²"));
    }
}
