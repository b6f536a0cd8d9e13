// SPDX-License-Identifier: GPL-3.0-only

//! posegrid - top-down grid viewer for depth camera positional tracking
//!
//! Polls a pose source on a fixed timer and draws the camera position as a
//! marker on a metric grid.
//!
//! # Architecture
//!
//! - [`world_frame`]: the physical rectangle shown on the canvas
//! - [`transform`]: metric translation to canvas pixel
//! - [`tracking`]: pose source trait, camera session lifecycle, sources
//! - [`render`]: cached grid canvas and marker overlay
//! - [`display`]: per-tick labels and frame
//! - [`dialog`]: world frame query
//! - [`terminal`]: terminal viewer
//! - [`headless`]: polling loop without a display
//! - [`config`]: user configuration

pub mod config;
pub mod constants;
pub mod dialog;
pub mod display;
pub mod errors;
pub mod headless;
pub mod render;
pub mod terminal;
pub mod tracking;
pub mod transform;
pub mod world_frame;

// Re-export commonly used types
pub use config::Config;
pub use errors::{AppError, AppResult, ConfigError, TrackingError};
pub use tracking::{LifecycleStep, PoseSource, SourceKind, TrackingSample, TrackingSession};
pub use transform::{CanvasPosition, pose_to_pixel};
pub use world_frame::WorldFrame;
