// SPDX-License-Identifier: GPL-3.0-only

//! Pose-to-pixel transform
//!
//! Maps a metric translation on the ground plane to a canvas pixel. The image
//! y axis grows downwards while +y in the world frame points forward, so the
//! vertical term is subtracted.
//!
//! Positions are never clamped: a pose outside the world frame yields a pixel
//! outside the canvas and the renderer simply draws nothing visible there.

use crate::world_frame::WorldFrame;

/// Pixel coordinate on the canvas; may lie outside it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanvasPosition {
    pub x: i32,
    pub y: i32,
}

impl CanvasPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Whether the position lies within `[0, width) x [0, height)`
    pub fn is_within(&self, width: u32, height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && (self.x as i64) < width as i64
            && (self.y as i64) < height as i64
    }
}

impl std::fmt::Display for CanvasPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Map translation `(tx, ty)` in meters to a pixel around `reference`.
///
/// `scale` is in pixels per meter. Non-finite input gives an unspecified
/// (but non-panicking) result.
pub fn pose_to_pixel(tx: f64, ty: f64, reference: (i32, i32), scale: f64) -> CanvasPosition {
    let (refx, refy) = reference;
    CanvasPosition {
        x: refx.saturating_add((tx * scale).round() as i32),
        y: refy.saturating_sub((ty * scale).round() as i32),
    }
}

/// Transform bound to a world frame: canvas center as reference, frame scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelMapper {
    reference: (i32, i32),
    scale: f64,
}

impl PixelMapper {
    pub fn new(frame: &WorldFrame) -> Self {
        Self {
            reference: frame.center(),
            scale: frame.scale(),
        }
    }

    pub fn reference(&self) -> (i32, i32) {
        self.reference
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn map(&self, tx: f64, ty: f64) -> CanvasPosition {
        pose_to_pixel(tx, ty, self.reference, self.scale)
    }
}
