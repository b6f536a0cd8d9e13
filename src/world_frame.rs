// SPDX-License-Identifier: GPL-3.0-only

//! World frame: the physical rectangle the grid represents
//!
//! Length runs left to right on screen, width runs top to bottom. The grid is
//! drawn every `grid_spacing_m` meters, each spacing taking
//! `pixels_per_grid_line` pixels on the canvas.

use crate::constants::world;
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldFrame {
    /// Extent along the canvas x axis, meters
    pub length_m: f64,
    /// Extent along the canvas y axis, meters
    pub width_m: f64,
    /// Pixels between two grid lines
    pub pixels_per_grid_line: u32,
    /// Meters between two grid lines
    pub grid_spacing_m: f64,
}

impl Default for WorldFrame {
    fn default() -> Self {
        Self {
            length_m: world::DEFAULT_LENGTH_M,
            width_m: world::DEFAULT_WIDTH_M,
            pixels_per_grid_line: world::PIXELS_PER_GRID_LINE,
            grid_spacing_m: world::GRID_SPACING_M,
        }
    }
}

impl WorldFrame {
    /// Build a validated world frame
    pub fn new(
        length_m: f64,
        width_m: f64,
        pixels_per_grid_line: u32,
        grid_spacing_m: f64,
    ) -> Result<Self, ConfigError> {
        let frame = Self {
            length_m,
            width_m,
            pixels_per_grid_line,
            grid_spacing_m,
        };
        frame.validate()?;
        Ok(frame)
    }

    /// Default grid parameters with a custom length and width
    pub fn with_dimensions(length_m: f64, width_m: f64) -> Result<Self, ConfigError> {
        Self::new(
            length_m,
            width_m,
            world::PIXELS_PER_GRID_LINE,
            world::GRID_SPACING_M,
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("length_m", self.length_m)?;
        check_positive("width_m", self.width_m)?;
        check_positive("grid_spacing_m", self.grid_spacing_m)?;
        if self.pixels_per_grid_line == 0 {
            return Err(ConfigError::InvalidGridPixels);
        }

        let pixels = self.pixels_per_grid_line as f64;
        let width = (self.length_m / self.grid_spacing_m).floor() * pixels;
        let height = (self.width_m / self.grid_spacing_m).floor() * pixels;
        let max = world::MAX_CANVAS_SIDE_PX as f64;
        if width > max || height > max {
            return Err(ConfigError::CanvasTooLarge {
                width: width as u64,
                height: height as u64,
            });
        }
        Ok(())
    }

    /// Pixels per meter
    pub fn scale(&self) -> f64 {
        self.pixels_per_grid_line as f64 / self.grid_spacing_m
    }

    /// Whole grid cells along the length (partial cells are dropped)
    pub fn grid_cells_length(&self) -> u32 {
        (self.length_m / self.grid_spacing_m) as u32
    }

    /// Whole grid cells along the width (partial cells are dropped)
    pub fn grid_cells_width(&self) -> u32 {
        (self.width_m / self.grid_spacing_m) as u32
    }

    /// Canvas size in pixels as `(width, height)`
    pub fn canvas_size(&self) -> (u32, u32) {
        (
            self.grid_cells_length()
                .saturating_mul(self.pixels_per_grid_line),
            self.grid_cells_width()
                .saturating_mul(self.pixels_per_grid_line),
        )
    }

    /// Canvas center, used as the pixel position of the world origin
    pub fn center(&self) -> (i32, i32) {
        let (w, h) = self.canvas_size();
        ((w / 2) as i32, (h / 2) as i32)
    }

    /// Half extents in meters covered by the canvas around its center
    pub fn half_extent_m(&self) -> (f64, f64) {
        let (w, h) = self.canvas_size();
        let scale = self.scale();
        (w as f64 / 2.0 / scale, h as f64 / 2.0 / scale)
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDimension { name, value })
    }
}
