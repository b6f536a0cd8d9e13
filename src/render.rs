// SPDX-License-Identifier: GPL-3.0-only

//! Grid canvas rendering
//!
//! The blank grid is drawn once and cached; every frame starts from a copy of
//! it, so no marker history accumulates.

use crate::constants::render;
use crate::transform::CanvasPosition;
use crate::world_frame::WorldFrame;
use image::{Rgb, RgbImage};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct GridRenderer {
    blank: RgbImage,
    marker_radius: u32,
}

impl GridRenderer {
    pub fn new(frame: &WorldFrame) -> Self {
        Self::with_marker_radius(frame, render::MARKER_RADIUS)
    }

    pub fn with_marker_radius(frame: &WorldFrame, marker_radius: u32) -> Self {
        let (width, height) = frame.canvas_size();
        let blank = draw_grid(width, height, frame.pixels_per_grid_line);
        debug!(width, height, "Grid canvas created");

        Self {
            blank,
            marker_radius,
        }
    }

    /// Canvas size in pixels as `(width, height)`
    pub fn dimensions(&self) -> (u32, u32) {
        self.blank.dimensions()
    }

    /// The cached grid without any marker
    pub fn blank(&self) -> &RgbImage {
        &self.blank
    }

    /// Fresh frame with the marker at `position`, if any
    pub fn frame(&self, position: Option<CanvasPosition>) -> RgbImage {
        let mut img = self.blank.clone();
        if let Some(position) = position {
            draw_filled_circle(
                &mut img,
                position,
                self.marker_radius,
                Rgb(render::MARKER_COLOR),
            );
        }
        img
    }
}

/// Black canvas with 1 px white lines every `spacing` pixels starting at 0
pub fn draw_grid(width: u32, height: u32, spacing: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, Rgb(render::BACKGROUND_COLOR));
    let grid = Rgb(render::GRID_COLOR);
    let step = spacing.max(1) as usize;

    for x in (0..width).step_by(step) {
        for y in 0..height {
            img.put_pixel(x, y, grid);
        }
    }
    for y in (0..height).step_by(step) {
        for x in 0..width {
            img.put_pixel(x, y, grid);
        }
    }

    img
}

/// Filled disc; parts outside the image are dropped
pub fn draw_filled_circle(
    img: &mut RgbImage,
    center: CanvasPosition,
    radius: u32,
    color: Rgb<u8>,
) {
    let (width, height) = img.dimensions();
    let r = radius as i64;
    let (cx, cy) = (center.x as i64, center.y as i64);

    // Nothing of the disc can be visible
    if cx + r < 0 || cy + r < 0 || cx - r >= width as i64 || cy - r >= height as i64 {
        return;
    }

    let y_range = (cy - r).max(0)..=(cy + r).min(height as i64 - 1);
    for y in y_range {
        let dy = y - cy;
        for x in (cx - r).max(0)..=(cx + r).min(width as i64 - 1) {
            let dx = x - cx;
            if dx * dx + dy * dy <= r * r {
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Write a frame as PNG, creating parent directories
pub fn save_png(img: &RgbImage, path: &Path) -> Result<(), image::ImageError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(image::ImageError::IoError)?;
    }
    img.save_with_format(path, image::ImageFormat::Png)?;
    info!(path = %path.display(), "Frame saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb<u8> = Rgb(render::GRID_COLOR);
    const BLACK: Rgb<u8> = Rgb(render::BACKGROUND_COLOR);
    const RED: Rgb<u8> = Rgb(render::MARKER_COLOR);

    #[test]
    fn test_grid_lines_every_spacing() {
        let img = draw_grid(100, 60, 25);
        assert_eq!(*img.get_pixel(0, 10), WHITE);
        assert_eq!(*img.get_pixel(25, 10), WHITE);
        assert_eq!(*img.get_pixel(75, 10), WHITE);
        assert_eq!(*img.get_pixel(10, 50), WHITE);
        assert_eq!(*img.get_pixel(10, 10), BLACK);
        assert_eq!(*img.get_pixel(99, 59), BLACK);
    }

    #[test]
    fn test_renderer_matches_world_frame() {
        let renderer = GridRenderer::new(&WorldFrame::default());
        assert_eq!(renderer.dimensions(), (500, 400));
    }

    #[test]
    fn test_marker_drawn_at_position() {
        let renderer = GridRenderer::new(&WorldFrame::default());
        let img = renderer.frame(Some(CanvasPosition::new(260, 210)));
        assert_eq!(*img.get_pixel(260, 210), RED);
        assert_eq!(*img.get_pixel(270, 210), RED);
        assert_eq!(*img.get_pixel(271, 210), BLACK);
    }

    #[test]
    fn test_frames_do_not_accumulate() {
        let renderer = GridRenderer::new(&WorldFrame::default());
        let _ = renderer.frame(Some(CanvasPosition::new(260, 210)));
        let img = renderer.frame(None);
        assert_eq!(img, *renderer.blank());
    }

    #[test]
    fn test_off_canvas_marker_is_clipped_silently() {
        let renderer = GridRenderer::new(&WorldFrame::default());
        let far = renderer.frame(Some(CanvasPosition::new(-500, 9000)));
        assert_eq!(far, *renderer.blank());

        // Straddling the left edge: only the visible half is drawn
        let edge = renderer.frame(Some(CanvasPosition::new(-3, 212)));
        assert_eq!(*edge.get_pixel(0, 212), RED);
        assert_eq!(*edge.get_pixel(7, 212), RED);
        assert_eq!(*edge.get_pixel(8, 212), BLACK);
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames").join("grid.png");
        let img = draw_grid(50, 50, 25);
        save_png(&img, &path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(loaded, img);
    }
}
