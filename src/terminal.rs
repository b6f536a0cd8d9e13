// SPDX-License-Identifier: GPL-3.0-only

//! Terminal tracking viewer
//!
//! Shows the pose labels next to the grid canvas. The canvas is drawn with
//! Unicode half-block characters for improved vertical resolution.

use crate::config::Config;
use crate::constants::timing;
use crate::display::{DisplayState, Labels};
use crate::errors::AppResult;
use crate::render;
use crate::tracking::TrackingSession;
use crate::world_frame::WorldFrame;

use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use image::RgbImage;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

pub type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// Width of the label column in cells
const LABEL_PANEL_WIDTH: u16 = 52;

/// Leaves raw mode and the alternate screen when dropped, also on panic
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        if let Err(e) = execute!(stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen, Show);
    }
}

/// Run `f` inside the alternate screen, restoring the terminal afterwards
pub fn with_terminal<T>(f: impl FnOnce(&mut Tui) -> AppResult<T>) -> AppResult<T> {
    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    f(&mut terminal)
}

/// Deadline of the tick after the one scheduled at `prev`
///
/// When the previous grab overran, missed ticks are dropped and the next one
/// is a full interval after `now`.
pub fn next_deadline(prev: Instant, now: Instant, interval: Duration) -> Instant {
    let next = prev + interval;
    if next < now { now + interval } else { next }
}

/// Run the tracking viewer until the user quits or a grab fails
///
/// The session stays open; the caller closes it once the terminal is restored.
pub fn run(config: &Config, world: WorldFrame, session: &mut TrackingSession) -> AppResult<()> {
    with_terminal(|terminal| run_app(terminal, config, world, session))
}

fn run_app(
    terminal: &mut Tui,
    config: &Config,
    world: WorldFrame,
    session: &mut TrackingSession,
) -> AppResult<()> {
    let interval = config.poll_interval();
    let mut display = DisplayState::new(world, config.marker_radius);
    let mut show_help = false;
    let mut status_message = build_status_message(session.source_name(), interval);
    let mut next_tick = Instant::now();

    info!(
        source = session.source_name(),
        interval_ms = interval.as_millis() as u64,
        "Viewer started"
    );

    loop {
        // Timer tick: one grab per interval
        if Instant::now() >= next_tick {
            let sample = session.poll()?;
            display.update(&sample);
            let (updates, position) = (display.updates(), display.position());
            if updates % timing::TICK_LOG_INTERVAL == 0 {
                debug!(updates, position = ?position, "Viewer tick");
            }

            next_tick = next_deadline(next_tick, Instant::now(), interval);
        }

        terminal.draw(|f| {
            let area = f.area();
            let body_height = area.height.saturating_sub(1);
            let label_width = LABEL_PANEL_WIDTH.min(area.width);

            let label_area = Rect {
                x: area.x,
                y: area.y,
                width: label_width,
                height: body_height,
            };
            let canvas_area = Rect {
                x: area.x + label_width,
                y: area.y,
                width: area.width.saturating_sub(label_width),
                height: body_height,
            };
            let status_area = Rect {
                x: area.x,
                y: area.height.saturating_sub(1),
                width: area.width,
                height: 1,
            };

            f.render_widget(
                LabelPanel {
                    labels: display.labels(),
                    world: display.world(),
                },
                label_area,
            );
            f.render_widget(FrameWidget { frame: display.frame() }, canvas_area);
            f.render_widget(
                StatusBar {
                    message: &status_message,
                },
                status_area,
            );
        })?;

        // Wait for input until the next tick is due
        let timeout = next_tick.saturating_duration_since(Instant::now());
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }

            // 's' to save a snapshot of the canvas
            if key.code == KeyCode::Char('s') {
                show_help = false;
                match save_snapshot(display.frame(), config) {
                    Ok(path) => status_message = format!("Saved: {}", path.display()),
                    Err(e) => {
                        error!("Failed to save snapshot: {}", e);
                        status_message = format!("Error: {}", e);
                    }
                }
            }

            if key.code == KeyCode::Char('h') {
                show_help = !show_help;
                status_message = if show_help {
                    build_help_message()
                } else {
                    build_status_message(session.source_name(), interval)
                };
            }

            if key.code == KeyCode::Char('q') {
                break;
            }
        }
    }

    Ok(())
}

fn build_status_message(source: &str, interval: Duration) -> String {
    format!(
        "{} @ {} ms | 's' snapshot | 'h' help | 'q' quit",
        source,
        interval.as_millis()
    )
}

fn build_help_message() -> String {
    "s: Save snapshot PNG | h: Toggle help | q/Ctrl+C: Quit".to_string()
}

/// Save the current canvas as a timestamped PNG
fn save_snapshot(frame: &RgbImage, config: &Config) -> AppResult<PathBuf> {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let path = config
        .snapshot_dir()
        .join(format!("GRID_{}.png", timestamp));
    render::save_png(frame, &path)?;
    Ok(path)
}

/// Pose labels plus the world frame summary
struct LabelPanel<'a> {
    labels: &'a Labels,
    world: &'a WorldFrame,
}

impl Widget for LabelPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let caption = Style::default().add_modifier(Modifier::BOLD);
        let value = Style::default().fg(Color::Gray);
        let bottom = area.y + area.height;
        let mut y = area.y;

        let (width, height) = self.world.canvas_size();
        let world_line = format!(
            "{} m x {} m, {} x {} px",
            self.world.length_m, self.world.width_m, width, height
        );
        let rows = std::iter::once(("World frame", world_line.as_str()))
            .chain(self.labels.rows());

        for (name, text) in rows {
            if y + 1 >= bottom {
                break;
            }
            buf.set_stringn(area.x + 1, y, name, area.width as usize, caption);
            buf.set_stringn(
                area.x + 2,
                y + 1,
                text,
                area.width.saturating_sub(2) as usize,
                value,
            );
            y += 3;
        }
    }
}

/// Widget that renders the canvas using half-block characters
struct FrameWidget<'a> {
    frame: &'a RgbImage,
}

impl Widget for FrameWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (frame_width, frame_height) = self.frame.dimensions();
        if frame_width == 0 || frame_height == 0 || area.width == 0 || area.height == 0 {
            return;
        }

        // Each terminal cell displays 2 vertical pixels
        let frame_aspect = frame_width as f64 / frame_height as f64;
        let term_width = area.width as f64;
        let term_height = (area.height * 2) as f64;

        let (display_width, display_height) = if term_width / term_height > frame_aspect {
            let h = term_height;
            let w = h * frame_aspect;
            (w as u16, (h / 2.0) as u16)
        } else {
            let w = term_width;
            let h = w / frame_aspect;
            (w as u16, (h / 2.0) as u16)
        };
        if display_width == 0 || display_height == 0 {
            return;
        }

        let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
        let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;

        let x_scale = frame_width as f64 / display_width as f64;
        let y_scale = frame_height as f64 / (display_height * 2) as f64;

        for ty in 0..display_height {
            for tx in 0..display_width {
                let src_x = (tx as f64 * x_scale) as u32;
                let src_y_top = (ty as f64 * 2.0 * y_scale) as u32;
                let src_y_bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

                let top = sample_pixel(self.frame, src_x, src_y_top);
                let bottom = sample_pixel(self.frame, src_x, src_y_bottom);

                if let Some(cell) = buf.cell_mut((x_offset + tx, y_offset + ty)) {
                    cell.set_char('▀');
                    cell.set_fg(top);
                    cell.set_bg(bottom);
                }
            }
        }
    }
}

fn sample_pixel(frame: &RgbImage, x: u32, y: u32) -> Color {
    let x = x.min(frame.width() - 1);
    let y = y.min(frame.height() - 1);
    let [r, g, b] = frame.get_pixel(x, y).0;
    Color::Rgb(r, g, b)
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        buf.set_stringn(
            area.x,
            area.y,
            self.message,
            area.width as usize,
            Style::default().fg(Color::White).bg(Color::DarkGray),
        );
    }
}
