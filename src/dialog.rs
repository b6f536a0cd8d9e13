// SPDX-License-Identifier: GPL-3.0-only

//! World frame query
//!
//! A modal terminal form with two numeric fields (length and width in
//! meters) prefilled with the defaults. Confirming returns the entered frame,
//! cancelling keeps the defaults.

use crate::errors::AppResult;
use crate::terminal::{Tui, with_terminal};
use crate::world_frame::WorldFrame;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Clear, Widget},
};
use tracing::info;

const TITLE: &str = "Enter World Frame Length and Width (m)";
const LENGTH_LABEL: &str = "World Frame Length (m): ";
const WIDTH_LABEL: &str = "World Frame Width (m):  ";
const CONFIRM_LABEL: &str = "[ Confirm values ]";
const FIELD_WIDTH: u16 = 8;

/// Which control has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Length,
    Width,
    Confirm,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Length => Focus::Width,
            Focus::Width => Focus::Confirm,
            Focus::Confirm => Focus::Length,
        }
    }

    fn previous(self) -> Self {
        match self {
            Focus::Length => Focus::Confirm,
            Focus::Width => Focus::Length,
            Focus::Confirm => Focus::Width,
        }
    }
}

/// Result of feeding a key to the form
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    /// Keep the dialog open
    Pending,
    Confirmed(WorldFrame),
    Cancelled,
}

/// Editable state of the dialog
#[derive(Debug, Clone)]
pub struct WorldFrameForm {
    defaults: WorldFrame,
    length: String,
    width: String,
    focus: Focus,
    error: Option<String>,
}

impl WorldFrameForm {
    pub fn new(defaults: WorldFrame) -> Self {
        Self {
            defaults,
            length: format!("{}", defaults.length_m),
            width: format!("{}", defaults.width_m),
            focus: Focus::Length,
            error: None,
        }
    }

    pub fn length_text(&self) -> &str {
        &self.length
    }

    pub fn width_text(&self) -> &str {
        &self.width
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormOutcome {
        if key.kind != KeyEventKind::Press {
            return FormOutcome::Pending;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return FormOutcome::Cancelled;
        }

        match key.code {
            KeyCode::Esc => return FormOutcome::Cancelled,
            KeyCode::Enter => return self.confirm(),
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.previous(),
            KeyCode::Backspace => {
                if let Some(field) = self.focused_field() {
                    field.pop();
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == '-' => {
                if let Some(field) = self.focused_field() {
                    field.push(c);
                }
            }
            _ => {}
        }
        FormOutcome::Pending
    }

    fn focused_field(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Length => Some(&mut self.length),
            Focus::Width => Some(&mut self.width),
            Focus::Confirm => None,
        }
    }

    fn confirm(&mut self) -> FormOutcome {
        let parsed = self
            .length
            .trim()
            .parse::<f64>()
            .ok()
            .zip(self.width.trim().parse::<f64>().ok());

        let Some((length_m, width_m)) = parsed else {
            self.error = Some("Both values must be numbers".to_string());
            return FormOutcome::Pending;
        };

        match WorldFrame::new(
            length_m,
            width_m,
            self.defaults.pixels_per_grid_line,
            self.defaults.grid_spacing_m,
        ) {
            Ok(frame) => FormOutcome::Confirmed(frame),
            Err(e) => {
                self.error = Some(e.to_string());
                FormOutcome::Pending
            }
        }
    }
}

impl Widget for &WorldFrameForm {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = (TITLE.len() as u16 + 6).min(area.width);
        let height = 8u16.min(area.height);
        let popup = Rect {
            x: area.x + (area.width.saturating_sub(width)) / 2,
            y: area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        };

        Clear.render(popup, buf);
        let block = Block::bordered().title(TITLE);
        let inner = block.inner(popup);
        block.render(popup, buf);

        let normal = Style::default();
        let focused = Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD);
        let style_for = |focus: Focus| if self.focus == focus { focused } else { normal };

        let rows = [
            (LENGTH_LABEL, self.length.as_str(), Focus::Length),
            (WIDTH_LABEL, self.width.as_str(), Focus::Width),
        ];
        for (i, (label, value, focus)) in rows.into_iter().enumerate() {
            let y = inner.y + 1 + i as u16;
            if y >= inner.y + inner.height {
                return;
            }
            buf.set_string(inner.x + 1, y, label, normal);
            let field = format!("{:<width$}", value, width = FIELD_WIDTH as usize);
            buf.set_string(inner.x + 1 + label.len() as u16, y, field, style_for(focus));
        }

        let confirm_y = inner.y + 4;
        if confirm_y < inner.y + inner.height {
            buf.set_string(inner.x + 1, confirm_y, CONFIRM_LABEL, style_for(Focus::Confirm));
        }

        let hint_y = inner.y + 5;
        if hint_y < inner.y + inner.height {
            let (text, style) = match &self.error {
                Some(error) => (error.as_str(), Style::default().fg(Color::Red)),
                None => (
                    "Tab: next | Enter: confirm | Esc: cancel",
                    Style::default().fg(Color::DarkGray),
                ),
            };
            buf.set_string(inner.x + 1, hint_y, text, style);
        }
    }
}

/// Ask for the world frame, or return `defaults` when `use_default` is set
pub fn query_world_frame(defaults: WorldFrame, use_default: bool) -> AppResult<WorldFrame> {
    if use_default {
        return Ok(defaults);
    }

    println!("Getting world frame measurements from user...");
    let outcome = with_terminal(|terminal| run_form(terminal, WorldFrameForm::new(defaults)))?;

    match outcome {
        FormOutcome::Confirmed(frame) => {
            info!(length_m = frame.length_m, width_m = frame.width_m, "World frame entered");
            Ok(frame)
        }
        _ => {
            println!("User cancelled input, keeping defaults");
            info!("World frame query cancelled");
            Ok(defaults)
        }
    }
}

fn run_form(terminal: &mut Tui, mut form: WorldFrameForm) -> AppResult<FormOutcome> {
    loop {
        terminal.draw(|f| {
            let area = f.area();
            f.render_widget(&form, area);
        })?;

        if let Event::Key(key) = event::read()? {
            match form.handle_key(key) {
                FormOutcome::Pending => {}
                outcome => return Ok(outcome),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(form: &mut WorldFrameForm, text: &str) {
        for c in text.chars() {
            form.handle_key(press(KeyCode::Char(c)));
        }
    }

    fn clear_field(form: &mut WorldFrameForm) {
        for _ in 0..16 {
            form.handle_key(press(KeyCode::Backspace));
        }
    }

    #[test]
    fn test_fields_prefilled_with_defaults() {
        let form = WorldFrameForm::new(WorldFrame::default());
        assert_eq!(form.length_text(), "10");
        assert_eq!(form.width_text(), "8");
        assert_eq!(form.focus(), Focus::Length);
    }

    #[test]
    fn test_confirm_returns_entered_values() {
        let mut form = WorldFrameForm::new(WorldFrame::default());
        clear_field(&mut form);
        type_text(&mut form, "12.5");
        form.handle_key(press(KeyCode::Tab));
        clear_field(&mut form);
        type_text(&mut form, "6");

        let FormOutcome::Confirmed(frame) = form.handle_key(press(KeyCode::Enter)) else {
            panic!("expected confirmation");
        };
        assert_eq!(frame.length_m, 12.5);
        assert_eq!(frame.width_m, 6.0);
        assert_eq!(frame.canvas_size(), (625, 300));
    }

    #[test]
    fn test_escape_cancels() {
        let mut form = WorldFrameForm::new(WorldFrame::default());
        assert_eq!(form.handle_key(press(KeyCode::Esc)), FormOutcome::Cancelled);
    }

    #[test]
    fn test_invalid_input_keeps_dialog_open() {
        let mut form = WorldFrameForm::new(WorldFrame::default());
        clear_field(&mut form);
        assert_eq!(form.handle_key(press(KeyCode::Enter)), FormOutcome::Pending);
        assert!(form.error().is_some());

        type_text(&mut form, "-3");
        assert_eq!(form.handle_key(press(KeyCode::Enter)), FormOutcome::Pending);
        assert!(form.error().unwrap().contains("length_m"));
    }

    #[test]
    fn test_letters_are_ignored() {
        let mut form = WorldFrameForm::new(WorldFrame::default());
        type_text(&mut form, "ab");
        assert_eq!(form.length_text(), "10");
    }

    #[test]
    fn test_default_skips_dialog() {
        let defaults = WorldFrame::default();
        assert_eq!(query_world_frame(defaults, true).unwrap(), defaults);
    }

    #[test]
    fn test_form_renders_labels() {
        let form = WorldFrameForm::new(WorldFrame::default());
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        (&form).render(area, &mut buf);

        let text: String = buf.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("World Frame Length (m)"));
        assert!(text.contains("Confirm values"));
    }
}
