// Copyright (c) 2026 rezky_nightky

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Color;

use crate::color::{preset_index, terminal_color, PRESETS};
use crate::frame::Frame;
use crate::runtime::{is_zero_width, ColorMode, Style, MAX_SPEED, MIN_SPEED};

const HINT: &str = "space pause | up/down speed | c color | enter message | click burst | q quit";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    None,
    Redraw,
    ToggleAnimation,
    Reset,
    Quit,
}

/// Keyboard control panel: owns the style parameters and the play state the
/// animation reads every frame.
pub struct Controls {
    style: Style,
    animating: bool,
    show_hud: bool,
    screensaver: bool,
    editing: Option<String>,
}

impl Controls {
    pub fn new(style: Style, animating: bool, show_hud: bool, screensaver: bool) -> Self {
        Self {
            style,
            animating,
            show_hud,
            screensaver,
            editing: None,
        }
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    #[allow(dead_code)]
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::None;
        }
        if self.screensaver {
            return Action::Quit;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }
        if self.editing.is_some() {
            return self.handle_edit_key(key);
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Action::Quit,
            KeyCode::Char(' ') | KeyCode::Char('p') => {
                self.animating = !self.animating;
                Action::ToggleAnimation
            }
            KeyCode::Up => self.nudge_speed(1),
            KeyCode::Down => self.nudge_speed(-1),
            KeyCode::PageUp => self.nudge_speed(10),
            KeyCode::PageDown => self.nudge_speed(-10),
            KeyCode::Char('c') => self.cycle_color(true),
            KeyCode::Char('C') => self.cycle_color(false),
            KeyCode::Char('r') => Action::Reset,
            KeyCode::Char('h') => {
                self.show_hud = !self.show_hud;
                Action::Redraw
            }
            KeyCode::Enter => {
                self.editing = Some(self.style.message.clone());
                Action::Redraw
            }
            _ => Action::None,
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) -> Action {
        let Some(buf) = self.editing.as_mut() else {
            return Action::None;
        };
        match key.code {
            KeyCode::Enter => {
                self.style.message = std::mem::take(buf);
                self.editing = None;
                log::info!("message set to {:?}", self.style.message);
            }
            KeyCode::Esc => self.editing = None,
            KeyCode::Backspace => {
                buf.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => buf.push(c),
            _ => return Action::None,
        }
        Action::Redraw
    }

    fn nudge_speed(&mut self, delta: i32) -> Action {
        let speed = (self.style.speed + delta).clamp(MIN_SPEED as i32, MAX_SPEED as i32);
        if speed == self.style.speed {
            return Action::None;
        }
        self.style.speed = speed;
        log::debug!("speed {}", speed);
        Action::Redraw
    }

    fn cycle_color(&mut self, forward: bool) -> Action {
        let n = PRESETS.len();
        let next = match (preset_index(self.style.color), forward) {
            (Some(i), true) => (i + 1) % n,
            (Some(i), false) => (i + n - 1) % n,
            (None, _) => 0,
        };
        let (name, rgb) = PRESETS[next];
        self.style.color = rgb;
        log::debug!("color {} {}", name, rgb);
        Action::Redraw
    }

    fn status_line(&self) -> String {
        if let Some(buf) = &self.editing {
            return format!(" message: {}_  (enter save, esc cancel) ", buf);
        }
        format!(
            " speed {} | {} | {} | {} ",
            self.style.speed,
            self.style.color,
            self.style.display_text(),
            if self.animating { "playing" } else { "paused" }
        )
    }

    /// Paints the status line over the top row of `frame`.
    pub fn draw_hud(&self, frame: &mut Frame, mode: ColorMode, bg: Option<Color>) {
        if !self.show_hud && self.editing.is_none() {
            return;
        }
        let mut line: String = self
            .status_line()
            .chars()
            .filter(|&c| !is_zero_width(c))
            .collect();
        let width = frame.width as usize;
        if line.chars().count() + HINT.chars().count() + 1 <= width && self.editing.is_none() {
            line.push(' ');
            line.push_str(HINT);
        }
        frame.put_str(0, 0, &line, terminal_color(self.style.color, mode), bg);
    }
}
