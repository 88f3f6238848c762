//! Input adapter
//!
//! Browser events update an `InputState`; once per frame the driver takes a
//! `TickInput` snapshot from it. Held keys persist across snapshots, pointer
//! and wheel movement are consumed by the snapshot that sees them.

use crate::consts::DOUBLE_TAP_MS;
use crate::sim::TickInput;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Space,
    /// Toggle demo mode
    Autopilot,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "Left" => Some(Key::Left),
            "ArrowRight" | "Right" => Some(Key::Right),
            " " | "Spacebar" => Some(Key::Space),
            "i" | "I" => Some(Key::Autopilot),
            _ => None,
        }
    }
}

/// Accumulated input between frames
#[derive(Debug, Clone, Default)]
pub struct InputState {
    left: bool,
    right: bool,
    pointer_x: Option<f32>,
    wheel_delta: f32,
    /// Timestamp of an unpaired spacebar press
    last_space_ms: Option<f64>,
    double_tap: bool,
    autopilot: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press. `now_ms` is the event timestamp, `repeat` is the
    /// browser's auto-repeat flag. Returns true if the key belongs to the game
    /// (the caller should suppress its default action).
    pub fn key_down(&mut self, key: &str, now_ms: f64, repeat: bool) -> bool {
        let Some(key) = Key::from_dom(key) else {
            return false;
        };
        match key {
            Key::Left => self.left = true,
            Key::Right => self.right = true,
            Key::Space if !repeat => self.press_space(now_ms),
            Key::Space => {}
            Key::Autopilot if !repeat => {
                self.autopilot = !self.autopilot;
                log::info!("Autopilot: {}", self.autopilot);
            }
            Key::Autopilot => {}
        }
        true
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        match Key::from_dom(key) {
            Some(Key::Left) => self.left = false,
            Some(Key::Right) => self.right = false,
            Some(_) => {}
            None => return false,
        }
        true
    }

    fn press_space(&mut self, now_ms: f64) {
        match self.last_space_ms {
            Some(prev) if now_ms - prev <= DOUBLE_TAP_MS => {
                self.double_tap = true;
                self.last_space_ms = None;
                log::debug!("Double tap ({:.0} ms apart)", now_ms - prev);
            }
            _ => self.last_space_ms = Some(now_ms),
        }
    }

    /// Pointer moved to `x` in canvas coordinates
    pub fn mouse_move(&mut self, x: f32) {
        self.pointer_x = Some(x);
    }

    /// Wheel scrolled by `delta_y` (positive moves the paddle right)
    pub fn wheel(&mut self, delta_y: f32) {
        self.wheel_delta += delta_y;
    }

    /// Release every held key (window lost focus)
    pub fn release_all(&mut self) {
        self.left = false;
        self.right = false;
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    /// Input for one tick; clears the one-shot parts
    pub fn snapshot(&mut self) -> TickInput {
        TickInput {
            left: self.left,
            right: self.right,
            pointer_x: self.pointer_x.take(),
            wheel_delta: std::mem::take(&mut self.wheel_delta),
            double_tap: std::mem::take(&mut self.double_tap),
            autopilot: self.autopilot,
        }
    }
}
