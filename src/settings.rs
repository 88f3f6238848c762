//! Runtime game options
//!
//! Built from the values of the page's option controls. Nothing here is
//! persisted; a reload starts from the defaults again.

use serde::{Deserialize, Serialize};

use crate::consts::{BRICK_COLUMNS, BRICK_ROWS, DEFAULT_QUIZ_BRICKS};

/// Paddle size presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PaddleSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl PaddleSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaddleSize::Small => "small",
            PaddleSize::Medium => "medium",
            PaddleSize::Large => "large",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "small" => Some(PaddleSize::Small),
            "medium" | "med" => Some(PaddleSize::Medium),
            "large" => Some(PaddleSize::Large),
            _ => None,
        }
    }

    /// Paddle width in pixels
    pub fn width(&self) -> f32 {
        match self {
            PaddleSize::Small => 60.0,
            PaddleSize::Medium => 90.0,
            PaddleSize::Large => 120.0,
        }
    }
}

/// Backdrop variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Backdrop {
    #[default]
    None,
    /// New York skyline with collidable buildings
    Nyc,
}

impl Backdrop {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backdrop::None => "none",
            Backdrop::Nyc => "nyc",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Some(Backdrop::None),
            "nyc" => Some(Backdrop::Nyc),
            _ => None,
        }
    }

    pub fn has_buildings(&self) -> bool {
        matches!(self, Backdrop::Nyc)
    }
}

/// Options chosen before a run starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameOptions {
    pub paddle_size: PaddleSize,
    /// Number of green quiz bricks
    pub quiz_bricks: usize,
    /// Ball speed scale
    pub gravity: f32,
    pub backdrop: Backdrop,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            paddle_size: PaddleSize::Medium,
            quiz_bricks: DEFAULT_QUIZ_BRICKS,
            gravity: 1.0,
            backdrop: Backdrop::None,
        }
    }
}

impl GameOptions {
    /// Lowest accepted gravity
    pub const MIN_GRAVITY: f32 = 0.25;
    /// Highest accepted gravity
    pub const MAX_GRAVITY: f32 = 4.0;

    /// Build options from raw control values. Unknown or unparsable values
    /// keep their defaults.
    pub fn from_values(size: &str, green_count: &str, gravity: &str, city: &str) -> Self {
        let mut options = Self::default();

        match PaddleSize::from_str(size) {
            Some(s) => options.paddle_size = s,
            None => log::warn!("Unknown paddle size {size:?}, using {}", options.paddle_size.as_str()),
        }

        match green_count.trim().parse::<usize>() {
            Ok(n) => options.quiz_bricks = n,
            Err(_) => log::warn!("Bad green brick count {green_count:?}, using {}", options.quiz_bricks),
        }

        match gravity.trim().parse::<f32>() {
            Ok(g) if g.is_finite() && g > 0.0 => options.gravity = g,
            _ => log::warn!("Bad gravity {gravity:?}, using {}", options.gravity),
        }

        match Backdrop::from_str(city) {
            Some(b) => options.backdrop = b,
            None => log::warn!("Unknown city {city:?}, using {}", options.backdrop.as_str()),
        }

        options.sanitized()
    }

    /// Clamp values into playable ranges
    pub fn sanitized(mut self) -> Self {
        self.quiz_bricks = self.quiz_bricks.min(BRICK_COLUMNS * BRICK_ROWS);
        self.gravity = if self.gravity.is_finite() {
            self.gravity.clamp(Self::MIN_GRAVITY, Self::MAX_GRAVITY)
        } else {
            1.0
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_values() {
        let options = GameOptions::from_values("Large", "5", "1.5", "nyc");
        assert_eq!(options.paddle_size, PaddleSize::Large);
        assert_eq!(options.quiz_bricks, 5);
        assert!((options.gravity - 1.5).abs() < f32::EPSILON);
        assert_eq!(options.backdrop, Backdrop::Nyc);
    }

    #[test]
    fn test_from_values_keeps_defaults_on_garbage() {
        let options = GameOptions::from_values("huge", "lots", "-2", "paris");
        assert_eq!(options, GameOptions::default());
    }

    #[test]
    fn test_sanitized_clamps() {
        let options = GameOptions {
            quiz_bricks: 999,
            gravity: 50.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(options.quiz_bricks, BRICK_COLUMNS * BRICK_ROWS);
        assert_eq!(options.gravity, GameOptions::MAX_GRAVITY);
    }

    #[test]
    fn test_paddle_widths() {
        assert_eq!(PaddleSize::Small.width(), 60.0);
        assert_eq!(PaddleSize::default().width(), 90.0);
        assert_eq!(PaddleSize::Large.width(), 120.0);
    }
}
