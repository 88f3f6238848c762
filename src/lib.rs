//! Quiz Breakout - a brick breaker where green bricks ask questions
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball, paddle, bricks, skyline, quiz suspension)
//! - `quiz`: Question bank, topic pool and answer checking
//! - `input`: Keyboard/mouse/wheel events folded into per-tick input
//! - `renderer`: Draw-order logic behind a `Surface` capability
//! - `platform`: Data loading with fallbacks, plus browser adapters (canvas surface, fetch)
//! - `settings`: Runtime game options from the UI controls

pub mod input;
pub mod platform;
pub mod quiz;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use input::InputState;
pub use quiz::{CheatList, DataError, Question, QuestionBank, TopicSelection};
pub use settings::{Backdrop, GameOptions, PaddleSize};

/// Game configuration constants
pub mod consts {
    /// Canvas size used before the page reports its real size
    pub const DEFAULT_CANVAS_WIDTH: f32 = 520.0;
    pub const DEFAULT_CANVAS_HEIGHT: f32 = 400.0;
    /// Smallest canvas the layout still fits into
    pub const MIN_CANVAS_WIDTH: f32 = 320.0;
    pub const MIN_CANVAS_HEIGHT: f32 = 240.0;

    /// Brick grid
    pub const BRICK_COLUMNS: usize = 7;
    pub const BRICK_ROWS: usize = 5;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_PADDING: f32 = 10.0;
    pub const BRICK_OFFSET_TOP: f32 = 30.0;
    pub const BRICK_OFFSET_LEFT: f32 = 30.0;
    /// Quiz bricks placed when no option says otherwise
    pub const DEFAULT_QUIZ_BRICKS: usize = 3;

    /// Paddle
    pub const PADDLE_HEIGHT: f32 = 12.0;
    /// Pixels per tick while an arrow key is held
    pub const PADDLE_STEP: f32 = 5.0;
    /// Pixels of paddle travel per wheel delta unit
    pub const WHEEL_SENSITIVITY: f32 = 0.5;

    /// Ball
    pub const BALL_RADIUS: f32 = 10.0;
    /// Per-axis speed at gravity 1.0 (pixels per tick)
    pub const BALL_START_SPEED: f32 = 2.0;
    /// Start height above the floor
    pub const BALL_START_LIFT: f32 = 30.0;

    /// Scoring
    pub const BRICK_POINTS: u64 = 10;
    pub const QUIZ_POINTS: u64 = 50;

    /// Cheat unlock and timing
    pub const CHEAT_UNLOCK_SCORE: u64 = 200;
    pub const CHEAT_BALL_RADIUS: f32 = 16.0;
    /// Max milliseconds between the two spacebar presses of a double tap
    pub const DOUBLE_TAP_MS: f64 = 300.0;
    /// Max ticks between a double tap and the paddle bounce it arms
    pub const CHEAT_WINDOW_TICKS: u64 = 30;

    /// Window flicker duration range in ticks (~100-400 ms at 60 Hz)
    pub const FLICKER_MIN_TICKS: u32 = 6;
    pub const FLICKER_MAX_TICKS: u32 = 24;
}
