//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, velocities in pixels per tick
//! - Seeded RNG only
//! - Stable iteration order (column-major bricks, buildings left to right)
//! - No rendering or platform dependencies

pub mod city;
pub mod collision;
pub mod effects;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{BuildingContact, Face, ball_building_collision, orthogonal_neighbors};
pub use effects::{FlickerSchedule, WindowId};
pub use rect::Rect;
pub use state::{
    Ball, Brick, BrickGrid, BrickStatus, Building, GameEvent, GamePhase, GameState, Outcome,
    Paddle, PendingQuiz, Window,
};
pub use tick::{TickInput, TickOutcome, tick};
