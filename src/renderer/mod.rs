//! Frame rendering
//!
//! `draw_frame` reads the game state and issues primitive draw calls on a
//! `Surface`. It never mutates the state, and the draw order is fixed:
//! clear, bricks, buildings, ball, paddle.

pub mod palette;
pub mod recording;

use glam::Vec2;

use crate::sim::{GameState, Rect};
use palette::Color;

pub use recording::{DrawCommand, RecordingSurface};

/// Minimal drawing capability the renderer needs
pub trait Surface {
    fn clear(&mut self, width: f32, height: f32);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
}

/// Draw one frame of the current state
pub fn draw_frame<S: Surface + ?Sized>(state: &GameState, surface: &mut S) {
    surface.clear(state.width, state.height);
    draw_bricks(state, surface);
    draw_buildings(state, surface);
    draw_ball(state, surface);
    draw_paddle(state, surface);
}

fn draw_bricks<S: Surface + ?Sized>(state: &GameState, surface: &mut S) {
    for brick in state.bricks.iter().filter(|b| b.is_alive()) {
        let color = if brick.quiz {
            palette::BRICK_QUIZ
        } else {
            palette::BRICK
        };
        surface.fill_rect(brick.rect, color);
    }
}

fn draw_buildings<S: Surface + ?Sized>(state: &GameState, surface: &mut S) {
    for building in &state.buildings {
        surface.fill_rect(building.rect, palette::building(building.shade));
        for window in &building.windows {
            let color = if window.lit {
                palette::WINDOW_LIT
            } else {
                palette::WINDOW_DARK
            };
            surface.fill_rect(window.rect, color);
        }
    }
}

fn draw_ball<S: Surface + ?Sized>(state: &GameState, surface: &mut S) {
    let ball = &state.ball;
    let color = if ball.cheat_armed {
        palette::BALL_CHEAT
    } else {
        palette::BALL
    };
    surface.fill_circle(ball.pos, ball.radius, color);
}

fn draw_paddle<S: Surface + ?Sized>(state: &GameState, surface: &mut S) {
    surface.fill_rect(state.paddle.rect(state.height), palette::PADDLE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{BRICK_COLUMNS, BRICK_ROWS};
    use crate::settings::{Backdrop, GameOptions};

    #[test]
    fn test_draw_order() {
        let state = GameState::new(4, GameOptions::default());
        let mut surface = RecordingSurface::new();
        draw_frame(&state, &mut surface);

        let cmds = &surface.commands;
        assert!(matches!(cmds[0], DrawCommand::Clear { .. }));
        let bricks = BRICK_COLUMNS * BRICK_ROWS;
        assert!(cmds[1..=bricks].iter().all(|c| matches!(c, DrawCommand::Rect { .. })));
        assert!(matches!(cmds[bricks + 1], DrawCommand::Circle { .. }));
        assert!(matches!(
            cmds[bricks + 2],
            DrawCommand::Rect { color, .. } if color == palette::PADDLE
        ));
        assert_eq!(cmds.len(), bricks + 3);
    }

    #[test]
    fn test_destroyed_bricks_not_drawn() {
        let mut state = GameState::new(4, GameOptions::default());
        state.destroy_brick(0, 0);
        state.destroy_brick(6, 4);
        let mut surface = RecordingSurface::new();
        draw_frame(&state, &mut surface);
        let drawn = surface.rects_with(palette::BRICK) + surface.rects_with(palette::BRICK_QUIZ);
        assert_eq!(drawn, BRICK_COLUMNS * BRICK_ROWS - 2);
    }

    #[test]
    fn test_quiz_bricks_green() {
        let state = GameState::new(4, GameOptions::default());
        let mut surface = RecordingSurface::new();
        draw_frame(&state, &mut surface);
        assert_eq!(surface.rects_with(palette::BRICK_QUIZ), 3);
    }

    #[test]
    fn test_cheat_ball_color() {
        let mut state = GameState::new(4, GameOptions::default());
        state.ball.arm_cheat();
        let mut surface = RecordingSurface::new();
        draw_frame(&state, &mut surface);
        assert!(surface.commands.iter().any(|c| matches!(
            c,
            DrawCommand::Circle { color, .. } if *color == palette::BALL_CHEAT
        )));
    }

    #[test]
    fn test_buildings_between_bricks_and_ball() {
        let options = GameOptions {
            backdrop: Backdrop::Nyc,
            ..Default::default()
        };
        let state = GameState::new(8, options);
        let mut surface = RecordingSurface::new();
        draw_frame(&state, &mut surface);

        let first_building = surface
            .commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Rect { color, .. } if palette::BUILDINGS.contains(color)))
            .unwrap();
        let ball = surface
            .commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Circle { .. }))
            .unwrap();
        let last_brick = surface
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Rect { color, .. } if *color == palette::BRICK || *color == palette::BRICK_QUIZ))
            .unwrap();
        assert!(last_brick < first_building);
        assert!(first_building < ball);

        let windows: usize = state.buildings.iter().map(|b| b.windows.len()).sum();
        assert_eq!(
            surface.rects_with(palette::WINDOW_LIT) + surface.rects_with(palette::WINDOW_DARK),
            windows
        );
    }
}
