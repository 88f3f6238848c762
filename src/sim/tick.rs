//! Per-frame simulation tick
//!
//! One call per display refresh. Order within a tick: flicker timers,
//! brick scan, buildings, walls, floor/paddle, move, paddle input.

use rand::Rng;

use super::collision::{
    ball_building_collision, ceiling_hit, floor_reached,
    orthogonal_neighbors, resolve_building_contact, side_wall_hit,
};
use super::effects::WindowId;
use super::state::{GameEvent, GamePhase, GameState, Outcome};
use crate::consts::*;

/// Chance each window of a hit building flickers
const FLICKER_CHANCE: f64 = 0.3;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Left arrow held
    pub left: bool,
    /// Right arrow held
    pub right: bool,
    /// Pointer x in canvas coordinates (paddle centers on it)
    pub pointer_x: Option<f32>,
    /// Accumulated wheel delta since the last tick
    pub wheel_delta: f32,
    /// Spacebar double tap completed since the last tick
    pub double_tap: bool,
    /// Demo mode - paddle follows the ball
    pub autopilot: bool,
}

/// What the caller should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Schedule the next frame
    Continue,
    /// Waiting on a quiz answer; keep drawing but don't expect progress
    Suspended,
    /// Stop scheduling and show the end message
    End,
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &TickInput) -> TickOutcome {
    match state.phase {
        GamePhase::Running => {}
        GamePhase::Initializing | GamePhase::AwaitingAnswer => return TickOutcome::Suspended,
        GamePhase::Ended(_) => return TickOutcome::End,
    }

    state.time_ticks += 1;
    if input.double_tap {
        state.double_tap_tick = Some(state.time_ticks);
    }

    state.flicker.advance(&mut state.buildings);

    collide_bricks(state);
    match state.phase {
        GamePhase::AwaitingAnswer => return TickOutcome::Suspended,
        GamePhase::Ended(_) => return TickOutcome::End,
        _ => {}
    }

    collide_buildings(state);

    let ball = &mut state.ball;
    if side_wall_hit(ball.pos, ball.vel, ball.radius, state.width) {
        ball.vel.x = -ball.vel.x;
    }
    if ceiling_hit(ball.pos, ball.vel, ball.radius) {
        ball.vel.y = -ball.vel.y;
    } else if floor_reached(ball.pos, ball.vel, ball.radius, state.height) {
        if state.paddle.spans(ball.pos.x) {
            ball.vel.y = -ball.vel.y;
            state.events.push(GameEvent::PaddleHit);
            try_arm_cheat(state);
        } else {
            state.end(Outcome::Lost);
            return TickOutcome::End;
        }
    }

    state.ball.pos += state.ball.vel;

    move_paddle(state, input);

    TickOutcome::Continue
}

/// Find the brick under the ball center and apply its destruction
fn collide_bricks(state: &mut GameState) {
    let Some((col, row)) = state.bricks.hit_test(state.ball.pos) else {
        return;
    };

    let Some(brick) = state.bricks.get(col, row) else {
        return;
    };
    let quiz = brick.quiz;
    let at = brick.rect.center();

    state.ball.vel.y = -state.ball.vel.y;
    state.destroy_brick(col, row);

    let points = if quiz { 0 } else { BRICK_POINTS };
    state.events.push(GameEvent::BrickDestroyed {
        col,
        row,
        points,
        quiz,
        at,
    });
    state.award(points);

    if state.ball.cheat_armed {
        spend_cheat(state, col, row);
    }

    if quiz {
        state.begin_quiz(col, row);
    }

    if state.remaining == 0 && state.phase == GamePhase::Running {
        state.end(Outcome::Won);
    }
}

/// Clear the alive orthogonal neighbours of a hit brick, then disarm
fn spend_cheat(state: &mut GameState, col: usize, row: usize) {
    let neighbors = orthogonal_neighbors(col, row, state.bricks.columns(), state.bricks.rows());
    let mut destroyed = 0;
    for (c, r) in neighbors {
        let Some(at) = state.bricks.get(c, r).map(|b| b.rect.center()) else {
            continue;
        };
        if state.destroy_brick(c, r) {
            destroyed += 1;
            state.events.push(GameEvent::BrickDestroyed {
                col: c,
                row: r,
                points: BRICK_POINTS,
                quiz: false,
                at,
            });
            state.award(BRICK_POINTS);
        }
    }
    state.ball.disarm_cheat();
    state.events.push(GameEvent::CheatSpent { destroyed });
    log::debug!("Cheat cleared {destroyed} bricks around ({col}, {row})");
}

/// Bounce off the first building the ball overlaps and flicker its windows
fn collide_buildings(state: &mut GameState) {
    let hit = state.buildings.iter().enumerate().find_map(|(i, b)| {
        ball_building_collision(state.ball.pos, state.ball.radius, &b.rect).map(|c| (i, b.rect, c))
    });
    let Some((index, rect, contact)) = hit else {
        return;
    };

    resolve_building_contact(&mut state.ball, &rect, contact);
    state.events.push(GameEvent::BuildingHit { building: index });

    let window_count = state.buildings[index].windows.len();
    for window in 0..window_count {
        if state.rng.random_bool(FLICKER_CHANCE) {
            let ticks = state.rng.random_range(FLICKER_MIN_TICKS..=FLICKER_MAX_TICKS);
            state.flicker.trigger(
                &mut state.buildings,
                WindowId {
                    building: index,
                    window,
                },
                ticks,
            );
        }
    }
}

/// Arm the cheat if a double tap landed shortly before this paddle bounce
fn try_arm_cheat(state: &mut GameState) {
    if !state.cheats_unlocked || state.ball.cheat_armed {
        return;
    }
    let Some(tap) = state.double_tap_tick else {
        return;
    };
    if state.time_ticks.saturating_sub(tap) > CHEAT_WINDOW_TICKS {
        return;
    }

    state.double_tap_tick = None;
    state.ball.arm_cheat();
    let r = state.ball.radius;
    state.ball.pos.x = state.ball.pos.x.clamp(r, state.width - r);
    state.events.push(GameEvent::CheatArmed);
    log::debug!("Cheat armed at tick {}", state.time_ticks);
}

fn move_paddle(state: &mut GameState, input: &TickInput) {
    let width = state.width;
    let paddle = &mut state.paddle;

    if input.right && paddle.x < width - paddle.width {
        paddle.x += PADDLE_STEP;
    } else if input.left && paddle.x > 0.0 {
        paddle.x -= PADDLE_STEP;
    }

    if input.autopilot {
        paddle.center_on(state.ball.pos.x, width);
    } else if let Some(x) = input.pointer_x {
        paddle.center_on(x, width);
    }

    paddle.x += input.wheel_delta * WHEEL_SENSITIVITY;
    paddle.clamp(width);
}
