//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in `GameState`; the browser shell
//! owns one instance and passes it to `tick` once per frame.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::city::generate_skyline;
use super::collision::ball_hits_brick;
use super::effects::FlickerSchedule;
use super::rect::Rect;
use crate::consts::*;
use crate::quiz::{Question, QuestionBank, TopicSelection, check_answer};
use crate::settings::GameOptions;

/// How a finished run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Every brick destroyed
    Won,
    /// Ball passed the paddle
    Lost,
}

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for options and question data
    Initializing,
    /// Frame loop active
    Running,
    /// Suspended on a quiz brick until `resolve_quiz` is called
    AwaitingAnswer,
    /// Run over; only a fresh `GameState` plays again
    Ended(Outcome),
}

/// Things that happened during a tick, drained by the shell for HUD updates,
/// point popups and lazy data loads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A brick was destroyed. `points` is 0 for a quiz brick until answered.
    BrickDestroyed {
        col: usize,
        row: usize,
        points: u64,
        quiz: bool,
        at: Vec2,
    },
    /// A quiz brick suspended the game
    QuizStarted { col: usize, row: usize },
    /// The pending quiz was answered
    QuizAnswered {
        col: usize,
        row: usize,
        correct: bool,
        points: u64,
        at: Vec2,
    },
    /// Score reached the cheat threshold (fires once per run)
    CheatsUnlocked,
    /// Double-tap timing matched a paddle bounce
    CheatArmed,
    /// The armed cheat cleared the neighbours of a hit brick
    CheatSpent { destroyed: usize },
    PaddleHit,
    BuildingHit { building: usize },
    Ended(Outcome),
}

/// Destruction state of a brick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrickStatus {
    Alive,
    Destroyed,
}

/// One cell of the brick grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub col: usize,
    pub row: usize,
    /// Cached screen rectangle (recomputed on resize)
    pub rect: Rect,
    pub status: BrickStatus,
    /// Green brick: asks a question instead of scoring directly
    pub quiz: bool,
}

impl Brick {
    pub fn is_alive(&self) -> bool {
        self.status == BrickStatus::Alive
    }

    /// Mark destroyed. Returns false if it already was.
    pub fn destroy(&mut self) -> bool {
        if self.is_alive() {
            self.status = BrickStatus::Destroyed;
            true
        } else {
            false
        }
    }
}

/// Column-major grid of bricks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrickGrid {
    columns: usize,
    rows: usize,
    bricks: Vec<Brick>,
}

impl BrickGrid {
    pub fn new(columns: usize, rows: usize, canvas_width: f32) -> Self {
        let mut bricks = Vec::with_capacity(columns * rows);
        for col in 0..columns {
            for row in 0..rows {
                bricks.push(Brick {
                    col,
                    row,
                    rect: Rect::default(),
                    status: BrickStatus::Alive,
                    quiz: false,
                });
            }
        }
        let mut grid = Self {
            columns,
            rows,
            bricks,
        };
        grid.layout(canvas_width);
        grid
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    fn index(&self, col: usize, row: usize) -> Option<usize> {
        (col < self.columns && row < self.rows).then(|| col * self.rows + row)
    }

    pub fn get(&self, col: usize, row: usize) -> Option<&Brick> {
        self.index(col, row).map(|i| &self.bricks[i])
    }

    pub fn get_mut(&mut self, col: usize, row: usize) -> Option<&mut Brick> {
        self.index(col, row).map(move |i| &mut self.bricks[i])
    }

    /// All bricks, column by column
    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter()
    }

    pub fn alive_count(&self) -> usize {
        self.bricks.iter().filter(|b| b.is_alive()).count()
    }

    /// Fit brick widths to the canvas width
    pub fn layout(&mut self, canvas_width: f32) {
        let cols = self.columns.max(1) as f32;
        let usable = canvas_width - 2.0 * BRICK_OFFSET_LEFT - (cols - 1.0) * BRICK_PADDING;
        let brick_width = (usable / cols).max(1.0);
        for brick in &mut self.bricks {
            brick.rect = Rect::new(
                brick.col as f32 * (brick_width + BRICK_PADDING) + BRICK_OFFSET_LEFT,
                brick.row as f32 * (BRICK_HEIGHT + BRICK_PADDING) + BRICK_OFFSET_TOP,
                brick_width,
                BRICK_HEIGHT,
            );
        }
    }

    /// Flag `count` distinct random bricks as quiz bricks
    pub fn place_quiz_bricks<R: Rng>(&mut self, count: usize, rng: &mut R) {
        let mut remaining = count.min(self.bricks.len());
        while remaining > 0 {
            let i = rng.random_range(0..self.bricks.len());
            let brick = &mut self.bricks[i];
            if !brick.quiz {
                brick.quiz = true;
                remaining -= 1;
            }
        }
    }

    /// First alive brick whose interior contains the ball center
    pub fn hit_test(&self, ball_pos: Vec2) -> Option<(usize, usize)> {
        self.bricks
            .iter()
            .find(|b| b.is_alive() && ball_hits_brick(ball_pos, &b.rect))
            .map(|b| (b.col, b.row))
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub radius: f32,
    /// Cheat upgrade: larger, recolored, clears neighbours on the next brick
    pub cheat_armed: bool,
}

impl Ball {
    /// Ball resting above the floor at the canvas center, heading up-right
    pub fn new(canvas_width: f32, canvas_height: f32, gravity: f32) -> Self {
        let speed = BALL_START_SPEED * gravity;
        Self {
            pos: Vec2::new(canvas_width / 2.0, canvas_height - BALL_START_LIFT),
            vel: Vec2::new(speed, -speed),
            radius: BALL_RADIUS,
            cheat_armed: false,
        }
    }

    pub fn arm_cheat(&mut self) {
        self.cheat_armed = true;
        self.radius = CHEAT_BALL_RADIUS;
    }

    pub fn disarm_cheat(&mut self) {
        self.cheat_armed = false;
        self.radius = BALL_RADIUS;
    }
}

/// The player's paddle, resting on the floor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    pub width: f32,
    pub height: f32,
}

impl Paddle {
    /// Centered paddle
    pub fn new(width: f32, canvas_width: f32) -> Self {
        let mut paddle = Self {
            x: (canvas_width - width) / 2.0,
            width,
            height: PADDLE_HEIGHT,
        };
        paddle.clamp(canvas_width);
        paddle
    }

    pub fn rect(&self, canvas_height: f32) -> Rect {
        Rect::new(self.x, canvas_height - self.height, self.width, self.height)
    }

    /// Strict horizontal span test
    pub fn spans(&self, x: f32) -> bool {
        x > self.x && x < self.x + self.width
    }

    /// Keep the paddle fully on the canvas
    pub fn clamp(&mut self, canvas_width: f32) {
        self.x = self.x.clamp(0.0, (canvas_width - self.width).max(0.0));
    }

    /// Center the paddle on `x`
    pub fn center_on(&mut self, x: f32, canvas_width: f32) {
        self.x = x - self.width / 2.0;
        self.clamp(canvas_width);
    }
}

/// A lit or unlit building window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Window {
    pub rect: Rect,
    pub lit: bool,
}

/// A skyline building (city backdrop only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    pub rect: Rect,
    /// Index into the renderer's building palette
    pub shade: u8,
    pub windows: Vec<Window>,
}

/// A quiz waiting for the player's answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingQuiz {
    pub col: usize,
    pub row: usize,
    pub question: Question,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub options: GameOptions,
    pub width: f32,
    pub height: f32,
    pub ball: Ball,
    pub paddle: Paddle,
    pub bricks: BrickGrid,
    /// Alive brick counter; reaching zero wins
    pub remaining: usize,
    pub buildings: Vec<Building>,
    pub flicker: FlickerSchedule,
    pub score: u64,
    pub phase: GamePhase,
    pub pending_quiz: Option<PendingQuiz>,
    pub questions: QuestionBank,
    pub topics: TopicSelection,
    pub cheats_unlocked: bool,
    /// Tick of the last unconsumed spacebar double tap
    pub double_tap_tick: Option<u64>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events since the last `drain_events`
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session on the default canvas
    pub fn new(seed: u64, options: GameOptions) -> Self {
        Self::with_canvas(seed, options, DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
    }

    /// Create a new session for a canvas of the given size
    pub fn with_canvas(seed: u64, options: GameOptions, width: f32, height: f32) -> Self {
        let options = options.sanitized();
        let width = width.max(MIN_CANVAS_WIDTH);
        let height = height.max(MIN_CANVAS_HEIGHT);
        let mut rng = Pcg32::seed_from_u64(seed);

        let mut bricks = BrickGrid::new(BRICK_COLUMNS, BRICK_ROWS, width);
        bricks.place_quiz_bricks(options.quiz_bricks, &mut rng);
        let remaining = bricks.alive_count();

        let buildings = if options.backdrop.has_buildings() {
            generate_skyline(seed, width, height)
        } else {
            Vec::new()
        };

        Self {
            seed,
            rng,
            ball: Ball::new(width, height, options.gravity),
            paddle: Paddle::new(options.paddle_size.width(), width),
            options,
            width,
            height,
            bricks,
            remaining,
            buildings,
            flicker: FlickerSchedule::default(),
            score: 0,
            phase: GamePhase::Initializing,
            pending_quiz: None,
            questions: QuestionBank::default(),
            topics: TopicSelection::default(),
            cheats_unlocked: false,
            double_tap_tick: None,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Leave `Initializing` and start the frame loop
    pub fn start(&mut self) {
        if self.phase == GamePhase::Initializing {
            self.phase = GamePhase::Running;
            log::info!(
                "Run started: seed {}, {} bricks ({} quiz)",
                self.seed,
                self.remaining,
                self.bricks.iter().filter(|b| b.quiz).count()
            );
        }
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.phase, GamePhase::Ended(_))
    }

    /// Text shown when the run is over
    pub fn end_message(&self) -> Option<String> {
        match self.phase {
            GamePhase::Ended(Outcome::Won) => {
                Some(format!("You cleared the wall! Final Score: {}", self.score))
            }
            GamePhase::Ended(Outcome::Lost) => {
                Some(format!("Game Over! Final Score: {}", self.score))
            }
            _ => None,
        }
    }

    /// Transition to `Ended`. No-op if already ended.
    pub fn end(&mut self, outcome: Outcome) {
        if self.is_ended() {
            return;
        }
        self.phase = GamePhase::Ended(outcome);
        self.flicker.cancel_all(&mut self.buildings);
        self.events.push(GameEvent::Ended(outcome));
        log::info!("Run ended ({:?}) with score {}", outcome, self.score);
    }

    /// Add points, unlocking cheats the first time the threshold is reached
    pub fn award(&mut self, points: u64) {
        self.score += points;
        if !self.cheats_unlocked && self.score >= CHEAT_UNLOCK_SCORE {
            self.cheats_unlocked = true;
            self.events.push(GameEvent::CheatsUnlocked);
            log::debug!("Cheats unlocked at score {}", self.score);
        }
    }

    /// Mark a brick destroyed and keep `remaining` in step.
    /// Returns false if the brick was already gone.
    pub fn destroy_brick(&mut self, col: usize, row: usize) -> bool {
        let destroyed = self
            .bricks
            .get_mut(col, row)
            .is_some_and(|brick| brick.destroy());
        if destroyed {
            self.remaining -= 1;
        }
        destroyed
    }

    /// Suspend on a quiz brick
    pub fn begin_quiz(&mut self, col: usize, row: usize) {
        let Some(question) = self.questions.pick(&self.topics, &mut self.rng) else {
            // Empty pool: nothing to ask, so the brick simply scores nothing
            log::warn!("No quiz questions available");
            return;
        };
        log::debug!("Quiz brick ({col}, {row}): {}", question.question);
        self.pending_quiz = Some(PendingQuiz { col, row, question });
        self.phase = GamePhase::AwaitingAnswer;
        self.events.push(GameEvent::QuizStarted { col, row });
    }

    /// Resume after a quiz. Returns whether the answer was correct.
    pub fn resolve_quiz(&mut self, answer: Option<&str>) -> bool {
        if self.phase != GamePhase::AwaitingAnswer {
            return false;
        }
        let Some(pending) = self.pending_quiz.take() else {
            self.phase = GamePhase::Running;
            return false;
        };

        let correct = check_answer(&pending.question, answer);
        let points = if correct { QUIZ_POINTS } else { 0 };
        let at = self
            .bricks
            .get(pending.col, pending.row)
            .map(|b| b.rect.center())
            .unwrap_or_default();
        self.award(points);
        self.events.push(GameEvent::QuizAnswered {
            col: pending.col,
            row: pending.row,
            correct,
            points,
            at,
        });
        log::debug!("Quiz answered {:?}: correct={correct}", answer);

        self.phase = GamePhase::Running;
        if self.remaining == 0 {
            self.end(Outcome::Won);
        }
        correct
    }

    /// Refit everything to a new canvas size
    pub fn resize(&mut self, width: f32, height: f32) {
        let width = width.max(MIN_CANVAS_WIDTH);
        let height = height.max(MIN_CANVAS_HEIGHT);
        if (width - self.width).abs() < f32::EPSILON && (height - self.height).abs() < f32::EPSILON
        {
            return;
        }

        let sx = width / self.width;
        let sy = height / self.height;
        self.ball.pos = Vec2::new(self.ball.pos.x * sx, self.ball.pos.y * sy);
        let r = self.ball.radius;
        self.ball.pos.x = self.ball.pos.x.clamp(r, (width - r).max(r));
        self.ball.pos.y = self.ball.pos.y.clamp(r, (height - r).max(r));
        self.paddle.x *= sx;
        self.paddle.clamp(width);
        self.bricks.layout(width);

        if self.options.backdrop.has_buildings() {
            self.flicker.cancel_all(&mut self.buildings);
            self.buildings = generate_skyline(self.seed, width, height);
        }

        self.width = width;
        self.height = height;
        log::debug!("Resized to {width}x{height}");
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Backdrop, PaddleSize};

    #[test]
    fn test_new_state() {
        let state = GameState::new(42, GameOptions::default());
        assert_eq!(state.phase, GamePhase::Initializing);
        assert_eq!(state.remaining, BRICK_COLUMNS * BRICK_ROWS);
        assert_eq!(state.bricks.iter().filter(|b| b.quiz).count(), DEFAULT_QUIZ_BRICKS);
        assert!(state.buildings.is_empty());
        assert_eq!(state.paddle.width, PaddleSize::Medium.width());
        assert!(state.ball.vel.y < 0.0);
    }

    #[test]
    fn test_brick_layout_fits_canvas() {
        let grid = BrickGrid::new(7, 5, 520.0);
        let last = grid.get(6, 4).unwrap();
        assert!((last.rect.right() - (520.0 - BRICK_OFFSET_LEFT)).abs() < 0.01);
        assert_eq!(grid.get(0, 0).unwrap().rect.x, BRICK_OFFSET_LEFT);
        assert_eq!(grid.get(0, 1).unwrap().rect.y, BRICK_OFFSET_TOP + BRICK_HEIGHT + BRICK_PADDING);
        assert!(grid.get(7, 0).is_none());
    }

    #[test]
    fn test_hit_test_skips_destroyed_and_edges() {
        let mut grid = BrickGrid::new(7, 5, 520.0);
        let center = grid.get(3, 1).unwrap().rect.center();
        assert_eq!(grid.hit_test(center), Some((3, 1)));

        // Left edge of the first brick is not inside it
        let first = grid.get(0, 0).unwrap().rect;
        let edge = Vec2::new(first.left(), first.center().y);
        assert_eq!(grid.hit_test(edge), None);

        grid.get_mut(3, 1).unwrap().destroy();
        assert_eq!(grid.hit_test(center), None);
    }

    #[test]
    fn test_destroy_brick_once() {
        let mut state = GameState::new(1, GameOptions::default());
        let before = state.remaining;
        assert!(state.destroy_brick(2, 2));
        assert!(!state.destroy_brick(2, 2));
        assert_eq!(state.remaining, before - 1);
        assert_eq!(state.remaining, state.bricks.alive_count());
    }

    #[test]
    fn test_cheats_unlock_once() {
        let mut state = GameState::new(1, GameOptions::default());
        for _ in 0..30 {
            state.award(BRICK_POINTS);
        }
        let unlocks = state
            .drain_events()
            .into_iter()
            .filter(|e| *e == GameEvent::CheatsUnlocked)
            .count();
        assert_eq!(unlocks, 1);
        assert!(state.cheats_unlocked);
    }

    #[test]
    fn test_quiz_bricks_capped() {
        let options = GameOptions {
            quiz_bricks: 500,
            ..Default::default()
        };
        let state = GameState::new(3, options);
        assert!(state.bricks.iter().all(|b| b.quiz));
    }

    #[test]
    fn test_resize_relayouts_and_clamps() {
        let mut state = GameState::new(5, GameOptions::default());
        state.paddle.x = state.width - state.paddle.width;
        state.resize(800.0, 600.0);
        assert_eq!(state.width, 800.0);
        assert!(state.paddle.x + state.paddle.width <= 800.0);
        let last = state.bricks.get(6, 0).unwrap();
        assert!((last.rect.right() - (800.0 - BRICK_OFFSET_LEFT)).abs() < 0.01);

        state.resize(10.0, 10.0);
        assert_eq!(state.width, MIN_CANVAS_WIDTH);
        assert_eq!(state.height, MIN_CANVAS_HEIGHT);
    }

    #[test]
    fn test_city_backdrop_builds_skyline() {
        let options = GameOptions {
            backdrop: Backdrop::Nyc,
            ..Default::default()
        };
        let state = GameState::new(9, options);
        assert!(!state.buildings.is_empty());
    }

    #[test]
    fn test_resolve_quiz_outside_quiz_is_noop() {
        let mut state = GameState::new(1, GameOptions::default());
        state.start();
        assert!(!state.resolve_quiz(Some("1")));
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::Running);
    }
}
