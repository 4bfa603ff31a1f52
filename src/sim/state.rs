//! Game state and core simulation types
//!
//! Everything the per-frame resolver reads or writes lives here, gathered
//! into an explicit [`Session`] rather than loose globals.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::level::LevelManager;
use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay (including serving from the paddle)
    Playing,
    /// Out of lives
    GameOver,
    /// Every level cleared
    GameWon,
}

/// Ball state - riding the paddle or free-moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    /// Ball sits centered on top of the paddle, tracking it
    OnPaddle,
    /// Ball is free-moving
    Free,
}

/// The ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    pub state: BallState,
    /// Per-axis speed caps (only `y` is enforced, on paddle bounces)
    pub max_vel: Vec2,
    /// Horizontal speed imparted by a paddle bounce at full center offset
    pub paddle_bounce_factor: Vec2,
    /// Vertical speed gained on each paddle bounce
    pub brick_speed_boost: Vec2,
    /// Captured at construction, restored by [`Ball::reset`]
    launch_vel: Vec2,
}

impl Ball {
    pub fn new() -> Self {
        Self::with_launch_vel(BALL_LAUNCH_VEL)
    }

    /// Build a ball whose reset velocity is `launch_vel` instead of the default
    pub fn with_launch_vel(launch_vel: Vec2) -> Self {
        Self {
            pos: Vec2::new(100.0, 100.0),
            vel: launch_vel,
            width: BALL_SIZE,
            height: BALL_SIZE,
            state: BallState::OnPaddle,
            max_vel: BALL_MAX_VEL,
            paddle_bounce_factor: PADDLE_BOUNCE_FACTOR,
            brick_speed_boost: BRICK_SPEED_BOOST,
            launch_vel,
        }
    }

    /// Return to the paddle with the captured launch velocity
    ///
    /// Position is left alone; the resolver snaps an `OnPaddle` ball onto the
    /// paddle at the start of the next frame.
    pub fn reset(&mut self) {
        self.vel = self.launch_vel;
        self.state = BallState::OnPaddle;
    }
}

impl Default for Ball {
    fn default() -> Self {
        Self::new()
    }
}

impl Aabb for Ball {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            // Centered, a short hop above the bottom edge
            pos: Vec2::new(
                CANVAS_WIDTH / 2.0 - PADDLE_WIDTH / 2.0,
                CANVAS_HEIGHT - PADDLE_BOTTOM_OFFSET,
            ),
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
        }
    }
}

impl Paddle {
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.pos.x + self.width / 2.0,
            self.pos.y + self.height / 2.0,
        )
    }
}

impl Aabb for Paddle {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }
}

/// A brick entity
///
/// Geometry and color are fixed at generation; only `visible` ever changes,
/// and only from `true` to `false`. A cleared brick comes back solely through
/// full level regeneration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// RGBA sampled from the level sheet pixel that produced this brick
    pub color: [u8; 4],
    pub visible: bool,
}

impl Brick {
    pub fn new(pos: Vec2, width: f32, height: f32, color: [u8; 4]) -> Self {
        Self {
            pos,
            width,
            height,
            color,
            visible: true,
        }
    }
}

impl Aabb for Brick {
    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }
}

/// Top-level session scores and phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub lives: u8,
    pub score: u64,
    pub phase: GamePhase,
    /// Brick sets and level progression
    pub levels: LevelManager,
}

impl Game {
    pub fn new(levels: LevelManager) -> Self {
        Self {
            lives: STARTING_LIVES,
            score: 0,
            phase: GamePhase::Playing,
            levels,
        }
    }

    /// Restart the session: fresh lives and score, back to level 1
    ///
    /// Fails only if levels were never loaded, which the driver rules out
    /// before the first frame.
    pub fn reset(&mut self) -> Result<(), super::level::LevelError> {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.levels.change_level(1)
    }
}

/// Complete per-session state threaded through the resolver
///
/// The game, both moving entities, and the accumulated pointer position
/// travel together so the resolver can stay a plain function of its inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub game: Game,
    pub ball: Ball,
    pub paddle: Paddle,
    /// Accumulated pointer x, clamped so the paddle stays on the field
    pub cursor_x: f32,
}

impl Session {
    /// Build a session around a prepared (loaded, level-selected) game
    pub fn new(game: Game) -> Self {
        let paddle = Paddle::default();
        Self {
            game,
            ball: Ball::new(),
            cursor_x: paddle.pos.x,
            paddle,
        }
    }
}
