//! Pixbreak - a brick-breaker game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, game state)
//! - `ecs`: Entity/component storage experiment
//! - `assets`: Level sheet decoding
//! - `config`: Demo driver configuration
//! - `highscores`: File-backed leaderboard

pub mod assets;
pub mod config;
pub mod ecs;
pub mod highscores;
pub mod sim;

pub use config::DemoConfig;
pub use highscores::HighScores;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play field dimensions (pixels)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;
    /// Reserved strip at the top of the field; the ball reflects off its
    /// lower edge, not off y = 0
    pub const TITLE_BAR_HEIGHT: f32 = 24.0;

    /// Paddle defaults - spawns centered, this far above the bottom edge
    pub const PADDLE_WIDTH: f32 = 104.0;
    pub const PADDLE_HEIGHT: f32 = 16.0;
    pub const PADDLE_BOTTOM_OFFSET: f32 = 32.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 12.0;
    /// Velocity restored on every reset (straight up)
    pub const BALL_LAUNCH_VEL: Vec2 = Vec2::new(0.0, -300.0);
    /// Per-axis speed caps
    pub const BALL_MAX_VEL: Vec2 = Vec2::new(100.0, 600.0);
    /// Horizontal speed imparted by a paddle bounce at full offset
    pub const PADDLE_BOUNCE_FACTOR: Vec2 = Vec2::new(250.0, 0.0);
    /// Vertical speed gained on each paddle bounce (up to BALL_MAX_VEL.y)
    pub const BRICK_SPEED_BOOST: Vec2 = Vec2::new(0.0, 10.0);

    /// Level grid - 17 columns of 44px bricks with one-pixel gaps and 18px
    /// side margins tile the 800px field exactly
    pub const LEVEL_WIDTH_CELLS: u32 = 17;
    pub const LEVEL_HEIGHT_CELLS: u32 = 9;
    pub const BRICK_WIDTH: f32 = 44.0;
    pub const BRICK_HEIGHT: f32 = 16.0;
    pub const BRICK_X_OFFSET: f32 = 18.0;
    pub const BRICK_Y_OFFSET: f32 = 40.0;

    /// Session defaults
    pub const STARTING_LIVES: u8 = 3;
    /// Points per destroyed brick
    pub const BRICK_SCORE: u64 = 50;
}

/// Clamp `value` to `[min, max]`
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Sign of `value` as -1, 0, or 1 (zero maps to zero, unlike `f32::signum`)
#[inline]
pub fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
