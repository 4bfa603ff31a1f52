//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - No RNG (the resolver is fully determined by state + input)
//! - Stable brick iteration order (level-sheet sequence)
//! - No rendering, file, or platform dependencies

pub mod aabb;
pub mod level;
pub mod state;
pub mod tick;

pub use aabb::{Aabb, intersects};
pub use level::{LevelError, LevelLayout, LevelManager, LevelSheet, generate_bricks};
pub use state::{Ball, BallState, Brick, Game, GamePhase, Paddle, Session};
pub use tick::{FrameInput, tick};
