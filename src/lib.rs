//! Dotfield - A dot-collecting arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, motion, collisions, progression)
//! - `settings`: Variant selection and tunable constants
//! - `highscores`: Session leaderboard fed by game-over events
//!
//! Rendering, keyboard wiring and frame scheduling live in the host; the core
//! only consumes a [`sim::TickInput`] and elapsed milliseconds and hands back a
//! [`sim::Snapshot`].

pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::{
    ConfigError, DeathModel, EnemyLaunch, EnemyShapeModel, GameConfig, MovementModel,
    ProgressionTrigger, TerrainShape,
};

use glam::Vec2;

/// Game configuration constants (defaults for the classic preset)
pub mod consts {
    /// Canvas dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Terrain generation
    pub const MIN_OBSTACLES: u32 = 4;
    pub const MAX_OBSTACLES: u32 = 8;
    pub const OBSTACLE_MIN_SIZE: f32 = 20.0;
    pub const OBSTACLE_MAX_SIZE: f32 = 200.0;
    /// Minimum clearance between obstacles (and around the safe zone)
    pub const OBSTACLE_PADDING: f32 = 50.0;
    pub const WALL_MIN_LENGTH: f32 = 60.0;
    pub const WALL_MAX_LENGTH: f32 = 200.0;
    pub const WALL_THICKNESS: f32 = 20.0;
    /// Rejection sampling budget for terrain and spawn queries
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100;

    /// Player defaults
    pub const PLAYER_BASE_SIZE: f32 = 30.0;
    pub const PLAYER_SPEED: f32 = 2.0;
    pub const PLAYER_ACCELERATION: f32 = 0.8;
    pub const PLAYER_DECELERATION: f32 = 0.8;
    pub const MAX_PLAYER_SPEED: f32 = 9.0;
    /// Velocity components below this snap to zero (stops drift)
    pub const VELOCITY_EPSILON: f32 = 0.01;
    pub const MAX_HEALTH: u32 = 3;

    /// Collectible
    pub const POINT_SIZE: f32 = 10.0;

    /// Enemies
    pub const ENEMY_SIZE: f32 = 20.0;
    pub const BASE_ENEMY_SPEED: f32 = 1.0;
    pub const ENEMY_SPEED_INCREASE: f32 = 0.5;
    pub const BASE_ENEMY_COUNT: u32 = 3;
    pub const ENEMY_COUNT_INCREASE: u32 = 1;
    pub const MAX_ENEMIES: u32 = 15;

    /// Progression
    pub const DIFFICULTY_INCREASE_INTERVAL: u64 = 5;
    pub const DOTS_PER_LEVEL: u32 = 5;
    pub const LEVEL_BONUS_PER_LEVEL: u64 = 120;

    /// Fixed timestep for the arcade preset (60 Hz)
    pub const TARGET_FRAME_MS: f32 = 1000.0 / 60.0;
}

/// Scale `v` down to `max_len` if it is longer, keeping direction
#[inline]
pub fn clamp_length(v: Vec2, max_len: f32) -> Vec2 {
    let len = v.length();
    if len > max_len && len > 0.0 {
        v * (max_len / len)
    } else {
        v
    }
}

/// Rescale `v` to length `speed`, preserving direction.
///
/// A zero-length vector has no direction to keep, so it falls back to
/// `fallback` (expected to be a unit vector).
#[inline]
pub fn with_speed(v: Vec2, speed: f32, fallback: Vec2) -> Vec2 {
    v.try_normalize().unwrap_or(fallback) * speed
}

/// Zero out components whose magnitude is below `epsilon`
#[inline]
pub fn snap_small(v: Vec2, epsilon: f32) -> Vec2 {
    Vec2::new(
        if v.x.abs() < epsilon { 0.0 } else { v.x },
        if v.y.abs() < epsilon { 0.0 } else { v.y },
    )
}
