//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only (owned by `GameState`, or passed in explicitly)
//! - Stable iteration order (placement / spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod geometry;
pub mod motion;
pub mod progression;
pub mod state;
pub mod terrain;
pub mod tick;

pub use collision::{Bounce, player_hits_enemy, player_hits_point, resolve_enemy_terrain};
pub use geometry::Rect;
pub use motion::{Intent, move_enemy, move_player};
pub use progression::{LevelUp, LevelUpBanner, Progression};
pub use state::{Enemy, GameEvent, GamePhase, GameState, Player, Point};
pub use terrain::{Spawn, Terrain, generate, safe_zone, spawn_away_from, valid_spawn_position};
pub use tick::{FrameGate, Snapshot, TickInput, step, tick};
