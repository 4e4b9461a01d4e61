//! Player and enemy movement
//!
//! Movement proposes new positions and settles them against the canvas and
//! the terrain; enemy bounces off obstacles are handled in `collision`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::state::{Enemy, Player};
use super::terrain::Terrain;
use crate::settings::{GameConfig, MovementModel};
use crate::{clamp_length, snap_small};

/// Directional input held this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Intent {
    /// Raw axis values in {-1, 0, 1}; opposite keys cancel
    pub fn axes(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }

    /// Direction vector, scaled by 1/sqrt(2) on diagonals when asked
    pub fn direction(&self, normalize_diagonal: bool) -> Vec2 {
        let axes = self.axes();
        if normalize_diagonal && axes.x != 0.0 && axes.y != 0.0 {
            axes * std::f32::consts::FRAC_1_SQRT_2
        } else {
            axes
        }
    }
}

/// Advance the player one tick under the configured movement model
pub fn move_player(player: &mut Player, intent: Intent, config: &GameConfig, terrain: &Terrain) {
    match config.movement {
        MovementModel::Instant => move_player_instant(player, intent, config, terrain),
        MovementModel::Accelerating => move_player_accelerating(player, intent, config, terrain),
    }
}

/// Fixed step per held direction; the whole move is dropped if the new box
/// hits an obstacle.
///
/// Each key is gated by its own edge before opposite keys cancel, so holding
/// up and down against the top edge still moves the player down.
pub fn move_player_instant(
    player: &mut Player,
    intent: Intent,
    config: &GameConfig,
    terrain: &Terrain,
) {
    let max = Vec2::new(
        config.canvas_width - player.size,
        config.canvas_height - player.size,
    );
    let gated = Intent {
        up: intent.up && player.pos.y > 0.0,
        down: intent.down && player.pos.y < max.y,
        left: intent.left && player.pos.x > 0.0,
        right: intent.right && player.pos.x < max.x,
    };
    let next = player.pos + gated.direction(config.normalize_diagonal) * config.player_speed;

    if !terrain.check_collision(&Rect::square(next, player.size)) {
        player.pos = next;
    }
    player.vel = Vec2::ZERO;
}

/// Momentum movement: accelerate toward intent, decay idle axes, cap speed,
/// then resolve x and y independently.
pub fn move_player_accelerating(
    player: &mut Player,
    intent: Intent,
    config: &GameConfig,
    terrain: &Terrain,
) {
    let direction = intent.direction(config.normalize_diagonal);
    let mut vel = player.vel + direction * config.acceleration;
    if direction.x == 0.0 {
        vel.x *= config.deceleration;
    }
    if direction.y == 0.0 {
        vel.y *= config.deceleration;
    }
    vel = clamp_length(vel, config.max_player_speed);
    vel = snap_small(vel, crate::consts::VELOCITY_EPSILON);

    let max_x = config.canvas_width - player.size;
    let max_y = config.canvas_height - player.size;

    let next_x = (player.pos.x + vel.x).clamp(0.0, max_x.max(0.0));
    if terrain.check_collision(&Rect::new(next_x, player.pos.y, player.size, player.size)) {
        vel.x = 0.0;
    } else {
        player.pos.x = next_x;
    }

    let next_y = (player.pos.y + vel.y).clamp(0.0, max_y.max(0.0));
    if terrain.check_collision(&Rect::new(player.pos.x, next_y, player.size, player.size)) {
        vel.y = 0.0;
    } else {
        player.pos.y = next_y;
    }

    player.vel = vel;
}

/// Move an enemy by its velocity and bounce it off the canvas edges.
///
/// A component only flips while the enemy is heading out of bounds, so an
/// enemy resting on an edge cannot jitter in place.
pub fn move_enemy(enemy: &mut Enemy, config: &GameConfig) {
    enemy.pos += enemy.vel;

    let max_x = (config.canvas_width - enemy.size).max(0.0);
    let max_y = (config.canvas_height - enemy.size).max(0.0);

    if (enemy.pos.x <= 0.0 && enemy.vel.x < 0.0) || (enemy.pos.x >= max_x && enemy.vel.x > 0.0) {
        enemy.vel.x = -enemy.vel.x;
    }
    if (enemy.pos.y <= 0.0 && enemy.vel.y < 0.0) || (enemy.pos.y >= max_y && enemy.vel.y > 0.0) {
        enemy.vel.y = -enemy.vel.y;
    }
    enemy.pos = enemy.pos.clamp(Vec2::ZERO, Vec2::new(max_x, max_y));
}
