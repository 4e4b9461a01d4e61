//! Collision detection and response
//!
//! Enemies bounce off obstacles by reflecting a velocity component; they are
//! never pushed back out of an obstacle, so a fast enemy on a slow frame can
//! still clip a corner. Body-vs-body checks pick their geometry from the
//! enemy shape model.

use glam::Vec2;

use super::geometry::{Rect, circle_rect_overlap, circles_overlap, penetration_depths};
use super::state::{Enemy, Player, Point};
use super::terrain::Terrain;
use crate::settings::EnemyShapeModel;

/// Which velocity components a contact reflects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounce {
    pub flip_x: bool,
    pub flip_y: bool,
}

impl Bounce {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn hit(&self) -> bool {
        self.flip_x || self.flip_y
    }

    /// Reflect `vel` accordingly
    #[inline]
    pub fn apply(&self, vel: Vec2) -> Vec2 {
        Vec2::new(
            if self.flip_x { -vel.x } else { vel.x },
            if self.flip_y { -vel.y } else { vel.y },
        )
    }
}

/// Box model: test the enemy's next position and flip along the axis of
/// least penetration (both axes on a tie).
pub fn box_bounce(next: &Rect, obstacle: &Rect) -> Bounce {
    if !next.intersects(obstacle) {
        return Bounce::none();
    }
    let [left, right, top, bottom] = penetration_depths(next, obstacle);
    let min = left.min(right).min(top).min(bottom);
    Bounce {
        flip_x: min == left || min == right,
        flip_y: min == top || min == bottom,
    }
}

/// Circle model: the enemy's inscribed circle against the obstacle.
///
/// The flip follows the dominant axis of the separation between the circle
/// center and the closest obstacle point. A center buried inside the
/// obstacle has no separation, so the dominant velocity axis decides.
pub fn circle_bounce(enemy: &Rect, vel: Vec2, obstacle: &Rect) -> Bounce {
    let radius = enemy.width / 2.0;
    let Some(offset) = circle_rect_overlap(enemy.center(), radius, obstacle) else {
        return Bounce::none();
    };
    let axis = if offset == Vec2::ZERO { vel } else { offset };
    let horizontal = axis.x.abs() > axis.y.abs();
    Bounce {
        flip_x: horizontal,
        flip_y: !horizontal,
    }
}

/// Reflect an enemy off every obstacle it touches this tick
pub fn resolve_enemy_terrain(enemy: &mut Enemy, terrain: &Terrain, model: EnemyShapeModel) {
    for obstacle in &terrain.obstacles {
        let bounce = match model {
            EnemyShapeModel::Box => {
                box_bounce(&Rect::square(enemy.pos + enemy.vel, enemy.size), obstacle)
            }
            EnemyShapeModel::Circle => circle_bounce(&enemy.rect(), enemy.vel, obstacle),
        };
        if bounce.hit() {
            log::debug!(
                "Enemy at ({:.1}, {:.1}) bounced: {:?}",
                enemy.pos.x,
                enemy.pos.y,
                bounce
            );
            enemy.vel = bounce.apply(enemy.vel);
        }
    }
}

/// Is the player touching the dot?
pub fn player_hits_point(player: &Player, point: &Point) -> bool {
    player.rect().intersects(&point.rect())
}

/// Is the player touching `enemy`? Box enemies use AABB overlap, circle
/// enemies a strict center-distance test.
pub fn player_hits_enemy(player: &Player, enemy: &Enemy, model: EnemyShapeModel) -> bool {
    match model {
        EnemyShapeModel::Box => player.rect().intersects(&enemy.rect()),
        EnemyShapeModel::Circle => circles_overlap(&player.rect(), &enemy.rect()),
    }
}
