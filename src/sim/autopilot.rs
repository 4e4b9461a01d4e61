//! Idle/demo steering
//!
//! Heads for the dot and swerves away from enemies that get too close.
//! Deliberately simple: it reads the same state the renderer sees and emits
//! the same directional intent a keyboard would.

use glam::Vec2;

use super::motion::Intent;
use super::state::GameState;

/// Enemies closer than this (center to center, beyond both radii) are threats
const DANGER_MARGIN: f32 = 60.0;
/// Axis components below this are treated as "no key"
const DEADZONE: f32 = 0.25;

/// Pick the directions an idle player should hold this tick
pub fn steer(state: &GameState) -> Intent {
    let player = state.player.center();
    let target = state.point.rect().center();
    let mut desired = (target - player).normalize_or_zero();

    // Find the most dangerous enemy (closest to the player)
    let threat = state
        .enemies
        .iter()
        .map(|e| {
            let center = e.rect().center();
            let gap = center.distance(player) - (e.size + state.player.size) / 2.0;
            (gap, center)
        })
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    if let Some((gap, center)) = threat {
        if gap < DANGER_MARGIN {
            // Flee harder the closer it is
            let urgency = 1.0 - (gap / DANGER_MARGIN).clamp(0.0, 1.0);
            let away = (player - center).normalize_or_zero();
            desired = (desired * (1.0 - urgency) + away * (1.0 + urgency)).normalize_or_zero();
        }
    }

    to_intent(desired)
}

fn to_intent(dir: Vec2) -> Intent {
    Intent {
        up: dir.y < -DEADZONE,
        down: dir.y > DEADZONE,
        left: dir.x < -DEADZONE,
        right: dir.x > DEADZONE,
    }
}
