//! Simulation tick
//!
//! The host calls [`tick`] once per frame with the time that passed; the
//! frame gate decides whether a simulation step actually runs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::autopilot;
use super::collision::{player_hits_enemy, player_hits_point, resolve_enemy_terrain};
use super::geometry::Rect;
use super::motion::{Intent, move_enemy, move_player};
use super::state::{Enemy, GameEvent, GamePhase, GameState, Player, Point};
use crate::settings::DeathModel;

/// Input sampled for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Held directions
    pub intent: Intent,
    /// Pause toggle (one-shot)
    pub pause: bool,
    /// Restart the run (one-shot)
    pub reset: bool,
    /// Idle/demo mode - the core steers the player
    pub idle_mode: bool,
}

/// Fixed-timestep gate.
///
/// Elapsed time accumulates until it covers one interval; a step then runs
/// and the remainder carries over. A zero interval steps on every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameGate {
    pub interval_ms: f32,
    pub accumulated_ms: f32,
}

impl FrameGate {
    pub fn new(interval_ms: f32) -> Self {
        Self {
            interval_ms,
            accumulated_ms: 0.0,
        }
    }

    /// Feed elapsed time; true when a step is due
    pub fn advance(&mut self, elapsed_ms: f32) -> bool {
        if self.interval_ms <= 0.0 {
            return true;
        }
        self.accumulated_ms += elapsed_ms.max(0.0);
        if self.accumulated_ms >= self.interval_ms {
            self.accumulated_ms %= self.interval_ms;
            true
        } else {
            false
        }
    }

    /// Duration of the step that [`FrameGate::advance`] just allowed
    pub fn step_ms(&self, elapsed_ms: f32) -> f32 {
        if self.interval_ms > 0.0 {
            self.interval_ms
        } else {
            elapsed_ms.max(0.0)
        }
    }

    /// Forget accumulated time (pause, reset)
    pub fn drain(&mut self) {
        self.accumulated_ms = 0.0;
    }
}

/// Read-only view handed to the render sink
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub obstacles: Vec<Rect>,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub point: Point,
    pub score: u64,
    /// 1-based level for display
    pub level: u32,
    pub health: u32,
    pub max_health: u32,
    pub dots: u32,
    pub paused: bool,
    pub level_up_active: bool,
    pub level_up_remaining_ms: f32,
    pub time_ticks: u64,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            obstacles: state.terrain.obstacles.clone(),
            player: state.player.clone(),
            enemies: state.enemies.clone(),
            point: state.point,
            score: state.progression.score,
            level: state.progression.level + 1,
            health: state.player.health,
            max_health: state.config.max_health,
            dots: state.progression.dots_this_level,
            paused: state.phase == GamePhase::Paused,
            level_up_active: state.banner.is_active(),
            level_up_remaining_ms: state.banner.remaining_ms,
            time_ticks: state.time_ticks,
        }
    }
}

/// Process one host frame: commands, then at most one simulation step.
///
/// Events raised along the way are left in `state.events`.
pub fn tick(state: &mut GameState, input: &TickInput, elapsed_ms: f32) -> Snapshot {
    state.events.clear();

    if input.reset {
        state.reset_game();
        state.events.push(GameEvent::Reset);
        return Snapshot::capture(state);
    }

    // Handle pause toggle
    if input.pause {
        state.phase = match state.phase {
            GamePhase::Playing => {
                state.events.push(GameEvent::Paused);
                GamePhase::Paused
            }
            GamePhase::Paused => {
                state.events.push(GameEvent::Resumed);
                GamePhase::Playing
            }
        };
    }

    // Paused frames still consume their time so unpausing does not catch up
    if state.phase == GamePhase::Paused {
        state.frame_gate.drain();
        return Snapshot::capture(state);
    }

    if state.frame_gate.advance(elapsed_ms) {
        let dt_ms = state.frame_gate.step_ms(elapsed_ms);
        step(state, input, dt_ms);
    }

    Snapshot::capture(state)
}

/// Advance the simulation by exactly one step of `dt_ms`
pub fn step(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    state.time_ticks += 1;

    // Motion
    let intent = if input.idle_mode {
        autopilot::steer(state)
    } else {
        input.intent
    };
    move_player(&mut state.player, intent, &state.config, &state.terrain);

    for enemy in &mut state.enemies {
        move_enemy(enemy, &state.config);
        resolve_enemy_terrain(enemy, &state.terrain, state.config.enemy_shape);
    }

    // Scoring
    if player_hits_point(&state.player, &state.point) {
        collect_point(state);
    }

    // Enemy contact
    if resolve_enemy_contacts(state) {
        return;
    }

    // Time-driven transitions
    if let Some(up) = state.progression.accrue_time(&state.config, dt_ms) {
        state.apply_level_up(up);
    }
    state.banner.advance(dt_ms);
}

fn collect_point(state: &mut GameState) {
    grow_player(state);

    let level_up = state.progression.collect_dot(&state.config);
    state.events.push(GameEvent::PointCollected {
        score: state.progression.score,
    });
    log::debug!(
        "Point collected: score {}, dots {}",
        state.progression.score,
        state.progression.dots_this_level
    );
    if let Some(up) = level_up {
        state.apply_level_up(up);
    }
    state.relocate_point();
}

/// Grow the player after a pickup without pushing it into terrain.
///
/// The grown box keeps its corner when that is clear, otherwise it backs off
/// by the growth along x, y or both. With no clear placement the size stays.
fn grow_player(state: &mut GameState) {
    let config = &state.config;
    let player = &mut state.player;
    let size = (player.size + config.player_growth_per_dot)
        .min(config.player_max_size.max(config.player_base_size));
    let growth = size - player.size;
    if growth <= 0.0 {
        return;
    }

    let max = Vec2::new(config.canvas_width - size, config.canvas_height - size).max(Vec2::ZERO);
    let shifts = [
        Vec2::ZERO,
        Vec2::new(growth, 0.0),
        Vec2::new(0.0, growth),
        Vec2::splat(growth),
    ];
    let clear = shifts
        .into_iter()
        .map(|shift| (player.pos - shift).clamp(Vec2::ZERO, max))
        .find(|pos| !state.terrain.check_collision(&Rect::square(*pos, size)));

    match clear {
        Some(pos) => {
            player.pos = pos;
            player.size = size;
        }
        None => log::debug!("No room to grow player at {:?}", player.pos),
    }
}

/// Apply enemy hits; true if the run ended this step
fn resolve_enemy_contacts(state: &mut GameState) -> bool {
    for i in 0..state.enemies.len() {
        if !player_hits_enemy(&state.player, &state.enemies[i], state.config.enemy_shape) {
            continue;
        }
        match state.config.death {
            DeathModel::InstantReset => {
                state.game_over();
                return true;
            }
            DeathModel::HealthPool => {
                state.player.health = state.player.health.saturating_sub(1);
                state.events.push(GameEvent::PlayerHit {
                    health: state.player.health,
                });
                log::info!("Player hit, {} health left", state.player.health);
                if state.player.health == 0 {
                    state.game_over();
                    return true;
                }
                state.respawn_enemy(i);
            }
        }
    }
    false
}
