//! Game state and core simulation types
//!
//! Everything the tick mutates lives in [`GameState`]; there is no other
//! mutable state in the crate.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::progression::{LevelUp, LevelUpBanner, Progression, rescale_enemies};
use super::terrain::{self, Terrain};
use super::tick::FrameGate;
use crate::highscores::HighScores;
use crate::settings::{EnemyLaunch, GameConfig, ProgressionTrigger};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Motion, collisions and scoring frozen
    Paused,
}

/// Something the host may want to react to (sound, HUD flash, logging)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PointCollected { score: u64 },
    /// `level` is 1-based
    LevelUp { level: u32 },
    PlayerHit { health: u32 },
    GameOver { score: u64, level: u32 },
    TerrainGenerated { obstacles: usize },
    Paused,
    Resumed,
    Reset,
}

/// The player's avatar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub health: u32,
}

impl Player {
    pub fn new(pos: Vec2, size: f32, health: u32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            health,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }
}

/// A roaming enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
}

impl Enemy {
    pub fn new(pos: Vec2, vel: Vec2, size: f32) -> Self {
        Self { pos, vel, size }
    }

    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }
}

/// The single collectible dot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub pos: Vec2,
    pub size: f32,
}

impl Point {
    pub fn rect(&self) -> Rect {
        Rect::square(self.pos, self.size)
    }
}

/// Initial velocity for a freshly spawned enemy
pub fn launch_velocity<R: Rng + ?Sized>(rng: &mut R, speed: f32, launch: EnemyLaunch) -> Vec2 {
    match launch {
        EnemyLaunch::Diagonal => {
            let sx = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
            let sy = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
            Vec2::new(sx, sy) * speed
        }
        EnemyLaunch::AnyAngle => {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            Vec2::from_angle(angle) * speed
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    /// Random source for terrain and spawns; swap it to replay or test
    pub rng: Pcg32,
    pub terrain: Terrain,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub point: Point,
    pub progression: Progression,
    pub banner: LevelUpBanner,
    pub phase: GamePhase,
    /// Fixed-timestep accumulator
    pub frame_gate: FrameGate,
    /// Simulation steps taken since the state was created
    pub time_ticks: u64,
    /// Finished runs in this session
    pub high_scores: HighScores,
    /// Events produced by the latest tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game seeded for reproducibility
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, Pcg32::seed_from_u64(seed))
    }

    /// Create a new game drawing from an existing random source
    pub fn with_rng(config: GameConfig, mut rng: Pcg32) -> Self {
        debug_assert!(
            config.validate().is_ok(),
            "invalid game config: {:?}",
            config.validate()
        );
        let terrain = terrain::generate(&config, &mut rng);
        let mut state = Self {
            player: Player::new(Vec2::ZERO, config.player_base_size, config.max_health),
            point: Point {
                pos: Vec2::ZERO,
                size: config.point_size,
            },
            progression: Progression::new(&config),
            banner: LevelUpBanner::default(),
            phase: GamePhase::Playing,
            frame_gate: FrameGate::new(config.frame_interval_ms),
            time_ticks: 0,
            high_scores: HighScores::new(),
            events: Vec::new(),
            enemies: Vec::new(),
            terrain,
            rng,
            config,
        };
        state.place_run();
        state
    }

    /// Build a game around a fixed obstacle layout (scenarios, tests)
    pub fn with_terrain(config: GameConfig, seed: u64, terrain: Terrain) -> Self {
        let mut state = Self::new(config, seed);
        state.terrain = terrain;
        state.place_run();
        state
    }

    /// Top-left position that centers a `size` square on the canvas
    pub fn center_position(&self, size: f32) -> Vec2 {
        Vec2::new(
            self.config.canvas_width / 2.0 - size / 2.0,
            self.config.canvas_height / 2.0 - size / 2.0,
        )
    }

    /// Player, point and enemies back to their starting layout
    fn place_run(&mut self) {
        let size = self.config.player_base_size;
        self.player = Player::new(self.center_position(size), size, self.config.max_health);
        self.progression.reset(&self.config);
        self.banner.clear();
        self.relocate_point();
        self.enemies.clear();
        self.spawn_enemies(self.progression.enemy_count as usize);
    }

    /// Full reset: new run, optionally on a new layout.
    ///
    /// Session bookkeeping (tick counter, leaderboard) survives.
    pub fn reset_game(&mut self) {
        if self.config.regenerate_terrain_on_reset {
            self.terrain = terrain::generate(&self.config, &mut self.rng);
            self.events.push(GameEvent::TerrainGenerated {
                obstacles: self.terrain.obstacles.len(),
            });
        }
        self.place_run();
        self.phase = GamePhase::Playing;
        self.frame_gate.drain();
        log::info!("Game reset: {} enemies", self.enemies.len());
    }

    /// Record the finished run and start over
    pub fn game_over(&mut self) {
        let score = self.progression.score;
        let level = self.progression.level + 1;
        log::info!("Game over: score {} at level {}", score, level);
        if let Some(rank) = self.high_scores.add_score(score, level, self.time_ticks) {
            log::info!("New high score, rank {}", rank);
        }
        self.events.push(GameEvent::GameOver { score, level });
        self.reset_game();
    }

    /// Move the dot somewhere clear of the terrain
    pub fn relocate_point(&mut self) {
        let spawn =
            terrain::valid_spawn_position(&self.terrain, &self.config, self.point.size, &mut self.rng);
        self.point.pos = spawn.pos;
    }

    /// Add `count` enemies away from the player at the current speed
    pub fn spawn_enemies(&mut self, count: usize) {
        for _ in 0..count {
            let pos = self.spawn_position_away_from_player();
            let vel = launch_velocity(
                &mut self.rng,
                self.progression.enemy_speed,
                self.config.enemy_launch,
            );
            self.enemies.push(Enemy::new(pos, vel, self.config.enemy_size));
        }
    }

    /// Send one enemy somewhere away from the player, keeping its velocity
    pub fn respawn_enemy(&mut self, index: usize) {
        let pos = self.spawn_position_away_from_player();
        if let Some(enemy) = self.enemies.get_mut(index) {
            enemy.pos = pos;
        }
    }

    fn spawn_position_away_from_player(&mut self) -> Vec2 {
        terrain::spawn_away_from(
            &self.terrain,
            &self.config,
            self.config.enemy_size,
            self.player.center(),
            &mut self.rng,
        )
        .pos
    }

    /// Bring the enemy roster in line with a level transition
    pub fn apply_level_up(&mut self, up: LevelUp) {
        match self.config.progression {
            ProgressionTrigger::ScoreInterval => {
                self.enemies.clear();
                self.spawn_enemies(up.enemy_count as usize);
            }
            ProgressionTrigger::DotsPerLevel => {
                rescale_enemies(&mut self.enemies, up.enemy_speed);
                let deficit = (up.enemy_count as usize).saturating_sub(self.enemies.len());
                self.spawn_enemies(deficit);
            }
        }
        self.banner.arm(up.level + 1, self.config.level_up_display_ms);
        self.events.push(GameEvent::LevelUp { level: up.level + 1 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_layout() {
        let config = GameConfig::arcade();
        let state = GameState::new(config.clone(), 42);
        assert_eq!(state.enemies.len(), config.base_enemy_count as usize);
        assert_eq!(state.player.health, config.max_health);
        assert_eq!(state.player.size, config.player_base_size);
        assert!(!state.terrain.check_collision(&state.player.rect()));
        assert!(!state.terrain.check_collision(&state.point.rect()));
        for enemy in &state.enemies {
            assert!((enemy.vel.length() - config.base_enemy_speed).abs() < 1e-4);
        }
    }

    #[test]
    fn test_classic_launch_is_diagonal() {
        let state = GameState::new(GameConfig::classic(), 5);
        for enemy in &state.enemies {
            assert_eq!(enemy.vel.x.abs(), 1.0);
            assert_eq!(enemy.vel.y.abs(), 1.0);
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = GameState::new(GameConfig::arcade(), 99);
        let b = GameState::new(GameConfig::arcade(), 99);
        assert_eq!(a.terrain.obstacles, b.terrain.obstacles);
        assert_eq!(a.enemies, b.enemies);
        assert_eq!(a.point, b.point);
    }

    #[test]
    fn test_reset_restores_base_state() {
        let config = GameConfig::arcade();
        let mut state = GameState::new(config.clone(), 8);
        state.player.health = 1;
        state.player.size = 45.0;
        state.player.vel = Vec2::new(3.0, 3.0);
        for _ in 0..12 {
            if let Some(up) = state.progression.collect_dot(&state.config) {
                state.apply_level_up(up);
            }
        }
        assert!(state.enemies.len() > config.base_enemy_count as usize);

        state.reset_game();
        assert_eq!(state.player.health, config.max_health);
        assert_eq!(state.player.size, config.player_base_size);
        assert_eq!(state.player.vel, Vec2::ZERO);
        assert_eq!(state.progression.score, 0);
        assert_eq!(state.progression.level, 0);
        assert_eq!(state.progression.dots_this_level, 0);
        assert_eq!(state.enemies.len(), config.base_enemy_count as usize);
        assert!(!state.banner.is_active());
    }

    #[test]
    fn test_level_up_spawns_only_deficit() {
        let config = GameConfig::arcade();
        let mut state = GameState::new(config.clone(), 21);
        let before: Vec<Vec2> = state.enemies.iter().map(|e| e.pos).collect();
        let up = (0..config.dots_per_level)
            .find_map(|_| state.progression.collect_dot(&state.config))
            .unwrap();
        state.apply_level_up(up);

        assert_eq!(state.enemies.len(), up.enemy_count as usize);
        for (enemy, pos) in state.enemies.iter().zip(&before) {
            assert_eq!(enemy.pos, *pos);
        }
        for enemy in &state.enemies {
            assert!((enemy.vel.length() - up.enemy_speed).abs() < 1e-4);
        }
        assert!(state.banner.is_active());
        assert_eq!(state.events, vec![GameEvent::LevelUp { level: 2 }]);
    }

    #[test]
    fn test_arcade_game_over_regenerates_terrain() {
        let mut state = GameState::new(GameConfig::arcade(), 17);
        let before = state.terrain.obstacles.clone();
        state.game_over();

        assert_ne!(state.terrain.obstacles, before);
        assert!(state.events.contains(&GameEvent::TerrainGenerated {
            obstacles: state.terrain.obstacles.len(),
        }));
        assert!(!state.terrain.check_collision(&state.player.rect()));
        assert!(!state.terrain.check_collision(&state.point.rect()));
    }

    #[test]
    fn test_classic_game_over_keeps_terrain() {
        let mut state = GameState::new(GameConfig::classic(), 17);
        let before = state.terrain.obstacles.clone();
        state.game_over();

        assert_eq!(state.terrain.obstacles, before);
        assert!(
            !state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::TerrainGenerated { .. }))
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invalid game config")]
    fn test_invalid_config_rejected_in_debug() {
        let config = GameConfig {
            min_obstacles: 9,
            max_obstacles: 2,
            ..GameConfig::classic()
        };
        GameState::new(config, 1);
    }

    #[test]
    fn test_game_over_records_score() {
        let mut state = GameState::new(GameConfig::classic(), 3);
        state.progression.score = 4;
        state.game_over();
        assert_eq!(state.high_scores.top_score(), Some(4));
        assert_eq!(state.progression.score, 0);
        assert!(
            state
                .events
                .contains(&GameEvent::GameOver { score: 4, level: 1 })
        );
    }
}
