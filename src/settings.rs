//! Game configuration and variant selection
//!
//! Both game variants run through one simulation core; everything that
//! differs between them is an enumerated option or a constant here.
//! `classic` mirrors the first-generation rules, `arcade` the later one with
//! momentum, health and dot-driven levels.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors from loading or validating a [`GameConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{name} range is inverted ({min} > {max})")]
    InvertedRange { name: &'static str, min: f32, max: f32 },
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("safe zone ({size}px) does not fit in a {width}x{height} canvas")]
    SafeZoneTooLarge { size: f32, width: f32, height: f32 },
}

/// How enemies react to obstacles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EnemyShapeModel {
    /// Axis-aligned box, minimum-penetration axis decides the flip
    #[default]
    Box,
    /// Circle inscribed in the box, closest-point test
    Circle,
}

/// How input moves the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MovementModel {
    /// Fixed step per pressed direction, whole move rejected on collision
    #[default]
    Instant,
    /// Velocity with acceleration, decay and a speed cap, resolved per axis
    Accelerating,
}

/// What advances the difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionTrigger {
    /// Every `difficulty_interval` points of total score
    #[default]
    ScoreInterval,
    /// Every `dots_per_level` dots collected within the current level
    DotsPerLevel,
}

/// What happens when an enemy touches the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeathModel {
    /// Any box overlap ends the run
    #[default]
    InstantReset,
    /// Circle overlap costs one health; the run ends at zero
    HealthPool,
}

/// Obstacle shapes produced by the terrain generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TerrainShape {
    /// Free-sized rectangles
    #[default]
    Blocks,
    /// Pairs of thin walls joined at a corner
    LWalls,
}

/// Initial heading of a freshly spawned enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EnemyLaunch {
    /// `(±speed, ±speed)`
    #[default]
    Diagonal,
    /// Uniform random angle at exactly `speed`
    AnyAngle,
}

impl ProgressionTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressionTrigger::ScoreInterval => "score_interval",
            ProgressionTrigger::DotsPerLevel => "dots_per_level",
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Canvas ===
    pub canvas_width: f32,
    pub canvas_height: f32,

    // === Variant switches ===
    pub enemy_shape: EnemyShapeModel,
    pub movement: MovementModel,
    pub progression: ProgressionTrigger,
    pub death: DeathModel,
    pub terrain_shape: TerrainShape,
    pub enemy_launch: EnemyLaunch,
    /// Scale diagonal input by 1/sqrt(2)
    pub normalize_diagonal: bool,
    /// New obstacle layout after every game over / reset
    pub regenerate_terrain_on_reset: bool,

    // === Terrain ===
    pub min_obstacles: u32,
    pub max_obstacles: u32,
    pub obstacle_min_size: f32,
    pub obstacle_max_size: f32,
    pub wall_min_length: f32,
    pub wall_max_length: f32,
    pub wall_thickness: f32,
    pub obstacle_padding: f32,
    pub max_placement_attempts: u32,
    /// Extra clearance around spawn candidates
    pub spawn_padding: f32,

    // === Player ===
    pub player_base_size: f32,
    pub player_growth_per_dot: f32,
    pub player_max_size: f32,
    pub player_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    pub max_player_speed: f32,
    pub max_health: u32,

    // === Point ===
    pub point_size: f32,
    pub points_per_dot: u64,

    // === Enemies ===
    pub enemy_size: f32,
    pub base_enemy_speed: f32,
    pub enemy_speed_increase: f32,
    pub base_enemy_count: u32,
    pub enemy_count_increase: u32,
    pub max_enemies: u32,
    /// Respawned enemies keep at least this far from the player center
    pub min_spawn_distance: f32,

    // === Progression ===
    pub difficulty_interval: u64,
    pub dots_per_level: u32,
    pub level_bonus_per_level: u64,
    pub level_up_display_ms: f32,
    /// 0 disables the survival bonus
    pub survival_bonus_interval_ms: f32,
    pub survival_bonus_points: u64,

    // === Timing ===
    /// 0 ticks on every host frame
    pub frame_interval_ms: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl GameConfig {
    /// First-generation rules: instant movement, box enemies, score-interval levels,
    /// one touch ends the run
    pub fn classic() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,

            enemy_shape: EnemyShapeModel::Box,
            movement: MovementModel::Instant,
            progression: ProgressionTrigger::ScoreInterval,
            death: DeathModel::InstantReset,
            terrain_shape: TerrainShape::Blocks,
            enemy_launch: EnemyLaunch::Diagonal,
            normalize_diagonal: false,
            regenerate_terrain_on_reset: false,

            min_obstacles: MIN_OBSTACLES,
            max_obstacles: MAX_OBSTACLES,
            obstacle_min_size: OBSTACLE_MIN_SIZE,
            obstacle_max_size: OBSTACLE_MAX_SIZE,
            wall_min_length: WALL_MIN_LENGTH,
            wall_max_length: WALL_MAX_LENGTH,
            wall_thickness: WALL_THICKNESS,
            obstacle_padding: OBSTACLE_PADDING,
            max_placement_attempts: MAX_PLACEMENT_ATTEMPTS,
            spawn_padding: 0.0,

            player_base_size: PLAYER_BASE_SIZE,
            player_growth_per_dot: 0.0,
            player_max_size: PLAYER_BASE_SIZE,
            player_speed: PLAYER_SPEED,
            acceleration: PLAYER_ACCELERATION,
            deceleration: PLAYER_DECELERATION,
            max_player_speed: MAX_PLAYER_SPEED,
            max_health: 1,

            point_size: POINT_SIZE,
            points_per_dot: 1,

            enemy_size: ENEMY_SIZE,
            base_enemy_speed: BASE_ENEMY_SPEED,
            enemy_speed_increase: ENEMY_SPEED_INCREASE,
            base_enemy_count: BASE_ENEMY_COUNT,
            enemy_count_increase: ENEMY_COUNT_INCREASE,
            max_enemies: MAX_ENEMIES,
            min_spawn_distance: 100.0,

            difficulty_interval: DIFFICULTY_INCREASE_INTERVAL,
            dots_per_level: DOTS_PER_LEVEL,
            level_bonus_per_level: 0,
            level_up_display_ms: 1000.0,
            survival_bonus_interval_ms: 0.0,
            survival_bonus_points: 0,

            frame_interval_ms: 0.0,
        }
    }

    /// Later rules: momentum, circular enemies, L-shaped walls, health pool,
    /// dot-driven levels and a fixed 60 Hz timestep
    pub fn arcade() -> Self {
        Self {
            enemy_shape: EnemyShapeModel::Circle,
            movement: MovementModel::Accelerating,
            progression: ProgressionTrigger::DotsPerLevel,
            death: DeathModel::HealthPool,
            terrain_shape: TerrainShape::LWalls,
            enemy_launch: EnemyLaunch::AnyAngle,
            normalize_diagonal: true,
            regenerate_terrain_on_reset: true,

            spawn_padding: 5.0,

            player_growth_per_dot: 1.0,
            player_max_size: 60.0,
            max_health: MAX_HEALTH,

            points_per_dot: 10,

            base_enemy_speed: 1.5,
            enemy_speed_increase: 0.35,
            min_spawn_distance: 150.0,

            level_bonus_per_level: LEVEL_BONUS_PER_LEVEL,
            level_up_display_ms: 2000.0,
            survival_bonus_interval_ms: 1000.0,
            survival_bonus_points: 1,

            frame_interval_ms: TARGET_FRAME_MS,
            ..Self::classic()
        }
    }

    /// Look up a preset by name
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "classic" | "basic" => Some(Self::classic()),
            "arcade" | "advanced" => Some(Self::arcade()),
            _ => None,
        }
    }

    /// Parse a JSON override; missing keys keep classic defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded game config from {}", path.display());
        Ok(config)
    }

    /// Reject configurations the generator and tick loop cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("player_base_size", self.player_base_size),
            ("point_size", self.point_size),
            ("enemy_size", self.enemy_size),
            ("wall_thickness", self.wall_thickness),
            ("obstacle_min_size", self.obstacle_min_size),
            ("wall_min_length", self.wall_min_length),
            ("max_player_speed", self.max_player_speed),
        ] {
            if value <= 0.0 || !value.is_finite() {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        if self.dots_per_level == 0 {
            return Err(ConfigError::NotPositive {
                name: "dots_per_level",
                value: 0.0,
            });
        }
        if self.difficulty_interval == 0 {
            return Err(ConfigError::NotPositive {
                name: "difficulty_interval",
                value: 0.0,
            });
        }
        if self.max_health == 0 {
            return Err(ConfigError::NotPositive {
                name: "max_health",
                value: 0.0,
            });
        }
        let ranges = [
            (
                "obstacle count",
                self.min_obstacles as f32,
                self.max_obstacles as f32,
            ),
            (
                "obstacle size",
                self.obstacle_min_size,
                self.obstacle_max_size,
            ),
            ("wall length", self.wall_min_length, self.wall_max_length),
            (
                "player size",
                self.player_base_size,
                self.player_max_size,
            ),
        ];
        for (name, min, max) in ranges {
            if min > max {
                return Err(ConfigError::InvertedRange { name, min, max });
            }
        }
        let zone = self.safe_zone_size();
        if zone >= self.canvas_width || zone >= self.canvas_height {
            return Err(ConfigError::SafeZoneTooLarge {
                size: zone,
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        Ok(())
    }

    /// Side length of the obstacle-free square at the canvas center
    pub fn safe_zone_size(&self) -> f32 {
        self.player_base_size * 4.0
    }

    /// Enemy speed for a 0-based level index
    pub fn enemy_speed_for_level(&self, level: u32) -> f32 {
        self.base_enemy_speed + self.enemy_speed_increase * level as f32
    }

    /// Enemy count for a 0-based level index, capped at `max_enemies`
    pub fn enemy_count_for_level(&self, level: u32) -> u32 {
        self.base_enemy_count
            .saturating_add(self.enemy_count_increase.saturating_mul(level))
            .min(self.max_enemies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(GameConfig::classic().validate().is_ok());
        assert!(GameConfig::arcade().validate().is_ok());
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(GameConfig::preset("Classic"), Some(GameConfig::classic()));
        assert_eq!(GameConfig::preset("advanced"), Some(GameConfig::arcade()));
        assert!(GameConfig::preset("hard").is_none());
    }

    #[test]
    fn test_json_overrides_keep_defaults() {
        let config =
            GameConfig::from_json_str(r#"{ "max_enemies": 6, "movement": "accelerating" }"#)
                .unwrap();
        assert_eq!(config.max_enemies, 6);
        assert_eq!(config.movement, MovementModel::Accelerating);
        assert_eq!(config.canvas_width, CANVAS_WIDTH);
        assert_eq!(config.enemy_shape, EnemyShapeModel::Box);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = GameConfig::from_json_str(r#"{ "min_obstacles": 9, "max_obstacles": 2 }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvertedRange { .. }));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = GameConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_oversized_safe_zone_rejected() {
        let mut config = GameConfig::classic();
        config.canvas_height = 100.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SafeZoneTooLarge { .. })
        ));
    }

    #[test]
    fn test_difficulty_formulas() {
        let config = GameConfig::classic();
        assert_eq!(config.enemy_speed_for_level(0), 1.0);
        assert_eq!(config.enemy_speed_for_level(2), 2.0);
        assert_eq!(config.enemy_count_for_level(0), 3);
        assert_eq!(config.enemy_count_for_level(4), 7);
        assert_eq!(config.enemy_count_for_level(100), 15);
    }
}
