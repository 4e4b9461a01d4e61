//! Difficulty progression
//!
//! Score, level and dot counters move together: a level change always
//! resets the per-level dot counter, and the derived enemy speed/count are
//! recomputed from the level index rather than adjusted incrementally.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Enemy;
use crate::settings::{GameConfig, ProgressionTrigger};
use crate::with_speed;

/// Outcome of a level transition, consumed by the tick to adjust enemies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelUp {
    /// New 0-based level index
    pub level: u32,
    pub enemy_speed: f32,
    pub enemy_count: u32,
    /// Bonus added to the score by this transition
    pub bonus: u64,
}

/// Score and difficulty state for the current run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    pub score: u64,
    /// Dots collected since the last level change
    pub dots_this_level: u32,
    /// 0-based difficulty level
    pub level: u32,
    pub enemy_speed: f32,
    pub enemy_count: u32,
    /// Unpaused play time not yet converted into survival bonus
    survival_ms: f32,
}

impl Progression {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            score: 0,
            dots_this_level: 0,
            level: 0,
            enemy_speed: config.enemy_speed_for_level(0),
            enemy_count: config.enemy_count_for_level(0),
            survival_ms: 0.0,
        }
    }

    /// Back to level 0 with no score
    pub fn reset(&mut self, config: &GameConfig) {
        *self = Self::new(config);
    }

    /// Count a collected dot and run the level check
    pub fn collect_dot(&mut self, config: &GameConfig) -> Option<LevelUp> {
        self.score += config.points_per_dot;
        self.dots_this_level += 1;
        self.check_level_up(config)
    }

    /// Convert unpaused play time into survival bonus points.
    ///
    /// Returns a level transition if the bonus pushed the score over a
    /// score-interval threshold.
    pub fn accrue_time(&mut self, config: &GameConfig, elapsed_ms: f32) -> Option<LevelUp> {
        if config.survival_bonus_interval_ms <= 0.0 || elapsed_ms <= 0.0 {
            return None;
        }
        self.survival_ms += elapsed_ms;
        let intervals = (self.survival_ms / config.survival_bonus_interval_ms).floor();
        if intervals < 1.0 {
            return None;
        }
        self.survival_ms -= intervals * config.survival_bonus_interval_ms;
        self.score += intervals as u64 * config.survival_bonus_points;
        match config.progression {
            ProgressionTrigger::ScoreInterval => self.check_level_up(config),
            ProgressionTrigger::DotsPerLevel => None,
        }
    }

    fn check_level_up(&mut self, config: &GameConfig) -> Option<LevelUp> {
        let (level, bonus) = match config.progression {
            ProgressionTrigger::ScoreInterval => {
                let reached = (self.score / config.difficulty_interval.max(1)) as u32;
                if reached <= self.level {
                    return None;
                }
                (reached, 0)
            }
            ProgressionTrigger::DotsPerLevel => {
                if self.dots_this_level < config.dots_per_level {
                    return None;
                }
                let level = self.level + 1;
                (level, level as u64 * config.level_bonus_per_level)
            }
        };

        self.level = level;
        self.dots_this_level = 0;
        self.score += bonus;
        self.enemy_speed = config.enemy_speed_for_level(level);
        self.enemy_count = config.enemy_count_for_level(level);

        log::info!(
            "Level {} reached: enemy speed {:.2}, {} enemies, bonus {}",
            level + 1,
            self.enemy_speed,
            self.enemy_count,
            bonus
        );

        Some(LevelUp {
            level,
            enemy_speed: self.enemy_speed,
            enemy_count: self.enemy_count,
            bonus,
        })
    }
}

/// Rescale every enemy to `speed` while keeping its heading.
///
/// A stationary enemy has no heading, so it is sent along +x.
pub fn rescale_enemies(enemies: &mut [Enemy], speed: f32) {
    for enemy in enemies {
        enemy.vel = with_speed(enemy.vel, speed, Vec2::X);
    }
}

/// Transient "level up" notice for the display layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelUpBanner {
    /// Level shown on the banner (1-based)
    pub level: u32,
    pub remaining_ms: f32,
}

impl LevelUpBanner {
    pub fn arm(&mut self, level: u32, duration_ms: f32) {
        self.level = level;
        self.remaining_ms = duration_ms;
    }

    /// Count down by `elapsed_ms`
    pub fn advance(&mut self, elapsed_ms: f32) {
        self.remaining_ms = (self.remaining_ms - elapsed_ms).max(0.0);
    }

    pub fn is_active(&self) -> bool {
        self.remaining_ms > 0.0
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
