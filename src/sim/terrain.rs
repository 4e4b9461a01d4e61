//! Procedural obstacle field
//!
//! Layouts are built by rejection sampling: draw a candidate shape, keep it
//! only if it clears every accepted obstacle and the center safe zone by the
//! configured padding. Both placement and spawn queries run on a fixed
//! attempt budget and degrade to a best-effort answer instead of looping.

use std::ops::Range;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::settings::{GameConfig, TerrainShape};

/// Static obstacle layout for one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Terrain {
    /// Obstacle rectangles in placement order
    pub obstacles: Vec<Rect>,
    /// Index ranges into `obstacles`, one per placed shape (an L-wall owns two)
    pub shapes: Vec<Range<usize>>,
    /// Shapes the generator was asked for; may exceed `shapes.len()`
    pub requested: u32,
}

impl Terrain {
    /// Terrain without obstacles
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build terrain from explicit rectangles, one shape each
    pub fn from_rects(obstacles: Vec<Rect>) -> Self {
        let shapes = (0..obstacles.len()).map(|i| i..i + 1).collect();
        let requested = obstacles.len() as u32;
        Self {
            obstacles,
            shapes,
            requested,
        }
    }

    /// Number of shapes placed (L-walls count once)
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// True if the generator ran out of attempts before placing every shape
    pub fn is_short(&self) -> bool {
        (self.shapes.len() as u32) < self.requested
    }

    /// Does the box at `rect` intersect any obstacle?
    pub fn check_collision(&self, rect: &Rect) -> bool {
        self.obstacles.iter().any(|o| rect.intersects(o))
    }

    /// Does `candidate` violate the padding margin against any obstacle?
    pub fn is_overlapping(&self, candidate: &Rect, padding: f32) -> bool {
        self.obstacles
            .iter()
            .any(|o| candidate.overlaps_padded(o, padding))
    }

    /// Total area `rect` shares with obstacles (fallback ranking)
    fn overlap_area(&self, rect: &Rect) -> f32 {
        self.obstacles.iter().map(|o| rect.overlap_area(o)).sum()
    }

    fn commit(&mut self, parts: &[Rect]) {
        let start = self.obstacles.len();
        self.obstacles.extend_from_slice(parts);
        self.shapes.push(start..self.obstacles.len());
    }
}

/// Square at the canvas center that obstacles must leave open
pub fn safe_zone(config: &GameConfig) -> Rect {
    let size = config.safe_zone_size();
    Rect::new(
        config.canvas_width / 2.0 - size / 2.0,
        config.canvas_height / 2.0 - size / 2.0,
        size,
        size,
    )
}

/// Would `candidate` crowd the center safe zone?
pub fn is_blocking_center(candidate: &Rect, config: &GameConfig) -> bool {
    candidate.overlaps_padded(&safe_zone(config), config.obstacle_padding)
}

/// Generate a fresh obstacle layout
pub fn generate<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Terrain {
    // An inverted range collapses to its minimum
    let requested = rng.random_range(
        config.min_obstacles..=config.max_obstacles.max(config.min_obstacles),
    );
    let mut terrain = Terrain {
        requested,
        ..Terrain::default()
    };

    let mut attempts = 0;
    while (terrain.shape_count() as u32) < requested && attempts < config.max_placement_attempts
    {
        attempts += 1;
        let parts = match config.terrain_shape {
            TerrainShape::Blocks => vec![random_block(config, rng)],
            TerrainShape::LWalls => random_l_wall(config, rng).to_vec(),
        };

        // Every part must pass before any is committed
        let accepted = parts.iter().all(|part| {
            !terrain.is_overlapping(part, config.obstacle_padding)
                && !is_blocking_center(part, config)
        });
        if accepted {
            terrain.commit(&parts);
        }
    }

    if terrain.is_short() {
        log::warn!(
            "Terrain placement exhausted {} attempts: placed {}/{} shapes",
            attempts,
            terrain.shape_count(),
            requested
        );
    } else {
        log::info!(
            "Generated terrain: {} shapes ({} rects) in {} attempts",
            terrain.shape_count(),
            terrain.obstacles.len(),
            attempts
        );
    }

    terrain
}

/// Uniform sample in `[lo, hi)`, collapsing to `lo` on an empty range
fn sample<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

fn random_block<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Rect {
    let width = sample(rng, config.obstacle_min_size, config.obstacle_max_size);
    let height = sample(rng, config.obstacle_min_size, config.obstacle_max_size);
    let x = sample(rng, 0.0, config.canvas_width - width);
    let y = sample(rng, 0.0, config.canvas_height - height);
    Rect::new(x, y, width, height)
}

/// Two perpendicular walls sharing a corner, fully inside the canvas.
///
/// The pair is laid out in a local box of `main_len x side_len`; the main
/// wall runs along the top or bottom edge and the side wall along the left
/// or right edge, which covers all four orientations.
fn random_l_wall<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> [Rect; 2] {
    let t = config.wall_thickness;
    let main_len = sample(rng, config.wall_min_length, config.wall_max_length).max(t);
    let side_len = sample(rng, config.wall_min_length, config.wall_max_length).max(t);
    let horizontal = rng.random_bool(0.5);
    let main_at_far_edge = rng.random_bool(0.5);
    let side_at_far_edge = rng.random_bool(0.5);

    // (width, height) of the local bounding box
    let (bw, bh) = if horizontal {
        (main_len, side_len)
    } else {
        (side_len, main_len)
    };
    let ox = sample(rng, 0.0, config.canvas_width - bw);
    let oy = sample(rng, 0.0, config.canvas_height - bh);

    if horizontal {
        let main_y = if main_at_far_edge { oy + bh - t } else { oy };
        let side_x = if side_at_far_edge { ox + bw - t } else { ox };
        [
            Rect::new(ox, main_y, main_len, t),
            Rect::new(side_x, oy, t, side_len),
        ]
    } else {
        let main_x = if main_at_far_edge { ox + bw - t } else { ox };
        let side_y = if side_at_far_edge { oy + bh - t } else { oy };
        [
            Rect::new(main_x, oy, t, main_len),
            Rect::new(ox, side_y, side_len, t),
        ]
    }
}

/// Result of a spawn query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawn {
    /// Top-left corner for the spawned object
    pub pos: Vec2,
    /// False when the attempt budget ran out and `pos` is the least-bad
    /// candidate seen
    pub clear: bool,
}

/// Find a spot where an `object_size` square sits clear of every obstacle.
///
/// Gives up after `max_placement_attempts` and returns the candidate with the
/// smallest obstacle overlap.
pub fn valid_spawn_position<R: Rng + ?Sized>(
    terrain: &Terrain,
    config: &GameConfig,
    object_size: f32,
    rng: &mut R,
) -> Spawn {
    let mut best: Option<(f32, Vec2)> = None;
    for _ in 0..config.max_placement_attempts.max(1) {
        let pos = Vec2::new(
            sample(rng, 0.0, config.canvas_width - object_size),
            sample(rng, 0.0, config.canvas_height - object_size),
        );
        let footprint = Rect::square(pos, object_size).inflate(config.spawn_padding);
        if !terrain.check_collision(&footprint) {
            return Spawn { pos, clear: true };
        }
        let area = terrain.overlap_area(&footprint);
        if best.is_none_or(|(a, _)| area < a) {
            best = Some((area, pos));
        }
    }

    let pos = best.map(|(_, p)| p).unwrap_or(Vec2::ZERO);
    log::warn!(
        "No clear spawn for size {} after {} attempts, using ({:.1}, {:.1})",
        object_size,
        config.max_placement_attempts,
        pos.x,
        pos.y
    );
    Spawn { pos, clear: false }
}

/// Like [`valid_spawn_position`], but also keeps the object's center at
/// least `config.min_spawn_distance` from `avoid` (the player center).
///
/// Falls back to the farthest terrain-valid candidate seen.
pub fn spawn_away_from<R: Rng + ?Sized>(
    terrain: &Terrain,
    config: &GameConfig,
    object_size: f32,
    avoid: Vec2,
    rng: &mut R,
) -> Spawn {
    let half = Vec2::splat(object_size / 2.0);
    let mut farthest: Option<(f32, Spawn)> = None;
    for _ in 0..config.max_placement_attempts.max(1) {
        let spawn = valid_spawn_position(terrain, config, object_size, rng);
        let distance = (spawn.pos + half).distance(avoid);
        if spawn.clear && distance > config.min_spawn_distance {
            return spawn;
        }
        let rank = if spawn.clear { distance } else { -1.0 };
        if farthest.is_none_or(|(d, _)| rank > d) {
            farthest = Some((rank, spawn));
        }
    }

    log::warn!(
        "No spawn {:.0}px away from ({:.1}, {:.1}); using best effort",
        config.min_spawn_distance,
        avoid.x,
        avoid.y
    );
    farthest.map(|(_, s)| s).unwrap_or(Spawn {
        pos: Vec2::ZERO,
        clear: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn assert_layout_valid(terrain: &Terrain, config: &GameConfig) {
        let zone = safe_zone(config);
        for (i, shape) in terrain.shapes.iter().enumerate() {
            for rect in &terrain.obstacles[shape.clone()] {
                assert!(!rect.overlaps_padded(&zone, config.obstacle_padding));
                assert!(rect.x >= 0.0 && rect.right() <= config.canvas_width + 1e-3);
                assert!(rect.y >= 0.0 && rect.bottom() <= config.canvas_height + 1e-3);
                for other in terrain.shapes.iter().skip(i + 1) {
                    for o in &terrain.obstacles[other.clone()] {
                        assert!(!rect.overlaps_padded(o, config.obstacle_padding));
                    }
                }
            }
        }
    }

    #[test]
    fn test_generate_blocks_respects_padding() {
        let config = GameConfig::classic();
        for seed in 0..20 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let terrain = generate(&config, &mut rng);
            assert!(terrain.requested >= config.min_obstacles);
            assert!(terrain.requested <= config.max_obstacles);
            assert!(terrain.shape_count() as u32 <= terrain.requested);
            assert_eq!(terrain.obstacles.len(), terrain.shape_count());
            assert_layout_valid(&terrain, &config);
        }
    }

    #[test]
    fn test_generate_l_walls_are_pairs() {
        let config = GameConfig::arcade();
        for seed in 0..20 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let terrain = generate(&config, &mut rng);
            assert_eq!(terrain.obstacles.len(), terrain.shape_count() * 2);
            for shape in &terrain.shapes {
                let [a, b] = [terrain.obstacles[shape.start], terrain.obstacles[shape.start + 1]];
                // Exactly one of the pair is horizontal
                let a_horizontal = a.height == config.wall_thickness;
                let b_horizontal = b.height == config.wall_thickness;
                assert_ne!(a_horizontal, b_horizontal);
                // The walls share a corner cell
                assert!(a.intersects(&b));
            }
            assert_layout_valid(&terrain, &config);
        }
    }

    #[test]
    fn test_generate_under_fills_when_crowded() {
        let mut config = GameConfig::classic();
        config.min_obstacles = 50;
        config.max_obstacles = 50;
        let mut rng = Pcg32::seed_from_u64(7);
        let terrain = generate(&config, &mut rng);
        assert!(terrain.is_short());
        assert_layout_valid(&terrain, &config);
    }

    #[test]
    fn test_generate_inverted_count_uses_minimum() {
        let mut config = GameConfig::classic();
        config.min_obstacles = 3;
        config.max_obstacles = 1;
        let terrain = generate(&config, &mut Pcg32::seed_from_u64(4));
        assert_eq!(terrain.requested, 3);
    }

    #[test]
    fn test_safe_zone_centered() {
        let config = GameConfig::classic();
        let zone = safe_zone(&config);
        assert_eq!(zone.center(), Vec2::new(400.0, 300.0));
        assert_eq!(zone.width, 120.0);
    }

    #[test]
    fn test_spawn_position_is_clear() {
        let config = GameConfig::arcade();
        let mut rng = Pcg32::seed_from_u64(3);
        let terrain = generate(&config, &mut rng);
        for _ in 0..50 {
            let spawn = valid_spawn_position(&terrain, &config, 20.0, &mut rng);
            assert!(spawn.clear);
            assert!(!terrain.check_collision(&Rect::square(spawn.pos, 20.0)));
        }
    }

    #[test]
    fn test_spawn_falls_back_when_blocked() {
        let config = GameConfig::classic();
        let full = Terrain::from_rects(vec![Rect::new(
            -10.0,
            -10.0,
            config.canvas_width + 20.0,
            config.canvas_height + 20.0,
        )]);
        let mut rng = Pcg32::seed_from_u64(1);
        let spawn = valid_spawn_position(&full, &config, 10.0, &mut rng);
        assert!(!spawn.clear);
        assert!(spawn.pos.x.is_finite() && spawn.pos.y.is_finite());
    }

    #[test]
    fn test_spawn_away_from_player() {
        let config = GameConfig::arcade();
        let terrain = Terrain::empty();
        let mut rng = Pcg32::seed_from_u64(11);
        let player = Vec2::new(400.0, 300.0);
        for _ in 0..50 {
            let spawn = spawn_away_from(&terrain, &config, 20.0, player, &mut rng);
            assert!(spawn.clear);
            assert!((spawn.pos + Vec2::splat(10.0)).distance(player) > config.min_spawn_distance);
        }
    }
}
