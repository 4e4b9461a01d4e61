//! Property tests for terrain, spawning, motion and progression invariants

use dotfield::sim::geometry::Rect;
use dotfield::sim::motion::{Intent, move_player_accelerating};
use dotfield::sim::progression::rescale_enemies;
use dotfield::sim::{Enemy, Player, Terrain, generate, safe_zone, valid_spawn_position};
use dotfield::{GameConfig, TerrainShape};
use glam::Vec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

fn config_for(shape: TerrainShape) -> GameConfig {
    let mut config = GameConfig::arcade();
    config.terrain_shape = shape;
    config
}

fn any_shape() -> impl Strategy<Value = TerrainShape> {
    prop_oneof![Just(TerrainShape::Blocks), Just(TerrainShape::LWalls)]
}

fn any_intent() -> impl Strategy<Value = Intent> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(up, down, left, right)| Intent {
            up,
            down,
            left,
            right,
        },
    )
}

proptest! {
    #[test]
    fn generated_shapes_keep_padding(seed in any::<u64>(), shape in any_shape()) {
        let config = config_for(shape);
        let mut rng = Pcg32::seed_from_u64(seed);
        let terrain = generate(&config, &mut rng);
        let zone = safe_zone(&config);

        prop_assert!(terrain.shape_count() as u32 <= config.max_obstacles);
        for (i, shape) in terrain.shapes.iter().enumerate() {
            for rect in &terrain.obstacles[shape.clone()] {
                prop_assert!(!rect.overlaps_padded(&zone, config.obstacle_padding));
                for other in terrain.shapes.iter().skip(i + 1) {
                    for o in &terrain.obstacles[other.clone()] {
                        prop_assert!(!rect.overlaps_padded(o, config.obstacle_padding));
                    }
                }
            }
        }
    }

    #[test]
    fn clear_spawns_never_touch_terrain(
        seed in any::<u64>(),
        shape in any_shape(),
        size in 5.0f32..60.0,
    ) {
        let config = config_for(shape);
        let mut rng = Pcg32::seed_from_u64(seed);
        let terrain = generate(&config, &mut rng);
        let spawn = valid_spawn_position(&terrain, &config, size, &mut rng);
        if spawn.clear {
            prop_assert!(!terrain.check_collision(&Rect::square(spawn.pos, size)));
        }
        prop_assert!(spawn.pos.x >= 0.0 && spawn.pos.x <= config.canvas_width - size);
        prop_assert!(spawn.pos.y >= 0.0 && spawn.pos.y <= config.canvas_height - size);
    }

    #[test]
    fn player_speed_never_exceeds_cap(
        seed in any::<u64>(),
        inputs in proptest::collection::vec(any_intent(), 1..200),
    ) {
        let config = GameConfig::arcade();
        let mut rng = Pcg32::seed_from_u64(seed);
        let terrain = generate(&config, &mut rng);
        let size = config.player_base_size;
        let mut player = Player::new(
            Vec2::new(
                config.canvas_width / 2.0 - size / 2.0,
                config.canvas_height / 2.0 - size / 2.0,
            ),
            size,
            config.max_health,
        );
        for intent in inputs {
            move_player_accelerating(&mut player, intent, &config, &terrain);
            prop_assert!(player.vel.length() <= config.max_player_speed + 1e-4);
            prop_assert!(!terrain.check_collision(&player.rect()));
        }
    }

    #[test]
    fn rescale_keeps_heading(
        vx in -10.0f32..10.0,
        vy in -10.0f32..10.0,
        speed in 0.5f32..8.0,
    ) {
        prop_assume!(Vec2::new(vx, vy).length() > 1e-3);
        let before = Vec2::new(vx, vy);
        let mut enemies = vec![Enemy::new(Vec2::ZERO, before, 20.0)];
        rescale_enemies(&mut enemies, speed);
        let after = enemies[0].vel;
        prop_assert!((after.length() - speed).abs() < 1e-3);
        prop_assert!(after.normalize().dot(before.normalize()) > 0.9999);
    }
}

#[test]
fn empty_terrain_has_no_collisions() {
    let terrain = Terrain::empty();
    assert!(!terrain.check_collision(&Rect::new(0.0, 0.0, 800.0, 600.0)));
}
