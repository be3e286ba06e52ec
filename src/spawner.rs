//! Wave spawning for enemies and pickups. All randomness comes through the
//! injected RNG so seeded runs are reproducible.

use rand::Rng;
use tracing::debug;

use crate::assets::Assets;
use crate::config::Config;
use crate::enemy::Enemy;
use crate::entities::EnemyKind;
use crate::error::AssetError;
use crate::geometry::{Arena, Vector2};
use crate::pickup::{Pickup, PICKUP_TYPES};

/// Depth of the off-screen band enemies spawn in.
pub const ENEMY_SPAWN_OFFSET: i64 = 200;
/// Inset from every arena edge for pickup positions.
pub const PICKUP_SPAWN_INSET: i64 = 200;

/// Every tenth wave is a boss wave.
pub const BOSS_WAVE_INTERVAL: u32 = 10;
/// First wave that may add a tank.
pub const TANK_MIN_WAVE: u32 = 5;
const TANK_CHANCE: f64 = 0.5;

/// Random point just above the top edge or just below the bottom edge (50/50),
/// anywhere across the arena width.
pub fn spawn_position(rng: &mut impl Rng, arena: Arena, offset: i64) -> Vector2 {
    let width = (arena.width as i64).max(1);
    let height = arena.height as i64;
    let offset = offset.max(1);

    let x = rng.gen_range(0..width);
    let y = if rng.gen_bool(0.5) {
        rng.gen_range(height..height + offset)
    } else {
        rng.gen_range(-offset..0)
    };

    Vector2::new(x as f64, y as f64)
}

/// Spawn this wave's enemies into `enemies` and return how many were added.
///
/// Boss waves add a single boss and nothing else. Other waves add between 1
/// and `max_per_wave` basic enemies, plus a tank half the time from wave
/// `TANK_MIN_WAVE` on.
pub fn spawn_enemies(
    rng: &mut impl Rng,
    enemies: &mut Vec<Enemy>,
    wave: u32,
    max_per_wave: u32,
    config: &Config,
    assets: &mut Assets,
) -> Result<usize, AssetError> {
    let arena = config.arena();
    let before = enemies.len();

    if wave > 0 && wave % BOSS_WAVE_INTERVAL == 0 {
        let at = spawn_position(rng, arena, ENEMY_SPAWN_OFFSET);
        enemies.push(Enemy::new(EnemyKind::Boss, at.x, at.y, config, assets)?);
        debug!(wave, "boss spawned");
        return Ok(1);
    }

    let count = rng.gen_range(1..=max_per_wave.max(1));
    for _ in 0..count {
        let at = spawn_position(rng, arena, ENEMY_SPAWN_OFFSET);
        enemies.push(Enemy::new(EnemyKind::Basic, at.x, at.y, config, assets)?);
    }

    if wave >= TANK_MIN_WAVE && rng.gen_bool(TANK_CHANCE) {
        let at = spawn_position(rng, arena, ENEMY_SPAWN_OFFSET);
        enemies.push(Enemy::new(EnemyKind::Tank, at.x, at.y, config, assets)?);
    }

    let added = enemies.len() - before;
    debug!(wave, added, "enemies spawned");
    Ok(added)
}

/// Spawn between 1 and `max_per_wave` pickups of uniformly chosen kinds at
/// random points inside the arena, and return how many were added.
pub fn spawn_pickups(
    rng: &mut impl Rng,
    pickups: &mut Vec<Pickup>,
    max_per_wave: u32,
    arena: Arena,
    assets: &mut Assets,
) -> Result<usize, AssetError> {
    let count = rng.gen_range(1..=max_per_wave.max(1));
    let (x_min, x_max) = inset_range(arena.width, PICKUP_SPAWN_INSET);
    let (y_min, y_max) = inset_range(arena.height, PICKUP_SPAWN_INSET);

    for _ in 0..count {
        let kind = &PICKUP_TYPES[rng.gen_range(0..PICKUP_TYPES.len())];
        let x = rng.gen_range(x_min..x_max);
        let y = rng.gen_range(y_min..y_max);
        pickups.push(Pickup::new(kind, x as f64, y as f64, assets)?);
    }

    debug!(count, "pickups spawned");
    Ok(count as usize)
}

/// `[inset, size - inset)`, or the whole axis when the arena is too small.
fn inset_range(size: f64, inset: i64) -> (i64, i64) {
    let size = (size as i64).max(1);
    if size > inset * 2 {
        (inset, size - inset)
    } else {
        (0, size)
    }
}
