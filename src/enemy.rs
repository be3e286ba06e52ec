//! Enemies: distance-banded approach/retreat/hold AI and cooldown-gated fire
//! at the player's position.

use crate::assets::{Assets, AudioKind};
use crate::config::{non_negative, positive, Config};
use crate::entities::{AttackProfile, Character, EnemyKind, Faction, Health};
use crate::error::AssetError;
use crate::geometry::{bounding_rect, distance_and_direction, heading_degrees, Placement, Vector2};
use crate::player::Player;
use crate::projectile::Projectile;
use crate::timer::Timer;

// ── Tuning ────────────────────────────────────────────────────────────────────

const SPEED: f64 = 1.0;
/// Extra speed while retreating.
const RETREAT_BONUS: f64 = 1.0;
const SCALE: f64 = 0.6;
const HP: f64 = 10.0;
const FIRE_RATE: f64 = 0.5;
const PROJECTILE_SPEED: f64 = 5.0;
const DAMAGE: f64 = 10.0;
const WORTH_POINTS: i64 = 10;
const MIN_LENGTH_FROM_PLAYER: f64 = 200.0;
/// Width of the hold band beyond `min_length_from_player`.
const HOLD_BAND: f64 = 100.0;

const PADDING: (i32, i32, i32, i32) = (-10, -10, 15, 10);

#[derive(Clone, Debug)]
pub struct Enemy {
    pub character: Character,
    pub attack: AttackProfile,
    pub kind: EnemyKind,
    pub worth_points: i64,
    /// Closer than this the enemy retreats.
    pub min_length_from_player: f64,
    pub is_running_away: bool,
    pub is_stopped: bool,
    pub disabled: bool,
}

impl Enemy {
    /// Spawn at `(x, y)` with full health. Configured overrides apply first,
    /// then the kind's multipliers (once).
    pub fn new(
        kind: EnemyKind,
        x: f64,
        y: f64,
        config: &Config,
        assets: &mut Assets,
    ) -> Result<Enemy, AssetError> {
        let sprite = assets.sprite(kind.sprite_name())?;
        let projectile_sprite = assets.sprite("laser_red")?;
        let hit_sound = assets.sound("damage1.mp3", AudioKind::Mp3)?;

        let mut enemy = Enemy {
            character: Character {
                placement: Placement::new(x, y, SCALE),
                collision: Default::default(),
                speed: SPEED,
                sprite,
                health: Health::full(HP),
            },
            attack: AttackProfile {
                projectile_sprite,
                fire_rate: FIRE_RATE,
                velocity: PROJECTILE_SPEED,
                damage: DAMAGE,
                critical_chance: 0.0,
                critical_modifier: 0.0,
                cooldown: Timer::new(0),
                fire_sound: None,
                hit_sound,
            },
            kind,
            worth_points: WORTH_POINTS,
            min_length_from_player: MIN_LENGTH_FROM_PLAYER,
            is_running_away: false,
            is_stopped: false,
            disabled: false,
        };

        let overrides = &config.enemy;
        if let Some(scale) = positive(overrides.scale) {
            enemy.character.placement.scale = scale;
        }
        if let Some(hp) = positive(overrides.hp) {
            enemy.character.health = Health::full(hp);
        }
        if let Some(rate) = positive(overrides.fire_rate) {
            enemy.attack.fire_rate = rate;
        }
        if let Some(speed) = non_negative(overrides.projectile_speed) {
            enemy.attack.velocity = speed;
        }
        if let Some(damage) = positive(overrides.projectile_damage) {
            enemy.attack.damage = damage;
        }
        if let Some(points) = positive(overrides.point_worth) {
            enemy.worth_points = points as i64;
        }

        enemy.apply_kind();
        enemy.attack.rebuild_cooldown();
        enemy.refresh_collision();
        Ok(enemy)
    }

    fn apply_kind(&mut self) {
        let health = &mut self.character.health;
        match self.kind {
            EnemyKind::Basic => {}
            EnemyKind::Tank => {
                self.character.placement.scale = 1.0;
                *health = Health::full(health.max * 3.0);
            }
            EnemyKind::Boss => {
                self.character.placement.scale = 1.0;
                *health = Health::full(health.max * 20.0);
                self.attack.fire_rate *= 6.0;
                self.attack.damage *= 3.0;
            }
        }
    }

    /// One simulation frame: move, then maybe fire at the player.
    pub fn update(&mut self, player: &Player) -> Option<Projectile> {
        if self.disabled {
            return None;
        }
        self.update_movement(player.character.placement.position, player.disabled);
        self.update_attack(player.character.placement.position, player.disabled)
    }

    /// Pick retreat, hold or approach from the distance to the player, then move.
    pub fn update_movement(&mut self, player_position: Vector2, player_disabled: bool) {
        let (mut dx, mut dy, length) =
            distance_and_direction(self.character.placement.position, player_position);

        if player_disabled || length < self.min_length_from_player {
            dx = -dx;
            dy = -dy;
            self.is_running_away = true;
            self.is_stopped = false;
        } else if (self.is_running_away || self.is_stopped)
            && length < self.min_length_from_player + HOLD_BAND
        {
            self.is_running_away = false;
            self.is_stopped = true;
        } else {
            self.is_running_away = false;
            self.is_stopped = false;
        }

        let speed = if self.is_running_away {
            self.character.speed + RETREAT_BONUS
        } else {
            self.character.speed
        };

        if !self.is_stopped {
            let position = &mut self.character.placement.position;
            position.x += dx * speed;
            position.y += dy * speed;
        }

        self.character.placement.angle = heading_degrees(dx, dy, -90.0);
        self.refresh_collision();
    }

    /// Fire at the player when the cooldown allows. Retreating holds the
    /// cooldown at zero; a dead player is never shot at.
    pub fn update_attack(
        &mut self,
        player_position: Vector2,
        player_disabled: bool,
    ) -> Option<Projectile> {
        if player_disabled {
            return None;
        }

        self.attack.cooldown.update();
        if self.is_running_away {
            self.attack.cooldown.reset();
        }
        if !self.attack.cooldown.is_ready() {
            return None;
        }
        self.attack.cooldown.reset();

        Some(Projectile::fire(
            Faction::Enemy,
            &self.attack,
            self.character.muzzle(),
            player_position,
            self.attack.damage,
            false,
        ))
    }

    /// Add `delta` to health, clamped into `[0, max]`. Reaching zero disables
    /// the enemy for good.
    pub fn offset_hp(&mut self, delta: f64) {
        if self.disabled {
            return;
        }
        if self.character.health.offset(delta) {
            self.disabled = true;
        }
    }

    fn refresh_collision(&mut self) {
        let c = &self.character;
        let (x0, y0, x1, y1) = PADDING;
        self.character.collision = bounding_rect(
            c.placement.position,
            c.sprite.width,
            c.sprite.height,
            c.placement.scale,
            true,
            true,
        )
        .padded(x0, y0, x1, y1);
    }
}
