//! The player ship: input-driven movement, cursor aiming and firing.

use rand::Rng;

use crate::assets::{Assets, AudioBackend, AudioKind};
use crate::config::{non_negative, positive, Config};
use crate::entities::{AttackProfile, Character, Faction, Health};
use crate::error::AssetError;
use crate::geometry::{
    bounding_rect, clamp_to_bounds, distance_and_direction, heading_degrees, Arena, Placement,
    ARENA_MARGIN,
};
use crate::input::FrameInput;
use crate::projectile::Projectile;
use crate::timer::Timer;

// ── Tuning ────────────────────────────────────────────────────────────────────

const SPEED: f64 = 10.0;
const SCALE: f64 = 0.6;
const HP: f64 = 100.0;
const FIRE_RATE: f64 = 6.0;
const PROJECTILE_SPEED: f64 = 10.0;
const DAMAGE: f64 = 5.0;
const CRITICAL_CHANCE: f64 = 5.0;
const CRITICAL_MODIFIER: f64 = 2.0;

/// Collision padding (x0, y0, x1, y1): the hull overhangs the sprite's nose.
const PADDING: (i32, i32, i32, i32) = (-5, -25, 2, 5);

#[derive(Clone, Debug)]
pub struct Player {
    pub character: Character,
    pub attack: AttackProfile,
    /// -1 turning left, +1 turning right, 0 steady. Drives orientation easing only.
    pub turning: i8,
    /// Set once health reaches zero; never cleared for this instance.
    pub disabled: bool,
}

impl Player {
    /// Spawn at the arena centre with default stats, then apply the configured overrides.
    pub fn new(config: &Config, assets: &mut Assets) -> Result<Player, AssetError> {
        let sprite = assets.sprite("player")?;
        let projectile_sprite = assets.sprite("laser_blue")?;
        let fire_sound = assets.sound("laser.wav", AudioKind::Wav)?;
        let hit_sound = assets.sound("damage2.wav", AudioKind::Wav)?;

        let center = config.arena().center();
        let mut player = Player {
            character: Character {
                placement: Placement::new(center.x, center.y, SCALE),
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
                critical_chance: CRITICAL_CHANCE,
                critical_modifier: CRITICAL_MODIFIER,
                cooldown: Timer::new(0),
                fire_sound: Some(fire_sound),
                hit_sound,
            },
            turning: 0,
            disabled: false,
        };

        let overrides = &config.player;
        if let Some(volume) = non_negative(overrides.attack_volume) {
            assets.audio.set_volume(fire_sound, volume);
        }
        if let Some(scale) = positive(overrides.scale) {
            player.character.placement.scale = scale;
        }
        if let Some(hp) = positive(overrides.hp) {
            player.character.health = Health::full(hp);
        }
        if let Some(rate) = positive(overrides.fire_rate) {
            player.attack.fire_rate = rate;
        }
        if let Some(speed) = non_negative(overrides.projectile_speed) {
            player.attack.velocity = speed;
        }
        if let Some(damage) = positive(overrides.projectile_damage) {
            player.attack.damage = damage;
        }

        player.attack.rebuild_cooldown();
        player.refresh_collision();
        Ok(player)
    }

    /// One simulation frame. Returns the projectile fired this frame, if any.
    pub fn update(
        &mut self,
        input: &FrameInput,
        arena: Arena,
        rng: &mut impl Rng,
        audio: &mut dyn AudioBackend,
    ) -> Option<Projectile> {
        if self.disabled {
            return None;
        }
        self.update_movement(input, arena);
        self.update_attack(input, rng, audio)
    }

    pub fn update_movement(&mut self, input: &FrameInput, arena: Arena) {
        let speed = self.character.speed;
        let position = &mut self.character.placement.position;

        let mut turning = 0;
        if input.up {
            position.y -= speed;
        }
        if input.down {
            position.y += speed;
        }
        if input.left {
            position.x -= speed;
            turning = -1;
        }
        if input.right {
            position.x += speed;
            turning = 1;
        }

        // Ease back toward upright when not steering.
        if turning == 0 {
            let angle = self.character.placement.angle;
            if angle > 0.0 {
                turning = -1;
            } else if angle < 0.0 {
                turning = 1;
            }
        }
        self.turning = turning;

        let (dx, dy, _) = distance_and_direction(*position, input.cursor);
        self.character.placement.angle = heading_degrees(dx, dy, 90.0);

        let (x, y) = clamp_to_bounds(
            position.x,
            position.y,
            self.character.sprite.width,
            self.character.sprite.height,
            self.character.placement.scale,
            ARENA_MARGIN,
            arena,
        );
        position.x = x;
        position.y = y;

        self.refresh_collision();
    }

    pub fn update_attack(
        &mut self,
        input: &FrameInput,
        rng: &mut impl Rng,
        audio: &mut dyn AudioBackend,
    ) -> Option<Projectile> {
        self.attack.cooldown.update();
        if !self.attack.cooldown.is_ready() || !input.fire {
            return None;
        }
        self.attack.cooldown.reset();

        let (damage, critical) = self.attack.roll_damage(rng);
        let projectile = Projectile::fire(
            Faction::Player,
            &self.attack,
            self.character.muzzle(),
            input.cursor,
            damage,
            critical,
        );

        if let Some(sound) = self.attack.fire_sound {
            audio.play(sound);
        }
        Some(projectile)
    }

    /// Add `delta` to health, clamped into `[0, max]`. Reaching zero disables
    /// the player for good; a disabled player ignores further offsets.
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
