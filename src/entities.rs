//! Shared entity building blocks: plain data plus the small invariants
//! (health bounds, monotonic best score) every entity relies on.

use rand::Rng;

use crate::assets::{SoundId, Sprite};
use crate::geometry::{CollisionRect, Placement, Vector2};
use crate::timer::Timer;

// ── Enumerations ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    /// Main menu; entities idle.
    Initial,
    Playing,
    Paused,
    /// Player destroyed; only restart or the main menu leave this state.
    Death,
}

/// Which side fired a projectile. Projectiles only hurt the other side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Faction {
    Player,
    Enemy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    Basic,
    Tank,
    Boss,
}

impl EnemyKind {
    pub fn sprite_name(&self) -> &'static str {
        match self {
            EnemyKind::Basic | EnemyKind::Tank => "enemy",
            EnemyKind::Boss => "boss",
        }
    }
}

// ── Health ────────────────────────────────────────────────────────────────────

/// Bounded hit points. `0 <= current <= max` holds after every call.
#[derive(Clone, Debug, PartialEq)]
pub struct Health {
    pub max: f64,
    pub current: f64,
}

impl Health {
    pub fn full(max: f64) -> Self {
        Health { max, current: max }
    }

    /// Add `delta` and clamp into `[0, max]`. Returns true when the pool is empty.
    /// A NaN delta leaves the pool unchanged.
    pub fn offset(&mut self, delta: f64) -> bool {
        let next = self.current + delta;
        self.current = if next.is_nan() {
            self.current
        } else if next <= 0.0 {
            0.0
        } else if next > self.max {
            self.max
        } else {
            next
        };
        self.is_depleted()
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// Fraction of health left, in `[0, 1]`.
    pub fn ratio(&self) -> f64 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }
}

// ── Attack profile ────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct AttackProfile {
    pub projectile_sprite: Sprite,
    /// Shots per second; the cooldown lasts `1000 / fire_rate` ms.
    pub fire_rate: f64,
    /// Projectile speed in arena units per tick.
    pub velocity: f64,
    pub damage: f64,
    /// Percent chance in `[0, 100]` that a shot is critical.
    pub critical_chance: f64,
    pub critical_modifier: f64,
    pub cooldown: Timer,
    /// Played when the shot is fired.
    pub fire_sound: Option<SoundId>,
    /// Played when a shot from this profile lands.
    pub hit_sound: SoundId,
}

impl AttackProfile {
    /// Rebuild the cooldown from the current fire rate.
    pub fn rebuild_cooldown(&mut self) {
        self.cooldown = Timer::from_rate(self.fire_rate);
    }

    /// Roll a uniform `[0, 100)` draw against the critical chance.
    /// Returns the damage to deal and whether the shot was critical.
    pub fn roll_damage(&self, rng: &mut impl Rng) -> (f64, bool) {
        let draw = rng.gen::<f64>() * 100.0;
        if draw < self.critical_chance {
            (self.damage * self.critical_modifier, true)
        } else {
            (self.damage, false)
        }
    }
}

// ── Character ─────────────────────────────────────────────────────────────────

/// Position, movement speed, sprite bounds and health shared by the player
/// and every enemy.
#[derive(Clone, Debug)]
pub struct Character {
    pub placement: Placement,
    /// Collision box for the current frame.
    pub collision: CollisionRect,
    /// Linear speed in arena units per tick.
    pub speed: f64,
    pub sprite: Sprite,
    pub health: Health,
}

impl Character {
    pub fn scaled_size(&self) -> (f64, f64) {
        (
            self.sprite.width * self.placement.scale,
            self.sprite.height * self.placement.scale,
        )
    }

    /// Point projectiles leave from: half the sprite's height above centre.
    pub fn muzzle(&self) -> Vector2 {
        Vector2::new(
            self.placement.position.x,
            self.placement.position.y - self.sprite.height / 2.0,
        )
    }
}

// ── Score ─────────────────────────────────────────────────────────────────────

/// Current run score and best score ever seen. `best` never decreases.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Score {
    pub current: i64,
    pub best: i64,
}

impl Score {
    pub fn add(&mut self, points: i64) {
        self.current += points;
        if self.is_high_score() {
            self.best = self.current;
        }
    }

    pub fn is_high_score(&self) -> bool {
        self.current > self.best
    }

    /// Raise the best score to `best` if it is higher (used when loading a save).
    pub fn restore_best(&mut self, best: i64) {
        self.best = self.best.max(best);
    }

    /// Start a new run, keeping the best score.
    pub fn reset_current(&mut self) {
        self.current = 0;
    }
}

// ── Transient UI ──────────────────────────────────────────────────────────────

/// Frames a damage number stays on screen.
pub const DAMAGE_NUMBER_TICKS: u32 = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageKind {
    Normal,
    Critical,
    /// Damage taken by the player.
    Hurt,
}

/// Floating number shown where a projectile landed.
#[derive(Clone, Debug, PartialEq)]
pub struct DamageNumber {
    pub amount: f64,
    pub x: f64,
    pub y: f64,
    pub kind: DamageKind,
    pub ticks: u32,
}

impl DamageNumber {
    pub fn is_expired(&self) -> bool {
        self.ticks > DAMAGE_NUMBER_TICKS
    }

    /// Opacity in `[0, 1]`: fully visible until the last 100 ticks, then fading.
    pub fn alpha(&self) -> f64 {
        ((DAMAGE_NUMBER_TICKS as f64 - self.ticks as f64) / 100.0).clamp(0.0, 1.0)
    }
}
