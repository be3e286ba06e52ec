//! Stationary collectibles that apply one effect to the player, once.

use crate::assets::{Assets, AudioBackend, AudioKind, SoundId, Sprite};
use crate::error::AssetError;
use crate::geometry::{bounding_rect, CollisionRect, Placement};
use crate::player::Player;

/// Upper bound for the player's critical chance (percent).
pub const MAX_CRITICAL_CHANCE: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PickupEffect {
    /// Restore hit points.
    Health { amount: f64 },
    /// Multiply base projectile damage.
    Damage { multiplier: f64 },
    /// Add percentage points of critical chance.
    CriticalChance { amount: f64 },
    /// Add to the critical damage multiplier.
    CriticalModifier { amount: f64 },
}

impl PickupEffect {
    pub fn name(&self) -> &'static str {
        match self {
            PickupEffect::Health { .. } => "health",
            PickupEffect::Damage { .. } => "damage",
            PickupEffect::CriticalChance { .. } => "critical_chance",
            PickupEffect::CriticalModifier { .. } => "critical_modifier",
        }
    }

    pub fn apply(&self, player: &mut Player) {
        match *self {
            PickupEffect::Health { amount } => player.offset_hp(amount),
            PickupEffect::Damage { multiplier } => player.attack.damage *= multiplier,
            PickupEffect::CriticalChance { amount } => {
                let chance = player.attack.critical_chance + amount;
                player.attack.critical_chance = chance.min(MAX_CRITICAL_CHANCE);
            }
            PickupEffect::CriticalModifier { amount } => player.attack.critical_modifier += amount,
        }
    }
}

/// Everything needed to spawn one kind of pickup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickupType {
    pub effect: PickupEffect,
    pub sprite: &'static str,
    pub sound: &'static str,
    pub volume: f64,
}

pub const PICKUP_TYPES: [PickupType; 4] = [
    PickupType {
        effect: PickupEffect::Health { amount: 20.0 },
        sprite: "pill_blue",
        sound: "pickup.wav",
        volume: 0.5,
    },
    PickupType {
        effect: PickupEffect::Damage { multiplier: 1.1 },
        sprite: "bolt_bronze",
        sound: "pickup.wav",
        volume: 0.5,
    },
    PickupType {
        effect: PickupEffect::CriticalModifier { amount: 0.5 },
        sprite: "blue_box_bolt",
        sound: "pickup.wav",
        volume: 0.5,
    },
    PickupType {
        effect: PickupEffect::CriticalChance { amount: 5.0 },
        sprite: "blue_box_star",
        sound: "pickup.wav",
        volume: 0.5,
    },
];

#[derive(Clone, Debug)]
pub struct Pickup {
    pub placement: Placement,
    pub collision: CollisionRect,
    pub sprite: Sprite,
    pub effect: PickupEffect,
    pub sound: SoundId,
    pub disabled: bool,
}

impl Pickup {
    pub fn new(kind: &PickupType, x: f64, y: f64, assets: &mut Assets) -> Result<Pickup, AssetError> {
        let sprite = assets.sprite(kind.sprite)?;
        let sound = assets.sound_with_volume(kind.sound, AudioKind::of_file(kind.sound)?, kind.volume)?;

        let placement = Placement::new(x, y, 1.0);
        let collision = bounding_rect(
            placement.position,
            sprite.width,
            sprite.height,
            placement.scale,
            true,
            true,
        );

        Ok(Pickup {
            placement,
            collision,
            sprite,
            effect: kind.effect,
            sound,
            disabled: false,
        })
    }

    /// Apply the effect if the live player touches the pickup. Returns true
    /// on the frame the effect was applied.
    pub fn update(&mut self, player: &mut Player, audio: &mut dyn AudioBackend) -> bool {
        if self.disabled || player.disabled {
            return false;
        }
        if !self.collision.overlaps(&player.character.collision) {
            return false;
        }

        audio.play(self.sound);
        self.effect.apply(player);
        self.disabled = true;
        true
    }
}
