//! Projectiles: straight-line movers that resolve hits against the opposing
//! faction only.

use crate::assets::{AudioBackend, SoundId, Sprite};
use crate::enemy::Enemy;
use crate::entities::{AttackProfile, DamageKind, DamageNumber, Faction, Score};
use crate::geometry::{
    bounding_rect, distance_and_direction, heading_degrees, Arena, CollisionRect, Placement,
    Vector2,
};
use crate::player::Player;

/// Collision padding (x0, y0, x1, y1) around the projectile sprite.
const PADDING: (i32, i32, i32, i32) = (-20, 20, 20, 20);

#[derive(Clone, Debug)]
pub struct Projectile {
    pub placement: Placement,
    pub collision: CollisionRect,
    pub sprite: Sprite,
    /// Arena units travelled per tick.
    pub velocity: f64,
    /// Unit vector fixed at creation; projectiles never steer.
    pub direction: Vector2,
    pub owner: Faction,
    /// Where the shot was aimed when fired.
    pub target: Vector2,
    pub damage: f64,
    pub critical: bool,
    pub hit_sound: SoundId,
    pub disabled: bool,
}

impl Projectile {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        owner: Faction,
        sprite: Sprite,
        origin: Vector2,
        target: Vector2,
        velocity: f64,
        damage: f64,
        critical: bool,
        hit_sound: SoundId,
    ) -> Self {
        let (dx, dy, _) = distance_and_direction(origin, target);
        let mut placement = Placement::new(origin.x, origin.y, 1.0);
        placement.angle = heading_degrees(dx, dy, -90.0);

        let mut projectile = Projectile {
            placement,
            collision: CollisionRect::default(),
            sprite,
            velocity,
            direction: Vector2::new(dx, dy),
            owner,
            target,
            damage,
            critical,
            hit_sound,
            disabled: false,
        };
        projectile.refresh_collision();
        projectile
    }

    /// Shot built from an attack profile, leaving `origin` toward `target`.
    pub fn fire(
        owner: Faction,
        attack: &AttackProfile,
        origin: Vector2,
        target: Vector2,
        damage: f64,
        critical: bool,
    ) -> Self {
        Self::new(
            owner,
            attack.projectile_sprite.clone(),
            origin,
            target,
            attack.velocity,
            damage,
            critical,
            attack.hit_sound,
        )
    }

    /// Advance one frame and resolve hits. Returns the damage dealt, if any.
    pub fn update(
        &mut self,
        player: &mut Player,
        enemies: &mut [Enemy],
        score: &mut Score,
        audio: &mut dyn AudioBackend,
    ) -> Option<DamageNumber> {
        if self.disabled {
            return None;
        }
        self.update_movement();
        self.resolve_collisions(player, enemies, score, audio)
    }

    pub fn update_movement(&mut self) {
        self.placement.position.x += self.direction.x * self.velocity;
        self.placement.position.y += self.direction.y * self.velocity;
        self.refresh_collision();
    }

    /// True once the projectile is further outside the arena than its own
    /// sprite size on any side.
    pub fn is_out_of_bounds(&self, arena: Arena) -> bool {
        let Vector2 { x, y } = self.placement.position;
        let (w, h) = (self.sprite.width, self.sprite.height);
        x < -w || x > arena.width + w || y < -h || y > arena.height + h
    }

    /// Enemy shots test the player; player shots test every live enemy, but
    /// `disabled` is re-checked before each enemy so one shot lands at most once.
    pub fn resolve_collisions(
        &mut self,
        player: &mut Player,
        enemies: &mut [Enemy],
        score: &mut Score,
        audio: &mut dyn AudioBackend,
    ) -> Option<DamageNumber> {
        if self.disabled {
            return None;
        }

        match self.owner {
            Faction::Enemy => {
                if player.disabled || !self.collision.overlaps(&player.character.collision) {
                    return None;
                }
                audio.play(self.hit_sound);
                player.offset_hp(-self.damage);
                self.disabled = true;
                Some(self.damage_number(player.character.placement.position, DamageKind::Hurt))
            }
            Faction::Player => {
                let mut hit = None;
                for enemy in enemies.iter_mut() {
                    if self.disabled || enemy.disabled {
                        continue;
                    }
                    if !self.collision.overlaps(&enemy.character.collision) {
                        continue;
                    }

                    audio.play(self.hit_sound);
                    enemy.offset_hp(-self.damage);
                    self.disabled = true;

                    if enemy.disabled {
                        score.add(enemy.worth_points);
                    }

                    let kind = if self.critical {
                        DamageKind::Critical
                    } else {
                        DamageKind::Normal
                    };
                    hit = Some(self.damage_number(enemy.character.placement.position, kind));
                }
                hit
            }
        }
    }

    fn damage_number(&self, at: Vector2, kind: DamageKind) -> DamageNumber {
        DamageNumber {
            amount: self.damage,
            x: at.x,
            y: at.y,
            kind,
            ticks: 0,
        }
    }

    fn refresh_collision(&mut self) {
        let (x0, y0, x1, y1) = PADDING;
        self.collision = bounding_rect(
            self.placement.position,
            self.sprite.width,
            self.sprite.height,
            self.placement.scale,
            true,
            true,
        )
        .padded(x0, y0, x1, y1);
    }
}
