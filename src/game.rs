//! The game aggregate: owns every entity list, runs the per-frame update in a
//! fixed order and drives the Initial / Playing / Paused / Death state machine.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info};

use crate::assets::{Assets, AudioKind, MissingAssetPolicy, SoundId};
use crate::config::Config;
use crate::enemy::Enemy;
use crate::entities::{DamageKind, DamageNumber, GameState, Score};
use crate::error::GameError;
use crate::geometry::{Arena, CollisionRect};
use crate::input::FrameInput;
use crate::pickup::{Pickup, PICKUP_TYPES};
use crate::player::Player;
use crate::projectile::Projectile;
use crate::save::Save;
use crate::spawner;
use crate::surface::{Surface, Tint};
use crate::timer::{Timer, TICKS_PER_SECOND};

/// Sprites referenced after startup; checked up front so a missing one is fatal
/// at launch instead of mid-session.
const SESSION_SPRITES: &[&str] = &["enemy", "boss", "laser_red"];

/// Enemy health bar: gap above the collision box and bar height, arena units.
const HP_BAR_OFFSET: i32 = 20;
const HP_BAR_HEIGHT: i32 = 8;

/// Menu-level actions that move the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    TogglePause,
    Start,
    Restart,
    MainMenu,
}

pub struct Game {
    pub config: Config,
    pub arena: Arena,
    pub rng: StdRng,
    pub assets: Assets,
    save: Save,
    pub music: SoundId,

    pub state: GameState,
    pub score: Score,
    pub current_wave: u32,
    pub has_saved_on_death: bool,

    pub enemy_spawn_timer: Timer,
    pub pickup_spawn_timer: Timer,
    /// Ticks in every state; drives music looping and the cleanup sweep.
    pub one_second_timer: Timer,

    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    pub damage_numbers: Vec<DamageNumber>,
}

impl Game {
    /// Build a session in the `Initial` state. Any missing asset aborts here;
    /// once built, missing assets are replaced by placeholders.
    pub fn new(config: Config, mut assets: Assets, save: Save) -> Result<Game, GameError> {
        assets.policy = MissingAssetPolicy::Abort;

        for name in SESSION_SPRITES {
            assets.sprite(name)?;
        }
        for kind in &PICKUP_TYPES {
            assets.sprite(kind.sprite)?;
            assets.sound(kind.sound, AudioKind::of_file(kind.sound)?)?;
        }
        assets.sound("damage1.mp3", AudioKind::Mp3)?;

        let music = assets.sound_with_volume("music.mp3", AudioKind::Mp3, config.music_volume)?;
        let player = Player::new(&config, &mut assets)?;

        let seed = config.resolved_seed();
        let mut score = Score::default();
        if let Some(best) = save.load_high_score() {
            score.restore_best(best);
        }

        let mut enemy_spawn_timer = Timer::from_duration(secs(config.enemy_spawn_secs));
        enemy_spawn_timer.trigger_now();

        assets.policy = MissingAssetPolicy::Placeholder;
        assets.audio.play(music);
        info!(seed, best = score.best, "game created");

        Ok(Game {
            arena: config.arena(),
            rng: StdRng::seed_from_u64(seed),
            pickup_spawn_timer: Timer::from_duration(secs(config.pickup_spawn_secs)),
            one_second_timer: Timer::new(TICKS_PER_SECOND),
            config,
            assets,
            save,
            music,
            state: GameState::Initial,
            score,
            current_wave: 0,
            has_saved_on_death: false,
            enemy_spawn_timer,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            damage_numbers: Vec::new(),
        })
    }

    // ── Frame update ──────────────────────────────────────────────────────────

    /// Advance one tick: apply menu input, simulate if `Playing`, age transient
    /// UI, run the once-a-second sweep and detect death.
    pub fn update(&mut self, input: &FrameInput) {
        self.handle_menu_input(input);

        if self.state == GameState::Playing {
            self.simulate(input);
        }

        self.age_damage_numbers();
        self.tick_one_second();
        self.check_death();
    }

    fn handle_menu_input(&mut self, input: &FrameInput) {
        if input.pause_pressed {
            self.apply(MenuAction::TogglePause);
        }
        if input.confirm_pressed {
            match self.state {
                GameState::Initial => {
                    self.apply(MenuAction::Start);
                }
                GameState::Death => {
                    self.apply(MenuAction::Restart);
                }
                _ => {}
            }
        }
        if input.menu_pressed {
            self.apply(MenuAction::MainMenu);
        }
    }

    fn simulate(&mut self, input: &FrameInput) {
        let audio = self.assets.audio.as_mut();

        if let Some(shot) = self.player.update(input, self.arena, &mut self.rng, audio) {
            self.projectiles.push(shot);
        }

        for pickup in &mut self.pickups {
            pickup.update(&mut self.player, audio);
        }

        for enemy in &mut self.enemies {
            if let Some(shot) = enemy.update(&self.player) {
                self.projectiles.push(shot);
            }
        }

        for projectile in &mut self.projectiles {
            let hit = projectile.update(&mut self.player, &mut self.enemies, &mut self.score, audio);
            if let Some(number) = hit {
                self.damage_numbers.push(number);
            }
        }

        self.enemy_spawn_timer.update();
        if self.enemy_spawn_timer.is_ready() {
            self.enemy_spawn_timer.reset();
            if !self.player.disabled {
                self.next_wave();
            }
        }

        self.pickup_spawn_timer.update();
        if self.pickup_spawn_timer.is_ready() {
            self.pickup_spawn_timer.reset();
            if !self.player.disabled {
                let spawned = spawner::spawn_pickups(
                    &mut self.rng,
                    &mut self.pickups,
                    self.config.max_pickups_per_wave,
                    self.arena,
                    &mut self.assets,
                );
                if let Err(err) = spawned {
                    error!(error = %err, "pickup spawn failed");
                }
            }
        }
    }

    fn next_wave(&mut self) {
        self.current_wave += 1;
        info!(wave = self.current_wave, "wave started");

        let spawned = spawner::spawn_enemies(
            &mut self.rng,
            &mut self.enemies,
            self.current_wave,
            self.config.max_enemies_per_wave,
            &self.config,
            &mut self.assets,
        );
        if let Err(err) = spawned {
            error!(wave = self.current_wave, error = %err, "enemy spawn failed");
        }
    }

    /// Damage numbers drift while the simulation runs or the death screen shows.
    fn age_damage_numbers(&mut self) {
        if !matches!(self.state, GameState::Playing | GameState::Death) {
            return;
        }
        for number in &mut self.damage_numbers {
            number.ticks += 1;
        }
        self.damage_numbers.retain(|n| !n.is_expired());
    }

    fn tick_one_second(&mut self) {
        self.one_second_timer.update();
        if !self.one_second_timer.is_ready() {
            return;
        }
        self.one_second_timer.reset();

        self.assets.audio.resume(self.music);
        self.sweep();
    }

    /// Drop finished entities: disabled or out-of-bounds projectiles, and
    /// disabled enemies and pickups. Order of survivors is preserved.
    pub fn sweep(&mut self) {
        let arena = self.arena;
        self.projectiles
            .retain(|p| !p.disabled && !p.is_out_of_bounds(arena));
        self.enemies.retain(|e| !e.disabled);
        self.pickups.retain(|p| !p.disabled);
    }

    fn check_death(&mut self) {
        if !self.player.disabled {
            return;
        }

        if self.state == GameState::Playing {
            self.state = GameState::Death;
            info!(score = self.score.current, best = self.score.best, "player destroyed");
        }

        if !self.has_saved_on_death {
            self.has_saved_on_death = true;
            match self.save.save_high_score(self.score.best) {
                Ok(written) => debug!(written, "save on death"),
                Err(err) => error!(error = %err, "cannot save high score"),
            }
        }
    }

    // ── State machine ─────────────────────────────────────────────────────────

    /// Apply a menu action. Returns false when the action does not apply to
    /// the current state.
    pub fn apply(&mut self, action: MenuAction) -> bool {
        let next = match (action, self.state) {
            (MenuAction::TogglePause, GameState::Playing) => GameState::Paused,
            (MenuAction::TogglePause, GameState::Paused) => GameState::Playing,
            (MenuAction::Start, GameState::Initial) => GameState::Playing,
            (MenuAction::Restart, GameState::Death) => {
                self.restart();
                return true;
            }
            (MenuAction::MainMenu, GameState::Paused | GameState::Death) => {
                self.restart();
                GameState::Initial
            }
            _ => return false,
        };
        debug!(from = ?self.state, to = ?next, "state change");
        self.state = next;
        true
    }

    /// Fresh `Playing` session: new player, empty entity lists, zeroed score
    /// and wave, reset timers. The best score is kept.
    pub fn restart(&mut self) {
        match Player::new(&self.config, &mut self.assets) {
            Ok(player) => self.player = player,
            Err(err) => error!(error = %err, "cannot rebuild player"),
        }

        self.enemies.clear();
        self.projectiles.clear();
        self.pickups.clear();
        self.damage_numbers.clear();

        self.score.reset_current();
        self.current_wave = 0;
        self.has_saved_on_death = false;

        self.enemy_spawn_timer.reset();
        self.enemy_spawn_timer.trigger_now();
        self.pickup_spawn_timer.reset();
        self.one_second_timer.reset();

        self.state = GameState::Playing;
        info!(best = self.score.best, "session restarted");
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    /// Render the current state. Reads only.
    pub fn draw<S: Surface>(&self, surface: &mut S) {
        for projectile in &self.projectiles {
            if !projectile.disabled {
                surface.draw_sprite(&projectile.sprite, &projectile.placement);
            }
        }
        if !self.player.disabled {
            surface.draw_sprite(&self.player.character.sprite, &self.player.character.placement);
        }
        for enemy in self.enemies.iter().filter(|e| !e.disabled) {
            surface.draw_sprite(&enemy.character.sprite, &enemy.character.placement);
        }
        for pickup in self.pickups.iter().filter(|p| !p.disabled) {
            surface.draw_sprite(&pickup.sprite, &pickup.placement);
        }

        if self.config.draw_collision_rects {
            self.draw_collision_rects(surface);
        }

        match self.state {
            GameState::Initial => self.draw_main_menu(surface),
            GameState::Playing => {
                self.draw_enemy_health_bars(surface);
                self.draw_hud(surface);
            }
            GameState::Paused => {
                self.draw_enemy_health_bars(surface);
                self.draw_hud(surface);
                self.draw_overlay(surface, "PAUSED", "ESC resume   M main menu   Q quit");
            }
            GameState::Death => {
                self.draw_overlay(surface, "YOU DIED", "SPACE restart   M main menu   ESC quit");
            }
        }

        if self.state != GameState::Initial {
            self.draw_damage_numbers(surface);
            self.draw_score(surface);
        }
    }

    fn draw_collision_rects<S: Surface>(&self, surface: &mut S) {
        if !self.player.disabled {
            surface.stroke_rect(&self.player.character.collision, Tint::Blue);
        }
        for enemy in self.enemies.iter().filter(|e| !e.disabled) {
            surface.stroke_rect(&enemy.character.collision, Tint::Red);
        }
        for projectile in self.projectiles.iter().filter(|p| !p.disabled) {
            surface.stroke_rect(&projectile.collision, Tint::Green);
        }
        for pickup in self.pickups.iter().filter(|p| !p.disabled) {
            surface.stroke_rect(&pickup.collision, Tint::Yellow);
        }
    }

    /// Outlined bar above each live enemy, filled by remaining health.
    fn draw_enemy_health_bars<S: Surface>(&self, surface: &mut S) {
        for enemy in self.enemies.iter().filter(|e| !e.disabled) {
            let rect = &enemy.character.collision;
            let top = rect.y0 - HP_BAR_OFFSET;
            surface.stroke_rect(
                &CollisionRect::new(rect.x0, top, rect.x1, top + HP_BAR_HEIGHT),
                Tint::White,
            );

            let width = (rect.x1 - rect.x0) as f64 * enemy.character.health.ratio();
            let right = rect.x0 + width.round() as i32;
            if right > rect.x0 + 1 {
                surface.fill_rect(
                    &CollisionRect::new(rect.x0 + 1, top + 1, right, top + HP_BAR_HEIGHT),
                    Tint::Red,
                );
            }
        }
    }

    fn draw_main_menu<S: Surface>(&self, surface: &mut S) {
        let cx = self.arena.width / 2.0;
        let cy = self.arena.height / 2.0;
        surface.draw_text("SPACE SHOOTER", cx, cy - 120.0, Tint::Cyan);
        if self.score.best > 0 {
            surface.draw_text(&format!("best: {}", self.score.best), cx, cy - 80.0, Tint::Yellow);
        }
        surface.draw_text("SPACE start   Q quit", cx, cy, Tint::White);
        surface.draw_text(
            "WASD move   mouse aim   SPACE / click fire   ESC pause",
            cx,
            cy + 60.0,
            Tint::Grey,
        );
    }

    fn draw_hud<S: Surface>(&self, surface: &mut S) {
        let health = &self.player.character.health;
        let attack = &self.player.attack;
        let bottom = self.arena.height - 30.0;

        surface.draw_text(
            &format!("HP {}/{}", trim_number(health.current), trim_number(health.max)),
            self.arena.width / 2.0,
            bottom,
            if health.ratio() < 0.3 { Tint::Red } else { Tint::Green },
        );
        surface.draw_text(&format!("Wave {}", self.current_wave), 80.0, 10.0, Tint::White);
        surface.draw_text(
            &format!(
                "DMG {}  CRIT {}%  x{}",
                trim_number(attack.damage),
                trim_number(attack.critical_chance),
                trim_number(attack.critical_modifier)
            ),
            120.0,
            bottom,
            Tint::Grey,
        );
    }

    fn draw_damage_numbers<S: Surface>(&self, surface: &mut S) {
        for number in &self.damage_numbers {
            let tint = match number.kind {
                DamageKind::Critical => Tint::Golden,
                DamageKind::Hurt => Tint::Red,
                DamageKind::Normal if number.alpha() < 0.5 => Tint::Grey,
                DamageKind::Normal => Tint::White,
            };
            surface.draw_text(
                &trim_number(number.amount),
                number.x,
                number.y - number.ticks as f64,
                tint,
            );
        }
    }

    fn draw_overlay<S: Surface>(&self, surface: &mut S, title: &str, hint: &str) {
        let cx = self.arena.width / 2.0;
        let cy = self.arena.height / 2.0;
        surface.draw_text(title, cx, cy - 40.0, Tint::Red);
        surface.draw_text(hint, cx, cy + 20.0, Tint::White);
    }

    fn draw_score<S: Surface>(&self, surface: &mut S) {
        let cx = self.arena.width / 2.0;
        surface.draw_text(&self.score.current.to_string(), cx, 10.0, Tint::Cyan);
        surface.draw_text(&format!("best: {}", self.score.best), cx, 40.0, Tint::Cyan);
    }
}

fn secs(n: u64) -> std::time::Duration {
    std::time::Duration::from_secs(n)
}

/// Two decimals at most, trailing zeros dropped ("12.50" -> "12.5", "5.00" -> "5").
fn trim_number(value: f64) -> String {
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
