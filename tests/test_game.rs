mod common;

use common::{config, enemy_at, game, game_with, Harness};
use space_shooter::assets::{
    Assets, MissingAssetPolicy, SilentAudio, SoundId, Sprite, SpriteAtlas, SpriteProvider, PLACEHOLDER_SPRITE,
};
use space_shooter::config::Config;
use space_shooter::entities::{DamageKind, DamageNumber, EnemyKind, Faction, GameState};
use space_shooter::error::{AssetError, GameError};
use space_shooter::game::{Game, MenuAction};
use space_shooter::geometry::{CollisionRect, Placement, Vector2};
use space_shooter::input::FrameInput;
use space_shooter::pickup::{Pickup, PICKUP_TYPES};
use space_shooter::projectile::Projectile;
use space_shooter::save::{MemoryStore, Save, SaveData, HIGHSCORE_KEY};
use space_shooter::surface::{Surface, Tint};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn idle() -> FrameInput {
    FrameInput::idle_at(Vector2::new(640.0, 0.0))
}

fn confirm() -> FrameInput {
    FrameInput {
        confirm_pressed: true,
        ..idle()
    }
}

fn pause() -> FrameInput {
    FrameInput {
        pause_pressed: true,
        ..idle()
    }
}

fn menu() -> FrameInput {
    FrameInput {
        menu_pressed: true,
        ..idle()
    }
}

fn run(game: &mut Game, frames: usize) {
    for _ in 0..frames {
        game.update(&idle());
    }
}

/// Config whose player cannot die from stray shots during long runs.
fn sturdy_config() -> Config {
    let mut cfg = config();
    cfg.player.hp = Some(1e9);
    cfg
}

fn started(cfg: Config) -> Harness {
    let mut h = game_with(cfg, SaveData::new());
    h.game.update(&confirm());
    h
}

#[derive(Default)]
struct RecordingSurface {
    sprites: Vec<String>,
    rects: Vec<Tint>,
    fills: Vec<CollisionRect>,
    texts: Vec<String>,
}

impl Surface for RecordingSurface {
    fn draw_sprite(&mut self, sprite: &Sprite, _placement: &Placement) {
        self.sprites.push(sprite.name.clone());
    }

    fn stroke_rect(&mut self, _rect: &CollisionRect, tint: Tint) {
        self.rects.push(tint);
    }

    fn fill_rect(&mut self, rect: &CollisionRect, _tint: Tint) {
        self.fills.push(*rect);
    }

    fn draw_text(&mut self, text: &str, _x: f64, _y: f64, _tint: Tint) {
        self.texts.push(text.to_string());
    }
}

fn drawn(game: &Game) -> RecordingSurface {
    let mut surface = RecordingSurface::default();
    game.draw(&mut surface);
    surface
}

// ── Construction ──────────────────────────────────────────────────────────────

#[test]
fn new_game_waits_at_main_menu() {
    let h = game();
    assert_eq!(h.game.state, GameState::Initial);
    assert_eq!(h.game.current_wave, 0);
    assert!(h.game.enemies.is_empty());
    assert_eq!(h.game.assets.policy, MissingAssetPolicy::Placeholder);

    let music = h.audio.clip(h.game.music).expect("music loaded");
    assert_eq!(music.file, "music.mp3");
    assert_eq!(music.volume, 0.5);
    assert!(music.playing);
    assert_eq!(music.plays, 1);
}

#[test]
fn best_score_restored_from_save() {
    let mut saved = SaveData::new();
    saved.insert(HIGHSCORE_KEY.to_string(), "300".to_string());
    let h = game_with(config(), saved);
    assert_eq!(h.game.score.best, 300);
    assert_eq!(h.game.score.current, 0);
}

struct MissingBoss(SpriteAtlas);

impl SpriteProvider for MissingBoss {
    fn load(&mut self, name: &str) -> Result<Sprite, AssetError> {
        if name == "boss" {
            return Err(AssetError::UnknownSprite(name.to_string()));
        }
        self.0.load(name)
    }
}

#[test]
fn missing_asset_aborts_startup() {
    let assets = Assets::new(
        Box::new(MissingBoss(SpriteAtlas::new())),
        Box::new(SilentAudio::new()),
    );
    let err = Game::new(config(), assets, Save::new(Box::new(MemoryStore::default())))
        .err()
        .expect("startup must fail");
    assert!(matches!(err, GameError::Asset(AssetError::UnknownSprite(name)) if name == "boss"));
}

#[test]
fn missing_asset_after_startup_uses_placeholder() {
    let mut h = game();
    let sprite = h.game.assets.sprite("no_such_sprite").unwrap();
    assert_eq!(sprite.name, PLACEHOLDER_SPRITE);
}

// ── State machine ─────────────────────────────────────────────────────────────

#[test]
fn menu_is_idle_until_confirmed() {
    let mut h = game();
    run(&mut h.game, 400);
    assert_eq!(h.game.state, GameState::Initial);
    assert_eq!(h.game.current_wave, 0);
    assert!(h.game.enemies.is_empty());
}

#[test]
fn confirm_starts_and_spawns_first_wave() {
    let h = started(config());
    assert_eq!(h.game.state, GameState::Playing);
    assert_eq!(h.game.current_wave, 1);
    assert!((1..=5).contains(&h.game.enemies.len()));
}

#[test]
fn actions_that_do_not_apply_are_ignored() {
    let mut h = game();
    assert!(!h.game.apply(MenuAction::TogglePause));
    assert!(!h.game.apply(MenuAction::Restart));
    assert!(!h.game.apply(MenuAction::MainMenu));
    assert_eq!(h.game.state, GameState::Initial);

    assert!(h.game.apply(MenuAction::Start));
    assert!(!h.game.apply(MenuAction::Start));
    assert!(!h.game.apply(MenuAction::Restart));
    assert!(!h.game.apply(MenuAction::MainMenu));
    assert_eq!(h.game.state, GameState::Playing);
}

#[test]
fn pause_freezes_the_simulation() {
    let mut h = started(sturdy_config());
    run(&mut h.game, 30);

    h.game.update(&pause());
    assert_eq!(h.game.state, GameState::Paused);

    let positions: Vec<Vector2> = h
        .game
        .enemies
        .iter()
        .map(|e| e.character.placement.position)
        .collect();
    let projectiles = h.game.projectiles.len();
    let wave = h.game.current_wave;

    run(&mut h.game, 600);
    let after: Vec<Vector2> = h
        .game
        .enemies
        .iter()
        .map(|e| e.character.placement.position)
        .collect();
    assert_eq!(positions, after);
    assert_eq!(h.game.projectiles.len(), projectiles);
    assert_eq!(h.game.current_wave, wave);

    h.game.update(&pause());
    assert_eq!(h.game.state, GameState::Playing);
}

#[test]
fn main_menu_from_pause_resets_session() {
    let mut h = started(sturdy_config());
    h.game.score.add(30);
    run(&mut h.game, 10);

    h.game.update(&pause());
    h.game.update(&menu());
    assert_eq!(h.game.state, GameState::Initial);
    assert!(h.game.enemies.is_empty());
    assert!(h.game.projectiles.is_empty());
    assert_eq!(h.game.current_wave, 0);
    assert_eq!(h.game.score.current, 0);
    assert_eq!(h.game.score.best, 30);
}

#[test]
fn menu_key_ignored_while_playing() {
    let mut h = started(sturdy_config());
    h.game.update(&menu());
    assert_eq!(h.game.state, GameState::Playing);
    assert_eq!(h.game.current_wave, 1);
}

// ── Waves ─────────────────────────────────────────────────────────────────────

#[test]
fn next_wave_after_spawn_interval() {
    let mut h = started(sturdy_config());

    // 5 s at 60 ticks per second
    run(&mut h.game, 299);
    assert_eq!(h.game.current_wave, 1);
    run(&mut h.game, 1);
    assert_eq!(h.game.current_wave, 2);
}

#[test]
fn tenth_wave_is_a_lone_boss() {
    let mut h = started(sturdy_config());
    h.game.current_wave = 9;
    h.game.enemies.clear();
    h.game.enemy_spawn_timer.trigger_now();

    run(&mut h.game, 1);
    assert_eq!(h.game.current_wave, 10);
    assert_eq!(h.game.enemies.len(), 1);
    assert_eq!(h.game.enemies[0].kind, EnemyKind::Boss);
}

#[test]
fn pickups_spawn_on_their_timer() {
    let mut h = started(sturdy_config());
    assert!(h.game.pickups.is_empty());
    // Park the player in a corner, away from where pickups can land
    h.game.player.character.placement.position = Vector2::ZERO;

    // The confirm frame already simulated one tick; 10 s is 600 ticks
    assert_eq!(h.game.pickup_spawn_timer.current_ticks, 1);
    run(&mut h.game, 598);
    assert!(h.game.pickups.is_empty());
    run(&mut h.game, 1);
    assert!((1..=2).contains(&h.game.pickups.len()));
    assert!(h.game.pickups.iter().all(|p| !p.disabled));
}

#[test]
fn seeded_runs_are_reproducible() {
    let play = || {
        let mut h = started(sturdy_config());
        let input = FrameInput {
            fire: true,
            right: true,
            ..idle()
        };
        for _ in 0..400 {
            h.game.update(&input);
        }
        let positions: Vec<Vector2> = h
            .game
            .enemies
            .iter()
            .map(|e| e.character.placement.position)
            .collect();
        (positions, h.game.score.current, h.game.projectiles.len())
    };
    assert_eq!(play(), play());
}

// ── Death and persistence ─────────────────────────────────────────────────────

#[test]
fn death_saves_high_score_once() {
    let mut h = started(sturdy_config());
    h.game.score.add(50);
    h.game.player.offset_hp(-2e9);
    assert!(h.game.player.disabled);

    h.game.update(&idle());
    assert_eq!(h.game.state, GameState::Death);
    assert!(h.game.has_saved_on_death);
    assert_eq!(h.store.writes(), 1);
    assert_eq!(h.store.data()[HIGHSCORE_KEY], "50");

    run(&mut h.game, 120);
    assert_eq!(h.game.state, GameState::Death);
    assert_eq!(h.store.writes(), 1);
}

#[test]
fn restart_from_death_keeps_best() {
    let mut h = started(sturdy_config());
    h.game.score.add(50);
    h.game.player.offset_hp(-2e9);
    run(&mut h.game, 5);

    assert!(h.game.apply(MenuAction::Restart));
    assert_eq!(h.game.state, GameState::Playing);
    assert_eq!(h.game.score.current, 0);
    assert_eq!(h.game.score.best, 50);
    assert_eq!(h.game.current_wave, 0);
    assert!(h.game.enemies.is_empty());
    assert!(h.game.projectiles.is_empty());
    assert!(h.game.damage_numbers.is_empty());
    assert!(!h.game.player.disabled);
    assert!(!h.game.has_saved_on_death);
    assert_eq!(h.game.player.character.placement.position, Vector2::new(640.0, 360.0));

    // The first frame of the new session spawns wave 1 again
    run(&mut h.game, 1);
    assert_eq!(h.game.current_wave, 1);
}

#[test]
fn confirm_on_death_screen_restarts() {
    let mut h = started(sturdy_config());
    h.game.player.offset_hp(-2e9);
    run(&mut h.game, 1);
    assert_eq!(h.game.state, GameState::Death);

    h.game.update(&confirm());
    assert_eq!(h.game.state, GameState::Playing);
    assert!(!h.game.player.disabled);
}

#[test]
fn second_death_saves_again() {
    let mut h = started(sturdy_config());
    h.game.score.add(20);
    h.game.player.offset_hp(-2e9);
    run(&mut h.game, 1);
    assert_eq!(h.store.writes(), 1);

    h.game.apply(MenuAction::Restart);
    h.game.score.add(80);
    h.game.player.offset_hp(-2e9);
    run(&mut h.game, 1);
    assert_eq!(h.store.writes(), 2);
    assert_eq!(h.store.data()[HIGHSCORE_KEY], "80");
}

#[test]
fn death_with_unchanged_best_skips_write() {
    let mut saved = SaveData::new();
    saved.insert(HIGHSCORE_KEY.to_string(), "100".to_string());
    let mut h = game_with(sturdy_config(), saved);
    h.game.update(&confirm());

    h.game.player.offset_hp(-2e9);
    run(&mut h.game, 1);
    assert_eq!(h.game.state, GameState::Death);
    assert!(h.game.has_saved_on_death);
    assert_eq!(h.store.writes(), 0);
}

// ── Periodic housekeeping ─────────────────────────────────────────────────────

#[test]
fn sweep_runs_once_per_second() {
    let mut h = game();
    let mut dead = enemy_at(EnemyKind::Basic, 100.0, 100.0);
    dead.offset_hp(-100.0);
    let alive = enemy_at(EnemyKind::Tank, 200.0, 100.0);
    h.game.enemies = vec![dead, alive];

    let stray = Projectile::new(
        Faction::Enemy,
        Sprite::new("laser_red", 9.0, 54.0),
        Vector2::new(-500.0, -500.0),
        Vector2::new(-600.0, -600.0),
        5.0,
        10.0,
        false,
        SoundId::MUTED,
    );
    h.game.projectiles.push(stray);

    let mut taken = Pickup::new(&PICKUP_TYPES[0], 300.0, 300.0, &mut h.game.assets).unwrap();
    taken.disabled = true;
    let waiting = Pickup::new(&PICKUP_TYPES[1], 300.0, 300.0, &mut h.game.assets).unwrap();
    h.game.pickups = vec![taken, waiting];

    run(&mut h.game, 59);
    assert_eq!(h.game.enemies.len(), 2);
    assert_eq!(h.game.projectiles.len(), 1);
    assert_eq!(h.game.pickups.len(), 2);

    run(&mut h.game, 1);
    assert_eq!(h.game.enemies.len(), 1);
    assert_eq!(h.game.enemies[0].kind, EnemyKind::Tank);
    assert!(h.game.projectiles.is_empty());
    assert_eq!(h.game.pickups.len(), 1);
    assert_eq!(h.game.pickups[0].effect, PICKUP_TYPES[1].effect);
}

#[test]
fn music_is_resumed_every_second() {
    let mut h = game();
    let music = h.game.music;
    h.game.assets.audio.pause(music);
    assert!(!h.audio.clip(music).unwrap().playing);

    run(&mut h.game, 60);
    assert!(h.audio.clip(music).unwrap().playing);
}

#[test]
fn damage_numbers_age_while_playing_or_dead() {
    let number = |ticks| DamageNumber {
        amount: 5.0,
        x: 100.0,
        y: 100.0,
        kind: DamageKind::Normal,
        ticks,
    };

    let mut h = game();
    h.game.damage_numbers.push(number(0));
    run(&mut h.game, 10);
    assert_eq!(h.game.damage_numbers[0].ticks, 0, "frozen at main menu");

    h.game.update(&confirm());
    h.game.damage_numbers = vec![number(0), number(200)];
    run(&mut h.game, 1);
    assert_eq!(h.game.damage_numbers.len(), 1);
    assert_eq!(h.game.damage_numbers[0].ticks, 1);

    h.game.update(&pause());
    let ticks = h.game.damage_numbers[0].ticks;
    run(&mut h.game, 10);
    assert_eq!(h.game.damage_numbers[0].ticks, ticks, "frozen while paused");
}

// ── Drawing ───────────────────────────────────────────────────────────────────

#[test]
fn main_menu_draws_title() {
    let h = game();
    let s = drawn(&h.game);
    assert!(s.texts.iter().any(|t| t == "SPACE SHOOTER"));
    assert!(s.rects.is_empty());
}

#[test]
fn playing_draws_entities_and_hud() {
    let h = started(config());
    let s = drawn(&h.game);
    assert!(s.sprites.iter().any(|n| n == "player"));
    assert_eq!(
        s.sprites.iter().filter(|n| *n == "enemy").count(),
        h.game.enemies.len()
    );
    assert!(s.texts.iter().any(|t| t == "Wave 1"));
    assert!(s.texts.iter().any(|t| t == "HP 100/100"));
    assert!(s.rects.iter().all(|t| *t == Tint::White));
}

#[test]
fn enemy_health_bars_follow_remaining_hp() {
    let mut h = started(config());
    let max = h.game.enemies[0].character.health.max;
    h.game.enemies[0].offset_hp(-max / 2.0);

    let s = drawn(&h.game);
    assert_eq!(
        s.rects.iter().filter(|t| **t == Tint::White).count(),
        h.game.enemies.len()
    );
    assert_eq!(s.fills.len(), h.game.enemies.len());

    let rect = h.game.enemies[0].character.collision;
    let full = rect.x1 - rect.x0;
    let bar = s.fills[0];
    assert_eq!(bar.y0, rect.y0 - 20 + 1);
    assert_eq!(bar.y1, rect.y0 - 20 + 8);
    assert!((bar.x1 - rect.x0 - full / 2).abs() <= 1);
    // Untouched enemies get a full bar
    assert_eq!(s.fills[1].x1, h.game.enemies[1].character.collision.x1);
}

#[test]
fn no_health_bars_outside_play() {
    let h = game();
    assert!(drawn(&h.game).fills.is_empty());

    let mut h = started(sturdy_config());
    h.game.player.offset_hp(-2e9);
    run(&mut h.game, 1);
    assert_eq!(h.game.state, GameState::Death);
    assert!(drawn(&h.game).fills.is_empty());
}

#[test]
fn collision_rects_drawn_when_enabled() {
    let mut cfg = config();
    cfg.draw_collision_rects = true;
    let h = started(cfg);
    let s = drawn(&h.game);
    assert_eq!(s.rects.iter().filter(|t| **t == Tint::Blue).count(), 1);
    assert_eq!(
        s.rects.iter().filter(|t| **t == Tint::Red).count(),
        h.game.enemies.len()
    );
}

#[test]
fn death_screen_hides_player() {
    let mut h = started(sturdy_config());
    h.game.player.offset_hp(-2e9);
    run(&mut h.game, 1);

    let s = drawn(&h.game);
    assert!(!s.sprites.iter().any(|n| n == "player"));
    assert!(s.texts.iter().any(|t| t == "YOU DIED"));
}

#[test]
fn drawing_does_not_change_state() {
    let h = started(config());
    let enemies = h.game.enemies.len();
    let wave = h.game.current_wave;
    drawn(&h.game);
    drawn(&h.game);
    assert_eq!(h.game.enemies.len(), enemies);
    assert_eq!(h.game.current_wave, wave);
}
