//! Shared fixtures for integration tests.
//!
//! Everything is headless: sprites come from the built-in atlas and audio is
//! `SilentAudio`, whose handle stays readable after being boxed.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::SeedableRng;

use space_shooter::assets::{Assets, SilentAudio, SpriteAtlas};
use space_shooter::config::Config;
use space_shooter::enemy::Enemy;
use space_shooter::entities::EnemyKind;
use space_shooter::game::Game;
use space_shooter::player::Player;
use space_shooter::save::{MemoryStore, Save, SaveData};

pub fn config() -> Config {
    Config::default()
}

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

pub fn assets() -> (Assets, SilentAudio) {
    let audio = SilentAudio::new();
    let assets = Assets::new(Box::new(SpriteAtlas::new()), Box::new(audio.clone()));
    (assets, audio)
}

pub fn player_at(x: f64, y: f64) -> Player {
    let (mut assets, _) = assets();
    let mut player = Player::new(&config(), &mut assets).expect("player assets");
    player.character.placement.position.x = x;
    player.character.placement.position.y = y;
    player
}

pub fn enemy_at(kind: EnemyKind, x: f64, y: f64) -> Enemy {
    let (mut assets, _) = assets();
    Enemy::new(kind, x, y, &config(), &mut assets).expect("enemy assets")
}

pub struct Harness {
    pub game: Game,
    pub audio: SilentAudio,
    pub store: MemoryStore,
}

pub fn game_with(config: Config, saved: SaveData) -> Harness {
    let (assets, audio) = assets();
    let store = MemoryStore::with_data(saved);
    let game = Game::new(config, assets, Save::new(Box::new(store.clone()))).expect("game");
    Harness { game, audio, store }
}

pub fn game() -> Harness {
    game_with(config(), SaveData::new())
}
