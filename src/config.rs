//! Startup configuration.
//!
//! Configuration arrives as a flat string map (usually read from an
//! environment-style `KEY=VALUE` file) and is parsed once into `Config`,
//! which is then passed explicitly to `Game`, `Player` and `Enemy`.
//! Required keys abort startup when missing or malformed; optional
//! overrides are skipped when they do not parse.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::geometry::Arena;

pub const DEFAULT_SAVE_FILE_NAME: &str = "space-shooter.save";
const DEFAULT_MUSIC_VOLUME: f64 = 0.5;

/// Optional stat overrides for the player.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerOverrides {
    pub scale: Option<f64>,
    pub hp: Option<f64>,
    pub fire_rate: Option<f64>,
    pub projectile_speed: Option<f64>,
    pub projectile_damage: Option<f64>,
    pub attack_volume: Option<f64>,
}

/// Optional stat overrides for every enemy, applied before the type multiplier.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnemyOverrides {
    pub scale: Option<f64>,
    pub hp: Option<f64>,
    pub fire_rate: Option<f64>,
    pub projectile_speed: Option<f64>,
    pub projectile_damage: Option<f64>,
    pub point_worth: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub window_width: u32,
    pub window_height: u32,
    /// 0 means "pick a seed from the clock".
    pub seed: u64,
    pub enemy_spawn_secs: u64,
    pub max_enemies_per_wave: u32,
    pub pickup_spawn_secs: u64,
    pub max_pickups_per_wave: u32,
    pub music_volume: f64,
    pub draw_collision_rects: bool,
    pub save_file_name: String,
    pub player: PlayerOverrides,
    pub enemy: EnemyOverrides,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            window_width: 1280,
            window_height: 720,
            seed: 1,
            enemy_spawn_secs: 5,
            max_enemies_per_wave: 5,
            pickup_spawn_secs: 10,
            max_pickups_per_wave: 2,
            music_volume: DEFAULT_MUSIC_VOLUME,
            draw_collision_rects: false,
            save_file_name: DEFAULT_SAVE_FILE_NAME.to_string(),
            player: PlayerOverrides::default(),
            enemy: EnemyOverrides::default(),
        }
    }
}

impl Config {
    /// Read and parse an environment-style configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "configuration file read");
        Self::from_map(&parse_env(&text))
    }

    pub fn from_map(map: &HashMap<String, String>) -> Result<Config, ConfigError> {
        let window_width: u32 = required(map, "WINDOW_WIDTH")?;
        let window_height: u32 = required(map, "WINDOW_HEIGHT")?;
        if window_width == 0 || window_height == 0 {
            return Err(ConfigError::OutOfRange {
                key: "WINDOW_WIDTH",
                reason: format!("window must be non-empty, got {window_width}x{window_height}"),
            });
        }

        let seed: i64 = required(map, "GAME_SEED")?;

        let max_enemies_per_wave: u32 = required(map, "MAX_ENEMIES_PER_WAVE")?;
        if max_enemies_per_wave == 0 {
            return Err(ConfigError::OutOfRange {
                key: "MAX_ENEMIES_PER_WAVE",
                reason: "must be at least 1".to_string(),
            });
        }
        let max_pickups_per_wave: u32 = required(map, "MAX_PICKUPS_PER_WAVE")?;
        if max_pickups_per_wave == 0 {
            return Err(ConfigError::OutOfRange {
                key: "MAX_PICKUPS_PER_WAVE",
                reason: "must be at least 1".to_string(),
            });
        }

        let save_file_name = map
            .get("SAVE_FILE_NAME")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SAVE_FILE_NAME.to_string());

        Ok(Config {
            window_width,
            window_height,
            seed: seed as u64,
            enemy_spawn_secs: required(map, "ENEMY_SPAWN_TIME")?,
            max_enemies_per_wave,
            pickup_spawn_secs: required(map, "PICKUP_SPAWN_TIME")?,
            max_pickups_per_wave,
            music_volume: optional(map, "MUSIC_VOLUME").unwrap_or(DEFAULT_MUSIC_VOLUME),
            draw_collision_rects: map.get("DRAW_COLLISION_RECTS").map(|v| v.trim()) == Some("1"),
            save_file_name,
            player: PlayerOverrides {
                scale: optional(map, "PLAYER_SCALE"),
                hp: optional(map, "PLAYER_HP"),
                fire_rate: optional(map, "PLAYER_FIRE_RATE"),
                projectile_speed: optional(map, "PLAYER_PROJECTILE_SPEED"),
                projectile_damage: optional(map, "PLAYER_PROJECTILE_DAMAGE"),
                attack_volume: optional(map, "ATTACK_VOLUME"),
            },
            enemy: EnemyOverrides {
                scale: optional(map, "ENEMY_SCALE"),
                hp: optional(map, "ENEMY_HP"),
                fire_rate: optional(map, "ENEMY_FIRE_RATE"),
                projectile_speed: optional(map, "ENEMY_PROJECTILE_SPEED"),
                projectile_damage: optional(map, "ENEMY_PROJECTILE_DAMAGE"),
                point_worth: optional(map, "ENEMY_POINT_WORTH"),
            },
        })
    }

    pub fn arena(&self) -> Arena {
        Arena::new(self.window_width as f64, self.window_height as f64)
    }

    /// The configured seed, or a clock-derived one when the seed is 0.
    /// Runs with seed 0 are therefore not reproducible.
    pub fn resolved_seed(&self) -> u64 {
        if self.seed != 0 {
            return self.seed;
        }
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(1)
            .max(1)
    }
}

/// Override that applies only when strictly positive.
pub fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

/// Override that applies when zero or positive.
pub fn non_negative(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v >= 0.0)
}

fn required<T: FromStr>(map: &HashMap<String, String>, key: &'static str) -> Result<T, ConfigError> {
    let raw = map.get(key).ok_or(ConfigError::Missing { key })?;
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.clone(),
    })
}

fn optional(map: &HashMap<String, String>, key: &'static str) -> Option<f64> {
    let raw = map.get(key)?;
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            warn!(key, value = %raw, "ignoring malformed configuration override");
            None
        }
    }
}

/// Parse `KEY=VALUE` lines. Blank lines and `#` comments are skipped, an
/// `export ` prefix is allowed and matching surrounding quotes are stripped.
pub fn parse_env(text: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        map.insert(key.to_string(), unquote(value.trim()).to_string());
    }
    map
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    // Unquoted values may carry a trailing comment.
    match value.find(" #") {
        Some(idx) => value[..idx].trim_end(),
        None => value,
    }
}
