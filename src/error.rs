//! Error types, one enum per concern.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required configuration key {key} is missing")]
    Missing { key: &'static str },

    #[error("configuration key {key} has unparseable value {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("configuration key {key} is out of range: {reason}")]
    OutOfRange { key: &'static str, reason: String },

    #[error("cannot read configuration file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("asset name cannot be empty")]
    EmptyName,

    #[error("{0} was not found in the sprite catalog")]
    UnknownSprite(String),

    #[error("{0} was not found in the audio catalog")]
    UnknownAudio(String),

    #[error("audio kind {0:?} is not supported")]
    UnsupportedAudioKind(String),
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file name {0:?} must be non-empty and end with \".save\"")]
    InvalidFileName(String),

    #[error("save file i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("save file is malformed: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Save(#[from] SaveError),
}
