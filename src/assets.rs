//! Sprite and audio collaborators.
//!
//! The simulation only needs a sprite's bounding size and an opaque handle to
//! trigger sounds, so both are reached through small traits. `SpriteAtlas`
//! and `SilentAudio` are the built-in implementations used by the terminal
//! front-end and by tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::error::AssetError;

/// Name of the sprite substituted for missing ones under `MissingAssetPolicy::Placeholder`.
pub const PLACEHOLDER_SPRITE: &str = "placeholder";

const PLACEHOLDER_SIZE: f64 = 16.0;

// ── Sprites ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub name: String,
    pub width: f64,
    pub height: f64,
}

impl Sprite {
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Sprite {
            name: name.into(),
            width,
            height,
        }
    }

    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_SPRITE, PLACEHOLDER_SIZE, PLACEHOLDER_SIZE)
    }
}

pub trait SpriteProvider {
    /// Look a sprite up by name. Loading the same name twice yields the same sprite.
    fn load(&mut self, name: &str) -> Result<Sprite, AssetError>;
}

/// Built-in catalog of every sprite the game references, with bounding sizes
/// in arena units.
#[derive(Debug, Default)]
pub struct SpriteAtlas {
    cache: HashMap<String, Sprite>,
}

impl SpriteAtlas {
    pub fn new() -> Self {
        Self::default()
    }

    fn catalog(name: &str) -> Option<(f64, f64)> {
        let size = match name {
            "background" => (256.0, 256.0),
            "player" => (99.0, 75.0),
            "enemy" => (93.0, 84.0),
            "boss" => (172.0, 136.0),
            "laser_blue" => (9.0, 54.0),
            "laser_red" => (9.0, 54.0),
            "pill_blue" => (22.0, 21.0),
            "bolt_bronze" => (19.0, 30.0),
            "blue_box_bolt" => (34.0, 33.0),
            "blue_box_star" => (34.0, 33.0),
            _ => return None,
        };
        Some(size)
    }
}

impl SpriteProvider for SpriteAtlas {
    fn load(&mut self, name: &str) -> Result<Sprite, AssetError> {
        if name.is_empty() {
            return Err(AssetError::EmptyName);
        }
        if let Some(sprite) = self.cache.get(name) {
            return Ok(sprite.clone());
        }

        let (width, height) =
            Self::catalog(name).ok_or_else(|| AssetError::UnknownSprite(name.to_string()))?;
        let sprite = Sprite::new(name, width, height);
        self.cache.insert(name.to_string(), sprite.clone());
        debug!(sprite = name, width, height, "sprite loaded");
        Ok(sprite)
    }
}

// ── Audio ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioKind {
    Wav,
    Mp3,
}

impl FromStr for AudioKind {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wav" => Ok(AudioKind::Wav),
            "mp3" => Ok(AudioKind::Mp3),
            other => Err(AssetError::UnsupportedAudioKind(other.to_string())),
        }
    }
}

impl AudioKind {
    /// Kind named by the file extension, e.g. `"laser.wav"` is `Wav`.
    pub fn of_file(file: &str) -> Result<Self, AssetError> {
        match file.rsplit_once('.') {
            Some((_, ext)) => ext.parse(),
            None => Err(AssetError::UnsupportedAudioKind(String::new())),
        }
    }
}

/// Opaque handle to a loaded sound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SoundId(pub usize);

impl SoundId {
    /// Handle no backend knows; every operation on it is a no-op.
    pub const MUTED: SoundId = SoundId(usize::MAX);
}

/// Sound playback. Backends ignore handles they did not issue.
pub trait AudioBackend {
    fn load(&mut self, file: &str, kind: AudioKind) -> Result<SoundId, AssetError>;
    /// Rewind and play from the start.
    fn play(&mut self, id: SoundId);
    /// Continue playback if the sound is not currently playing.
    fn resume(&mut self, id: SoundId);
    fn pause(&mut self, id: SoundId);
    fn set_volume(&mut self, id: SoundId, volume: f64);
    fn volume(&self, id: SoundId) -> f64;
    fn is_playing(&self, id: SoundId) -> bool;
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClipState {
    pub file: String,
    pub kind: AudioKind,
    pub volume: f64,
    pub playing: bool,
    pub plays: u32,
}

/// Audio backend that produces no sound but tracks every clip's state.
/// Clones share the same clip table, so a caller can keep a handle after
/// boxing one into `Assets`.
#[derive(Clone, Debug, Default)]
pub struct SilentAudio {
    clips: Rc<RefCell<Vec<ClipState>>>,
}

const KNOWN_AUDIO: &[&str] = &[
    "music.mp3",
    "laser.wav",
    "damage1.mp3",
    "damage2.wav",
    "pickup.wav",
];

impl SilentAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clip(&self, id: SoundId) -> Option<ClipState> {
        self.clips.borrow().get(id.0).cloned()
    }

    /// Total number of `play` calls across every clip loaded from `file`.
    pub fn plays_of(&self, file: &str) -> u32 {
        self.clips
            .borrow()
            .iter()
            .filter(|c| c.file == file)
            .map(|c| c.plays)
            .sum()
    }
}

impl AudioBackend for SilentAudio {
    fn load(&mut self, file: &str, kind: AudioKind) -> Result<SoundId, AssetError> {
        if file.is_empty() {
            return Err(AssetError::EmptyName);
        }
        if !KNOWN_AUDIO.contains(&file) {
            return Err(AssetError::UnknownAudio(file.to_string()));
        }
        let mut clips = self.clips.borrow_mut();
        clips.push(ClipState {
            file: file.to_string(),
            kind,
            volume: 1.0,
            playing: false,
            plays: 0,
        });
        Ok(SoundId(clips.len() - 1))
    }

    fn play(&mut self, id: SoundId) {
        if let Some(clip) = self.clips.borrow_mut().get_mut(id.0) {
            clip.playing = true;
            clip.plays += 1;
        }
    }

    fn resume(&mut self, id: SoundId) {
        if let Some(clip) = self.clips.borrow_mut().get_mut(id.0) {
            clip.playing = true;
        }
    }

    fn pause(&mut self, id: SoundId) {
        if let Some(clip) = self.clips.borrow_mut().get_mut(id.0) {
            clip.playing = false;
        }
    }

    fn set_volume(&mut self, id: SoundId, volume: f64) {
        if let Some(clip) = self.clips.borrow_mut().get_mut(id.0) {
            clip.volume = volume;
        }
    }

    fn volume(&self, id: SoundId) -> f64 {
        self.clips.borrow().get(id.0).map(|c| c.volume).unwrap_or(0.0)
    }

    fn is_playing(&self, id: SoundId) -> bool {
        self.clips.borrow().get(id.0).map(|c| c.playing).unwrap_or(false)
    }
}

// ── Aggregate ─────────────────────────────────────────────────────────────────

/// What to do when a sprite or sound cannot be loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissingAssetPolicy {
    /// Propagate the error to the caller.
    Abort,
    /// Log and substitute a placeholder sprite or a muted sound.
    Placeholder,
}

pub struct Assets {
    pub sprites: Box<dyn SpriteProvider>,
    pub audio: Box<dyn AudioBackend>,
    pub policy: MissingAssetPolicy,
    sounds: HashMap<String, SoundId>,
}

impl Assets {
    pub fn new(sprites: Box<dyn SpriteProvider>, audio: Box<dyn AudioBackend>) -> Self {
        Assets {
            sprites,
            audio,
            policy: MissingAssetPolicy::Abort,
            sounds: HashMap::new(),
        }
    }

    /// Built-in sprite atlas and silent audio.
    pub fn builtin() -> Self {
        Self::new(Box::new(SpriteAtlas::new()), Box::new(SilentAudio::new()))
    }

    pub fn sprite(&mut self, name: &str) -> Result<Sprite, AssetError> {
        match self.sprites.load(name) {
            Ok(sprite) => Ok(sprite),
            Err(err) if self.policy == MissingAssetPolicy::Placeholder => {
                warn!(sprite = name, error = %err, "substituting placeholder sprite");
                Ok(Sprite::placeholder())
            }
            Err(err) => Err(err),
        }
    }

    /// Load `file` once; later calls for the same file share the handle.
    pub fn sound(&mut self, file: &str, kind: AudioKind) -> Result<SoundId, AssetError> {
        if let Some(id) = self.sounds.get(file) {
            return Ok(*id);
        }
        match self.audio.load(file, kind) {
            Ok(id) => {
                self.sounds.insert(file.to_string(), id);
                Ok(id)
            }
            Err(err) if self.policy == MissingAssetPolicy::Placeholder => {
                warn!(audio = file, error = %err, "substituting muted sound");
                Ok(SoundId::MUTED)
            }
            Err(err) => Err(err),
        }
    }

    /// Loads `file` and sets its volume in one step.
    pub fn sound_with_volume(
        &mut self,
        file: &str,
        kind: AudioKind,
        volume: f64,
    ) -> Result<SoundId, AssetError> {
        let id = self.sound(file, kind)?;
        self.audio.set_volume(id, volume);
        Ok(id)
    }
}
