//! High-score persistence through a flat key/value store.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::error::SaveError;

pub const HIGHSCORE_KEY: &str = "HIGHSCORE";
pub const SAVE_FOLDER: &str = "space-shooter";
const SAVE_EXTENSION: &str = "save";

pub type SaveData = BTreeMap<String, String>;

pub trait SaveStore {
    /// Current contents; a store that was never written reads as empty.
    fn read(&self) -> Result<SaveData, SaveError>;
    fn write(&mut self, data: &SaveData) -> Result<(), SaveError>;
}

// ── File store ────────────────────────────────────────────────────────────────

/// JSON object of strings on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>, file_name: &str) -> Result<Self, SaveError> {
        let valid = !file_name.is_empty()
            && Path::new(file_name).extension().and_then(|e| e.to_str()) == Some(SAVE_EXTENSION);
        if !valid {
            return Err(SaveError::InvalidFileName(file_name.to_string()));
        }
        Ok(FileStore {
            path: dir.as_ref().join(file_name),
        })
    }

    /// `$HOME/.config/space-shooter/<file_name>`, or `./.config/...` without `HOME`.
    pub fn in_user_config(file_name: &str) -> Result<Self, SaveError> {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Self::new(PathBuf::from(home).join(".config").join(SAVE_FOLDER), file_name)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SaveStore for FileStore {
    fn read(&self) -> Result<SaveData, SaveError> {
        if !self.path.exists() {
            return Ok(SaveData::new());
        }
        let text = fs::read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Ok(SaveData::new());
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn write(&mut self, data: &SaveData) -> Result<(), SaveError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(data)?)?;
        debug!(path = %self.path.display(), "save file written");
        Ok(())
    }
}

// ── In-memory store ───────────────────────────────────────────────────────────

/// Store kept in memory. Clones share contents, so a caller can keep a handle
/// after boxing one into `Save` and check how many writes happened.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<(SaveData, u32)>>,
}

impl MemoryStore {
    pub fn with_data(data: SaveData) -> Self {
        MemoryStore {
            inner: Rc::new(RefCell::new((data, 0))),
        }
    }

    pub fn data(&self) -> SaveData {
        self.inner.borrow().0.clone()
    }

    pub fn writes(&self) -> u32 {
        self.inner.borrow().1
    }
}

impl SaveStore for MemoryStore {
    fn read(&self) -> Result<SaveData, SaveError> {
        Ok(self.data())
    }

    fn write(&mut self, data: &SaveData) -> Result<(), SaveError> {
        let mut inner = self.inner.borrow_mut();
        inner.0 = data.clone();
        inner.1 += 1;
        Ok(())
    }
}

// ── Save ──────────────────────────────────────────────────────────────────────

pub struct Save {
    store: Box<dyn SaveStore>,
}

impl Save {
    pub fn new(store: Box<dyn SaveStore>) -> Self {
        Save { store }
    }

    /// Best score stored, if any. Unreadable saves count as "no save yet".
    pub fn load_high_score(&self) -> Option<i64> {
        let data = match self.store.read() {
            Ok(data) => data,
            Err(err) => {
                warn!(error = %err, "cannot read save, starting fresh");
                return None;
            }
        };
        data.get(HIGHSCORE_KEY)?.trim().parse().ok()
    }

    /// Persist `best`. Returns false without writing when the store already
    /// holds exactly the data that would be written.
    pub fn save_high_score(&mut self, best: i64) -> Result<bool, SaveError> {
        let original = self.store.read().unwrap_or_else(|err| {
            warn!(error = %err, "cannot read save, overwriting");
            SaveData::new()
        });

        let mut data = original.clone();
        data.insert(HIGHSCORE_KEY.to_string(), best.to_string());

        if data == original {
            return Ok(false);
        }
        self.store.write(&data)?;
        info!(best, "high score saved");
        Ok(true)
    }
}
