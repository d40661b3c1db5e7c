//! Persistent player settings
//!
//! Only three scalars survive between sessions: whether the tutorial was
//! finished, the player level and the accumulated experience. The core reads
//! and writes them through [`SettingsStore`] and never touches storage
//! directly.

use anyhow::{Context, Result};
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub const TUTORIAL_COMPLETED_KEY: &str = "tutorial_completed";
pub const PLAYER_LEVEL_KEY: &str = "player_level";
pub const PLAYER_EXPERIENCE_KEY: &str = "player_experience";

/// Settings handle shared by the tutorial and the level system
pub type SharedSettings = Rc<RefCell<dyn SettingsStore>>;

/// Key-value store for named integer settings
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<i64>;

    fn set(&mut self, key: &str, value: i64) -> Result<()>;

    fn get_bool(&self, key: &str) -> bool {
        self.get(key).is_some_and(|value| value != 0)
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<()> {
        self.set(key, i64::from(value))
    }
}

/// Settings kept only for the lifetime of the process
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: BTreeMap<String, i64>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedSettings {
        Rc::new(RefCell::new(Self::new()))
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<i64> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: i64) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    values: BTreeMap<String, i64>,
}

/// Settings stored as a RON file, rewritten on every change
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
    values: BTreeMap<String, i64>,
}

impl FileSettings {
    /// Load settings from `path`; a missing file starts empty
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(content) => {
                let file: SettingsFile = ron::from_str(&content)
                    .with_context(|| format!("Invalid settings file {}", path.display()))?;
                file.values
            }
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read settings file {}", path.display()))
            }
        };
        Ok(Self { path, values })
    }

    pub fn into_shared(self) -> SharedSettings {
        Rc::new(RefCell::new(self))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        let file = SettingsFile {
            values: self.values.clone(),
        };
        let serialized = ron::ser::to_string_pretty(&file, PrettyConfig::new())?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings file {}", self.path.display()))?;
        Ok(())
    }
}

impl SettingsStore for FileSettings {
    fn get(&self, key: &str) -> Option<i64> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: i64) -> Result<()> {
        self.values.insert(key.to_string(), value);
        self.save()
    }
}
