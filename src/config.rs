// src/config.rs
use crate::error::{LearnError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "PITEXT_CONFIG";
pub const LEARNING_DIR_ENV: &str = "PITEXT_LEARNING_DIR";
pub const LEARNING_ENABLED_ENV: &str = "PITEXT_LEARNING_ENABLED";

const TRAINING_DATA_DIR_NAME: &str = "training_data";
const CORRECTIONS_FILE_NAME: &str = "learned_corrections.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnerConfig {
    pub paths: PathsConfig,
    pub learning: LearningConfig,
    pub cleaning: CleaningConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Holds `training_data/` and `learned_corrections.json`.
    pub learning_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Apply learned corrections when cleaning text.
    pub enabled: bool,
    /// A wrong->right pair needs this many sightings to become a rule.
    pub min_occurrences: u64,
    /// Below this many samples the learning tool asks before continuing.
    pub recommended_samples: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    pub use_spellcheck: bool,
    /// Shorter words are assumed to be abbreviations and left alone.
    pub spellcheck_min_len: usize,
}

impl Default for PathsConfig {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self { learning_dir: home.join("pi").join("corrections") }
    }
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self { enabled: true, min_occurrences: 2, recommended_samples: 5 }
    }
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self { use_spellcheck: true, spellcheck_min_len: 3 }
    }
}

impl LearnerConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| LearnError::io(path, e))?;
        toml::from_str(&content)
            .map_err(|e| LearnError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// `PITEXT_CONFIG` if set, otherwise defaults, then environment overrides.
    pub fn load() -> Result<Self> {
        let config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load_from_file(PathBuf::from(path))?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Some(dir) = std::env::var_os(LEARNING_DIR_ENV) {
            self.paths.learning_dir = PathBuf::from(dir);
        }
        if let Ok(enabled) = std::env::var(LEARNING_ENABLED_ENV) {
            self.learning.enabled = matches!(enabled.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        self
    }

    /// Defaults rooted at `learning_dir`; handy for tests and tools.
    pub fn rooted_at(learning_dir: impl Into<PathBuf>) -> Self {
        let mut config = Self::default();
        config.paths.learning_dir = learning_dir.into();
        config
    }

    pub fn training_data_dir(&self) -> PathBuf {
        self.paths.learning_dir.join(TRAINING_DATA_DIR_NAME)
    }

    pub fn corrections_file(&self) -> PathBuf {
        self.paths.learning_dir.join(CORRECTIONS_FILE_NAME)
    }
}
