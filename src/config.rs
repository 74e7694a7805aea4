//! Engine Configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no
//! file at all) yields a working configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::error::ConfigError;
use crate::state::QuestKeys;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub keys: KeyConfig,
    pub logging: LoggingConfig,
    pub quests: QuestDataConfig,
}

/// Flag key names the engine writes
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    pub quest_done_prefix: String,
    pub quest_active_prefix: String,
    /// Written by `check_available_quests`
    pub available_count: String,
    pub has_rank_up: String,
    pub has_character_event: String,
    pub has_sub_quest: String,
    pub top_quest_hash: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        let quest_keys = QuestKeys::default();
        Self {
            quest_done_prefix: quest_keys.done_prefix,
            quest_active_prefix: quest_keys.active_prefix,
            available_count: "available_quest_count".to_string(),
            has_rank_up: "available_has_rank_up".to_string(),
            has_character_event: "available_has_character_event".to_string(),
            has_sub_quest: "available_has_sub_quest".to_string(),
            top_quest_hash: "available_top_quest_hash".to_string(),
        }
    }
}

impl KeyConfig {
    pub fn quest_keys(&self) -> QuestKeys {
        QuestKeys {
            done_prefix: self.quest_done_prefix.clone(),
            active_prefix: self.quest_active_prefix.clone(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.quest_done_prefix.is_empty() || self.quest_active_prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "quest key prefixes must not be empty".to_string(),
            ));
        }
        if self.quest_done_prefix == self.quest_active_prefix {
            return Err(ConfigError::Invalid(format!(
                "quest done and active prefixes are both '{}'",
                self.quest_done_prefix
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` directive, applied on top of `RUST_LOG`
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "narrative_dispatch=info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuestDataConfig {
    /// Directory of quest TOML files
    pub data_dir: PathBuf,
}

impl Default for QuestDataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/quests"),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig =
            toml::from_str(content).map_err(|e| ConfigError::parse("<inline>", e))?;
        config.keys.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let config: EngineConfig =
            toml::from_str(&content).map_err(|e| ConfigError::parse(path, e))?;
        config.keys.validate()?;

        info!("Loaded engine config from {:?}", path);
        Ok(config)
    }
}
