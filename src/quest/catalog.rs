//! Quest Catalog
//!
//! Loads quest definitions from TOML files and answers the quest manager
//! queries. Quest bits live in the flag store, so eligibility is always
//! computed from the ledger handed in by the caller.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::definition::{QuestDefinition, RawQuestFile};
use super::journal::{JournalEntry, QuestJournal};
use super::{QuestInfo, QuestManager};
use crate::error::{ConfigError, QuestError};
use crate::state::QuestLedger;

/// Catalog of quest definitions
#[derive(Debug, Default)]
pub struct QuestCatalog {
    quests: HashMap<String, QuestDefinition>,
    /// Quest ids in load order; defines result ordering
    order: Vec<String>,
    journal: QuestJournal,
}

impl QuestCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `.toml` file under `dir`, recursively, in sorted path order.
    ///
    /// Files that fail to parse are logged and skipped.
    pub fn load_from_directory(&mut self, dir: &Path) -> Result<usize, ConfigError> {
        info!("Loading quests from {:?}", dir);

        if !dir.exists() {
            warn!("Quest directory does not exist: {:?}", dir);
            return Ok(0);
        }

        let mut paths = Vec::new();
        collect_toml_files(dir, &mut paths)?;
        paths.sort();

        let mut count = 0;
        for path in paths {
            match self.load_quest_file(&path) {
                Ok(()) => count += 1,
                Err(e) => warn!("Failed to load quest {:?}: {}", path, e),
            }
        }

        info!("Loaded {} quest definitions", count);
        self.validate_chains();
        Ok(count)
    }

    fn load_quest_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let raw: RawQuestFile = toml::from_str(&content).map_err(|e| ConfigError::parse(path, e))?;
        let quest = QuestDefinition::from_raw(&raw.quest)?;

        debug!("Loaded quest: {} ({})", quest.name, quest.id);
        self.insert(quest);
        Ok(())
    }

    /// Add or replace a definition. A replaced quest keeps its position.
    pub fn insert(&mut self, quest: QuestDefinition) {
        let id = quest.id.clone();
        if self.quests.insert(id.clone(), quest).is_some() {
            warn!("Duplicate quest ID '{}', overwriting", id);
        } else {
            self.order.push(id);
        }
    }

    /// Warn about chains that point at quests the catalog does not have
    fn validate_chains(&self) {
        for quest in self.ordered() {
            if let Some(ref prev_id) = quest.previous {
                if !self.quests.contains_key(prev_id) {
                    warn!(
                        "Quest '{}' references non-existent previous quest '{}'",
                        quest.id, prev_id
                    );
                }
            }
        }
    }

    fn ordered(&self) -> impl Iterator<Item = &QuestDefinition> {
        self.order.iter().filter_map(|id| self.quests.get(id))
    }

    pub fn get(&self, quest_id: &str) -> Option<&QuestDefinition> {
        self.quests.get(quest_id)
    }

    pub fn contains(&self, quest_id: &str) -> bool {
        self.quests.contains_key(quest_id)
    }

    /// Quest ids in catalog order
    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.quests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }
}

impl QuestManager for QuestCatalog {
    fn is_available(&self, quest_id: &str, ledger: &QuestLedger<'_>) -> bool {
        self.get(quest_id).is_some_and(|q| q.is_eligible(ledger))
    }

    fn available_quests(&self, ledger: &QuestLedger<'_>) -> Vec<QuestInfo> {
        self.ordered()
            .filter(|q| q.is_eligible(ledger))
            .map(QuestDefinition::info)
            .collect()
    }

    fn quests_for_npc(&self, npc_id: &str, ledger: &QuestLedger<'_>) -> Vec<QuestInfo> {
        self.ordered()
            .filter(|q| q.giver_npc.as_deref() == Some(npc_id))
            .filter(|q| q.is_eligible(ledger))
            .map(QuestDefinition::info)
            .collect()
    }

    fn start(&mut self, quest_id: &str, ledger: &QuestLedger<'_>) -> Result<(), QuestError> {
        if !self.contains(quest_id) {
            return Err(QuestError::UnknownQuest(quest_id.to_string()));
        }
        if ledger.is_completed(quest_id) || self.journal.is_completed(quest_id) {
            return Err(QuestError::AlreadyCompleted(quest_id.to_string()));
        }

        self.journal.record_start(quest_id);
        info!("Quest started: {}", quest_id);
        Ok(())
    }

    fn complete(&mut self, quest_id: &str) -> Result<(), QuestError> {
        if !self.contains(quest_id) {
            return Err(QuestError::UnknownQuest(quest_id.to_string()));
        }

        self.journal.record_complete(quest_id);
        info!("Quest completed: {}", quest_id);
        Ok(())
    }

    fn journal_entry(&self, quest_id: &str) -> Option<&JournalEntry> {
        self.journal.get(quest_id)
    }
}

/// Recursively collect TOML files under a directory
fn collect_toml_files(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<(), ConfigError> {
    let entries = std::fs::read_dir(dir).map_err(|e| ConfigError::io(dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::io(dir, e))?;
        let path = entry.path();

        if path.is_dir() {
            collect_toml_files(&path, paths)?;
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            paths.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{FlagStore, MemoryFlagStore};
    use crate::quest::{JournalStatus, QuestType};
    use crate::state::QuestKeys;
    use tempfile::TempDir;

    fn create_test_quest_toml(id: &str, quest_type: &str, priority: i32) -> String {
        format!(
            r#"
[quest]
id = "{id}"
name = "Quest {id}"
giver_npc = "guild_master"
type = "{quest_type}"
priority = {priority}
"#
        )
    }

    fn sample_catalog() -> QuestCatalog {
        let mut catalog = QuestCatalog::new();
        catalog.insert(QuestDefinition::new("q1", QuestType::SubQuest, 1).with_giver("smith"));
        catalog.insert(QuestDefinition::new("q2", QuestType::RankUp, 5).with_giver("guild_master"));
        catalog.insert(QuestDefinition::new("q3", QuestType::Story, 5).with_previous("q1"));
        catalog
    }

    #[test]
    fn test_load_quests() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("rank");
        std::fs::create_dir_all(&nested).unwrap();

        std::fs::write(
            temp_dir.path().join("b_side.toml"),
            create_test_quest_toml("side_herbs", "sub_quest", 1),
        )
        .unwrap();
        std::fs::write(
            nested.join("f.toml"),
            create_test_quest_toml("rank_up_f", "rank_up", 10),
        )
        .unwrap();
        std::fs::write(temp_dir.path().join("broken.toml"), "[quest]\nid = 3\n").unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let mut catalog = QuestCatalog::new();
        let loaded = catalog.load_from_directory(temp_dir.path()).unwrap();
        assert_eq!(loaded, 2);
        assert_eq!(catalog.len(), 2);

        let quest = catalog.get("rank_up_f").unwrap();
        assert_eq!(quest.quest_type, QuestType::RankUp);
        assert_eq!(quest.priority, 10);

        // Sorted path order: b_side.toml before rank/f.toml
        let ids: Vec<&String> = catalog.ids().collect();
        assert_eq!(ids, vec!["side_herbs", "rank_up_f"]);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let mut catalog = QuestCatalog::new();
        let loaded = catalog
            .load_from_directory(&temp_dir.path().join("nope"))
            .unwrap();
        assert_eq!(loaded, 0);
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_availability_follows_flags() {
        let catalog = sample_catalog();
        let keys = QuestKeys::default();
        let mut store = MemoryFlagStore::new();

        let ids = |catalog: &QuestCatalog, store: &MemoryFlagStore| -> Vec<String> {
            catalog
                .available_quests(&QuestLedger::new(store, &keys))
                .into_iter()
                .map(|q| q.id)
                .collect()
        };

        assert_eq!(ids(&catalog, &store), vec!["q1", "q2"]);

        store.set_int("quest_done_q1", 1);
        assert_eq!(ids(&catalog, &store), vec!["q2", "q3"]);

        store.set_int("quest_active_q2", 1);
        assert_eq!(ids(&catalog, &store), vec!["q3"]);
        assert!(!catalog.is_available("q2", &QuestLedger::new(&store, &keys)));
        assert!(!catalog.is_available("unknown", &QuestLedger::new(&store, &keys)));
    }

    #[test]
    fn test_quests_for_npc() {
        let catalog = sample_catalog();
        let keys = QuestKeys::default();
        let store = MemoryFlagStore::new();
        let ledger = QuestLedger::new(&store, &keys);

        let smith = catalog.quests_for_npc("smith", &ledger);
        assert_eq!(smith.len(), 1);
        assert_eq!(smith[0].id, "q1");
        assert!(catalog.quests_for_npc("nobody", &ledger).is_empty());
    }

    #[test]
    fn test_lifecycle_and_journal() {
        let mut catalog = sample_catalog();
        let keys = QuestKeys::default();
        let store = MemoryFlagStore::new();
        let ledger = QuestLedger::new(&store, &keys);

        catalog.start("q1", &ledger).unwrap();
        catalog.complete("q1").unwrap();
        assert_eq!(
            catalog.journal_entry("q1").map(|e| e.status),
            Some(JournalStatus::Completed)
        );
        assert!(catalog.journal_entry("q2").is_none());

        assert!(matches!(
            catalog.start("q1", &ledger),
            Err(QuestError::AlreadyCompleted(_))
        ));
        assert!(matches!(
            catalog.complete("ghost"),
            Err(QuestError::UnknownQuest(_))
        ));
    }

    #[test]
    fn test_start_refuses_quest_completed_in_flags() {
        let mut catalog = sample_catalog();
        let keys = QuestKeys::default();
        let mut store = MemoryFlagStore::new();
        store.set_int("quest_done_q2", 1);

        // Completed in an earlier session; this catalog's journal never saw it
        assert!(matches!(
            catalog.start("q2", &QuestLedger::new(&store, &keys)),
            Err(QuestError::AlreadyCompleted(_))
        ));
        assert!(catalog.journal_entry("q2").is_none());
    }

    #[test]
    fn test_duplicate_keeps_position() {
        let mut catalog = sample_catalog();
        catalog.insert(QuestDefinition::new("q1", QuestType::CharacterEvent, 9));
        let ids: Vec<&String> = catalog.ids().collect();
        assert_eq!(ids, vec!["q1", "q2", "q3"]);
        assert_eq!(catalog.get("q1").unwrap().priority, 9);
    }
}
