//! Dispatch Context
//!
//! Owns the flag store and the quest manager for one run, and hands out
//! the state facades over them. One context per application run, one per
//! test; nothing reaches it through a global.

use crate::config::KeyConfig;
use crate::error::QuestError;
use crate::flags::{FlagStore, MemoryFlagStore};
use crate::quest::{QuestCatalog, QuestInfo, QuestManager};
use crate::state::{PlayerState, QuestKeys, QuestLedger, QuestState, SessionState};

pub struct Context {
    flags: Box<dyn FlagStore>,
    quests: Box<dyn QuestManager>,
    keys: KeyConfig,
    quest_keys: QuestKeys,
}

impl Context {
    pub fn new(
        flags: Box<dyn FlagStore>,
        quests: Box<dyn QuestManager>,
        keys: KeyConfig,
    ) -> Self {
        let quest_keys = keys.quest_keys();
        Self {
            flags,
            quests,
            keys,
            quest_keys,
        }
    }

    /// In-memory flags, an empty quest catalog and default keys
    pub fn in_memory() -> Self {
        Self::new(
            Box::new(MemoryFlagStore::new()),
            Box::new(QuestCatalog::new()),
            KeyConfig::default(),
        )
    }

    /// In-memory flags over the given quest manager
    pub fn with_quests(quests: impl QuestManager + 'static) -> Self {
        Self::new(
            Box::new(MemoryFlagStore::new()),
            Box::new(quests),
            KeyConfig::default(),
        )
    }

    pub fn flags(&self) -> &dyn FlagStore {
        self.flags.as_ref()
    }

    pub fn flags_mut(&mut self) -> &mut dyn FlagStore {
        self.flags.as_mut()
    }

    pub fn keys(&self) -> &KeyConfig {
        &self.keys
    }

    pub fn player(&mut self) -> PlayerState<'_> {
        PlayerState::new(self.flags.as_mut())
    }

    pub fn quest_state(&mut self) -> QuestState<'_> {
        QuestState::new(self.flags.as_mut(), &self.quest_keys)
    }

    pub fn session(&mut self) -> SessionState<'_> {
        SessionState::new(self.flags.as_mut())
    }

    pub fn quest_ledger(&self) -> QuestLedger<'_> {
        QuestLedger::new(self.flags.as_ref(), &self.quest_keys)
    }

    pub fn quest_manager(&self) -> &dyn QuestManager {
        self.quests.as_ref()
    }

    pub fn quest_manager_mut(&mut self) -> &mut dyn QuestManager {
        self.quests.as_mut()
    }

    // Quest manager queries with the ledger filled in

    pub fn is_quest_available(&self, quest_id: &str) -> bool {
        self.quests.is_available(quest_id, &self.quest_ledger())
    }

    pub fn available_quests(&self) -> Vec<QuestInfo> {
        self.quests.available_quests(&self.quest_ledger())
    }

    pub fn quests_for_npc(&self, npc_id: &str) -> Vec<QuestInfo> {
        self.quests.quests_for_npc(npc_id, &self.quest_ledger())
    }

    pub fn start_quest(&mut self, quest_id: &str) -> Result<(), QuestError> {
        let ledger = QuestLedger::new(self.flags.as_ref(), &self.quest_keys);
        self.quests.start(quest_id, &ledger)
    }
}
