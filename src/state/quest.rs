//! Quest Lifecycle State
//!
//! Per-quest completed/active bits stored under prefixed flag keys.

use serde::Serialize;

use crate::flags::FlagStore;

/// Key prefixes for quest bits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestKeys {
    pub done_prefix: String,
    pub active_prefix: String,
}

impl Default for QuestKeys {
    fn default() -> Self {
        Self {
            done_prefix: "quest_done_".to_string(),
            active_prefix: "quest_active_".to_string(),
        }
    }
}

impl QuestKeys {
    pub fn done_key(&self, quest_id: &str) -> String {
        format!("{}{}", self.done_prefix, quest_id)
    }

    pub fn active_key(&self, quest_id: &str) -> String {
        format!("{}{}", self.active_prefix, quest_id)
    }
}

/// Quest status as stored in flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    NotStarted,
    Active,
    Completed,
}

/// Read-only view of quest bits and flags, handed to quest managers
pub struct QuestLedger<'a> {
    flags: &'a dyn FlagStore,
    keys: &'a QuestKeys,
}

impl<'a> QuestLedger<'a> {
    pub fn new(flags: &'a dyn FlagStore, keys: &'a QuestKeys) -> Self {
        Self { flags, keys }
    }

    pub fn is_completed(&self, quest_id: &str) -> bool {
        self.flags.get_bool(&self.keys.done_key(quest_id))
    }

    pub fn is_active(&self, quest_id: &str) -> bool {
        self.flags.get_bool(&self.keys.active_key(quest_id))
    }

    pub fn status(&self, quest_id: &str) -> QuestStatus {
        if self.is_completed(quest_id) {
            QuestStatus::Completed
        } else if self.is_active(quest_id) {
            QuestStatus::Active
        } else {
            QuestStatus::NotStarted
        }
    }

    /// Raw flag lookup for availability rules
    pub fn flag(&self, key: &str, default: i32) -> i32 {
        self.flags.get_int(key, default)
    }
}

/// Read/write facade over quest bits
pub struct QuestState<'a> {
    flags: &'a mut dyn FlagStore,
    keys: &'a QuestKeys,
}

impl<'a> QuestState<'a> {
    pub fn new(flags: &'a mut dyn FlagStore, keys: &'a QuestKeys) -> Self {
        Self { flags, keys }
    }

    fn ledger(&self) -> QuestLedger<'_> {
        QuestLedger::new(&*self.flags, self.keys)
    }

    pub fn is_completed(&self, quest_id: &str) -> bool {
        self.ledger().is_completed(quest_id)
    }

    pub fn is_active(&self, quest_id: &str) -> bool {
        self.ledger().is_active(quest_id)
    }

    pub fn status(&self, quest_id: &str) -> QuestStatus {
        self.ledger().status(quest_id)
    }

    /// Mark a quest active
    pub fn set_active(&mut self, quest_id: &str, active: bool) {
        self.flags.set_bool(&self.keys.active_key(quest_id), active);
    }

    /// Mark a quest completed. Always clears the active bit too.
    pub fn set_completed(&mut self, quest_id: &str) {
        self.flags.set_bool(&self.keys.done_key(quest_id), true);
        self.flags.set_bool(&self.keys.active_key(quest_id), false);
    }
}
