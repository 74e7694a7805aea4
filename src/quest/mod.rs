//! Quest Module
//!
//! The quest manager boundary the commands talk to, plus a TOML-backed
//! catalog that implements it for hosts without their own quest system.

pub mod catalog;
pub mod definition;
pub mod journal;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::QuestError;
use crate::state::QuestLedger;

pub use catalog::QuestCatalog;
pub use definition::{QuestDefinition, QuestType, Requirement};
pub use journal::{JournalEntry, JournalStatus, QuestJournal};

/// What the engine needs to know about an offered quest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestInfo {
    pub id: String,
    pub quest_type: QuestType,
    pub priority: i32,
}

/// Owner of the quest catalog, eligibility rules and lifecycle
/// transitions.
///
/// Eligibility queries receive a read-only ledger over the current
/// flags and quest bits. Result order is the manager's own ordering;
/// callers rely on it for tie-breaking.
pub trait QuestManager {
    /// Whether a quest can be offered right now
    fn is_available(&self, quest_id: &str, ledger: &QuestLedger<'_>) -> bool;

    /// Every quest that can be offered right now
    fn available_quests(&self, ledger: &QuestLedger<'_>) -> Vec<QuestInfo>;

    /// Quests a specific NPC can offer right now
    fn quests_for_npc(&self, npc_id: &str, ledger: &QuestLedger<'_>) -> Vec<QuestInfo>;

    /// Activate a quest. Quests the ledger shows as completed are refused.
    fn start(&mut self, quest_id: &str, ledger: &QuestLedger<'_>) -> Result<(), QuestError>;

    /// Complete a quest
    fn complete(&mut self, quest_id: &str) -> Result<(), QuestError>;

    /// Lifecycle timestamps for a quest, if the manager keeps them
    fn journal_entry(&self, _quest_id: &str) -> Option<&JournalEntry> {
        None
    }
}

/// Process-independent hash of a quest id, as stored in flags.
///
/// First four bytes of the SHA-256 digest, big-endian.
pub fn stable_quest_hash(quest_id: &str) -> i32 {
    let digest = Sha256::digest(quest_id.as_bytes());
    i32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}
