//! Quest Journal
//!
//! Records when the catalog started and completed quests. The flag store
//! remains the source of truth for quest bits; the journal only keeps
//! timestamps for hosts and debug output.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalStatus {
    Active,
    Completed,
}

/// Lifecycle record for a single quest
#[derive(Debug, Clone, Serialize)]
pub struct JournalEntry {
    pub quest_id: String,
    pub status: JournalStatus,
    /// When the quest was started (None if completed without a start)
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl JournalEntry {
    /// Seconds between start and completion; `None` until both are recorded
    pub fn completion_secs(&self) -> Option<i64> {
        match (self.started_at, self.completed_at) {
            (Some(started), Some(completed)) => Some((completed - started).num_seconds()),
            _ => None,
        }
    }
}

/// All lifecycle records kept by a catalog
#[derive(Debug, Clone, Default)]
pub struct QuestJournal {
    entries: HashMap<String, JournalEntry>,
}

impl QuestJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a quest start. Restarting an active quest keeps its original start time.
    pub fn record_start(&mut self, quest_id: &str) {
        self.entries
            .entry(quest_id.to_string())
            .or_insert_with(|| JournalEntry {
                quest_id: quest_id.to_string(),
                status: JournalStatus::Active,
                started_at: Some(Utc::now()),
                completed_at: None,
            });
    }

    /// Record a quest completion
    pub fn record_complete(&mut self, quest_id: &str) {
        let entry = self
            .entries
            .entry(quest_id.to_string())
            .or_insert_with(|| JournalEntry {
                quest_id: quest_id.to_string(),
                status: JournalStatus::Active,
                started_at: None,
                completed_at: None,
            });
        entry.status = JournalStatus::Completed;
        entry.completed_at = Some(Utc::now());
    }

    pub fn get(&self, quest_id: &str) -> Option<&JournalEntry> {
        self.entries.get(quest_id)
    }

    pub fn is_completed(&self, quest_id: &str) -> bool {
        self.get(quest_id)
            .is_some_and(|e| e.status == JournalStatus::Completed)
    }
}
