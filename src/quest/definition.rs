//! Quest Definition Structures
//!
//! These structures are deserialized from TOML quest files.

use serde::{Deserialize, Serialize};

use crate::condition::Comparison;
use crate::error::ConfigError;
use crate::state::QuestLedger;

/// A quest definition loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuestFile {
    pub quest: RawQuest,
}

/// Raw quest data as it appears in TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// NPC that offers the quest; global quests have none
    #[serde(default)]
    pub giver_npc: Option<String>,
    #[serde(rename = "type")]
    pub quest_type: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub chain: Option<RawQuestChain>,
    /// Flag conditions that must all hold before the quest is offered
    #[serde(default)]
    pub requires: Vec<RawRequirement>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawQuestChain {
    /// Previous quest that must be completed
    pub previous: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRequirement {
    pub flag: String,
    /// Operator+operand token, same grammar as `if_flag`
    pub condition: String,
}

// ============================================================================
// Resolved Quest Structures (after parsing)
// ============================================================================

/// Quest categories the availability summary reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestType {
    /// Guild rank promotion trial
    RankUp,
    /// Companion or NPC personal event
    CharacterEvent,
    /// Optional side quest
    SubQuest,
    /// Main story quest
    Story,
}

impl QuestType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rank_up" | "rankup" => Some(QuestType::RankUp),
            "character_event" | "character" => Some(QuestType::CharacterEvent),
            "sub_quest" | "subquest" | "side" => Some(QuestType::SubQuest),
            "story" | "main" => Some(QuestType::Story),
            _ => None,
        }
    }
}

/// A single flag requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub flag: String,
    pub comparison: Comparison,
}

impl Requirement {
    pub fn is_met(&self, ledger: &QuestLedger<'_>) -> bool {
        self.comparison.matches(ledger.flag(&self.flag, 0))
    }
}

/// A fully resolved quest definition
#[derive(Debug, Clone)]
pub struct QuestDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub giver_npc: Option<String>,
    pub quest_type: QuestType,
    pub priority: i32,
    /// Quest that must be completed first
    pub previous: Option<String>,
    pub requirements: Vec<Requirement>,
}

impl QuestDefinition {
    /// Create a definition from raw TOML data
    pub fn from_raw(raw: &RawQuest) -> Result<Self, ConfigError> {
        if raw.id.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "quest '{}' has an empty id",
                raw.name
            )));
        }

        let quest_type = QuestType::from_str(&raw.quest_type).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "quest '{}' has unknown type '{}'",
                raw.id, raw.quest_type
            ))
        })?;

        let requirements = raw
            .requires
            .iter()
            .enumerate()
            .map(|(i, r)| {
                Comparison::parse(&r.condition)
                    .map(|comparison| Requirement {
                        flag: r.flag.clone(),
                        comparison,
                    })
                    .map_err(|e| {
                        ConfigError::Invalid(format!(
                            "quest '{}' requirement {}: {}",
                            raw.id, i, e
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: raw.id.clone(),
            name: raw.name.clone(),
            description: raw.description.clone(),
            giver_npc: raw.giver_npc.clone(),
            quest_type,
            priority: raw.priority,
            previous: raw.chain.as_ref().and_then(|c| c.previous.clone()),
            requirements,
        })
    }

    /// Minimal definition, mainly for hosts that build catalogs in code
    pub fn new(id: &str, quest_type: QuestType, priority: i32) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            giver_npc: None,
            quest_type,
            priority,
            previous: None,
            requirements: Vec::new(),
        }
    }

    pub fn with_giver(mut self, npc_id: &str) -> Self {
        self.giver_npc = Some(npc_id.to_string());
        self
    }

    pub fn with_previous(mut self, quest_id: &str) -> Self {
        self.previous = Some(quest_id.to_string());
        self
    }

    pub fn with_requirement(mut self, flag: &str, comparison: Comparison) -> Self {
        self.requirements.push(Requirement {
            flag: flag.to_string(),
            comparison,
        });
        self
    }

    /// Whether this quest can be offered given current flags
    pub fn is_eligible(&self, ledger: &QuestLedger<'_>) -> bool {
        if ledger.is_completed(&self.id) || ledger.is_active(&self.id) {
            return false;
        }

        if let Some(ref prev_id) = self.previous {
            if !ledger.is_completed(prev_id) {
                return false;
            }
        }

        self.requirements.iter().all(|r| r.is_met(ledger))
    }

    pub fn info(&self) -> super::QuestInfo {
        super::QuestInfo {
            id: self.id.clone(),
            quest_type: self.quest_type,
            priority: self.priority,
        }
    }
}
