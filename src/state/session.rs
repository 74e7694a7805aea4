//! Session scratch slots for a single interaction.
//!
//! These are ordinary flags. Callers clear them between unrelated
//! interactions.

use serde::Serialize;

use crate::flags::FlagStore;
use crate::labels::JumpLabel;

pub const QUEST_FOUND_KEY: &str = "session_quest_found";
pub const QUEST_JUMP_TARGET_KEY: &str = "session_quest_jump_target";
pub const AUTO_DIALOG_NPC_KEY: &str = "session_auto_dialog_npc_uid";
pub const ARENA_RESULT_KEY: &str = "session_arena_result";

/// Outcome of the last arena battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ArenaResult {
    #[default]
    None,
    Victory,
    Defeat,
}

impl ArenaResult {
    pub fn from_flag(value: i32) -> Self {
        match value {
            1 => ArenaResult::Victory,
            2 => ArenaResult::Defeat,
            _ => ArenaResult::None,
        }
    }

    pub fn to_flag(self) -> i32 {
        self as i32
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Some(ArenaResult::None),
            "victory" | "win" => Some(ArenaResult::Victory),
            "defeat" | "loss" => Some(ArenaResult::Defeat),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub quest_found: bool,
    /// `None` serializes as null
    pub quest_jump_target: Option<&'static str>,
    pub auto_dialog_npc_uid: i32,
    pub arena_result: ArenaResult,
}

/// Read/write facade over the session slots
pub struct SessionState<'a> {
    flags: &'a mut dyn FlagStore,
}

impl<'a> SessionState<'a> {
    pub fn new(flags: &'a mut dyn FlagStore) -> Self {
        Self { flags }
    }

    pub fn quest_found(&self) -> bool {
        self.flags.get_bool(QUEST_FOUND_KEY)
    }

    pub fn set_quest_found(&mut self, found: bool) {
        self.flags.set_bool(QUEST_FOUND_KEY, found);
    }

    pub fn quest_jump_target(&self) -> JumpLabel {
        JumpLabel::from_flag(self.flags.get_int(QUEST_JUMP_TARGET_KEY, 0))
    }

    pub fn set_quest_jump_target(&mut self, label: JumpLabel) {
        self.flags.set_int(QUEST_JUMP_TARGET_KEY, label.to_flag());
    }

    pub fn auto_dialog_npc_uid(&self) -> i32 {
        self.flags.get_int(AUTO_DIALOG_NPC_KEY, 0)
    }

    pub fn set_auto_dialog_npc_uid(&mut self, uid: i32) {
        self.flags.set_int(AUTO_DIALOG_NPC_KEY, uid);
    }

    pub fn arena_result(&self) -> ArenaResult {
        ArenaResult::from_flag(self.flags.get_int(ARENA_RESULT_KEY, 0))
    }

    pub fn set_arena_result(&mut self, result: ArenaResult) {
        self.flags.set_int(ARENA_RESULT_KEY, result.to_flag());
    }

    /// Reset every slot to its zero value
    pub fn clear(&mut self) {
        self.set_quest_found(false);
        self.set_quest_jump_target(JumpLabel::None);
        self.set_auto_dialog_npc_uid(0);
        self.set_arena_result(ArenaResult::None);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let target = self.quest_jump_target();
        SessionSnapshot {
            quest_found: self.quest_found(),
            quest_jump_target: (target != JumpLabel::None).then(|| target.alias()),
            auto_dialog_npc_uid: self.auto_dialog_npc_uid(),
            arena_result: self.arena_result(),
        }
    }
}
