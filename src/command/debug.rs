//! Debug Introspection
//!
//! Read-only commands that log facade state as JSON. Absent optional
//! data renders as `null`.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Value, json};
use tracing::info;

use super::{CallSite, Command, Decision};
use crate::context::Context;
use crate::error::CommandError;
use crate::quest::JournalEntry;
use crate::state::QuestStatus;

pub(crate) fn commands() -> Vec<Box<dyn Command>> {
    vec![
        Box::new(DebugPlayerState),
        Box::new(DebugQuestState),
        Box::new(DebugSessionState),
    ]
}

fn to_json<T: Serialize>(value: &T) -> Result<String, CommandError> {
    serde_json::to_string(value)
        .map_err(|e| CommandError::Fault(format!("failed to render debug state: {}", e)))
}

pub fn render_player(ctx: &mut Context) -> Result<String, CommandError> {
    to_json(&ctx.player().snapshot())
}

pub fn render_session(ctx: &mut Context) -> Result<String, CommandError> {
    to_json(&ctx.session().snapshot())
}

fn journal_json(entry: &JournalEntry) -> Value {
    json!({
        "status": entry.status,
        "started_at": entry.started_at,
        "completed_at": entry.completed_at,
        "completion_secs": entry.completion_secs(),
    })
}

/// Status and journal entry of each listed quest, plus the currently
/// available set. With no ids both maps are `null`; a quest the manager
/// never journaled has a `null` entry.
pub fn render_quests(ctx: &Context, quest_ids: &[&str]) -> Result<String, CommandError> {
    if quest_ids.is_empty() {
        return to_json(&json!({
            "available": ctx.available_quests(),
            "quests": null,
            "journal": null,
        }));
    }

    let ledger = ctx.quest_ledger();
    let statuses: BTreeMap<&str, QuestStatus> =
        quest_ids.iter().map(|id| (*id, ledger.status(id))).collect();
    let journal: BTreeMap<&str, Option<Value>> = quest_ids
        .iter()
        .map(|id| (*id, ctx.quest_manager().journal_entry(id).map(journal_json)))
        .collect();

    to_json(&json!({
        "available": ctx.available_quests(),
        "quests": statuses,
        "journal": journal,
    }))
}

pub struct DebugPlayerState;

impl Command for DebugPlayerState {
    fn name(&self) -> &'static str {
        "debug_player_state"
    }

    fn execute(
        &self,
        ctx: &mut Context,
        site: &CallSite<'_>,
        _args: &[&str],
    ) -> Result<Decision, CommandError> {
        info!("[{}] Player state: {}", site, render_player(ctx)?);
        Ok(Decision::None)
    }
}

pub struct DebugQuestState;

impl Command for DebugQuestState {
    fn name(&self) -> &'static str {
        "debug_quest_state"
    }

    fn usage(&self) -> &'static str {
        "[quest_ids..]"
    }

    fn execute(
        &self,
        ctx: &mut Context,
        site: &CallSite<'_>,
        args: &[&str],
    ) -> Result<Decision, CommandError> {
        info!("[{}] Quest state: {}", site, render_quests(ctx, args)?);
        Ok(Decision::None)
    }
}

pub struct DebugSessionState;

impl Command for DebugSessionState {
    fn name(&self) -> &'static str {
        "debug_session_state"
    }

    fn execute(
        &self,
        ctx: &mut Context,
        site: &CallSite<'_>,
        _args: &[&str],
    ) -> Result<Decision, CommandError> {
        info!("[{}] Session state: {}", site, render_session(ctx)?);
        Ok(Decision::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::tests::run;
    use crate::labels::JumpLabel;
    use crate::quest::{QuestCatalog, QuestDefinition, QuestType};
    use crate::state::Rank;

    fn parse(s: &str) -> Value {
        serde_json::from_str(s).unwrap()
    }

    #[test]
    fn test_player_dump() {
        let mut ctx = Context::in_memory();
        ctx.player().set_rank(Rank::A);
        ctx.flags_mut().set_int("player_karma", 500);

        let dump = parse(&render_player(&mut ctx).unwrap());
        assert_eq!(dump["rank"], "A");
        assert_eq!(dump["karma"], 100);
        assert_eq!(dump["joined_guild"], false);
    }

    #[test]
    fn test_session_dump_renders_null_target() {
        let mut ctx = Context::in_memory();
        let dump = parse(&render_session(&mut ctx).unwrap());
        assert!(dump["quest_jump_target"].is_null());

        ctx.session().set_quest_jump_target(JumpLabel::StoryAct2);
        let dump = parse(&render_session(&mut ctx).unwrap());
        assert_eq!(dump["quest_jump_target"], "story_act2");
    }

    #[test]
    fn test_quest_dump() {
        let mut catalog = QuestCatalog::new();
        catalog.insert(QuestDefinition::new("q1", QuestType::Story, 3));
        let mut ctx = Context::with_quests(catalog);
        ctx.quest_state().set_active("q2", true);

        let dump = parse(&render_quests(&ctx, &[]).unwrap());
        assert!(dump["quests"].is_null());
        assert_eq!(dump["available"][0]["id"], "q1");

        let dump = parse(&render_quests(&ctx, &["q1", "q2"]).unwrap());
        assert_eq!(dump["quests"]["q1"], "not_started");
        assert_eq!(dump["quests"]["q2"], "active");
        assert!(dump["journal"]["q1"].is_null());
    }

    #[test]
    fn test_quest_dump_includes_journal() {
        let mut catalog = QuestCatalog::new();
        catalog.insert(QuestDefinition::new("q1", QuestType::Story, 3));
        catalog.insert(QuestDefinition::new("q2", QuestType::SubQuest, 1));
        let mut ctx = Context::with_quests(catalog);

        run(&mut ctx, "start_quest", &["q1"]);
        run(&mut ctx, "complete_quest", &["q1"]);
        run(&mut ctx, "complete_quest", &["q2"]);

        let dump = parse(&render_quests(&ctx, &["q1", "q2", "q3"]).unwrap());
        assert_eq!(dump["journal"]["q1"]["status"], "completed");
        assert!(dump["journal"]["q1"]["started_at"].is_string());
        assert!(dump["journal"]["q1"]["completion_secs"].as_i64().unwrap() >= 0);

        // Completed without a start
        assert_eq!(dump["journal"]["q2"]["status"], "completed");
        assert!(dump["journal"]["q2"]["started_at"].is_null());
        assert!(dump["journal"]["q2"]["completion_secs"].is_null());

        assert!(dump["journal"]["q3"].is_null());
    }

    #[test]
    fn test_debug_commands_do_not_write() {
        let mut ctx = Context::in_memory();
        for name in ["debug_player_state", "debug_quest_state", "debug_session_state"] {
            assert_eq!(run(&mut ctx, name, &["q1"]), Some(Decision::None));
        }
        assert!(!ctx.flags().has_key("player_rank"));
        assert!(!ctx.flags().has_key("session_quest_found"));
    }
}
