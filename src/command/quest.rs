//! Quest Commands
//!
//! Availability queries against the quest manager and the quest
//! lifecycle transitions. Queries only write flags; the manager's own
//! state changes only through `start_quest` and `complete_quest`.

use std::collections::HashSet;

use tracing::{debug, error, info, warn};

use super::{CallSite, Command, Decision, malformed};
use crate::context::Context;
use crate::error::{CommandError, QuestError};
use crate::labels::JumpLabel;
use crate::quest::{QuestInfo, QuestType, stable_quest_hash};

pub(crate) fn commands() -> Vec<Box<dyn Command>> {
    vec![
        Box::new(CheckQuestAvailable),
        Box::new(CheckAvailableQuests),
        Box::new(CheckQuestsForDispatch),
        Box::new(StartQuest),
        Box::new(CompleteQuest),
    ]
}

/// `check_quest_available quest_id [label]`
///
/// First match wins: once the session has found a quest, later checks in
/// the same interaction leave the session untouched.
pub struct CheckQuestAvailable;

impl Command for CheckQuestAvailable {
    fn name(&self) -> &'static str {
        "check_quest_available"
    }

    fn usage(&self) -> &'static str {
        "<quest_id> [label]"
    }

    fn execute(
        &self,
        ctx: &mut Context,
        site: &CallSite<'_>,
        args: &[&str],
    ) -> Result<Decision, CommandError> {
        let Some(quest_id) = args.first().filter(|id| !id.is_empty()) else {
            return Ok(malformed(self, site, "missing quest id"));
        };
        let label = args.get(1).copied().unwrap_or_default();

        if ctx.session().quest_found() {
            debug!("Quest already found this session, skipping '{}'", quest_id);
            return Ok(Decision::None);
        }

        if !ctx.is_quest_available(quest_id) {
            debug!("Quest '{}' not available", quest_id);
            return Ok(Decision::None);
        }

        if label.is_empty() {
            debug!("Quest '{}' available, no label given", quest_id);
            return Ok(Decision::None);
        }

        let target = JumpLabel::from_alias(label);
        if target == JumpLabel::None {
            warn!("Unknown jump label '{}' for quest '{}'", label, quest_id);
        }

        let mut session = ctx.session();
        session.set_quest_found(true);
        session.set_quest_jump_target(target);
        debug!("Quest '{}' found, jump target {}", quest_id, target);
        Ok(Decision::None)
    }
}

/// `check_available_quests [npc_id]`
///
/// Writes the size of the available set, which quest types it contains
/// and the hash of its highest-priority quest.
pub struct CheckAvailableQuests;

impl Command for CheckAvailableQuests {
    fn name(&self) -> &'static str {
        "check_available_quests"
    }

    fn usage(&self) -> &'static str {
        "[npc_id]"
    }

    fn execute(
        &self,
        ctx: &mut Context,
        _site: &CallSite<'_>,
        args: &[&str],
    ) -> Result<Decision, CommandError> {
        let npc_id = args.first().copied().unwrap_or_default();
        let quests = if npc_id.is_empty() {
            ctx.available_quests()
        } else {
            ctx.quests_for_npc(npc_id)
        };

        let has_type = |t: QuestType| quests.iter().any(|q| q.quest_type == t);
        let has_rank_up = has_type(QuestType::RankUp);
        let has_character_event = has_type(QuestType::CharacterEvent);
        let has_sub_quest = has_type(QuestType::SubQuest);
        let top_hash = top_priority(&quests).map_or(0, |q| stable_quest_hash(&q.id));
        let count = i32::try_from(quests.len()).unwrap_or(i32::MAX);

        let keys = ctx.keys().clone();
        let flags = ctx.flags_mut();
        flags.set_int(&keys.available_count, count);
        flags.set_bool(&keys.has_rank_up, has_rank_up);
        flags.set_bool(&keys.has_character_event, has_character_event);
        flags.set_bool(&keys.has_sub_quest, has_sub_quest);
        flags.set_int(&keys.top_quest_hash, top_hash);

        debug!(
            "{} quests available{}",
            count,
            if npc_id.is_empty() {
                String::new()
            } else {
                format!(" from '{}'", npc_id)
            }
        );
        Ok(Decision::None)
    }
}

/// Highest priority quest; the earliest one wins a tie
fn top_priority(quests: &[QuestInfo]) -> Option<&QuestInfo> {
    quests.iter().fold(None, |best: Option<&QuestInfo>, q| match best {
        Some(b) if b.priority >= q.priority => Some(b),
        _ => Some(q),
    })
}

/// `check_quests_for_dispatch flag quest_id..`
///
/// Writes the 1-based position of the first available candidate, or 0.
pub struct CheckQuestsForDispatch;

impl Command for CheckQuestsForDispatch {
    fn name(&self) -> &'static str {
        "check_quests_for_dispatch"
    }

    fn usage(&self) -> &'static str {
        "<flag> [quest_ids..]"
    }

    fn execute(
        &self,
        ctx: &mut Context,
        site: &CallSite<'_>,
        args: &[&str],
    ) -> Result<Decision, CommandError> {
        let [flag, candidates @ ..] = args else {
            return Ok(malformed(self, site, "missing flag name"));
        };

        let available: HashSet<String> = ctx
            .available_quests()
            .into_iter()
            .map(|q| q.id)
            .collect();

        let position = candidates
            .iter()
            .position(|id| available.contains(*id))
            .map_or(0, |i| i32::try_from(i + 1).unwrap_or(i32::MAX));

        ctx.flags_mut().set_int(flag, position);
        debug!("Dispatch {} = {}", flag, position);
        Ok(Decision::None)
    }
}

/// Lifecycle commands take exactly one quest id
fn lifecycle_quest_id<'a>(command: &dyn Command, args: &[&'a str]) -> Option<&'a str> {
    match args {
        [] => {
            error!("{} requires a quest id", command.name());
            None
        }
        [id] if id.is_empty() => {
            error!("{} requires a quest id", command.name());
            None
        }
        [id] => Some(*id),
        [id, extra @ ..] => {
            warn!(
                "{} takes one quest id, ignoring {} extra argument(s)",
                command.name(),
                extra.len()
            );
            Some(*id)
        }
    }
}

/// `start_quest quest_id`
pub struct StartQuest;

impl Command for StartQuest {
    fn name(&self) -> &'static str {
        "start_quest"
    }

    fn usage(&self) -> &'static str {
        "<quest_id>"
    }

    fn execute(
        &self,
        ctx: &mut Context,
        _site: &CallSite<'_>,
        args: &[&str],
    ) -> Result<Decision, CommandError> {
        let Some(quest_id) = lifecycle_quest_id(self, args) else {
            return Ok(Decision::None);
        };

        if ctx.quest_state().is_completed(quest_id) {
            return Err(QuestError::AlreadyCompleted(quest_id.to_string()).into());
        }
        ctx.start_quest(quest_id)?;
        ctx.quest_state().set_active(quest_id, true);
        info!("Started quest '{}'", quest_id);
        Ok(Decision::None)
    }
}

/// `complete_quest quest_id`
pub struct CompleteQuest;

impl Command for CompleteQuest {
    fn name(&self) -> &'static str {
        "complete_quest"
    }

    fn usage(&self) -> &'static str {
        "<quest_id>"
    }

    fn execute(
        &self,
        ctx: &mut Context,
        _site: &CallSite<'_>,
        args: &[&str],
    ) -> Result<Decision, CommandError> {
        let Some(quest_id) = lifecycle_quest_id(self, args) else {
            return Ok(Decision::None);
        };

        ctx.quest_manager_mut().complete(quest_id)?;
        ctx.quest_state().set_completed(quest_id);
        info!("Completed quest '{}'", quest_id);
        Ok(Decision::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::tests::run;
    use crate::quest::{QuestCatalog, QuestDefinition};

    fn catalog() -> QuestCatalog {
        let mut catalog = QuestCatalog::new();
        catalog.insert(QuestDefinition::new("q1", QuestType::SubQuest, 1).with_giver("smith"));
        catalog.insert(QuestDefinition::new("q2", QuestType::RankUp, 5).with_giver("guild_master"));
        catalog.insert(
            QuestDefinition::new("q3", QuestType::CharacterEvent, 5).with_giver("guild_master"),
        );
        catalog
    }

    fn info(id: &str, priority: i32) -> QuestInfo {
        QuestInfo {
            id: id.to_string(),
            quest_type: QuestType::Story,
            priority,
        }
    }

    #[test]
    fn test_first_match_wins() {
        let mut ctx = Context::with_quests(catalog());
        run(&mut ctx, "check_quest_available", &["q2", "start_rank_f"]);
        run(&mut ctx, "check_quest_available", &["q3", "story_act1"]);

        assert!(ctx.session().quest_found());
        assert_eq!(ctx.session().quest_jump_target(), JumpLabel::StartRankF);
    }

    #[test]
    fn test_unavailable_quest_leaves_session() {
        let mut ctx = Context::with_quests(catalog());
        ctx.quest_state().set_completed("q2");
        run(&mut ctx, "check_quest_available", &["q2", "start_rank_f"]);
        run(&mut ctx, "check_quest_available", &["ghost", "start_rank_e"]);

        assert!(!ctx.session().quest_found());
        assert_eq!(ctx.session().quest_jump_target(), JumpLabel::None);
    }

    #[test]
    fn test_label_aliases_and_unknown_label() {
        let mut ctx = Context::with_quests(catalog());
        run(&mut ctx, "check_quest_available", &["q1", "quest_rank_up_g"]);
        assert_eq!(ctx.session().quest_jump_target(), JumpLabel::StartRankG);

        let mut ctx = Context::with_quests(catalog());
        run(&mut ctx, "check_quest_available", &["q1", "no_such_label"]);
        assert!(ctx.session().quest_found());
        assert_eq!(ctx.session().quest_jump_target(), JumpLabel::None);
    }

    #[test]
    fn test_available_without_label_is_not_found() {
        let mut ctx = Context::with_quests(catalog());
        run(&mut ctx, "check_quest_available", &["q1"]);
        assert!(!ctx.session().quest_found());
    }

    #[test]
    fn test_check_available_quests_global() {
        let mut ctx = Context::with_quests(catalog());
        assert_eq!(run(&mut ctx, "check_available_quests", &[]), Some(Decision::None));

        let flags = ctx.flags();
        assert_eq!(flags.get_int("available_quest_count", -1), 3);
        assert!(flags.get_bool("available_has_rank_up"));
        assert!(flags.get_bool("available_has_character_event"));
        assert!(flags.get_bool("available_has_sub_quest"));
        // q2 and q3 tie on priority; catalog order puts q2 first
        assert_eq!(
            flags.get_int("available_top_quest_hash", 0),
            stable_quest_hash("q2")
        );
    }

    #[test]
    fn test_check_available_quests_for_npc() {
        let mut ctx = Context::with_quests(catalog());
        run(&mut ctx, "check_available_quests", &["smith"]);

        let flags = ctx.flags();
        assert_eq!(flags.get_int("available_quest_count", -1), 1);
        assert!(!flags.get_bool("available_has_rank_up"));
        assert!(flags.get_bool("available_has_sub_quest"));
        assert_eq!(flags.get_int("available_top_quest_hash", 0), stable_quest_hash("q1"));
    }

    #[test]
    fn test_check_available_quests_empty() {
        let mut ctx = Context::with_quests(catalog());
        ctx.flags_mut().set_int("available_top_quest_hash", 99);
        run(&mut ctx, "check_available_quests", &["nobody"]);

        assert_eq!(ctx.flags().get_int("available_quest_count", -1), 0);
        assert_eq!(ctx.flags().get_int("available_top_quest_hash", -1), 0);
    }

    #[test]
    fn test_top_priority_takes_first_of_tie() {
        let quests = vec![info("a", 1), info("b", 7), info("c", 7)];
        assert_eq!(top_priority(&quests).map(|q| q.id.as_str()), Some("b"));
        assert!(top_priority(&[]).is_none());
    }

    #[test]
    fn test_dispatch_first_available_by_position() {
        let mut ctx = Context::with_quests(catalog());
        ctx.quest_state().set_completed("q1");

        run(&mut ctx, "check_quests_for_dispatch", &["route", "q1", "q2", "q3"]);
        assert_eq!(ctx.flags().get_int("route", -1), 2);

        // q3 listed first wins even though q2 has equal priority
        run(&mut ctx, "check_quests_for_dispatch", &["route", "q3", "q2"]);
        assert_eq!(ctx.flags().get_int("route", -1), 1);

        run(&mut ctx, "check_quests_for_dispatch", &["route", "q1", "ghost"]);
        assert_eq!(ctx.flags().get_int("route", -1), 0);
    }

    #[test]
    fn test_start_and_complete() {
        let mut ctx = Context::with_quests(catalog());
        run(&mut ctx, "start_quest", &["q1"]);
        assert!(ctx.quest_state().is_active("q1"));
        assert!(!ctx.is_quest_available("q1"));

        run(&mut ctx, "complete_quest", &["q1"]);
        let quests = ctx.quest_state();
        assert!(quests.is_completed("q1"));
        assert!(!quests.is_active("q1"));
    }

    #[test]
    fn test_complete_without_start() {
        let mut ctx = Context::with_quests(catalog());
        assert_eq!(run(&mut ctx, "complete_quest", &["q2"]), Some(Decision::None));
        assert!(ctx.quest_state().is_completed("q2"));
        assert!(!ctx.quest_state().is_active("q2"));
    }

    #[test]
    fn test_lifecycle_missing_id_is_noop() {
        let mut ctx = Context::with_quests(catalog());
        assert_eq!(run(&mut ctx, "start_quest", &[]), Some(Decision::None));
        assert_eq!(run(&mut ctx, "complete_quest", &[""]), Some(Decision::None));
        assert!(!ctx.flags().has_key("quest_active_"));
        assert!(!ctx.flags().has_key("quest_done_"));
    }

    #[test]
    fn test_manager_refusal_is_a_fault() {
        let mut ctx = Context::with_quests(catalog());
        assert_eq!(run(&mut ctx, "start_quest", &["ghost"]), None);
        assert!(!ctx.quest_state().is_active("ghost"));

        run(&mut ctx, "complete_quest", &["q1"]);
        assert_eq!(run(&mut ctx, "start_quest", &["q1"]), None);
        assert!(!ctx.quest_state().is_active("q1"));
    }

    #[test]
    fn test_start_refused_when_flags_show_completed() {
        let mut ctx = Context::with_quests(catalog());
        // Completed in an earlier session: the flags know, the catalog's journal does not
        ctx.quest_state().set_completed("q1");

        assert_eq!(run(&mut ctx, "start_quest", &["q1"]), None);
        let quests = ctx.quest_state();
        assert!(quests.is_completed("q1"));
        assert!(!quests.is_active("q1"));
        assert!(ctx.quest_manager().journal_entry("q1").is_none());
    }
}
