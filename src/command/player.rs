//! Player and Session Commands
//!
//! Typed writes that go through the state facades, so ranged fields are
//! clamped and enums are validated before anything is stored.

use tracing::debug;

use super::{CallSite, Command, Decision, malformed};
use crate::context::Context;
use crate::error::CommandError;
use crate::state::{ArenaResult, Companion, Rank, StoryPhase};

pub(crate) fn commands() -> Vec<Box<dyn Command>> {
    vec![
        Box::new(AddKarma),
        Box::new(AddContribution),
        Box::new(SetRank),
        Box::new(SetPhase),
        Box::new(SetAutoDialogNpc),
        Box::new(SetArenaResult),
        Box::new(ClearSession),
        Box::new(CanRejoin),
    ]
}

fn parse_int(arg: Option<&&str>) -> Option<i32> {
    arg.and_then(|s| s.trim().parse().ok())
}

/// `add_karma delta`
pub struct AddKarma;

impl Command for AddKarma {
    fn name(&self) -> &'static str {
        "add_karma"
    }

    fn usage(&self) -> &'static str {
        "<delta>"
    }

    fn execute(
        &self,
        ctx: &mut Context,
        site: &CallSite<'_>,
        args: &[&str],
    ) -> Result<Decision, CommandError> {
        let Some(delta) = parse_int(args.first()) else {
            return Ok(malformed(self, site, "delta is missing or not an integer"));
        };
        let karma = ctx.player().add_karma(delta);
        debug!("Karma {:+} -> {}", delta, karma);
        Ok(Decision::None)
    }
}

/// `add_contribution delta`
pub struct AddContribution;

impl Command for AddContribution {
    fn name(&self) -> &'static str {
        "add_contribution"
    }

    fn usage(&self) -> &'static str {
        "<delta>"
    }

    fn execute(
        &self,
        ctx: &mut Context,
        site: &CallSite<'_>,
        args: &[&str],
    ) -> Result<Decision, CommandError> {
        let Some(delta) = parse_int(args.first()) else {
            return Ok(malformed(self, site, "delta is missing or not an integer"));
        };
        let contribution = ctx.player().add_contribution(delta);
        debug!("Contribution {:+} -> {}", delta, contribution);
        Ok(Decision::None)
    }
}

/// `set_rank rank`
pub struct SetRank;

impl Command for SetRank {
    fn name(&self) -> &'static str {
        "set_rank"
    }

    fn usage(&self) -> &'static str {
        "<g|f|e|d|c|b|a|s>"
    }

    fn execute(
        &self,
        ctx: &mut Context,
        site: &CallSite<'_>,
        args: &[&str],
    ) -> Result<Decision, CommandError> {
        let Some(rank) = args.first().and_then(|s| Rank::parse(s)) else {
            return Ok(malformed(self, site, "unknown rank"));
        };
        ctx.player().set_rank(rank);
        debug!("Rank set to {:?}", rank);
        Ok(Decision::None)
    }
}

/// `set_phase phase`
pub struct SetPhase;

impl Command for SetPhase {
    fn name(&self) -> &'static str {
        "set_phase"
    }

    fn usage(&self) -> &'static str {
        "<prologue|act1|act2|act3|finale|epilogue>"
    }

    fn execute(
        &self,
        ctx: &mut Context,
        site: &CallSite<'_>,
        args: &[&str],
    ) -> Result<Decision, CommandError> {
        let Some(phase) = args.first().and_then(|s| StoryPhase::parse(s)) else {
            return Ok(malformed(self, site, "unknown story phase"));
        };
        ctx.player().set_phase(phase);
        debug!("Story phase set to {:?}", phase);
        Ok(Decision::None)
    }
}

/// `set_auto_dialog_npc uid`
pub struct SetAutoDialogNpc;

impl Command for SetAutoDialogNpc {
    fn name(&self) -> &'static str {
        "set_auto_dialog_npc"
    }

    fn usage(&self) -> &'static str {
        "<uid>"
    }

    fn execute(
        &self,
        ctx: &mut Context,
        site: &CallSite<'_>,
        args: &[&str],
    ) -> Result<Decision, CommandError> {
        let Some(uid) = parse_int(args.first()) else {
            return Ok(malformed(self, site, "uid is missing or not an integer"));
        };
        ctx.session().set_auto_dialog_npc_uid(uid);
        Ok(Decision::None)
    }
}

/// `set_arena_result result`
pub struct SetArenaResult;

impl Command for SetArenaResult {
    fn name(&self) -> &'static str {
        "set_arena_result"
    }

    fn usage(&self) -> &'static str {
        "<none|victory|defeat>"
    }

    fn execute(
        &self,
        ctx: &mut Context,
        site: &CallSite<'_>,
        args: &[&str],
    ) -> Result<Decision, CommandError> {
        let Some(result) = args.first().and_then(|s| ArenaResult::parse(s)) else {
            return Ok(malformed(self, site, "unknown arena result"));
        };
        ctx.session().set_arena_result(result);
        debug!("Arena result set to {:?}", result);
        Ok(Decision::None)
    }
}

/// `clear_session`
pub struct ClearSession;

impl Command for ClearSession {
    fn name(&self) -> &'static str {
        "clear_session"
    }

    fn execute(
        &self,
        ctx: &mut Context,
        _site: &CallSite<'_>,
        _args: &[&str],
    ) -> Result<Decision, CommandError> {
        ctx.session().clear();
        debug!("Session cleared");
        Ok(Decision::None)
    }
}

/// `can_rejoin companion`
pub struct CanRejoin;

impl Command for CanRejoin {
    fn name(&self) -> &'static str {
        "can_rejoin"
    }

    fn usage(&self) -> &'static str {
        "<rival|mentor|captain>"
    }

    fn execute(
        &self,
        ctx: &mut Context,
        site: &CallSite<'_>,
        args: &[&str],
    ) -> Result<Decision, CommandError> {
        let Some(companion) = args.first().and_then(|s| Companion::parse(s)) else {
            malformed(self, site, "unknown companion");
            return Ok(Decision::Condition(false));
        };
        let result = ctx.player().can_rejoin_final_battle(companion);
        debug!("can_rejoin {:?} -> {}", companion, result);
        Ok(Decision::Condition(result))
    }
}
