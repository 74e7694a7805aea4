//! Player Narrative State
//!
//! Typed view over the player's story flags. Every field lives in one
//! integer flag; reads decode out-of-range values to the field default
//! and writes clamp to the legal range.

use serde::Serialize;

use crate::flags::FlagStore;

pub const RANK_KEY: &str = "player_rank";
pub const PHASE_KEY: &str = "player_phase";
pub const MOTIVATION_KEY: &str = "player_motivation";
pub const KARMA_KEY: &str = "player_karma";
pub const CONTRIBUTION_KEY: &str = "player_contribution";
pub const JOINED_GUILD_KEY: &str = "player_joined_guild";
pub const TUTORIAL_DONE_KEY: &str = "player_tutorial_done";
pub const MET_RIVAL_KEY: &str = "player_met_rival";
pub const KNOWS_SECRET_KEY: &str = "player_knows_secret";
pub const RIVAL_FATE_KEY: &str = "player_rival_fate";
pub const ALLIANCE_KEY: &str = "player_alliance";
pub const MENTOR_CHOICE_KEY: &str = "player_mentor_choice";

pub const KARMA_MIN: i32 = -100;
pub const KARMA_MAX: i32 = 100;
pub const CONTRIBUTION_MIN: i32 = 0;
pub const CONTRIBUTION_MAX: i32 = 1000;

/// Guild rank, lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub enum Rank {
    #[default]
    G,
    F,
    E,
    D,
    C,
    B,
    A,
    S,
}

impl Rank {
    const ORDER: [Rank; 8] = [
        Rank::G,
        Rank::F,
        Rank::E,
        Rank::D,
        Rank::C,
        Rank::B,
        Rank::A,
        Rank::S,
    ];

    pub fn from_flag(value: i32) -> Self {
        usize::try_from(value)
            .ok()
            .and_then(|i| Self::ORDER.get(i).copied())
            .unwrap_or_default()
    }

    pub fn to_flag(self) -> i32 {
        self as i32
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "g" => Some(Rank::G),
            "f" => Some(Rank::F),
            "e" => Some(Rank::E),
            "d" => Some(Rank::D),
            "c" => Some(Rank::C),
            "b" => Some(Rank::B),
            "a" => Some(Rank::A),
            "s" => Some(Rank::S),
            _ => None,
        }
    }
}

/// Main story phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub enum StoryPhase {
    #[default]
    Prologue,
    Act1,
    Act2,
    Act3,
    Finale,
    Epilogue,
}

impl StoryPhase {
    const ORDER: [StoryPhase; 6] = [
        StoryPhase::Prologue,
        StoryPhase::Act1,
        StoryPhase::Act2,
        StoryPhase::Act3,
        StoryPhase::Finale,
        StoryPhase::Epilogue,
    ];

    pub fn from_flag(value: i32) -> Self {
        usize::try_from(value)
            .ok()
            .and_then(|i| Self::ORDER.get(i).copied())
            .unwrap_or_default()
    }

    pub fn to_flag(self) -> i32 {
        self as i32
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prologue" => Some(StoryPhase::Prologue),
            "act1" => Some(StoryPhase::Act1),
            "act2" => Some(StoryPhase::Act2),
            "act3" => Some(StoryPhase::Act3),
            "finale" => Some(StoryPhase::Finale),
            "epilogue" => Some(StoryPhase::Epilogue),
            _ => None,
        }
    }
}

/// Why the player joined the guild
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Motivation {
    #[default]
    Undecided,
    Glory,
    Duty,
    Revenge,
}

impl Motivation {
    pub fn from_flag(value: i32) -> Self {
        match value {
            1 => Motivation::Glory,
            2 => Motivation::Duty,
            3 => Motivation::Revenge,
            _ => Motivation::Undecided,
        }
    }

    pub fn to_flag(self) -> i32 {
        self as i32
    }
}

/// How the rival storyline ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RivalFate {
    #[default]
    Unresolved,
    Spared,
    Defeated,
}

impl RivalFate {
    pub fn from_flag(value: i32) -> Self {
        match value {
            1 => RivalFate::Spared,
            2 => RivalFate::Defeated,
            _ => RivalFate::Unresolved,
        }
    }

    pub fn to_flag(self) -> i32 {
        self as i32
    }
}

/// Faction the player sided with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Alliance {
    #[default]
    Neutral,
    Merchants,
    Knights,
}

impl Alliance {
    pub fn from_flag(value: i32) -> Self {
        match value {
            1 => Alliance::Merchants,
            2 => Alliance::Knights,
            _ => Alliance::Neutral,
        }
    }

    pub fn to_flag(self) -> i32 {
        self as i32
    }
}

/// Whether the mentor was asked to stay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum MentorChoice {
    #[default]
    Stay,
    Leave,
}

impl MentorChoice {
    pub fn from_flag(value: i32) -> Self {
        match value {
            1 => MentorChoice::Leave,
            _ => MentorChoice::Stay,
        }
    }

    pub fn to_flag(self) -> i32 {
        self as i32
    }
}

/// Companions that may return for the final battle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Companion {
    Rival,
    Mentor,
    Captain,
}

impl Companion {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rival" => Some(Companion::Rival),
            "mentor" => Some(Companion::Mentor),
            "captain" => Some(Companion::Captain),
            _ => None,
        }
    }
}

/// Point-in-time copy of every player field, for debug output
#[derive(Debug, Clone, Serialize)]
pub struct PlayerSnapshot {
    pub rank: Rank,
    pub phase: StoryPhase,
    pub motivation: Motivation,
    pub karma: i32,
    pub contribution: i32,
    pub joined_guild: bool,
    pub tutorial_done: bool,
    pub met_rival: bool,
    pub knows_secret: bool,
    pub rival_fate: RivalFate,
    pub alliance: Alliance,
    pub mentor_choice: MentorChoice,
}

/// Read/write facade over the player's flags
pub struct PlayerState<'a> {
    flags: &'a mut dyn FlagStore,
}

impl<'a> PlayerState<'a> {
    pub fn new(flags: &'a mut dyn FlagStore) -> Self {
        Self { flags }
    }

    pub fn rank(&self) -> Rank {
        Rank::from_flag(self.flags.get_int(RANK_KEY, 0))
    }

    pub fn set_rank(&mut self, rank: Rank) {
        self.flags.set_int(RANK_KEY, rank.to_flag());
    }

    pub fn phase(&self) -> StoryPhase {
        StoryPhase::from_flag(self.flags.get_int(PHASE_KEY, 0))
    }

    pub fn set_phase(&mut self, phase: StoryPhase) {
        self.flags.set_int(PHASE_KEY, phase.to_flag());
    }

    pub fn motivation(&self) -> Motivation {
        Motivation::from_flag(self.flags.get_int(MOTIVATION_KEY, 0))
    }

    pub fn set_motivation(&mut self, motivation: Motivation) {
        self.flags.set_int(MOTIVATION_KEY, motivation.to_flag());
    }

    /// Karma in [-100, 100]. A stored value outside the range reads as
    /// the nearest bound rather than the default.
    pub fn karma(&self) -> i32 {
        self.flags
            .get_int(KARMA_KEY, 0)
            .clamp(KARMA_MIN, KARMA_MAX)
    }

    pub fn set_karma(&mut self, karma: i32) {
        self.flags.set_int(KARMA_KEY, karma.clamp(KARMA_MIN, KARMA_MAX));
    }

    /// Adjust karma and return the clamped result
    pub fn add_karma(&mut self, delta: i32) -> i32 {
        let karma = self.karma().saturating_add(delta);
        self.set_karma(karma);
        self.karma()
    }

    /// Guild contribution in [0, 1000]. A stored value outside the range
    /// reads as the nearest bound rather than the default.
    pub fn contribution(&self) -> i32 {
        self.flags
            .get_int(CONTRIBUTION_KEY, 0)
            .clamp(CONTRIBUTION_MIN, CONTRIBUTION_MAX)
    }

    pub fn set_contribution(&mut self, contribution: i32) {
        self.flags.set_int(
            CONTRIBUTION_KEY,
            contribution.clamp(CONTRIBUTION_MIN, CONTRIBUTION_MAX),
        );
    }

    /// Adjust contribution and return the clamped result
    pub fn add_contribution(&mut self, delta: i32) -> i32 {
        let contribution = self.contribution().saturating_add(delta);
        self.set_contribution(contribution);
        self.contribution()
    }

    pub fn joined_guild(&self) -> bool {
        self.flags.get_bool(JOINED_GUILD_KEY)
    }

    pub fn set_joined_guild(&mut self, value: bool) {
        self.flags.set_bool(JOINED_GUILD_KEY, value);
    }

    pub fn tutorial_done(&self) -> bool {
        self.flags.get_bool(TUTORIAL_DONE_KEY)
    }

    pub fn set_tutorial_done(&mut self, value: bool) {
        self.flags.set_bool(TUTORIAL_DONE_KEY, value);
    }

    pub fn met_rival(&self) -> bool {
        self.flags.get_bool(MET_RIVAL_KEY)
    }

    pub fn set_met_rival(&mut self, value: bool) {
        self.flags.set_bool(MET_RIVAL_KEY, value);
    }

    pub fn knows_secret(&self) -> bool {
        self.flags.get_bool(KNOWS_SECRET_KEY)
    }

    pub fn set_knows_secret(&mut self, value: bool) {
        self.flags.set_bool(KNOWS_SECRET_KEY, value);
    }

    pub fn rival_fate(&self) -> RivalFate {
        RivalFate::from_flag(self.flags.get_int(RIVAL_FATE_KEY, 0))
    }

    pub fn set_rival_fate(&mut self, fate: RivalFate) {
        self.flags.set_int(RIVAL_FATE_KEY, fate.to_flag());
    }

    pub fn alliance(&self) -> Alliance {
        Alliance::from_flag(self.flags.get_int(ALLIANCE_KEY, 0))
    }

    pub fn set_alliance(&mut self, alliance: Alliance) {
        self.flags.set_int(ALLIANCE_KEY, alliance.to_flag());
    }

    pub fn mentor_choice(&self) -> MentorChoice {
        MentorChoice::from_flag(self.flags.get_int(MENTOR_CHOICE_KEY, 0))
    }

    pub fn set_mentor_choice(&mut self, choice: MentorChoice) {
        self.flags.set_int(MENTOR_CHOICE_KEY, choice.to_flag());
    }

    /// Whether a companion can rejoin the final battle.
    ///
    /// Recomputed from the underlying flags on every call.
    pub fn can_rejoin_final_battle(&self, companion: Companion) -> bool {
        match companion {
            Companion::Rival => {
                self.met_rival() && self.rival_fate() == RivalFate::Spared && self.karma() >= 0
            }
            Companion::Mentor => {
                self.mentor_choice() == MentorChoice::Stay || self.contribution() >= 500
            }
            Companion::Captain => self.alliance() == Alliance::Knights && self.rank() >= Rank::B,
        }
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            rank: self.rank(),
            phase: self.phase(),
            motivation: self.motivation(),
            karma: self.karma(),
            contribution: self.contribution(),
            joined_guild: self.joined_guild(),
            tutorial_done: self.tutorial_done(),
            met_rival: self.met_rival(),
            knows_secret: self.knows_secret(),
            rival_fate: self.rival_fate(),
            alliance: self.alliance(),
            mentor_choice: self.mentor_choice(),
        }
    }
}
