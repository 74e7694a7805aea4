//! State Facades
//!
//! Typed views over the flag store: player narrative state, quest
//! lifecycle bits, and per-interaction session slots.

pub mod player;
pub mod quest;
pub mod session;

pub use player::{
    Alliance, Companion, MentorChoice, Motivation, PlayerSnapshot, PlayerState, Rank, RivalFate,
    StoryPhase,
};
pub use quest::{QuestKeys, QuestLedger, QuestState, QuestStatus};
pub use session::{ArenaResult, SessionSnapshot, SessionState};
