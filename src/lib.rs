//! Flag-driven narrative dispatch.
//!
//! A dialogue interpreter calls named commands at its invoke nodes; the
//! commands read and write an integer flag store and hand back a
//! [`Decision`] for the interpreter's next step.

pub mod command;
pub mod condition;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod flags;
pub mod labels;
pub mod quest;
pub mod replay;
pub mod state;

pub use command::{CallSite, Command, CommandRegistry, Decision};
pub use config::EngineConfig;
pub use context::Context;
pub use engine::Engine;
pub use error::{CommandError, ConfigError, QuestError};
pub use flags::{FlagStore, MemoryFlagStore, SaveData, SaveDataFlagStore};
pub use labels::JumpLabel;
pub use quest::{QuestCatalog, QuestInfo, QuestManager};
