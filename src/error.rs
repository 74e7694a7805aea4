//! Error types for the dispatch engine.

use std::path::PathBuf;

use thiserror::Error;

/// Faults reported by a quest manager
#[derive(Debug, Error)]
pub enum QuestError {
    /// The quest id is not in the catalog
    #[error("unknown quest: {0}")]
    UnknownQuest(String),

    /// The quest was already completed and cannot change state
    #[error("quest already completed: {0}")]
    AlreadyCompleted(String),
}

/// Faults raised while a command executes.
///
/// Malformed arguments are not faults; commands log those and do nothing.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The quest manager refused the operation
    #[error(transparent)]
    Quest(#[from] QuestError),

    /// Any other internal failure
    #[error("{0}")]
    Fault(String),
}

/// Errors loading configuration, quest data or replay traces
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for the expected shape
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Content parsed but is semantically invalid
    #[error("invalid data: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        ConfigError::Parse {
            path: path.into(),
            source,
        }
    }
}
