//! In-memory flag backend, lives as long as the process.

use std::collections::HashMap;

use super::FlagStore;

/// Flag store backed by a plain map
#[derive(Debug, Clone, Default)]
pub struct MemoryFlagStore {
    flags: HashMap<String, i32>,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with flags
    pub fn with_flags<I, K>(flags: I) -> Self
    where
        I: IntoIterator<Item = (K, i32)>,
        K: Into<String>,
    {
        Self {
            flags: flags.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Drop every flag
    pub fn clear(&mut self) {
        self.flags.clear();
    }

    /// Number of distinct keys written so far
    pub fn count(&self) -> usize {
        self.flags.len()
    }
}

impl FlagStore for MemoryFlagStore {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.flags.get(key).copied().unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i32) {
        self.flags.insert(key.to_string(), value);
    }

    fn has_key(&self, key: &str) -> bool {
        self.flags.contains_key(key)
    }
}
