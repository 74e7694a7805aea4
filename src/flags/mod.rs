//! Flag Store
//!
//! String-keyed integer flags that encode all narrative state.
//! Two backends share one contract: a pass-through over the host's save
//! data and an in-memory map for tests and tooling.

pub mod memory;
pub mod save_data;

pub use memory::MemoryFlagStore;
pub use save_data::{SaveData, SaveDataFlagStore};

/// Key → integer storage used by every facade and command.
///
/// A missing key is never a fault. Reads take a caller-supplied default
/// and absence is only observable through [`FlagStore::has_key`].
pub trait FlagStore {
    /// Read a flag, falling back to `default` when the key was never written
    fn get_int(&self, key: &str, default: i32) -> i32;

    /// Write a flag, creating it on first write
    fn set_int(&mut self, key: &str, value: i32);

    /// Check whether a flag has ever been written
    fn has_key(&self, key: &str) -> bool;

    /// Read a 0/1 flag as a boolean
    fn get_bool(&self, key: &str) -> bool {
        self.get_int(key, 0) == 1
    }

    /// Write a boolean as 0/1
    fn set_bool(&mut self, key: &str, value: bool) {
        self.set_int(key, i32::from(value));
    }
}
