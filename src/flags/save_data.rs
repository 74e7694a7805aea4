//! Persistent flag backend
//!
//! Thin pass-through to the host's save data. The host owns storage and
//! serialization; this backend only forwards calls and fails soft when no
//! save is attached or the host refuses a write.

use tracing::warn;

use super::FlagStore;

/// Host save data as seen by the engine
pub trait SaveData {
    /// Stored value for `key`, if the save has one
    fn read(&self, key: &str) -> Option<i32>;

    /// Store `value` under `key`
    fn write(&mut self, key: &str, value: i32) -> Result<(), String>;

    /// Whether the save has a value for `key`
    fn contains(&self, key: &str) -> bool {
        self.read(key).is_some()
    }

    /// Whether the save is loaded and usable right now
    fn is_loaded(&self) -> bool {
        true
    }
}

/// Flag store that forwards to host save data
pub struct SaveDataFlagStore<H> {
    host: Option<H>,
}

impl<H: SaveData> SaveDataFlagStore<H> {
    pub fn new(host: H) -> Self {
        Self { host: Some(host) }
    }

    /// A store with no save attached; every read yields its default
    pub fn unattached() -> Self {
        Self { host: None }
    }

    /// Attach a save, returning the previously attached one
    pub fn attach(&mut self, host: H) -> Option<H> {
        self.host.replace(host)
    }

    /// Detach and return the current save
    pub fn detach(&mut self) -> Option<H> {
        self.host.take()
    }

    pub fn host(&self) -> Option<&H> {
        self.host.as_ref()
    }

    fn loaded(&self) -> Option<&H> {
        self.host.as_ref().filter(|h| h.is_loaded())
    }
}

impl<H: SaveData> FlagStore for SaveDataFlagStore<H> {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.loaded()
            .and_then(|host| host.read(key))
            .unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i32) {
        match self.host.as_mut().filter(|h| h.is_loaded()) {
            Some(host) => {
                if let Err(e) = host.write(key, value) {
                    warn!("Save data rejected flag '{}' = {}: {}", key, value, e);
                }
            }
            None => warn!("No save data loaded, dropping flag '{}' = {}", key, value),
        }
    }

    fn has_key(&self, key: &str) -> bool {
        self.loaded().is_some_and(|host| host.contains(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeSave {
        values: HashMap<String, i32>,
        loaded: bool,
        read_only: bool,
    }

    impl SaveData for FakeSave {
        fn read(&self, key: &str) -> Option<i32> {
            self.values.get(key).copied()
        }

        fn write(&mut self, key: &str, value: i32) -> Result<(), String> {
            if self.read_only {
                return Err("save is read-only".to_string());
            }
            self.values.insert(key.to_string(), value);
            Ok(())
        }

        fn is_loaded(&self) -> bool {
            self.loaded
        }
    }

    fn loaded_save() -> FakeSave {
        FakeSave {
            loaded: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_pass_through() {
        let mut store = SaveDataFlagStore::new(loaded_save());
        store.set_int("player_rank", 3);
        assert_eq!(store.get_int("player_rank", 0), 3);
        assert!(store.has_key("player_rank"));
        assert_eq!(store.host().map(|h| h.values.len()), Some(1));
    }

    #[test]
    fn test_unattached_fails_soft() {
        let mut store: SaveDataFlagStore<FakeSave> = SaveDataFlagStore::unattached();
        store.set_int("player_rank", 3);
        assert_eq!(store.get_int("player_rank", -1), -1);
        assert!(!store.has_key("player_rank"));
    }

    #[test]
    fn test_unloaded_save_fails_soft() {
        let mut save = loaded_save();
        save.values.insert("player_rank".to_string(), 5);
        save.loaded = false;

        let mut store = SaveDataFlagStore::new(save);
        assert_eq!(store.get_int("player_rank", 0), 0);
        assert!(!store.has_key("player_rank"));

        store.set_int("player_rank", 6);
        let save = store.detach().unwrap();
        assert_eq!(save.values.get("player_rank"), Some(&5));
    }

    #[test]
    fn test_rejected_write_keeps_old_value() {
        let mut save = loaded_save();
        save.values.insert("player_karma".to_string(), 10);
        save.read_only = true;

        let mut store = SaveDataFlagStore::new(save);
        store.set_int("player_karma", 50);
        assert_eq!(store.get_int("player_karma", 0), 10);
    }

    #[test]
    fn test_attach_replaces_save() {
        let mut store = SaveDataFlagStore::unattached();
        assert!(store.attach(loaded_save()).is_none());
        store.set_int("a", 1);

        let previous = store.attach(loaded_save()).unwrap();
        assert_eq!(previous.values.get("a"), Some(&1));
        assert!(!store.has_key("a"));
    }
}
