//! A guild hall interaction driven end to end through the public API.

use std::collections::HashMap;
use std::path::Path;

use narrative_dispatch::config::KeyConfig;
use narrative_dispatch::quest::stable_quest_hash;
use narrative_dispatch::{
    CallSite, Context, Decision, Engine, JumpLabel, QuestCatalog, SaveData, SaveDataFlagStore,
};

/// Save data the way a host would hold it
#[derive(Default)]
struct HostSave {
    values: HashMap<String, i32>,
}

impl SaveData for HostSave {
    fn read(&self, key: &str) -> Option<i32> {
        self.values.get(key).copied()
    }

    fn write(&mut self, key: &str, value: i32) -> Result<(), String> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

fn catalog() -> QuestCatalog {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/quests");
    let mut catalog = QuestCatalog::new();
    catalog.load_from_directory(&dir).unwrap();
    catalog
}

fn engine() -> Engine {
    let ctx = Context::new(
        Box::new(SaveDataFlagStore::new(HostSave::default())),
        Box::new(catalog()),
        KeyConfig::default(),
    );
    Engine::new(ctx)
}

#[test]
fn guild_hall_visit() {
    let mut engine = engine();
    let greet = CallSite::new("guild_hall", "greet");

    engine.invoke(&greet, "set_flag", &["player_contribution", "120"]);
    engine.invoke(&greet, "check_available_quests", &["guild_master"]);
    {
        let flags = engine.context().flags();
        // rank_up_f only; rival_duel needs the rival met, rank_up_e needs rank_up_f
        assert_eq!(flags.get_int("available_quest_count", -1), 1);
        assert!(flags.get_bool("available_has_rank_up"));
        assert!(!flags.get_bool("available_has_character_event"));
        assert_eq!(
            flags.get_int("available_top_quest_hash", 0),
            stable_quest_hash("rank_up_f")
        );
    }

    engine.invoke(&greet, "check_quest_available", &["rank_up_f", "quest_rank_up_f"]);
    engine.invoke(&greet, "check_quest_available", &["herb_gathering", "story_act1"]);
    assert_eq!(
        engine.context_mut().session().quest_jump_target(),
        JumpLabel::StartRankF
    );

    let accept = CallSite::new("guild_hall", "accept");
    assert_eq!(
        engine.invoke(&accept, "start_quest", &["rank_up_f"]),
        Some(Decision::None)
    );
    assert!(engine.context().quest_ledger().is_active("rank_up_f"));

    let cleared = CallSite::new("cellar", "cleared");
    engine.invoke(&cleared, "complete_quest", &["rank_up_f"]);
    engine.invoke(&cleared, "add_contribution", &["200"]);

    let ledger = engine.context().quest_ledger();
    assert!(ledger.is_completed("rank_up_f"));
    assert!(!ledger.is_active("rank_up_f"));

    // The next trial opens once the first is done and contribution is high enough
    let board = CallSite::new("guild_hall", "board");
    engine.invoke(
        &board,
        "check_quests_for_dispatch",
        &["board_route", "rank_up_f", "rank_up_e", "herb_gathering"],
    );
    assert_eq!(engine.context().flags().get_int("board_route", -1), 2);
    assert_eq!(
        engine.invoke(&board, "switch_flag", &["board_route", "none", "f", "e", "leave"]),
        Some(Decision::Jump("e".to_string()))
    );
}

#[test]
fn faults_do_not_stop_the_interaction() {
    let mut engine = engine();
    let site = CallSite::new("guild_hall", "greet");

    assert_eq!(engine.invoke(&site, "start_quest", &["no_such_quest"]), None);
    assert_eq!(engine.invoke::<&str>(&site, "teleport", &[]), None);
    assert_eq!(
        engine.invoke(&site, "if_flag", &["player_karma", "==0"]),
        Some(Decision::Condition(true))
    );
    assert!(!engine.context().flags().has_key("quest_active_no_such_quest"));
}

#[test]
fn rival_event_follows_flags() {
    let mut engine = engine();
    let site = CallSite::anonymous();

    assert!(!engine.context().is_quest_available("rival_duel"));
    engine.invoke(&site, "set_flag", &["player_met_rival", "1"]);
    assert!(engine.context().is_quest_available("rival_duel"));

    engine.invoke::<&str>(&site, "check_available_quests", &[]);
    assert!(engine.context().flags().get_bool("available_has_character_event"));
}
