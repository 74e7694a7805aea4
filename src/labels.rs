//! Jump Label Registry
//!
//! Maps the label strings used in dialogue scripts onto canonical
//! narrative checkpoints. Several aliases may name the same checkpoint;
//! the first alias listed for a label is its canonical spelling.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde::Serialize;

/// Canonical narrative checkpoint a script can jump to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[repr(i32)]
pub enum JumpLabel {
    /// No jump target
    #[default]
    None = 0,
    StartRankG = 1,
    StartRankF = 2,
    StartRankE = 3,
    StartRankD = 4,
    StartRankC = 5,
    StartRankB = 6,
    StartRankA = 7,
    StartRankS = 8,
    StoryPrologue = 20,
    StoryAct1 = 21,
    StoryAct2 = 22,
    StoryAct3 = 23,
    StoryFinale = 24,
}

/// Alias table in registration order.
/// The first entry for each label is its canonical alias.
const ALIASES: &[(&str, JumpLabel)] = &[
    ("none", JumpLabel::None),
    ("start_rank_g", JumpLabel::StartRankG),
    ("quest_rank_up_g", JumpLabel::StartRankG),
    ("start_rank_f", JumpLabel::StartRankF),
    ("quest_rank_up_f", JumpLabel::StartRankF),
    ("start_rank_e", JumpLabel::StartRankE),
    ("quest_rank_up_e", JumpLabel::StartRankE),
    ("start_rank_d", JumpLabel::StartRankD),
    ("quest_rank_up_d", JumpLabel::StartRankD),
    ("start_rank_c", JumpLabel::StartRankC),
    ("quest_rank_up_c", JumpLabel::StartRankC),
    ("start_rank_b", JumpLabel::StartRankB),
    ("quest_rank_up_b", JumpLabel::StartRankB),
    ("start_rank_a", JumpLabel::StartRankA),
    ("quest_rank_up_a", JumpLabel::StartRankA),
    ("start_rank_s", JumpLabel::StartRankS),
    ("quest_rank_up_s", JumpLabel::StartRankS),
    ("story_prologue", JumpLabel::StoryPrologue),
    ("quest_story_prologue", JumpLabel::StoryPrologue),
    ("story_act1", JumpLabel::StoryAct1),
    ("quest_story_act1", JumpLabel::StoryAct1),
    ("story_act2", JumpLabel::StoryAct2),
    ("quest_story_act2", JumpLabel::StoryAct2),
    ("story_act3", JumpLabel::StoryAct3),
    ("quest_story_act3", JumpLabel::StoryAct3),
    ("story_finale", JumpLabel::StoryFinale),
    ("quest_story_finale", JumpLabel::StoryFinale),
];

const ALL: [JumpLabel; 14] = [
    JumpLabel::None,
    JumpLabel::StartRankG,
    JumpLabel::StartRankF,
    JumpLabel::StartRankE,
    JumpLabel::StartRankD,
    JumpLabel::StartRankC,
    JumpLabel::StartRankB,
    JumpLabel::StartRankA,
    JumpLabel::StartRankS,
    JumpLabel::StoryPrologue,
    JumpLabel::StoryAct1,
    JumpLabel::StoryAct2,
    JumpLabel::StoryAct3,
    JumpLabel::StoryFinale,
];

static REGISTRY: LazyLock<LabelRegistry> = LazyLock::new(|| LabelRegistry::from_aliases(ALIASES));

/// Bidirectional alias lookup, built once from the forward table
#[derive(Debug)]
pub struct LabelRegistry {
    forward: HashMap<&'static str, JumpLabel>,
    canonical: HashMap<JumpLabel, &'static str>,
}

impl LabelRegistry {
    /// Build both directions from an ordered alias list.
    /// The reverse direction keeps the first alias seen for each label.
    pub fn from_aliases(aliases: &[(&'static str, JumpLabel)]) -> Self {
        let mut forward = HashMap::with_capacity(aliases.len());
        let mut canonical = HashMap::new();

        for &(alias, label) in aliases {
            forward.insert(alias, label);
            canonical.entry(label).or_insert(alias);
        }

        Self { forward, canonical }
    }

    /// The process-wide registry
    pub fn global() -> &'static LabelRegistry {
        &REGISTRY
    }

    /// Resolve an alias; unknown strings resolve to [`JumpLabel::None`]
    pub fn resolve(&self, alias: &str) -> JumpLabel {
        let key = alias.trim().to_ascii_lowercase();
        self.forward.get(key.as_str()).copied().unwrap_or_default()
    }

    /// Canonical alias for a label
    pub fn canonical(&self, label: JumpLabel) -> &'static str {
        self.canonical.get(&label).copied().unwrap_or("none")
    }

    /// Number of registered aliases
    pub fn alias_count(&self) -> usize {
        self.forward.len()
    }
}

impl JumpLabel {
    /// Resolve a script alias through the global registry
    pub fn from_alias(alias: &str) -> Self {
        LabelRegistry::global().resolve(alias)
    }

    /// Canonical script alias for this label
    pub fn alias(self) -> &'static str {
        LabelRegistry::global().canonical(self)
    }

    /// Stored flag value for this label
    pub fn to_flag(self) -> i32 {
        self as i32
    }

    /// Decode a stored flag value; unknown values decode to `None`
    pub fn from_flag(value: i32) -> Self {
        ALL.iter()
            .copied()
            .find(|label| label.to_flag() == value)
            .unwrap_or_default()
    }
}

impl fmt::Display for JumpLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alias())
    }
}
