//! Trace Replay
//!
//! Feeds a recorded sequence of invocations through an engine, the way an
//! interpreter would at each invoke node, and reports what came back.
//!
//! ```toml
//! watch = ["route"]
//!
//! [flags]
//! player_contribution = 120
//!
//! [[invoke]]
//! script = "guild_hall"
//! node = "board"
//! command = "check_quests_for_dispatch"
//! args = ["route", "rank_up_f", "side_herbs"]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::command::{CallSite, Decision};
use crate::engine::Engine;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Trace {
    /// Flags written before the first invocation
    pub flags: BTreeMap<String, i32>,
    pub invoke: Vec<Invocation>,
    /// Flags reported after the run
    pub watch: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Invocation {
    #[serde(default)]
    pub script: String,
    #[serde(default)]
    pub node: String,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub script: String,
    pub node: String,
    pub command: String,
    /// `None` when the command was unknown or faulted
    pub decision: Option<Decision>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<StepReport>,
    /// Watched flags; keys never written are `null`
    pub watched: BTreeMap<String, Option<i32>>,
}

impl ReplayReport {
    pub fn failures(&self) -> usize {
        self.steps.iter().filter(|s| s.decision.is_none()).count()
    }
}

impl Trace {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::parse("<inline>", e))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        toml::from_str(&content).map_err(|e| ConfigError::parse(path, e))
    }

    /// Seed flags, run every invocation in order and collect the results
    pub fn run(&self, engine: &mut Engine) -> ReplayReport {
        let flags = engine.context_mut().flags_mut();
        for (key, value) in &self.flags {
            flags.set_int(key, *value);
        }
        debug!("Seeded {} flags", self.flags.len());

        let mut steps = Vec::with_capacity(self.invoke.len());
        for step in &self.invoke {
            let site = CallSite::new(&step.script, &step.node);
            let decision = engine.invoke(&site, &step.command, step.args.as_slice());
            match &decision {
                Some(d) => debug!("{} {} -> {:?}", site, step.command, d),
                None => warn!("{} {} failed", site, step.command),
            }
            steps.push(StepReport {
                script: step.script.clone(),
                node: step.node.clone(),
                command: step.command.clone(),
                decision,
            });
        }

        let flags = engine.context().flags();
        let watched = self
            .watch
            .iter()
            .map(|key| {
                let value = flags.has_key(key).then(|| flags.get_int(key, 0));
                (key.clone(), value)
            })
            .collect();

        let report = ReplayReport { steps, watched };
        info!(
            "Replayed {} invocations, {} failed",
            report.steps.len(),
            report.failures()
        );
        report
    }
}
