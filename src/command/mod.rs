//! Command Registry
//!
//! Name → command dispatch for operations invoked from dialogue scripts.
//! Command names are part of the script format and must stay stable.

pub mod debug;
pub mod flag;
pub mod player;
pub mod quest;

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use tracing::{debug, debug_span, error, warn};

use crate::context::Context;
use crate::error::CommandError;

/// Result a command hands back to the interpreter for its next step
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Nothing to consume
    #[default]
    None,
    /// Outcome of a conditional, consumed by the next conditional jump
    Condition(bool),
    /// Jump target picked by a branch
    Jump(String),
}

impl Decision {
    /// The condition outcome, if this is one
    pub fn condition(&self) -> Option<bool> {
        match self {
            Decision::Condition(value) => Some(*value),
            _ => None,
        }
    }

    /// The jump target, if this is one
    pub fn jump_target(&self) -> Option<&str> {
        match self {
            Decision::Jump(target) => Some(target),
            _ => None,
        }
    }
}

/// Where in a script a command was invoked from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CallSite<'a> {
    pub script: &'a str,
    pub node: &'a str,
}

impl<'a> CallSite<'a> {
    pub fn new(script: &'a str, node: &'a str) -> Self {
        Self { script, node }
    }

    /// Call site for hosts that do not track script positions
    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl fmt::Display for CallSite<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.script.is_empty() && self.node.is_empty() {
            f.write_str("<host>")
        } else {
            write!(f, "{}:{}", self.script, self.node)
        }
    }
}

/// A named operation a script can invoke.
///
/// Arguments arrive as raw strings; each command interprets its own.
/// Malformed arguments are logged and return `Ok(Decision::None)`.
/// `Err` is reserved for internal faults.
pub trait Command {
    fn name(&self) -> &'static str;

    /// Argument shape, for log messages
    fn usage(&self) -> &'static str {
        ""
    }

    fn execute(
        &self,
        ctx: &mut Context,
        site: &CallSite<'_>,
        args: &[&str],
    ) -> Result<Decision, CommandError>;
}

/// Log a malformed invocation the same way for every command
pub(crate) fn malformed(command: &dyn Command, site: &CallSite<'_>, reason: &str) -> Decision {
    warn!(
        "{} at {}: {} (usage: {} {})",
        command.name(),
        site,
        reason,
        command.name(),
        command.usage()
    );
    Decision::None
}

/// Dispatch table from script-facing names to commands
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
    initialized: bool,
}

impl CommandRegistry {
    /// An empty registry; built-ins are added on first use
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the built-in command set. Repeated calls do nothing.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        let builtins = flag::commands()
            .into_iter()
            .chain(player::commands())
            .chain(quest::commands())
            .chain(debug::commands());
        for command in builtins {
            self.insert(command);
        }
        debug!("Registered {} built-in commands", self.commands.len());
    }

    /// Register a command, replacing any previous binding for its name.
    ///
    /// Built-ins are loaded first so a registered command always wins.
    pub fn register(&mut self, command: Box<dyn Command>) {
        self.initialize();
        self.insert(command);
    }

    fn insert(&mut self, command: Box<dyn Command>) {
        self.commands.insert(command.name().to_string(), command);
    }

    pub fn contains(&mut self, name: &str) -> bool {
        self.initialize();
        self.commands.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&mut self) -> Vec<&str> {
        self.initialize();
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Execute a command by name.
    ///
    /// Returns `None` when the name is unknown or the command faulted
    /// (error or panic); faults are logged and never propagate.
    pub fn try_execute<S: AsRef<str>>(
        &mut self,
        name: &str,
        ctx: &mut Context,
        site: &CallSite<'_>,
        args: &[S],
    ) -> Option<Decision> {
        self.initialize();

        let Some(command) = self.commands.get(name) else {
            warn!("Unknown command '{}' at {}", name, site);
            return None;
        };

        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        let span = debug_span!("invoke", command = name, script = site.script, node = site.node);
        let _enter = span.enter();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| command.execute(ctx, site, &args)));
        match outcome {
            Ok(Ok(decision)) => {
                debug!(?decision, "Command finished");
                Some(decision)
            }
            Ok(Err(e)) => {
                error!("Command '{}' failed at {}: {}", name, site, e);
                None
            }
            Err(payload) => {
                error!(
                    "Command '{}' panicked at {}: {}",
                    name,
                    site,
                    panic_message(payload.as_ref())
                );
                None
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
