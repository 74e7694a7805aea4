//! Flag Commands
//!
//! Conditional evaluation, multi-way branching and raw flag writes.

use tracing::{debug, warn};

use super::{CallSite, Command, Decision, malformed};
use crate::condition::Comparison;
use crate::context::Context;
use crate::error::CommandError;

pub(crate) fn commands() -> Vec<Box<dyn Command>> {
    vec![
        Box::new(IfFlag),
        Box::new(SwitchFlag),
        Box::new(SetFlag),
        Box::new(AddFlag),
    ]
}

/// `if_flag key <op><operand>`
pub struct IfFlag;

impl Command for IfFlag {
    fn name(&self) -> &'static str {
        "if_flag"
    }

    fn usage(&self) -> &'static str {
        "<key> <op><value>"
    }

    fn execute(
        &self,
        ctx: &mut Context,
        site: &CallSite<'_>,
        args: &[&str],
    ) -> Result<Decision, CommandError> {
        let [key, token, ..] = args else {
            malformed(self, site, "expected a key and a condition");
            return Ok(Decision::Condition(false));
        };

        let comparison = match Comparison::parse(token) {
            Ok(comparison) => comparison,
            Err(e) => {
                warn!("if_flag at {}: {}", site, e);
                return Ok(Decision::Condition(false));
            }
        };

        let value = ctx.flags().get_int(key, 0);
        let result = comparison.matches(value);
        debug!("if_flag {} ({}) {} -> {}", key, value, comparison, result);
        Ok(Decision::Condition(result))
    }
}

/// `switch_flag key target0 .. targetN fallback`
pub struct SwitchFlag;

impl Command for SwitchFlag {
    fn name(&self) -> &'static str {
        "switch_flag"
    }

    fn usage(&self) -> &'static str {
        "<key> [targets..] <fallback>"
    }

    fn execute(
        &self,
        ctx: &mut Context,
        site: &CallSite<'_>,
        args: &[&str],
    ) -> Result<Decision, CommandError> {
        let [key, rest @ ..] = args else {
            return Ok(malformed(self, site, "missing key"));
        };
        let Some((fallback, targets)) = rest.split_last() else {
            return Ok(malformed(self, site, "missing fallback target"));
        };

        let value = ctx.flags().get_int(key, 0);
        let indexed = usize::try_from(value)
            .ok()
            .and_then(|i| targets.get(i))
            .filter(|target| !target.is_empty());

        let target = match indexed {
            Some(target) => *target,
            None if !fallback.is_empty() => *fallback,
            None => {
                debug!("switch_flag {} = {}: no usable target", key, value);
                return Ok(Decision::None);
            }
        };

        debug!("switch_flag {} = {} -> {}", key, value, target);
        Ok(Decision::Jump(target.to_string()))
    }
}

/// `set_flag key value`
pub struct SetFlag;

impl Command for SetFlag {
    fn name(&self) -> &'static str {
        "set_flag"
    }

    fn usage(&self) -> &'static str {
        "<key> <value>"
    }

    fn execute(
        &self,
        ctx: &mut Context,
        site: &CallSite<'_>,
        args: &[&str],
    ) -> Result<Decision, CommandError> {
        let [key, value, ..] = args else {
            return Ok(malformed(self, site, "expected a key and a value"));
        };
        let Ok(value) = value.trim().parse::<i32>() else {
            return Ok(malformed(self, site, "value is not an integer"));
        };

        ctx.flags_mut().set_int(key, value);
        Ok(Decision::None)
    }
}

/// `add_flag key delta`, saturating at the i32 bounds
pub struct AddFlag;

impl Command for AddFlag {
    fn name(&self) -> &'static str {
        "add_flag"
    }

    fn usage(&self) -> &'static str {
        "<key> <delta>"
    }

    fn execute(
        &self,
        ctx: &mut Context,
        site: &CallSite<'_>,
        args: &[&str],
    ) -> Result<Decision, CommandError> {
        let [key, delta, ..] = args else {
            return Ok(malformed(self, site, "expected a key and a delta"));
        };
        let Ok(delta) = delta.trim().parse::<i32>() else {
            return Ok(malformed(self, site, "delta is not an integer"));
        };

        let value = ctx.flags().get_int(key, 0).saturating_add(delta);
        ctx.flags_mut().set_int(key, value);
        debug!("add_flag {} -> {}", key, value);
        Ok(Decision::None)
    }
}
