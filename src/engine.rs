//! Engine
//!
//! One command registry plus the context it runs against. This is the
//! surface an interpreter calls at each invoke node.

use crate::command::{CallSite, Command, CommandRegistry, Decision};
use crate::context::Context;

pub struct Engine {
    registry: CommandRegistry,
    ctx: Context,
}

impl Engine {
    pub fn new(ctx: Context) -> Self {
        let mut registry = CommandRegistry::new();
        registry.initialize();
        Self { registry, ctx }
    }

    /// Run one command; `None` means unknown or faulted
    pub fn invoke<S: AsRef<str>>(
        &mut self,
        site: &CallSite<'_>,
        name: &str,
        args: &[S],
    ) -> Option<Decision> {
        self.registry.try_execute(name, &mut self.ctx, site, args)
    }

    pub fn register(&mut self, command: Box<dyn Command>) {
        self.registry.register(command);
    }

    pub fn registry_mut(&mut self) -> &mut CommandRegistry {
        &mut self.registry
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }

    pub fn into_context(self) -> Context {
        self.ctx
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Context::in_memory())
    }
}
