//! Tracing hooks for chain observability.
//!
//! [`TraceHooks`] builds hooks that emit `tracing` events as an invocation
//! moves through its chain: a before hook announcing the start, an around
//! hook logging both exits, and an after hook confirming normal
//! completion. Configuration is builder-style.
//!
//! The hooks emit events; installing a subscriber is the application's
//! concern.

use operon_system::engine::Next;
use operon_system::prelude::{Perform, Signal};
use tracing::debug;

/// Builder for chain-observability hooks.
///
/// # Example
///
/// ```
/// use operon_hooks::TraceHooks;
/// use operon_system::hook::Hooks;
///
/// let trace = TraceHooks::new().with_meta(true);
/// let hooks: Hooks<String> = Hooks::new()
///     .before(trace.enter())
///     .around(trace.observe());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceHooks {
    include_meta: bool,
}

impl TraceHooks {
    /// Creates a trace-hook builder with metadata logging disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Includes a snapshot of the instance metadata in exit events.
    #[must_use]
    pub fn with_meta(mut self, include_meta: bool) -> Self {
        self.include_meta = include_meta;
        self
    }

    /// Builds a before hook announcing the invocation.
    #[must_use]
    pub fn enter(
        &self,
    ) -> impl Fn(&mut dyn Perform) -> Result<(), Signal> + Send + Sync + 'static {
        |ctx: &mut dyn Perform| {
            debug!(action = ctx.name(), "chain started");
            Ok(())
        }
    }

    /// Builds an around hook logging both exits of the wrapped chain.
    #[must_use]
    pub fn observe<V>(
        &self,
    ) -> impl for<'a> Fn(&mut dyn Perform, Next<'a, V>) -> Result<V, Signal> + Send + Sync + 'static
    {
        let include_meta = self.include_meta;
        move |ctx: &mut dyn Perform, next: Next<'_, V>| {
            let result = next.run(ctx);
            match &result {
                Ok(_) => debug!(action = ctx.name(), "chain returned"),
                Err(signal) => debug!(
                    action = ctx.name(),
                    payload = %signal.payload(),
                    "chain raised a failure signal"
                ),
            }
            if include_meta {
                debug!(action = ctx.name(), meta = ?ctx.meta(), "metadata snapshot");
            }
            result
        }
    }

    /// Builds an after hook confirming normal completion.
    #[must_use]
    pub fn leave(
        &self,
    ) -> impl Fn(&mut dyn Perform) -> Result<(), Signal> + Send + Sync + 'static {
        |ctx: &mut dyn Perform| {
            debug!(action = ctx.name(), "chain completed normally");
            Ok(())
        }
    }
}
