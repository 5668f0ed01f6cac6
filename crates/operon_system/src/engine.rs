//! Execution engine: chain assembly and the signal-catching boundary.
//!
//! A [`Runner`] drives one invocation:
//!
//! 1. before hooks run in registration order; a signal here aborts before
//!    the core operation and before any around hook;
//! 2. the around chain wraps the core operation — the first-registered
//!    around hook is outermost, the last-registered is adjacent to the
//!    core — and is invoked once via [`Next`];
//! 3. if the chain returns normally, after hooks run in registration
//!    order. If it raises, after hooks are skipped and the signal
//!    propagates to the boundary. Cleanup-sensitive hooks therefore
//!    belong in around hooks, which observe both exits.
//!
//! The boundary catches exactly the [`Signal`] type and converts it into a
//! Failure [`Outcome`] carrying the instance metadata merged with the
//! signal's fragment, with the original signal retained for
//! [`Outcome::unwind`]. Panics (programming defects) are never caught.
//!
//! # Short-circuiting
//!
//! An around hook may return without invoking its continuation, in which
//! case the core operation and all inner around hooks never execute —
//! after hooks still run, because the chain returned normally:
//!
//! ```
//! use operon_system::prelude::*;
//!
//! struct Cached;
//!
//! impl Action for Cached {
//!     type Props = NoProps;
//!     type Value = String;
//!     const NAME: &'static str = "cached";
//!
//!     fn from_props(_props: NoProps) -> Self {
//!         Cached
//!     }
//!
//!     fn execute(&mut self, _meta: &mut Metadata) -> Result<String, Signal> {
//!         Ok("computed".to_string())
//!     }
//!
//!     fn hooks() -> Hooks<String> {
//!         Hooks::new().around(|_ctx: &mut dyn Perform, _next: Next<'_, String>| {
//!             Ok("from cache".to_string())
//!         })
//!     }
//! }
//!
//! let outcome = Instance::<Cached>::new(Inputs::new()).unwrap().run();
//! assert_eq!(outcome.value(), Some(&"from cache".to_string()));
//! ```

use crate::action::{Action, Instance, Perform};
use crate::hook::{AroundBody, HookBody, Hooks};
use crate::outcome::{Outcome, Unwound};
use crate::signal::Signal;
use core::marker::PhantomData;
use tracing::{debug, debug_span, trace};

// ─────────────────────────────────────────────────────────────────────────────
// Next
// ─────────────────────────────────────────────────────────────────────────────

/// Thunk invoking the core operation through the erased context.
type CoreFn<V> = fn(&mut dyn Perform) -> Result<V, Signal>;

/// Thunk resolving a named around hook through the erased context.
type NamedFn<V> = fn(&mut dyn Perform, &'static str, Next<'_, V>) -> Result<V, Signal>;

/// The continuation handed to an around hook: the rest of the chain plus
/// the core operation.
///
/// Calling [`run`](Next::run) executes everything inside this hook; not
/// calling it short-circuits the chain.
pub struct Next<'a, V: 'static> {
    chain: &'a [AroundBody<V>],
    core: CoreFn<V>,
    named: NamedFn<V>,
}

impl<'a, V: 'static> Next<'a, V> {
    pub(crate) fn root(chain: &'a [AroundBody<V>], core: CoreFn<V>, named: NamedFn<V>) -> Self {
        Self { chain, core, named }
    }

    /// Invokes the rest of the chain against the instance context.
    ///
    /// # Errors
    ///
    /// Propagates a [`Signal`] raised by an inner hook or the core
    /// operation.
    pub fn run(self, ctx: &mut dyn Perform) -> Result<V, Signal> {
        match self.chain.split_first() {
            None => (self.core)(ctx),
            Some((head, rest)) => {
                let next = Next {
                    chain: rest,
                    core: self.core,
                    named: self.named,
                };
                match head {
                    AroundBody::Closure(f) => f(ctx, next),
                    AroundBody::Named(name) => (self.named)(ctx, name, next),
                }
            }
        }
    }
}

fn core_thunk<A: Action>(ctx: &mut dyn Perform) -> Result<A::Value, Signal> {
    let instance = ctx
        .downcast_mut::<Instance<A>>()
        .expect("chain context is the running instance");
    instance.execute_core()
}

fn named_thunk<A: Action>(
    ctx: &mut dyn Perform,
    name: &'static str,
    next: Next<'_, A::Value>,
) -> Result<A::Value, Signal> {
    A::dispatch_around(name, ctx, next)
}

// ─────────────────────────────────────────────────────────────────────────────
// Runner
// ─────────────────────────────────────────────────────────────────────────────

/// The invocation boundary for one action type.
///
/// A runner builds the type's hook registry once and can drive any number
/// of instances, one invocation each. For a single invocation,
/// [`Instance::run`] constructs a one-shot runner internally.
pub struct Runner<A: Action> {
    hooks: Hooks<A::Value>,
    _marker: PhantomData<fn(A)>,
}

impl<A: Action> Runner<A> {
    /// Creates a runner over the type's declared registry
    /// ([`Action::hooks`]).
    #[must_use]
    pub fn new() -> Self {
        Self::with_hooks(A::hooks())
    }

    /// Creates a runner over an explicit registry, bypassing the type's
    /// declaration.
    #[must_use]
    pub fn with_hooks(hooks: Hooks<A::Value>) -> Self {
        Self {
            hooks,
            _marker: PhantomData,
        }
    }

    /// Runs the instance to an [`Outcome`].
    ///
    /// Never fails for domain failures: a raised [`Signal`] is caught here
    /// and converted into the Failure variant. Panics (programming
    /// defects) propagate to the caller.
    #[must_use]
    pub fn run(&self, mut instance: Instance<A>) -> Outcome<A::Value> {
        let span = debug_span!("run", action = A::NAME);
        let _entered = span.enter();

        match self.invoke(&mut instance) {
            Ok(value) => {
                debug!("invocation succeeded");
                Outcome::Success {
                    value,
                    meta: instance.into_meta(),
                }
            }
            Err(signal) => {
                debug!(payload = %signal.payload(), "failure signal caught");
                let mut meta = instance.into_meta();
                meta.merge(signal.fragment().clone());
                Outcome::Failure {
                    error: signal.payload().clone(),
                    meta,
                    retained: Some(signal),
                }
            }
        }
    }

    /// Runs the instance with the strict contract: unwrap Success,
    /// re-raise the retained signal, pass signal-less failures through.
    ///
    /// # Errors
    ///
    /// Re-raises the exact original [`Signal`] when the invocation failed
    /// through the signal mechanism.
    pub fn run_strict(&self, instance: Instance<A>) -> Result<Unwound<A::Value>, Signal> {
        self.run(instance).unwind()
    }

    fn invoke(&self, instance: &mut Instance<A>) -> Result<A::Value, Signal> {
        trace!(
            before = self.hooks.before.len(),
            around = self.hooks.around.len(),
            after = self.hooks.after.len(),
            "assembling chain"
        );

        for hook in &self.hooks.before {
            Self::call_plain(hook, instance)?;
        }

        let value =
            Next::root(&self.hooks.around, core_thunk::<A>, named_thunk::<A>).run(instance)?;

        for hook in &self.hooks.after {
            Self::call_plain(hook, instance)?;
        }

        Ok(value)
    }

    fn call_plain(hook: &HookBody, instance: &mut Instance<A>) -> Result<(), Signal> {
        match hook {
            HookBody::Closure(f) => f(instance),
            HookBody::Named(name) => A::dispatch(name, instance),
        }
    }
}

impl<A: Action> Default for Runner<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::Metadata;
    use crate::schema::{Inputs, NoProps};
    use serde_json::{Value, json};

    fn push(ctx: &mut dyn Perform, label: &str) {
        let meta = ctx.meta_mut();
        if !meta.contains("trace") {
            meta.insert("trace", json!([]));
        }
        if let Some(Value::Array(entries)) = meta.get_mut("trace") {
            entries.push(json!(label));
        }
    }

    fn trace(outcome: &Outcome<()>) -> Vec<String> {
        match outcome.meta().get("trace") {
            Some(Value::Array(entries)) => entries
                .iter()
                .map(|v| v.as_str().unwrap().to_string())
                .collect(),
            _ => Vec::new(),
        }
    }

    struct Probe;

    impl Action for Probe {
        type Props = NoProps;
        type Value = ();
        const NAME: &'static str = "probe";

        fn from_props(_props: NoProps) -> Self {
            Probe
        }

        fn execute(&mut self, meta: &mut Metadata) -> Result<(), Signal> {
            if !meta.contains("trace") {
                meta.insert("trace", json!([]));
            }
            if let Some(Value::Array(entries)) = meta.get_mut("trace") {
                entries.push(json!("core"));
            }
            Ok(())
        }
    }

    fn probe() -> Instance<Probe> {
        Instance::new(Inputs::new()).unwrap()
    }

    #[test]
    fn around_nesting_is_first_registered_outermost() {
        let hooks = Hooks::new()
            .around(|ctx: &mut dyn Perform, next: Next<'_, ()>| {
                push(ctx, "a1:pre");
                let value = next.run(ctx)?;
                push(ctx, "a1:post");
                Ok(value)
            })
            .around(|ctx: &mut dyn Perform, next: Next<'_, ()>| {
                push(ctx, "a2:pre");
                let value = next.run(ctx)?;
                push(ctx, "a2:post");
                Ok(value)
            });

        let outcome = Runner::<Probe>::with_hooks(hooks).run(probe());
        assert_eq!(
            trace(&outcome),
            vec!["a1:pre", "a2:pre", "core", "a2:post", "a1:post"]
        );
    }

    #[test]
    fn before_signal_skips_core_and_around() {
        let hooks = Hooks::new()
            .before(|_ctx| Err(Signal::new("halt")))
            .around(|ctx: &mut dyn Perform, next: Next<'_, ()>| {
                push(ctx, "around");
                next.run(ctx)
            });

        let outcome = Runner::<Probe>::with_hooks(hooks).run(probe());
        assert!(outcome.is_failure());
        assert_eq!(trace(&outcome), Vec::<String>::new());
    }

    #[test]
    fn after_hooks_skipped_on_signal() {
        let hooks = Hooks::new()
            .around(|_ctx: &mut dyn Perform, _next: Next<'_, ()>| Err(Signal::new("halt")))
            .after(|ctx| {
                push(ctx, "after");
                Ok(())
            });

        let outcome = Runner::<Probe>::with_hooks(hooks).run(probe());
        assert!(outcome.is_failure());
        assert_eq!(trace(&outcome), Vec::<String>::new());
    }

    #[test]
    fn signal_from_after_hook_is_caught() {
        let hooks = Hooks::new().after(|_ctx| Err(Signal::new("late").with("stage", "after")));

        let outcome = Runner::<Probe>::with_hooks(hooks).run(probe());
        assert_eq!(outcome.error(), Some(&json!("late")));
        assert_eq!(outcome.meta().get("stage"), Some(&json!("after")));
    }

    #[test]
    fn runner_drives_many_instances() {
        let runner = Runner::<Probe>::with_hooks(Hooks::new());
        assert!(runner.run(probe()).is_success());
        assert!(runner.run(probe()).is_success());
    }
}
