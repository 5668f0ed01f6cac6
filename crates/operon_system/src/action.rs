//! Action definition primitives.
//!
//! This module provides the core abstractions for defining actions:
//! single-purpose units of business logic with validated inputs and one
//! core operation.
//!
//! Two traits split the typed and the erased view, so hooks can be written
//! once and shared across action types:
//!
//! - [`Action`] is the typed trait: property and value types, the core
//!   operation, and the type-level schema and hook descriptors.
//! - [`Perform`] is the object-safe capability interface hooks are written
//!   against: metadata access, the action name, and downcasting back to
//!   the concrete [`Instance`] when a hook needs typed access.
//!
//! # Example
//!
//! ```
//! use operon_system::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Greet {
//!     name: String,
//! }
//!
//! impl Action for Greet {
//!     type Props = Self;
//!     type Value = String;
//!     const NAME: &'static str = "greet";
//!
//!     fn from_props(props: Self) -> Self {
//!         props
//!     }
//!
//!     fn execute(&mut self, _meta: &mut Metadata) -> Result<String, Signal> {
//!         Ok(format!("Hello {}", self.name))
//!     }
//! }
//!
//! let instance = Instance::<Greet>::new(Inputs::new().with("name", "Alice")).unwrap();
//! let outcome = instance.run();
//! assert_eq!(outcome.value(), Some(&"Hello Alice".to_string()));
//! ```

use crate::engine::{Next, Runner};
use crate::hook::Hooks;
use crate::meta::{Metadata, PROPS_KEY, TYPE_KEY};
use crate::outcome::{Outcome, Unwound};
use crate::schema::{Inputs, Schema, ValidationError};
use crate::signal::Signal;
use downcast_rs::{Downcast, impl_downcast};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

// ─────────────────────────────────────────────────────────────────────────────
// Perform
// ─────────────────────────────────────────────────────────────────────────────

/// Object-safe capability interface over a running instance.
///
/// Hooks receive `&mut dyn Perform`, which gives them the metadata snapshot
/// and the action name without knowing the concrete type. A hook that needs
/// typed access downcasts:
///
/// ```ignore
/// |ctx: &mut dyn Perform| {
///     if let Some(instance) = ctx.downcast_mut::<Instance<Greet>>() {
///         instance.action_mut().name.make_ascii_uppercase();
///     }
///     Ok(())
/// }
/// ```
pub trait Perform: Downcast {
    /// The action's declared name.
    fn name(&self) -> &'static str;

    /// Immutable metadata access.
    fn meta(&self) -> &Metadata;

    /// Mutable metadata access.
    fn meta_mut(&mut self) -> &mut Metadata;
}

impl_downcast!(Perform);

// ─────────────────────────────────────────────────────────────────────────────
// Action
// ─────────────────────────────────────────────────────────────────────────────

/// A single-purpose unit of business logic.
///
/// An action declares its validated input properties (`Props`), its success
/// value (`Value` — the narrowed Success constraint for this type), a core
/// operation, and type-level descriptors for its input schema and hook
/// registry.
///
/// # Subtyping
///
/// A "subtype" is another action type whose [`hooks()`](Action::hooks)
/// starts from [`Hooks::inherit`] of the parent's registry. The copy is by
/// value: registries of parent and child stay independent.
///
/// # Named hooks
///
/// Named hook references registered via
/// [`Hooks::before_named`](crate::hook::Hooks::before_named) (and friends)
/// resolve against [`dispatch`](Action::dispatch) /
/// [`dispatch_around`](Action::dispatch_around) at call time. Both are
/// associated functions receiving the erased context — and, for around
/// hooks, the continuation — so an implementation is free to ignore either.
/// The defaults treat any name as a programming defect and panic.
pub trait Action: Sized + 'static {
    /// Validated input properties, produced by the schema collaborator.
    type Props: Serialize + DeserializeOwned;

    /// The success value this type's chain produces.
    type Value: 'static;

    /// Stable action name, recorded in the metadata snapshot under
    /// [`TYPE_KEY`].
    const NAME: &'static str;

    /// Assembles the action from validated properties.
    fn from_props(props: Self::Props) -> Self;

    /// The core operation.
    ///
    /// # Errors
    ///
    /// Returns a [`Signal`] to request an early Failure outcome.
    fn execute(&mut self, meta: &mut Metadata) -> Result<Self::Value, Signal>;

    /// The declared input schema. Defaults to the empty pass-through
    /// schema.
    #[must_use]
    fn schema() -> Schema {
        Schema::new()
    }

    /// The type's hook registry. Defaults to no hooks.
    #[must_use]
    fn hooks() -> Hooks<Self::Value> {
        Hooks::new()
    }

    /// Resolves a named before/after hook against this type.
    ///
    /// # Errors
    ///
    /// Returns a [`Signal`] if the named hook raises one.
    ///
    /// # Panics
    ///
    /// The default implementation panics: an unrecognized name is a
    /// programming defect, not a domain failure.
    fn dispatch(name: &str, _ctx: &mut dyn Perform) -> Result<(), Signal> {
        panic!("action '{}' has no named hook '{name}'", Self::NAME)
    }

    /// Resolves a named around hook against this type.
    ///
    /// # Errors
    ///
    /// Returns a [`Signal`] if the named hook raises one.
    ///
    /// # Panics
    ///
    /// The default implementation panics: an unrecognized name is a
    /// programming defect, not a domain failure.
    fn dispatch_around(
        name: &str,
        _ctx: &mut dyn Perform,
        _next: Next<'_, Self::Value>,
    ) -> Result<Self::Value, Signal> {
        panic!("action '{}' has no named around hook '{name}'", Self::NAME)
    }

    /// Factory helper for the narrowed Success value.
    ///
    /// # Errors
    ///
    /// Never fails; the `Result` shape matches [`execute`](Action::execute).
    fn ok(value: Self::Value) -> Result<Self::Value, Signal> {
        Ok(value)
    }

    /// Factory helper raising a failure signal from the core operation.
    ///
    /// # Errors
    ///
    /// Always fails with the given payload.
    fn abort(payload: impl Into<Value>) -> Result<Self::Value, Signal> {
        Err(Signal::new(payload))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Instance
// ─────────────────────────────────────────────────────────────────────────────

/// One action instance: validated properties plus one metadata snapshot.
///
/// Created once per invocation and consumed by
/// [`run`](Instance::run) / [`run_strict`](Instance::run_strict) — one
/// instance, one invocation, enforced by move semantics. Property values
/// are fixed after construction; the metadata snapshot stays mutable for
/// hooks and the core operation.
pub struct Instance<A: Action> {
    action: A,
    meta: Metadata,
}

impl<A: Action> Instance<A> {
    /// Validates `inputs` and constructs an instance.
    ///
    /// Validation happens before the metadata snapshot is populated and
    /// before any hook can run; immediately after construction the
    /// snapshot contains the type identity and the validated property
    /// values.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the inputs fail structural
    /// resolution or typed coercion. The failure is fatal: no instance
    /// exists and no hook observes it.
    pub fn new(inputs: Inputs) -> Result<Self, ValidationError> {
        let resolved = A::schema().resolve(inputs)?;
        let props: A::Props = serde_json::from_value(Value::Object(resolved))
            .map_err(|source| ValidationError::Coerce { source })?;
        Self::from_props(props)
    }

    /// Constructs an instance from already-typed properties, bypassing
    /// structural resolution.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Serialize`] if the properties cannot be
    /// recorded in the metadata snapshot.
    pub fn from_props(props: A::Props) -> Result<Self, ValidationError> {
        let recorded = serde_json::to_value(&props)
            .map_err(|source| ValidationError::Serialize { source })?;

        let mut meta = Metadata::new();
        meta.insert(TYPE_KEY, A::NAME);
        meta.insert(PROPS_KEY, recorded);

        Ok(Self {
            action: A::from_props(props),
            meta,
        })
    }

    /// Returns the action value.
    #[must_use]
    pub fn action(&self) -> &A {
        &self.action
    }

    /// Returns the action value mutably.
    pub fn action_mut(&mut self) -> &mut A {
        &mut self.action
    }

    /// Runs the instance through a one-shot [`Runner`].
    #[must_use]
    pub fn run(self) -> Outcome<A::Value> {
        Runner::new().run(self)
    }

    /// Runs the instance through a one-shot [`Runner`] with the strict
    /// contract.
    ///
    /// # Errors
    ///
    /// Re-raises the retained [`Signal`] when the invocation failed through
    /// the signal mechanism.
    pub fn run_strict(self) -> Result<Unwound<A::Value>, Signal> {
        Runner::new().run_strict(self)
    }

    /// Invokes the core operation against the split instance state.
    pub(crate) fn execute_core(&mut self) -> Result<A::Value, Signal> {
        let Self { action, meta } = self;
        action.execute(meta)
    }

    /// Consumes the instance, yielding its metadata snapshot.
    pub(crate) fn into_meta(self) -> Metadata {
        self.meta
    }
}

impl<A: Action> Perform for Instance<A> {
    fn name(&self) -> &'static str {
        A::NAME
    }

    fn meta(&self) -> &Metadata {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Metadata {
        &mut self.meta
    }
}

impl<A: Action> core::fmt::Debug for Instance<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Instance")
            .field("action", &A::NAME)
            .field("meta", &self.meta)
            .finish()
    }
}
