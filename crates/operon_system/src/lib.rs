//! The synchronous hook-chain execution engine for Operon (Layer 1).
//!
//! `operon_system` provides the core primitives for building actions:
//! single-purpose units of business logic that accept typed inputs, run a
//! composable chain of lifecycle hooks around a core operation, and return
//! an explicit success/failure outcome carrying metadata.
//!
//! - [`action`] - Action trait, Perform capability interface, and instances
//! - [`engine`] - Chain assembly, the Runner boundary, and continuations
//! - [`hook`] - Per-type ordered hook registries
//! - [`meta`] - The mutable metadata snapshot on each instance
//! - [`outcome`] - The Success/Failure result model
//! - [`schema`] - Typed input validation at construction
//! - [`signal`] - The catchable domain-failure carrier
//!
//! # Architecture
//!
//! This crate is Layer 1 of the Operon architecture:
//!
//! - **Layer 1** (`operon_system`): the execution engine (this crate)
//! - **Layer 2** (`operon_hooks`): stock infrastructure hooks built on the
//!   public engine surface
//!
//! Execution is synchronous and cooperative: one invocation is one call
//! stack from [`Runner::run`](engine::Runner::run) through every hook and
//! the core operation. Instances are consumed by their invocation; there
//! is no pooling, no suspension point, and no timeout primitive — callers
//! layer those around the whole invocation when needed.
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
//!     fn execute(&mut self, meta: &mut Metadata) -> Result<String, Signal> {
//!         meta.insert("greeted", true);
//!         Ok(format!("Hello {}", self.name))
//!     }
//!
//!     fn hooks() -> Hooks<String> {
//!         Hooks::new().before(|ctx| {
//!             ctx.meta_mut().insert("started", true);
//!             Ok(())
//!         })
//!     }
//! }
//!
//! let instance = Instance::<Greet>::new(Inputs::new().with("name", "Alice")).unwrap();
//! let outcome = instance.run();
//!
//! assert_eq!(outcome.value(), Some(&"Hello Alice".to_string()));
//! assert!(outcome.meta().contains("started"));
//! assert!(outcome.meta().contains("greeted"));
//! ```

/// Action trait, Perform capability interface, and instances.
pub mod action;

/// Chain assembly, the Runner boundary, and continuations.
pub mod engine;

/// Per-type ordered hook registries.
pub mod hook;

/// The mutable metadata snapshot on each instance.
pub mod meta;

/// The Success/Failure result model.
pub mod outcome;

/// Typed input validation at construction.
pub mod schema;

/// The catchable domain-failure carrier.
pub mod signal;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::action::{Action, Instance, Perform};
    pub use crate::engine::{Next, Runner};
    pub use crate::hook::{HookKind, Hooks, RegisterError, Registration};
    pub use crate::meta::{Metadata, PROPS_KEY, TYPE_KEY};
    pub use crate::outcome::{Outcome, Unwound};
    pub use crate::schema::{Field, Inputs, NoProps, Schema, ValidationError};
    pub use crate::signal::Signal;
}
