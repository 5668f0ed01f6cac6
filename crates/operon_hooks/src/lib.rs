//! Stock infrastructure hooks for Operon actions.
//!
//! This crate provides hooks most Operon applications want on their
//! action chains, built entirely on the public `operon_system` surface:
//!
//! - [`Timing`] - elapsed-time measurement recorded into metadata
//! - [`TraceHooks`] - `tracing` events as the chain progresses
//!
//! # Example
//!
//! ```
//! use operon_hooks::{Timing, TraceHooks};
//! use operon_system::hook::Hooks;
//!
//! let trace = TraceHooks::new();
//! let hooks: Hooks<String> = Hooks::new()
//!     .before(trace.enter())
//!     .around(Timing::new().hook())
//!     .around(trace.observe());
//! ```
//!
//! # Architecture
//!
//! This crate is Layer 2 of the Operon architecture:
//!
//! - **Layer 1** (`operon_system`): the execution engine
//! - **Layer 2** (`operon_hooks`): stock hooks over the engine's public
//!   surface (this crate)

mod timing;
mod trace;

pub use timing::{ELAPSED_KEY, Timing};
pub use trace::TraceHooks;
