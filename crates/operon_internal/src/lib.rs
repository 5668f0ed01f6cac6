//! # Operon Internal Library
//!
//! Re-exports the core Operon crates for convenience.

/// Layer 1: the hook-chain execution engine.
pub use operon_system;

/// Layer 2: stock infrastructure hooks.
pub use operon_hooks;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use operon_hooks::{TraceHooks, Timing};
    pub use operon_system::prelude::*;
}
