//! A synchronous execution engine for composable business actions.
//!

pub use operon_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use operon_internal::prelude::*;
}
