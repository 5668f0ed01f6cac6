//! The catchable failure signal raised to request an early Failure outcome.
//!
//! A [`Signal`] carries an error payload and a metadata fragment. It exists
//! only transiently during a single invocation: hooks and the core operation
//! return it as the `Err` arm of their results, and the
//! [`Runner`](crate::engine::Runner) boundary catches it exactly once,
//! converting it into a Failure [`Outcome`](crate::outcome::Outcome).
//!
//! Any failure mode that is *not* a signal — an unknown named hook, a broken
//! invariant — is a programming defect and panics straight through the
//! engine; the signal is reserved for domain-level failures.

use crate::meta::Metadata;
use serde_json::Value;

/// A domain-level failure raised from a hook or the core operation.
///
/// # Example
///
/// ```
/// use operon_system::signal::Signal;
///
/// let signal = Signal::new("not found").with("reason", "missing record");
///
/// assert_eq!(signal.payload(), &serde_json::json!("not found"));
/// assert!(signal.fragment().contains("reason"));
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("action failure: {payload}")]
pub struct Signal {
    /// The error payload surfaced as the Failure outcome's error.
    payload: Value,
    /// Metadata merged into the instance metadata when the signal is caught.
    fragment: Metadata,
}

impl Signal {
    /// Creates a signal with the given payload and an empty metadata
    /// fragment.
    #[must_use]
    pub fn new(payload: impl Into<Value>) -> Self {
        Self {
            payload: payload.into(),
            fragment: Metadata::new(),
        }
    }

    /// Adds an entry to the metadata fragment.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fragment.insert(key, value);
        self
    }

    /// Returns the error payload.
    #[must_use]
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Returns the metadata fragment.
    #[must_use]
    pub fn fragment(&self) -> &Metadata {
        &self.fragment
    }

    /// Splits the signal into its payload and metadata fragment.
    #[must_use]
    pub fn into_parts(self) -> (Value, Metadata) {
        (self.payload, self.fragment)
    }
}
