//! The two-variant result model returned by every invocation.
//!
//! An [`Outcome`] is either `Success { value, meta }` or
//! `Failure { error, meta, retained }`. Both variants always carry a
//! metadata mapping; it defaults to empty only when an outcome is
//! constructed outside the engine via [`Outcome::success`] /
//! [`Outcome::failure`].
//!
//! The `retained` slot on the Failure variant holds the original
//! [`Signal`] when the failure was produced by the engine catching one.
//! Signals are not JSON values, so the slot is typed rather than stored in
//! the metadata mapping; it lets [`Outcome::unwind`] re-raise the exact
//! original signal for diagnostics.
//!
//! # Introspection
//!
//! Variants and their fields are public, so consumers can pattern-match
//! directly:
//!
//! ```
//! use operon_system::outcome::Outcome;
//!
//! let outcome: Outcome<String> = Outcome::success("done".to_string());
//!
//! match outcome {
//!     Outcome::Success { value, meta } => {
//!         assert_eq!(value, "done");
//!         assert!(meta.is_empty());
//!     }
//!     Outcome::Failure { error, .. } => panic!("unexpected failure: {error}"),
//! }
//! ```

use crate::meta::Metadata;
use crate::signal::Signal;
use serde_json::Value;

// ─────────────────────────────────────────────────────────────────────────────
// Outcome
// ─────────────────────────────────────────────────────────────────────────────

/// The result of one invocation: a success value or a failure error, each
/// with metadata.
#[derive(Debug, PartialEq)]
pub enum Outcome<T> {
    /// The invocation completed normally.
    Success {
        /// The value produced by the chain.
        value: T,
        /// The instance metadata at completion.
        meta: Metadata,
    },
    /// The invocation raised a failure signal, or a failure was constructed
    /// directly.
    Failure {
        /// The error payload.
        error: Value,
        /// The instance metadata merged with the signal's fragment.
        meta: Metadata,
        /// The original signal, when this failure was produced by the
        /// engine catching one. `None` for directly constructed failures.
        retained: Option<Signal>,
    },
}

impl<T> Outcome<T> {
    /// Creates a Success outcome with empty metadata.
    #[must_use]
    pub fn success(value: T) -> Self {
        Self::Success {
            value,
            meta: Metadata::new(),
        }
    }

    /// Creates a Failure outcome with empty metadata and no retained
    /// signal.
    #[must_use]
    pub fn failure(error: impl Into<Value>) -> Self {
        Self::Failure {
            error: error.into(),
            meta: Metadata::new(),
            retained: None,
        }
    }

    /// Returns true for the Success variant.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns true for the Failure variant.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// Returns the metadata of either variant.
    #[must_use]
    pub fn meta(&self) -> &Metadata {
        match self {
            Self::Success { meta, .. } | Self::Failure { meta, .. } => meta,
        }
    }

    /// Returns the success value, if this is a Success.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success { value, .. } => Some(value),
            Self::Failure { .. } => None,
        }
    }

    /// Returns the error payload, if this is a Failure.
    #[must_use]
    pub fn error(&self) -> Option<&Value> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, .. } => Some(error),
        }
    }

    /// Consumes the outcome, returning the success value if present.
    #[must_use]
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Success { value, .. } => Some(value),
            Self::Failure { .. } => None,
        }
    }

    /// Maps the success value, leaving failures (and all metadata)
    /// untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Success { value, meta } => Outcome::Success {
                value: f(value),
                meta,
            },
            Self::Failure {
                error,
                meta,
                retained,
            } => Outcome::Failure {
                error,
                meta,
                retained,
            },
        }
    }

    /// Projects the outcome into the strict contract:
    ///
    /// - Success → `Ok(Unwound::Value(value))`;
    /// - Failure with a retained signal → `Err(signal)`, the exact
    ///   original;
    /// - Failure without a retained signal (constructed directly, without
    ///   the signal mechanism) → `Ok(Unwound::Failure(outcome))`, the
    ///   failure object unmodified.
    ///
    /// # Errors
    ///
    /// Returns the retained [`Signal`] for engine-produced failures.
    pub fn unwind(self) -> Result<Unwound<T>, Signal> {
        match self {
            Self::Success { value, .. } => Ok(Unwound::Value(value)),
            Self::Failure {
                retained: Some(signal),
                ..
            } => Err(signal),
            failure => Ok(Unwound::Failure(failure)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Unwound
// ─────────────────────────────────────────────────────────────────────────────

/// The `Ok` arm of [`Outcome::unwind`].
///
/// `Failure` holds an outcome that is always the Failure variant: a failure
/// constructed directly by core logic, which the strict contract passes
/// through unmodified instead of raising.
#[derive(Debug, PartialEq)]
pub enum Unwound<T> {
    /// The unwrapped success value.
    Value(T),
    /// A signal-less failure, returned as-is.
    Failure(Outcome<T>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn constructors_default_to_empty_meta() {
        let success: Outcome<i32> = Outcome::success(5);
        assert!(success.is_success());
        assert!(success.meta().is_empty());
        assert_eq!(success.value(), Some(&5));

        let failure: Outcome<i32> = Outcome::failure("bad");
        assert!(failure.is_failure());
        assert!(failure.meta().is_empty());
        assert_eq!(failure.error(), Some(&json!("bad")));
    }

    #[test]
    fn map_transforms_only_success() {
        let doubled = Outcome::success(21).map(|v| v * 2);
        assert_eq!(doubled.into_value(), Some(42));

        let failure: Outcome<i32> = Outcome::failure("bad");
        let mapped = failure.map(|v| v * 2);
        assert_eq!(mapped.error(), Some(&json!("bad")));
    }

    #[test]
    fn unwind_unwraps_success() {
        let outcome = Outcome::success("v".to_string());
        assert_eq!(outcome.unwind(), Ok(Unwound::Value("v".to_string())));
    }

    #[test]
    fn unwind_raises_retained_signal() {
        let signal = Signal::new("bad").with("reason", "x");
        let outcome: Outcome<i32> = Outcome::Failure {
            error: signal.payload().clone(),
            meta: Metadata::new(),
            retained: Some(signal.clone()),
        };

        assert_eq!(outcome.unwind(), Err(signal));
    }

    // A failure that never went through the signal mechanism is returned
    // as-is, not raised and not unwrapped.
    #[test]
    fn unwind_passes_through_signal_less_failure() {
        let outcome: Outcome<i32> = Outcome::failure("direct");

        match outcome.unwind() {
            Ok(Unwound::Failure(Outcome::Failure {
                error, retained, ..
            })) => {
                assert_eq!(error, json!("direct"));
                assert!(retained.is_none());
            }
            other => panic!("expected pass-through failure, got {other:?}"),
        }
    }
}
