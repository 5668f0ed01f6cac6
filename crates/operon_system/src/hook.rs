//! Hook registry: per-type ordered lists of before/after/around hooks.
//!
//! A [`Hooks<V>`] value is the explicit registry owned by an action type's
//! descriptor ([`Action::hooks`](crate::action::Action::hooks)). It holds
//! three ordered lists; hooks execute in registration order within each
//! kind, with no reordering or priority concept.
//!
//! Each entry is a tagged descriptor: an inline closure over the erased
//! instance context, or a named reference resolved against the action
//! type's dispatch capability at run time.
//!
//! # Inheritance
//!
//! Subtyping copies the registry by value: a child type builds its registry
//! with [`Hooks::inherit`], which produces an independent copy of the
//! parent's three lists. Later mutation of either registry never affects
//! the other.
//!
//! ```
//! use operon_system::hook::{HookKind, Hooks};
//!
//! let parent: Hooks<String> = Hooks::new().before(|ctx| {
//!     ctx.meta_mut().insert("audited", true);
//!     Ok(())
//! });
//!
//! let child = Hooks::inherit(&parent).before(|ctx| {
//!     ctx.meta_mut().insert("narrowed", true);
//!     Ok(())
//! });
//!
//! assert_eq!(parent.count(HookKind::Before), 1);
//! assert_eq!(child.count(HookKind::Before), 2);
//! ```

use crate::action::Perform;
use crate::engine::Next;
use crate::signal::Signal;
use std::sync::Arc;

/// Inline before/after hook body.
pub(crate) type HookFn = Arc<dyn Fn(&mut dyn Perform) -> Result<(), Signal> + Send + Sync>;

/// Inline around hook body, receiving the continuation for the rest of the
/// chain.
pub(crate) type AroundFn<V> =
    Arc<dyn for<'a> Fn(&mut dyn Perform, Next<'a, V>) -> Result<V, Signal> + Send + Sync>;

// ─────────────────────────────────────────────────────────────────────────────
// Descriptors
// ─────────────────────────────────────────────────────────────────────────────

/// The position of a hook relative to the core operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// Runs before the around chain.
    Before,
    /// Runs after the around chain, only on normal return.
    After,
    /// Wraps the core operation and inner around hooks.
    Around,
}

pub(crate) enum HookBody {
    Closure(HookFn),
    Named(&'static str),
}

impl Clone for HookBody {
    fn clone(&self) -> Self {
        match self {
            Self::Closure(f) => Self::Closure(Arc::clone(f)),
            Self::Named(name) => Self::Named(name),
        }
    }
}

impl core::fmt::Debug for HookBody {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Closure(_) => f.write_str("Closure"),
            Self::Named(name) => write!(f, "Named({name})"),
        }
    }
}

pub(crate) enum AroundBody<V: 'static> {
    Closure(AroundFn<V>),
    Named(&'static str),
}

impl<V: 'static> Clone for AroundBody<V> {
    fn clone(&self) -> Self {
        match self {
            Self::Closure(f) => Self::Closure(Arc::clone(f)),
            Self::Named(name) => Self::Named(name),
        }
    }
}

impl<V: 'static> core::fmt::Debug for AroundBody<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Closure(_) => f.write_str("Closure"),
            Self::Named(name) => write!(f, "Named({name})"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Registration
// ─────────────────────────────────────────────────────────────────────────────

/// A single registration: an inline closure or one-or-more named
/// references, but never both and never neither.
///
/// The builder methods of [`Hooks`] cannot produce an invalid combination;
/// [`Hooks::register`] accepts a `Registration` directly and validates it.
pub struct Registration<V: 'static> {
    body: Option<RegistrationBody<V>>,
    names: Vec<&'static str>,
}

enum RegistrationBody<V: 'static> {
    Plain(HookFn),
    Around(AroundFn<V>),
}

impl<V: 'static> Registration<V> {
    /// Creates an empty registration (invalid until a body or name is
    /// supplied).
    #[must_use]
    pub fn new() -> Self {
        Self {
            body: None,
            names: Vec::new(),
        }
    }

    /// A registration carrying an inline before/after closure.
    #[must_use]
    pub fn closure(
        f: impl Fn(&mut dyn Perform) -> Result<(), Signal> + Send + Sync + 'static,
    ) -> Self {
        Self {
            body: Some(RegistrationBody::Plain(Arc::new(f))),
            names: Vec::new(),
        }
    }

    /// A registration carrying an inline around closure.
    #[must_use]
    pub fn around(
        f: impl for<'a> Fn(&mut dyn Perform, Next<'a, V>) -> Result<V, Signal>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            body: Some(RegistrationBody::Around(Arc::new(f))),
            names: Vec::new(),
        }
    }

    /// A registration carrying a single named reference.
    #[must_use]
    pub fn named(name: &'static str) -> Self {
        Self::new().and_named(name)
    }

    /// Adds a named reference.
    #[must_use]
    pub fn and_named(mut self, name: &'static str) -> Self {
        self.names.push(name);
        self
    }
}

impl<V: 'static> Default for Registration<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Registration-time error, surfaced immediately rather than deferred to
/// invocation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegisterError {
    /// Both an inline closure and named references were supplied.
    #[error("a registration takes an inline closure or named references, not both")]
    ClosureAndNamed,

    /// Neither a closure nor a named reference was supplied.
    #[error("a registration requires an inline closure or at least one named reference")]
    Empty,

    /// The closure shape does not match the hook kind (around closures take
    /// the continuation; before/after closures do not).
    #[error("closure shape does not match {kind:?} registration")]
    Shape {
        /// The kind the registration targeted.
        kind: HookKind,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Hooks
// ─────────────────────────────────────────────────────────────────────────────

/// The ordered before/after/around lists of one action type.
///
/// `V` is the success value type the around chain threads through.
pub struct Hooks<V: 'static> {
    pub(crate) before: Vec<HookBody>,
    pub(crate) after: Vec<HookBody>,
    pub(crate) around: Vec<AroundBody<V>>,
}

impl<V: 'static> Hooks<V> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            before: Vec::new(),
            after: Vec::new(),
            around: Vec::new(),
        }
    }

    /// Copies a parent registry into an independent child registry.
    ///
    /// Hook bodies are shared (`Arc`); the lists are owned, so appending to
    /// either registry afterwards never affects the other.
    #[must_use]
    pub fn inherit(parent: &Hooks<V>) -> Self {
        Self {
            before: parent.before.clone(),
            after: parent.after.clone(),
            around: parent.around.clone(),
        }
    }

    /// Appends an inline before hook.
    #[must_use]
    pub fn before(
        mut self,
        f: impl Fn(&mut dyn Perform) -> Result<(), Signal> + Send + Sync + 'static,
    ) -> Self {
        self.before.push(HookBody::Closure(Arc::new(f)));
        self
    }

    /// Appends an inline after hook.
    #[must_use]
    pub fn after(
        mut self,
        f: impl Fn(&mut dyn Perform) -> Result<(), Signal> + Send + Sync + 'static,
    ) -> Self {
        self.after.push(HookBody::Closure(Arc::new(f)));
        self
    }

    /// Appends an inline around hook.
    #[must_use]
    pub fn around(
        mut self,
        f: impl for<'a> Fn(&mut dyn Perform, Next<'a, V>) -> Result<V, Signal>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.around.push(AroundBody::Closure(Arc::new(f)));
        self
    }

    /// Appends named before hooks, individually, in order.
    ///
    /// # Panics
    ///
    /// Panics if `names` is empty (a registration-time defect).
    #[must_use]
    pub fn before_named(mut self, names: impl IntoIterator<Item = &'static str>) -> Self {
        self.push_named(HookKind::Before, names);
        self
    }

    /// Appends named after hooks, individually, in order.
    ///
    /// # Panics
    ///
    /// Panics if `names` is empty.
    #[must_use]
    pub fn after_named(mut self, names: impl IntoIterator<Item = &'static str>) -> Self {
        self.push_named(HookKind::After, names);
        self
    }

    /// Appends named around hooks, individually, in order.
    ///
    /// # Panics
    ///
    /// Panics if `names` is empty.
    #[must_use]
    pub fn around_named(mut self, names: impl IntoIterator<Item = &'static str>) -> Self {
        self.push_named(HookKind::Around, names);
        self
    }

    /// Appends a validated [`Registration`] to the list for `kind`.
    ///
    /// # Errors
    ///
    /// Returns a [`RegisterError`] if the registration carries both a
    /// closure and named references, neither, or a closure whose shape does
    /// not match `kind`.
    pub fn register(
        mut self,
        kind: HookKind,
        registration: Registration<V>,
    ) -> Result<Self, RegisterError> {
        let Registration { body, names } = registration;
        match (body, names.is_empty()) {
            (Some(_), false) => Err(RegisterError::ClosureAndNamed),
            (None, true) => Err(RegisterError::Empty),
            (Some(RegistrationBody::Plain(f)), true) => match kind {
                HookKind::Before => {
                    self.before.push(HookBody::Closure(f));
                    Ok(self)
                }
                HookKind::After => {
                    self.after.push(HookBody::Closure(f));
                    Ok(self)
                }
                HookKind::Around => Err(RegisterError::Shape { kind }),
            },
            (Some(RegistrationBody::Around(f)), true) => match kind {
                HookKind::Around => {
                    self.around.push(AroundBody::Closure(f));
                    Ok(self)
                }
                HookKind::Before | HookKind::After => Err(RegisterError::Shape { kind }),
            },
            (None, false) => {
                self.push_named(kind, names);
                Ok(self)
            }
        }
    }

    /// Returns the number of hooks registered for `kind`.
    #[must_use]
    pub fn count(&self, kind: HookKind) -> usize {
        match kind {
            HookKind::Before => self.before.len(),
            HookKind::After => self.after.len(),
            HookKind::Around => self.around.len(),
        }
    }

    /// Returns true if no hooks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty() && self.around.is_empty()
    }

    fn push_named(&mut self, kind: HookKind, names: impl IntoIterator<Item = &'static str>) {
        let mut pushed = 0usize;
        for name in names {
            match kind {
                HookKind::Before => self.before.push(HookBody::Named(name)),
                HookKind::After => self.after.push(HookBody::Named(name)),
                HookKind::Around => self.around.push(AroundBody::Named(name)),
            }
            pushed += 1;
        }
        assert!(pushed > 0, "named {kind:?} registration requires at least one name");
    }
}

impl<V: 'static> Clone for Hooks<V> {
    fn clone(&self) -> Self {
        Self::inherit(self)
    }
}

impl<V: 'static> Default for Hooks<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: 'static> core::fmt::Debug for Hooks<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hooks")
            .field("before", &self.before)
            .field("after", &self.after)
            .field("around", &self.around)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Registration<()> {
        Registration::closure(|_ctx| Ok(()))
    }

    #[test]
    fn hooks_append_in_order() {
        let hooks: Hooks<()> = Hooks::new()
            .before(|_| Ok(()))
            .before(|_| Ok(()))
            .after(|_| Ok(()));

        assert_eq!(hooks.count(HookKind::Before), 2);
        assert_eq!(hooks.count(HookKind::After), 1);
        assert_eq!(hooks.count(HookKind::Around), 0);
    }

    #[test]
    fn register_rejects_closure_and_named() {
        let err = Hooks::new()
            .register(HookKind::Before, noop().and_named("extra"))
            .unwrap_err();
        assert_eq!(err, RegisterError::ClosureAndNamed);
    }

    #[test]
    fn register_rejects_empty() {
        let err = Hooks::<()>::new()
            .register(HookKind::After, Registration::new())
            .unwrap_err();
        assert_eq!(err, RegisterError::Empty);
    }

    #[test]
    fn register_rejects_shape_mismatch() {
        let err = Hooks::<()>::new()
            .register(HookKind::Around, noop())
            .unwrap_err();
        assert_eq!(
            err,
            RegisterError::Shape {
                kind: HookKind::Around
            }
        );

        let err = Hooks::<()>::new()
            .register(
                HookKind::Before,
                Registration::around(|ctx: &mut dyn Perform, next: Next<'_, ()>| next.run(ctx)),
            )
            .unwrap_err();
        assert_eq!(
            err,
            RegisterError::Shape {
                kind: HookKind::Before
            }
        );
    }

    #[test]
    fn register_accepts_multiple_names_in_order() {
        let hooks: Hooks<()> = Hooks::new()
            .register(HookKind::Before, Registration::named("a").and_named("b"))
            .unwrap();
        assert_eq!(hooks.count(HookKind::Before), 2);
    }

    #[test]
    fn inherited_lists_are_independent() {
        let parent: Hooks<()> = Hooks::new().before(|_| Ok(()));
        let child = Hooks::inherit(&parent).before(|_| Ok(())).after(|_| Ok(()));

        assert_eq!(parent.count(HookKind::Before), 1);
        assert_eq!(parent.count(HookKind::After), 0);
        assert_eq!(child.count(HookKind::Before), 2);
        assert_eq!(child.count(HookKind::After), 1);
    }

    #[test]
    #[should_panic(expected = "at least one name")]
    fn empty_named_registration_panics() {
        let _ = Hooks::<()>::new().before_named([]);
    }
}
