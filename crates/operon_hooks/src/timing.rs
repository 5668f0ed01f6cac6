//! Elapsed-time measurement for action invocations.
//!
//! [`Timing`] produces an around hook that records how long the rest of
//! the chain took, in milliseconds, into the instance metadata. Because it
//! is an around hook it observes both exits: the measurement lands in the
//! metadata whether the chain returned normally or raised a failure
//! signal. (After hooks are skipped on a raise, which is exactly why
//! measurement belongs in an around hook.)
//!
//! # Example
//!
//! ```
//! use operon_hooks::Timing;
//! use operon_system::prelude::*;
//!
//! struct Sleepy;
//!
//! impl Action for Sleepy {
//!     type Props = NoProps;
//!     type Value = ();
//!     const NAME: &'static str = "sleepy";
//!
//!     fn from_props(_props: NoProps) -> Self {
//!         Sleepy
//!     }
//!
//!     fn execute(&mut self, _meta: &mut Metadata) -> Result<(), Signal> {
//!         Ok(())
//!     }
//!
//!     fn hooks() -> Hooks<()> {
//!         Hooks::new().around(Timing::new().hook())
//!     }
//! }
//!
//! let outcome = Instance::<Sleepy>::new(Inputs::new()).unwrap().run();
//! assert!(outcome.meta().contains("elapsed_ms"));
//! ```

use operon_system::engine::Next;
use operon_system::prelude::{Perform, Signal};
use std::time::Instant;

/// Default metadata key the measurement is recorded under.
pub const ELAPSED_KEY: &str = "elapsed_ms";

/// Builder for an elapsed-time around hook.
#[derive(Debug, Clone)]
pub struct Timing {
    key: String,
}

impl Timing {
    /// Creates a timing hook recording under [`ELAPSED_KEY`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            key: ELAPSED_KEY.to_string(),
        }
    }

    /// Records under a custom metadata key instead.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Builds the around hook.
    #[must_use]
    pub fn hook<V>(
        self,
    ) -> impl for<'a> Fn(&mut dyn Perform, Next<'a, V>) -> Result<V, Signal> + Send + Sync + 'static
    {
        move |ctx: &mut dyn Perform, next: Next<'_, V>| {
            let start = Instant::now();
            let result = next.run(ctx);
            let elapsed = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            ctx.meta_mut().insert(self.key.clone(), elapsed);
            result
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use operon_system::prelude::*;
    use serde_json::json;

    struct Slow;

    impl Action for Slow {
        type Props = NoProps;
        type Value = ();
        const NAME: &'static str = "slow";

        fn from_props(_props: NoProps) -> Self {
            Slow
        }

        fn execute(&mut self, _meta: &mut Metadata) -> Result<(), Signal> {
            std::thread::sleep(std::time::Duration::from_millis(5));
            Ok(())
        }
    }

    struct Doomed;

    impl Action for Doomed {
        type Props = NoProps;
        type Value = ();
        const NAME: &'static str = "doomed";

        fn from_props(_props: NoProps) -> Self {
            Doomed
        }

        fn execute(&mut self, _meta: &mut Metadata) -> Result<(), Signal> {
            Err(Signal::new("down"))
        }
    }

    #[test]
    fn records_elapsed_milliseconds() {
        let hooks = Hooks::new().around(Timing::new().hook());
        let outcome =
            Runner::<Slow>::with_hooks(hooks).run(Instance::new(Inputs::new()).unwrap());

        let elapsed = outcome.meta().get(ELAPSED_KEY).unwrap().as_u64().unwrap();
        assert!(elapsed >= 5);
    }

    #[test]
    fn records_even_when_the_chain_raises() {
        let hooks = Hooks::new().around(Timing::new().with_key("took").hook());
        let outcome =
            Runner::<Doomed>::with_hooks(hooks).run(Instance::new(Inputs::new()).unwrap());

        assert_eq!(outcome.error(), Some(&json!("down")));
        assert!(outcome.meta().contains("took"));
    }
}
