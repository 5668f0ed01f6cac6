//! Tests for the stock hooks composed onto a realistic action family.

use operon_hooks::{ELAPSED_KEY, TraceHooks, Timing};
use operon_system::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

#[derive(Debug, Serialize, Deserialize)]
struct Charge {
    amount: i64,
}

impl Action for Charge {
    type Props = Self;
    type Value = i64;
    const NAME: &'static str = "charge";

    fn from_props(props: Self) -> Self {
        props
    }

    fn execute(&mut self, _meta: &mut Metadata) -> Result<i64, Signal> {
        if self.amount <= 0 {
            return Self::abort("amount must be positive");
        }
        Ok(self.amount)
    }

    fn hooks() -> Hooks<i64> {
        let trace = TraceHooks::new().with_meta(true);
        Hooks::new()
            .before(trace.enter())
            .around(Timing::new().hook())
            .around(trace.observe())
            .after(trace.leave())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct AuditedCharge {
    amount: i64,
}

impl Action for AuditedCharge {
    type Props = Self;
    type Value = i64;
    const NAME: &'static str = "audited_charge";

    fn from_props(props: Self) -> Self {
        props
    }

    fn execute(&mut self, _meta: &mut Metadata) -> Result<i64, Signal> {
        Ok(self.amount)
    }

    fn hooks() -> Hooks<i64> {
        Hooks::inherit(&Charge::hooks()).before(|ctx| {
            ctx.meta_mut().insert("audited", true);
            Ok(())
        })
    }
}

#[test]
fn full_stack_success_records_timing() {
    init_tracing();

    let outcome = Instance::<Charge>::new(Inputs::new().with("amount", 50))
        .unwrap()
        .run();

    assert_eq!(outcome.value(), Some(&50));
    assert!(outcome.meta().contains(ELAPSED_KEY));
    assert_eq!(outcome.meta().get(PROPS_KEY), Some(&json!({ "amount": 50 })));
}

#[test]
fn full_stack_failure_still_records_timing() {
    init_tracing();

    let outcome = Instance::<Charge>::new(Inputs::new().with("amount", 0))
        .unwrap()
        .run();

    assert_eq!(outcome.error(), Some(&json!("amount must be positive")));
    assert!(outcome.meta().contains(ELAPSED_KEY));
}

#[test]
fn inherited_stack_adds_without_touching_the_parent() {
    init_tracing();

    let outcome = Instance::<AuditedCharge>::new(Inputs::new().with("amount", 10))
        .unwrap()
        .run();

    assert_eq!(outcome.value(), Some(&10));
    assert_eq!(outcome.meta().get("audited"), Some(&json!(true)));
    assert!(outcome.meta().contains(ELAPSED_KEY));

    assert_eq!(Charge::hooks().count(HookKind::Before), 1);
    assert_eq!(AuditedCharge::hooks().count(HookKind::Before), 2);
}
