//! Scenario state for idempotency behavioural tests.

use poddiff::reconcile::Plan;
use poddiff::resources::ResourceKind;
use poddiff::state::DesiredState;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use serde_json::Value;

/// Outcome of planning the desired resource.
#[derive(Debug, Clone)]
pub(crate) enum PlanOutcome {
    /// Planning produced a plan.
    Planned(Plan),
    /// Planning failed with the rendered error.
    Failed(String),
}

#[derive(Default, ScenarioState)]
pub(crate) struct IdempotencyState {
    pub(crate) engine_version: Slot<String>,
    pub(crate) full: Slot<bool>,
    pub(crate) kind: Slot<ResourceKind>,
    pub(crate) desired: Slot<DesiredState>,
    pub(crate) inspection: Slot<Value>,
    pub(crate) outcome: Slot<PlanOutcome>,
}

#[fixture]
pub(crate) fn idempotency_state() -> IdempotencyState {
    let state = IdempotencyState::default();
    state.engine_version.set(String::from("4.9.3"));
    state.full.set(false);
    state.desired.set(DesiredState::new());
    state
}
