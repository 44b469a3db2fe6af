//! Assertion helpers for idempotency behavioural tests.

use poddiff::reconcile::Plan;
use rstest_bdd_macros::then;

use super::StepResult;
use super::state::{IdempotencyState, PlanOutcome};

fn planned(idempotency_state: &IdempotencyState) -> StepResult<Plan> {
    match idempotency_state.outcome.get() {
        Some(PlanOutcome::Planned(plan)) => Ok(plan),
        Some(PlanOutcome::Failed(message)) => Err(format!("planning failed: {message}")),
        None => Err(String::from("the resource should have been planned")),
    }
}

#[then("the action is {action}")]
fn action_is(idempotency_state: &IdempotencyState, action: String) -> StepResult<()> {
    let plan = planned(idempotency_state)?;
    let actual = plan.action.to_string();
    if actual == action {
        Ok(())
    } else {
        Err(format!("expected action {action}, got {actual}"))
    }
}

#[then("the create command is {command}")]
fn create_command_is(idempotency_state: &IdempotencyState, command: String) -> StepResult<()> {
    let plan = planned(idempotency_state)?;
    let argv = plan
        .command
        .ok_or_else(|| String::from("a create command should be planned"))?;
    let rendered = argv.join(" ");
    if rendered == command {
        Ok(())
    } else {
        Err(format!("expected command '{command}', got '{rendered}'"))
    }
}

#[then("no differences are reported")]
fn no_differences(idempotency_state: &IdempotencyState) -> StepResult<()> {
    let plan = planned(idempotency_state)?;
    if plan.diff.is_different() {
        let rendered = plan.diff.render();
        return Err(format!(
            "expected no differences, got:\n{}{}",
            rendered.before, rendered.after
        ));
    }
    Ok(())
}

#[then("the differences cover {param}")]
fn differences_cover(idempotency_state: &IdempotencyState, param: String) -> StepResult<()> {
    let plan = planned(idempotency_state)?;
    if plan.diff.params().any(|name| name == param) {
        Ok(())
    } else {
        let found: Vec<&str> = plan.diff.params().collect();
        Err(format!("expected {param} among {found:?}"))
    }
}

#[then("the observed {param} is {value}")]
fn observed_value_is(
    idempotency_state: &IdempotencyState,
    param: String,
    value: String,
) -> StepResult<()> {
    let plan = planned(idempotency_state)?;
    let observed = plan
        .diff
        .before()
        .get(&param)
        .map(ToString::to_string)
        .ok_or_else(|| format!("{param} should differ"))?;
    if observed == value {
        Ok(())
    } else {
        Err(format!("expected observed {param} {value}, got {observed}"))
    }
}

#[then("the requested {param} is reported as {value}")]
fn desired_value_is(
    idempotency_state: &IdempotencyState,
    param: String,
    value: String,
) -> StepResult<()> {
    let plan = planned(idempotency_state)?;
    let requested = plan
        .diff
        .after()
        .get(&param)
        .map(ToString::to_string)
        .ok_or_else(|| format!("{param} should differ"))?;
    if requested == value {
        Ok(())
    } else {
        Err(format!("expected desired {param} {value}, got {requested}"))
    }
}

#[then("planning fails mentioning {fragment}")]
fn planning_fails(idempotency_state: &IdempotencyState, fragment: String) -> StepResult<()> {
    match idempotency_state.outcome.get() {
        Some(PlanOutcome::Failed(message)) if message.contains(&fragment) => Ok(()),
        Some(PlanOutcome::Failed(message)) => {
            Err(format!("expected an error mentioning '{fragment}', got '{message}'"))
        }
        Some(PlanOutcome::Planned(plan)) => {
            Err(format!("expected planning to fail, got {}", plan.action))
        }
        None => Err(String::from("the resource should have been planned")),
    }
}
