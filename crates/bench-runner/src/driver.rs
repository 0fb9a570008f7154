//! Timeout-bounded execution of one planner run.
//!
//! The deadline is cooperative: it is checked between search steps, so a
//! single step that never returns cannot be interrupted from here. Hard
//! preemption needs the planner on its own killable thread or process.

use crate::error::HarnessError;
use bench_planner::{PlanModel, Planner};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBudget {
    pub timeout: Duration,
}

impl SearchBudget {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[derive(Debug)]
pub struct RunOutcome<M> {
    pub found_plan: bool,
    /// The plan when one was found, otherwise the most advanced partial
    /// model the solver retained. `None` when the solver kept nothing.
    pub terminal_model: Option<M>,
    pub expansions: u64,
    pub setup_time: Duration,
    pub solve_time: Duration,
    pub deadline_exceeded: bool,
}

pub fn run_search<P: Planner>(
    planner: &mut P,
    budget: SearchBudget,
    cancel: &AtomicBool,
) -> Result<RunOutcome<P::Model>, HarnessError> {
    planner.parse_domain()?;
    planner.parse_problem()?;

    let setup_start = Instant::now();
    planner.setup_search()?;
    let setup_time = setup_start.elapsed();
    debug!(setup_ms = setup_time.as_millis() as u64, "search setup finished");

    let mut expansions: u64 = 0;
    let mut result = None;
    let solve_start = Instant::now();
    while result.is_none() && solve_start.elapsed() < budget.timeout {
        if cancel.load(Ordering::Relaxed) {
            return Err(HarnessError::Cancelled);
        }
        result = planner.search_step()?;
        expansions += 1;
    }
    let solve_time = solve_start.elapsed();

    let found_plan = result.is_some();
    let terminal_model = match result {
        Some(plan) => Some(plan),
        None => best_partial_model(planner.retained_models()?),
    };
    debug!(
        expansions,
        solve_ms = solve_time.as_millis() as u64,
        found_plan,
        "search loop finished"
    );

    Ok(RunOutcome {
        found_plan,
        terminal_model,
        expansions,
        setup_time,
        solve_time,
        deadline_exceeded: !found_plan,
    })
}

pub fn best_partial_model<M: PlanModel>(models: Vec<M>) -> Option<M> {
    let mut best: Option<M> = None;
    for model in models {
        let better = match &best {
            Some(current) => model.operations_taken() > current.operations_taken(),
            None => true,
        };
        if better {
            best = Some(model);
        }
    }
    best
}
