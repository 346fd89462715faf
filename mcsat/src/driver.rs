//! The single driver entry point: `step`.
use crate::error::EngineError;
use crate::rules::conflict_detect::{find_congruence_conflict, find_false_clause, find_uf_domain_conflict};
use crate::rules::conflict_resolve::{resolve_bool_conflict, solve_uf_domain_conflict};
use crate::rules::decide::decide;
use crate::rules::propagate::{propagate, propagate_uf_eq};
use crate::rules::Applied;
use crate::state::{State, Status};

/// The outcome of one call to [`step`].
pub enum StepResult {
    /// A single rule fired deterministically.
    One(State, String),
    /// A rule fired nondeterministically; the caller selects one alternative.
    Choice(Vec<(State, String)>),
    /// The terminal status (`Sat` or `Unsat`) has been reached.
    Done(State, String),
    /// An internal invariant was violated.
    Error(EngineError),
}

/// Applies the first applicable rule from the fixed priority order.
pub fn step(state: &State) -> StepResult {
    if matches!(state.status, Status::Sat) {
        return StepResult::Done(state.clone(), "sat: the trail satisfies every clause".to_owned());
    }
    if matches!(state.status, Status::Unsat) {
        return StepResult::Done(state.clone(), "unsat: the empty clause was derived".to_owned());
    }

    macro_rules! try_rule {
        ($rule:expr) => {
            match $rule {
                Ok(Some(Applied::One(s, e))) => {
                    log::trace!("{}", e);
                    return StepResult::One(s, e);
                }
                Ok(Some(Applied::Choice(alts))) => {
                    log::trace!("{} nondeterministic alternatives", alts.len());
                    for (_, e) in &alts {
                        log::trace!("  - {}", e);
                    }
                    return StepResult::Choice(alts);
                }
                Ok(None) => {}
                Err(err) => {
                    log::trace!("invariant violation: {}", err);
                    return StepResult::Error(err);
                }
            }
        };
    }

    try_rule!(resolve_bool_conflict(state));
    try_rule!(solve_uf_domain_conflict(state));

    try_rule!(find_false_clause(state));
    try_rule!(find_uf_domain_conflict(state));
    try_rule!(find_congruence_conflict(state));

    try_rule!(propagate(state));
    try_rule!(propagate_uf_eq(state));

    try_rule!(decide(state));

    StepResult::Error(EngineError::RuleStatusMismatch {
        rule: "step: no rule applicable from a Searching state",
    })
}
