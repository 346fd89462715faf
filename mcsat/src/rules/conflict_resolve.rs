//! Conflict resolution rules: `resolve_bool_conflict`, `solve_uf_domain_conflict`.
use mcsat_formula::clause::filter_false;
use mcsat_formula::Value;

use crate::error::EngineError;
use crate::lemma::mk_uf_lemma;
use crate::rules::Applied;
use crate::state::{State, Status};
use crate::trail::TrailKind;

/// Turns an EUF conflict into a boolean one by synthesizing its lemma and handing off
/// to `resolve_bool_conflict`, which is tried first in the priority order but will not be
/// applicable on the very iteration this rule fires.
pub fn solve_uf_domain_conflict(state: &State) -> Result<Option<Applied>, EngineError> {
    let record = match &state.status {
        Status::ConflictUf(r) => r.clone(),
        _ => return Ok(None),
    };

    let lemma = {
        let mut env = state.env.borrow_mut();
        mk_uf_lemma(&mut env, state.trail.assignment(), &record)?
    };

    let mut next = state.clone();
    next.clauses = state.with_learned_clause(lemma.clone());
    next.status = Status::ConflictBool(lemma);
    Ok(Some(Applied::One(next, "synthesize EUF conflict lemma".to_owned())))
}

/// Resolves a boolean conflict against the trail, one entry at a time.
pub fn resolve_bool_conflict(state: &State) -> Result<Option<Applied>, EngineError> {
    let c = match &state.status {
        Status::ConflictBool(c) => c.clone(),
        _ => return Ok(None),
    };

    if c.is_empty() {
        let mut next = state.clone();
        next.status = Status::Unsat;
        return Ok(Some(Applied::One(next, "empty conflict clause: unsat".to_owned())));
    }

    let false_term = state.env.borrow_mut().bool_const(false);
    if c.contains(false_term) {
        let mut next = state.clone();
        next.status = Status::ConflictBool(c.without(false_term));
        return Ok(Some(Applied::One(next, "drop literal `false` from conflict clause".to_owned())));
    }

    if state.trail.is_root() {
        let mut next = state.clone();
        next.status = Status::Unsat;
        return Ok(Some(Applied::One(next, "conflict at the empty trail: unsat".to_owned())));
    }

    let top_kind = state.trail.top_kind().clone();
    let top_lit = state.trail.top_lit();
    let top_value = state.trail.top_value();
    let not_top_lit = state.env.borrow_mut().not_(top_lit);
    let below = state.trail.pop().expect("checked non-root above");

    match top_kind {
        TrailKind::Bcp(d) => {
            if top_value == Value::Bool(false) && d.contains(not_top_lit) {
                let new_conflict = d.without(not_top_lit).union(&c.without(top_lit));
                let mut next = state.clone();
                next.trail = below;
                next.status = Status::ConflictBool(new_conflict);
                return Ok(Some(Applied::One(next, "resolve against BCP antecedent".to_owned())));
            }
            if c.contains(not_top_lit) {
                let new_conflict = d.without(top_lit).union(&c.without(not_top_lit));
                let mut next = state.clone();
                next.trail = below;
                next.status = Status::ConflictBool(new_conflict);
                return Ok(Some(Applied::One(next, "resolve against BCP antecedent".to_owned())));
            }
            let mut next = state.clone();
            next.trail = below;
            Ok(Some(Applied::One(next, "consume unrelated BCP entry".to_owned())))
        }
        TrailKind::Eval => {
            let mut next = state.clone();
            next.trail = below;
            Ok(Some(Applied::One(next, "consume Eval entry".to_owned())))
        }
        TrailKind::Decision => {
            let c_prime = {
                let env = state.env.borrow();
                filter_false(&env.terms, below.assignment(), &c)
            };
            match c_prime.len() {
                0 => {
                    let mut next = state.clone();
                    next.trail = below;
                    next.status = Status::ConflictBool(c);
                    Ok(Some(Applied::One(next, "T-consume decision".to_owned())))
                }
                1 => {
                    let mut next = state.clone();
                    next.clauses = state.with_learned_clause(c.clone());
                    next.trail = below;
                    next.status = Status::Searching;
                    Ok(Some(Applied::One(next, "backjump".to_owned())))
                }
                2 => {
                    let is_bool_decision = {
                        let env = state.env.borrow();
                        env.types.is_bool(env.terms.ty(top_lit))
                    };
                    if is_bool_decision {
                        return Err(EngineError::RuleStatusMismatch {
                            rule: "resolve_bool_conflict: semantic case split on a boolean decision",
                        });
                    }
                    let chosen = c_prime.iter().next().expect("len == 2");
                    let mut next = state.clone();
                    next.clauses = state.with_learned_clause(c.clone());
                    next.trail = below.cons(&state.env, TrailKind::Decision, chosen, Value::Bool(true));
                    next.status = Status::Searching;
                    Ok(Some(Applied::One(next, "semantic case split".to_owned())))
                }
                size => Err(EngineError::OversizedDecisionFilter { size }),
            }
        }
    }
}
