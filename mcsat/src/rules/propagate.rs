//! Propagation rules: only fire while `Searching`.
use mcsat_formula::clause::filter_false;
use mcsat_formula::{Clause, Term, TermView, Value};

use crate::error::EngineError;
use crate::rules::Applied;
use crate::state::{State, Status};
use crate::trail::TrailKind;

/// BCP: pushes the unit literal of the first clause with exactly one unfalsified, unassigned
/// literal.
pub fn propagate(state: &State) -> Result<Option<Applied>, EngineError> {
    if !matches!(state.status, Status::Searching) {
        return Ok(None);
    }

    let found: Option<(Clause, Term)> = {
        let env = state.env.borrow();
        let assignment = state.trail.assignment();
        let mut found = None;
        for clause in state.clauses.iter() {
            let filtered = filter_false(&env.terms, assignment, clause);
            if let Some(lit) = filtered.as_unit() {
                if !assignment.is_assigned(lit) {
                    found = Some((clause.clone(), lit));
                    break;
                }
            }
        }
        found
    };

    match found {
        None => Ok(None),
        Some((clause, lit)) => {
            let mut next = state.clone();
            next.trail = state.trail.cons(&state.env, TrailKind::Bcp(clause), lit, Value::Bool(true));
            Ok(Some(Applied::One(next, format!("propagate {:?}", lit))))
        }
    }
}

/// Theory evaluation: pushes `Eq(a,b) := Bool(A(a) = A(b))` for the first unassigned equality
/// whose operands are both assigned.
pub fn propagate_uf_eq(state: &State) -> Result<Option<Applied>, EngineError> {
    if !matches!(state.status, Status::Searching) {
        return Ok(None);
    }

    let found: Option<(Term, Value)> = {
        let env = state.env.borrow();
        let assignment = state.trail.assignment();
        let mut found = None;
        for var in state.all_vars() {
            if assignment.is_assigned(var) {
                continue;
            }
            if let TermView::Eq(a, b) = env.terms.view(var) {
                if let (Some(va), Some(vb)) = (assignment.get(a), assignment.get(b)) {
                    found = Some((var, Value::Bool(va == vb)));
                    break;
                }
            }
        }
        found
    };

    match found {
        None => Ok(None),
        Some((eq_term, value)) => {
            let mut next = state.clone();
            next.trail = state.trail.cons(&state.env, TrailKind::Eval, eq_term, value);
            Ok(Some(Applied::One(next, format!("theory-eval {:?}", eq_term))))
        }
    }
}
