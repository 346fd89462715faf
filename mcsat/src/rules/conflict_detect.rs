//! Conflict detection rules: only fire while `Searching`.
use mcsat_formula::clause::eval_to_false;
use mcsat_formula::{TermView, Value};

use crate::domain::DomainEntry;
use crate::error::EngineError;
use crate::lemma::ConflictRecord;
use crate::rules::Applied;
use crate::state::{State, Status};

/// Sets `Conflict_bool(c)` for the first clause evaluating to false under the trail.
pub fn find_false_clause(state: &State) -> Result<Option<Applied>, EngineError> {
    if !matches!(state.status, Status::Searching) {
        return Ok(None);
    }
    let env = state.env.borrow();
    let assignment = state.trail.assignment();
    for clause in state.clauses.iter() {
        if eval_to_false(&env.terms, assignment, clause) {
            let mut next = state.clone();
            next.status = Status::ConflictBool(clause.clone());
            return Ok(Some(Applied::One(next, "clause is false under the current assignment".to_owned())));
        }
    }
    Ok(None)
}

/// Sets `Conflict_uf` for every absorbing (conflict) entry in the domain table; more
/// than one such entry is a nondeterministic `Choice`.
pub fn find_uf_domain_conflict(state: &State) -> Result<Option<Applied>, EngineError> {
    if !matches!(state.status, Status::Searching) {
        return Ok(None);
    }
    let table = state.uf_domain();
    let mut alternatives = Vec::new();
    for (&target, entry) in table.iter() {
        let record = match *entry {
            DomainEntry::ConflictForced2(v1, w1, v2, w2) => ConflictRecord::Forced2 { target, v1, w1, v2, w2 },
            DomainEntry::ConflictForbid(v, w_force, w_forbid) => ConflictRecord::Forbid {
                target,
                force_value: v,
                force_witness: w_force,
                forbid_witness: w_forbid,
            },
            _ => continue,
        };
        let mut next = state.clone();
        next.status = Status::ConflictUf(record);
        alternatives.push((next, format!("EUF domain conflict on {:?}", target)));
    }
    fold_alternatives(alternatives)
}

/// Compares each fully-assigned application against the signature table, reporting a
/// congruence conflict the first time a matching signature disagrees in value.
pub fn find_congruence_conflict(state: &State) -> Result<Option<Applied>, EngineError> {
    if !matches!(state.status, Status::Searching) {
        return Ok(None);
    }
    let env = state.env.borrow();
    let assignment = state.trail.assignment();
    let sigs = state.uf_sigs();
    for entry in state.trail.iter() {
        let t = entry.lit();
        let (f, args) = match env.terms.view(t) {
            TermView::App(f, args) => (f, args),
            _ => continue,
        };
        let values: Option<Vec<Value>> = args.iter().map(|&a| assignment.get(a)).collect();
        let values = match values {
            Some(v) => v,
            None => continue,
        };
        let v = match assignment.get(t) {
            Some(v) => v,
            None => continue,
        };
        if let Some(&(sv, switness)) = sigs.get(&(f, values)) {
            if switness != t && sv != v {
                let record = ConflictRecord::Congruence { f, t1: t, t2: switness };
                let mut next = state.clone();
                next.status = Status::ConflictUf(record);
                return Ok(Some(Applied::One(next, "congruence conflict".to_owned())));
            }
        }
    }
    Ok(None)
}

fn fold_alternatives(mut alternatives: Vec<(State, String)>) -> Result<Option<Applied>, EngineError> {
    match alternatives.len() {
        0 => Ok(None),
        1 => {
            let (s, e) = alternatives.pop().expect("len == 1");
            Ok(Some(Applied::One(s, e)))
        }
        _ => Ok(Some(Applied::Choice(alternatives))),
    }
}
