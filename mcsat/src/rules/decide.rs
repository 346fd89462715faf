//! Decision rule: only fires while `Searching`.
use mcsat_formula::{anon_value, Value};

use crate::domain::DomainEntry;
use crate::error::EngineError;
use crate::rules::Applied;
use crate::state::{State, Status};
use crate::trail::TrailKind;

/// `Sat` if nothing is left to decide; otherwise exposes one successor per candidate variable
/// (two, for boolean candidates) as a nondeterministic choice.
pub fn decide(state: &State) -> Result<Option<Applied>, EngineError> {
    if !matches!(state.status, Status::Searching) {
        return Ok(None);
    }

    let to_decide = state.to_decide();
    if to_decide.is_empty() {
        let mut next = state.clone();
        next.status = Status::Sat;
        return Ok(Some(Applied::One(next, "nothing left to decide: sat".to_owned())));
    }

    let domain = state.uf_domain();
    let mut alternatives = Vec::new();
    for x in to_decide {
        let (is_bool, ty) = {
            let env = state.env.borrow();
            let ty = env.terms.ty(x);
            (env.types.is_bool(ty), ty)
        };

        if is_bool {
            for b in [true, false].iter().copied() {
                let mut next = state.clone();
                next.trail = state.trail.cons(&state.env, TrailKind::Decision, x, Value::Bool(b));
                alternatives.push((next, format!("decide {:?} := {}", x, b)));
            }
            continue;
        }

        let value = match domain.get(&x) {
            None => anon_value(ty, 0),
            Some(DomainEntry::Forced(v, _)) => *v,
            Some(DomainEntry::Forbid(forbidden)) => {
                let mut idx = 0u32;
                loop {
                    let candidate = anon_value(ty, idx);
                    if !forbidden.iter().any(|&(v, _)| v == candidate) {
                        break candidate;
                    }
                    idx += 1;
                }
            }
            Some(DomainEntry::ConflictForced2(..)) | Some(DomainEntry::ConflictForbid(..)) => {
                return Err(EngineError::RuleStatusMismatch {
                    rule: "decide: domain conflict present while searching",
                });
            }
        };
        let mut next = state.clone();
        next.trail = state.trail.cons(&state.env, TrailKind::Decision, x, value);
        alternatives.push((next, format!("decide {:?} := {:?}", x, value)));
    }

    match alternatives.len() {
        0 => Ok(None),
        1 => {
            let (s, e) = alternatives.pop().expect("len == 1");
            Ok(Some(Applied::One(s, e)))
        }
        _ => Ok(Some(Applied::Choice(alternatives))),
    }
}
