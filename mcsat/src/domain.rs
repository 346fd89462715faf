//! The EUF domain-forcing table.
use rustc_hash::FxHashMap;

use mcsat_formula::{Env, Term, TermView, Value};

use crate::trail::Trail;

/// What the trail has established about the value a term `t` may take, derived from equality
/// literals with exactly one side assigned.
#[derive(Clone, Debug, PartialEq)]
pub enum DomainEntry {
    /// `t` must equal `value`, witnessed by the equality literal `witness`.
    Forced(Value, Term),
    /// `t` must not equal any of the listed values, each witnessed by an equality literal.
    Forbid(Vec<(Value, Term)>),
    /// `t` was forced to two distinct values: a genuine conflict.
    ConflictForced2(Value, Term, Value, Term),
    /// `t` was forced to `value` (by `force_witness`) after already being forbidden that same
    /// value (by `forbid_witness`): a genuine conflict.
    ConflictForbid(Value, Term, Term),
}

pub type UfDomain = FxHashMap<Term, DomainEntry>;

/// Scans the trail's equality-literal entries and builds the domain table.
///
/// Order of traversal does not affect the final classification into `Forced`/`Forbid`/a
/// conflict variant; once a term's entry becomes a conflict it absorbs all further
/// observations.
pub fn compute_uf_domain(env: &Env, trail: &Trail) -> UfDomain {
    let assignment = trail.assignment();
    let mut table = UfDomain::default();

    for entry in trail.iter() {
        let lit = entry.lit();
        let (a, b) = match env.terms.view(lit) {
            TermView::Eq(a, b) => (a, b),
            _ => continue,
        };
        let p = match entry.value() {
            Value::Bool(p) => p,
            Value::Unin(_) => continue,
        };

        let (target, known_value) = match (assignment.get(a), assignment.get(b)) {
            (Some(va), None) => (b, va),
            (None, Some(vb)) => (a, vb),
            _ => continue,
        };

        observe(&mut table, target, p, known_value, lit);
    }

    table
}

fn observe(table: &mut UfDomain, target: Term, forces: bool, value: Value, witness: Term) {
    let current = table.get(&target).cloned();
    let next = match current {
        None => {
            if forces {
                DomainEntry::Forced(value, witness)
            } else {
                DomainEntry::Forbid(vec![(value, witness)])
            }
        }
        Some(DomainEntry::ConflictForced2(..)) | Some(DomainEntry::ConflictForbid(..)) => return,
        Some(DomainEntry::Forced(v, w)) => {
            if forces {
                if v == value {
                    DomainEntry::Forced(v, w)
                } else {
                    DomainEntry::ConflictForced2(v, w, value, witness)
                }
            } else if v == value {
                DomainEntry::ConflictForbid(v, w, witness)
            } else {
                DomainEntry::Forced(v, w)
            }
        }
        Some(DomainEntry::Forbid(mut list)) => {
            if forces {
                if let Some(&(fv, fw)) = list.iter().find(|&&(v, _)| v == value) {
                    DomainEntry::ConflictForbid(fv, witness, fw)
                } else {
                    DomainEntry::Forced(value, witness)
                }
            } else {
                if !list.iter().any(|&(v, _)| v == value) {
                    list.push((value, witness));
                }
                DomainEntry::Forbid(list)
            }
        }
    };
    table.insert(target, next);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::new_env_handle;
    use crate::trail::TrailKind;
    use mcsat_formula::AnonValue;

    #[test]
    fn single_equality_forces_unassigned_side() {
        let env = new_env_handle();
        let (u, a, b) = {
            let mut e = env.borrow_mut();
            let u = e.declare_type("U");
            let a_sym = e.declare_fun("a", u).unwrap();
            let a = e.app(a_sym, vec![]);
            let b_sym = e.declare_fun("b", u).unwrap();
            let b = e.app(b_sym, vec![]);
            (u, a, b)
        };
        let av = Value::Unin(AnonValue::new(u, 0));
        let eq_ab = env.borrow_mut().eq(a, b);

        let trail = Trail::new(&env);
        let trail = trail.cons(&env, TrailKind::Decision, a, av);
        let trail = trail.cons(&env, TrailKind::Eval, eq_ab, Value::Bool(true));

        let table = compute_uf_domain(&env.borrow(), &trail);
        assert_eq!(table.get(&b), Some(&DomainEntry::Forced(av, eq_ab)));
    }

    #[test]
    fn contradictory_forcing_is_a_conflict() {
        let env = new_env_handle();
        let (u, a, b, c) = {
            let mut e = env.borrow_mut();
            let u = e.declare_type("U");
            let a_sym = e.declare_fun("a", u).unwrap();
            let a = e.app(a_sym, vec![]);
            let b_sym = e.declare_fun("b", u).unwrap();
            let b = e.app(b_sym, vec![]);
            let c_sym = e.declare_fun("c", u).unwrap();
            let c = e.app(c_sym, vec![]);
            (u, a, b, c)
        };
        let av = Value::Unin(AnonValue::new(u, 0));
        let bv = Value::Unin(AnonValue::new(u, 1));
        let eq_ac = env.borrow_mut().eq(a, c);
        let eq_bc = env.borrow_mut().eq(b, c);

        let trail = Trail::new(&env);
        let trail = trail.cons(&env, TrailKind::Decision, a, av);
        let trail = trail.cons(&env, TrailKind::Decision, b, bv);
        let trail = trail.cons(&env, TrailKind::Eval, eq_ac, Value::Bool(true));
        let trail = trail.cons(&env, TrailKind::Eval, eq_bc, Value::Bool(true));

        let table = compute_uf_domain(&env.borrow(), &trail);
        assert!(matches!(table.get(&c), Some(DomainEntry::ConflictForced2(..))));
    }
}
