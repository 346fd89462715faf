//! The trail: a persistent, chronological log of assignments with decision levels.
use std::cell::RefCell;
use std::rc::Rc;

use mcsat_formula::{Assignment, Clause, Term, Value};

use crate::state::EnvHandle;

/// Why an entry was pushed onto the trail.
#[derive(Clone, Debug)]
pub enum TrailKind {
    /// Chosen nondeterministically by `decide`.
    Decision,
    /// Forced by boolean constraint propagation from the given clause.
    Bcp(Clause),
    /// Forced by theory evaluation of an equality whose sides are both assigned, or
    /// the axiomatic `true ↦ Bool(true)` root entry.
    Eval,
}

/// One trail entry, plus everything below it.
///
/// The trail is a persistent singly-linked stack: popping an entry is just following
/// `parent`, which is why a `Trail` handle and a *trail entry* are the same type here -- a
/// `Trail` always denotes "the log up to and including its own top entry".
struct TrailNode {
    kind: TrailKind,
    /// Always the positive (`abs`) form of the pushed literal.
    lit: Term,
    value: Value,
    /// Number of `Decision` entries at or below this one (cached).
    level: u32,
    parent: Option<Rc<TrailNode>>,
    /// The accumulated assignment as of this entry, including the coherence-derived
    /// `not(lit) ↦ Bool(¬b)` companion when `lit` is boolean (cached).
    assignment: Assignment,
}

/// A handle to a point in the trail's history.
#[derive(Clone)]
pub struct Trail {
    top: Rc<TrailNode>,
}

impl Trail {
    /// A fresh trail containing only the axiomatic `true ↦ Bool(true)` entry at level 0.
    pub fn new(env: &EnvHandle) -> Trail {
        let mut e = env.borrow_mut();
        let true_term = e.bool_const(true);
        let false_term = e.not_(true_term);
        let mut assignment = Assignment::new();
        assignment.insert(true_term, Value::Bool(true));
        assignment.insert(false_term, Value::Bool(false));
        Trail {
            top: Rc::new(TrailNode {
                kind: TrailKind::Eval,
                lit: true_term,
                value: Value::Bool(true),
                level: 0,
                parent: None,
                assignment,
            }),
        }
    }

    pub fn level(&self) -> u32 {
        self.top.level
    }

    pub fn assignment(&self) -> &Assignment {
        &self.top.assignment
    }

    pub fn top_kind(&self) -> &TrailKind {
        &self.top.kind
    }

    pub fn top_lit(&self) -> Term {
        self.top.lit
    }

    pub fn top_value(&self) -> Value {
        self.top.value
    }

    /// The trail below the top entry, or `None` if the top entry is the axiom root.
    pub fn pop(&self) -> Option<Trail> {
        self.top.parent.clone().map(|parent| Trail { top: parent })
    }

    pub fn is_root(&self) -> bool {
        self.top.parent.is_none()
    }

    /// Pushes a new entry, normalizing its sign first (invariant (i)) and maintaining the
    /// coherence invariant that assigning a boolean term also assigns its negation.
    pub fn cons(&self, env: &EnvHandle, kind: TrailKind, lit: Term, value: Value) -> Trail {
        let (norm_lit, norm_value) = {
            let e = env.borrow();
            let abs = e.terms.abs(lit);
            if abs == lit {
                (lit, value)
            } else {
                (
                    abs,
                    value
                        .negate()
                        .expect("a negated literal must carry a boolean value"),
                )
            }
        };

        let mut assignment = self.top.assignment.clone();
        assignment.insert(norm_lit, norm_value);

        let is_bool = {
            let e = env.borrow();
            e.types.is_bool(e.terms.ty(norm_lit))
        };
        if is_bool {
            if let Some(flipped) = norm_value.negate() {
                let not_lit = env.borrow_mut().not_(norm_lit);
                assignment.insert(not_lit, flipped);
            }
        }

        let level = match kind {
            TrailKind::Decision => self.top.level + 1,
            _ => self.top.level,
        };

        Trail {
            top: Rc::new(TrailNode {
                kind,
                lit: norm_lit,
                value: norm_value,
                level,
                parent: Some(self.top.clone()),
                assignment,
            }),
        }
    }

    /// Pops entries until the most recent `Decision` is consumed, returning the trail below
    /// it. If there is no decision left, returns the axiom root.
    pub fn unwind_till_next_decision(&self) -> Trail {
        let mut cur = self.clone();
        loop {
            let was_decision = matches!(cur.top.kind, TrailKind::Decision);
            match cur.pop() {
                None => return cur,
                Some(below) => {
                    if was_decision {
                        return below;
                    }
                    cur = below;
                }
            }
        }
    }

    /// Entries from youngest to oldest, including the axiom root.
    pub fn iter(&self) -> TrailIter {
        TrailIter {
            cur: Some(self.top.clone()),
        }
    }
}

pub struct TrailEntryRef {
    node: Rc<TrailNode>,
}

impl TrailEntryRef {
    pub fn kind(&self) -> &TrailKind {
        &self.node.kind
    }

    pub fn lit(&self) -> Term {
        self.node.lit
    }

    pub fn value(&self) -> Value {
        self.node.value
    }

    pub fn level(&self) -> u32 {
        self.node.level
    }
}

pub struct TrailIter {
    cur: Option<Rc<TrailNode>>,
}

impl Iterator for TrailIter {
    type Item = TrailEntryRef;

    fn next(&mut self) -> Option<TrailEntryRef> {
        let node = self.cur.take()?;
        self.cur = node.parent.clone();
        Some(TrailEntryRef { node })
    }
}

#[allow(unused)]
fn assert_send_sync_not_required(_: RefCell<()>) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::new_env_handle;

    #[test]
    fn empty_trail_has_axiom_entry() {
        let env = new_env_handle();
        let trail = Trail::new(&env);
        assert_eq!(trail.level(), 0);
        assert!(trail.is_root());
        let true_term = env.borrow_mut().bool_const(true);
        assert_eq!(trail.assignment().get(true_term), Some(Value::Bool(true)));
    }

    #[test]
    fn cons_normalizes_negated_literal() {
        let env = new_env_handle();
        let u = env.borrow_mut().declare_type("U");
        let b = env.borrow_mut().types.bool_ty();
        let p = env.borrow_mut().declare_fun("p", b).unwrap();
        let _ = u;
        let pt = env.borrow_mut().app(p, vec![]);
        let npt = env.borrow_mut().not_(pt);

        let trail = Trail::new(&env);
        let trail = trail.cons(&env, TrailKind::Decision, npt, Value::Bool(true));

        assert_eq!(trail.top_lit(), pt);
        assert_eq!(trail.top_value(), Value::Bool(false));
    }

    #[test]
    fn cons_maintains_coherence() {
        let env = new_env_handle();
        let b = env.borrow_mut().types.bool_ty();
        let p = env.borrow_mut().declare_fun("p", b).unwrap();
        let pt = env.borrow_mut().app(p, vec![]);

        let trail = Trail::new(&env).cons(&env, TrailKind::Decision, pt, Value::Bool(true));

        let npt = env.borrow_mut().not_(pt);
        assert_eq!(trail.assignment().get(pt), Some(Value::Bool(true)));
        assert_eq!(trail.assignment().get(npt), Some(Value::Bool(false)));
    }

    #[test]
    fn levels_track_decisions() {
        let env = new_env_handle();
        let b = env.borrow_mut().types.bool_ty();
        let p = env.borrow_mut().declare_fun("p", b).unwrap();
        let q = env.borrow_mut().declare_fun("q", b).unwrap();
        let pt = env.borrow_mut().app(p, vec![]);
        let qt = env.borrow_mut().app(q, vec![]);

        let trail = Trail::new(&env);
        let trail = trail.cons(&env, TrailKind::Decision, pt, Value::Bool(true));
        assert_eq!(trail.level(), 1);
        let trail = trail.cons(&env, TrailKind::Eval, qt, Value::Bool(true));
        assert_eq!(trail.level(), 1);
        let trail = trail.cons(&env, TrailKind::Decision, qt, Value::Bool(false));
        assert_eq!(trail.level(), 2);
    }

    #[test]
    fn unwind_removes_back_to_below_last_decision() {
        let env = new_env_handle();
        let b = env.borrow_mut().types.bool_ty();
        let p = env.borrow_mut().declare_fun("p", b).unwrap();
        let q = env.borrow_mut().declare_fun("q", b).unwrap();
        let pt = env.borrow_mut().app(p, vec![]);
        let qt = env.borrow_mut().app(q, vec![]);

        let trail = Trail::new(&env);
        let trail = trail.cons(&env, TrailKind::Decision, pt, Value::Bool(true));
        let trail = trail.cons(&env, TrailKind::Eval, qt, Value::Bool(true));

        let below = trail.unwind_till_next_decision();
        assert_eq!(below.level(), 0);
        assert!(below.assignment().get(pt).is_none());
    }

    mod proptests {
        use proptest::prelude::*;

        use super::*;
        use mcsat_formula::test::{literal_choice, term_pool};

        proptest! {
            /// Deciding any sequence of boolean atoms always leaves every assigned literal's
            /// negation assigned to the opposite value (the trail coherence invariant).
            #[test]
            fn decisions_preserve_coherence(choices in proptest::collection::vec(literal_choice(5), 0..10)) {
                let pool = term_pool(5, 0);
                let env = new_env_handle();
                *env.borrow_mut() = pool.env;

                let mut trail = Trail::new(&env);
                for &(idx, sign) in &choices {
                    let atom = pool.bool_atoms[idx];
                    trail = trail.cons(&env, TrailKind::Decision, atom, Value::Bool(sign));
                }

                let assignment = trail.assignment();
                for &atom in &pool.bool_atoms {
                    let not_atom = env.borrow_mut().not_(atom);
                    if let Some(v) = assignment.get(atom) {
                        prop_assert_eq!(assignment.get(not_atom), v.negate());
                    }
                }
            }
        }
    }
}
