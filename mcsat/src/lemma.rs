//! EUF conflict records and lemma synthesis.
use mcsat_formula::clause::eval_to_false;
use mcsat_formula::{Assignment, Clause, Env, Symbol, Term, TermView, Value};

use crate::error::EngineError;

/// The three shapes a `Status::ConflictUf` record can take.
#[derive(Clone, Debug)]
pub enum ConflictRecord {
    /// `target` was forced to `force_value` by `force_witness` and forbidden the same value
    /// by `forbid_witness`.
    Forbid {
        target: Term,
        force_value: Value,
        force_witness: Term,
        forbid_witness: Term,
    },
    /// `target` was forced to two distinct values by two equality literals.
    Forced2 {
        target: Term,
        v1: Value,
        w1: Term,
        v2: Value,
        w2: Term,
    },
    /// `t1 = App(f, ..)` and `t2 = App(f, ..)` have equal argument values but differing
    /// results under the current assignment.
    Congruence { f: Symbol, t1: Term, t2: Term },
}

/// The operand of an equality literal other than `t`.
fn other_side(env: &Env, eq_lit: Term, t: Term) -> Term {
    match env.terms.view(eq_lit) {
        TermView::Eq(a, b) => {
            if a == t {
                b
            } else {
                a
            }
        }
        _ => panic!("other_side requires an equality literal"),
    }
}

/// Turns an EUF conflict into a learned clause that is false under the current trail.
///
/// Returns [`EngineError::UnsoundLemma`] if the synthesized clause does not in fact evaluate
/// to false -- this should never happen and indicates a
/// programmer error in one of the conflict-detection rules.
pub fn mk_uf_lemma(env: &mut Env, assignment: &Assignment, record: &ConflictRecord) -> Result<Clause, EngineError> {
    let lemma = match record {
        ConflictRecord::Forbid {
            target,
            force_witness,
            forbid_witness,
            ..
        } => {
            let t1 = other_side(env, *forbid_witness, *target);
            let t2 = other_side(env, *force_witness, *target);
            let eq_t1_t = env.eq(t1, *target);
            let neq_t2_t = {
                let e = env.eq(t2, *target);
                env.not_(e)
            };
            let neq_t1_t2 = {
                let e = env.eq(t1, t2);
                env.not_(e)
            };
            Clause::from_literals([eq_t1_t, neq_t2_t, neq_t1_t2])
        }
        ConflictRecord::Forced2 { target, w1, w2, .. } => {
            let t1 = other_side(env, *w1, *target);
            let t2 = other_side(env, *w2, *target);
            let neq_t1_t = {
                let e = env.eq(t1, *target);
                env.not_(e)
            };
            let neq_t2_t = {
                let e = env.eq(t2, *target);
                env.not_(e)
            };
            let eq_t1_t2 = env.eq(t1, t2);
            Clause::from_literals([neq_t1_t, neq_t2_t, eq_t1_t2])
        }
        ConflictRecord::Congruence { t1, t2, .. } => {
            let (l1, l2) = match (env.terms.view(*t1), env.terms.view(*t2)) {
                (TermView::App(_, a1), TermView::App(_, a2)) => (a1.to_vec(), a2.to_vec()),
                _ => panic!("a congruence conflict requires two application terms"),
            };

            let mut lemma = Clause::new();

            if env.types.is_bool(env.terms.ty(*t1)) {
                let (true_side, false_side) = if assignment.get(*t1) == Some(Value::Bool(true)) {
                    (*t1, *t2)
                } else {
                    (*t2, *t1)
                };
                let not_true_side = env.not_(true_side);
                lemma.insert(not_true_side);
                lemma.insert(false_side);
            } else {
                let eq_t1_t2 = env.eq(*t1, *t2);
                lemma.insert(eq_t1_t2);
            }

            for (&x, &y) in l1.iter().zip(l2.iter()) {
                let eqxy = env.eq(x, y);
                let neqxy = env.not_(eqxy);
                lemma.insert(neqxy);
            }

            lemma
        }
    };

    if !eval_to_false(&env.terms, assignment, &lemma) {
        return Err(EngineError::UnsoundLemma { record: record.clone() });
    }

    Ok(lemma)
}
