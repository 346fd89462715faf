//! `If`-elimination: run to a fixed point once, before the rule loop starts.
//!
//! The richer term grammar's `If(a,b,c)` has no rule of its own; every other rule assumes it
//! has already been rewritten away. Running this as a one-shot preprocessing pass rather than
//! a sixth dispatch-priority group keeps that assumption true everywhere else.
use std::rc::Rc;

use mcsat_formula::{Clause, Env, Symbol, Term, TermView};

use crate::state::{EnvHandle, State};

enum OwnedView {
    Bool(bool),
    Not(Term),
    Eq(Term, Term),
    App(Symbol, Vec<Term>),
    If(Term, Term, Term),
}

fn owned_view(env: &Env, t: Term) -> OwnedView {
    match env.terms.view(t) {
        TermView::Bool(b) => OwnedView::Bool(b),
        TermView::Not(u) => OwnedView::Not(u),
        TermView::Eq(a, b) => OwnedView::Eq(a, b),
        TermView::App(f, args) => OwnedView::App(f, args.to_vec()),
        TermView::If(a, b, c) => OwnedView::If(a, b, c),
    }
}

fn find_if_subterm(env: &Env, t: Term) -> Option<(Term, Term, Term, Term)> {
    match owned_view(env, t) {
        OwnedView::If(a, b, c) => Some((t, a, b, c)),
        OwnedView::Bool(_) => None,
        OwnedView::Not(u) => find_if_subterm(env, u),
        OwnedView::Eq(a, b) => find_if_subterm(env, a).or_else(|| find_if_subterm(env, b)),
        OwnedView::App(_, args) => args.into_iter().find_map(|a| find_if_subterm(env, a)),
    }
}

fn find_if_term(state: &State) -> Option<(Term, Term, Term, Term)> {
    let env = state.env.borrow();
    state.clauses.iter().flat_map(|c| c.iter().collect::<Vec<_>>()).find_map(|lit| find_if_subterm(&env, lit))
}

fn substitute_term(env: &EnvHandle, t: Term, target: Term, replacement: Term) -> Term {
    if t == target {
        return replacement;
    }
    match owned_view(&env.borrow(), t) {
        OwnedView::Bool(_) => t,
        OwnedView::Not(u) => {
            let u2 = substitute_term(env, u, target, replacement);
            if u2 == u {
                t
            } else {
                env.borrow_mut().not_(u2)
            }
        }
        OwnedView::Eq(a, b) => {
            let a2 = substitute_term(env, a, target, replacement);
            let b2 = substitute_term(env, b, target, replacement);
            if a2 == a && b2 == b {
                t
            } else {
                env.borrow_mut().eq(a2, b2)
            }
        }
        OwnedView::App(f, args) => {
            let args2: Vec<Term> = args.iter().map(|&a| substitute_term(env, a, target, replacement)).collect();
            if args2 == args {
                t
            } else {
                env.borrow_mut().app(f, args2)
            }
        }
        OwnedView::If(a, b, c) => {
            let a2 = substitute_term(env, a, target, replacement);
            let b2 = substitute_term(env, b, target, replacement);
            let c2 = substitute_term(env, c, target, replacement);
            if a2 == a && b2 == b && c2 == c {
                t
            } else {
                env.borrow_mut().if_(a2, b2, c2)
            }
        }
    }
}

fn substitute_clause(env: &EnvHandle, clause: &Clause, target: Term, replacement: Term) -> Clause {
    Clause::from_literals(clause.iter().map(|lit| substitute_term(env, lit, target, replacement)))
}

fn lift_one(state: State, t: Term, cond: Term, then_: Term, else_: Term) -> State {
    let ty = state.env.borrow().terms.ty(t);
    let (fresh, not_cond, eq_fresh_then, eq_fresh_else) = {
        let mut env = state.env.borrow_mut();
        let fresh = env.fresh_const(ty);
        let not_cond = env.not_(cond);
        let eq_then = env.eq(fresh, then_);
        let eq_else = env.eq(fresh, else_);
        (fresh, not_cond, eq_then, eq_else)
    };

    let mut clauses: Vec<Clause> = state
        .clauses
        .iter()
        .map(|c| substitute_clause(&state.env, c, t, fresh))
        .collect();
    clauses.push(Clause::from_literals([not_cond, eq_fresh_then]));
    clauses.push(Clause::from_literals([cond, eq_fresh_else]));

    let mut subst = (*state.subst).clone();
    subst.insert(t, fresh);

    State {
        env: state.env,
        clauses: Rc::new(clauses),
        // if-lifting runs before the rule loop starts, so the trail is still the axiom root
        // and has nothing to rewrite.
        trail: state.trail,
        subst: Rc::new(subst),
        status: state.status,
        config: state.config,
    }
}

/// Rewrites every `If` subterm out of the clause set, to a fixed point.
pub fn remove_ifs(mut state: State) -> State {
    if !state.config.if_lifting {
        return state;
    }
    while let Some((t, cond, then_, else_)) = find_if_term(&state) {
        state = lift_one(state, t, cond, then_, else_);
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::state::new_env_handle;

    #[test]
    fn lifts_a_top_level_if() {
        let env = new_env_handle();
        let (u, a, b, c, cond, if_term) = {
            let mut e = env.borrow_mut();
            let u = e.declare_type("U");
            let b_ty = e.types.bool_ty();
            let a_sym = e.declare_fun("a", u).unwrap();
            let a = e.app(a_sym, vec![]);
            let b_sym = e.declare_fun("b", u).unwrap();
            let b = e.app(b_sym, vec![]);
            let c_sym = e.declare_fun("c", u).unwrap();
            let c = e.app(c_sym, vec![]);
            let cond_sym = e.declare_fun("p", b_ty).unwrap();
            let cond = e.app(cond_sym, vec![]);
            let if_term = e.if_(cond, a, b);
            (u, a, b, c, cond, if_term)
        };
        let _ = u;
        let eq_if_c = env.borrow_mut().eq(if_term, c);
        let clause = Clause::from_literals([eq_if_c]);

        let state = State::new(env, vec![clause], SolverConfig::default());
        let lifted = remove_ifs(state);

        assert!(find_if_term(&lifted).is_none());
        assert_eq!(lifted.clauses.len(), 3);
        assert_eq!(lifted.subst.len(), 1);
        let _ = cond;
    }

    #[test]
    fn disabled_by_config_leaves_clauses_untouched() {
        let env = new_env_handle();
        let eq_if_c = {
            let mut e = env.borrow_mut();
            let b_ty = e.types.bool_ty();
            let u = e.declare_type("U");
            let a_sym = e.declare_fun("a", u).unwrap();
            let a = e.app(a_sym, vec![]);
            let b_sym = e.declare_fun("b", u).unwrap();
            let b = e.app(b_sym, vec![]);
            let c_sym = e.declare_fun("c", u).unwrap();
            let c = e.app(c_sym, vec![]);
            let cond_sym = e.declare_fun("p", b_ty).unwrap();
            let cond = e.app(cond_sym, vec![]);
            let if_term = e.if_(cond, a, b);
            e.eq(if_term, c)
        };
        let clause = Clause::from_literals([eq_if_c]);
        let mut config = SolverConfig::default();
        config.if_lifting = false;
        let state = State::new(env, vec![clause], config);
        let result = remove_ifs(state);
        assert_eq!(result.clauses.len(), 1);
    }
}
