//! The overall proof state threaded through the rule loop.
use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};

use mcsat_formula::{Clause, Env, Term};

use crate::config::SolverConfig;
use crate::domain::{compute_uf_domain, UfDomain};
use crate::lemma::ConflictRecord;
use crate::sigs::{compute_uf_sigs, UfSigs};
use crate::trail::Trail;

/// The hash-consing tables and symbol table, shared by every `State` derived from the same
/// input problem (the only process-wide mutable state).
pub type EnvHandle = Rc<RefCell<Env>>;

pub fn new_env_handle() -> EnvHandle {
    Rc::new(RefCell::new(Env::new()))
}

/// Wraps an already-populated [`Env`] (typically produced by `mcsat-sexpr`'s parser) for use
/// as a `State`'s `env`.
pub fn env_handle(env: Env) -> EnvHandle {
    Rc::new(RefCell::new(env))
}

/// What the rule loop has established about the current state.
#[derive(Clone)]
pub enum Status {
    /// No terminal condition and no conflict detected yet; more rules may apply.
    Searching,
    /// Every clause is satisfied under the trail's assignment.
    Sat,
    /// The empty clause was derived; no assignment can satisfy the input.
    Unsat,
    /// A clause evaluates to false under the trail.
    ConflictBool(Clause),
    /// An EUF domain or congruence conflict was detected.
    ConflictUf(ConflictRecord),
}

/// The full state of the decision procedure.
///
/// `clauses`, `trail` and `subst` are treated as plain, wholesale-replaced values: a rule
/// application produces a new `State` rather than mutating an existing one. `env` is the one
/// exception, shared by `Rc<RefCell<_>>` because it only ever grows (new interned terms, new
/// learned-clause constants) and every `State` needs to resolve the same ids.
#[derive(Clone)]
pub struct State {
    pub env: EnvHandle,
    /// Original clauses plus every lemma learned so far.
    pub clauses: Rc<Vec<Clause>>,
    pub trail: Trail,
    /// If-lifting's term-to-fresh-constant substitution, fixed before the rule loop starts
    /// Empty when `if_lifting` is disabled.
    pub subst: Rc<FxHashMap<Term, Term>>,
    pub status: Status,
    pub config: SolverConfig,
}

impl State {
    /// The initial state for a set of input clauses, with the trail at the axiom root.
    pub fn new(env: EnvHandle, clauses: Vec<Clause>, config: SolverConfig) -> State {
        let trail = Trail::new(&env);
        State {
            env,
            clauses: Rc::new(clauses),
            trail,
            subst: Rc::new(Default::default()),
            status: Status::Searching,
            config,
        }
    }

    /// Every variable (positive-form term) mentioned by any clause, including the non-boolean
    /// EUF subterms nested inside its literals.
    ///
    /// A literal like `eq(a, b)` is itself a candidate (decided as a boolean), but so are `a`
    /// and `b` (decided as EUF constants, guided by `uf_domain`): `propagate_uf_eq` and
    /// `compute_uf_domain` both need those nested terms reachable from the trail, so the walk
    /// recurses through `TermBank::subterms` down to the leaves rather than stopping at each
    /// literal's top constructor.
    ///
    /// Recomputed on demand rather than cached: cheap relative to a rule application, and
    /// avoids having to invalidate a cache whenever `clauses` grows.
    pub fn all_vars(&self) -> FxHashSet<Term> {
        let env = self.env.borrow();
        let mut vars = FxHashSet::default();
        let mut pending: Vec<Term> = self.clauses.iter().flat_map(|c| c.iter()).collect();
        while let Some(t) = pending.pop() {
            let v = env.terms.abs(t);
            if vars.insert(v) {
                pending.extend(env.terms.subterms(v));
            }
        }
        vars
    }

    /// Variables from `all_vars` that the trail does not yet assign.
    pub fn to_decide(&self) -> FxHashSet<Term> {
        let mut vars = self.all_vars();
        for entry in self.trail.iter() {
            vars.remove(&entry.lit());
        }
        vars
    }

    /// The EUF domain-forcing table derived from the trail.
    pub fn uf_domain(&self) -> UfDomain {
        compute_uf_domain(&self.env.borrow(), &self.trail)
    }

    /// The EUF application-signature table derived from the trail.
    pub fn uf_sigs(&self) -> UfSigs {
        compute_uf_sigs(&self.env.borrow(), &self.trail)
    }

    /// `clauses` with a new lemma appended. Shares the unaffected prefix with
    /// `self.clauses` via `Rc::make_mut`'s clone-on-write, or simply clones the `Rc` when no
    /// other `State` holds a reference.
    pub fn with_learned_clause(&self, lemma: Clause) -> Rc<Vec<Clause>> {
        let mut clauses = (*self.clauses).clone();
        clauses.push(lemma);
        Rc::new(clauses)
    }
}
