//! Proptest strategies for generating small well-typed term pools and clause sets.
//!
//! Mirrors the role of `varisat_formula::test`'s formula generators, adapted to a typed term
//! universe instead of plain DIMACS literals: callers build a fixed pool of boolean atoms and
//! uninterpreted constants, then draw random clauses over that pool.
use proptest::prelude::*;

use crate::env::Env;
use crate::term::Term;

/// A fixed pool of terms to draw literals from: boolean atoms, uninterpreted constants of a
/// single type, and the equalities between those constants.
pub struct TermPool {
    pub env: Env,
    pub bool_atoms: Vec<Term>,
    pub euf_consts: Vec<Term>,
    pub euf_eqs: Vec<Term>,
}

/// Builds a pool with `bools` boolean atoms and `consts` constants of one uninterpreted type,
/// together with all pairwise equalities between those constants.
pub fn term_pool(bools: usize, consts: usize) -> TermPool {
    let mut env = Env::new();
    let bool_ty = env.types.bool_ty();
    let bool_atoms = (0..bools)
        .map(|i| {
            let sym = env.declare_fun(format!("p{}", i), bool_ty).unwrap();
            env.app(sym, vec![])
        })
        .collect::<Vec<_>>();

    let u = env.declare_type("U");
    let euf_consts = (0..consts)
        .map(|i| {
            let sym = env.declare_fun(format!("c{}", i), u).unwrap();
            env.app(sym, vec![])
        })
        .collect::<Vec<_>>();

    let mut euf_eqs = vec![];
    for i in 0..euf_consts.len() {
        for j in (i + 1)..euf_consts.len() {
            euf_eqs.push(env.eq(euf_consts[i], euf_consts[j]));
        }
    }

    TermPool {
        env,
        bool_atoms,
        euf_consts,
        euf_eqs,
    }
}

/// A strategy drawing a random literal index and polarity from a pool of `len` positive atoms.
pub fn literal_choice(len: usize) -> impl Strategy<Value = (usize, bool)> {
    (0..len, any::<bool>())
}
