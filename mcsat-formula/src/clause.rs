//! Clauses: duplicate-free disjunctions of literals, with semantic evaluation.
use std::fmt;
use std::iter::FromIterator;

use crate::assignment::Assignment;
use crate::term::{Term, TermBank, TermPrinter, TermView};
use crate::ty::TypeBank;
use crate::value::Value;

/// A set (unordered, duplicate-free) of boolean-typed terms, interpreted as their
/// disjunction.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct Clause {
    literals: Vec<Term>,
}

impl Clause {
    pub fn new() -> Clause {
        Clause::default()
    }

    pub fn from_literals(lits: impl IntoIterator<Item = Term>) -> Clause {
        let mut clause = Clause::new();
        for lit in lits {
            clause.insert(lit);
        }
        clause
    }

    /// Inserts `lit`, doing nothing if it is already present.
    pub fn insert(&mut self, lit: Term) {
        if !self.literals.contains(&lit) {
            self.literals.push(lit);
        }
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn contains(&self, lit: Term) -> bool {
        self.literals.contains(&lit)
    }

    pub fn iter(&self) -> impl Iterator<Item = Term> + '_ {
        self.literals.iter().copied()
    }

    pub fn as_slice(&self) -> &[Term] {
        &self.literals
    }

    /// The set union of two clauses.
    pub fn union(&self, other: &Clause) -> Clause {
        let mut result = self.clone();
        for lit in other.iter() {
            result.insert(lit);
        }
        result
    }

    /// This clause with `lit` removed, if present.
    pub fn without(&self, lit: Term) -> Clause {
        Clause::from_literals(self.iter().filter(|&l| l != lit))
    }

    /// The unique literal, if this clause has exactly one.
    pub fn as_unit(&self) -> Option<Term> {
        match self.literals.as_slice() {
            [lit] => Some(*lit),
            _ => None,
        }
    }
}

impl FromIterator<Term> for Clause {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Clause {
        Clause::from_literals(iter)
    }
}

/// A literal `t` evaluates to true under `a` if `a(t) = Bool(true)`, or — recursively, via
/// semantic evaluation -- `t = Eq(x,y)` and `a(x)`, `a(y)` are both defined and equal,
/// or `t = Not(u)` and `u` evaluates to false.
pub fn literal_is_true(terms: &TermBank, a: &Assignment, t: Term) -> bool {
    if a.get(t) == Some(Value::Bool(true)) {
        return true;
    }
    match terms.view(t) {
        TermView::Eq(x, y) => matches!((a.get(x), a.get(y)), (Some(vx), Some(vy)) if vx == vy),
        TermView::Not(u) => literal_is_false(terms, a, u),
        _ => false,
    }
}

/// A literal `t` evaluates to false under `a` if `a(t) = Bool(false)`, or — recursively, via
/// semantic evaluation -- `t = Eq(x,y)` and `a(x)`, `a(y)` are both defined and
/// unequal, or `t = Not(u)` and `u` evaluates to true.
pub fn literal_is_false(terms: &TermBank, a: &Assignment, t: Term) -> bool {
    if a.get(t) == Some(Value::Bool(false)) {
        return true;
    }
    match terms.view(t) {
        TermView::Eq(x, y) => matches!((a.get(x), a.get(y)), (Some(vx), Some(vy)) if vx != vy),
        TermView::Not(u) => literal_is_true(terms, a, u),
        _ => false,
    }
}

/// Removes all literals of `c` evaluating to false under `a`.
pub fn filter_false(terms: &TermBank, a: &Assignment, c: &Clause) -> Clause {
    c.iter().filter(|&lit| !literal_is_false(terms, a, lit)).collect()
}

/// Whether every literal of `c` evaluates to false under `a`.
pub fn eval_to_false(terms: &TermBank, a: &Assignment, c: &Clause) -> bool {
    c.iter().all(|lit| literal_is_false(terms, a, lit))
}

/// Pairs a [`Clause`] with the banks needed to print it.
pub struct ClausePrinter<'a> {
    pub terms: &'a TermBank,
    pub types: &'a TypeBank,
    pub symbols: &'a crate::symbol::SymbolTable,
    pub clause: &'a Clause,
}

impl<'a> fmt::Display for ClausePrinter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.clause.as_slice() {
            [] => write!(f, "\u{22a5}"),
            [lit] => write!(
                f,
                "{}",
                TermPrinter {
                    terms: self.terms,
                    types: self.types,
                    symbols: self.symbols,
                    term: *lit,
                }
            ),
            lits => {
                write!(f, "(or")?;
                for &lit in lits {
                    write!(
                        f,
                        " {}",
                        TermPrinter {
                            terms: self.terms,
                            types: self.types,
                            symbols: self.symbols,
                            term: lit,
                        }
                    )?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolTable;

    #[test]
    fn dedup_on_insert() {
        let mut types = TypeBank::new();
        let mut terms = TermBank::new();
        let mut symbols = SymbolTable::new();
        let p = symbols.declare("p", types.bool_ty()).unwrap();
        let pt = terms.app(&mut types, &symbols, p, vec![]);

        let mut c = Clause::new();
        c.insert(pt);
        c.insert(pt);
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn eval_to_false_requires_all_false() {
        let mut types = TypeBank::new();
        let mut terms = TermBank::new();
        let mut symbols = SymbolTable::new();
        let p = symbols.declare("p", types.bool_ty()).unwrap();
        let q = symbols.declare("q", types.bool_ty()).unwrap();
        let pt = terms.app(&mut types, &symbols, p, vec![]);
        let qt = terms.app(&mut types, &symbols, q, vec![]);

        let mut a = Assignment::new();
        a.insert(pt, Value::Bool(false));
        let nqt = terms.not_(&mut types, qt);
        a.insert(nqt, Value::Bool(false));
        a.insert(qt, Value::Bool(true));

        let c = Clause::from_literals([pt, qt]);
        assert!(!eval_to_false(&terms, &a, &c));

        let c2 = Clause::from_literals([pt, nqt]);
        assert!(eval_to_false(&terms, &a, &c2));
    }

    #[test]
    fn equality_literal_semantic_evaluation() {
        let mut types = TypeBank::new();
        let mut terms = TermBank::new();
        let mut symbols = SymbolTable::new();
        let u = types.uninterpreted("U");
        let a_sym = symbols.declare("a", u).unwrap();
        let b_sym = symbols.declare("b", u).unwrap();
        let at = terms.app(&mut types, &symbols, a_sym, vec![]);
        let bt = terms.app(&mut types, &symbols, b_sym, vec![]);
        let eq_ab = terms.eq(&mut types, at, bt);

        let mut assignment = Assignment::new();
        assignment.insert(at, Value::Unin(crate::value::AnonValue::new(u, 0)));
        assignment.insert(bt, Value::Unin(crate::value::AnonValue::new(u, 1)));

        assert!(literal_is_false(&terms, &assignment, eq_ab));
        assert!(!literal_is_true(&terms, &assignment, eq_ab));
    }

    #[test]
    fn empty_clause_prints_as_bottom() {
        let types = TypeBank::new();
        let terms = TermBank::new();
        let symbols = SymbolTable::new();
        let c = Clause::new();
        let printer = ClausePrinter {
            terms: &terms,
            types: &types,
            symbols: &symbols,
            clause: &c,
        };
        assert_eq!(printer.to_string(), "\u{22a5}");
    }

    mod proptests {
        use std::collections::HashSet;

        use proptest::prelude::*;

        use super::*;
        use crate::test::{literal_choice, term_pool, TermPool};

        /// Resolves `(index, sign)` pairs against a pool's boolean atoms, negating the atom
        /// when `sign` is `false`.
        fn literals_of(pool: &mut TermPool, choices: &[(usize, bool)]) -> Vec<Term> {
            choices
                .iter()
                .map(|&(idx, sign)| {
                    let atom = pool.bool_atoms[idx];
                    if sign {
                        atom
                    } else {
                        pool.env.not_(atom)
                    }
                })
                .collect()
        }

        proptest! {
            /// Inserting any sequence of literals never leaves a clause with duplicates
            /// (clauses are duplicate-free sets).
            #[test]
            fn insert_is_idempotent(choices in proptest::collection::vec(literal_choice(6), 0..20)) {
                let mut pool = term_pool(6, 0);
                let literals = literals_of(&mut pool, &choices);

                let clause: Clause = literals.iter().copied().collect();
                let distinct: HashSet<Term> = literals.into_iter().collect();
                prop_assert_eq!(clause.len(), distinct.len());
            }

            /// With nothing assigned, `filter_false` drops nothing: every literal of a clause
            /// survives when the assignment cannot yet falsify any of them.
            #[test]
            fn filter_false_is_a_noop_on_the_empty_assignment(choices in proptest::collection::vec(literal_choice(4), 0..8)) {
                let mut pool = term_pool(4, 0);
                let literals = literals_of(&mut pool, &choices);
                let clause: Clause = literals.into_iter().collect();

                let assignment = Assignment::new();
                let filtered = filter_false(&pool.env.terms, &assignment, &clause);
                prop_assert_eq!(filtered.len(), clause.len());
            }
        }
    }
}
