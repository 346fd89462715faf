//! Hash-consed terms.
use std::fmt;

use rustc_hash::FxHashMap;

use crate::symbol::{Symbol, SymbolTable};
use crate::ty::{TypeBank, TypeId};

/// The backing type used to index interned terms.
pub type TermIdx = u32;

/// A hash-consed term.
///
/// Equality is id equality: `id-equal ⇔ structurally-equal`. The only way to build a
/// `Term` is through [`TermBank`]'s smart constructors, which perform double-negation
/// elimination and boolean constant folding before interning.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Term {
    index: TermIdx,
}

impl Term {
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "t{}", self.index)
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
enum TermData {
    Bool(bool),
    Not(Term),
    Eq(Term, Term),
    App(Symbol, Vec<Term>),
    If(Term, Term, Term),
}

#[derive(Debug)]
struct TermInfo {
    data: TermData,
    ty: TypeId,
}

/// A read-only view of a term's top-level structure, for matching outside this module.
#[derive(Copy, Clone, Debug)]
pub enum TermView<'a> {
    Bool(bool),
    Not(Term),
    Eq(Term, Term),
    App(Symbol, &'a [Term]),
    If(Term, Term, Term),
}

/// Hash-consing table for [`Term`]s.
///
/// Like [`crate::ty::TypeBank`], this is localized per [`crate::env::Env`] rather than a
/// process-wide global, so distinct solver instances never share tables.
#[derive(Default, Debug)]
pub struct TermBank {
    infos: Vec<TermInfo>,
    index: FxHashMap<TermData, Term>,
}

impl TermBank {
    pub fn new() -> TermBank {
        TermBank::default()
    }

    fn intern(&mut self, data: TermData, ty: TypeId) -> Term {
        if let Some(&t) = self.index.get(&data) {
            return t;
        }
        let t = Term {
            index: self.infos.len() as TermIdx,
        };
        self.infos.push(TermInfo {
            data: data.clone(),
            ty,
        });
        self.index.insert(data, t);
        t
    }

    pub fn ty(&self, t: Term) -> TypeId {
        self.infos[t.index()].ty
    }

    /// The top-level structure of a term.
    pub fn view(&self, t: Term) -> TermView<'_> {
        match &self.infos[t.index()].data {
            TermData::Bool(b) => TermView::Bool(*b),
            TermData::Not(u) => TermView::Not(*u),
            TermData::Eq(a, b) => TermView::Eq(*a, *b),
            TermData::App(f, args) => TermView::App(*f, args),
            TermData::If(a, b, c) => TermView::If(*a, *b, *c),
        }
    }

    /// Boolean constant term.
    pub fn bool_const(&mut self, types: &mut TypeBank, value: bool) -> Term {
        let ty = types.bool_ty();
        self.intern(TermData::Bool(value), ty)
    }

    /// `not_(t)`: double-negation elimination and boolean constant folding.
    ///
    /// This is the only entry point for negation; it defines what "literal negation" means
    /// everywhere else in the engine, including trail coherence.
    pub fn not_(&mut self, types: &mut TypeBank, t: Term) -> Term {
        debug_assert!(types.is_bool(self.ty(t)), "not_ requires a boolean operand");
        match self.view(t) {
            TermView::Bool(b) => self.bool_const(types, !b),
            TermView::Not(u) => u,
            _ => {
                let ty = self.ty(t);
                self.intern(TermData::Not(t), ty)
            }
        }
    }

    /// `eq(a, b)`: canonicalized so that `eq(a,b)` and `eq(b,a)` intern to the same term
    /// by ordering operands with the smaller term id first.
    pub fn eq(&mut self, types: &mut TypeBank, a: Term, b: Term) -> Term {
        debug_assert_eq!(self.ty(a), self.ty(b), "eq requires operands of equal type");
        let (lo, hi) = if a.index <= b.index { (a, b) } else { (b, a) };
        let ty = types.bool_ty();
        self.intern(TermData::Eq(lo, hi), ty)
    }

    /// `App(f, args)`: `f`'s type must open into `(arg-types, ret)` with matching arity and
    /// argument types. Arity/type mismatches are user input errors caught by the parser
    /// before this is called; here they are debug-checked invariants.
    pub fn app(&mut self, types: &mut TypeBank, symbols: &SymbolTable, f: Symbol, args: Vec<Term>) -> Term {
        let (arg_tys, ret) = types.open(symbols.ty(f));
        debug_assert_eq!(arg_tys.len(), args.len(), "application arity mismatch");
        debug_assert!(
            arg_tys.iter().zip(&args).all(|(&ety, &a)| ety == self.ty(a)),
            "application argument type mismatch"
        );
        self.intern(TermData::App(f, args), ret)
    }

    /// Looks up an already-interned `App(f, args)` without minting one if absent.
    ///
    /// Used for model printing (`mcsat-cli`): a declared symbol the input formula never
    /// mentions has no term to report an assignment for.
    pub fn interned_app(&self, f: Symbol, args: &[Term]) -> Option<Term> {
        self.index.get(&TermData::App(f, args.to_vec())).copied()
    }

    /// `If(a, b, c)`: `ty(a) = Bool`, `ty(b) = ty(c)`; the result has that common type.
    /// Eliminated by `remove_ifs` before the rule loop starts.
    pub fn if_(&mut self, types: &mut TypeBank, cond: Term, then_: Term, else_: Term) -> Term {
        debug_assert!(types.is_bool(self.ty(cond)), "if_ condition must be boolean");
        debug_assert_eq!(self.ty(then_), self.ty(else_), "if_ branches must share a type");
        let ty = self.ty(then_);
        self.intern(TermData::If(cond, then_, else_), ty)
    }

    /// `abs(t)`: strips a leading `Not`.
    pub fn abs(&self, t: Term) -> Term {
        match self.view(t) {
            TermView::Not(u) => u,
            _ => t,
        }
    }

    /// `sign(t)`: `false` iff the top constructor is `Not` or boolean `false`.
    pub fn sign(&self, t: Term) -> bool {
        match self.view(t) {
            TermView::Not(_) => false,
            TermView::Bool(b) => b,
            _ => true,
        }
    }

    /// All direct subterms of `t`, in argument order (used to compute `all_vars`).
    pub fn subterms(&self, t: Term) -> Vec<Term> {
        match self.view(t) {
            TermView::Bool(_) => vec![],
            TermView::Not(u) => vec![u],
            TermView::Eq(a, b) => vec![a, b],
            TermView::App(_, args) => args.to_vec(),
            TermView::If(a, b, c) => vec![a, b, c],
        }
    }
}

/// Pairs a [`Term`] with the banks needed to print it, using the surface syntax.
pub struct TermPrinter<'a> {
    pub terms: &'a TermBank,
    pub types: &'a TypeBank,
    pub symbols: &'a SymbolTable,
    pub term: Term,
}

impl<'a> fmt::Display for TermPrinter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.write(f, self.term)
    }
}

impl<'a> TermPrinter<'a> {
    fn with(&self, t: Term) -> TermPrinter<'a> {
        TermPrinter {
            terms: self.terms,
            types: self.types,
            symbols: self.symbols,
            term: t,
        }
    }

    fn write(&self, f: &mut fmt::Formatter, t: Term) -> fmt::Result {
        match self.terms.view(t) {
            TermView::Bool(b) => write!(f, "{}", b),
            TermView::Not(u) => write!(f, "(not {})", self.with(u)),
            TermView::Eq(a, b) => write!(f, "(= {} {})", self.with(a), self.with(b)),
            TermView::If(a, b, c) => {
                write!(f, "(ite {} {} {})", self.with(a), self.with(b), self.with(c))
            }
            TermView::App(sym, args) => {
                if args.is_empty() {
                    write!(f, "{}", self.symbols.name(sym))
                } else {
                    write!(f, "({}", self.symbols.name(sym))?;
                    for &a in args {
                        write!(f, " {}", self.with(a))?;
                    }
                    write!(f, ")")
                }
            }
        }
    }
}
