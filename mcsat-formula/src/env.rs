//! Environment of declared types and function symbols.
use crate::symbol::{RedeclarationError, Symbol, SymbolTable};
use crate::term::{Term, TermBank, TermPrinter};
use crate::ty::{TypeBank, TypeId};

/// Bundles the hash-consing tables and symbol table that make up a `State`'s `env`.
///
/// Localized per solver instance rather than global: constructing a fresh `Env`
/// gives a fresh, independent set of interning tables.
#[derive(Default, Debug)]
pub struct Env {
    pub types: TypeBank,
    pub terms: TermBank,
    pub symbols: SymbolTable,
}

impl Env {
    pub fn new() -> Env {
        Env::default()
    }

    pub fn declare_type(&mut self, name: impl Into<String>) -> TypeId {
        self.types.uninterpreted(name)
    }

    pub fn declare_fun(&mut self, name: impl Into<String>, ty: TypeId) -> Result<Symbol, RedeclarationError> {
        self.symbols.declare(name, ty)
    }

    pub fn bool_const(&mut self, value: bool) -> Term {
        self.terms.bool_const(&mut self.types, value)
    }

    pub fn not_(&mut self, t: Term) -> Term {
        self.terms.not_(&mut self.types, t)
    }

    pub fn eq(&mut self, a: Term, b: Term) -> Term {
        self.terms.eq(&mut self.types, a, b)
    }

    pub fn app(&mut self, f: Symbol, args: Vec<Term>) -> Term {
        self.terms.app(&mut self.types, &self.symbols, f, args)
    }

    pub fn if_(&mut self, cond: Term, then_: Term, else_: Term) -> Term {
        self.terms.if_(&mut self.types, cond, then_, else_)
    }

    /// Mints a fresh constant of type `ty`, used by if-lifting.
    pub fn fresh_const(&mut self, ty: TypeId) -> Term {
        let sym = self.symbols.declare_fresh("ite", ty);
        self.app(sym, vec![])
    }

    pub fn print<'a>(&'a self, term: Term) -> TermPrinter<'a> {
        TermPrinter {
            terms: &self.terms,
            types: &self.types,
            symbols: &self.symbols,
            term,
        }
    }
}
