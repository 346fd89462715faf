//! Declared variables and function symbols.
use std::fmt;

use rustc_hash::FxHashMap;

use crate::ty::TypeId;

/// The backing type used to index declared symbols.
pub type SymbolIdx = u32;

/// A declared variable or function symbol.
///
/// Equality is by identifier: two `Symbol`s compare equal iff they were
/// returned by the same declaration.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Symbol {
    index: SymbolIdx,
}

impl Symbol {
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "sym{}", self.index)
    }
}

#[derive(Debug)]
struct SymbolData {
    name: String,
    ty: TypeId,
    fresh: bool,
}

/// Error raised when a name is declared twice in the same scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedeclarationError {
    pub name: String,
}

impl fmt::Display for RedeclarationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "name '{}' shadows a previous declaration", self.name)
    }
}

impl std::error::Error for RedeclarationError {}

/// Table of declared symbols, keyed by their surface name.
///
/// Shared between the parser (which enforces the no-shadowing rule at declaration time) and
/// the core engine (which mints fresh constants for if-lifting, see
/// [`crate::env::Env::fresh_const`]).
#[derive(Default, Debug)]
pub struct SymbolTable {
    data: Vec<SymbolData>,
    by_name: FxHashMap<String, Symbol>,
    fresh_counter: u32,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    /// Declares a new symbol. Fails if `name` is already declared in this table.
    pub fn declare(&mut self, name: impl Into<String>, ty: TypeId) -> Result<Symbol, RedeclarationError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(RedeclarationError { name });
        }
        let id = Symbol {
            index: self.data.len() as SymbolIdx,
        };
        self.by_name.insert(name.clone(), id);
        self.data.push(SymbolData { name, ty, fresh: false });
        Ok(id)
    }

    /// Mints a symbol with a fresh, never-before-used name (used by if-lifting).
    pub fn declare_fresh(&mut self, prefix: &str, ty: TypeId) -> Symbol {
        loop {
            let name = format!("{}!{}", prefix, self.fresh_counter);
            self.fresh_counter += 1;
            if self.by_name.contains_key(&name) {
                continue;
            }
            let id = Symbol {
                index: self.data.len() as SymbolIdx,
            };
            self.by_name.insert(name.clone(), id);
            self.data.push(SymbolData { name, ty, fresh: true });
            return id;
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.by_name.get(name).copied()
    }

    pub fn ty(&self, sym: Symbol) -> TypeId {
        self.data[sym.index()].ty
    }

    pub fn name(&self, sym: Symbol) -> &str {
        &self.data[sym.index()].name
    }

    /// Whether `sym` was minted by [`SymbolTable::declare_fresh`] rather than a user
    /// declaration -- used to exclude if-lifting constants from a printed model.
    pub fn is_fresh(&self, sym: Symbol) -> bool {
        self.data[sym.index()].fresh
    }

    /// All declared symbols, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        (0..self.data.len() as SymbolIdx).map(|index| Symbol { index })
    }
}
