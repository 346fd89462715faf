//! Data model shared by the MCSat-style EUF decision procedure: hash-consed types and terms,
//! boolean/uninterpreted domain values, and clauses with semantic evaluation.
//!
//! The leaf data types every other crate in this workspace builds on, playing the role
//! `varisat-formula` plays for `varisat`.

pub mod assignment;
pub mod clause;
pub mod env;
pub mod symbol;
pub mod term;
pub mod ty;
pub mod value;

#[cfg(any(test, feature = "proptest-strategies"))]
pub mod test;

pub use assignment::Assignment;
pub use clause::{Clause, ClausePrinter};
pub use env::Env;
pub use symbol::{RedeclarationError, Symbol, SymbolTable};
pub use term::{Term, TermBank, TermPrinter, TermView};
pub use ty::{TypeBank, TypeId};
pub use value::{anon_value, AnonValue, Value};
