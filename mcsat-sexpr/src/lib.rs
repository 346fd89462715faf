//! The S-expression front-end: `(ty ..)`, `(fun ..)`, `(assert ..)` forms into an
//! [`mcsat_formula::Env`] and a clause set.
//!
//! Out of the trusted core by design: this crate only ever produces
//! well-typed terms through [`mcsat_formula::Env`]'s smart constructors, so a successfully
//! parsed program cannot violate any of the engine's type invariants.
mod lexer;
mod parser;

pub use parser::{parse_program, ParseError};
