//! An MCSat-style decision procedure for propositional logic combined with the theory of
//! Equality with Uninterpreted Functions (EUF).
//!
//! The engine is a rule-directed state machine: a [`state::State`] bundles
//! the declared-symbol environment, the clause set, the [`trail::Trail`], and a [`state::Status`];
//! [`driver::step`] applies the first firable rule from a fixed priority order and returns
//! either a deterministic successor, a nondeterministic choice, a terminal verdict, or an
//! internal-invariant [`error::EngineError`].
pub mod config;
pub mod domain;
pub mod driver;
pub mod error;
pub mod if_lifting;
pub mod lemma;
pub mod rules;
pub mod sigs;
pub mod state;
pub mod trail;

pub use config::SolverConfig;
pub use driver::{step, StepResult};
pub use error::EngineError;
pub use lemma::ConflictRecord;
pub use state::{env_handle, new_env_handle, EnvHandle, State, Status};
pub use trail::{Trail, TrailKind};
