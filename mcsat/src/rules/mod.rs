//! The rule set, grouped and prioritized by [`crate::driver::step`].
pub mod conflict_detect;
pub mod conflict_resolve;
pub mod decide;
pub mod propagate;

use crate::state::State;

/// What a single rule application produced.
pub enum Applied {
    /// A single deterministic successor with an explanation.
    One(State, String),
    /// A nondeterministic choice among successors, each with its own explanation.
    Choice(Vec<(State, String)>),
}
