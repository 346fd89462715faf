//! Solver-wide configuration (mirrors `varisat::config`).

/// Engine-wide toggles.
///
/// Kept deliberately small: the core has no tuning heuristics (no activity decay, no restart
/// schedule) since the decision rule is a plain nondeterministic choice, not a search
/// heuristic.
#[derive(Copy, Clone, Debug)]
pub struct SolverConfig {
    /// Whether `remove_ifs` runs to a fixed point before the rule loop starts.
    pub if_lifting: bool,
    /// Upper bound on the number of rule applications a driver loop will perform before
    /// giving up. Used only by tests and `mcsat-cli` to bound runaway loops on malformed
    /// input; the core rules themselves have no notion of a budget ("Timeouts, if any,
    /// are the caller's concern").
    pub step_budget: usize,
}

impl Default for SolverConfig {
    fn default() -> SolverConfig {
        SolverConfig {
            if_lifting: true,
            step_budget: 1_000_000,
        }
    }
}
