//! Internal invariant violations.
//!
//! These are programmer errors: conditions the rule set guarantees never happen. They are
//! reported fatally, with enough context to debug the rule that violated its own contract, the
//! same way `thiserror` enums are used for `mcsat_sexpr::ParseError` (user errors) -- the two
//! error families are kept separate because they are different classes with different
//! recovery semantics (parse errors are routine; these are not).
use thiserror::Error;

use crate::lemma::ConflictRecord;

/// An internal invariant violation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("lemma synthesized from {record:?} does not evaluate to false under the current trail")]
    UnsoundLemma { record: ConflictRecord },

    #[error("decision-level filter produced a conflict clause of size {size} (expected <= 2)")]
    OversizedDecisionFilter { size: usize },

    #[error("rule {rule} applied to a state not in the expected status")]
    RuleStatusMismatch { rule: &'static str },
}
