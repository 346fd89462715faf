//! Partial assignment from terms to values.
use rustc_hash::FxHashMap;

use crate::term::Term;
use crate::value::Value;

/// A partial mapping from terms to values.
///
/// The coherence invariant ("whenever a boolean term `t` is assigned `Bool(b)`, the
/// assignment also contains `not(t) ↦ Bool(¬b)`") is not enforced by this type itself; it is
/// an invariant maintained by whoever builds an `Assignment` (the trail, see
/// `mcsat::trail`), because upholding it requires calling `not_` on the owning
/// [`crate::term::TermBank`], which this type does not have access to.
#[derive(Clone, Default)]
pub struct Assignment {
    values: FxHashMap<Term, Value>,
}

impl Assignment {
    pub fn new() -> Assignment {
        Assignment::default()
    }

    pub fn get(&self, t: Term) -> Option<Value> {
        self.values.get(&t).copied()
    }

    pub fn is_assigned(&self, t: Term) -> bool {
        self.values.contains_key(&t)
    }

    pub fn insert(&mut self, t: Term, v: Value) {
        self.values.insert(t, v);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Term, Value)> + '_ {
        self.values.iter().map(|(&t, &v)| (t, v))
    }
}
