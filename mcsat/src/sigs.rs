//! The EUF application-signature table.
use rustc_hash::FxHashMap;

use mcsat_formula::{Env, Symbol, Term, TermView, Value};

use crate::trail::Trail;

/// A function symbol applied to a tuple of argument *values* (not terms): the key congruence
/// closure groups applications by.
pub type SigKey = (Symbol, Vec<Value>);

/// Maps each observed signature to one witnessing application term and its current value.
///
/// When two applications of the same function to equal-valued arguments disagree on their own
/// value, that is a congruence conflict; this table is how `find_congruence_conflict`
/// discovers the first witness to compare newly seen applications against.
pub type UfSigs = FxHashMap<SigKey, (Value, Term)>;

/// Scans the trail for fully-assigned applications and builds the signature table.
///
/// Which witness wins when several applications share a signature is unspecified and does not
/// affect soundness: any later application with the same signature and a differing value is
/// still found by a direct trail scan in `find_congruence_conflict`.
pub fn compute_uf_sigs(env: &Env, trail: &Trail) -> UfSigs {
    let assignment = trail.assignment();
    let mut table = UfSigs::default();

    for entry in trail.iter() {
        let t = entry.lit();
        let (f, args) = match env.terms.view(t) {
            TermView::App(f, args) => (f, args),
            _ => continue,
        };
        let values: Option<Vec<Value>> = args.iter().map(|&a| assignment.get(a)).collect();
        let values = match values {
            Some(v) => v,
            None => continue,
        };
        let value = match assignment.get(t) {
            Some(v) => v,
            None => continue,
        };
        table.insert((f, values), (value, t));
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::new_env_handle;
    use crate::trail::TrailKind;
    use mcsat_formula::AnonValue;

    #[test]
    fn fully_assigned_application_is_indexed() {
        let env = new_env_handle();
        let (u, b, f, c, app) = {
            let mut e = env.borrow_mut();
            let u = e.declare_type("U");
            let b = e.types.bool_ty();
            let fty = e.types.arrow_chain(&[u], b);
            let f = e.declare_fun("f", fty).unwrap();
            let c_sym = e.declare_fun("c", u).unwrap();
            let c = e.app(c_sym, vec![]);
            let app = e.app(f, vec![c]);
            (u, b, f, c, app)
        };
        let _ = b;
        let cv = Value::Unin(AnonValue::new(u, 0));

        let trail = Trail::new(&env);
        let trail = trail.cons(&env, TrailKind::Decision, c, cv);
        let trail = trail.cons(&env, TrailKind::Decision, app, Value::Bool(true));

        let table = compute_uf_sigs(&env.borrow(), &trail);
        assert_eq!(table.get(&(f, vec![cv])), Some(&(Value::Bool(true), app)));
    }
}
