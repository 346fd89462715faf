//! End-to-end scenarios, driven through the public `mcsat-sexpr` + `mcsat` API the way
//! `mcsat-cli` drives them: parse, lift `If`s to a fixed point, then call `step` to completion
//! always taking the first choice.
use mcsat::if_lifting::remove_ifs;
use mcsat::{env_handle, step, SolverConfig, State, Status, StepResult};

fn run(source: &str) -> State {
    let (env, clauses) = mcsat_sexpr::parse_program(source).expect("scenario source must parse");
    let state = State::new(env_handle(env), clauses, SolverConfig::default());
    let mut state = remove_ifs(state);

    for _ in 0..10_000 {
        match step(&state) {
            StepResult::Done(final_state, _) => return final_state,
            StepResult::One(next, _) => state = next,
            StepResult::Choice(mut alts) => {
                assert!(!alts.is_empty(), "a Choice must offer at least one alternative");
                state = alts.remove(0).0;
            }
            StepResult::Error(err) => panic!("unexpected engine error: {}", err),
        }
    }
    panic!("scenario did not reach a verdict within the step bound");
}

fn assert_sat(source: &str) -> State {
    let state = run(source);
    assert!(matches!(state.status, Status::Sat), "expected sat");
    state
}

fn assert_unsat(source: &str) -> State {
    let state = run(source);
    assert!(matches!(state.status, Status::Unsat), "expected unsat");
    state
}

/// A direct boolean contradiction between an equality and its negation.
#[test]
fn scenario_1_direct_contradiction() {
    assert_unsat("(ty U) (fun a U) (fun b U) (assert (= a b)) (assert (not (= a b)))");
}

/// Transitivity. `a=b`, `b=c`, `a!=c` forces a Forbid or Forced2 UF conflict whose
/// transitivity lemma drives boolean resolution to the empty clause.
#[test]
fn scenario_2_transitivity() {
    assert_unsat(
        "(ty U) (fun a U) (fun b U) (fun c U) \
         (assert (= a b)) (assert (= b c)) (assert (not (= a c)))",
    );
}

/// Congruence. `a=b` but `f(a) != f(b)` contradicts the congruence axiom.
#[test]
fn scenario_3_congruence() {
    assert_unsat(
        "(ty U) (fun f (-> U U)) (fun a U) (fun b U) \
         (assert (= a b)) (assert (not (= (f a) (f b))))",
    );
}

/// Pure propositional unsat via BCP + resolution (no EUF involved).
#[test]
fn scenario_4_pure_bcp() {
    assert_unsat(
        "(fun p bool) (fun q bool) \
         (assert (or p q)) (assert (or (not p) q)) (assert (not q))",
    );
}

/// A tautology is satisfiable under either decision.
#[test]
fn scenario_5_tautology_is_sat() {
    assert_sat("(fun p bool) (assert (or p (not p)))");
}

/// `a=b` or `a!=b` is satisfiable by either EUF decision, and the model must falsify no
/// original clause (rule soundness).
#[test]
fn scenario_6_euf_tautology_is_sat() {
    let state = assert_sat("(ty U) (fun a U) (fun b U) (assert (or (= a b) (not (= a b))))");

    let env = state.env.borrow();
    let assignment = state.trail.assignment();
    for clause in state.clauses.iter() {
        assert!(
            !mcsat_formula::clause::eval_to_false(&env.terms, assignment, clause),
            "a Sat model must falsify no original clause"
        );
    }
}

/// Parsing a printed clause yields an equivalent clause set (round-trip).
#[test]
fn round_trip_printed_clauses() {
    let source = "(ty U) (fun a U) (fun b U) (assert (= a b)) (assert (not (= a b)))";
    let (env, clauses) = mcsat_sexpr::parse_program(source).unwrap();

    let printed: Vec<String> = clauses
        .iter()
        .map(|c| {
            mcsat_formula::ClausePrinter {
                terms: &env.terms,
                types: &env.types,
                symbols: &env.symbols,
                clause: c,
            }
            .to_string()
        })
        .collect();

    let reparsed_source = printed.iter().fold(
        "(ty U) (fun a U) (fun b U)".to_owned(),
        |mut acc, printed_clause| {
            acc.push_str(" (assert ");
            acc.push_str(printed_clause);
            acc.push(')');
            acc
        },
    );

    let (_, reparsed_clauses) = mcsat_sexpr::parse_program(&reparsed_source).unwrap();
    assert_eq!(reparsed_clauses.len(), clauses.len());
    for (a, b) in reparsed_clauses.iter().zip(clauses.iter()) {
        assert_eq!(a.len(), b.len());
    }
}
