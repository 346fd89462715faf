use std::env;
use std::fs;
use std::io::{self, Read};

use anyhow::{anyhow, Context, Error};
use clap::{App, Arg};
use env_logger::{fmt, Builder, Target};
use log::{info, trace, Level, LevelFilter, Record};
use std::io::Write as _;

use mcsat::if_lifting::remove_ifs;
use mcsat::{env_handle, step, SolverConfig, State, StepResult};

fn main() {
    let exit_code = match main_with_err() {
        Err(err) => {
            log::error!("{}", err);
            1
        }
        Ok(code) => code,
    };
    std::process::exit(exit_code);
}

fn init_logging() {
    let format = |buf: &mut fmt::Formatter, record: &Record| {
        if record.level() == Level::Info {
            writeln!(buf, "c {}", record.args())
        } else {
            writeln!(buf, "c {}: {}", record.level(), record.args())
        }
    };

    let mut builder = Builder::new();
    builder.target(Target::Stdout).format(format).filter(None, LevelFilter::Info);

    if let Ok(env_var) = env::var("MCSAT_LOG") {
        builder.parse_filters(&env_var);
    }

    builder.init();
}

fn main_with_err() -> Result<i32, Error> {
    let matches = App::new("mcsat")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A non-interactive driver for the mcsat EUF decision procedure")
        .arg_from_usage("[INPUT] 'The input file to use (stdin if omitted)'")
        .arg(
            Arg::from_usage("--step-budget=[N] 'Maximum number of rule applications before giving up'")
                .default_value("1000000"),
        )
        .arg_from_usage("--no-if-lifting 'Disable if-lifting preprocessing'")
        .get_matches();

    init_logging();
    info!("This is mcsat {}", env!("CARGO_PKG_VERSION"));

    let source = match matches.value_of("INPUT") {
        Some(path) => {
            info!("Reading file '{}'", path);
            fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path))?
        }
        None => {
            info!("Reading from stdin");
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let (env, clauses) = mcsat_sexpr::parse_program(&source).context("parse error")?;
    let original_clause_count = clauses.len();

    let mut config = SolverConfig::default();
    config.if_lifting = !matches.is_present("no-if-lifting");
    config.step_budget = matches.value_of("step-budget").unwrap().parse().context("invalid --step-budget")?;

    let state = State::new(env_handle(env), clauses, config);
    let state = remove_ifs(state);

    let final_state = drive_to_completion(state)?;

    print_verdict(&final_state, original_clause_count);

    match final_state.status {
        mcsat::Status::Sat => Ok(10),
        mcsat::Status::Unsat => Ok(20),
        _ => unreachable!("drive_to_completion only returns a terminal state"),
    }
}

/// Repeatedly calls [`step`], always taking the first alternative of a [`StepResult::Choice`],
/// until [`StepResult::Done`] or the configured step budget is exhausted.
///
/// This loop contains no solving logic of its own -- picking "first choice always" is the one
/// policy decision the CLI makes, exactly as thin as `varisat-cli`'s relationship to
/// `varisat::solver::Solver`.
fn drive_to_completion(mut state: State) -> Result<State, Error> {
    let budget = state.config.step_budget;
    let mut steps = 0usize;
    loop {
        if steps >= budget {
            return Err(anyhow!("step budget of {} exhausted without reaching a verdict", budget));
        }
        steps += 1;

        match step(&state) {
            StepResult::Done(final_state, explanation) => {
                trace!("{}", explanation);
                return Ok(final_state);
            }
            StepResult::One(next, explanation) => {
                trace!("{}", explanation);
                state = next;
            }
            StepResult::Choice(mut alternatives) => {
                if alternatives.is_empty() {
                    return Err(anyhow!("step: a Choice with no alternatives"));
                }
                let (next, explanation) = alternatives.remove(0);
                trace!("{} (1 of {} alternatives)", explanation, alternatives.len() + 1);
                state = next;
            }
            StepResult::Error(err) => return Err(err.into()),
        }
    }
}

fn print_verdict(state: &State, original_clause_count: usize) {
    match &state.status {
        mcsat::Status::Sat => {
            println!("sat");
            let env = state.env.borrow();
            let assignment = state.trail.assignment();
            for sym in env.symbols.iter() {
                if env.symbols.is_fresh(sym) {
                    continue;
                }
                let (args, _ret) = env.types.open(env.symbols.ty(sym));
                if !args.is_empty() {
                    continue;
                }
                let name = env.symbols.name(sym);
                match find_nullary_app(&env, sym) {
                    Some(t) => match assignment.get(t) {
                        Some(v) => println!("{} = {:?}", name, v),
                        None => println!("{} = <unconstrained>", name),
                    },
                    None => println!("{} = <unconstrained>", name),
                }
            }
        }
        mcsat::Status::Unsat => {
            let learned = state.clauses.len() - original_clause_count;
            println!("unsat");
            println!("learned {} lemma(s)", learned);
        }
        _ => unreachable!("drive_to_completion only returns a terminal state"),
    }
}

/// Finds the already-interned nullary application of `sym`, if the input ever mentioned it.
///
/// Avoids minting a fresh `App` term purely for model printing: a symbol the input never
/// applied has no term to look an assignment up under.
fn find_nullary_app(env: &mcsat_formula::Env, sym: mcsat_formula::Symbol) -> Option<mcsat_formula::Term> {
    env.terms.interned_app(sym, &[])
}
