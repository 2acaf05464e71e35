//! A minimal REPL/batch driver for `warren`: load one or more source
//! files, then read goals (or `goals(...)` plan requests) from stdin
//! until `q` or end of input.
//!
//! Grounded in the teacher's `otter_cli::main`'s shape — parse flags,
//! build a config, wire an optional dispatch channel, load files, then
//! drive the engine and report — with DIMACS clause loading and a SAT
//! report replaced by this crate's source loader and solution printer.

mod parse;

use std::io::{self, BufRead, Write as _};
use std::rc::Rc;
use std::thread;

use crossbeam::channel::unbounded;

use warren::config::Config;
use warren::dispatch::{Dispatch, TraceDetail, TraceFilter};
use warren::plan::HtnPlanner;
use warren::resolve::GoalResolver;
use warren::ruleset::RuleSet;
use warren::term::TermFactory;
use warren::unify::Unifier;

use parse::cli::cli;
use parse::source::{load_source, parse_conjunction};

fn main() {
    #[cfg(feature = "log")]
    env_logger::init();

    let args = cli();

    let mut config = Config::default();
    if let Some(budget) = args.memory_budget {
        if let Err(e) = config.memory_budget.set_value(budget) {
            eprintln!("c {e}");
            std::process::exit(1);
        }
    }
    if args.fail_fast {
        config.fail_fast_as_exception = true;
    }

    let sink: Option<Rc<dyn Fn(Dispatch)>> = if args.trace {
        let (tx, rx) = unbounded::<Dispatch>();
        thread::spawn(move || {
            let filter = TraceFilter::all(TraceDetail::Low);
            while let Ok(dispatch) = rx.recv() {
                match dispatch {
                    Dispatch::Trace { category, detail, message } => {
                        if filter.enabled(category, detail) {
                            eprintln!("c [{category:?}] {message}");
                        }
                    }
                    Dispatch::Write(text) => print!("{text}"),
                }
            }
        });
        Some(Rc::new(move |d: Dispatch| {
            let _ = tx.send(d);
        }))
    } else {
        Some(Rc::new(|d: Dispatch| {
            if let Dispatch::Write(text) = d {
                print!("{text}");
            }
        }))
    };

    let factory = TermFactory::new();
    let mut rules = RuleSet::new();
    let mut resolver = GoalResolver::new();
    if let Some(sink) = sink {
        resolver.set_dispatch(sink);
    }
    let mut planner = HtnPlanner::with_resolver(resolver);

    for path in &args.files {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("c error reading {}: {e}", path.display());
                std::process::exit(1);
            }
        };
        if let Err(e) = load_source(&factory, &mut rules, &mut planner, &text) {
            eprintln!("c error loading {}: {e}", path.display());
            std::process::exit(1);
        }
    }

    repl(&factory, &mut rules, &planner, &config, args.json);
}

/// Reads one line at a time from stdin. A line starting with `goals(`
/// (and ending in `)`) is a plan request over the planner; anything else
/// is a resolver query, parsed as a conjunction. `q` exits.
fn repl(factory: &TermFactory, rules: &mut RuleSet, planner: &HtnPlanner, config: &Config, as_json: bool) {
    let stdin = io::stdin();
    print!("?- ");
    let _ = io::stdout().flush();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let line = line.trim();
        if line == "q" {
            break;
        }
        if line.is_empty() {
            print!("?- ");
            let _ = io::stdout().flush();
            continue;
        }

        if let Some(inner) = line.strip_prefix("goals(").and_then(|rest| rest.strip_suffix(')')) {
            run_plan_query(factory, rules, planner, config, inner, as_json);
        } else {
            run_resolve_query(factory, rules, planner.goal_resolver(), config, line, as_json);
        }

        print!("?- ");
        let _ = io::stdout().flush();
    }
}

fn run_resolve_query(
    factory: &TermFactory,
    rules: &mut RuleSet,
    resolver: &GoalResolver,
    config: &Config,
    text: &str,
    as_json: bool,
) {
    let goals = match parse_conjunction(factory, text) {
        Ok(goals) => goals,
        Err(e) => {
            println!("parse error: {e}");
            return;
        }
    };
    match resolver.resolve_all(factory, rules, goals, config) {
        Ok((solutions, diagnostics)) => {
            if solutions.is_empty() {
                println!("false.");
            }
            for solution in &solutions {
                print_solution(factory, solution, as_json);
            }
            if diagnostics.out_of_memory {
                println!("c memory budget exceeded before the search completed");
            }
        }
        Err(e) => println!("c {e}"),
    }
}

fn run_plan_query(
    factory: &TermFactory,
    rules: &RuleSet,
    planner: &HtnPlanner,
    config: &Config,
    text: &str,
    as_json: bool,
) {
    let goals = match parse_conjunction(factory, text) {
        Ok(goals) => goals,
        Err(e) => {
            println!("parse error: {e}");
            return;
        }
    };
    match planner.find_plan(factory, rules, goals, config) {
        Ok((Some(solution), _)) => {
            let rendered: Vec<String> = solution
                .operators
                .iter()
                .map(|op| if as_json { warren::term::to_json(op) } else { op.to_string() })
                .collect();
            println!("{}", rendered.join(", "));
        }
        Ok((None, diagnostics)) => {
            println!("false.");
            if diagnostics.out_of_memory {
                println!("c memory budget exceeded before the search completed");
            }
        }
        Err(e) => println!("c {e}"),
    }
}

fn print_solution(factory: &TermFactory, solution: &Unifier, as_json: bool) {
    let bindings = solution.bindings();
    if bindings.is_empty() {
        println!("true.");
        return;
    }
    let rendered: Vec<String> = bindings
        .iter()
        .map(|(variable, term)| {
            let value = solution.apply(factory, term);
            if as_json {
                format!("\"{variable}\":{}", warren::term::to_json(&value))
            } else {
                format!("{variable} = {value}")
            }
        })
        .collect();
    println!("{}", rendered.join(", "));
}
