//! Command-line flags, via `clap`'s derive macros (as `otter_cli::parse::cli`
//! builds its flags, just with the smaller surface this demonstration
//! driver actually needs).

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "warren", about = "A REPL/batch driver for the warren resolver and HTN planner")]
pub struct Cli {
    /// Source files to load before entering the REPL (see `parse::source`
    /// for the accepted surface syntax). Loaded in order.
    #[arg(trailing_var_arg = true)]
    pub files: Vec<PathBuf>,

    /// Soft memory budget, in bytes, for every query or plan search.
    #[arg(long = "memory-budget", value_name = "BYTES")]
    pub memory_budget: Option<usize>,

    /// Print trace dispatches from `failureContext/1` and `showTraces/1`
    /// to stderr as they arrive.
    #[arg(long)]
    pub trace: bool,

    /// Render solutions as JSON (via `Term::to_json`) instead of the
    /// default textual form.
    #[arg(long)]
    pub json: bool,

    /// Treat "no solutions"/"no plan found" as a hard error (propagates
    /// `Config::fail_fast_as_exception`).
    #[arg(long = "fail-fast")]
    pub fail_fast: bool,
}

pub fn cli() -> Cli {
    Cli::parse()
}
