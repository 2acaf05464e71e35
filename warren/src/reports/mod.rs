/*!
Outcome types returned from a resolver or planner run.

Kept separate from [`crate::resolve`] and [`crate::plan`] themselves so
that a host can match on a `Solution`/`PlanSolution`/`Diagnostics` without
depending on the engine's internal node/state types, mirroring the
teacher's own `reports` module's separation from `context`.
*/

use crate::ruleset::RuleSet;
use crate::term::Term;
use crate::unify::Unifier;

/// What a failed resolution or plan search knew about its deepest point
/// of failure, for a host to stringify into a diagnostic. Carries no
/// solutions — see `spec.md` §4.4 "Failure diagnostics" and §7's
/// `ResolutionFailure`/`PlanFailure`.
#[derive(Clone, Debug, Default)]
pub struct FailureDiagnostics {
    /// The textual form of the goal furthest down the proof tree that
    /// failed.
    pub deepest_goal: Option<String>,
    /// How many goals deep the failure occurred.
    pub depth: usize,
    /// The index, within the original top-level goal list, of the goal
    /// whose resolution produced this failure.
    pub original_goal_index: Option<usize>,
    /// Context terms set via `failureContext/N` at the point of failure.
    pub context: Vec<Term>,
}

/// Everything a [`crate::resolve::GoalResolver::resolve_all`] call
/// reports back beyond the bare list of solutions: whether the memory
/// budget was exceeded, and diagnostics about the deepest failure.
#[derive(Clone, Debug, Default)]
pub struct ResolveDiagnostics {
    pub out_of_memory: bool,
    pub deepest_failure: Option<FailureDiagnostics>,
}

/// One solution to an HTN plan search: the primitive operator
/// applications found, in emission order, and the world state they
/// produce. The Rust rendering of the teacher-inspired
/// `HtnPlanner::SolutionType`.
#[derive(Clone)]
pub struct PlanSolution {
    pub operators: Vec<Term>,
    pub final_state: RuleSet,
    pub elapsed_seconds: f64,
    pub highest_memory_used: usize,
}

/// Diagnostics returned alongside a (possibly empty) list of
/// [`PlanSolution`]s from [`crate::plan::HtnPlanner::find_all_plans`].
#[derive(Clone, Debug, Default)]
pub struct PlanDiagnostics {
    pub out_of_memory: bool,
    pub aborted: bool,
    pub deepest_failure: Option<FailureDiagnostics>,
}

/// A single resolved solution's bindings, convenience-wrapped so hosts
/// don't need to import [`Unifier`] directly just to read a query's
/// results.
pub type Solution = Unifier;
