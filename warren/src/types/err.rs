//! The error taxonomy returned from fallible operations across the crate.
//!
//! Following the split the engine's procedures are organised around, errors
//! are grouped by the phase of work that can produce them rather than lumped
//! into one flat enum. Each sub-enum has a manual `From` impl into
//! [`ErrorKind`] so call sites can use `?` regardless of which phase they are
//! in.

use std::fmt;

/// The top-level error type returned by fallible operations on
/// [`TermFactory`](crate::term::TermFactory), [`RuleSet`](crate::ruleset::RuleSet),
/// [`GoalResolver`](crate::resolve::GoalResolver), and
/// [`HtnPlanner`](crate::plan::HtnPlanner).
///
/// A [`ContractViolation`] means the caller broke an invariant the engine
/// documents (e.g. asserting a non-ground fact); these are programmer errors
/// and are always returned rather than silently tolerated. [`OutOfMemory`]
/// and the two failure kinds are different in kind: they are *expected*
/// outcomes of otherwise well-formed programs, and a host may choose to
/// treat them as values rather than as exceptional control flow (see
/// [`Config::fail_fast_as_exception`](crate::config::Config::fail_fast_as_exception)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    ContractViolation(ContractViolation),
    OutOfMemory(OutOfMemory),
    ResolutionFailure(ResolutionFailure),
    PlanFailure(PlanFailure),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ContractViolation(e) => write!(f, "contract violation: {e}"),
            ErrorKind::OutOfMemory(e) => write!(f, "out of memory: {e}"),
            ErrorKind::ResolutionFailure(e) => write!(f, "resolution failure: {e}"),
            ErrorKind::PlanFailure(e) => write!(f, "plan failure: {e}"),
        }
    }
}

impl std::error::Error for ErrorKind {}

/// A caller broke a documented invariant. These never arise from the shape
/// of the data being reasoned about, only from how the API was called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    /// `assert/1` or `retract/1` was given a term that contains a variable.
    NonGroundAssertOrRetract { goal: String },
    /// A [`Rule`](crate::rule::Rule) was added to a [`RuleSet`](crate::ruleset::RuleSet)
    /// whose base has already been shared via [`RuleSet::create_copy`](crate::ruleset::RuleSet::create_copy).
    BaseAlreadyShared,
    /// `assert/1` (or an operator's add list) named a fact that already
    /// exists in the ruleset.
    DuplicateFact { fact: String },
    /// A built-in predicate was called with the wrong arity or an argument
    /// shape it cannot accept (e.g. `atom_chars/2` on an unbound first arg).
    BadBuiltinArguments { predicate: String, detail: String },
    /// An operator or method referenced a task name with a different arity
    /// than any declared operator/method, *and* the host asked for strict
    /// contract checking rather than a [`PlanFailure::TaskNotFound`].
    UnknownTask { name: String, arity: usize },
    /// An arithmetic goal used a C-style relational operator
    /// (`<=`/`=>`) where Prolog's own spelling (`=<`/`>=`) was meant
    /// (`spec.md` §4.1, §7).
    ArithmeticOperatorTypo { found: String, suggested: &'static str },
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractViolation::NonGroundAssertOrRetract { goal } => {
                write!(f, "cannot assert or retract non-ground term `{goal}`")
            }
            ContractViolation::BaseAlreadyShared => {
                write!(f, "cannot add a rule to a base ruleset after it has been shared via create_copy")
            }
            ContractViolation::DuplicateFact { fact } => {
                write!(f, "fact `{fact}` already exists")
            }
            ContractViolation::BadBuiltinArguments { predicate, detail } => {
                write!(f, "bad arguments to `{predicate}`: {detail}")
            }
            ContractViolation::UnknownTask { name, arity } => {
                write!(f, "no operator or method named `{name}/{arity}`")
            }
            ContractViolation::ArithmeticOperatorTypo { found, suggested } => {
                write!(f, "`{found}` is not an arithmetic operator; did you mean `{suggested}`?")
            }
        }
    }
}

impl From<ContractViolation> for ErrorKind {
    fn from(e: ContractViolation) -> Self {
        ErrorKind::ContractViolation(e)
    }
}

/// The engine's memory budget (see [`Config::memory_budget`](crate::config::Config::memory_budget))
/// was exceeded. This is not a panic and not a bug report: a resolution or
/// plan search is free to explore an unbounded search space, and the budget
/// exists to make that bounded and observable rather than to prevent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutOfMemory {
    /// The term factory's estimated live-term footprint exceeded the budget.
    TermStore { estimated_bytes: usize, budget_bytes: usize },
    /// The resolver's node stack (or a nested standalone sub-resolution)
    /// exceeded the budget.
    ResolveStack { estimated_bytes: usize, budget_bytes: usize },
    /// The planner's node stack exceeded the budget.
    PlanStack { estimated_bytes: usize, budget_bytes: usize },
}

impl fmt::Display for OutOfMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutOfMemory::TermStore { estimated_bytes, budget_bytes } => write!(
                f,
                "term store estimated at {estimated_bytes} bytes exceeds budget of {budget_bytes} bytes"
            ),
            OutOfMemory::ResolveStack { estimated_bytes, budget_bytes } => write!(
                f,
                "resolver stack estimated at {estimated_bytes} bytes exceeds budget of {budget_bytes} bytes"
            ),
            OutOfMemory::PlanStack { estimated_bytes, budget_bytes } => write!(
                f,
                "planner stack estimated at {estimated_bytes} bytes exceeds budget of {budget_bytes} bytes"
            ),
        }
    }
}

impl From<OutOfMemory> for ErrorKind {
    fn from(e: OutOfMemory) -> Self {
        ErrorKind::OutOfMemory(e)
    }
}

/// A goal failed to resolve. Ordinary failure (a query simply has no
/// solutions) is reported as an empty solution list, not this error; this
/// variant is for failures the caller asked to be surfaced as a hard error
/// via [`Config::fail_fast_as_exception`](crate::config::Config::fail_fast_as_exception),
/// carrying the deepest-failure diagnostic the resolver collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionFailure {
    NoSolutions { deepest_goal: Option<String> },
}

impl fmt::Display for ResolutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionFailure::NoSolutions { deepest_goal: Some(goal) } => {
                write!(f, "no solutions found; deepest failure was at `{goal}`")
            }
            ResolutionFailure::NoSolutions { deepest_goal: None } => {
                write!(f, "no solutions found")
            }
        }
    }
}

impl From<ResolutionFailure> for ErrorKind {
    fn from(e: ResolutionFailure) -> Self {
        ErrorKind::ResolutionFailure(e)
    }
}

/// An HTN plan search failed or the domain itself is unsound. The first two
/// variants are structural domain problems ([`HtnPlanner::find_all_plans`](crate::plan::HtnPlanner::find_all_plans)
/// checks for these before searching); the last mirrors
/// [`ResolutionFailure::NoSolutions`] for plan search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanFailure {
    /// A method or operator's task body refers to a task name/arity that no
    /// operator or method declares.
    TaskNotFound { name: String, arity: usize },
    /// Static analysis of the method/operator graph found a cycle of task
    /// references with no base case that could terminate it.
    TaskLoop { cycle: Vec<String> },
    /// The search explored the whole space (or hit the depth guard) without
    /// finding a plan.
    NoPlanFound { deepest_task: Option<String> },
}

impl fmt::Display for PlanFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanFailure::TaskNotFound { name, arity } => {
                write!(f, "task `{name}/{arity}` is referenced but never declared as an operator or method")
            }
            PlanFailure::TaskLoop { cycle } => {
                write!(f, "task decomposition cycle with no base case: {}", cycle.join(" -> "))
            }
            PlanFailure::NoPlanFound { deepest_task: Some(task) } => {
                write!(f, "no plan found; deepest failure was decomposing `{task}`")
            }
            PlanFailure::NoPlanFound { deepest_task: None } => {
                write!(f, "no plan found")
            }
        }
    }
}

impl From<PlanFailure> for ErrorKind {
    fn from(e: PlanFailure) -> Self {
        ErrorKind::PlanFailure(e)
    }
}
