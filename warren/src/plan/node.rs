//! [`PlanNode`]: one frame of the planner's explicit stack, and
//! [`PlanState`], the iterator-style search state a host holds across
//! repeated [`crate::plan::HtnPlanner::find_next_plan`] calls — the Rust
//! rendering of the teacher-adjacent original's `PlanState` (`spec.md`
//! §4.5: "PlanState owns the plan-node stack, the initial RuleSet, start
//! time, memory budget/high-water mark, and next_node_id counter").

use std::time::Instant;

use crate::config::Config;
use crate::reports::PlanDiagnostics;
use crate::ruleset::RuleSet;
use crate::term::Term;

/// What a queued-up alternative for a [`PlanNode`]'s front task actually
/// does once selected.
#[derive(Clone)]
pub enum Candidate {
    /// Applying an operator: the term to emit (unless the operator is
    /// hidden) and the world state after its add/delete lists are
    /// applied.
    Operator { emitted: Option<Term>, state: RuleSet },
    /// A method (or bare condition-goal fallback) expansion: the
    /// substituted task list to splice in place of the front task. The
    /// world state is unchanged — only operators mutate it.
    Tasks(Vec<Term>),
}

/// Why a [`PlanNode`] is on the stack, mirroring
/// [`crate::resolve::ResolveContinuePoint`]'s shape for the planner's own
/// search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanContinuePoint {
    /// A deterministic continuation: decompose whatever task is now at
    /// the front of `tasks`.
    NextTask,
    /// A choice point: `candidates` holds every remaining alternative,
    /// `current_index` the next one to try.
    NextCandidate,
}

/// One frame of the planner's explicit, non-recursive stack.
pub struct PlanNode {
    pub id: u64,
    pub tasks: Vec<Term>,
    pub operators: Vec<Term>,
    pub state: RuleSet,
    pub continue_point: PlanContinuePoint,
    pub candidates: Vec<Candidate>,
    pub current_index: usize,
}

impl PlanNode {
    pub fn next_task(id: u64, tasks: Vec<Term>, operators: Vec<Term>, state: RuleSet) -> Self {
        Self { id, tasks, operators, state, continue_point: PlanContinuePoint::NextTask, candidates: Vec::new(), current_index: 0 }
    }

    pub fn choice_point(id: u64, tasks: Vec<Term>, operators: Vec<Term>, state: RuleSet, candidates: Vec<Candidate>, current_index: usize) -> Self {
        Self { id, tasks, operators, state, continue_point: PlanContinuePoint::NextCandidate, candidates, current_index }
    }

    pub fn is_exhausted(&self) -> bool {
        self.continue_point == PlanContinuePoint::NextCandidate && self.current_index >= self.candidates.len()
    }
}

/// Iterator-style search state, letting a host call
/// [`crate::plan::HtnPlanner::find_next_plan`] repeatedly to drive a
/// search one solution at a time, preserving progress between calls.
pub struct PlanState {
    pub(crate) stack: Vec<PlanNode>,
    pub(crate) diagnostics: PlanDiagnostics,
    pub(crate) config: Config,
    pub(crate) start: Instant,
    pub(crate) highest_memory_used: usize,
    pub(crate) next_node_id: u64,
}

impl PlanState {
    pub fn new(initial_state: RuleSet, initial_goals: Vec<Term>, config: Config) -> Self {
        let mut state = Self {
            stack: Vec::new(),
            diagnostics: PlanDiagnostics::default(),
            config,
            start: Instant::now(),
            highest_memory_used: 0,
            next_node_id: 0,
        };
        let id = state.next_node_id;
        state.next_node_id += 1;
        state.stack.push(PlanNode::next_task(id, initial_goals, Vec::new(), initial_state));
        state
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}
