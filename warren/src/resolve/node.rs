//! [`ResolveNode`]: one frame of the resolver's explicit stack, and
//! [`ResolveState`], the iterator-style search state a host holds across
//! repeated [`crate::resolve::GoalResolver::resolve_next`] calls —
//! mirroring [`crate::plan::PlanState`]'s role for the planner's own
//! `find_next_plan` (`spec.md` §3's `ResolveState`, §6's
//! `resolve_next(state)`).

use std::collections::HashMap;

use crate::reports::ResolveDiagnostics;
use crate::term::Term;
use crate::types::err::{ContractViolation, ErrorKind};
use crate::unify::Unifier;

/// A single goal sitting in a node's resolvent, tagged with the index of
/// the original top-level goal it ultimately descends from. Rule-body
/// goals inherit their parent's tag, so a failure deep inside an expanded
/// rule can still be attributed to the top-level goal that triggered it
/// (`spec.md` §4.4 "Failure diagnostics": "the matching original-goal
/// index").
#[derive(Clone)]
pub struct ResolventGoal {
    pub term: Term,
    pub origin: usize,
}

/// Why a [`ResolveNode`] is on the stack — kept primarily for diagnostics
/// and tracing; the engine's dispatch mostly switches on the node's front
/// goal rather than this tag, since this engine folds the "next goal is a
/// deterministic built-in" and "next goal has N candidate rules" cases
/// into one push-at-most-one-choice-point-plus-one-child shape rather
/// than threading a finer-grained continuation tag through every step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveContinuePoint {
    /// A deterministic continuation: the previous goal succeeded exactly
    /// once and this node is simply "what's left to prove".
    NextGoal,
    /// A choice point: `rules_that_unify` holds every remaining candidate
    /// clause, `current_rule_index` is the next one to try.
    NextRuleThatUnifies,
    /// A cut-close sentinel (`!<(id)`) is the front goal.
    Cut,
    /// The whole resolvent was discharged; this node represents a found
    /// solution.
    Return,
}

/// One frame of the resolver's explicit, non-recursive stack. Popping a
/// node and dispatching on its front goal either discards it (failure,
/// implicit backtrack), pushes one child (deterministic success), or
/// pushes a retry frame followed by a child (a choice point with
/// remaining alternative clauses) — see [`crate::resolve::engine`].
pub struct ResolveNode {
    pub resolvent: Vec<ResolventGoal>,
    pub unifier: Unifier,
    pub continue_point: ResolveContinuePoint,
    /// Candidate `(freshened tail, unifier against the front goal)` pairs,
    /// precomputed by [`crate::resolve::engine::candidate_rules`] when this
    /// node was created as a choice point. The matching rule's head is not
    /// kept — it has already done its job by producing the unifier.
    pub rules_that_unify: Vec<(Vec<Term>, Unifier)>,
    pub current_rule_index: usize,
    /// Context terms set by `failureContext/N` along this branch of the
    /// proof so far, in the order they were set (`spec.md` §4.4). Carried
    /// forward into every continuation so a failure anywhere down this
    /// branch can report "the most recent context set before this point".
    pub context: Vec<Term>,
}

impl ResolveNode {
    pub fn deterministic(resolvent: Vec<ResolventGoal>, unifier: Unifier) -> Self {
        Self::deterministic_with_context(resolvent, unifier, Vec::new())
    }

    pub fn deterministic_with_context(resolvent: Vec<ResolventGoal>, unifier: Unifier, context: Vec<Term>) -> Self {
        Self {
            resolvent,
            unifier,
            continue_point: ResolveContinuePoint::NextGoal,
            rules_that_unify: Vec::new(),
            current_rule_index: 0,
            context,
        }
    }

    pub fn choice_point(
        resolvent: Vec<ResolventGoal>,
        unifier: Unifier,
        rules_that_unify: Vec<(Vec<Term>, Unifier)>,
        current_rule_index: usize,
    ) -> Self {
        Self::choice_point_with_context(resolvent, unifier, rules_that_unify, current_rule_index, Vec::new())
    }

    pub fn choice_point_with_context(
        resolvent: Vec<ResolventGoal>,
        unifier: Unifier,
        rules_that_unify: Vec<(Vec<Term>, Unifier)>,
        current_rule_index: usize,
        context: Vec<Term>,
    ) -> Self {
        Self {
            resolvent,
            unifier,
            continue_point: ResolveContinuePoint::NextRuleThatUnifies,
            rules_that_unify,
            current_rule_index,
            context,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.continue_point == ResolveContinuePoint::NextRuleThatUnifies
            && self.current_rule_index >= self.rules_that_unify.len()
    }
}

/// Bookkeeping for one currently-open cut fence, keyed by the `!>(id)`/
/// `!<(id)` sentinel pair's `id` (`spec.md` §4.4). See
/// [`crate::resolve::engine`]'s module docs for how cut is implemented
/// without host recursion or mutable references to ancestor nodes.
pub(crate) struct CutFence {
    /// The stack depth to truncate back to: everything pushed after this
    /// point was created while proving the cut clause's body and is
    /// discarded when the cut fires.
    pub depth: usize,
    /// The index, within the truncated stack, of the choice point that
    /// selected this clause — neutralised so no other clause for this
    /// call is ever tried.
    pub retry_index: Option<usize>,
}

/// Iterator-style search state, letting a host call
/// [`crate::resolve::GoalResolver::resolve_next`] repeatedly to drive a
/// resolution one solution at a time, preserving backtracking progress
/// between calls — the resolver's counterpart to
/// [`crate::plan::PlanState`].
pub struct ResolveState {
    pub(crate) stack: Vec<ResolveNode>,
    pub(crate) diagnostics: ResolveDiagnostics,
    pub(crate) cut_fences: HashMap<u64, CutFence>,
    pub(crate) uniquifier: u64,
}

impl ResolveState {
    /// Builds a fresh search state over `goals` (a conjunction to prove).
    /// Fails fast if any top-level goal is a bare, unbound variable
    /// (`spec.md` §4.4) — the same check [`crate::resolve::engine::run`]
    /// performs before it builds its own initial state.
    pub fn new(goals: Vec<Term>) -> Result<Self, ErrorKind> {
        for goal in &goals {
            if matches!(goal.kind(), crate::term::TermKind::Variable { .. }) {
                return Err(ErrorKind::ContractViolation(ContractViolation::BadBuiltinArguments {
                    predicate: "resolve_all".to_string(),
                    detail: format!("goal `{goal}` is an unbound variable"),
                }));
            }
        }
        let initial_resolvent: Vec<ResolventGoal> =
            goals.into_iter().enumerate().map(|(origin, term)| ResolventGoal { term, origin }).collect();
        Ok(Self {
            stack: vec![ResolveNode::deterministic(initial_resolvent, Unifier::new())],
            diagnostics: ResolveDiagnostics::default(),
            cut_fences: HashMap::new(),
            uniquifier: 0,
        })
    }

    /// The diagnostics accumulated by the search so far: the deepest
    /// failure seen, and whether the memory budget was ever exceeded.
    pub fn diagnostics(&self) -> &ResolveDiagnostics {
        &self.diagnostics
    }
}
