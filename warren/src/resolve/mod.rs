/*!
A non-recursive, depth-first SLD resolver with backtracking, cut,
arithmetic, and a table-driven family of built-in predicates.

[`GoalResolver`] is the host-facing entry point: [`GoalResolver::resolve_all`]
drives a conjunction of goals to every solution, [`GoalResolver::resolve_first`]
to the first. Both delegate to [`engine::run`], a single outer loop over an
explicit `Vec<ResolveNode>` — see the [`engine`] module docs for the cut
implementation and the one documented departure from pure non-recursion
(standalone sub-resolution built-ins like `findall/3`).
*/

pub(crate) mod builtins;
pub(crate) mod engine;
mod node;

pub use node::{ResolveContinuePoint, ResolveNode, ResolveState, ResolventGoal};

use std::collections::HashMap;
use std::rc::Rc;

use crate::config::Config;
use crate::dispatch::Sink;
use crate::reports::ResolveDiagnostics;
use crate::ruleset::RuleSet;
use crate::term::{Term, TermFactory};
use crate::types::err::{ErrorKind, ResolutionFailure};
use crate::unify::Unifier;

/// A host-registered predicate extending the built-in table, as installed
/// by [`GoalResolver::add_custom_rule`]. Given the already-dereferenced
/// argument terms, it returns the unifier a successful call produces, or
/// `None` on failure.
pub type CustomBuiltin = Rc<dyn Fn(&TermFactory, &mut RuleSet, &[Term]) -> Option<Unifier>>;

/// The SLD resolver. Stateless beyond its dispatch sink and any
/// host-registered custom predicates — all per-query state lives in the
/// [`engine`]'s own stack, so one `GoalResolver` can serve any number of
/// concurrent queries against different rulesets.
pub struct GoalResolver {
    custom: HashMap<(String, usize), CustomBuiltin>,
    sink: Option<Sink>,
}

impl Default for GoalResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl GoalResolver {
    pub fn new() -> Self {
        Self { custom: HashMap::new(), sink: None }
    }

    pub fn with_dispatch(sink: Sink) -> Self {
        Self { custom: HashMap::new(), sink: Some(sink) }
    }

    pub fn set_dispatch(&mut self, sink: Sink) {
        self.sink = Some(sink);
    }

    /// Registers a host-implemented predicate under `name/arity`. Shadows
    /// ruleset rules with the same name and arity but not the built-in
    /// table — a custom rule cannot redefine `=`, `is`, `!`, and so on.
    pub fn add_custom_rule(&mut self, name: &str, arity: usize, handler: CustomBuiltin) {
        self.custom.insert((name.to_string(), arity), handler);
    }

    pub fn unify(&self, factory: &TermFactory, a: &Term, b: &Term) -> Option<Unifier> {
        crate::unify::unify(factory, a, b)
    }

    pub fn substitute_unifiers(&self, factory: &TermFactory, source: &Unifier, dest: &Unifier) -> Unifier {
        crate::unify::substitute_unifiers(factory, source, dest)
    }

    /// Resolves `goals` (a conjunction) against `ruleset`, returning every
    /// solution found.
    ///
    /// Returns `Err` immediately for a [`crate::types::err::ContractViolation`]
    /// (e.g. a bare variable given directly as a goal, or a built-in called
    /// with the wrong shape of argument) regardless of
    /// [`Config::fail_fast_as_exception`]. An empty solution list is
    /// returned as `Ok` unless `fail_fast_as_exception` is set, in which
    /// case it is returned as [`ErrorKind::ResolutionFailure`] instead.
    pub fn resolve_all(
        &self,
        factory: &TermFactory,
        ruleset: &mut RuleSet,
        goals: Vec<Term>,
        config: &Config,
    ) -> Result<(Vec<Unifier>, ResolveDiagnostics), ErrorKind> {
        let (solutions, diagnostics) =
            engine::run(factory, ruleset, goals, config, self.sink.as_ref(), &self.custom, true)?;
        self.apply_fail_fast(solutions, diagnostics, config)
    }

    /// As [`GoalResolver::resolve_all`], but stops at the first solution.
    pub fn resolve_first(
        &self,
        factory: &TermFactory,
        ruleset: &mut RuleSet,
        goals: Vec<Term>,
        config: &Config,
    ) -> Result<(Vec<Unifier>, ResolveDiagnostics), ErrorKind> {
        let (solutions, diagnostics) =
            engine::run(factory, ruleset, goals, config, self.sink.as_ref(), &self.custom, false)?;
        self.apply_fail_fast(solutions, diagnostics, config)
    }

    /// Iterator-style: advances a caller-held [`ResolveState`] by exactly
    /// one solution, preserving backtracking progress between calls — the
    /// resolver's counterpart to [`crate::plan::HtnPlanner::find_next_plan`].
    /// Unlike the planner's version, `ruleset` and `config` are taken here
    /// rather than held by the state, since a [`RuleSet`] is ordinary owned
    /// state the host already holds mutably elsewhere and a query's budget
    /// may be adjusted between calls.
    pub fn resolve_next(
        &self,
        factory: &TermFactory,
        ruleset: &mut RuleSet,
        config: &Config,
        state: &mut ResolveState,
    ) -> Result<Option<Unifier>, ErrorKind> {
        engine::step(factory, ruleset, config, self.sink.as_ref(), &self.custom, state)
    }

    fn apply_fail_fast(
        &self,
        solutions: Vec<Unifier>,
        diagnostics: ResolveDiagnostics,
        config: &Config,
    ) -> Result<(Vec<Unifier>, ResolveDiagnostics), ErrorKind> {
        if solutions.is_empty() && config.fail_fast_as_exception {
            let deepest_goal = diagnostics.deepest_failure.as_ref().and_then(|f| f.deepest_goal.clone());
            return Err(ErrorKind::ResolutionFailure(ResolutionFailure::NoSolutions { deepest_goal }));
        }
        Ok((solutions, diagnostics))
    }
}
