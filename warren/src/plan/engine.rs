//! The planner's outer loop: an explicit `Vec<PlanNode>` stack, the same
//! push-at-most-one-choice-point-plus-one-child shape
//! [`crate::resolve::engine`] uses for the resolver (`spec.md` §4.5's
//! "iterative planner... explicit stack of plan nodes"), with named
//! internal procedures for each step of the algorithm
//! (`find_all_methods_that_unify`, `handle_any_of`, `handle_all_of`,
//! `check_for_operator`, `check_for_special_task`) mirroring the
//! original's `FindAllMethodsThatUnify`/`HandleAnyOf`/`HandleAllOf`/
//! `CheckForOperator`/`CheckForSpecialTask` (`spec.md` §4.5).
//!
//! One documented simplification from the original: `Else`/default
//! fallback is decided locally, at the point a task is classified,
//! rather than after the full backtracking search over every sibling
//! method has been exhausted. A method contributes zero candidates when
//! its head doesn't unify or its condition has no solutions (`Normal`)
//! or when every alternative of an `AnyOf`/`AllOf` decomposition fails;
//! `Else`/default methods are only considered when the primary group
//! contributed nothing at all. This is a shallower approximation of
//! "every non-else method failed to produce a plan" (it does not await
//! the outcome of a deeper backtracking search before deciding to fall
//! through), traded for staying within one explicit stack rather than
//! threading a deferred, search-outcome-contingent alternative through
//! it.
//!
//! `AnyOf`/`AllOf` decomposition is the one place this engine recurses
//! into itself (via [`decompose_bounded`]) rather than staying on the
//! explicit stack, for the same reason [`crate::resolve::engine::run_standalone`]
//! does: each alternative's sub-plan search is independent of the
//! caller's own backtracking and is bounded by source-domain nesting
//! depth, not by the depth of the search itself.

use std::cell::Cell;
use std::sync::atomic::Ordering;

use crate::config::Config;
use crate::reports::{FailureDiagnostics, PlanDiagnostics, PlanSolution};
use crate::ruleset::RuleSet;
use crate::term::{Term, TermFactory, TermKind};
use crate::types::err::{ErrorKind, OutOfMemory};
use crate::unify::Unifier;

use super::method::{Method, MethodType};
use super::node::{Candidate, PlanContinuePoint, PlanNode, PlanState};
use super::HtnPlanner;

pub(crate) fn run(
    planner: &HtnPlanner,
    factory: &TermFactory,
    initial_state: &RuleSet,
    initial_goals: Vec<Term>,
    config: &Config,
    collect_all: bool,
) -> Result<(Vec<PlanSolution>, PlanDiagnostics), ErrorKind> {
    let mut state = PlanState::new(initial_state.create_copy(), initial_goals, config.clone());
    let mut solutions = Vec::new();
    loop {
        match step(planner, factory, &mut state)? {
            Some(solution) => {
                solutions.push(solution);
                if !collect_all {
                    return Ok((solutions, state.diagnostics));
                }
            }
            None => return Ok((solutions, state.diagnostics)),
        }
    }
}

/// Advances `state`'s search by exactly one solution, or `None` once the
/// stack is exhausted.
pub(crate) fn step(
    planner: &HtnPlanner,
    factory: &TermFactory,
    state: &mut PlanState,
) -> Result<Option<PlanSolution>, ErrorKind> {
    while let Some(node) = state.stack.pop() {
        if planner.abort_handle().load(Ordering::Relaxed) {
            state.diagnostics.aborted = true;
            return Ok(None);
        }

        let budget = state.config.memory_budget.value();
        let estimate = factory.dynamic_size() + state.stack.len() * 256;
        state.highest_memory_used = state.highest_memory_used.max(estimate);
        if estimate > budget {
            factory.set_out_of_memory(true);
            state.diagnostics.out_of_memory = true;
            log::debug!(target: "warren::plan", "out of memory: {estimate} bytes estimated against a {budget} byte budget");
            if state.config.fail_fast_as_exception {
                return Err(ErrorKind::OutOfMemory(OutOfMemory::PlanStack { estimated_bytes: estimate, budget_bytes: budget }));
            }
            return Ok(None);
        }

        if node.is_exhausted() {
            continue;
        }

        if node.continue_point == PlanContinuePoint::NextCandidate {
            take_choice(state, node);
            continue;
        }

        if node.tasks.is_empty() {
            log::trace!(target: "warren::plan", "plan found with {} operators", node.operators.len());
            return Ok(Some(PlanSolution {
                operators: node.operators,
                final_state: node.state,
                elapsed_seconds: state.elapsed_seconds(),
                highest_memory_used: state.highest_memory_used,
            }));
        }

        let task = node.tasks[0].clone();
        let config = state.config.clone();
        let candidates = classify_task(planner, factory, &node.state, &task, &config);
        match candidates {
            Some(candidates) if !candidates.is_empty() => {
                let id = state.next_node_id;
                state.next_node_id += 1;
                state.stack.push(PlanNode::choice_point(id, node.tasks, node.operators, node.state, candidates, 0));
            }
            _ => {
                record_failure(&mut state.diagnostics, &task, state.stack.len());
            }
        }
    }
    Ok(None)
}

/// Pops the current candidate off a choice-point node, requeues the
/// remaining candidates (unless this was the last one), and pushes the
/// child node built by applying the chosen candidate to the front task.
fn take_choice(state: &mut PlanState, mut node: PlanNode) {
    let idx = node.current_index;
    let candidate = node.candidates[idx].clone();

    if idx + 1 < node.candidates.len() {
        let id = state.next_node_id;
        state.next_node_id += 1;
        let rest = std::mem::take(&mut node.candidates);
        let retry = PlanNode::choice_point(id, node.tasks.clone(), node.operators.clone(), node.state.create_copy(), rest, idx + 1);
        state.stack.push(retry);
    }

    let rest_tasks = node.tasks[1..].to_vec();
    let id = state.next_node_id;
    state.next_node_id += 1;
    let child = match candidate {
        Candidate::Operator { emitted, state: next_state } => {
            let mut operators = node.operators.clone();
            if let Some(term) = emitted {
                operators.push(term);
            }
            PlanNode::next_task(id, rest_tasks, operators, next_state)
        }
        Candidate::Tasks(mut sub_tasks) => {
            sub_tasks.extend(rest_tasks);
            PlanNode::next_task(id, sub_tasks, node.operators.clone(), node.state.create_copy())
        }
    };
    state.stack.push(child);
}

/// Classifies `task` per `spec.md` §4.5 step 2: an operator application,
/// the special `try(...)` task, or a method (or bare condition-goal)
/// expansion. Returns `None` if `task` provably cannot be decomposed at
/// all (no operator, no method unifies, and it is not itself resolvable
/// as a goal).
fn classify_task(
    planner: &HtnPlanner,
    factory: &TermFactory,
    world: &RuleSet,
    task: &Term,
    config: &Config,
) -> Option<Vec<Candidate>> {
    let operator_candidates = check_for_operator(factory, world, planner, task);
    if !operator_candidates.is_empty() {
        return Some(operator_candidates);
    }

    if let Some(candidates) = check_for_special_task(planner, factory, world, task, config) {
        return Some(candidates);
    }

    let method_candidates = find_all_methods_that_unify(factory, planner, task);
    if !method_candidates.is_empty() {
        let candidates = expand_methods(planner, factory, world, method_candidates, config);
        if !candidates.is_empty() {
            return Some(candidates);
        }
        return None;
    }

    // Not a declared operator or method: fall back to resolving it as an
    // ordinary goal (an "axiom") against the current world state.
    let mut goal_state = world.create_copy();
    let (solutions, _) = planner.goal_resolver().resolve_all(factory, &mut goal_state, vec![task.clone()], config).ok()?;
    if solutions.is_empty() {
        return None;
    }
    Some(solutions.into_iter().map(|_| Candidate::Tasks(Vec::new())).collect())
}

/// `CheckForOperator`: every currently-declared operator whose head
/// unifies with `task`, each an independent candidate application.
fn check_for_operator(factory: &TermFactory, world: &RuleSet, planner: &HtnPlanner, task: &Term) -> Vec<Candidate> {
    let mut out = Vec::new();
    for op in planner.all_operators() {
        if !shapes_compatible(task, &op.head) {
            continue;
        }
        let mut terms = Vec::with_capacity(1 + op.add_list.len() + op.delete_list.len());
        terms.push(op.head.clone());
        terms.extend(op.add_list.iter().cloned());
        terms.extend(op.delete_list.iter().cloned());
        let fresh = crate::term::make_variables_unique_many(factory, &terms, "p");
        let Some(unifier) = crate::unify::unify(factory, task, &fresh[0]) else { continue };
        let add_list: Vec<Term> = fresh[1..1 + op.add_list.len()].iter().map(|t| unifier.apply(factory, t)).collect();
        let delete_list: Vec<Term> =
            fresh[1 + op.add_list.len()..].iter().map(|t| unifier.apply(factory, t)).collect();
        let Ok(next_state) = world.create_next_state(&delete_list, &add_list) else { continue };
        let emitted = if op.hidden { None } else { Some(unifier.apply(factory, task)) };
        out.push(Candidate::Operator { emitted, state: next_state });
    }
    out
}

/// `CheckForSpecialTask`: the `try(Tasks)` wrapper, where `Tasks` is a
/// list term. Backtracking-transparent: if the inner task list cannot be
/// planned at all, `try` still succeeds with no state change, rather
/// than failing this branch.
fn check_for_special_task(
    planner: &HtnPlanner,
    factory: &TermFactory,
    world: &RuleSet,
    task: &Term,
    config: &Config,
) -> Option<Vec<Candidate>> {
    if task.functor() != Some("try") || task.arity() != 1 {
        return None;
    }
    let inner_tasks = decode_list(&task.args()[0]);
    let mut solutions = decompose_bounded(planner, factory, world, inner_tasks, config);
    if solutions.is_empty() {
        return Some(vec![Candidate::Tasks(Vec::new())]);
    }
    Some(
        solutions
            .drain(..)
            .map(|(operators, _state)| Candidate::Tasks(operators.into_iter().map(operator_as_task).collect()))
            .collect(),
    )
}

/// One method whose head unified with the task under consideration: its
/// condition and task list, already freshened (together with the head,
/// by one shared [`crate::term::make_variables_unique_many`] call so a
/// variable shared across head/condition/tasks renames consistently) and
/// substituted by the unifier that matched the head.
struct MethodMatch {
    method_type: MethodType,
    is_default: bool,
    condition: Vec<Term>,
    tasks: Vec<Term>,
}

/// `FindAllMethodsThatUnify`: every declared method whose head unifies
/// with `task`, in declaration order, with its condition and task list
/// already specialised to this particular match.
fn find_all_methods_that_unify(factory: &TermFactory, planner: &HtnPlanner, task: &Term) -> Vec<MethodMatch> {
    let mut out = Vec::new();
    for method in planner.all_methods() {
        if !shapes_compatible(task, &method.head) {
            continue;
        }
        let mut terms = Vec::with_capacity(1 + method.condition.len() + method.tasks.len());
        terms.push(method.head.clone());
        terms.extend(method.condition.iter().cloned());
        terms.extend(method.tasks.iter().cloned());
        let fresh = crate::term::make_variables_unique_many(factory, &terms, "m");
        let Some(unifier) = crate::unify::unify(factory, task, &fresh[0]) else { continue };
        let condition = fresh[1..1 + method.condition.len()].iter().map(|t| unifier.apply(factory, t)).collect();
        let tasks = fresh[1 + method.condition.len()..].iter().map(|t| unifier.apply(factory, t)).collect();
        out.push(MethodMatch { method_type: method.method_type, is_default: method.is_default, condition, tasks });
    }
    out
}

/// Expands the methods [`find_all_methods_that_unify`] found into
/// candidates, grouped by `spec.md` §4.5 step 4's method-type rules.
/// `Else`/default methods are considered only if the primary group (every
/// declared `Normal`/`AnyOf`/`AllOf`, non-default method) contributes
/// nothing — see this module's doc comment for how that differs from the
/// original's fully backtracking-aware fallback.
fn expand_methods(
    planner: &HtnPlanner,
    factory: &TermFactory,
    world: &RuleSet,
    matches: Vec<MethodMatch>,
    config: &Config,
) -> Vec<Candidate> {
    let primary: Vec<&MethodMatch> =
        matches.iter().filter(|m| m.method_type != MethodType::Else && !m.is_default).collect();
    let mut out = expand_method_group(planner, factory, world, &primary, config);
    if !out.is_empty() {
        return out;
    }

    let elses: Vec<&MethodMatch> = matches.iter().filter(|m| m.method_type == MethodType::Else).collect();
    out = expand_method_group(planner, factory, world, &elses, config);
    if !out.is_empty() {
        return out;
    }

    let defaults: Vec<&MethodMatch> = matches.iter().filter(|m| m.is_default).collect();
    expand_method_group(planner, factory, world, &defaults, config)
}

fn expand_method_group(
    planner: &HtnPlanner,
    factory: &TermFactory,
    world: &RuleSet,
    group: &[&MethodMatch],
    config: &Config,
) -> Vec<Candidate> {
    let mut out = Vec::new();
    for m in group {
        let mut condition_state = world.create_copy();
        let Ok((condition_solutions, _)) =
            planner.goal_resolver().resolve_all(factory, &mut condition_state, m.condition.clone(), config)
        else {
            continue;
        };
        if condition_solutions.is_empty() {
            continue;
        }

        match m.method_type {
            MethodType::Normal | MethodType::Else => {
                for solution in &condition_solutions {
                    let substituted: Vec<Term> = m.tasks.iter().map(|t| solution.apply(factory, t)).collect();
                    out.push(Candidate::Tasks(substituted));
                }
            }
            MethodType::AnyOf => {
                if let Some(operators) = handle_any_of(planner, factory, world, &m.tasks, &condition_solutions, config) {
                    out.push(Candidate::Tasks(operators.into_iter().map(operator_as_task).collect()));
                }
            }
            MethodType::AllOf => {
                if let Some(operators) = handle_all_of(planner, factory, world, &m.tasks, &condition_solutions, config) {
                    out.push(Candidate::Tasks(operators.into_iter().map(operator_as_task).collect()));
                }
            }
        }
    }
    out
}

/// `HandleAnyOf`: plans each condition solution's substituted task list
/// independently; an alternative that cannot be planned is simply
/// dropped rather than failing the whole method. Fails only if none of
/// them can be planned at all.
fn handle_any_of(
    planner: &HtnPlanner,
    factory: &TermFactory,
    world: &RuleSet,
    tasks: &[Term],
    condition_solutions: &[Unifier],
    config: &Config,
) -> Option<Vec<Term>> {
    let mut combined = Vec::new();
    let mut any_succeeded = false;
    for solution in condition_solutions {
        let substituted: Vec<Term> = tasks.iter().map(|t| solution.apply(factory, t)).collect();
        if let Some((operators, _)) = decompose_one(planner, factory, world, substituted, config) {
            combined.extend(operators);
            any_succeeded = true;
        }
    }
    any_succeeded.then_some(combined)
}

/// `HandleAllOf`: as [`handle_any_of`], but every condition solution's
/// task list must plan successfully; any failure fails the whole method.
fn handle_all_of(
    planner: &HtnPlanner,
    factory: &TermFactory,
    world: &RuleSet,
    tasks: &[Term],
    condition_solutions: &[Unifier],
    config: &Config,
) -> Option<Vec<Term>> {
    let mut combined = Vec::new();
    for solution in condition_solutions {
        let substituted: Vec<Term> = tasks.iter().map(|t| solution.apply(factory, t)).collect();
        let (operators, _) = decompose_one(planner, factory, world, substituted, config)?;
        combined.extend(operators);
    }
    Some(combined)
}

thread_local! {
    /// How many nested `AnyOf`/`AllOf`/`try` sub-searches are currently on
    /// the Rust call stack. The only recursion this engine performs
    /// ([`decompose_bounded`]/[`decompose_one`] calling back into [`run`]);
    /// guarded by [`Config::htn_depth_guard`] so a domain whose methods
    /// nest `AnyOf`/`AllOf` without a base case fails cleanly instead of
    /// overflowing the stack.
    static NESTING_DEPTH: Cell<usize> = Cell::new(0);
}

/// Runs `body` with the nesting-depth counter incremented, refusing to run
/// it at all once `config.htn_depth_guard` is reached.
fn with_depth_guard<T>(config: &Config, empty: T, body: impl FnOnce() -> T) -> T {
    let guard = config.htn_depth_guard.value();
    let depth = NESTING_DEPTH.with(Cell::get);
    if depth >= guard {
        log::debug!(target: "warren::plan", "htn_depth_guard ({guard}) reached; abandoning branch");
        return empty;
    }
    NESTING_DEPTH.with(|d| d.set(depth + 1));
    let result = body();
    NESTING_DEPTH.with(|d| d.set(depth));
    result
}

/// Plans `tasks` to exhaustion in an independent, nested search, for the
/// `AnyOf`/`AllOf`/`try` expansions. Bounded by source-domain nesting
/// depth, not by the depth of the enclosing search (see this module's
/// doc comment).
fn decompose_bounded(
    planner: &HtnPlanner,
    factory: &TermFactory,
    world: &RuleSet,
    tasks: Vec<Term>,
    config: &Config,
) -> Vec<(Vec<Term>, RuleSet)> {
    with_depth_guard(config, Vec::new(), || {
        run(planner, factory, world, tasks, config, true)
            .map(|(solutions, _)| solutions.into_iter().map(|s| (s.operators, s.final_state)).collect())
            .unwrap_or_default()
    })
}

/// As [`decompose_bounded`], but only the first solution.
fn decompose_one(
    planner: &HtnPlanner,
    factory: &TermFactory,
    world: &RuleSet,
    tasks: Vec<Term>,
    config: &Config,
) -> Option<(Vec<Term>, RuleSet)> {
    with_depth_guard(config, None, || {
        run(planner, factory, world, tasks, config, false).ok()?.0.into_iter().next().map(|s| (s.operators, s.final_state))
    })
}

/// A solved `try`/`AnyOf`/`AllOf` sub-plan's operators are already fully
/// primitive; re-queuing them as "tasks" on the parent node lets
/// `check_for_operator` re-match and re-emit them deterministically
/// (each operator term unifies with itself) without a separate "splice
/// pre-resolved operators" code path.
fn operator_as_task(term: Term) -> Term {
    term
}

fn shapes_compatible(a: &Term, b: &Term) -> bool {
    match (a.kind(), b.kind()) {
        (TermKind::Variable { .. }, _) | (_, TermKind::Variable { .. }) => true,
        (TermKind::Constant { name: n1 }, TermKind::Constant { name: n2 }) => n1 == n2,
        (TermKind::Constant { .. }, TermKind::Compound { .. }) => false,
        (TermKind::Compound { .. }, TermKind::Constant { .. }) => false,
        (TermKind::Compound { functor: f1, args: a1 }, TermKind::Compound { functor: f2, args: a2 }) => {
            f1 == f2 && a1.len() == a2.len()
        }
    }
}

/// Decodes a `.(Head, Tail)`/`[]` list term into a `Vec<Term>`, for
/// `try(Tasks)`'s list-of-tasks argument.
fn decode_list(term: &Term) -> Vec<Term> {
    let mut out = Vec::new();
    let mut current = term.clone();
    loop {
        match current.kind() {
            TermKind::Compound { functor, args } if functor.as_ref() == "." && args.len() == 2 => {
                out.push(args[0].clone());
                current = args[1].clone();
            }
            _ => break,
        }
    }
    out
}

fn record_failure(diagnostics: &mut PlanDiagnostics, task: &Term, depth: usize) {
    log::trace!(target: "warren::plan", "failed to decompose `{task}`");
    let deeper = diagnostics.deepest_failure.as_ref().map(|f| depth > f.depth).unwrap_or(true);
    if deeper {
        diagnostics.deepest_failure = Some(FailureDiagnostics {
            deepest_goal: Some(task.to_string()),
            depth,
            original_goal_index: None,
            context: Vec::new(),
        });
    }
}
