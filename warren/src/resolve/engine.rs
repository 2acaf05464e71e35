//! The resolver's outer loop: a single `while let Some(node) = stack.pop()`
//! over an explicit [`Vec<ResolveNode>`], with no host recursion in the
//! main control flow (`spec.md` §9's "recursion-free resolver"). Cut is
//! implemented by rewriting a selected clause's `!` into a `!>(id)` /
//! `!<(id)` sentinel pair (`spec.md` §4.4) rather than a special stack
//! shape: `!>(id)` is a pure no-op (the fence bookkeeping it would record
//! is done eagerly at clause-selection time, since it is always the very
//! next goal processed — nothing else can run between selecting a clause
//! and reaching the `!>` it was given); `!<(id)` discards every choice
//! point created since, plus the clause-selection choice point itself.
//!
//! [`step`] advances a caller-held [`ResolveState`] by exactly one
//! solution (or until the stack is exhausted), the same shape
//! [`crate::plan::engine::step`] uses for the planner — [`run`] is a thin
//! loop over it that owns the state itself, for the common
//! `resolve_all`/`resolve_first` case where the host has no need to
//! resume a search later.
//!
//! One documented departure from a literal non-recursive state machine:
//! the "standalone sub-resolution" built-ins (`not/1`, `forall/2`,
//! `findall/3`, `first/2`, `distinct/2`, `sortBy/2`, `count/2`, `min/3`,
//! `max/3`, `sum/3`) each invoke [`run_standalone`], which calls back into
//! this same outer loop via an ordinary Rust function call. That is host
//! recursion, but it is bounded by how deeply such built-ins are nested in
//! the *source program*, not by the depth of the search itself — the part
//! of the engine whose depth is genuinely unbounded (clause backtracking)
//! stays on the explicit stack.

use std::collections::HashMap;

use crate::config::Config;
use crate::dispatch::Sink;
use crate::reports::{FailureDiagnostics, ResolveDiagnostics};
use crate::ruleset::RuleSet;
use crate::term::{Number, Term, TermFactory, TermKind};
use crate::types::err::{ContractViolation, ErrorKind, OutOfMemory};
use crate::unify::Unifier;

use super::builtins::{self, BuiltinContext, Outcome};
use super::node::{CutFence, ResolveContinuePoint, ResolveNode, ResolveState, ResolventGoal};
use super::CustomBuiltin;

/// Runs a conjunction of goals to completion (or to the first solution, if
/// `collect_all` is `false`), returning every solution found and the
/// diagnostics accumulated along the way. Builds and owns its own
/// [`ResolveState`]; a host that wants to resume the same search later
/// should drive [`step`] directly against a state it keeps.
pub(crate) fn run(
    factory: &TermFactory,
    ruleset: &mut RuleSet,
    goals: Vec<Term>,
    config: &Config,
    sink: Option<&Sink>,
    custom: &HashMap<(String, usize), CustomBuiltin>,
    collect_all: bool,
) -> Result<(Vec<Unifier>, ResolveDiagnostics), ErrorKind> {
    let mut state = ResolveState::new(goals)?;
    let mut solutions = Vec::new();
    loop {
        match step(factory, ruleset, config, sink, custom, &mut state)? {
            Some(unifier) => {
                solutions.push(unifier);
                if !collect_all {
                    return Ok((solutions, state.diagnostics));
                }
            }
            None => return Ok((solutions, state.diagnostics)),
        }
    }
}

/// Advances `state`'s search by exactly one solution, or `None` once the
/// stack is exhausted (or the memory budget is exceeded without
/// `fail_fast_as_exception`). The resolver's counterpart to
/// [`crate::plan::engine::step`].
pub(crate) fn step(
    factory: &TermFactory,
    ruleset: &mut RuleSet,
    config: &Config,
    sink: Option<&Sink>,
    custom: &HashMap<(String, usize), CustomBuiltin>,
    state: &mut ResolveState,
) -> Result<Option<Unifier>, ErrorKind> {
    while let Some(node) = state.stack.pop() {
        let budget = config.memory_budget.value();
        let estimate = factory.dynamic_size() + state.stack.len() * 256;
        if estimate > budget {
            factory.set_out_of_memory(true);
            state.diagnostics.out_of_memory = true;
            log::debug!(target: "warren::resolve", "out of memory: {estimate} bytes estimated against a {budget} byte budget");
            if config.fail_fast_as_exception {
                return Err(ErrorKind::OutOfMemory(OutOfMemory::ResolveStack {
                    estimated_bytes: estimate,
                    budget_bytes: budget,
                }));
            }
            return Ok(None);
        }

        if node.is_exhausted() {
            continue;
        }

        if node.continue_point == ResolveContinuePoint::NextRuleThatUnifies {
            take_choice(factory, node, &mut state.stack, &mut state.cut_fences, &mut state.uniquifier);
            continue;
        }

        if node.resolvent.is_empty() {
            log::trace!(target: "warren::resolve", "solution found with {} bindings", node.unifier.len());
            return Ok(Some(node.unifier));
        }

        let front = node.resolvent[0].clone();
        let resolved = node.unifier.apply(factory, &front.term);

        if bare_cut_name(&resolved).is_some() {
            state.stack.clear();
            push_continuation(&mut state.stack, &node, Unifier::new());
            continue;
        }

        if let Some(id) = sentinel_id(&resolved, "!<") {
            if let Some(fence) = state.cut_fences.remove(&id) {
                state.stack.truncate(fence.depth.min(state.stack.len()));
                if let Some(i) = fence.retry_index {
                    if i < state.stack.len() {
                        let exhausted = state.stack[i].rules_that_unify.len();
                        state.stack[i].current_rule_index = exhausted;
                    }
                }
            }
            push_continuation(&mut state.stack, &node, Unifier::new());
            continue;
        }

        if resolved.functor() == Some(",") && resolved.arity() == 2 {
            let origin = front.origin;
            let mut expanded = vec![
                ResolventGoal { term: resolved.args()[0].clone(), origin },
                ResolventGoal { term: resolved.args()[1].clone(), origin },
            ];
            expanded.extend(node.resolvent[1..].iter().cloned());
            state.stack.push(ResolveNode::deterministic(expanded, node.unifier.clone()));
            continue;
        }

        if let Some((found, suggested)) = crate::term::detect_operator_typo(&resolved) {
            return Err(ErrorKind::ContractViolation(ContractViolation::ArithmeticOperatorTypo {
                found: found.to_string(),
                suggested,
            }));
        }

        if resolved.is_arithmetic() {
            if let Some(result) = crate::term::eval(factory, &resolved) {
                if result == factory.true_() {
                    push_continuation(&mut state.stack, &node, Unifier::new());
                    continue;
                } else if result == factory.false_() {
                    record_failure(&mut state.diagnostics, &resolved, front.origin, &node.context, state.stack.len());
                    continue;
                }
            }
        }

        let arity = resolved.arity();
        let functor = resolved.functor().unwrap_or("").to_string();
        if let Some(handler) = builtins::lookup(&functor, arity) {
            let args: Vec<Term> = resolved.args().to_vec();
            let mut ctx = BuiltinContext { factory, ruleset: &mut *ruleset, sink, config, custom };
            match handler(&mut ctx, &args) {
                Outcome::Succeed(extra) => {
                    push_continuation(&mut state.stack, &node, extra);
                }
                Outcome::SucceedWithContext(extra, more_context) => {
                    push_continuation_with_context(&mut state.stack, &node, extra, more_context);
                }
                Outcome::Fail => {
                    record_failure(&mut state.diagnostics, &resolved, front.origin, &node.context, state.stack.len());
                }
                Outcome::Error(violation) => return Err(ErrorKind::ContractViolation(violation)),
            }
            continue;
        }
        if let Some(handler) = custom.get(&(functor.clone(), arity)) {
            let args: Vec<Term> = resolved.args().to_vec();
            match handler(factory, ruleset, &args) {
                Some(extra) => push_continuation(&mut state.stack, &node, extra),
                None => record_failure(&mut state.diagnostics, &resolved, front.origin, &node.context, state.stack.len()),
            }
            continue;
        }

        let candidates = candidate_rules(factory, ruleset, &resolved, &mut state.uniquifier);
        if candidates.is_empty() {
            record_failure(&mut state.diagnostics, &resolved, front.origin, &node.context, state.stack.len());
        } else {
            let context = node.context.clone();
            state.stack.push(ResolveNode::choice_point_with_context(node.resolvent, node.unifier, candidates, 0, context));
        }
    }

    Ok(None)
}

/// Runs `goal` to exhaustion in its own, independent top-level resolution,
/// for the standalone-sub-resolution built-ins (`spec.md` §4.4). Bindings
/// made here never leak back into the caller except through whatever the
/// built-in itself extracts from the returned solutions.
pub(crate) fn run_standalone(
    factory: &TermFactory,
    ruleset: &mut RuleSet,
    goal: Term,
    config: &Config,
    sink: Option<&Sink>,
    custom: &HashMap<(String, usize), CustomBuiltin>,
) -> Vec<Unifier> {
    run(factory, ruleset, vec![goal], config, sink, custom, true).map(|(solutions, _)| solutions).unwrap_or_default()
}

/// Pushes a single deterministic continuation: whatever remains of `node`'s
/// resolvent after its front goal, with `extra` folded onto its unifier.
fn push_continuation(stack: &mut Vec<ResolveNode>, node: &ResolveNode, extra: Unifier) {
    push_continuation_with_context(stack, node, extra, Vec::new());
}

/// As [`push_continuation`], additionally appending `more_context` to the
/// context carried forward for `failureContext/N` (`spec.md` §4.4).
fn push_continuation_with_context(
    stack: &mut Vec<ResolveNode>,
    node: &ResolveNode,
    extra: Unifier,
    more_context: Vec<Term>,
) {
    let mut unifier = node.unifier.clone();
    unifier.extend(extra);
    let rest = node.resolvent[1..].to_vec();
    let mut context = node.context.clone();
    context.extend(more_context);
    stack.push(ResolveNode::deterministic_with_context(rest, unifier, context));
}

/// Pops the current candidate off a choice-point node, requeues the
/// remaining candidates (unless this was the last one), and pushes the
/// child node built from the chosen clause's freshened tail.
fn take_choice(
    factory: &TermFactory,
    mut node: ResolveNode,
    stack: &mut Vec<ResolveNode>,
    cut_fences: &mut HashMap<u64, CutFence>,
    uniquifier: &mut u64,
) {
    let idx = node.current_rule_index;
    let (tail, candidate_unifier) = node.rules_that_unify[idx].clone();
    let origin = node.resolvent[0].origin;

    let retry_pushed = idx + 1 < node.rules_that_unify.len();
    if retry_pushed {
        let rest_candidates = std::mem::take(&mut node.rules_that_unify);
        let retry = ResolveNode::choice_point_with_context(
            node.resolvent.clone(),
            node.unifier.clone(),
            rest_candidates,
            idx + 1,
            node.context.clone(),
        );
        stack.push(retry);
    }

    let fence_depth = stack.len();
    *uniquifier += 1;
    let id = *uniquifier;
    let has_cut = tail.iter().any(|t| matches!(t.kind(), TermKind::Constant { name } if name.as_ref() == "!"));

    let mut new_resolvent: Vec<ResolventGoal> = Vec::with_capacity(tail.len() + node.resolvent.len());
    if has_cut {
        let id_term = factory.create_number(Number::Integer(id as i64));
        new_resolvent.push(ResolventGoal { term: factory.create_functor("!>", vec![id_term.clone()]), origin });
        for goal in tail {
            if matches!(goal.kind(), TermKind::Constant { name } if name.as_ref() == "!") {
                new_resolvent.push(ResolventGoal { term: factory.create_functor("!<", vec![id_term.clone()]), origin });
            } else {
                new_resolvent.push(ResolventGoal { term: goal, origin });
            }
        }
        let retry_index = if retry_pushed { Some(fence_depth - 1) } else { None };
        cut_fences.insert(id, CutFence { depth: fence_depth, retry_index });
    } else {
        new_resolvent.extend(tail.into_iter().map(|term| ResolventGoal { term, origin }));
    }
    new_resolvent.extend(node.resolvent[1..].iter().cloned());

    let mut child_unifier = node.unifier.clone();
    child_unifier.extend(candidate_unifier);
    stack.push(ResolveNode::deterministic_with_context(new_resolvent, child_unifier, node.context.clone()));
}

/// Finds every currently-visible rule whose head could unify with `goal`,
/// freshens each candidate's head and tail together (so a variable shared
/// between them is renamed consistently), and keeps the ones that actually
/// unify, paired with the unifier that does it.
fn candidate_rules(
    factory: &TermFactory,
    ruleset: &RuleSet,
    goal: &Term,
    uniquifier: &mut u64,
) -> Vec<(Vec<Term>, Unifier)> {
    let mut out = Vec::new();
    ruleset.all_rules_that_could_unify(goal, |_key, rule| {
        *uniquifier += 1;
        let prefix = format!("g{uniquifier}");
        let mut terms = Vec::with_capacity(1 + rule.tail().len());
        terms.push(rule.head().clone());
        terms.extend(rule.tail().iter().cloned());
        let fresh = crate::term::make_variables_unique_many(factory, &terms, &prefix);
        if let Some(unifier) = crate::unify::unify(factory, goal, &fresh[0]) {
            out.push((fresh[1..].to_vec(), unifier));
        }
    });
    out
}

fn bare_cut_name(term: &Term) -> Option<&str> {
    match term.kind() {
        TermKind::Constant { name } if name.as_ref() == "!" => Some(name.as_ref()),
        _ => None,
    }
}

/// If `term` is `functor(id)` where `functor` matches `expected`, the
/// integer value of `id`.
fn sentinel_id(term: &Term, expected: &str) -> Option<u64> {
    if term.functor() != Some(expected) || term.arity() != 1 {
        return None;
    }
    match term.args()[0].kind() {
        TermKind::Constant { name } => name.parse::<u64>().ok(),
        _ => None,
    }
}

/// Records a failed goal as the search's deepest-known failure, for
/// [`crate::reports::ResolveDiagnostics::deepest_failure`]. A strictly
/// deeper failure always replaces the previous one; among failures at the
/// same depth, one with a populated context (`spec.md` §4.4) is kept over
/// one without, since it is the more informative of the two.
fn record_failure(
    diagnostics: &mut ResolveDiagnostics,
    goal: &Term,
    origin: usize,
    context: &[Term],
    depth: usize,
) {
    log::trace!(target: "warren::resolve", "failed at `{goal}`");
    let replace = match &diagnostics.deepest_failure {
        None => true,
        Some(existing) => {
            depth > existing.depth || (depth == existing.depth && existing.context.is_empty() && !context.is_empty())
        }
    };
    if replace {
        diagnostics.deepest_failure = Some(FailureDiagnostics {
            deepest_goal: Some(goal.to_string()),
            depth,
            original_goal_index: Some(origin),
            context: context.to_vec(),
        });
    }
}
