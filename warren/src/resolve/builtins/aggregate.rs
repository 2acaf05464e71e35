//! Aggregate built-ins: `findall/3`, `first/2`, `distinct/2`, `sortBy/2`,
//! `count/2`, `min/3`, `max/3`, `sum/3`. Each runs a standalone
//! sub-resolution of a `Goal` argument (`spec.md` §4.4) and folds the
//! resulting solutions down to a single value, which is why they all,
//! unlike ordinary backtracking goals, succeed at most once.

use crate::term::{Number, Term};
use crate::unify::Unifier;

use super::{BuiltinContext, Outcome};

fn solve(ctx: &mut BuiltinContext, goal: &Term) -> Vec<Unifier> {
    crate::resolve::engine::run_standalone(ctx.factory, ctx.ruleset, goal.clone(), ctx.config, ctx.sink, ctx.custom)
}

/// `findall(Template, Goal, Result)`: `Result` is the list of `Template`
/// with each solution of `Goal`'s unifier applied, in solution order,
/// including duplicates. Always succeeds, with `[]` if `Goal` has no
/// solutions.
pub(super) fn findall_builtin(ctx: &mut BuiltinContext, args: &[Term]) -> Outcome {
    let solutions = solve(ctx, &args[1]);
    let instances: Vec<Term> = solutions.iter().map(|u| u.apply(ctx.factory, &args[0])).collect();
    let list = ctx.factory.create_list(instances);
    super::core::unify_builtin(ctx, &[args[2].clone(), list])
}

/// `first(Goal, Result)`: succeeds at most once, with `Result` unified
/// with `Goal` itself under its first solution's bindings — `once/1`'s
/// Prolog semantics, renamed to pair with `distinct`/`sortBy`/`count`.
pub(super) fn first_builtin(ctx: &mut BuiltinContext, args: &[Term]) -> Outcome {
    let solutions = solve(ctx, &args[0]);
    match solutions.into_iter().next() {
        Some(unifier) => {
            let instance = unifier.apply(ctx.factory, &args[0]);
            super::core::unify_builtin(ctx, &[args[1].clone(), instance])
        }
        None => Outcome::Fail,
    }
}

/// `distinct(Goal, Result)`: as `findall`, but with structurally duplicate
/// instances removed, keeping the first occurrence's position.
pub(super) fn distinct_builtin(ctx: &mut BuiltinContext, args: &[Term]) -> Outcome {
    let solutions = solve(ctx, &args[0]);
    let mut instances: Vec<Term> = Vec::new();
    for unifier in &solutions {
        let instance = unifier.apply(ctx.factory, &args[0]);
        if !instances.contains(&instance) {
            instances.push(instance);
        }
    }
    let list = ctx.factory.create_list(instances);
    super::core::unify_builtin(ctx, &[args[1].clone(), list])
}

/// `sortBy(Goal, Result)`: as `findall`, with the instances sorted by
/// [`crate::term::compare`]'s standard order of terms.
pub(super) fn sort_by_builtin(ctx: &mut BuiltinContext, args: &[Term]) -> Outcome {
    let solutions = solve(ctx, &args[0]);
    let mut instances: Vec<Term> = solutions.iter().map(|u| u.apply(ctx.factory, &args[0])).collect();
    instances.sort_by(|a, b| crate::term::compare(a, b));
    let list = ctx.factory.create_list(instances);
    super::core::unify_builtin(ctx, &[args[1].clone(), list])
}

/// `count(Goal, Result)`: `Result` unifies with the integer number of
/// solutions `Goal` has.
pub(super) fn count_builtin(ctx: &mut BuiltinContext, args: &[Term]) -> Outcome {
    let solutions = solve(ctx, &args[0]);
    let count = ctx.factory.create_number(Number::Integer(solutions.len() as i64));
    super::core::unify_builtin(ctx, &[args[1].clone(), count])
}

fn numeric_fold(
    ctx: &mut BuiltinContext,
    args: &[Term],
    fold: impl Fn(f64, f64) -> f64,
    seed: Option<f64>,
) -> Outcome {
    let solutions = solve(ctx, &args[2]);
    let mut values = Vec::new();
    for unifier in &solutions {
        let instance = unifier.apply(ctx.factory, &args[1]);
        match crate::term::eval(ctx.factory, &instance) {
            Some(evaluated) => match evaluated.functor().and_then(|n| n.parse::<f64>().ok()) {
                Some(v) => values.push(v),
                None => return Outcome::Fail,
            },
            None => return Outcome::Fail,
        }
    }
    let result = match (seed, values.split_first()) {
        (Some(seed), None) => seed,
        (_, Some((first, rest))) => rest.iter().fold(*first, |acc, v| fold(acc, *v)),
        (None, None) => return Outcome::Fail,
    };
    let all_integer = values.iter().all(|v| v.fract() == 0.0);
    let number = if all_integer {
        ctx.factory.create_number(Number::Integer(result as i64))
    } else {
        ctx.factory.create_number(Number::Float(result))
    };
    super::core::unify_builtin(ctx, &[args[0].clone(), number])
}

/// `min(Result, Expr, Goal)`: `Result` unifies with the numeric minimum of
/// `Expr` evaluated under every solution of `Goal`. Fails if `Goal` has no
/// solutions.
pub(super) fn min_builtin(ctx: &mut BuiltinContext, args: &[Term]) -> Outcome {
    numeric_fold(ctx, args, f64::min, None)
}

/// `max(Result, Expr, Goal)`: as [`min_builtin`], but the maximum.
pub(super) fn max_builtin(ctx: &mut BuiltinContext, args: &[Term]) -> Outcome {
    numeric_fold(ctx, args, f64::max, None)
}

/// `sum(Result, Expr, Goal)`: `Result` unifies with the sum of `Expr`
/// evaluated under every solution of `Goal`. Fails if `Goal` has no
/// solutions, per `spec.md` §4.4 ("`sum` with empty set fails").
pub(super) fn sum_builtin(ctx: &mut BuiltinContext, args: &[Term]) -> Outcome {
    numeric_fold(ctx, args, |a, b| a + b, None)
}
