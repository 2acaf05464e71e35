//! The core control and comparison built-ins: unification, identity,
//! arithmetic evaluation, and the standalone-sub-resolution negation
//! built-ins `not/1` and `forall/2`.

use crate::term::{Term, TermFactory};
use crate::types::err::ContractViolation;
use crate::unify::Unifier;

use super::{BuiltinContext, Outcome};

pub(super) fn unify_builtin(ctx: &mut BuiltinContext, args: &[Term]) -> Outcome {
    match crate::unify::unify(ctx.factory, &args[0], &args[1]) {
        Some(unifier) => Outcome::Succeed(unifier),
        None => Outcome::Fail,
    }
}

/// `==/2`: structural identity after the current unifier has already been
/// applied by the engine — since terms are interned, this is pointer
/// equality, with no bindings produced either way.
pub(super) fn identical_builtin(_ctx: &mut BuiltinContext, args: &[Term]) -> Outcome {
    if args[0] == args[1] {
        Outcome::Succeed(Unifier::new())
    } else {
        Outcome::Fail
    }
}

pub(super) fn not_identical_builtin(_ctx: &mut BuiltinContext, args: &[Term]) -> Outcome {
    if args[0] != args[1] {
        Outcome::Succeed(Unifier::new())
    } else {
        Outcome::Fail
    }
}

/// `is/2`: evaluates `args[1]` as an arithmetic expression and unifies the
/// result with `args[0]`.
pub(super) fn is_builtin(ctx: &mut BuiltinContext, args: &[Term]) -> Outcome {
    if let Some((found, suggested)) = crate::term::detect_operator_typo(&args[1]) {
        return Outcome::Error(ContractViolation::ArithmeticOperatorTypo { found: found.to_string(), suggested });
    }
    match crate::term::eval(ctx.factory, &args[1]) {
        Some(value) => unify_builtin(ctx, &[args[0].clone(), value]),
        None => Outcome::Fail,
    }
}

pub(super) fn true_builtin(_ctx: &mut BuiltinContext, _args: &[Term]) -> Outcome {
    Outcome::Succeed(Unifier::new())
}

pub(super) fn false_builtin(_ctx: &mut BuiltinContext, _args: &[Term]) -> Outcome {
    Outcome::Fail
}

/// `!>(id)`: always succeeds. The cut-fence bookkeeping it nominally
/// performs has already been recorded by
/// [`crate::resolve::engine::take_choice`] at clause-selection time, since
/// `!>(id)` is always the very next goal reached.
pub(super) fn cut_open_builtin(_ctx: &mut BuiltinContext, _args: &[Term]) -> Outcome {
    Outcome::Succeed(Unifier::new())
}

/// `not/1`: succeeds, with no bindings, iff a standalone sub-resolution of
/// its argument has zero solutions.
pub(super) fn not_builtin(ctx: &mut BuiltinContext, args: &[Term]) -> Outcome {
    let solutions = crate::resolve::engine::run_standalone(
        ctx.factory,
        ctx.ruleset,
        args[0].clone(),
        ctx.config,
        ctx.sink,
        ctx.custom,
    );
    if solutions.is_empty() {
        Outcome::Succeed(Unifier::new())
    } else {
        Outcome::Fail
    }
}

/// `forall/2`: succeeds iff every solution of `args[0]` (the generator)
/// also satisfies `args[1]` (the test) — implemented as `not((Generator,
/// not(Test)))`, the standard Prolog definition.
pub(super) fn forall_builtin(ctx: &mut BuiltinContext, args: &[Term]) -> Outcome {
    let generator = args[0].clone();
    let test = args[1].clone();
    let negated_test = ctx.factory.create_functor("not", vec![test]);
    let conjunction = conjoin(ctx.factory, &[generator, negated_test]);
    not_builtin(ctx, &[conjunction])
}

/// Builds a right-nested `','(A, ','(B, C))` conjunction term out of
/// `goals`, the same shape a parser would build from `A, B, C` — used to
/// hand a multi-goal body to a standalone sub-resolution, which only takes
/// a single goal term.
pub(crate) fn conjoin(factory: &TermFactory, goals: &[Term]) -> Term {
    match goals {
        [] => factory.true_(),
        [only] => only.clone(),
        [first, rest @ ..] => factory.create_functor(",", vec![first.clone(), conjoin(factory, rest)]),
    }
}
