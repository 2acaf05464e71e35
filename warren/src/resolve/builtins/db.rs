//! The runtime-database built-ins: `assert/1`, `retract/1`, `retractall/1`.
//! Unlike unification's bindings, these mutate the shared [`RuleSet`]
//! directly and are *not* undone on backtracking — ordinary Prolog
//! database semantics (`spec.md` §4.5).

use crate::term::Term;
use crate::unify::Unifier;

use super::{BuiltinContext, Outcome};

/// `assert/1`: adds `args[0]` as a fact. Asserting a fact already present is
/// a fatal contract violation (`spec.md` §7), the same as the operator path
/// in [`crate::plan::engine::create_next_state`] that calls
/// [`crate::ruleset::RuleSet::update`] for an add effect — `update` already
/// raises [`ContractViolation::DuplicateFact`] for this; it is propagated
/// here rather than downgraded to an ordinary goal failure.
pub(super) fn assert_builtin(ctx: &mut BuiltinContext, args: &[Term]) -> Outcome {
    match ctx.ruleset.update(&[], &[args[0].clone()]) {
        Ok(_) => Outcome::Succeed(Unifier::new()),
        Err(e) => Outcome::Error(e),
    }
}

pub(super) fn retract_builtin(ctx: &mut BuiltinContext, args: &[Term]) -> Outcome {
    match ctx.ruleset.update(&[args[0].clone()], &[]) {
        Ok(true) => Outcome::Succeed(Unifier::new()),
        Ok(false) => Outcome::Fail,
        Err(e) => Outcome::Error(e),
    }
}

/// `retractall/1`: removes every currently-visible fact whose head is
/// equivalent (same functor/arity) to `args[0]` *and* whose arguments unify
/// with it (`spec.md` §4.4). Always succeeds, even if nothing matched.
pub(super) fn retractall_builtin(ctx: &mut BuiltinContext, args: &[Term]) -> Outcome {
    let (name, arity) = (args[0].functor().unwrap_or("").to_string(), args[0].arity());
    let factory = ctx.factory;
    let mut matching = Vec::new();
    ctx.ruleset.all_rules(|_, rule| {
        if rule.is_fact()
            && rule.head_signature() == (name.as_str(), arity)
            && crate::unify::unify(factory, &args[0], rule.head()).is_some()
        {
            matching.push(rule.head().clone());
        }
    });
    let _ = ctx.ruleset.update(&matching, &[]);
    Outcome::Succeed(Unifier::new())
}
