/*!
Built-in predicate dispatch.

Every recognised built-in predicate is an entry in one table ([`TABLE`]),
keyed by `(name, arity)`, mirroring `spec.md` §9's "built-ins registered in
one table rather than hand-dispatched" design note and this crate's own
[`crate::term::arithmetic::ArithOp`] table. A built-in is given its already
fully-dereferenced argument terms (the engine applies the current unifier
before dispatch) and returns an [`Outcome`]: success with whatever new
bindings it makes, or failure. No built-in here backtracks into multiple
solutions — `=`, `is`, `findall` and the rest are each deterministic,
matching `spec.md` §4.4's built-in contracts.
*/

pub mod aggregate;
pub mod core;
pub mod db;
pub mod diagnostics;
pub mod io;

use std::collections::HashMap;

use crate::config::Config;
use crate::dispatch::Sink;
use crate::ruleset::RuleSet;
use crate::term::{Term, TermFactory};
use crate::types::err::ContractViolation;
use crate::unify::Unifier;

use super::CustomBuiltin;

/// What a built-in reports back to the engine: success with any new
/// bindings it produced, an ordinary failure (triggering backtracking), or
/// a contract violation — a caller error (e.g. asserting a non-ground
/// term) that always propagates as a hard [`crate::types::err::ErrorKind`]
/// rather than being treated as a goal failure (`spec.md` §7).
pub(crate) enum Outcome {
    Succeed(Unifier),
    /// As [`Outcome::Succeed`], but also appends the given terms to the
    /// calling node's failure context (`failureContext/N`, `spec.md` §4.4),
    /// so a failure further down this branch can report them.
    SucceedWithContext(Unifier, Vec<Term>),
    Fail,
    Error(ContractViolation),
}

/// Shared, mutable access a built-in needs: the term factory, the current
/// ruleset (mutable for `assert`/`retract`/`retractall`), the host's
/// dispatch sink (for `write`/`writeln`/`nl`/`print`/traces), the run's
/// config (for the standalone-sub-resolution built-ins, which launch a
/// nested [`crate::resolve::engine::run_standalone`]), and the
/// host-registered custom predicates (so a nested sub-resolution can use
/// them too).
pub(crate) struct BuiltinContext<'a> {
    pub factory: &'a TermFactory,
    pub ruleset: &'a mut RuleSet,
    pub sink: Option<&'a Sink>,
    pub config: &'a Config,
    pub custom: &'a HashMap<(String, usize), CustomBuiltin>,
}

pub(crate) type BuiltinFn = fn(&mut BuiltinContext, &[Term]) -> Outcome;

const TABLE: &[(&str, usize, BuiltinFn)] = &[
    ("=", 2, core::unify_builtin),
    ("==", 2, core::identical_builtin),
    ("\\==", 2, core::not_identical_builtin),
    ("is", 2, core::is_builtin),
    ("true", 0, core::true_builtin),
    ("false", 0, core::false_builtin),
    ("fail", 0, core::false_builtin),
    ("not", 1, core::not_builtin),
    ("forall", 2, core::forall_builtin),
    ("!>", 1, core::cut_open_builtin),
    ("atomic", 1, io::atomic_builtin),
    ("atom_chars", 2, io::atom_chars_builtin),
    ("atom_concat", 3, io::atom_concat_builtin),
    ("downcase_atom", 2, io::downcase_atom_builtin),
    ("write", 1, io::write_builtin),
    ("writeln", 1, io::writeln_builtin),
    ("nl", 0, io::nl_builtin),
    ("assert", 1, db::assert_builtin),
    ("retract", 1, db::retract_builtin),
    ("retractall", 1, db::retractall_builtin),
    ("findall", 3, aggregate::findall_builtin),
    ("first", 2, aggregate::first_builtin),
    ("distinct", 2, aggregate::distinct_builtin),
    ("sortBy", 2, aggregate::sort_by_builtin),
    ("count", 2, aggregate::count_builtin),
    ("min", 3, aggregate::min_builtin),
    ("max", 3, aggregate::max_builtin),
    ("sum", 3, aggregate::sum_builtin),
    ("failureContext", 1, diagnostics::failure_context_builtin),
    ("showTraces", 1, diagnostics::show_traces_builtin),
];

/// Looks `(name, arity)` up in [`TABLE`], plus the variadic `print/N`,
/// which the table can't express directly since it is keyed on a fixed
/// arity.
pub(crate) fn lookup(name: &str, arity: usize) -> Option<BuiltinFn> {
    if name == "print" {
        return Some(io::print_builtin);
    }
    TABLE.iter().find(|(n, a, _)| *n == name && *a == arity).map(|(_, _, f)| *f)
}
