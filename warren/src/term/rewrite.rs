//! Variable-rewriting helpers: freshening a rule's variables on selection,
//! substituting a single variable, renaming via an explicit map, stripping
//! a freshening prefix back off for display, and folding arithmetic
//! subtrees where possible.

use std::collections::HashMap;

use super::{eval, Term, TermFactory, TermKind};

/// An explicit variable → variable (or variable → term) renaming, as
/// produced by [`make_variables_unique`] and consumed by
/// [`rename_variables`]. Keyed by the *old* variable term's identity.
pub type VariableMap = HashMap<Term, Term>;

/// Rewrites every variable in `term` to a fresh one carrying `prefix`,
/// consistently mapping repeated occurrences of the same ordinary variable
/// name to the same fresh variable, but giving every textual occurrence of
/// a don't-care variable (`_...`) its own fresh variable — per `spec.md`
/// §4.4 "Variable freshening".
///
/// Used each time a rule is selected during resolution, so that its body
/// never accidentally captures a variable from the goal it is unifying
/// against.
pub fn make_variables_unique(factory: &TermFactory, term: &Term, prefix: &str) -> Term {
    let mut map = VariableMap::new();
    let mut dont_care_counter: usize = 0;
    make_variables_unique_inner(factory, term, prefix, &mut map, &mut dont_care_counter)
}

fn make_variables_unique_inner(
    factory: &TermFactory,
    term: &Term,
    prefix: &str,
    map: &mut VariableMap,
    dont_care_counter: &mut usize,
) -> Term {
    match term.kind() {
        TermKind::Variable { name, .. } => {
            if term.is_dont_care() {
                *dont_care_counter += 1;
                return factory.create_variable(&format!("_{prefix}#{dont_care_counter}"));
            }
            if let Some(existing) = map.get(term) {
                return existing.clone();
            }
            let fresh = factory.create_variable(&format!("{prefix}#{name}"));
            map.insert(term.clone(), fresh.clone());
            fresh
        }
        TermKind::Constant { .. } => term.clone(),
        TermKind::Compound { functor, args } => {
            let new_args = args
                .iter()
                .map(|a| make_variables_unique_inner(factory, a, prefix, map, dont_care_counter))
                .collect();
            factory.create_functor(functor, new_args)
        }
    }
}

/// As [`make_variables_unique`], but freshens every term in `terms` against
/// one shared variable map, so that a variable occurring in more than one of
/// them (classically, a rule's head and its tail goals) is renamed
/// consistently across all of them rather than independently per term.
/// Used each time a clause is selected during resolution (`spec.md` §4.4).
pub fn make_variables_unique_many(factory: &TermFactory, terms: &[Term], prefix: &str) -> Vec<Term> {
    let mut map = VariableMap::new();
    let mut dont_care_counter: usize = 0;
    terms
        .iter()
        .map(|t| make_variables_unique_inner(factory, t, prefix, &mut map, &mut dont_care_counter))
        .collect()
}

/// Strips a `prefix#` freshening marker back off every variable name in
/// `term`, for presenting a solution's bindings to a host without the
/// internal renaming prefix leaking into output.
pub fn remove_prefix_from_variables(factory: &TermFactory, term: &Term, prefix: &str) -> Term {
    match term.kind() {
        TermKind::Variable { name, .. } => {
            let marker = format!("{prefix}#");
            match name.strip_prefix(&marker) {
                Some(stripped) => factory.create_variable(stripped),
                None => term.clone(),
            }
        }
        TermKind::Constant { .. } => term.clone(),
        TermKind::Compound { functor, args } => {
            let new_args = args
                .iter()
                .map(|a| remove_prefix_from_variables(factory, a, prefix))
                .collect();
            factory.create_functor(functor, new_args)
        }
    }
}

/// Replaces every occurrence (by identity) of `variable` within `term`
/// with `replacement`.
pub fn substitute(factory: &TermFactory, term: &Term, variable: &Term, replacement: &Term) -> Term {
    if term == variable {
        return replacement.clone();
    }
    match term.kind() {
        TermKind::Variable { .. } | TermKind::Constant { .. } => term.clone(),
        TermKind::Compound { functor, args } => {
            let new_args = args
                .iter()
                .map(|a| substitute(factory, a, variable, replacement))
                .collect();
            factory.create_functor(functor, new_args)
        }
    }
}

/// Applies an explicit variable → term map built by [`make_variables_unique`]
/// (or any other renaming), rewriting every variable found as a key of
/// `map` to its associated value and leaving unmapped variables untouched.
pub fn rename_variables(factory: &TermFactory, term: &Term, map: &VariableMap) -> Term {
    match term.kind() {
        TermKind::Variable { .. } => map.get(term).cloned().unwrap_or_else(|| term.clone()),
        TermKind::Constant { .. } => term.clone(),
        TermKind::Compound { functor, args } => {
            let new_args = args.iter().map(|a| rename_variables(factory, a, map)).collect();
            factory.create_functor(functor, new_args)
        }
    }
}

/// Folds every arithmetic subtree of `term` that [`eval`] can resolve,
/// leaving the rest of the structure (and any subtree containing an
/// unbound variable) untouched. Used to simplify a term after
/// substitution, before it is displayed or stored as a fact.
pub fn resolve_arithmetic_terms(factory: &TermFactory, term: &Term) -> Term {
    match term.kind() {
        TermKind::Variable { .. } | TermKind::Constant { .. } => term.clone(),
        TermKind::Compound { functor, args } => {
            let folded_args: Vec<Term> =
                args.iter().map(|a| resolve_arithmetic_terms(factory, a)).collect();
            let rebuilt = factory.create_functor(functor, folded_args);
            eval(factory, &rebuilt).unwrap_or(rebuilt)
        }
    }
}
