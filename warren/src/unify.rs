/*!
First-order unification with occurs-check, and substitution composition.

[`unify`] implements Robinson unification over an explicit work-stack —
no host recursion, per `spec.md` §9's "recursion-free resolver" design
note, which applies equally to unification since it is called from deep
inside the resolver's own non-recursive loop. This mirrors the teacher's
own explicit-stack procedures (`procedures::bcp`'s propagation queue)
rather than a textbook recursive `mgu`.
*/

use crate::term::{Term, TermFactory, TermKind};

/// An ordered sequence of `(Variable, Term)` bindings, interpreted as a
/// substitution applied left-to-right (`spec.md` §3): applying a
/// [`Unifier`] to a term means folding over its bindings in order, each
/// one substituting into the result of the previous.
#[derive(Clone, Debug, Default)]
pub struct Unifier {
    bindings: Vec<(Term, Term)>,
}

impl Unifier {
    pub fn new() -> Self {
        Self { bindings: Vec::new() }
    }

    pub fn bindings(&self) -> &[(Term, Term)] {
        &self.bindings
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn bind(&mut self, variable: Term, term: Term) {
        self.bindings.push((variable, term));
    }

    /// Applies every binding in order, left to right, substituting each
    /// one into the result of the previous — so a chain like `X -> Y,
    /// Y -> a` resolves `X` to `a`.
    pub fn apply(&self, factory: &TermFactory, term: &Term) -> Term {
        let mut current = term.clone();
        for (variable, replacement) in &self.bindings {
            current = crate::term::substitute(factory, &current, variable, replacement);
        }
        current
    }

    /// The most recent binding found for `variable`, ignoring anything it
    /// was subsequently rebound to by a later pair with the same
    /// left-hand side (composition routines may transiently produce
    /// duplicate left-hand sides; the last one wins, per `spec.md` §3).
    pub fn lookup(&self, variable: &Term) -> Option<&Term> {
        self.bindings.iter().rev().find(|(v, _)| v == variable).map(|(_, t)| t)
    }

    /// Appends `other`'s bindings after this unifier's own, preserving
    /// left-to-right order.
    pub fn extend(&mut self, other: Unifier) {
        self.bindings.extend(other.bindings);
    }

    /// Drops every binding whose variable is not in `keep`, used by the
    /// standalone sub-resolution protocol's `variablesToKeep` propagation
    /// (`spec.md` §4.4) to avoid leaking irrelevant internal variables
    /// into a caller's solution.
    pub fn retain_variables(&self, keep: &[Term]) -> Unifier {
        Unifier { bindings: self.bindings.iter().filter(|(v, _)| keep.contains(v)).cloned().collect() }
    }
}

/// Implements Robinson unification with an always-on occurs check
/// (`spec.md` §4.3), via an explicit work-stack rather than host
/// recursion.
pub fn unify(factory: &TermFactory, t1: &Term, t2: &Term) -> Option<Unifier> {
    let mut stack = vec![(t1.clone(), t2.clone())];
    let mut solution = Unifier::new();
    while let Some((a, b)) = stack.pop() {
        let a = solution.apply(factory, &a);
        let b = solution.apply(factory, &b);
        if a == b {
            continue;
        }
        match (a.kind(), b.kind()) {
            (TermKind::Variable { .. }, _) => {
                if occurs(&a, &b) {
                    return None;
                }
                solution.bind(a, b);
            }
            (_, TermKind::Variable { .. }) => {
                if occurs(&b, &a) {
                    return None;
                }
                solution.bind(b, a);
            }
            (TermKind::Constant { .. }, TermKind::Constant { .. }) => return None,
            (TermKind::Compound { functor: f1, args: a1 }, TermKind::Compound { functor: f2, args: a2 })
                if f1 == f2 && a1.len() == a2.len() =>
            {
                for (x, y) in a1.iter().zip(a2.iter()) {
                    stack.push((x.clone(), y.clone()));
                }
            }
            _ => return None,
        }
    }
    Some(solution)
}

/// `true` iff `variable` occurs anywhere within `term`'s subtree,
/// including `term` itself — the occurs check that makes `unify(X, f(X))`
/// fail rather than build an infinite term.
fn occurs(variable: &Term, term: &Term) -> bool {
    if variable == term {
        return true;
    }
    match term.kind() {
        TermKind::Compound { args, .. } => args.iter().any(|a| occurs(variable, a)),
        _ => false,
    }
}

/// For each binding in `dest`, rewrites its right-hand side by applying
/// `source` — the composition routine a resolver node uses to fold a
/// freshly obtained unifier onto its own accumulated one (`spec.md`
/// §4.3).
pub fn substitute_unifiers(factory: &TermFactory, source: &Unifier, dest: &Unifier) -> Unifier {
    let mut out = Unifier::new();
    for (variable, term) in dest.bindings() {
        out.bind(variable.clone(), source.apply(factory, term));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::TermFactory;

    #[test]
    fn occurs_check_rejects_self_reference() {
        let factory = TermFactory::new();
        let x = factory.create_variable("X");
        let fx = factory.create_functor("f", vec![x.clone()]);
        assert!(unify(&factory, &x, &fx).is_none());
    }

    #[test]
    fn unifies_compound_arguments() {
        let factory = TermFactory::new();
        let x = factory.create_variable("X");
        let y = factory.create_variable("Y");
        let a = factory.create_constant("a");
        let b = factory.create_constant("b");
        let left = factory.create_functor("p", vec![x.clone(), b.clone()]);
        let right = factory.create_functor("p", vec![a.clone(), y.clone()]);
        let unifier = unify(&factory, &left, &right).expect("should unify");
        assert_eq!(unifier.apply(&factory, &x), a);
        assert_eq!(unifier.apply(&factory, &y), b);
    }

    #[test]
    fn different_constants_fail() {
        let factory = TermFactory::new();
        let a = factory.create_constant("a");
        let b = factory.create_constant("b");
        assert!(unify(&factory, &a, &b).is_none());
    }
}
