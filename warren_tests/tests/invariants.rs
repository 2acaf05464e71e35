//! Property-style tests for the cross-cutting invariants `spec.md` §8
//! calls out, beyond the individual seed scenarios: interning identity,
//! the occurs check, resolver determinism, and sub-resolution isolation.

use warren::config::Config;
use warren::resolve::GoalResolver;
use warren::ruleset::RuleSet;
use warren::term::{Number, TermFactory};
use warren::unify;

#[test]
fn structurally_equal_terms_are_the_same_interned_object() {
    let factory = TermFactory::new();
    let a = factory.create_functor("point", vec![factory.create_number(Number::Integer(1)), factory.create_number(Number::Integer(2))]);
    let b = factory.create_functor("point", vec![factory.create_number(Number::Integer(1)), factory.create_number(Number::Integer(2))]);
    assert_eq!(a, b);

    let c = factory.create_functor("point", vec![factory.create_number(Number::Integer(1)), factory.create_number(Number::Integer(3))]);
    assert_ne!(a, c);
}

#[test]
fn occurs_check_rejects_a_variable_unified_with_a_term_containing_it() {
    let factory = TermFactory::new();
    let x = factory.create_variable("X");
    let wrapped = factory.create_functor("f", vec![x.clone()]);
    assert!(unify::unify(&factory, &x, &wrapped).is_none());
}

#[test]
fn occurs_check_allows_unrelated_terms_to_unify() {
    let factory = TermFactory::new();
    let x = factory.create_variable("X");
    let y = factory.create_variable("Y");
    let wrapped = factory.create_functor("f", vec![y.clone()]);
    assert!(unify::unify(&factory, &x, &wrapped).is_some());
}

#[test]
fn resolving_the_same_immutable_query_twice_yields_identical_solutions() {
    let factory = TermFactory::new();
    let mut rules = RuleSet::new();
    for name in ["a", "b", "c"] {
        warren::builder::add_fact(&mut rules, factory.create_functor("item", vec![factory.create_constant(name)])).unwrap();
    }

    let x = factory.create_variable("X");
    let goal = factory.create_functor("item", vec![x.clone()]);
    let resolver = GoalResolver::new();
    let config = Config::default();

    let (first, _) = resolver.resolve_all(&factory, &mut rules.create_copy(), vec![goal.clone()], &config).unwrap();
    let (second, _) = resolver.resolve_all(&factory, &mut rules.create_copy(), vec![goal], &config).unwrap();

    let first_values: Vec<_> = first.iter().map(|s| s.apply(&factory, &x)).collect();
    let second_values: Vec<_> = second.iter().map(|s| s.apply(&factory, &x)).collect();
    assert_eq!(first_values, second_values);
}

/// `findall/3` resolves its goal in a standalone sub-search (`spec.md`
/// §4.4): the template variable it binds internally must not leak into
/// the caller's own solution once it returns.
#[test]
fn findall_does_not_leak_its_template_binding_into_the_outer_solution() {
    let factory = TermFactory::new();
    let mut rules = RuleSet::new();
    for name in ["a", "b", "c"] {
        warren::builder::add_fact(&mut rules, factory.create_functor("item", vec![factory.create_constant(name)])).unwrap();
    }

    let y = factory.create_variable("Y");
    let results = factory.create_variable("Results");
    let goal = factory.create_functor(
        "findall",
        vec![y.clone(), factory.create_functor("item", vec![y.clone()]), results.clone()],
    );

    let resolver = GoalResolver::new();
    let config = Config::default();
    let (solutions, _) = resolver.resolve_all(&factory, &mut rules, vec![goal], &config).unwrap();

    assert_eq!(solutions.len(), 1);
    // Y was only ever bound inside findall's standalone sub-search; in the
    // outer solution it is still the same free variable.
    assert_eq!(solutions[0].apply(&factory, &y), y);

    let elements = solutions[0].apply(&factory, &results).list_elements().expect("a proper list");
    let a = factory.create_constant("a");
    let b = factory.create_constant("b");
    let c = factory.create_constant("c");
    assert_eq!(elements, vec![a, b, c]);
}
