//! `GoalResolver::resolve_next`/`ResolveState` (`spec.md` §6's
//! `resolve_next(state)`): the iterator-style search API that lets a host
//! pull one solution at a time instead of collecting them all up front,
//! mirroring `HtnPlanner::find_next_plan`/`PlanState`.

use warren::config::Config;
use warren::resolve::{GoalResolver, ResolveState};
use warren::ruleset::RuleSet;
use warren::term::TermFactory;

#[test]
fn resolve_next_yields_solutions_one_at_a_time_in_order() {
    let factory = TermFactory::new();
    let mut rules = RuleSet::new();
    let resolver = GoalResolver::new();
    let config = Config::default();

    let a = factory.create_constant("a");
    let b = factory.create_constant("b");
    let c = factory.create_constant("c");
    warren::builder::add_fact(&mut rules, factory.create_functor("color", vec![a.clone()])).unwrap();
    warren::builder::add_fact(&mut rules, factory.create_functor("color", vec![b.clone()])).unwrap();
    warren::builder::add_fact(&mut rules, factory.create_functor("color", vec![c.clone()])).unwrap();

    let x = factory.create_variable("X");
    let goal = factory.create_functor("color", vec![x.clone()]);
    let mut state = ResolveState::new(vec![goal]).unwrap();

    let mut seen = Vec::new();
    while let Some(unifier) = resolver.resolve_next(&factory, &mut rules, &config, &mut state).unwrap() {
        seen.push(unifier.apply(&factory, &x));
    }

    assert_eq!(seen, vec![a, b, c]);
}

#[test]
fn resolve_next_matches_resolve_all_for_the_same_query() {
    let factory = TermFactory::new();
    let mut rules = RuleSet::new();
    let resolver = GoalResolver::new();
    let config = Config::default();

    let x = factory.create_variable("X");
    let y = factory.create_variable("Y");
    warren::builder::add_fact(&mut rules, factory.create_functor("edge", vec![factory.create_constant("a"), factory.create_constant("b")])).unwrap();
    warren::builder::add_fact(&mut rules, factory.create_functor("edge", vec![factory.create_constant("b"), factory.create_constant("c")])).unwrap();
    warren::builder::add_rule(
        &mut rules,
        factory.create_functor("path", vec![x.clone(), y.clone()]),
        vec![factory.create_functor("edge", vec![x.clone(), y.clone()])],
    )
    .unwrap();

    let goal = factory.create_functor("path", vec![x.clone(), y.clone()]);

    let mut all_rules = rules.clone();
    let (all_solutions, _) = resolver.resolve_all(&factory, &mut all_rules, vec![goal.clone()], &config).unwrap();

    let mut state = ResolveState::new(vec![goal]).unwrap();
    let mut stepped = Vec::new();
    while let Some(unifier) = resolver.resolve_next(&factory, &mut rules, &config, &mut state).unwrap() {
        stepped.push(unifier);
    }

    assert_eq!(stepped.len(), all_solutions.len());
    for (stepped_unifier, all_unifier) in stepped.iter().zip(all_solutions.iter()) {
        assert_eq!(stepped_unifier.apply(&factory, &x), all_unifier.apply(&factory, &x));
        assert_eq!(stepped_unifier.apply(&factory, &y), all_unifier.apply(&factory, &y));
    }
}

#[test]
fn resolve_next_rejects_an_unbound_goal() {
    let x = TermFactory::new().create_variable("X");
    let result = ResolveState::new(vec![x]);
    assert!(result.is_err());
}
