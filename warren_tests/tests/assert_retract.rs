//! `assert/1`, `retract/1`, `retractall/1` (`spec.md` §4.4-4.5): database
//! mutations that take effect immediately and survive backtracking,
//! unlike ordinary unification bindings.

use warren::config::Config;
use warren::resolve::GoalResolver;
use warren::ruleset::RuleSet;
use warren::term::TermFactory;
use warren::types::err::{ContractViolation, ErrorKind};

#[test]
fn assert_adds_a_fact_the_next_query_can_see() {
    let factory = TermFactory::new();
    let mut rules = RuleSet::new();
    let resolver = GoalResolver::new();
    let config = Config::default();

    let new_fact = factory.create_functor("seen", vec![factory.create_constant("fox")]);
    assert!(!rules.has_fact(&new_fact));

    let goal = factory.create_functor("assert", vec![new_fact.clone()]);
    let (solutions, _) = resolver.resolve_all(&factory, &mut rules, vec![goal], &config).unwrap();
    assert_eq!(solutions.len(), 1);
    assert!(rules.has_fact(&new_fact));
}

#[test]
fn asserting_an_already_present_fact_is_a_contract_violation() {
    let factory = TermFactory::new();
    let mut rules = RuleSet::new();
    let resolver = GoalResolver::new();
    let config = Config::default();

    let fact = factory.create_functor("seen", vec![factory.create_constant("fox")]);
    warren::builder::add_fact(&mut rules, fact.clone()).unwrap();

    let goal = factory.create_functor("assert", vec![fact]);
    let err = resolver.resolve_all(&factory, &mut rules, vec![goal], &config).unwrap_err();
    assert!(matches!(err, ErrorKind::ContractViolation(ContractViolation::DuplicateFact { .. })));
}

#[test]
fn retract_removes_an_existing_fact() {
    let factory = TermFactory::new();
    let mut rules = RuleSet::new();
    let resolver = GoalResolver::new();
    let config = Config::default();

    let fact = factory.create_functor("seen", vec![factory.create_constant("fox")]);
    warren::builder::add_fact(&mut rules, fact.clone()).unwrap();

    let goal = factory.create_functor("retract", vec![fact.clone()]);
    let (solutions, _) = resolver.resolve_all(&factory, &mut rules, vec![goal], &config).unwrap();
    assert_eq!(solutions.len(), 1);
    assert!(!rules.has_fact(&fact));
}

#[test]
fn retracting_a_fact_that_is_not_present_fails() {
    let factory = TermFactory::new();
    let mut rules = RuleSet::new();
    let resolver = GoalResolver::new();
    let config = Config::default();

    let fact = factory.create_functor("seen", vec![factory.create_constant("fox")]);
    let goal = factory.create_functor("retract", vec![fact]);
    let (solutions, _) = resolver.resolve_all(&factory, &mut rules, vec![goal], &config).unwrap();
    assert_eq!(solutions.len(), 0);
}

#[test]
fn retractall_removes_every_fact_matching_the_pattern() {
    let factory = TermFactory::new();
    let mut rules = RuleSet::new();
    let resolver = GoalResolver::new();
    let config = Config::default();

    let fox = factory.create_functor("seen", vec![factory.create_constant("fox")]);
    let hare = factory.create_functor("seen", vec![factory.create_constant("hare")]);
    let bark = factory.create_functor("heard", vec![factory.create_constant("bark")]);
    warren::builder::add_fact(&mut rules, fox.clone()).unwrap();
    warren::builder::add_fact(&mut rules, hare.clone()).unwrap();
    warren::builder::add_fact(&mut rules, bark.clone()).unwrap();

    let x = factory.create_variable("X");
    let pattern = factory.create_functor("seen", vec![x]);
    let goal = factory.create_functor("retractall", vec![pattern]);
    let (solutions, _) = resolver.resolve_all(&factory, &mut rules, vec![goal], &config).unwrap();

    assert_eq!(solutions.len(), 1);
    assert!(!rules.has_fact(&fox));
    assert!(!rules.has_fact(&hare));
    assert!(rules.has_fact(&bark));
}
