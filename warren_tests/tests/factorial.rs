//! Seed scenario 2: arithmetic and recursion.
//!
//! `factorial(0,1). factorial(N,F) :- N>0, N1 is N-1, factorial(N1,F1), F is N*F1.`
//! Query `factorial(3, F).` must yield exactly `F = 6`.

use warren::config::Config;
use warren::resolve::GoalResolver;
use warren::ruleset::RuleSet;
use warren::term::{Number, TermFactory};

fn build_factorial(factory: &TermFactory, rules: &mut RuleSet) {
    let zero = factory.create_number(Number::Integer(0));
    let one = factory.create_number(Number::Integer(1));
    warren::builder::add_fact(rules, factory.create_functor("factorial", vec![zero.clone(), one.clone()])).unwrap();

    let n = factory.create_variable("N");
    let f = factory.create_variable("F");
    let n1 = factory.create_variable("N1");
    let f1 = factory.create_variable("F1");

    let head = factory.create_functor("factorial", vec![n.clone(), f.clone()]);
    let tail = vec![
        factory.create_functor(">", vec![n.clone(), zero.clone()]),
        factory.create_functor("is", vec![n1.clone(), factory.create_functor("-", vec![n.clone(), one.clone()])]),
        factory.create_functor("factorial", vec![n1.clone(), f1.clone()]),
        factory.create_functor("is", vec![f.clone(), factory.create_functor("*", vec![n.clone(), f1.clone()])]),
    ];
    warren::builder::add_rule(rules, head, tail).unwrap();
}

#[test]
fn factorial_of_three_is_six() {
    let factory = TermFactory::new();
    let mut rules = RuleSet::new();
    build_factorial(&factory, &mut rules);

    let three = factory.create_number(Number::Integer(3));
    let f = factory.create_variable("F");
    let goal = factory.create_functor("factorial", vec![three, f.clone()]);

    let resolver = GoalResolver::new();
    let config = Config::default();
    let (solutions, _) = resolver.resolve_all(&factory, &mut rules, vec![goal], &config).unwrap();

    assert_eq!(solutions.len(), 1);
    let six = factory.create_number(Number::Integer(6));
    assert_eq!(solutions[0].apply(&factory, &f), six);
}

#[test]
fn factorial_of_zero_is_one_with_no_recursion() {
    let factory = TermFactory::new();
    let mut rules = RuleSet::new();
    build_factorial(&factory, &mut rules);

    let zero = factory.create_number(Number::Integer(0));
    let f = factory.create_variable("F");
    let goal = factory.create_functor("factorial", vec![zero, f.clone()]);

    let resolver = GoalResolver::new();
    let config = Config::default();
    let (solutions, _) = resolver.resolve_all(&factory, &mut rules, vec![goal], &config).unwrap();

    assert_eq!(solutions.len(), 1);
    let one = factory.create_number(Number::Integer(1));
    assert_eq!(solutions[0].apply(&factory, &f), one);
}
