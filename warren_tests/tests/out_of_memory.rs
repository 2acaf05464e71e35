//! Seed scenario 6: a tiny memory budget against a domain where one
//! alternative plan is cheap and another blows through the budget while
//! resolving a deep recursive axiom. `find_all_plans` must return the
//! cheap plan it already found, plus a diagnostics record with
//! `out_of_memory` latched — not an empty result and not a panic.

use warren::config::Config;
use warren::plan::{HtnPlanner, MethodType};
use warren::ruleset::RuleSet;
use warren::term::{Number, TermFactory};

#[test]
fn runaway_alternative_is_abandoned_but_the_cheap_plan_survives() {
    let factory = TermFactory::new();
    let mut planner = HtnPlanner::new();
    let mut state = RuleSet::new();

    warren::builder::add_fact(
        &mut state,
        factory.create_functor("declare", vec![factory.create_constant("explode"), factory.create_constant("1")]),
    )
    .unwrap();

    let n = factory.create_variable("N");
    let n1 = factory.create_variable("N1");
    let limit = factory.create_number(Number::Integer(2000));
    warren::builder::add_rule(
        &mut state,
        factory.create_functor("explode", vec![n.clone()]),
        vec![factory.create_functor(">=", vec![n.clone(), limit.clone()])],
    )
    .unwrap();
    warren::builder::add_rule(
        &mut state,
        factory.create_functor("explode", vec![n.clone()]),
        vec![
            factory.create_functor("<", vec![n.clone(), limit.clone()]),
            factory.create_functor("is", vec![n1.clone(), factory.create_functor("+", vec![n.clone(), factory.create_number(Number::Integer(1))])]),
            factory.create_functor("explode", vec![n1.clone()]),
        ],
    )
    .unwrap();

    planner.add_operator(factory.create_constant("trace"), vec![], vec![], false);
    planner.add_method(
        factory.create_constant("go"),
        vec![],
        vec![factory.create_constant("trace")],
        MethodType::Normal,
        false,
    );
    planner.add_method(
        factory.create_constant("go"),
        vec![],
        vec![factory.create_functor("explode", vec![factory.create_number(Number::Integer(0))])],
        MethodType::Normal,
        false,
    );

    let mut config = Config::default();
    config.memory_budget.set_value(1 << 16).unwrap();

    let (solutions, diagnostics) =
        planner.find_all_plans(&factory, &state, vec![factory.create_constant("go")], &config).unwrap();

    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0].operators.len(), 1);
    assert_eq!(solutions[0].operators[0].functor(), Some("trace"));
    assert!(diagnostics.out_of_memory);
    assert!(factory.out_of_memory());
}

#[test]
fn fail_fast_turns_the_same_budget_breach_into_an_error() {
    let factory = TermFactory::new();
    let mut planner = HtnPlanner::new();
    let mut state = RuleSet::new();

    warren::builder::add_fact(
        &mut state,
        factory.create_functor("declare", vec![factory.create_constant("explode"), factory.create_constant("1")]),
    )
    .unwrap();

    let n = factory.create_variable("N");
    let n1 = factory.create_variable("N1");
    let limit = factory.create_number(Number::Integer(2000));
    warren::builder::add_rule(
        &mut state,
        factory.create_functor("explode", vec![n.clone()]),
        vec![factory.create_functor(">=", vec![n.clone(), limit.clone()])],
    )
    .unwrap();
    warren::builder::add_rule(
        &mut state,
        factory.create_functor("explode", vec![n.clone()]),
        vec![
            factory.create_functor("<", vec![n.clone(), limit.clone()]),
            factory.create_functor("is", vec![n1.clone(), factory.create_functor("+", vec![n.clone(), factory.create_number(Number::Integer(1))])]),
            factory.create_functor("explode", vec![n1.clone()]),
        ],
    )
    .unwrap();

    planner.add_method(
        factory.create_constant("go"),
        vec![],
        vec![factory.create_functor("explode", vec![factory.create_number(Number::Integer(0))])],
        MethodType::Normal,
        false,
    );

    let mut config = Config::default();
    config.memory_budget.set_value(1 << 16).unwrap();
    config.fail_fast_as_exception = true;

    let result = planner.find_all_plans(&factory, &state, vec![factory.create_constant("go")], &config);
    assert!(result.is_err());
}
