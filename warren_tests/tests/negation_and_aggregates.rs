//! `not/1`, `forall/2`, and the aggregate built-ins (`spec.md` §4.4):
//! `findall/3` is covered by `invariants.rs`'s isolation test, so this
//! file exercises `distinct/2`, `sortBy/2`, `count/2`, `min/3`, `max/3`,
//! and `sum/3`, plus the empty-solution-set edge case each of those and
//! `not`/`forall` treat differently.

use warren::config::Config;
use warren::resolve::GoalResolver;
use warren::ruleset::RuleSet;
use warren::term::{Number, TermFactory};

fn run(rules: &mut RuleSet, factory: &TermFactory, goal: warren::term::Term) -> Vec<warren::unify::Unifier> {
    let resolver = GoalResolver::new();
    let config = Config::default();
    resolver.resolve_all(factory, rules, vec![goal], &config).unwrap().0
}

#[test]
fn not_succeeds_only_when_the_negated_goal_has_no_solutions() {
    let factory = TermFactory::new();
    let mut rules = RuleSet::new();
    warren::builder::add_fact(&mut rules, factory.create_functor("bird", vec![factory.create_constant("robin")])).unwrap();

    let penguin = factory.create_constant("penguin");
    let robin = factory.create_constant("robin");
    let not_penguin = factory.create_functor("not", vec![factory.create_functor("bird", vec![penguin])]);
    let not_robin = factory.create_functor("not", vec![factory.create_functor("bird", vec![robin])]);

    assert_eq!(run(&mut rules, &factory, not_penguin).len(), 1);
    assert_eq!(run(&mut rules, &factory, not_robin).len(), 0);
}

#[test]
fn forall_checks_the_test_holds_for_every_generator_solution() {
    let factory = TermFactory::new();
    let mut rules = RuleSet::new();
    for name in ["a", "b", "c"] {
        warren::builder::add_fact(&mut rules, factory.create_functor("item", vec![factory.create_constant(name)])).unwrap();
        warren::builder::add_fact(&mut rules, factory.create_functor("likable", vec![factory.create_constant(name)])).unwrap();
    }
    let x = factory.create_variable("X");
    let goal = factory.create_functor(
        "forall",
        vec![
            factory.create_functor("item", vec![x.clone()]),
            factory.create_functor("likable", vec![x.clone()]),
        ],
    );
    assert_eq!(run(&mut rules, &factory, goal).len(), 1);
}

#[test]
fn forall_fails_when_one_generator_solution_fails_the_test() {
    let factory = TermFactory::new();
    let mut rules = RuleSet::new();
    for name in ["a", "b", "c"] {
        warren::builder::add_fact(&mut rules, factory.create_functor("item", vec![factory.create_constant(name)])).unwrap();
    }
    warren::builder::add_fact(&mut rules, factory.create_functor("likable", vec![factory.create_constant("a")])).unwrap();
    warren::builder::add_fact(&mut rules, factory.create_functor("likable", vec![factory.create_constant("b")])).unwrap();

    let x = factory.create_variable("X");
    let goal = factory.create_functor(
        "forall",
        vec![
            factory.create_functor("item", vec![x.clone()]),
            factory.create_functor("likable", vec![x.clone()]),
        ],
    );
    assert_eq!(run(&mut rules, &factory, goal).len(), 0);
}

#[test]
fn distinct_drops_structural_duplicates_keeping_first_position() {
    let factory = TermFactory::new();
    let mut rules = RuleSet::new();
    for name in ["red", "blue", "red", "green", "blue"] {
        warren::builder::add_fact(&mut rules, factory.create_functor("color", vec![factory.create_constant(name)])).unwrap();
    }

    let x = factory.create_variable("X");
    let results = factory.create_variable("Results");
    let goal = factory.create_functor(
        "distinct",
        vec![factory.create_functor("color", vec![x.clone()]), results.clone()],
    );
    let solutions = run(&mut rules, &factory, goal);
    assert_eq!(solutions.len(), 1);

    let elements = solutions[0].apply(&factory, &results).list_elements().unwrap();
    let expected = ["red", "blue", "green"].map(|n| factory.create_constant(n)).to_vec();
    assert_eq!(elements, expected);
}

#[test]
fn sort_by_orders_instances_by_standard_term_order() {
    let factory = TermFactory::new();
    let mut rules = RuleSet::new();
    for n in [3, 1, 2] {
        warren::builder::add_fact(&mut rules, factory.create_functor("value", vec![factory.create_number(Number::Integer(n))])).unwrap();
    }

    let x = factory.create_variable("X");
    let results = factory.create_variable("Results");
    let goal =
        factory.create_functor("sortBy", vec![factory.create_functor("value", vec![x.clone()]), results.clone()]);
    let solutions = run(&mut rules, &factory, goal);
    assert_eq!(solutions.len(), 1);

    let elements = solutions[0].apply(&factory, &results).list_elements().unwrap();
    let expected = [1, 2, 3].map(|n| factory.create_number(Number::Integer(n))).to_vec();
    assert_eq!(elements, expected);
}

#[test]
fn count_reports_the_number_of_solutions() {
    let factory = TermFactory::new();
    let mut rules = RuleSet::new();
    for name in ["a", "b", "c"] {
        warren::builder::add_fact(&mut rules, factory.create_functor("item", vec![factory.create_constant(name)])).unwrap();
    }

    let x = factory.create_variable("X");
    let n = factory.create_variable("N");
    let goal = factory.create_functor("count", vec![factory.create_functor("item", vec![x.clone()]), n.clone()]);
    let solutions = run(&mut rules, &factory, goal);

    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0].apply(&factory, &n), factory.create_number(Number::Integer(3)));
}

#[test]
fn min_and_max_fold_expr_over_every_solution() {
    let factory = TermFactory::new();
    let mut rules = RuleSet::new();
    for n in [5, 1, 9, 3] {
        warren::builder::add_fact(&mut rules, factory.create_functor("reading", vec![factory.create_number(Number::Integer(n))])).unwrap();
    }

    let x = factory.create_variable("X");
    let result = factory.create_variable("Result");
    let min_goal = factory.create_functor(
        "min",
        vec![result.clone(), x.clone(), factory.create_functor("reading", vec![x.clone()])],
    );
    let solutions = run(&mut rules, &factory, min_goal);
    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0].apply(&factory, &result), factory.create_number(Number::Integer(1)));

    let max_goal = factory.create_functor(
        "max",
        vec![result.clone(), x.clone(), factory.create_functor("reading", vec![x.clone()])],
    );
    let solutions = run(&mut rules, &factory, max_goal);
    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0].apply(&factory, &result), factory.create_number(Number::Integer(9)));
}

#[test]
fn sum_adds_expr_over_every_solution() {
    let factory = TermFactory::new();
    let mut rules = RuleSet::new();
    for n in [5, 1, 9, 3] {
        warren::builder::add_fact(&mut rules, factory.create_functor("reading", vec![factory.create_number(Number::Integer(n))])).unwrap();
    }

    let x = factory.create_variable("X");
    let result = factory.create_variable("Result");
    let goal = factory.create_functor(
        "sum",
        vec![result.clone(), x.clone(), factory.create_functor("reading", vec![x.clone()])],
    );
    let solutions = run(&mut rules, &factory, goal);
    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0].apply(&factory, &result), factory.create_number(Number::Integer(18)));
}

/// `spec.md` §4.4: `sum` over an empty solution set fails rather than
/// defaulting to zero.
#[test]
fn sum_over_an_empty_solution_set_fails() {
    let factory = TermFactory::new();
    let mut rules = RuleSet::new();

    let x = factory.create_variable("X");
    let result = factory.create_variable("Result");
    let goal = factory.create_functor(
        "sum",
        vec![result.clone(), x.clone(), factory.create_functor("reading", vec![x.clone()])],
    );
    let solutions = run(&mut rules, &factory, goal);
    assert_eq!(solutions.len(), 0);
}
