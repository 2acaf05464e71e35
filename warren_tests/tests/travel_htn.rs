//! Seed scenario 4: the taxi/bus travel domain from `spec.md` §4.5.
//!
//! Operators `walk`, `hail`, `ride`, `wait-for`, `set-cash`; methods for
//! `travel-to` via walking, taxi, or bus; axioms `walking-distance` and
//! `have-taxi-fare`. `find_all_plans([travel-to(park)])` over the given
//! initial state returns three plans, in declaration order: walk; taxi
//! (hail, set-cash, ride); bus (wait-for, set-cash, ride).

use warren::config::Config;
use warren::plan::{HtnPlanner, MethodType};
use warren::ruleset::RuleSet;
use warren::term::{Number, TermFactory};

fn build_domain(factory: &TermFactory) -> (HtnPlanner, RuleSet) {
    let mut planner = HtnPlanner::new();
    let mut state = RuleSet::new();

    let downtown = factory.create_constant("downtown");
    let park = factory.create_constant("park");
    let taxi1 = factory.create_constant("taxi1");
    let bus1 = factory.create_constant("bus1");

    warren::builder::add_fact(&mut state, factory.create_functor("at", vec![downtown.clone()])).unwrap();
    warren::builder::add_fact(
        &mut state,
        factory.create_functor("have-cash", vec![factory.create_number(Number::Integer(12))]),
    )
    .unwrap();
    warren::builder::add_fact(&mut state, factory.create_functor("weather-is", vec![factory.create_constant("good")]))
        .unwrap();
    warren::builder::add_fact(
        &mut state,
        factory.create_functor(
            "distance",
            vec![downtown.clone(), park.clone(), factory.create_number(Number::Integer(2))],
        ),
    )
    .unwrap();
    warren::builder::add_fact(
        &mut state,
        factory.create_functor("bus-route", vec![bus1.clone(), downtown.clone(), park.clone()]),
    )
    .unwrap();
    warren::builder::add_fact(
        &mut state,
        factory.create_functor("at-taxi-stand", vec![taxi1.clone(), downtown.clone()]),
    )
    .unwrap();
    warren::builder::add_fact(&mut state, factory.create_functor("bus-fare", vec![factory.create_number(Number::Integer(2))]))
        .unwrap();

    // Axioms, expressed as ordinary rules over the current state.
    let x = factory.create_variable("X");
    let y = factory.create_variable("Y");
    let d = factory.create_variable("D");
    warren::builder::add_rule(
        &mut state,
        factory.create_functor("walking-distance", vec![x.clone(), y.clone()]),
        vec![
            factory.create_functor("distance", vec![x.clone(), y.clone(), d.clone()]),
            factory.create_functor("=<", vec![d.clone(), factory.create_number(Number::Integer(3))]),
        ],
    )
    .unwrap();

    let fare = factory.create_variable("Fare");
    let cash = factory.create_variable("Cash");
    warren::builder::add_rule(
        &mut state,
        factory.create_functor("have-taxi-fare", vec![x.clone(), y.clone(), fare.clone()]),
        vec![
            factory.create_functor("distance", vec![x.clone(), y.clone(), d.clone()]),
            factory.create_functor("is", vec![fare.clone(), factory.create_functor("*", vec![d.clone(), factory.create_number(Number::Integer(5))])]),
            factory.create_functor("have-cash", vec![cash.clone()]),
            factory.create_functor(">=", vec![cash.clone(), fare.clone()]),
        ],
    )
    .unwrap();

    // Operators.
    planner.add_operator(
        factory.create_functor("walk", vec![x.clone(), y.clone()]),
        vec![factory.create_functor("at", vec![y.clone()])],
        vec![factory.create_functor("at", vec![x.clone()])],
        false,
    );
    let taxi = factory.create_variable("Taxi");
    planner.add_operator(factory.create_functor("hail", vec![taxi.clone(), x.clone()]), vec![], vec![], false);
    let amount = factory.create_variable("Amount");
    planner.add_operator(factory.create_functor("set-cash", vec![amount.clone()]), vec![], vec![], false);
    let bus = factory.create_variable("Bus");
    planner.add_operator(factory.create_functor("wait-for", vec![bus.clone(), x.clone()]), vec![], vec![], false);
    let vehicle = factory.create_variable("Vehicle");
    planner.add_operator(
        factory.create_functor("ride", vec![vehicle.clone(), x.clone(), y.clone()]),
        vec![factory.create_functor("at", vec![y.clone()])],
        vec![factory.create_functor("at", vec![x.clone()])],
        false,
    );

    // Methods, declared in the order the scenario expects plans.
    planner.add_method(
        factory.create_functor("travel-to", vec![y.clone()]),
        vec![
            factory.create_functor("at", vec![x.clone()]),
            factory.create_functor("walking-distance", vec![x.clone(), y.clone()]),
        ],
        vec![factory.create_functor("walk", vec![x.clone(), y.clone()])],
        MethodType::Normal,
        false,
    );
    planner.add_method(
        factory.create_functor("travel-to", vec![y.clone()]),
        vec![
            factory.create_functor("at", vec![x.clone()]),
            factory.create_functor("at-taxi-stand", vec![taxi.clone(), x.clone()]),
            factory.create_functor("have-taxi-fare", vec![x.clone(), y.clone(), fare.clone()]),
        ],
        vec![
            factory.create_functor("hail", vec![taxi.clone(), x.clone()]),
            factory.create_functor("set-cash", vec![fare.clone()]),
            factory.create_functor("ride", vec![taxi.clone(), x.clone(), y.clone()]),
        ],
        MethodType::Normal,
        false,
    );
    planner.add_method(
        factory.create_functor("travel-to", vec![y.clone()]),
        vec![
            factory.create_functor("at", vec![x.clone()]),
            factory.create_functor("bus-route", vec![bus.clone(), x.clone(), y.clone()]),
            factory.create_functor("bus-fare", vec![amount.clone()]),
        ],
        vec![
            factory.create_functor("wait-for", vec![bus.clone(), x.clone()]),
            factory.create_functor("set-cash", vec![amount.clone()]),
            factory.create_functor("ride", vec![bus.clone(), x.clone(), y.clone()]),
        ],
        MethodType::Normal,
        false,
    );

    (planner, state)
}

#[test]
fn three_plans_in_declaration_order() {
    let factory = TermFactory::new();
    let (planner, state) = build_domain(&factory);

    let park = factory.create_constant("park");
    let goal = factory.create_functor("travel-to", vec![park]);
    let config = Config::default();
    let (solutions, diagnostics) = planner.find_all_plans(&factory, &state, vec![goal], &config).unwrap();

    assert_eq!(solutions.len(), 3);
    assert!(!diagnostics.out_of_memory);

    assert_eq!(solutions[0].operators.len(), 1);
    assert_eq!(solutions[0].operators[0].functor(), Some("walk"));

    let taxi_ops: Vec<&str> = solutions[1].operators.iter().map(|t| t.functor().unwrap_or("")).collect();
    assert_eq!(taxi_ops, vec!["hail", "set-cash", "ride"]);

    let bus_ops: Vec<&str> = solutions[2].operators.iter().map(|t| t.functor().unwrap_or("")).collect();
    assert_eq!(bus_ops, vec!["wait-for", "set-cash", "ride"]);
}

#[test]
fn find_plan_stops_at_the_first_solution() {
    let factory = TermFactory::new();
    let (planner, state) = build_domain(&factory);

    let park = factory.create_constant("park");
    let goal = factory.create_functor("travel-to", vec![park]);
    let config = Config::default();
    let (solution, _) = planner.find_plan(&factory, &state, vec![goal], &config).unwrap();

    let solution = solution.expect("at least the walking plan should be found");
    assert_eq!(solution.operators[0].functor(), Some("walk"));
}
