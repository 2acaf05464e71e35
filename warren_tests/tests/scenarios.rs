//! Seed scenario 1: facts and a query (weather example).

mod weather_facts {
    use warren::config::Config;
    use warren::resolve::GoalResolver;
    use warren::ruleset::RuleSet;
    use warren::term::TermFactory;

    #[test]
    fn sunny_then_rainy_in_assertion_order() {
        let factory = TermFactory::new();
        let mut rules = RuleSet::new();
        let sunny = factory.create_constant("sunny");
        let rainy = factory.create_constant("rainy");
        warren::builder::add_fact(&mut rules, factory.create_functor("weather", vec![sunny.clone()])).unwrap();
        warren::builder::add_fact(&mut rules, factory.create_functor("weather", vec![rainy.clone()])).unwrap();

        let x = factory.create_variable("X");
        let goal = factory.create_functor("weather", vec![x.clone()]);

        let resolver = GoalResolver::new();
        let config = Config::default();
        let (solutions, diagnostics) = resolver.resolve_all(&factory, &mut rules, vec![goal], &config).unwrap();

        assert_eq!(solutions.len(), 2);
        assert_eq!(solutions[0].apply(&factory, &x), sunny);
        assert_eq!(solutions[1].apply(&factory, &x), rainy);
        assert!(!diagnostics.out_of_memory);
    }
}

mod family_tree {
    use warren::config::Config;
    use warren::resolve::GoalResolver;
    use warren::ruleset::RuleSet;
    use warren::term::TermFactory;

    /// `ancestor(X, Y) :- parent(X, Y). ancestor(X, Y) :- parent(X, Z), ancestor(Z, Y).`
    /// over `parent(tom, bob). parent(bob, ann). parent(bob, pat).`
    #[test]
    fn ancestor_recurses_through_parent() {
        let factory = TermFactory::new();
        let mut rules = RuleSet::new();

        let tom = factory.create_constant("tom");
        let bob = factory.create_constant("bob");
        let ann = factory.create_constant("ann");
        let pat = factory.create_constant("pat");

        for (p, c) in [(&tom, &bob), (&bob, &ann), (&bob, &pat)] {
            warren::builder::add_fact(&mut rules, factory.create_functor("parent", vec![p.clone(), c.clone()]))
                .unwrap();
        }

        let x = factory.create_variable("X");
        let y = factory.create_variable("Y");
        let z = factory.create_variable("Z");
        warren::builder::add_rule(
            &mut rules,
            factory.create_functor("ancestor", vec![x.clone(), y.clone()]),
            vec![factory.create_functor("parent", vec![x.clone(), y.clone()])],
        )
        .unwrap();
        warren::builder::add_rule(
            &mut rules,
            factory.create_functor("ancestor", vec![x.clone(), y.clone()]),
            vec![
                factory.create_functor("parent", vec![x.clone(), z.clone()]),
                factory.create_functor("ancestor", vec![z.clone(), y.clone()]),
            ],
        )
        .unwrap();

        let goal = factory.create_functor("ancestor", vec![tom.clone(), y.clone()]);
        let resolver = GoalResolver::new();
        let config = Config::default();
        let (solutions, _) = resolver.resolve_all(&factory, &mut rules, vec![goal], &config).unwrap();

        let results: Vec<_> = solutions.iter().map(|s| s.apply(&factory, &y)).collect();
        assert_eq!(results, vec![bob.clone(), ann, pat]);
    }
}
