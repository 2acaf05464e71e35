//! Seed scenario 3 (also §8's "cut fencing" invariant):
//!
//! `rule(X) :- itemsInBag(X), !. rule(X) :- X == good. itemsInBag(Name1). itemsInBag(Name2).`
//! Query `rule(X).` must yield exactly one solution, `X = Name1` — the cut
//! prunes both `itemsInBag(X)`'s second solution and the sibling clause.

use warren::config::Config;
use warren::resolve::GoalResolver;
use warren::ruleset::RuleSet;
use warren::term::TermFactory;

#[test]
fn cut_commits_to_the_first_matching_clause() {
    let factory = TermFactory::new();
    let mut rules = RuleSet::new();

    let name1 = factory.create_constant("name1");
    let name2 = factory.create_constant("name2");
    let good = factory.create_constant("good");
    warren::builder::add_fact(&mut rules, factory.create_functor("itemsInBag", vec![name1.clone()])).unwrap();
    warren::builder::add_fact(&mut rules, factory.create_functor("itemsInBag", vec![name2.clone()])).unwrap();

    let x = factory.create_variable("X");
    let cut = factory.create_constant("!");
    warren::builder::add_rule(
        &mut rules,
        factory.create_functor("rule", vec![x.clone()]),
        vec![factory.create_functor("itemsInBag", vec![x.clone()]), cut],
    )
    .unwrap();
    warren::builder::add_rule(
        &mut rules,
        factory.create_functor("rule", vec![x.clone()]),
        vec![factory.create_functor("==", vec![x.clone(), good.clone()])],
    )
    .unwrap();

    let goal = factory.create_functor("rule", vec![x.clone()]);
    let resolver = GoalResolver::new();
    let config = Config::default();
    let (solutions, _) = resolver.resolve_all(&factory, &mut rules, vec![goal], &config).unwrap();

    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0].apply(&factory, &x), name1);
}

/// The invariant from `spec.md` §8 in its canonical `p/q/r` shape:
/// `p(X) :- q(X), !. p(_) :- r.` with `q(a)`, `q(b)`, `r` all true yields
/// exactly `X = a`.
#[test]
fn cut_fencing_canonical_shape() {
    let factory = TermFactory::new();
    let mut rules = RuleSet::new();

    let a = factory.create_constant("a");
    let b = factory.create_constant("b");
    warren::builder::add_fact(&mut rules, factory.create_functor("q", vec![a.clone()])).unwrap();
    warren::builder::add_fact(&mut rules, factory.create_functor("q", vec![b.clone()])).unwrap();
    warren::builder::add_fact(&mut rules, factory.create_constant("r")).unwrap();

    let x = factory.create_variable("X");
    let wildcard = factory.create_variable("_");
    let cut = factory.create_constant("!");
    warren::builder::add_rule(
        &mut rules,
        factory.create_functor("p", vec![x.clone()]),
        vec![factory.create_functor("q", vec![x.clone()]), cut],
    )
    .unwrap();
    warren::builder::add_rule(
        &mut rules,
        factory.create_functor("p", vec![wildcard]),
        vec![factory.create_constant("r")],
    )
    .unwrap();

    let goal = factory.create_functor("p", vec![x.clone()]);
    let resolver = GoalResolver::new();
    let config = Config::default();
    let (solutions, _) = resolver.resolve_all(&factory, &mut rules, vec![goal], &config).unwrap();

    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0].apply(&factory, &x), a);
}
