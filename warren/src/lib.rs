/*!
An embeddable reasoning engine combining a Prolog-style SLD resolver and a
Hierarchical Task Network (HTN) planner over a single shared term store and
rule database.

# Orientation

The library is built around three tightly coupled pieces:

- The [term] module: an immutable, structurally-interned term type and the
  [TermFactory](term::TermFactory) that creates and canonicalises terms.
- The [ruleset] module: a database of Horn clauses ([Rule](rule::Rule)),
  shared cheaply between derived copies via an additive/subtractive diff.
- The [resolve] module: a non-recursive, depth-first SLD resolver
  ([GoalResolver](resolve::GoalResolver)) supporting backtracking, cut,
  arithmetic, and a family of built-in predicates.

Layered on top of the resolver is [plan], an iterative HTN planner which
decomposes compound tasks into primitive operator applications, using the
resolver to check every method's preconditions.

A host program typically:
1. Builds a [RuleSet](ruleset::RuleSet) and an [HtnPlanner](plan::HtnPlanner)
   via [builder], supplying facts, rules, operators, and methods.
2. Issues queries through [GoalResolver::resolve_all](resolve::GoalResolver::resolve_all)
   or plan requests through [HtnPlanner::find_all_plans](plan::HtnPlanner::find_all_plans).

# Example

```rust
use warren::term::TermFactory;
use warren::ruleset::RuleSet;
use warren::resolve::GoalResolver;
use warren::config::Config;

let factory = TermFactory::new();
let mut rules = RuleSet::new();

let sunny = factory.create_functor("weather", vec![factory.create_constant("sunny")]);
let rainy = factory.create_functor("weather", vec![factory.create_constant("rainy")]);
rules.add_rule(sunny, vec![]).unwrap();
rules.add_rule(rainy, vec![]).unwrap();

let query = factory.create_functor("weather", vec![factory.create_variable("X")]);
let resolver = GoalResolver::new();
let config = Config::default();
let (solutions, _diagnostics) = resolver
    .resolve_all(&factory, &mut rules, vec![query], &config)
    .expect("resolution should not hit a contract violation");

assert_eq!(solutions.len(), 2);
```

# Guiding principles

This library is organised the way the codebases it learned from are
organised: a small immutable core (terms, rules, unification), a
non-recursive engine built from an explicit state machine rather than host
recursion (so the engine can be budgeted and, in principle, suspended and
resumed), and every built-in predicate registered in one table rather than
hand-dispatched.

# Logs

Diagnostic [log] calls are scattered through the resolver and planner under
a handful of targets, documented in [misc::log]. Logging is opt-in from the
host's perspective: this crate never initialises a logger itself.
*/

#![allow(clippy::collapsible_else_if)]
#![allow(clippy::too_many_arguments)]

pub mod builder;
pub mod config;
pub mod dispatch;
pub mod generic;
pub mod misc;
pub mod plan;
pub mod reports;
pub mod resolve;
pub mod rule;
pub mod ruleset;
pub mod term;
pub mod types;
pub mod unify;
