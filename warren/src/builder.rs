/*!
Tools for assembling a [`RuleSet`] and an [`HtnPlanner`] from terms.

The full text compiler that turns source syntax into terms is out of
scope for this crate (`spec.md` §1: "the specification assumes a builder
that can hand the core a sequence of `(head, tail)` rules, a sequence of
operator/method declarations, and parsed query terms; their syntax is
external"). What lives here is the programmatic construction surface a
host (or an external parser) drives: building a clause from a head and
tail and handing it to a [`RuleSet`], declaring an operator's add/delete
lists, declaring a method's condition and task list.

# Examples

Assembling a small ruleset directly from terms.

```rust
# use warren::term::TermFactory;
# use warren::ruleset::RuleSet;
# use warren::builder::add_fact;
#
let factory = TermFactory::new();
let mut rules = RuleSet::new();

let socrates = factory.create_functor("human", vec![factory.create_constant("socrates")]);
add_fact(&mut rules, socrates).unwrap();
assert!(rules.has_fact(&factory.create_functor("human", vec![factory.create_constant("socrates")])));
```

Declaring an operator and a method on an [`HtnPlanner`].

```rust
# use warren::term::TermFactory;
# use warren::plan::{HtnPlanner, MethodType};
#
let factory = TermFactory::new();
let mut planner = HtnPlanner::new();

let x = factory.create_variable("X");
let head = factory.create_functor("pick_up", vec![x.clone()]);
let add = vec![factory.create_functor("holding", vec![x.clone()])];
let delete = vec![factory.create_functor("on_table", vec![x])];
planner.add_operator(head, add, delete, false);
assert_eq!(planner.all_operators().len(), 1);
```
*/

use crate::rule::Rule;
use crate::ruleset::RuleSet;
use crate::term::Term;
use crate::types::err::ContractViolation;

/// Adds a fact (a rule with no tail) to `rules`' base. A thin, documented
/// wrapper over [`RuleSet::add_rule`] for the common case — the core
/// entry point an external parser's "load a clause" step calls.
pub fn add_fact(rules: &mut RuleSet, head: Term) -> Result<(), ContractViolation> {
    rules.add_rule(head, Vec::new())
}

/// Adds a rule (head plus tail) to `rules`' base.
pub fn add_rule(rules: &mut RuleSet, head: Term, tail: Vec<Term>) -> Result<(), ContractViolation> {
    rules.add_rule(head, tail)
}

/// Builds a [`Rule`] without adding it anywhere, for a host that wants to
/// inspect or batch clauses before committing them to a [`RuleSet`].
pub fn build_rule(head: Term, tail: Vec<Term>) -> Rule {
    Rule::new(head, tail)
}

/// Adds every rule in `rules_in_order` to `rules`, preserving order —
/// the batch counterpart to [`add_rule`] for a host that has already
/// parsed a whole source file's worth of clauses into memory.
pub fn add_program(rules: &mut RuleSet, rules_in_order: Vec<(Term, Vec<Term>)>) -> Result<(), ContractViolation> {
    for (head, tail) in rules_in_order {
        add_rule(rules, head, tail)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::TermFactory;

    #[test]
    fn add_fact_is_visible_as_a_fact() {
        let factory = TermFactory::new();
        let mut rules = RuleSet::new();
        let p = factory.create_constant("p");
        add_fact(&mut rules, p.clone()).unwrap();
        assert!(rules.has_fact(&p));
    }

    #[test]
    fn add_program_preserves_order() {
        let factory = TermFactory::new();
        let mut rules = RuleSet::new();
        let a = factory.create_constant("a");
        let b = factory.create_constant("b");
        add_program(&mut rules, vec![(a.clone(), vec![]), (b.clone(), vec![])]).unwrap();
        let mut seen = Vec::new();
        rules.all_rules(|_, rule| seen.push(rule.head().clone()));
        assert_eq!(seen, vec![a, b]);
    }

    #[test]
    fn add_rule_after_copy_is_rejected() {
        let factory = TermFactory::new();
        let mut rules = RuleSet::new();
        add_fact(&mut rules, factory.create_constant("a")).unwrap();
        let _copy = rules.create_copy();
        let err = add_fact(&mut rules, factory.create_constant("b")).unwrap_err();
        assert_eq!(err, ContractViolation::BaseAlreadyShared);
    }
}
