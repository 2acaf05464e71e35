/*!
[`RuleSet`]: a database of Horn clauses shared cheaply between derived
copies via an additive/subtractive diff over facts.

A `RuleSet` is logically a multiset of rules preserving insertion order
(`spec.md` §3). Physically it is a shared, immutable *base* (built during
"compile" time via [`RuleSet::add_rule`]) plus a per-instance *fact diff*
(built at runtime via [`RuleSet::update`], `assert`, `retract`, and the
planner's operator application). [`RuleSet::create_copy`] clones the diff
but shares the base by reference count — directly grounded in the
teacher's [`ClauseKey`](crate::ruleset::RuleKey)-style distinction between
a clause's original storage class and its runtime-added one (see
`db::keys::ClauseKey` in the teacher).
*/

mod key;

pub use key::RuleKey;

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::rule::Rule;
use crate::term::Term;
use crate::types::err::ContractViolation;

#[derive(Clone, Copy, PartialEq, Eq)]
enum DiffState {
    Added { sequence: u64 },
    Deleted,
}

/// A database of [`Rule`]s. See the [module docs](self) for the base/diff
/// model.
pub struct RuleSet {
    base: Rc<Vec<Rule>>,
    base_locked: Rc<Cell<bool>>,
    diff_map: HashMap<String, DiffState>,
    diff_additions: Vec<(String, u64, Rule)>,
    next_sequence: u64,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSet {
    pub fn new() -> Self {
        Self {
            base: Rc::new(Vec::new()),
            base_locked: Rc::new(Cell::new(false)),
            diff_map: HashMap::new(),
            diff_additions: Vec::new(),
            next_sequence: 0,
        }
    }

    /// Adds a rule to the shared base. Forbidden once any
    /// [`RuleSet::create_copy`] of this ruleset has been made — the base
    /// is then locked (`spec.md` §3: "Once a copy of a RuleSet has been
    /// made, its base becomes locked").
    pub fn add_rule(&mut self, head: Term, tail: Vec<Term>) -> Result<(), ContractViolation> {
        if self.base_locked.get() {
            return Err(ContractViolation::BaseAlreadyShared);
        }
        let rules = Rc::get_mut(&mut self.base)
            .expect("base is not locked, so this RuleSet must hold the only strong reference");
        let rule = Rule::new(head, tail);
        log::debug!(target: "warren::ruleset", "added base rule `{rule}`");
        rules.push(rule);
        Ok(())
    }

    /// Edits the fact diff only: asserts `add` and retracts `remove`, both
    /// of which must be ground. All preconditions (every removal currently
    /// exists, no addition is already present) are checked before any
    /// mutation, so a call either fully applies or leaves the ruleset
    /// untouched.
    ///
    /// Returns `Ok(true)` on success, `Ok(false)` if a removal named a fact
    /// that does not currently exist (an ordinary goal failure, not a
    /// contract violation — `spec.md` §3), or `Err` if any argument is
    /// non-ground or an addition duplicates an existing fact.
    pub fn update(&mut self, remove: &[Term], add: &[Term]) -> Result<bool, ContractViolation> {
        for term in remove.iter().chain(add.iter()) {
            if !term.is_ground() {
                return Err(ContractViolation::NonGroundAssertOrRetract { goal: term.to_string() });
            }
        }
        for term in remove {
            if !self.has_fact(term) {
                return Ok(false);
            }
        }
        for term in add {
            if self.has_fact(term) {
                return Err(ContractViolation::DuplicateFact { fact: term.to_string() });
            }
        }
        for term in remove {
            let key = Rule::new(term.clone(), Vec::new()).key();
            log::debug!(target: "warren::ruleset", "retracted fact `{term}`");
            self.diff_map.insert(key, DiffState::Deleted);
        }
        for term in add {
            let key = Rule::new(term.clone(), Vec::new()).key();
            let sequence = self.next_sequence;
            self.next_sequence += 1;
            log::debug!(target: "warren::ruleset", "asserted fact `{term}`");
            self.diff_map.insert(key.clone(), DiffState::Added { sequence });
            self.diff_additions.push((key, sequence, Rule::new(term.clone(), Vec::new())));
        }
        Ok(true)
    }

    /// `create_copy` then `update`, in one step — the shape the HTN
    /// planner uses to apply an operator's add/delete lists to produce
    /// the next world state without disturbing the state the caller
    /// still holds (`spec.md` §4.5).
    pub fn create_next_state(&self, remove: &[Term], add: &[Term]) -> Result<RuleSet, ContractViolation> {
        let mut copy = self.create_copy();
        copy.update(remove, add)?;
        Ok(copy)
    }

    /// Structurally clones this ruleset: the new value shares the same
    /// base (by reference count) but has its own independent fact diff.
    /// Locks the base on *both* the original and the copy against further
    /// [`RuleSet::add_rule`] calls.
    pub fn create_copy(&self) -> RuleSet {
        self.base_locked.set(true);
        RuleSet {
            base: Rc::clone(&self.base),
            base_locked: Rc::clone(&self.base_locked),
            diff_map: self.diff_map.clone(),
            diff_additions: self.diff_additions.clone(),
            next_sequence: self.next_sequence,
        }
    }

    pub fn lock_rules(&self) {
        self.base_locked.set(true);
    }

    /// Drops every base rule and every diff entry, leaving an empty
    /// ruleset with the same (now-empty, unlocked) base identity.
    pub fn clear_all(&mut self) {
        self.base = Rc::new(Vec::new());
        self.base_locked = Rc::new(Cell::new(false));
        self.diff_map.clear();
        self.diff_additions.clear();
        self.next_sequence = 0;
    }

    /// `true` iff `term` is a ground fact currently visible in this
    /// ruleset (from the base, or asserted at runtime and not since
    /// retracted).
    pub fn has_fact(&self, term: &Term) -> bool {
        let key = Rule::new(term.clone(), Vec::new()).key();
        match self.diff_map.get(&key) {
            Some(DiffState::Added { .. }) => true,
            Some(DiffState::Deleted) => false,
            None => self.base.iter().any(|r| r.is_fact() && r.key() == key),
        }
    }

    /// `true` iff some currently-visible rule's head has the same functor
    /// name and arity as `term` (ignoring argument content) — used by
    /// `retractall/1` and by domain sanity checks.
    pub fn has_equivalent_rule(&self, term: &Term) -> bool {
        let (name, arity) = (term.functor().unwrap_or(""), term.arity());
        self.all_rules_iter().any(|(_, rule)| rule.head_signature() == (name, arity))
    }

    /// Visits every currently-visible rule, in document order followed by
    /// runtime-assertion order (`spec.md` §4.2's ordering guarantee).
    pub fn all_rules(&self, mut visitor: impl FnMut(RuleKey, &Rule)) {
        for (key, rule) in self.all_rules_iter() {
            visitor(key, rule);
        }
    }

    /// As [`RuleSet::all_rules`], but skips any rule whose head cannot
    /// possibly unify with `target` by a cheap, index-free shape check:
    /// different constant names, a constant against a compound, or
    /// compounds with different functor/arity never unify and are
    /// rejected before a real unification attempt is made.
    pub fn all_rules_that_could_unify(&self, target: &Term, mut visitor: impl FnMut(RuleKey, &Rule)) {
        for (key, rule) in self.all_rules_iter() {
            if shapes_compatible(target, rule.head()) {
                visitor(key, rule);
            }
        }
    }

    fn all_rules_iter(&self) -> impl Iterator<Item = (RuleKey, &Rule)> {
        let base_iter = self.base.iter().enumerate().filter_map(move |(i, rule)| {
            if rule.is_fact() && self.diff_map.contains_key(&rule.key()) {
                None
            } else {
                Some((RuleKey::Base(i), rule))
            }
        });
        let diff_iter = self.diff_additions.iter().enumerate().filter_map(move |(i, (key, sequence, rule))| {
            match self.diff_map.get(key) {
                Some(DiffState::Added { sequence: current }) if current == sequence => {
                    Some((RuleKey::Diff(i), rule))
                }
                _ => None,
            }
        });
        base_iter.chain(diff_iter)
    }

    /// Renders every currently-visible fact (rules with an empty tail),
    /// one per line, in enumeration order — used by the CLI's `listing`
    /// convenience and by diagnostics.
    pub fn to_string_facts(&self) -> String {
        let mut out = String::new();
        self.all_rules(|_, rule| {
            if rule.is_fact() {
                out.push_str(&rule.to_string());
                out.push('\n');
            }
        });
        out
    }
}

impl Clone for RuleSet {
    fn clone(&self) -> Self {
        self.create_copy()
    }
}

/// A cheap, conservative "could these unify?" shape check, used as an
/// index-free pre-filter before a real unification attempt (`spec.md`
/// §4.2). Never gives a false negative: anything this accepts still has
/// to pass real unification, but anything it rejects provably cannot
/// unify.
fn shapes_compatible(a: &Term, b: &Term) -> bool {
    use crate::term::TermKind;
    match (a.kind(), b.kind()) {
        (TermKind::Variable { .. }, _) | (_, TermKind::Variable { .. }) => true,
        (TermKind::Constant { name: n1 }, TermKind::Constant { name: n2 }) => n1 == n2,
        (TermKind::Constant { .. }, TermKind::Compound { .. }) => false,
        (TermKind::Compound { .. }, TermKind::Constant { .. }) => false,
        (TermKind::Compound { functor: f1, args: a1 }, TermKind::Compound { functor: f2, args: a2 }) => {
            f1 == f2 && a1.len() == a2.len()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::TermFactory;

    #[test]
    fn order_preservation_on_delete_and_readd() {
        let factory = TermFactory::new();
        let mut rules = RuleSet::new();
        let a = factory.create_constant("a");
        let b = factory.create_constant("b");
        let c = factory.create_constant("c");
        rules.add_rule(a.clone(), vec![]).unwrap();
        rules.add_rule(b.clone(), vec![]).unwrap();
        rules.add_rule(c.clone(), vec![]).unwrap();

        rules.update(&[b.clone()], &[]).unwrap();
        rules.update(&[], &[b.clone()]).unwrap();

        let mut seen = Vec::new();
        rules.all_rules(|_, rule| seen.push(rule.head().to_string()));
        assert_eq!(seen, vec!["a", "c", "b"]);
    }

    #[test]
    fn retract_nonexistent_fails_softly() {
        let factory = TermFactory::new();
        let mut rules = RuleSet::new();
        let missing = factory.create_constant("missing");
        assert_eq!(rules.update(&[missing], &[]).unwrap(), false);
    }

    #[test]
    fn assert_duplicate_is_a_contract_violation() {
        let factory = TermFactory::new();
        let mut rules = RuleSet::new();
        let a = factory.create_constant("a");
        rules.add_rule(a.clone(), vec![]).unwrap();
        assert!(rules.update(&[], &[a]).is_err());
    }

    #[test]
    fn copy_locks_base_against_further_additions() {
        let factory = TermFactory::new();
        let mut rules = RuleSet::new();
        let a = factory.create_constant("a");
        let _copy = rules.create_copy();
        assert!(rules.add_rule(a, vec![]).is_err());
    }
}
