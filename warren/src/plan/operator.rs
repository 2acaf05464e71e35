//! [`Operator`]: a primitive, directly-applicable task.

use crate::term::Term;

/// A primitive HTN task: applying it substitutes its matching unifier
/// into `add_list`/`delete_list` and calls
/// [`RuleSet::update`](crate::ruleset::RuleSet::update) on a freshly
/// cloned world state (`spec.md` §4.5).
#[derive(Clone)]
pub struct Operator {
    pub head: Term,
    pub add_list: Vec<Term>,
    pub delete_list: Vec<Term>,
    /// A hidden operator mutates the world state but never appears in
    /// the emitted plan's operator sequence.
    pub hidden: bool,
}

impl Operator {
    pub fn head_signature(&self) -> (&str, usize) {
        (self.head.functor().unwrap_or(""), self.head.arity())
    }
}
