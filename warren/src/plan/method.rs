//! [`Method`]: a named task-decomposition rule. A method's `condition` is
//! checked by the resolver; its `tasks` are a further decomposition of the
//! method's `head` task, substituted by whatever the condition's solution
//! bound (`spec.md` §4.5).

use crate::term::Term;

/// How a method's condition solutions are turned into sub-plans
/// (`spec.md` §4.5 step 4). `Try` is listed here only because the source
/// spec enumerates it alongside the others; it is never attached to a
/// declared method — see [`crate::plan::engine`]'s task-level handling of
/// `try(...)` instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MethodType {
    /// Each condition solution is tried as an independent alternative;
    /// the first (in search order) whose sub-tasks plan successfully wins
    /// this branch.
    Normal,
    /// Every condition solution's sub-tasks are planned independently;
    /// the method succeeds if at least one does, keeping every
    /// alternative's full plan combined into one.
    AnyOf,
    /// Every condition solution's sub-tasks must plan successfully; their
    /// operator sequences are concatenated into a single plan.
    AllOf,
    /// Fires only if every non-`Else` method declared for this head
    /// failed to produce a plan for the current task.
    Else,
}

/// A single `head :- condition : tasks` decomposition rule.
#[derive(Clone)]
pub struct Method {
    pub head: Term,
    pub condition: Vec<Term>,
    pub tasks: Vec<Term>,
    pub method_type: MethodType,
    /// Fires only if no earlier, non-default method declared for this
    /// head produced any plan.
    pub is_default: bool,
    /// Declaration order, for the "methods are tried in the order they
    /// were declared" guarantee (`spec.md` §4.5).
    pub document_order: u64,
}

impl Method {
    pub fn head_signature(&self) -> (&str, usize) {
        (self.head.functor().unwrap_or(""), self.head.arity())
    }
}
