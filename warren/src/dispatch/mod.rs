/*!
Dispatches for external observers.

A [`Dispatch`] is a small, typed message describing something the
resolver or planner is doing — a trace event, or output from `write`/
`writeln`/`nl`/`print`. Dispatches are sent through an optional sink
(`Option<Rc<dyn Fn(Dispatch)>>`, see [`Sink`]) handed in by the host via
[`crate::config::Config`]; nothing is ever printed or logged directly by
the engine itself.

This mirrors the teacher's own `dispatch`/`Dispatch`/`Report` hierarchy
(`dispatch::mod`) — a dispatch-as-callback design that keeps every
diagnostic concern out of the core algorithm's control flow, just with
the SAT solver's clause/BCP deltas replaced by this engine's trace
categories and I/O built-ins.
*/

use std::rc::Rc;

/// A sink a host hands the engine to receive [`Dispatch`]es. Checking for
/// `Some` before building a `Dispatch` keeps the overhead of an unused
/// sink to one branch, matching the teacher's dispatch macros' stated
/// design goal.
pub type Sink = Rc<dyn Fn(Dispatch)>;

/// The category a [`Dispatch::Trace`] belongs to, corresponding to the
/// log targets documented in [`crate::misc::log`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TraceCategory {
    Term,
    Ruleset,
    Unify,
    Resolve,
    Builtins,
    Plan,
}

/// How detailed a trace message is; a host's trace filter is a bitmask
/// over [`TraceCategory`] combined with a minimum [`TraceDetail`]
/// (`spec.md` §6's "global trace filter... bitmask over trace categories
/// × a detail level").
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TraceDetail {
    Low,
    Medium,
    High,
}

/// A message sent to a host-supplied [`Sink`].
#[derive(Clone, Debug)]
pub enum Dispatch {
    /// A diagnostic trace event.
    Trace { category: TraceCategory, detail: TraceDetail, message: String },
    /// Output from the `write/1`, `writeln/1`, `nl/0`, or `print/N`
    /// built-ins. Variables print as their current (internal, prefixed)
    /// name — no unification happens on this path (`spec.md` §4.4).
    Write(String),
}

/// A trace filter: a set of enabled categories and a minimum detail
/// level, gating which [`Dispatch::Trace`] messages actually reach the
/// sink. Scoped to one resolver/planner run rather than process-global,
/// per `spec.md` §9's warning against true globals.
#[derive(Clone, Debug)]
pub struct TraceFilter {
    categories: Vec<TraceCategory>,
    minimum_detail: TraceDetail,
}

impl Default for TraceFilter {
    fn default() -> Self {
        Self { categories: Vec::new(), minimum_detail: TraceDetail::Low }
    }
}

impl TraceFilter {
    pub fn all(minimum_detail: TraceDetail) -> Self {
        Self {
            categories: vec![
                TraceCategory::Term,
                TraceCategory::Ruleset,
                TraceCategory::Unify,
                TraceCategory::Resolve,
                TraceCategory::Builtins,
                TraceCategory::Plan,
            ],
            minimum_detail,
        }
    }

    pub fn enabled(&self, category: TraceCategory, detail: TraceDetail) -> bool {
        detail >= self.minimum_detail && self.categories.contains(&category)
    }
}

/// Sends `dispatch` through `sink` if present; the single call site every
/// built-in and procedure goes through, so the "is a sink attached" check
/// is written once.
pub fn send(sink: Option<&Sink>, dispatch: Dispatch) {
    if let Some(sink) = sink {
        sink(dispatch);
    }
}
