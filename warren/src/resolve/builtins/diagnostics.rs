//! Diagnostics built-ins: `failureContext/1` and `showTraces/1`, both of
//! which always succeed and exist purely for their side effect on what a
//! host later sees in [`crate::reports::FailureDiagnostics`] or in trace
//! output (`spec.md` §4.4, §6).

use crate::dispatch::{send, Dispatch, TraceCategory, TraceDetail};
use crate::term::Term;
use crate::unify::Unifier;

use super::{BuiltinContext, Outcome};

/// `failureContext/1`: records `args[0]` as a context term, both as a
/// trace event (so a host watching `TraceCategory::Resolve` sees it at the
/// point it was set) and appended to the current branch's context list,
/// which [`crate::resolve::engine::step`] carries forward into
/// [`crate::reports::FailureDiagnostics::context`] if a failure occurs
/// further down this branch (`spec.md` §4.4).
pub(super) fn failure_context_builtin(ctx: &mut BuiltinContext, args: &[Term]) -> Outcome {
    send(
        ctx.sink,
        Dispatch::Trace {
            category: TraceCategory::Resolve,
            detail: TraceDetail::Low,
            message: format!("failureContext: {}", args[0]),
        },
    );
    Outcome::SucceedWithContext(Unifier::new(), args.to_vec())
}

/// `showTraces/1`: emits a marker trace event at `TraceCategory::Builtins`
/// so a host can bracket a region of a run in its own log.
pub(super) fn show_traces_builtin(ctx: &mut BuiltinContext, args: &[Term]) -> Outcome {
    send(
        ctx.sink,
        Dispatch::Trace {
            category: TraceCategory::Builtins,
            detail: TraceDetail::Low,
            message: format!("showTraces: {}", args[0]),
        },
    );
    Outcome::Succeed(Unifier::new())
}
