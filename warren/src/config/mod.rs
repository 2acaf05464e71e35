/*!
Host-tunable knobs shared by the resolver and the planner.

Follows the same shape the rest of this crate's ancestry uses for
configuration: a handful of [`ConfigOption`] fields with documented ranges
and defaults, assembled into one [`Config`] the host builds once and passes
by reference into every query or plan search.
*/

mod config_option;

pub use config_option::{ConfigOption, ConfigOptionError};

/// Tunables for a [`GoalResolver`](crate::resolve::GoalResolver) or
/// [`HtnPlanner`](crate::plan::HtnPlanner) run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Soft ceiling, in bytes, on the estimated footprint of live terms plus
    /// the resolver/planner node stack. Checked once per outer-loop
    /// iteration; crossing it ends the search with
    /// [`ErrorKind::OutOfMemory`](crate::types::err::ErrorKind::OutOfMemory)
    /// rather than growing without bound.
    pub memory_budget: ConfigOption<usize>,

    /// Recursion guard for HTN task decomposition: the maximum number of
    /// nested method expansions before the planner gives up on a branch as
    /// a (likely) infinite loop rather than a genuine [`PlanFailure`](crate::types::err::PlanFailure::TaskLoop).
    pub htn_depth_guard: ConfigOption<usize>,

    /// When `true`, [`ErrorKind::ResolutionFailure`](crate::types::err::ErrorKind::ResolutionFailure)
    /// and [`ErrorKind::PlanFailure::NoPlanFound`](crate::types::err::PlanFailure::NoPlanFound)
    /// are returned as `Err` from `resolve_all`/`find_all_plans`. When
    /// `false` (the default), an empty solution/plan list is returned as
    /// `Ok` instead — "no solutions" is not automatically an error.
    pub fail_fast_as_exception: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            memory_budget: ConfigOption::new("memory_budget", 1 << 16, 1 << 34, 1 << 28),
            htn_depth_guard: ConfigOption::new("htn_depth_guard", 8, 1 << 20, 4096),
            fail_fast_as_exception: false,
        }
    }
}
