//! [`RuleKey`]: distinguishes a rule's storage class by key shape rather
//! than by a uniform index, mirroring the teacher's `ClauseKey` enum
//! (`db::keys::ClauseKey`) distinguishing original clauses from additions.

/// Where a [`Rule`](crate::rule::Rule) currently lives within a
/// [`RuleSet`](super::RuleSet): in the shared, compile-time base, or in
/// this instance's runtime fact diff.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RuleKey {
    /// An index into the shared base rule vector.
    Base(usize),
    /// An index into this instance's diff-addition list.
    Diff(usize),
}
