//! Standard order of terms: `Variable < Number < Atom < Compound`, with
//! numbers compared by value, atoms and variables by name, and compounds
//! first by arity, then functor name, then arguments left to right.
//!
//! Because every [`Term`] is structurally interned, content equality and
//! pointer identity coincide, so this comparator never contradicts
//! [`Term`]'s [`Eq`] impl: two terms compare equal here exactly when they
//! are the same interned object.

use std::cmp::Ordering;

use super::{ConstantClass, Term, TermKind};

/// Rank used as the first key of the comparison; variables sort before
/// numbers, numbers before atoms, atoms before compounds.
fn rank(term: &Term) -> u8 {
    match term.kind() {
        TermKind::Variable { .. } => 0,
        TermKind::Constant { name } => match ConstantClass::classify(name) {
            ConstantClass::Number => 1,
            ConstantClass::Atom => 2,
        },
        TermKind::Compound { .. } => 3,
    }
}

pub fn compare(a: &Term, b: &Term) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    match rank(a).cmp(&rank(b)) {
        Ordering::Equal => {}
        other => return other,
    }
    match (a.kind(), b.kind()) {
        (TermKind::Variable { generation: g1, .. }, TermKind::Variable { generation: g2, .. }) => {
            g1.cmp(g2)
        }
        (TermKind::Constant { name: n1 }, TermKind::Constant { name: n2 }) => {
            match (n1.parse::<f64>(), n2.parse::<f64>()) {
                (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                _ => n1.as_ref().cmp(n2.as_ref()),
            }
        }
        (
            TermKind::Compound { functor: f1, args: a1 },
            TermKind::Compound { functor: f2, args: a2 },
        ) => a1
            .len()
            .cmp(&a2.len())
            .then_with(|| f1.as_ref().cmp(f2.as_ref()))
            .then_with(|| {
                for (x, y) in a1.iter().zip(a2.iter()) {
                    match compare(x, y) {
                        Ordering::Equal => continue,
                        other => return other,
                    }
                }
                Ordering::Equal
            }),
        _ => unreachable!("rank() already separated the kinds"),
    }
}
