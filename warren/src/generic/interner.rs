//! A small generic string interner, used by [`TermFactory`](crate::term::TermFactory)
//! to deduplicate atom, functor, and variable names.
//!
//! This is deliberately separate from the *structural* interning the term
//! store does over whole terms: a string interner only ever grows (there is
//! no use-count to release a name on), so it needs none of the `Weak`
//! back-reference machinery the term store uses.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// Deduplicates `Rc<str>` values by content so that two equal names share
/// one allocation and can be compared by pointer.
#[derive(Default)]
pub struct StringInterner {
    pool: RefCell<HashSet<Rc<str>>>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self { pool: RefCell::new(HashSet::new()) }
    }

    /// Returns the canonical `Rc<str>` for `s`, inserting it if this is the
    /// first time this content has been seen.
    pub fn intern(&self, s: &str) -> Rc<str> {
        if let Some(existing) = self.pool.borrow().get(s) {
            return Rc::clone(existing);
        }
        let fresh: Rc<str> = Rc::from(s);
        self.pool.borrow_mut().insert(Rc::clone(&fresh));
        log::trace!(target: "warren::term::intern", "interned string `{s}` ({} total)", self.pool.borrow().len());
        fresh
    }

    pub fn len(&self) -> usize {
        self.pool.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.borrow().is_empty()
    }
}
