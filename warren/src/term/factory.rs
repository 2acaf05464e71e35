//! [`TermFactory`]: term construction, structural interning, and the
//! `out_of_memory` latch.

use std::cell::{Cell, OnceCell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::generic::StringInterner;

use super::arithmetic::{format_number, Number};
use super::{Term, TermData, TermKind};

/// Tag bytes distinguishing the three [`super::TermKind`] shapes in a
/// structural key, so a variable, a constant, and a compound never collide
/// even if built from the same underlying name.
const TAG_VARIABLE: u8 = 0;
const TAG_CONSTANT: u8 = 1;
const TAG_COMPOUND: u8 = 2;

pub(crate) struct FactoryInner {
    strings: StringInterner,
    /// Structural-key → term table. Entries are `Weak` so an interned term
    /// can be garbage-collected the moment nothing else references it; a
    /// dead entry is simply replaced the next time that key is requested.
    terms: RefCell<HashMap<Rc<[u8]>, Weak<TermData>>>,
    /// Per-name generation assigned the first time an ordinary (non
    /// don't-care) variable name is seen, so repeated requests for the
    /// same name after the term has been dropped still sort consistently.
    variable_generations: RefCell<HashMap<Rc<str>, u64>>,
    next_generation: Cell<u64>,
    out_of_memory: Cell<bool>,
}

/// Terms are immutable, structurally-interned, and owned by exactly one
/// factory for their whole life. See the [module docs](super) for the
/// full model.
#[derive(Clone)]
pub struct TermFactory(Rc<FactoryInner>);

impl Default for TermFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl TermFactory {
    pub fn new() -> Self {
        TermFactory(Rc::new(FactoryInner {
            strings: StringInterner::new(),
            terms: RefCell::new(HashMap::new()),
            variable_generations: RefCell::new(HashMap::new()),
            next_generation: Cell::new(0),
            out_of_memory: Cell::new(false),
        }))
    }

    pub(super) fn from_inner(inner: Rc<FactoryInner>) -> Self {
        TermFactory(inner)
    }

    /// `true` once [`crate::resolve::GoalResolver`] or
    /// [`crate::plan::HtnPlanner`] has exceeded the caller's memory budget
    /// during a call that used this factory; latched, never cleared
    /// automatically (see `spec.md` §7).
    pub fn out_of_memory(&self) -> bool {
        self.0.out_of_memory.get()
    }

    pub fn set_out_of_memory(&self, value: bool) {
        self.0.out_of_memory.set(value);
    }

    /// A rough estimate, in bytes, of the live terms and interned strings
    /// this factory holds — one input to the resolver/planner's memory
    /// budget accounting (`spec.md` §4.4 "Memory accounting").
    pub fn dynamic_size(&self) -> usize {
        let term_count = self.0.terms.borrow().len();
        let string_bytes: usize = self.0.strings.len() * 48;
        term_count * 96 + string_bytes
    }

    fn next_generation(&self) -> u64 {
        let g = self.0.next_generation.get();
        self.0.next_generation.set(g + 1);
        g
    }

    fn intern_string(&self, name: &str) -> Rc<str> {
        self.0.strings.intern(name)
    }

    fn key_for_identity(tag: u8, ptr: usize) -> Rc<[u8]> {
        let mut bytes = Vec::with_capacity(1 + std::mem::size_of::<usize>());
        bytes.push(tag);
        bytes.extend_from_slice(&ptr.to_le_bytes());
        Rc::from(bytes.into_boxed_slice())
    }

    fn make_term(&self, kind: TermKind, key: Rc<[u8]>, interned: bool) -> Term {
        if interned {
            if let Some(existing) = self.0.terms.borrow().get(&key).and_then(Weak::upgrade) {
                return Term(existing);
            }
        }
        let data = Rc::new(TermData {
            kind,
            factory: Rc::downgrade(&self.0),
            key: Rc::clone(&key),
            interned,
            display_cache: OnceCell::new(),
        });
        if interned {
            self.0.terms.borrow_mut().insert(key, Rc::downgrade(&data));
            log::trace!(
                target: "warren::term::intern",
                "interned term (table now {} entries)",
                self.0.terms.borrow().len()
            );
        }
        Term(data)
    }

    /// Creates a variable term. Names beginning with `_` ("don't care",
    /// per `spec.md` §3) are never interned: every call with such a name
    /// produces a textually-distinct fresh variable, even if the name is
    /// identical to a previous call's.
    pub fn create_variable(&self, name: &str) -> Term {
        let interned_name = self.intern_string(name);
        if name.starts_with('_') {
            let generation = self.next_generation();
            let key = Self::key_for_identity(TAG_VARIABLE, generation as usize);
            return self.make_term(
                TermKind::Variable { name: interned_name, generation },
                key,
                false,
            );
        }
        let generation = *self
            .0
            .variable_generations
            .borrow_mut()
            .entry(Rc::clone(&interned_name))
            .or_insert_with(|| self.next_generation());
        let key = Self::key_for_identity(TAG_VARIABLE, Rc::as_ptr(&interned_name) as *const () as usize);
        self.make_term(TermKind::Variable { name: interned_name, generation }, key, true)
    }

    pub fn create_constant(&self, name: &str) -> Term {
        let interned_name = self.intern_string(name);
        let key = Self::key_for_identity(TAG_CONSTANT, Rc::as_ptr(&interned_name) as *const () as usize);
        self.make_term(TermKind::Constant { name: interned_name }, key, true)
    }

    pub(crate) fn create_number(&self, n: Number) -> Term {
        self.create_constant(&format_number(n))
    }

    /// Creates a functor applied to `args`. An empty `args` collapses to
    /// [`TermFactory::create_constant`], matching `spec.md` §3's "arity-0
    /// compound is equivalent to a Constant".
    pub fn create_functor(&self, name: &str, args: Vec<Term>) -> Term {
        if args.is_empty() {
            return self.create_constant(name);
        }
        let interned_name = self.intern_string(name);
        let all_interned = args.iter().all(Term::is_interned);
        let mut bytes = vec![TAG_COMPOUND];
        bytes.extend_from_slice(&(Rc::as_ptr(&interned_name) as *const () as usize).to_le_bytes());
        bytes.extend_from_slice(&args.len().to_le_bytes());
        for arg in &args {
            bytes.extend_from_slice(&arg.key().len().to_le_bytes());
            bytes.extend_from_slice(arg.key());
        }
        let key: Rc<[u8]> = Rc::from(bytes.into_boxed_slice());
        self.make_term(
            TermKind::Compound { functor: interned_name, args },
            key,
            all_interned,
        )
    }

    /// Builds a right-nested `.(Head, Tail)` list terminated by `[]`.
    pub fn create_list(&self, elements: Vec<Term>) -> Term {
        let mut list = self.empty_list();
        for element in elements.into_iter().rev() {
            list = self.create_functor(".", vec![element, list]);
        }
        list
    }

    pub fn empty_list(&self) -> Term {
        self.create_constant("[]")
    }

    pub fn true_(&self) -> Term {
        self.create_constant("true")
    }

    pub fn false_(&self) -> Term {
        self.create_constant("false")
    }
}

impl std::fmt::Debug for TermFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TermFactory")
            .field("terms", &self.0.terms.borrow().len())
            .field("strings", &self.0.strings.len())
            .field("out_of_memory", &self.out_of_memory())
            .finish()
    }
}
