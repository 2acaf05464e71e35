/*!
The term model: an immutable, structurally-interned algebraic term type and
the [`TermFactory`] that creates and canonicalises it.

A [`Term`] is one of three shapes (see [`TermKind`]): a [`Variable`],
a [`Constant`] (whose textual form further classifies it, at inspection
time, as a number or an atom — see [`ConstantClass`]), or a [`Compound`]
(a functor applied to zero or more argument terms; arity-0 compounds are
never constructed, a bare name is always a [`Constant`]).

Every term is owned by exactly one [`TermFactory`] and is structurally
interned by it: two terms built from the same shape share one heap
allocation, so equality and hashing reduce to pointer identity. The
factory also interns the *strings* (variable/atom/functor names) terms
are built from, so that the structural interning key can compare names by
pointer rather than by content.

This module intentionally has no notion of rules, unification, or
resolution — see [`crate::rule`], [`crate::unify`], and [`crate::resolve`]
for those.
*/

mod arithmetic;
mod factory;
mod ordering;
mod rewrite;

pub use arithmetic::{
    compare_numeric, detect_operator_typo, eval, suggest_for_unknown_operator, ArithOp, ConstantClass, Number,
};
pub use factory::TermFactory;
pub use ordering::compare;
pub use rewrite::{
    make_variables_unique, make_variables_unique_many, remove_prefix_from_variables, rename_variables,
    resolve_arithmetic_terms, substitute, VariableMap,
};

use std::cell::OnceCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

use factory::FactoryInner;

/// A single, interned term.
///
/// Cloning a `Term` clones the underlying `Rc`, not the term itself — two
/// clones always refer to the same interned object. [`PartialEq`] and
/// [`Hash`] are implemented over that pointer, never over structure.
#[derive(Clone)]
pub struct Term(Rc<TermData>);

struct TermData {
    kind: TermKind,
    /// The owning factory, held weakly so the factory's drop doesn't wait
    /// on every term it ever produced, and so a term can unintern itself.
    factory: Weak<FactoryInner>,
    /// Structural key, used both to look this term up in the factory's
    /// intern table and, for compounds, to build a parent's key without
    /// re-walking already-keyed children. Always present, even for
    /// don't-care variables (which need a key to contribute to an
    /// enclosing compound's key) — `interned` is what actually gates
    /// table membership.
    key: Rc<[u8]>,
    /// Whether this term is registered in the factory's intern table.
    /// Don't-care variables (`_...`) are always `false`: each textual
    /// occurrence must be a distinct term, so they are deliberately
    /// excluded from interning.
    interned: bool,
    /// Lazily computed `Display` rendering, cached because the resolver's
    /// diagnostics and `write`/`writeln` built-ins print terms repeatedly.
    display_cache: OnceCell<String>,
}

/// The three shapes a [`Term`] can take.
///
/// There is no dedicated numeric variant: per `spec.md` §3, numbers are
/// `Constant`s whose name happens to parse as an `f64` (see
/// [`ConstantClass`]). This mirrors the source language this engine
/// descends from, where a term's textual form is examined at the point of
/// use rather than tagged at construction.
pub enum TermKind {
    /// A logic variable. `generation` is a factory-wide monotonic id used
    /// only to break ties in the standard term order ([`compare`]); it has
    /// no bearing on identity, which is always by interning (or, for
    /// don't-care variables, by the uniqueness of never being interned at
    /// all).
    Variable { name: Rc<str>, generation: u64 },
    /// A ground atom, integer, or float — disambiguated at inspection time
    /// via [`ConstantClass::classify`].
    Constant { name: Rc<str> },
    /// A functor applied to an ordered, non-empty argument list. A
    /// zero-argument "compound" is never constructed; [`TermFactory::create_functor`]
    /// with an empty argument vector returns a [`Constant`] instead.
    Compound { functor: Rc<str>, args: Vec<Term> },
}

impl Term {
    pub fn kind(&self) -> &TermKind {
        &self.0.kind
    }

    /// Whether this term is currently registered in its factory's
    /// structural intern table. Don't-care variables (`_...`) are always
    /// `false`: each textual occurrence must be a distinct term, so they
    /// are deliberately excluded from interning.
    pub fn is_interned(&self) -> bool {
        self.0.interned
    }

    /// The factory this term was created by, if it still exists.
    pub fn factory(&self) -> Option<TermFactory> {
        self.0.factory.upgrade().map(TermFactory::from_inner)
    }

    /// `true` iff this term contains no [`Variable`](TermKind::Variable)
    /// anywhere in its subtree.
    pub fn is_ground(&self) -> bool {
        match &self.0.kind {
            TermKind::Variable { .. } => false,
            TermKind::Constant { .. } => true,
            TermKind::Compound { args, .. } => args.iter().all(Term::is_ground),
        }
    }

    /// `true` iff this is a [`Constant`](TermKind::Constant) or
    /// [`Compound`](TermKind::Compound) recognised by [`eval`] as an
    /// arithmetic expression (a number, or a compound whose functor is one
    /// of the recognised arithmetic operators — see [`arithmetic`]).
    pub fn is_arithmetic(&self) -> bool {
        match &self.0.kind {
            TermKind::Variable { .. } => false,
            TermKind::Constant { name } => matches!(ConstantClass::classify(name), ConstantClass::Number),
            TermKind::Compound { functor, args } => {
                arithmetic::ArithOp::lookup(functor, args.len()).is_some()
            }
        }
    }

    pub fn functor(&self) -> Option<&str> {
        match &self.0.kind {
            TermKind::Constant { name } => Some(name),
            TermKind::Compound { functor, .. } => Some(functor),
            TermKind::Variable { .. } => None,
        }
    }

    pub fn arity(&self) -> usize {
        match &self.0.kind {
            TermKind::Compound { args, .. } => args.len(),
            _ => 0,
        }
    }

    pub fn args(&self) -> &[Term] {
        match &self.0.kind {
            TermKind::Compound { args, .. } => args,
            _ => &[],
        }
    }

    pub fn variable_name(&self) -> Option<&str> {
        match &self.0.kind {
            TermKind::Variable { name, .. } => Some(name),
            _ => None,
        }
    }

    /// `true` for a variable whose surface name begins with `_` — a
    /// "don't care" variable per `spec.md` §3: every textual occurrence is
    /// a fresh variable, never unified with another occurrence of the same
    /// name by virtue of sharing that name.
    pub fn is_dont_care(&self) -> bool {
        matches!(&self.0.kind, TermKind::Variable { name, .. } if name.starts_with('_'))
    }

    /// Whether this is the empty-list constant `[]`.
    pub fn is_empty_list(&self) -> bool {
        matches!(&self.0.kind, TermKind::Constant { name } if name.as_ref() == "[]")
    }

    /// If this is a list cell `.(Head, Tail)`, its head and tail.
    pub fn list_cell(&self) -> Option<(&Term, &Term)> {
        match &self.0.kind {
            TermKind::Compound { functor, args } if functor.as_ref() == "." && args.len() == 2 => {
                Some((&args[0], &args[1]))
            }
            _ => None,
        }
    }

    /// Decodes a proper list into a `Vec` of its elements, returning `None`
    /// if `self` is not `[]` or a chain of `.(_, _)` cells ending in `[]`.
    pub fn list_elements(&self) -> Option<Vec<Term>> {
        let mut out = Vec::new();
        let mut cursor = self.clone();
        loop {
            if cursor.is_empty_list() {
                return Some(out);
            }
            match cursor.list_cell() {
                Some((head, tail)) => {
                    out.push(head.clone());
                    cursor = tail.clone();
                }
                None => return None,
            }
        }
    }

    pub(crate) fn key(&self) -> &Rc<[u8]> {
        &self.0.key
    }

    /// Recursively walks the term's subtree, calling `visit` on every node
    /// (pre-order). Used by rewriting helpers and by diagnostics that need
    /// to enumerate every variable in a term.
    pub fn walk(&self, visit: &mut impl FnMut(&Term)) {
        visit(self);
        if let TermKind::Compound { args, .. } = &self.0.kind {
            for arg in args {
                arg.walk(visit);
            }
        }
    }

    /// Collects every distinct [`Variable`](TermKind::Variable) term
    /// reachable from `self`, in first-occurrence order, deduplicated by
    /// identity (so two occurrences of a don't-care variable — which are
    /// never identical — both appear).
    pub fn variables(&self) -> Vec<Term> {
        let mut found = Vec::new();
        self.walk(&mut |t| {
            if matches!(t.kind(), TermKind::Variable { .. }) && !found.iter().any(|f| f == t) {
                found.push(t.clone());
            }
        });
        found
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as usize).hash(state);
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(cached) = self.0.display_cache.get() {
            return write!(f, "{cached}");
        }
        let rendered = render(self);
        let _ = self.0.display_cache.set(rendered.clone());
        write!(f, "{rendered}")
    }
}

/// Renders a term in the canonical textual form documented in `spec.md`
/// §6: `?Name` for variables, `[]`/`[e1,e2,...]` for lists (flattened out
/// of their `.(_,_)` cons-cell form), `name(arg1,...)` for compounds, and
/// constants verbatim.
fn render(term: &Term) -> String {
    let mut out = String::new();
    render_into(term, &mut out);
    out
}

fn render_into(term: &Term, out: &mut String) {
    if term.is_empty_list() {
        out.push_str("[]");
        return;
    }
    if let Some((_, _)) = term.list_cell() {
        out.push('[');
        let mut cursor = term.clone();
        let mut first = true;
        loop {
            match cursor.list_cell() {
                Some((head, tail)) => {
                    if !first {
                        out.push(',');
                    }
                    first = false;
                    render_into(head, out);
                    cursor = tail.clone();
                }
                None => {
                    if !cursor.is_empty_list() {
                        out.push('|');
                        render_into(&cursor, out);
                    }
                    break;
                }
            }
        }
        out.push(']');
        return;
    }
    match term.kind() {
        TermKind::Variable { name, .. } => {
            out.push('?');
            out.push_str(name);
        }
        TermKind::Constant { name } => out.push_str(name),
        TermKind::Compound { functor, args } => {
            out.push_str(functor);
            out.push('(');
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                render_into(arg, out);
            }
            out.push(')');
        }
    }
}

/// Renders a term as the JSON variant documented in `spec.md` §6:
/// `{"<head>":[<args>...]}`. Reserved or uppercase-leading atoms and
/// variables are wrapped in single quotes; double-quoted string atoms
/// (whose stored name already includes the surrounding quotes) are passed
/// through unescaped beyond standard JSON string escaping.
pub fn to_json(term: &Term) -> String {
    let mut out = String::new();
    json_into(term, &mut out);
    out
}

fn json_atom_name(name: &str) -> String {
    let needs_quote = name.is_empty()
        || name.chars().next().map(|c| c.is_uppercase()).unwrap_or(false)
        || name.contains(|c: char| c.is_whitespace() || c == '\'');
    if needs_quote && !name.starts_with('"') {
        format!("'{name}'")
    } else {
        name.to_string()
    }
}

fn json_into(term: &Term, out: &mut String) {
    match term.kind() {
        TermKind::Variable { name, .. } => {
            out.push_str("{\"?");
            out.push_str(name);
            out.push_str("\":[]}");
        }
        TermKind::Constant { name } => {
            out.push_str("{\"");
            out.push_str(&json_atom_name(name).replace('"', "\\\""));
            out.push_str("\":[]}");
        }
        TermKind::Compound { functor, args } => {
            out.push_str("{\"");
            out.push_str(&json_atom_name(functor).replace('"', "\\\""));
            out.push_str("\":[");
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                json_into(arg, out);
            }
            out.push_str("]}");
        }
    }
}
