//! Arithmetic evaluation over [`Term`]s.
//!
//! Numbers have no dedicated [`TermKind`] variant: a constant is numeric
//! exactly when its name parses as a [`Number`] (see [`ConstantClass`]),
//! mirroring how the source language this engine descends from represents
//! numbers as plain atoms that happen to look numeric. The recognised
//! operators are table-driven ([`ArithOp`]) rather than hand-dispatched, so
//! that the resolver's loop-detection pre-pass and arity checks can consult
//! the same table `eval` does.

use std::rc::Rc;

use super::{Term, TermFactory, TermKind};

/// Which of the two numeric-looking shapes a constant is, for standard-order
/// comparison and for deciding whether arithmetic may treat it as a number.
pub enum ConstantClass {
    Number,
    Atom,
}

impl ConstantClass {
    pub fn classify(name: &str) -> Self {
        if classify_number(name).is_some() {
            ConstantClass::Number
        } else {
            ConstantClass::Atom
        }
    }
}

/// A parsed numeric constant, keeping integer and float apart so that
/// `+`/`-` can honour `spec.md` §4.1's "integer result type iff both
/// operands are integer" rule rather than inferring type back out of an
/// `f64`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Integer(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(self, Number::Integer(_))
    }
}

/// Parses `name` as a [`Number`], preferring [`Number::Integer`] when the
/// text has no fractional or exponent marker so that `"6"` and `"6.0"`
/// classify differently even though they compare numerically equal.
fn classify_number(name: &str) -> Option<Number> {
    if !name.contains(['.', 'e', 'E']) {
        if let Ok(i) = name.parse::<i64>() {
            return Some(Number::Integer(i));
        }
    }
    name.parse::<f64>().ok().map(Number::Float)
}

/// The arithmetic/comparison operators recognised in functor position,
/// keyed by `(name, arity)`. Kept as one table (rather than matched
/// ad-hoc in [`eval`]) so the resolver's domain sanity pass and built-in
/// arity checks can share it, per `spec.md` §9's "Built-in dispatch"
/// design note.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithOp {
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
    Add,
    Sub,
    Mul,
    Div,
    Min,
    Max,
    Abs,
    Float,
    Integer,
}

const TABLE: &[(&str, usize, ArithOp)] = &[
    ("=", 2, ArithOp::Eq),
    (">", 2, ArithOp::Gt),
    (">=", 2, ArithOp::Ge),
    ("<", 2, ArithOp::Lt),
    ("=<", 2, ArithOp::Le),
    ("+", 2, ArithOp::Add),
    ("-", 2, ArithOp::Sub),
    ("*", 2, ArithOp::Mul),
    ("/", 2, ArithOp::Div),
    ("min", 2, ArithOp::Min),
    ("max", 2, ArithOp::Max),
    ("abs", 1, ArithOp::Abs),
    ("float", 1, ArithOp::Float),
    ("integer", 1, ArithOp::Integer),
];

impl ArithOp {
    pub fn lookup(functor: &str, arity: usize) -> Option<ArithOp> {
        TABLE
            .iter()
            .find(|(name, ar, _)| *name == functor && *ar == arity)
            .map(|(_, _, op)| *op)
    }

    pub fn is_comparator(self) -> bool {
        matches!(self, ArithOp::Eq | ArithOp::Gt | ArithOp::Ge | ArithOp::Lt | ArithOp::Le)
    }
}

/// Evaluates `term` as an arithmetic expression, returning the resulting
/// number as a freshly interned constant, or `None` if `term` contains an
/// unbound variable, a non-numeric constant, or an unrecognised functor in
/// operator position.
///
/// Comparators (`=`, `>`, `>=`, `<`, `=<`) evaluate to [`TermFactory::true_`]
/// or [`TermFactory::false_`] rather than a number, matching `spec.md`
/// §3's "eval... returns `true`/`false` for comparators".
///
/// Callers are expected to have already applied the current unifier to
/// `term` (see [`crate::resolve::builtins::core::is_builtin`]), so that a
/// bound variable appears here as whatever it was bound to.
pub fn eval(factory: &TermFactory, term: &Term) -> Option<Term> {
    match term.kind() {
        TermKind::Variable { .. } => None,
        TermKind::Constant { name } => match classify_number(name) {
            Some(_) => Some(term.clone()),
            None => None,
        },
        TermKind::Compound { functor, args } => {
            let op = ArithOp::lookup(functor, args.len())?;
            eval_op(factory, op, args)
        }
    }
}

fn eval_op(factory: &TermFactory, op: ArithOp, args: &[Term]) -> Option<Term> {
    if op.is_comparator() {
        let result = compare_numeric(factory, op, &args[0], &args[1])?;
        return Some(if result { factory.true_() } else { factory.false_() });
    }
    match (op, args) {
        (ArithOp::Add, [a, b]) => binary(factory, a, b, |x, y| x + y, |x, y| x + y),
        (ArithOp::Sub, [a, b]) => binary(factory, a, b, |x, y| x - y, |x, y| x - y),
        (ArithOp::Mul, [a, b]) => binary(factory, a, b, |x, y| x * y, |x, y| x * y),
        (ArithOp::Div, [a, b]) => {
            let x = as_number(factory, a)?;
            let y = as_number(factory, b)?;
            Some(factory.create_number(Number::Float(x.as_f64() / y.as_f64())))
        }
        (ArithOp::Min, [a, b]) => binary(factory, a, b, i64::min, f64::min),
        (ArithOp::Max, [a, b]) => binary(factory, a, b, i64::max, f64::max),
        (ArithOp::Abs, [a]) => {
            let x = as_number(factory, a)?;
            Some(match x {
                Number::Integer(i) => factory.create_number(Number::Integer(i.abs())),
                Number::Float(f) => factory.create_number(Number::Float(f.abs())),
            })
        }
        (ArithOp::Float, [a]) => {
            let x = as_number(factory, a)?;
            Some(factory.create_number(Number::Float(x.as_f64())))
        }
        (ArithOp::Integer, [a]) => {
            let x = as_number(factory, a)?;
            Some(factory.create_number(Number::Integer(x.as_f64().trunc() as i64)))
        }
        _ => None,
    }
}

fn as_number(factory: &TermFactory, term: &Term) -> Option<Number> {
    let evaluated = eval(factory, term)?;
    match evaluated.kind() {
        TermKind::Constant { name } => classify_number(name),
        _ => None,
    }
}

fn binary(
    factory: &TermFactory,
    a: &Term,
    b: &Term,
    int_op: impl FnOnce(i64, i64) -> i64,
    float_op: impl FnOnce(f64, f64) -> f64,
) -> Option<Term> {
    let x = as_number(factory, a)?;
    let y = as_number(factory, b)?;
    Some(match (x, y) {
        (Number::Integer(i), Number::Integer(j)) => factory.create_number(Number::Integer(int_op(i, j))),
        _ => factory.create_number(Number::Float(float_op(x.as_f64(), y.as_f64()))),
    })
}

/// The numeric relational operators, used directly by the resolver's
/// comparison built-ins as well as by [`eval`] for `=/2`, `>/2`, etc. in
/// operator position.
pub fn compare_numeric(factory: &TermFactory, op: ArithOp, a: &Term, b: &Term) -> Option<bool> {
    let x = as_number(factory, a)?;
    let y = as_number(factory, b)?;
    let (x, y) = (x.as_f64(), y.as_f64());
    Some(match op {
        ArithOp::Eq => x == y,
        ArithOp::Gt => x > y,
        ArithOp::Ge => x >= y,
        ArithOp::Lt => x < y,
        ArithOp::Le => x <= y,
        _ => return None,
    })
}

/// Catches the common typo of writing a C-style relational operator where
/// Prolog's own spelling is expected (`spec.md` §4.1), so the contract
/// violation the resolver raises can name the fix instead of just
/// reporting "unrecognised functor".
pub fn suggest_for_unknown_operator(op: &str) -> Option<&'static str> {
    match op {
        "<=" => Some("=<"),
        "=>" => Some(">="),
        _ => None,
    }
}

/// If `term` is a 2-ary compound whose functor is one of the C-style typos
/// [`suggest_for_unknown_operator`] recognises, the functor and its
/// suggested replacement — for callers on the arithmetic/`is` dispatch
/// path to raise as a fatal [`crate::types::err::ContractViolation`]
/// (`spec.md` §4.1, §7) rather than letting the goal fall through to an
/// ordinary "no rule unifies" failure.
pub fn detect_operator_typo(term: &Term) -> Option<(&str, &'static str)> {
    match term.kind() {
        TermKind::Compound { functor, args } if args.len() == 2 => {
            suggest_for_unknown_operator(functor).map(|suggested| (functor.as_ref(), suggested))
        }
        _ => None,
    }
}

/// Formats a string for interning into a numeric constant, used by
/// [`TermFactory::create_number`].
pub(crate) fn format_number(n: Number) -> Rc<str> {
    match n {
        Number::Integer(i) => Rc::from(i.to_string()),
        Number::Float(f) => Rc::from(f.to_string()),
    }
}
