//! Output and atom-manipulation built-ins. `write`/`writeln`/`nl`/`print`
//! never print directly; they send a [`crate::dispatch::Dispatch::Write`]
//! through the host's sink, if one is attached (`spec.md` §4.4, §6).

use crate::dispatch::{send, Dispatch};
use crate::term::{ConstantClass, Term, TermKind};
use crate::unify::Unifier;

use super::{BuiltinContext, Outcome};

pub(super) fn write_builtin(ctx: &mut BuiltinContext, args: &[Term]) -> Outcome {
    send(ctx.sink, Dispatch::Write(args[0].to_string()));
    Outcome::Succeed(Unifier::new())
}

pub(super) fn writeln_builtin(ctx: &mut BuiltinContext, args: &[Term]) -> Outcome {
    send(ctx.sink, Dispatch::Write(format!("{}\n", args[0])));
    Outcome::Succeed(Unifier::new())
}

pub(super) fn nl_builtin(ctx: &mut BuiltinContext, _args: &[Term]) -> Outcome {
    send(ctx.sink, Dispatch::Write("\n".to_string()));
    Outcome::Succeed(Unifier::new())
}

/// `print/N`: writes every argument in turn, space-separated, followed by
/// a newline — the CLI's convenience predicate for inspecting several
/// values from one goal.
pub(super) fn print_builtin(ctx: &mut BuiltinContext, args: &[Term]) -> Outcome {
    let rendered: Vec<String> = args.iter().map(Term::to_string).collect();
    send(ctx.sink, Dispatch::Write(format!("{}\n", rendered.join(" "))));
    Outcome::Succeed(Unifier::new())
}

/// `atomic/1`: succeeds iff the argument is a constant (atom or number),
/// never a variable or compound.
pub(super) fn atomic_builtin(_ctx: &mut BuiltinContext, args: &[Term]) -> Outcome {
    if matches!(args[0].kind(), TermKind::Constant { .. }) {
        Outcome::Succeed(Unifier::new())
    } else {
        Outcome::Fail
    }
}

/// `atom_chars/2`: unifies `args[1]` with the list of single-character
/// atoms making up `args[0]`'s name. Two-way, per `spec.md` §4.4: if
/// `args[0]` is a variable but `args[1]` is a proper list of
/// single-character atoms, the atom they spell out is built instead and
/// unified with `args[0]`.
pub(super) fn atom_chars_builtin(ctx: &mut BuiltinContext, args: &[Term]) -> Outcome {
    if let Some(name) = args[0].functor() {
        let chars: Vec<Term> = name.chars().map(|c| ctx.factory.create_constant(&c.to_string())).collect();
        let list = ctx.factory.create_list(chars);
        return super::core::unify_builtin(ctx, &[args[1].clone(), list]);
    }
    let Some(elements) = args[1].list_elements() else { return Outcome::Fail };
    let mut name = String::new();
    for element in &elements {
        match element.functor() {
            Some(c) => name.push_str(c),
            None => return Outcome::Fail,
        }
    }
    let atom = ctx.factory.create_constant(&name);
    super::core::unify_builtin(ctx, &[args[0].clone(), atom])
}

/// `atom_concat/3`: unifies `args[2]` with the atom formed by
/// concatenating `args[0]` and `args[1]`'s names.
pub(super) fn atom_concat_builtin(ctx: &mut BuiltinContext, args: &[Term]) -> Outcome {
    let (Some(a), Some(b)) = (args[0].functor(), args[1].functor()) else { return Outcome::Fail };
    let joined = ctx.factory.create_constant(&format!("{a}{b}"));
    super::core::unify_builtin(ctx, &[args[2].clone(), joined])
}

/// `downcase_atom/2`: unifies `args[1]` with `args[0]`'s name lower-cased.
/// A numeric constant lower-cases to itself, per [`ConstantClass`].
pub(super) fn downcase_atom_builtin(ctx: &mut BuiltinContext, args: &[Term]) -> Outcome {
    let Some(name) = args[0].functor() else { return Outcome::Fail };
    let lowered = match ConstantClass::classify(name) {
        ConstantClass::Number => ctx.factory.create_constant(name),
        ConstantClass::Atom => ctx.factory.create_constant(&name.to_lowercase()),
    };
    super::core::unify_builtin(ctx, &[args[1].clone(), lowered])
}
