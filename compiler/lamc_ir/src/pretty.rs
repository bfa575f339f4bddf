//! Human-readable rendering of erased expressions.
//!
//! Used for dumps and test failure messages. Locals print as
//! `name_id` so that distinct declarations with the same display name stay
//! distinguishable; locals with no binder in view print as `_#id`.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::stack::ensure_sufficient_stack;
use crate::{ExprArena, ExprId, ExprKind, Literal, LocalId, Name, Procedure, StringInterner};

/// Position an expression is printed in.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Prec {
    Top,
    Func,
    Arg,
}

/// Display adapter returned by [`ExprArena::display`].
pub struct ExprDisplay<'a> {
    arena: &'a ExprArena,
    interner: &'a StringInterner,
    expr: ExprId,
}

/// Display adapter returned by [`ExprArena::display_procedure`].
pub struct ProcedureDisplay<'a> {
    inner: ExprDisplay<'a>,
    name: Name,
}

impl ExprArena {
    pub fn display<'a>(&'a self, expr: ExprId, interner: &'a StringInterner) -> ExprDisplay<'a> {
        ExprDisplay {
            arena: self,
            interner,
            expr,
        }
    }

    pub fn display_procedure<'a>(
        &'a self,
        proc: &Procedure,
        interner: &'a StringInterner,
    ) -> ProcedureDisplay<'a> {
        ProcedureDisplay {
            inner: self.display(proc.body, interner),
            name: proc.name,
        }
    }
}

impl ExprDisplay<'_> {
    fn write(
        &self,
        f: &mut fmt::Formatter<'_>,
        e: ExprId,
        prec: Prec,
        names: &mut FxHashMap<LocalId, Name>,
    ) -> fmt::Result {
        ensure_sufficient_stack(|| match self.arena.kind(e) {
            ExprKind::Local(id) => match names.get(&id) {
                Some(&name) => write!(f, "{}_{}", self.interner.lookup(name), id.raw()),
                None => write!(f, "_{id}"),
            },
            ExprKind::Global(name) => f.write_str(self.interner.lookup(name)),
            ExprKind::Lit(Literal::Nat(n)) => write!(f, "{n}"),
            ExprKind::Lit(Literal::Str(s)) => write!(f, "{:?}", self.interner.lookup(s)),
            ExprKind::App { func, args } => {
                if prec == Prec::Arg {
                    f.write_str("(")?;
                }
                self.write(f, func, Prec::Func, names)?;
                for &arg in self.arena.get_expr_list(args) {
                    f.write_str(" ")?;
                    self.write(f, arg, Prec::Arg, names)?;
                }
                if prec == Prec::Arg {
                    f.write_str(")")?;
                }
                Ok(())
            }
            ExprKind::Lambda { binder, body } => {
                if prec > Prec::Top {
                    f.write_str("(")?;
                }
                let shadowed = names.insert(binder.id, binder.name);
                write!(f, "fun {}_{} => ", self.interner.lookup(binder.name), binder.id.raw())?;
                self.write(f, body, Prec::Top, names)?;
                restore(names, binder.id, shadowed);
                if prec > Prec::Top {
                    f.write_str(")")?;
                }
                Ok(())
            }
            ExprKind::Let {
                binder,
                value,
                body,
            } => {
                if prec > Prec::Top {
                    f.write_str("(")?;
                }
                write!(f, "let {}_{} := ", self.interner.lookup(binder.name), binder.id.raw())?;
                self.write(f, value, Prec::Top, names)?;
                f.write_str("; ")?;
                let shadowed = names.insert(binder.id, binder.name);
                self.write(f, body, Prec::Top, names)?;
                restore(names, binder.id, shadowed);
                if prec > Prec::Top {
                    f.write_str(")")?;
                }
                Ok(())
            }
        })
    }
}

fn restore(names: &mut FxHashMap<LocalId, Name>, id: LocalId, shadowed: Option<Name>) {
    match shadowed {
        Some(name) => names.insert(id, name),
        None => names.remove(&id),
    };
}

impl fmt::Display for ExprDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = FxHashMap::default();
        self.write(f, self.expr, Prec::Top, &mut names)
    }
}

impl fmt::Display for ProcedureDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "def {} := {}", self.inner.interner.lookup(self.name), self.inner)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn renders_lambdas_lets_and_applications() {
        let interner = StringInterner::new();
        let mut arena = ExprArena::new();
        let g = arena.global(interner.intern("g"));
        let x = arena.fresh_binder(interner.intern("x"));
        let y = arena.fresh_binder(interner.intern("y"));
        let xr = arena.local(x.id);
        let yr = arena.local(y.id);
        let inner = arena.app(g, &[yr]);
        let nested = arena.app(g, &[xr, inner]);
        let body = arena.let_in(y, xr, nested);
        let e = arena.lambda(x, body);

        assert_eq!(
            arena.display(e, &interner).to_string(),
            "fun x_0 => let y_1 := x_0; g x_0 (g y_1)"
        );
    }

    #[test]
    fn renders_free_locals_and_literals() {
        let interner = StringInterner::new();
        let mut arena = ExprArena::new();
        let free = arena.fresh_local();
        let f = arena.global(interner.intern("f"));
        let fr = arena.local(free);
        let s = arena.str_lit(interner.intern("hi"));
        let seven = arena.nat(7);
        let e = arena.app(f, &[fr, s, seven]);

        assert_eq!(arena.display(e, &interner).to_string(), "f _#0 \"hi\" 7");
    }

    #[test]
    fn renders_deeply_nested_expressions() {
        const DEPTH: usize = 100_000;
        let interner = StringInterner::new();
        let mut arena = ExprArena::new();
        let g = arena.global(interner.intern("g"));
        let mut e = arena.nat(1);
        for _ in 0..DEPTH {
            e = arena.app(g, &[e]);
        }

        let expected = format!("{}g 1{}", "g (".repeat(DEPTH - 1), ")".repeat(DEPTH - 1));
        assert_eq!(arena.display(e, &interner).to_string(), expected);
    }

    #[test]
    fn renders_procedures() {
        let interner = StringInterner::new();
        let mut arena = ExprArena::new();
        let body = arena.nat(1);
        let proc = Procedure::new(interner.intern("one"), body);
        assert_eq!(
            arena.display_procedure(&proc, &interner).to_string(),
            "def one := 1"
        );
    }
}
