//! Erased expression kinds.

use crate::{ExprId, ExprRange, LocalId, Name};

/// A binder introduced by a lambda or a let.
///
/// The `id` is what `Local` references point at; the `name` is only for
/// display and for naming the parameter again when the binder is
/// re-instantiated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Binder {
    pub id: LocalId,
    pub name: Name,
}

/// Literal leaf.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Literal {
    Nat(u64),
    Str(Name),
}

/// An erased, fully elaborated expression node.
///
/// Types, universes and proofs are gone by the time an expression reaches
/// this representation; what remains is an untyped lambda calculus with
/// named globals and sequential lets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExprKind {
    /// Reference to a local declaration.
    Local(LocalId),
    /// Reference to a top-level declaration (procedure, constructor,
    /// dispatcher, projection or builtin).
    Global(Name),
    Lit(Literal),
    /// N-ary application. `func` is never itself an `App` when built
    /// through [`ExprArena::app`](crate::ExprArena::app).
    App { func: ExprId, args: ExprRange },
    /// Single-parameter function value.
    Lambda { binder: Binder, body: ExprId },
    /// `let binder := value; body`.
    Let {
        binder: Binder,
        value: ExprId,
        body: ExprId,
    },
}

impl ExprKind {
    #[inline]
    pub fn is_lambda(&self) -> bool {
        matches!(self, ExprKind::Lambda { .. })
    }
}
