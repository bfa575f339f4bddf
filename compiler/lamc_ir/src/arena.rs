//! Expression arena.
//!
//! [`ExprArena`] stores every node of a compilation unit in a flat `Vec`
//! indexed by [`ExprId`], with argument lists flattened into a second `Vec`
//! indexed by [`ExprRange`]. Nodes are never mutated after they are pushed:
//! every rewrite allocates new nodes and leaves the originals valid, so
//! unchanged subtrees are shared by id between the old and the new tree.

use crate::{Binder, ExprId, ExprKind, ExprRange, Literal, LocalId, Name};

/// Convert a length to `u32`, panicking with context on overflow.
fn to_u32(value: usize, what: &str) -> u32 {
    u32::try_from(value).unwrap_or_else(|_| panic!("{what} exceeds u32::MAX"))
}

/// Arena for erased expressions of one compilation unit.
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    kinds: Vec<ExprKind>,
    expr_lists: Vec<ExprId>,
    next_local: u32,
}

impl ExprArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node, returning its ID.
    fn push(&mut self, kind: ExprKind) -> ExprId {
        let id = ExprId::new(to_u32(self.kinds.len(), "expressions"));
        self.kinds.push(kind);
        id
    }

    /// Get the expression kind for a node.
    #[inline]
    pub fn kind(&self, id: ExprId) -> ExprKind {
        self.kinds[id.index()]
    }

    /// Number of allocated nodes.
    pub fn node_count(&self) -> usize {
        self.kinds.len()
    }

    /// Get argument IDs from a range.
    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        if range.is_empty() {
            return &[];
        }
        let start = range.start as usize;
        &self.expr_lists[start..start + range.len()]
    }

    fn push_expr_list(&mut self, ids: &[ExprId]) -> ExprRange {
        if ids.is_empty() {
            return ExprRange::EMPTY;
        }
        let start = to_u32(self.expr_lists.len(), "expression lists");
        self.expr_lists.extend_from_slice(ids);
        ExprRange::new(start, to_u32(ids.len(), "argument list"))
    }

    // Locals

    /// Mint a local declaration id that has never been used in this arena.
    pub fn fresh_local(&mut self) -> LocalId {
        let id = LocalId::new(self.next_local);
        self.next_local += 1;
        id
    }

    /// Mint a binder with a fresh id and the given display name.
    pub fn fresh_binder(&mut self, name: Name) -> Binder {
        Binder {
            id: self.fresh_local(),
            name,
        }
    }

    // Constructors

    pub fn local(&mut self, id: LocalId) -> ExprId {
        self.push(ExprKind::Local(id))
    }

    pub fn global(&mut self, name: Name) -> ExprId {
        self.push(ExprKind::Global(name))
    }

    pub fn nat(&mut self, value: u64) -> ExprId {
        self.push(ExprKind::Lit(Literal::Nat(value)))
    }

    pub fn str_lit(&mut self, value: Name) -> ExprId {
        self.push(ExprKind::Lit(Literal::Str(value)))
    }

    /// Build `func args...` in n-ary normal form.
    ///
    /// An empty argument list returns `func` itself. If `func` is already an
    /// application the argument lists are concatenated, so the head of an
    /// application is never another application.
    pub fn app(&mut self, func: ExprId, args: &[ExprId]) -> ExprId {
        if args.is_empty() {
            return func;
        }
        if let ExprKind::App {
            func: inner,
            args: inner_args,
        } = self.kind(func)
        {
            let mut all = self.get_expr_list(inner_args).to_vec();
            all.extend_from_slice(args);
            let args = self.push_expr_list(&all);
            return self.push(ExprKind::App { func: inner, args });
        }
        let args = self.push_expr_list(args);
        self.push(ExprKind::App { func, args })
    }

    pub fn lambda(&mut self, binder: Binder, body: ExprId) -> ExprId {
        self.push(ExprKind::Lambda { binder, body })
    }

    pub fn let_in(&mut self, binder: Binder, value: ExprId, body: ExprId) -> ExprId {
        self.push(ExprKind::Let {
            binder,
            value,
            body,
        })
    }

    /// Wrap `body` in lambdas over `binders`, the first binder outermost.
    pub fn lambdas(&mut self, binders: &[Binder], body: ExprId) -> ExprId {
        binders
            .iter()
            .rev()
            .fold(body, |acc, &binder| self.lambda(binder, acc))
    }

    /// Wrap `body` in sequential lets, the first binding outermost.
    pub fn lets(&mut self, bindings: &[(Binder, ExprId)], body: ExprId) -> ExprId {
        bindings
            .iter()
            .rev()
            .fold(body, |acc, &(binder, value)| self.let_in(binder, value, acc))
    }

    // Application spine

    /// Head of the application spine (`e` itself if it is not an `App`).
    pub fn app_head(&self, e: ExprId) -> ExprId {
        match self.kind(e) {
            ExprKind::App { func, .. } => func,
            _ => e,
        }
    }

    /// Arguments of the application spine (empty if `e` is not an `App`).
    pub fn app_args(&self, e: ExprId) -> &[ExprId] {
        match self.kind(e) {
            ExprKind::App { args, .. } => self.get_expr_list(args),
            _ => &[],
        }
    }

    /// Name of the head global, if the spine is headed by one.
    pub fn app_head_global(&self, e: ExprId) -> Option<Name> {
        match self.kind(self.app_head(e)) {
            ExprKind::Global(name) => Some(name),
            _ => None,
        }
    }

    /// Split a lambda chain into its binders and innermost body.
    pub fn binder_chain(&self, e: ExprId) -> (Vec<Binder>, ExprId) {
        let mut binders = Vec::new();
        let mut t = e;
        while let ExprKind::Lambda { binder, body } = self.kind(t) {
            binders.push(binder);
            t = body;
        }
        (binders, t)
    }
}
