//! Substitution and reduction over the expression arena.
//!
//! All operations build new nodes and return the input id unchanged when a
//! subtree is unaffected, so untouched subtrees stay shared. Traversals
//! visit each distinct node once, which keeps them linear in the size of
//! the graph even when let-inlining has made a subtree reachable many times.
//!
//! # Binder discipline
//!
//! Locals are referenced by [`LocalId`], not by de Bruijn index. Passes that
//! enter a binder re-instantiate it with a fresh id before substituting into
//! its body, so a value being substituted never mentions a binder id that
//! occurs inside the target. Substitution therefore only has to respect
//! shadowing (a binder re-binding an id that is being replaced), never
//! capture.

use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::stack::ensure_sufficient_stack;
use crate::{ExprArena, ExprId, ExprKind, LocalId};

/// Substitution from local ids to replacement expressions.
pub type Subst = FxHashMap<LocalId, ExprId>;

/// Rewrites already done under one substitution.
type Memo = FxHashMap<ExprId, ExprId>;

/// Free locals of each node visited so far, in first-occurrence order.
type FreeMemo = FxHashMap<ExprId, Rc<[LocalId]>>;

impl ExprArena {
    /// Replace every free occurrence of the locals in `subst`.
    ///
    /// Each distinct node is rewritten at most once per substitution, so a
    /// subtree reachable along several paths stays shared in the result.
    pub fn replace_locals(&mut self, e: ExprId, subst: &Subst) -> ExprId {
        if subst.is_empty() {
            return e;
        }
        let mut memo = Memo::default();
        self.replace_in(e, subst, &mut memo)
    }

    fn replace_in(&mut self, e: ExprId, subst: &Subst, memo: &mut Memo) -> ExprId {
        if let Some(&done) = memo.get(&e) {
            return done;
        }
        let result = ensure_sufficient_stack(|| match self.kind(e) {
            ExprKind::Local(id) => subst.get(&id).copied().unwrap_or(e),
            ExprKind::Global(_) | ExprKind::Lit(_) => e,
            ExprKind::App { func, args } => {
                let new_func = self.replace_in(func, subst, memo);
                let old_args = self.get_expr_list(args).to_vec();
                let new_args: Vec<ExprId> = old_args
                    .iter()
                    .map(|&arg| self.replace_in(arg, subst, memo))
                    .collect();
                if new_func == func && new_args == old_args {
                    e
                } else {
                    self.app(new_func, &new_args)
                }
            }
            ExprKind::Lambda { binder, body } => {
                let new_body = self.replace_under(binder.id, body, subst, memo);
                if new_body == body {
                    e
                } else {
                    self.lambda(binder, new_body)
                }
            }
            ExprKind::Let {
                binder,
                value,
                body,
            } => {
                let new_value = self.replace_in(value, subst, memo);
                let new_body = self.replace_under(binder.id, body, subst, memo);
                if new_value == value && new_body == body {
                    e
                } else {
                    self.let_in(binder, new_value, new_body)
                }
            }
        });
        memo.insert(e, result);
        result
    }

    fn replace_under(
        &mut self,
        bound: LocalId,
        body: ExprId,
        subst: &Subst,
        memo: &mut Memo,
    ) -> ExprId {
        if subst.contains_key(&bound) {
            // Narrower substitution: its rewrites must not mix with `memo`.
            let mut inner = subst.clone();
            inner.remove(&bound);
            self.replace_locals(body, &inner)
        } else {
            self.replace_in(body, subst, memo)
        }
    }

    /// Replace free occurrences of `local` in `body` by `value`.
    pub fn instantiate(&mut self, body: ExprId, local: LocalId, value: ExprId) -> ExprId {
        let mut subst = Subst::default();
        subst.insert(local, value);
        self.replace_locals(body, &subst)
    }

    /// Locals occurring free in `e`, in order of first occurrence.
    pub fn free_locals(&self, e: ExprId) -> Vec<LocalId> {
        let mut memo = FreeMemo::default();
        self.free_in(e, &mut memo).to_vec()
    }

    fn free_in(&self, e: ExprId, memo: &mut FreeMemo) -> Rc<[LocalId]> {
        if let Some(free) = memo.get(&e) {
            return Rc::clone(free);
        }
        let free: Rc<[LocalId]> = ensure_sufficient_stack(|| {
            let mut acc = FreeLocals::default();
            match self.kind(e) {
                ExprKind::Local(id) => acc.extend(&[id], None),
                ExprKind::Global(_) | ExprKind::Lit(_) => {}
                ExprKind::App { func, args } => {
                    acc.extend(&self.free_in(func, memo), None);
                    for &arg in self.get_expr_list(args) {
                        acc.extend(&self.free_in(arg, memo), None);
                    }
                }
                ExprKind::Lambda { binder, body } => {
                    acc.extend(&self.free_in(body, memo), Some(binder.id));
                }
                ExprKind::Let {
                    binder,
                    value,
                    body,
                } => {
                    acc.extend(&self.free_in(value, memo), None);
                    acc.extend(&self.free_in(body, memo), Some(binder.id));
                }
            }
            acc.out.into()
        });
        memo.insert(e, Rc::clone(&free));
        free
    }

    /// Does `local` occur free in `e`?
    pub fn occurs_free(&self, e: ExprId, local: LocalId) -> bool {
        let mut clear = FxHashSet::default();
        self.occurs_in(e, local, &mut clear)
    }

    /// `clear` holds nodes already known not to mention `local` freely.
    fn occurs_in(&self, e: ExprId, local: LocalId, clear: &mut FxHashSet<ExprId>) -> bool {
        if clear.contains(&e) {
            return false;
        }
        let found = ensure_sufficient_stack(|| match self.kind(e) {
            ExprKind::Local(id) => id == local,
            ExprKind::Global(_) | ExprKind::Lit(_) => false,
            ExprKind::App { func, args } => {
                self.occurs_in(func, local, clear)
                    || self
                        .get_expr_list(args)
                        .iter()
                        .any(|&arg| self.occurs_in(arg, local, clear))
            }
            ExprKind::Lambda { binder, body } => {
                binder.id != local && self.occurs_in(body, local, clear)
            }
            ExprKind::Let {
                binder,
                value,
                body,
            } => {
                self.occurs_in(value, local, clear)
                    || (binder.id != local && self.occurs_in(body, local, clear))
            }
        });
        if !found {
            clear.insert(e);
        }
        found
    }

    /// Visit every distinct node of `e` once, in pre-order.
    pub fn for_each_node(&self, e: ExprId, f: &mut impl FnMut(ExprId, ExprKind)) {
        let mut visited = FxHashSet::default();
        self.walk_nodes(e, f, &mut visited);
    }

    fn walk_nodes(
        &self,
        e: ExprId,
        f: &mut impl FnMut(ExprId, ExprKind),
        visited: &mut FxHashSet<ExprId>,
    ) {
        if !visited.insert(e) {
            return;
        }
        ensure_sufficient_stack(|| {
            let kind = self.kind(e);
            f(e, kind);
            match kind {
                ExprKind::Local(_) | ExprKind::Global(_) | ExprKind::Lit(_) => {}
                ExprKind::App { func, args } => {
                    self.walk_nodes(func, &mut *f, visited);
                    for &arg in self.get_expr_list(args) {
                        self.walk_nodes(arg, &mut *f, visited);
                    }
                }
                ExprKind::Lambda { body, .. } => self.walk_nodes(body, &mut *f, visited),
                ExprKind::Let { value, body, .. } => {
                    self.walk_nodes(value, &mut *f, visited);
                    self.walk_nodes(body, &mut *f, visited);
                }
            }
        });
    }

    /// Reduce head redexes: `(fun x => b) a rest...` becomes `b[x := a] rest...`,
    /// repeated while the head of the spine is a lambda.
    ///
    /// Returns `e` itself when there is nothing to reduce.
    pub fn head_beta(&mut self, e: ExprId) -> ExprId {
        let mut e = e;
        loop {
            let ExprKind::App { func, args } = self.kind(e) else {
                return e;
            };
            if !self.kind(func).is_lambda() {
                return e;
            }
            let args = self.get_expr_list(args).to_vec();
            let mut head = func;
            let mut used = 0;
            while used < args.len() {
                let ExprKind::Lambda { binder, body } = self.kind(head) else {
                    break;
                };
                head = self.instantiate(body, binder.id, args[used]);
                used += 1;
            }
            e = self.app(head, &args[used..]);
        }
    }

    /// Eta-reduce: `fun x => f x` becomes `f` when `x` is not otherwise free.
    ///
    /// Reduces through binder chains from the inside out, so
    /// `fun x => fun y => f x y` becomes `f`. When an outer binder cannot be
    /// removed, the partially reduced body is kept under it.
    pub fn try_eta(&mut self, e: ExprId) -> ExprId {
        let ExprKind::Lambda { binder, body } = self.kind(e) else {
            return e;
        };
        let new_body = ensure_sufficient_stack(|| self.try_eta(body));
        if let ExprKind::App { func, args } = self.kind(new_body) {
            let args = self.get_expr_list(args);
            if let Some((&last, init)) = args.split_last() {
                let reducible = self.kind(last) == ExprKind::Local(binder.id)
                    && !self.occurs_free(func, binder.id)
                    && !init.iter().any(|&arg| self.occurs_free(arg, binder.id));
                if reducible {
                    let init = init.to_vec();
                    return self.app(func, &init);
                }
            }
        }
        if new_body == body {
            e
        } else {
            self.lambda(binder, new_body)
        }
    }

    /// Structural equality up to renaming of bound locals.
    ///
    /// Free locals must match exactly.
    pub fn alpha_eq(&self, a: ExprId, b: ExprId) -> bool {
        let mut renaming = FxHashMap::default();
        self.alpha_eq_in(a, b, &mut renaming)
    }

    fn alpha_eq_in(
        &self,
        a: ExprId,
        b: ExprId,
        renaming: &mut FxHashMap<LocalId, LocalId>,
    ) -> bool {
        if a == b && renaming.is_empty() {
            return true;
        }
        ensure_sufficient_stack(|| match (self.kind(a), self.kind(b)) {
            (ExprKind::Local(x), ExprKind::Local(y)) => match renaming.get(&x) {
                Some(&mapped) => mapped == y,
                None => x == y && !renaming.values().any(|&bound| bound == y),
            },
            (ExprKind::Global(x), ExprKind::Global(y)) => x == y,
            (ExprKind::Lit(x), ExprKind::Lit(y)) => x == y,
            (
                ExprKind::App {
                    func: fa,
                    args: aa,
                },
                ExprKind::App {
                    func: fb,
                    args: ab,
                },
            ) => {
                let aa = self.get_expr_list(aa);
                let ab = self.get_expr_list(ab);
                aa.len() == ab.len()
                    && self.alpha_eq_in(fa, fb, renaming)
                    && aa
                        .iter()
                        .zip(ab)
                        .all(|(&x, &y)| self.alpha_eq_in(x, y, renaming))
            }
            (
                ExprKind::Lambda {
                    binder: ba,
                    body: xa,
                },
                ExprKind::Lambda {
                    binder: bb,
                    body: xb,
                },
            ) => self.alpha_eq_bound(ba.id, bb.id, xa, xb, renaming),
            (
                ExprKind::Let {
                    binder: ba,
                    value: va,
                    body: xa,
                },
                ExprKind::Let {
                    binder: bb,
                    value: vb,
                    body: xb,
                },
            ) => {
                self.alpha_eq_in(va, vb, renaming)
                    && self.alpha_eq_bound(ba.id, bb.id, xa, xb, renaming)
            }
            _ => false,
        })
    }

    fn alpha_eq_bound(
        &self,
        xa: LocalId,
        xb: LocalId,
        body_a: ExprId,
        body_b: ExprId,
        renaming: &mut FxHashMap<LocalId, LocalId>,
    ) -> bool {
        let previous = renaming.insert(xa, xb);
        let eq = self.alpha_eq_in(body_a, body_b, renaming);
        match previous {
            Some(prev) => renaming.insert(xa, prev),
            None => renaming.remove(&xa),
        };
        eq
    }
}

/// Ordered, duplicate-free union of free-local lists.
#[derive(Default)]
struct FreeLocals {
    seen: FxHashSet<LocalId>,
    out: Vec<LocalId>,
}

impl FreeLocals {
    fn extend(&mut self, locals: &[LocalId], except: Option<LocalId>) {
        for &id in locals {
            if Some(id) != except && self.seen.insert(id) {
                self.out.push(id);
            }
        }
    }
}
