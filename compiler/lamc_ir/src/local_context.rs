//! Local scope bookkeeping.
//!
//! [`LocalContext`] tracks the declarations currently in scope while a pass
//! walks an expression: lambda parameters (no value) and let-bindings (with
//! their already-processed value). Each declaration records the order in
//! which it was introduced, which is what capture analysis sorts by.

use rustc_hash::FxHashMap;

use crate::{Binder, ExprId, LocalId, Name};

/// A declaration in scope.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LocalDecl {
    pub id: LocalId,
    pub name: Name,
    /// Bound value; `Some` for let-bindings, `None` for parameters.
    pub value: Option<ExprId>,
    /// Insertion order. Later declarations have larger indices.
    pub index: u32,
}

/// Declarations currently in scope.
///
/// The insertion counter never goes backwards, even when declarations are
/// popped on scope exit, so indices are unique for the lifetime of the
/// context.
#[derive(Clone, Debug, Default)]
pub struct LocalContext {
    decls: FxHashMap<LocalId, LocalDecl>,
    next_index: u32,
}

impl LocalContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, binder: Binder, value: Option<ExprId>) -> LocalDecl {
        let decl = LocalDecl {
            id: binder.id,
            name: binder.name,
            value,
            index: self.next_index,
        };
        self.next_index += 1;
        self.decls.insert(binder.id, decl);
        decl
    }

    /// Bring a parameter into scope.
    pub fn push_local(&mut self, binder: Binder) -> LocalDecl {
        self.push(binder, None)
    }

    /// Bring a let-binding into scope.
    pub fn push_let(&mut self, binder: Binder, value: ExprId) -> LocalDecl {
        self.push(binder, Some(value))
    }

    /// Look up a declaration in scope.
    pub fn get(&self, id: LocalId) -> Option<&LocalDecl> {
        self.decls.get(&id)
    }

    pub fn contains(&self, id: LocalId) -> bool {
        self.decls.contains_key(&id)
    }

    /// Remove declarations on scope exit.
    pub fn pop(&mut self, ids: impl IntoIterator<Item = LocalId>) {
        for id in ids {
            self.decls.remove(&id);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}
