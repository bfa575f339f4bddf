//! Named top-level procedures.

use crate::{ExprId, Name};

/// A top-level procedure: a global name and its body.
///
/// After lambda lifting every body is closed: no `Local` inside it refers
/// to a declaration outside its own binders.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Procedure {
    pub name: Name,
    pub body: ExprId,
}

impl Procedure {
    pub fn new(name: Name, body: ExprId) -> Self {
        Self { name, body }
    }
}
