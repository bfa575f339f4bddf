//! Capture analysis: closing a transformed lambda over the locals it uses.
//!
//! Let-bound locals are inlined (after pulling in whatever their values
//! reference); parameters become new outermost parameters of the closed
//! term. The declarations a term needs are discovered latest first, then
//! resolved oldest first into a single substitution, so each let value is
//! rewritten once and stays shared wherever it is inlined.

use std::collections::BTreeMap;

use lamc_ir::{ExprId, LocalDecl, LocalId, Subst};

use crate::lift::{Binders, LambdaLifter};
use crate::LiftError;

/// Pending declarations keyed by scope insertion order.
type Pending = BTreeMap<u32, LocalDecl>;

impl LambdaLifter<'_> {
    /// Close `e` over the locals it references.
    ///
    /// Returns the closed term and the captured parameters, most recent
    /// first. The last entry is the outermost parameter of the closed term.
    pub(crate) fn abstract_locals(
        &mut self,
        e: ExprId,
    ) -> Result<(ExprId, Vec<LocalId>), LiftError> {
        let mut pending = Pending::new();
        self.collect_locals(e, &mut pending)?;

        // A let value only mentions earlier declarations.
        let mut needed = Vec::new();
        while let Some((_, decl)) = pending.pop_last() {
            if let Some(value) = decl.value {
                self.collect_locals(value, &mut pending)?;
            }
            needed.push(decl);
        }

        let mut subst = Subst::default();
        let mut params = Binders::new();
        for decl in needed.iter().rev() {
            let replacement = match decl.value {
                Some(value) => self.arena.replace_locals(value, &subst),
                None => {
                    let param = self.arena.fresh_binder(decl.name);
                    params.push(param);
                    self.arena.local(param.id)
                }
            };
            subst.insert(decl.id, replacement);
        }
        let body = self.arena.replace_locals(e, &subst);
        let closed = self.arena.lambdas(&params, body);

        let captured = needed
            .iter()
            .filter(|decl| decl.value.is_none())
            .map(|decl| decl.id)
            .collect();
        Ok((closed, captured))
    }

    fn collect_locals(&self, e: ExprId, pending: &mut Pending) -> Result<(), LiftError> {
        for local in self.arena.free_locals(e) {
            let decl = self
                .lctx
                .get(local)
                .ok_or(LiftError::UnboundLocal { local })?;
            pending.insert(decl.index, *decl);
        }
        Ok(())
    }
}
