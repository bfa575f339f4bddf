//! Naming closed abstractions.

use lamc_ir::{ExprId, Procedure};
use tracing::debug;

use crate::lift::LambdaLifter;
use crate::LiftError;

impl LambdaLifter<'_> {
    /// Turn a closed term into a reference to a top-level procedure.
    ///
    /// A term that eta-reduces to an application headed by a plain
    /// function is returned in reduced form instead: the function itself
    /// already is the procedure. Otherwise a synthetic procedure is
    /// declared with the term as its body, un-reduced, so that its
    /// parameters stay explicit.
    pub(crate) fn declare_aux_def(&mut self, value: ExprId) -> Result<ExprId, LiftError> {
        let reduced = self.arena.try_eta(value);
        if let Some(head) = self.arena.app_head_global(reduced) {
            if self.classify(head)?.is_plain_function() {
                debug!(head = self.interner.lookup(head), "reusing existing function");
                return Ok(reduced);
            }
        }

        let env = self.env;
        let unit_names = &self.unit_names;
        let name = self
            .supply
            .fresh(|candidate| unit_names.contains(&candidate) || env.contains(candidate));
        self.unit_names.insert(name);
        self.lifted.push(Procedure::new(name, value));
        debug!(name = self.interner.lookup(name), "lifted abstraction");
        Ok(self.arena.global(name))
    }
}
