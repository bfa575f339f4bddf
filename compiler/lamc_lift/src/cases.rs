//! Dispatcher applications.
//!
//! A dispatcher (`T.casesOn`) is applied to the major premise, one minor
//! premise per constructor, and possibly further arguments when the
//! result is itself a function. The evaluator expects each minor premise
//! to be a literal lambda binding the constructor's fields, so the leading
//! field binders of an arm are kept inline instead of being lifted. An arm
//! with fewer binders than fields is eta-expanded first.

use lamc_ir::{ExprId, ExprKind, Name, Subst};
use tracing::trace;

use crate::lift::{Binders, LambdaLifter};
use crate::LiftError;

/// Position of the major premise among a dispatcher's arguments.
const MAJOR: usize = 0;

impl LambdaLifter<'_> {
    pub(crate) fn visit_cases_on_app(
        &mut self,
        e: ExprId,
        dispatcher: Name,
        inductive: Name,
    ) -> Result<ExprId, LiftError> {
        let env = self.env;
        let info = env
            .inductive(inductive)
            .ok_or_else(|| LiftError::UnknownInductive {
                name: self.name_str(inductive),
            })?;

        let func = self.arena.app_head(e);
        let mut args = self.arena.app_args(e).to_vec();
        let first_extra = MAJOR + 1 + info.num_minors();
        if args.len() < first_extra {
            return Err(LiftError::DispatchArity {
                dispatcher: self.name_str(dispatcher),
                expected: first_extra,
                found: args.len(),
            });
        }

        args[MAJOR] = self.visit(args[MAJOR])?;
        for arg in &mut args[first_extra..] {
            *arg = self.visit(*arg)?;
        }

        for (i, &ctor) in info.constructors.iter().enumerate() {
            let arity =
                env.constructor_arity(ctor)
                    .ok_or_else(|| LiftError::UnknownConstructor {
                        name: self.name_str(ctor),
                    })?;
            let fields =
                arity
                    .checked_sub(info.num_params)
                    .ok_or_else(|| LiftError::ConstructorArity {
                        constructor: self.name_str(ctor),
                        arity,
                        params: info.num_params,
                    })?;
            let minor = MAJOR + 1 + i;
            args[minor] = self.visit_cases_on_minor(fields, args[minor])?;
        }

        Ok(self.arena.app(func, &args))
    }

    /// Transform one minor premise, keeping `fields` leading binders.
    fn visit_cases_on_minor(&mut self, fields: u32, minor: ExprId) -> Result<ExprId, LiftError> {
        let mut binders = Binders::new();
        let mut subst = Subst::default();
        let mut e = minor;
        for _ in 0..fields {
            let fresh = if let ExprKind::Lambda { binder, body } = self.arena.kind(e) {
                let fresh = self.arena.fresh_binder(binder.name);
                let reference = self.arena.local(fresh.id);
                subst.insert(binder.id, reference);
                e = body;
                fresh
            } else {
                // Partially eta-contracted arm: apply it to a new parameter.
                let fresh = self.arena.fresh_binder(self.anonymous);
                let reference = self.arena.local(fresh.id);
                e = self.arena.app(e, &[reference]);
                fresh
            };
            self.lctx.push_local(fresh);
            binders.push(fresh);
        }
        let body = self.arena.replace_locals(e, &subst);
        trace!(fields, "visiting minor premise");
        let body = self.visit(body)?;
        self.lctx.pop(binders.iter().map(|binder| binder.id));
        Ok(self.arena.lambdas(&binders, body))
    }
}

#[cfg(test)]
mod tests;
