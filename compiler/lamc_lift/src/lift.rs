//! Structural traversal for lambda lifting.
//!
//! [`LambdaLifter`] walks each procedure body depth-first, inside-out.
//! Every binder it enters is re-instantiated with a fresh local that is
//! pushed on the [`LocalContext`], so by the time an abstraction is
//! finished its body refers to the enclosing scope only through locals
//! that capture analysis can look up.
//!
//! # Rules
//!
//! - **Lambda** (anywhere but the top of a procedure body): transform the
//!   body, close it over its captures ([`capture`](crate::capture)), name it
//!   ([`declare`](crate::declare)) and replace the lambda by a call passing
//!   the captured locals.
//! - **Let**: transform the value in place, keep the binding, continue in
//!   the body. Lets are never lifted as a unit.
//! - **Dispatcher application**: minor premises stay inline
//!   ([`cases`](crate::cases)).
//! - **Other application**: head-beta first, then transform function and
//!   arguments.
//! - **Leaves**: unchanged.

use lamc_ir::stack::ensure_sufficient_stack;
use lamc_ir::{
    Binder, Environment, ExprArena, ExprId, ExprKind, GlobalKind, LocalContext, Name, NameSupply,
    Procedure, StringInterner, Subst,
};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::debug;

use crate::LiftError;

/// Binder chain entered in one step; chains are rarely longer than four.
pub(crate) type Binders = SmallVec<[Binder; 4]>;

/// State for lifting one compilation unit.
pub(crate) struct LambdaLifter<'a> {
    pub(crate) arena: &'a mut ExprArena,
    pub(crate) env: &'a dyn Environment,
    pub(crate) interner: &'a StringInterner,
    pub(crate) lctx: LocalContext,
    pub(crate) supply: NameSupply<'a>,
    /// Names declared by this unit: input procedures and lifted ones.
    pub(crate) unit_names: FxHashSet<Name>,
    /// Synthetic procedures in discovery order.
    pub(crate) lifted: Vec<Procedure>,
    /// Display name for parameters synthesized when eta-expanding arms.
    pub(crate) anonymous: Name,
}

impl<'a> LambdaLifter<'a> {
    pub(crate) fn new(
        arena: &'a mut ExprArena,
        env: &'a dyn Environment,
        interner: &'a StringInterner,
        supply: NameSupply<'a>,
    ) -> Self {
        Self {
            arena,
            env,
            interner,
            lctx: LocalContext::new(),
            supply,
            unit_names: FxHashSet::default(),
            lifted: Vec::new(),
            anonymous: interner.intern("a"),
        }
    }

    /// Lift every procedure, returning the originals (same order) followed
    /// by the synthetic procedures.
    pub(crate) fn run(mut self, procs: &[Procedure]) -> Result<Vec<Procedure>, LiftError> {
        self.unit_names.extend(procs.iter().map(|proc| proc.name));
        let mut output = Vec::with_capacity(procs.len());
        for proc in procs {
            // A body that is already a function keeps its parameters.
            let body = if self.arena.kind(proc.body).is_lambda() {
                self.visit_lambda_core(proc.body)?
            } else {
                self.visit(proc.body)?
            };
            debug_assert!(self.lctx.is_empty(), "scope leaked out of a procedure");
            output.push(Procedure::new(proc.name, body));
        }
        output.append(&mut self.lifted);
        Ok(output)
    }

    /// Classify a global; names declared by this unit are plain functions.
    pub(crate) fn classify(&self, name: Name) -> Result<GlobalKind, LiftError> {
        match self.env.classify(name) {
            Some(kind) => Ok(kind),
            None if self.unit_names.contains(&name) => Ok(GlobalKind::Function),
            None => Err(LiftError::UnknownGlobal {
                name: self.name_str(name),
            }),
        }
    }

    pub(crate) fn name_str(&self, name: Name) -> String {
        self.interner.lookup(name).to_owned()
    }

    pub(crate) fn visit(&mut self, e: ExprId) -> Result<ExprId, LiftError> {
        ensure_sufficient_stack(|| match self.arena.kind(e) {
            ExprKind::Local(id) => {
                if self.lctx.contains(id) {
                    Ok(e)
                } else {
                    Err(LiftError::UnboundLocal { local: id })
                }
            }
            ExprKind::Global(_) | ExprKind::Lit(_) => Ok(e),
            ExprKind::App { .. } => self.visit_app(e),
            ExprKind::Lambda { .. } => self.visit_lambda(e),
            ExprKind::Let { .. } => self.visit_let(e),
        })
    }

    /// Enter a lambda chain: bring a fresh local into scope for every
    /// binder and return the instantiated innermost body.
    ///
    /// The caller must pop the returned binders.
    fn enter_lambdas(&mut self, e: ExprId) -> (Binders, ExprId) {
        let mut binders = Binders::new();
        let mut subst = Subst::default();
        let mut t = e;
        while let ExprKind::Lambda { binder, body } = self.arena.kind(t) {
            let fresh = self.arena.fresh_binder(binder.name);
            let reference = self.arena.local(fresh.id);
            subst.insert(binder.id, reference);
            self.lctx.push_local(fresh);
            binders.push(fresh);
            t = body;
        }
        let body = self.arena.replace_locals(t, &subst);
        (binders, body)
    }

    /// Transform the body of a lambda chain without lifting the chain.
    pub(crate) fn visit_lambda_core(&mut self, e: ExprId) -> Result<ExprId, LiftError> {
        let (binders, body) = self.enter_lambdas(e);
        let body = self.visit(body)?;
        self.lctx.pop(binders.iter().map(|binder| binder.id));
        Ok(self.arena.lambdas(&binders, body))
    }

    fn visit_lambda(&mut self, e: ExprId) -> Result<ExprId, LiftError> {
        let new_e = self.visit_lambda_core(e)?;
        let (closed, captured) = self.abstract_locals(new_e)?;
        let callee = self.declare_aux_def(closed)?;
        // Captures were abstracted most-recent first, so the oldest one is
        // the outermost parameter.
        let args: SmallVec<[ExprId; 4]> = captured
            .iter()
            .rev()
            .map(|&local| self.arena.local(local))
            .collect();
        debug!(captures = captured.len(), "replaced abstraction");
        Ok(self.arena.app(callee, &args))
    }

    fn visit_let(&mut self, e: ExprId) -> Result<ExprId, LiftError> {
        let mut bindings: SmallVec<[(Binder, ExprId); 4]> = SmallVec::new();
        let mut subst = Subst::default();
        let mut t = e;
        while let ExprKind::Let {
            binder,
            value,
            body,
        } = self.arena.kind(t)
        {
            let value = self.arena.replace_locals(value, &subst);
            let value = self.visit(value)?;
            let fresh = self.arena.fresh_binder(binder.name);
            let reference = self.arena.local(fresh.id);
            subst.insert(binder.id, reference);
            self.lctx.push_let(fresh, value);
            bindings.push((fresh, value));
            t = body;
        }
        let body = self.arena.replace_locals(t, &subst);
        let body = self.visit(body)?;
        self.lctx.pop(bindings.iter().map(|(binder, _)| binder.id));
        Ok(self.arena.lets(&bindings, body))
    }

    fn visit_app(&mut self, e: ExprId) -> Result<ExprId, LiftError> {
        if let Some(head) = self.arena.app_head_global(e) {
            if let GlobalKind::Dispatcher { inductive } = self.classify(head)? {
                return self.visit_cases_on_app(e, head, inductive);
            }
        }

        // Reducing first avoids lifting lambdas applied where they are defined.
        let reduced = self.arena.head_beta(e);
        if reduced != e {
            return self.visit(reduced);
        }

        let func = self.arena.app_head(e);
        let args = self.arena.app_args(e).to_vec();
        let new_func = self.visit(func)?;
        let mut changed = new_func != func;
        let mut new_args: SmallVec<[ExprId; 4]> = SmallVec::with_capacity(args.len());
        for &arg in &args {
            let new_arg = self.visit(arg)?;
            changed |= new_arg != arg;
            new_args.push(new_arg);
        }
        Ok(if changed {
            self.arena.app(new_func, &new_args)
        } else {
            e
        })
    }
}
