//! Shared test utilities for the lifting passes.
//!
//! [`Fixture`] owns an arena, an interner and an environment with:
//!
//! - `g`: ordinary function, `add`: builtin
//! - `Pair` (2 parameters): constructor `Pair.mk` (arity 4), dispatcher
//!   `Pair.casesOn`, projection `Pair.fst`
//! - `List` (1 parameter): `List.nil` (arity 1), `List.cons` (arity 3),
//!   dispatcher `List.casesOn`
//!
//! Synthetic procedures are named with the prefix `test`. Only compiled in
//! test builds.

use lamc_ir::{
    Binder, DeclTable, ExprArena, ExprId, Name, NameCounter, NameSupply, Procedure, StringInterner,
};

use crate::lift::LambdaLifter;
use crate::{lambda_lift, LiftConfig, LiftError, DEFAULT_SUFFIX};

pub(crate) struct Fixture {
    pub(crate) interner: StringInterner,
    pub(crate) arena: ExprArena,
    pub(crate) env: DeclTable,
    pub(crate) counter: NameCounter,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        let interner = StringInterner::new();
        let mut env = DeclTable::new();
        env.add_function(interner.intern("g"));
        env.add_builtin(interner.intern("add"));
        env.add_projection(interner.intern("Pair.fst"));
        env.add_inductive(
            interner.intern("Pair"),
            2,
            interner.intern("Pair.casesOn"),
            &[(interner.intern("Pair.mk"), 4)],
        );
        env.add_inductive(
            interner.intern("List"),
            1,
            interner.intern("List.casesOn"),
            &[
                (interner.intern("List.nil"), 1),
                (interner.intern("List.cons"), 3),
            ],
        );
        Self {
            interner,
            arena: ExprArena::new(),
            env,
            counter: NameCounter::new(),
        }
    }

    pub(crate) fn name(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    pub(crate) fn binder(&mut self, s: &str) -> Binder {
        let name = self.interner.intern(s);
        self.arena.fresh_binder(name)
    }

    /// Reference to a binder's local.
    pub(crate) fn var(&mut self, binder: Binder) -> ExprId {
        self.arena.local(binder.id)
    }

    pub(crate) fn global(&mut self, s: &str) -> ExprId {
        let name = self.interner.intern(s);
        self.arena.global(name)
    }

    /// `f args...` for a global `f`.
    pub(crate) fn call(&mut self, f: &str, args: &[ExprId]) -> ExprId {
        let f = self.global(f);
        self.arena.app(f, args)
    }

    /// `fun binders... => body`.
    pub(crate) fn lam(&mut self, binders: &[Binder], body: ExprId) -> ExprId {
        self.arena.lambdas(binders, body)
    }

    pub(crate) fn proc(&self, name: &str, body: ExprId) -> Procedure {
        Procedure::new(self.name(name), body)
    }

    /// Run the whole pass with validation on.
    pub(crate) fn lift(&mut self, procs: &[Procedure]) -> Result<Vec<Procedure>, LiftError> {
        let mut procs = procs.to_vec();
        let config = LiftConfig::new(self.name("test")).with_validation(true);
        lambda_lift(
            &mut self.arena,
            &self.env,
            &self.interner,
            &self.counter,
            &config,
            &mut procs,
        )?;
        Ok(procs)
    }

    /// A lifter with an empty scope, for driving single steps.
    pub(crate) fn lifter(&mut self) -> LambdaLifter<'_> {
        let prefix = self.interner.intern("test");
        let supply = NameSupply::new(&self.counter, &self.interner, prefix, DEFAULT_SUFFIX);
        LambdaLifter::new(&mut self.arena, &self.env, &self.interner, supply)
    }

    pub(crate) fn names(&self, procs: &[Procedure]) -> Vec<&'static str> {
        procs
            .iter()
            .map(|proc| self.interner.lookup(proc.name))
            .collect()
    }

    pub(crate) fn show(&self, e: ExprId) -> String {
        self.arena.display(e, &self.interner).to_string()
    }

    /// Assert `actual` equals `expected` up to bound-local renaming.
    #[track_caller]
    pub(crate) fn assert_alpha_eq(&self, actual: ExprId, expected: ExprId) {
        assert!(
            self.arena.alpha_eq(actual, expected),
            "expected `{}`\n     got `{}`",
            self.show(expected),
            self.show(actual),
        );
    }
}
