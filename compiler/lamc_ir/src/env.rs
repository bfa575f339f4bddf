//! Read-only environment queries used by backend passes.
//!
//! The backend never owns the name table; it asks an [`Environment`] how a
//! global is compiled and what an inductive type looks like. [`DeclTable`]
//! is a plain in-memory implementation for embedders without a richer
//! table and for tests.

use rustc_hash::FxHashMap;

use crate::Name;

/// How the evaluator treats a global name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GlobalKind {
    /// Data constructor of an inductive type.
    Constructor,
    /// Pattern-match dispatcher (`casesOn`) for `inductive`.
    Dispatcher { inductive: Name },
    /// Structure field projection.
    Projection,
    /// Function implemented natively by the evaluator.
    Builtin,
    /// Ordinary compiled function.
    Function,
}

impl GlobalKind {
    /// Returns `true` for globals that already denote a plain function value
    /// and can be referenced by name without a wrapper procedure.
    #[inline]
    pub fn is_plain_function(self) -> bool {
        matches!(self, GlobalKind::Builtin | GlobalKind::Function)
    }
}

/// Shape of an inductive type, as far as dispatch needs it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InductiveInfo {
    /// Number of type parameters shared by every constructor.
    pub num_params: u32,
    /// Constructors in declaration order; one minor premise each.
    pub constructors: Vec<Name>,
}

impl InductiveInfo {
    /// Number of minor premises a dispatcher for this type takes.
    #[inline]
    pub fn num_minors(&self) -> usize {
        self.constructors.len()
    }
}

/// Environment queries a backend pass may make.
///
/// `Sync` so one environment can serve compilation units lifted on
/// several threads.
pub trait Environment: Sync {
    /// Classify a global, or `None` if the name is not declared.
    fn classify(&self, name: Name) -> Option<GlobalKind>;

    /// Shape of an inductive type.
    fn inductive(&self, name: Name) -> Option<&InductiveInfo>;

    /// Total arity of a constructor, parameters included.
    fn constructor_arity(&self, name: Name) -> Option<u32>;

    /// Returns `true` if `name` is declared.
    fn contains(&self, name: Name) -> bool {
        self.classify(name).is_some()
    }
}

/// In-memory [`Environment`].
#[derive(Clone, Debug, Default)]
pub struct DeclTable {
    kinds: FxHashMap<Name, GlobalKind>,
    inductives: FxHashMap<Name, InductiveInfo>,
    constructor_arities: FxHashMap<Name, u32>,
}

impl DeclTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_function(&mut self, name: Name) {
        self.kinds.insert(name, GlobalKind::Function);
    }

    pub fn add_builtin(&mut self, name: Name) {
        self.kinds.insert(name, GlobalKind::Builtin);
    }

    pub fn add_projection(&mut self, name: Name) {
        self.kinds.insert(name, GlobalKind::Projection);
    }

    /// Declare an inductive type together with its constructors and its
    /// dispatcher.
    ///
    /// `constructors` pairs each constructor with its total arity
    /// (parameters included), in declaration order.
    pub fn add_inductive(
        &mut self,
        name: Name,
        num_params: u32,
        dispatcher: Name,
        constructors: &[(Name, u32)],
    ) {
        for &(ctor, arity) in constructors {
            self.kinds.insert(ctor, GlobalKind::Constructor);
            self.constructor_arities.insert(ctor, arity);
        }
        self.kinds
            .insert(dispatcher, GlobalKind::Dispatcher { inductive: name });
        self.inductives.insert(
            name,
            InductiveInfo {
                num_params,
                constructors: constructors.iter().map(|&(ctor, _)| ctor).collect(),
            },
        );
    }
}

impl Environment for DeclTable {
    fn classify(&self, name: Name) -> Option<GlobalKind> {
        self.kinds.get(&name).copied()
    }

    fn inductive(&self, name: Name) -> Option<&InductiveInfo> {
        self.inductives.get(&name)
    }

    fn constructor_arity(&self, name: Name) -> Option<u32> {
        self.constructor_arities.get(&name).copied()
    }
}
