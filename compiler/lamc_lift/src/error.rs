//! Contract violations detected while lifting.
//!
//! Lambda lifting is total on well-formed input. Every variant here means
//! an upstream pass (erasure, eta-expansion, scope tracking) broke its
//! contract; the whole compilation unit is abandoned rather than patched.

use lamc_ir::LocalId;

/// Error raised when the input violates the pass's preconditions.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LiftError {
    /// A dispatcher application has fewer arguments than the major premise
    /// plus one minor premise per constructor.
    #[error("`{dispatcher}` applied to {found} arguments, expected at least {expected}")]
    DispatchArity {
        dispatcher: String,
        expected: usize,
        found: usize,
    },

    /// A local reference with no declaration in any enclosing scope.
    #[error("local {local} is not bound by any enclosing binder")]
    UnboundLocal { local: LocalId },

    /// A global the environment cannot classify.
    #[error("unknown global `{name}`")]
    UnknownGlobal { name: String },

    /// A dispatcher whose inductive type is not registered.
    #[error("unknown inductive type `{name}`")]
    UnknownInductive { name: String },

    /// A constructor listed by an inductive type without a known arity.
    #[error("unknown constructor `{name}`")]
    UnknownConstructor { name: String },

    /// A constructor whose arity is smaller than its type's parameter count.
    #[error("constructor `{constructor}` has arity {arity} but its type has {params} parameters")]
    ConstructorArity {
        constructor: String,
        arity: u32,
        params: u32,
    },
}
