//! lamc IR - erased expressions for the backend passes
//!
//! This crate contains the data the lamc backend passes read and rewrite:
//! - Names for interned global identifiers
//! - An arena of immutable, shared expression nodes
//! - Local declarations and the scope that tracks them
//! - Top-level procedures
//! - The read-only environment interface (constructor/dispatcher queries)
//! - Fresh-name generation for synthetic procedures
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: Strings → Name(u32)
//! - **Flatten Everything**: No `Box<Expr>`, use `ExprId(u32)` indices
//! - **Never Mutate**: Rewrites build new nodes; originals stay valid
//!
//! Locals are referenced by declaration identity ([`LocalId`]) rather than
//! by de Bruijn index; see the `ops` module for the binder discipline that
//! keeps substitution capture-free.

mod arena;
mod env;
mod expr;
mod fresh;
mod ids;
mod interner;
mod local_context;
mod name;
mod ops;
mod pretty;
mod procedure;
pub mod stack;

pub use arena::ExprArena;
pub use env::{DeclTable, Environment, GlobalKind, InductiveInfo};
pub use expr::{Binder, ExprKind, Literal};
pub use fresh::{NameCounter, NameSupply};
pub use ids::{ExprId, ExprRange, LocalId};
pub use interner::{InternError, StringInterner};
pub use local_context::{LocalContext, LocalDecl};
pub use name::Name;
pub use ops::Subst;
pub use pretty::{ExprDisplay, ProcedureDisplay};
pub use procedure::Procedure;
