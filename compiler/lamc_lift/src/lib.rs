//! Lambda lifting for the lamc backend.
//!
//! After erasure, procedure bodies may still contain nested lambda
//! abstractions that refer to locals of their enclosing scopes. The
//! evaluator only understands top-level procedures, so this pass turns
//! every nested abstraction into a call of a new, closed procedure:
//!
//! ```text
//! def foo := fun x => g (fun y => Pair.mk y x)
//! ```
//!
//! becomes
//!
//! ```text
//! def foo := fun x => g (foo._lambda_1 x)
//! def foo._lambda_1 := fun x => fun y => Pair.mk y x
//! ```
//!
//! Three kinds of lambda are left alone: the parameter chain at the top
//! of a procedure body, the field binders of a dispatcher's minor
//! premises, and lambdas applied where they are defined (beta-reduced
//! away instead).
//!
//! # Output
//!
//! - The input procedures come first, in input order, followed by the
//!   synthetic procedures in discovery order.
//! - Every body is closed.
//! - Synthetic names are `{prefix}.{suffix}_{n}`, unique across every unit
//!   sharing a [`NameCounter`].
//!
//! # Tracing
//!
//! Enable with `RUST_LOG=lamc_lift=debug` (one event per lifted procedure)
//! or `RUST_LOG=lamc_lift=trace`, after calling [`init_tracing`].

mod capture;
mod cases;
mod config;
mod declare;
mod error;
mod lift;
mod units;
pub mod validate;

#[cfg(test)]
mod test_helpers;

use std::sync::Once;

use lamc_ir::{Environment, ExprArena, NameCounter, NameSupply, Procedure, StringInterner};
use tracing::debug;

pub use config::{LiftConfig, DEFAULT_SUFFIX};
pub use error::LiftError;
pub use units::{lift_units, CompilationUnit};

use lift::LambdaLifter;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=lamc_lift=debug` or `RUST_LOG=lamc_lift=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Lift every nested lambda of a compilation unit into its own procedure.
///
/// `procs` is replaced by the lifted procedures on success. On error it is
/// left untouched; nodes already pushed to `arena` are unreachable from it
/// and harmless.
///
/// # Errors
///
/// Returns a [`LiftError`] if the input breaks the pass's preconditions: a
/// local with no enclosing binder, a global the environment does not know,
/// or a dispatcher application whose shape disagrees with its inductive
/// type.
#[tracing::instrument(level = "debug", skip_all, fields(
    prefix = interner.lookup(config.prefix),
    procedures = procs.len(),
))]
pub fn lambda_lift(
    arena: &mut ExprArena,
    env: &dyn Environment,
    interner: &StringInterner,
    counter: &NameCounter,
    config: &LiftConfig,
    procs: &mut Vec<Procedure>,
) -> Result<(), LiftError> {
    let supply = NameSupply::new(counter, interner, config.prefix, &config.suffix);
    let output = LambdaLifter::new(arena, env, interner, supply).run(procs)?;

    if config.validate {
        validate::validate(arena, env, procs, &output);
    }

    debug!(
        lifted = output.len() - procs.len(),
        nodes = arena.node_count(),
        "lambda lifting done"
    );
    *procs = output;
    Ok(())
}
