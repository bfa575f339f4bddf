//! Lifting several compilation units in parallel.

use lamc_ir::{Environment, ExprArena, NameCounter, Procedure, StringInterner};
use rayon::prelude::*;

use crate::{lambda_lift, LiftConfig, LiftError};

/// A compilation unit: its own expression storage, its procedures and how
/// to name the procedures it spawns.
#[derive(Clone, Debug)]
pub struct CompilationUnit {
    pub arena: ExprArena,
    pub procedures: Vec<Procedure>,
    pub config: LiftConfig,
}

impl CompilationUnit {
    pub fn new(arena: ExprArena, procedures: Vec<Procedure>, config: LiftConfig) -> Self {
        Self {
            arena,
            procedures,
            config,
        }
    }
}

/// Lift every unit, one rayon task per unit.
///
/// Units share the environment, the interner and the name counter; synthetic
/// names stay unique across units because the counter is shared. A failing
/// unit keeps its input procedures and does not affect the others. Results
/// are in unit order.
pub fn lift_units(
    units: &mut [CompilationUnit],
    env: &dyn Environment,
    interner: &StringInterner,
    counter: &NameCounter,
) -> Vec<Result<(), LiftError>> {
    units
        .par_iter_mut()
        .map(|unit| {
            lambda_lift(
                &mut unit.arena,
                env,
                interner,
                counter,
                &unit.config,
                &mut unit.procedures,
            )
        })
        .collect()
}
