//! Output invariant checks.
//!
//! [`check_output`] reports every violated invariant of a lifted
//! procedure list; [`validate`] asserts there are none in debug builds.
//! Both are cheap enough to run after every unit in tests, and the pass
//! runs [`validate`] itself when [`LiftConfig::validate`] is set.
//!
//! [`LiftConfig::validate`]: crate::LiftConfig::validate

use std::fmt;

use lamc_ir::{Environment, ExprArena, ExprKind, GlobalKind, LocalId, Name, Procedure};
use rustc_hash::FxHashSet;

/// A violated output invariant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputProblem {
    /// The output does not start with the input procedures, in order.
    PrefixChanged { index: usize },
    /// Two procedures share a name.
    DuplicateName { name: Name },
    /// A procedure body has a free local.
    NotClosed { procedure: Name, local: LocalId },
    /// A minor premise binds fewer fields than its constructor has.
    DispatchArmLifted {
        procedure: Name,
        dispatcher: Name,
        minor: usize,
    },
}

impl fmt::Display for OutputProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputProblem::PrefixChanged { index } => {
                write!(f, "procedure {index} does not match the input")
            }
            OutputProblem::DuplicateName { name } => write!(f, "{name:?} is declared twice"),
            OutputProblem::NotClosed { procedure, local } => {
                write!(f, "{procedure:?} refers to free local {local}")
            }
            OutputProblem::DispatchArmLifted {
                procedure,
                dispatcher,
                minor,
            } => write!(
                f,
                "{procedure:?}: minor premise {minor} of {dispatcher:?} does not bind its fields"
            ),
        }
    }
}

/// Check the invariants lifting guarantees for `output`, given the
/// procedures it was produced from.
pub fn check_output(
    arena: &ExprArena,
    env: &dyn Environment,
    input: &[Procedure],
    output: &[Procedure],
) -> Vec<OutputProblem> {
    let mut problems = Vec::new();

    for (index, proc) in input.iter().enumerate() {
        if output.get(index).map(|out| out.name) != Some(proc.name) {
            problems.push(OutputProblem::PrefixChanged { index });
        }
    }

    let mut seen = FxHashSet::default();
    for proc in output {
        if !seen.insert(proc.name) {
            problems.push(OutputProblem::DuplicateName { name: proc.name });
        }
        if let Some(&local) = arena.free_locals(proc.body).first() {
            problems.push(OutputProblem::NotClosed {
                procedure: proc.name,
                local,
            });
        }
        check_dispatch_arms(arena, env, proc, &mut problems);
    }

    problems
}

fn check_dispatch_arms(
    arena: &ExprArena,
    env: &dyn Environment,
    proc: &Procedure,
    problems: &mut Vec<OutputProblem>,
) {
    arena.for_each_node(proc.body, &mut |_, kind: ExprKind| {
        let ExprKind::App { func, args } = kind else {
            return;
        };
        let ExprKind::Global(dispatcher) = arena.kind(func) else {
            return;
        };
        let Some(GlobalKind::Dispatcher { inductive }) = env.classify(dispatcher) else {
            return;
        };
        // Malformed dispatch is reported by lifting itself.
        let Some(info) = env.inductive(inductive) else {
            return;
        };
        let args = arena.get_expr_list(args);
        for (i, &ctor) in info.constructors.iter().enumerate() {
            let Some(&minor) = args.get(1 + i) else {
                return;
            };
            let fields = env
                .constructor_arity(ctor)
                .and_then(|arity| arity.checked_sub(info.num_params))
                .and_then(|fields| usize::try_from(fields).ok());
            let (binders, _) = arena.binder_chain(minor);
            if fields.is_some_and(|fields| binders.len() < fields) {
                problems.push(OutputProblem::DispatchArmLifted {
                    procedure: proc.name,
                    dispatcher,
                    minor: i,
                });
            }
        }
    });
}

/// Assert in debug builds that `output` satisfies every invariant.
pub fn validate(
    arena: &ExprArena,
    env: &dyn Environment,
    input: &[Procedure],
    output: &[Procedure],
) {
    let problems = check_output(arena, env, input, output);
    debug_assert!(
        problems.is_empty(),
        "lambda lifting broke its output invariants:\n{}",
        problems
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    );
}
