use crate::driver::{Driver, DriverParams, SolveError, SolveResult};
use crate::encoder::Clause;
use log::debug;
use sattrait::{Literal, SatEngine, TheoryOracle};
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

/// Whether a proposition follows from a set of facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truth {
    /// The facts entail the proposition.
    True,
    /// The facts entail its negation.
    False,
    /// Both are possible, or an iteration budget ran out.
    Unknown,
}

#[derive(Debug, Error)]
pub enum AskError {
    #[error("the facts are unsatisfiable")]
    InconsistentFacts,
    #[error(transparent)]
    Solve(#[from] SolveError),
}

/// Decide `facts ⊨ proposition` by solving `facts ∧ p` and `facts ∧ ¬p`
/// on two threads. Each side gets its own engine and oracle.
pub fn ask<A, E, T, FE, FT>(
    facts: &[Clause<A>],
    proposition: &Literal<A>,
    new_engine: FE,
    new_oracle: FT,
    params: &DriverParams,
) -> Result<Truth, AskError>
where
    A: Clone + Eq + Hash + Debug + Send + Sync,
    E: SatEngine,
    T: TheoryOracle<A>,
    FE: Fn() -> E + Sync,
    FT: Fn() -> T + Sync,
{
    let _p = hprof::enter("ask");
    let run = |lit: Literal<A>| -> Result<SolveResult<A>, SolveError> {
        let mut formula = facts.to_vec();
        formula.push(Clause::new(vec![lit]));
        let mut driver = Driver::with_params(new_engine(), new_oracle(), params.clone());
        driver.solve(&formula)
    };

    let (with, without) = std::thread::scope(|s| {
        let with = s.spawn(|| run(proposition.clone()));
        let without = run(!proposition.clone());
        let with = match with.join() {
            Ok(r) => r,
            Err(panic) => std::panic::resume_unwind(panic),
        };
        (with, without)
    });

    let truth = match (with?, without?) {
        (SolveResult::Unsatisfiable, SolveResult::Unsatisfiable) => return Err(AskError::InconsistentFacts),
        (SolveResult::Satisfiable(_), SolveResult::Unsatisfiable) => Truth::True,
        (SolveResult::Unsatisfiable, SolveResult::Satisfiable(_)) => Truth::False,
        _ => Truth::Unknown,
    };
    debug!("ask: {:?}", truth);
    Ok(truth)
}
