use crate::conflict::{self, ConflictPolicy};
use crate::encoder::{decode, encode, Clause, EncodingLookupError};
use log::{debug, info, trace, warn};
use sattrait::{Literal, Membership, SatEngine, SatOutcome, TheoryOracle, Verdict};
use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct DriverParams {
    pub policy: ConflictPolicy,
    /// Give up with `SolveResult::Unknown` after this many SAT engine calls.
    pub max_iterations: Option<usize>,
    pub verbosity: u32,
}

impl Default for DriverParams {
    fn default() -> Self {
        DriverParams {
            policy: Default::default(),
            max_iterations: None,
            verbosity: 0,
        }
    }
}

#[derive(Default, Debug, Clone)]
pub struct DriverStatistics {
    /// SAT engine calls.
    pub iterations: usize,
    pub conflict_clauses: usize,
    pub oracle_calls: usize,
    /// Oracle calls spent shrinking explanations.
    pub shrink_checks: usize,
    pub unsupported_atoms: usize,
}

/// Satisfying assignment over every atom of the formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness<A> {
    assignment: Vec<Literal<A>>,
}

impl<A: PartialEq> Witness<A> {
    pub fn assignment(&self) -> &[Literal<A>] {
        &self.assignment
    }

    pub fn into_assignment(self) -> Vec<Literal<A>> {
        self.assignment
    }

    pub fn value(&self, atom: &A) -> Option<bool> {
        self.assignment
            .iter()
            .find(|l| l.atom == *atom)
            .map(|l| l.positive)
    }

    /// Check the boolean structure of `formula` against the assignment.
    pub fn satisfies(&self, formula: &[Clause<A>]) -> bool {
        formula.iter().all(|c| c.is_satisfied_by(&self.assignment))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveResult<A> {
    Satisfiable(Witness<A>),
    Unsatisfiable,
    /// The iteration budget ran out.
    Unknown,
}

impl<A> SolveResult<A> {
    pub fn is_sat(&self) -> bool {
        matches!(self, SolveResult::Satisfiable(_))
    }

    pub fn is_unsat(&self) -> bool {
        matches!(self, SolveResult::Unsatisfiable)
    }

    pub fn witness(&self) -> Option<&Witness<A>> {
        match self {
            SolveResult::Satisfiable(w) => Some(w),
            _ => None,
        }
    }
}

/// Internal faults. Satisfiable and unsatisfiable are ordinary results.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error(transparent)]
    Lookup(#[from] EncodingLookupError),
    #[error("sat engine returned {got} values for {expected} variables")]
    MalformedAssignment { expected: usize, got: usize },
    #[error("oracle explained a conflict with {0}, which is not part of the assignment")]
    ExplanationNotInAssignment(String),
}

enum State<A> {
    Searching,
    Checking(Vec<Literal<A>>),
    Sat(Witness<A>),
    Unsat,
}

/// The lazy SMT loop: the SAT engine proposes assignments, the oracle
/// rejects theory-inconsistent ones, and each rejection becomes a clause.
///
/// The driver owns one engine and one oracle. Encoding table and formula
/// live only for the duration of one `solve` call.
pub struct Driver<E, T> {
    pub engine: E,
    pub oracle: T,
    pub params: DriverParams,
    pub stats: DriverStatistics,
}

impl<E: SatEngine, T> Driver<E, T> {
    pub fn new(engine: E, oracle: T) -> Self {
        Driver {
            engine,
            oracle,
            params: Default::default(),
            stats: Default::default(),
        }
    }

    pub fn with_params(engine: E, oracle: T, params: DriverParams) -> Self {
        Driver {
            params,
            ..Self::new(engine, oracle)
        }
    }

    /// Decide `formula`. Terminates within `2^atoms` iterations because
    /// every conflict clause blocks the assignment that caused it and the
    /// oracle never introduces atoms.
    pub fn solve<A>(&mut self, formula: &[Clause<A>]) -> Result<SolveResult<A>, SolveError>
    where
        A: Clone + Eq + Hash + Debug,
        T: TheoryOracle<A>,
    {
        let _p = hprof::enter("lazy smt solve");
        let solve_start = cpu_time::ProcessTime::now();
        self.stats = Default::default();

        let (mut cnf, mut table) = encode(formula);
        debug!("-> SOLVE (atoms={}, clauses={})", table.len(), cnf.num_clauses());

        let mut theory_atoms: HashSet<A> = HashSet::new();
        for atom in table.atoms() {
            match self.oracle.classify(atom) {
                Ok(Membership::Theory) => {
                    theory_atoms.insert(atom.clone());
                }
                Ok(Membership::Boolean) => {}
                Err(e) => {
                    warn!("{}; passing it through unchecked", e);
                    self.stats.unsupported_atoms += 1;
                }
            }
        }

        let mut state = State::Searching;
        let result = loop {
            state = match state {
                State::Searching => {
                    if let Some(max) = self.params.max_iterations {
                        if self.stats.iterations >= max {
                            info!("iteration budget of {} exhausted", max);
                            break SolveResult::Unknown;
                        }
                    }
                    self.stats.iterations += 1;
                    debug!(
                        "iteration {} ({} conflict clauses)",
                        self.stats.iterations, self.stats.conflict_clauses
                    );

                    match self.engine.solve(&cnf) {
                        SatOutcome::Unsat => State::Unsat,
                        SatOutcome::Sat(values) => {
                            if values.len() != table.len() {
                                return Err(SolveError::MalformedAssignment {
                                    expected: table.len(),
                                    got: values.len(),
                                });
                            }
                            State::Checking(decode(&values, &table)?)
                        }
                    }
                }

                State::Checking(assignment) => {
                    let theory_lits = assignment
                        .iter()
                        .filter(|l| theory_atoms.contains(&l.atom))
                        .cloned()
                        .collect::<Vec<_>>();
                    self.stats.oracle_calls += 1;
                    match self.oracle.check(&theory_lits) {
                        Verdict::Consistent => State::Sat(Witness { assignment }),
                        Verdict::Inconsistent(explanation) => {
                            let explanation = self.explanation(explanation, theory_lits);
                            for l in explanation.iter() {
                                if !assignment.contains(l) {
                                    return Err(SolveError::ExplanationNotInAssignment(format!("{:?}", l)));
                                }
                            }
                            let clause = conflict::build(&explanation);
                            trace!("conflict clause {:?}", clause);
                            cnf.add_clause(table.encode_clause(&clause));
                            self.stats.conflict_clauses += 1;
                            State::Searching
                        }
                    }
                }

                State::Sat(witness) => break SolveResult::Satisfiable(witness),
                State::Unsat => break SolveResult::Unsatisfiable,
            };
        };

        if self.params.verbosity >= 1 {
            self.stats_info(solve_start);
        }
        debug!(
            "<- SOLVE {}",
            match result {
                SolveResult::Satisfiable(_) => "sat",
                SolveResult::Unsatisfiable => "unsat",
                SolveResult::Unknown => "unknown",
            }
        );
        Ok(result)
    }

    fn explanation<A>(&mut self, given: Option<Vec<Literal<A>>>, theory_lits: Vec<Literal<A>>) -> Vec<Literal<A>>
    where
        A: Clone,
        T: TheoryOracle<A>,
    {
        match self.params.policy {
            ConflictPolicy::Naive => theory_lits,
            ConflictPolicy::Minimal { shrink } => {
                let explanation = match given {
                    Some(e) => e,
                    None => {
                        debug!("no explanation from oracle, blocking the whole assignment");
                        theory_lits
                    }
                };
                if shrink && !self.oracle.minimal_explanations() {
                    let (core, checks) = conflict::shrink(&mut self.oracle, explanation);
                    self.stats.shrink_checks += checks;
                    core
                } else {
                    explanation
                }
            }
        }
    }

    pub fn stats_info(&self, solve_start: cpu_time::ProcessTime) {
        let duration = cpu_time::ProcessTime::now()
            .duration_since(solve_start)
            .as_millis() as f64
            / 1000.0;
        info!("* lazy smt stats:");
        info!("  - iterations: {}", self.stats.iterations);
        info!("  - conflict clauses: {}", self.stats.conflict_clauses);
        info!(
            "  - oracle calls: {} ({} shrinking)",
            self.stats.oracle_calls + self.stats.shrink_checks,
            self.stats.shrink_checks
        );
        if self.stats.unsupported_atoms > 0 {
            info!("  - unchecked atoms: {}", self.stats.unsupported_atoms);
        }
        info!("  - cpu time: {:.2}s", duration);
    }
}

/// Solve with default parameters.
pub fn solve<A, E, T>(formula: &[Clause<A>], engine: E, oracle: T) -> Result<SolveResult<A>, SolveError>
where
    A: Clone + Eq + Hash + Debug,
    E: SatEngine,
    T: TheoryOracle<A>,
{
    Driver::new(engine, oracle).solve(formula)
}
