//! Small reference SAT engine.
//!
//! Plain DPLL: unit propagation to a fixpoint, branching on the lowest
//! unassigned variable, chronological backtracking. Every call to
//! `Solver::solve` loads the formula from scratch, so nothing leaks from
//! one call into the next.

use log::{debug, info, trace};
use sattrait::{Cnf, SatEngine, SatOutcome};
use thiserror::Error;

pub mod bools;
pub use bools::*;

pub struct SolverParams {
    /// Polarity tried first when branching.
    pub default_phase: bool,
}

impl Default for SolverParams {
    fn default() -> Self {
        SolverParams {
            default_phase: false,
        }
    }
}

#[derive(Default, Debug)]
pub struct SolverStatistics {
    pub solves: usize,
    pub decisions: usize,
    pub propagations: usize,
    pub conflicts: usize,
}

pub struct Solver {
    pub verbosity: u32,
    pub params: SolverParams,
    pub stats: SolverStatistics,
    // Extra results (read-only for consumer)
    pub model: Vec<LBool>,

    clauses: Vec<Vec<Lit>>,
    ok: bool,
    assigns: Vec<LBool>,
    trail: Vec<Lit>,
    trail_lim: Vec<usize>,
    // whether the decision on each level has already been flipped
    flipped: Vec<bool>,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    pub fn new() -> Self {
        Solver {
            verbosity: 0,
            params: Default::default(),
            stats: Default::default(),
            model: Vec::new(),
            clauses: Vec::new(),
            ok: true,
            assigns: Vec::new(),
            trail: Vec::new(),
            trail_lim: Vec::new(),
            flipped: Vec::new(),
        }
    }

    pub fn num_vars(&self) -> usize {
        self.assigns.len()
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    fn load(&mut self, cnf: &Cnf) {
        self.clauses.clear();
        self.trail.clear();
        self.trail_lim.clear();
        self.flipped.clear();
        self.model.clear();
        self.assigns.clear();
        self.assigns.resize(cnf.num_vars() as usize, LBOOL_UNDEF);
        self.ok = true;

        for c in cnf.clauses() {
            let mut clause: Vec<Lit> = Vec::with_capacity(c.len());
            let mut tautology = false;
            for l in c.iter().map(|l| Lit::from_dimacs(*l)) {
                if clause.contains(&!l) {
                    tautology = true;
                    break;
                }
                if !clause.contains(&l) {
                    clause.push(l);
                }
            }
            if tautology {
                continue;
            }
            if clause.is_empty() {
                trace!("empty clause, formula is trivially unsat");
                self.ok = false;
            }
            self.clauses.push(clause);
        }
    }

    fn lit_value(&self, lit: Lit) -> LBool {
        self.assigns[lit.var().idx()].xor(lit.sign())
    }

    fn unchecked_enqueue(&mut self, lit: Lit) {
        trace!("assign {}", lit.to_dimacs());
        debug_assert!(self.lit_value(lit) == LBOOL_UNDEF);
        self.assigns[lit.var().idx()] = LBool::from_bool(!lit.sign());
        self.trail.push(lit);
    }

    /// Returns false on conflict.
    fn propagate(&mut self) -> bool {
        loop {
            let mut changed = false;
            for ci in 0..self.clauses.len() {
                let mut satisfied = false;
                let mut nof_undef = 0;
                let mut last_undef = None;
                for l in self.clauses[ci].iter() {
                    let value = self.lit_value(*l);
                    if value == LBOOL_TRUE {
                        satisfied = true;
                        break;
                    } else if value == LBOOL_UNDEF {
                        nof_undef += 1;
                        last_undef = Some(*l);
                    }
                }

                if satisfied {
                    continue;
                }
                match (nof_undef, last_undef) {
                    (0, _) => {
                        trace!("conflict in clause {}", ci);
                        self.stats.conflicts += 1;
                        return false;
                    }
                    (1, Some(unit)) => {
                        self.stats.propagations += 1;
                        self.unchecked_enqueue(unit);
                        changed = true;
                    }
                    _ => {}
                }
            }
            if !changed {
                return true;
            }
        }
    }

    fn new_decision_level(&mut self, flipped: bool) {
        self.trail_lim.push(self.trail.len());
        self.flipped.push(flipped);
    }

    fn cancel_until(&mut self, level: usize) {
        if self.trail_lim.len() > level {
            let lim = self.trail_lim[level];
            for lit in self.trail.drain(lim..) {
                self.assigns[lit.var().idx()] = LBOOL_UNDEF;
            }
            self.trail_lim.truncate(level);
            self.flipped.truncate(level);
        }
    }

    /// Undo decisions until one can be flipped. Returns false when the
    /// search space is exhausted.
    fn backtrack(&mut self) -> bool {
        while let Some(&lim) = self.trail_lim.last() {
            let level = self.trail_lim.len() - 1;
            let decision = self.trail[lim];
            let already_flipped = self.flipped[level];
            self.cancel_until(level);
            if !already_flipped {
                trace!("flip decision {}", decision.to_dimacs());
                self.new_decision_level(true);
                self.unchecked_enqueue(!decision);
                return true;
            }
        }
        false
    }

    fn pick_branch_lit(&self) -> Option<Lit> {
        (0..self.assigns.len())
            .find(|v| self.assigns[*v] == LBOOL_UNDEF)
            .map(|v| Lit::new(Var(v as u32), !self.params.default_phase))
    }

    fn search(&mut self) -> LBool {
        loop {
            if !self.propagate() {
                if !self.backtrack() {
                    return LBOOL_FALSE;
                }
                continue;
            }

            match self.pick_branch_lit() {
                None => return LBOOL_TRUE,
                Some(lit) => {
                    self.stats.decisions += 1;
                    self.new_decision_level(false);
                    self.unchecked_enqueue(lit);
                }
            }
        }
    }

    pub fn solve(&mut self, cnf: &Cnf) -> SatOutcome {
        #[cfg(feature = "profiler")]
        let _p = hprof::enter("dpll solve");
        debug!("-> SOLVE (vars={}, clauses={})", cnf.num_vars(), cnf.num_clauses());
        let solve_start = cpu_time::ProcessTime::now();
        self.stats.solves += 1;
        self.load(cnf);

        let status = if self.ok { self.search() } else { LBOOL_FALSE };

        let outcome = if status == LBOOL_TRUE {
            self.model = self.assigns.clone();
            SatOutcome::Sat(
                self.assigns
                    .iter()
                    .enumerate()
                    .map(|(v, value)| Lit::new(Var(v as u32), *value != LBOOL_TRUE).to_dimacs())
                    .collect(),
            )
        } else {
            SatOutcome::Unsat
        };

        if self.verbosity >= 1 {
            self.stats_info(solve_start);
        }
        debug!("<- SOLVE {}", if outcome.is_sat() { "sat" } else { "unsat" });
        outcome
    }

    pub fn stats_info(&self, solve_start: cpu_time::ProcessTime) {
        let duration = cpu_time::ProcessTime::now()
            .duration_since(solve_start)
            .as_millis() as f64
            / 1000.0;
        info!("* stats:");
        info!("  - decisions: {}", self.stats.decisions);
        info!("  - propagations: {}", self.stats.propagations);
        info!("  - conflicts: {}", self.stats.conflicts);
        info!("  - cpu time: {:.2}s", duration);
    }
}

impl SatEngine for Solver {
    fn solve(&mut self, cnf: &Cnf) -> SatOutcome {
        Solver::solve(self, cnf)
    }
}

#[derive(Debug, Error)]
pub enum DimacsError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("dimacs parse error: {0}")]
    Parse(String),
    #[error("not a cnf instance")]
    NotCnf,
}

pub fn cnf_from_dimacs(text: &str) -> Result<Cnf, DimacsError> {
    let instance = dimacs::parse_dimacs(text).map_err(|e| DimacsError::Parse(format!("{:?}", e)))?;
    match instance {
        dimacs::Instance::Cnf { num_vars, clauses } => {
            let mut cnf = Cnf::new();
            cnf.reserve_vars(num_vars as u32);
            for c in clauses.iter() {
                trace!("clause {:?}", c);
                cnf.add_clause(c.lits().iter().map(|l| {
                    let v = l.var().to_u64() as i32;
                    if l.sign() == dimacs::Sign::Neg {
                        -v
                    } else {
                        v
                    }
                }));
            }
            Ok(cnf)
        }
        _ => Err(DimacsError::NotCnf),
    }
}

pub fn cnf_from_dimacs_filename(filename: &str) -> Result<Cnf, DimacsError> {
    let text = std::fs::read_to_string(filename).map_err(|source| DimacsError::Io {
        path: filename.to_string(),
        source,
    })?;
    cnf_from_dimacs(&text)
}
