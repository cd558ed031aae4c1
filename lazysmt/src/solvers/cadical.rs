//! [CaDiCaL SAT Solver](http://fmv.jku.at/cadical/)

use sattrait::{Cnf, SatEngine, SatOutcome};

/// Runs every call on a fresh solver instance, so nothing learnt in one
/// call is visible in the next.
#[derive(Default)]
pub struct Cadical {
    config: Option<String>,
    pub calls: usize,
}

impl std::fmt::Debug for Cadical {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cadical engine {{ config: {:?}, calls: {} }}", self.config, self.calls)
    }
}

impl Cadical {
    pub fn new() -> Self {
        Default::default()
    }

    /// Use one of CaDiCaL's named configurations, e.g. `"plain"` or `"sat"`.
    pub fn with_config(config: &str) -> Result<Self, ::cadical::Error> {
        // fail early on unknown names
        ::cadical::Solver::with_config(config)?;
        Ok(Cadical {
            config: Some(config.to_string()),
            calls: 0,
        })
    }

    pub fn config(&self) -> Option<&str> {
        self.config.as_deref()
    }

    fn instance(&self) -> ::cadical::Solver {
        match &self.config {
            Some(c) => ::cadical::Solver::with_config(c)
                .unwrap_or_else(|e| panic!("cadical configuration {:?} accepted once, now rejected: {:?}", c, e)),
            None => ::cadical::Solver::new(),
        }
    }
}

impl SatEngine for Cadical {
    fn solve(&mut self, cnf: &Cnf) -> SatOutcome {
        let _p = hprof::enter("cadical");
        self.calls += 1;
        let mut solver = self.instance();
        for clause in cnf.clauses() {
            solver.add_clause(clause.iter().cloned());
        }
        match solver.solve() {
            Some(true) => {
                let max = solver.max_variable();
                let model = (1..=cnf.num_vars() as i32)
                    .map(|v| if v <= max && solver.value(v) == Some(true) { v } else { -v })
                    .collect();
                SatOutcome::Sat(model)
            }
            Some(false) => SatOutcome::Unsat,
            None => panic!("Resource limits are not supported by the cadical engine"),
        }
    }
}
