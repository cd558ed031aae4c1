//! Difference logic over the reals, as a theory oracle.
//!
//! Constraints of the form `x - y <= k` and `x - y < k` (and bounds on a
//! single variable) are decided by looking for positive cycles in a
//! constraint graph. Other linear constraints are reported as unsupported.

use log::{debug, trace};
use sattrait::{Literal, Membership, TheoryOracle, UnsupportedAtomError, Verdict};
use std::collections::HashMap;

mod atom;
mod graph;
mod model;

pub use crate::atom::{Atom, DiffForm, Domain, LinearConstraint, Rel, Wide};
pub use crate::graph::{RdlGraph, Weight};
pub use crate::model::Model;

#[derive(Default, Debug)]
pub struct OracleStatistics {
    pub checks: usize,
    pub conflicts: usize,
}

/// Non-incremental difference logic oracle. Each `check` starts from an
/// empty graph.
#[derive(Debug)]
pub struct RdlOracle {
    pub stats: OracleStatistics,
    graph: RdlGraph,
    nodes: HashMap<String, u32>,
    names: Vec<Option<String>>,
    model: Option<Model>,
}

const ZERO: u32 = 0;

impl Default for RdlOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl RdlOracle {
    pub fn new() -> Self {
        RdlOracle {
            stats: Default::default(),
            graph: RdlGraph::new(),
            nodes: HashMap::new(),
            names: Vec::new(),
            model: None,
        }
    }

    /// Witness for the last consistent check.
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    fn reset(&mut self) {
        self.graph.clear();
        self.nodes.clear();
        self.names.clear();
        self.model = None;
        let zero = self.graph.add_node();
        debug_assert!(zero == ZERO);
        self.names.push(None);
    }

    fn node(&mut self, name: Option<&str>) -> u32 {
        let name = match name {
            None => return ZERO,
            Some(name) => name,
        };
        if let Some(n) = self.nodes.get(name) {
            return *n;
        }
        let n = self.graph.add_node();
        self.nodes.insert(name.to_string(), n);
        self.names.push(Some(name.to_string()));
        n
    }

    fn conflict(&mut self, lits: &[Literal<Atom>], idxs: &[usize]) -> Verdict<Atom> {
        self.stats.conflicts += 1;
        let explanation = idxs.iter().map(|i| lits[*i].clone()).collect::<Vec<_>>();
        debug!("rdl conflict of size {}", explanation.len());
        Verdict::Inconsistent(Some(explanation))
    }
}

impl TheoryOracle<Atom> for RdlOracle {
    fn classify(&self, atom: &Atom) -> Result<Membership, UnsupportedAtomError> {
        match atom {
            Atom::Bool(_) => Ok(Membership::Boolean),
            Atom::Linear(c) => match c.as_difference() {
                Some(_) => Ok(Membership::Theory),
                None => Err(UnsupportedAtomError::new(atom, "not a difference constraint")),
            },
        }
    }

    fn check(&mut self, lits: &[Literal<Atom>]) -> Verdict<Atom> {
        let _p = hprof::enter("rdl check");
        self.stats.checks += 1;
        self.reset();

        for (i, lit) in lits.iter().enumerate() {
            let form = match &lit.atom {
                Atom::Linear(c) => match c.as_difference() {
                    Some(form) => form,
                    None => {
                        trace!("skipping unsupported {}", lit.atom);
                        continue;
                    }
                },
                Atom::Bool(_) => continue,
            };

            match form {
                DiffForm::Const(holds) => {
                    if holds != lit.positive {
                        return self.conflict(lits, &[i]);
                    }
                }
                DiffForm::Diff { x, y, k, strict } => {
                    let (x, y) = (self.node(x), self.node(y));
                    // x - y <= k   becomes  y >= x - k
                    // x - y > k    becomes  x >= y + k + δ
                    let (from, to, weight) = if lit.positive {
                        (x, y, Weight::new(-k, strict as Wide))
                    } else {
                        (y, x, Weight::new(k, !strict as Wide))
                    };
                    let edge = self.graph.add_edge(from, to, weight, i);
                    if !self.graph.enable_edge(edge) {
                        let cycle = self.graph.conflict.clone();
                        return self.conflict(lits, &cycle);
                    }
                }
            }
        }

        self.model = Some(Model::from_graph(&self.graph, &self.names, ZERO));
        Verdict::Consistent
    }

    fn minimal_explanations(&self) -> bool {
        // positive cycles are simple, and dropping any edge of a simple cycle
        // leaves a satisfiable path
        true
    }
}
