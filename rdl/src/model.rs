use crate::atom::{Atom, LinearConstraint, Rel, Wide};
use crate::graph::{RdlGraph, Weight};
use sattrait::Literal;
use std::collections::HashMap;

/// Real-valued witness. Every value is `scaled / denominator`, which keeps
/// strict inequalities exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    denominator: Wide,
    values: HashMap<String, Wide>,
}

impl Model {
    /// Read values off a graph without positive cycles. `names[i]` is the
    /// variable of node `i`; the node named `None` is the constant zero.
    pub(crate) fn from_graph(graph: &RdlGraph, names: &[Option<String>], zero: u32) -> Model {
        let origin = graph.nodes[zero as usize].dist;
        let value = |n: u32| graph.nodes[n as usize].dist - origin;

        // Choose δ = 1/denominator small enough for every enabled edge.
        let mut denominator = 1;
        for e in graph.enabled_edges() {
            let slack = value(e.to) - (value(e.from) + e.weight);
            debug_assert!(slack >= Weight::default());
            if slack.d < 0 {
                debug_assert!(slack.c > 0);
                let needed = (-slack.d + slack.c - 1) / slack.c;
                denominator = denominator.max(needed);
            }
        }

        let values = names
            .iter()
            .enumerate()
            .filter_map(|(i, name)| {
                name.as_ref().map(|name| {
                    let v = value(i as u32);
                    (name.clone(), v.c * denominator + v.d)
                })
            })
            .collect();

        Model { denominator, values }
    }

    pub fn denominator(&self) -> Wide {
        self.denominator
    }

    /// Numerator of the value of `name` over `denominator()`.
    pub fn scaled(&self, name: &str) -> Option<Wide> {
        self.values.get(name).cloned()
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.scaled(name)
            .map(|v| v as f64 / self.denominator as f64)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    /// Evaluate a constraint. Variables the model does not mention are zero.
    /// `None` if the scaled sum does not fit in `Wide`, which only general
    /// linear constraints with huge coefficients can cause.
    pub fn eval(&self, c: &LinearConstraint) -> Option<bool> {
        let mut lhs: Wide = 0;
        for (v, coef) in c.terms() {
            lhs = coef
                .checked_mul(self.scaled(v).unwrap_or(0))
                .and_then(|t| lhs.checked_add(t))?;
        }
        let rhs = c.bound().checked_mul(self.denominator)?;
        Some(match c.rel() {
            Rel::Le => lhs <= rhs,
            Rel::Lt => lhs < rhs,
        })
    }

    /// Whether the literal holds; `None` for propositional atoms.
    pub fn satisfies(&self, lit: &Literal<Atom>) -> Option<bool> {
        match &lit.atom {
            Atom::Bool(_) => None,
            Atom::Linear(c) => self.eval(c).map(|holds| holds == lit.positive),
        }
    }
}
