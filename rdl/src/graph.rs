use crate::atom::Wide;
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::ops::{Add, Sub};

/// `c + d·δ` for an infinitesimal δ > 0. Strict bounds become non-strict
/// ones shifted by δ; comparison is lexicographic.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Weight {
    pub c: Wide,
    pub d: Wide,
}

impl Weight {
    pub fn new(c: Wide, d: Wide) -> Self {
        Weight { c, d }
    }
}

impl Add for Weight {
    type Output = Weight;
    fn add(self, rhs: Weight) -> Weight {
        Weight::new(self.c + rhs.c, self.d + rhs.d)
    }
}

impl Sub for Weight {
    type Output = Weight;
    fn sub(self, rhs: Weight) -> Weight {
        Weight::new(self.c - rhs.c, self.d - rhs.d)
    }
}

#[derive(Debug)]
pub struct RdlNode {
    pub dist: Weight,
    pub pred: Option<u32>,
    pub out_edges: SmallVec<[u32; 4]>,
}

/// Edge `from -> to` means `dist(to) >= dist(from) + weight`.
#[derive(Debug)]
pub struct RdlEdge {
    pub from: u32,
    pub to: u32,
    pub weight: Weight,
    pub enabled: bool,
    /// Index of the literal that produced the edge.
    pub lit: usize,
}

/// Constraint graph kept free of positive cycles. Node distances are
/// lower bounds that satisfy every enabled edge.
#[derive(Debug, Default)]
pub struct RdlGraph {
    /// Literal indices of the last positive cycle found.
    pub conflict: Vec<usize>,
    pub nodes: Vec<RdlNode>,
    pub edges: Vec<RdlEdge>,

    update_dists: Vec<(u32, Weight)>,
    queue: VecDeque<u32>,
}

impl RdlGraph {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn clear(&mut self) {
        self.conflict.clear();
        self.nodes.clear();
        self.edges.clear();
    }

    pub fn add_node(&mut self) -> u32 {
        self.nodes.push(RdlNode {
            dist: Weight::default(),
            pred: None,
            out_edges: SmallVec::new(),
        });
        (self.nodes.len() - 1) as u32
    }

    /// Add a disabled edge.
    pub fn add_edge(&mut self, from: u32, to: u32, weight: Weight, lit: usize) -> u32 {
        let edge_idx = self.edges.len() as u32;
        self.edges.push(RdlEdge {
            from,
            to,
            weight,
            enabled: false,
            lit,
        });
        self.nodes[from as usize].out_edges.push(edge_idx);
        edge_idx
    }

    /// Enable an edge and restore the distance invariant. Returns false,
    /// leaving the graph unchanged and `conflict` filled in, if the edge
    /// closes a positive cycle.
    pub fn enable_edge(&mut self, add_id: u32) -> bool {
        let edge = &mut self.edges[add_id as usize];
        if edge.enabled {
            return true;
        }
        edge.enabled = true;
        let (from, to, weight) = (edge.from, edge.to, edge.weight);

        if self.nodes[from as usize].dist + weight <= self.nodes[to as usize].dist {
            return true;
        }

        self.update_dists.clear();
        self.queue.clear();
        self.queue.push_back(add_id);

        let mut updated_root = false;
        while let Some(edge_idx) = self.queue.pop_front() {
            let edge = &self.edges[edge_idx as usize];
            if !edge.enabled {
                continue;
            }
            let (from, to, weight) = (edge.from, edge.to, edge.weight);
            let x = self.nodes[from as usize].dist;
            let y = self.nodes[to as usize].dist;
            if x + weight > y {
                if updated_root && edge_idx == add_id {
                    self.analyze_conflict(add_id);

                    for (node, dist) in self.update_dists.iter().rev() {
                        self.nodes[*node as usize].dist = *dist;
                    }
                    self.edges[add_id as usize].enabled = false;
                    return false;
                }

                updated_root = true;
                self.update_dists.push((to, y));
                let node = &mut self.nodes[to as usize];
                node.dist = x + weight;
                node.pred = Some(edge_idx);
                self.queue.extend(node.out_edges.iter().cloned());
            }
        }

        true
    }

    /// Walk predecessor edges back from the source of `add_id` to collect
    /// the cycle it closes.
    fn analyze_conflict(&mut self, add_id: u32) {
        self.conflict.clear();
        self.conflict.push(self.edges[add_id as usize].lit);

        let mut edge_id = self.nodes[self.edges[add_id as usize].from as usize].pred;
        while let Some(id) = edge_id {
            if id == add_id || self.conflict.len() > self.edges.len() {
                break;
            }
            self.conflict.push(self.edges[id as usize].lit);
            edge_id = self.nodes[self.edges[id as usize].from as usize].pred;
        }
        debug_assert!(edge_id == Some(add_id));
    }

    pub fn enabled_edges(&self) -> impl Iterator<Item = &RdlEdge> {
        self.edges.iter().filter(|e| e.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_cycle_is_rejected() {
        let mut g = RdlGraph::new();
        let a = g.add_node();
        let b = g.add_node();
        let c = g.add_node();
        let e0 = g.add_edge(a, b, Weight::new(1, 0), 0);
        let e1 = g.add_edge(b, c, Weight::new(0, 0), 1);
        let e2 = g.add_edge(c, a, Weight::new(-1, 1), 2);
        assert!(g.enable_edge(e0));
        assert!(g.enable_edge(e1));
        let dists = g.nodes.iter().map(|n| n.dist).collect::<Vec<_>>();
        assert!(!g.enable_edge(e2));
        let mut cycle = g.conflict.clone();
        cycle.sort();
        assert_eq!(cycle, vec![0, 1, 2]);
        assert!(!g.edges[e2 as usize].enabled);
        assert_eq!(g.nodes.iter().map(|n| n.dist).collect::<Vec<_>>(), dists);
    }

    #[test]
    fn zero_cycle_is_fine() {
        let mut g = RdlGraph::new();
        let a = g.add_node();
        let b = g.add_node();
        let e0 = g.add_edge(a, b, Weight::new(2, 0), 0);
        let e1 = g.add_edge(b, a, Weight::new(-2, 0), 1);
        assert!(g.enable_edge(e0));
        assert!(g.enable_edge(e1));
        for e in g.enabled_edges() {
            assert!(g.nodes[e.from as usize].dist + e.weight <= g.nodes[e.to as usize].dist);
        }
        assert_eq!(g.enabled_edges().count(), 2);
    }

    #[test]
    fn weights_compare_lexicographically() {
        assert!(Weight::new(0, 1) > Weight::new(0, 0));
        assert!(Weight::new(1, -5) > Weight::new(0, 7));
        assert_eq!(Weight::new(1, 2) - Weight::new(1, 1), Weight::new(0, 1));
    }
}
