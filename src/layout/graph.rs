//! GraphIR: converts a [`Diagram`] into a petgraph DiGraph for rank layout.
//!
//! Only edges whose endpoints both resolve become graph edges. Self-loops are
//! kept out of the graph so they never affect in-degree or rank.

use std::collections::{HashMap, VecDeque};

use petgraph::Direction::{Incoming, Outgoing};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::syntax::types::Diagram;

/// Graph intermediate representation.
///
/// Node weights are diagram node ids; edge weights are indices into
/// `Diagram::edges`.
pub struct GraphIR {
    pub digraph: DiGraph<String, usize>,
    /// Maps node id → petgraph NodeIndex.
    pub node_index: HashMap<String, NodeIndex>,
}

impl GraphIR {
    /// Build a GraphIR from a parsed diagram, preserving node order.
    pub fn from_diagram(diagram: &Diagram) -> Self {
        let mut digraph: DiGraph<String, usize> = DiGraph::new();
        let mut node_index: HashMap<String, NodeIndex> = HashMap::new();

        for node in &diagram.nodes {
            if !node_index.contains_key(&node.id) {
                let idx = digraph.add_node(node.id.clone());
                node_index.insert(node.id.clone(), idx);
            }
        }

        for (i, edge) in diagram.edges.iter().enumerate() {
            if edge.is_self_loop() {
                continue;
            }
            let (Some(&from), Some(&to)) =
                (node_index.get(&edge.from_id), node_index.get(&edge.to_id))
            else {
                continue;
            };
            digraph.add_edge(from, to, i);
        }

        Self {
            digraph,
            node_index,
        }
    }

    pub fn node_count(&self) -> usize {
        self.digraph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.digraph.edge_count()
    }

    /// Returns true if the graph is a directed acyclic graph (no cycles).
    pub fn is_dag(&self) -> bool {
        !is_cyclic_directed(&self.digraph)
    }

    /// Nodes with no incoming edge, in diagram order.
    pub fn roots(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.digraph
            .node_indices()
            .filter(|&idx| self.digraph.edges_directed(idx, Incoming).next().is_none())
    }

    /// Longest-path rank of every node, keyed by id.
    ///
    /// Breadth-first relaxation from all roots: a node's rank only ever grows
    /// to `rank(pred) + 1`. Ranks are capped at `node_count - 1`, which bounds
    /// the work on cyclic input. Nodes no root reaches keep rank 0.
    pub fn ranks(&self) -> HashMap<String, usize> {
        let n = self.node_count();
        let cap = n.saturating_sub(1);
        let mut rank = vec![0usize; n];
        let mut queue: VecDeque<NodeIndex> = self.roots().collect();

        while let Some(u) = queue.pop_front() {
            let next = rank[u.index()] + 1;
            if next > cap {
                continue;
            }
            for v in self.digraph.neighbors_directed(u, Outgoing) {
                if next > rank[v.index()] {
                    rank[v.index()] = next;
                    queue.push_back(v);
                }
            }
        }

        self.digraph
            .node_indices()
            .map(|idx| (self.digraph[idx].clone(), rank[idx.index()]))
            .collect()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
