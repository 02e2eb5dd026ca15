//! Collatz predecessor tree
//!
//! Edges point from a node to its Collatz successor. Every node has exactly
//! one outgoing edge; the root nodes `4 → 2 → 1 → 4` close a 3-cycle
//! instead of pointing further down.

mod builder;
mod lanes;
mod node;

pub use builder::{TreeBuilder, ROOT_CYCLE};
pub use lanes::{Lane, LaneTracker, Side};
pub use node::{FormulaAnnotation, LegOwner, Node, ParseNodeError, Position, INFINITY_LABEL};

use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;

use crate::classify::ClassificationContext;
use crate::config::TreeConfig;
use crate::recurrence::CacheStats;

/// Generated graph, layout and classification sets.
#[derive(Debug, Clone)]
pub struct CollatzTree {
    pub(crate) config: TreeConfig,
    pub(crate) graph: DiGraphMap<Node, ()>,
    pub(crate) positions: HashMap<Node, Position>,
    pub(crate) labels: HashMap<Node, String>,
    pub(crate) main_leg: Vec<u64>,
    pub(crate) g1_nodes: Vec<u64>,
    pub(crate) g2_nodes: Vec<u64>,
    pub(crate) g1_legs: BTreeMap<u64, Vec<u64>>,
    pub(crate) g1_stations_with_odd_connection: BTreeSet<u64>,
    pub(crate) stations_with_odd_connection: BTreeSet<u64>,
    pub(crate) formula_annotations: Vec<FormulaAnnotation>,
    pub(crate) cache_stats: CacheStats,
}

impl CollatzTree {
    /// Parameters the tree was generated with.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Underlying directed graph.
    pub fn graph(&self) -> &DiGraphMap<Node, ()> {
        &self.graph
    }

    /// Node coordinates.
    pub fn positions(&self) -> &HashMap<Node, Position> {
        &self.positions
    }

    /// Node display labels.
    pub fn labels(&self) -> &HashMap<Node, String> {
        &self.labels
    }

    /// Powers of two `2^3 ..= 2^max_k`, ascending.
    pub fn main_leg(&self) -> &[u64] {
        &self.main_leg
    }

    /// First-generation odd predecessors, in placement order.
    pub fn g1_nodes(&self) -> &[u64] {
        &self.g1_nodes
    }

    /// Second-generation odd predecessors, in discovery order.
    pub fn g2_nodes(&self) -> &[u64] {
        &self.g2_nodes
    }

    /// Doubling chain above each G1 node.
    pub fn g1_legs(&self) -> &BTreeMap<u64, Vec<u64>> {
        &self.g1_legs
    }

    /// G1 leg stations that received a G2 edge.
    pub fn g1_stations_with_odd_connection(&self) -> &BTreeSet<u64> {
        &self.g1_stations_with_odd_connection
    }

    /// Main-leg nodes with an odd integer predecessor.
    pub fn stations_with_odd_connection(&self) -> &BTreeSet<u64> {
        &self.stations_with_odd_connection
    }

    /// Overlay texts, one per G1 leg plus one for the main leg.
    pub fn formula_annotations(&self) -> &[FormulaAnnotation] {
        &self.formula_annotations
    }

    /// Evaluator cache counters at the end of generation.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache_stats
    }

    /// Position of `node`.
    pub fn position(&self, node: Node) -> Option<Position> {
        self.positions.get(&node).copied()
    }

    /// Display label of `node`.
    pub fn label(&self, node: Node) -> Option<&str> {
        self.labels.get(&node).map(String::as_str)
    }

    /// Whether `node` is part of the tree.
    pub fn contains(&self, node: Node) -> bool {
        self.graph.contains_node(node)
    }

    /// Collatz successor of `node`.
    pub fn successor(&self, node: Node) -> Option<Node> {
        self.graph
            .neighbors_directed(node, Direction::Outgoing)
            .next()
    }

    /// Nodes whose successor is `node`, in canonical order.
    pub fn predecessors(&self, node: Node) -> Vec<Node> {
        let mut preds: Vec<Node> = self
            .graph
            .neighbors_directed(node, Direction::Incoming)
            .collect();
        preds.sort();
        preds
    }

    /// All nodes in canonical order.
    pub fn nodes(&self) -> Vec<Node> {
        let mut nodes: Vec<Node> = self.graph.nodes().collect();
        nodes.sort();
        nodes
    }

    /// All `(child, successor)` edges, sorted.
    pub fn edges(&self) -> Vec<(Node, Node)> {
        let mut edges: Vec<(Node, Node)> = self
            .graph
            .all_edges()
            .map(|(child, successor, _)| (child, successor))
            .collect();
        edges.sort();
        edges
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The three edges of the root cycle.
    pub fn root_edges(&self) -> [(Node, Node); 3] {
        let [a, b, c] = ROOT_CYCLE.map(Node::Value);
        [(a, b), (b, c), (c, a)]
    }

    /// Whether `child → successor` belongs to the root cycle.
    pub fn is_root_edge(&self, child: Node, successor: Node) -> bool {
        self.root_edges().contains(&(child, successor))
    }

    /// Sets consumed by the node classifier.
    pub fn classification_context(&self) -> ClassificationContext {
        ClassificationContext::from_sets(
            &self.main_leg,
            &self.g1_nodes,
            &self.g2_nodes,
            &self.g1_legs,
            &self.g1_stations_with_odd_connection,
            &self.stations_with_odd_connection,
        )
    }

    /// Digest of nodes, positions and edges in canonical order.
    ///
    /// Two trees with equal fingerprints have identical node sets, edge
    /// sets and coordinates.
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        for node in self.nodes() {
            hasher.update(node.to_string().as_bytes());
            if let Some(pos) = self.position(node) {
                hasher.update(&pos.x.to_bits().to_le_bytes());
                hasher.update(&pos.y.to_bits().to_le_bytes());
            }
            if let Some(successor) = self.successor(node) {
                hasher.update(b"->");
                hasher.update(successor.to_string().as_bytes());
            }
            hasher.update(b"\n");
        }
        hasher.finalize()
    }
}
