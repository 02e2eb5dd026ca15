//! Tree construction and coordinate assignment
//!
//! Phases run in a fixed order: root triangle, main leg, G1 roots with
//! their legs, main-leg terminus, G2 predecessors, derived station sets.
//! Every node receives its position exactly once, when it is created.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use tracing::{debug, debug_span, trace};

use super::lanes::LaneTracker;
use super::node::{FormulaAnnotation, LegOwner, Node, Position};
use super::CollatzTree;
use crate::config::TreeConfig;
use crate::recurrence::ReverseEvaluator;

/// Node values of the root 3-cycle, in edge order `4 → 2 → 1 → 4`.
pub const ROOT_CYCLE: [u64; 3] = [4, 2, 1];

/// Annotation text above the main leg's marker.
const MAIN_FORMULA: &str = "2^k";

/// Incremental builder for a [`CollatzTree`].
#[derive(Debug)]
pub struct TreeBuilder<'e> {
    config: TreeConfig,
    evaluator: &'e mut ReverseEvaluator,
    graph: DiGraphMap<Node, ()>,
    positions: HashMap<Node, Position>,
    labels: HashMap<Node, String>,
    lanes: LaneTracker,
    main_leg: Vec<u64>,
    g1_nodes: Vec<u64>,
    g2_nodes: Vec<u64>,
    g1_legs: BTreeMap<u64, Vec<u64>>,
    g1_stations_with_odd_connection: BTreeSet<u64>,
    formula_annotations: Vec<FormulaAnnotation>,
}

impl<'e> TreeBuilder<'e> {
    /// Create a builder that queries `evaluator` during G2 construction.
    pub fn new(config: TreeConfig, evaluator: &'e mut ReverseEvaluator) -> Self {
        Self {
            config,
            evaluator,
            graph: DiGraphMap::new(),
            positions: HashMap::new(),
            labels: HashMap::new(),
            lanes: LaneTracker::new(),
            main_leg: Vec::new(),
            g1_nodes: Vec::new(),
            g2_nodes: Vec::new(),
            g1_legs: BTreeMap::new(),
            g1_stations_with_odd_connection: BTreeSet::new(),
            formula_annotations: Vec::new(),
        }
    }

    /// Run every construction phase and return the finished tree.
    pub fn build(mut self) -> CollatzTree {
        let span = debug_span!(
            "generate",
            max_k = self.config.max_k(),
            leg_depth = self.config.leg_depth()
        );
        let _enter = span.enter();

        let apex = self.place_root();
        self.place_main_leg(apex);
        self.place_g1_generation();
        self.terminate_main_leg();
        self.place_g2_generation();
        let stations_with_odd_connection = self.connected_main_stations();

        let cache_stats = self.evaluator.stats();
        debug!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            cache_hits = cache_stats.hits,
            cache_misses = cache_stats.misses,
            "tree generation complete"
        );

        CollatzTree {
            config: self.config,
            graph: self.graph,
            positions: self.positions,
            labels: self.labels,
            main_leg: self.main_leg,
            g1_nodes: self.g1_nodes,
            g2_nodes: self.g2_nodes,
            g1_legs: self.g1_legs,
            g1_stations_with_odd_connection: self.g1_stations_with_odd_connection,
            stations_with_odd_connection,
            formula_annotations: self.formula_annotations,
            cache_stats,
        }
    }

    /// Insert `node` at `position` unless it already exists.
    ///
    /// Returns `false` when the node was present; the existing position,
    /// label and edges are left untouched.
    fn place(&mut self, node: Node, position: Position) -> bool {
        match self.positions.entry(node) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(position);
                self.labels.insert(node, node.label());
                self.graph.add_node(node);
                trace!(%node, x = position.x, y = position.y, "placed");
                true
            }
        }
    }

    fn link(&mut self, child: Node, successor: Node) {
        self.graph.add_edge(child, successor, ());
    }

    /// Root triangle; returns the position of node `4`.
    fn place_root(&mut self) -> Position {
        let spacing = *self.config.spacing();
        let apex = Position::new(0.0, spacing.y_spacing * 2.0);
        self.place(Node::Value(4), apex);
        self.place(Node::Value(2), Position::new(-spacing.root_spacing / 2.0, 0.0));
        self.place(Node::Value(1), Position::new(spacing.root_spacing / 2.0, 0.0));

        for (i, &value) in ROOT_CYCLE.iter().enumerate() {
            let successor = ROOT_CYCLE[(i + 1) % ROOT_CYCLE.len()];
            self.link(Node::Value(value), Node::Value(successor));
        }
        apex
    }

    /// Powers of two `2^3 ..= 2^max_k`, stacked above node `4`.
    fn place_main_leg(&mut self, apex: Position) {
        let y_spacing = self.config.spacing().y_spacing;
        for (i, k) in (3..=self.config.max_k()).enumerate() {
            let value = 1u64 << k;
            self.place(Node::Value(value), apex.above((i + 1) as f64 * y_spacing));
            self.link(Node::Value(value), Node::Value(value / 2));
            self.main_leg.push(value);
        }
        debug!(len = self.main_leg.len(), "main leg placed");
    }

    /// Odd `n ≥ 3` with `3n + 1` on the main leg, in ascending order.
    ///
    /// Walking the main leg yields exactly the odd numbers the sweep over
    /// `3, 5, ..., max_n` would accept, in the same order.
    fn place_g1_generation(&mut self) {
        let stations: Vec<u64> = self
            .main_leg
            .iter()
            .copied()
            .filter(|v| (v - 1) % 3 == 0)
            .collect();

        for station in stations {
            let n = (station - 1) / 3;
            if n < 3 {
                continue;
            }
            let Some(station_pos) = self.positions.get(&Node::Value(station)).copied() else {
                continue;
            };
            self.place_g1_leg(n, station, station_pos);
        }
        debug!(g1 = self.g1_nodes.len(), "G1 generation placed");
    }

    fn place_g1_leg(&mut self, n: u64, station: u64, station_pos: Position) {
        let spacing = *self.config.spacing();
        let x = self.lanes.assign(n, &spacing);
        let root_pos = Position::new(x, station_pos.y);

        self.place(Node::Value(n), root_pos);
        self.link(Node::Value(n), Node::Value(station));
        self.g1_nodes.push(n);

        let mut leg = Vec::with_capacity(self.config.leg_depth() as usize);
        let mut below = n;
        let mut top_pos = root_pos;
        for i in 0..self.config.leg_depth() {
            let value = below * 2;
            top_pos = root_pos.above((i + 1) as f64 * spacing.y_spacing);
            self.place(Node::Value(value), top_pos);
            self.link(Node::Value(value), Node::Value(below));
            leg.push(value);
            below = value;
        }

        let marker = Node::Infinity(LegOwner::G1(n));
        let marker_pos = top_pos.above(spacing.y_spacing);
        self.place(marker, marker_pos);
        self.link(marker, Node::Value(below));
        self.formula_annotations.push(FormulaAnnotation {
            x: marker_pos.x,
            y: marker_pos.y + spacing.annotation_lift,
            text: format!("{}×2^k−1", n),
        });

        trace!(n, station, x, "G1 leg placed");
        self.g1_legs.insert(n, leg);
    }

    fn terminate_main_leg(&mut self) {
        let Some(&top) = self.main_leg.last() else {
            return;
        };
        let Some(top_pos) = self.positions.get(&Node::Value(top)).copied() else {
            return;
        };
        let spacing = *self.config.spacing();
        let marker = Node::Infinity(LegOwner::Main);
        let marker_pos = top_pos.above(spacing.y_spacing);
        self.place(marker, marker_pos);
        self.link(marker, Node::Value(top));
        self.formula_annotations.push(FormulaAnnotation {
            x: marker_pos.x,
            y: marker_pos.y + spacing.annotation_lift,
            text: MAIN_FORMULA.to_string(),
        });
    }

    /// Reverse recurrence over every placed `m · 2^k`, ascending `m` then `k`.
    fn place_g2_generation(&mut self) {
        let spacing = *self.config.spacing();
        let roots: Vec<u64> = self.g1_legs.keys().copied().collect();

        for m in roots {
            let Some(root_pos) = self.positions.get(&Node::Value(m)).copied() else {
                continue;
            };
            for k in 1..=self.config.max_k() {
                // larger k overflow as well
                let Some(station) = 2u64.checked_pow(k).and_then(|p| p.checked_mul(m)) else {
                    break;
                };
                let Some(station_pos) = self.positions.get(&Node::Value(station)).copied() else {
                    continue;
                };
                let Some(g2) = self.evaluator.evaluate(k, m) else {
                    continue;
                };

                let x = self.lanes.g2_x(m, root_pos.x, &spacing);
                let position = Position::new(x, station_pos.y + 0.5 * spacing.y_spacing);
                if self.attach_predecessor(g2, station, position) {
                    trace!(g2, station, k, m, "G2 predecessor placed");
                }
            }
        }
        debug!(g2 = self.g2_nodes.len(), "G2 generation placed");
    }

    /// Add `g2 → station` unless `g2` is already in the graph.
    ///
    /// The first discovery of a value wins; later ones are no-ops.
    fn attach_predecessor(&mut self, g2: u64, station: u64, position: Position) -> bool {
        let node = Node::Value(g2);
        if !self.place(node, position) {
            return false;
        }
        self.link(node, Node::Value(station));
        self.g2_nodes.push(g2);
        self.g1_stations_with_odd_connection.insert(station);
        true
    }

    /// Main-leg nodes with at least one odd integer predecessor.
    fn connected_main_stations(&self) -> BTreeSet<u64> {
        self.main_leg
            .iter()
            .copied()
            .filter(|&value| {
                self.graph
                    .neighbors_directed(Node::Value(value), Direction::Incoming)
                    .any(|pred| pred.is_odd_value())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder(evaluator: &mut ReverseEvaluator) -> TreeBuilder<'_> {
        let config = TreeConfig::new(5, 3).expect("valid config");
        TreeBuilder::new(config, evaluator)
    }

    #[test]
    fn test_first_discovery_wins() {
        let mut evaluator = ReverseEvaluator::new();
        let mut builder = builder(&mut evaluator);
        builder.place(Node::Value(10), Position::new(0.0, 0.0));
        builder.place(Node::Value(40), Position::new(0.0, 4.0));

        assert!(builder.attach_predecessor(13, 40, Position::new(1.0, 5.0)));
        assert!(!builder.attach_predecessor(13, 10, Position::new(9.0, 9.0)));

        let successors: Vec<Node> = builder.graph.neighbors(Node::Value(13)).collect();
        assert_eq!(successors, vec![Node::Value(40)]);
        assert_eq!(builder.positions[&Node::Value(13)], Position::new(1.0, 5.0));
        assert_eq!(builder.g2_nodes, vec![13]);
        assert!(!builder.g1_stations_with_odd_connection.contains(&10));
    }

    #[test]
    fn test_place_keeps_first_position() {
        let mut evaluator = ReverseEvaluator::new();
        let mut builder = builder(&mut evaluator);
        assert!(builder.place(Node::Value(7), Position::new(1.0, 1.0)));
        assert!(!builder.place(Node::Value(7), Position::new(2.0, 2.0)));
        assert_eq!(builder.positions[&Node::Value(7)], Position::new(1.0, 1.0));
        assert_eq!(builder.graph.node_count(), 1);
    }

    #[test]
    fn test_root_triangle_is_a_cycle() {
        let mut evaluator = ReverseEvaluator::new();
        let mut builder = builder(&mut evaluator);
        let apex = builder.place_root();
        assert_eq!(apex, Position::new(0.0, 4.0));
        assert!(builder.graph.contains_edge(Node::Value(4), Node::Value(2)));
        assert!(builder.graph.contains_edge(Node::Value(2), Node::Value(1)));
        assert!(builder.graph.contains_edge(Node::Value(1), Node::Value(4)));
        assert_eq!(builder.graph.edge_count(), 3);
    }
}
