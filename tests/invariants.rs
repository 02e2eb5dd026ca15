//! Structural invariants over a range of parameters

mod common;

use std::collections::HashSet;

use collatz_tree::tree::ROOT_CYCLE;
use collatz_tree::{generate, generate_from, Node, TreeConfig, TreeError};
use common::tree;
use petgraph::Direction;
use test_case::test_case;

#[test_case(1, 1 ; "smallest valid")]
#[test_case(3, 2 ; "root and one main node")]
#[test_case(5, 3 ; "scenario a")]
#[test_case(12, 6 ; "interactive default")]
#[test_case(24, 12 ; "interactive maximum")]
#[test_case(40, 20 ; "deep")]
fn every_node_has_one_successor(max_k: u32, leg_depth: u32) {
    let tree = tree(max_k, leg_depth);
    for node in tree.nodes() {
        let out = tree
            .graph()
            .neighbors_directed(node, Direction::Outgoing)
            .count();
        assert_eq!(out, 1, "{} has {} successors", node, out);
    }
    assert_eq!(tree.edge_count(), tree.node_count());
}

#[test_case(1, 1)]
#[test_case(12, 6)]
#[test_case(30, 9)]
fn root_forms_three_cycle(max_k: u32, leg_depth: u32) {
    let tree = tree(max_k, leg_depth);
    let mut node = Node::Value(4);
    let mut visited = Vec::new();
    for _ in 0..3 {
        visited.push(node);
        node = tree.successor(node).expect("root node has successor");
    }
    assert_eq!(node, Node::Value(4));
    assert_eq!(visited, ROOT_CYCLE.map(Node::Value).to_vec());
}

#[test_case(12, 6)]
#[test_case(20, 3)]
#[test_case(33, 11)]
fn non_root_nodes_reach_the_cycle(max_k: u32, leg_depth: u32) {
    let tree = tree(max_k, leg_depth);
    let roots: HashSet<Node> = ROOT_CYCLE.iter().map(|&v| Node::Value(v)).collect();
    for start in tree.nodes() {
        let mut node = start;
        let mut steps = 0;
        while !roots.contains(&node) {
            node = tree.successor(node).expect("successor exists");
            steps += 1;
            assert!(steps <= tree.node_count(), "{} does not reach the root", start);
        }
    }
}

#[test_case(5, 3)]
#[test_case(12, 6)]
#[test_case(18, 12)]
fn legs_have_configured_length(max_k: u32, leg_depth: u32) {
    let tree = tree(max_k, leg_depth);
    assert_eq!(tree.g1_legs().len(), tree.g1_nodes().len());
    for &m in tree.g1_nodes() {
        let leg = &tree.g1_legs()[&m];
        assert_eq!(leg.len(), leg_depth as usize);
        let expected: Vec<u64> = (1..=leg_depth).map(|i| m << i).collect();
        assert_eq!(leg, &expected);
    }
}

#[test]
fn main_leg_length_tracks_max_k() {
    for max_k in 1..=20 {
        let tree = tree(max_k, 2);
        assert_eq!(tree.main_leg().len(), max_k.saturating_sub(2) as usize);
        assert_eq!(
            tree.formula_annotations().len(),
            tree.g1_nodes().len() + usize::from(!tree.main_leg().is_empty())
        );
    }
}

#[test]
fn generation_is_idempotent() {
    let first = tree(16, 8);
    let second = tree(16, 8);
    assert_eq!(first.nodes(), second.nodes());
    assert_eq!(first.edges(), second.edges());
    for node in first.nodes() {
        assert_eq!(first.position(node), second.position(node));
    }
    assert_eq!(first.fingerprint(), second.fingerprint());
}

#[test]
fn different_parameters_change_fingerprint() {
    assert_ne!(tree(12, 6).fingerprint(), tree(12, 7).fingerprint());
}

#[test]
fn g2_values_appear_once_with_one_target() {
    let tree = tree(24, 12);
    let unique: HashSet<u64> = tree.g2_nodes().iter().copied().collect();
    assert_eq!(unique.len(), tree.g2_nodes().len());
    for &g2 in tree.g2_nodes() {
        let station = tree
            .successor(Node::Value(g2))
            .and_then(|n| n.value())
            .expect("G2 node points at an integer station");
        assert_eq!(3 * g2 + 1, station);
        assert!(tree.g1_stations_with_odd_connection().contains(&station));
    }
}

#[test]
fn connected_main_stations_have_odd_predecessors() {
    let tree = tree(14, 4);
    for &station in tree.main_leg() {
        let has_odd = tree
            .predecessors(Node::Value(station))
            .iter()
            .any(|p| p.is_odd_value());
        assert_eq!(
            has_odd,
            tree.stations_with_odd_connection().contains(&station),
            "station {}",
            station
        );
    }
}

#[test]
fn boundary_rejects_invalid_parameters() {
    assert!(matches!(generate(0, 1), Err(TreeError::InvalidParameter(_))));
    assert!(matches!(generate(1, 0), Err(TreeError::InvalidParameter(_))));
    assert!(matches!(
        generate(50, 20),
        Err(TreeError::ExceedsIntegerRange { .. })
    ));
    assert!(TreeConfig::new(1, 1).is_ok());
}

#[test_case(62, 1 ; "tallest main leg")]
#[test_case(1, 62 ; "longest legs")]
#[test_case(31, 32 ; "combined limit")]
fn largest_accepted_configs_build(max_k: u32, leg_depth: u32) {
    let config = TreeConfig::new(max_k, leg_depth).expect("at the integer limit");
    let tree = generate_from(config);
    assert_eq!(tree.main_leg().len(), max_k.saturating_sub(2) as usize);
    for leg in tree.g1_legs().values() {
        assert_eq!(leg.len(), leg_depth as usize);
    }
    for node in tree.nodes() {
        let pos = tree.position(node).expect("node is placed");
        assert!(pos.x.is_finite() && pos.y.is_finite(), "{} at {:?}", node, pos);
    }
}

#[test]
fn rejected_parameters_never_reach_the_builder() {
    for (max_k, leg_depth) in [(64, 1), (5, 0), (0, 5), (63, 1)] {
        assert!(
            TreeConfig::new(max_k, leg_depth).is_err(),
            "({}, {}) should be rejected",
            max_k,
            leg_depth
        );
    }
}
