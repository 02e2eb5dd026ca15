//! Serializable layout snapshot for external renderers

use serde::Serialize;

use crate::classify::{categorize, NodeCategory, NodeStyle};
use crate::config::TreeConfig;
use crate::recurrence::CacheStats;
use crate::tree::{CollatzTree, FormulaAnnotation, Node, Position};

/// One node with everything a renderer needs to draw it.
#[derive(Debug, Clone, Serialize)]
pub struct NodeRecord {
    /// Node identity.
    pub node: Node,
    /// Identity rendered as text (`42`, `∞_5`).
    pub id: String,
    /// Display label.
    pub label: String,
    /// Coordinate.
    pub position: Position,
    /// Classification.
    pub category: NodeCategory,
    /// Style derived from the category.
    pub style: NodeStyle,
}

/// One `child → successor` edge.
#[derive(Debug, Clone, Serialize)]
pub struct EdgeRecord {
    /// Child identity.
    pub from: String,
    /// Successor identity.
    pub to: String,
    /// Edge of the root 3-cycle.
    pub root: bool,
}

/// Full snapshot of a generated tree.
#[derive(Debug, Clone, Serialize)]
pub struct TreeSnapshot {
    /// Generation parameters.
    pub config: TreeConfig,
    /// Nodes in canonical order.
    pub nodes: Vec<NodeRecord>,
    /// Edges sorted by child.
    pub edges: Vec<EdgeRecord>,
    /// Overlay texts.
    pub annotations: Vec<FormulaAnnotation>,
    /// Evaluator counters.
    pub cache: CacheStats,
    /// Hex fingerprint of the layout.
    pub fingerprint: String,
}

impl TreeSnapshot {
    /// Capture `tree`.
    pub fn capture(tree: &CollatzTree) -> Self {
        let context = tree.classification_context();
        let nodes = tree
            .nodes()
            .into_iter()
            .filter_map(|node| {
                let position = tree.position(node)?;
                let category = categorize(node, &context);
                Some(NodeRecord {
                    node,
                    id: node.to_string(),
                    label: node.label(),
                    position,
                    category,
                    style: category.style(),
                })
            })
            .collect();
        let edges = tree
            .edges()
            .into_iter()
            .map(|(from, to)| EdgeRecord {
                from: from.to_string(),
                to: to.to_string(),
                root: tree.is_root_edge(from, to),
            })
            .collect();

        Self {
            config: *tree.config(),
            nodes,
            edges,
            annotations: tree.formula_annotations().to_vec(),
            cache: tree.cache_stats(),
            fingerprint: tree.fingerprint().to_hex().to_string(),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate;

    #[test]
    fn test_snapshot_counts_match_tree() {
        let tree = generate(6, 2).expect("valid parameters");
        let snapshot = TreeSnapshot::capture(&tree);
        assert_eq!(snapshot.nodes.len(), tree.node_count());
        assert_eq!(snapshot.edges.len(), tree.edge_count());
        assert_eq!(snapshot.edges.iter().filter(|e| e.root).count(), 3);

        let json = snapshot.to_json().expect("serializes");
        assert!(json.contains("\"fingerprint\""));
    }
}
