//! Node classification for rendering
//!
//! Categories are checked in priority order and are mutually exclusive:
//! root, main leg, G1, G2, G1 leg, infinity marker, fallback. The renderer
//! maps the resulting [`NodeStyle`] straight onto its drawing calls.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use crate::tree::{Node, ROOT_CYCLE};

/// Named colors of the node palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
#[cfg_attr(feature = "visualize", serde(rename_all = "lowercase"))]
pub enum Color {
    /// Root triangle fill.
    SkyBlue,
    /// Connected station fill, and every outline.
    Black,
    /// Unconnected station fill.
    White,
    /// G1 fill.
    LimeGreen,
    /// G2 fill.
    Orange,
    /// Infinity marker fill.
    Red,
    /// Fallback fill.
    LightGray,
}

impl Color {
    /// Color name as understood by common plotting back ends.
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::SkyBlue => "skyblue",
            Color::Black => "black",
            Color::White => "white",
            Color::LimeGreen => "limegreen",
            Color::Orange => "orange",
            Color::Red => "red",
            Color::LightGray => "lightgray",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual style of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct NodeStyle {
    /// Fill color.
    pub fill: Color,
    /// Outline color.
    pub outline: Color,
    /// Outline width.
    pub outline_width: f32,
    /// Marker size relative to the renderer's unit.
    pub size: u32,
}

impl NodeStyle {
    fn new(fill: Color, outline_width: f32, size: u32) -> Self {
        Self {
            fill,
            outline: Color::Black,
            outline_width,
            size,
        }
    }
}

/// Classification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum NodeCategory {
    /// Member of the `{1, 2, 4}` cycle.
    Root,
    /// Power of two on the main leg.
    MainLeg {
        /// Has an odd integer predecessor.
        connected: bool,
    },
    /// First-generation odd predecessor.
    G1,
    /// Second-generation odd predecessor.
    G2,
    /// Doubling above a G1 node.
    G1Leg {
        /// Received a G2 edge.
        connected: bool,
    },
    /// Leg terminus.
    Infinity,
    /// None of the above.
    Unclassified,
}

impl NodeCategory {
    /// Style drawn for this category.
    pub fn style(&self) -> NodeStyle {
        let station_fill = |connected: bool| {
            if connected {
                Color::Black
            } else {
                Color::White
            }
        };
        match *self {
            NodeCategory::Root => NodeStyle::new(Color::SkyBlue, 1.0, 600),
            NodeCategory::MainLeg { connected } => {
                NodeStyle::new(station_fill(connected), 1.5, 400)
            }
            NodeCategory::G1 => NodeStyle::new(Color::LimeGreen, 1.0, 500),
            NodeCategory::G2 => NodeStyle::new(Color::Orange, 1.0, 500),
            NodeCategory::G1Leg { connected } => NodeStyle::new(station_fill(connected), 1.5, 350),
            NodeCategory::Infinity => NodeStyle::new(Color::Red, 1.0, 300),
            NodeCategory::Unclassified => NodeStyle::new(Color::LightGray, 1.0, 350),
        }
    }
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeCategory::Root => "root",
            NodeCategory::MainLeg { connected: true } => "main-leg/connected",
            NodeCategory::MainLeg { connected: false } => "main-leg/bare",
            NodeCategory::G1 => "g1",
            NodeCategory::G2 => "g2",
            NodeCategory::G1Leg { connected: true } => "g1-leg/connected",
            NodeCategory::G1Leg { connected: false } => "g1-leg/bare",
            NodeCategory::Infinity => "infinity",
            NodeCategory::Unclassified => "unclassified",
        };
        f.write_str(name)
    }
}

/// Lookup sets produced by the tree builder.
#[derive(Debug, Clone, Default)]
pub struct ClassificationContext {
    main_leg: HashSet<u64>,
    g1_nodes: HashSet<u64>,
    g2_nodes: HashSet<u64>,
    leg_members: HashSet<u64>,
    g1_stations_with_odd_connection: HashSet<u64>,
    stations_with_odd_connection: HashSet<u64>,
}

impl ClassificationContext {
    /// Build the lookup sets from the builder's outputs.
    pub fn from_sets(
        main_leg: &[u64],
        g1_nodes: &[u64],
        g2_nodes: &[u64],
        g1_legs: &BTreeMap<u64, Vec<u64>>,
        g1_stations_with_odd_connection: &BTreeSet<u64>,
        stations_with_odd_connection: &BTreeSet<u64>,
    ) -> Self {
        Self {
            main_leg: main_leg.iter().copied().collect(),
            g1_nodes: g1_nodes.iter().copied().collect(),
            g2_nodes: g2_nodes.iter().copied().collect(),
            leg_members: g1_legs.values().flatten().copied().collect(),
            g1_stations_with_odd_connection: g1_stations_with_odd_connection
                .iter()
                .copied()
                .collect(),
            stations_with_odd_connection: stations_with_odd_connection.iter().copied().collect(),
        }
    }
}

/// Category of `node`; total over every node the builder produces.
pub fn categorize(node: Node, context: &ClassificationContext) -> NodeCategory {
    let value = match node {
        Node::Infinity(_) => return NodeCategory::Infinity,
        Node::Value(value) => value,
    };

    if ROOT_CYCLE.contains(&value) {
        NodeCategory::Root
    } else if context.main_leg.contains(&value) {
        NodeCategory::MainLeg {
            connected: context.stations_with_odd_connection.contains(&value),
        }
    } else if context.g1_nodes.contains(&value) {
        NodeCategory::G1
    } else if context.g2_nodes.contains(&value) {
        NodeCategory::G2
    } else if context.leg_members.contains(&value) {
        NodeCategory::G1Leg {
            connected: context.g1_stations_with_odd_connection.contains(&value),
        }
    } else {
        NodeCategory::Unclassified
    }
}

/// Style of `node`.
pub fn classify(node: Node, context: &ClassificationContext) -> NodeStyle {
    categorize(node, context).style()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::LegOwner;

    #[test]
    fn test_empty_context_falls_back() {
        let context = ClassificationContext::default();
        assert_eq!(categorize(Node::Value(7), &context), NodeCategory::Unclassified);
        assert_eq!(categorize(Node::Value(2), &context), NodeCategory::Root);
        assert_eq!(
            categorize(Node::Infinity(LegOwner::Main), &context),
            NodeCategory::Infinity
        );
        assert_eq!(classify(Node::Value(7), &context).fill, Color::LightGray);
    }

    #[test]
    fn test_station_substates() {
        let legs = BTreeMap::from([(5, vec![10, 20, 40])]);
        let context = ClassificationContext::from_sets(
            &[8, 16, 32],
            &[5],
            &[3, 13],
            &legs,
            &BTreeSet::from([10, 40]),
            &BTreeSet::from([16]),
        );
        assert_eq!(classify(Node::Value(16), &context).fill, Color::Black);
        assert_eq!(classify(Node::Value(32), &context).fill, Color::White);
        assert_eq!(classify(Node::Value(40), &context).size, 350);
        assert_eq!(classify(Node::Value(20), &context).fill, Color::White);
        assert_eq!(classify(Node::Value(13), &context).fill, Color::Orange);
    }

    #[test]
    fn test_outline_is_always_black() {
        for category in [
            NodeCategory::Root,
            NodeCategory::MainLeg { connected: true },
            NodeCategory::G1,
            NodeCategory::G2,
            NodeCategory::G1Leg { connected: false },
            NodeCategory::Infinity,
            NodeCategory::Unclassified,
        ] {
            assert_eq!(category.style().outline, Color::Black);
        }
    }
}
