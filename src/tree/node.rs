//! Node identities and layout primitives
//!
//! Integers and infinity markers share one node namespace. A marker is
//! tagged with the leg it terminates, so marker tests are variant checks.

use std::fmt;

/// Glyph used as the display label of every infinity marker.
pub const INFINITY_LABEL: &str = "∞";

/// Leg terminated by an infinity marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum LegOwner {
    /// The main leg of powers of two.
    Main,
    /// The extension leg above G1 node `n`.
    G1(u64),
}

/// Graph node: a positive integer or a leg's infinity marker.
///
/// The derived ordering (integers ascending, then the main marker, then G1
/// markers by owner) is the canonical node order for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum Node {
    /// Mathematical value.
    Value(u64),
    /// Terminal sentinel above a leg.
    Infinity(LegOwner),
}

impl Node {
    /// Integer value, if this is not a marker.
    #[inline]
    pub fn value(&self) -> Option<u64> {
        match self {
            Node::Value(v) => Some(*v),
            Node::Infinity(_) => None,
        }
    }

    /// True for odd integers. Markers are never odd.
    #[inline]
    pub fn is_odd_value(&self) -> bool {
        matches!(self, Node::Value(v) if v % 2 == 1)
    }

    /// Display label: decimal value or the infinity glyph.
    pub fn label(&self) -> String {
        match self {
            Node::Value(v) => v.to_string(),
            Node::Infinity(_) => INFINITY_LABEL.to_string(),
        }
    }
}

impl From<u64> for Node {
    fn from(value: u64) -> Self {
        Node::Value(value)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Value(v) => write!(f, "{}", v),
            Node::Infinity(LegOwner::Main) => write!(f, "{}_main", INFINITY_LABEL),
            Node::Infinity(LegOwner::G1(n)) => write!(f, "{}_{}", INFINITY_LABEL, n),
        }
    }
}

/// Error returned when a node identity cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised node identity `{0}`")]
pub struct ParseNodeError(pub String);

impl std::str::FromStr for Node {
    type Err = ParseNodeError;

    /// Parse the identity produced by `Display` (`42`, `∞_main`, `∞_5`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let marker = trimmed
            .strip_prefix(INFINITY_LABEL)
            .and_then(|rest| rest.strip_prefix('_'));
        match marker {
            Some("main") => Ok(Node::Infinity(LegOwner::Main)),
            Some(owner) => owner
                .parse()
                .map(|n| Node::Infinity(LegOwner::G1(n)))
                .map_err(|_| ParseNodeError(s.to_string())),
            None => trimmed
                .parse()
                .map(Node::Value)
                .map_err(|_| ParseNodeError(s.to_string())),
        }
    }
}

/// 2-D coordinate: `x` is the lateral lane, `y` the generation height.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct Position {
    /// Horizontal lane.
    pub x: f64,
    /// Vertical height.
    pub y: f64,
}

impl Position {
    /// Construct a position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Same lane, `dy` higher.
    pub fn above(&self, dy: f64) -> Self {
        Self {
            x: self.x,
            y: self.y + dy,
        }
    }
}

/// Overlay text drawn above a leg's infinity marker.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct FormulaAnnotation {
    /// Horizontal anchor.
    pub x: f64,
    /// Vertical anchor.
    pub y: f64,
    /// Formula text, e.g. `5×2^k−1`.
    pub text: String,
}
