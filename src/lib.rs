//! # Collatz Predecessor Tree
//!
//! Deterministic construction and 2-D layout of a structured slice of the
//! Collatz predecessor tree.
//!
//! ## Structure
//!
//! 1. **Root**: the `4 → 2 → 1 → 4` cycle
//! 2. **Main leg**: powers of two `2^3 ..= 2^max_k`
//! 3. **G1**: odd `n` with `3n + 1` on the main leg, each extended by a leg
//!    of `leg_depth` doublings and capped with an infinity marker
//! 4. **G2**: odd predecessors `(2^k · m − 1) / 3` of G1 leg stations
//!
//! Edges point from a node to its Collatz successor.
//!
//! ## Usage Example
//!
//! ```
//! use collatz_tree::{generate, Node};
//!
//! let tree = generate(5, 3)?;
//! assert_eq!(tree.main_leg(), &[8, 16, 32]);
//! assert_eq!(tree.successor(Node::Value(5)), Some(Node::Value(16)));
//! # Ok::<(), collatz_tree::TreeError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod classify;   // Visual categories for rendering
pub mod config;     // Validated parameters and spacing
pub mod recurrence; // Memoized reverse recurrence
pub mod report;     // Tab-separated layout report
pub mod tree;       // Graph, layout and builder
/// Serializable snapshots for external renderers.
#[cfg(feature = "visualize")]
pub mod export;

// Re-exports for convenience
pub use classify::{classify, categorize, ClassificationContext, Color, NodeCategory, NodeStyle};
pub use config::{LayoutSpacing, TreeConfig};
pub use recurrence::{reverse_step, CacheStats, ReverseEvaluator};
pub use tree::{CollatzTree, FormulaAnnotation, LegOwner, Node, Position, TreeBuilder};

use thiserror::Error;

/// Errors raised at the generation boundary.
///
/// A missing predecessor is never an error; see [`reverse_step`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    /// Non-positive `max_k` or `leg_depth`.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Node values would leave the `u64` range.
    #[error("max_k {max_k} + leg_depth {leg_depth} exceeds the 64-bit node range")]
    ExceedsIntegerRange {
        /// Requested main-leg depth.
        max_k: u32,
        /// Requested leg length.
        leg_depth: u32,
    },

    /// Spacing constant that is not a positive finite number.
    #[error("invalid spacing `{name}`: {value}")]
    InvalidSpacing {
        /// Field name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
}

/// Result type for the library
pub type Result<T> = std::result::Result<T, TreeError>;

/// Build the tree for `(max_k, leg_depth)` with default spacing.
///
/// Rejects zero parameters and combinations whose values overflow `u64`.
pub fn generate(max_k: u32, leg_depth: u32) -> Result<CollatzTree> {
    let config = TreeConfig::new(max_k, leg_depth)?;
    Ok(generate_from(config))
}

/// Build the tree for a validated configuration with a fresh evaluator.
pub fn generate_from(config: TreeConfig) -> CollatzTree {
    let mut evaluator = ReverseEvaluator::new();
    generate_with(config, &mut evaluator)
}

/// Build the tree reusing `evaluator`'s cache.
pub fn generate_with(config: TreeConfig, evaluator: &mut ReverseEvaluator) -> CollatzTree {
    TreeBuilder::new(config, evaluator).build()
}
