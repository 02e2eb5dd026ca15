//! Generation parameters and layout constants
//!
//! `max_k` controls the main leg (`2^3 ..= 2^max_k`), `leg_depth` the number
//! of doublings stacked above every G1 node. Both are validated once, here,
//! so the builder never sees an inconsistent configuration.

use std::ops::RangeInclusive;

use crate::TreeError;

/// Main-leg depths offered by the interactive front end.
pub const MAX_K_RANGE: RangeInclusive<u32> = 5..=24;

/// G1 leg lengths offered by the interactive front end.
pub const LEG_DEPTH_RANGE: RangeInclusive<u32> = 3..=12;

/// Largest `max_k + leg_depth` whose node values all fit in `u64`.
///
/// The tallest leg value is `n · 2^leg_depth` with `n < 2^(max_k - 1)`.
pub const MAX_COMBINED_DEPTH: u32 = 63;

/// Spacing constants for coordinate assignment.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct LayoutSpacing {
    /// Vertical distance between consecutive generations.
    pub y_spacing: f64,
    /// Lateral distance from the main leg to the innermost G1 lanes.
    pub x_spacing: f64,
    /// Horizontal distance between nodes `2` and `1` of the root triangle.
    pub root_spacing: f64,
    /// Extra lateral offset added for each pair of G1 placements.
    pub lane_step: f64,
    /// Offset of a G2 node from its leg when no neighbouring lane exists.
    pub g2_offset: f64,
    /// Height of a formula annotation above its infinity marker.
    pub annotation_lift: f64,
}

impl Default for LayoutSpacing {
    fn default() -> Self {
        Self {
            y_spacing: 2.0,
            x_spacing: 5.0,
            root_spacing: 4.0,
            lane_step: 2.0,
            g2_offset: 3.0,
            annotation_lift: 0.4,
        }
    }
}

impl LayoutSpacing {
    fn validate(&self) -> Result<(), TreeError> {
        let fields = [
            ("y_spacing", self.y_spacing),
            ("x_spacing", self.x_spacing),
            ("root_spacing", self.root_spacing),
            ("lane_step", self.lane_step),
            ("g2_offset", self.g2_offset),
            ("annotation_lift", self.annotation_lift),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(TreeError::InvalidSpacing { name, value });
            }
        }
        Ok(())
    }
}

/// Validated parameters for one tree generation run.
///
/// Fields are private; [`TreeConfig::new`] and [`TreeConfig::with_spacing`]
/// are the only ways to build one.
///
/// ```compile_fail
/// use collatz_tree::{LayoutSpacing, TreeConfig};
///
/// let config = TreeConfig { max_k: 64, leg_depth: 0, spacing: LayoutSpacing::default() };
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct TreeConfig {
    max_k: u32,
    leg_depth: u32,
    spacing: LayoutSpacing,
}

impl TreeConfig {
    /// Construct a configuration with default spacing.
    pub fn new(max_k: u32, leg_depth: u32) -> Result<Self, TreeError> {
        if max_k == 0 {
            return Err(TreeError::InvalidParameter(
                "max_k must be > 0".to_string(),
            ));
        }
        if leg_depth == 0 {
            return Err(TreeError::InvalidParameter(
                "leg_depth must be > 0".to_string(),
            ));
        }
        if max_k + leg_depth > MAX_COMBINED_DEPTH {
            return Err(TreeError::ExceedsIntegerRange { max_k, leg_depth });
        }
        Ok(Self {
            max_k,
            leg_depth,
            spacing: LayoutSpacing::default(),
        })
    }

    /// Replace the layout constants.
    pub fn with_spacing(mut self, spacing: LayoutSpacing) -> Result<Self, TreeError> {
        spacing.validate()?;
        self.spacing = spacing;
        Ok(self)
    }

    /// Exponent of the topmost main-leg node.
    pub fn max_k(&self) -> u32 {
        self.max_k
    }

    /// Number of doublings in every G1 leg.
    pub fn leg_depth(&self) -> u32 {
        self.leg_depth
    }

    /// Coordinate constants.
    pub fn spacing(&self) -> &LayoutSpacing {
        &self.spacing
    }

    /// Whether both parameters sit inside the interactive bounds.
    pub fn within_interactive_bounds(&self) -> bool {
        MAX_K_RANGE.contains(&self.max_k) && LEG_DEPTH_RANGE.contains(&self.leg_depth)
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_k: 12,
            leg_depth: 6,
            spacing: LayoutSpacing::default(),
        }
    }
}
