//! Lateral lane assignment for G1 legs
//!
//! G1 roots alternate left/right in encounter order. The lane offset grows
//! by `lane_step` after every pair of placements, so it is a function of
//! the placement index alone:
//!
//!   x(i) = sign(i) · (x_spacing + ⌊i / 2⌋ · lane_step),  sign = −1 for even i

use crate::config::LayoutSpacing;

/// Side of the main leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Negative x.
    Left,
    /// Positive x.
    Right,
}

impl Side {
    /// Side that receives placement `index`.
    #[inline]
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Side a lane at `x` belongs to.
    #[inline]
    pub fn of_x(x: f64) -> Self {
        if x < 0.0 {
            Side::Left
        } else {
            Side::Right
        }
    }

    #[inline]
    fn sign(self) -> f64 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// One G1 leg's vertical lane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lane {
    /// Lateral coordinate of the lane.
    pub x: f64,
    /// G1 node owning the lane.
    pub root: u64,
}

/// Per-side lane lists, appended in lockstep as G1 roots are placed.
#[derive(Debug, Default)]
pub struct LaneTracker {
    left: Vec<Lane>,
    right: Vec<Lane>,
    placed: usize,
}

impl LaneTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lateral coordinate for placement `index`.
    pub fn lane_x(index: usize, spacing: &LayoutSpacing) -> f64 {
        let band = (index / 2) as f64;
        Side::for_index(index).sign() * (spacing.x_spacing + band * spacing.lane_step)
    }

    /// Open a lane for `root` and return its x coordinate.
    pub fn assign(&mut self, root: u64, spacing: &LayoutSpacing) -> f64 {
        let index = self.placed;
        let x = Self::lane_x(index, spacing);
        let lane = Lane { x, root };
        match Side::for_index(index) {
            Side::Left => self.left.push(lane),
            Side::Right => self.right.push(lane),
        }
        self.placed += 1;
        x
    }

    /// Number of lanes assigned so far.
    pub fn len(&self) -> usize {
        self.placed
    }

    /// True before the first assignment.
    pub fn is_empty(&self) -> bool {
        self.placed == 0
    }

    /// Lanes on `side`, in placement order.
    pub fn lanes(&self, side: Side) -> &[Lane] {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Lateral coordinate for a G2 node hanging off `root`'s leg.
    ///
    /// Midpoint between `root`'s lane and the next lane on the same side in
    /// ascending x, or `root_x + g2_offset` when no such lane exists.
    pub fn g2_x(&self, root: u64, root_x: f64, spacing: &LayoutSpacing) -> f64 {
        let mut sorted = self.lanes(Side::of_x(root_x)).to_vec();
        sorted.sort_by(|a, b| a.x.total_cmp(&b.x));

        let next = sorted
            .iter()
            .position(|lane| lane.root == root)
            .and_then(|idx| sorted.get(idx + 1));

        match next {
            Some(lane) => (root_x + lane.x) / 2.0,
            None => root_x + spacing.g2_offset,
        }
    }
}
