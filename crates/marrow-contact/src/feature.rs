//! Packed contact feature identifiers.
//!
//! A clipped contact point is identified by the pair of edges it
//! entered and left on each box. The four 8-bit tags pack into a u32
//! key used for warm-start lookup; `flip` swaps the box roles so the
//! key survives a reference-face change between steps.

use serde::{Deserialize, Serialize};

/// No edge involved.
pub const NO_EDGE: u8 = 0;
/// Bottom edge (y = -h).
pub const EDGE1: u8 = 1;
/// Right edge (x = +h).
pub const EDGE2: u8 = 2;
/// Top edge (y = +h).
pub const EDGE3: u8 = 3;
/// Left edge (x = -h).
pub const EDGE4: u8 = 4;

/// Edge tags identifying one clipped contact point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureId {
    /// Edge of box A the incident segment entered on.
    pub in_edge_a: u8,
    /// Edge of box A it left on.
    pub out_edge_a: u8,
    /// Edge of box B it entered on.
    pub in_edge_b: u8,
    /// Edge of box B it left on.
    pub out_edge_b: u8,
}

impl FeatureId {
    /// Packs the four tags into one comparable key.
    #[inline]
    pub fn key(self) -> u32 {
        u32::from(self.in_edge_a)
            | u32::from(self.out_edge_a) << 8
            | u32::from(self.in_edge_b) << 16
            | u32::from(self.out_edge_b) << 24
    }

    /// Swaps the A and B roles (reference-face change).
    #[inline]
    pub fn flip(&mut self) {
        std::mem::swap(&mut self.in_edge_a, &mut self.in_edge_b);
        std::mem::swap(&mut self.out_edge_a, &mut self.out_edge_b);
    }
}
