//! Strongly-typed identifiers for simulation entities.
//!
//! Newtype wrappers prevent accidental mixing of body slots with
//! force or energy slots. Ids are stable slot indices into the
//! arenas owned by the world; a removed entity leaves a hole and
//! its id is never reused within a scene.

use serde::{Deserialize, Serialize};

/// Index into the body arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Index into the force (constraint) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForceId(pub u32);

/// Index into the energy (FEM element) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnergyId(pub u32);

impl BodyId {
    /// Returns the raw index as `usize` for array indexing.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl ForceId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl EnergyId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for BodyId {
    fn from(val: u32) -> Self {
        Self(val)
    }
}

impl From<u32> for ForceId {
    fn from(val: u32) -> Self {
        Self(val)
    }
}

impl From<u32> for EnergyId {
    fn from(val: u32) -> Self {
        Self(val)
    }
}
