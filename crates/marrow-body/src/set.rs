//! Slot arena for bodies.
//!
//! Bodies are referenced by stable `BodyId` slot indices. Removal
//! leaves a hole so outstanding ids never alias a different body
//! within the same scene.

use marrow_types::BodyId;

use crate::body::Body;

/// Arena of bodies with stable ids.
#[derive(Debug, Default)]
pub struct BodySet {
    slots: Vec<Option<Body>>,
}

impl BodySet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Inserts a body and returns its id.
    pub fn insert(&mut self, body: Body) -> BodyId {
        let id = BodyId(self.slots.len() as u32);
        self.slots.push(Some(body));
        id
    }

    /// Returns a reference to a live body.
    #[inline]
    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.slots.get(id.index()).and_then(|s| s.as_ref())
    }

    /// Returns a mutable reference to a live body.
    #[inline]
    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.slots.get_mut(id.index()).and_then(|s| s.as_mut())
    }

    /// Removes a body, returning it. The slot stays reserved.
    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        self.slots.get_mut(id.index()).and_then(|s| s.take())
    }

    /// True if the id refers to a live body.
    #[inline]
    pub fn contains(&self, id: BodyId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live bodies.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// True when no bodies are alive.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates live bodies in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|b| (BodyId(i as u32), b)))
    }

    /// Ids of live bodies in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|_| BodyId(i as u32)))
    }

    /// Clears every slot.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
