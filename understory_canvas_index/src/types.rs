// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types: the element capability, element handles, and node identifiers.

use core::hash::Hash;

use kurbo::Rect;

/// Anything that can be stored in a [`SpatialIndex`](crate::SpatialIndex).
///
/// The index only ever reads these three accessors. It never inspects any other
/// property of the element and never mutates it.
///
/// The bounding box is read once, when the element is inserted. If an element's
/// bounds or z-index change, re-insert it (inserting an element whose id is
/// already live replaces the previous entry).
pub trait Element {
    /// Stable, unique identifier.
    type Id: Clone + Eq + Hash;

    /// Axis-aligned bounds of the element.
    fn bbox(&self) -> Rect;

    /// Identifier of the element. Identity inside the index is by id.
    fn id(&self) -> &Self::Id;

    /// Paint and selection order key. Higher is drawn on top.
    fn z_index(&self) -> i32;
}

/// Handle to an element stored in a [`SpatialIndex`](crate::SpatialIndex).
///
/// A slot index plus a generation counter.
///
/// - On insert, a slot is allocated; reused slots get a higher generation.
/// - On removal, the handle becomes stale. Stale handles never alias a newer
///   element because the generation must match.
/// - Re-inserting an element with a live id invalidates the old handle.
///
/// A live handle always resolves to the same leaf node, see
/// [`SpatialIndex::leaf`](crate::SpatialIndex::leaf).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementHandle(pub(crate) u32, pub(crate) u32);

impl ElementHandle {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

/// Identifier of a node in the tree.
///
/// Node slots are recycled once a node is dropped by a collapse or a removal,
/// so an id alone is not a cache key. Pair it with
/// [`NodeRef::version`](crate::NodeRef::version), which is never reused within
/// one index.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "NodeId uses 32-bit indices by design."
    )]
    pub(crate) const fn new(idx: usize) -> Self {
        Self(idx as u32)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}
