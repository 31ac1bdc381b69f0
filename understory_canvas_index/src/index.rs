// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public [`SpatialIndex`] API.

use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt::Debug;
use core::hash::Hash;

use kurbo::Rect;
use tracing::debug;

use crate::error::IndexError;
use crate::node::{DEFAULT_FAN_OUT, Tree};
use crate::registry::Registry;
use crate::types::{Element, ElementHandle, NodeId};
use crate::util::is_valid_bbox;
use crate::view::NodeRef;
use crate::zorder::{PaintOrder, into_paint_order};

/// Spatial index over drawable elements.
///
/// Owns one bounding-box tree and an id registry. Mutation is synchronous and
/// single-threaded; queries borrow the index immutably, so the borrow checker
/// already keeps reads from interleaving with an insert or removal.
pub struct SpatialIndex<E: Element> {
    tree: Tree,
    registry: Registry<E>,
}

impl<E: Element> Debug for SpatialIndex<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("tree", &self.tree)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl<E: Element> Default for SpatialIndex<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Element> SpatialIndex<E> {
    /// Create an empty index with the default target fan-out (30).
    pub fn new() -> Self {
        Self::with_fan_out(DEFAULT_FAN_OUT)
    }

    /// Create an empty index with a custom target fan-out.
    ///
    /// Values below 4 are raised to 4.
    pub fn with_fan_out(fan_out: usize) -> Self {
        Self {
            tree: Tree::new(fan_out),
            registry: Registry::new(),
        }
    }

    /// The soft cap on children per node.
    pub fn fan_out(&self) -> usize {
        self.tree.fan_out()
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// True if the index holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Aggregate bounds of every element, `None` when empty.
    pub fn bbox(&self) -> Option<Rect> {
        (!self.is_empty()).then(|| self.tree.node(self.tree.root()).bbox)
    }

    /// Insert an element and return its handle.
    ///
    /// If an element with the same id is already live, it is removed first and
    /// its handle becomes stale. Re-inserting is how the index learns about a
    /// changed bbox or z-index.
    ///
    /// Fails with [`IndexError::InvalidElementBBox`] if the bbox has a
    /// non-finite coordinate or negative area; the index is left untouched.
    pub fn insert(&mut self, element: E) -> Result<ElementHandle, IndexError> {
        let bbox = element.bbox();
        if !is_valid_bbox(bbox) {
            debug!(?bbox, "rejecting element with invalid bounding box");
            return Err(IndexError::InvalidElementBBox(bbox));
        }
        if let Some(previous) = self.registry.handle_of(element.id()) {
            let replaced = self.remove(previous);
            debug_assert!(replaced.is_ok(), "registry handed out a stale handle");
        }
        let tree = &mut self.tree;
        Ok(self
            .registry
            .insert(element, |slot| tree.insert_leaf(slot, bbox)))
    }

    /// Remove the element addressed by `handle` and return it.
    ///
    /// A stale handle is a no-op that reports [`IndexError::InvalidHandle`].
    pub fn remove(&mut self, handle: ElementHandle) -> Result<E, IndexError> {
        let Some(entry) = self.registry.remove(handle) else {
            debug!(?handle, "ignoring removal of a stale handle");
            return Err(IndexError::InvalidHandle(handle));
        };
        self.tree.remove_leaf(entry.leaf);
        Ok(entry.element)
    }

    /// Remove the element with the given id, if live.
    pub fn remove_by_id<Q>(&mut self, id: &Q) -> Option<E>
    where
        E::Id: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = self.registry.handle_of(id)?;
        self.remove(handle).ok()
    }

    /// Remove every element. Outstanding handles become stale.
    pub fn clear(&mut self) {
        self.registry.clear();
        self.tree.clear();
    }

    /// Element addressed by `handle`, if live.
    pub fn get(&self, handle: ElementHandle) -> Option<&E> {
        self.registry.get(handle).map(|e| &e.element)
    }

    /// True if `handle` refers to a live element.
    pub fn is_alive(&self, handle: ElementHandle) -> bool {
        self.registry.get(handle).is_some()
    }

    /// Element with the given id. O(1); does not touch the tree.
    pub fn lookup<Q>(&self, id: &Q) -> Option<&E>
    where
        E::Id: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(self.registry.handle_of(id)?)
    }

    /// Current handle of the element with the given id.
    pub fn handle_of<Q>(&self, id: &Q) -> Option<ElementHandle>
    where
        E::Id: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.registry.handle_of(id)
    }

    /// True if an element with the given id is live.
    pub fn contains_id<Q>(&self, id: &Q) -> bool
    where
        E::Id: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.registry.handle_of(id).is_some()
    }

    /// Elements whose bbox overlaps `region` with non-zero area, in paint
    /// order (ascending z-index, ties by insertion order).
    ///
    /// Empty, inverted, or non-finite regions return nothing.
    pub fn query(&self, region: Rect) -> Vec<&E> {
        self.query_with(region, |_| false)
    }

    /// Like [`query`](Self::query), but any subtree whose bbox satisfies
    /// `too_small` is skipped without being visited.
    pub fn query_with(&self, region: Rect, too_small: impl FnMut(Rect) -> bool) -> Vec<&E> {
        let leaves = self.leaves_in(region, too_small);
        let hits = leaves
            .into_iter()
            .map(|leaf| self.keyed(leaf))
            .collect::<Vec<_>>();
        into_paint_order(hits)
    }

    /// The element painted on top within `region`, if any.
    pub fn topmost(&self, region: Rect) -> Option<&E> {
        self.leaves_in(region, |_| false)
            .into_iter()
            .map(|leaf| self.keyed(leaf))
            .max_by_key(|(key, _)| *key)
            .map(|(_, e)| e)
    }

    /// Every element, in tree traversal order (not sorted).
    pub fn all_elements(&self) -> Vec<&E> {
        let mut leaves = Vec::with_capacity(self.len());
        self.tree.all_leaves(self.tree.root(), &mut leaves);
        leaves
            .into_iter()
            .map(|leaf| self.keyed(leaf).1)
            .collect()
    }

    /// View of the root node.
    pub fn root(&self) -> NodeRef<'_, E> {
        self.view(self.tree.root())
    }

    /// View of the leaf holding the element addressed by `handle`.
    pub fn leaf(&self, handle: ElementHandle) -> Option<NodeRef<'_, E>> {
        let entry = self.registry.get(handle)?;
        Some(self.view(entry.leaf))
    }

    /// View of an arbitrary node, if the id is currently in use.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, E>> {
        self.tree.get(id)?;
        Some(self.view(id))
    }

    fn view(&self, id: NodeId) -> NodeRef<'_, E> {
        NodeRef {
            tree: &self.tree,
            registry: &self.registry,
            id,
        }
    }

    fn leaves_in(&self, region: Rect, too_small: impl FnMut(Rect) -> bool) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        if is_valid_bbox(region) {
            self.tree
                .leaves_intersecting(self.tree.root(), region, too_small, &mut leaves);
        }
        leaves
    }

    fn keyed(&self, leaf: NodeId) -> (PaintOrder, &E) {
        let slot = self
            .tree
            .leaf_slot(leaf)
            .expect("traversal yields leaves only");
        let entry = self.registry.at_slot(slot);
        let key = PaintOrder {
            z_index: entry.element.z_index(),
            seq: entry.seq,
        };
        (key, &entry.element)
    }

    #[cfg(test)]
    pub(crate) fn parts(&self) -> (&Tree, &Registry<E>) {
        (&self.tree, &self.registry)
    }
}
