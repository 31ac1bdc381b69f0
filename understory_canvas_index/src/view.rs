// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only views of tree nodes.
//!
//! A render cache walks the tree through [`NodeRef`], keyed by
//! `(NodeRef::id, NodeRef::version)`.

use alloc::vec::Vec;
use core::fmt;

use kurbo::Rect;

use crate::node::Tree;
use crate::registry::Registry;
use crate::types::{Element, NodeId};
use crate::util::intersects;

/// Borrowed view of one node of a [`SpatialIndex`](crate::SpatialIndex).
pub struct NodeRef<'a, E: Element> {
    pub(crate) tree: &'a Tree,
    pub(crate) registry: &'a Registry<E>,
    pub(crate) id: NodeId,
}

impl<E: Element> Clone for NodeRef<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: Element> Copy for NodeRef<'_, E> {}

impl<E: Element> fmt::Debug for NodeRef<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.tree.node(self.id);
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("bbox", &node.bbox)
            .field("version", &node.version)
            .field("leaf", &node.is_leaf())
            .field("children", &node.children().len())
            .finish_non_exhaustive()
    }
}

impl<'a, E: Element + 'a> NodeRef<'a, E> {
    fn with_id(self, id: NodeId) -> Self {
        Self { id, ..self }
    }

    /// Identifier of this node.
    pub fn id(self) -> NodeId {
        self.id
    }

    /// Cached aggregate bounds. `Rect::ZERO` for an empty root.
    pub fn bbox(self) -> Rect {
        self.tree.node(self.id).bbox
    }

    /// Version stamp, replaced whenever this node's content, child set, or
    /// bounds change. Stamps are unique within one index.
    pub fn version(self) -> u64 {
        self.tree.node(self.id).version
    }

    /// True if this node holds an element.
    pub fn is_leaf(self) -> bool {
        self.tree.node(self.id).is_leaf()
    }

    /// The element held by a leaf; `None` for internal nodes.
    pub fn element(self) -> Option<&'a E> {
        let slot = self.tree.leaf_slot(self.id)?;
        Some(&self.registry.at_slot(slot).element)
    }

    /// Parent node, `None` for the root.
    pub fn parent(self) -> Option<Self> {
        self.tree.node(self.id).parent.map(|p| self.with_id(p))
    }

    /// Children in stored order. Empty for leaves.
    pub fn children(self) -> impl Iterator<Item = Self> + 'a {
        self.tree
            .children(self.id)
            .iter()
            .map(move |&c| self.with_id(c))
    }

    /// Children whose bounds intersect `region` (touching counts).
    pub fn children_intersecting(self, region: Rect) -> impl Iterator<Item = Self> + 'a {
        self.children()
            .filter(move |c| intersects(c.bbox(), region))
    }

    /// Every leaf in this subtree, in no particular order.
    pub fn leaves(self) -> Vec<Self> {
        let mut out = Vec::new();
        self.tree.all_leaves(self.id, &mut out);
        out.into_iter().map(|id| self.with_id(id)).collect()
    }

    /// Leaves in this subtree whose bounds overlap `region` with non-zero area.
    ///
    /// Any node for which `too_small` returns true is skipped together with its
    /// subtree, which lets a renderer ignore detail below a pixel threshold.
    pub fn leaves_intersecting(
        self,
        region: Rect,
        too_small: impl FnMut(Rect) -> bool,
    ) -> Vec<Self> {
        let mut out = Vec::new();
        self.tree
            .leaves_intersecting(self.id, region, too_small, &mut out);
        out.into_iter().map(|id| self.with_id(id)).collect()
    }
}
