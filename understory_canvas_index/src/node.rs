// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena-backed bounding-box tree: insertion, removal, rebalancing, traversal.
//!
//! Nodes live in a slot arena and refer to each other by [`NodeId`]. Children
//! are owned by exactly one internal node; the parent link is a plain id.
//!
//! Shape invariants after every public operation:
//! - an internal node's bbox is the union of its children's bboxes (`Rect::ZERO` if childless);
//! - `child.parent == Some(p)` iff `p` lists `child`;
//! - only the root may be an internal node with fewer than two children;
//! - leaves never move to a different node id while their element is live.

use alloc::vec;
use alloc::vec::Vec;

use kurbo::Rect;
use tracing::trace;

use crate::types::NodeId;
use crate::util::{contains_rect, intersects, overlap_area, union_all};

/// Default soft cap on the number of children of one node.
pub const DEFAULT_FAN_OUT: usize = 30;

/// Smallest accepted fan-out. Keeps both halves of a split at two or more children.
pub(crate) const MIN_FAN_OUT: usize = 4;

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) bbox: Rect,
    pub(crate) version: u64,
    pub(crate) kind: NodeKind,
}

#[derive(Clone, Debug)]
pub(crate) enum NodeKind {
    /// Holds one element, addressed by its registry slot.
    Leaf { slot: usize },
    /// Holds children only. Childless means an empty slot.
    Internal { children: Vec<NodeId> },
}

impl Node {
    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    pub(crate) fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Leaf { .. } => &[],
            NodeKind::Internal { children } => children,
        }
    }

    fn is_empty_slot(&self) -> bool {
        matches!(&self.kind, NodeKind::Internal { children } if children.is_empty())
    }
}

pub(crate) struct Tree {
    nodes: Vec<Option<Node>>,
    free_list: Vec<usize>,
    root: NodeId,
    fan_out: usize,
    // Per-instance so version stamps of two indexes never interact.
    version_counter: u64,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Tree")
            .field("nodes_total", &self.nodes.len())
            .field("nodes_alive", &alive)
            .field("root", &self.root)
            .field("fan_out", &self.fan_out)
            .finish_non_exhaustive()
    }
}

impl Tree {
    pub(crate) fn new(fan_out: usize) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0),
            fan_out: fan_out.max(MIN_FAN_OUT),
            version_counter: 0,
        };
        tree.root = tree.alloc_internal(None, Vec::new());
        tree
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
        self.root = self.alloc_internal(None, Vec::new());
    }

    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn fan_out(&self) -> usize {
        self.fan_out
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.idx())?.as_ref()
    }

    /// Access a node; panics if `id` is dangling.
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    pub(crate) fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).children()
    }

    fn children_mut(&mut self, id: NodeId) -> &mut Vec<NodeId> {
        match &mut self.node_mut(id).kind {
            NodeKind::Internal { children } => children,
            NodeKind::Leaf { .. } => unreachable!("leaf nodes have no children"),
        }
    }

    fn next_version(&mut self) -> u64 {
        self.version_counter += 1;
        self.version_counter
    }

    /// Mark a node's content or child set as changed.
    fn touch(&mut self, id: NodeId) {
        let version = self.next_version();
        self.node_mut(id).version = version;
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx] = Some(node);
            NodeId::new(idx)
        } else {
            self.nodes.push(Some(node));
            NodeId::new(self.nodes.len() - 1)
        }
    }

    fn alloc_internal(&mut self, parent: Option<NodeId>, children: Vec<NodeId>) -> NodeId {
        let version = self.next_version();
        self.alloc(Node {
            parent,
            bbox: Rect::ZERO,
            version,
            kind: NodeKind::Internal { children },
        })
    }

    fn release(&mut self, id: NodeId) {
        debug_assert!(id != self.root, "the root is never released");
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Point every child of `parent` back at it.
    fn adopt(&mut self, parent: NodeId) {
        for i in 0..self.children(parent).len() {
            let child = self.children(parent)[i];
            self.node_mut(child).parent = Some(parent);
        }
    }

    /// Remove `child` from `parent`'s child list.
    fn detach(&mut self, child: NodeId, parent: NodeId) {
        let children = self.children_mut(parent);
        let before = children.len();
        children.retain(|&c| c != child);
        debug_assert_eq!(
            children.len() + 1,
            before,
            "child must be listed exactly once in its parent"
        );
        self.touch(parent);
    }

    /// Replace `old` by `new` at the same position in `parent`'s child list.
    fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        let children = self.children_mut(parent);
        let pos = children
            .iter()
            .position(|&c| c == old)
            .expect("child listed in its parent");
        children[pos] = new;
        self.node_mut(new).parent = Some(parent);
        self.touch(parent);
    }

    fn compute_bbox(&self, id: NodeId) -> Rect {
        let node = self.node(id);
        match &node.kind {
            NodeKind::Leaf { .. } => node.bbox,
            NodeKind::Internal { children } => {
                union_all(children.iter().map(|&c| self.node(c).bbox)).unwrap_or(Rect::ZERO)
            }
        }
    }

    /// Recompute the cached bbox of `id`. With `bubble`, continue into the
    /// ancestors for as long as the bbox actually changes.
    ///
    /// A leaf's bbox is the element bbox captured when the leaf was filled.
    pub(crate) fn recompute_bbox(&mut self, id: NodeId, bubble: bool) {
        let mut current = id;
        loop {
            let bbox = self.compute_bbox(current);
            let changed = self.node(current).bbox != bbox;
            if changed {
                let version = self.next_version();
                let node = self.node_mut(current);
                node.bbox = bbox;
                node.version = version;
            }
            if !bubble || !changed {
                return;
            }
            match self.node(current).parent {
                Some(parent) => current = parent,
                None => return,
            }
        }
    }

    /// Insert a leaf for the element in registry slot `slot` and return it.
    ///
    /// `bbox` must already be validated.
    pub(crate) fn insert_leaf(&mut self, slot: usize, bbox: Rect) -> NodeId {
        self.add_leaf(self.root, slot, bbox)
    }

    fn add_leaf(&mut self, at: NodeId, slot: usize, bbox: Rect) -> NodeId {
        if self.node(at).is_empty_slot() {
            let version = self.next_version();
            let node = self.node_mut(at);
            node.kind = NodeKind::Leaf { slot };
            node.bbox = bbox;
            node.version = version;
            if let Some(parent) = node.parent {
                self.recompute_bbox(parent, true);
            }
            return at;
        }

        // A filled leaf cannot gain children: put an internal node in its place
        // and keep the leaf (and so its element's handle) underneath.
        let at = if self.node(at).is_leaf() {
            self.wrap_leaf(at)
        } else {
            at
        };

        // Large elements stay near the top instead of descending.
        if contains_rect(bbox, self.node(at).bbox) {
            let slot_node = self.alloc_internal(Some(at), Vec::new());
            if self.children(at).len() < self.fan_out {
                self.children_mut(at).push(slot_node);
            } else {
                let displaced = core::mem::take(self.children_mut(at));
                trace!(
                    node = at.0,
                    moved = displaced.len(),
                    "moving siblings of a covering element into an intermediate node"
                );
                let holder = self.alloc_internal(Some(at), displaced);
                self.adopt(holder);
                self.recompute_bbox(holder, false);
                *self.children_mut(at) = vec![slot_node, holder];
            }
            self.touch(at);
            return self.add_leaf(slot_node, slot, bbox);
        }

        if self.children(at).len() >= self.fan_out {
            let smallest = self
                .children(at)
                .iter()
                .copied()
                .filter(|&c| contains_rect(self.node(c).bbox, bbox))
                .min_by(|&a, &b| {
                    self.node(a)
                        .bbox
                        .area()
                        .total_cmp(&self.node(b).bbox.area())
                });
            if let Some(child) = smallest {
                let leaf = self.add_leaf(child, slot, bbox);
                let from = self.collapse(leaf);
                self.recompute_bbox(from, true);
                return leaf;
            }
        }

        let version = self.next_version();
        let leaf = self.alloc(Node {
            parent: Some(at),
            bbox,
            version,
            kind: NodeKind::Leaf { slot },
        });
        self.children_mut(at).push(leaf);
        self.touch(at);
        if self.children(at).len() > self.fan_out {
            self.split_overflowing(at);
        }
        self.recompute_bbox(at, true);
        leaf
    }

    /// Put a fresh internal node in `leaf`'s place with `leaf` as its only child.
    fn wrap_leaf(&mut self, leaf: NodeId) -> NodeId {
        let parent = self.node(leaf).parent;
        let bbox = self.node(leaf).bbox;
        let wrapper = self.alloc_internal(parent, vec![leaf]);
        self.node_mut(wrapper).bbox = bbox;
        self.node_mut(leaf).parent = Some(wrapper);
        match parent {
            Some(p) => self.replace_child(p, leaf, wrapper),
            None => self.root = wrapper,
        }
        wrapper
    }

    /// Partition the children of `id` into two new internal nodes, cutting at
    /// the median of the child centres along the longer axis.
    fn split_overflowing(&mut self, id: NodeId) {
        let mut children = core::mem::take(self.children_mut(id));
        trace!(node = id.0, children = children.len(), "splitting overflowing node");
        let bounds =
            union_all(children.iter().map(|&c| self.node(c).bbox)).unwrap_or(Rect::ZERO);
        let along_x = bounds.width() >= bounds.height();
        children.sort_by(|&a, &b| {
            let ca = self.node(a).bbox.center();
            let cb = self.node(b).bbox.center();
            if along_x {
                ca.x.total_cmp(&cb.x)
            } else {
                ca.y.total_cmp(&cb.y)
            }
        });
        let right = children.split_off(children.len() / 2);
        let left_node = self.alloc_internal(Some(id), children);
        let right_node = self.alloc_internal(Some(id), right);
        for half in [left_node, right_node] {
            self.adopt(half);
            self.recompute_bbox(half, false);
        }
        *self.children_mut(id) = vec![left_node, right_node];
        self.touch(id);
    }

    /// If `node` is its parent's only child, remove the redundant level.
    ///
    /// Below the root, `node` takes its parent's place in the grandparent. When
    /// the parent is the root, the root absorbs `node`'s children instead (a
    /// leaf stays where it is). Returns the node whose bbox must be recomputed.
    fn collapse(&mut self, node: NodeId) -> NodeId {
        let Some(parent) = self.node(node).parent else {
            return node;
        };
        if self.children(parent).len() != 1 {
            return parent;
        }
        debug_assert_eq!(self.children(parent)[0], node, "only child mismatch");
        match self.node(parent).parent {
            Some(grandparent) => {
                trace!(node = node.0, dropped = parent.0, "lifting only child");
                self.replace_child(grandparent, parent, node);
                self.release(parent);
                // The grandparent may now have a single child of its own.
                self.collapse(node)
            }
            None if self.node(node).is_leaf() => parent,
            None => {
                trace!(node = node.0, "root absorbing children of its only child");
                let children = core::mem::take(self.children_mut(node));
                *self.children_mut(parent) = children;
                self.adopt(parent);
                self.release(node);
                self.touch(parent);
                parent
            }
        }
    }

    /// Detach and drop `leaf`, rebalance around it, and bubble bboxes to the root.
    pub(crate) fn remove_leaf(&mut self, leaf: NodeId) {
        debug_assert!(self.node(leaf).is_leaf(), "remove_leaf called on internal node");
        let Some(parent) = self.node(leaf).parent else {
            // The root held the element itself: back to an empty slot.
            let version = self.next_version();
            let root = self.node_mut(leaf);
            root.kind = NodeKind::Internal {
                children: Vec::new(),
            };
            root.bbox = Rect::ZERO;
            root.version = version;
            return;
        };
        self.detach(leaf, parent);
        self.release(leaf);
        let from = self.rebalance(parent);
        self.recompute_bbox(from, true);
    }

    fn rebalance(&mut self, parent: NodeId) -> NodeId {
        match self.children(parent).len() {
            0 => match self.node(parent).parent {
                Some(grandparent) => {
                    self.detach(parent, grandparent);
                    self.release(parent);
                    self.rebalance(grandparent)
                }
                None => parent,
            },
            1 => {
                let only = self.children(parent)[0];
                self.collapse(only)
            }
            _ => parent,
        }
    }

    /// Iterative depth-first search for leaves under `from` whose bbox overlaps
    /// `region` with non-zero area.
    ///
    /// Subtrees whose bbox does not intersect `region` are never visited; nodes
    /// for which `too_small` returns true are skipped along with their subtree.
    pub(crate) fn leaves_intersecting(
        &self,
        from: NodeId,
        region: Rect,
        mut too_small: impl FnMut(Rect) -> bool,
        out: &mut Vec<NodeId>,
    ) {
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if too_small(node.bbox) {
                continue;
            }
            match &node.kind {
                NodeKind::Leaf { .. } => {
                    if overlap_area(node.bbox, region) > 0.0 {
                        out.push(id);
                    }
                }
                NodeKind::Internal { children } => {
                    stack.extend(
                        children
                            .iter()
                            .copied()
                            .filter(|&c| intersects(self.node(c).bbox, region)),
                    );
                }
            }
        }
    }

    /// All leaves under `from`, in no particular order.
    pub(crate) fn all_leaves(&self, from: NodeId, out: &mut Vec<NodeId>) {
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            match &self.node(id).kind {
                NodeKind::Leaf { .. } => out.push(id),
                NodeKind::Internal { children } => stack.extend(children.iter().copied()),
            }
        }
    }

    /// Registry slot held by a leaf, `None` for internal nodes.
    pub(crate) fn leaf_slot(&self, id: NodeId) -> Option<usize> {
        match self.node(id).kind {
            NodeKind::Leaf { slot } => Some(slot),
            NodeKind::Internal { .. } => None,
        }
    }
}
