// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test fixtures: a minimal element and full invariant checks.

use alloc::vec;
use alloc::vec::Vec;

use kurbo::Rect;

use crate::SpatialIndex;
use crate::node::Tree;
use crate::types::{Element, NodeId};
use crate::util::union_all;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Shape {
    pub(crate) id: u32,
    pub(crate) bbox: Rect,
    pub(crate) z: i32,
}

impl Shape {
    pub(crate) fn new(id: u32, bbox: Rect, z: i32) -> Self {
        Self { id, bbox, z }
    }
}

impl Element for Shape {
    type Id = u32;

    fn bbox(&self) -> Rect {
        self.bbox
    }

    fn id(&self) -> &u32 {
        &self.id
    }

    fn z_index(&self) -> i32 {
        self.z
    }
}

/// Walk the tree from the root and assert every shape invariant.
/// Returns the leaves found.
pub(crate) fn check_shape(tree: &Tree) -> Vec<NodeId> {
    let root = tree.root();
    assert!(tree.node(root).parent.is_none(), "root has no parent");
    let mut leaves = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let node = tree.node(id);
        if node.is_leaf() {
            leaves.push(id);
            continue;
        }
        let children = node.children();
        if id != root {
            assert!(
                children.len() >= 2,
                "non-root internal node {id:?} has {} children",
                children.len()
            );
        }
        for &c in children {
            assert_eq!(tree.node(c).parent, Some(id), "back-reference of {c:?}");
            stack.push(c);
        }
        let expected = union_all(children.iter().map(|&c| tree.node(c).bbox)).unwrap_or(Rect::ZERO);
        assert_eq!(node.bbox, expected, "cached bbox of {id:?}");
    }
    leaves
}

/// Shape invariants plus the one-to-one mapping between registry and leaves.
pub(crate) fn check_index(idx: &SpatialIndex<Shape>) {
    let (tree, registry) = idx.parts();
    let leaves = check_shape(tree);
    assert_eq!(leaves.len(), registry.len(), "one leaf per live element");
    for (handle, entry) in registry.entries() {
        assert_eq!(tree.leaf_slot(entry.leaf), Some(handle.idx()));
        assert_eq!(tree.node(entry.leaf).bbox, entry.element.bbox);
        assert_eq!(registry.handle_of(&entry.element.id), Some(handle));
    }
    for leaf in leaves {
        let slot = tree.leaf_slot(leaf).unwrap();
        assert_eq!(registry.at_slot(slot).leaf, leaf);
    }
}
