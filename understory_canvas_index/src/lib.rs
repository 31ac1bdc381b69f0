// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_canvas_index --heading-base-level=0

//! Understory Canvas Index: a self-rebalancing bounding-box tree for drawing canvases.
//!
//! Understory Canvas Index backs the document model of a vector drawing surface.
//!
//! - Insert and remove drawable elements; the tree keeps cached bounds and its
//!   shape up to date before every call returns.
//! - Query a region for rendering, hit testing, erasing, or selection. Results
//!   come back in paint order (ascending z-index).
//! - Look elements up by id in O(1), independent of the tree.
//!
//! Elements only need to expose bounds, an id, and a z-index through the
//! [`Element`] trait. Geometry uses [`kurbo::Rect`].
//!
//! # Example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_canvas_index::{Element, SpatialIndex};
//!
//! struct Stroke {
//!     id: u64,
//!     bounds: Rect,
//!     z: i32,
//! }
//!
//! impl Element for Stroke {
//!     type Id = u64;
//!     fn bbox(&self) -> Rect { self.bounds }
//!     fn id(&self) -> &u64 { &self.id }
//!     fn z_index(&self) -> i32 { self.z }
//! }
//!
//! let mut index = SpatialIndex::new();
//! let frame = index.insert(Stroke { id: 1, bounds: Rect::new(0.0, 0.0, 10.0, 10.0), z: 0 }).unwrap();
//! index.insert(Stroke { id: 2, bounds: Rect::new(2.0, 2.0, 4.0, 4.0), z: 5 }).unwrap();
//!
//! // Bottom to top.
//! let hits: Vec<u64> = index.query(Rect::new(0.0, 0.0, 10.0, 10.0)).iter().map(|s| s.id).collect();
//! assert_eq!(hits, [1, 2]);
//!
//! // Pick the top element under a small region.
//! assert_eq!(index.topmost(Rect::new(3.0, 3.0, 3.5, 3.5)).map(|s| s.id), Some(2));
//!
//! index.remove(frame).unwrap();
//! assert_eq!(index.bbox(), Some(Rect::new(2.0, 2.0, 4.0, 4.0)));
//! assert!(index.lookup(&1).is_none());
//! ```
//!
//! ## Tree shape
//!
//! Insertion is heuristic rather than area-optimal:
//!
//! - An element whose bounds cover a node's bounds is attached directly to that
//!   node, so large elements stay near the root.
//! - Once a node is full (the target fan-out, 30 by default), a new element
//!   descends into the smallest child that already contains it.
//! - Otherwise it is appended; a node that grows past the fan-out is split in two
//!   along its longer axis.
//!
//! Removal collapses internal nodes left with a single child, and cached bounds
//! bubble up to the root. The resulting shape depends on insertion order; query
//! results do not.
//!
//! The tree is not height-balanced. A split only adds a level below the node
//! that overflowed, so elements arriving in sorted order (a row drawn left to
//! right, for example) deepen the tree linearly: 20,000 unit squares inserted
//! left to right put the first one several hundred levels below the root.
//! Queries stay exact, but their cost on such input is closer to a linear
//! scan than to a logarithmic descent.
//!
//! ## Handles and node views
//!
//! [`SpatialIndex::insert`] returns an [`ElementHandle`]. A live handle always
//! resolves to the same leaf node, so a render cache can key on node views
//! ([`NodeRef`]) and their [`version`](NodeRef::version) stamps.
//!
//! ### Float semantics
//!
//! Element bounds must be finite and non-inverted; other bounds are rejected with
//! [`IndexError::InvalidElementBBox`]. An element matches a query only if the
//! overlap has non-zero area, so touching edges do not count.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod index;
mod node;
mod registry;
mod types;
mod util;
mod view;
mod zorder;

#[cfg(test)]
mod testing;

pub use error::IndexError;
pub use index::SpatialIndex;
pub use node::DEFAULT_FAN_OUT;
pub use types::{Element, ElementHandle, NodeId};
pub use view::NodeRef;
pub use zorder::sort_by_z_index;
