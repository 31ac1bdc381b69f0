// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint-order sorting.
//!
//! Query results come back bottom-to-top: ascending z-index, and for equal
//! z-index, in insertion order (older first). The second key makes the order
//! independent of tree shape, so two identical queries always agree.

use alloc::vec::Vec;

use crate::types::Element;

/// Sort key used for index results: z-index, then insertion sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct PaintOrder {
    pub(crate) z_index: i32,
    pub(crate) seq: u64,
}

/// Sort `(key, item)` pairs into paint order and drop the keys.
pub(crate) fn into_paint_order<T>(mut hits: Vec<(PaintOrder, T)>) -> Vec<T> {
    // Keys are unique, so an unstable sort is still deterministic.
    hits.sort_unstable_by_key(|(key, _)| *key);
    hits.into_iter().map(|(_, item)| item).collect()
}

/// Stable sort of elements by ascending z-index.
///
/// For element lists assembled outside the index (for example, merging the
/// results of several queries). Elements with equal z-index keep their
/// relative order.
///
/// ```rust
/// use kurbo::Rect;
/// use understory_canvas_index::{Element, sort_by_z_index};
///
/// struct Layer(u8, i32);
///
/// impl Element for Layer {
///     type Id = u8;
///     fn bbox(&self) -> Rect { Rect::ZERO }
///     fn id(&self) -> &u8 { &self.0 }
///     fn z_index(&self) -> i32 { self.1 }
/// }
///
/// let (a, b, c) = (Layer(1, 2), Layer(2, -1), Layer(3, 2));
/// let mut merged = vec![&a, &b, &c];
/// sort_by_z_index(&mut merged);
/// let ids: Vec<u8> = merged.iter().map(|l| l.0).collect();
/// assert_eq!(ids, [2, 1, 3]);
/// ```
pub fn sort_by_z_index<E: Element>(elements: &mut [&E]) {
    elements.sort_by_key(|e| e.z_index());
}
