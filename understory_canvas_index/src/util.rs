// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle predicates used by the tree.
//!
//! Kurbo provides the rectangle type and its union/intersection; these helpers
//! pin down the exact edge semantics the index relies on.

use kurbo::Rect;

/// True if all coordinates are finite and the rectangle is not inverted.
///
/// Zero-area rectangles (points, axis-aligned segments) are valid.
pub(crate) fn is_valid_bbox(r: Rect) -> bool {
    r.x0.is_finite()
        && r.y0.is_finite()
        && r.x1.is_finite()
        && r.y1.is_finite()
        && r.x1 >= r.x0
        && r.y1 >= r.y0
}

/// Closed-interval overlap test. Rectangles that only touch still intersect.
pub(crate) fn intersects(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// Area of the overlap of `a` and `b`; zero when they are disjoint or only touch.
pub(crate) fn overlap_area(a: Rect, b: Rect) -> f64 {
    if !intersects(a, b) {
        return 0.0;
    }
    a.intersect(b).area()
}

/// True if `inner` lies within `outer` (boundaries included).
pub(crate) fn contains_rect(outer: Rect, inner: Rect) -> bool {
    outer.x0 <= inner.x0 && outer.y0 <= inner.y0 && inner.x1 <= outer.x1 && inner.y1 <= outer.y1
}

/// Union of all rectangles, or `None` for an empty iterator.
pub(crate) fn union_all(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
    let mut it = rects.into_iter();
    let first = it.next()?;
    Some(it.fold(first, |acc, r| acc.union(r)))
}
