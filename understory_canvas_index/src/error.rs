// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported at the [`SpatialIndex`](crate::SpatialIndex) API boundary.

use core::fmt;

use kurbo::Rect;

use crate::types::ElementHandle;

/// Error returned by fallible [`SpatialIndex`](crate::SpatialIndex) operations.
///
/// Neither variant leaves the index modified.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IndexError {
    /// The element's bounding box has a non-finite coordinate or negative area.
    InvalidElementBBox(Rect),
    /// The handle no longer refers to a live element.
    InvalidHandle(ElementHandle),
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidElementBBox(bbox) => write!(
                f,
                "element bounding box {bbox:?} is not finite or has negative area"
            ),
            Self::InvalidHandle(handle) => {
                write!(f, "handle {handle:?} does not refer to a live element")
            }
        }
    }
}

impl core::error::Error for IndexError {}
