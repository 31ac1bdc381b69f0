// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Understory Canvas Index: insert, query in paint order, remove.

use kurbo::Rect;
use understory_canvas_index::{Element, SpatialIndex};

#[derive(Debug)]
struct Stroke {
    id: u32,
    bounds: Rect,
    z: i32,
}

impl Element for Stroke {
    type Id = u32;

    fn bbox(&self) -> Rect {
        self.bounds
    }

    fn id(&self) -> &u32 {
        &self.id
    }

    fn z_index(&self) -> i32 {
        self.z
    }
}

fn main() {
    let mut idx = SpatialIndex::new();
    let background = idx
        .insert(Stroke {
            id: 1,
            bounds: Rect::new(0.0, 0.0, 100.0, 100.0),
            z: -1,
        })
        .unwrap();
    idx.insert(Stroke {
        id: 2,
        bounds: Rect::new(10.0, 10.0, 20.0, 20.0),
        z: 3,
    })
    .unwrap();
    idx.insert(Stroke {
        id: 3,
        bounds: Rect::new(15.0, 15.0, 40.0, 40.0),
        z: 1,
    })
    .unwrap();

    // Paint order: lowest z first.
    let visible: Vec<_> = idx
        .query(Rect::new(0.0, 0.0, 50.0, 50.0))
        .iter()
        .map(|s| s.id)
        .collect();
    println!("visible (bottom to top): {visible:?}");

    let top = idx.topmost(Rect::new(16.0, 16.0, 17.0, 17.0)).map(|s| s.id);
    println!("topmost at (16,16): {top:?}");

    idx.remove(background).unwrap();
    println!("bounds after removing background: {:?}", idx.bbox());
}
