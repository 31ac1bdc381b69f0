// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render cache keyed on node versions.
//!
//! Walk the tree top-down for a viewport and redraw only the nodes whose
//! version changed since the last frame. Subtrees smaller than a pixel are
//! skipped.
//!
//! Run:
//! - `cargo run -p understory_demos --example canvas_render_cache`

use std::collections::HashMap;

use kurbo::Rect;
use understory_canvas_index::{Element, NodeId, NodeRef, SpatialIndex};

#[derive(Debug)]
struct Dot {
    id: u32,
    at: Rect,
}

impl Element for Dot {
    type Id = u32;

    fn bbox(&self) -> Rect {
        self.at
    }

    fn id(&self) -> &u32 {
        &self.id
    }

    fn z_index(&self) -> i32 {
        0
    }
}

#[derive(Default)]
struct TileCache {
    versions: HashMap<NodeId, u64>,
}

impl TileCache {
    /// Render `node` into the cache. Returns how many nodes were redrawn.
    fn render(&mut self, node: NodeRef<'_, Dot>, viewport: Rect, pixel: f64) -> usize {
        let bbox = node.bbox();
        if bbox.width() < pixel && bbox.height() < pixel {
            return 0;
        }
        let stale = self.versions.insert(node.id(), node.version()) != Some(node.version());
        usize::from(stale)
            + node
                .children_intersecting(viewport)
                .map(|c| self.render(c, viewport, pixel))
                .sum::<usize>()
    }
}

fn main() {
    let mut idx = SpatialIndex::new();
    for i in 0..200_u32 {
        let x = f64::from(i % 20) * 10.0;
        let y = f64::from(i / 20) * 10.0;
        idx.insert(Dot {
            id: i,
            at: Rect::new(x, y, x + 4.0, y + 4.0),
        })
        .unwrap();
    }
    let viewport = Rect::new(0.0, 0.0, 200.0, 100.0);
    let mut cache = TileCache::default();

    let first = cache.render(idx.root(), viewport, 1.0);
    println!("first frame redrew {first} nodes");
    let second = cache.render(idx.root(), viewport, 1.0);
    println!("unchanged frame redrew {second} nodes");

    idx.insert(Dot {
        id: 1000,
        at: Rect::new(55.0, 55.0, 58.0, 58.0),
    })
    .unwrap();
    let third = cache.render(idx.root(), viewport, 1.0);
    println!("after one insert redrew {third} nodes");

    let visible = idx.query_with(viewport, |r| r.width() < 1.0 && r.height() < 1.0);
    println!("{} dots visible at this zoom", visible.len());
}
