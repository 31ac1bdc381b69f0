// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Eraser walkthrough.
//!
//! Draw a handful of strokes, sweep an eraser across the canvas, and remove
//! every stroke it touches. Ids survive across the sweep, so the eraser works
//! from ids rather than handles.
//!
//! Run:
//! - `cargo run -p understory_demos --example canvas_eraser`

use kurbo::Rect;
use understory_canvas_index::{Element, SpatialIndex};

#[derive(Clone, Debug)]
struct Stroke {
    name: String,
    bounds: Rect,
    z: i32,
}

impl Element for Stroke {
    type Id = String;

    fn bbox(&self) -> Rect {
        self.bounds
    }

    fn id(&self) -> &String {
        &self.name
    }

    fn z_index(&self) -> i32 {
        self.z
    }
}

fn stroke(name: &str, bounds: Rect, z: i32) -> Stroke {
    Stroke {
        name: name.to_owned(),
        bounds,
        z,
    }
}

fn main() {
    let mut canvas = SpatialIndex::new();
    for (i, x) in (0..12).map(|i| (i, f64::from(i) * 25.0)) {
        canvas
            .insert(stroke(
                &format!("dash-{i}"),
                Rect::new(x, 40.0, x + 15.0, 45.0),
                i,
            ))
            .unwrap();
    }
    canvas
        .insert(stroke("underline", Rect::new(0.0, 60.0, 300.0, 62.0), 20))
        .unwrap();
    println!("{} strokes, bounds {:?}", canvas.len(), canvas.bbox());

    // The eraser is a 10x30 brush moving right in 20px steps.
    let mut erased = Vec::new();
    for step in 0..6 {
        let x = 40.0 + f64::from(step) * 20.0;
        let brush = Rect::new(x, 35.0, x + 10.0, 65.0);
        let hit: Vec<String> = canvas
            .query(brush)
            .iter()
            .map(|s| s.name.clone())
            .collect();
        for name in hit {
            if canvas.remove_by_id(name.as_str()).is_some() {
                erased.push(name);
            }
        }
    }
    println!("erased: {erased:?}");
    println!("{} strokes left, bounds {:?}", canvas.len(), canvas.bbox());

    // Redraw the underline in front of everything else.
    canvas
        .insert(stroke("underline", Rect::new(0.0, 60.0, 300.0, 62.0), 99))
        .unwrap();
    let top = canvas.topmost(Rect::new(280.0, 40.0, 300.0, 62.0));
    println!("topmost near the right edge: {:?}", top.map(|s| &s.name));
}
