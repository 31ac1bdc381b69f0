// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Rect;
use understory_canvas_index::{Element, SpatialIndex};

use rstar::primitives::Rectangle;
use rstar::{AABB, RTree};

#[derive(Clone, Debug)]
struct Cell {
    id: u32,
    bbox: Rect,
}

impl Element for Cell {
    type Id = u32;

    fn bbox(&self) -> Rect {
        self.bbox
    }

    fn id(&self) -> &u32 {
        &self.id
    }

    fn z_index(&self) -> i32 {
        0
    }
}

fn gen_grid_cells(n: usize, cell: f64) -> Vec<Cell> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(Cell {
                id: (y * n + x) as u32,
                bbox: Rect::new(x0, y0, x0 + cell, y0 + cell),
            });
        }
    }
    out
}

fn to_rstar_rects(v: &[Cell]) -> Vec<Rectangle<[f64; 2]>> {
    v.iter()
        .map(|c| Rectangle::from_corners([c.bbox.x0, c.bbox.y0], [c.bbox.x1, c.bbox.y1]))
        .collect()
}

fn bench_rtree_external_compare(c: &mut Criterion) {
    let mut group = c.benchmark_group("canvas_index_vs_rstar");
    for &n in &[64usize, 128] {
        let cells = gen_grid_cells(n, 10.0);
        let query = Rect::new(100.0, 100.0, 500.0, 500.0);
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("canvas_index_build_query_n{n}"), |b| {
            b.iter_batched(
                || cells.clone(),
                |cells| {
                    let mut idx = SpatialIndex::new();
                    for cell in cells {
                        let _ = idx.insert(cell);
                    }
                    black_box(idx.query(query).len());
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_build_query_incremental_n{n}"), |b| {
            b.iter_batched(
                || to_rstar_rects(&cells),
                |rectangles| {
                    let mut tree = RTree::new();
                    for r in rectangles {
                        tree.insert(r);
                    }
                    let aabb = AABB::from_corners([query.x0, query.y0], [query.x1, query.y1]);
                    black_box(tree.locate_in_envelope_intersecting(&aabb).count());
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_build_query_bulk_n{n}"), |b| {
            b.iter_batched(
                || to_rstar_rects(&cells),
                |rectangles| {
                    let tree = RTree::bulk_load(rectangles);
                    let aabb = AABB::from_corners([query.x0, query.y0], [query.x1, query.y1]);
                    black_box(tree.locate_in_envelope_intersecting(&aabb).count());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rtree_external_compare);
criterion_main!(benches);
