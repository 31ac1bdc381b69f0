// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Rect;
use understory_canvas_index::{Element, SpatialIndex};

#[derive(Clone, Debug)]
struct Item {
    id: u32,
    bbox: Rect,
    z: i32,
}

impl Element for Item {
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

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_grid_items(n: usize, cell: f64) -> Vec<Item> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(Item {
                id: (y * n + x) as u32,
                bbox: Rect::new(x0, y0, x0 + cell, y0 + cell),
                z: (x % 7) as i32,
            });
        }
    }
    out
}

/// Strokes of varied size scattered over a 2000x2000 canvas, with a few
/// canvas-sized frames mixed in.
fn gen_canvas_items(count: usize) -> Vec<Item> {
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let bbox = if i % 500 == 0 {
            Rect::new(0.0, 0.0, 2000.0, 2000.0)
        } else {
            let x0 = rng.next_f64() * 1950.0;
            let y0 = rng.next_f64() * 1950.0;
            let w = 1.0 + rng.next_f64() * 49.0;
            let h = 1.0 + rng.next_f64() * 49.0;
            Rect::new(x0, y0, x0 + w, y0 + h)
        };
        out.push(Item {
            id: i as u32,
            bbox,
            z: (rng.next_u64() % 16) as i32,
        });
    }
    out
}

fn build(items: &[Item], fan_out: usize) -> SpatialIndex<Item> {
    let mut idx = SpatialIndex::with_fan_out(fan_out);
    for it in items {
        idx.insert(it.clone()).unwrap();
    }
    idx
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("canvas_index_insert");
    for &n in &[64usize, 128] {
        let items = gen_grid_items(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        for &fan_out in &[8usize, 30, 64] {
            group.bench_function(format!("grid_n{n}_fan{fan_out}"), |b| {
                b.iter(|| black_box(build(&items, fan_out).len()));
            });
        }
    }
    let items = gen_canvas_items(10_000);
    group.throughput(Throughput::Elements(items.len() as u64));
    group.bench_function("canvas_10k", |b| {
        b.iter(|| black_box(build(&items, 30).len()));
    });
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("canvas_index_query");
    let items = gen_canvas_items(10_000);
    let idx = build(&items, 30);
    let viewport = Rect::new(500.0, 500.0, 1300.0, 1100.0);
    let brush = Rect::new(990.0, 990.0, 1010.0, 1010.0);

    group.bench_function("viewport", |b| {
        b.iter(|| black_box(idx.query(black_box(viewport)).len()));
    });
    group.bench_function("viewport_skip_subpixel", |b| {
        b.iter(|| {
            let hits = idx.query_with(black_box(viewport), |r| {
                r.width() < 4.0 && r.height() < 4.0
            });
            black_box(hits.len())
        });
    });
    group.bench_function("brush", |b| {
        b.iter(|| black_box(idx.query(black_box(brush)).len()));
    });
    group.bench_function("topmost", |b| {
        b.iter(|| black_box(idx.topmost(black_box(brush)).map(|it| it.id)));
    });
    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("canvas_index_remove");
    let items = gen_canvas_items(10_000);
    group.throughput(Throughput::Elements(items.len() as u64));
    group.bench_function("drain_by_id", |b| {
        b.iter_batched(
            || build(&items, 30),
            |mut idx| {
                for it in &items {
                    black_box(idx.remove_by_id(&it.id));
                }
                black_box(idx.is_empty())
            },
            BatchSize::LargeInput,
        );
    });
    group.bench_function("erase_and_redraw", |b| {
        b.iter_batched(
            || build(&items, 30),
            |mut idx| {
                for it in items.iter().step_by(10) {
                    let h = idx.handle_of(&it.id).unwrap();
                    let old = idx.remove(h).unwrap();
                    let moved = Item {
                        bbox: old.bbox + kurbo::Vec2::new(3.0, -2.0),
                        ..old
                    };
                    idx.insert(moved).unwrap();
                }
                black_box(idx.len())
            },
            BatchSize::LargeInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_query, bench_remove);
criterion_main!(benches);
