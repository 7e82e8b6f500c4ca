// Copyright 2025 the Cloudpack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};

use cloudpack_grid::{Cell, DenseGrid, Occupancy, WordId};
use cloudpack_tree::Tree;

const RESOLUTION: i32 = 4;

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
    /// Uniform value in `0..n`, snapped to the packing resolution.
    fn next_offset(&mut self, n: i32) -> i32 {
        let cells = (n / RESOLUTION) as u64;
        (self.next_u64() % cells) as i32 * RESOLUTION
    }
}

/// A row-sweep word mask of `n` resolution cells inside a `side`-unit square.
/// Consecutive cells are spatially adjacent, the pattern shape construction
/// produces in practice.
fn gen_mask(n: usize, side: i32) -> Vec<Cell> {
    let per_row = (side / RESOLUTION) as usize;
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let col = (i % per_row) as i32;
        let row = (i / per_row) as i32;
        out.push(Cell::new(
            col * RESOLUTION,
            row * RESOLUTION,
            RESOLUTION,
            RESOLUTION,
        ));
    }
    out
}

fn build_tree(mask: &[Cell], hint_cache: bool) -> Tree {
    let mut tree = Tree::new(Cell::new(0, 0, 64, 64), RESOLUTION);
    tree.set_hint_cache(hint_cache);
    let id = WordId::new(1).expect("nonzero id");
    for &cell in mask {
        tree.insert(cell, id);
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &[16usize, 64, 256] {
        let mask = gen_mask(n, 64);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("hints_n{}", n), |b| {
            b.iter_batched(
                || mask.clone(),
                |mask| black_box(build_tree(&mask, true)),
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("no_hints_n{}", n), |b| {
            b.iter_batched(
                || mask.clone(),
                |mask| black_box(build_tree(&mask, false)),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_fits(c: &mut Criterion) {
    let mut group = c.benchmark_group("fits");
    const TRIALS: usize = 256;

    for &n in &[16usize, 64, 256] {
        let mask = gen_mask(n, 64);
        // A canvas with a quarter of its cells already taken, the regime a
        // layout pass spends most of its time in.
        let mut canvas = DenseGrid::for_canvas(512, 512, RESOLUTION);
        let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
        let blocker = WordId::new(99).expect("nonzero id");
        for _ in 0..(canvas.cols() * canvas.rows() / 4) {
            canvas.set(
                rng.next_offset(512) / RESOLUTION,
                rng.next_offset(512) / RESOLUTION,
                blocker,
            );
        }

        group.throughput(Throughput::Elements(TRIALS as u64));
        group.bench_function(format!("quarter_full_n{}", n), |b| {
            b.iter_batched(
                || build_tree(&mask, true),
                |mut tree| {
                    let mut rng = Rng::new(0xBADC_F00D_1234_5678);
                    let mut hits = 0usize;
                    for _ in 0..TRIALS {
                        tree.move_to(rng.next_offset(512 - 64), rng.next_offset(512 - 64));
                        if tree.fits(&canvas) {
                            hits += 1;
                        }
                    }
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_place(c: &mut Criterion) {
    let mut group = c.benchmark_group("place");
    let mask = gen_mask(64, 64);
    group.throughput(Throughput::Elements(64));
    group.bench_function("commit_and_release", |b| {
        b.iter_batched(
            || (build_tree(&mask, true), DenseGrid::for_canvas(512, 512, RESOLUTION)),
            |(mut tree, mut canvas)| {
                let id = WordId::new(2).expect("nonzero id");
                tree.move_to(128, 128);
                if tree.fits(&canvas) {
                    tree.place(&mut canvas, id);
                }
                tree.release_nodes();
                black_box(canvas);
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_fits, bench_place);
criterion_main!(benches);
