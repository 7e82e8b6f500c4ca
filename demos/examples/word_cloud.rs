// Copyright 2025 the Cloudpack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A miniature word-cloud layout pass over the packing structures.
//!
//! This example plays the role of the outer layout engine:
//! - rasterize each word into a blocky cell mask and a `cloudpack_tree::Tree`,
//! - walk trial offsets along a spiral from the word's desired anchor,
//! - commit the first offset that fits the shared `DenseGrid` canvas,
//! - dump the canvas as ASCII, one character per grid cell.
//!
//! Run:
//! - `cargo run -p cloudpack_demos --example word_cloud`

use std::f64::consts::PI;

use kurbo::{Point, Vec2};

use cloudpack_grid::{Cell, DenseGrid, Occupancy, WordId};
use cloudpack_tree::Tree;

const RESOLUTION: i32 = 4;
const CANVAS_WIDTH: i32 = 320;
const CANVAS_HEIGHT: i32 = 160;

/// A word's cell mask: a body block with an ascender over the first glyph,
/// which is enough irregularity to exercise the quadrant index.
struct Mask {
    cells: Vec<Cell>,
    width: i32,
    height: i32,
}

fn rasterize(word: &str, body_cells: i32) -> Mask {
    let len = word.chars().count() as i32;
    let mut cells = Vec::new();
    for col in 0..len {
        for row in 0..body_cells {
            cells.push(Cell::new(
                col * RESOLUTION,
                (row + 1) * RESOLUTION,
                RESOLUTION,
                RESOLUTION,
            ));
        }
    }
    cells.push(Cell::new(0, 0, RESOLUTION, RESOLUTION));
    Mask {
        cells,
        width: len * RESOLUTION,
        height: (body_cells + 1) * RESOLUTION,
    }
}

/// Smallest halving-friendly square that holds the mask: a power-of-two
/// multiple of the resolution, so subdivision bottoms out exactly at
/// resolution-sized leaves.
fn root_side(mask: &Mask) -> i32 {
    let extent = mask.width.max(mask.height);
    let mut side = RESOLUTION;
    while side < extent {
        side *= 2;
    }
    side
}

/// Snap a float coordinate to the resolution lattice.
fn snap(v: f64) -> i32 {
    (v / f64::from(RESOLUTION)).floor() as i32 * RESOLUTION
}

/// Archimedean spiral out from the anchor; the first fitting offset wins.
/// Candidates that would leave the canvas are skipped before trial, which
/// keeps every translated cell on the grid.
fn find_offset(tree: &mut Tree, canvas: &DenseGrid, anchor: Point, mask: &Mask) -> Option<(i32, i32)> {
    let mut theta = 0.0_f64;
    while theta < 40.0 * PI {
        let arm = 1.5 * theta;
        let candidate = anchor + Vec2::new(arm * theta.cos(), arm * theta.sin());
        let x = snap(candidate.x - f64::from(mask.width) / 2.0);
        let y = snap(candidate.y - f64::from(mask.height) / 2.0);
        if x >= 0 && y >= 0 && x + mask.width <= CANVAS_WIDTH && y + mask.height <= CANVAS_HEIGHT {
            tree.move_to(x, y);
            if tree.fits(canvas) {
                return Some((x, y));
            }
        }
        theta += 0.3;
    }
    None
}

fn main() {
    let words = [
        ("cloudpack", 3),
        ("quadtree", 2),
        ("packing", 2),
        ("canvas", 2),
        ("layout", 1),
        ("spiral", 1),
        ("offset", 1),
        ("leaves", 1),
        ("cells", 1),
        ("grid", 1),
    ];

    let mut canvas = DenseGrid::for_canvas(CANVAS_WIDTH, CANVAS_HEIGHT, RESOLUTION);
    let mut initials = vec![b'.'; words.len() + 1];

    let center = Point::new(
        f64::from(CANVAS_WIDTH) / 2.0,
        f64::from(CANVAS_HEIGHT) / 2.0,
    );

    for (n, (word, body_cells)) in words.iter().enumerate() {
        let raw = u16::try_from(n + 1).expect("few words");
        let id = WordId::new(raw).expect("word ids start at 1");
        initials[usize::from(raw)] = word.as_bytes()[0];

        let mask = rasterize(word, *body_cells);
        let side = root_side(&mask);
        let mut tree = Tree::new(Cell::new(0, 0, side, side), RESOLUTION);
        for &cell in &mask.cells {
            tree.insert(cell, id);
        }

        // Nudge each word's anchor around the center so the spiral searches
        // start from different directions.
        let angle = 2.0 * PI * (n as f64) / (words.len() as f64);
        let anchor = center + Vec2::new(20.0 * angle.cos(), 10.0 * angle.sin());

        match find_offset(&mut tree, &canvas, anchor, &mask) {
            Some((x, y)) => {
                tree.place(&mut canvas, id);
                tree.release_nodes();
                // The bounds accumulator stores max raw coordinates in its
                // size fields; the real extent adds one trailing cell.
                let b = tree.observed_bounds();
                println!(
                    "placed {word:>10} at ({x:>3}, {y:>3}): {} cells, {}x{} units",
                    tree.leaves().len(),
                    b.width - b.x + RESOLUTION,
                    b.height - b.y + RESOLUTION,
                );
            }
            None => println!("no room for {word}"),
        }
    }

    println!();
    for row in 0..canvas.rows() {
        let mut line = String::with_capacity(canvas.cols() as usize);
        for col in 0..canvas.cols() {
            let ch = match canvas.get(col, row) {
                Some(id) => initials[usize::from(id.get())],
                None => b'.',
            };
            line.push(char::from(ch));
        }
        println!("{line}");
    }
}
