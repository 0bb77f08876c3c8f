//! Utilities for generating examples, benchmarks, and test cases.

use crate::geom::{ellipse, Paths, Point};

/// Generate a bunch of squares, arranged in a grid.
///
/// The top-left of the first square is at (x0, y0). Each square has size `size
/// x size`, and the distance between squares (both horizontally and vertically)
/// is `offset`.
///
/// If `slant` is non-zero, generates parallelograms instead of squares: the
/// right-hand side of each square gets translated down by `slant`.
fn squares((x0, y0): (i64, i64), size: i64, offset: i64, slant: i64, count: usize) -> Paths {
    let mut ret = Vec::with_capacity(count * count);
    for i in 0..count as i64 {
        let x = x0 + i * offset;
        for j in 0..count as i64 {
            let y = y0 + j * offset;
            ret.push(vec![
                Point::new(x, y),
                Point::new(x, y + size),
                Point::new(x + size, y + size + slant),
                Point::new(x + size, y + slant),
            ]);
        }
    }

    ret
}

/// Generate an `n` by `n` checkerboard-like pattern with overlapping squares.
/// For `n = 3`, it looks like:
///
/// ```text
/// ┌────┐ ┌────┐ ┌────┐
/// │    │ │    │ │    │
/// │  ┌─┼─┼─┐┌─┼─┼─┐  │
/// └──┼─┘ └─┼┼─┘ └─┼──┘
/// ┌──┼─┐ ┌─┼┼─┐ ┌─┼──┐
/// │  └─┼─┼─┘└─┼─┼─┘  │
/// │  ┌─┼─┼─┐┌─┼─┼─┐  │
/// └──┼─┘ └─┼┼─┘ └─┼──┘
/// ┌──┼─┐ ┌─┼┼─┐ ┌─┼──┐
/// │  └─┼─┼─┘└─┼─┼─┘  │
/// │    │ │    │ │    │
/// └────┘ └────┘ └────┘
/// ```
///
/// We return the pattern in two parts: the outer collection of `n x n`
/// non-overlapping squares, and the inner collection of `(n - 1) x (n - 1)`
/// non-overlapping squares.
pub fn checkerboard(n: usize) -> (Paths, Paths) {
    (
        squares((0, 0), 30, 40, 0, n),
        squares((20, 20), 30, 40, 0, n.saturating_sub(1)),
    )
}

/// Like `checkerboard`, but with no exactly-horizontal lines.
///
/// Horizontal lines have special handling in the sweep-line algorithm, so
/// their presence or absence can affect performance.
pub fn slanted_checkerboard(n: usize) -> (Paths, Paths) {
    (
        squares((0, 0), 30, 40, 1, n),
        squares((20, 20), 30, 40, 1, n.saturating_sub(1)),
    )
}

/// The "evens" are a bunch of long, skinny parallelograms going from top-left
/// to bottom-right. The "odds" go from top-right to bottom-left.
///
/// Every even crosses every odd, so there are quadratically many
/// intersections.
pub fn slanties(n: usize) -> (Paths, Paths) {
    let h = 20 * n as i64;

    let mut even = Vec::with_capacity(n);
    let mut odd = Vec::with_capacity(n);
    for i in 0..n as i64 {
        let x_off = 20 * i;
        even.push(vec![
            Point::new(x_off, 0),
            Point::new(x_off + h, h),
            Point::new(x_off + h + 10, h),
            Point::new(x_off + 10, 0),
        ]);

        odd.push(vec![
            Point::new(x_off + h, 0),
            Point::new(x_off, h),
            Point::new(x_off + 10, h),
            Point::new(x_off + h + 10, 0),
        ]);
    }

    (even, odd)
}

/// A row of `n` overlapping circles, each with `steps` vertices.
///
/// This is the kind of input that offsetting produces: lots of short edges
/// and many near-collinear vertices.
pub fn circles(n: usize, radius: i64, steps: usize) -> Paths {
    (0..n as i64)
        .map(|i| ellipse(Point::new(i * radius, 0), radius as f64, radius as f64, steps))
        .collect()
}
