use std::f64::consts::SQRT_2;

use tilepath_core::Point;

/// Cost of one orthogonal step on a tile of weight 1.
pub const ORTHOGONAL_COST: f64 = 1.0;

/// Cost of one diagonal step on a tile of weight 1.
pub const DIAGONAL_COST: f64 = SQRT_2;

/// Octile distance between two points.
///
/// Exact shortest-path length on an open 8-connected grid where orthogonal
/// steps cost 1 and diagonal steps cost √2; admissible as long as no
/// passable tile weighs less than 1.
#[inline]
pub fn octile(a: Point, b: Point) -> f64 {
    let dx = f64::from((a.x - b.x).unsigned_abs());
    let dy = f64::from((a.y - b.y).unsigned_abs());
    dx.max(dy) + (SQRT_2 - 1.0) * dx.min(dy)
}

/// Unweighted cost of stepping between two adjacent points.
#[inline]
pub fn step_cost(from: Point, to: Point) -> f64 {
    if from.is_diagonal_to(to) {
        DIAGONAL_COST
    } else {
        ORTHOGONAL_COST
    }
}
