//! Edge routing shared by the flowchart and ER layouts.
//!
//! Edges run between the facing sides of two boxes along the dominant axis
//! of their centers. The perpendicular coordinate is the box center, shifted
//! by an optional lateral offset.

use super::types::{Point, Rect};

/// How far a self-loop sticks out of the right side of its box.
const LOOP_REACH: f64 = 30.0;

/// Route a straight edge from `a` to `b`.
pub fn route_between(a: &Rect, b: &Rect, lateral: f64) -> Vec<Point> {
    let ca = a.center();
    let cb = b.center();
    let dx = cb.x - ca.x;
    let dy = cb.y - ca.y;

    if dx.abs() > dy.abs() {
        let (sx, ex) = if dx >= 0.0 {
            (a.right(), b.x)
        } else {
            (a.x, b.right())
        };
        vec![Point::new(sx, ca.y + lateral), Point::new(ex, cb.y + lateral)]
    } else {
        let (sy, ey) = if dy >= 0.0 {
            (a.bottom(), b.y)
        } else {
            (a.y, b.bottom())
        };
        vec![Point::new(ca.x + lateral, sy), Point::new(cb.x + lateral, ey)]
    }
}

/// Four-point loop leaving and re-entering the right side of `r`.
pub fn self_loop(r: &Rect) -> Vec<Point> {
    let c = r.center();
    let quarter = r.height / 4.0;
    let out = r.right() + LOOP_REACH;
    vec![
        Point::new(r.right(), c.y - quarter),
        Point::new(out, c.y - quarter),
        Point::new(out, c.y + quarter),
        Point::new(r.right(), c.y + quarter),
    ]
}

/// Cycle lateral offsets as `0, -offset, +offset`.
pub fn lateral_offset(edge_index: usize, offset: f64) -> f64 {
    match edge_index % 3 {
        0 => 0.0,
        1 => -offset,
        _ => offset,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
