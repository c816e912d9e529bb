//! # Polygon Triangulation
//!
//! Ear clipping for simple (possibly non-convex) polygons, used for the
//! caps of non-convex towers and for non-convex polyhedron faces after
//! planar projection. Triangles always come out clockwise regardless of
//! the input loop's orientation; a caller whose loop runs
//! counterclockwise (negative projected area sum) reverses them to match.
//!
//! Failure to find an ear means the loop is self-intersecting or
//! degenerate; since callers only pass loops that already passed their
//! own validation, that is reported as an internal error.

use csg_tree::geom::{right_cross_z, right_normal_z};
use glam::DVec2;
use scad_ast::{Diagnostics, Fatal, Span};

/// Triangulate a simple polygon loop.
///
/// Returns triangles as positions into `pts`, each triple clockwise.
pub fn triangulate(
    pts: &[DVec2],
    span: Span,
    diags: &mut Diagnostics,
) -> Result<Vec<[usize; 3]>, Fatal> {
    let n = pts.len();
    if n < 3 {
        return Err(diags.internal(span, "triangulation of a degenerate loop"));
    }

    // loop orientation: clockwise positive
    let mut area = 0.0;
    for i in 0..n {
        area += right_cross_z(pts[i], pts[(i + 1) % n], pts[(i + 2) % n]);
    }
    if area == 0.0 {
        return Err(diags.internal(span, "triangulation of a zero-area loop"));
    }
    let orient = if area > 0.0 { 1 } else { -1 };

    let mut alive: Vec<usize> = (0..n).collect();
    let mut out = Vec::with_capacity(n - 2);

    while alive.len() > 3 {
        let Some(ear) = find_ear(pts, &alive, orient) else {
            return Err(diags.internal(span, "no ear found in simple polygon"));
        };
        let i0 = alive[(ear + alive.len() - 1) % alive.len()];
        let i1 = alive[ear];
        let i2 = alive[(ear + 1) % alive.len()];
        out.push(if orient > 0 { [i0, i1, i2] } else { [i2, i1, i0] });
        alive.remove(ear);
    }
    let last = [alive[0], alive[1], alive[2]];
    out.push(if orient > 0 { last } else { [last[2], last[1], last[0]] });
    Ok(out)
}

/// Pick a clippable vertex: a convex corner whose triangle contains no
/// other remaining vertex. Collinear corners are only clipped when no
/// proper ear exists.
fn find_ear(pts: &[DVec2], alive: &[usize], orient: i32) -> Option<usize> {
    let mut collinear_ear = None;
    let n = alive.len();
    for k in 0..n {
        let a = pts[alive[(k + n - 1) % n]];
        let o = pts[alive[k]];
        let b = pts[alive[(k + 1) % n]];
        let turn = right_normal_z(a, o, b);
        if turn == -orient {
            continue; // reflex corner
        }
        if turn == 0 {
            collinear_ear.get_or_insert(k);
            continue;
        }
        if alive
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != (k + n - 1) % n && j != k && j != (k + 1) % n)
            .all(|(_, &vi)| !tri_contains(a, o, b, orient, pts[vi]))
        {
            return Some(k);
        }
    }
    collinear_ear
}

/// Whether `p` lies inside or on the triangle `a, o, b` (given the
/// triangle's turn direction).
fn tri_contains(a: DVec2, o: DVec2, b: DVec2, orient: i32, p: DVec2) -> bool {
    let s0 = right_normal_z(a, o, p);
    let s1 = right_normal_z(o, b, p);
    let s2 = right_normal_z(b, a, p);
    // all on the triangle's inner side (or on an edge)
    s0 * orient >= 0 && s1 * orient >= 0 && s2 * orient >= 0
}

// =============================================================================
// TESTS
// =============================================================================
