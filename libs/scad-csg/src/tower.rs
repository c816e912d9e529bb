//! # Tower Construction
//!
//! Builds faces and edges for solids whose points sit on stacked layers:
//! cubes, polyhedronized spheres, cylinders, cones, and linear extrusions.
//! The point array comes pre-filled from the caller in construction space;
//! this pass checks the cross-section for convexity where asked,
//! transforms the points, emits bottom/top (or roof) and side faces with
//! outward winding, and runs edge pairing.
//!
//! `rev` is xored with the sign of the transform's determinant so
//! mirroring flips the winding. Side quads can be split along a chosen
//! diagonal (consistent across layers) when they would be non-planar, as
//! with twisted extrusions.

use crate::edges::make_edges;
use crate::triangulate::triangulate;
use csg_tree::geom::right_normal_z;
use csg_tree::mat::Mat;
use csg_tree::poly3::{Face, PointId, PointRef, Polyhedron};
use glam::DVec2;
use scad_ast::{Diagnostics, Fatal, Span};

/// Which diagonal splits the side quads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriSide {
    /// Keep side faces as quads.
    None,
    /// Split along the left diagonal (negative twist).
    Left,
    /// Split along the right diagonal (positive twist).
    Right,
}

fn pref(idx: usize, span: Span) -> PointRef {
    PointRef {
        point: PointId(idx as u32),
        span,
    }
}

/// Emit the bottom or top cap: one convex face, or the triangulation fan
/// mirrored between the two caps so both stay outward.
fn cap_faces(
    o: &mut Polyhedron,
    tri: &[[usize; 3]],
    span: Span,
    fn_: usize,
    rev: bool,
    top: bool,
) {
    let j_off = if top { o.points.len() - fn_ } else { 0 };
    if tri.is_empty() {
        let refs = (0..fn_).map(|j| pref(j + j_off, span)).collect();
        o.faces.push(Face::from_refs(refs, rev ^ top, span));
    } else {
        for t in tri {
            let refs = t.iter().map(|&j| pref(j + j_off, span)).collect();
            o.faces.push(Face::from_refs(refs, rev ^ top, span));
        }
    }
}

/// Build faces and edges for a tower of `fnz` layers of `fn_` points
/// (the last layer optionally collapsed to a single apex point).
///
/// `may_need_tri` checks the first layer for non-convexity and
/// triangulates the caps when needed; the bottom and top must be planar.
#[allow(clippy::too_many_arguments)]
pub fn faces_from_tower(
    o: &mut Polyhedron,
    diags: &mut Diagnostics,
    m: &Mat,
    span: Span,
    fn_: usize,
    fnz: usize,
    rev: bool,
    tri_side: TriSide,
    may_need_tri: bool,
) -> Result<(), Fatal> {
    debug_assert!(fn_ >= 3);
    debug_assert!(fnz >= 2);

    // non-convex cross-section? (checked before the transform)
    let mut need_tri = false;
    if may_need_tri {
        let mut orient = 0u32;
        for i in 0..fn_ {
            let j = (i + 1) % fn_;
            let k = (j + 1) % fn_;
            let z = right_normal_z(
                o.points[i].coord.truncate(),
                o.points[j].coord.truncate(),
                o.points[k].coord.truncate(),
            );
            orient |= 1 << (1 + z);
            if (orient & 5) == 5 {
                // both turn directions present
                need_tri = true;
                break;
            }
        }
    }

    let tri = if need_tri {
        let ring: Vec<DVec2> = o.points[..fn_]
            .iter()
            .map(|v| v.coord.truncate())
            .collect();
        triangulate(&ring, span, diags)?
    } else {
        Vec::new()
    };

    // mirroring flips the winding
    let rev = rev ^ (m.det < 0.0);

    // in-place transform
    for v in &mut o.points {
        v.coord = m.apply(v.coord);
    }

    let has_top = o.points.len() == fn_ * fnz;
    debug_assert!(has_top || o.points.len() == 1 + fn_ * (fnz - 1));

    let bt_cnt = if tri.is_empty() { 1 } else { tri.len() };
    let split = tri_side != TriSide::None;
    let expected = bt_cnt * (1 + usize::from(has_top))
        + (fnz - 2) * fn_ * (1 + usize::from(split))
        + fn_ * (1 + usize::from(split && has_top));

    // bottom and top
    cap_faces(o, &tri, span, fn_, rev, false);
    if has_top {
        cap_faces(o, &tri, span, fn_, rev, true);
    }

    // side bands
    let band_end = if has_top { fnz } else { fnz - 1 };
    for i in 1..band_end {
        let k1 = i * fn_;
        let k0 = k1 - fn_;
        for j0 in 0..fn_ {
            let j1 = (j0 + 1) % fn_;
            match tri_side {
                TriSide::Left => {
                    o.faces.push(Face::from_refs(
                        vec![pref(k0 + j0, span), pref(k0 + j1, span), pref(k1 + j0, span)],
                        !rev,
                        span,
                    ));
                    o.faces.push(Face::from_refs(
                        vec![pref(k1 + j1, span), pref(k1 + j0, span), pref(k0 + j1, span)],
                        !rev,
                        span,
                    ));
                }
                TriSide::Right => {
                    o.faces.push(Face::from_refs(
                        vec![pref(k0 + j0, span), pref(k0 + j1, span), pref(k1 + j1, span)],
                        !rev,
                        span,
                    ));
                    o.faces.push(Face::from_refs(
                        vec![pref(k1 + j1, span), pref(k1 + j0, span), pref(k0 + j0, span)],
                        !rev,
                        span,
                    ));
                }
                TriSide::None => {
                    o.faces.push(Face::from_refs(
                        vec![
                            pref(k0 + j0, span),
                            pref(k0 + j1, span),
                            pref(k1 + j1, span),
                            pref(k1 + j0, span),
                        ],
                        !rev,
                        span,
                    ));
                }
            }
        }
    }

    // roof: fan to the apex point
    if !has_top {
        let kw = o.points.len() - 1;
        let kv = kw - fn_;
        for j0 in 0..fn_ {
            let j1 = (j0 + 1) % fn_;
            o.faces.push(Face::from_refs(
                vec![pref(kv + j0, span), pref(kv + j1, span), pref(kw, span)],
                !rev,
                span,
            ));
        }
    }

    debug_assert_eq!(o.faces.len(), expected);
    make_edges(o, diags)
}

// =============================================================================
// TESTS
// =============================================================================
