//! # Edge Pairing
//!
//! Converts the point-wise face representation into the edge-wise one and
//! validates soundness on the way: every directed face edge must be
//! matched by exactly one reverse directed edge somewhere else, which is
//! exactly the two-manifold condition. An unsound polyhedron cannot be
//! converted, so the conversion doubles as the validator.
//!
//! The only property not visible here is an inside-out polyhedron; the
//! winding decisions upstream are responsible for that.

use csg_tree::poly3::{Edge, EdgeId, FaceId, Polyhedron};
use scad_ast::{Diagnostics, Fatal};
use std::cmp::Ordering;

/// Sort key: forward edges (src < dst) first, then by src, then by dst.
///
/// Keeps same-direction duplicates adjacent and makes the forward group a
/// binary-searchable prefix.
fn cmp_edge(a: &Edge, b: &Edge) -> Ordering {
    let a_fwd = a.src.point < a.dst.point;
    let b_fwd = b.src.point < b.dst.point;
    b_fwd
        .cmp(&a_fwd)
        .then(a.src.point.cmp(&b.src.point))
        .then(a.dst.point.cmp(&b.dst.point))
}

/// Build the canonical edge array and wire the face/edge cross links.
///
/// On success every edge has one `fore` and one `back` face. Failures are
/// reported with the spans of the offending edges and discard the
/// polyhedron.
pub fn make_edges(o: &mut Polyhedron, diags: &mut Diagnostics) -> Result<(), Fatal> {
    let point_cnt: usize = o.faces.iter().map(|f| f.points.len()).sum();

    // Step 1: every directed edge, so missing buddies can be reported
    // precisely. The array is cut to the forward half at the end.
    let mut edges: Vec<Edge> = Vec::with_capacity(point_cnt);
    for f in &o.faces {
        for j1 in 0..f.points.len() {
            let j2 = (j1 + 1) % f.points.len();
            edges.push(Edge {
                src: f.points[j1],
                dst: f.points[j2],
                fore: None,
                back: None,
            });
        }
    }

    // Step 2: sort and reject same-direction duplicates
    edges.sort_by(cmp_edge);
    for i in 1..edges.len() {
        let (a, b) = (&edges[i - 1], &edges[i]);
        if a.src.point == b.src.point && a.dst.point == b.dst.point {
            return Err(diags.fail(
                a.src.span,
                Some(b.src.span),
                "identical edge occurs more than once in polyhedron",
            ));
        }
    }

    // Step 3: find every face edge's canonical entry and claim a side
    let mut max_idx = 0usize;
    for fi in 0..o.faces.len() {
        let loop_len = o.faces[fi].points.len();
        let mut face_edges: Vec<EdgeId> = Vec::with_capacity(loop_len);
        for j1 in 0..loop_len {
            let j2 = (j1 + 1) % loop_len;
            let p1 = o.faces[fi].points[j1];
            let p2 = o.faces[fi].points[j2];
            let (ksrc, kdst) = if p1.point > p2.point { (p2, p1) } else { (p1, p2) };
            let probe = Edge {
                src: ksrc,
                dst: kdst,
                fore: None,
                back: None,
            };

            let Ok(h) = edges.binary_search_by(|e| cmp_edge(e, &probe)) else {
                return Err(diags.fail(
                    p1.span,
                    None,
                    "edge has no adjacent reverse edge in polyhedron",
                ));
            };
            max_idx = max_idx.max(h);
            let edge = &mut edges[h];
            if ksrc.point == p1.point {
                // forward traversal
                if edge.fore.is_some() {
                    return Err(diags.fail(
                        ksrc.span,
                        Some(edge.src.span),
                        "edge occurs multiple times in polyhedron",
                    ));
                }
                edge.fore = Some(FaceId(fi as u32));
            } else {
                // reverse traversal
                if edge.back.is_some() {
                    return Err(diags.fail(
                        kdst.span,
                        Some(edge.dst.span),
                        "edge occurs multiple times in polyhedron",
                    ));
                }
                edge.back = Some(FaceId(fi as u32));
                // retarget dst to the back face's own reference so the
                // reverse traversal site stays reachable for diagnostics
                edge.dst = kdst;
            }
            face_edges.push(EdgeId(h as u32));
        }
        o.faces[fi].edges = face_edges;
    }

    // Step 4: every forward edge needs its buddy
    for e in &edges {
        if e.src.point < e.dst.point && e.back.is_none() {
            return Err(diags.fail(
                e.src.span,
                None,
                "edge has no adjacent reverse edge in polyhedron",
            ));
        }
    }
    if max_idx >= point_cnt / 2 {
        return Err(diags.fail(
            edges[point_cnt / 2].src.span,
            None,
            "edge has no adjacent reverse edge in polyhedron",
        ));
    }

    debug_assert_eq!(point_cnt % 2, 0);
    edges.truncate(point_cnt / 2);
    o.edges = edges;
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
