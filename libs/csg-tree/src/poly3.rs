//! # Polyhedron
//!
//! The edge-consistent polyhedral mesh: a point vector, faces as loops of
//! point references, and canonical edges with fore/back face links. The
//! edge <-> face relation is cyclic, so all cross links are index ids into
//! the three vectors the polyhedron exclusively owns; none of the vectors
//! is resized once ids into it exist.
//!
//! Construction and the edge-pairing validation live in the lowering crate;
//! after a successful build every edge has exactly one `fore` and one
//! `back` face (the two-manifold invariant).

use crate::gc::Gc;
use glam::DVec3;
use scad_ast::Span;

/// Index of a point in [`Polyhedron::points`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(pub u32);

/// Index of a face in [`Polyhedron::faces`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub u32);

/// Index of an edge in [`Polyhedron::edges`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub u32);

/// A 3D point with the source span that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex3 {
    /// Coordinate.
    pub coord: DVec3,
    /// Source span, for diagnostics only.
    pub span: Span,
}

/// A reference to a point from a face loop, with its own span.
///
/// The span differs from the point's own when a face names a point that was
/// written elsewhere (polyhedron face index lists).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointRef {
    /// The referenced point.
    pub point: PointId,
    /// Span of this use of the point.
    pub span: Span,
}

/// A face: a loop of point references and the parallel loop of edges.
///
/// `points.len() == edges.len() >= 3` after edge pairing. Faces are convex
/// or were produced by triangulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// Point loop, in outward-winding order.
    pub points: Vec<PointRef>,
    /// Edge loop; `edges[i]` joins `points[i]` and `points[i+1]`.
    /// Filled by edge pairing.
    pub edges: Vec<EdgeId>,
    /// Source span of the face.
    pub span: Span,
}

impl Face {
    /// Build a face from point references, reversing when `rev` is set.
    #[must_use]
    pub fn from_refs(mut points: Vec<PointRef>, rev: bool, span: Span) -> Self {
        debug_assert!(points.len() >= 3);
        if rev {
            points.reverse();
        }
        Self {
            points,
            edges: Vec::new(),
            span,
        }
    }
}

/// An undirected edge, canonicalized so `src.point < dst.point`.
///
/// `fore` is the face that traverses src -> dst, `back` the face that
/// traverses dst -> src. Both are set after a successful pairing pass.
/// `dst`'s span is retargeted to the back face's own reference so both
/// traversal sites stay reachable for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Lower endpoint.
    pub src: PointRef,
    /// Higher endpoint.
    pub dst: PointRef,
    /// Face traversing src -> dst.
    pub fore: Option<FaceId>,
    /// Face traversing dst -> src.
    pub back: Option<FaceId>,
}

/// A polyhedron: owned points, faces and canonical edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyhedron {
    /// Point vector; never resized once referenced.
    pub points: Vec<Vertex3>,
    /// Face vector.
    pub faces: Vec<Face>,
    /// Canonical edge vector, one entry per undirected edge.
    pub edges: Vec<Edge>,
    /// Whether the producing matrix was a pure rectangular rotation
    /// (axis permutations and flips); lets an STL writer keep exact
    /// normals.
    pub is_rect_rot: bool,
    /// Graphics context at the producing node.
    pub gc: Gc,
    /// Source span of the producing primitive.
    pub span: Span,
}

impl Polyhedron {
    /// Create an empty polyhedron shell.
    #[must_use]
    pub fn new(gc: Gc, span: Span) -> Self {
        Self {
            points: Vec::new(),
            faces: Vec::new(),
            edges: Vec::new(),
            is_rect_rot: false,
            gc,
            span,
        }
    }

    /// Coordinate of a point.
    #[inline]
    #[must_use]
    pub fn coord(&self, id: PointId) -> DVec3 {
        self.points[id.0 as usize].coord
    }

    /// Look up a face.
    #[inline]
    #[must_use]
    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.0 as usize]
    }

    /// Look up an edge.
    #[inline]
    #[must_use]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0 as usize]
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pref(i: u32) -> PointRef {
        PointRef {
            point: PointId(i),
            span: Span::synthetic(),
        }
    }

    #[test]
    fn face_reversal_flips_loop_order() {
        let f = Face::from_refs(vec![pref(0), pref(1), pref(2)], true, Span::synthetic());
        let ids: Vec<u32> = f.points.iter().map(|p| p.point.0).collect();
        assert_eq!(ids, vec![2, 1, 0]);
    }

    #[test]
    fn polyhedron_lookup_helpers() {
        let mut p = Polyhedron::new(Gc::default(), Span::synthetic());
        p.points.push(Vertex3 {
            coord: DVec3::new(1.0, 2.0, 3.0),
            span: Span::synthetic(),
        });
        assert_eq!(p.coord(PointId(0)), DVec3::new(1.0, 2.0, 3.0));
    }
}
