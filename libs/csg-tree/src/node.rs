//! # CSG Nodes
//!
//! The ADD/SUB/CUT/XOR node shape shared by the 3D and the 2D trees. The
//! shape is generic over the leaf type: the lowering pass produces
//! `CsgNode<Solid>`, the layer driver works on `CsgNode` over its own
//! slice leaf.
//!
//! - ADD: children are unioned.
//! - SUB: one positive ADD group minus one negative ADD group.
//! - CUT: the intersection of two or more ADD groups.
//! - XOR: symmetric difference of ADD groups (path-parity holes from
//!   multi-path extrusions).

use crate::gc::Gc;
use crate::mat::MatId;
use crate::poly2::Polygon2;
use crate::poly3::Polyhedron;
use scad_ast::Span;

/// A union group.
#[derive(Debug, Clone, PartialEq)]
pub struct CsgAdd<L> {
    /// Source span of the grouping construct.
    pub span: Span,
    /// Children, unioned.
    pub children: Vec<CsgNode<L>>,
}

impl<L> CsgAdd<L> {
    /// Create an empty group.
    #[must_use]
    pub fn new(span: Span) -> Self {
        Self {
            span,
            children: Vec::new(),
        }
    }

    /// Whether the group has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// A difference: `add` minus `sub`.
#[derive(Debug, Clone, PartialEq)]
pub struct CsgSub<L> {
    /// Source span.
    pub span: Span,
    /// Positive side.
    pub add: CsgAdd<L>,
    /// Negative side.
    pub sub: CsgAdd<L>,
}

/// An intersection of two or more groups.
#[derive(Debug, Clone, PartialEq)]
pub struct CsgCut<L> {
    /// Source span.
    pub span: Span,
    /// Operands; the result is their intersection.
    pub cut: Vec<CsgAdd<L>>,
}

/// A symmetric difference of groups.
#[derive(Debug, Clone, PartialEq)]
pub struct CsgXor<L> {
    /// Source span.
    pub span: Span,
    /// Operands; the result keeps regions covered an odd number of times.
    pub xor: Vec<CsgAdd<L>>,
}

/// A CSG tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum CsgNode<L> {
    /// Union group.
    Add(CsgAdd<L>),
    /// Difference.
    Sub(CsgSub<L>),
    /// Intersection.
    Cut(CsgCut<L>),
    /// Symmetric difference.
    Xor(CsgXor<L>),
    /// A leaf primitive.
    Leaf(L),
}

// =============================================================================
// 3D LEAVES
// =============================================================================

/// An analytic sphere: the unit sphere under `mat`.
///
/// Emitted when the fragment count stays circular (no faceting requested);
/// the slicer polygonizes it per layer with up to `fn_` fragments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereSolid {
    /// Transform from the unit sphere.
    pub mat: MatId,
    /// Fragment cap for downstream polygonization.
    pub fn_: u32,
    /// Graphics context.
    pub gc: Gc,
    /// Source span.
    pub span: Span,
}

/// A leaf of the lowered tree.
///
/// 2D polygons appear as leaves while lowering inside a 2D context
/// (`linear_extrude` children); in a finished 3D tree only spheres and
/// polyhedra remain.
#[derive(Debug, Clone, PartialEq)]
pub enum Solid {
    /// Analytic sphere.
    Sphere(SphereSolid),
    /// Polyhedral mesh.
    Poly(Polyhedron),
    /// A 2D polygon (2D-context intermediate).
    Poly2(Polygon2),
}

/// The lowered 3D tree: a root union group plus the matrix arena that owns
/// every transform referenced from it.
#[derive(Debug)]
pub struct SolidTree {
    /// Root group.
    pub root: CsgAdd<Solid>,
    /// Matrix storage for the tree's lifetime.
    pub mats: crate::mat::MatArena,
}

impl SolidTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new(span: Span) -> Self {
        Self {
            root: CsgAdd::new(span),
            mats: crate::mat::MatArena::new(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_groups_report_empty() {
        let add: CsgAdd<Solid> = CsgAdd::new(Span::synthetic());
        assert!(add.is_empty());
    }

    #[test]
    fn tree_starts_with_empty_root_and_arena() {
        let t = SolidTree::new(Span::synthetic());
        assert!(t.root.is_empty());
        assert!(t.mats.is_empty());
    }
}
