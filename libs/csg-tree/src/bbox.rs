//! # Bounding Boxes
//!
//! Axis-aligned bounds in 2D and 3D, plus the fold over the lowered tree.
//! The fold takes a `with_subtracted` flag: with it set, SUB and CUT
//! include every operand (safe for sizing an output volume); without it,
//! SUB keeps only the positive side and CUT intersects its operands,
//! exiting early once the running intersection empties.
//!
//! The analytic sphere uses the closed-form bound for a transformed unit
//! sphere (Tavian Barnes): per axis, `t_i ± sqrt(sum_j M[i][j]^2)`.

use crate::node::{CsgAdd, CsgNode, CsgSub, CsgXor, Solid, SolidTree, SphereSolid};
use crate::mat::MatArena;
use crate::poly2::Polygon2;
use crate::poly3::Polyhedron;
use glam::{DVec2, DVec3};

// =============================================================================
// AABB TYPES
// =============================================================================

/// A 2D axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2 {
    pub min: DVec2,
    pub max: DVec2,
}

impl Aabb2 {
    /// The empty box (inverted infinities).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: DVec2::splat(f64::INFINITY),
            max: DVec2::splat(f64::NEG_INFINITY),
        }
    }

    /// Whether the box contains anything.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y
    }

    /// Grow to include a point.
    pub fn expand(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }
}

/// A 3D axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb3 {
    /// The empty box (inverted infinities).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: DVec3::splat(f64::INFINITY),
            max: DVec3::splat(f64::NEG_INFINITY),
        }
    }

    /// The all-encompassing box; identity of intersection.
    #[must_use]
    pub fn full() -> Self {
        Self {
            min: DVec3::splat(f64::NEG_INFINITY),
            max: DVec3::splat(f64::INFINITY),
        }
    }

    /// Whether the box contains anything.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Grow to include a point.
    pub fn expand(&mut self, p: DVec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Grow to include another box.
    pub fn union(&mut self, other: &Aabb3) {
        if other.is_valid() {
            self.min = self.min.min(other.min);
            self.max = self.max.max(other.max);
        }
    }

    /// Shrink to the overlap with another box.
    pub fn intersect(&mut self, other: &Aabb3) {
        self.min = self.min.max(other.min);
        self.max = self.max.min(other.max);
    }

    /// Whether a point lies inside (inclusive).
    #[must_use]
    pub fn contains(&self, p: DVec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

// =============================================================================
// TREE FOLD
// =============================================================================

/// Bounding box of a lowered tree.
///
/// With `with_subtracted`, volumes that will be cut away still count.
#[must_use]
pub fn solid_tree_bb(tree: &SolidTree, with_subtracted: bool) -> Aabb3 {
    let mut bb = Aabb3::empty();
    bb_add(&mut bb, &tree.root, &tree.mats, with_subtracted);
    bb
}

fn bb_add(bb: &mut Aabb3, add: &CsgAdd<Solid>, mats: &MatArena, with_sub: bool) {
    for child in &add.children {
        bb_node(bb, child, mats, with_sub);
    }
}

fn bb_sub(bb: &mut Aabb3, sub: &CsgSub<Solid>, mats: &MatArena, with_sub: bool) {
    bb_add(bb, &sub.add, mats, with_sub);
    if with_sub {
        bb_add(bb, &sub.sub, mats, with_sub);
    }
}

fn bb_cut(bb: &mut Aabb3, cut: &[CsgAdd<Solid>], mats: &MatArena, with_sub: bool) {
    if cut.is_empty() {
        return;
    }
    if with_sub {
        for operand in cut {
            bb_add(bb, operand, mats, with_sub);
        }
        return;
    }
    let mut acc = Aabb3::full();
    for operand in cut {
        let mut bb_op = Aabb3::empty();
        bb_add(&mut bb_op, operand, mats, with_sub);
        acc.intersect(&bb_op);
        if !acc.is_valid() {
            return;
        }
    }
    bb.union(&acc);
}

fn bb_xor(bb: &mut Aabb3, xor: &CsgXor<Solid>, mats: &MatArena, with_sub: bool) {
    for operand in &xor.xor {
        bb_add(bb, operand, mats, with_sub);
    }
}

fn bb_node(bb: &mut Aabb3, node: &CsgNode<Solid>, mats: &MatArena, with_sub: bool) {
    match node {
        CsgNode::Add(a) => bb_add(bb, a, mats, with_sub),
        CsgNode::Sub(s) => bb_sub(bb, s, mats, with_sub),
        CsgNode::Cut(c) => bb_cut(bb, &c.cut, mats, with_sub),
        CsgNode::Xor(x) => bb_xor(bb, x, mats, with_sub),
        CsgNode::Leaf(Solid::Sphere(s)) => bb_sphere(bb, s, mats),
        CsgNode::Leaf(Solid::Poly(p)) => bb_poly(bb, p),
        CsgNode::Leaf(Solid::Poly2(p)) => bb_poly2(bb, p),
    }
}

fn bb_sphere(bb: &mut Aabb3, s: &SphereSolid, mats: &MatArena) {
    let m = mats.get(s.mat);
    let rows = [
        DVec3::new(m.n.matrix3.x_axis.x, m.n.matrix3.y_axis.x, m.n.matrix3.z_axis.x),
        DVec3::new(m.n.matrix3.x_axis.y, m.n.matrix3.y_axis.y, m.n.matrix3.z_axis.y),
        DVec3::new(m.n.matrix3.x_axis.z, m.n.matrix3.y_axis.z, m.n.matrix3.z_axis.z),
    ];
    let t = m.n.translation;
    for i in 0..3 {
        let c = rows[i].length();
        let lo = t[i] - c;
        let hi = t[i] + c;
        if lo < bb.min[i] {
            bb.min[i] = lo;
        }
        if hi > bb.max[i] {
            bb.max[i] = hi;
        }
    }
}

fn bb_poly(bb: &mut Aabb3, p: &Polyhedron) {
    if p.points.is_empty() || p.faces.len() < 4 {
        return;
    }
    for v in &p.points {
        bb.expand(v.coord);
    }
}

fn bb_poly2(bb: &mut Aabb3, p: &Polygon2) {
    if p.points.is_empty() || p.paths.is_empty() {
        return;
    }
    for v in &p.points {
        bb.min.x = bb.min.x.min(v.coord.x);
        bb.min.y = bb.min.y.min(v.coord.y);
        bb.max.x = bb.max.x.max(v.coord.x);
        bb.max.y = bb.max.y.max(v.coord.y);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gc::Gc;
    use crate::mat::Mat;
    use scad_ast::Span;

    #[test]
    fn empty_boxes_are_invalid_and_absorb_unions() {
        let mut a = Aabb3::empty();
        assert!(!a.is_valid());
        a.union(&Aabb3::empty());
        assert!(!a.is_valid());
        a.expand(DVec3::ONE);
        assert!(a.is_valid());
    }

    #[test]
    fn unit_sphere_bound_is_the_unit_box() {
        let mut tree = SolidTree::new(Span::synthetic());
        let mat = tree.mats.unit();
        tree.root.children.push(CsgNode::Leaf(Solid::Sphere(SphereSolid {
            mat,
            fn_: 16,
            gc: Gc::default(),
            span: Span::synthetic(),
        })));
        let bb = solid_tree_bb(&tree, true);
        assert!((bb.min - DVec3::splat(-1.0)).length() < 1e-12);
        assert!((bb.max - DVec3::splat(1.0)).length() < 1e-12);
    }

    #[test]
    fn scaled_shifted_sphere_bound_matches_closed_form() {
        let mut tree = SolidTree::new(Span::synthetic());
        let unit = tree.mats.unit();
        let m = tree
            .mats
            .compose(unit, &Mat::translation(DVec3::new(5.0, 0.0, 0.0)));
        let m = tree.mats.compose(m, &Mat::scale(DVec3::new(2.0, 3.0, 4.0)));
        tree.root.children.push(CsgNode::Leaf(Solid::Sphere(SphereSolid {
            mat: m,
            fn_: 16,
            gc: Gc::default(),
            span: Span::synthetic(),
        })));
        let bb = solid_tree_bb(&tree, true);
        assert!((bb.min - DVec3::new(3.0, -3.0, -4.0)).length() < 1e-12);
        assert!((bb.max - DVec3::new(7.0, 3.0, 4.0)).length() < 1e-12);
    }

    #[test]
    fn cut_without_subtracted_intersects_operand_boxes() {
        // two unit cubes as point clouds, offset by 0.5 in x
        let mut tree = SolidTree::new(Span::synthetic());
        let mut cut = Vec::new();
        for shift in [0.0, 0.5] {
            let mut p = Polyhedron::new(Gc::default(), Span::synthetic());
            for i in 0..8u32 {
                p.points.push(crate::poly3::Vertex3 {
                    coord: DVec3::new(
                        f64::from(i & 1) + shift,
                        f64::from((i >> 1) & 1),
                        f64::from((i >> 2) & 1),
                    ),
                    span: Span::synthetic(),
                });
            }
            // minimal face count so the leaf participates in the fold
            for _ in 0..4 {
                p.faces.push(crate::poly3::Face {
                    points: Vec::new(),
                    edges: Vec::new(),
                    span: Span::synthetic(),
                });
            }
            let mut add = CsgAdd::new(Span::synthetic());
            add.children.push(CsgNode::Leaf(Solid::Poly(p)));
            cut.push(add);
        }
        tree.root.children.push(CsgNode::Cut(crate::node::CsgCut {
            span: Span::synthetic(),
            cut,
        }));

        let bb = solid_tree_bb(&tree, false);
        assert!((bb.min.x - 0.5).abs() < 1e-12);
        assert!((bb.max.x - 1.0).abs() < 1e-12);

        let bb_max = solid_tree_bb(&tree, true);
        assert!((bb_max.min.x - 0.0).abs() < 1e-12);
        assert!((bb_max.max.x - 1.5).abs() < 1e-12);
    }
}
