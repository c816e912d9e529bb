//! # Linear Extrusion
//!
//! Lowers the child subtree in 2D context under an identity transform,
//! flattens the result to one canonical polygon with the plane-sweep
//! union, and lays each path down as a tower of `slices + 1` rings (or
//! `slices` rings plus an apex when the top scale collapses). Twist picks
//! the side-split diagonal so the triangles follow the rotation.
//!
//! Multi-path flattenings wrap their towers in a XOR node: interior holes
//! are modeled by path parity.

use super::{Dim, Lower, MatCtxt};
use crate::tower::{faces_from_tower, TriSide};
use csg_tree::geom::{approx_eq, approx_le};
use csg_tree::mat::{sin_cos_deg, Mat};
use csg_tree::node::{CsgNode, Solid};
use csg_tree::poly3::{Polyhedron, Vertex3};
use glam::{DMat2, DVec2, DVec3};
use scad_ast::{Fatal, ScadNode, Span};

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

impl Lower<'_> {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn lower_linext(
        &mut self,
        no: &mut bool,
        r: &mut Vec<CsgNode<Solid>>,
        m: &MatCtxt,
        height: f64,
        center: bool,
        slices: u32,
        twist: f64,
        scale: [f64; 2],
        children: &[ScadNode],
        span: Span,
    ) -> Result<(), Fatal> {
        if self.dim != Dim::Three {
            self.diags.report(
                self.opts.err_outside_3d,
                span,
                None,
                "'linear_extrude' found outside 3D context",
            )?;
            return Ok(());
        }
        *no = true;

        if approx_le(height, 0.0) {
            self.diags.report(
                self.opts.err_empty,
                span,
                None,
                format!("expected non-empty linear_extrude, but height={height}"),
            )?;
            return Ok(());
        }
        if slices < 1 {
            self.diags.report(
                self.opts.err_empty,
                span,
                None,
                format!("expected non-empty linear_extrude, but slices={slices}"),
            )?;
            return Ok(());
        }

        let scale = self.clamp_extrude_scale(scale, span)?;

        // A single zero scale axis would force the side faces to change
        // topology mid-extrusion; not supported.
        if approx_eq(scale[0], 0.0) != approx_eq(scale[1], 0.0) {
            return Err(self.diags.fail(
                span,
                None,
                format!(
                    "not implemented: only one scale coordinate is 0: scale=[{} {}]",
                    scale[0], scale[1]
                ),
            ));
        }

        // the extrusion body is built in z in [0,1]; the matrix carries
        // height and centering
        let mut mat = m.mat;
        if !approx_eq(height, 1.0) {
            mat = self
                .tree
                .mats
                .compose(mat, &Mat::scale(DVec3::new(1.0, 1.0, height)));
        }
        if center {
            mat = self
                .tree
                .mats
                .compose(mat, &Mat::translation(DVec3::new(0.0, 0.0, -0.5)));
        }

        // lower the children in 2D space under a fresh matrix
        let saved_dim = self.dim;
        self.dim = Dim::Two;
        let mut flat_nodes: Vec<CsgNode<Solid>> = Vec::new();
        let mn = MatCtxt {
            mat: self.tree.mats.unit(),
            gc: m.gc,
        };
        let result = self.lower_nodes(no, &mut flat_nodes, &mn, children);
        self.dim = saved_dim;
        result?;

        let flat = poly_bool::flatten(&flat_nodes);
        if flat.paths.is_empty() {
            return Ok(());
        }

        let is_cone = approx_eq(scale[0], 0.0);
        let zcnt = if is_cone {
            slices as usize
        } else {
            slices as usize + 1
        };
        let tri = if approx_eq(twist, 0.0) {
            TriSide::None
        } else if twist > 0.0 {
            TriSide::Right
        } else {
            TriSide::Left
        };

        let mval = *self.tree.mats.get(mat);
        let mut bodies: Vec<CsgNode<Solid>> = Vec::with_capacity(flat.paths.len());

        for path in &flat.paths {
            let pcnt = path.point_idx.len();
            let mut o = Polyhedron::new(m.gc, span);
            o.points.reserve(zcnt * pcnt + usize::from(is_cone));

            for k in 0..zcnt {
                let z = k as f64 / f64::from(slices);
                let (s, c) = sin_cos_deg(z * -twist);
                let rot = DMat2::from_cols(DVec2::new(c, s), DVec2::new(-s, c));
                let sc = DMat2::from_diagonal(DVec2::new(
                    lerp(1.0, scale[0], z),
                    lerp(1.0, scale[1], z),
                ));
                let mk = sc * rot;
                for &idx in &path.point_idx {
                    let v = &flat.points[idx];
                    let xy = mk * v.coord;
                    o.points.push(Vertex3 {
                        coord: DVec3::new(xy.x, xy.y, z),
                        span: v.span,
                    });
                }
            }
            if is_cone {
                o.points.push(Vertex3 {
                    coord: DVec3::new(0.0, 0.0, 1.0),
                    span,
                });
            }

            // paths are clockwise, so the bottom ring needs the reversal
            if faces_from_tower(
                &mut o,
                self.diags,
                &mval,
                span,
                pcnt,
                slices as usize + 1,
                true,
                tri,
                true,
            )
            .is_err()
            {
                return Err(self.diags.internal(
                    span,
                    "'linear_extrude' polyhedron construction algorithm is broken",
                ));
            }
            bodies.push(CsgNode::Leaf(Solid::Poly(o)));
        }

        Self::push_xor_wrapped(r, bodies, span);
        Ok(())
    }
}
