//! # Transform Threading
//!
//! The transformation operators. Each composes one new matrix in the
//! arena (`current · operator`, column-vector convention) and recurses
//! with it; identities are elided. Invalid transforms report under the
//! configured severity and drop their subtree.

use super::{Lower, MatCtxt};
use csg_tree::geom::{approx_eq, approx_lt};
use csg_tree::mat::{sin_cos_deg, Mat};
use csg_tree::node::{CsgNode, Solid};
use glam::DVec3;
use scad_ast::{Fatal, Rotation, ScadNode, Span};

impl Lower<'_> {
    fn recurse_with(
        &mut self,
        no: &mut bool,
        r: &mut Vec<CsgNode<Solid>>,
        m: &MatCtxt,
        op: &Mat,
        children: &[ScadNode],
    ) -> Result<(), Fatal> {
        let mn = MatCtxt {
            mat: self.tree.mats.compose(m.mat, op),
            gc: m.gc,
        };
        self.lower_nodes(no, r, &mn, children)
    }

    pub(super) fn lower_translate(
        &mut self,
        no: &mut bool,
        r: &mut Vec<CsgNode<Solid>>,
        m: &MatCtxt,
        v: [f64; 3],
        children: &[ScadNode],
    ) -> Result<(), Fatal> {
        let v = DVec3::from_array(v);
        if approx_eq(v.length_squared(), 0.0) {
            // zero translation: skip the matrix entirely
            return self.lower_nodes(no, r, m, children);
        }
        self.recurse_with(no, r, m, &Mat::translation(v), children)
    }

    pub(super) fn lower_mirror(
        &mut self,
        no: &mut bool,
        r: &mut Vec<CsgNode<Solid>>,
        m: &MatCtxt,
        v: [f64; 3],
        children: &[ScadNode],
        span: Span,
    ) -> Result<(), Fatal> {
        let v = DVec3::from_array(v);
        if approx_eq(v.length_squared(), 0.0) {
            return Err(self
                .diags
                .fail(span, None, "mirror plane vector has length zero"));
        }
        self.recurse_with(no, r, m, &Mat::mirror(v), children)
    }

    pub(super) fn lower_scale(
        &mut self,
        no: &mut bool,
        r: &mut Vec<CsgNode<Solid>>,
        m: &MatCtxt,
        v: [f64; 3],
        children: &[ScadNode],
        span: Span,
    ) -> Result<(), Fatal> {
        let v = DVec3::from_array(v);
        if approx_eq(v.x, 0.0) || approx_eq(v.y, 0.0) || approx_eq(v.z, 0.0) {
            self.diags.report(
                self.opts.err_empty,
                span,
                None,
                format!("expected non-zero scale, but v=[{} {} {}]", v.x, v.y, v.z),
            )?;
            return Ok(());
        }
        self.recurse_with(no, r, m, &Mat::scale(v), children)
    }

    pub(super) fn lower_rotate(
        &mut self,
        no: &mut bool,
        r: &mut Vec<CsgNode<Solid>>,
        m: &MatCtxt,
        rotation: Rotation,
        children: &[ScadNode],
    ) -> Result<(), Fatal> {
        let op = match rotation {
            Rotation::AxisAngle { axis, angle } => {
                Mat::rot_axis(DVec3::from_array(axis), sin_cos_deg(angle))
            }
            Rotation::Euler([x, y, z]) => Mat::rot_z(sin_cos_deg(z))
                .mul(&Mat::rot_y(sin_cos_deg(y)))
                .mul(&Mat::rot_x(sin_cos_deg(x))),
        };
        self.recurse_with(no, r, m, &op, children)
    }

    pub(super) fn lower_multmatrix(
        &mut self,
        no: &mut bool,
        r: &mut Vec<CsgNode<Solid>>,
        m: &MatCtxt,
        rows: [[f64; 4]; 3],
        children: &[ScadNode],
        span: Span,
    ) -> Result<(), Fatal> {
        let Some(op) = Mat::from_rows(rows) else {
            self.diags
                .report(self.opts.err_collapse, span, None, "non-invertible matrix")?;
            return Ok(());
        };
        self.recurse_with(no, r, m, &op, children)
    }

    pub(super) fn lower_color(
        &mut self,
        no: &mut bool,
        r: &mut Vec<CsgNode<Solid>>,
        m: &MatCtxt,
        rgba: [u8; 4],
        rgb_valid: bool,
        children: &[ScadNode],
    ) -> Result<(), Fatal> {
        let mn = MatCtxt {
            mat: m.mat,
            gc: m.gc.with_color(rgba, rgb_valid),
        };
        self.lower_nodes(no, r, &mn, children)
    }

    /// Negative scale components of an extrusion clamp to zero with a
    /// diagnostic; used before the cone test and the per-ring lerp.
    pub(super) fn clamp_extrude_scale(
        &mut self,
        scale: [f64; 2],
        span: Span,
    ) -> Result<[f64; 2], Fatal> {
        let mut s = scale;
        if approx_lt(s[0], 0.0) || approx_lt(s[1], 0.0) {
            self.diags.report(
                self.opts.err_empty,
                span,
                None,
                format!("scale is negative: scale=[{} {}]", s[0], s[1]),
            )?;
        }
        if approx_lt(s[0], 0.0) {
            s[0] = 0.0;
        }
        if approx_lt(s[1], 0.0) {
            s[1] = 0.0;
        }
        Ok(s)
    }
}
