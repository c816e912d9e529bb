//! # 2D Primitive Constructors
//!
//! Circle, square and polygon. 2D points pass through the full 3D
//! transform with z=0 and keep the xy of the result; every path is
//! canonicalized to clockwise.

use super::{effective_fn, Dim, Lower, MatCtxt};
use csg_tree::geom::approx_eq;
use csg_tree::mat::{sin_cos_deg, Mat};
use csg_tree::node::{CsgNode, Solid};
use csg_tree::poly2::{Path2, Polygon2, Vertex2};
use glam::{DVec2, DVec3};
use scad_ast::{Fatal, ScadPoint2, Span};

impl Lower<'_> {
    /// Transform the polygon's points in place and stamp the context
    /// color.
    fn xform_2d(&self, m: &MatCtxt, o: &mut Polygon2) {
        let mat = self.tree.mats.get(m.mat);
        for v in &mut o.points {
            let p = mat.apply(DVec3::new(v.coord.x, v.coord.y, 0.0));
            v.coord = DVec2::new(p.x, p.y);
            v.color = m.gc.color;
        }
    }

    pub(super) fn lower_circle(
        &mut self,
        no: &mut bool,
        r: &mut Vec<CsgNode<Solid>>,
        m: &MatCtxt,
        radius: f64,
        fn_: u32,
        span: Span,
    ) -> Result<(), Fatal> {
        if self.dim != Dim::Two {
            self.diags.report(
                self.opts.err_outside_2d,
                span,
                None,
                "'circle' found outside 2D context",
            )?;
            return Ok(());
        }
        *no = true;

        if approx_eq(radius, 0.0) {
            self.diags.report(
                self.opts.err_empty,
                span,
                None,
                format!("expected non-empty circle, but r={radius}"),
            )?;
            return Ok(());
        }

        let mut mat = m.mat;
        if !approx_eq(radius, 1.0) {
            mat = self
                .tree
                .mats
                .compose(mat, &Mat::scale(DVec3::new(radius, radius, 1.0)));
        }

        let fn_eff = effective_fn(self.opts, fn_, false) as usize;
        let mut o = Polygon2::new();
        let step = 360.0 / fn_eff as f64;
        for i in 0..fn_eff {
            let (s, c) = sin_cos_deg(i as f64 * step);
            // negative y for clockwise winding
            o.points.push(Vertex2 {
                coord: DVec2::new(c, -s),
                color: m.gc.color,
                span,
            });
        }
        o.paths.push(Path2 {
            point_idx: (0..fn_eff).collect(),
        });

        let mn = MatCtxt { mat, gc: m.gc };
        self.xform_2d(&mn, &mut o);
        let rev = o.make_clockwise();
        debug_assert!(!rev);

        r.push(CsgNode::Leaf(Solid::Poly2(o)));
        Ok(())
    }

    pub(super) fn lower_square(
        &mut self,
        no: &mut bool,
        r: &mut Vec<CsgNode<Solid>>,
        m: &MatCtxt,
        size: [f64; 2],
        center: bool,
        span: Span,
    ) -> Result<(), Fatal> {
        if self.dim != Dim::Two {
            self.diags.report(
                self.opts.err_outside_2d,
                span,
                None,
                "'square' found outside 2D context",
            )?;
            return Ok(());
        }
        *no = true;

        if approx_eq(size[0], 0.0) || approx_eq(size[1], 0.0) {
            self.diags.report(
                self.opts.err_empty,
                span,
                None,
                format!("expected non-empty square, but size=[{} {}]", size[0], size[1]),
            )?;
            return Ok(());
        }

        let mut mat = m.mat;
        if !approx_eq(size[0], 1.0) || !approx_eq(size[1], 1.0) {
            mat = self
                .tree
                .mats
                .compose(mat, &Mat::scale(DVec3::new(size[0], size[1], 1.0)));
        }
        if center {
            mat = self
                .tree
                .mats
                .compose(mat, &Mat::translation(DVec3::new(-0.5, -0.5, 0.0)));
        }

        let mut o = Polygon2::new();
        for i in 0..4u32 {
            o.points.push(Vertex2 {
                coord: DVec2::new(f64::from(i & 1), f64::from((i >> 1) & 1)),
                color: m.gc.color,
                span,
            });
        }
        o.paths.push(Path2 {
            point_idx: vec![0, 2, 3, 1],
        });

        let mn = MatCtxt { mat, gc: m.gc };
        self.xform_2d(&mn, &mut o);
        let rev = o.make_clockwise();
        debug_assert!(!rev);

        r.push(CsgNode::Leaf(Solid::Poly2(o)));
        Ok(())
    }

    pub(super) fn lower_polygon(
        &mut self,
        no: &mut bool,
        r: &mut Vec<CsgNode<Solid>>,
        m: &MatCtxt,
        points: &[ScadPoint2],
        paths: &[Vec<usize>],
        span: Span,
    ) -> Result<(), Fatal> {
        if self.dim != Dim::Two {
            self.diags.report(
                self.opts.err_outside_2d,
                span,
                None,
                "'polygon' found outside 2D context",
            )?;
            return Ok(());
        }
        *no = true;

        if points.len() < 3 {
            self.diags.report(
                self.opts.err_empty,
                span,
                None,
                format!(
                    "polygon needs at least 3 points, but found only {}",
                    points.len()
                ),
            )?;
            return Ok(());
        }

        // duplicate points are always fatal
        let mut sorted: Vec<&ScadPoint2> = points.iter().collect();
        sorted.sort_by(|a, b| {
            a.coord
                .partial_cmp(&b.coord)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for w in sorted.windows(2) {
            let (a, b) = (w[0], w[1]);
            if approx_eq(a.coord[0], b.coord[0]) && approx_eq(a.coord[1], b.coord[1]) {
                return Err(self
                    .diags
                    .fail(a.span, Some(b.span), "duplicate point in polygon"));
            }
        }

        let mut o = Polygon2::new();
        for p in points {
            o.points.push(Vertex2 {
                coord: DVec2::from_array(p.coord),
                color: m.gc.color,
                span: p.span,
            });
        }

        // an empty path list means one implicit path over all points
        if paths.is_empty() {
            o.paths.push(Path2 {
                point_idx: (0..points.len()).collect(),
            });
        } else {
            for path in paths {
                o.paths.push(Path2 {
                    point_idx: path.clone(),
                });
            }
        }

        self.xform_2d(m, &mut o);
        o.make_clockwise();

        r.push(CsgNode::Leaf(Solid::Poly2(o)));
        Ok(())
    }
}
