//! # 3D Primitive Constructors
//!
//! Sphere, cube, cylinder/cone and polyhedron. The circular shapes
//! normalize themselves into the transform (unit radius, unit height,
//! z in [0,1]) so the point construction is always the canonical one and
//! the matrix carries the rest.

use super::{effective_fn, Dim, Lower, MatCtxt};
use crate::edges::make_edges;
use crate::tower::{faces_from_tower, TriSide};
use crate::triangulate::triangulate;
use csg_tree::geom::{approx_eq, approx_le, right_cross_z, right_normal_z};
use csg_tree::mat::{sin_cos_deg, Mat};
use csg_tree::node::{CsgNode, Solid, SphereSolid};
use csg_tree::poly3::{Face, PointId, PointRef, Polyhedron, Vertex3};
use glam::{DVec2, DVec3};
use scad_ast::{Fatal, ScadPoint3, Span};

impl Lower<'_> {
    pub(super) fn lower_sphere(
        &mut self,
        no: &mut bool,
        r: &mut Vec<CsgNode<Solid>>,
        m: &MatCtxt,
        radius: f64,
        fn_: u32,
        span: Span,
    ) -> Result<(), Fatal> {
        if self.dim != Dim::Three {
            self.diags.report(
                self.opts.err_outside_3d,
                span,
                None,
                "'sphere' found outside 3D context",
            )?;
            return Ok(());
        }
        *no = true;

        if approx_le(radius, 0.0) {
            self.diags.report(
                self.opts.err_empty,
                span,
                None,
                format!("expected non-empty sphere, found r={radius}"),
            )?;
            return Ok(());
        }

        let mut mat = m.mat;
        if !approx_eq(radius, 1.0) {
            mat = self.tree.mats.compose(mat, &Mat::scale_uniform(radius));
        }

        let fn_eff = effective_fn(self.opts, fn_, true);
        if fn_eff == 0 {
            // stays analytic; the slicer polygonizes per layer
            r.push(CsgNode::Leaf(Solid::Sphere(SphereSolid {
                mat,
                fn_: self.opts.max_fn,
                gc: m.gc,
                span,
            })));
            return Ok(());
        }

        let fn_eff = fn_eff as usize;
        let fnz = (fn_eff + 1) >> 1;
        let mut o = Polyhedron::new(m.gc, span);

        // rings at polar angles (2i+1) * 90 / fnz, apex up
        let fnza = 180.0 / (fnz as f64 * 2.0);
        for i in 0..fnz {
            let w = (1 + 2 * i) as f64 * fnza;
            let (ring_r, z) = sin_cos_deg(w);
            for j in 0..fn_eff {
                let (s, c) = sin_cos_deg(j as f64 * 360.0 / fn_eff as f64);
                o.points.push(Vertex3 {
                    coord: DVec3::new(ring_r * c, ring_r * s, z),
                    span,
                });
            }
        }

        // polar parameterization puts the apex ring first, hence rev
        let mval = *self.tree.mats.get(mat);
        if faces_from_tower(
            &mut o,
            self.diags,
            &mval,
            span,
            fn_eff,
            fnz,
            true,
            TriSide::None,
            false,
        )
        .is_err()
        {
            return Err(self
                .diags
                .internal(span, "'sphere' polyhedron construction algorithm is broken"));
        }
        r.push(CsgNode::Leaf(Solid::Poly(o)));
        Ok(())
    }

    pub(super) fn lower_cube(
        &mut self,
        no: &mut bool,
        r: &mut Vec<CsgNode<Solid>>,
        m: &MatCtxt,
        size: [f64; 3],
        center: bool,
        span: Span,
    ) -> Result<(), Fatal> {
        if self.dim != Dim::Three {
            self.diags.report(
                self.opts.err_outside_3d,
                span,
                None,
                "'cube' found outside 3D context",
            )?;
            return Ok(());
        }
        *no = true;

        let size = DVec3::from_array(size);
        if approx_eq(size.x, 0.0) || approx_eq(size.y, 0.0) || approx_eq(size.z, 0.0) {
            self.diags.report(
                self.opts.err_empty,
                span,
                None,
                format!(
                    "expected non-empty cube, but size=[{} {} {}]",
                    size.x, size.y, size.z
                ),
            )?;
            return Ok(());
        }

        let mut mat = m.mat;
        if !approx_eq(size.x, 1.0) || !approx_eq(size.y, 1.0) || !approx_eq(size.z, 1.0) {
            mat = self.tree.mats.compose(mat, &Mat::scale(size));
        }
        if center {
            mat = self
                .tree
                .mats
                .compose(mat, &Mat::translation(DVec3::splat(-0.5)));
        }

        let mut o = Polyhedron::new(m.gc, span);
        o.is_rect_rot = self.tree.mats.get(mat).is_rect_rot();

        //   1----0
        //  /|   /|
        // 2----3 |
        // | 5--|-4
        // |/   |/
        // 6----7
        for i in 0..8u32 {
            let x = f64::from(u8::from(((i & 1) != 0) ^ ((i & 2) != 0)));
            let y = f64::from((i >> 1) & 1);
            let z = f64::from((i >> 2) & 1);
            o.points.push(Vertex3 {
                coord: DVec3::new(x, y, z),
                span,
            });
        }

        let mval = *self.tree.mats.get(mat);
        if faces_from_tower(
            &mut o,
            self.diags,
            &mval,
            span,
            4,
            2,
            false,
            TriSide::None,
            false,
        )
        .is_err()
        {
            return Err(self
                .diags
                .internal(span, "'cube' polyhedron construction algorithm is broken"));
        }
        r.push(CsgNode::Leaf(Solid::Poly(o)));
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub(super) fn lower_cylinder(
        &mut self,
        no: &mut bool,
        r: &mut Vec<CsgNode<Solid>>,
        m: &MatCtxt,
        h: f64,
        r1: f64,
        r2: f64,
        center: bool,
        fn_: u32,
        span: Span,
    ) -> Result<(), Fatal> {
        if self.dim != Dim::Three {
            self.diags.report(
                self.opts.err_outside_3d,
                span,
                None,
                "'cylinder' found outside 3D context",
            )?;
            return Ok(());
        }
        *no = true;

        let (mut r1, mut r2) = (r1, r2);
        if approx_le(h, 0.0) {
            self.diags.report(
                self.opts.err_empty,
                span,
                None,
                format!("expected non-empty cylinder, but h={h}"),
            )?;
            return Ok(());
        }
        if approx_le(r1, 0.0) && approx_le(r2, 0.0) {
            self.diags.report(
                self.opts.err_empty,
                span,
                None,
                format!("expected non-empty cylinder, but r1={r1}, r2={r2}"),
            )?;
            return Ok(());
        }

        // normalize: unit height, base at z=0 when not centered, larger
        // radius at the bottom, radius 1
        let mut mat = m.mat;
        if !approx_eq(h, 1.0) {
            mat = self
                .tree
                .mats
                .compose(mat, &Mat::scale(DVec3::new(1.0, 1.0, h)));
        }
        if !center {
            mat = self
                .tree
                .mats
                .compose(mat, &Mat::translation(DVec3::new(0.0, 0.0, 0.5)));
        }
        if r1 < r2 {
            mat = self
                .tree
                .mats
                .compose(mat, &Mat::scale(DVec3::new(1.0, 1.0, -1.0)));
            std::mem::swap(&mut r1, &mut r2);
        }
        if !approx_eq(r1, 1.0) {
            mat = self
                .tree
                .mats
                .compose(mat, &Mat::scale(DVec3::new(r1, r1, 1.0)));
            r2 /= r1;
        }

        let fn_eff = effective_fn(self.opts, fn_, false) as usize;
        let mut o = Polyhedron::new(m.gc, span);

        if approx_eq(r2, 0.0) {
            // cone: base ring plus apex
            for j in 0..fn_eff {
                let (s, c) = sin_cos_deg(j as f64 * 360.0 / fn_eff as f64);
                o.points.push(Vertex3 {
                    coord: DVec3::new(c, s, -0.5),
                    span,
                });
            }
            o.points.push(Vertex3 {
                coord: DVec3::new(0.0, 0.0, 0.5),
                span,
            });
        } else {
            for j in 0..fn_eff {
                let (s, c) = sin_cos_deg(j as f64 * 360.0 / fn_eff as f64);
                o.points.push(Vertex3 {
                    coord: DVec3::new(c, s, -0.5),
                    span,
                });
            }
            for j in 0..fn_eff {
                let (s, c) = sin_cos_deg(j as f64 * 360.0 / fn_eff as f64);
                o.points.push(Vertex3 {
                    coord: DVec3::new(c * r2, s * r2, 0.5),
                    span,
                });
            }
        }

        let mval = *self.tree.mats.get(mat);
        if faces_from_tower(
            &mut o,
            self.diags,
            &mval,
            span,
            fn_eff,
            2,
            false,
            TriSide::None,
            false,
        )
        .is_err()
        {
            return Err(self
                .diags
                .internal(span, "'cylinder' polyhedron construction algorithm is broken"));
        }
        r.push(CsgNode::Leaf(Solid::Poly(o)));
        Ok(())
    }

    pub(super) fn lower_polyhedron(
        &mut self,
        no: &mut bool,
        r: &mut Vec<CsgNode<Solid>>,
        m: &MatCtxt,
        points: &[ScadPoint3],
        faces: &[Vec<usize>],
        span: Span,
    ) -> Result<(), Fatal> {
        if self.dim != Dim::Three {
            self.diags.report(
                self.opts.err_outside_3d,
                span,
                None,
                "'polyhedron' found outside 3D context",
            )?;
            return Ok(());
        }
        *no = true;

        if points.len() < 4 {
            self.diags.report(
                self.opts.err_empty,
                span,
                None,
                format!(
                    "polyhedron needs at least 4 points, but found only {}",
                    points.len()
                ),
            )?;
            return Ok(());
        }
        if faces.len() < 4 {
            self.diags.report(
                self.opts.err_empty,
                span,
                None,
                format!(
                    "polyhedron needs at least 4 faces, but found only {}",
                    faces.len()
                ),
            )?;
            return Ok(());
        }

        // duplicate points are always fatal
        let mut sorted: Vec<&ScadPoint3> = points.iter().collect();
        sorted.sort_by(|a, b| {
            a.coord
                .partial_cmp(&b.coord)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for w in sorted.windows(2) {
            let (a, b) = (w[0], w[1]);
            if approx_eq(a.coord[0], b.coord[0])
                && approx_eq(a.coord[1], b.coord[1])
                && approx_eq(a.coord[2], b.coord[2])
            {
                return Err(self.diags.fail(
                    a.span,
                    Some(b.span),
                    "duplicate point in polyhedron",
                ));
            }
        }

        let mut o = Polyhedron::new(m.gc, span);
        for p in points {
            o.points.push(Vertex3 {
                coord: DVec3::from_array(p.coord),
                span: p.span,
            });
        }

        let rev = self.tree.mats.get(m.mat).det < 0.0;
        for face in faces {
            self.polyhedron_face(&mut o, points, face, rev, span)?;
        }

        // in-place transform, then validate
        let mval = *self.tree.mats.get(m.mat);
        for v in &mut o.points {
            v.coord = mval.apply(v.coord);
        }
        make_edges(&mut o, self.diags)?;
        r.push(CsgNode::Leaf(Solid::Poly(o)));
        Ok(())
    }

    /// Add one polyhedron face, triangulating it when the planar
    /// projections show both concave and convex turns.
    fn polyhedron_face(
        &mut self,
        o: &mut Polyhedron,
        points: &[ScadPoint3],
        face: &[usize],
        rev: bool,
        span: Span,
    ) -> Result<(), Fatal> {
        let n = face.len();
        if n < 3 {
            return Err(self.diags.fail(span, None, "face with fewer than 3 points"));
        }
        let xy = |i: usize| {
            let c = points[face[i]].coord;
            DVec2::new(c[0], c[1])
        };
        let yz = |i: usize| {
            let c = points[face[i]].coord;
            DVec2::new(c[1], c[2])
        };

        // 0 = no triangulation, 1 = project to XY, 2 = project to YZ
        let mut need_tri = 0u32;
        let mut orient = 0u32;
        for i in 0..n {
            let j = (i + 1) % n;
            let k = (j + 1) % n;
            orient |= 0x01 << (1 + right_normal_z(xy(i), xy(j), xy(k)));
            orient |= 0x10 << (1 + right_normal_z(yz(i), yz(j), yz(k)));
            if (orient & 0x05) == 0x05 || (orient & 0x50) == 0x50 {
                // both turn directions: project onto the plane with the
                // larger normal component
                let pi = DVec3::from_array(points[face[i]].coord);
                let pj = DVec3::from_array(points[face[j]].coord);
                let pk = DVec3::from_array(points[face[k]].coord);
                let dir = (pj - pi).cross(pk - pj);
                need_tri = if dir.z.abs() > dir.x.abs() { 1 } else { 2 };
                break;
            }
        }

        if need_tri != 0 {
            let proj: Vec<DVec2> = (0..n)
                .map(|i| if need_tri == 2 { yz(i) } else { xy(i) })
                .collect();
            let tri = triangulate(&proj, span, self.diags)?;

            // orientation in the projection plane decides the flip
            let mut sum = 0.0;
            for i in 0..n {
                sum += right_cross_z(proj[i], proj[(i + 1) % n], proj[(i + 2) % n]);
            }
            let rev2 = sum < 0.0;

            for t in &tri {
                let refs = t
                    .iter()
                    .map(|&k| {
                        let idx = face[k];
                        PointRef {
                            point: PointId(idx as u32),
                            span: points[idx].span,
                        }
                    })
                    .collect();
                o.faces.push(Face::from_refs(refs, rev ^ rev2, span));
            }
        } else {
            let refs = face
                .iter()
                .map(|&idx| PointRef {
                    point: PointId(idx as u32),
                    span: points[idx].span,
                })
                .collect();
            o.faces.push(Face::from_refs(refs, rev, span));
        }
        Ok(())
    }
}
