//! End-to-end lowering tests: SCAD nodes in, validated CSG solids out.

use csg_tree::node::{CsgNode, Solid, SolidTree};
use csg_tree::poly3::Polyhedron;
use csg_tree::solid_tree_bb;
use glam::DVec3;
use scad_ast::{
    Diagnostics, Modifier, Options, Rotation, ScadKind, ScadNode, ScadPoint2, ScadPoint3,
    Severity, Span,
};
use scad_csg::lower_tree;

fn node(kind: ScadKind) -> ScadNode {
    ScadNode::new(kind, Span::new(0, 4))
}

fn cube(size: [f64; 3], center: bool) -> ScadNode {
    node(ScadKind::Cube { size, center })
}

fn sphere(r: f64, fn_: u32) -> ScadNode {
    node(ScadKind::Sphere { r, fn_ })
}

fn difference(children: Vec<ScadNode>) -> ScadNode {
    node(ScadKind::Difference { children })
}

fn lower_ok(nodes: &[ScadNode]) -> SolidTree {
    let opts = Options::default();
    let mut diags = Diagnostics::new();
    lower_tree(&opts, &mut diags, nodes).expect("lowering succeeds")
}

fn only_poly(tree: &SolidTree) -> &Polyhedron {
    assert_eq!(tree.root.children.len(), 1);
    match &tree.root.children[0] {
        CsgNode::Leaf(Solid::Poly(p)) => p,
        other => panic!("expected polyhedron leaf, got {other:?}"),
    }
}

fn assert_manifold(p: &Polyhedron) {
    assert!(!p.edges.is_empty());
    for e in &p.edges {
        assert!(e.fore.is_some(), "edge without fore face");
        assert!(e.back.is_some(), "edge without back face");
        assert!(e.src.point < e.dst.point);
    }
    for f in &p.faces {
        assert!(f.points.len() >= 3);
        assert_eq!(f.points.len(), f.edges.len());
    }
    // no two points share coordinates
    for (i, a) in p.points.iter().enumerate() {
        for b in &p.points[i + 1..] {
            assert!(
                (a.coord - b.coord).length() > 1e-9,
                "duplicate point {:?}",
                a.coord
            );
        }
    }
}

// =============================================================================
// CUBE
// =============================================================================

#[test]
fn unit_cube_lowered() {
    let tree = lower_ok(&[cube([1.0, 1.0, 1.0], false)]);
    let p = only_poly(&tree);
    assert_eq!(p.points.len(), 8);
    assert_eq!(p.faces.len(), 6);
    assert_eq!(p.edges.len(), 12);
    assert_manifold(p);
    assert!(p.is_rect_rot);

    let bb = solid_tree_bb(&tree, true);
    assert!((bb.min - DVec3::ZERO).length() < 1e-12);
    assert!((bb.max - DVec3::ONE).length() < 1e-12);
}

#[test]
fn centered_cube_bounds() {
    let tree = lower_ok(&[cube([2.0, 2.0, 2.0], true)]);
    let bb = solid_tree_bb(&tree, true);
    assert!((bb.min - DVec3::splat(-1.0)).length() < 1e-12);
    assert!((bb.max - DVec3::splat(1.0)).length() < 1e-12);
}

#[test]
fn zero_size_cube_is_empty_geometry() {
    let opts = Options::default();
    let mut diags = Diagnostics::new();
    let r = lower_tree(&opts, &mut diags, &[cube([0.0, 1.0, 1.0], false)]);
    assert!(r.is_err());
    assert!(diags.has_fatal());
}

// =============================================================================
// SPHERE
// =============================================================================

#[test]
fn faceted_sphere_is_a_tower() {
    let tree = lower_ok(&[sphere(1.0, 4)]);
    let p = only_poly(&tree);
    // fn=4, fnz=2: two rings of four points
    assert_eq!(p.points.len(), 8);
    assert_eq!(p.faces.len(), 6);
    assert_eq!(p.edges.len(), 12);
    assert_manifold(p);
}

#[test]
fn default_sphere_stays_analytic() {
    let tree = lower_ok(&[sphere(2.0, 0)]);
    match &tree.root.children[0] {
        CsgNode::Leaf(Solid::Sphere(s)) => {
            assert_eq!(s.fn_, Options::default().max_fn);
        }
        other => panic!("expected analytic sphere, got {other:?}"),
    }
    let bb = solid_tree_bb(&tree, true);
    assert!((bb.min - DVec3::splat(-2.0)).length() < 1e-9);
    assert!((bb.max - DVec3::splat(2.0)).length() < 1e-9);
}

#[test]
fn transformed_sphere_bound_is_tight() {
    let tree = lower_ok(&[node(ScadKind::Translate {
        v: [5.0, 0.0, 0.0],
        children: vec![sphere(2.0, 0)],
    })]);
    let bb = solid_tree_bb(&tree, true);
    assert!((bb.min - DVec3::new(3.0, -2.0, -2.0)).length() < 1e-9);
    assert!((bb.max - DVec3::new(7.0, 2.0, 2.0)).length() < 1e-9);
}

#[test]
fn bigger_sphere_all_points_on_radius() {
    let tree = lower_ok(&[sphere(3.0, 12)]);
    let p = only_poly(&tree);
    assert_eq!(p.points.len(), 12 * 6);
    assert_manifold(p);
    for v in &p.points {
        assert!((v.coord.length() - 3.0).abs() < 1e-9);
    }
}

// =============================================================================
// CYLINDER
// =============================================================================

#[test]
fn cylinder_lowered_and_paired() {
    let tree = lower_ok(&[node(ScadKind::Cylinder {
        h: 2.0,
        r1: 1.0,
        r2: 1.0,
        center: false,
        fn_: 8,
    })]);
    let p = only_poly(&tree);
    assert_eq!(p.points.len(), 16);
    assert_manifold(p);
    let bb = solid_tree_bb(&tree, true);
    assert!(bb.min.z.abs() < 1e-9);
    assert!((bb.max.z - 2.0).abs() < 1e-9);
}

#[test]
fn cone_collapses_to_apex() {
    let tree = lower_ok(&[node(ScadKind::Cylinder {
        h: 1.0,
        r1: 1.0,
        r2: 0.0,
        center: true,
        fn_: 6,
    })]);
    let p = only_poly(&tree);
    assert_eq!(p.points.len(), 7);
    // base + 6 roof triangles
    assert_eq!(p.faces.len(), 7);
    assert_manifold(p);
}

#[test]
fn upside_down_cone_flips_z() {
    // r1 < r2: normalized by flipping z, apex at the bottom
    let tree = lower_ok(&[node(ScadKind::Cylinder {
        h: 1.0,
        r1: 0.0,
        r2: 1.0,
        center: true,
        fn_: 6,
    })]);
    let p = only_poly(&tree);
    assert_manifold(p);
    let apex = p
        .points
        .iter()
        .find(|v| v.coord.truncate().length() < 1e-9)
        .expect("apex point");
    assert!((apex.coord.z + 0.5).abs() < 1e-9);
}

// =============================================================================
// BOOLEAN TREES
// =============================================================================

#[test]
fn difference_builds_sub_tree() {
    let tree = lower_ok(&[difference(vec![
        cube([2.0, 2.0, 2.0], true),
        sphere(1.2, 16),
    ])]);
    assert_eq!(tree.root.children.len(), 1);
    let CsgNode::Sub(sub) = &tree.root.children[0] else {
        panic!("expected SUB node");
    };
    assert_eq!(sub.add.children.len(), 1);
    assert_eq!(sub.sub.children.len(), 1);
    for side in [&sub.add.children[0], &sub.sub.children[0]] {
        match side {
            CsgNode::Leaf(Solid::Poly(p)) => assert_manifold(p),
            other => panic!("expected polyhedron, got {other:?}"),
        }
    }
}

#[test]
fn nested_difference_absorbs_extra_negatives() {
    // a - (b - c) - d lowers to one SUB whose negative side holds both
    let inner = difference(vec![
        cube([1.0, 1.0, 1.0], false),
        cube([0.5, 0.5, 0.5], false),
    ]);
    let tree = lower_ok(&[difference(vec![
        difference(vec![inner, cube([0.25, 0.25, 0.25], false)]),
        cube([0.1, 0.1, 0.1], false),
    ])]);
    assert_eq!(tree.root.children.len(), 1);
    let CsgNode::Sub(sub) = &tree.root.children[0] else {
        panic!("expected SUB node");
    };
    // negative side: the inner difference's negative, plus the two
    // absorbed subtrahends
    assert_eq!(sub.sub.children.len(), 3);
}

#[test]
fn difference_with_empty_negative_is_bare() {
    let tree = lower_ok(&[difference(vec![cube([1.0, 1.0, 1.0], false)])]);
    assert!(matches!(
        tree.root.children[0],
        CsgNode::Leaf(Solid::Poly(_))
    ));
}

#[test]
fn intersection_builds_cut_tree() {
    let tree = lower_ok(&[node(ScadKind::Intersection {
        children: vec![cube([1.0, 1.0, 1.0], false), cube([1.0, 1.0, 1.0], true)],
    })]);
    let CsgNode::Cut(cut) = &tree.root.children[0] else {
        panic!("expected CUT node");
    };
    assert_eq!(cut.cut.len(), 2);
}

#[test]
fn single_operand_intersection_collapses() {
    let tree = lower_ok(&[node(ScadKind::Intersection {
        children: vec![cube([1.0, 1.0, 1.0], false)],
    })]);
    assert!(matches!(
        tree.root.children[0],
        CsgNode::Leaf(Solid::Poly(_))
    ));
}

#[test]
fn cut_bound_intersects_operands() {
    let tree = lower_ok(&[node(ScadKind::Intersection {
        children: vec![
            cube([2.0, 2.0, 2.0], false),
            node(ScadKind::Translate {
                v: [1.0, 0.0, 0.0],
                children: vec![cube([2.0, 2.0, 2.0], false)],
            }),
        ],
    })]);
    let bb = solid_tree_bb(&tree, false);
    assert!((bb.min.x - 1.0).abs() < 1e-9);
    assert!((bb.max.x - 2.0).abs() < 1e-9);
    let bb_all = solid_tree_bb(&tree, true);
    assert!((bb_all.min.x - 0.0).abs() < 1e-9);
    assert!((bb_all.max.x - 3.0).abs() < 1e-9);
}

#[test]
fn ignored_subtree_vanishes() {
    let mut n = cube([1.0, 1.0, 1.0], false);
    n.modifier = Modifier::IGNORE;
    let tree = lower_ok(&[n]);
    assert!(tree.root.children.is_empty());
}

#[test]
fn modifier_flags_reach_the_leaf() {
    let mut n = cube([1.0, 1.0, 1.0], false);
    n.modifier = Modifier::HIGHLIGHT;
    let tree = lower_ok(&[n]);
    let p = only_poly(&tree);
    assert!(p.gc.modifier.contains(Modifier::HIGHLIGHT));
}

// =============================================================================
// TRANSFORMS
// =============================================================================

#[test]
fn mirror_reverses_face_windings() {
    let plain = lower_ok(&[cube([1.0, 1.0, 1.0], false)]);
    let mirrored = lower_ok(&[node(ScadKind::Mirror {
        v: [1.0, 0.0, 0.0],
        children: vec![cube([1.0, 1.0, 1.0], false)],
    })]);
    let a = only_poly(&plain);
    let b = only_poly(&mirrored);
    assert_manifold(a);
    assert_manifold(b);
    for (fa, fb) in a.faces.iter().zip(&b.faces) {
        let fwd: Vec<u32> = fa.points.iter().map(|p| p.point.0).collect();
        let mut rev: Vec<u32> = fb.points.iter().map(|p| p.point.0).collect();
        rev.reverse();
        let pos = rev.iter().position(|&x| x == fwd[0]).expect("same loop");
        let rotated: Vec<u32> = rev[pos..].iter().chain(&rev[..pos]).copied().collect();
        assert_eq!(fwd, rotated, "winding not reversed");
    }
}

#[test]
fn rotate_quarter_turn_is_exact() {
    let tree = lower_ok(&[node(ScadKind::Rotate {
        rotation: Rotation::Euler([0.0, 0.0, 90.0]),
        children: vec![cube([1.0, 2.0, 3.0], false)],
    })]);
    let bb = solid_tree_bb(&tree, true);
    assert!((bb.min - DVec3::new(-2.0, 0.0, 0.0)).length() < 1e-12);
    assert!((bb.max - DVec3::new(0.0, 1.0, 3.0)).length() < 1e-12);
    // still a rectangular rotation
    assert!(only_poly(&tree).is_rect_rot);
}

#[test]
fn zero_translate_is_elided() {
    let tree = lower_ok(&[node(ScadKind::Translate {
        v: [0.0, 0.0, 0.0],
        children: vec![cube([1.0, 1.0, 1.0], false)],
    })]);
    // only the unit matrix was allocated
    assert_eq!(tree.mats.len(), 1);
}

#[test]
fn zero_scale_respects_severity() {
    let scale = node(ScadKind::Scale {
        v: [0.0, 1.0, 1.0],
        children: vec![cube([1.0, 1.0, 1.0], false)],
    });

    let opts = Options::default();
    let mut diags = Diagnostics::new();
    assert!(lower_tree(&opts, &mut diags, &[scale.clone()]).is_err());

    let opts = Options {
        err_empty: Severity::Warning,
        ..Options::default()
    };
    let mut diags = Diagnostics::new();
    let tree = lower_tree(&opts, &mut diags, &[scale]).expect("warning continues");
    assert!(tree.root.children.is_empty());
    assert_eq!(diags.entries().len(), 1);
}

#[test]
fn singular_multmatrix_collapses() {
    let mm = node(ScadKind::Multmatrix {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ],
        children: vec![cube([1.0, 1.0, 1.0], false)],
    });
    let opts = Options::default();
    let mut diags = Diagnostics::new();
    assert!(lower_tree(&opts, &mut diags, &[mm]).is_err());
    assert!(diags.entries()[0].message.contains("non-invertible"));
}

#[test]
fn mirror_by_zero_vector_is_fatal() {
    let n = node(ScadKind::Mirror {
        v: [0.0, 0.0, 0.0],
        children: vec![cube([1.0, 1.0, 1.0], false)],
    });
    let opts = Options {
        err_empty: Severity::Ignore,
        err_collapse: Severity::Ignore,
        ..Options::default()
    };
    let mut diags = Diagnostics::new();
    // not configurable: fatal even with lax options
    assert!(lower_tree(&opts, &mut diags, &[n]).is_err());
}

// =============================================================================
// POLYHEDRON
// =============================================================================

fn p3(coord: [f64; 3], i: u32) -> ScadPoint3 {
    ScadPoint3 {
        coord,
        span: Span::new(i * 10, i * 10 + 5),
    }
}

#[test]
fn user_polyhedron_validates() {
    let tree = lower_ok(&[node(ScadKind::Polyhedron {
        points: vec![
            p3([0.0, 0.0, 0.0], 0),
            p3([1.0, 0.0, 0.0], 1),
            p3([0.0, 1.0, 0.0], 2),
            p3([0.0, 0.0, 1.0], 3),
        ],
        faces: vec![
            vec![0, 1, 2],
            vec![0, 3, 1],
            vec![1, 3, 2],
            vec![2, 0, 3],
        ],
    })]);
    let p = only_poly(&tree);
    assert_eq!(p.edges.len(), 6);
    assert_manifold(p);
}

#[test]
fn duplicate_polyhedron_point_reports_both_spans() {
    let opts = Options::default();
    let mut diags = Diagnostics::new();
    let r = lower_tree(
        &opts,
        &mut diags,
        &[node(ScadKind::Polyhedron {
            points: vec![
                p3([0.0, 0.0, 0.0], 0),
                p3([1.0, 0.0, 0.0], 1),
                p3([0.0, 0.0, 0.0], 2),
                p3([0.0, 0.0, 1.0], 3),
            ],
            faces: vec![vec![0, 1, 2], vec![0, 2, 3], vec![0, 3, 1], vec![1, 3, 2]],
        })],
    );
    assert!(r.is_err());
    let d = &diags.entries()[0];
    assert!(d.message.contains("duplicate point"));
    assert!(d.secondary.is_some());
    assert_ne!(Some(d.primary), d.secondary);
}

#[test]
fn unpaired_polyhedron_face_is_fatal() {
    let opts = Options::default();
    let mut diags = Diagnostics::new();
    let r = lower_tree(
        &opts,
        &mut diags,
        &[node(ScadKind::Polyhedron {
            points: vec![
                p3([0.0, 0.0, 0.0], 0),
                p3([1.0, 0.0, 0.0], 1),
                p3([0.0, 1.0, 0.0], 2),
                p3([0.0, 0.0, 1.0], 3),
            ],
            // one face flipped: its edges double up
            faces: vec![
                vec![0, 2, 1],
                vec![0, 1, 3],
                vec![1, 2, 3],
                vec![3, 2, 0],
            ],
        })],
    );
    assert!(r.is_err());
    assert!(diags.has_fatal());
}

#[test]
fn concave_polyhedron_face_is_triangulated() {
    // a prism over an L-shaped footprint, with the caps as single
    // non-convex faces
    let l = [
        [0.0, 0.0],
        [2.0, 0.0],
        [2.0, 1.0],
        [1.0, 1.0],
        [1.0, 2.0],
        [0.0, 2.0],
    ];
    let mut points = Vec::new();
    for (i, &[x, y]) in l.iter().enumerate() {
        points.push(p3([x, y, 0.0], i as u32));
    }
    for (i, &[x, y]) in l.iter().enumerate() {
        points.push(p3([x, y, 1.0], (i + 6) as u32));
    }
    let mut faces = vec![
        vec![5, 4, 3, 2, 1, 0],     // bottom, seen from below
        vec![6, 7, 8, 9, 10, 11],   // top
    ];
    for i in 0..6usize {
        let j = (i + 1) % 6;
        faces.push(vec![i, j, j + 6, i + 6]);
    }
    let tree = lower_ok(&[node(ScadKind::Polyhedron { points, faces })]);
    let p = only_poly(&tree);
    // both caps became 4 triangles each
    assert_eq!(p.faces.len(), 4 + 4 + 6);
    assert_manifold(p);
}

// =============================================================================
// LINEAR EXTRUDE
// =============================================================================

fn p2(coord: [f64; 2], i: u32) -> ScadPoint2 {
    ScadPoint2 {
        coord,
        span: Span::new(i * 10, i * 10 + 5),
    }
}

fn unit_square_2d() -> ScadNode {
    node(ScadKind::Square {
        size: [1.0, 1.0],
        center: false,
    })
}

#[test]
fn extruded_square_is_a_box_tower() {
    let tree = lower_ok(&[node(ScadKind::LinearExtrude {
        height: 2.0,
        center: false,
        slices: 1,
        twist: 0.0,
        scale: [1.0, 1.0],
        children: vec![unit_square_2d()],
    })]);
    let p = only_poly(&tree);
    assert_eq!(p.points.len(), 8);
    assert_eq!(p.faces.len(), 6);
    assert_manifold(p);
    let bb = solid_tree_bb(&tree, true);
    assert!((bb.max.z - 2.0).abs() < 1e-9);
}

#[test]
fn twisted_extrusion_splits_side_quads() {
    let tree = lower_ok(&[node(ScadKind::LinearExtrude {
        height: 1.0,
        center: false,
        slices: 4,
        twist: 45.0,
        scale: [1.0, 1.0],
        children: vec![unit_square_2d()],
    })]);
    let p = only_poly(&tree);
    assert_eq!(p.points.len(), 5 * 4);
    // 2 caps + 4 bands of 4 quads split into triangles
    assert_eq!(p.faces.len(), 2 + 4 * 4 * 2);
    assert_manifold(p);
}

#[test]
fn scaled_extrusion_tapers() {
    let tree = lower_ok(&[node(ScadKind::LinearExtrude {
        height: 1.0,
        center: false,
        slices: 2,
        twist: 0.0,
        scale: [0.5, 0.5],
        children: vec![unit_square_2d()],
    })]);
    let p = only_poly(&tree);
    assert_manifold(p);
    let top_pts: Vec<_> = p
        .points
        .iter()
        .filter(|v| (v.coord.z - 1.0).abs() < 1e-9)
        .collect();
    assert_eq!(top_pts.len(), 4);
    for v in top_pts {
        assert!(v.coord.x.abs() <= 0.5 + 1e-9);
        assert!(v.coord.y.abs() <= 0.5 + 1e-9);
    }
}

#[test]
fn fully_collapsed_scale_makes_an_apex() {
    let tree = lower_ok(&[node(ScadKind::LinearExtrude {
        height: 1.0,
        center: false,
        slices: 2,
        twist: 0.0,
        scale: [0.0, 0.0],
        children: vec![unit_square_2d()],
    })]);
    let p = only_poly(&tree);
    // slices rings plus one apex
    assert_eq!(p.points.len(), 2 * 4 + 1);
    assert_manifold(p);
}

#[test]
fn one_zero_scale_axis_is_rejected() {
    let opts = Options {
        err_empty: Severity::Ignore,
        ..Options::default()
    };
    let mut diags = Diagnostics::new();
    let r = lower_tree(
        &opts,
        &mut diags,
        &[node(ScadKind::LinearExtrude {
            height: 1.0,
            center: false,
            slices: 1,
            twist: 0.0,
            scale: [0.0, 1.0],
            children: vec![unit_square_2d()],
        })],
    );
    assert!(r.is_err(), "unsupported feature is fatal even when lax");
}

#[test]
fn polygon_with_hole_extrudes_to_xor() {
    let polygon = node(ScadKind::Polygon {
        points: vec![
            p2([0.0, 0.0], 0),
            p2([4.0, 0.0], 1),
            p2([4.0, 4.0], 2),
            p2([0.0, 4.0], 3),
            p2([1.0, 1.0], 4),
            p2([3.0, 1.0], 5),
            p2([3.0, 3.0], 6),
            p2([1.0, 3.0], 7),
        ],
        paths: vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7]],
    });
    let tree = lower_ok(&[node(ScadKind::LinearExtrude {
        height: 1.0,
        center: false,
        slices: 1,
        twist: 0.0,
        scale: [1.0, 1.0],
        children: vec![polygon],
    })]);
    let CsgNode::Xor(xor) = &tree.root.children[0] else {
        panic!("expected XOR wrapper for a holed extrusion");
    };
    assert_eq!(xor.xor.len(), 2);
    for add in &xor.xor {
        match &add.children[0] {
            CsgNode::Leaf(Solid::Poly(p)) => assert_manifold(p),
            other => panic!("expected polyhedron, got {other:?}"),
        }
    }
}

#[test]
fn two_dee_primitive_outside_extrude_is_rejected() {
    let opts = Options::default();
    let mut diags = Diagnostics::new();
    let r = lower_tree(&opts, &mut diags, &[unit_square_2d()]);
    assert!(r.is_err());
    assert!(diags.entries()[0].message.contains("2D context"));
}

#[test]
fn three_dee_primitive_inside_extrude_is_rejected() {
    let opts = Options::default();
    let mut diags = Diagnostics::new();
    let r = lower_tree(
        &opts,
        &mut diags,
        &[node(ScadKind::LinearExtrude {
            height: 1.0,
            center: false,
            slices: 1,
            twist: 0.0,
            scale: [1.0, 1.0],
            children: vec![cube([1.0, 1.0, 1.0], false)],
        })],
    );
    assert!(r.is_err());
    assert!(diags.entries()[0].message.contains("3D context"));
}

// =============================================================================
// AABB SOUNDNESS
// =============================================================================

fn collect_points(nodes: &[CsgNode<Solid>], out: &mut Vec<DVec3>) {
    for n in nodes {
        match n {
            CsgNode::Add(a) => collect_points(&a.children, out),
            CsgNode::Sub(s) => {
                collect_points(&s.add.children, out);
                collect_points(&s.sub.children, out);
            }
            CsgNode::Cut(c) => {
                for a in &c.cut {
                    collect_points(&a.children, out);
                }
            }
            CsgNode::Xor(x) => {
                for a in &x.xor {
                    collect_points(&a.children, out);
                }
            }
            CsgNode::Leaf(Solid::Poly(p)) => {
                out.extend(p.points.iter().map(|v| v.coord));
            }
            CsgNode::Leaf(_) => {}
        }
    }
}

#[test]
fn bounding_box_contains_every_leaf_point() {
    let tree = lower_ok(&[difference(vec![
        cube([2.0, 2.0, 2.0], true),
        node(ScadKind::Translate {
            v: [0.5, 0.5, 0.5],
            children: vec![sphere(1.2, 16)],
        }),
    ])]);
    let bb = solid_tree_bb(&tree, true);
    let mut pts = Vec::new();
    collect_points(&tree.root.children, &mut pts);
    assert!(!pts.is_empty());
    let eps = DVec3::splat(1e-9);
    for p in pts {
        assert!(
            p.cmpge(bb.min - eps).all() && p.cmple(bb.max + eps).all(),
            "point {p:?} outside {bb:?}"
        );
    }
}

// =============================================================================
// DETERMINISM
// =============================================================================

#[test]
fn lowering_is_deterministic() {
    let build = || {
        let tree = lower_ok(&[difference(vec![
            cube([2.0, 2.0, 2.0], true),
            sphere(1.2, 16),
        ])]);
        let mut pts = Vec::new();
        collect_points(&tree.root.children, &mut pts);
        pts
    };
    let a = build();
    let b = build();
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.to_array(), y.to_array());
    }
}
