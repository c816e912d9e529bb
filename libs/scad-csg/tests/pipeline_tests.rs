//! Full-pipeline tests: lower a SCAD tree, project it to slices, and
//! reduce each layer with the boolean engine.
//!
//! The slicer here is a test stand-in that only understands axis-aligned
//! boxes (it slices a polyhedron to its xy bounding rectangle), which is
//! exact for the axis-aligned cubes used below.

use csg_tree::gc::Color;
use csg_tree::node::Solid;
use csg_tree::poly2::{Path2, Polygon2, Vertex2};
use glam::DVec2;
use poly_bool::SliceTree;
use scad_ast::{Diagnostics, Options, ScadKind, ScadNode, Span};
use scad_csg::lower_tree;

fn node(kind: ScadKind) -> ScadNode {
    ScadNode::new(kind, Span::new(0, 4))
}

fn cube(size: [f64; 3], center: bool) -> ScadNode {
    node(ScadKind::Cube { size, center })
}

fn translate(v: [f64; 3], child: ScadNode) -> ScadNode {
    node(ScadKind::Translate {
        v,
        children: vec![child],
    })
}

/// Slice an axis-aligned box solid at height `z`.
fn box_slicer(solid: &Solid, z: f64) -> Option<Polygon2> {
    let Solid::Poly(p) = solid else {
        return None;
    };
    let (mut min, mut max) = (glam::DVec3::splat(f64::INFINITY), glam::DVec3::splat(f64::NEG_INFINITY));
    for v in &p.points {
        min = min.min(v.coord);
        max = max.max(v.coord);
    }
    if z < min.z || z > max.z {
        return None;
    }
    let mut poly = Polygon2::new();
    for (x, y) in [(min.x, min.y), (min.x, max.y), (max.x, max.y), (max.x, min.y)] {
        poly.points.push(Vertex2 {
            coord: DVec2::new(x, y),
            color: Color::default(),
            span: Span::synthetic(),
        });
    }
    poly.paths.push(Path2 {
        point_idx: vec![0, 1, 2, 3],
    });
    let rev = poly.make_clockwise();
    debug_assert!(!rev, "box path is already clockwise");
    Some(poly)
}

#[test]
fn difference_of_cubes_slices_to_an_l_shape() {
    // 2x2x2 cube minus a 1x1x3 column in its +x +y corner
    let opts = Options::default();
    let mut diags = Diagnostics::new();
    let tree = lower_tree(
        &opts,
        &mut diags,
        &[node(ScadKind::Difference {
            children: vec![
                cube([2.0, 2.0, 2.0], false),
                translate([1.0, 1.0, -0.5], cube([1.0, 1.0, 3.0], false)),
            ],
        })],
    )
    .expect("lowering succeeds");

    let mut slices = SliceTree::from_solid(tree, 0.5, 1.0, 2);
    slices.slice_with(|solid, _mats, z| box_slicer(solid, z));
    let set = slices.reduce();

    assert_eq!(set.flags, vec![true, true]);
    for layer in set.layers.iter().flatten() {
        assert_eq!(layer.paths.len(), 1);
        // the L-shaped outline has six corners
        assert_eq!(layer.paths[0].point_idx.len(), 6);
        // clockwise exterior
        assert!(layer.path_cross_sum(&layer.paths[0]) > 0.0);
    }
}

#[test]
fn union_of_disjoint_towers_gives_two_paths_per_layer() {
    let opts = Options::default();
    let mut diags = Diagnostics::new();
    let tree = lower_tree(
        &opts,
        &mut diags,
        &[
            cube([1.0, 1.0, 1.0], false),
            translate([3.0, 0.0, 0.0], cube([1.0, 1.0, 1.0], false)),
        ],
    )
    .expect("lowering succeeds");

    let mut slices = SliceTree::from_solid(tree, 0.5, 1.0, 2);
    slices.slice_with(|solid, _mats, z| box_slicer(solid, z));
    let set = slices.reduce();

    assert_eq!(set.flags, vec![true, false]);
    let layer = set.layers[0].as_ref().expect("bottom layer");
    assert_eq!(layer.paths.len(), 2);
}

#[test]
fn intersection_narrows_to_the_overlap() {
    let opts = Options::default();
    let mut diags = Diagnostics::new();
    let tree = lower_tree(
        &opts,
        &mut diags,
        &[node(ScadKind::Intersection {
            children: vec![
                cube([2.0, 2.0, 1.0], false),
                translate([1.0, 0.0, 0.0], cube([2.0, 2.0, 1.0], false)),
            ],
        })],
    )
    .expect("lowering succeeds");

    let mut slices = SliceTree::from_solid(tree, 0.5, 1.0, 1);
    slices.slice_with(|solid, _mats, z| box_slicer(solid, z));
    let set = slices.reduce();

    let layer = set.layers[0].as_ref().expect("overlap layer");
    assert_eq!(layer.paths.len(), 1);
    let xs: Vec<f64> = layer.paths[0]
        .point_idx
        .iter()
        .map(|&i| layer.points[i].coord.x)
        .collect();
    let min_x = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let max_x = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    assert!((min_x - 1.0).abs() < 1e-9);
    assert!((max_x - 2.0).abs() < 1e-9);
}
