//! # Layer Driver
//!
//! Projects a lowered 3D tree into a per-slice 2D tree and reduces every
//! slice with the plane-sweep engine.
//!
//! The projection keeps the ADD/SUB/CUT/XOR structure and turns every
//! solid leaf into a [`Stack`]: the solid itself plus one polygon slot per
//! z level. The external slicer fills the slots; [`SliceTree::reduce`]
//! then folds each slice bottom-up (ADD across children, one SUB against
//! the collected negative side, CUT and XOR across their operands) and
//! stores at most one polygon per layer, with empty layers flagged.

use crate::sweep::reduce_group;
use csg_tree::mat::MatArena;
use csg_tree::node::{CsgAdd, CsgCut, CsgNode, CsgSub, CsgXor, Solid, SolidTree};
use csg_tree::poly2::Polygon2;
use scad_ast::Span;

// =============================================================================
// SLICE TREE
// =============================================================================

/// Per-layer polygons of one solid, filled in by the external slicer.
#[derive(Debug)]
pub struct Stack {
    /// The solid this stack slices.
    pub source: Solid,
    /// One slot per z level; `None` until sliced, and for levels the
    /// solid does not reach.
    pub layers: Vec<Option<Polygon2>>,
    /// Span of the producing primitive.
    pub span: Span,
}

/// Leaf of the 2D tree.
#[derive(Debug)]
pub enum Slice {
    /// A plain polygon, the same at every layer.
    Poly(Polygon2),
    /// Per-layer polygons from the slicer.
    Stack(Stack),
}

/// The 2D CSG tree plus its z levels.
#[derive(Debug)]
pub struct SliceTree {
    /// Root union group.
    pub root: CsgAdd<Slice>,
    /// z coordinate of every layer.
    pub z: Vec<f64>,
    /// Matrix arena carried over from the 3D tree (stacks reference it).
    pub mats: MatArena,
}

/// Reduction output: at most one polygon per layer.
#[derive(Debug)]
pub struct LayerSet {
    /// z coordinate of every layer.
    pub z: Vec<f64>,
    /// The reduced polygon per layer; `None` where the slice is empty.
    pub layers: Vec<Option<Polygon2>>,
    /// Non-empty flag per layer.
    pub flags: Vec<bool>,
}

impl SliceTree {
    /// Build the 2D skeleton from a lowered tree: `cnt` layers starting
    /// at `z_min`, stepping by `z_step`.
    #[must_use]
    pub fn from_solid(tree: SolidTree, z_min: f64, z_step: f64, cnt: usize) -> Self {
        let span = tree.root.span;
        let mut root = CsgAdd::new(span);
        root.children = tree
            .root
            .children
            .into_iter()
            .map(|n| project_node(n, cnt))
            .collect();
        Self {
            root,
            z: (0..cnt).map(|zi| z_min + z_step * zi as f64).collect(),
            mats: tree.mats,
        }
    }

    /// Hand every stack to the slicer, filling its layer slots.
    pub fn slice_with(
        &mut self,
        mut slicer: impl FnMut(&Solid, &MatArena, f64) -> Option<Polygon2>,
    ) {
        let mats = &self.mats;
        let z = &self.z;
        for_each_stack(&mut self.root, &mut |stack| {
            for (zi, slot) in stack.layers.iter_mut().enumerate() {
                *slot = slicer(&stack.source, mats, z[zi]);
            }
        });
    }

    /// Reduce one slice to a polygon; `None` when the slice is empty.
    #[must_use]
    pub fn reduce_layer(&self, zi: usize) -> Option<Polygon2> {
        let poly = reduce_group(&self.root.children, zi, &slice_leaf);
        (!poly.points.is_empty()).then_some(poly)
    }

    /// Reduce every slice. Layers are independent of each other; each
    /// call to [`Self::reduce_layer`] owns its own transient state.
    #[must_use]
    pub fn reduce(&self) -> LayerSet {
        let layers: Vec<Option<Polygon2>> =
            (0..self.z.len()).map(|zi| self.reduce_layer(zi)).collect();
        let flags = layers.iter().map(Option::is_some).collect();
        LayerSet {
            z: self.z.clone(),
            layers,
            flags,
        }
    }
}

fn slice_leaf(leaf: &Slice, zi: usize) -> Option<Polygon2> {
    match leaf {
        Slice::Poly(p) => Some(p.clone()),
        Slice::Stack(stack) => stack.layers.get(zi)?.clone(),
    }
}

// =============================================================================
// PROJECTION
// =============================================================================

fn project_group(add: CsgAdd<Solid>, cnt: usize) -> CsgAdd<Slice> {
    CsgAdd {
        span: add.span,
        children: add
            .children
            .into_iter()
            .map(|n| project_node(n, cnt))
            .collect(),
    }
}

fn project_node(node: CsgNode<Solid>, cnt: usize) -> CsgNode<Slice> {
    match node {
        CsgNode::Add(a) => CsgNode::Add(project_group(a, cnt)),
        CsgNode::Sub(s) => CsgNode::Sub(CsgSub {
            span: s.span,
            add: project_group(s.add, cnt),
            sub: project_group(s.sub, cnt),
        }),
        CsgNode::Cut(c) => CsgNode::Cut(CsgCut {
            span: c.span,
            cut: c.cut.into_iter().map(|a| project_group(a, cnt)).collect(),
        }),
        CsgNode::Xor(x) => CsgNode::Xor(CsgXor {
            span: x.span,
            xor: x.xor.into_iter().map(|a| project_group(a, cnt)).collect(),
        }),
        CsgNode::Leaf(solid) => {
            let span = solid_span(&solid);
            CsgNode::Leaf(Slice::Stack(Stack {
                source: solid,
                layers: vec![None; cnt],
                span,
            }))
        }
    }
}

fn solid_span(s: &Solid) -> Span {
    match s {
        Solid::Sphere(sp) => sp.span,
        Solid::Poly(p) => p.span,
        Solid::Poly2(p) => p.points.first().map_or_else(Span::synthetic, |v| v.span),
    }
}

fn for_each_stack(add: &mut CsgAdd<Slice>, f: &mut impl FnMut(&mut Stack)) {
    for child in &mut add.children {
        match child {
            CsgNode::Add(a) => for_each_stack(a, f),
            CsgNode::Sub(s) => {
                for_each_stack(&mut s.add, f);
                for_each_stack(&mut s.sub, f);
            }
            CsgNode::Cut(c) => {
                for a in &mut c.cut {
                    for_each_stack(a, f);
                }
            }
            CsgNode::Xor(x) => {
                for a in &mut x.xor {
                    for_each_stack(a, f);
                }
            }
            CsgNode::Leaf(Slice::Stack(stack)) => f(stack),
            CsgNode::Leaf(Slice::Poly(_)) => {}
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
