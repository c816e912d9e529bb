//! # Lowering Visitor
//!
//! Walks the evaluated SCAD tree and produces the solid CSG tree. A
//! read-only (matrix, graphics context) pair threads down the recursion;
//! transform operators extend the matrix through the arena, boolean
//! operators group their children, primitives construct leaves.
//!
//! Every constructor sets the `no` flag when it recognizes its input as a
//! real (even if empty-output) object; `difference` uses it to decide
//! which child occupies the positive slot.

mod extrude;
mod primitives_2d;
mod primitives_3d;
mod transforms;

use csg_tree::gc::Gc;
use csg_tree::mat::MatId;
use csg_tree::node::{CsgAdd, CsgCut, CsgNode, CsgSub, CsgXor, Solid, SolidTree};
use scad_ast::{Diagnostics, Fatal, Modifier, Options, ScadKind, ScadNode, Span};

/// Whether the walk is inside a 2D context (`linear_extrude` children).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dim {
    Two,
    Three,
}

/// The (matrix, graphics context) pair threaded by value.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MatCtxt {
    pub mat: MatId,
    pub gc: Gc,
}

/// Lowering state.
pub(crate) struct Lower<'a> {
    pub opts: &'a Options,
    pub diags: &'a mut Diagnostics,
    pub tree: SolidTree,
    pub dim: Dim,
}

/// Lower an evaluated SCAD tree.
///
/// On failure the partial tree is discarded; the diagnostics sink holds
/// the reported records either way.
pub fn lower_tree(
    opts: &Options,
    diags: &mut Diagnostics,
    nodes: &[ScadNode],
) -> Result<SolidTree, Fatal> {
    let span = nodes.first().map_or_else(Span::synthetic, |n| n.span);
    let mut lower = Lower {
        opts,
        diags,
        tree: SolidTree::new(span),
        dim: Dim::Three,
    };
    let m = MatCtxt {
        mat: lower.tree.mats.unit(),
        gc: Gc::default(),
    };

    let mut root = Vec::new();
    let mut no = false;
    for node in nodes {
        lower.lower_node(&mut no, &mut root, &m, node)?;
    }
    lower.tree.root.children = root;
    Ok(lower.tree)
}

/// Effective fragment count for circular shapes.
///
/// `0` means the shape may stay analytic (`have_circular`); shapes that
/// must be polygonized saturate at the configured maximum and never drop
/// below three.
#[must_use]
pub(crate) fn effective_fn(opts: &Options, fn_: u32, have_circular: bool) -> u32 {
    if fn_ == 0 {
        return if have_circular { 0 } else { opts.max_fn };
    }
    if fn_ > opts.max_fn {
        return if have_circular { 0 } else { fn_ };
    }
    fn_.max(config::MIN_FN)
}

/// Span of a lowered node, for grouping constructs that inherit their
/// first child's location.
pub(crate) fn node_span(node: &CsgNode<Solid>) -> Span {
    match node {
        CsgNode::Add(a) => a.span,
        CsgNode::Sub(s) => s.span,
        CsgNode::Cut(c) => c.span,
        CsgNode::Xor(x) => x.span,
        CsgNode::Leaf(Solid::Sphere(s)) => s.span,
        CsgNode::Leaf(Solid::Poly(p)) => p.span,
        CsgNode::Leaf(Solid::Poly2(p)) => {
            p.points.first().map_or_else(Span::synthetic, |v| v.span)
        }
    }
}

impl Lower<'_> {
    /// Dispatch one node.
    pub(crate) fn lower_node(
        &mut self,
        no: &mut bool,
        r: &mut Vec<CsgNode<Solid>>,
        m: &MatCtxt,
        s: &ScadNode,
    ) -> Result<(), Fatal> {
        let mut mn = *m;
        if !s.modifier.is_empty() {
            if s.modifier.contains(Modifier::IGNORE) {
                // disabled subtree
                return Ok(());
            }
            mn.gc.modifier |= s.modifier;
        }
        let m = &mn;

        match &s.kind {
            // operators
            ScadKind::Union { children } => self.lower_nodes(no, r, m, children),
            ScadKind::Difference { children } => {
                self.lower_difference(no, r, m, children, s.span)
            }
            ScadKind::Intersection { children } => {
                self.lower_intersection(no, r, m, children, s.span)
            }

            // transformations
            ScadKind::Translate { v, children } => self.lower_translate(no, r, m, *v, children),
            ScadKind::Mirror { v, children } => {
                self.lower_mirror(no, r, m, *v, children, s.span)
            }
            ScadKind::Scale { v, children } => self.lower_scale(no, r, m, *v, children, s.span),
            ScadKind::Rotate { rotation, children } => {
                self.lower_rotate(no, r, m, *rotation, children)
            }
            ScadKind::Multmatrix { rows, children } => {
                self.lower_multmatrix(no, r, m, *rows, children, s.span)
            }

            // graphics context
            ScadKind::Color {
                rgba,
                rgb_valid,
                children,
            } => self.lower_color(no, r, m, *rgba, *rgb_valid, children),

            // 2D -> 3D
            ScadKind::LinearExtrude {
                height,
                center,
                slices,
                twist,
                scale,
                children,
            } => self.lower_linext(
                no, r, m, *height, *center, *slices, *twist, *scale, children, s.span,
            ),

            // 3D objects
            ScadKind::Sphere { r: radius, fn_ } => {
                self.lower_sphere(no, r, m, *radius, *fn_, s.span)
            }
            ScadKind::Cube { size, center } => {
                self.lower_cube(no, r, m, *size, *center, s.span)
            }
            ScadKind::Cylinder {
                h,
                r1,
                r2,
                center,
                fn_,
            } => self.lower_cylinder(no, r, m, *h, *r1, *r2, *center, *fn_, s.span),
            ScadKind::Polyhedron { points, faces } => {
                self.lower_polyhedron(no, r, m, points, faces, s.span)
            }

            // 2D objects
            ScadKind::Circle { r: radius, fn_ } => {
                self.lower_circle(no, r, m, *radius, *fn_, s.span)
            }
            ScadKind::Square { size, center } => {
                self.lower_square(no, r, m, *size, *center, s.span)
            }
            ScadKind::Polygon { points, paths } => {
                self.lower_polygon(no, r, m, points, paths, s.span)
            }
        }
    }

    /// Lower a child list in order.
    pub(crate) fn lower_nodes(
        &mut self,
        no: &mut bool,
        r: &mut Vec<CsgNode<Solid>>,
        m: &MatCtxt,
        children: &[ScadNode],
    ) -> Result<(), Fatal> {
        for child in children {
            self.lower_node(no, r, m, child)?;
        }
        Ok(())
    }

    /// `difference()`: the first non-empty child is positive, the rest
    /// negative. When the positive side lowers to a single SUB node, the
    /// remaining children join that node's negative side directly (this
    /// collapses `a - (b - c) - d` into `a - (b - c - d)`; downstream
    /// output depends on it).
    fn lower_difference(
        &mut self,
        no: &mut bool,
        r: &mut Vec<CsgNode<Solid>>,
        m: &MatCtxt,
        children: &[ScadNode],
        span: Span,
    ) -> Result<(), Fatal> {
        let mut pos: Vec<CsgNode<Solid>> = Vec::new();
        let mut add_no = false;
        let mut sub_i = 0;
        while sub_i < children.len() && !add_no {
            self.lower_node(&mut add_no, &mut pos, m, &children[sub_i])?;
            sub_i += 1;
        }

        if add_no {
            *no = true;
        }

        if pos.is_empty() {
            // nothing to subtract from
            return Ok(());
        }

        if pos.len() == 1 && matches!(pos[0], CsgNode::Sub(_)) {
            if let Some(CsgNode::Sub(mut sub)) = pos.pop() {
                for child in &children[sub_i..] {
                    self.lower_node(no, &mut sub.sub.children, m, child)?;
                }
                r.push(CsgNode::Sub(sub));
            }
            return Ok(());
        }

        let mut neg: Vec<CsgNode<Solid>> = Vec::new();
        for child in &children[sub_i..] {
            self.lower_node(no, &mut neg, m, child)?;
        }

        if neg.is_empty() {
            // nothing subtracted: the positive side stands alone
            r.append(&mut pos);
            return Ok(());
        }

        r.push(CsgNode::Sub(CsgSub {
            span,
            add: CsgAdd {
                span,
                children: pos,
            },
            sub: CsgAdd {
                span,
                children: neg,
            },
        }));
        Ok(())
    }

    /// `intersection()`: each child becomes one CUT operand; fewer than
    /// two non-empty operands collapse to a bare add.
    fn lower_intersection(
        &mut self,
        no: &mut bool,
        r: &mut Vec<CsgNode<Solid>>,
        m: &MatCtxt,
        children: &[ScadNode],
        span: Span,
    ) -> Result<(), Fatal> {
        fn flush(cut: &mut Vec<CsgAdd<Solid>>, add: &mut Vec<CsgNode<Solid>>) {
            if !add.is_empty() {
                let span = node_span(&add[0]);
                cut.push(CsgAdd {
                    span,
                    children: std::mem::take(add),
                });
            }
        }

        let mut cut: Vec<CsgAdd<Solid>> = Vec::new();
        let mut add: Vec<CsgNode<Solid>> = Vec::new();
        for child in children {
            flush(&mut cut, &mut add);
            self.lower_node(no, &mut add, m, child)?;
        }
        flush(&mut cut, &mut add);

        match cut.len() {
            0 => {}
            1 => {
                if let Some(only) = cut.pop() {
                    r.extend(only.children);
                }
            }
            _ => r.push(CsgNode::Cut(CsgCut { span, cut })),
        }
        Ok(())
    }

    /// Wrap multi-path extrusion bodies in a XOR node so interior holes
    /// follow path parity.
    pub(crate) fn push_xor_wrapped(
        r: &mut Vec<CsgNode<Solid>>,
        bodies: Vec<CsgNode<Solid>>,
        span: Span,
    ) {
        if bodies.len() >= 2 {
            let xor = bodies
                .into_iter()
                .map(|b| CsgAdd {
                    span: node_span(&b),
                    children: vec![b],
                })
                .collect();
            r.push(CsgNode::Xor(CsgXor { span, xor }));
        } else {
            r.extend(bodies);
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
    fn effective_fn_rules() {
        let opts = Options::default();
        // default stays analytic for circular targets
        assert_eq!(effective_fn(&opts, 0, true), 0);
        assert_eq!(effective_fn(&opts, 0, false), opts.max_fn);
        // above the cap: analytic if possible, else as requested
        assert_eq!(effective_fn(&opts, opts.max_fn + 1, true), 0);
        assert_eq!(effective_fn(&opts, opts.max_fn + 1, false), opts.max_fn + 1);
        // tiny values clamp to the minimum
        assert_eq!(effective_fn(&opts, 1, true), 3);
        assert_eq!(effective_fn(&opts, 16, true), 16);
    }
}
