//! # Plane-Sweep Boolean Engine
//!
//! Combines two polygons under ADD / SUB / CUT / XOR. The sweep walks the
//! plane left to right: a queue of endpoint events drives the loop, the
//! status dictionary holds the edges currently crossing the sweep line in
//! vertical order, and every edge carries the bitmask of input polygons
//! whose interior lies just below it. A right endpoint classifies its edge
//! under the operator; boundary edges go to the chain assembler, which
//! links them into rings and emits clockwise exteriors and
//! counterclockwise holes.
//!
//! Inside/outside tracking is xor-based: `above = below ^ owner`, and
//! overlapping edges xor their owner masks so duplicated geometry cancels
//! instead of erroring.

mod chain;
mod compare;
mod event;
mod intersect;
mod point;


use crate::dict::{Dict, NIL};
use compare::{ev_cmp, ord, seg_cmp};
use csg_tree::bbox::Aabb2;
use csg_tree::geom::approx_gt;
use csg_tree::node::{CsgAdd, CsgNode, Solid};
use csg_tree::poly2::Polygon2;
use event::{Event, EvId, LineForm, ly, lx};
use glam::DVec2;
use point::{pt_gt, PointStore, PtId};
use scad_ast::Span;

// =============================================================================
// OPERATORS
// =============================================================================

/// The boolean operator applied to two polygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    /// Union.
    Add,
    /// First minus second.
    Sub,
    /// Intersection.
    Cut,
    /// Symmetric difference.
    Xor,
}

// =============================================================================
// CONTEXT
// =============================================================================

/// All state of one boolean operation. Dropped wholesale when the
/// operation returns; this is the scoped arena of the engine.
struct Sweep {
    pts: PointStore,
    evs: Vec<Event>,
    /// Pending events.
    q: Dict,
    /// Active left edges, bottom to top.
    s: Dict,
    /// Open chain endpoints, keyed by point.
    ends: Dict,
    /// Chain seeds, one pushed per closing join.
    polys: Vec<EvId>,
    op: BoolOp,
    /// Polygons negated by the operator (bit 1 for SUB).
    mask_neg: u32,
    /// All participating polygons.
    mask_all: u32,
}

impl Sweep {
    fn new(op: BoolOp) -> Self {
        Self {
            pts: PointStore::new(),
            evs: Vec::new(),
            q: Dict::new(),
            s: Dict::new(),
            ends: Dict::new(),
            polys: Vec::new(),
            op,
            mask_neg: if op == BoolOp::Sub { 2 } else { 0 },
            mask_all: 3,
        }
    }

    fn ev_new(&mut self, span: Span, p: PtId, left: bool, other: EvId) -> EvId {
        let id = self.evs.len() as EvId;
        let mut e = Event::new(span, p, left, other);
        e.ring = [id, id];
        self.evs.push(e);
        id
    }

    // -------------------------------------------------------------------------
    // queue / status plumbing
    // -------------------------------------------------------------------------

    fn q_insert(&mut self, e: EvId) {
        debug_assert_eq!(
            self.pts
                .cmp(self.evs[e as usize].p, self.evs[self.evs[e as usize].other as usize].p)
                < 0,
            self.evs[e as usize].left,
            "left flag disagrees with endpoint order"
        );
        let node = {
            let (evs, pts, q) = (&self.evs, &self.pts, &mut self.q);
            q.insert_multi(e, |a, b| ord(ev_cmp(evs, pts, a, b)))
        };
        self.evs[e as usize].q_node = node;
    }

    fn q_extract_min(&mut self) -> Option<EvId> {
        let e = self.q.extract_min()?;
        self.evs[e as usize].q_node = NIL;
        Some(e)
    }

    fn s_insert(&mut self, e: EvId) {
        let inserted = {
            let (evs, pts, s) = (&self.evs, &self.pts, &mut self.s);
            s.insert_unique(e, |a, b| ord(seg_cmp(evs, pts, a, b)))
        };
        match inserted {
            Ok(node) => self.evs[e as usize].s_node = node,
            Err(_) => unreachable!("edge already present in sweep status"),
        }
    }

    fn s_remove(&mut self, e: EvId) {
        let node = self.evs[e as usize].s_node;
        debug_assert_ne!(node, NIL);
        self.s.remove(node);
        self.evs[e as usize].s_node = NIL;
    }

    fn s_next(&self, e: EvId) -> Option<EvId> {
        let node = self.s.next(self.evs[e as usize].s_node);
        (node != NIL).then(|| self.s.key(node))
    }

    fn s_prev(&self, e: EvId) -> Option<EvId> {
        let node = self.s.prev(self.evs[e as usize].s_node);
        (node != NIL).then(|| self.s.key(node))
    }

    fn in_s(&self, e: EvId) -> bool {
        self.evs[e as usize].s_node != NIL
    }

    // -------------------------------------------------------------------------
    // input loading
    // -------------------------------------------------------------------------

    /// Load one original segment as a pair of events.
    fn q_add_orig(&mut self, span: Span, c1: DVec2, c2: DVec2, poly_id: u32) {
        let p1 = self.pts.insert(span, c1);
        let p2 = self.pts.insert(span, c2);
        if p1 == p2 {
            // both coordinates collapsed onto one grid cell
            return;
        }

        let e1 = self.ev_new(span, p1, true, NIL);
        let e2 = self.ev_new(span, p2, false, e1);
        self.evs[e1 as usize].other = e2;
        self.evs[e1 as usize].owner = 1 << poly_id;
        self.evs[e2 as usize].owner = 1 << poly_id;

        if self.pts.cmp(p1, p2) > 0 {
            self.evs[e1 as usize].left = false;
            self.evs[e2 as usize].left = true;
        }

        // cache the line form, axis chosen so |a| <= 1
        let d = self.pts.coord(p2) - self.pts.coord(p1);
        let swap = d.x.abs() < d.y.abs();
        let a = ly(swap, d) / lx(swap, d);
        let c0 = self.pts.coord(p1);
        let b = ly(swap, c0) - a * lx(swap, c0);
        debug_assert!(a.abs() <= 1.0 + config::EPSILON);
        let line = LineForm { a, b, swap };
        self.evs[e1 as usize].line = line;
        self.evs[e2 as usize].line = line;

        self.q_insert(e1);
        self.q_insert(e2);
    }

    fn load_polygon(&mut self, poly: &Polygon2, poly_id: u32) {
        for path in &poly.paths {
            let n = path.point_idx.len();
            for j in 0..n {
                let pj = &poly.points[path.point_idx[j]];
                let pk = &poly.points[path.point_idx[(j + 1) % n]];
                self.q_add_orig(pj.span, pj.coord, pk.coord, poly_id);
            }
        }
    }

    // -------------------------------------------------------------------------
    // event handlers
    // -------------------------------------------------------------------------

    /// A left endpoint: the edge enters the status.
    fn ev_left(&mut self, e: EvId) {
        debug_assert!(!self.in_s(e));
        debug_assert!(!self.in_s(self.evs[e as usize].other));
        self.s_insert(e);

        let prev = self.s_prev(e);
        self.evs[e as usize].below = match prev {
            // nothing below: outside of everything
            None => 0,
            // the previous edge's above is this edge's below
            Some(p) => self.evs[p as usize].below ^ self.evs[p as usize].owner,
        };

        if let Some(next) = self.s_next(e) {
            self.check_intersection(e, next);
        }
        // the check may have kicked `e` back into the queue; only pair it
        // with its predecessor if it survived in the status
        if let Some(prev) = prev {
            if self.in_s(e) {
                self.check_intersection(prev, e);
            }
        }
    }

    /// A right endpoint: the edge leaves the status and is classified.
    fn ev_right(&mut self, e: EvId) {
        let sli = self.evs[e as usize].other;
        let next = self.s_next(sli);
        let prev = self.s_prev(sli);
        self.s_remove(sli);

        let below = self.evs[sli as usize].below;
        let above = below ^ self.evs[sli as usize].owner;
        let (below_in, above_in) = match self.op {
            BoolOp::Add => (below != 0, above != 0),
            BoolOp::Cut | BoolOp::Sub => (
                (below ^ self.mask_neg ^ self.mask_all) == 0,
                (above ^ self.mask_neg ^ self.mask_all) == 0,
            ),
            BoolOp::Xor => (below.count_ones() & 1 == 1, above.count_ones() & 1 == 1),
        };

        if below_in != above_in {
            // boundary edge; `below` becomes the orientation flag
            self.evs[e as usize].below = u32::from(below_in);
            let o = self.evs[e as usize].other;
            self.evs[o as usize].below = u32::from(below_in);
            self.chain_add(e);
        }

        if let (Some(prev), Some(next)) = (prev, next) {
            self.check_intersection(prev, next);
        }
    }
}

// =============================================================================
// PUBLIC ENTRY POINTS
// =============================================================================

fn poly_bb(p: &Polygon2) -> Aabb2 {
    let mut bb = Aabb2::empty();
    for path in &p.paths {
        for &idx in &path.point_idx {
            bb.expand(p.points[idx].coord);
        }
    }
    bb
}

/// Combine two polygons under `op`.
///
/// Both inputs must be canonical (clockwise paths); the output is a single
/// polygon whose paths are non-self-intersecting and disjoint except at
/// single points, exterior rings clockwise and holes counterclockwise.
#[must_use]
pub fn op_poly(op: BoolOp, a: Polygon2, b: Polygon2) -> Polygon2 {
    // trivial case: an empty operand
    if a.is_empty() || b.is_empty() {
        return match op {
            BoolOp::Cut => Polygon2::new(),
            BoolOp::Sub => a,
            BoolOp::Add | BoolOp::Xor => {
                if a.is_empty() {
                    b
                } else {
                    a
                }
            }
        };
    }

    // trivial case: disjoint bounding boxes
    let bb = [poly_bb(&a), poly_bb(&b)];
    let minmaxx = bb[0].max.x.min(bb[1].max.x);
    if approx_gt(bb[0].min.x, bb[1].max.x)
        || approx_gt(bb[1].min.x, bb[0].max.x)
        || approx_gt(bb[0].min.y, bb[1].max.y)
        || approx_gt(bb[1].min.y, bb[0].max.y)
    {
        return match op {
            BoolOp::Cut => Polygon2::new(),
            BoolOp::Sub => a,
            BoolOp::Add | BoolOp::Xor => {
                let mut r = a;
                r.merge(b);
                r
            }
        };
    }

    let mut c = Sweep::new(op);
    c.load_polygon(&a, 0);
    c.load_polygon(&b, 1);

    while let Some(e) = c.q_extract_min() {
        // past the relevant x range the rest cannot contribute
        let ex = c.pts.coord(c.evs[e as usize].p).x;
        if (op == BoolOp::Cut && pt_gt(ex, minmaxx))
            || (op == BoolOp::Sub && pt_gt(ex, bb[0].max.x))
        {
            break;
        }

        if c.evs[e as usize].left {
            c.ev_left(e);
        } else {
            c.ev_right(e);
        }
    }

    c.poly_make()
}

// =============================================================================
// TREE REDUCTION
// =============================================================================

/// Reduce a group of nodes by repeated ADD, resolving leaves through
/// `leaf` (which gets the slice index).
pub fn reduce_group<L>(
    children: &[CsgNode<L>],
    zi: usize,
    leaf: &impl Fn(&L, usize) -> Option<Polygon2>,
) -> Polygon2 {
    let mut out = Polygon2::new();
    for (i, child) in children.iter().enumerate() {
        let p = reduce_node(child, zi, leaf);
        out = if i == 0 { p } else { op_poly(BoolOp::Add, out, p) };
    }
    out
}

fn reduce_operands<L>(
    op: BoolOp,
    operands: &[CsgAdd<L>],
    zi: usize,
    leaf: &impl Fn(&L, usize) -> Option<Polygon2>,
) -> Polygon2 {
    let mut out = Polygon2::new();
    for (i, operand) in operands.iter().enumerate() {
        let p = reduce_group(&operand.children, zi, leaf);
        out = if i == 0 { p } else { op_poly(op, out, p) };
    }
    out
}

fn reduce_node<L>(
    node: &CsgNode<L>,
    zi: usize,
    leaf: &impl Fn(&L, usize) -> Option<Polygon2>,
) -> Polygon2 {
    match node {
        CsgNode::Add(a) => reduce_group(&a.children, zi, leaf),
        CsgNode::Sub(s) => {
            let pos = reduce_group(&s.add.children, zi, leaf);
            let neg = reduce_group(&s.sub.children, zi, leaf);
            op_poly(BoolOp::Sub, pos, neg)
        }
        CsgNode::Cut(c) => reduce_operands(BoolOp::Cut, &c.cut, zi, leaf),
        CsgNode::Xor(x) => reduce_operands(BoolOp::Xor, &x.xor, zi, leaf),
        CsgNode::Leaf(l) => leaf(l, zi).unwrap_or_default(),
    }
}

/// Flatten the result of a 2D-context lowering into one canonical polygon
/// (union of all polygon leaves, holes by path parity).
///
/// Used by `linear_extrude` before laying down rings.
#[must_use]
pub fn flatten(nodes: &[CsgNode<Solid>]) -> Polygon2 {
    reduce_group(nodes, 0, &|leaf, _zi| match leaf {
        Solid::Poly2(p) => Some(p.clone()),
        // 3D solids cannot appear in a 2D context; lowering rejects them
        _ => None,
    })
}
