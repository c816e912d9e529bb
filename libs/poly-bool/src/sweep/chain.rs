//! # Chain Assembly
//!
//! Boundary edges arrive in sweep order (left to right) and are linked
//! into polygon rings through a store of open chain endpoints keyed by
//! point. Each arriving edge looks up both of its endpoints: neither found
//! starts a chain, one found extends a chain, both found joins two ends,
//! which either closes a ring or merges two open chains into one.
//!
//! Chains are endpoint-aware rings: every node has two neighbor slots, a
//! slot pointing at the node itself marks an open end. Joining works from
//! either end regardless of direction, which a plain doubly-linked list
//! cannot do.

use super::compare::ord;
use super::event::EvId;
use crate::dict::NIL;
use super::Sweep;
use csg_tree::gc::Color;
use csg_tree::poly2::{Path2, Polygon2, Vertex2};

impl Sweep {
    // -------------------------------------------------------------------------
    // ring primitive
    // -------------------------------------------------------------------------

    fn ring_init(&mut self, e: EvId) {
        self.evs[e as usize].ring = [e, e];
    }

    fn ring_is_end(&self, e: EvId) -> bool {
        let r = self.evs[e as usize].ring;
        r[0] == e || r[1] == e
    }

    /// Join two open ends.
    fn ring_join(&mut self, a: EvId, b: EvId) {
        debug_assert!(self.ring_is_end(a));
        debug_assert!(self.ring_is_end(b));
        let sa = usize::from(self.evs[a as usize].ring[0] != a);
        let sb = usize::from(self.evs[b as usize].ring[0] != b);
        self.evs[a as usize].ring[sa] = b;
        self.evs[b as usize].ring[sb] = a;
    }

    fn ring_step(&self, e: EvId, dir: usize) -> EvId {
        self.evs[e as usize].ring[dir]
    }

    /// The neighbor of `cur` that is not `prev`.
    fn ring_next(&self, prev: EvId, cur: EvId) -> EvId {
        let r = self.evs[cur as usize].ring;
        if r[0] == prev {
            r[1]
        } else {
            r[0]
        }
    }

    // -------------------------------------------------------------------------
    // end store
    // -------------------------------------------------------------------------

    /// Insert an event keyed by its point. When an end with the same
    /// point is already waiting, extract and return that one instead.
    fn chain_insert_or_extract(&mut self, e: EvId) -> Option<EvId> {
        let result = {
            let (evs, pts, ends) = (&self.evs, &self.pts, &mut self.ends);
            ends.insert_unique(e, |a, b| {
                ord(pts.cmp(evs[a as usize].p, evs[b as usize].p))
            })
        };
        match result {
            Ok(node) => {
                self.evs[e as usize].end_node = node;
                None
            }
            Err(node) => {
                let found = self.ends.key(node);
                self.ends.remove(node);
                self.evs[found as usize].end_node = NIL;
                Some(found)
            }
        }
    }

    // -------------------------------------------------------------------------
    // output edges
    // -------------------------------------------------------------------------

    /// Feed a boundary edge (its right event) into the assembler.
    pub(super) fn chain_add(&mut self, e: EvId) {
        let o = self.evs[e as usize].other;
        debug_assert!(!self.evs[e as usize].left);
        debug_assert!(self.pts.cmp(self.evs[e as usize].p, self.evs[o as usize].p) >= 0);
        debug_assert!(!self.in_s(e) && !self.in_s(o));
        debug_assert_eq!(self.evs[e as usize].q_node, NIL);
        debug_assert_eq!(self.evs[o as usize].q_node, NIL);

        self.ring_init(e);
        self.ring_init(o);

        // search by the left point, insert by the right point
        let o1 = self.chain_insert_or_extract(o);
        let o2 = self.chain_insert_or_extract(e);

        match (o1, o2) {
            (None, None) => {
                // new chain: the edge's two events form the initial pair
                self.ring_join(e, o);
            }
            (Some(o1), Some(o2)) => {
                // both endpoints had waiting ends: the join closes a ring
                // (or merges two chains); remember a seed either way, the
                // `used` flag deduplicates at emission
                self.ring_join(o1, o2);
                debug_assert!(!self.ring_is_end(o1));
                debug_assert!(!self.ring_is_end(o2));
                self.polys.push(o2);
            }
            (Some(o1), None) => {
                // left end attaches to a waiting chain; the right event
                // becomes the new open end
                self.ring_join(o1, e);
                debug_assert!(!self.ring_is_end(o1));
            }
            (None, Some(o2)) => {
                self.ring_join(o2, o);
                debug_assert!(!self.ring_is_end(o2));
            }
        }
    }

    // -------------------------------------------------------------------------
    // path emission
    // -------------------------------------------------------------------------

    fn path_add_point(&mut self, out: &mut Polygon2, path: &mut Path2, e: EvId) {
        debug_assert!(!self.ring_is_end(e), "polygon chain too short or misformed");
        debug_assert!(!self.evs[e as usize].used);
        self.evs[e as usize].used = true;

        let p = self.evs[e as usize].p;
        let idx = match self.pts.out_idx(p) {
            Some(i) => i as usize,
            None => {
                let i = out.points.len();
                out.points.push(Vertex2 {
                    coord: self.pts.coord(p),
                    color: Color::default(),
                    span: self.pts.span(p),
                });
                self.pts.set_out_idx(p, i as u32);
                i
            }
        };
        path.point_idx.push(idx);
    }

    /// Emit one closed ring as a path, choosing the traversal direction
    /// that makes the result clockwise: if the exterior lies just below
    /// the seed edge, walk it left to right, otherwise reverse.
    fn path_make(&mut self, out: &mut Polygon2, seed: EvId) {
        let mut e0 = seed;
        let mut ex = self.ring_step(e0, 0);
        let mut e1 = self.ring_step(e0, 1);

        // make e1 the ring neighbor across the seed's own edge
        let e0_other_p = self.evs[self.evs[e0 as usize].other as usize].p;
        if self.evs[ex as usize].p == e0_other_p {
            std::mem::swap(&mut e1, &mut ex);
        }
        debug_assert_eq!(self.evs[e1 as usize].p, e0_other_p);

        if self.evs[e0 as usize].below != 0 {
            std::mem::swap(&mut e0, &mut e1);
        }

        let mut path = Path2::default();
        self.path_add_point(out, &mut path, e0);
        self.path_add_point(out, &mut path, e1);
        let (mut prev, mut cur) = (e0, e1);
        loop {
            let next = self.ring_next(prev, cur);
            if next == e0 {
                break;
            }
            self.path_add_point(out, &mut path, next);
            prev = cur;
            cur = next;
        }

        debug_assert!(path.point_idx.len() >= 3, "polygon chain too short");
        out.paths.push(path);
    }

    /// Emit all closed rings.
    pub(super) fn poly_make(mut self) -> Polygon2 {
        debug_assert!(self.ends.is_empty(), "open polygon chains remain");
        let mut out = Polygon2::new();
        let seeds = std::mem::take(&mut self.polys);
        for seed in seeds {
            if !self.evs[seed as usize].used {
                self.path_make(&mut out, seed);
            }
        }
        out
    }
}
