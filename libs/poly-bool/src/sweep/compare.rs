//! # Event and Segment Ordering
//!
//! The two comparators that drive the sweep, as free functions over the
//! event arena and point store so dictionary closures can borrow those
//! while the dictionary itself is borrowed mutably.
//!
//! Queue order: left-to-right by coordinate, right ends before left ends
//! at the same point, lower edge first among same-point same-side events.
//!
//! Status order: bottom-to-top by vertical position at the sweep line.
//! The comparator is direction-sensitive (its first argument is the edge
//! being inserted) because a left endpoint sitting exactly on an existing
//! edge is classified by the *other* endpoint, and which edge is "newer"
//! decides whose line the classification uses.

use super::event::{EvId, Event};
use super::point::{PointStore, PtId};
use csg_tree::geom::right_normal_z;
use std::cmp::Ordering;

/// Convert a C-style comparison int to an `Ordering`.
#[inline]
pub(crate) fn ord(i: i32) -> Ordering {
    i.cmp(&0)
}

/// Bottom/top classification of point `b` against edge `a1 -> a2`:
/// `+1` below, `-1` above, `0` on the line.
#[inline]
pub(crate) fn pt2_pt_cmp(pts: &PointStore, a1: PtId, a2: PtId, b: PtId) -> i32 {
    right_normal_z(pts.coord(a1), pts.coord(a2), pts.coord(b))
}

/// Left endpoint of the edge `e` belongs to.
#[inline]
pub(crate) fn left_pt(evs: &[Event], e: EvId) -> PtId {
    let ev = &evs[e as usize];
    if ev.left {
        ev.p
    } else {
        evs[ev.other as usize].p
    }
}

/// Right endpoint of the edge `e` belongs to.
#[inline]
pub(crate) fn right_pt(evs: &[Event], e: EvId) -> PtId {
    let ev = &evs[e as usize];
    if ev.left {
        evs[ev.other as usize].p
    } else {
        ev.p
    }
}

/// Queue order.
pub(crate) fn ev_cmp(evs: &[Event], pts: &PointStore, e1: EvId, e2: EvId) -> i32 {
    let a = &evs[e1 as usize];
    let b = &evs[e2 as usize];

    // different points: lexicographic by coordinate
    if a.p != b.p {
        let i = pts.cmp(a.p, b.p);
        debug_assert_ne!(i, 0, "distinct point ids with equal coordinates");
        return i;
    }

    // same point: right end comes first (is smaller)
    let i = i32::from(a.left) - i32::from(b.left);
    if i != 0 {
        return i;
    }

    // same point, same side: the lower edge first. May legitimately
    // report equality for collinear same-direction edges; they get split
    // later and processing order does not matter.
    pt2_pt_cmp(pts, left_pt(evs, e1), right_pt(evs, e1), evs[b.other as usize].p)
}

/// Status order, raw form: `e1` is the edge already in the status, `e2`
/// the one being classified against it.
fn seg_cmp_raw(evs: &[Event], pts: &PointStore, e1: EvId, e2: EvId) -> i32 {
    debug_assert!(evs[e1 as usize].left);
    debug_assert!(evs[e2 as usize].left);

    if e1 == e2 {
        return 0;
    }

    let e1p = evs[e1 as usize].p;
    let e1o = evs[evs[e1 as usize].other as usize].p;
    let e2p = evs[e2 as usize].p;
    let e2o = evs[evs[e2 as usize].other as usize].p;

    let e1_p_cmp = pt2_pt_cmp(pts, e1p, e1o, e2p);
    let e1_o_cmp = pt2_pt_cmp(pts, e1p, e1o, e2o);

    if e1_p_cmp != 0 || e1_o_cmp != 0 {
        // non-collinear
        // e2's left endpoint on e1: classify by e2's right endpoint
        if e1_p_cmp == 0 {
            return e1_o_cmp;
        }

        if ev_cmp(evs, pts, e1, e2) > 0 {
            // e1 is the newer edge: classify it against e2's line
            return if pt2_pt_cmp(pts, e2p, e2o, e1p) >= 0 { -1 } else { 1 };
        }

        // e1 came first
        return if e1_p_cmp <= 0 { -1 } else { 1 };
    }

    // collinear: fall back to a consistent arbitrary criterion
    if e1p == e2p {
        return if e1 < e2 { -1 } else { 1 };
    }
    ev_cmp(evs, pts, e1, e2)
}

/// Status order as the dictionary calls it: first argument is the edge
/// being inserted.
pub(crate) fn seg_cmp(evs: &[Event], pts: &PointStore, inserted: EvId, existing: EvId) -> i32 {
    -seg_cmp_raw(evs, pts, existing, inserted)
}

// =============================================================================
// TESTS
// =============================================================================
