//! # Intersection Handling
//!
//! Decides, for two status-adjacent edges, between proper intersection
//! (split at the computed point), endpoint coincidence (nothing to do) and
//! collinear overlap (rewrite owner masks so the doubled stretch cancels,
//! then split both edges at the overlap endpoints).
//!
//! All intersection math runs on the cached line forms so repeated splits
//! of the same input segment keep computing against the original line, and
//! rounding never accumulates.

use super::compare::ev_cmp;
use super::event::{set_lx, set_ly, EvId, LineForm};
use super::point::{pt_eq, rasterize, PtId};
use super::Sweep;
use config::GRID;
use csg_tree::geom::{approx_eq, approx_ge, approx_le, lex_cmp};
use glam::DVec2;
use std::cmp::Ordering;

/// Intersection of two line forms; the better-conditioned line (larger
/// `|a|`) is the pivot.
fn intersection_point(k: LineForm, m: LineForm) -> DVec2 {
    let (k, m) = if k.a.abs() < m.a.abs() { (m, k) } else { (k, m) };
    let (mut ka, mut kb, mut ks) = (k.a, k.b, k.swap);
    let (ma, mb, ms) = (m.a, m.b, m.swap);

    let mut r = DVec2::ZERO;
    if ks != ms {
        if approx_eq(ma, 0.0) {
            set_lx(ks, &mut r, mb);
            set_ly(ks, &mut r, ka * mb + kb);
            return r;
        }
        // rewrite k into m's axis; k is the one safely away from 0
        debug_assert!(!approx_eq(ka, 0.0));
        ka = 1.0 / ka;
        kb *= -ka;
        ks = ms;
    }

    debug_assert!(
        !approx_eq(ka, ma),
        "parallel lines must be handled before computing an intersection"
    );
    let q = (mb - kb) / (ka - ma);
    set_lx(ks, &mut r, q);
    set_ly(ks, &mut r, ka * q + kb);
    r
}

/// Whether `b` lies in the closed interval spanned by `a` and `c`.
fn dim_between(a: f64, b: f64, c: f64) -> bool {
    if a < c {
        approx_le(a, b) && approx_le(b, c)
    } else {
        approx_ge(a, b) && approx_ge(b, c)
    }
}

/// Whether `b` lies on the segment `a..c`, by interval tests plus an
/// interpolation check along the dominant axis.
fn coord_between(a: DVec2, b: DVec2, c: DVec2) -> bool {
    if !dim_between(a.x, b.x, c.x) || !dim_between(a.y, b.y, c.y) {
        return false;
    }
    let d = c - a;
    if d.x.abs() > d.y.abs() {
        let t = (b.x - a.x) / d.x;
        pt_eq(a.y + t * d.y, b.y)
    } else {
        let t = (b.y - a.y) / d.y;
        pt_eq(a.x + t * d.x, b.x)
    }
}

impl Sweep {
    fn pt_between(&self, a: PtId, b: PtId, c: PtId) -> bool {
        if a == b || b == c {
            return true;
        }
        coord_between(self.pts.coord(a), self.pts.coord(b), self.pts.coord(c))
    }

    /// Geometric overlap test for the edges `el..ol` and `eh..oh`, by
    /// pairwise point-on-segment tests rather than slope comparison, so
    /// the decision is consistent with coordinate comparison everywhere
    /// else.
    fn ev4_overlap(&self, el: EvId, ol: EvId, eh: EvId, oh: EvId) -> bool {
        let (pel, pol) = (self.evs[el as usize].p, self.evs[ol as usize].p);
        let (peh, poh) = (self.evs[eh as usize].p, self.evs[oh as usize].p);

        if self.pt_between(pel, peh, pol) {
            if self.pt_between(pel, poh, pol) {
                return true;
            }
            if self.pt_between(peh, pol, poh) {
                // a single shared endpoint is not an overlap
                return ol != eh;
            }
        }

        if self.pt_between(peh, pel, poh) {
            if self.pt_between(peh, pol, poh) {
                return true;
            }
            if self.pt_between(pel, poh, pol) {
                return oh != el;
            }
        }

        false
    }

    /// Split the edge of left event `e` at interior point `p`.
    ///
    /// ```text
    ///      p              p
    /// e-------.       e--.l--.
    ///  `-------o       `--r`--o
    /// ```
    pub(super) fn divide_segment(&mut self, e: EvId, p: PtId) {
        debug_assert_ne!(p, self.evs[e as usize].p);
        debug_assert!(self.evs[e as usize].left);
        let o = self.evs[e as usize].other;
        debug_assert_ne!(p, self.evs[o as usize].p);
        debug_assert!(!self.in_s(o));

        let span = self.pts.span(p);
        let r = self.ev_new(span, p, false, e);
        let l = self.ev_new(span, p, true, o);

        // relink buddies
        self.evs[o as usize].other = l;
        self.evs[e as usize].other = r;

        // the caller prepares owner/below on the originals; the halves
        // inherit them, and the line formula is shared by all four
        self.evs[r as usize].owner = self.evs[e as usize].owner;
        self.evs[r as usize].below = self.evs[e as usize].below;
        self.evs[l as usize].owner = self.evs[o as usize].owner;
        self.evs[l as usize].below = self.evs[o as usize].below;
        let line = self.evs[e as usize].line;
        self.evs[l as usize].line = line;
        self.evs[r as usize].line = line;

        // If rounding moved p past o, the unprocessed half l..o would be
        // mis-flagged; swap sides to reclassify it. The processed half
        // e..r must already be in order (the caller guarantees p's
        // placement).
        if ev_cmp(&self.evs, &self.pts, l, o) > 0 {
            self.evs[o as usize].left = true;
            self.evs[l as usize].left = false;
        }
        debug_assert!(ev_cmp(&self.evs, &self.pts, e, r) < 0);

        self.q_insert(l);
        self.q_insert(r);
    }

    /// Intersection point of the two edges, or `(None, collinear)`.
    ///
    /// `None` with `collinear == false` means parallel with a gap. Besides
    /// computing the point this also guards against rounding moving the
    /// point to the wrong side of a left endpoint: the point is nudged
    /// right until the relation between each edge's left endpoint and the
    /// point matches the relation to its right endpoint.
    fn find_intersection(&mut self, e0: EvId, e1: EvId) -> (Option<PtId>, bool) {
        debug_assert!(self.evs[e0 as usize].left);
        debug_assert!(self.evs[e1 as usize].left);

        let l0 = self.evs[e0 as usize].line;
        let l1 = self.evs[e1 as usize].line;

        // parallel / collinear: same axis and slope
        if l0.swap == l1.swap && approx_eq(l0.a, l1.a) {
            return (None, approx_eq(l0.b, l1.b));
        }

        let i_orig = intersection_point(l0, l1);
        let mut i = DVec2::new(rasterize(i_orig.x), rasterize(i_orig.y));

        let p0 = self.pts.coord(self.evs[e0 as usize].p);
        let p0b = self.pts.coord(self.evs[self.evs[e0 as usize].other as usize].p);
        let p1 = self.pts.coord(self.evs[e1 as usize].p);
        let p1b = self.pts.coord(self.evs[self.evs[e1 as usize].other as usize].p);

        // inside both segments?
        if !dim_between(p0.x, i.x, p0b.x)
            || !dim_between(p0.y, i.y, p0b.y)
            || !dim_between(p1.x, i.x, p1b.x)
            || !dim_between(p1.y, i.y, p1b.y)
        {
            return (None, false);
        }

        // keep i strictly right of the already-processed left endpoints
        match lex_cmp(p0, i) {
            Ordering::Equal => return (Some(self.evs[e0 as usize].p), false),
            Ordering::Greater => i.x = rasterize(i_orig.x + 1.5 * GRID),
            Ordering::Less => {}
        }
        match lex_cmp(p1, i) {
            Ordering::Equal => return (Some(self.evs[e1 as usize].p), false),
            Ordering::Greater => i.x = rasterize(i_orig.x + 1.5 * GRID),
            Ordering::Less => {}
        }

        let span = self.pts.span(self.evs[e0 as usize].p);
        (Some(self.pts.insert(span, i)), false)
    }

    fn overlap_order(&self, sev: &mut Vec<Option<EvId>>, e1: EvId, e2: EvId) {
        if self.evs[e1 as usize].p == self.evs[e2 as usize].p {
            sev.push(None);
        } else if ev_cmp(&self.evs, &self.pts, e1, e2) > 0 {
            sev.push(Some(e2));
            sev.push(Some(e1));
        } else {
            sev.push(Some(e1));
            sev.push(Some(e2));
        }
    }

    /// Handle a new adjacency between status edges `el` (lower) and `eh`
    /// (upper).
    pub(super) fn check_intersection(&mut self, el: EvId, eh: EvId) {
        let ol = self.evs[el as usize].other;
        let oh = self.evs[eh as usize].other;
        debug_assert!(self.evs[el as usize].left && self.evs[eh as usize].left);
        debug_assert!(self.in_s(el) && self.in_s(eh));
        debug_assert!(!self.in_s(ol) && !self.in_s(oh));

        // The overlap test must come first and must be purely geometric:
        // deciding collinearity by slope and only then checking overlap
        // can disagree with coordinate comparison after rasterization.
        if !self.ev4_overlap(el, ol, eh, oh) {
            let (ip, collinear) = self.find_intersection(el, eh);

            if let Some(ip) = ip {
                // edges meeting in a shared endpoint need no split
                if self.evs[el as usize].p == self.evs[eh as usize].p
                    || self.evs[ol as usize].p == self.evs[oh as usize].p
                {
                    return;
                }

                if ip == self.evs[el as usize].p {
                    // rounding put el's left endpoint on eh: el was
                    // classified too early; push it back into the queue
                    // to re-sort
                    self.s_remove(el);
                    self.q_insert(el);
                } else if ip != self.evs[ol as usize].p {
                    self.divide_segment(el, ip);
                }

                if ip == self.evs[eh as usize].p {
                    self.s_remove(eh);
                    self.q_insert(eh);
                } else if ip != self.evs[oh as usize].p {
                    self.divide_segment(eh, ip);
                }
                return;
            }

            // parallel with a gap: nothing to do. Collinear with a gap
            // cannot reach this point: the queue processes the earlier
            // right endpoint before the later left endpoint, so such
            // edges never share the status.
            debug_assert!(!collinear, "collinear non-overlapping status neighbors");
            return;
        }

        debug_assert!(self.pts.cmp(self.evs[el as usize].p, self.evs[ol as usize].p) < 0);
        debug_assert!(self.pts.cmp(self.evs[eh as usize].p, self.evs[oh as usize].p) < 0);
        debug_assert!(self.pts.cmp(self.evs[ol as usize].p, self.evs[eh as usize].p) >= 0);
        debug_assert!(self.pts.cmp(self.evs[oh as usize].p, self.evs[el as usize].p) >= 0);

        // collinear overlap: order the four endpoints, cancel the doubled
        // stretch by xor-ing the owners, and split so both edges align to
        // the overlap boundaries
        let mut sev: Vec<Option<EvId>> = Vec::with_capacity(4);
        self.overlap_order(&mut sev, el, eh);
        self.overlap_order(&mut sev, ol, oh);

        let owner = self.evs[eh as usize].owner ^ self.evs[el as usize].owner;
        let below = self.evs[el as usize].below;
        let above = below ^ owner;

        // The right halves' below masks need no reset: they are not in
        // the status, and below is recomputed on insertion.
        match sev.len() {
            2 => {
                // total overlap:  eh.....oh
                //                 el.....ol
                debug_assert!(sev[0].is_none() && sev[1].is_none());
                self.evs[eh as usize].owner = owner;
                self.evs[oh as usize].owner = owner;
                self.evs[eh as usize].below = below;
                self.evs[el as usize].owner = 0;
                self.evs[ol as usize].owner = 0;
                debug_assert_eq!(self.evs[el as usize].below, below);
            }
            3 => {
                // shared endpoint on one side; sev[1] is the inner end
                let mid = sev[1].expect("middle endpoint of a 3-event overlap");
                debug_assert!(sev[0].is_none() || sev[2].is_none());
                let mid_other = self.evs[mid as usize].other;
                self.evs[mid as usize].owner = 0;
                self.evs[mid_other as usize].owner = 0;

                // the longer edge and its left event
                let sh = sev[0].or(sev[2]).expect("outer endpoint");
                let shl = match sev[0] {
                    Some(e) => e,
                    None => self.evs[sh as usize].other,
                };
                let sh_other = self.evs[sh as usize].other;
                self.evs[sh_other as usize].owner = owner;
                self.evs[sh_other as usize].below = below;
                if shl == el {
                    self.evs[eh as usize].below = above;
                }
                self.divide_segment(shl, self.evs[mid as usize].p);
            }
            4 => {
                let s0 = sev[0].expect("outer-left event");
                let s1 = sev[1].expect("inner-left event");
                let s2 = sev[2].expect("inner-right event");
                let s3 = sev[3].expect("outer-right event");

                if s0 != self.evs[s3 as usize].other {
                    // staggered:      eh......oh
                    //             el......ol
                    self.evs[s1 as usize].owner = 0;
                    if s1 == eh {
                        self.evs[s1 as usize].below = above;
                    }
                    self.evs[s2 as usize].owner = owner;
                    self.evs[s2 as usize].below = below;
                    self.divide_segment(s0, self.evs[s1 as usize].p);
                    self.divide_segment(s1, self.evs[s2 as usize].p);
                } else {
                    // contained:      eh..oh
                    //             el..........ol
                    debug_assert_eq!(self.evs[s1 as usize].other, s2);
                    self.evs[s1 as usize].owner = 0;
                    self.evs[s2 as usize].owner = 0;
                    if s1 == eh {
                        self.evs[s1 as usize].below = above;
                        self.evs[s2 as usize].below = above;
                    }
                    self.divide_segment(s0, self.evs[s1 as usize].p);

                    // s0's edge was just split; its new left half starts
                    // at the inner-left point and still reaches s3
                    let tail = self.evs[s3 as usize].other;
                    self.evs[tail as usize].owner = owner;
                    self.evs[tail as usize].below = below;
                    self.divide_segment(tail, self.evs[s2 as usize].p);
                }
            }
            _ => unreachable!("overlap endpoint count"),
        }
    }
}
