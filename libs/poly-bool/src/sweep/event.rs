//! # Sweep Events
//!
//! One event per segment endpoint, allocated from a `Vec` arena and
//! addressed by id. An event knows its point, its partner at the other end
//! of the edge, which side it is (`left`), the owner and below bitmasks,
//! the cached line form of its edge, and its transient memberships: a
//! handle into the queue, the status, or the chain-end store, plus the
//! two-neighbor ring used for output chain assembly.

use super::point::PtId;
use crate::dict::{NodeIdx, NIL};
use glam::DVec2;
use scad_ast::Span;

/// Index into the event arena.
pub(crate) type EvId = u32;

/// Cached line equation of an edge.
///
/// `swap == false`: `y = a*x + b`; `swap == true`: `x = a*y + b`. The axis
/// is chosen so `|a| <= 1`, which keeps intersection math well-conditioned
/// for every slope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LineForm {
    pub a: f64,
    pub b: f64,
    pub swap: bool,
}

impl LineForm {
    pub const ZERO: LineForm = LineForm {
        a: 0.0,
        b: 0.0,
        swap: false,
    };
}

/// The independent coordinate of the line form.
#[inline]
pub(crate) fn lx(swap: bool, c: DVec2) -> f64 {
    if swap {
        c.y
    } else {
        c.x
    }
}

/// The dependent coordinate of the line form.
#[inline]
pub(crate) fn ly(swap: bool, c: DVec2) -> f64 {
    if swap {
        c.x
    } else {
        c.y
    }
}

/// Write the independent coordinate.
#[inline]
pub(crate) fn set_lx(swap: bool, r: &mut DVec2, v: f64) {
    if swap {
        r.y = v;
    } else {
        r.x = v;
    }
}

/// Write the dependent coordinate.
#[inline]
pub(crate) fn set_ly(swap: bool, r: &mut DVec2, v: f64) {
    if swap {
        r.x = v;
    } else {
        r.y = v;
    }
}

/// A sweep event.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Event {
    /// The endpoint this event lives at.
    pub p: PtId,
    /// The event at the other end of the edge.
    pub other: EvId,
    /// Source span of the producing segment.
    pub span: Span,
    /// Whether this is the left endpoint of its edge.
    pub left: bool,
    /// Whether the chain assembler consumed this event already.
    pub used: bool,
    /// Input polygons owning this edge, xor-accumulated across overlaps.
    pub owner: u32,
    /// Input polygons whose interior lies just below this edge; valid
    /// while the edge sits in the status. After output classification it
    /// is reused as the boundary-side flag for path orientation.
    pub below: u32,
    /// Cached line equation.
    pub line: LineForm,
    /// Queue membership ([`NIL`] when absent).
    pub q_node: NodeIdx,
    /// Status membership ([`NIL`] when absent).
    pub s_node: NodeIdx,
    /// Chain-end store membership ([`NIL`] when absent).
    pub end_node: NodeIdx,
    /// Chain-ring neighbors; a slot pointing at the event itself marks an
    /// open end (both slots: an isolated node).
    pub ring: [EvId; 2],
}

impl Event {
    pub fn new(span: Span, p: PtId, left: bool, other: EvId) -> Self {
        Self {
            p,
            other,
            span,
            left,
            used: false,
            owner: 0,
            below: 0,
            line: LineForm::ZERO,
            q_node: NIL,
            s_node: NIL,
            end_node: NIL,
            ring: [0, 0],
        }
    }
}
