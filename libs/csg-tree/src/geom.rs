//! # Scalar and Orientation Predicates
//!
//! Epsilon comparators and the 2D orientation primitive every other module
//! agrees on. The orientation sign convention is clockwise-positive: paths
//! are canonically clockwise, so a clockwise turn is the "normal" case and
//! reads positive throughout the crate.

use config::EPSILON;
use glam::DVec2;

// =============================================================================
// EPSILON COMPARATORS
// =============================================================================

/// `a == b` within [`EPSILON`].
#[inline]
#[must_use]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// `a <= b` within [`EPSILON`].
#[inline]
#[must_use]
pub fn approx_le(a: f64, b: f64) -> bool {
    a - b < EPSILON
}

/// `a < b` within [`EPSILON`].
#[inline]
#[must_use]
pub fn approx_lt(a: f64, b: f64) -> bool {
    b - a > EPSILON
}

/// `a > b` within [`EPSILON`].
#[inline]
#[must_use]
pub fn approx_gt(a: f64, b: f64) -> bool {
    approx_lt(b, a)
}

/// `a >= b` within [`EPSILON`].
#[inline]
#[must_use]
pub fn approx_ge(a: f64, b: f64) -> bool {
    approx_le(b, a)
}

// =============================================================================
// ORIENTATION
// =============================================================================

/// Clockwise-positive cross product of the turn `a -> o -> b`.
///
/// Positive when the triple turns right (clockwise), negative when it
/// turns left. Summed over a closed path this is positive exactly for
/// clockwise paths.
#[inline]
#[must_use]
pub fn right_cross_z(a: DVec2, o: DVec2, b: DVec2) -> f64 {
    let u = o - a;
    let v = b - o;
    // negated standard (counterclockwise-positive) cross
    u.y * v.x - u.x * v.y
}

/// Sign of [`right_cross_z`]: `+1` clockwise, `-1` counterclockwise,
/// `0` collinear (within [`EPSILON`]).
///
/// For an edge `a -> o` running left to right, `+1` means `b` lies below
/// the edge and `-1` above.
#[inline]
#[must_use]
pub fn right_normal_z(a: DVec2, o: DVec2, b: DVec2) -> i32 {
    let z = right_cross_z(a, o, b);
    if approx_eq(z, 0.0) {
        0
    } else if z > 0.0 {
        1
    } else {
        -1
    }
}

/// Lexicographic comparison of 2D coordinates: x first, then y.
#[inline]
#[must_use]
pub fn lex_cmp(a: DVec2, b: DVec2) -> std::cmp::Ordering {
    a.x.partial_cmp(&b.x)
        .unwrap_or(std::cmp::Ordering::Equal)
        .then(a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
}

// =============================================================================
// TESTS
// =============================================================================
