//! # Configuration Constants
//!
//! Centralized constants for the SCAD-to-slice pipeline. All geometry
//! comparisons, rasterization parameters, and default resolution values are
//! defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Rasterization**: Coordinate grid for the plane-sweep engine
//! - **Resolution**: Default tessellation parameters ($fn)
//! - **Appearance**: Default geometry color

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for general floating-point comparisons.
///
/// Used by the epsilon comparators (`approx_eq` and friends) for scalar
/// decisions: zero scale vectors, degenerate radii, collinearity sums.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-9;

/// Grid size for plane-sweep coordinate rasterization.
///
/// Every coordinate entering the 2D boolean engine is snapped to a multiple
/// of this value, so points closer than half a grid step collapse into one
/// point object. A power of two keeps the snap multiplication exact in
/// binary floating point.
///
/// # Example
///
/// ```rust
/// use config::constants::GRID;
///
/// let snapped = GRID * (0.500_3_f64 / GRID).round();
/// assert!((snapped - 0.500_3).abs() <= GRID / 2.0);
/// ```
pub const GRID: f64 = 0.000_976_562_5; // 2^-10

// =============================================================================
// RESOLUTION CONSTANTS
// =============================================================================

/// Default cap on the number of fragments for circular shapes.
///
/// When a primitive requests more segments than this (or requests the
/// default), the fragment count saturates here unless the shape can stay
/// analytic (see `scad-csg`'s `effective_fn`).
pub const DEFAULT_MAX_FN: u32 = 100;

/// Lower bound on the number of fragments for circular shapes.
///
/// Fewer than three segments cannot enclose area.
pub const MIN_FN: u32 = 3;

// =============================================================================
// APPEARANCE CONSTANTS
// =============================================================================

/// Default geometry color (RGBA), applied before any `color()` operator.
pub const DEFAULT_COLOR: [u8; 4] = [220, 220, 64, 255];

// =============================================================================
// TESTS
// =============================================================================
