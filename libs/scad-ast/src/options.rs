//! # Lowering Options
//!
//! The configuration record threaded through the lowering pass: the
//! fragment cap for circular shapes and the severity assigned to each
//! class of invalid user input. Topology errors, unsupported features and
//! internal errors are not configurable; they are always fatal.

use crate::diag::Severity;
use serde::{Deserialize, Serialize};

/// Lowering configuration.
///
/// ## Example
///
/// ```rust
/// use scad_ast::{Options, Severity};
///
/// let opts = Options {
///     err_empty: Severity::Warning,
///     ..Options::default()
/// };
/// assert_eq!(opts.max_fn, config::DEFAULT_MAX_FN);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// Maximum polygon segments for circular shapes.
    pub max_fn: u32,
    /// Severity for empty geometry (zero radius, zero scale, h <= 0).
    pub err_empty: Severity,
    /// Severity for collapsing transforms (non-invertible multmatrix,
    /// zero scale component).
    pub err_collapse: Severity,
    /// Severity for a 2D primitive outside a 2D context.
    pub err_outside_2d: Severity,
    /// Severity for a 3D primitive outside a 3D context.
    pub err_outside_3d: Severity,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_fn: config::DEFAULT_MAX_FN,
            err_empty: Severity::Fatal,
            err_collapse: Severity::Fatal,
            err_outside_2d: Severity::Fatal,
            err_outside_3d: Severity::Fatal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_strict() {
        let opts = Options::default();
        assert_eq!(opts.err_empty, Severity::Fatal);
        assert_eq!(opts.err_collapse, Severity::Fatal);
        assert_eq!(opts.max_fn, config::DEFAULT_MAX_FN);
    }
}
