//! # 2D Polygon
//!
//! The polygon representation shared by the 2D primitives, the plane-sweep
//! engine and the layer driver: a point vector (coordinate, color, span)
//! and a set of paths, each an index loop into the point vector. After
//! canonicalization every path runs clockwise; the sweep engine emits
//! exteriors clockwise and holes counterclockwise.

use crate::gc::Color;
use crate::geom::{approx_eq, right_cross_z};
use glam::DVec2;
use scad_ast::Span;

/// A 2D point with color and source span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex2 {
    /// Coordinate.
    pub coord: DVec2,
    /// Color at the producing node.
    pub color: Color,
    /// Source span, for diagnostics only.
    pub span: Span,
}

/// One closed path: an ordered index loop into the owning polygon's points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path2 {
    /// Point indices, consecutive pairs (with wrap) forming the edges.
    pub point_idx: Vec<usize>,
}

/// A polygon: points plus index paths.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon2 {
    /// Point vector.
    pub points: Vec<Vertex2>,
    /// Paths into `points`.
    pub paths: Vec<Path2>,
}

impl Polygon2 {
    /// Create an empty polygon.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the polygon encloses nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Coordinate of path point `i` of `path` (with wrap).
    #[inline]
    #[must_use]
    pub fn path_coord(&self, path: &Path2, i: usize) -> DVec2 {
        self.points[path.point_idx[i % path.point_idx.len()]].coord
    }

    /// Clockwise-positive area sum of one path (twice the signed area,
    /// clockwise positive).
    #[must_use]
    pub fn path_cross_sum(&self, path: &Path2) -> f64 {
        let n = path.point_idx.len();
        let mut sum = 0.0;
        for j0 in 0..n {
            sum += right_cross_z(
                self.path_coord(path, j0),
                self.path_coord(path, j0 + 1),
                self.path_coord(path, j0 + 2),
            );
        }
        sum
    }

    /// Ensure every path runs clockwise, reversing those that do not.
    ///
    /// Returns whether any path needed reversal. Paths with a vanishing
    /// area sum indicate degenerate input; in debug builds that trips an
    /// assertion.
    pub fn make_clockwise(&mut self) -> bool {
        let mut rev = false;
        for pi in 0..self.paths.len() {
            let sum = self.path_cross_sum(&self.paths[pi]);
            debug_assert!(!approx_eq(sum, 0.0), "degenerate path area");
            if sum < 0.0 {
                rev = true;
                self.paths[pi].point_idx.reverse();
            }
        }
        rev
    }

    /// Append another polygon's points and paths, rebasing its indices.
    pub fn merge(&mut self, other: Polygon2) {
        let base = self.points.len();
        self.points.extend(other.points);
        self.paths.extend(other.paths.into_iter().map(|mut p| {
            for idx in &mut p.point_idx {
                *idx += base;
            }
            p
        }));
    }

    /// Total number of path points across all paths.
    #[must_use]
    pub fn path_point_count(&self) -> usize {
        self.paths.iter().map(|p| p.point_idx.len()).sum()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn poly_from(coords: &[(f64, f64)]) -> Polygon2 {
        let mut p = Polygon2::new();
        for &(x, y) in coords {
            p.points.push(Vertex2 {
                coord: DVec2::new(x, y),
                color: Color::default(),
                span: Span::synthetic(),
            });
        }
        p.paths.push(Path2 {
            point_idx: (0..coords.len()).collect(),
        });
        p
    }

    #[test]
    fn counterclockwise_path_is_reversed() {
        // counterclockwise square
        let mut p = poly_from(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        assert!(p.make_clockwise());
        assert!(p.path_cross_sum(&p.paths[0]) > 0.0);
    }

    #[test]
    fn clockwise_path_is_kept() {
        let mut p = poly_from(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        assert!(!p.make_clockwise());
    }

    #[test]
    fn merge_rebases_path_indices() {
        let mut a = poly_from(&[(0.0, 0.0), (0.0, 1.0), (1.0, 0.0)]);
        let b = poly_from(&[(2.0, 0.0), (2.0, 1.0), (3.0, 0.0)]);
        a.merge(b);
        assert_eq!(a.points.len(), 6);
        assert_eq!(a.paths.len(), 2);
        assert_eq!(a.paths[1].point_idx, vec![3, 4, 5]);
    }
}
