//! # Matrix Arena
//!
//! The arena owns every affine transform created during lowering and hands
//! out stable [`MatId`]s. A [`Mat`] is a 3×4 affine transform (`DAffine3`)
//! with the determinant of its linear part cached at construction; the
//! determinant sign drives winding decisions downstream, so it is carried
//! through composition exactly (as a product) instead of being recomputed.
//!
//! Matrices are never mutated after insertion. Composition produces a new
//! arena entry.

use crate::geom::approx_eq;
use glam::{DAffine3, DMat3, DVec3};

// =============================================================================
// DEGREE TRIGONOMETRY
// =============================================================================

/// `(sin, cos)` of an angle in degrees, exact at multiples of 90°.
///
/// The exactness matters: a `rotate([0,0,90])` must map lattice points to
/// lattice points, or downstream rasterization produces spurious splits.
#[must_use]
pub fn sin_cos_deg(angle: f64) -> (f64, f64) {
    let r = angle.rem_euclid(360.0);
    if r == 0.0 {
        (0.0, 1.0)
    } else if r == 90.0 {
        (1.0, 0.0)
    } else if r == 180.0 {
        (0.0, -1.0)
    } else if r == 270.0 {
        (-1.0, 0.0)
    } else {
        r.to_radians().sin_cos()
    }
}

// =============================================================================
// MAT
// =============================================================================

/// An affine transform with cached determinant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat {
    /// The transform: linear 3×3 part plus translation column.
    pub n: DAffine3,
    /// Determinant of the linear part, tracked through composition.
    pub det: f64,
}

impl Mat {
    /// The identity transform.
    #[must_use]
    pub fn unit() -> Self {
        Self {
            n: DAffine3::IDENTITY,
            det: 1.0,
        }
    }

    /// Translation by `v`.
    #[must_use]
    pub fn translation(v: DVec3) -> Self {
        Self {
            n: DAffine3::from_translation(v),
            det: 1.0,
        }
    }

    /// Per-axis scale.
    #[must_use]
    pub fn scale(v: DVec3) -> Self {
        Self {
            n: DAffine3::from_scale(v),
            det: v.x * v.y * v.z,
        }
    }

    /// Uniform scale.
    #[must_use]
    pub fn scale_uniform(s: f64) -> Self {
        Self::scale(DVec3::splat(s))
    }

    /// Rotation about the x axis by `(sin, cos)`.
    #[must_use]
    pub fn rot_x((s, c): (f64, f64)) -> Self {
        Self::from_mat3(DMat3::from_cols(
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, c, s),
            DVec3::new(0.0, -s, c),
        ), 1.0)
    }

    /// Rotation about the y axis by `(sin, cos)`.
    #[must_use]
    pub fn rot_y((s, c): (f64, f64)) -> Self {
        Self::from_mat3(DMat3::from_cols(
            DVec3::new(c, 0.0, -s),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(s, 0.0, c),
        ), 1.0)
    }

    /// Rotation about the z axis by `(sin, cos)`.
    #[must_use]
    pub fn rot_z((s, c): (f64, f64)) -> Self {
        Self::from_mat3(DMat3::from_cols(
            DVec3::new(c, s, 0.0),
            DVec3::new(-s, c, 0.0),
            DVec3::new(0.0, 0.0, 1.0),
        ), 1.0)
    }

    /// Rotation about an arbitrary axis by `(sin, cos)`.
    ///
    /// The axis is normalized here; callers must reject zero axes first.
    #[must_use]
    pub fn rot_axis(axis: DVec3, (s, c): (f64, f64)) -> Self {
        let u = axis.normalize();
        let t = 1.0 - c;
        Self::from_mat3(
            DMat3::from_cols(
                DVec3::new(
                    t * u.x * u.x + c,
                    t * u.x * u.y + s * u.z,
                    t * u.x * u.z - s * u.y,
                ),
                DVec3::new(
                    t * u.x * u.y - s * u.z,
                    t * u.y * u.y + c,
                    t * u.y * u.z + s * u.x,
                ),
                DVec3::new(
                    t * u.x * u.z + s * u.y,
                    t * u.y * u.z - s * u.x,
                    t * u.z * u.z + c,
                ),
            ),
            1.0,
        )
    }

    /// Reflection about the plane through the origin with normal `v`.
    ///
    /// The normal is normalized here; callers must reject zero normals
    /// first.
    #[must_use]
    pub fn mirror(v: DVec3) -> Self {
        let u = v.normalize();
        Self::from_mat3(
            DMat3::from_cols(
                DVec3::new(
                    1.0 - 2.0 * u.x * u.x,
                    -2.0 * u.x * u.y,
                    -2.0 * u.x * u.z,
                ),
                DVec3::new(
                    -2.0 * u.x * u.y,
                    1.0 - 2.0 * u.y * u.y,
                    -2.0 * u.y * u.z,
                ),
                DVec3::new(
                    -2.0 * u.x * u.z,
                    -2.0 * u.y * u.z,
                    1.0 - 2.0 * u.z * u.z,
                ),
            ),
            -1.0,
        )
    }

    /// A `multmatrix` argument: the top three rows of a 4×4 matrix.
    ///
    /// Returns `None` when the linear part is not invertible.
    #[must_use]
    pub fn from_rows(rows: [[f64; 4]; 3]) -> Option<Self> {
        let m3 = DMat3::from_cols(
            DVec3::new(rows[0][0], rows[1][0], rows[2][0]),
            DVec3::new(rows[0][1], rows[1][1], rows[2][1]),
            DVec3::new(rows[0][2], rows[1][2], rows[2][2]),
        );
        let det = m3.determinant();
        if approx_eq(det, 0.0) {
            return None;
        }
        let t = DVec3::new(rows[0][3], rows[1][3], rows[2][3]);
        Some(Self {
            n: DAffine3::from_mat3_translation(m3, t),
            det,
        })
    }

    /// Composition `self · rhs` (apply `rhs` first).
    #[must_use]
    pub fn mul(&self, rhs: &Mat) -> Self {
        Self {
            n: self.n * rhs.n,
            det: self.det * rhs.det,
        }
    }

    /// Transform a point.
    #[inline]
    #[must_use]
    pub fn apply(&self, p: DVec3) -> DVec3 {
        self.n.transform_point3(p)
    }

    /// Whether the linear part only permutes and flips coordinate axes:
    /// every row and column has exactly one non-zero entry.
    ///
    /// Lowered cubes carry this so an STL writer can emit exact
    /// axis-aligned normals.
    #[must_use]
    pub fn is_rect_rot(&self) -> bool {
        let m = self.n.matrix3;
        let cols = [m.x_axis, m.y_axis, m.z_axis];
        let mut row_cnt = [0u32; 3];
        for col in &cols {
            let mut col_cnt = 0;
            for (r, v) in [col.x, col.y, col.z].into_iter().enumerate() {
                if !approx_eq(v, 0.0) {
                    col_cnt += 1;
                    row_cnt[r] += 1;
                }
            }
            if col_cnt != 1 {
                return false;
            }
        }
        row_cnt == [1, 1, 1]
    }

    fn from_mat3(m3: DMat3, det: f64) -> Self {
        Self {
            n: DAffine3::from_mat3(m3),
            det,
        }
    }
}

// =============================================================================
// ARENA
// =============================================================================

/// Stable handle to a matrix in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatId(pub u32);

/// Owns every matrix created during lowering for the lifetime of the tree.
///
/// ## Example
///
/// ```rust
/// use csg_tree::mat::{Mat, MatArena};
/// use glam::DVec3;
///
/// let mut arena = MatArena::new();
/// let unit = arena.unit();
/// let shifted = arena.compose(unit, &Mat::translation(DVec3::X));
/// assert_eq!(arena.get(shifted).apply(DVec3::ZERO), DVec3::X);
/// ```
#[derive(Debug, Default)]
pub struct MatArena {
    mats: Vec<Mat>,
}

impl MatArena {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared unit matrix (slot 0, created on first use).
    pub fn unit(&mut self) -> MatId {
        if self.mats.is_empty() {
            self.mats.push(Mat::unit());
        }
        MatId(0)
    }

    /// Insert a matrix.
    pub fn push(&mut self, m: Mat) -> MatId {
        // keep slot 0 reserved for the unit matrix
        self.unit();
        let id = MatId(self.mats.len() as u32);
        self.mats.push(m);
        id
    }

    /// `get(base) · op`, inserted as a new entry.
    pub fn compose(&mut self, base: MatId, op: &Mat) -> MatId {
        let m = self.get(base).mul(op);
        self.push(m)
    }

    /// Look up a matrix.
    #[must_use]
    pub fn get(&self, id: MatId) -> &Mat {
        &self.mats[id.0 as usize]
    }

    /// Number of matrices allocated.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mats.len()
    }

    /// Whether the arena holds no matrices yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mats.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degree_trig_is_exact_on_axes() {
        assert_eq!(sin_cos_deg(0.0), (0.0, 1.0));
        assert_eq!(sin_cos_deg(90.0), (1.0, 0.0));
        assert_eq!(sin_cos_deg(180.0), (0.0, -1.0));
        assert_eq!(sin_cos_deg(-90.0), (-1.0, 0.0));
        assert_eq!(sin_cos_deg(450.0), (1.0, 0.0));
    }

    #[test]
    fn rot_z_quarter_turn_maps_x_to_y() {
        let m = Mat::rot_z(sin_cos_deg(90.0));
        let p = m.apply(DVec3::X);
        assert_eq!(p, DVec3::Y);
        assert_eq!(m.det, 1.0);
    }

    #[test]
    fn mirror_flips_determinant_and_reflects() {
        let m = Mat::mirror(DVec3::X);
        assert_eq!(m.det, -1.0);
        let p = m.apply(DVec3::new(2.0, 3.0, 4.0));
        assert!((p - DVec3::new(-2.0, 3.0, 4.0)).length() < 1e-12);
    }

    #[test]
    fn composition_multiplies_determinants() {
        let a = Mat::scale(DVec3::new(2.0, 3.0, 1.0));
        let b = Mat::mirror(DVec3::Y);
        let c = a.mul(&b);
        assert_eq!(c.det, -6.0);
    }

    #[test]
    fn singular_multmatrix_is_rejected() {
        let rows = [
            [1.0, 0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ];
        assert!(Mat::from_rows(rows).is_none());
    }

    #[test]
    fn multmatrix_keeps_translation_column() {
        let rows = [
            [1.0, 0.0, 0.0, 5.0],
            [0.0, 1.0, 0.0, 6.0],
            [0.0, 0.0, 1.0, 7.0],
        ];
        let m = Mat::from_rows(rows).unwrap();
        assert_eq!(m.apply(DVec3::ZERO), DVec3::new(5.0, 6.0, 7.0));
    }

    #[test]
    fn rect_rot_detection() {
        assert!(Mat::unit().is_rect_rot());
        assert!(Mat::rot_z(sin_cos_deg(90.0)).is_rect_rot());
        assert!(Mat::scale(DVec3::new(2.0, 1.0, 1.0)).is_rect_rot());
        assert!(!Mat::rot_z(sin_cos_deg(45.0)).is_rect_rot());
    }

    #[test]
    fn arena_reserves_unit_slot() {
        let mut arena = MatArena::new();
        let id = arena.push(Mat::translation(DVec3::X));
        assert_eq!(arena.unit(), MatId(0));
        assert_eq!(id, MatId(1));
        assert_eq!(arena.get(MatId(0)).det, 1.0);
    }

    #[test]
    fn axis_angle_matches_euler_for_z() {
        let a = Mat::rot_axis(DVec3::Z, sin_cos_deg(30.0));
        let b = Mat::rot_z(sin_cos_deg(30.0));
        let p = DVec3::new(1.0, 2.0, 3.0);
        assert!((a.apply(p) - b.apply(p)).length() < 1e-12);
    }
}
