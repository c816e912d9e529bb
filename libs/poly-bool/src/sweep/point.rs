//! # Rasterized Points
//!
//! Every coordinate entering the sweep is snapped onto the `config::GRID`
//! lattice and deduplicated through an exact integer-grid map, so equal
//! coordinates become the same point id and all downstream equality and
//! ordering is id- and integer-based, hence transitive and symmetric no
//! matter how the floats were produced.
//!
//! Each point caches its index in the output polygon's point vector once
//! the chain assembler allocates it.

use config::GRID;
use glam::DVec2;
use scad_ast::Span;
use std::collections::BTreeMap;

/// Index into [`PointStore`].
pub(crate) type PtId = u32;

/// Snap one coordinate onto the grid.
#[inline]
#[must_use]
pub(crate) fn rasterize(v: f64) -> f64 {
    GRID * (v / GRID).round()
}

#[inline]
fn grid_key(v: f64) -> i64 {
    let k = (v / GRID).round();
    debug_assert!(k.abs() < 9.0e18, "coordinate out of rasterizable range");
    k as i64
}

/// Grid-scale strictly-greater comparison (half a grid step of slack).
#[inline]
#[must_use]
pub(crate) fn pt_gt(a: f64, b: f64) -> bool {
    a - b > GRID * 0.5
}

/// Grid-scale equality (within half a grid step).
#[inline]
#[must_use]
pub(crate) fn pt_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= GRID * 0.5
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct SweepPoint {
    /// Snapped coordinate.
    pub coord: DVec2,
    /// Exact lattice position; ordering and equality use this.
    pub grid: (i64, i64),
    /// Span of the first construct that produced this point.
    pub span: Span,
    /// Cached index into the output polygon's point vector.
    pub out_idx: Option<u32>,
}

/// Deduplicating store of rasterized points.
#[derive(Debug, Default)]
pub(crate) struct PointStore {
    points: Vec<SweepPoint>,
    by_grid: BTreeMap<(i64, i64), PtId>,
}

impl PointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a coordinate; equal lattice positions return the same id.
    pub fn insert(&mut self, span: Span, coord: DVec2) -> PtId {
        let grid = (grid_key(coord.x), grid_key(coord.y));
        if let Some(&id) = self.by_grid.get(&grid) {
            return id;
        }
        // reconstruct the coordinate from the lattice so identical grid
        // cells carry bit-identical floats (and -0.0 normalizes away)
        let snapped = DVec2::new(GRID * grid.0 as f64, GRID * grid.1 as f64);
        let id = self.points.len() as PtId;
        self.points.push(SweepPoint {
            coord: snapped,
            grid,
            span,
            out_idx: None,
        });
        self.by_grid.insert(grid, id);
        id
    }

    #[inline]
    pub fn coord(&self, id: PtId) -> DVec2 {
        self.points[id as usize].coord
    }

    #[inline]
    pub fn span(&self, id: PtId) -> Span {
        self.points[id as usize].span
    }

    #[inline]
    pub fn out_idx(&self, id: PtId) -> Option<u32> {
        self.points[id as usize].out_idx
    }

    #[inline]
    pub fn set_out_idx(&mut self, id: PtId, idx: u32) {
        self.points[id as usize].out_idx = Some(idx);
    }

    /// Lexicographic comparison by lattice position: x, then y.
    #[inline]
    pub fn cmp(&self, a: PtId, b: PtId) -> i32 {
        if a == b {
            return 0;
        }
        let ga = self.points[a as usize].grid;
        let gb = self.points[b as usize].grid;
        match ga.cmp(&gb) {
            std::cmp::Ordering::Less => -1,
            std::cmp::Ordering::Equal => 0,
            std::cmp::Ordering::Greater => 1,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
