//! # Evaluated SCAD Nodes
//!
//! The node types consumed by the lowering pass. All values are fully
//! resolved: no variables, no expressions, no ranges. The set of node
//! kinds mirrors the subset of OpenSCAD the slicing pipeline accepts:
//! boolean operators, affine transforms, `color`, `linear_extrude`, the
//! 3D primitives and the 2D primitives.

use crate::span::Span;
use serde::{Deserialize, Serialize};

// =============================================================================
// MODIFIER
// =============================================================================

/// Root modifier flags (`*`, `!`, `#`, `%` in SCAD source).
///
/// Stored as a bitmask so a node can carry several and the lowering context
/// can OR them together on descent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub struct Modifier(pub u8);

impl Modifier {
    /// `*`: disable; the subtree is skipped entirely.
    pub const IGNORE: Modifier = Modifier(1);
    /// `!`: show only this subtree.
    pub const ROOT: Modifier = Modifier(2);
    /// `#`: highlight.
    pub const HIGHLIGHT: Modifier = Modifier(4);
    /// `%`: background.
    pub const BACKGROUND: Modifier = Modifier(8);

    /// No modifier.
    pub const NONE: Modifier = Modifier(0);

    /// Whether all flags in `other` are set.
    #[must_use]
    pub fn contains(self, other: Modifier) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Whether no flag is set.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for Modifier {
    type Output = Modifier;
    fn bitor(self, rhs: Modifier) -> Modifier {
        Modifier(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for Modifier {
    fn bitor_assign(&mut self, rhs: Modifier) {
        self.0 |= rhs.0;
    }
}

// =============================================================================
// SCAD NODE
// =============================================================================

/// One evaluated SCAD statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScadNode {
    /// What the statement is, with its resolved fields.
    pub kind: ScadKind,
    /// Root modifier flags on this statement.
    pub modifier: Modifier,
    /// Source span of the statement.
    pub span: Span,
}

impl ScadNode {
    /// Create a node without modifiers.
    #[must_use]
    pub fn new(kind: ScadKind, span: Span) -> Self {
        Self {
            kind,
            modifier: Modifier::NONE,
            span,
        }
    }

    /// Create a node with modifiers.
    #[must_use]
    pub fn with_modifier(kind: ScadKind, modifier: Modifier, span: Span) -> Self {
        Self { kind, modifier, span }
    }
}

/// A 3D point literal with its own source span.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScadPoint3 {
    /// Coordinate.
    pub coord: [f64; 3],
    /// Span of the point literal.
    pub span: Span,
}

/// A 2D point literal with its own source span.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScadPoint2 {
    /// Coordinate.
    pub coord: [f64; 2],
    /// Span of the point literal.
    pub span: Span,
}

/// How a `rotate()` was written.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Rotation {
    /// `rotate(a, v)`: rotate by `angle` degrees around the axis `v`.
    AxisAngle {
        /// Rotation axis (need not be normalized).
        axis: [f64; 3],
        /// Angle in degrees.
        angle: f64,
    },
    /// `rotate([x, y, z])`: the Euler form `Rz · Ry · Rx` in degrees.
    Euler([f64; 3]),
}

/// The resolved statement kinds.
///
/// ## Variants
///
/// Boolean operators carry child lists; transforms carry one resolved
/// parameter plus children; primitives carry their resolved fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScadKind {
    // =========================================================================
    // BOOLEAN OPERATORS
    // =========================================================================
    /// `union() { ... }` (also `group()`).
    Union {
        /// Child statements.
        children: Vec<ScadNode>,
    },

    /// `difference() { ... }`: first non-empty child minus the rest.
    Difference {
        /// Child statements.
        children: Vec<ScadNode>,
    },

    /// `intersection() { ... }`.
    Intersection {
        /// Child statements.
        children: Vec<ScadNode>,
    },

    // =========================================================================
    // TRANSFORMS
    // =========================================================================
    /// `translate(v) { ... }`.
    Translate {
        /// Offset vector.
        v: [f64; 3],
        /// Child statements.
        children: Vec<ScadNode>,
    },

    /// `mirror(v) { ... }`: reflect about the plane with normal `v`.
    Mirror {
        /// Plane normal (must not be zero).
        v: [f64; 3],
        /// Child statements.
        children: Vec<ScadNode>,
    },

    /// `scale(v) { ... }`.
    Scale {
        /// Per-axis scale factors.
        v: [f64; 3],
        /// Child statements.
        children: Vec<ScadNode>,
    },

    /// `rotate(...) { ... }`.
    Rotate {
        /// Axis-angle or Euler form.
        rotation: Rotation,
        /// Child statements.
        children: Vec<ScadNode>,
    },

    /// `multmatrix(m) { ... }`: the top three rows of the 4×4 matrix.
    Multmatrix {
        /// Row-major 3×4 affine matrix.
        rows: [[f64; 4]; 3],
        /// Child statements.
        children: Vec<ScadNode>,
    },

    /// `color(c, alpha) { ... }`.
    Color {
        /// RGBA color; `rgb_valid` tells whether the rgb part applies.
        rgba: [u8; 4],
        /// Whether the rgb channels were given (a named color or vector).
        /// Alpha always applies.
        rgb_valid: bool,
        /// Child statements.
        children: Vec<ScadNode>,
    },

    // =========================================================================
    // 2D -> 3D
    // =========================================================================
    /// `linear_extrude(...) { ... }`: children are lowered in 2D context.
    LinearExtrude {
        /// Extrusion height (must be positive).
        height: f64,
        /// Center the result on z=0.
        center: bool,
        /// Number of slices along the height (must be at least 1).
        slices: u32,
        /// Total twist in degrees over the full height.
        twist: f64,
        /// XY scale at the top relative to the bottom.
        scale: [f64; 2],
        /// Child statements (2D).
        children: Vec<ScadNode>,
    },

    // =========================================================================
    // 3D PRIMITIVES
    // =========================================================================
    /// `sphere(r)`.
    Sphere {
        /// Radius.
        r: f64,
        /// `$fn`: requested fragment count (0 = default).
        fn_: u32,
    },

    /// `cube(size, center)`.
    Cube {
        /// Size as `[x, y, z]`.
        size: [f64; 3],
        /// Whether centered at the origin.
        center: bool,
    },

    /// `cylinder(h, r1, r2, center)`.
    Cylinder {
        /// Height.
        h: f64,
        /// Bottom radius.
        r1: f64,
        /// Top radius.
        r2: f64,
        /// Whether centered on z=0.
        center: bool,
        /// `$fn`: requested fragment count (0 = default).
        fn_: u32,
    },

    /// `polyhedron(points, faces)`.
    Polyhedron {
        /// Vertex coordinates.
        points: Vec<ScadPoint3>,
        /// Faces as index loops into `points`, outward-facing order.
        faces: Vec<Vec<usize>>,
    },

    // =========================================================================
    // 2D PRIMITIVES
    // =========================================================================
    /// `circle(r)`.
    Circle {
        /// Radius.
        r: f64,
        /// `$fn`: requested fragment count (0 = default).
        fn_: u32,
    },

    /// `square(size, center)`.
    Square {
        /// Size as `[x, y]`.
        size: [f64; 2],
        /// Whether centered at the origin.
        center: bool,
    },

    /// `polygon(points, paths)`.
    Polygon {
        /// Vertex coordinates.
        points: Vec<ScadPoint2>,
        /// Paths as index loops into `points`. Empty means one implicit
        /// path over all points in order.
        paths: Vec<Vec<usize>>,
    },
}

impl ScadKind {
    /// The statement name as written in SCAD source.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ScadKind::Union { .. } => "union",
            ScadKind::Difference { .. } => "difference",
            ScadKind::Intersection { .. } => "intersection",
            ScadKind::Translate { .. } => "translate",
            ScadKind::Mirror { .. } => "mirror",
            ScadKind::Scale { .. } => "scale",
            ScadKind::Rotate { .. } => "rotate",
            ScadKind::Multmatrix { .. } => "multmatrix",
            ScadKind::Color { .. } => "color",
            ScadKind::LinearExtrude { .. } => "linear_extrude",
            ScadKind::Sphere { .. } => "sphere",
            ScadKind::Cube { .. } => "cube",
            ScadKind::Cylinder { .. } => "cylinder",
            ScadKind::Polyhedron { .. } => "polyhedron",
            ScadKind::Circle { .. } => "circle",
            ScadKind::Square { .. } => "square",
            ScadKind::Polygon { .. } => "polygon",
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_bit_ops() {
        let m = Modifier::HIGHLIGHT | Modifier::BACKGROUND;
        assert!(m.contains(Modifier::HIGHLIGHT));
        assert!(m.contains(Modifier::BACKGROUND));
        assert!(!m.contains(Modifier::IGNORE));
        assert!(Modifier::NONE.is_empty());
    }

    #[test]
    fn node_names_match_scad_keywords() {
        let node = ScadKind::Cube {
            size: [1.0, 1.0, 1.0],
            center: false,
        };
        assert_eq!(node.name(), "cube");
    }

    #[test]
    fn tree_roundtrips_through_serde() {
        let node = ScadNode::new(
            ScadKind::Translate {
                v: [1.0, 0.0, 0.0],
                children: vec![ScadNode::new(
                    ScadKind::Sphere { r: 2.0, fn_: 12 },
                    Span::new(10, 22),
                )],
            },
            Span::new(0, 23),
        );
        let json = serde_json::to_string(&node).unwrap();
        let back: ScadNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back.span, node.span);
        match back.kind {
            ScadKind::Translate { v, children } => {
                assert_eq!(v, [1.0, 0.0, 0.0]);
                assert_eq!(children.len(), 1);
            }
            other => panic!("expected translate, got {}", other.name()),
        }
    }
}
