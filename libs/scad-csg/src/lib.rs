//! CSG lowering: evaluated SCAD tree in, solid CSG tree out.
//!
//! The visitor walks the SCAD tree threading a current transform and
//! graphics context, dispatches primitives to their constructors, and
//! groups boolean operators into ADD/SUB/CUT/XOR nodes. The constructors
//! share the tower builder for every stacked-cross-section solid and the
//! edge-pairing pass that establishes two-manifoldness.

pub mod edges;
pub mod tower;
pub mod triangulate;
pub mod visitor;

pub use visitor::lower_tree;
