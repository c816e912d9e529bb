//! CSG tree data model.
//!
//! The types shared by the lowering pass and the 2D boolean engine: the
//! matrix arena, the graphics context, the generic ADD/SUB/CUT/XOR node
//! shape, edge-consistent polyhedra, clockwise-canonical 2D polygons, and
//! the bounding-box folds.
//!
//! Everything here is plain owned data with index-based cross references;
//! the point/face/edge vectors of a [`Polyhedron`] are built once and never
//! resized after references into them exist.

pub mod bbox;
pub mod gc;
pub mod geom;
pub mod mat;
pub mod node;
pub mod poly2;
pub mod poly3;

pub use bbox::{solid_tree_bb, Aabb2, Aabb3};
pub use gc::{Color, Gc};
pub use mat::{Mat, MatArena, MatId};
pub use node::{CsgAdd, CsgCut, CsgNode, CsgSub, CsgXor, Solid, SphereSolid};
pub use poly2::{Path2, Polygon2, Vertex2};
pub use poly3::{Edge, EdgeId, Face, FaceId, PointId, PointRef, Polyhedron, Vertex3};
