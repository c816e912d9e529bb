//! Plane-sweep 2D boolean engine and the layer driver.
//!
//! The engine combines two polygons under one of ADD / SUB / CUT / XOR and
//! produces non-self-intersecting, disjoint output paths with clockwise
//! exteriors and counterclockwise holes. The sweep runs left to right over
//! a queue of endpoint events, maintains the active edges in a status
//! dictionary ordered by vertical position, and assembles output edges
//! into rings through an endpoint store.
//!
//! The layer driver projects a lowered 3D tree into a per-slice 2D tree
//! and reduces each slice bottom-up with the engine.

pub mod dict;
pub mod layer;
pub mod sweep;

pub use layer::{LayerSet, Slice, SliceTree, Stack};
pub use sweep::{flatten, op_poly, reduce_group, BoolOp};
