//! Evaluated OpenSCAD tree types and the diagnostic sink.
//!
//! This crate is the upstream interface of the lowering pipeline: the parser
//! and evaluator (external) produce a tree of [`ScadNode`]s with all
//! expressions resolved (sizes are concrete numbers, point lists are plain
//! arrays), and every node carries a [`Span`] back into the source text.
//!
//! The downstream crates never read source text; spans are opaque tokens
//! that only travel into [`Diagnostic`] records.

pub mod ast;
pub mod diag;
pub mod options;
pub mod span;

pub use ast::{Modifier, Rotation, ScadKind, ScadNode, ScadPoint2, ScadPoint3};
pub use diag::{Diagnostic, Diagnostics, Fatal, Severity};
pub use options::Options;
pub use span::Span;
