//! Shared configuration crate holding constants used across the workspace.
//!
//! The `constants` module exposes the tolerances and defaults so downstream
//! crates avoid sprinkling magic numbers. Example:
//!
//! ```
//! use config::{EPSILON, GRID};
//!
//! assert!(EPSILON < GRID);
//! ```

pub mod constants;

pub use constants::{DEFAULT_COLOR, DEFAULT_MAX_FN, EPSILON, GRID, MIN_FN};
