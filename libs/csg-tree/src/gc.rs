//! # Graphics Context
//!
//! The RGBA color and modifier bitmask threaded by value down the lowering
//! recursion. `color()` nodes replace the rgb channels only when the source
//! marked them valid; alpha always applies. Node modifiers OR into the
//! context on descent.

use scad_ast::Modifier;

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Construct from an `[r, g, b, a]` array.
    #[must_use]
    pub fn from_rgba(rgba: [u8; 4]) -> Self {
        Self {
            r: rgba[0],
            g: rgba[1],
            b: rgba[2],
            a: rgba[3],
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::from_rgba(config::DEFAULT_COLOR)
    }
}

/// Graphics context carried per subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Gc {
    /// Current color.
    pub color: Color,
    /// Accumulated modifier flags.
    pub modifier: Modifier,
}

impl Gc {
    /// Apply a `color()` node: rgb only if valid, alpha always.
    #[must_use]
    pub fn with_color(mut self, rgba: [u8; 4], rgb_valid: bool) -> Self {
        if rgb_valid {
            self.color.r = rgba[0];
            self.color.g = rgba[1];
            self.color.b = rgba[2];
        }
        self.color.a = rgba[3];
        self
    }
}
