//! # Diagnostics
//!
//! The sink every stage reports through. A record carries a severity, up to
//! two source spans (the offending construct, and for pairing conflicts
//! the earlier occurrence), and a rendered message.
//!
//! Severity is decided by the caller, usually from [`crate::Options`]:
//! user-input classes are configurable, topology and internal classes are
//! always fatal. Reporting a fatal record returns [`Fatal`], which lowering
//! propagates with `?`; warnings accumulate; `Ignore` drops the record.

use crate::span::Span;
use thiserror::Error;

// =============================================================================
// SEVERITY
// =============================================================================

/// How a diagnostic class is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Severity {
    /// Record and abort the operation.
    Fatal,
    /// Record and continue.
    Warning,
    /// Drop silently.
    Ignore,
}

/// Marker error: a fatal diagnostic was recorded.
///
/// The record itself lives in the sink; this value only unwinds the
/// recursion. Callers discard partial output when they see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("fatal diagnostic reported")]
pub struct Fatal;

// =============================================================================
// DIAGNOSTIC
// =============================================================================

/// One reported record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Effective severity (never `Ignore`).
    pub severity: Severity,
    /// Span of the offending construct.
    pub primary: Span,
    /// Span of a related earlier construct (duplicate point, paired edge).
    pub secondary: Option<Span>,
    /// Rendered message.
    pub message: String,
}

/// Accumulating diagnostic sink.
///
/// ## Example
///
/// ```rust
/// use scad_ast::{Diagnostics, Severity, Span};
///
/// let mut diags = Diagnostics::new();
/// diags
///     .report(Severity::Warning, Span::new(0, 4), None, "suspicious scale")
///     .unwrap();
/// assert_eq!(diags.entries().len(), 1);
/// assert!(!diags.has_fatal());
/// ```
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    fatal: bool,
}

impl Diagnostics {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a record under the given severity.
    ///
    /// Returns `Err(Fatal)` exactly when `severity` is fatal, so call sites
    /// read `diags.report(...)?`.
    pub fn report(
        &mut self,
        severity: Severity,
        primary: Span,
        secondary: Option<Span>,
        message: impl Into<String>,
    ) -> Result<(), Fatal> {
        match severity {
            Severity::Ignore => Ok(()),
            Severity::Warning => {
                self.entries.push(Diagnostic {
                    severity,
                    primary,
                    secondary,
                    message: message.into(),
                });
                Ok(())
            }
            Severity::Fatal => {
                self.entries.push(Diagnostic {
                    severity,
                    primary,
                    secondary,
                    message: message.into(),
                });
                self.fatal = true;
                Err(Fatal)
            }
        }
    }

    /// Report an always-fatal record.
    pub fn fail(
        &mut self,
        primary: Span,
        secondary: Option<Span>,
        message: impl Into<String>,
    ) -> Fatal {
        let _ = self.report(Severity::Fatal, primary, secondary, message);
        Fatal
    }

    /// Report an internal invariant violation. Always fatal; the message is
    /// tagged so users know the input is not to blame.
    pub fn internal(&mut self, primary: Span, message: impl Into<String>) -> Fatal {
        self.fail(
            primary,
            None,
            format!("internal error: {}", message.into()),
        )
    }

    /// Recorded entries, in report order.
    #[must_use]
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Whether a fatal record was seen.
    #[must_use]
    pub fn has_fatal(&self) -> bool {
        self.fatal
    }
}

// =============================================================================
// TESTS
// =============================================================================
