//! Structured diagnostics collected during evaluation.
//!
//! The engine sits on the hot path of every keystroke-level form edit, so
//! nothing in it throws: recoverable conditions (an unrecognized show_if
//! operator, a malformed formula, an exhausted pass bound) are recorded as
//! findings in a collector threaded `&mut` through the internals. Callers
//! that only want the value use the plain entry points, which evaluate
//! with a discarded collector.

use serde::Serialize;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Info,
    Warning,
}

/// What condition a diagnostic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticCode {
    /// A show_if carried an operator outside equals/not_equals/and/or;
    /// evaluation failed open (visible).
    UnknownShowIfOperator,
    /// A formula failed to lex, parse, or evaluate; the cell or field was
    /// left at its safe default.
    FormulaError,
    /// Table formulas did not stabilize within the pass bound; the last
    /// computed values were returned.
    ConvergenceExceeded,
    /// Global formulas did not stabilize within the pass bound (a formula
    /// cycle); the last computed values were returned.
    PassBoundExceeded,
}

/// One recorded finding.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,
    /// Field or table cell the finding is anchored to, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_id: Option<String>,
}

/// Append-only collector threaded through engine internals.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics {
            entries: Vec::new(),
        }
    }

    pub fn warn(&mut self, code: DiagnosticCode, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            code,
            severity: Severity::Warning,
            message: message.into(),
            field_id: None,
        });
    }

    pub fn warn_field(
        &mut self,
        code: DiagnosticCode,
        field_id: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.entries.push(Diagnostic {
            code,
            severity: Severity::Warning,
            message: message.into(),
            field_id: Some(field_id.into()),
        });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move all accumulated findings out, leaving the collector empty.
    pub fn drain(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.entries)
    }

    /// Append another collector's findings (used when composing engines).
    pub fn absorb(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
