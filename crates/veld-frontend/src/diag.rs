//! Diagnostic records and the sink analysis passes report into.

use crate::decl::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

/// One rendered diagnostic, anchored to a source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub span: Span,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn error(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// Append-only diagnostic sink.
///
/// Reporting never fails and sinks must not reorder or drop records; a pass
/// may report several diagnostics for the same declaration and they are not
/// deduplicated.
pub trait DiagSink {
    fn report(&mut self, diag: Diagnostic);
}

/// A sink that keeps every reported diagnostic, in report order.
#[derive(Debug, Default)]
pub struct CollectedDiags {
    diags: Vec<Diagnostic>,
}

impl CollectedDiags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.diags
    }

    pub fn len(&self) -> usize {
        self.diags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diags.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.diags
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }
}

impl DiagSink for CollectedDiags {
    fn report(&mut self, diag: Diagnostic) {
        self.diags.push(diag);
    }
}
