//! Value model of the veld front end consumed by later compilation stages.
//!
//! The analysis passes downstream of the parser (kernel classification,
//! reflection, code generation) never hold live references into the mutable
//! AST. Instead, this crate defines immutable value copies of the pieces
//! they need: function and parameter declarations reduced to their
//! classification-relevant shape, source spans for diagnostics, the target
//! API level, and the diagnostic records those passes produce.

#![forbid(unsafe_code)]

pub mod decl;
pub mod diag;
pub mod version;

pub use crate::decl::{FunctionDecl, ParamDecl, PointeeKind, Span, TypeHandle, TypeShape};
pub use crate::diag::{CollectedDiags, DiagSink, Diagnostic, Severity};
pub use crate::version::{
    TargetApi, FLEXIBLE_SIGNATURE_API, MINIMUM_TARGET_API, NAMED_KERNEL_API,
};
