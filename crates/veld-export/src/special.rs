//! Special-form classification for exported functions.
//!
//! Three names are reserved: `root` doubles as the graphics entry point and
//! the default compute kernel, `init` runs once at module load, and the
//! compiler-reserved `.veld.dtor` runs at teardown. Everything else is
//! either a compute kernel candidate (routed into signature
//! classification) or an ordinary exported function.

use veld_frontend::decl::{FunctionDecl, Span, TypeShape};
use veld_frontend::diag::{DiagSink, Diagnostic};
use veld_frontend::version::TargetApi;

use crate::error::KernelError;

/// Reserved name of the graphics entry point / default kernel.
pub const ROOT_NAME: &str = "root";
/// Reserved name of the module lifecycle initializer.
pub const INIT_NAME: &str = "init";
/// Compiler-reserved name of the module lifecycle finalizer. User code
/// cannot declare a dotted identifier, so it can never collide.
pub const DTOR_NAME: &str = ".veld.dtor";

/// The closed set of special roles an exported function can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialFunctionKind {
    /// Zero-parameter `root()`: the graphics entry point.
    GraphicsRoot,
    /// Pre-[`FLEXIBLE_SIGNATURE_API`] single-parameter `root()` returning
    /// `int`.
    ///
    /// [`FLEXIBLE_SIGNATURE_API`]: veld_frontend::version::FLEXIBLE_SIGNATURE_API
    LegacyGraphicsRoot,
    /// Routed into kernel signature classification.
    ComputeKernelCandidate,
    LifecycleInit,
    LifecycleDestroy,
    NotSpecial,
}

fn is_root(decl: &FunctionDecl) -> bool {
    decl.name == ROOT_NAME
}

fn is_init(decl: &FunctionDecl) -> bool {
    decl.name == INIT_NAME
}

fn is_dtor(decl: &FunctionDecl) -> bool {
    decl.name == DTOR_NAME
}

/// Whether `decl` is the graphics entry point (modern or legacy form) at
/// the given target level.
pub fn is_graphics_root(api: TargetApi, decl: &FunctionDecl) -> bool {
    if !is_root(decl) {
        return false;
    }

    if decl.params.is_empty() {
        return true;
    }

    // Legacy single-parameter form: only below the flexible-signature
    // level, and only when the declaration already returns int.
    if !api.allows_role_skipping() && decl.params.len() == 1 && decl.return_shape == TypeShape::Int
    {
        return true;
    }

    false
}

/// Whether `decl` should be routed into kernel signature classification.
///
/// A `root()` whose first parameter is not a pointer is still a candidate:
/// it cannot classify successfully, but routing it through the pipeline
/// produces real diagnostics instead of silently ignoring the function.
pub fn is_kernel_candidate(api: TargetApi, decl: &FunctionDecl) -> bool {
    if is_graphics_root(api, decl) {
        return false;
    }

    if let Some(first) = decl.params.first() {
        if first.shape.is_pointer() {
            return true;
        }
        if is_root(decl) {
            return true;
        }
    }

    false
}

/// One-shot classification of `decl` over the closed special-role set.
pub fn classify_special_function(api: TargetApi, decl: &FunctionDecl) -> SpecialFunctionKind {
    if is_graphics_root(api, decl) {
        if decl.params.is_empty() {
            return SpecialFunctionKind::GraphicsRoot;
        }
        return SpecialFunctionKind::LegacyGraphicsRoot;
    }
    if is_init(decl) {
        return SpecialFunctionKind::LifecycleInit;
    }
    if is_dtor(decl) {
        return SpecialFunctionKind::LifecycleDestroy;
    }
    if is_kernel_candidate(api, decl) {
        return SpecialFunctionKind::ComputeKernelCandidate;
    }
    SpecialFunctionKind::NotSpecial
}

fn report(sink: &mut dyn DiagSink, span: Span, error: KernelError) {
    sink.report(Diagnostic::error(span, error.to_string()));
}

/// Validates the arity and return-type contract of a special function.
///
/// Must only be called for declarations that classify as a graphics root
/// (either form) or a lifecycle function; calling it on anything else is a
/// caller bug, not a user-facing diagnostic.
pub fn validate_special_form(
    api: TargetApi,
    sink: &mut dyn DiagSink,
    decl: &FunctionDecl,
) -> bool {
    let mut valid = true;

    if is_graphics_root(api, decl) {
        if !api.allows_role_skipping() && decl.params.len() == 1 {
            // Legacy graphics form: the single parameter must be int.
            let param = &decl.params[0];
            if param.shape != TypeShape::Int {
                report(
                    sink,
                    param.span,
                    KernelError::InvalidParameterType {
                        type_name: param.type_name.clone(),
                    },
                );
                valid = false;
            }
        }

        // Graphics usage requires an int return either way.
        if decl.return_shape != TypeShape::Int {
            report(
                sink,
                decl.span,
                KernelError::ReturnTypeMismatch {
                    function: decl.name.clone(),
                    expected: "int",
                },
            );
            valid = false;
        }
    } else if is_init(decl) || is_dtor(decl) {
        if !decl.params.is_empty() {
            report(
                sink,
                decl.span,
                KernelError::ArityMismatch {
                    function: decl.name.clone(),
                },
            );
            valid = false;
        }

        if decl.return_shape != TypeShape::Void {
            report(
                sink,
                decl.span,
                KernelError::ReturnTypeMismatch {
                    function: decl.name.clone(),
                    expected: "void",
                },
            );
            valid = false;
        }
    } else {
        panic!("validate_special_form called on a declaration that is not root, init or {DTOR_NAME}");
    }

    valid
}
