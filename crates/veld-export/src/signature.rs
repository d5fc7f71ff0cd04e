//! Kernel signature classification: role binding and metadata encoding.
//!
//! An exported kernel's parameter list provides up to five fixed roles, in
//! this order: input buffer, output buffer, user-data block, X coordinate,
//! Y coordinate. Classification runs in two phases over the parameter list:
//! a greedy positional match for the leading pointer roles, then a
//! name-driven binder for the trailing coordinate scalars. The bound roles
//! are encoded into a presence mask and checked against the target API's
//! compatibility policy.

use bitflags::bitflags;
use tracing::debug;

use veld_frontend::decl::{FunctionDecl, ParamDecl, PointeeKind, Span, TypeShape};
use veld_frontend::diag::{DiagSink, Diagnostic};
use veld_frontend::version::TargetApi;

use crate::compat;
use crate::error::KernelError;
use crate::export::{DescriptorClass, TypeDescriptor, TypeExporter};
use crate::special;

bitflags! {
    /// Presence mask over the five kernel roles, in their fixed bit layout.
    ///
    /// Consumed by runtime argument marshaling and by the reflection stage;
    /// the bit assignments are ABI and must not change.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SignatureBits: u32 {
        const INPUT = 0x01;
        const OUTPUT = 0x02;
        const USR_DATA = 0x04;
        const X = 0x08;
        const Y = 0x10;
    }
}

/// The classified signature of one exported kernel.
///
/// Fully populated by a single [`classify_kernel`] pass and immutable
/// afterwards. Role fields hold value copies of the bound parameters, never
/// references into the AST. The mask is encoded even when `valid` is
/// false, so diagnostics and downstream tooling can still inspect what was
/// attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelSignature {
    pub name: String,
    pub input: Option<ParamDecl>,
    pub output: Option<ParamDecl>,
    pub usr_data: Option<ParamDecl>,
    pub x: Option<ParamDecl>,
    pub y: Option<ParamDecl>,
    pub metadata: SignatureBits,
    /// True only if no validation error was recorded.
    pub valid: bool,
    /// Every violation found, in the order the pass found them.
    pub errors: Vec<KernelError>,
    /// True only for the synthesized placeholder from
    /// [`create_dummy_root`].
    pub is_dummy_root: bool,
    /// Reflected input element type; only attached to valid signatures.
    pub input_type: Option<TypeDescriptor>,
    /// Reflected output element type; only attached to valid signatures.
    pub output_type: Option<TypeDescriptor>,
    /// Reflected user-data packet record. Absent when there is no user-data
    /// role, when its pointee is `void`, or when the signature is invalid.
    pub param_packet: Option<TypeDescriptor>,
}

/// Roles bound by the positional phase, plus the index where the
/// coordinate phase takes over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct PositionalRoles {
    pub input: Option<usize>,
    pub output: Option<usize>,
    pub usr_data: Option<usize>,
    pub next: usize,
}

/// Greedy left-to-right matcher for the leading pointer parameters.
///
/// Applied once, never backtracking: a pointer that fails the test at its
/// slot is left for the coordinate phase, where it fails the scalar type
/// check instead.
pub(crate) fn match_positional_roles(params: &[ParamDecl]) -> PositionalRoles {
    let mut roles = PositionalRoles::default();
    let mut i = 0;

    // const T1 *input
    if matches!(
        params.get(i).map(|p| p.shape),
        Some(TypeShape::ConstPtr { .. })
    ) {
        roles.input = Some(i);
        i += 1;
    }

    // T2 *output
    if matches!(params.get(i).map(|p| p.shape), Some(TypeShape::MutPtr)) {
        roles.output = Some(i);
        i += 1;
    }

    // const T3 *usr_data
    if matches!(
        params.get(i).map(|p| p.shape),
        Some(TypeShape::ConstPtr { .. })
    ) {
        roles.usr_data = Some(i);
        i += 1;
    }

    roles.next = i;
    roles
}

/// Coordinate slots, in their fixed role order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CoordSlot {
    X,
    Y,
}

/// Name → slot table for explicitly named coordinate parameters.
const COORD_NAMES: &[(&str, CoordSlot)] = &[("x", CoordSlot::X), ("y", CoordSlot::Y)];

fn coord_slot(name: &str) -> Option<CoordSlot> {
    COORD_NAMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, slot)| slot)
}

/// Why [`CoordBinder::bind`] refused a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CoordIssue {
    /// The named slot is already bound, or `x` was named after `y` had
    /// locked it out.
    DuplicateOrMisordered,
    /// Both slots are bound and the parameter names neither.
    NoSlotLeft,
}

/// Name-driven X/Y binder for the trailing scalar run.
///
/// Unnamed scalars fill X then Y by position. An explicitly named `x` or
/// `y` claims its slot ahead of position, but never once the later slot is
/// bound: after Y is bound, X is locked for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct CoordBinder {
    pub x: Option<usize>,
    pub y: Option<usize>,
}

impl CoordBinder {
    pub(crate) fn bind(&mut self, index: usize, name: &str) -> Result<(), CoordIssue> {
        match coord_slot(name) {
            Some(CoordSlot::X) => {
                // Cannot rebind X, and cannot return to X once Y is bound.
                if self.x.is_some() || self.y.is_some() {
                    return Err(CoordIssue::DuplicateOrMisordered);
                }
                self.x = Some(index);
                Ok(())
            }
            Some(CoordSlot::Y) => {
                if self.y.is_some() {
                    return Err(CoordIssue::DuplicateOrMisordered);
                }
                self.y = Some(index);
                Ok(())
            }
            None => {
                if self.x.is_none() && self.y.is_none() {
                    self.x = Some(index);
                } else if self.y.is_none() {
                    self.y = Some(index);
                } else {
                    return Err(CoordIssue::NoSlotLeft);
                }
                Ok(())
            }
        }
    }
}

/// Derives the fixed-layout presence mask from the bound roles.
pub(crate) fn encode_mask(roles: &PositionalRoles, coords: &CoordBinder) -> SignatureBits {
    let mut mask = SignatureBits::empty();
    if roles.input.is_some() {
        mask |= SignatureBits::INPUT;
    }
    if roles.output.is_some() {
        mask |= SignatureBits::OUTPUT;
    }
    if roles.usr_data.is_some() {
        mask |= SignatureBits::USR_DATA;
    }
    if coords.x.is_some() {
        mask |= SignatureBits::X;
    }
    if coords.y.is_some() {
        mask |= SignatureBits::Y;
    }
    mask
}

/// Error accumulator scoped to one analysis pass.
///
/// Every recorded error is reported to the sink immediately and also kept,
/// in order, for the signature record.
struct ErrorAcc<'a> {
    sink: &'a mut dyn DiagSink,
    errors: Vec<KernelError>,
}

impl<'a> ErrorAcc<'a> {
    fn new(sink: &'a mut dyn DiagSink) -> Self {
        Self {
            sink,
            errors: Vec::new(),
        }
    }

    fn record(&mut self, span: Span, error: KernelError) {
        self.sink.report(Diagnostic::error(span, error.to_string()));
        self.errors.push(error);
    }

    fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn into_errors(self) -> Vec<KernelError> {
        self.errors
    }
}

/// Classifies one exported function declaration as a compute kernel.
///
/// Runs the whole pass even when violations are found: every broken rule is
/// reported to `sink` and recorded on the returned signature, and the
/// signature (with its mask) is returned whether or not it is valid. The
/// only way to get `None` back is a user-data payload the exporter cannot
/// reflect — that function is dropped from code generation while the rest
/// of the module keeps compiling.
pub fn classify_kernel(
    api: TargetApi,
    sink: &mut dyn DiagSink,
    exporter: &mut dyn TypeExporter,
    decl: &FunctionDecl,
) -> Option<KernelSignature> {
    debug_assert!(
        !decl.params.is_empty(),
        "zero-parameter declarations are never kernel candidates"
    );

    let mut errors = ErrorAcc::new(sink);

    if let Some(err) = compat::check_kernel_form(api, &decl.name) {
        errors.record(decl.span, err);
    }

    if decl.return_shape != TypeShape::Void {
        errors.record(
            decl.span,
            KernelError::ReturnTypeMismatch {
                function: decl.name.clone(),
                expected: "void",
            },
        );
    }

    let roles = match_positional_roles(&decl.params);
    if roles.input.is_none() && roles.output.is_none() {
        errors.record(
            decl.span,
            KernelError::MissingRequiredBuffer {
                kernel: decl.name.clone(),
            },
        );
    }

    let mut coords = CoordBinder::default();
    for (i, param) in decl.params.iter().enumerate().skip(roles.next) {
        if param.shape != TypeShape::UnsignedInt {
            errors.record(
                param.span,
                KernelError::UnsupportedParameterType {
                    kernel: decl.name.clone(),
                    param: param.name.clone(),
                    type_name: param.type_name.clone(),
                },
            );
            continue;
        }

        if let Err(issue) = coords.bind(i, &param.name) {
            let err = match issue {
                CoordIssue::DuplicateOrMisordered => KernelError::DuplicateOrMisorderedParameter {
                    param: param.name.clone(),
                },
                CoordIssue::NoSlotLeft => KernelError::UnexpectedExtraParameter {
                    kernel: decl.name.clone(),
                    param: param.name.clone(),
                },
            };
            errors.record(param.span, err);
        }
    }

    let metadata = encode_mask(&roles, &coords);

    if let Some(err) = compat::check_mask(api, &decl.name, metadata) {
        errors.record(decl.span, err);
    }

    let valid = errors.is_empty();

    let mut input_type = None;
    let mut output_type = None;
    let mut param_packet = None;
    if valid {
        if let Some(idx) = roles.usr_data {
            let param = &decl.params[idx];
            if let TypeShape::ConstPtr {
                pointee: PointeeKind::Data,
            } = param.shape
            {
                let Some(desc) = exporter.export_type(param.handle) else {
                    errors.record(
                        param.span,
                        KernelError::UserDataExportFailure {
                            kernel: decl.name.clone(),
                        },
                    );
                    return None;
                };
                debug_assert_eq!(
                    desc.class,
                    DescriptorClass::Record,
                    "user-data payloads reflect as records"
                );
                param_packet = Some(desc);
            }
            // const void *: the role stays bound for runtime marshaling,
            // but the payload is opaque to reflection.
        }

        input_type = roles
            .input
            .and_then(|i| exporter.export_type(decl.params[i].handle));
        output_type = roles
            .output
            .and_then(|i| exporter.export_type(decl.params[i].handle));
    }

    let param = |idx: Option<usize>| idx.map(|i| decl.params[i].clone());
    let signature = KernelSignature {
        name: decl.name.clone(),
        input: param(roles.input),
        output: param(roles.output),
        usr_data: param(roles.usr_data),
        x: param(coords.x),
        y: param(coords.y),
        metadata,
        valid,
        errors: errors.into_errors(),
        is_dummy_root: false,
        input_type,
        output_type,
        param_packet,
    };

    debug!(
        kernel = %signature.name,
        mask = signature.metadata.bits(),
        valid = signature.valid,
        "classified kernel signature"
    );

    Some(signature)
}

/// Synthesizes the implicit zero-parameter `root` placeholder used when a
/// module defines no explicit kernel.
pub fn create_dummy_root() -> KernelSignature {
    KernelSignature {
        name: special::ROOT_NAME.to_owned(),
        input: None,
        output: None,
        usr_data: None,
        x: None,
        y: None,
        metadata: SignatureBits::empty(),
        valid: true,
        errors: Vec::new(),
        is_dummy_root: true,
        input_type: None,
        output_type: None,
        param_packet: None,
    }
}
