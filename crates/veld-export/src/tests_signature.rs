use pretty_assertions::assert_eq;

use veld_frontend::decl::{FunctionDecl, TypeHandle, TypeShape};
use veld_frontend::diag::CollectedDiags;
use veld_frontend::version::TargetApi;

use crate::error::KernelError;
use crate::signature::{
    classify_kernel, create_dummy_root, encode_mask, match_positional_roles, CoordBinder,
    CoordIssue, KernelSignature, PositionalRoles, SignatureBits,
};
use crate::test_utils::{
    const_ptr, const_void_ptr, function, mut_ptr, param, uint, FailingExporter, RecordExporter,
};

const LEGACY: TargetApi = TargetApi(11);
const MODERN: TargetApi = TargetApi(21);

fn classify(api: TargetApi, decl: &FunctionDecl) -> (Option<KernelSignature>, CollectedDiags) {
    let mut sink = CollectedDiags::new();
    let mut exporter = RecordExporter::default();
    let sig = classify_kernel(api, &mut sink, &mut exporter, decl);
    (sig, sink)
}

#[test]
fn positional_match_assigns_leading_pointers_in_order() {
    let params = vec![
        const_ptr("a", "const float4 *"),
        mut_ptr("b", "float4 *"),
        const_ptr("u", "const params_t *"),
        uint("x"),
    ];
    let roles = match_positional_roles(&params);
    assert_eq!(roles.input, Some(0));
    assert_eq!(roles.output, Some(1));
    assert_eq!(roles.usr_data, Some(2));
    assert_eq!(roles.next, 3);
}

#[test]
fn positional_match_without_input_still_takes_user_data() {
    // No leading const pointer: output matches first, and the const
    // pointer after it still lands in the user-data slot.
    let params = vec![mut_ptr("b", "float4 *"), const_ptr("u", "const params_t *")];
    let roles = match_positional_roles(&params);
    assert_eq!(roles.input, None);
    assert_eq!(roles.output, Some(0));
    assert_eq!(roles.usr_data, Some(1));
    assert_eq!(roles.next, 2);
}

#[test]
fn positional_match_never_backtracks() {
    // A mutable pointer in the user-data slot is left for the coordinate
    // phase, where it will fail the scalar check.
    let params = vec![
        const_ptr("a", "const float4 *"),
        mut_ptr("b", "float4 *"),
        mut_ptr("c", "float *"),
    ];
    let roles = match_positional_roles(&params);
    assert_eq!(roles.usr_data, None);
    assert_eq!(roles.next, 2);
}

#[test]
fn coord_binder_fills_by_position() {
    let mut binder = CoordBinder::default();
    binder.bind(0, "i").unwrap();
    binder.bind(1, "j").unwrap();
    assert_eq!(binder.x, Some(0));
    assert_eq!(binder.y, Some(1));
    assert_eq!(binder.bind(2, "k"), Err(CoordIssue::NoSlotLeft));
}

#[test]
fn coord_binder_named_y_skips_x_and_locks_it() {
    let mut binder = CoordBinder::default();
    binder.bind(0, "y").unwrap();
    assert_eq!(binder.y, Some(0));
    // Once Y is bound there is no way back to X, even by name.
    assert_eq!(binder.bind(1, "x"), Err(CoordIssue::DuplicateOrMisordered));
    assert_eq!(binder.x, None);
}

#[test]
fn coord_binder_rejects_duplicate_names() {
    let mut binder = CoordBinder::default();
    binder.bind(0, "x").unwrap();
    assert_eq!(binder.bind(1, "x"), Err(CoordIssue::DuplicateOrMisordered));
    binder.bind(2, "y").unwrap();
    assert_eq!(binder.bind(3, "y"), Err(CoordIssue::DuplicateOrMisordered));
}

#[test]
fn coord_binder_positional_fill_after_named_x() {
    let mut binder = CoordBinder::default();
    binder.bind(0, "x").unwrap();
    binder.bind(1, "height").unwrap();
    assert_eq!(binder.y, Some(1));
}

#[test]
fn mask_encodes_exactly_the_bound_roles() {
    let roles = PositionalRoles {
        input: Some(0),
        output: None,
        usr_data: Some(1),
        next: 2,
    };
    let coords = CoordBinder {
        x: None,
        y: Some(2),
    };
    assert_eq!(encode_mask(&roles, &coords).bits(), 0x01 | 0x04 | 0x10);
}

#[test]
fn full_buffer_and_coordinate_signature() {
    let decl = function(
        "blend",
        TypeShape::Void,
        vec![
            const_ptr("a", "const float4 *"),
            mut_ptr("b", "float4 *"),
            uint("x"),
            uint("y"),
        ],
    );
    let (sig, diags) = classify(MODERN, &decl);
    let sig = sig.unwrap();

    assert!(sig.valid);
    assert!(diags.is_empty());
    assert_eq!(
        sig.metadata,
        SignatureBits::INPUT | SignatureBits::OUTPUT | SignatureBits::X | SignatureBits::Y
    );
    assert_eq!(sig.metadata.bits(), 0x1B);
    assert_eq!(sig.input.as_ref().unwrap().name, "a");
    assert_eq!(sig.output.as_ref().unwrap().name, "b");
    assert!(sig.usr_data.is_none());
    assert_eq!(sig.x.as_ref().unwrap().name, "x");
    assert_eq!(sig.y.as_ref().unwrap().name, "y");
}

#[test]
fn gap_mask_rejected_below_flexible_signatures() {
    let decl = function(
        "root",
        TypeShape::Void,
        vec![
            const_ptr("a", "const float4 *"),
            mut_ptr("b", "float4 *"),
            uint("x"),
            uint("y"),
        ],
    );
    let (sig, diags) = classify(LEGACY, &decl);
    let sig = sig.unwrap();

    assert!(!sig.valid);
    // The mask is still encoded so tooling can see what was attempted.
    assert_eq!(sig.metadata.bits(), 0x1B);
    assert_eq!(
        sig.errors,
        vec![KernelError::SkipNotAllowed {
            kernel: "root".to_owned(),
            min: 11,
            max: 13,
        }]
    );
    assert_eq!(diags.len(), 1);
}

#[test]
fn output_only_kernel_is_valid() {
    let decl = function("generate", TypeShape::Void, vec![mut_ptr("out", "float *")]);
    let (sig, diags) = classify(MODERN, &decl);
    let sig = sig.unwrap();

    assert!(sig.valid);
    assert!(diags.is_empty());
    assert_eq!(sig.metadata, SignatureBits::OUTPUT);
    assert!(sig.input.is_none());
    assert_eq!(sig.output.as_ref().unwrap().name, "out");
}

#[test]
fn duplicate_x_parameter_is_rejected() {
    let decl = function("root", TypeShape::Void, vec![uint("x"), uint("x")]);
    let (sig, diags) = classify(MODERN, &decl);
    let sig = sig.unwrap();

    assert!(!sig.valid);
    // No buffers at all, then the second `x` collides.
    assert_eq!(
        sig.errors,
        vec![
            KernelError::MissingRequiredBuffer {
                kernel: "root".to_owned(),
            },
            KernelError::DuplicateOrMisorderedParameter {
                param: "x".to_owned(),
            },
        ]
    );
    assert_eq!(sig.metadata, SignatureBits::X);
    assert_eq!(diags.len(), 2);
}

#[test]
fn truncation_only_below_flexible_signatures() {
    let params = || {
        vec![
            const_ptr("a", "const uchar4 *"),
            mut_ptr("b", "uchar4 *"),
            uint("x"),
        ]
    };

    // in + out + x with no user data leaves a gap: rejected at the legacy
    // tier, fine at the modern tier.
    let decl = function("root", TypeShape::Void, params());
    let (sig, _) = classify(LEGACY, &decl);
    let sig = sig.unwrap();
    assert!(!sig.valid);
    assert_eq!(sig.metadata.bits(), 0x0B);
    assert!(matches!(
        sig.errors.as_slice(),
        [KernelError::SkipNotAllowed { .. }]
    ));

    let (sig, diags) = classify(MODERN, &decl);
    let sig = sig.unwrap();
    assert!(sig.valid);
    assert!(diags.is_empty());
}

#[test]
fn legacy_prefix_signature_is_valid() {
    let decl = function(
        "root",
        TypeShape::Void,
        vec![
            const_ptr("src", "const uchar4 *"),
            mut_ptr("dst", "uchar4 *"),
            const_ptr("usr", "const params_t *"),
            uint("x"),
            uint("y"),
        ],
    );
    let (sig, diags) = classify(LEGACY, &decl);
    let sig = sig.unwrap();

    assert!(sig.valid);
    assert!(diags.is_empty());
    assert_eq!(sig.metadata.bits(), 0x1F);
    assert!(sig.param_packet.is_some());
}

#[test]
fn non_scalar_trailing_parameter_is_reported() {
    let decl = function(
        "scale",
        TypeShape::Void,
        vec![
            const_ptr("a", "const float4 *"),
            mut_ptr("b", "float4 *"),
            param("f", TypeShape::Other, "float", 0),
        ],
    );
    let (sig, diags) = classify(MODERN, &decl);
    let sig = sig.unwrap();

    assert!(!sig.valid);
    assert_eq!(
        sig.errors,
        vec![KernelError::UnsupportedParameterType {
            kernel: "scale".to_owned(),
            param: "f".to_owned(),
            type_name: "float".to_owned(),
        }]
    );
    // The bad parameter bound no role, and the mask still reflects the
    // roles that were bound.
    assert_eq!(sig.metadata, SignatureBits::INPUT | SignatureBits::OUTPUT);
    assert!(sig.x.is_none());
    assert_eq!(diags.len(), 1);
}

#[test]
fn too_many_scalar_parameters_are_reported() {
    let decl = function(
        "root",
        TypeShape::Void,
        vec![
            const_ptr("a", "const float4 *"),
            uint("i"),
            uint("j"),
            uint("k"),
        ],
    );
    let (sig, _) = classify(MODERN, &decl);
    let sig = sig.unwrap();

    assert!(!sig.valid);
    assert_eq!(sig.x.as_ref().unwrap().name, "i");
    assert_eq!(sig.y.as_ref().unwrap().name, "j");
    assert_eq!(
        sig.errors,
        vec![KernelError::UnexpectedExtraParameter {
            kernel: "root".to_owned(),
            param: "k".to_owned(),
        }]
    );
}

#[test]
fn named_y_can_skip_x() {
    let decl = function(
        "root",
        TypeShape::Void,
        vec![const_ptr("a", "const float4 *"), uint("y")],
    );
    let (sig, diags) = classify(MODERN, &decl);
    let sig = sig.unwrap();

    assert!(sig.valid);
    assert!(diags.is_empty());
    assert_eq!(sig.metadata, SignatureBits::INPUT | SignatureBits::Y);
    assert!(sig.x.is_none());
    assert_eq!(sig.y.as_ref().unwrap().name, "y");
}

#[test]
fn named_kernel_rejected_below_named_kernel_api() {
    let decl = function(
        "invert",
        TypeShape::Void,
        vec![const_ptr("a", "const uchar4 *"), mut_ptr("b", "uchar4 *")],
    );
    let (sig, diags) = classify(LEGACY, &decl);
    let sig = sig.unwrap();

    assert!(!sig.valid);
    assert_eq!(
        sig.errors,
        vec![KernelError::UnsupportedKernelForm {
            kernel: "invert".to_owned(),
            min: 11,
            max: 15,
        }]
    );
    // The rest of the pass still ran: roles are bound and the mask is a
    // legal prefix, so the form gate is the only error.
    assert_eq!(sig.metadata.bits(), 0x03);
    assert_eq!(diags.len(), 1);

    let (sig, _) = classify(TargetApi(16), &decl);
    assert!(sig.unwrap().valid);
}

#[test]
fn kernel_must_return_void() {
    let decl = function(
        "root",
        TypeShape::Int,
        vec![const_ptr("a", "const float4 *")],
    );
    let (sig, _) = classify(MODERN, &decl);
    let sig = sig.unwrap();

    assert!(!sig.valid);
    assert_eq!(
        sig.errors,
        vec![KernelError::ReturnTypeMismatch {
            function: "root".to_owned(),
            expected: "void",
        }]
    );
}

#[test]
fn all_violations_reported_in_one_pass() {
    // Non-root name below the named-kernel level, non-void return, no
    // buffers, a non-scalar trailing parameter, and an empty mask that is
    // not a legal prefix: five errors from one pass.
    let decl = function(
        "busted",
        TypeShape::Int,
        vec![param("f", TypeShape::Other, "float", 0)],
    );
    let (sig, diags) = classify(LEGACY, &decl);
    let sig = sig.unwrap();

    assert!(!sig.valid);
    assert!(matches!(
        sig.errors.as_slice(),
        [
            KernelError::UnsupportedKernelForm { .. },
            KernelError::ReturnTypeMismatch { .. },
            KernelError::MissingRequiredBuffer { .. },
            KernelError::UnsupportedParameterType { .. },
            KernelError::SkipNotAllowed { .. },
        ]
    ));
    assert_eq!(diags.len(), 5);
}

#[test]
fn unreflectable_user_data_drops_the_function() {
    let decl = function(
        "root",
        TypeShape::Void,
        vec![
            const_ptr("a", "const float4 *"),
            mut_ptr("b", "float4 *"),
            const_ptr("usr", "const state_t *"),
        ],
    );
    let mut sink = CollectedDiags::new();
    let mut exporter = FailingExporter;
    let sig = classify_kernel(MODERN, &mut sink, &mut exporter, &decl);

    assert!(sig.is_none());
    assert_eq!(sink.len(), 1);
    assert!(sink.as_slice()[0].message.contains("root"));
}

#[test]
fn void_user_data_keeps_role_without_packet() {
    let decl = function(
        "root",
        TypeShape::Void,
        vec![
            const_ptr("a", "const float4 *"),
            mut_ptr("b", "float4 *"),
            const_void_ptr("usr"),
        ],
    );
    let mut sink = CollectedDiags::new();
    let mut exporter = RecordExporter::default();
    let sig = classify_kernel(MODERN, &mut sink, &mut exporter, &decl).unwrap();

    assert!(sig.valid);
    assert!(sig.metadata.contains(SignatureBits::USR_DATA));
    assert!(sig.usr_data.is_some());
    assert!(sig.param_packet.is_none());
    // Only the input and output element types were reflected.
    assert_eq!(exporter.exported.len(), 2);
}

#[test]
fn valid_signature_reflects_buffer_types() {
    let decl = function(
        "root",
        TypeShape::Void,
        vec![
            param(
                "src",
                TypeShape::ConstPtr {
                    pointee: veld_frontend::decl::PointeeKind::Data,
                },
                "const float4 *",
                7,
            ),
            param("dst", TypeShape::MutPtr, "float4 *", 9),
            param(
                "usr",
                TypeShape::ConstPtr {
                    pointee: veld_frontend::decl::PointeeKind::Data,
                },
                "const state_t *",
                3,
            ),
        ],
    );
    let mut sink = CollectedDiags::new();
    let mut exporter = RecordExporter::default();
    let sig = classify_kernel(MODERN, &mut sink, &mut exporter, &decl).unwrap();

    assert!(sig.valid);
    assert_eq!(sig.param_packet.as_ref().unwrap().name, "record_3");
    assert_eq!(sig.input_type.as_ref().unwrap().name, "record_7");
    assert_eq!(sig.output_type.as_ref().unwrap().name, "record_9");
    // The user-data packet is exported first, then input, then output.
    assert_eq!(
        exporter.exported,
        vec![TypeHandle(3), TypeHandle(7), TypeHandle(9)]
    );
}

#[test]
fn invalid_signatures_skip_reflection() {
    let decl = function(
        "root",
        TypeShape::Int,
        vec![
            const_ptr("a", "const float4 *"),
            mut_ptr("b", "float4 *"),
            const_ptr("usr", "const state_t *"),
        ],
    );
    let mut sink = CollectedDiags::new();
    let mut exporter = RecordExporter::default();
    let sig = classify_kernel(MODERN, &mut sink, &mut exporter, &decl).unwrap();

    assert!(!sig.valid);
    assert!(sig.param_packet.is_none());
    assert!(sig.input_type.is_none());
    assert!(sig.output_type.is_none());
    assert!(exporter.exported.is_empty());
}

#[test]
fn dummy_root_is_empty_and_valid() {
    let sig = create_dummy_root();
    assert!(sig.is_dummy_root);
    assert!(sig.valid);
    assert_eq!(sig.name, "root");
    assert_eq!(sig.metadata, SignatureBits::empty());
    assert!(sig.input.is_none());
    assert!(sig.output.is_none());
    assert!(sig.usr_data.is_none());
    assert!(sig.x.is_none());
    assert!(sig.y.is_none());
    assert!(sig.errors.is_empty());
}

#[test]
fn classification_is_idempotent() {
    let decl = function("root", TypeShape::Void, vec![uint("x"), uint("x")]);
    let (first, _) = classify(MODERN, &decl);
    let (second, _) = classify(MODERN, &decl);
    assert_eq!(first, second);
}
