//! Versioned compatibility policy for kernel signatures.
//!
//! Two independent gates, both driven by the declarative tables below
//! rather than threshold comparisons scattered through the classifier:
//!
//! - below [`NAMED_KERNEL_API`], only `root` may be a compute kernel;
//! - below [`FLEXIBLE_SIGNATURE_API`], a signature mask may only truncate
//!   the fixed role order from the end, never leave a gap.

use veld_frontend::version::{
    TargetApi, FLEXIBLE_SIGNATURE_API, MINIMUM_TARGET_API, NAMED_KERNEL_API,
};

use crate::error::KernelError;
use crate::signature::SignatureBits;
use crate::special;

/// Masks accepted below [`FLEXIBLE_SIGNATURE_API`]: every prefix of the
/// fixed role order `input, output, usr_data, x, y`.
pub const TRUNCATED_MASKS: [SignatureBits; 5] = [
    SignatureBits::INPUT,
    SignatureBits::INPUT.union(SignatureBits::OUTPUT),
    SignatureBits::INPUT
        .union(SignatureBits::OUTPUT)
        .union(SignatureBits::USR_DATA),
    SignatureBits::INPUT
        .union(SignatureBits::OUTPUT)
        .union(SignatureBits::USR_DATA)
        .union(SignatureBits::X),
    SignatureBits::INPUT
        .union(SignatureBits::OUTPUT)
        .union(SignatureBits::USR_DATA)
        .union(SignatureBits::X)
        .union(SignatureBits::Y),
];

/// How a target level constrains signature masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskPolicy {
    /// Only the prefix masks in [`TRUNCATED_MASKS`].
    TruncatedOnly,
    /// Any combination of roles.
    Any,
}

/// The mask policy in force at `api`.
pub fn mask_policy(api: TargetApi) -> MaskPolicy {
    if api.allows_role_skipping() {
        MaskPolicy::Any
    } else {
        MaskPolicy::TruncatedOnly
    }
}

/// Whether `mask` is legal at `api`.
pub fn mask_allowed(api: TargetApi, mask: SignatureBits) -> bool {
    match mask_policy(api) {
        MaskPolicy::Any => true,
        MaskPolicy::TruncatedOnly => TRUNCATED_MASKS.contains(&mask),
    }
}

/// Mask gate. `None` means `mask` is legal at `api`.
pub(crate) fn check_mask(
    api: TargetApi,
    kernel: &str,
    mask: SignatureBits,
) -> Option<KernelError> {
    if mask_allowed(api, mask) {
        return None;
    }
    Some(KernelError::SkipNotAllowed {
        kernel: kernel.to_owned(),
        min: MINIMUM_TARGET_API,
        max: FLEXIBLE_SIGNATURE_API - 1,
    })
}

/// Kernel-name gate: below [`NAMED_KERNEL_API`] only `root` may be a
/// compute kernel. `None` means the form is legal at `api`.
pub(crate) fn check_kernel_form(api: TargetApi, kernel: &str) -> Option<KernelError> {
    if api.allows_named_kernels() || kernel == special::ROOT_NAME {
        return None;
    }
    Some(KernelError::UnsupportedKernelForm {
        kernel: kernel.to_owned(),
        min: MINIMUM_TARGET_API,
        max: NAMED_KERNEL_API - 1,
    })
}
